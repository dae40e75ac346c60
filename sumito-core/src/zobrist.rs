//! Zobrist hashing of (board, side to move)

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Color, GRID_WIDTH};

/// Seed used by the default hasher
pub const DEFAULT_SEED: u64 = 42;

const GRID_CELLS: usize = GRID_WIDTH * GRID_WIDTH;

/// Random keys per (cell, color) plus one per side to move
#[derive(Clone, Debug)]
pub struct ZobristHasher {
    marble: Vec<[u64; 2]>,
    to_move: [u64; 2],
}

impl ZobristHasher {
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let marble = (0..GRID_CELLS)
            .map(|_| [rng.next_u64(), rng.next_u64()])
            .collect();
        let to_move = [rng.next_u64(), rng.next_u64()];
        Self { marble, to_move }
    }

    /// XOR of every occupied cell's key and the side-to-move key
    pub fn hash(&self, color: Color, board: &Board) -> u64 {
        board
            .marbles()
            .fold(self.to_move[color.index()], |h, (pos, c)| {
                h ^ self.marble[pos.grid_index()][c.index()]
            })
    }
}

impl Default for ZobristHasher {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
