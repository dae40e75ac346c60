//! Transposition table for alpha-beta search

use rustc_hash::FxHashMap;

use crate::board::{Board, Color};
use crate::zobrist::{ZobristHasher, DEFAULT_SEED};

/// How a stored value relates to the true minimax value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// True value is at least `value` (search failed high)
    LowerBound,
    /// True value is at most `value` (search failed low)
    UpperBound,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TtEntry {
    pub value: f32,
    pub depth: u32,
    pub bound: Bound,
}

impl TtEntry {
    /// Value usable in place of searching `depth` plies within (alpha, beta)
    pub fn cutoff(&self, depth: u32, alpha: f32, beta: f32) -> Option<f32> {
        if self.depth < depth {
            return None;
        }
        match self.bound {
            Bound::Exact => Some(self.value),
            Bound::LowerBound if self.value >= beta => Some(self.value),
            Bound::UpperBound if self.value <= alpha => Some(self.value),
            _ => None,
        }
    }
}

/// Depth-preferred cache keyed by the Zobrist hash of (side to move, board)
pub struct TranspositionTable {
    hasher: ZobristHasher,
    table: FxHashMap<u64, TtEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            hasher: ZobristHasher::new(seed),
            table: FxHashMap::default(),
        }
    }

    pub fn hash(&self, color: Color, board: &Board) -> u64 {
        self.hasher.hash(color, board)
    }

    pub fn lookup(&self, color: Color, board: &Board) -> Option<TtEntry> {
        self.table.get(&self.hash(color, board)).copied()
    }

    /// Insert unless a deeper entry is already stored
    pub fn store(&mut self, color: Color, board: &Board, value: f32, depth: u32, bound: Bound) {
        let key = self.hash(color, board);
        let entry = TtEntry { value, depth, bound };
        match self.table.get_mut(&key) {
            Some(existing) if existing.depth > depth => {}
            Some(existing) => *existing = entry,
            None => {
                self.table.insert(key, entry);
            }
        }
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}
