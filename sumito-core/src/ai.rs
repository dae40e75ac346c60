//! Iterative-deepening Alpha-Beta AI

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::board::{Board, Color};
use crate::error::ConfigError;
use crate::eval::{evaluate_with_depth, weighted, Heuristic, Weights, WIN_VALUE};
use crate::moves::{generate_moves, Move};
use crate::transposition::{Bound, TranspositionTable};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Deepest iteration an unbounded search will start
pub const MAX_SEARCH_DEPTH: u32 = 64;

/// Nodes between wall-clock checks
const DEADLINE_CHECK_INTERVAL: u64 = 256;

// ============================================================================
// CONFIGURATION AND RESULTS
// ============================================================================

/// Search budget and evaluation parameters
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// `None` searches until the time limit or `MAX_SEARCH_DEPTH`
    pub max_depth: Option<u32>,
    pub time_limit: Option<Duration>,
    pub weights: Weights,
    /// Keep at most this many non-push moves per node
    pub max_moves: Option<usize>,
    /// Sort moves by a one-ply evaluation before searching them
    pub ordering: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(3),
            time_limit: None,
            weights: Weights::default(),
            max_moves: None,
            ordering: true,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(depth: u32) -> Self {
        Self {
            max_depth: Some(depth),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == Some(0) {
            return Err(ConfigError::ZeroDepth);
        }
        if let Some(limit) = self.time_limit {
            if limit.is_zero() {
                return Err(ConfigError::BadTimeLimit(0.0));
            }
        }
        if self.max_depth.is_none() && self.time_limit.is_none() {
            return Err(ConfigError::Unbounded);
        }
        Ok(())
    }

    fn depth_cap(&self) -> u32 {
        self.max_depth.unwrap_or(MAX_SEARCH_DEPTH).min(MAX_SEARCH_DEPTH)
    }
}

/// Why iterative deepening stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStop {
    /// The game is over or the side to move has no legal move
    NoMoves,
    /// A win or loss was proven, or no line reached the horizon
    Converged,
    /// The deadline or stop flag interrupted an iteration
    TimeExpired,
    /// The depth limit was reached
    DepthExhausted,
}

/// Result of one fully completed iteration
#[derive(Clone, Debug, PartialEq)]
pub struct SearchReport {
    pub depth: u32,
    pub best_move: Move,
    /// From the searching color's perspective
    pub score: f32,
    /// Nodes visited so far in this search
    pub nodes: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    /// Deepest completed iteration
    pub best: Option<SearchReport>,
    pub stop: SearchStop,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl SearchOutcome {
    pub fn best_move(&self) -> Option<&Move> {
        self.best.as_ref().map(|r| &r.best_move)
    }

    pub fn depth(&self) -> u32 {
        self.best.as_ref().map_or(0, |r| r.depth)
    }
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Alpha-Beta AI player
///
/// Owns its transposition table; the table is cleared at the start of
/// every search.
pub struct AlphaBetaAI {
    pub config: SearchConfig,
    heuristic: Arc<dyn Heuristic>,
    table: TranspositionTable,
}

impl AlphaBetaAI {
    pub fn new(config: SearchConfig, heuristic: Arc<dyn Heuristic>) -> Self {
        Self {
            config,
            heuristic,
            table: TranspositionTable::new(),
        }
    }

    /// Fixed-depth search with the weighted heuristic and default weights
    pub fn with_depth(depth: u32) -> Self {
        Self::new(SearchConfig::with_depth(depth), Arc::new(weighted))
    }

    pub fn heuristic(&self) -> Arc<dyn Heuristic> {
        Arc::clone(&self.heuristic)
    }

    /// Get best move for `color`
    pub fn best_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        self.search(board, color).best.map(|r| r.best_move)
    }

    /// Evaluate a position
    pub fn evaluate(&self, board: &Board, color: Color) -> f32 {
        self.heuristic.evaluate(color, board, &self.config.weights)
    }

    /// Run iterative deepening under the configured budget
    pub fn search(&mut self, board: &Board, color: Color) -> SearchOutcome {
        let stop = AtomicBool::new(false);
        self.search_with(board, color, &stop, |_| {})
    }

    /// Iterative deepening with a shared stop flag and a per-depth callback
    ///
    /// `on_depth` sees every completed iteration in increasing depth order.
    /// An iteration interrupted by the flag or the deadline is discarded.
    pub(crate) fn search_with(
        &mut self,
        board: &Board,
        color: Color,
        stop: &AtomicBool,
        mut on_depth: impl FnMut(&SearchReport),
    ) -> SearchOutcome {
        let start = Instant::now();
        self.table.clear();

        let mut frame = Frame {
            root: color,
            heuristic: self.heuristic.as_ref(),
            config: &self.config,
            table: &mut self.table,
            stop,
            deadline: self.config.time_limit.map(|limit| start + limit),
            nodes: 0,
            hit_horizon: false,
        };

        let mut moves = if board.is_terminal().is_some() {
            Vec::new()
        } else {
            frame.candidate_moves(board, color, 2, true)
        };
        if moves.is_empty() {
            return SearchOutcome {
                best: None,
                stop: SearchStop::NoMoves,
                nodes: 0,
                elapsed: start.elapsed(),
            };
        }

        let mut best: Option<SearchReport> = None;
        let mut reason = SearchStop::DepthExhausted;

        for depth in 1..=self.config.depth_cap() {
            // Principal variation first
            if let Some(prev) = &best {
                if let Some(index) = moves.iter().position(|m| *m == prev.best_move) {
                    let mv = moves.remove(index);
                    moves.insert(0, mv);
                }
            }

            frame.hit_horizon = false;
            match frame.search_root(board, depth, &moves) {
                Ok((index, score)) => {
                    let report = SearchReport {
                        depth,
                        best_move: moves[index].clone(),
                        score,
                        nodes: frame.nodes,
                    };
                    debug!(
                        "depth {} best {} score {:.2} nodes {}",
                        depth, report.best_move, score, frame.nodes
                    );
                    on_depth(&report);
                    best = Some(report);

                    if score.abs() >= WIN_VALUE || !frame.hit_horizon {
                        reason = SearchStop::Converged;
                        break;
                    }
                }
                Err(Interrupted) => {
                    reason = SearchStop::TimeExpired;
                    break;
                }
            }
        }

        let outcome = SearchOutcome {
            best,
            stop: reason,
            nodes: frame.nodes,
            elapsed: start.elapsed(),
        };
        info!(
            "{} searched to depth {} ({:?}, {} nodes, {:.3}s)",
            color,
            outcome.depth(),
            outcome.stop,
            outcome.nodes,
            outcome.elapsed.as_secs_f64()
        );
        outcome
    }
}

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// Keep every push and at most `limit` other moves, preserving order
fn prune_quiet_moves(moves: Vec<Move>, limit: usize) -> Vec<Move> {
    let mut quiet = 0;
    moves
        .into_iter()
        .filter(|mv| {
            if mv.is_push() {
                return true;
            }
            quiet += 1;
            quiet <= limit
        })
        .collect()
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// Win scores carry the remaining depth at the terminal leaf. The table keeps
/// them relative to the storing node (`WIN_VALUE - plies to the end`) and
/// rebases them on the probing node's remaining depth.
fn to_table(value: f32, depth: u32) -> f32 {
    if value >= WIN_VALUE {
        value - depth as f32
    } else if value <= -WIN_VALUE {
        value + depth as f32
    } else {
        value
    }
}

/// Inverse of `to_table`; never weaker than a bare win or loss
fn from_table(value: f32, depth: u32) -> f32 {
    if value > 0.0 && value >= WIN_VALUE - MAX_SEARCH_DEPTH as f32 {
        (value + depth as f32).max(WIN_VALUE)
    } else if value < 0.0 && value <= -(WIN_VALUE - MAX_SEARCH_DEPTH as f32) {
        (value - depth as f32).min(-WIN_VALUE)
    } else {
        value
    }
}

/// The deadline passed or the stop flag was raised
#[derive(Debug)]
struct Interrupted;

/// State shared by every node of one search
struct Frame<'a> {
    root: Color,
    heuristic: &'a dyn Heuristic,
    config: &'a SearchConfig,
    table: &'a mut TranspositionTable,
    stop: &'a AtomicBool,
    deadline: Option<Instant>,
    nodes: u64,
    /// Whether the current iteration evaluated a non-terminal leaf
    hit_horizon: bool,
}

impl Frame<'_> {
    fn tick(&mut self) -> Result<(), Interrupted> {
        self.nodes += 1;
        if self.stop.load(Ordering::Relaxed) {
            return Err(Interrupted);
        }
        if self.nodes % DEADLINE_CHECK_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    return Err(Interrupted);
                }
            }
        }
        Ok(())
    }

    fn leaf(&mut self, board: &Board, depth: u32) -> f32 {
        if board.is_terminal().is_none() {
            self.hit_horizon = true;
        }
        evaluate_with_depth(self.heuristic, self.root, board, &self.config.weights, depth)
    }

    fn probe(&mut self, color: Color, board: &Board, depth: u32, alpha: f32, beta: f32) -> Option<f32> {
        let mut entry = self.table.lookup(color, board)?;
        entry.value = from_table(entry.value, depth);
        let value = entry.cutoff(depth, alpha, beta)?;
        // A cached value may stand for leaves this iteration never visits
        if value.abs() < WIN_VALUE {
            self.hit_horizon = true;
        }
        Some(value)
    }

    /// Legal moves for `color`, ordered and truncated per the config
    fn candidate_moves(&self, board: &Board, color: Color, depth: u32, maximizing: bool) -> Vec<Move> {
        let mut moves = generate_moves(color, board);

        if self.config.ordering && depth >= 2 {
            let mut scored: Vec<(f32, Move)> = moves
                .into_iter()
                .map(|mv| {
                    let child = board.with_move(&mv);
                    let score =
                        evaluate_with_depth(self.heuristic, self.root, &child, &self.config.weights, 0);
                    (score, mv)
                })
                .collect();
            if maximizing {
                scored.sort_by(|a, b| b.0.total_cmp(&a.0));
            } else {
                scored.sort_by(|a, b| a.0.total_cmp(&b.0));
            }
            moves = scored.into_iter().map(|(_, mv)| mv).collect();
        }

        match self.config.max_moves {
            Some(limit) => prune_quiet_moves(moves, limit),
            None => moves,
        }
    }

    /// Best root move index and its score; ties keep the earlier move
    fn search_root(&mut self, board: &Board, depth: u32, moves: &[Move]) -> Result<(usize, f32), Interrupted> {
        self.tick()?;
        let mut alpha = f32::NEG_INFINITY;
        let beta = f32::INFINITY;
        let mut best = (0, f32::NEG_INFINITY);

        for (index, mv) in moves.iter().enumerate() {
            let child = board.with_move(mv);
            let score = self.min_value(&child, depth - 1, alpha, beta)?;
            if score > best.1 {
                best = (index, score);
            }
            alpha = alpha.max(score);
        }

        Ok(best)
    }

    /// Node where the root color moves
    fn max_value(&mut self, board: &Board, depth: u32, mut alpha: f32, beta: f32) -> Result<f32, Interrupted> {
        self.tick()?;
        if depth == 0 || board.is_terminal().is_some() {
            return Ok(self.leaf(board, depth));
        }
        let color = self.root;
        if let Some(value) = self.probe(color, board, depth, alpha, beta) {
            return Ok(value);
        }

        let moves = self.candidate_moves(board, color, depth, true);
        if moves.is_empty() {
            return Ok(self.leaf(board, depth));
        }

        let alpha0 = alpha;
        let mut value = f32::NEG_INFINITY;
        for mv in &moves {
            let child = board.with_move(mv);
            value = value.max(self.min_value(&child, depth - 1, alpha, beta)?);
            if value >= beta {
                break;
            }
            alpha = alpha.max(value);
        }

        let bound = if value <= alpha0 {
            Bound::UpperBound
        } else if value >= beta {
            Bound::LowerBound
        } else {
            Bound::Exact
        };
        self.table.store(color, board, to_table(value, depth), depth, bound);
        Ok(value)
    }

    /// Node where the opponent moves
    fn min_value(&mut self, board: &Board, depth: u32, alpha: f32, mut beta: f32) -> Result<f32, Interrupted> {
        self.tick()?;
        if depth == 0 || board.is_terminal().is_some() {
            return Ok(self.leaf(board, depth));
        }
        let color = self.root.opponent();
        if let Some(value) = self.probe(color, board, depth, alpha, beta) {
            return Ok(value);
        }

        let moves = self.candidate_moves(board, color, depth, false);
        if moves.is_empty() {
            return Ok(self.leaf(board, depth));
        }

        let beta0 = beta;
        let mut value = f32::INFINITY;
        for mv in &moves {
            let child = board.with_move(mv);
            value = value.min(self.max_value(&child, depth - 1, alpha, beta)?);
            if value <= alpha {
                break;
            }
            beta = beta.min(value);
        }

        let bound = if value >= beta0 {
            Bound::LowerBound
        } else if value <= alpha {
            Bound::UpperBound
        } else {
            Bound::Exact
        };
        self.table.store(color, board, to_table(value, depth), depth, bound);
        Ok(value)
    }
}

// ============================================================================
// TESTS
// ============================================================================
