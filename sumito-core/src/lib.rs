//! Sumito Core - Marble-pushing game engine and AI
//!
//! This crate provides the core game logic for a hexagonal marble-pushing game:
//! - Board geometry (61-cell hex grid with cube coordinates)
//! - Starting layouts and text notation for boards and moves
//! - Move generation (single, inline, side-step, sumito push) and application
//! - Pluggable position evaluation with weight presets
//! - Iterative-deepening alpha-beta AI with a Zobrist transposition table
//! - Time-boxed worker search, agent configuration and game sessions

pub mod board;
pub mod error;
pub mod layout;
pub mod moves;
pub mod notation;
pub mod eval;
pub mod heuristics;
pub mod zobrist;
pub mod transposition;
pub mod ai;
pub mod worker;
pub mod agent;
pub mod config;
pub mod game;

// Re-exports for convenient access
pub use board::{Board, Color, Direction, Position, DIRECTIONS, BOARD_RADIUS};
pub use error::{ConfigError, MoveError, NotationError};
pub use layout::Layout;
pub use moves::{apply, generate_moves, Move, MoveKind};
pub use notation::{from_notation, parse_input, parse_move, render_move, to_notation};
pub use eval::{heuristic_by_name, Heuristic, Weights, WIN_VALUE};
pub use transposition::{Bound, TranspositionTable};
pub use ai::{AlphaBetaAI, SearchConfig, SearchOutcome, SearchReport, SearchStop};
pub use worker::search_in_worker;
pub use agent::{search, Agent};
pub use config::AgentConfig;
pub use game::{play_game, GameResult, GameState};
