//! Error types

use crate::board::Color;

/// Malformed board notation, input position or move string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("malformed marble token '{0}'")]
    BadToken(String),

    #[error("cell {0} is off the board")]
    OffBoard(String),

    #[error("cell {0} is listed more than once")]
    DuplicateCell(String),

    #[error("unknown color '{0}'")]
    BadColor(String),

    #[error("no direction symbol in move '{0}'")]
    MissingDirection(String),

    #[error("malformed move '{input}': {reason}")]
    BadMove { input: String, reason: &'static str },

    #[error("missing {0} line")]
    MissingLine(&'static str),
}

impl NotationError {
    pub(crate) fn bad_move(input: &str, reason: &'static str) -> Self {
        NotationError::BadMove {
            input: input.to_string(),
            reason,
        }
    }
}

/// A move rejected before touching the board
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("move has no marbles")]
    Empty,

    #[error("{0} marbles cannot move together (at most 3)")]
    TooManyMarbles(usize),

    #[error("no {color} marble at {cell}")]
    NotOwned { cell: String, color: Color },

    #[error("{cell} does not land one step along the move direction")]
    Misaligned { cell: String },

    #[error("move {0} is not legal on this board")]
    Illegal(String),

    #[error("it is {expected}'s turn")]
    WrongTurn { expected: Color },

    #[error("the game is already over")]
    GameOver,

    #[error(transparent)]
    Notation(#[from] NotationError),
}

/// Invalid agent or search configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown heuristic '{0}'")]
    UnknownHeuristic(String),

    #[error("unknown weight preset '{0}'")]
    UnknownPreset(String),

    #[error("unknown layout '{0}'")]
    UnknownLayout(String),

    #[error("search depth must be at least 1")]
    ZeroDepth,

    #[error("time limit must be a positive number of seconds, got {0}")]
    BadTimeLimit(f64),

    #[error("depth and time limit cannot both be unbounded")]
    Unbounded,
}
