//! Canonical starting layouts

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Position};
use crate::error::ConfigError;

/// Rows of a layout: (row letter, columns)
type Rows = &'static [(char, &'static [u8])];

struct Setup {
    black: Rows,
    white: Rows,
}

const STANDARD: Setup = Setup {
    black: &[('A', &[1, 2, 3, 4, 5]), ('B', &[1, 2, 3, 4, 5, 6]), ('C', &[3, 4, 5])],
    white: &[('I', &[5, 6, 7, 8, 9]), ('H', &[4, 5, 6, 7, 8, 9]), ('G', &[5, 6, 7])],
};

// Two seven-marble daisies per side, centred on B2/H8 (black) and B5/H5 (white)
const BELGIAN_DAISY: Setup = Setup {
    black: &[
        ('A', &[1, 2]), ('B', &[1, 2, 3]), ('C', &[2, 3]),
        ('G', &[7, 8]), ('H', &[7, 8, 9]), ('I', &[8, 9]),
    ],
    white: &[
        ('A', &[4, 5]), ('B', &[4, 5, 6]), ('C', &[5, 6]),
        ('G', &[4, 5]), ('H', &[4, 5, 6]), ('I', &[5, 6]),
    ],
};

// Daisies centred on C2/G8 (black) and C6/G4 (white)
const GERMAN_DAISY: Setup = Setup {
    black: &[
        ('B', &[1, 2]), ('C', &[1, 2, 3]), ('D', &[2, 3]),
        ('F', &[7, 8]), ('G', &[7, 8, 9]), ('H', &[8, 9]),
    ],
    white: &[
        ('B', &[5, 6]), ('C', &[5, 6, 7]), ('D', &[6, 7]),
        ('F', &[3, 4]), ('G', &[3, 4, 5]), ('H', &[4, 5]),
    ],
};

/// Starting position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Standard,
    Belgian,
    German,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::Standard, Layout::Belgian, Layout::German];

    pub fn name(self) -> &'static str {
        match self {
            Layout::Standard => "standard",
            Layout::Belgian => "belgian",
            Layout::German => "german",
        }
    }

    fn setup(self) -> &'static Setup {
        match self {
            Layout::Standard => &STANDARD,
            Layout::Belgian => &BELGIAN_DAISY,
            Layout::German => &GERMAN_DAISY,
        }
    }

    /// Marble placements, black first
    pub fn placements(self) -> Vec<(Position, Color)> {
        let setup = self.setup();
        expand(setup.black, Color::Black)
            .chain(expand(setup.white, Color::White))
            .collect()
    }

    /// Fresh board in this layout
    pub fn board(self) -> Board {
        let mut board = Board::new();
        for (pos, color) in self.placements() {
            board.put(pos, color);
        }
        board
    }
}

fn expand(rows: Rows, color: Color) -> impl Iterator<Item = (Position, Color)> {
    rows.iter().flat_map(move |&(row, columns)| {
        columns
            .iter()
            .filter_map(move |&column| Position::from_row_column(row, column))
            .map(move |pos| (pos, color))
    })
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" | "default" => Ok(Layout::Standard),
            "belgian" | "belgian-daisy" => Ok(Layout::Belgian),
            "german" | "german-daisy" => Ok(Layout::German),
            _ => Err(ConfigError::UnknownLayout(s.to_string())),
        }
    }
}
