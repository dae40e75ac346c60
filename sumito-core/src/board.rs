//! Hex board geometry with cube coordinates

use std::fmt;
use std::sync::OnceLock;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::NotationError;

/// Board radius (distance from center to edge)
pub const BOARD_RADIUS: i8 = 4;

/// Number of cells on a radius-4 hexagon
pub const CELL_COUNT: usize = 61;

/// Marbles each side owns at the start of a game
pub const MARBLES_PER_SIDE: usize = 14;

/// Removed marbles that lose the game
pub const LOSING_REMOVALS: usize = 6;

/// Width of the (q, r) square that encloses the hexagon
pub(crate) const GRID_WIDTH: usize = 9;

// ============================================================================
// COLOR
// ============================================================================

/// Marble color. Black always moves first from the canonical layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black = 0,
    White = 1,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Letter used by the board notation
    pub fn letter(self) -> char {
        match self {
            Color::Black => 'b',
            Color::White => 'w',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'b' => Some(Color::Black),
            'w' => Some(Color::White),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => f.write_str("black"),
            Color::White => f.write_str("white"),
        }
    }
}

// ============================================================================
// DIRECTIONS
// ============================================================================

/// The six unit directions, counter-clockwise from East
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    East = 0,
    NorthEast = 1,
    NorthWest = 2,
    West = 3,
    SouthWest = 4,
    SouthEast = 5,
}

/// All directions in index order
pub const DIRECTIONS: [Direction; 6] = [
    Direction::East,
    Direction::NorthEast,
    Direction::NorthWest,
    Direction::West,
    Direction::SouthWest,
    Direction::SouthEast,
];

/// Cube vectors (dq, dr, ds), indexed like `DIRECTIONS`
const VECTORS: [(i8, i8, i8); 6] = [
    (1, 0, -1),  // E
    (1, -1, 0),  // NE
    (0, -1, 1),  // NW
    (-1, 0, 1),  // W
    (-1, 1, 0),  // SW
    (0, 1, -1),  // SE
];

/// Move-string symbols, indexed like `DIRECTIONS`
const SYMBOLS: [char; 6] = ['→', '↗', '↖', '←', '↙', '↘'];

impl Direction {
    pub fn vector(self) -> (i8, i8, i8) {
        VECTORS[self as usize]
    }

    pub fn opposite(self) -> Direction {
        DIRECTIONS[(self as usize + 3) % 6]
    }

    pub fn symbol(self) -> char {
        SYMBOLS[self as usize]
    }

    pub fn from_symbol(symbol: char) -> Option<Direction> {
        SYMBOLS
            .iter()
            .position(|&s| s == symbol)
            .map(|i| DIRECTIONS[i])
    }

    /// True when `other` runs along the same line (same or opposite direction)
    pub fn is_parallel(self, other: Direction) -> bool {
        self == other || self == other.opposite()
    }

    /// Representative of the axis: East, NorthEast or NorthWest
    pub fn axis(self) -> Direction {
        if (self as usize) < 3 {
            self
        } else {
            self.opposite()
        }
    }

    /// The four directions a group aligned with `self` can side-step into
    pub fn perpendiculars(self) -> impl Iterator<Item = Direction> {
        DIRECTIONS.into_iter().filter(move |d| !d.is_parallel(self))
    }
}

// ============================================================================
// POSITION
// ============================================================================

/// Cube hex coordinates, `q + r + s == 0`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub q: i8,
    pub r: i8,
    pub s: i8,
}

impl Position {
    pub const ORIGIN: Position = Position { q: 0, r: 0, s: 0 };

    pub const fn new(q: i8, r: i8, s: i8) -> Self {
        Self { q, r, s }
    }

    /// Build from the two independent axes
    pub const fn axial(q: i8, r: i8) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Cell named by a row letter (A-I) and column number (1-9)
    pub fn from_row_column(row: char, column: u8) -> Option<Self> {
        if !('A'..='I').contains(&row) || !(1..=9).contains(&column) {
            return None;
        }
        let q = column as i8 - 5;
        let r = b'E' as i8 - row as u8 as i8;
        let pos = Position::axial(q, r);
        pos.is_valid().then_some(pos)
    }

    /// Row letter, `A` at the bottom
    pub fn row(&self) -> char {
        (b'E' as i8 - self.r) as u8 as char
    }

    /// Column number, 1-based
    pub fn column(&self) -> u8 {
        (self.q + 5) as u8
    }

    /// Check if this cell is on the board
    pub fn is_valid(&self) -> bool {
        self.q + self.r + self.s == 0
            && self.q.abs() <= BOARD_RADIUS
            && self.r.abs() <= BOARD_RADIUS
            && self.s.abs() <= BOARD_RADIUS
    }

    /// Distance from center (0, 0, 0)
    pub fn distance_to_center(&self) -> i8 {
        (self.q.abs() + self.r.abs() + self.s.abs()) / 2
    }

    /// Distance between two cells
    pub fn distance_to(&self, other: Position) -> i8 {
        ((self.q - other.q).abs() + (self.r - other.r).abs() + (self.s - other.s).abs()) / 2
    }

    /// Cells between this one and the outer ring
    pub fn distance_to_rim(&self) -> i8 {
        BOARD_RADIUS - self.distance_to_center()
    }

    pub fn is_rim(&self) -> bool {
        self.distance_to_center() == BOARD_RADIUS
    }

    /// Step one cell, possibly leaving the board
    pub fn offset(&self, direction: Direction) -> Position {
        let (dq, dr, ds) = direction.vector();
        Position::new(self.q + dq, self.r + dr, self.s + ds)
    }

    /// Neighbor in `direction`, `None` past the edge
    pub fn neighbor(&self, direction: Direction) -> Option<Position> {
        let next = self.offset(direction);
        next.is_valid().then_some(next)
    }

    /// Unit direction leading from `self` to the adjacent `other`
    pub fn direction_to(&self, other: Position) -> Option<Direction> {
        DIRECTIONS.into_iter().find(|&d| self.offset(d) == other)
    }

    pub(crate) fn grid_index(&self) -> usize {
        (self.q + BOARD_RADIUS) as usize * GRID_WIDTH + (self.r + BOARD_RADIUS) as usize
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}{}", self.row(), self.column())
        } else {
            write!(f, "({}, {}, {})", self.q, self.r, self.s)
        }
    }
}

/// Every cell, ordered by row (A first) then column
pub fn cells() -> &'static [Position] {
    static CELLS: OnceLock<Vec<Position>> = OnceLock::new();
    CELLS.get_or_init(|| {
        let mut cells = Vec::with_capacity(CELL_COUNT);
        for r in (-BOARD_RADIUS..=BOARD_RADIUS).rev() {
            for q in -BOARD_RADIUS..=BOARD_RADIUS {
                let pos = Position::axial(q, r);
                if pos.is_valid() {
                    cells.push(pos);
                }
            }
        }
        cells
    })
}

// ============================================================================
// BOARD
// ============================================================================

/// Marble occupancy (clone to speculate)
///
/// `occupied` and `empty` always partition the 61 cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    occupied: FxHashMap<Position, Color>,
    empty: FxHashSet<Position>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Board with all 61 cells vacant
    pub fn new() -> Self {
        Self {
            occupied: FxHashMap::default(),
            empty: cells().iter().copied().collect(),
        }
    }

    /// Board holding exactly `marbles`
    pub fn with_marbles(marbles: &[(Position, Color)]) -> Result<Self, NotationError> {
        let mut board = Self::new();
        board.place_marbles(marbles)?;
        Ok(board)
    }

    /// Place marbles, overwriting whatever occupies their cells
    ///
    /// Validates every cell first; nothing is placed if one is off the board.
    pub fn place_marbles(&mut self, marbles: &[(Position, Color)]) -> Result<(), NotationError> {
        if let Some((pos, _)) = marbles.iter().find(|(pos, _)| !pos.is_valid()) {
            return Err(NotationError::OffBoard(pos.to_string()));
        }
        for &(pos, color) in marbles {
            self.put(pos, color);
        }
        Ok(())
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Color at a cell, `None` if vacant or off the board
    pub fn get(&self, pos: Position) -> Option<Color> {
        self.occupied.get(&pos).copied()
    }

    pub fn is_vacant(&self, pos: Position) -> bool {
        self.empty.contains(&pos)
    }

    /// Iterate marbles (unordered)
    pub fn marbles(&self) -> impl Iterator<Item = (Position, Color)> + '_ {
        self.occupied.iter().map(|(&pos, &color)| (pos, color))
    }

    /// Cells held by `color`, in canonical cell order
    pub fn marbles_of(&self, color: Color) -> Vec<Position> {
        cells()
            .iter()
            .copied()
            .filter(|pos| self.get(*pos) == Some(color))
            .collect()
    }

    pub fn vacant_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.empty.iter().copied()
    }

    pub fn count(&self, color: Color) -> usize {
        self.occupied.values().filter(|&&c| c == color).count()
    }

    /// Marbles of `color` pushed off so far
    pub fn removed(&self, color: Color) -> usize {
        MARBLES_PER_SIDE.saturating_sub(self.count(color))
    }

    /// Opponent marbles `color` has pushed off
    pub fn score(&self, color: Color) -> usize {
        self.removed(color.opponent())
    }

    /// Winner, if either side has lost six marbles
    pub fn is_terminal(&self) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|&color| self.removed(color.opponent()) >= LOSING_REMOVALS)
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    pub(crate) fn put(&mut self, pos: Position, color: Color) {
        debug_assert!(pos.is_valid(), "placing off-board marble at {pos:?}");
        self.occupied.insert(pos, color);
        self.empty.remove(&pos);
    }

    pub(crate) fn take(&mut self, pos: Position) -> Option<Color> {
        let color = self.occupied.remove(&pos)?;
        self.empty.insert(pos);
        Some(color)
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.occupied.len() + self.empty.len() == CELL_COUNT
            && self.occupied.keys().all(|pos| !self.empty.contains(pos))
            && cells()
                .iter()
                .all(|pos| self.occupied.contains_key(pos) || self.empty.contains(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_count() {
        assert_eq!(cells().len(), CELL_COUNT);
        assert!(cells().iter().all(|p| p.is_valid()));
        assert_eq!(Board::new().vacant_cells().count(), CELL_COUNT);
    }

    #[test]
    fn test_position_validity() {
        assert!(Position::ORIGIN.is_valid());
        assert!(Position::new(4, -4, 0).is_valid());
        assert!(!Position::new(5, -5, 0).is_valid());
        assert!(!Position::new(3, 3, -6).is_valid());
        assert!(!Position::new(1, 1, 1).is_valid());
    }

    #[test]
    fn test_row_column_mapping() {
        let a1 = Position::from_row_column('A', 1).unwrap();
        assert_eq!(a1, Position::new(-4, 4, 0));
        assert_eq!((a1.row(), a1.column()), ('A', 1));
        assert_eq!(Position::from_row_column('E', 5), Some(Position::ORIGIN));
        assert_eq!(Position::from_row_column('I', 9), Some(Position::new(4, -4, 0)));
        // Row A only spans columns 1-5
        assert_eq!(Position::from_row_column('A', 6), None);
        assert_eq!(Position::from_row_column('J', 1), None);
        for &pos in cells() {
            assert_eq!(Position::from_row_column(pos.row(), pos.column()), Some(pos));
        }
    }

    #[test]
    fn test_directions() {
        for d in DIRECTIONS {
            let (dq, dr, ds) = d.vector();
            assert_eq!(dq + dr + ds, 0);
            assert_eq!(d.opposite().opposite(), d);
            assert_eq!(Direction::from_symbol(d.symbol()), Some(d));
            assert_eq!(d.perpendiculars().count(), 4);
            assert_eq!(Position::ORIGIN.offset(d).distance_to_center(), 1);
        }
        // Same column, next row up is up-left on the printed board
        let c3 = Position::from_row_column('C', 3).unwrap();
        assert_eq!(c3.offset(Direction::NorthWest), Position::from_row_column('D', 3).unwrap());
        assert_eq!(c3.offset(Direction::NorthEast), Position::from_row_column('D', 4).unwrap());
    }

    #[test]
    fn test_distance() {
        assert_eq!(Position::ORIGIN.distance_to_center(), 0);
        assert_eq!(Position::new(2, 2, -4).distance_to_center(), 4);
        assert_eq!(Position::new(-4, 4, 0).distance_to(Position::new(4, -4, 0)), 8);
        assert!(Position::new(0, 4, -4).is_rim());
    }

    #[test]
    fn test_neighbor_edge() {
        let corner = Position::new(4, -4, 0);
        assert_eq!(corner.neighbor(Direction::East), None);
        assert_eq!(corner.neighbor(Direction::West), Some(Position::new(3, -4, 1)));
    }

    #[test]
    fn test_put_take_keeps_partition() {
        let mut board = Board::new();
        board.put(Position::ORIGIN, Color::Black);
        assert!(board.is_consistent());
        assert!(!board.is_vacant(Position::ORIGIN));
        assert_eq!(board.take(Position::ORIGIN), Some(Color::Black));
        assert_eq!(board.take(Position::ORIGIN), None);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_place_rejects_off_board() {
        let mut board = Board::new();
        let result = board.place_marbles(&[
            (Position::ORIGIN, Color::Black),
            (Position::new(5, 0, -5), Color::White),
        ]);
        assert!(result.is_err());
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_win_detection() {
        let board = Board::with_marbles(&[(Position::ORIGIN, Color::Black)]).unwrap();
        assert_eq!(board.is_terminal(), Some(Color::Black));

        let mut marbles: Vec<_> = cells()[..8].iter().map(|&p| (p, Color::White)).collect();
        marbles.extend(cells()[20..34].iter().map(|&p| (p, Color::Black)));
        let board = Board::with_marbles(&marbles).unwrap();
        assert_eq!(board.removed(Color::White), 6);
        assert_eq!(board.is_terminal(), Some(Color::Black));
    }
}
