//! Text notation for marbles, boards and moves
//!
//! - Marble: `<Row><Column><color>`, e.g. `C5b`
//! - Board: comma-separated marbles, canonically sorted by color, row, column
//! - Move: `<marble>-<marble>...<symbol>[i|s|p]<destination or pushed marbles>`

use std::fmt;
use std::str::FromStr;

use crate::board::{Board, Color, Direction, Position};
use crate::error::NotationError;
use crate::moves::{Displaced, Move, MoveKind, Shift, MAX_GROUP};

// ============================================================================
// MARBLES
// ============================================================================

pub fn marble_token(pos: Position, color: Color) -> String {
    format!("{}{}{}", pos.row(), pos.column(), color.letter())
}

/// Parse a single `<Row><Column><color>` token
pub fn parse_marble(token: &str) -> Result<(Position, Color), NotationError> {
    let token = token.trim();
    let chars: Vec<char> = token.chars().collect();
    let &[row, column, letter] = chars.as_slice() else {
        return Err(NotationError::BadToken(token.to_string()));
    };
    if !('A'..='I').contains(&row) {
        return Err(NotationError::BadToken(token.to_string()));
    }
    let column = match column.to_digit(10) {
        Some(c @ 1..=9) => c as u8,
        _ => return Err(NotationError::BadToken(token.to_string())),
    };
    let color =
        Color::from_letter(letter).ok_or_else(|| NotationError::BadColor(letter.to_string()))?;
    let pos = Position::from_row_column(row, column)
        .ok_or_else(|| NotationError::OffBoard(token.to_string()))?;
    Ok((pos, color))
}

fn parse_marble_list(text: &str) -> Result<Vec<(Position, Color)>, NotationError> {
    text.split('-').map(parse_marble).collect()
}

fn join_marbles(marbles: impl Iterator<Item = (Position, Color)>) -> String {
    marbles
        .map(|(pos, color)| marble_token(pos, color))
        .collect::<Vec<_>>()
        .join("-")
}

// ============================================================================
// BOARDS
// ============================================================================

/// Canonical board notation
pub fn to_notation(board: &Board) -> String {
    let mut marbles: Vec<(Position, Color)> = board.marbles().collect();
    marbles.sort_by_key(|&(pos, color)| (color.letter(), pos.row(), pos.column()));
    marbles
        .into_iter()
        .map(|(pos, color)| marble_token(pos, color))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse board notation; token order is free, repeated cells are rejected
pub fn from_notation(text: &str) -> Result<Board, NotationError> {
    let mut board = Board::new();
    let text = text.trim();
    if text.is_empty() {
        return Ok(board);
    }
    for token in text.split(',') {
        let (pos, color) = parse_marble(token)?;
        if board.get(pos).is_some() {
            return Err(NotationError::DuplicateCell(pos.to_string()));
        }
        board.put(pos, color);
    }
    Ok(board)
}

/// Parse an input position: side to move on the first line, board on the second
pub fn parse_input(text: &str) -> Result<(Color, Board), NotationError> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let turn = lines.next().ok_or(NotationError::MissingLine("turn"))?;
    let mut letters = turn.chars();
    let color = match (letters.next(), letters.next()) {
        (Some(letter), None) => Color::from_letter(letter),
        _ => None,
    }
    .ok_or_else(|| NotationError::BadColor(turn.to_string()))?;
    let board = from_notation(lines.next().ok_or(NotationError::MissingLine("board"))?)?;
    Ok((color, board))
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_notation(self))
    }
}

impl FromStr for Board {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_notation(s)
    }
}

// ============================================================================
// MOVES
// ============================================================================

pub fn render_move(mv: &Move) -> String {
    let mut out = join_marbles(mv.origins().map(|p| (p, mv.color)));
    out.push(mv.direction.symbol());
    match &mv.kind {
        MoveKind::Single => {
            if let Some(shift) = mv.marbles.first() {
                out.push_str(&marble_token(shift.to, mv.color));
            }
        }
        MoveKind::Inline => {
            out.push('i');
            if let Some(shift) = mv.marbles.last() {
                out.push_str(&marble_token(shift.to, mv.color));
            }
        }
        MoveKind::SideStep => {
            out.push('s');
            out.push_str(&join_marbles(mv.marbles.iter().map(|s| (s.to, mv.color))));
        }
        MoveKind::Push { pushed } => {
            out.push('p');
            let opponent = mv.color.opponent();
            out.push_str(&join_marbles(pushed.iter().map(|d| (d.from, opponent))));
        }
    }
    out
}

/// Parse a move string without consulting a board
///
/// Geometry is checked (contiguity, destinations one step along the
/// direction) but not legality.
pub fn parse_move(input: &str) -> Result<Move, NotationError> {
    let text = input.trim();
    let (split, direction) = text
        .char_indices()
        .find_map(|(i, c)| Direction::from_symbol(c).map(|d| (i, d)))
        .ok_or_else(|| NotationError::MissingDirection(text.to_string()))?;

    let head = parse_marble_list(&text[..split])?;
    let tail = &text[split + direction.symbol().len_utf8()..];
    let (suffix, rest) = match tail.chars().next() {
        Some(c @ ('i' | 's' | 'p')) => (Some(c), &tail[1..]),
        _ => (None, tail),
    };
    let targets = parse_marble_list(rest)?;

    let color = head[0].1;
    if head.iter().any(|&(_, c)| c != color) {
        return Err(NotationError::bad_move(text, "moving marbles differ in color"));
    }
    if head.len() > MAX_GROUP {
        return Err(NotationError::bad_move(text, "more than three moving marbles"));
    }
    let origins: Vec<Position> = head.iter().map(|&(p, _)| p).collect();
    let marbles = shifts(text, &origins, direction)?;

    let kind = match suffix {
        None => {
            if origins.len() != 1 {
                return Err(NotationError::bad_move(text, "group move without a suffix"));
            }
            expect_destinations(text, &marbles, &targets, color)?;
            MoveKind::Single
        }
        Some(suffix) => {
            if origins.len() < 2 {
                return Err(NotationError::bad_move(text, "group move with one marble"));
            }
            match suffix {
                'i' => {
                    expect_line(text, &origins, direction)?;
                    expect_destinations(text, &marbles[marbles.len() - 1..], &targets, color)?;
                    MoveKind::Inline
                }
                's' => {
                    let axis = origins[0]
                        .direction_to(origins[1])
                        .ok_or_else(|| NotationError::bad_move(text, "marbles are not adjacent"))?;
                    expect_line(text, &origins, axis)?;
                    if direction.is_parallel(axis) {
                        return Err(NotationError::bad_move(text, "side-step along the group axis"));
                    }
                    expect_destinations(text, &marbles, &targets, color)?;
                    MoveKind::SideStep
                }
                _ => {
                    expect_line(text, &origins, direction)?;
                    MoveKind::Push {
                        pushed: pushed_chain(text, &origins, &targets, color, direction)?,
                    }
                }
            }
        }
    };

    Ok(Move {
        color,
        direction,
        marbles,
        kind,
    })
}

fn shifts(text: &str, origins: &[Position], direction: Direction) -> Result<Vec<Shift>, NotationError> {
    origins
        .iter()
        .map(|&from| {
            from.neighbor(direction)
                .map(|to| Shift { from, to })
                .ok_or_else(|| NotationError::bad_move(text, "a moving marble would leave the board"))
        })
        .collect()
}

fn expect_line(text: &str, origins: &[Position], direction: Direction) -> Result<(), NotationError> {
    if origins.windows(2).all(|w| w[0].offset(direction) == w[1]) {
        Ok(())
    } else {
        Err(NotationError::bad_move(text, "marbles do not form a line"))
    }
}

fn expect_destinations(
    text: &str,
    marbles: &[Shift],
    targets: &[(Position, Color)],
    color: Color,
) -> Result<(), NotationError> {
    let matches = marbles.len() == targets.len()
        && marbles
            .iter()
            .zip(targets)
            .all(|(shift, &(to, c))| shift.to == to && c == color);
    if matches {
        Ok(())
    } else {
        Err(NotationError::bad_move(text, "destinations do not follow the direction"))
    }
}

fn pushed_chain(
    text: &str,
    origins: &[Position],
    targets: &[(Position, Color)],
    color: Color,
    direction: Direction,
) -> Result<Vec<Displaced>, NotationError> {
    if targets.is_empty() || targets.len() >= origins.len() {
        return Err(NotationError::bad_move(text, "pushing force must exceed the pushed line"));
    }
    let mut expected = origins[origins.len() - 1].offset(direction);
    let mut pushed = Vec::with_capacity(targets.len());
    for &(from, c) in targets {
        if c != color.opponent() {
            return Err(NotationError::bad_move(text, "pushed marbles must be the opponent's"));
        }
        if from != expected {
            return Err(NotationError::bad_move(text, "pushed marbles are not ahead of the line"));
        }
        pushed.push(Displaced {
            from,
            to: from.neighbor(direction),
        });
        expected = from.offset(direction);
    }
    Ok(pushed)
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_move(self))
    }
}

impl FromStr for Move {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_move(s)
    }
}
