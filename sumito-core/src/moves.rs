//! Move representation, generation and application
//!
//! Move taxonomy:
//! - Single: one marble steps into a vacant neighbor
//! - Inline: a line of 2-3 marbles advances along its own axis
//! - Push (sumito): an inline advance that shoves a shorter opposing line
//! - SideStep: a line of 2-3 marbles translates across its axis

use rustc_hash::FxHashSet;

use crate::board::{Board, Color, Direction, Position, DIRECTIONS};
use crate::error::MoveError;
use crate::notation::render_move;

/// Largest line that may move together
pub const MAX_GROUP: usize = 3;

// ============================================================================
// TYPES
// ============================================================================

/// One moving marble
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shift {
    pub from: Position,
    pub to: Position,
}

/// One opponent marble moved by a push; `to` is `None` when it leaves the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Displaced {
    pub from: Position,
    pub to: Option<Position>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Single,
    Inline,
    SideStep,
    /// Displaced marbles, nearest to the pushing line first
    Push { pushed: Vec<Displaced> },
}

/// A move for one color
///
/// Inline and push moves list `marbles` from the trailing marble to the
/// leading one; side-steps list them along the group's axis.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub color: Color,
    pub direction: Direction,
    pub marbles: Vec<Shift>,
    pub kind: MoveKind,
}

impl Move {
    fn translate(color: Color, direction: Direction, line: &[Position], kind: MoveKind) -> Self {
        Self {
            color,
            direction,
            marbles: line
                .iter()
                .map(|&from| Shift {
                    from,
                    to: from.offset(direction),
                })
                .collect(),
            kind,
        }
    }

    pub fn is_push(&self) -> bool {
        matches!(self.kind, MoveKind::Push { .. })
    }

    /// Opponent marbles this move displaces
    pub fn pushed(&self) -> &[Displaced] {
        match &self.kind {
            MoveKind::Push { pushed } => pushed,
            _ => &[],
        }
    }

    /// Opponent marbles this move pushes off the board
    pub fn ejected(&self) -> usize {
        self.pushed().iter().filter(|d| d.to.is_none()).count()
    }

    pub fn origins(&self) -> impl Iterator<Item = Position> + '_ {
        self.marbles.iter().map(|s| s.from)
    }

    /// Same displaced opponent cells, nearest first
    fn same_pushed(&self, other: &Move) -> bool {
        self.pushed()
            .iter()
            .map(|d| d.from)
            .eq(other.pushed().iter().map(|d| d.from))
    }

    /// Same color, direction, kind and set of moving marbles
    fn same_action(&self, other: &Move) -> bool {
        if self.color != other.color
            || self.direction != other.direction
            || std::mem::discriminant(&self.kind) != std::mem::discriminant(&other.kind)
            || self.marbles.len() != other.marbles.len()
        {
            return false;
        }
        let mut mine: Vec<Position> = self.origins().collect();
        let mut theirs: Vec<Position> = other.origins().collect();
        mine.sort_unstable();
        theirs.sort_unstable();
        mine == theirs
    }
}

/// A line of 2 or 3 friendly marbles, `marbles[i + 1] == marbles[i] + axis`
///
/// `axis` is always one of East, NorthEast, NorthWest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub axis: Direction,
    pub marbles: Vec<Position>,
}

impl Group {
    /// Normalize a line walked in `direction`
    fn from_walk(direction: Direction, line: &[Position]) -> Self {
        let mut marbles = line.to_vec();
        if direction != direction.axis() {
            marbles.reverse();
        }
        Self {
            axis: direction.axis(),
            marbles,
        }
    }

    /// Marbles ordered from trailing to leading when moving in `direction`
    fn towards(&self, direction: Direction) -> Vec<Position> {
        let mut line = self.marbles.clone();
        if direction != self.axis {
            line.reverse();
        }
        line
    }
}

// ============================================================================
// GENERATION
// ============================================================================

/// All legal moves for `color`: singles, then inline advances and pushes,
/// then side-steps
pub fn generate_moves(color: Color, board: &Board) -> Vec<Move> {
    let groups = movable_groups(board, color);
    let mut moves = single_moves(board, color);
    for group in &groups {
        for direction in [group.axis, group.axis.opposite()] {
            if let Some(mv) = inline_move(board, color, group, direction) {
                moves.push(mv);
            }
        }
    }
    for group in &groups {
        side_step_moves(board, color, group, &mut moves);
    }
    moves
}

/// One marble into a vacant neighbor
pub fn single_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    for from in board.marbles_of(color) {
        for direction in DIRECTIONS {
            if let Some(to) = from.neighbor(direction) {
                if board.is_vacant(to) {
                    moves.push(Move {
                        color,
                        direction,
                        marbles: vec![Shift { from, to }],
                        kind: MoveKind::Single,
                    });
                }
            }
        }
    }
    moves
}

/// Every distinct line of 2 or 3 contiguous marbles of `color`
///
/// A line of three also yields both of its two-marble sub-lines.
pub fn movable_groups(board: &Board, color: Color) -> Vec<Group> {
    let mut seen: FxHashSet<(Direction, Position, usize)> = FxHashSet::default();
    let mut groups = Vec::new();

    for start in board.marbles_of(color) {
        for direction in DIRECTIONS {
            let mut line = vec![start];
            let mut cursor = start;
            while line.len() < MAX_GROUP {
                cursor = cursor.offset(direction);
                if board.get(cursor) != Some(color) {
                    break;
                }
                line.push(cursor);
            }

            for len in 2..=line.len() {
                let group = Group::from_walk(direction, &line[..len]);
                if seen.insert((group.axis, group.marbles[0], len)) {
                    groups.push(group);
                }
            }
        }
    }

    groups
}

/// Advance `group` along its axis in `direction`, pushing if the force allows
fn inline_move(board: &Board, color: Color, group: &Group, direction: Direction) -> Option<Move> {
    let line = group.towards(direction);
    let leading = *line.last()?;
    // Own marbles never walk off the edge
    let front = leading.neighbor(direction)?;

    match board.get(front) {
        None => Some(Move::translate(color, direction, &line, MoveKind::Inline)),
        Some(c) if c == color => None,
        Some(_) => {
            let opponent = color.opponent();
            let mut run = vec![front];
            let mut cursor = front.offset(direction);
            while board.get(cursor) == Some(opponent) {
                run.push(cursor);
                if run.len() >= line.len() {
                    return None;
                }
                cursor = cursor.offset(direction);
            }
            // The chain must end at the edge or a vacant cell
            if cursor.is_valid() && !board.is_vacant(cursor) {
                return None;
            }

            let pushed = run
                .into_iter()
                .map(|from| Displaced {
                    from,
                    to: from.neighbor(direction),
                })
                .collect();
            Some(Move::translate(color, direction, &line, MoveKind::Push { pushed }))
        }
    }
}

/// Translate `group` across its axis in each of the four perpendiculars
fn side_step_moves(board: &Board, color: Color, group: &Group, moves: &mut Vec<Move>) {
    for direction in group.axis.perpendiculars() {
        let clear = group
            .marbles
            .iter()
            .all(|p| p.neighbor(direction).is_some_and(|to| board.is_vacant(to)));
        if clear {
            moves.push(Move::translate(color, direction, &group.marbles, MoveKind::SideStep));
        }
    }
}

// ============================================================================
// VALIDATION AND APPLICATION
// ============================================================================

/// Check an externally supplied move against `board`
///
/// Returns the generator's equivalent move (canonical marble order) so callers
/// can record it.
pub fn validate(board: &Board, mv: &Move) -> Result<Move, MoveError> {
    if mv.marbles.is_empty() {
        return Err(MoveError::Empty);
    }
    if mv.marbles.len() > MAX_GROUP {
        return Err(MoveError::TooManyMarbles(mv.marbles.len()));
    }

    for shift in &mv.marbles {
        if board.get(shift.from) != Some(mv.color) {
            return Err(MoveError::NotOwned {
                cell: shift.from.to_string(),
                color: mv.color,
            });
        }
        if shift.from.neighbor(mv.direction) != Some(shift.to) {
            return Err(MoveError::Misaligned {
                cell: shift.from.to_string(),
            });
        }
    }

    let opponent = mv.color.opponent();
    for displaced in mv.pushed() {
        if board.get(displaced.from) != Some(opponent) {
            return Err(MoveError::NotOwned {
                cell: displaced.from.to_string(),
                color: opponent,
            });
        }
        if displaced.from.neighbor(mv.direction) != displaced.to {
            return Err(MoveError::Misaligned {
                cell: displaced.from.to_string(),
            });
        }
    }

    generate_moves(mv.color, board)
        .into_iter()
        .find(|legal| legal.same_action(mv) && legal.same_pushed(mv))
        .ok_or_else(|| MoveError::Illegal(render_move(mv)))
}

/// Validate `mv` and return the board it produces
pub fn apply(board: &Board, mv: &Move) -> Result<Board, MoveError> {
    let mut next = board.clone();
    next.apply(mv)?;
    Ok(next)
}

impl Board {
    /// Legal moves for `color`
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        generate_moves(color, self)
    }

    /// Validate then apply; the board is untouched on error
    pub fn apply(&mut self, mv: &Move) -> Result<(), MoveError> {
        let legal = validate(self, mv)?;
        self.apply_unchecked(&legal);
        Ok(())
    }

    /// Copy of this board with a generated move applied
    pub fn with_move(&self, mv: &Move) -> Board {
        let mut next = self.clone();
        next.apply_unchecked(mv);
        next
    }

    /// Apply a move known to come from the generator
    pub(crate) fn apply_unchecked(&mut self, mv: &Move) {
        let pushed = mv.pushed();
        for displaced in pushed.iter().rev() {
            self.take(displaced.from);
        }
        for displaced in pushed {
            if let Some(to) = displaced.to {
                self.put(to, mv.color.opponent());
            }
        }

        for shift in &mv.marbles {
            self.take(shift.from);
        }
        for shift in &mv.marbles {
            self.put(shift.to, mv.color);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
