//! Game session: turn order, history and results

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::agent::Agent;
use crate::board::{Board, Color};
use crate::error::MoveError;
use crate::layout::Layout;
use crate::moves::{validate, Move};
use crate::notation::{parse_move, render_move, to_notation};

/// Plies before a game is declared drawn
pub const DEFAULT_MAX_TURNS: u32 = 200;

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    BlackWins,
    WhiteWins,
    /// Turn limit reached with no winner
    Draw,
}

/// Game state (clone to branch)
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    to_move: Color,
    /// Plies played so far
    turn: u32,
    max_turns: u32,
    /// Move strings, oldest first
    history: Vec<String>,
}

impl GameState {
    /// Fresh game, Black to move
    pub fn new(layout: Layout) -> Self {
        Self::from_position(layout.board(), Color::Black)
    }

    pub fn from_position(board: Board, to_move: Color) -> Self {
        Self {
            board,
            to_move,
            turn: 0,
            max_turns: DEFAULT_MAX_TURNS,
            history: Vec::new(),
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Marbles of `color` pushed off so far
    pub fn removed(&self, color: Color) -> usize {
        self.board.removed(color)
    }

    pub fn result(&self) -> GameResult {
        match self.board.is_terminal() {
            Some(Color::Black) => GameResult::BlackWins,
            Some(Color::White) => GameResult::WhiteWins,
            None if self.turn >= self.max_turns => GameResult::Draw,
            None => GameResult::Ongoing,
        }
    }

    pub fn is_over(&self) -> bool {
        self.result() != GameResult::Ongoing
    }

    /// Legal moves for the side to move, empty once the game is over
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        self.board.legal_moves(self.to_move)
    }

    /// Validate and play a move; the state is unchanged on error
    ///
    /// Returns the move as the generator lists it.
    pub fn play(&mut self, mv: &Move) -> Result<Move, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        if mv.color != self.to_move {
            return Err(MoveError::WrongTurn {
                expected: self.to_move,
            });
        }
        let legal = validate(&self.board, mv)?;
        self.board.apply_unchecked(&legal);
        self.history.push(render_move(&legal));
        self.to_move = self.to_move.opponent();
        self.turn += 1;
        Ok(legal)
    }

    /// Parse a move string and play it
    pub fn play_notation(&mut self, text: &str) -> Result<Move, MoveError> {
        let mv = parse_move(text)?;
        self.play(&mv)
    }

    /// Side to move and board, in the input file format
    pub fn to_input(&self) -> String {
        format!("{}\n{}\n", self.to_move.letter(), to_notation(&self.board))
    }
}

/// Alternate two agents until the game ends
pub fn play_game(black: &Agent, white: &Agent, initial: GameState) -> GameState {
    let mut state = initial;

    while !state.is_over() {
        let color = state.to_move();
        let agent = match color {
            Color::Black => black,
            Color::White => white,
        };

        let outcome = agent.choose(state.board(), color);
        let mv = match outcome.best {
            Some(report) => report.best_move,
            None => match state.legal_moves().into_iter().next() {
                Some(mv) => {
                    warn!("{} finished no iteration in time, playing {}", agent.name, mv);
                    mv
                }
                None => {
                    warn!("{} has no legal move, stopping at turn {}", color, state.turn());
                    break;
                }
            },
        };

        match state.play(&mv) {
            Ok(played) => debug!("turn {}: {} plays {}", state.turn(), agent.name, played),
            Err(e) => {
                warn!("{} chose a rejected move: {}", agent.name, e);
                break;
            }
        }
    }

    state
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::SearchConfig;
    use crate::eval::weighted;
    use crate::notation::from_notation;
    use std::sync::Arc;

    #[test]
    fn test_new_game() {
        let game = GameState::new(Layout::Standard);
        assert_eq!(game.to_move(), Color::Black);
        assert_eq!(game.result(), GameResult::Ongoing);
        assert_eq!(game.legal_moves().len(), 44);
    }

    #[test]
    fn test_play_notation_records_history() {
        let mut game = GameState::new(Layout::Standard);
        let played = game.play_notation("C3b↗D4b").unwrap();
        assert_eq!(played.color, Color::Black);
        assert_eq!(game.history(), &["C3b↗D4b".to_string()]);
        assert_eq!(game.to_move(), Color::White);
        assert_eq!(game.turn(), 1);
    }

    #[test]
    fn test_rejects_out_of_turn_and_illegal() {
        let mut game = GameState::new(Layout::Standard);
        assert_eq!(
            game.play_notation("C3b↗D4b").and(game.play_notation("C4b↗D5b")),
            Err(MoveError::WrongTurn { expected: Color::White })
        );
        // A white marble stepping onto another white marble
        assert!(matches!(game.play_notation("G6w←G5w"), Err(MoveError::Illegal(_))));
        assert!(matches!(game.play_notation("G5w←"), Err(MoveError::Notation(_))));
        assert_eq!(game.turn(), 1);
    }

    #[test]
    fn test_finished_game_rejects_moves() {
        // White is down to eight marbles
        let board = from_notation("I5b,I6b,I7b,I8b,I9b,H4b,H5b,H6b,H7b,A1w,A2w,A3w,A4w,A5w,B1w,B2w,B3w")
            .unwrap();
        let mut game = GameState::from_position(board, Color::White);
        assert_eq!(game.removed(Color::White), 6);
        assert_eq!(game.result(), GameResult::BlackWins);
        assert!(game.legal_moves().is_empty());
        assert_eq!(game.play_notation("B3w→B4w"), Err(MoveError::GameOver));
    }

    #[test]
    fn test_turn_limit_draws() {
        let mut game = GameState::new(Layout::Standard).with_max_turns(2);
        game.play_notation("C3b↗D4b").unwrap();
        game.play_notation("G7w↙F6w").unwrap();
        assert_eq!(game.result(), GameResult::Draw);
    }

    #[test]
    fn test_to_input_round_trips() {
        let game = GameState::new(Layout::Belgian);
        let (color, board) = crate::notation::parse_input(&game.to_input()).unwrap();
        assert_eq!(color, Color::Black);
        assert_eq!(&board, game.board());
    }

    #[test]
    fn test_play_game_alternates() {
        let agent = Agent::new("shallow", SearchConfig::with_depth(1), Arc::new(weighted)).unwrap();
        let start = GameState::new(Layout::Standard).with_max_turns(6);
        let end = play_game(&agent, &agent, start);
        assert_eq!(end.turn(), 6);
        assert_eq!(end.history().len(), 6);
        assert_eq!(end.result(), GameResult::Draw);
        assert_eq!(end.to_move(), Color::Black);
    }
}
