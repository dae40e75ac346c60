//! Moves command - dump the state space of one position
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: state_space(), write_outputs(), report_state_space()
//! - Level 3: successor()
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use sumito_core::{generate_moves, render_move, to_notation, Board, Color, Move};

use crate::load_position;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MovesArgs {
    /// Position file: side to move on line 1, board notation on line 2
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Also write <PREFIX>.move and <PREFIX>.board files
    #[arg(long, value_name = "PREFIX")]
    pub output: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Every legal move and the board it leads to, in generator order
#[derive(Clone, Debug, Default, serde::Serialize)]
struct StateSpace {
    to_move: String,
    moves: Vec<String>,
    boards: Vec<String>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run moves command
pub fn run(args: MovesArgs) -> Result<()> {
    let (color, board) = load_position(&args.input)?;

    let space = state_space(color, &board);
    tracing::info!("{} legal moves for {}", space.moves.len(), color);

    if let Some(prefix) = &args.output {
        write_outputs(&space, prefix)?;
    }

    report_state_space(&space, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn state_space(color: Color, board: &Board) -> StateSpace {
    let (moves, boards) = generate_moves(color, board)
        .iter()
        .map(|mv| successor(board, mv))
        .unzip();

    StateSpace {
        to_move: color.letter().to_string(),
        moves,
        boards,
    }
}

/// Write the `.move` / `.board` pair next to `prefix`
fn write_outputs(space: &StateSpace, prefix: &Path) -> Result<()> {
    let move_path = prefix.with_extension("move");
    let board_path = prefix.with_extension("board");

    std::fs::write(&move_path, lines(&space.moves))
        .with_context(|| format!("Failed to write moves: {}", move_path.display()))?;
    std::fs::write(&board_path, lines(&space.boards))
        .with_context(|| format!("Failed to write boards: {}", board_path.display()))?;

    tracing::info!("Wrote {} and {}", move_path.display(), board_path.display());
    Ok(())
}

fn report_state_space(space: &StateSpace, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(space)?);
    } else {
        print!("{}", lines(&space.moves));
        println!();
        print!("{}", lines(&space.boards));
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Move string and resulting board notation
fn successor(board: &Board, mv: &Move) -> (String, String) {
    (render_move(mv), to_notation(&board.with_move(mv)))
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// One entry per line, newline-terminated
fn lines(entries: &[String]) -> String {
    entries.iter().map(|e| format!("{e}\n")).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sumito_core::{from_notation, Layout};

    #[test]
    fn test_state_space_pairs_moves_with_boards() {
        let space = state_space(Color::Black, &Layout::Standard.board());
        assert_eq!(space.to_move, "b");
        assert_eq!(space.moves.len(), 44);
        assert_eq!(space.boards.len(), 44);
    }

    #[test]
    fn test_successor_board() {
        let board = from_notation("C3b,I5w").unwrap();
        let space = state_space(Color::Black, &board);
        let i = space.moves.iter().position(|m| m == "C3b↗D4b").unwrap();
        assert_eq!(space.boards[i], "D4b,I5w");
    }

    #[test]
    fn test_write_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("Test1");
        let space = state_space(Color::White, &Layout::Belgian.board());
        write_outputs(&space, &prefix).unwrap();

        let moves = std::fs::read_to_string(dir.path().join("Test1.move")).unwrap();
        let boards = std::fs::read_to_string(dir.path().join("Test1.board")).unwrap();
        assert_eq!(moves.lines().count(), space.moves.len());
        assert_eq!(boards.lines().next(), space.boards.first().map(String::as_str));
    }

    #[test]
    fn test_lines() {
        assert_eq!(lines(&[]), "");
        assert_eq!(lines(&["a".to_string(), "b".to_string()]), "a\nb\n");
    }
}
