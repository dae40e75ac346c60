//! Sumito CLI - Command-line interface
//!
//! Commands:
//! - moves: List every legal move and resulting board for a position
//! - search: Pick one move for a position
//! - play: Self-play game between two agent configurations

mod moves_cmd;
mod play_cmd;
mod search_cmd;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sumito_core::{parse_input, Board, Color};

#[derive(Parser)]
#[command(name = "sumito")]
#[command(about = "Hex marble-pushing game engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List legal moves and resulting boards
    Moves(moves_cmd::MovesArgs),
    /// Search for the best move
    Search(search_cmd::SearchArgs),
    /// Play a game between two agents
    Play(play_cmd::PlayArgs),
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves(args) => moves_cmd::run(args),
        Commands::Search(args) => search_cmd::run(args),
        Commands::Play(args) => play_cmd::run(args),
    }
}

/// Read a position file: side to move, then board notation
pub(crate) fn load_position(path: &Path) -> Result<(Color, Board)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read position: {}", path.display()))?;
    parse_input(&text).with_context(|| format!("Failed to parse position: {}", path.display()))
}
