//! Play command - self-play game between two agents
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_agents(), play_single_game(), report_game()
//! - Level 3: load_agent(), record_game()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use sumito_core::{
    play_game, to_notation, Agent, AgentConfig, Color, GameResult, GameState, Layout,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Starting layout (standard, belgian, german)
    #[arg(long, default_value = "standard")]
    pub layout: Layout,

    /// Black agent configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub black: Option<PathBuf>,

    /// White agent configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub white: Option<PathBuf>,

    /// Depth limit applied to both agents
    #[arg(long)]
    pub depth: Option<u32>,

    /// Plies before the game is drawn
    #[arg(long, default_value = "200")]
    pub max_turns: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Finished game
#[derive(Clone, Debug, serde::Serialize)]
struct GameRecord {
    layout: String,
    black: String,
    white: String,
    result: GameResult,
    turns: u32,
    black_removed: usize,
    white_removed: usize,
    moves: Vec<String>,
    final_board: String,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Load both agents
/// 2. Play one game
/// 3. Report the record
pub fn run(args: PlayArgs) -> Result<()> {
    let (black, white) = load_agents(&args)?;

    tracing::info!(
        "Starting game: {} (black) vs {} (white) on {}, max {} turns",
        black.name,
        white.name,
        args.layout,
        args.max_turns
    );

    let record = play_single_game(&black, &white, &args);

    tracing::info!("{:?} after {} turns", record.result, record.turns);
    report_game(&record, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_agents(args: &PlayArgs) -> Result<(Agent, Agent)> {
    let black = load_agent(args.black.as_ref(), args.depth)
        .context("Failed to set up the black agent")?;
    let white = load_agent(args.white.as_ref(), args.depth)
        .context("Failed to set up the white agent")?;
    Ok((black, white))
}

fn play_single_game(black: &Agent, white: &Agent, args: &PlayArgs) -> GameRecord {
    let start = GameState::new(args.layout).with_max_turns(args.max_turns);
    let end = play_game(black, white, start);
    record_game(args.layout, black, white, &end)
}

fn report_game(record: &GameRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    println!("\n=== {} vs {} ({}) ===", record.black, record.white, record.layout);
    for (i, mv) in record.moves.iter().enumerate() {
        println!("{:>4}. {}", i + 1, mv);
    }
    println!("\nResult:  {}", format_result(record.result));
    println!("Turns:   {}", record.turns);
    println!(
        "Removed: black {}, white {}",
        record.black_removed, record.white_removed
    );
    println!("Board:   {}", record.final_board);
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Agent from a config file, or the default agent
fn load_agent(path: Option<&PathBuf>, depth: Option<u32>) -> Result<Agent> {
    let mut config = match path {
        Some(path) => AgentConfig::load(path)?,
        None => AgentConfig::default(),
    };
    if depth.is_some() {
        config.depth = depth;
    }
    Ok(Agent::from_config(&config)?)
}

fn record_game(layout: Layout, black: &Agent, white: &Agent, end: &GameState) -> GameRecord {
    GameRecord {
        layout: layout.to_string(),
        black: black.name.clone(),
        white: white.name.clone(),
        result: end.result(),
        turns: end.turn(),
        black_removed: end.removed(Color::Black),
        white_removed: end.removed(Color::White),
        moves: end.history().to_vec(),
        final_board: to_notation(end.board()),
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_result(result: GameResult) -> &'static str {
    match result {
        GameResult::Ongoing => "unfinished",
        GameResult::BlackWins => "black wins",
        GameResult::WhiteWins => "white wins",
        GameResult::Draw => "draw (turn limit)",
    }
}

// ============================================================================
// TESTS
// ============================================================================
