//! Search command - pick one move for a position
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_agent(), search_position(), report_search()
//! - Level 3: base_config()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use sumito_core::{render_move, to_notation, Agent, AgentConfig, Board, Color, SearchOutcome};

use crate::load_position;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SearchArgs {
    /// Position file: side to move on line 1, board notation on line 2
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Agent configuration JSON file
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Named weight preset (balanced, aggressive, defensive)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Depth limit (with --time alone, depth is unbounded)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Time limit in seconds
    #[arg(long, value_name = "SECS")]
    pub time: Option<f64>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// What the search produced, ready to print
#[derive(Clone, Debug, serde::Serialize)]
struct SearchSummary {
    agent: String,
    to_move: String,
    best_move: Option<String>,
    board_after: Option<String>,
    score: Option<f32>,
    depth: u32,
    stop: String,
    nodes: u64,
    elapsed_ms: f64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run search command
pub fn run(args: SearchArgs) -> Result<()> {
    let (color, board) = load_position(&args.input)?;
    let agent = build_agent(&args)?;

    tracing::info!("{} searching for {} with {:?}", agent.name, color, agent.config());

    let summary = search_position(&agent, &board, color);
    report_search(&summary, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Config file or preset, then command-line overrides
fn build_agent(args: &SearchArgs) -> Result<Agent> {
    let mut config = base_config(args)?;

    if let Some(secs) = args.time {
        config.time_limit_secs = Some(secs);
        config.depth = args.depth;
    } else if args.depth.is_some() {
        config.depth = args.depth;
    }

    Agent::from_config(&config).context("Invalid search settings")
}

fn search_position(agent: &Agent, board: &Board, color: Color) -> SearchSummary {
    let outcome = agent.choose(board, color);
    summarize(&agent.name, board, color, &outcome)
}

fn report_search(summary: &SearchSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    match (&summary.best_move, &summary.board_after) {
        (Some(mv), Some(after)) => {
            println!("{mv}");
            println!("{after}");
        }
        _ => println!("no move"),
    }
    tracing::info!(
        "depth {} ({}), score {}, {} nodes in {:.1}ms",
        summary.depth,
        summary.stop,
        format_score(summary.score),
        summary.nodes,
        summary.elapsed_ms
    );
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn base_config(args: &SearchArgs) -> Result<AgentConfig> {
    match (&args.config, &args.preset) {
        (Some(path), _) => AgentConfig::load(path),
        (None, Some(name)) => Ok(AgentConfig::preset(name)?),
        (None, None) => Ok(AgentConfig::default()),
    }
}

fn summarize(agent: &str, board: &Board, color: Color, outcome: &SearchOutcome) -> SearchSummary {
    let best = outcome.best.as_ref();
    SearchSummary {
        agent: agent.to_string(),
        to_move: color.letter().to_string(),
        best_move: best.map(|r| render_move(&r.best_move)),
        board_after: best.map(|r| to_notation(&board.with_move(&r.best_move))),
        score: best.map(|r| r.score),
        depth: outcome.depth(),
        stop: format!("{:?}", outcome.stop),
        nodes: outcome.nodes,
        elapsed_ms: outcome.elapsed.as_secs_f64() * 1000.0,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_score(score: Option<f32>) -> String {
    match score {
        Some(s) => format!("{s:.2}"),
        None => "-".to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sumito_core::{from_notation, Layout};

    fn args(depth: Option<u32>, time: Option<f64>) -> SearchArgs {
        SearchArgs {
            input: PathBuf::from("unused.input"),
            config: None,
            preset: None,
            depth,
            time,
            json: false,
        }
    }

    #[test]
    fn test_overrides() {
        let agent = build_agent(&args(Some(2), None)).unwrap();
        assert_eq!(agent.config().max_depth, Some(2));
        assert_eq!(agent.config().time_limit, None);

        // Time alone lifts the depth limit
        let agent = build_agent(&args(None, Some(0.5))).unwrap();
        assert_eq!(agent.config().max_depth, None);
        assert!(agent.config().time_limit.is_some());
    }

    #[test]
    fn test_rejects_bad_settings() {
        assert!(build_agent(&args(Some(0), None)).is_err());
        assert!(build_agent(&args(None, Some(-1.0))).is_err());

        let mut bad_preset = args(None, None);
        bad_preset.preset = Some("reckless".to_string());
        assert!(build_agent(&bad_preset).is_err());
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.json");
        std::fs::write(&path, r#"{"name": "file-agent", "depth": 1}"#).unwrap();

        let mut from_file = args(None, None);
        from_file.config = Some(path);
        let agent = build_agent(&from_file).unwrap();
        assert_eq!(agent.name, "file-agent");
        assert_eq!(agent.config().max_depth, Some(1));
    }

    #[test]
    fn test_summary_for_winning_push() {
        let board =
            from_notation("E7b,E8b,I5b,I6b,I7b,I8b,I9b,H4b,H5b,E9w,A1w,A2w,A3w,A4w,A5w,B1w,B2w,B3w")
                .unwrap();
        let agent = build_agent(&args(Some(2), None)).unwrap();
        let summary = search_position(&agent, &board, Color::Black);
        assert_eq!(summary.best_move.as_deref(), Some("E7b-E8b→pE9w"));
        assert_eq!(summary.stop, "Converged");
        assert!(summary.score.unwrap() > 0.0);
    }

    #[test]
    fn test_summary_without_moves() {
        let board = Layout::Standard.board();
        let agent = build_agent(&args(Some(1), None)).unwrap();
        let empty = from_notation("I5w").unwrap();
        assert!(search_position(&agent, &board, Color::Black).best_move.is_some());

        let summary = search_position(&agent, &empty, Color::Black);
        assert_eq!(summary.best_move, None);
        assert_eq!(summary.stop, "NoMoves");
        assert_eq!(format_score(summary.score), "-");
    }
}
