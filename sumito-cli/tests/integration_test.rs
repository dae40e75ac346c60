//! Integration tests for the sumito binary
//!
//! Runs each subcommand against position files in a temp directory

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// ============================================================================
// TEST FIXTURES
// ============================================================================

const STANDARD_INPUT: &str = "b\nA1b,A2b,A3b,A4b,A5b,B1b,B2b,B3b,B4b,B5b,B6b,C3b,C4b,C5b,\
G5w,G6w,G7w,H4w,H5w,H6w,H7w,H8w,H9w,I5w,I6w,I7w,I8w,I9w\n";

const WINNING_INPUT: &str =
    "b\nE7b,E8b,I5b,I6b,I7b,I8b,I9b,H4b,H5b,E9w,A1w,A2w,A3w,A4w,A5w,B1w,B2w,B3w\n";

fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn sumito(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sumito"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

// ============================================================================
// MOVES
// ============================================================================

#[test]
fn test_moves_lists_state_space() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "Test1.input", STANDARD_INPUT);
    let prefix = dir.path().join("Test1");

    let out = stdout(&sumito(&[
        "moves",
        input.to_str().unwrap(),
        "--output",
        prefix.to_str().unwrap(),
    ]));

    let (moves, boards) = out.split_once("\n\n").unwrap();
    assert_eq!(moves.lines().count(), 44);
    assert_eq!(boards.lines().count(), 44);
    assert!(moves.lines().any(|m| m == "C3b↗D4b"));

    let move_file = std::fs::read_to_string(dir.path().join("Test1.move")).unwrap();
    assert_eq!(move_file.trim_end(), moves);
}

#[test]
fn test_moves_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "bad.input", "b\nZ9b\n");
    let output = sumito(&["moves", input.to_str().unwrap()]);
    assert!(!output.status.success());

    let missing = dir.path().join("missing.input");
    assert!(!sumito(&["moves", missing.to_str().unwrap()]).status.success());
}

// ============================================================================
// SEARCH
// ============================================================================

#[test]
fn test_search_finds_winning_push() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "win.input", WINNING_INPUT);

    let out = stdout(&sumito(&["search", input.to_str().unwrap(), "--depth", "2"]));
    assert_eq!(out.lines().next(), Some("E7b-E8b→pE9w"));
}

#[test]
fn test_search_json_with_time_limit() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "start.input", STANDARD_INPUT);

    let out = stdout(&sumito(&[
        "search",
        input.to_str().unwrap(),
        "--preset",
        "defensive",
        "--time",
        "0.5",
        "--json",
    ]));
    let summary: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(summary["agent"], "defensive");
    assert_eq!(summary["to_move"], "b");
    assert!(summary["best_move"].is_string());
}

#[test]
fn test_search_rejects_zero_depth() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "start.input", STANDARD_INPUT);
    let output = sumito(&["search", input.to_str().unwrap(), "--depth", "0"]);
    assert!(!output.status.success());
}

// ============================================================================
// PLAY
// ============================================================================

#[test]
fn test_play_json_record() {
    let out = stdout(&sumito(&[
        "play",
        "--layout",
        "belgian",
        "--depth",
        "1",
        "--max-turns",
        "6",
        "--json",
    ]));
    let record: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(record["layout"], "belgian");
    assert_eq!(record["result"], "Draw");
    assert_eq!(record["turns"], 6);
    assert_eq!(record["moves"].as_array().unwrap().len(), 6);
}

#[test]
fn test_play_rejects_unknown_layout() {
    assert!(!sumito(&["play", "--layout", "swiss"]).status.success());
}
