//! Time-boxed search on a worker thread
//!
//! The worker owns a fresh engine and reports every completed depth over a
//! channel. The caller never waits past the deadline: once it passes, the
//! stop flag is raised, the thread is abandoned, and the deepest report
//! received so far is returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::{debug, warn};

use crate::ai::{AlphaBetaAI, SearchConfig, SearchOutcome, SearchReport, SearchStop};
use crate::board::{Board, Color};
use crate::eval::Heuristic;

/// Sent from the worker to the caller
#[derive(Debug)]
pub enum WorkerMessage {
    /// One iteration completed
    Depth(SearchReport),
    /// The search returned on its own
    Finished(SearchOutcome),
}

/// Search under a hard wall-clock limit
///
/// Without a time limit the search runs inline on the calling thread.
pub fn search_in_worker(
    board: &Board,
    color: Color,
    config: SearchConfig,
    heuristic: Arc<dyn Heuristic>,
) -> SearchOutcome {
    let start = Instant::now();
    let Some(limit) = config.time_limit else {
        return AlphaBetaAI::new(config, heuristic).search(board, color);
    };
    let deadline = start + limit;

    let stop = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();

    let worker = {
        let board = board.clone();
        let stop = Arc::clone(&stop);
        let config = config.clone();
        let heuristic = Arc::clone(&heuristic);
        move || {
            let mut ai = AlphaBetaAI::new(config, heuristic);
            let outcome = ai.search_with(&board, color, &stop, |report| {
                let _ = tx.send(WorkerMessage::Depth(report.clone()));
            });
            let _ = tx.send(WorkerMessage::Finished(outcome));
        }
    };

    if let Err(e) = thread::Builder::new()
        .name(format!("sumito-search-{color}"))
        .spawn(worker)
    {
        warn!("Failed to spawn search worker ({}), searching inline", e);
        return AlphaBetaAI::new(config, heuristic).search(board, color);
    }

    let mut last: Option<SearchReport> = None;
    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        match rx.recv_timeout(deadline - now) {
            Ok(WorkerMessage::Depth(report)) => {
                debug!("worker completed depth {}", report.depth);
                last = Some(report);
            }
            Ok(WorkerMessage::Finished(outcome)) => return outcome,
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Search worker exited without a result");
                break;
            }
        }
    }

    stop.store(true, Ordering::Relaxed);
    // Reports already queued are complete iterations
    while let Ok(message) = rx.try_recv() {
        match message {
            WorkerMessage::Depth(report) => last = Some(report),
            WorkerMessage::Finished(outcome) => return outcome,
        }
    }

    warn!(
        "Search worker abandoned at deadline after depth {}",
        last.as_ref().map_or(0, |r| r.depth)
    );
    SearchOutcome {
        nodes: last.as_ref().map_or(0, |r| r.nodes),
        best: last,
        stop: SearchStop::TimeExpired,
        elapsed: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::weighted;
    use crate::layout::Layout;
    use std::time::Duration;

    #[test]
    fn test_worker_matches_inline_search() {
        let board = Layout::Belgian.board();
        let config = SearchConfig {
            max_depth: Some(2),
            time_limit: Some(Duration::from_secs(600)),
            ..SearchConfig::default()
        };
        let inline = AlphaBetaAI::new(config.clone(), Arc::new(weighted)).search(&board, Color::Black);
        let worker = search_in_worker(&board, Color::Black, config, Arc::new(weighted));
        assert_eq!(worker.best, inline.best);
        assert_eq!(worker.stop, SearchStop::DepthExhausted);
    }

    #[test]
    fn test_worker_returns_by_deadline() {
        let limit = Duration::from_millis(200);
        let config = SearchConfig {
            max_depth: None,
            time_limit: Some(limit),
            ..SearchConfig::default()
        };
        let start = Instant::now();
        let outcome = search_in_worker(&Layout::Standard.board(), Color::Black, config, Arc::new(weighted));
        assert!(start.elapsed() < limit + Duration::from_secs(1));
        assert_eq!(outcome.stop, SearchStop::TimeExpired);
    }

    #[test]
    fn test_no_time_limit_runs_inline() {
        let config = SearchConfig::with_depth(1);
        let outcome = search_in_worker(&Layout::German.board(), Color::White, config, Arc::new(weighted));
        assert_eq!(outcome.depth(), 1);
        assert!(outcome.best_move().is_some());
    }
}
