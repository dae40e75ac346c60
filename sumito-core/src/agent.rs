//! Configured search agents

use std::sync::Arc;
use std::time::Duration;

use crate::ai::{SearchConfig, SearchOutcome};
use crate::board::{Board, Color};
use crate::config::AgentConfig;
use crate::error::ConfigError;
use crate::eval::{Heuristic, Weights};
use crate::moves::Move;
use crate::worker::search_in_worker;

/// A named heuristic plus search budget
#[derive(Clone)]
pub struct Agent {
    pub name: String,
    config: SearchConfig,
    heuristic: Arc<dyn Heuristic>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        config: SearchConfig,
        heuristic: Arc<dyn Heuristic>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            name: name.into(),
            config,
            heuristic,
        })
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self, ConfigError> {
        Self::new(config.name.clone(), config.search_config()?, config.heuristic()?)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search for `color`, time-boxed when a time limit is set
    pub fn choose(&self, board: &Board, color: Color) -> SearchOutcome {
        search_in_worker(board, color, self.config.clone(), Arc::clone(&self.heuristic))
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Pick a move for `color`
///
/// `None` when no move exists or no iteration finished in time.
pub fn search(
    board: &Board,
    color: Color,
    depth_limit: Option<u32>,
    time_limit: Option<Duration>,
    heuristic: Arc<dyn Heuristic>,
    weights: &Weights,
) -> Result<Option<Move>, ConfigError> {
    let config = SearchConfig {
        max_depth: depth_limit,
        time_limit,
        weights: weights.clone(),
        ..SearchConfig::default()
    };
    let agent = Agent::new("search", config, heuristic)?;
    Ok(agent.choose(board, color).best.map(|r| r.best_move))
}
