//! AgentConfig - search agent definition
//!
//! Stored as JSON. Missing fields fall back to defaults; `null` depth or
//! time limit means unbounded (but not both).

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::ai::SearchConfig;
use crate::error::ConfigError;
use crate::eval::{heuristic_by_name, Heuristic, Weights};
use crate::heuristics::preset_by_name;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub name: String,
    /// Registry name, see `HEURISTIC_NAMES`
    pub heuristic: String,
    pub weights: Weights,
    pub depth: Option<u32>,
    pub time_limit_secs: Option<f64>,
    pub max_moves: Option<usize>,
    pub ordering: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            heuristic: "weighted".to_string(),
            weights: Weights::default(),
            depth: Some(3),
            time_limit_secs: None,
            max_moves: None,
            ordering: true,
        }
    }
}

impl AgentConfig {
    /// Default agent using a named weight preset
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            name: name.to_ascii_lowercase(),
            weights: preset_by_name(name)?,
            ..Self::default()
        })
    }

    /// Load from a JSON file and validate
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading agent config {}", path.display()))?;
        let config: AgentConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing agent config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid agent config {}", path.display()))?;
        Ok(config)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing agent config {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        heuristic_by_name(&self.heuristic)?;
        self.search_config()?.validate()
    }

    pub fn time_limit(&self) -> Result<Option<Duration>, ConfigError> {
        self.time_limit_secs
            .map(|secs| {
                if secs > 0.0 {
                    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::BadTimeLimit(secs))
                } else {
                    Err(ConfigError::BadTimeLimit(secs))
                }
            })
            .transpose()
    }

    pub fn search_config(&self) -> Result<SearchConfig, ConfigError> {
        Ok(SearchConfig {
            max_depth: self.depth,
            time_limit: self.time_limit()?,
            weights: self.weights.clone(),
            max_moves: self.max_moves,
            ordering: self.ordering,
        })
    }

    pub fn heuristic(&self) -> Result<Arc<dyn Heuristic>, ConfigError> {
        heuristic_by_name(&self.heuristic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: AgentConfig = serde_json::from_str(r#"{"name": "quick", "depth": 2}"#).unwrap();
        assert_eq!(config.name, "quick");
        assert_eq!(config.depth, Some(2));
        assert_eq!(config.heuristic, "weighted");
        assert!(config.ordering);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_null_depth_needs_time_limit() {
        let config: AgentConfig = serde_json::from_str(r#"{"depth": null}"#).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::Unbounded));

        let config: AgentConfig =
            serde_json::from_str(r#"{"depth": null, "time_limit_secs": 1.5}"#).unwrap();
        let search = config.search_config().unwrap();
        assert_eq!(search.max_depth, None);
        assert_eq!(search.time_limit, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_time = AgentConfig {
            time_limit_secs: Some(-1.0),
            ..AgentConfig::default()
        };
        assert_eq!(bad_time.validate(), Err(ConfigError::BadTimeLimit(-1.0)));

        let bad_name = AgentConfig {
            heuristic: "oracle".to_string(),
            ..AgentConfig::default()
        };
        assert_eq!(
            bad_name.validate(),
            Err(ConfigError::UnknownHeuristic("oracle".to_string()))
        );

        let zero = AgentConfig {
            depth: Some(0),
            ..AgentConfig::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroDepth));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aggressive.json");
        let config = AgentConfig::preset("aggressive").unwrap();
        config.save(&path).unwrap();
        assert_eq!(AgentConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_reports_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = AgentConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));

        let missing = AgentConfig::load(&dir.path().join("missing.json"));
        assert!(missing.is_err());
    }
}
