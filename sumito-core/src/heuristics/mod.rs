//! Weight presets for the reference heuristics

mod presets;

pub use presets::{aggressive, balanced, defensive};

use crate::error::ConfigError;
use crate::eval::Weights;

/// Names accepted by `preset_by_name`
pub const PRESET_NAMES: [&str; 3] = ["balanced", "aggressive", "defensive"];

pub fn preset_by_name(name: &str) -> Result<Weights, ConfigError> {
    match name.to_ascii_lowercase().as_str() {
        "balanced" | "default" => Ok(balanced()),
        "aggressive" => Ok(aggressive()),
        "defensive" => Ok(defensive()),
        _ => Err(ConfigError::UnknownPreset(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_resolves() {
        for name in PRESET_NAMES {
            assert!(preset_by_name(name).is_ok(), "{name}");
        }
        assert_eq!(preset_by_name("Default"), Ok(Weights::default()));
        assert_eq!(
            preset_by_name("reckless"),
            Err(ConfigError::UnknownPreset("reckless".to_string()))
        );
    }
}
