//! Named weight presets: Balanced, Aggressive, Defensive
//!
//! - BALANCED: the default weights
//! - AGGRESSIVE: trade formation for center control and captures
//! - DEFENSIVE: tight, rim-averse formations

use crate::eval::Weights;

/// BALANCED Weights
///
/// Philosophy: "Hold the center, keep the group together"
pub fn balanced() -> Weights {
    Weights::default()
}

/// AGGRESSIVE Weights
///
/// Philosophy: "Captures win games"
///
/// Doubles the value of removed marbles, rushes the center and wedges
/// into the opponent's lines, tolerating exposed marbles along the way.
pub fn aggressive() -> Weights {
    Weights {
        center_distance: -1.0,
        coherence: -0.2,
        danger: -0.5,
        edge_safety: 0.3,
        triangle: 0.2,
        score: 10.0,
        formation_break: 0.5,
    }
}

/// DEFENSIVE Weights
///
/// Philosophy: "Never give up a marble"
///
/// Wedge shapes and rim distance dominate; captures still matter
/// but never at the cost of exposure.
pub fn defensive() -> Weights {
    Weights {
        center_distance: -0.4,
        coherence: -0.6,
        danger: -2.0,
        edge_safety: 1.2,
        triangle: 0.8,
        score: 4.0,
        formation_break: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggressive_values_captures() {
        let w = aggressive();
        assert!(w.score > balanced().score, "Aggressive should value captures most");
        assert!(w.center_distance < balanced().center_distance);
    }

    #[test]
    fn test_defensive_avoids_danger() {
        let w = defensive();
        assert!(w.danger < balanced().danger, "Defensive should punish danger hardest");
        assert!(w.edge_safety > balanced().edge_safety);
    }

    #[test]
    fn test_all_different() {
        assert_ne!(balanced(), aggressive());
        assert_ne!(aggressive(), defensive());
        assert_ne!(balanced(), defensive());
    }
}
