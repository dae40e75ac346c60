//! Position evaluation
//!
//! A heuristic is anything that maps `(color, board, weights)` to a score,
//! higher being better for `color`. Two reference heuristics are provided:
//! - `weighted`: every positional feature, own minus opponent
//! - `material`: score differential only

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Position, BOARD_RADIUS, DIRECTIONS};
use crate::error::ConfigError;

/// Win value (effectively infinite)
pub const WIN_VALUE: f32 = 100000.0;

/// Feature weights for position evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Mean hex distance from the center
    pub center_distance: f32,
    /// Mean distance from the group's own centroid
    pub coherence: f32,
    /// Marbles exposed to a push
    pub danger: f32,
    /// Blended rim distance and neighborhood, in [0, 1]
    pub edge_safety: f32,
    /// Equilateral-ness of marble triples
    pub triangle: f32,
    /// Opponent marbles removed minus own marbles removed
    pub score: f32,
    /// Opponent spread plus own marbles wedged into it; off by default
    pub formation_break: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            center_distance: -0.5,
            coherence: -0.3,
            danger: -1.0,
            edge_safety: 0.6,
            triangle: 0.4,
            score: 5.0,
            formation_break: 0.0,
        }
    }
}

// ============================================================================
// HEURISTIC CONTRACT
// ============================================================================

/// Board evaluation from one color's perspective
pub trait Heuristic: Send + Sync {
    fn evaluate(&self, color: Color, board: &Board, weights: &Weights) -> f32;
}

impl<F> Heuristic for F
where
    F: Fn(Color, &Board, &Weights) -> f32 + Send + Sync,
{
    fn evaluate(&self, color: Color, board: &Board, weights: &Weights) -> f32 {
        self(color, board, weights)
    }
}

/// Names accepted by `heuristic_by_name`
pub const HEURISTIC_NAMES: [&str; 2] = ["weighted", "material"];

/// Look up a reference heuristic by name
pub fn heuristic_by_name(name: &str) -> Result<Arc<dyn Heuristic>, ConfigError> {
    match name {
        "weighted" => Ok(Arc::new(weighted)),
        "material" => Ok(Arc::new(material)),
        _ => Err(ConfigError::UnknownHeuristic(name.to_string())),
    }
}

/// Linear combination of every feature, own minus opponent
pub fn weighted(color: Color, board: &Board, weights: &Weights) -> f32 {
    let opponent = color.opponent();
    let diff = |feature: fn(&Board, Color) -> f32| feature(board, color) - feature(board, opponent);

    weights.center_distance * diff(center_distance)
        + weights.coherence * diff(coherence)
        + weights.danger * diff(danger)
        + weights.edge_safety * diff(edge_safety)
        + weights.triangle * diff(triangle_formation)
        + weights.score * score_differential(board, color)
        + weights.formation_break * formation_break(board, color)
}

/// Removed-marble differential only
pub fn material(color: Color, board: &Board, weights: &Weights) -> f32 {
    weights.score * score_differential(board, color)
}

/// Evaluate with a depth bonus for preferring faster wins
///
/// `depth` is the remaining search depth: a win found higher in the tree
/// scores more, a loss found higher scores less.
pub fn evaluate_with_depth(
    heuristic: &dyn Heuristic,
    color: Color,
    board: &Board,
    weights: &Weights,
    depth: u32,
) -> f32 {
    match board.is_terminal() {
        Some(winner) if winner == color => WIN_VALUE + depth as f32,
        Some(_) => -(WIN_VALUE + depth as f32),
        None => heuristic.evaluate(color, board, weights),
    }
}

// ============================================================================
// FEATURES
// ============================================================================

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, n) = values.fold((0.0f32, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f32
    }
}

fn neighbors_of(board: &Board, pos: Position, color: Color) -> usize {
    DIRECTIONS
        .iter()
        .filter(|&&d| pos.neighbor(d).and_then(|n| board.get(n)) == Some(color))
        .count()
}

/// Mean hex distance of `color`'s marbles from the center
pub fn center_distance(board: &Board, color: Color) -> f32 {
    mean(
        board
            .marbles()
            .filter(|&(_, c)| c == color)
            .map(|(pos, _)| pos.distance_to_center() as f32),
    )
}

/// Mean cube distance of `color`'s marbles from their centroid
pub fn coherence(board: &Board, color: Color) -> f32 {
    let marbles: Vec<Position> = board.marbles_of(color);
    if marbles.is_empty() {
        return 0.0;
    }
    let n = marbles.len() as f32;
    let cq = marbles.iter().map(|p| p.q as f32).sum::<f32>() / n;
    let cr = marbles.iter().map(|p| p.r as f32).sum::<f32>() / n;
    let cs = marbles.iter().map(|p| p.s as f32).sum::<f32>() / n;

    mean(marbles.iter().map(|p| {
        ((p.q as f32 - cq).abs() + (p.r as f32 - cr).abs() + (p.s as f32 - cs).abs()) / 2.0
    }))
}

/// Marbles touching two opponents, or on the rim touching one
pub fn danger(board: &Board, color: Color) -> f32 {
    let opponent = color.opponent();
    board
        .marbles()
        .filter(|&(_, c)| c == color)
        .filter(|&(pos, _)| {
            let foes = neighbors_of(board, pos, opponent);
            foes >= 2 || (pos.is_rim() && foes >= 1)
        })
        .count() as f32
}

/// Mean per-marble safety: rim distance plus friends minus foes, in [0, 1]
pub fn edge_safety(board: &Board, color: Color) -> f32 {
    let opponent = color.opponent();
    mean(board.marbles().filter(|&(_, c)| c == color).map(|(pos, _)| {
        let rim = pos.distance_to_rim() as f32 / BOARD_RADIUS as f32;
        let friends = neighbors_of(board, pos, color) as f32;
        let foes = neighbors_of(board, pos, opponent) as f32;
        (0.5 * rim + 0.1 * friends - 0.15 * foes).clamp(0.0, 1.0)
    }))
}

/// Mean over marble triples of shortest side / longest side
///
/// 1.0 for an equilateral triple, falling towards 0 for long thin ones.
pub fn triangle_formation(board: &Board, color: Color) -> f32 {
    let marbles = board.marbles_of(color);
    let mut total = 0.0f32;
    let mut triples = 0usize;

    for i in 0..marbles.len() {
        for j in i + 1..marbles.len() {
            for k in j + 1..marbles.len() {
                let sides = [
                    marbles[i].distance_to(marbles[j]),
                    marbles[j].distance_to(marbles[k]),
                    marbles[i].distance_to(marbles[k]),
                ];
                let longest = sides.iter().copied().max().unwrap_or(0);
                let shortest = sides.iter().copied().min().unwrap_or(0);
                if longest > 0 {
                    total += shortest as f32 / longest as f32;
                }
                triples += 1;
            }
        }
    }

    if triples == 0 {
        0.0
    } else {
        total / triples as f32
    }
}

/// How far `color` has broken up the opponent's formation
///
/// The opponent's coherence plus one per own marble touching two or more
/// opponent marbles. Already relative, so `weighted` does not difference it.
pub fn formation_break(board: &Board, color: Color) -> f32 {
    let opponent = color.opponent();
    let wedged = board
        .marbles()
        .filter(|&(pos, c)| c == color && neighbors_of(board, pos, opponent) >= 2)
        .count();
    coherence(board, opponent) + wedged as f32
}

/// Opponent marbles removed minus own marbles removed
pub fn score_differential(board: &Board, color: Color) -> f32 {
    board.score(color) as f32 - board.score(color.opponent()) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use crate::notation::from_notation;

    #[test]
    fn test_symmetric_layouts_evaluate_even() {
        // Standard maps onto itself with colors swapped, so every feature cancels
        let board = Layout::Standard.board();
        let weights = Weights::default();
        let black = weighted(Color::Black, &board, &weights);
        let white = weighted(Color::White, &board, &weights);
        assert!(black.abs() < 1e-4, "{black}");
        assert!((black + white).abs() < 1e-4);
    }

    #[test]
    fn test_material_counts_removals() {
        // White has lost two marbles
        let mut board = Layout::Standard.board();
        for pos in board.marbles_of(Color::White).into_iter().take(2) {
            board.take(pos);
        }
        let weights = Weights::default();
        assert_eq!(score_differential(&board, Color::Black), 2.0);
        assert_eq!(material(Color::Black, &board, &weights), 10.0);
        assert_eq!(material(Color::White, &board, &weights), -10.0);
    }

    #[test]
    fn test_center_and_coherence() {
        let board = from_notation("E5b,E6b,A1w,I9w").unwrap();
        assert_eq!(center_distance(&board, Color::Black), 0.5);
        assert_eq!(center_distance(&board, Color::White), 4.0);
        assert!(coherence(&board, Color::Black) < coherence(&board, Color::White));
        assert_eq!(coherence(&Board::new(), Color::Black), 0.0);
    }

    #[test]
    fn test_danger() {
        // E5 touches two white marbles; A1 is on the rim next to one
        let board = from_notation("E5b,E6w,E4w,A1b,B1w").unwrap();
        assert_eq!(danger(&board, Color::Black), 2.0);
    }

    #[test]
    fn test_edge_safety_is_clamped() {
        let board = from_notation("A1b,B1w,B2w,A2w").unwrap();
        assert_eq!(edge_safety(&board, Color::Black), 0.0);
        let board = Layout::Standard.board();
        let safety = edge_safety(&board, Color::Black);
        assert!((0.0..=1.0).contains(&safety));
    }

    #[test]
    fn test_triangle_prefers_compact_triples() {
        let tight = from_notation("E5b,E6b,F6b").unwrap();
        let line = from_notation("E3b,E5b,E7b").unwrap();
        assert_eq!(triangle_formation(&tight, Color::Black), 1.0);
        assert_eq!(triangle_formation(&line, Color::Black), 0.5);
    }

    #[test]
    fn test_formation_break() {
        // E5 sits between E4 and E6; the white pair is otherwise tight
        let board = from_notation("E5b,E4w,E6w").unwrap();
        assert_eq!(formation_break(&board, Color::Black), coherence(&board, Color::White) + 1.0);
        assert_eq!(formation_break(&board, Color::White), 0.0);

        let weights = Weights::default();
        let on = Weights {
            formation_break: 1.0,
            ..Weights::default()
        };
        let delta = weighted(Color::Black, &board, &on) - weighted(Color::Black, &board, &weights);
        assert!((delta - formation_break(&board, Color::Black)).abs() < 1e-4);
    }

    #[test]
    fn test_terminal_depth_bonus() {
        let board = from_notation("E5b").unwrap();
        let weights = Weights::default();
        let win = evaluate_with_depth(&weighted, Color::Black, &board, &weights, 3);
        let loss = evaluate_with_depth(&weighted, Color::White, &board, &weights, 3);
        assert_eq!(win, WIN_VALUE + 3.0);
        assert_eq!(loss, -(WIN_VALUE + 3.0));
    }

    #[test]
    fn test_registry_and_closures() {
        let board = Layout::Belgian.board();
        let weights = Weights::default();
        for name in HEURISTIC_NAMES {
            let h = heuristic_by_name(name).unwrap();
            assert!(h.evaluate(Color::Black, &board, &weights).is_finite());
        }
        assert!(heuristic_by_name("random").is_err());

        let constant = |_: Color, _: &Board, _: &Weights| 7.0f32;
        assert_eq!(constant.evaluate(Color::White, &board, &weights), 7.0);
    }

    #[test]
    fn test_weights_fill_missing_fields() {
        let weights: Weights = serde_json::from_str(r#"{"score": 9.0}"#).unwrap();
        assert_eq!(weights.score, 9.0);
        assert_eq!(weights.danger, Weights::default().danger);
    }
}
