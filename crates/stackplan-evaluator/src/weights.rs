//! Heuristic weights and their defaults.
//!
//! Six weights multiply the board-quality terms directly. Three scales shape the terms
//! themselves and are stored in fixed point: the raw value is divided by
//! [`SCALE_ONE`] before use, so `16384` stands for `1.0`.

use serde::{Deserialize, Serialize};

/// Fixed-point denominator of the three scale parameters.
pub const SCALE_ONE: f64 = 16384.0;

/// Tunable parameters of [`BoardQuality`](crate::heuristic::BoardQuality).
///
/// Missing fields take their default when deserializing, so a weights file only needs
/// the values it changes.
///
/// ```
/// use stackplan_evaluator::weights::HeuristicWeights;
///
/// let weights: HeuristicWeights = serde_json::from_str(r#"{"holes": 30000}"#).unwrap();
/// assert_eq!(weights.holes, 30000.0);
/// assert_eq!(weights.continuity, HeuristicWeights::default().continuity);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    pub holes: f64,
    pub max_height: f64,
    pub avg_height: f64,
    pub height_variance: f64,
    pub cleared_lines: f64,
    pub continuity: f64,
    /// Fixed-point edge weight parameter of the center weighting.
    pub center_scale: f64,
    /// Fixed-point exponent applied to each column's hole count.
    pub holes_scale: f64,
    /// Fixed-point exponent applied to a positive row surplus.
    pub cleared_lines_scale: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            holes: 24864.0,
            max_height: 10858.0,
            avg_height: 28652.0,
            height_variance: 1604.0,
            cleared_lines: 1659.0,
            continuity: 15965.0,
            center_scale: 13238.0,
            holes_scale: 22233.0,
            cleared_lines_scale: 12438.0,
        }
    }
}

impl HeuristicWeights {
    #[must_use]
    pub fn center_factor(&self) -> f64 {
        self.center_scale / SCALE_ONE
    }

    #[must_use]
    pub fn holes_exponent(&self) -> f64 {
        self.holes_scale / SCALE_ONE
    }

    #[must_use]
    pub fn cleared_lines_exponent(&self) -> f64 {
        self.cleared_lines_scale / SCALE_ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_are_fixed_point() {
        let weights = HeuristicWeights {
            center_scale: SCALE_ONE,
            holes_scale: 2.0 * SCALE_ONE,
            cleared_lines_scale: SCALE_ONE / 2.0,
            ..HeuristicWeights::default()
        };
        assert!((weights.center_factor() - 1.0).abs() < f64::EPSILON);
        assert!((weights.holes_exponent() - 2.0).abs() < f64::EPSILON);
        assert!((weights.cleared_lines_exponent() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weights_round_trip_through_json() {
        let json = serde_json::to_string(&HeuristicWeights::default()).unwrap();
        let back: HeuristicWeights = serde_json::from_str(&json).unwrap();
        assert_eq!(back, HeuristicWeights::default());
    }
}
