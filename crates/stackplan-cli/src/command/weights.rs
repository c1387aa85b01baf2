use std::path::PathBuf;

use stackplan_evaluator::weights::HeuristicWeights;

use crate::util;

/// Heuristic weight overrides.
///
/// Values are taken from the flag, then the environment, then the weights file, then
/// the built-in defaults.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct WeightArgs {
    /// JSON file with heuristic weights
    #[arg(long)]
    weights: Option<PathBuf>,
    #[arg(long, env = "HOLES")]
    holes: Option<f64>,
    #[arg(long, env = "MAX_HEIGHT")]
    max_height: Option<f64>,
    #[arg(long, env = "AVG_HEIGHT")]
    avg_height: Option<f64>,
    #[arg(long, env = "HEIGHT_VARIANCE")]
    height_variance: Option<f64>,
    #[arg(long, env = "CLEARED_LINES")]
    cleared_lines: Option<f64>,
    #[arg(long, env = "CONTINUITY")]
    continuity: Option<f64>,
    /// Fixed-point center weighting (16384 = 1.0)
    #[arg(long, env = "CENTER_SCALE")]
    center_scale: Option<f64>,
    /// Fixed-point holes exponent (16384 = 1.0)
    #[arg(long, env = "HOLES_SCALE")]
    holes_scale: Option<f64>,
    /// Fixed-point cleared-lines exponent (16384 = 1.0)
    #[arg(long, env = "CLEARED_LINES_SCALE")]
    cleared_lines_scale: Option<f64>,
}

impl WeightArgs {
    pub(crate) fn resolve(&self) -> anyhow::Result<HeuristicWeights> {
        let mut weights = match &self.weights {
            Some(path) => util::read_json_file("weights", path)?,
            None => HeuristicWeights::default(),
        };
        let overrides = [
            (&mut weights.holes, self.holes),
            (&mut weights.max_height, self.max_height),
            (&mut weights.avg_height, self.avg_height),
            (&mut weights.height_variance, self.height_variance),
            (&mut weights.cleared_lines, self.cleared_lines),
            (&mut weights.continuity, self.continuity),
            (&mut weights.center_scale, self.center_scale),
            (&mut weights.holes_scale, self.holes_scale),
            (&mut weights.cleared_lines_scale, self.cleared_lines_scale),
        ];
        for (slot, value) in overrides {
            if let Some(value) = value {
                *slot = value;
            }
        }
        log::debug!("heuristic weights: {weights:?}");
        Ok(weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = WeightArgs {
            holes: Some(1.0),
            cleared_lines_scale: Some(8192.0),
            ..WeightArgs::default()
        };
        let weights = args.resolve().unwrap();
        assert_eq!(weights.holes, 1.0);
        assert_eq!(weights.cleared_lines_scale, 8192.0);
        assert_eq!(weights.continuity, HeuristicWeights::default().continuity);
    }
}
