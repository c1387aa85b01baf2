/// Mean of a stream of values, updated one sample at a time.
///
/// ```
/// # use stackplan_stats::running::RunningMean;
/// let mut depth = RunningMean::default();
/// for d in [0, 1, 1, 2] {
///     depth.push(f64::from(d));
/// }
/// assert_eq!(depth.count(), 4);
/// assert_eq!(depth.mean(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMean {
    count: usize,
    mean: f64,
}

impl RunningMean {
    #[expect(clippy::cast_precision_loss)]
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.mean += (value - self.mean) / self.count as f64;
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean of the values pushed so far, `0.0` before the first one.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mean_is_zero() {
        let mean = RunningMean::default();
        assert_eq!(mean.count(), 0);
        assert_eq!(mean.mean(), 0.0);
    }

    #[test]
    fn test_push_matches_batch_mean() {
        let values = [3.0, 9.0, 4.5, 0.5];
        let mut running = RunningMean::default();
        for value in values {
            running.push(value);
        }
        let batch = crate::descriptive::mean(&values).unwrap();
        assert!((running.mean() - batch).abs() < 1e-12);
    }
}
