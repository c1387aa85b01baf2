/// Arithmetic mean of `values`.
///
/// Returns `None` for an empty slice.
///
/// ```
/// # use stackplan_stats::descriptive::mean;
/// assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
/// assert_eq!(mean(&[]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance of `values` (divides by `n - 1`).
///
/// Fewer than two values carry no spread, so the result is `0.0` for them.
///
/// ```
/// # use stackplan_stats::descriptive::sample_variance;
/// assert_eq!(sample_variance(&[2.0, 4.0, 6.0]), 4.0);
/// assert_eq!(sample_variance(&[5.0]), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn sample_variance(values: &[f64]) -> f64 {
    let Some(mean) = mean(values).filter(|_| values.len() > 1) else {
        return 0.0;
    };
    let squares = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    squares / (values.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_equal_values() {
        assert_eq!(mean(&[7.5; 4]), Some(7.5));
    }

    #[test]
    fn test_sample_variance_uses_bessel_correction() {
        // population variance would be 1.25
        let values = [1.0, 2.0, 3.0, 4.0];
        assert!((sample_variance(&values) - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_variance_of_empty_slice() {
        assert_eq!(sample_variance(&[]), 0.0);
    }
}
