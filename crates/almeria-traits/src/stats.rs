//! Statistical utility functions.
//!
//! These helpers are shared by the window statistics engine (rolling
//! standard deviation) and the modeling layer (feature scaling). They do not
//! skip missing values: a `NaN` anywhere in the input yields `NaN`.

/// Minimum threshold for standard deviation to avoid division by zero.
/// Values below this threshold are treated as zero variance.
pub const MIN_STD_THRESHOLD: f64 = 1e-10;

/// Arithmetic mean of `values`.
///
/// Returns `NaN` for an empty slice.
///
/// # Examples
///
/// ```
/// use almeria_traits::stats::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
/// assert!(mean(&[]).is_nan());
/// ```
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Variance with `ddof` delta degrees of freedom.
///
/// Returns `NaN` when there are not more than `ddof` values.
pub fn variance(values: &[f64], ddof: usize) -> f64 {
    let n = values.len();
    if n <= ddof {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - ddof) as f64
}

/// Sample standard deviation (N-1 denominator, Bessel's correction).
///
/// # Examples
///
/// ```
/// use almeria_traits::stats::sample_std;
///
/// let std = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
/// assert!((std - 2.138).abs() < 1e-3);
/// assert!(sample_std(&[1.0]).is_nan());
/// ```
pub fn sample_std(values: &[f64]) -> f64 {
    variance(values, 1).sqrt()
}

/// Population standard deviation (N denominator).
pub fn population_std(values: &[f64]) -> f64 {
    variance(values, 0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_basic() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0);
    }

    #[test]
    fn test_mean_propagates_nan() {
        assert!(mean(&[1.0, f64::NAN]).is_nan());
    }

    #[test]
    fn test_sample_vs_population_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(population_std(&values), 2.0);
        assert_relative_eq!(sample_std(&values), (32.0_f64 / 7.0).sqrt());
    }

    #[test]
    fn test_constant_values_have_zero_std() {
        let values = [3.3; 6];
        assert!(sample_std(&values) < MIN_STD_THRESHOLD);
    }

    #[test]
    fn test_variance_needs_more_than_ddof_values() {
        assert!(variance(&[], 0).is_nan());
        assert!(variance(&[1.0], 1).is_nan());
        assert_relative_eq!(variance(&[1.0], 0), 0.0);
    }
}
