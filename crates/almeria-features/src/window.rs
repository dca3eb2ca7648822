//! Window statistics over a single column.
//!
//! Every function maps a column to a column of the same length. Missing
//! values are `NaN`; a rolling statistic is defined only when all values in
//! its window are present, while exponentially weighted statistics skip over
//! gaps and keep decaying older observations.

use almeria_traits::stats;

/// Simple moving average over the trailing `window` observations.
///
/// Undefined for the first `window - 1` rows and wherever the window holds a
/// missing value.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, stats::mean)
}

/// Rolling sample standard deviation (N-1) over the trailing `window`
/// observations.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, stats::sample_std)
}

fn rolling<F>(values: &[f64], window: usize, statistic: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    (0..values.len())
        .map(|t| {
            if window == 0 || t + 1 < window {
                return f64::NAN;
            }
            let slice = &values[t + 1 - window..=t];
            if slice.iter().any(|v| v.is_nan()) {
                f64::NAN
            } else {
                statistic(slice)
            }
        })
        .collect()
}

/// Smoothing factor of an exponential average with the given span.
fn alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Exponential moving average with `alpha = 2 / (span + 1)` and adjusted
/// weights.
///
/// The value at `t` is `sum((1 - alpha)^i * x[t - i]) / sum((1 - alpha)^i)`
/// over the observed values. Defined from the first observation onward; at a
/// missing row the previous average is carried.
pub fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    let Some((&first, rest)) = values.split_first() else {
        return Vec::new();
    };
    let decay = 1.0 - alpha(span);

    let mut out = Vec::with_capacity(values.len());
    let mut weighted = first;
    let mut old_weight = 1.0;
    out.push(weighted);

    for &current in rest {
        let observed = !current.is_nan();
        if !weighted.is_nan() {
            old_weight *= decay;
            if observed {
                if weighted != current {
                    weighted = (old_weight * weighted + current) / (old_weight + 1.0);
                }
                old_weight += 1.0;
            }
        } else if observed {
            weighted = current;
        }
        out.push(weighted);
    }

    out
}

/// Exponentially weighted standard deviation with bias correction.
///
/// Uses the same weights as [`ewm_mean`]. The weighted variance is scaled by
/// `(sum w)^2 / ((sum w)^2 - sum w^2)`, so the statistic stays undefined
/// until two observations exist.
pub fn ewm_std(values: &[f64], span: usize) -> Vec<f64> {
    let Some((&first, rest)) = values.split_first() else {
        return Vec::new();
    };
    let decay = 1.0 - alpha(span);

    let mut out = Vec::with_capacity(values.len());
    let mut mean = first;
    let mut cov = 0.0;
    let mut sum_weight = 1.0;
    let mut sum_weight_sq = 1.0;
    let mut old_weight = 1.0;
    let mut observations = usize::from(!first.is_nan());

    let debiased = |cov: f64, sum_weight: f64, sum_weight_sq: f64| {
        let numerator = sum_weight * sum_weight;
        let denominator = numerator - sum_weight_sq;
        if denominator > 0.0 {
            (numerator / denominator * cov).max(0.0).sqrt()
        } else {
            f64::NAN
        }
    };

    out.push(if observations > 0 {
        debiased(cov, sum_weight, sum_weight_sq)
    } else {
        f64::NAN
    });

    for &current in rest {
        let observed = !current.is_nan();
        observations += usize::from(observed);

        if !mean.is_nan() {
            sum_weight *= decay;
            sum_weight_sq *= decay * decay;
            old_weight *= decay;
            if observed {
                let old_mean = mean;
                if mean != current {
                    mean = (old_weight * old_mean + current) / (old_weight + 1.0);
                }
                cov = (old_weight * (cov + (old_mean - mean) * (old_mean - mean))
                    + (current - mean) * (current - mean))
                    / (old_weight + 1.0);
                sum_weight += 1.0;
                sum_weight_sq += 1.0;
                old_weight += 1.0;
            }
        } else if observed {
            mean = current;
        }

        out.push(if observations > 0 {
            debiased(cov, sum_weight, sum_weight_sq)
        } else {
            f64::NAN
        });
    }

    out
}

/// Percentage change over `periods` rows: `x[t] / x[t - periods] - 1`.
pub fn pct_change(values: &[f64], periods: usize) -> Vec<f64> {
    (0..values.len())
        .map(|t| {
            if t < periods {
                f64::NAN
            } else {
                values[t] / values[t - periods] - 1.0
            }
        })
        .collect()
}

/// Elementwise `numerator / denominator`.
pub fn ratio(numerator: &[f64], denominator: &[f64]) -> Vec<f64> {
    debug_assert_eq!(numerator.len(), denominator.len());
    numerator
        .iter()
        .zip(denominator)
        .map(|(n, d)| n / d)
        .collect()
}

/// Elementwise `left - right`.
pub fn difference(left: &[f64], right: &[f64]) -> Vec<f64> {
    debug_assert_eq!(left.len(), right.len());
    left.iter().zip(right).map(|(l, r)| l - r).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rolling_mean_warmup() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_relative_eq!(out[2], 2.0);
        assert_relative_eq!(out[3], 3.0);
    }

    #[test]
    fn test_rolling_mean_missing_in_window() {
        let out = rolling_mean(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert_relative_eq!(out[3], 3.5);
        assert_relative_eq!(out[4], 4.5);
    }

    #[test]
    fn test_rolling_std_is_sample_std() {
        let out = rolling_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8);
        assert_relative_eq!(out[7], (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
        assert!(rolling_std(&[1.0, 2.0], 1).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rolling_zero_window() {
        assert!(rolling_mean(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_ewm_mean_adjusted_weights() {
        // span 3 -> alpha 0.5: y1 = (0.5 * 1 + 2) / 1.5
        let out = ewm_mean(&[1.0, 2.0, 3.0], 3);
        assert_relative_eq!(out[0], 1.0);
        assert_relative_eq!(out[1], 2.5 / 1.5, epsilon = 1e-12);
        // weights 0.25, 0.5, 1
        assert_relative_eq!(out[2], (0.25 + 1.0 + 3.0) / 1.75, epsilon = 1e-12);
    }

    #[test]
    fn test_ewm_mean_leading_and_interior_gaps() {
        let out = ewm_mean(&[f64::NAN, 4.0, f64::NAN, 4.0], 5);
        assert!(out[0].is_nan());
        assert_relative_eq!(out[1], 4.0);
        assert_relative_eq!(out[2], 4.0);
        assert_relative_eq!(out[3], 4.0);
    }

    #[test]
    fn test_ewm_mean_constant() {
        let out = ewm_mean(&[7.5; 30], 12);
        assert!(out.iter().all(|v| (*v - 7.5).abs() < 1e-12));
    }

    #[test]
    fn test_ewm_std_two_points() {
        // span 3 -> alpha 0.5. Weights 0.5 and 1 give mean 5/3 and a
        // debiased variance of 0.5, the same as the sample variance of [1, 2].
        let out = ewm_std(&[1.0, 2.0], 3);
        assert!(out[0].is_nan());
        assert_relative_eq!(out[1], 0.5_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_ewm_std_undefined_until_two_observations() {
        let out = ewm_std(&[f64::NAN, 0.01, 0.02, -0.01], 21);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!(out[2].is_finite());
        assert!(out[3].is_finite());
    }

    #[test]
    fn test_ewm_std_constant_is_zero() {
        let out = ewm_std(&[0.3; 10], 5);
        assert!(out[1..].iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_pct_change() {
        let out = pct_change(&[100.0, 110.0, 121.0], 1);
        assert!(out[0].is_nan());
        assert_relative_eq!(out[1], 0.1, epsilon = 1e-12);
        assert_relative_eq!(out[2], 0.1, epsilon = 1e-12);

        let out = pct_change(&[100.0, 110.0, 121.0], 2);
        assert_relative_eq!(out[2], 0.21, epsilon = 1e-12);
    }

    #[test]
    fn test_ratio_and_difference() {
        assert_eq!(ratio(&[4.0, 9.0], &[2.0, 3.0]), vec![2.0, 3.0]);
        assert_eq!(difference(&[4.0, 9.0], &[2.0, 3.0]), vec![2.0, 6.0]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(ewm_mean(&[], 10).is_empty());
        assert!(ewm_std(&[], 10).is_empty());
        assert!(rolling_mean(&[], 10).is_empty());
    }
}
