//! Return calculations derived from price levels.

use almeria_traits::Panel;

/// Log returns of a single price series: `ln(p[t] / p[t - 1])`.
///
/// The first value is missing, as is any value where either price is
/// missing or non-positive.
///
/// # Example
///
/// ```
/// use almeria_features::returns::log_return_series;
///
/// let returns = log_return_series(&[100.0, 110.0, 0.0]);
/// assert!(returns[0].is_nan());
/// assert!((returns[1] - 1.1_f64.ln()).abs() < 1e-12);
/// assert!(returns[2].is_nan());
/// ```
pub fn log_return_series(prices: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return out;
    }
    out.push(f64::NAN);
    out.extend(prices.windows(2).map(|w| {
        let (previous, current) = (w[0], w[1]);
        // NaN fails both comparisons
        if previous > 0.0 && current > 0.0 {
            (current / previous).ln()
        } else {
            f64::NAN
        }
    }));
    out
}

/// Forward simple returns of a single price series:
/// `p[t + horizon] / p[t] - 1`, aligned to the origin date `t`.
///
/// The trailing `horizon` values are missing.
pub fn forward_return_series(prices: &[f64], horizon: usize) -> Vec<f64> {
    let n = prices.len();
    (0..n)
        .map(|t| {
            if t + horizon < n {
                prices[t + horizon] / prices[t] - 1.0
            } else {
                f64::NAN
            }
        })
        .collect()
}

/// Log returns of every ticker in a price panel.
pub fn log_returns(prices: &Panel) -> Panel {
    prices.map_columns(log_return_series)
}

/// Forward returns of every ticker in a price panel over `horizon` rows.
pub fn forward_returns(prices: &Panel, horizon: usize) -> Panel {
    prices.map_columns(|column| forward_return_series(column, horizon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use almeria_traits::Date;
    use approx::assert_relative_eq;

    fn panel(values: Vec<f64>) -> Panel {
        let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..values.len())
            .map(|i| start + chrono::Days::new(i as u64))
            .collect();
        Panel::new(dates, vec!["A".to_string()], vec![values]).unwrap()
    }

    #[test]
    fn test_log_returns_basic() {
        let returns = log_returns(&panel(vec![100.0, 105.0, 102.0]));
        let column = returns.column("A").unwrap();
        assert!(column[0].is_nan());
        assert_relative_eq!(column[1], (105.0_f64 / 100.0).ln(), epsilon = 1e-12);
        assert_relative_eq!(column[2], (102.0_f64 / 105.0).ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_log_returns_missing_and_non_positive() {
        let out = log_return_series(&[100.0, f64::NAN, 100.0, -1.0, 50.0]);
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert!(out[3].is_nan());
        assert!(out[4].is_nan());
    }

    #[test]
    fn test_log_returns_empty() {
        assert!(log_return_series(&[]).is_empty());
    }

    #[test]
    fn test_forward_returns_alignment() {
        let forward = forward_returns(&panel(vec![100.0, 110.0, 121.0, 133.1]), 2);
        let column = forward.column("A").unwrap();
        assert_relative_eq!(column[0], 0.21, epsilon = 1e-12);
        assert_relative_eq!(column[1], 0.21, epsilon = 1e-12);
        assert!(column[2].is_nan());
        assert!(column[3].is_nan());
    }

    #[test]
    fn test_forward_returns_zero_horizon() {
        let out = forward_return_series(&[100.0, 50.0], 0);
        assert_eq!(out, vec![0.0, 0.0]);
    }

    #[test]
    fn test_forward_returns_horizon_longer_than_series() {
        let out = forward_return_series(&[100.0, 50.0], 5);
        assert!(out.iter().all(|v| v.is_nan()));
    }
}
