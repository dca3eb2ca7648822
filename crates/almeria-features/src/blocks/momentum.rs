//! Momentum features: percentage changes and MACD.

use super::{BlockInput, FeatureBlock};
use crate::{
    config::MomentumConfig,
    feature::{Feature, FeatureCategory},
    window::{difference, ewm_mean, pct_change},
};

/// Momentum block.
///
/// Emits `momentum_<w>d = p[t] / p[t - w] - 1` for each configured window,
/// `macd = EMA(fast) - EMA(slow)` of price and `macd_macd_signal`, the EMA of
/// the MACD line.
#[derive(Debug, Clone)]
pub struct MomentumFeatures {
    config: MomentumConfig,
}

impl MomentumFeatures {
    /// Create a new momentum block with the given configuration.
    #[must_use]
    pub const fn new(config: MomentumConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &MomentumConfig {
        &self.config
    }

    /// MACD line and its signal line for one price series.
    #[must_use]
    pub fn macd(&self, prices: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let fast = ewm_mean(prices, self.config.macd_fast);
        let slow = ewm_mean(prices, self.config.macd_slow);
        let macd = difference(&fast, &slow);
        let signal = ewm_mean(&macd, self.config.macd_signal);
        (macd, signal)
    }
}

impl Default for MomentumFeatures {
    fn default() -> Self {
        Self::new(MomentumConfig::default())
    }
}

impl FeatureBlock for MomentumFeatures {
    fn name(&self) -> &str {
        "momentum"
    }

    fn category(&self) -> FeatureCategory {
        FeatureCategory::Momentum
    }

    fn input(&self) -> BlockInput {
        BlockInput::Prices
    }

    fn features(&self) -> Vec<Feature> {
        let mut features: Vec<Feature> = self
            .config
            .windows
            .iter()
            .map(|&w| Feature::Momentum(w))
            .collect();
        features.push(Feature::Macd);
        features.push(Feature::MacdSignal);
        features
    }

    fn compute_series(&self, values: &[f64]) -> Vec<(Feature, Vec<f64>)> {
        let mut out: Vec<(Feature, Vec<f64>)> = self
            .config
            .windows
            .iter()
            .map(|&w| (Feature::Momentum(w), pct_change(values, w)))
            .collect();

        let (macd, signal) = self.macd(values);
        out.push((Feature::Macd, macd));
        out.push((Feature::MacdSignal, signal));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let block = MomentumFeatures::default();
        assert_eq!(block.config().windows, vec![5, 21]);
        assert_eq!(block.warmup(), 21);
        assert_eq!(block.features().len(), 4);
    }

    #[test]
    fn test_momentum_values() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let out = MomentumFeatures::default().compute_series(&prices);

        let (_, mom_5d) = &out[0];
        assert!(mom_5d[4].is_nan());
        assert_relative_eq!(mom_5d[5], 105.0 / 100.0 - 1.0, epsilon = 1e-12);

        let (_, mom_21d) = &out[1];
        assert!(mom_21d[20].is_nan());
        assert_relative_eq!(mom_21d[29], 129.0 / 108.0 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_macd_defined_from_first_row() {
        let prices: Vec<f64> = (0..40).map(|i| 50.0 + (i as f64 * 0.3).sin()).collect();
        let (macd, signal) = MomentumFeatures::default().macd(&prices);
        assert_relative_eq!(macd[0], 0.0);
        assert!(macd.iter().all(|v| v.is_finite()));
        assert!(signal.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_constant_price_has_zero_momentum() {
        let out = MomentumFeatures::default().compute_series(&[10.0; 40]);
        for (feature, values) in &out {
            let defined: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
            assert!(!defined.is_empty(), "{feature} never defined");
            assert!(defined.iter().all(|v| v.abs() < 1e-12), "{feature}");
        }
    }

    #[test]
    fn test_rising_price_has_positive_macd() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let (macd, signal) = MomentumFeatures::default().macd(&prices);
        assert!(macd[59] > 0.0);
        assert!(signal[59] > 0.0);
    }
}
