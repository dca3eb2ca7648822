//! Volatility features computed from log returns.

use super::{BlockInput, FeatureBlock};
use crate::{
    config::VolatilityConfig,
    feature::{Feature, FeatureCategory},
    window::{ewm_std, rolling_std},
};

/// Volatility block.
///
/// Reads the log-return panel and emits the rolling sample standard
/// deviation for each configured window (`vol_5d`, `vol_21d`) plus the
/// exponentially weighted standard deviation (`ewm_vol_21d`). Values are
/// not annualized.
#[derive(Debug, Clone)]
pub struct VolatilityFeatures {
    config: VolatilityConfig,
}

impl VolatilityFeatures {
    /// Create a new volatility block with the given configuration.
    #[must_use]
    pub const fn new(config: VolatilityConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &VolatilityConfig {
        &self.config
    }
}

impl Default for VolatilityFeatures {
    fn default() -> Self {
        Self::new(VolatilityConfig::default())
    }
}

impl FeatureBlock for VolatilityFeatures {
    fn name(&self) -> &str {
        "volatility"
    }

    fn category(&self) -> FeatureCategory {
        FeatureCategory::Volatility
    }

    fn input(&self) -> BlockInput {
        BlockInput::Returns
    }

    fn features(&self) -> Vec<Feature> {
        let mut features: Vec<Feature> = self
            .config
            .windows
            .iter()
            .map(|&w| Feature::Volatility(w))
            .collect();
        features.push(Feature::EwmVolatility(self.config.ewm_span));
        features
    }

    fn compute_series(&self, values: &[f64]) -> Vec<(Feature, Vec<f64>)> {
        let mut out: Vec<(Feature, Vec<f64>)> = self
            .config
            .windows
            .iter()
            .map(|&w| (Feature::Volatility(w), rolling_std(values, w)))
            .collect();
        out.push((
            Feature::EwmVolatility(self.config.ewm_span),
            ewm_std(values, self.config.ewm_span),
        ));
        out
    }
}
