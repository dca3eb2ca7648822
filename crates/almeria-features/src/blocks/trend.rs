//! Trend features: moving averages of price and their ratios.

use super::{BlockInput, FeatureBlock};
use crate::{
    config::TrendConfig,
    feature::{Feature, FeatureCategory},
    window::{ewm_mean, ratio, rolling_mean},
};

/// Trend block.
///
/// For every ticker emits, with the default configuration:
/// - `sma_10`, `sma_50`: simple moving averages of price
/// - `ema_10`, `ema_50`: exponential moving averages of price
/// - `price_sma10_ratio`: price over its 10-row SMA
/// - `sma10_sma50_ratio`: 10-row SMA over 50-row SMA
///
/// # Example
///
/// ```
/// use almeria_features::blocks::{FeatureBlock, TrendFeatures};
///
/// let block = TrendFeatures::default();
/// assert_eq!(block.warmup(), 49);
/// ```
#[derive(Debug, Clone)]
pub struct TrendFeatures {
    config: TrendConfig,
}

impl TrendFeatures {
    /// Create a new trend block with the given configuration.
    #[must_use]
    pub const fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &TrendConfig {
        &self.config
    }
}

impl Default for TrendFeatures {
    fn default() -> Self {
        Self::new(TrendConfig::default())
    }
}

impl FeatureBlock for TrendFeatures {
    fn name(&self) -> &str {
        "trend"
    }

    fn category(&self) -> FeatureCategory {
        FeatureCategory::Trend
    }

    fn input(&self) -> BlockInput {
        BlockInput::Prices
    }

    fn features(&self) -> Vec<Feature> {
        let TrendConfig {
            sma_windows,
            ema_spans,
            ratio_fast,
            ratio_slow,
        } = &self.config;

        let mut features: Vec<Feature> = sma_windows.iter().map(|&w| Feature::Sma(w)).collect();
        features.extend(ema_spans.iter().map(|&s| Feature::Ema(s)));
        features.push(Feature::PriceSmaRatio(*ratio_fast));
        features.push(Feature::SmaRatio {
            fast: *ratio_fast,
            slow: *ratio_slow,
        });
        features
    }

    fn compute_series(&self, values: &[f64]) -> Vec<(Feature, Vec<f64>)> {
        let config = &self.config;
        let mut out = Vec::with_capacity(config.sma_windows.len() + config.ema_spans.len() + 2);

        for &window in &config.sma_windows {
            out.push((Feature::Sma(window), rolling_mean(values, window)));
        }
        for &span in &config.ema_spans {
            out.push((Feature::Ema(span), ewm_mean(values, span)));
        }

        let fast = rolling_mean(values, config.ratio_fast);
        let slow = rolling_mean(values, config.ratio_slow);
        out.push((
            Feature::PriceSmaRatio(config.ratio_fast),
            ratio(values, &fast),
        ));
        out.push((
            Feature::SmaRatio {
                fast: config.ratio_fast,
                slow: config.ratio_slow,
            },
            ratio(&fast, &slow),
        ));

        out
    }
}
