//! Feature registry for discovering the columns a configuration produces.

use crate::{
    assemble::FeatureAssembler,
    config::FeatureConfig,
    feature::{Feature, FeatureCategory},
};
use serde::{Deserialize, Serialize};

/// Metadata about a feature column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureInfo {
    /// Feature identifier
    pub feature: Feature,

    /// Output column name
    pub name: String,

    /// Category classification
    pub category: FeatureCategory,

    /// Human-readable description
    pub description: &'static str,

    /// Leading rows without a value on a gap-free panel
    pub warmup: usize,

    /// Whether the feature needs a volume panel
    pub requires_volume: bool,
}

impl From<Feature> for FeatureInfo {
    fn from(feature: Feature) -> Self {
        Self {
            feature,
            name: feature.name(),
            category: feature.category(),
            description: feature.description(),
            warmup: feature.warmup(),
            requires_volume: feature.requires_volume(),
        }
    }
}

/// Information about every feature the configuration can produce, in
/// canonical column order.
#[must_use]
pub fn available_features(config: &FeatureConfig) -> Vec<FeatureInfo> {
    let assembler = FeatureAssembler {
        config: config.clone(),
    };
    let mut features: Vec<Feature> = assembler
        .blocks()
        .iter()
        .flat_map(|block| block.features())
        .collect();
    features.sort();
    features.dedup();
    features.into_iter().map(FeatureInfo::from).collect()
}

/// Features of one category under the configuration.
#[must_use]
pub fn features_by_category(config: &FeatureConfig, category: FeatureCategory) -> Vec<FeatureInfo> {
    available_features(config)
        .into_iter()
        .filter(|info| info.category == category)
        .collect()
}

/// Information about a feature by its output column name.
#[must_use]
pub fn get_feature_info(config: &FeatureConfig, name: &str) -> Option<FeatureInfo> {
    available_features(config)
        .into_iter()
        .find(|info| info.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_column_order() {
        let names: Vec<String> = available_features(&FeatureConfig::default())
            .into_iter()
            .map(|info| info.name)
            .collect();
        assert_eq!(
            names,
            [
                "price",
                "volume",
                "ema_10",
                "ema_50",
                "sma_10",
                "sma_50",
                "price_sma10_ratio",
                "sma10_sma50_ratio",
                "momentum_5d",
                "momentum_21d",
                "macd",
                "macd_macd_signal",
                "vol_5d",
                "vol_21d",
                "ewm_vol_21d",
            ]
        );
    }

    #[test]
    fn test_features_by_category() {
        let config = FeatureConfig::default();
        assert_eq!(features_by_category(&config, FeatureCategory::Trend).len(), 6);
        assert_eq!(features_by_category(&config, FeatureCategory::Momentum).len(), 4);
        assert_eq!(features_by_category(&config, FeatureCategory::Volatility).len(), 3);
        assert!(features_by_category(&config, FeatureCategory::Volume).is_empty());

        let mut config = FeatureConfig::default();
        config.volume.enabled = true;
        assert_eq!(features_by_category(&config, FeatureCategory::Volume).len(), 2);
    }

    #[test]
    fn test_get_feature_info() {
        let info = get_feature_info(&FeatureConfig::default(), "sma_50").unwrap();
        assert_eq!(info.feature, Feature::Sma(50));
        assert_eq!(info.category, FeatureCategory::Trend);
        assert_eq!(info.warmup, 49);
        assert!(!info.requires_volume);

        let volume = get_feature_info(&FeatureConfig::default(), "volume").unwrap();
        assert!(volume.requires_volume);

        assert!(get_feature_info(&FeatureConfig::default(), "nonexistent").is_none());
    }
}
