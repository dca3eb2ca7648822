//! Raw price and volume levels.

use super::{BlockInput, FeatureBlock};
use crate::feature::{Feature, FeatureCategory};

/// Passes an input panel through as a single feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFeature {
    feature: Feature,
}

impl RawFeature {
    /// Raw adjusted price.
    #[must_use]
    pub const fn price() -> Self {
        Self {
            feature: Feature::Price,
        }
    }

    /// Raw traded volume.
    #[must_use]
    pub const fn volume() -> Self {
        Self {
            feature: Feature::Volume,
        }
    }
}

impl FeatureBlock for RawFeature {
    fn name(&self) -> &str {
        match self.feature {
            Feature::Volume => "raw_volume",
            _ => "raw_price",
        }
    }

    fn category(&self) -> FeatureCategory {
        FeatureCategory::Raw
    }

    fn input(&self) -> BlockInput {
        match self.feature {
            Feature::Volume => BlockInput::Volume,
            _ => BlockInput::Prices,
        }
    }

    fn features(&self) -> Vec<Feature> {
        vec![self.feature]
    }

    fn compute_series(&self, values: &[f64]) -> Vec<(Feature, Vec<f64>)> {
        vec![(self.feature, values.to_vec())]
    }
}
