//! Volume features.

use super::{BlockInput, FeatureBlock};
use crate::{
    config::VolumeConfig,
    feature::{Feature, FeatureCategory},
    window::{ratio, rolling_mean},
};

/// Volume block: moving average of volume and volume relative to it.
#[derive(Debug, Clone)]
pub struct VolumeFeatures {
    config: VolumeConfig,
}

impl VolumeFeatures {
    /// Create a new volume block with the given configuration.
    #[must_use]
    pub const fn new(config: VolumeConfig) -> Self {
        Self { config }
    }

    /// Get the moving average window.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.config.window
    }
}

impl Default for VolumeFeatures {
    fn default() -> Self {
        Self::new(VolumeConfig::default())
    }
}

impl FeatureBlock for VolumeFeatures {
    fn name(&self) -> &str {
        "volume"
    }

    fn category(&self) -> FeatureCategory {
        FeatureCategory::Volume
    }

    fn input(&self) -> BlockInput {
        BlockInput::Volume
    }

    fn features(&self) -> Vec<Feature> {
        vec![
            Feature::VolumeAverage(self.config.window),
            Feature::VolumeRatio(self.config.window),
        ]
    }

    fn compute_series(&self, values: &[f64]) -> Vec<(Feature, Vec<f64>)> {
        let average = rolling_mean(values, self.config.window);
        let relative = ratio(values, &average);
        vec![
            (Feature::VolumeAverage(self.config.window), average),
            (Feature::VolumeRatio(self.config.window), relative),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_window() {
        let block = VolumeFeatures::default();
        assert_eq!(block.window(), 10);
        assert_eq!(block.warmup(), 9);
        assert_eq!(block.input(), BlockInput::Volume);
    }

    #[test]
    fn test_volume_ratio() {
        let block = VolumeFeatures::new(VolumeConfig {
            enabled: true,
            window: 2,
        });
        let out = block.compute_series(&[100.0, 300.0, 100.0]);

        let (_, average) = &out[0];
        assert!(average[0].is_nan());
        assert_relative_eq!(average[1], 200.0);
        assert_relative_eq!(average[2], 200.0);

        let (_, relative) = &out[1];
        assert_relative_eq!(relative[1], 1.5);
        assert_relative_eq!(relative[2], 0.5);
    }
}
