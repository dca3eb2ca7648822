//! Feature blocks.
//!
//! A block is a named group of derived columns computed from one input panel
//! (prices, log returns or volume). Each block works column by column, so a
//! ticker's features never depend on another ticker.
//!
//! - [`RawFeature`]: price or volume passed through unchanged
//! - [`TrendFeatures`]: moving averages of price and their ratios
//! - [`MomentumFeatures`]: percentage changes and MACD
//! - [`VolatilityFeatures`]: rolling and exponentially weighted volatility
//! - [`VolumeFeatures`]: volume relative to its moving average

mod momentum;
mod raw;
mod trend;
mod volatility;
mod volume;

pub use momentum::MomentumFeatures;
pub use raw::RawFeature;
pub use trend::TrendFeatures;
pub use volatility::VolatilityFeatures;
pub use volume::VolumeFeatures;

use crate::{
    feature::{Feature, FeatureCategory, FeatureKey},
    frame::FeatureFrame,
};
use almeria_traits::{Panel, Result};
use std::fmt::Debug;

/// Panel a block is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockInput {
    /// Adjusted prices
    Prices,
    /// Log returns of adjusted prices
    Returns,
    /// Traded volume
    Volume,
}

/// A group of features computed from one input panel.
///
/// Implementors only describe how to turn a single column into feature
/// columns; [`FeatureBlock::compute`] applies that to every ticker.
pub trait FeatureBlock: Send + Sync + Debug {
    /// Returns the name of this block.
    fn name(&self) -> &str;

    /// Category shared by the block's features.
    fn category(&self) -> FeatureCategory;

    /// Panel the block reads.
    fn input(&self) -> BlockInput;

    /// Features emitted for every ticker, in emission order.
    fn features(&self) -> Vec<Feature>;

    /// Leading rows, relative to the price index, for which at least one of
    /// the block's features is undefined.
    fn warmup(&self) -> usize {
        self.features()
            .iter()
            .map(Feature::warmup)
            .max()
            .unwrap_or(0)
    }

    /// Compute the block's features for a single input column.
    ///
    /// Every returned column has the same length as `values`.
    fn compute_series(&self, values: &[f64]) -> Vec<(Feature, Vec<f64>)>;

    /// Compute the block for every ticker of `input`.
    ///
    /// # Errors
    ///
    /// Returns an error if a computed column does not match the input index.
    fn compute(&self, input: &Panel) -> Result<FeatureFrame> {
        let mut frame = FeatureFrame::new(input.dates().to_vec());
        for (ticker, values) in input.iter() {
            for (feature, column) in self.compute_series(values) {
                frame.push(FeatureKey::new(ticker.clone(), feature), column)?;
            }
        }
        tracing::debug!(
            block = self.name(),
            columns = frame.width(),
            rows = frame.len(),
            "computed feature block"
        );
        Ok(frame)
    }
}
