//! Feature assembly: from price/volume panels to the tidy feature table.

use crate::{
    blocks::{
        BlockInput, FeatureBlock, MomentumFeatures, RawFeature, TrendFeatures,
        VolatilityFeatures, VolumeFeatures,
    },
    config::FeatureConfig,
    esg::EsgTable,
    frame::{FeatureFrame, pivot},
    returns::log_returns,
    table::TidyFeatureTable,
};
use almeria_traits::{AlmeriaError, Panel, Result};
use tracing::{debug, info};

/// Builds the tidy feature table from price and optional volume panels.
///
/// The pipeline computes every feature block, concatenates the blocks on the
/// union of their dates, drops each date that holds a missing value in any
/// column, reshapes to one row per `(date, ticker)`, left-joins ESG scores
/// and orders the columns canonically.
///
/// # Example
///
/// ```
/// use almeria_features::{FeatureAssembler, FeatureConfig};
/// use almeria_traits::{Date, Panel};
///
/// let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
/// let dates: Vec<Date> = start.iter_days().take(80).collect();
/// let prices: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
/// let panel = Panel::new(dates, vec!["AAA".to_string()], vec![prices]).unwrap();
///
/// let assembler = FeatureAssembler::new(FeatureConfig::default()).unwrap();
/// let table = assembler.assemble(&panel, None, None).unwrap();
/// assert_eq!(table.len(), 31);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureAssembler {
    pub(crate) config: FeatureConfig,
}

impl FeatureAssembler {
    /// Create an assembler after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::InvalidData`] if the configuration is invalid.
    pub fn new(config: FeatureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Every block the configuration enables, raw blocks first.
    ///
    /// Volume blocks are listed even though they only run when a volume
    /// panel is supplied.
    #[must_use]
    pub fn blocks(&self) -> Vec<Box<dyn FeatureBlock>> {
        let mut blocks: Vec<Box<dyn FeatureBlock>> = vec![
            Box::new(RawFeature::price()),
            Box::new(RawFeature::volume()),
            Box::new(TrendFeatures::new(self.config.trend.clone())),
            Box::new(MomentumFeatures::new(self.config.momentum.clone())),
            Box::new(VolatilityFeatures::new(self.config.volatility.clone())),
        ];
        if self.config.volume.enabled {
            blocks.push(Box::new(VolumeFeatures::new(self.config.volume.clone())));
        }
        blocks
    }

    /// Compute and concatenate every applicable block into one wide frame.
    ///
    /// No rows are dropped yet.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::ShapeMismatch`] if the volume panel holds a
    /// ticker absent from the price panel.
    pub fn feature_frame(&self, prices: &Panel, volume: Option<&Panel>) -> Result<FeatureFrame> {
        if let Some(volume) = volume
            && let Some(extra) = volume
                .tickers()
                .iter()
                .find(|t| prices.column(t.as_str()).is_none())
        {
            return Err(AlmeriaError::ShapeMismatch(format!(
                "volume ticker '{extra}' has no price column"
            )));
        }

        let returns = log_returns(prices);
        let mut frames = Vec::new();
        for block in self.blocks() {
            let input = match block.input() {
                BlockInput::Prices => prices,
                BlockInput::Returns => &returns,
                BlockInput::Volume => match volume {
                    Some(volume) => volume,
                    None => {
                        debug!(block = block.name(), "no volume panel, skipping block");
                        continue;
                    }
                },
            };
            frames.push(block.compute(input)?);
        }

        FeatureFrame::concat(frames)
    }

    /// Assemble the tidy feature table.
    ///
    /// An empty table is a valid result: it means no date had a complete
    /// set of features.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::ShapeMismatch`] if the volume panel holds a
    /// ticker absent from the price panel.
    pub fn assemble(
        &self,
        prices: &Panel,
        volume: Option<&Panel>,
        esg: Option<&EsgTable>,
    ) -> Result<TidyFeatureTable> {
        let wide = self.feature_frame(prices, volume)?;
        let complete = wide.drop_incomplete_rows();
        debug!(
            rows = wide.len(),
            complete_rows = complete.len(),
            columns = wide.width(),
            "dropped incomplete rows"
        );

        let features = complete.features().into_iter().collect();
        let table = TidyFeatureTable::from_pivot(features, pivot(complete.melt()), esg);
        info!(
            tickers = prices.n_tickers(),
            rows = table.len(),
            features = table.features().len(),
            esg = table.has_esg(),
            "assembled feature table"
        );
        Ok(table)
    }
}

/// Assemble the tidy feature table with the default configuration.
///
/// # Errors
///
/// See [`FeatureAssembler::assemble`].
pub fn assemble(
    prices: &Panel,
    volume: Option<&Panel>,
    esg: Option<&EsgTable>,
) -> Result<TidyFeatureTable> {
    FeatureAssembler::default().assemble(prices, volume, esg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::Feature;
    use almeria_traits::Date;

    fn dates(n: usize) -> Vec<Date> {
        let start = Date::from_ymd_opt(2023, 1, 2).unwrap();
        start.iter_days().take(n).collect()
    }

    fn panel(tickers: &[&str], n: usize) -> Panel {
        let columns = tickers
            .iter()
            .enumerate()
            .map(|(k, _)| (0..n).map(|i| 50.0 + (k * 10 + i) as f64).collect())
            .collect();
        Panel::new(
            dates(n),
            tickers.iter().map(|t| t.to_string()).collect(),
            columns,
        )
        .unwrap()
    }

    #[test]
    fn test_blocks_follow_config() {
        let assembler = FeatureAssembler::default();
        assert_eq!(assembler.blocks().len(), 5);

        let mut config = FeatureConfig::default();
        config.volume.enabled = true;
        let assembler = FeatureAssembler::new(config).unwrap();
        assert_eq!(assembler.blocks().len(), 6);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = FeatureConfig::default();
        config.trend.ratio_fast = 60;
        assert!(FeatureAssembler::new(config).is_err());
    }

    #[test]
    fn test_volume_ticker_without_price_is_error() {
        let prices = panel(&["A"], 60);
        let volume = panel(&["A", "Z"], 60);
        let err = assemble(&prices, Some(&volume), None).unwrap_err();
        assert!(matches!(err, AlmeriaError::ShapeMismatch(_)));
    }

    #[test]
    fn test_frame_width_without_volume() {
        let prices = panel(&["A", "B"], 60);
        let frame = FeatureAssembler::default()
            .feature_frame(&prices, None)
            .unwrap();
        // price + 6 trend + 4 momentum + 3 volatility per ticker
        assert_eq!(frame.width(), 2 * 14);
        assert_eq!(frame.len(), 60);
    }

    #[test]
    fn test_warmup_rows_are_dropped() {
        let prices = panel(&["A", "B"], 60);
        let table = assemble(&prices, None, None).unwrap();
        // sma_50 is the slowest feature: first defined at row 49
        assert_eq!(table.dates().len(), 11);
        assert_eq!(table.len(), 22);
        assert_eq!(table.features().len(), 14);
    }

    #[test]
    fn test_volume_block_enabled() {
        let prices = panel(&["A"], 60);
        let volume = panel(&["A"], 60);
        let mut config = FeatureConfig::default();
        config.volume.enabled = true;
        let table = FeatureAssembler::new(config)
            .unwrap()
            .assemble(&prices, Some(&volume), None)
            .unwrap();
        assert_eq!(
            table.features()[..4],
            [
                Feature::Price,
                Feature::Volume,
                Feature::VolumeAverage(10),
                Feature::VolumeRatio(10)
            ]
        );
    }

    #[test]
    fn test_too_short_history_gives_empty_table() {
        let prices = panel(&["A"], 30);
        let table = assemble(&prices, None, None).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.features().len(), 14);
    }
}
