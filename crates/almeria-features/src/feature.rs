//! Feature identifiers.
//!
//! Every derived column is keyed by a [`FeatureKey`], a structured
//! `(ticker, feature)` pair. Nothing in the pipeline fuses the two into a
//! delimited string, so tickers containing `_` are handled like any other.

use almeria_traits::{AlmeriaError, Ticker};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Feature category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureCategory {
    /// Raw price and volume levels
    Raw,
    /// Volume averages and ratios
    Volume,
    /// Moving averages and their ratios
    Trend,
    /// Percentage changes and MACD
    Momentum,
    /// Rolling and exponentially weighted return volatility
    Volatility,
}

impl FeatureCategory {
    /// Get a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &str {
        match self {
            Self::Raw => "Raw adjusted price and traded volume",
            Self::Volume => "Volume relative to its recent average",
            Self::Trend => "Simple and exponential moving averages of price",
            Self::Momentum => "Price changes over fixed horizons and MACD",
            Self::Volatility => "Standard deviation of log returns",
        }
    }
}

/// A single engineered feature, parametrized by its window or span.
///
/// The declaration order of the variants is the canonical output order, so
/// sorting features with [`Ord`] yields the column order of the tidy table.
/// Within a variant, smaller windows sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Adjusted price level.
    Price,
    /// Traded volume.
    Volume,
    /// Simple moving average of volume over the window.
    VolumeAverage(usize),
    /// Volume divided by its simple moving average.
    VolumeRatio(usize),
    /// Exponential moving average of price with the given span.
    Ema(usize),
    /// Simple moving average of price over the window.
    Sma(usize),
    /// Price divided by its simple moving average.
    PriceSmaRatio(usize),
    /// Fast simple moving average divided by slow simple moving average.
    SmaRatio {
        /// Fast window
        fast: usize,
        /// Slow window
        slow: usize,
    },
    /// Percentage change of price over the window.
    Momentum(usize),
    /// Fast EMA minus slow EMA of price.
    Macd,
    /// EMA of the MACD line.
    MacdSignal,
    /// Rolling sample standard deviation of log returns.
    Volatility(usize),
    /// Exponentially weighted standard deviation of log returns.
    EwmVolatility(usize),
}

impl Feature {
    /// Output column name of the feature, e.g. `vol_5d` or `sma10_sma50_ratio`.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Price => "price".to_string(),
            Self::Volume => "volume".to_string(),
            Self::VolumeAverage(w) => format!("vol_avg_{w}d"),
            Self::VolumeRatio(w) => format!("vol_ratio_{w}d"),
            Self::Ema(span) => format!("ema_{span}"),
            Self::Sma(w) => format!("sma_{w}"),
            Self::PriceSmaRatio(w) => format!("price_sma{w}_ratio"),
            Self::SmaRatio { fast, slow } => format!("sma{fast}_sma{slow}_ratio"),
            Self::Momentum(w) => format!("momentum_{w}d"),
            Self::Macd => "macd".to_string(),
            Self::MacdSignal => "macd_macd_signal".to_string(),
            Self::Volatility(w) => format!("vol_{w}d"),
            Self::EwmVolatility(span) => format!("ewm_vol_{span}d"),
        }
    }

    /// Category of the feature.
    #[must_use]
    pub const fn category(&self) -> FeatureCategory {
        match self {
            Self::Price | Self::Volume => FeatureCategory::Raw,
            Self::VolumeAverage(_) | Self::VolumeRatio(_) => FeatureCategory::Volume,
            Self::Ema(_) | Self::Sma(_) | Self::PriceSmaRatio(_) | Self::SmaRatio { .. } => {
                FeatureCategory::Trend
            }
            Self::Momentum(_) | Self::Macd | Self::MacdSignal => FeatureCategory::Momentum,
            Self::Volatility(_) | Self::EwmVolatility(_) => FeatureCategory::Volatility,
        }
    }

    /// Short description of the feature.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Price => "Adjusted price",
            Self::Volume => "Traded volume",
            Self::VolumeAverage(_) => "Simple moving average of volume",
            Self::VolumeRatio(_) => "Volume relative to its moving average",
            Self::Ema(_) => "Exponential moving average of price",
            Self::Sma(_) => "Simple moving average of price",
            Self::PriceSmaRatio(_) => "Price relative to its simple moving average",
            Self::SmaRatio { .. } => "Fast over slow simple moving average",
            Self::Momentum(_) => "Percentage change of price",
            Self::Macd => "Fast EMA minus slow EMA of price",
            Self::MacdSignal => "EMA of the MACD line",
            Self::Volatility(_) => "Rolling standard deviation of log returns",
            Self::EwmVolatility(_) => "Exponentially weighted standard deviation of log returns",
        }
    }

    /// Number of leading rows for which the feature is undefined on a
    /// gap-free panel.
    #[must_use]
    pub const fn warmup(&self) -> usize {
        match self {
            Self::Price | Self::Volume | Self::Ema(_) | Self::Macd | Self::MacdSignal => 0,
            Self::VolumeAverage(w) | Self::VolumeRatio(w) | Self::Sma(w) | Self::PriceSmaRatio(w) => {
                w.saturating_sub(1)
            }
            Self::SmaRatio { fast, slow } => {
                let longest = if *fast > *slow { *fast } else { *slow };
                longest.saturating_sub(1)
            }
            // Percent change looks back w rows
            Self::Momentum(w) => *w,
            // Window of w returns, which start at row 1
            Self::Volatility(w) => *w,
            // Needs two returns, which start at row 1
            Self::EwmVolatility(_) => 2,
        }
    }

    /// Whether the feature is derived from the volume panel.
    #[must_use]
    pub const fn requires_volume(&self) -> bool {
        matches!(
            self,
            Self::Volume | Self::VolumeAverage(_) | Self::VolumeRatio(_)
        )
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Feature {
    type Err = AlmeriaError;

    /// Parse an output column name back into a feature.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let window = |digits: &str| digits.parse::<usize>().ok().filter(|w| *w > 0);
        let between = |prefix: &str, suffix: &str| {
            name.strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(suffix))
                .and_then(window)
        };

        let feature = match name {
            "price" => Some(Self::Price),
            "volume" => Some(Self::Volume),
            "macd" => Some(Self::Macd),
            "macd_macd_signal" => Some(Self::MacdSignal),
            _ => between("vol_avg_", "d")
                .map(Self::VolumeAverage)
                .or_else(|| between("vol_ratio_", "d").map(Self::VolumeRatio))
                .or_else(|| between("ewm_vol_", "d").map(Self::EwmVolatility))
                .or_else(|| between("vol_", "d").map(Self::Volatility))
                .or_else(|| between("momentum_", "d").map(Self::Momentum))
                .or_else(|| between("ema_", "").map(Self::Ema))
                .or_else(|| between("sma_", "").map(Self::Sma))
                .or_else(|| between("price_sma", "_ratio").map(Self::PriceSmaRatio))
                .or_else(|| {
                    let (fast, slow) = name
                        .strip_prefix("sma")?
                        .strip_suffix("_ratio")?
                        .split_once("_sma")?;
                    Some(Self::SmaRatio {
                        fast: window(fast)?,
                        slow: window(slow)?,
                    })
                }),
        };

        feature.ok_or_else(|| AlmeriaError::InvalidData(format!("unknown feature column '{name}'")))
    }
}

/// Structured `(ticker, feature)` identifier of a derived column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureKey {
    /// Ticker the column belongs to
    pub ticker: Ticker,
    /// Feature the column holds
    pub feature: Feature,
}

impl FeatureKey {
    /// Create a new key.
    #[must_use]
    pub fn new(ticker: impl Into<Ticker>, feature: Feature) -> Self {
        Self {
            ticker: ticker.into(),
            feature,
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ticker, self.feature)
    }
}
