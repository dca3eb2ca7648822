//! Window configuration for every feature block.
//!
//! All structs deserialize with `#[serde(default)]`, so a configuration file
//! only needs to list the values it overrides.

use almeria_traits::{AlmeriaError, Result};
use serde::{Deserialize, Serialize};

/// Configuration of the volatility block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityConfig {
    /// Rolling windows over log returns (default: 5 and 21 observations)
    pub windows: Vec<usize>,

    /// Span of the exponentially weighted volatility (default: 21)
    pub ewm_span: usize,
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            windows: vec![5, 21],
            ewm_span: 21,
        }
    }
}

/// Configuration of the momentum block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    /// Percentage-change horizons (default: 5 and 21 observations)
    pub windows: Vec<usize>,

    /// Span of the fast MACD EMA (default: 12)
    pub macd_fast: usize,

    /// Span of the slow MACD EMA (default: 26)
    pub macd_slow: usize,

    /// Span of the MACD signal EMA (default: 9)
    pub macd_signal: usize,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            windows: vec![5, 21],
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

/// Configuration of the trend block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Simple moving average windows (default: 10 and 50)
    pub sma_windows: Vec<usize>,

    /// Exponential moving average spans (default: 10 and 50)
    pub ema_spans: Vec<usize>,

    /// Fast SMA window used by both ratios (default: 10)
    pub ratio_fast: usize,

    /// Slow SMA window of the SMA ratio (default: 50)
    pub ratio_slow: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            sma_windows: vec![10, 50],
            ema_spans: vec![10, 50],
            ratio_fast: 10,
            ratio_slow: 50,
        }
    }
}

/// Configuration of the volume block.
///
/// Volume averages and ratios are not part of the default output contract,
/// so the block is disabled unless `enabled` is set. Raw volume is always
/// included when a volume panel is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Whether to emit `vol_avg_*` and `vol_ratio_*` columns (default: false)
    pub enabled: bool,

    /// Moving average window (default: 10)
    pub window: usize,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            window: 10,
        }
    }
}

/// Configuration of the whole feature pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Volatility block settings
    pub volatility: VolatilityConfig,
    /// Momentum block settings
    pub momentum: MomentumConfig,
    /// Trend block settings
    pub trend: TrendConfig,
    /// Volume block settings
    pub volume: VolumeConfig,
}

impl FeatureConfig {
    /// Check that every window is positive and unique within its list, and
    /// that fast/slow pairs are ordered.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::InvalidData`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        check_windows("volatility.windows", &self.volatility.windows)?;
        check_positive("volatility.ewm_span", self.volatility.ewm_span)?;

        check_windows("momentum.windows", &self.momentum.windows)?;
        check_positive("momentum.macd_fast", self.momentum.macd_fast)?;
        check_positive("momentum.macd_signal", self.momentum.macd_signal)?;
        check_ordered(
            "momentum.macd_fast",
            self.momentum.macd_fast,
            "momentum.macd_slow",
            self.momentum.macd_slow,
        )?;

        check_windows("trend.sma_windows", &self.trend.sma_windows)?;
        check_windows("trend.ema_spans", &self.trend.ema_spans)?;
        check_positive("trend.ratio_fast", self.trend.ratio_fast)?;
        check_ordered(
            "trend.ratio_fast",
            self.trend.ratio_fast,
            "trend.ratio_slow",
            self.trend.ratio_slow,
        )?;

        check_positive("volume.window", self.volume.window)?;
        Ok(())
    }
}

fn check_positive(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(AlmeriaError::InvalidData(format!("{name} must be positive")));
    }
    Ok(())
}

fn check_windows(name: &str, windows: &[usize]) -> Result<()> {
    for (i, &w) in windows.iter().enumerate() {
        check_positive(name, w)?;
        if windows[..i].contains(&w) {
            return Err(AlmeriaError::InvalidData(format!(
                "{name} lists window {w} twice"
            )));
        }
    }
    Ok(())
}

fn check_ordered(fast_name: &str, fast: usize, slow_name: &str, slow: usize) -> Result<()> {
    if fast >= slow {
        return Err(AlmeriaError::InvalidData(format!(
            "{fast_name} ({fast}) must be smaller than {slow_name} ({slow})"
        )));
    }
    Ok(())
}
