#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/almeria/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! ## Crate Organization
//!
//! - [`traits`] - Panels, dates, errors and shared statistics
//! - [`features`] - The feature pipeline and tidy feature table
//! - [`data`] - Market data download and CSV persistence
//! - [`models`] - Baseline regressors and training
//!
//! ## Pipeline
//!
//! 1. **Acquisition** downloads adjusted prices and volume into aligned panels
//! 2. **Features** derive returns and windowed statistics per ticker
//! 3. **Assembly** reshapes the features into one row per `(date, ticker)`
//!    and joins ESG scores
//! 4. **Models** predict forward returns from the assembled table

/// Version information for the almeria crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Types
// ============================================================================

/// Panels, dates, errors and shared statistics.
pub mod traits {
    pub use almeria_traits::*;
}

pub use almeria_traits::types::{Date, Panel, Ticker};
pub use almeria_traits::{AlmeriaError, Result};

// ============================================================================
// Features
// ============================================================================

/// Feature construction.
///
/// Features are computed per ticker in blocks:
///
/// - **Trend**: EMA and SMA levels, price/SMA and fast/slow SMA ratios
/// - **Momentum**: percentage change over fixed horizons, MACD and its signal
/// - **Volatility**: rolling and exponentially weighted standard deviation of
///   log returns
/// - **Volume**: volume moving average and volume ratio (disabled by default)
///
/// # Example
///
/// ```ignore
/// use almeria::features::{FeatureAssembler, FeatureConfig};
///
/// let mut config = FeatureConfig::default();
/// config.volume.enabled = true;
/// let table = FeatureAssembler::new(config)?.assemble(&prices, Some(&volume), None)?;
/// ```
pub mod features {
    pub use almeria_features::*;
}

pub use almeria_features::{
    EsgTable, Feature, FeatureAssembler, FeatureConfig, TidyFeatureTable, assemble,
};

// ============================================================================
// Data
// ============================================================================

/// Market data acquisition and CSV persistence.
///
/// Set `YAHOO_CHART_URL` in the environment or a `.env` file to point the
/// client at another chart endpoint.
pub mod data {
    pub use almeria_data::*;
}

// ============================================================================
// Models
// ============================================================================

/// Baseline forward-return models.
pub mod models {
    pub use almeria_models::*;
}

pub use almeria_models::{TrainConfig, TrainingReport, prepare_ml_data, train_models};

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use almeria::prelude::*;
/// ```
pub mod prelude {
    pub use crate::models::Regressor;
    pub use crate::{AlmeriaError, Date, Panel, Result, Ticker};
    pub use crate::{EsgTable, Feature, FeatureAssembler, FeatureConfig, TidyFeatureTable, assemble};
    pub use crate::{TrainConfig, TrainingReport, prepare_ml_data, train_models};
}
