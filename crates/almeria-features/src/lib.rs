#![doc(issue_tracker_base_url = "https://github.com/factordynamics/almeria/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Feature construction for per-ticker price and volume series.
//!
//! This crate turns a price panel (and optionally a volume panel and a table
//! of ESG scores) into a tidy, model-ready feature table with one row per
//! `(date, ticker)` and a fixed column order.
//!
//! # Pipeline
//!
//! 1. [`returns`] derives log returns from prices
//! 2. [`blocks`] compute trend, momentum, volatility and volume features per
//!    ticker using the rolling and exponential statistics in [`window`]
//! 3. [`FeatureAssembler`] concatenates the blocks, drops every date with a
//!    missing value, reshapes to one row per observation and joins ESG scores
//!
//! # Examples
//!
//! ```rust,no_run
//! use almeria_features::{EsgTable, assemble};
//! use almeria_traits::Panel;
//!
//! # fn run(prices: Panel) -> almeria_traits::Result<()> {
//! let esg = EsgTable::from_pairs([("AAPL", 0.64), ("MSFT", 0.71)])?;
//! let table = assemble(&prices, None, Some(&esg))?;
//! println!("{:?}", table.column_names());
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod blocks;
pub mod config;
pub mod esg;
pub mod feature;
pub mod frame;
pub mod registry;
pub mod returns;
pub mod table;
pub mod window;

// Re-export main types
pub use assemble::{FeatureAssembler, assemble};
pub use blocks::{BlockInput, FeatureBlock};
pub use config::{FeatureConfig, MomentumConfig, TrendConfig, VolatilityConfig, VolumeConfig};
pub use esg::EsgTable;
pub use feature::{Feature, FeatureCategory, FeatureKey};
pub use frame::FeatureFrame;
pub use registry::{FeatureInfo, available_features, features_by_category, get_feature_info};
pub use returns::{forward_returns, log_returns};
pub use table::{TidyFeatureTable, TidyRow};
