#![doc(issue_tracker_base_url = "https://github.com/factordynamics/almeria/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Baseline forward-return models for almeria feature tables.
//!
//! [`prepare_ml_data`] turns a tidy feature table into a design matrix with
//! forward-return targets, and [`train_models`] fits linear regression, a
//! random forest and an MLP on a seeded split, scoring each on the held-out
//! rows.
//!
//! ```rust,no_run
//! use almeria_models::{TrainConfig, prepare_ml_data, train_models};
//!
//! # fn run(table: almeria_features::TidyFeatureTable) -> almeria_traits::Result<()> {
//! let config = TrainConfig::default();
//! let dataset = prepare_ml_data(&table, config.horizon)?;
//! let report = train_models(&dataset, &config)?;
//! for score in &report.scores {
//!     println!("{}: mse={:.6} r2={:.4}", score.name, score.mse, score.r2);
//! }
//! # Ok(())
//! # }
//! ```

pub mod dataset;
pub mod forest;
pub mod linear;
pub mod metrics;
pub mod mlp;
pub mod regressor;
pub mod scaler;
pub mod train;
pub mod tree;

pub use dataset::{Dataset, prepare_ml_data, train_test_split};
pub use forest::{ForestConfig, RandomForestRegressor};
pub use linear::LinearRegression;
pub use metrics::{mean_squared_error, r2_score};
pub use mlp::{MlpConfig, MlpRegressor};
pub use regressor::Regressor;
pub use scaler::StandardScaler;
pub use train::{ModelScore, TrainConfig, TrainingReport, train_models};
pub use tree::{DecisionTreeRegressor, TreeConfig};
