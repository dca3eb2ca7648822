//! Configuration file loading for the almeria CLI.

use almeria_data::{DownloadConfig, Interval};
use almeria_features::FeatureConfig;
use almeria_models::TrainConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings of every subcommand, each section optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// `[download]`
    pub(crate) download: DownloadConfig,
    /// `[features]`
    pub(crate) features: FeatureConfig,
    /// `[train]`
    pub(crate) train: TrainConfig,
}

impl Settings {
    /// Read settings from a TOML file, or use the defaults without one.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let settings: Self =
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        settings.features.validate()?;
        settings.train.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(settings)
    }
}

/// Parse an interval argument such as `1d`.
pub(crate) fn parse_interval(value: &str) -> Result<Interval, String> {
    Interval::parse(value).ok_or_else(|| format!("unknown interval '{value}', expected 1d, 1wk or 1mo"))
}
