//! Error types for data acquisition and persistence.

use almeria_traits::AlmeriaError;
use polars::error::PolarsError;
use thiserror::Error;

/// Errors that can occur while fetching or persisting market data.
#[derive(Debug, Error)]
pub enum DataError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// The chart API returned an error.
    #[error("Chart API error: {0}")]
    Api(String),

    /// No data available.
    #[error("No data available for {0}")]
    NoData(String),

    /// Polars failed to read or write a file.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// File system error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Panel or table invariant violated.
    #[error(transparent)]
    Core(#[from] AlmeriaError),
}
