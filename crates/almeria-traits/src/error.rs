//! Error types for the almeria workspace.
//!
//! This module defines the error type shared by the feature pipeline and the
//! modeling layer. Missing values are never errors; they flow through the
//! computations as `NaN` and are resolved by the row-drop policy.

use thiserror::Error;

/// The main error type for almeria operations.
#[derive(Debug, Error)]
pub enum AlmeriaError {
    /// Two tables could not be aligned, or a table violates its shape invariant.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when a required column is missing from the data.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Error when data is insufficient for the requested operation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Error when a date is out of range or invalid.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Error raised while fitting or applying a model.
    #[error("Model error: {0}")]
    Model(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for AlmeriaError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for AlmeriaError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for almeria operations.
pub type Result<T> = std::result::Result<T, AlmeriaError>;
