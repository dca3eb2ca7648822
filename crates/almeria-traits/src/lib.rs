#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/almeria/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core type definitions for the almeria feature pipeline.
//!
//! This crate provides the foundational pieces every other crate builds on:
//! the error type, the date-indexed [`Panel`] and a handful of statistics.

/// The version of the almeria-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod stats;
pub mod types;

// Re-exports
pub use error::{AlmeriaError, Result};
pub use types::{Date, Panel, Ticker};
