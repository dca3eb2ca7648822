//! CLI subcommand modules.
//!
//! This module contains the implementations for all almeria CLI subcommands.

pub(crate) mod download;
pub(crate) mod features;
pub(crate) mod list;
pub(crate) mod sample_esg;
pub(crate) mod train;
