//! CLI command implementations.

use almanac_lib::prelude::*;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) mod eia;
pub(crate) mod fred;
pub(crate) mod info;
pub(crate) mod list;
pub(crate) mod yahoo;

/// Flags shared by every command.
#[derive(Debug, Clone, Default)]
pub(crate) struct Options {
    /// Explicit `.env` file.
    pub(crate) env_file: Option<PathBuf>,
    /// Suppress progress output and summaries.
    pub(crate) quiet: bool,
}

impl Options {
    /// Loads API keys from the environment and the configured `.env` file.
    pub(crate) fn credentials(&self) -> Result<Credentials> {
        Credentials::load(self.env_file.as_deref()).context("Failed to load API keys")
    }
}
