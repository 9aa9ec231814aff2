//! CLI command handlers.

pub mod config;
pub mod link;
pub mod tokenize;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use entlink_config::LoadedConfig;
use tracing::warn;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Explicit config file, bypassing discovery.
    pub config_path: Option<PathBuf>,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Load the configuration, logging any discovered file that was skipped.
    pub fn load_config(&self) -> Result<LoadedConfig> {
        let loaded = entlink_config::load_config(self.config_path.as_deref())
            .context("failed to load configuration")?;
        for (path, reason) in loaded.skipped() {
            warn!(path = %path.display(), %reason, "Config file skipped");
        }
        Ok(loaded)
    }
}
