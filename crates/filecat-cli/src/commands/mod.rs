pub mod catalog;
pub mod completions;
pub mod config;
pub mod sync;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use filecat_client::CatalogClient;
use filecat_core::config::Config;

use crate::output::{Output, OutputFormat};

/// Settings shared by every subcommand
#[derive(Debug, Clone)]
pub struct CliContext {
    pub format: OutputFormat,
    pub config_path: PathBuf,
    /// File values with command-line overrides applied
    pub config: Config,
}

impl CliContext {
    pub fn output(&self) -> Output {
        Output::new(self.format)
    }

    pub fn endpoint(&self) -> &str {
        &self.config.client.endpoint
    }

    /// Client for the configured catalog service
    pub fn client(&self) -> Result<CatalogClient> {
        CatalogClient::with_timeout(
            self.endpoint(),
            Duration::from_secs(self.config.client.timeout_secs),
        )
    }
}
