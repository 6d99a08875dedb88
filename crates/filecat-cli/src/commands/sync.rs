//! Sync command - Catalogue a local directory
//!
//! Provides the `filecat sync <catalog> <dir>` CLI command which:
//! 1. Builds a catalog client from configuration
//! 2. Runs one `SyncDriver` pass over the directory
//! 3. Displays the resulting `SyncReport`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use filecat_core::domain::CatalogName;
use filecat_sync::SyncDriver;

use super::CliContext;
use crate::output;

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Catalog to record the files in
    pub catalog: String,

    /// Directory to scan
    pub directory: PathBuf,

    /// Hash changed files but upload nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Host name to report (overrides client.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Records per upload (overrides client.batch_size)
    #[arg(long)]
    pub batch_size: Option<usize>,
}

impl SyncCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let out = ctx.output();
        let catalog = CatalogName::new(&self.catalog)?;
        let client = ctx.client()?;

        let mut driver = SyncDriver::new(Arc::new(client))
            .with_batch_size(self.batch_size.unwrap_or(ctx.config.client.batch_size))
            .with_dry_run(self.dry_run);
        if let Some(host) = self.host.as_ref().or(ctx.config.client.host.as_ref()) {
            driver = driver.with_host(host.clone());
        }

        info!(
            catalog = %catalog,
            directory = %self.directory.display(),
            endpoint = ctx.endpoint(),
            host = driver.host(),
            "Starting sync"
        );
        if self.dry_run {
            out.detail("Dry run mode - nothing will be uploaded");
        }

        let report = driver
            .run(&catalog, &self.directory)
            .await
            .with_context(|| format!("Sync of {} failed", self.directory.display()))?;

        out.view(&report, || output::sync_report(&report, self.dry_run))
    }
}
