//! Catalog query commands
//!
//! Thin views over the catalog service: list catalogs and files, show the
//! three classification views, and delete a file record.

use anyhow::Result;
use clap::Args;
use tracing::info;

use filecat_core::domain::{DeleteOutcome, FileId};

use super::CliContext;
use crate::output;

/// `filecat catalogs`
#[derive(Debug, Args)]
pub struct CatalogsCommand {}

impl CatalogsCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let catalogs = ctx.client()?.get_catalogs().await?;
        ctx.output()
            .view(&catalogs, || output::catalogs(&catalogs))
    }
}

/// `filecat files <catalog> [--path prefix]`
#[derive(Debug, Args)]
pub struct FilesCommand {
    /// Catalog name
    pub catalog: String,

    /// Only files whose catalog path starts with this prefix
    #[arg(long)]
    pub path: Option<String>,
}

impl FilesCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let files = ctx
            .client()?
            .get_files(&self.catalog, self.path.as_deref())
            .await?;
        ctx.output()
            .view(&files, || output::entries(&files, "record"))
    }
}

/// Which classification view to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Differences,
    Duplicates,
    Singletons,
}

/// `filecat differences|duplicates|singletons <catalog>`
#[derive(Debug, Args)]
pub struct ViewCommand {
    /// Catalog name
    pub catalog: String,
}

impl ViewCommand {
    pub async fn execute(&self, view: View, ctx: &CliContext) -> Result<()> {
        let out = ctx.output();
        let client = ctx.client()?;
        info!(catalog = %self.catalog, ?view, "Fetching classification view");

        match view {
            View::Differences => {
                let files = client.get_differences(&self.catalog).await?;
                out.view(&files, || output::comparisons(&files, "difference"))
            }
            View::Duplicates => {
                let files = client.get_duplicates(&self.catalog).await?;
                out.view(&files, || output::comparisons(&files, "duplicate"))
            }
            View::Singletons => {
                let files = client.get_singletons(&self.catalog).await?;
                out.view(&files, || output::entries(&files, "singleton"))
            }
        }
    }
}

/// `filecat delete <catalog> <id>`
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Catalog name
    pub catalog: String,

    /// File id, as shown by `filecat files`
    pub id: FileId,
}

impl DeleteCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let out = ctx.output();
        let outcome = ctx.client()?.delete_file(&self.catalog, self.id).await?;

        if out.is_json() {
            return out.json(&serde_json::json!({
                "catalog": self.catalog,
                "id": self.id,
                "deleted": outcome == DeleteOutcome::Deleted,
            }));
        }

        match outcome {
            DeleteOutcome::Deleted => {
                out.success(format!("Deleted file {} from {}", self.id, self.catalog))
            }
            DeleteOutcome::NotFound => {
                out.warn(format!("File {} not found in {}", self.id, self.catalog))
            }
        }
        Ok(())
    }
}
