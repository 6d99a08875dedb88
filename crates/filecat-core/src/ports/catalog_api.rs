//! Catalog API port (driven/secondary port, client side)
//!
//! What the sync driver needs from a remote catalog service: the known
//! records under a path, and batch submission of new observations.

use crate::domain::{CatalogName, FileEntry, FileRecord, RelativePath};

/// Port trait for a remote catalog
#[async_trait::async_trait]
pub trait ICatalogApi: Send + Sync {
    /// Fetch the entries of `catalog` whose path starts with `prefix`
    async fn find_files(
        &self,
        catalog: &CatalogName,
        prefix: Option<&RelativePath>,
    ) -> anyhow::Result<Vec<FileEntry>>;

    /// Submit a batch of observations
    async fn upsert_files(&self, catalog: &CatalogName, records: &[FileRecord])
        -> anyhow::Result<()>;
}
