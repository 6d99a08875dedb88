//! Catalog store port (driven/secondary port)
//!
//! Persistence of catalogs, storages, files and per-host hash observations.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific and
//!   don't need domain-level classification.
//! - Catalogs, storages and files are created lazily by `upsert_file`;
//!   there is no explicit create operation.
//! - Listings of an unknown catalog are empty, never an error.

use crate::domain::{
    CatalogName, CatalogSummary, DeleteOutcome, FileEntry, FileId, FileRecord, PathPrefix,
    UpsertOutcome,
};

/// Port trait for the catalog store
#[async_trait::async_trait]
pub trait ICatalogStore: Send + Sync {
    /// Record one file observation
    ///
    /// Finds or creates the catalog, the storage for `record.host`, and the
    /// file for the normalized `record.full_name`, then writes the hash
    /// observation if its digest differs from the stored one.
    async fn upsert_file(
        &self,
        catalog: &CatalogName,
        record: &FileRecord,
    ) -> anyhow::Result<UpsertOutcome>;

    /// List one entry per (file, host) pair, ordered by file id then
    /// insertion order, optionally restricted to paths `prefix` matches
    async fn list_files(
        &self,
        catalog: &CatalogName,
        prefix: Option<&PathPrefix>,
    ) -> anyhow::Result<Vec<FileEntry>>;

    /// Delete a file of `catalog` together with its hash observations
    async fn delete_file(&self, catalog: &CatalogName, id: FileId)
        -> anyhow::Result<DeleteOutcome>;

    /// List every known catalog
    async fn list_catalogs(&self) -> anyhow::Result<Vec<CatalogSummary>>;
}
