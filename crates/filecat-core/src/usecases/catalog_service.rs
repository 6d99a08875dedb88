//! Catalog service use case
//!
//! Entry point for every boundary operation of the catalog: it validates
//! wire input into domain values, drives the store, and derives the
//! classification views from the store's current listing.
//!
//! Queries against a name that cannot name a catalog (blank) answer with
//! empty results, same as a catalog that does not exist yet. Upsert and
//! delete reject such names with a [`DomainError`].

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{
    domain::{
        BatchSummary, CatalogClassification, CatalogName, CatalogSummary, ContentHash,
        DeleteOutcome, DomainError, FileComparison, FileEntry, FileId, FileRecord, PathPrefix,
        RelativePath,
    },
    ports::ICatalogStore,
};

/// Coordinates catalog reads and writes over an [`ICatalogStore`]
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn ICatalogStore>,
}

impl CatalogService {
    /// Creates a service backed by `store`
    pub fn new(store: Arc<dyn ICatalogStore>) -> Self {
        Self { store }
    }

    /// Applies a batch of observations in order
    ///
    /// Each record is validated and upserted on its own; a failing record
    /// stops the batch and earlier records stay applied.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] (reachable via `downcast_ref`) for invalid
    /// input, or the store's error.
    pub async fn upsert_batch(&self, catalog: &str, records: &[FileRecord]) -> Result<BatchSummary> {
        let catalog = CatalogName::new(catalog)?;
        let mut summary = BatchSummary::default();

        for (index, record) in records.iter().enumerate() {
            let record = normalize_record(record)?;
            let outcome = self
                .store
                .upsert_file(&catalog, &record)
                .await
                .with_context(|| format!("Failed to upsert record {index} ({})", record.full_name))?;

            debug!(
                catalog = %catalog,
                host = %record.host,
                path = %record.full_name,
                outcome = ?outcome,
                "Applied file observation"
            );
            summary.record(outcome);
        }

        info!(
            catalog = %catalog,
            created = summary.created,
            updated = summary.updated,
            unchanged = summary.unchanged,
            "Upsert batch applied"
        );

        Ok(summary)
    }

    /// Lists one entry per (file, host), optionally under a path prefix
    ///
    /// A prefix that normalizes to nothing (`""`, `"./"`) means no filter.
    /// A trailing separator is significant: `dir/` excludes `dirty`.
    pub async fn files(&self, catalog: &str, prefix: Option<&str>) -> Result<Vec<FileEntry>> {
        let Some(catalog) = query_name(catalog) else {
            return Ok(Vec::new());
        };
        let prefix = prefix.and_then(PathPrefix::new);

        self.store.list_files(&catalog, prefix.as_ref()).await
    }

    /// Files whose hosts disagree on the digest
    pub async fn differences(&self, catalog: &str) -> Result<Vec<FileComparison>> {
        Ok(self.classify(catalog).await?.differences)
    }

    /// Files seen on two or more hosts, all with the same digest
    pub async fn duplicates(&self, catalog: &str) -> Result<Vec<FileComparison>> {
        Ok(self.classify(catalog).await?.duplicates)
    }

    /// Files seen on exactly one host
    pub async fn singletons(&self, catalog: &str) -> Result<Vec<FileEntry>> {
        Ok(self.classify(catalog).await?.singletons)
    }

    /// All three views from a single listing
    pub async fn classify(&self, catalog: &str) -> Result<CatalogClassification> {
        let entries = self.files(catalog, None).await?;
        Ok(CatalogClassification::from_entries(entries))
    }

    /// Every known catalog
    pub async fn catalogs(&self) -> Result<Vec<CatalogSummary>> {
        self.store.list_catalogs().await
    }

    /// Deletes a file of `catalog` by id
    pub async fn delete(&self, catalog: &str, id: FileId) -> Result<DeleteOutcome> {
        let catalog = CatalogName::new(catalog)?;
        let outcome = self.store.delete_file(&catalog, id).await?;

        info!(catalog = %catalog, file_id = %id, outcome = ?outcome, "Delete requested");
        Ok(outcome)
    }
}

fn query_name(catalog: &str) -> Option<CatalogName> {
    CatalogName::new(catalog).ok()
}

/// Validates a wire record and brings its path into normal form
///
/// The host is kept byte for byte: storages match hosts exactly.
fn normalize_record(record: &FileRecord) -> Result<FileRecord, DomainError> {
    if record.host.trim().is_empty() {
        return Err(DomainError::InvalidHost(record.host.clone()));
    }
    if i64::try_from(record.length).is_err() {
        return Err(DomainError::InvalidLength(record.length));
    }
    let path = RelativePath::new(&record.full_name)?;
    let hash = ContentHash::new(record.hash.clone())?;

    let name = if record.name.trim().is_empty() {
        path.file_name().to_string()
    } else {
        record.name.clone()
    };

    Ok(FileRecord {
        name,
        full_name: path.into(),
        hash: hash.into(),
        ..record.clone()
    })
}
