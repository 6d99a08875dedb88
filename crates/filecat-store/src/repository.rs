//! SQLite implementation of ICatalogStore
//!
//! ## Type Mapping
//!
//! | Domain Type    | SQL Type | Strategy                                           |
//! |----------------|----------|----------------------------------------------------|
//! | CatalogName    | TEXT     | trimmed spelling in `name`, lowercased in `name_key` |
//! | RelativePath   | TEXT     | normalized string in `full_name`                   |
//! | FileId         | INTEGER  | row id                                             |
//! | DateTime<Utc>  | TEXT     | RFC 3339 with nanoseconds, `Z` suffix              |
//! | u64 length     | INTEGER  | checked conversion to/from `i64`                   |
//!
//! ## Upsert
//!
//! Every upsert runs in one transaction. Catalog, storage and file rows are
//! found-or-created with `INSERT ... ON CONFLICT DO NOTHING` followed by a
//! lookup, so concurrent creators converge on the same row. The hash row is
//! written with a conditional upsert that only rewrites an existing row when
//! the digest differs.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::{debug, instrument};

use filecat_core::domain::{
    CatalogName, CatalogSummary, DeleteOutcome, FileEntry, FileId, FileRecord, PathPrefix,
    RelativePath, UpsertOutcome,
};
use filecat_core::ports::ICatalogStore;

use crate::StoreError;

/// SQLite-based implementation of the catalog store port
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    /// Creates a new store instance with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Helper functions for type conversion
// ============================================================================

fn timestamp_to_string(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn timestamp_from_string(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::SerializationError(format!("Invalid timestamp '{}': {}", s, e)))
}

fn length_to_i64(length: u64) -> Result<i64, StoreError> {
    i64::try_from(length)
        .map_err(|_| StoreError::SerializationError(format!("Length out of range: {}", length)))
}

fn row_to_file_entry(row: &SqliteRow) -> Result<FileEntry, StoreError> {
    let length: i64 = row.try_get("length")?;
    let length = u64::try_from(length)
        .map_err(|_| StoreError::SerializationError(format!("Negative length: {}", length)))?;

    Ok(FileEntry {
        id: FileId::new(row.try_get("id")?),
        host: row.try_get("host")?,
        name: row.try_get("name")?,
        full_name: row.try_get("full_name")?,
        hash: row.try_get("hash")?,
        updated: timestamp_from_string(row.try_get("updated")?)?,
        length,
        creation_time_utc: timestamp_from_string(row.try_get("creation_time_utc")?)?,
        last_access_time_utc: timestamp_from_string(row.try_get("last_access_time_utc")?)?,
        last_write_time_utc: timestamp_from_string(row.try_get("last_write_time_utc")?)?,
    })
}

// ============================================================================
// Find-or-create steps
// ============================================================================

async fn ensure_catalog(
    tx: &mut Transaction<'_, Sqlite>,
    catalog: &CatalogName,
) -> Result<i64, StoreError> {
    sqlx::query("INSERT INTO catalogs (name, name_key) VALUES (?, ?) ON CONFLICT(name_key) DO NOTHING")
        .bind(catalog.as_str())
        .bind(catalog.key())
        .execute(&mut **tx)
        .await?;

    let id = sqlx::query_scalar("SELECT id FROM catalogs WHERE name_key = ?")
        .bind(catalog.key())
        .fetch_one(&mut **tx)
        .await?;
    Ok(id)
}

async fn ensure_storage(
    tx: &mut Transaction<'_, Sqlite>,
    catalog_id: i64,
    host: &str,
) -> Result<i64, StoreError> {
    sqlx::query(
        "INSERT INTO storages (catalog_id, host) VALUES (?, ?) \
         ON CONFLICT(catalog_id, host) DO NOTHING",
    )
    .bind(catalog_id)
    .bind(host)
    .execute(&mut **tx)
    .await?;

    let id = sqlx::query_scalar("SELECT id FROM storages WHERE catalog_id = ? AND host = ?")
        .bind(catalog_id)
        .bind(host)
        .fetch_one(&mut **tx)
        .await?;
    Ok(id)
}

async fn ensure_file(
    tx: &mut Transaction<'_, Sqlite>,
    catalog_id: i64,
    name: &str,
    full_name: &RelativePath,
) -> Result<i64, StoreError> {
    sqlx::query(
        "INSERT INTO files (catalog_id, name, full_name) VALUES (?, ?, ?) \
         ON CONFLICT(catalog_id, full_name) DO NOTHING",
    )
    .bind(catalog_id)
    .bind(name)
    .bind(full_name.as_str())
    .execute(&mut **tx)
    .await?;

    let id = sqlx::query_scalar("SELECT id FROM files WHERE catalog_id = ? AND full_name = ?")
        .bind(catalog_id)
        .bind(full_name.as_str())
        .fetch_one(&mut **tx)
        .await?;
    Ok(id)
}

// ============================================================================
// ICatalogStore implementation
// ============================================================================

#[async_trait::async_trait]
impl ICatalogStore for SqliteCatalogStore {
    #[instrument(skip(self, catalog, record), fields(catalog = %catalog, host = %record.host, path = %record.full_name))]
    async fn upsert_file(
        &self,
        catalog: &CatalogName,
        record: &FileRecord,
    ) -> anyhow::Result<UpsertOutcome> {
        let full_name = RelativePath::new(&record.full_name)?;
        let length = length_to_i64(record.length)?;

        let mut tx = self.pool.begin().await?;

        let catalog_id = ensure_catalog(&mut tx, catalog).await?;
        let storage_id = ensure_storage(&mut tx, catalog_id, &record.host).await?;
        let file_id = ensure_file(&mut tx, catalog_id, &record.name, &full_name).await?;

        let stored_hash: Option<String> =
            sqlx::query_scalar("SELECT hash FROM file_hashes WHERE file_id = ? AND storage_id = ?")
                .bind(file_id)
                .bind(storage_id)
                .fetch_optional(&mut *tx)
                .await?;

        let outcome = match stored_hash.as_deref() {
            None => UpsertOutcome::Created,
            Some(hash) if hash == record.hash => UpsertOutcome::Unchanged,
            Some(_) => UpsertOutcome::Updated,
        };

        sqlx::query(
            "INSERT INTO file_hashes \
             (file_id, storage_id, hash, updated, length, \
              creation_time_utc, last_access_time_utc, last_write_time_utc) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(file_id, storage_id) DO UPDATE SET \
                hash = excluded.hash, \
                updated = excluded.updated, \
                length = excluded.length, \
                creation_time_utc = excluded.creation_time_utc, \
                last_access_time_utc = excluded.last_access_time_utc, \
                last_write_time_utc = excluded.last_write_time_utc \
             WHERE file_hashes.hash <> excluded.hash",
        )
        .bind(file_id)
        .bind(storage_id)
        .bind(&record.hash)
        .bind(timestamp_to_string(&record.updated))
        .bind(length)
        .bind(timestamp_to_string(&record.creation_time_utc))
        .bind(timestamp_to_string(&record.last_access_time_utc))
        .bind(timestamp_to_string(&record.last_write_time_utc))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(file_id, storage_id, outcome = ?outcome, "Upserted file hash");
        Ok(outcome)
    }

    #[instrument(skip(self, catalog, prefix), fields(catalog = %catalog, prefix = ?prefix.map(PathPrefix::as_str)))]
    async fn list_files(
        &self,
        catalog: &CatalogName,
        prefix: Option<&PathPrefix>,
    ) -> anyhow::Result<Vec<FileEntry>> {
        const BASE: &str = "SELECT f.id, s.host, f.name, f.full_name, fh.hash, fh.updated, fh.length, \
                   fh.creation_time_utc, fh.last_access_time_utc, fh.last_write_time_utc \
             FROM file_hashes fh \
             JOIN files f ON f.id = fh.file_id \
             JOIN storages s ON s.id = fh.storage_id \
             JOIN catalogs c ON c.id = f.catalog_id \
             WHERE c.name_key = ?";

        let rows = match prefix {
            Some(prefix) => {
                let sql = format!(
                    "{BASE} AND substr(f.full_name, 1, length(?)) = ? ORDER BY f.id, fh.rowid"
                );
                sqlx::query(&sql)
                    .bind(catalog.key())
                    .bind(prefix.as_str())
                    .bind(prefix.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{BASE} ORDER BY f.id, fh.rowid");
                sqlx::query(&sql)
                    .bind(catalog.key())
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let entries = rows
            .iter()
            .map(row_to_file_entry)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = entries.len(), "Listed files");
        Ok(entries)
    }

    #[instrument(skip(self, catalog, id), fields(catalog = %catalog, file_id = %id))]
    async fn delete_file(&self, catalog: &CatalogName, id: FileId) -> anyhow::Result<DeleteOutcome> {
        let result = sqlx::query(
            "DELETE FROM files \
             WHERE id = ? AND catalog_id = (SELECT id FROM catalogs WHERE name_key = ?)",
        )
        .bind(id.value())
        .bind(catalog.key())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!("File not found");
            Ok(DeleteOutcome::NotFound)
        } else {
            debug!("File deleted");
            Ok(DeleteOutcome::Deleted)
        }
    }

    async fn list_catalogs(&self) -> anyhow::Result<Vec<CatalogSummary>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM catalogs ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(names.into_iter().map(|name| CatalogSummary { name }).collect())
    }
}
