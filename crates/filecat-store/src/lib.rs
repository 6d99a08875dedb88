//! FileCat Store - Catalog persistence
//!
//! SQLite-based store for:
//! - Catalogs (case-insensitive names)
//! - Storages (reporting hosts, per catalog)
//! - Files (normalized relative paths, per catalog)
//! - File hashes (last observation of a file on a host)
//!
//! ## Architecture
//!
//! This crate implements the `ICatalogStore` port from `filecat-core`
//! using SQLite as the storage backend. It is a driven (secondary) adapter
//! in the hexagonal architecture.
//!
//! ## Key Components
//!
//! - [`DatabasePool`] - Connection pool with migration support
//! - [`SqliteCatalogStore`] - `ICatalogStore` implementation
//! - [`StoreError`] - Error types for store operations
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use filecat_store::{DatabasePool, SqliteCatalogStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = DatabasePool::new(Path::new("/var/lib/filecat/catalog.db")).await?;
//! let store = SqliteCatalogStore::new(pool.pool().clone());
//! // Use store as ICatalogStore...
//! # Ok(())
//! # }
//! ```

pub mod pool;
pub mod repository;

pub use pool::DatabasePool;
pub use repository::SqliteCatalogStore;

/// Errors that can occur during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A database query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value could not be converted back into its domain type
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::QueryFailed(e.to_string())
    }
}
