//! Domain error types
//!
//! Validation failures raised while turning wire input into domain values.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Catalog name is empty once surrounding whitespace is removed
    #[error("Invalid catalog name: {0:?}")]
    InvalidCatalogName(String),

    /// Path normalizes to nothing
    #[error("Invalid path: {0:?}")]
    InvalidPath(String),

    /// Hash is empty or contains whitespace
    #[error("Invalid hash format: {0:?}")]
    InvalidHash(String),

    /// Host name is empty
    #[error("Invalid host: {0:?}")]
    InvalidHost(String),

    /// Byte length beyond what the catalog can store
    #[error("Invalid length: {0} bytes is out of range")]
    InvalidLength(u64),

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}
