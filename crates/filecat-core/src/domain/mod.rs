//! Domain entities and business logic
//!
//! - Newtypes for validated names, paths, hashes and identifiers
//! - Wire records describing one file observation on one host
//! - Classification of a catalog's observations
//! - Change detection for local files
//! - Domain-specific error types

pub mod catalog;
pub mod change;
pub mod classification;
pub mod errors;
pub mod newtypes;

pub use catalog::{
    BatchSummary, CatalogSummary, DeleteOutcome, FileComparison, FileEntry, FileRecord,
    HashEntry, UpsertOutcome,
};
pub use change::{needs_update, LocalSnapshot};
pub use classification::{
    classify, group_by_file, CatalogClassification, Classification, ClassificationKind,
};
pub use errors::DomainError;
pub use newtypes::*;
