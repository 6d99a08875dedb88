//! Catalog records exchanged between hosts and the catalog service
//!
//! These are the shapes carried over the wire (camelCase JSON) and returned
//! by the store. Relational identity lives in the store; here a file
//! observation is always "one file on one host".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::FileId;

/// One file observation submitted by a host for upsert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Reporting host (machine name)
    pub host: String,
    /// File name without directories
    pub name: String,
    /// Catalog-relative path; normalized by the store
    pub full_name: String,
    /// Content digest
    pub hash: String,
    /// When the host captured this observation
    pub updated: DateTime<Utc>,
    /// Size in bytes
    pub length: u64,
    pub creation_time_utc: DateTime<Utc>,
    pub last_access_time_utc: DateTime<Utc>,
    pub last_write_time_utc: DateTime<Utc>,
}

/// A flattened (file, host) observation as returned by listings and the
/// singleton view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub id: FileId,
    pub host: String,
    pub name: String,
    pub full_name: String,
    pub hash: String,
    pub updated: DateTime<Utc>,
    pub length: u64,
    pub creation_time_utc: DateTime<Utc>,
    pub last_access_time_utc: DateTime<Utc>,
    pub last_write_time_utc: DateTime<Utc>,
}

impl FileEntry {
    /// Splits the entry into its per-host part
    pub fn hash_entry(&self) -> HashEntry {
        HashEntry {
            host: self.host.clone(),
            hash: self.hash.clone(),
            updated: self.updated,
            length: self.length,
            creation_time_utc: self.creation_time_utc,
            last_access_time_utc: self.last_access_time_utc,
            last_write_time_utc: self.last_write_time_utc,
        }
    }
}

/// Per-host hash and metadata inside a [`FileComparison`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashEntry {
    pub host: String,
    pub hash: String,
    pub updated: DateTime<Utc>,
    pub length: u64,
    pub creation_time_utc: DateTime<Utc>,
    pub last_access_time_utc: DateTime<Utc>,
    pub last_write_time_utc: DateTime<Utc>,
}

/// A file together with every host's observation of it
///
/// Used for the difference and duplicate views. `hashes` keeps storage
/// order; no host ordering is implied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileComparison {
    pub id: FileId,
    pub name: String,
    pub full_name: String,
    pub hashes: Vec<HashEntry>,
}

/// Entry of the catalogs listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub name: String,
}

/// What a single upsert did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// First observation of this file on this host
    Created,
    /// Digest changed; digest and metadata were rewritten
    Updated,
    /// Digest identical; nothing was written
    Unchanged,
}

/// Result of deleting a file by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Tally of the outcomes of one upsert batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl BatchSummary {
    /// Count one outcome
    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created => self.created += 1,
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Unchanged => self.unchanged += 1,
        }
    }

    /// Total number of records applied
    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged
    }
}
