//! Classification of a catalog's hash observations
//!
//! Observations are grouped by file. Every group with at least one
//! observation falls into exactly one class:
//!
//! | Group                          | Class      |
//! |--------------------------------|------------|
//! | one observation                | Singleton  |
//! | two or more, all digests equal | Duplicate  |
//! | two or more, digests differ    | Difference |
//!
//! The partition is computed on demand from the store's current rows;
//! nothing here is cached.

use std::collections::HashMap;

use super::catalog::{FileComparison, FileEntry};
use super::newtypes::FileId;

/// Name of a class, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationKind {
    Singleton,
    Duplicate,
    Difference,
}

/// A classified file group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Observed on exactly one host; the observation is promoted to top level
    Singleton(FileEntry),
    /// Observed on several hosts, all agreeing on the digest
    Duplicate(FileComparison),
    /// Observed on several hosts that disagree on the digest
    Difference(FileComparison),
}

impl Classification {
    /// The class this group fell into
    pub fn kind(&self) -> ClassificationKind {
        match self {
            Classification::Singleton(_) => ClassificationKind::Singleton,
            Classification::Duplicate(_) => ClassificationKind::Duplicate,
            Classification::Difference(_) => ClassificationKind::Difference,
        }
    }
}

/// Group flattened observations by file id
///
/// Groups come out in order of first appearance and each group keeps the
/// order its observations arrived in.
pub fn group_by_file<I>(entries: I) -> Vec<FileComparison>
where
    I: IntoIterator<Item = FileEntry>,
{
    let mut groups: Vec<FileComparison> = Vec::new();
    let mut index: HashMap<FileId, usize> = HashMap::new();

    for entry in entries {
        let hash = entry.hash_entry();
        match index.get(&entry.id) {
            Some(&i) => groups[i].hashes.push(hash),
            None => {
                index.insert(entry.id, groups.len());
                groups.push(FileComparison {
                    id: entry.id,
                    name: entry.name,
                    full_name: entry.full_name,
                    hashes: vec![hash],
                });
            }
        }
    }

    groups
}

/// Classify one file group
///
/// Returns `None` for a group without observations; such a file has
/// nothing to compare and belongs to no view.
pub fn classify(mut group: FileComparison) -> Option<Classification> {
    match group.hashes.len() {
        0 => None,
        1 => {
            let only = group.hashes.remove(0);
            Some(Classification::Singleton(FileEntry {
                id: group.id,
                host: only.host,
                name: group.name,
                full_name: group.full_name,
                hash: only.hash,
                updated: only.updated,
                length: only.length,
                creation_time_utc: only.creation_time_utc,
                last_access_time_utc: only.last_access_time_utc,
                last_write_time_utc: only.last_write_time_utc,
            }))
        }
        _ => {
            let first = group.hashes[0].hash.as_str();
            if group.hashes.iter().all(|h| h.hash == first) {
                Some(Classification::Duplicate(group))
            } else {
                Some(Classification::Difference(group))
            }
        }
    }
}

/// The three views of one catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogClassification {
    pub differences: Vec<FileComparison>,
    pub duplicates: Vec<FileComparison>,
    pub singletons: Vec<FileEntry>,
}

impl CatalogClassification {
    /// Group and classify a flat listing
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = FileEntry>,
    {
        let mut result = Self::default();

        for group in group_by_file(entries) {
            match classify(group) {
                Some(Classification::Singleton(entry)) => result.singletons.push(entry),
                Some(Classification::Duplicate(group)) => result.duplicates.push(group),
                Some(Classification::Difference(group)) => result.differences.push(group),
                None => {}
            }
        }

        result
    }

    /// Number of classified files
    pub fn len(&self) -> usize {
        self.differences.len() + self.duplicates.len() + self.singletons.len()
    }

    /// Returns true if no file was classified
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
