//! Change detection between a local file and its last catalog record
//!
//! A file needs re-hashing when the catalog has no record of it on this
//! host, or when its size, creation time or last-write time moved. Access
//! time is ignored: reading a file does not make it stale.

use chrono::{DateTime, Utc};

use super::catalog::FileEntry;

/// Cheap metadata of a local file, taken without reading its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSnapshot {
    pub length: u64,
    pub creation_time_utc: DateTime<Utc>,
    pub last_access_time_utc: DateTime<Utc>,
    pub last_write_time_utc: DateTime<Utc>,
}

/// Returns true if the file must be hashed and uploaded again
///
/// `known` is the catalog's record for the same path on the same host;
/// path and host are not compared here.
pub fn needs_update(local: &LocalSnapshot, known: Option<&FileEntry>) -> bool {
    match known {
        None => true,
        Some(known) => {
            known.length != local.length
                || known.creation_time_utc != local.creation_time_utc
                || known.last_write_time_utc != local.last_write_time_utc
        }
    }
}
