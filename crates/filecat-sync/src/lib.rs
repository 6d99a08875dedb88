//! FileCat Sync - Client side of the catalog
//!
//! Walks a local directory tree, decides from cheap metadata which files
//! changed since the catalog last saw them, hashes those, and submits the
//! observations in batches.
//!
//! ## Key Components
//!
//! - [`hasher`] - SHA-256 content digests, streamed on a blocking thread
//! - [`scanner`] - Recursive enumeration of regular files
//! - [`host`] - Local machine name used as the reporting host
//! - [`SyncDriver`] - The per-run pipeline, producing a [`SyncReport`]

pub mod driver;
pub mod hasher;
pub mod host;
pub mod scanner;

pub use driver::{HashFailure, SyncDriver, SyncError, SyncReport, DEFAULT_BATCH_SIZE};
pub use scanner::LocalFile;
