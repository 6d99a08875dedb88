//! Local directory enumeration
//!
//! Recursively lists regular files below a root, with the metadata the
//! change detector needs. Symbolic links and special files are skipped,
//! as are names that are not valid UTF-8 (they cannot be catalogued).

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use filecat_core::domain::{LocalSnapshot, RelativePath};

/// A regular file found below the sync root
#[derive(Debug, Clone)]
pub struct LocalFile {
    /// Absolute (or root-joined) path on this machine
    pub path: PathBuf,
    /// Path relative to the sync root, in catalog form
    pub relative: RelativePath,
    pub snapshot: LocalSnapshot,
}

/// Takes the change-detection metadata of a file
///
/// Filesystems without a birth time report the last-write time as the
/// creation time, so the value is stable across runs.
pub fn snapshot_of(metadata: &std::fs::Metadata) -> std::io::Result<LocalSnapshot> {
    let modified = metadata.modified()?;
    let created = metadata.created().unwrap_or(modified);
    let accessed = metadata.accessed().unwrap_or(modified);

    Ok(LocalSnapshot {
        length: metadata.len(),
        creation_time_utc: to_utc(created),
        last_access_time_utc: to_utc(accessed),
        last_write_time_utc: to_utc(modified),
    })
}

fn to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

/// Lists every regular file below `root`, in directory-enumeration order
///
/// # Errors
///
/// Fails only if `root` itself cannot be read. Unreadable subdirectories
/// and entries are logged and skipped.
pub async fn scan(root: &Path) -> Result<Vec<LocalFile>> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(root)
        .await
        .with_context(|| format!("Failed to read sync root {}", root.display()))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Failed to list {}", root.display()))?
    {
        visit(root, entry, &mut files).await;
    }

    debug!(root = %root.display(), count = files.len(), "Scanned sync root");
    Ok(files)
}

fn walk<'a>(
    root: &'a Path,
    dir: PathBuf,
    files: &'a mut Vec<LocalFile>,
) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
    Box::pin(async move {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Skipping unreadable directory");
                return;
            }
        };

        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => visit(root, entry, files).await,
                Ok(None) => break,
                Err(e) => {
                    warn!(path = %dir.display(), error = %e, "Directory listing interrupted");
                    break;
                }
            }
        }
    })
}

async fn visit(root: &Path, entry: tokio::fs::DirEntry, files: &mut Vec<LocalFile>) {
    let path = entry.path();

    let file_type = match entry.file_type().await {
        Ok(file_type) => file_type,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping entry with unknown type");
            return;
        }
    };

    if file_type.is_dir() {
        walk(root, path, files).await;
        return;
    }
    if !file_type.is_file() {
        debug!(path = %path.display(), "Skipping non-regular file");
        return;
    }

    let Some(relative) = relative_path(root, &path) else {
        warn!(path = %path.display(), "Skipping file with a non UTF-8 name");
        return;
    };

    let metadata = match entry.metadata().await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping file without metadata");
            return;
        }
    };

    match snapshot_of(&metadata) {
        Ok(snapshot) => files.push(LocalFile {
            path,
            relative,
            snapshot,
        }),
        Err(e) => warn!(path = %path.display(), error = %e, "Skipping file without timestamps"),
    }
}

/// Catalog form of `path` below `root`, or `None` if it cannot be expressed
fn relative_path(root: &Path, path: &Path) -> Option<RelativePath> {
    let relative = path.strip_prefix(root).ok()?;
    let segments = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    RelativePath::new(&segments.join("/")).ok()
}
