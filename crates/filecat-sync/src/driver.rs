//! Sync driver
//!
//! One pass over a local directory: scan, look up what the catalog already
//! knows about each file on this host, hash only the files whose metadata
//! moved, and upload the fresh records in batches.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use filecat_core::domain::{needs_update, CatalogName, FileEntry, FileRecord, RelativePath};
use filecat_core::ports::ICatalogApi;

use crate::hasher::hash_file;
use crate::host::local_host_name;
use crate::scanner::{scan, LocalFile};

/// Records submitted per upload when not configured otherwise
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Errors that stop a sync pass before any file is processed
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Sync root is not a directory: {0}")]
    NotADirectory(String),

    #[error("Batch size must be greater than zero")]
    ZeroBatchSize,
}

/// A file that could not be hashed and was left out of the pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashFailure {
    pub path: String,
    pub message: String,
}

/// Outcome of one sync pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Regular files found below the root
    pub scanned: usize,
    /// Files whose catalog record still matches
    pub up_to_date: usize,
    /// Files whose content was digested
    pub hashed: usize,
    /// Records accepted by the catalog (zero on a dry run)
    pub uploaded: usize,
    /// Upload requests sent
    pub batches: usize,
    pub failures: Vec<HashFailure>,
    pub duration_ms: u64,
}

/// Drives sync passes against a catalog
pub struct SyncDriver {
    api: Arc<dyn ICatalogApi>,
    host: String,
    batch_size: usize,
    dry_run: bool,
}

impl SyncDriver {
    /// Creates a driver reporting as the local host with the default batch size
    pub fn new(api: Arc<dyn ICatalogApi>) -> Self {
        Self {
            api,
            host: local_host_name(),
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
        }
    }

    /// Reports as `host` instead of the machine name
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Computes the report without uploading anything
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Runs one pass over `root` into `catalog`
    ///
    /// Hash failures are recorded in the report and the file is skipped.
    /// Lookup and upload failures end the pass with an error; batches
    /// already sent stay in the catalog.
    #[instrument(skip(self, catalog, root), fields(catalog = %catalog, root = %root.display(), host = %self.host))]
    pub async fn run(&self, catalog: &CatalogName, root: &Path) -> Result<SyncReport> {
        if self.batch_size == 0 {
            return Err(SyncError::ZeroBatchSize.into());
        }
        let is_dir = tokio::fs::metadata(root)
            .await
            .with_context(|| format!("Failed to stat sync root {}", root.display()))?
            .is_dir();
        if !is_dir {
            return Err(SyncError::NotADirectory(root.display().to_string()).into());
        }

        let started = Instant::now();
        let files = scan(root).await?;
        let mut report = SyncReport {
            scanned: files.len(),
            ..SyncReport::default()
        };
        info!(count = files.len(), dry_run = self.dry_run, "Starting sync pass");

        let mut batch: Vec<FileRecord> = Vec::with_capacity(self.batch_size);

        for file in files {
            let known = self.lookup(catalog, &file.relative).await?;
            if !needs_update(&file.snapshot, known.as_ref()) {
                debug!(path = %file.relative, "Up to date");
                report.up_to_date += 1;
                continue;
            }

            let Some(record) = self.observe(&file, &mut report).await else {
                continue;
            };
            debug!(path = %file.relative, hash = %record.hash, "Changed");
            batch.push(record);

            if batch.len() >= self.batch_size {
                self.flush(catalog, &mut batch, &mut report).await?;
            }
        }

        if !batch.is_empty() {
            self.flush(catalog, &mut batch, &mut report).await?;
        }

        report.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            scanned = report.scanned,
            up_to_date = report.up_to_date,
            hashed = report.hashed,
            uploaded = report.uploaded,
            failures = report.failures.len(),
            duration_ms = report.duration_ms,
            "Sync pass complete"
        );
        Ok(report)
    }

    /// The catalog's record of `relative` on this host, if any
    ///
    /// The listing is a prefix query, so siblings such as `a/bc` for `a/b`
    /// come back too and are filtered out here.
    async fn lookup(
        &self,
        catalog: &CatalogName,
        relative: &RelativePath,
    ) -> Result<Option<FileEntry>> {
        let entries = self
            .api
            .find_files(catalog, Some(relative))
            .await
            .with_context(|| format!("Failed to look up {relative}"))?;

        Ok(entries.into_iter().find(|entry| {
            entry.host.eq_ignore_ascii_case(&self.host)
                && RelativePath::new(&entry.full_name).is_ok_and(|p| &p == relative)
        }))
    }

    /// Hashes `file` into a record, or records the failure
    async fn observe(&self, file: &LocalFile, report: &mut SyncReport) -> Option<FileRecord> {
        match hash_file(&file.path).await {
            Ok(hash) => {
                report.hashed += 1;
                Some(FileRecord {
                    host: self.host.clone(),
                    name: file.relative.file_name().to_string(),
                    full_name: file.relative.to_string(),
                    hash,
                    updated: Utc::now(),
                    length: file.snapshot.length,
                    creation_time_utc: file.snapshot.creation_time_utc,
                    last_access_time_utc: file.snapshot.last_access_time_utc,
                    last_write_time_utc: file.snapshot.last_write_time_utc,
                })
            }
            Err(e) => {
                warn!(path = %file.path.display(), error = %e, "Failed to hash file, skipping");
                report.failures.push(HashFailure {
                    path: file.relative.to_string(),
                    message: e.to_string(),
                });
                None
            }
        }
    }

    async fn flush(
        &self,
        catalog: &CatalogName,
        batch: &mut Vec<FileRecord>,
        report: &mut SyncReport,
    ) -> Result<()> {
        if self.dry_run {
            debug!(count = batch.len(), "Dry run, not uploading batch");
            batch.clear();
            return Ok(());
        }

        self.api
            .upsert_files(catalog, batch)
            .await
            .with_context(|| format!("Failed to upload batch of {} records", batch.len()))?;

        report.uploaded += batch.len();
        report.batches += 1;
        batch.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File, FileTimes};
    use std::sync::Mutex;
    use std::time::{Duration, SystemTime};

    use chrono::DateTime;
    use filecat_core::domain::FileId;

    use super::*;

    /// In-memory catalog keyed by (full name, host), mirroring the
    /// server's normalization and digest-change rule
    #[derive(Default)]
    struct FakeCatalog {
        entries: Mutex<Vec<FileEntry>>,
        batches: Mutex<Vec<usize>>,
        lookups: Mutex<usize>,
        fail_uploads: bool,
    }

    impl FakeCatalog {
        fn batch_sizes(&self) -> Vec<usize> {
            self.batches.lock().unwrap().clone()
        }

        fn insert(&self, entry: FileEntry) {
            self.entries.lock().unwrap().push(entry);
        }
    }

    #[async_trait::async_trait]
    impl ICatalogApi for FakeCatalog {
        async fn find_files(
            &self,
            _catalog: &CatalogName,
            prefix: Option<&RelativePath>,
        ) -> Result<Vec<FileEntry>> {
            *self.lookups.lock().unwrap() += 1;
            let entries = self.entries.lock().unwrap();
            Ok(entries
                .iter()
                .filter(|e| prefix.map_or(true, |p| e.full_name.starts_with(p.as_str())))
                .cloned()
                .collect())
        }

        async fn upsert_files(&self, _catalog: &CatalogName, records: &[FileRecord]) -> Result<()> {
            if self.fail_uploads {
                anyhow::bail!("connection refused");
            }
            self.batches.lock().unwrap().push(records.len());

            let mut entries = self.entries.lock().unwrap();
            for record in records {
                let existing = entries
                    .iter_mut()
                    .find(|e| e.full_name == record.full_name && e.host == record.host);
                let entry = FileEntry {
                    id: FileId::new(1),
                    host: record.host.clone(),
                    name: record.name.clone(),
                    full_name: record.full_name.clone(),
                    hash: record.hash.clone(),
                    updated: record.updated,
                    length: record.length,
                    creation_time_utc: record.creation_time_utc,
                    last_access_time_utc: record.last_access_time_utc,
                    last_write_time_utc: record.last_write_time_utc,
                };
                match existing {
                    Some(e) if e.hash != record.hash => *e = entry,
                    Some(_) => {}
                    None => entries.push(entry),
                }
            }
            Ok(())
        }
    }

    fn catalog() -> CatalogName {
        CatalogName::new("photos").unwrap()
    }

    fn driver(api: &Arc<FakeCatalog>) -> SyncDriver {
        SyncDriver::new(api.clone()).with_host("laptop")
    }

    fn write_files(root: &Path, count: usize) {
        for i in 0..count {
            fs::write(root.join(format!("file-{i:02}.txt")), format!("content {i}")).unwrap();
        }
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_times(FileTimes::new().set_modified(time)).unwrap();
    }

    #[tokio::test]
    async fn first_pass_uploads_everything() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_files(dir.path(), 3);
        fs::write(dir.path().join("sub/nested.txt"), b"nested").unwrap();

        let api = Arc::new(FakeCatalog::default());
        let report = driver(&api).run(&catalog(), dir.path()).await.unwrap();

        assert_eq!(report.scanned, 4);
        assert_eq!(report.hashed, 4);
        assert_eq!(report.uploaded, 4);
        assert_eq!(report.up_to_date, 0);
        assert!(report.failures.is_empty());

        let entries = api.entries.lock().unwrap();
        let nested = entries.iter().find(|e| e.full_name == "sub/nested.txt").unwrap();
        assert_eq!(nested.name, "nested.txt");
        assert_eq!(nested.host, "laptop");
        assert_eq!(nested.hash.len(), 64);
    }

    #[tokio::test]
    async fn second_pass_uploads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_files(dir.path(), 5);

        let api = Arc::new(FakeCatalog::default());
        driver(&api).run(&catalog(), dir.path()).await.unwrap();
        let report = driver(&api).run(&catalog(), dir.path()).await.unwrap();

        assert_eq!(report.scanned, 5);
        assert_eq!(report.up_to_date, 5);
        assert_eq!(report.hashed, 0);
        assert_eq!(report.uploaded, 0);
        assert_eq!(report.batches, 0);
    }

    #[tokio::test]
    async fn touched_file_is_the_only_one_rehashed() {
        let dir = tempfile::tempdir().unwrap();
        write_files(dir.path(), 3);

        let api = Arc::new(FakeCatalog::default());
        driver(&api).run(&catalog(), dir.path()).await.unwrap();

        let touched = dir.path().join("file-01.txt");
        fs::write(&touched, b"new content").unwrap();
        set_mtime(&touched, SystemTime::now() + Duration::from_secs(60));

        let report = driver(&api).run(&catalog(), dir.path()).await.unwrap();
        assert_eq!(report.hashed, 1);
        assert_eq!(report.uploaded, 1);
        assert_eq!(report.up_to_date, 2);
    }

    #[tokio::test]
    async fn final_partial_batch_is_flushed() {
        let dir = tempfile::tempdir().unwrap();
        write_files(dir.path(), 25);

        let api = Arc::new(FakeCatalog::default());
        let report = driver(&api).run(&catalog(), dir.path()).await.unwrap();

        assert_eq!(api.batch_sizes(), vec![10, 10, 5]);
        assert_eq!(report.batches, 3);
        assert_eq!(report.uploaded, 25);
    }

    #[tokio::test]
    async fn batch_size_is_tunable() {
        let dir = tempfile::tempdir().unwrap();
        write_files(dir.path(), 5);

        let api = Arc::new(FakeCatalog::default());
        driver(&api)
            .with_batch_size(2)
            .run(&catalog(), dir.path())
            .await
            .unwrap();

        assert_eq!(api.batch_sizes(), vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn dry_run_uploads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_files(dir.path(), 4);

        let api = Arc::new(FakeCatalog::default());
        let report = driver(&api)
            .with_dry_run(true)
            .run(&catalog(), dir.path())
            .await
            .unwrap();

        assert_eq!(report.hashed, 4);
        assert_eq!(report.uploaded, 0);
        assert_eq!(report.batches, 0);
        assert!(api.batch_sizes().is_empty());
        assert!(api.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn prefix_siblings_and_other_hosts_are_not_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/b"), b"data").unwrap();

        let api = Arc::new(FakeCatalog::default());
        driver(&api).run(&catalog(), dir.path()).await.unwrap();

        // Replace the stored row with rows a prefix-only or host-blind
        // lookup would accept.
        let original = api.entries.lock().unwrap()[0].clone();
        api.entries.lock().unwrap().clear();
        api.insert(FileEntry {
            full_name: "a/bc".into(),
            ..original.clone()
        });
        api.insert(FileEntry {
            host: "desktop".into(),
            ..original.clone()
        });

        let report = driver(&api).run(&catalog(), dir.path()).await.unwrap();
        assert_eq!(report.hashed, 1);
        assert_eq!(report.up_to_date, 0);
    }

    #[tokio::test]
    async fn host_match_ignores_ascii_case() {
        let dir = tempfile::tempdir().unwrap();
        write_files(dir.path(), 2);

        let api = Arc::new(FakeCatalog::default());
        driver(&api).run(&catalog(), dir.path()).await.unwrap();

        let report = SyncDriver::new(api.clone())
            .with_host("LAPTOP")
            .run(&catalog(), dir.path())
            .await
            .unwrap();
        assert_eq!(report.up_to_date, 2);
        assert_eq!(report.hashed, 0);
    }

    #[tokio::test]
    async fn access_time_alone_does_not_trigger_rehash() {
        let dir = tempfile::tempdir().unwrap();
        write_files(dir.path(), 1);

        let api = Arc::new(FakeCatalog::default());
        driver(&api).run(&catalog(), dir.path()).await.unwrap();

        let path = dir.path().join("file-00.txt");
        let file = File::options().write(true).open(&path).unwrap();
        file.set_times(FileTimes::new().set_accessed(SystemTime::now() + Duration::from_secs(3600)))
            .unwrap();

        let report = driver(&api).run(&catalog(), dir.path()).await.unwrap();
        assert_eq!(report.up_to_date, 1);
    }

    #[tokio::test]
    async fn stored_timestamps_match_the_local_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write_files(dir.path(), 1);
        let mtime = SystemTime::UNIX_EPOCH + Duration::new(1_700_000_000, 123_456_789);
        set_mtime(&dir.path().join("file-00.txt"), mtime);

        let api = Arc::new(FakeCatalog::default());
        driver(&api).run(&catalog(), dir.path()).await.unwrap();

        let entries = api.entries.lock().unwrap();
        assert_eq!(entries[0].last_write_time_utc, DateTime::<Utc>::from(mtime));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_file_is_reported_and_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        write_files(dir.path(), 3);
        let locked = dir.path().join("file-01.txt");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if File::open(&locked).is_ok() {
            // Running with privileges that ignore permission bits.
            return;
        }

        let api = Arc::new(FakeCatalog::default());
        let report = driver(&api).run(&catalog(), dir.path()).await.unwrap();

        assert_eq!(report.hashed, 2);
        assert_eq!(report.uploaded, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "file-01.txt");

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[tokio::test]
    async fn vanished_file_is_reported_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let file = LocalFile {
            path: dir.path().join("gone.txt"),
            relative: RelativePath::new("gone.txt").unwrap(),
            snapshot: filecat_core::domain::LocalSnapshot {
                length: 1,
                creation_time_utc: Utc::now(),
                last_access_time_utc: Utc::now(),
                last_write_time_utc: Utc::now(),
            },
        };

        let api = Arc::new(FakeCatalog::default());
        let mut report = SyncReport::default();
        assert!(driver(&api).observe(&file, &mut report).await.is_none());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "gone.txt");
        assert_eq!(report.hashed, 0);
    }

    #[tokio::test]
    async fn upload_failure_is_propagated() {
        let dir = tempfile::tempdir().unwrap();
        write_files(dir.path(), 2);

        let api = Arc::new(FakeCatalog {
            fail_uploads: true,
            ..FakeCatalog::default()
        });
        let err = driver(&api).run(&catalog(), dir.path()).await.unwrap_err();
        assert!(format!("{err:#}").contains("connection refused"));
    }

    #[tokio::test]
    async fn rejects_bad_roots_and_zero_batches() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();

        let api = Arc::new(FakeCatalog::default());
        assert!(driver(&api).run(&catalog(), &file).await.is_err());
        assert!(driver(&api)
            .with_batch_size(0)
            .run(&catalog(), dir.path())
            .await
            .is_err());
        assert_eq!(*api.lookups.lock().unwrap(), 0);
    }
}
