//! Terminal rendering for catalog views and sync reports
//!
//! Every view is first rendered into a list of [`Line`]s and then written
//! by [`Output`]. JSON mode skips the line rendering and prints the value
//! itself, pretty-printed, on stdout.

use anyhow::Result;
use serde::Serialize;

use filecat_core::domain::{CatalogSummary, FileComparison, FileEntry};
use filecat_sync::SyncReport;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// One line of human output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Headline, stdout
    Ok(String),
    /// Indented detail, stdout
    Detail(String),
    /// stderr
    Warn(String),
    /// stderr
    Fail(String),
}

/// Writes rendered lines or JSON values for the selected format
#[derive(Debug, Clone, Copy)]
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Pretty JSON on stdout
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Human lines; nothing in JSON mode
    pub fn lines(&self, lines: &[Line]) {
        if self.is_json() {
            return;
        }
        for line in lines {
            match line {
                Line::Ok(text) => println!("\u{2713} {text}"),
                Line::Detail(text) => println!("  {text}"),
                Line::Warn(text) => eprintln!("\u{26a0} Warning: {text}"),
                Line::Fail(text) => eprintln!("\u{2717} Error: {text}"),
            }
        }
    }

    /// `value` as JSON, or its human rendering
    pub fn view<T: Serialize + ?Sized>(&self, value: &T, render: impl FnOnce() -> Vec<Line>) -> Result<()> {
        if self.is_json() {
            self.json(value)
        } else {
            self.lines(&render());
            Ok(())
        }
    }

    pub fn success(&self, text: impl Into<String>) {
        self.lines(&[Line::Ok(text.into())]);
    }

    pub fn detail(&self, text: impl Into<String>) {
        self.lines(&[Line::Detail(text.into())]);
    }

    pub fn warn(&self, text: impl Into<String>) {
        self.lines(&[Line::Warn(text.into())]);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.lines(&[Line::Fail(text.into())]);
    }
}

pub fn catalogs(catalogs: &[CatalogSummary]) -> Vec<Line> {
    let mut lines = vec![headline(catalogs.len(), "catalog")];
    lines.extend(catalogs.iter().map(|c| Line::Detail(c.name.clone())));
    lines
}

/// One line per record, `noun` names the records in the headline
pub fn entries(entries: &[FileEntry], noun: &str) -> Vec<Line> {
    let mut lines = vec![headline(entries.len(), noun)];
    lines.extend(entries.iter().map(|e| Line::Detail(entry_line(e))));
    lines
}

/// Each file followed by one indented line per host observation
pub fn comparisons(files: &[FileComparison], noun: &str) -> Vec<Line> {
    let mut lines = vec![headline(files.len(), noun)];
    for file in files {
        lines.push(Line::Detail(format!("[{}] {}", file.id, file.full_name)));
        for hash in &file.hashes {
            lines.push(Line::Detail(format!(
                "    {:<16} {}  {} bytes  {}",
                hash.host,
                short_hash(&hash.hash),
                hash.length,
                hash.last_write_time_utc.format("%Y-%m-%d %H:%M:%S")
            )));
        }
    }
    lines
}

pub fn sync_report(report: &SyncReport, dry_run: bool) -> Vec<Line> {
    let mut lines = Vec::new();
    if report.hashed == 0 && report.failures.is_empty() {
        lines.push(Line::Ok("Already up to date".to_string()));
    } else {
        lines.push(Line::Ok(format!(
            "Sync completed in {}",
            duration(report.duration_ms)
        )));
    }

    lines.push(Line::Detail(format!(
        "Scanned:    {}",
        count(report.scanned, "file")
    )));
    lines.push(Line::Detail(format!("Up to date: {}", report.up_to_date)));
    lines.push(Line::Detail(format!("Hashed:     {}", report.hashed)));
    if dry_run {
        lines.push(Line::Detail(format!("Would upload: {}", report.hashed)));
    } else {
        let batches = if report.batches == 1 { "batch" } else { "batches" };
        lines.push(Line::Detail(format!(
            "Uploaded:   {} in {} {batches}",
            report.uploaded, report.batches
        )));
    }

    if !report.failures.is_empty() {
        lines.push(Line::Warn(format!(
            "{} could not be hashed:",
            count(report.failures.len(), "file")
        )));
        lines.extend(
            report
                .failures
                .iter()
                .map(|f| Line::Detail(format!("  - {}: {}", f.path, f.message))),
        );
    }
    lines
}

/// `"1 file"`, `"3 files"`
pub fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn headline(n: usize, noun: &str) -> Line {
    if n == 0 {
        Line::Detail(format!("No {noun}s"))
    } else {
        Line::Ok(count(n, noun))
    }
}

fn entry_line(entry: &FileEntry) -> String {
    format!(
        "[{}] {:<40} {:<16} {}  {} bytes",
        entry.id,
        entry.full_name,
        entry.host,
        short_hash(&entry.hash),
        entry.length
    )
}

/// First 12 characters of a digest
fn short_hash(hash: &str) -> &str {
    hash.char_indices().nth(12).map_or(hash, |(i, _)| &hash[..i])
}

fn duration(ms: u64) -> String {
    if ms >= 1000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{ms}ms")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use filecat_core::domain::{FileId, HashEntry};
    use filecat_sync::HashFailure;

    use super::*;

    fn t() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap()
    }

    fn entry(id: i64, full_name: &str, host: &str) -> FileEntry {
        FileEntry {
            id: FileId::new(id),
            host: host.into(),
            name: full_name.rsplit('/').next().unwrap().into(),
            full_name: full_name.into(),
            hash: "ffffffffffffffffffff".into(),
            updated: t(),
            length: 42,
            creation_time_utc: t(),
            last_access_time_utc: t(),
            last_write_time_utc: t(),
        }
    }

    fn hash(host: &str, digest: &str) -> HashEntry {
        HashEntry {
            host: host.into(),
            hash: digest.into(),
            updated: t(),
            length: 7,
            creation_time_utc: t(),
            last_access_time_utc: t(),
            last_write_time_utc: t(),
        }
    }

    fn report() -> SyncReport {
        SyncReport {
            scanned: 25,
            up_to_date: 5,
            hashed: 20,
            uploaded: 20,
            batches: 2,
            failures: Vec::new(),
            duration_ms: 1500,
        }
    }

    #[test]
    fn short_hash_truncates_long_digests_only() {
        assert_eq!(short_hash("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_hash("abc"), "abc");
        assert_eq!(short_hash(""), "");
    }

    #[test]
    fn count_pluralizes() {
        assert_eq!(count(0, "file"), "0 files");
        assert_eq!(count(1, "file"), "1 file");
        assert_eq!(count(2, "singleton"), "2 singletons");
    }

    #[test]
    fn durations_switch_to_seconds() {
        assert_eq!(duration(250), "250ms");
        assert_eq!(duration(1500), "1.5s");
    }

    #[test]
    fn empty_views_say_so() {
        assert_eq!(entries(&[], "singleton"), vec![Line::Detail("No singletons".into())]);
        assert_eq!(comparisons(&[], "duplicate"), vec![Line::Detail("No duplicates".into())]);
        assert_eq!(catalogs(&[]), vec![Line::Detail("No catalogs".into())]);
    }

    #[test]
    fn entry_lines_show_id_path_and_host() {
        let lines = entries(&[entry(7, "docs/a.txt", "laptop")], "record");

        assert_eq!(lines[0], Line::Ok("1 record".into()));
        let Line::Detail(line) = &lines[1] else {
            panic!("expected a detail line, got {:?}", lines[1]);
        };
        assert!(line.starts_with("[7] docs/a.txt"));
        assert!(line.contains("laptop"));
        assert!(line.contains("ffffffffffff "));
        assert!(line.ends_with("42 bytes"));
    }

    #[test]
    fn comparisons_list_every_host_under_its_file() {
        let files = vec![FileComparison {
            id: FileId::new(3),
            name: "a.txt".into(),
            full_name: "docs/a.txt".into(),
            hashes: vec![hash("host1", "aaaa"), hash("host2", "bbbb")],
        }];

        let lines = comparisons(&files, "difference");

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], Line::Ok("1 difference".into()));
        assert_eq!(lines[1], Line::Detail("[3] docs/a.txt".into()));
        let Line::Detail(host2) = &lines[3] else {
            panic!("expected a detail line, got {:?}", lines[3]);
        };
        assert!(host2.contains("host2"));
        assert!(host2.contains("bbbb"));
        assert!(host2.ends_with("7 bytes  2024-01-01 12:30:00"));
    }

    #[test]
    fn report_counts_batches() {
        let lines = sync_report(&report(), false);

        assert_eq!(lines[0], Line::Ok("Sync completed in 1.5s".into()));
        assert!(lines.contains(&Line::Detail("Scanned:    25 files".into())));
        assert!(lines.contains(&Line::Detail("Uploaded:   20 in 2 batches".into())));
    }

    #[test]
    fn dry_run_report_shows_pending_uploads() {
        let mut report = report();
        report.uploaded = 0;
        report.batches = 0;

        let lines = sync_report(&report, true);

        assert!(lines.contains(&Line::Detail("Would upload: 20".into())));
        assert!(!lines.iter().any(|l| matches!(l, Line::Detail(s) if s.starts_with("Uploaded"))));
    }

    #[test]
    fn unchanged_tree_is_up_to_date() {
        let report = SyncReport {
            scanned: 3,
            up_to_date: 3,
            hashed: 0,
            uploaded: 0,
            batches: 0,
            failures: Vec::new(),
            duration_ms: 12,
        };

        assert_eq!(sync_report(&report, false)[0], Line::Ok("Already up to date".into()));
    }

    #[test]
    fn hash_failures_are_warned() {
        let mut report = report();
        report.failures.push(HashFailure {
            path: "locked.bin".into(),
            message: "Permission denied".into(),
        });

        let lines = sync_report(&report, false);

        assert!(lines.contains(&Line::Warn("1 file could not be hashed:".into())));
        assert_eq!(
            lines.last(),
            Some(&Line::Detail("  - locked.bin: Permission denied".into()))
        );
    }
}
