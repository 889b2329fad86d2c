//! Daily snapshot storage.
//!
//! Snapshots live in a directory tree keyed by date:
//! ```text
//! data/trending_data/
//! └── 2024/
//!     └── 01/
//!         ├── 01.json
//!         └── 02.json
//! ```
//! Each file holds a pretty-printed JSON array of [`TrendingRecord`]s.

mod error;
mod record;

pub use error::SnapshotError;
pub use record::{parse_count, Snapshot, TrendingRecord};

use chrono::{Datelike, NaiveDate};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of moving legacy flat snapshot files into the dated layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Files moved into `<YYYY>/<MM>/<DD>.json`.
    pub moved: usize,

    /// Files left in place because the target already existed.
    pub skipped: usize,
}

/// Directory-backed store of daily trending snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    /// Creates a store rooted at `root`. The directory is created lazily on save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file path for a given date.
    #[must_use]
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join(format!("{:04}", date.year()))
            .join(format!("{:02}", date.month()))
            .join(format!("{:02}.json", date.day()))
    }

    /// Writes a day's records, replacing any existing snapshot for that date.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the directory or file cannot be written.
    pub fn save(
        &self,
        date: NaiveDate,
        records: &[TrendingRecord],
    ) -> Result<PathBuf, SnapshotError> {
        let path = self.path_for(date);
        let json = serde_json::to_string_pretty(records).map_err(|e| SnapshotError::JsonError {
            path: path.display().to_string(),
            source: e,
        })?;
        write_file(&path, json.as_bytes())?;

        info!(path = %path.display(), count = records.len(), "Saved snapshot");
        Ok(path)
    }

    /// Loads the records captured on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::MissingSnapshot`] if no file exists for the date,
    /// or an I/O / JSON error if it can't be read.
    pub fn load(&self, date: NaiveDate) -> Result<Vec<TrendingRecord>, SnapshotError> {
        let path = self.path_for(date);
        if !path.exists() {
            return Err(SnapshotError::MissingSnapshot {
                date: date.to_string(),
                path: path.display().to_string(),
            });
        }
        read_records(&path)
    }

    /// Loads every snapshot under the root, sorted by date.
    ///
    /// Directories and files whose names aren't a valid date are ignored.
    /// Unreadable or malformed snapshot files are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::MissingRoot`] if the root directory doesn't exist,
    /// or an I/O error if a directory can't be listed.
    pub fn scan(&self) -> Result<Vec<Snapshot>, SnapshotError> {
        info!(path = %self.root.display(), "Scanning snapshot directory");

        if !self.root.is_dir() {
            return Err(SnapshotError::MissingRoot {
                path: self.root.display().to_string(),
            });
        }

        let mut snapshots = Vec::new();
        for (date, path) in self.dated_files()? {
            match read_records(&path) {
                Ok(records) => snapshots.push(Snapshot { date, records }),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping snapshot"),
            }
        }

        snapshots.sort_by_key(|s| s.date);
        info!(count = snapshots.len(), "Loaded snapshots");
        Ok(snapshots)
    }

    /// Moves legacy `<root>/YYYY-MM-DD.json` files into the dated layout.
    ///
    /// Existing targets are never overwritten; the legacy file is left in place
    /// and counted as skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the root can't be listed or a file can't be moved.
    pub fn migrate_flat_files(&self) -> Result<MigrationReport, SnapshotError> {
        let mut report = MigrationReport::default();

        for path in list_dir(&self.root)? {
            if !path.is_file() {
                continue;
            }
            let Some(date) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix(".json"))
                .and_then(|stem| NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok())
            else {
                continue;
            };

            let target = self.path_for(date);
            if target.exists() {
                warn!(
                    source = %path.display(),
                    target = %target.display(),
                    "Target already exists, skipping"
                );
                report.skipped += 1;
                continue;
            }

            if let Some(parent) = target.parent() {
                create_dir(parent)?;
            }
            std::fs::rename(&path, &target).map_err(|e| SnapshotError::IoError {
                path: path.display().to_string(),
                source: e,
            })?;
            info!(source = %path.display(), target = %target.display(), "Moved snapshot");
            report.moved += 1;
        }

        Ok(report)
    }

    /// Walks `<root>/<YYYY>/<MM>/<DD>.json` and returns each valid date with its path.
    fn dated_files(&self) -> Result<Vec<(NaiveDate, PathBuf)>, SnapshotError> {
        let mut files = Vec::new();

        for year_dir in list_dir(&self.root)? {
            let Some(year) = numeric_name(&year_dir, 4).filter(|_| year_dir.is_dir()) else {
                continue;
            };
            for month_dir in list_dir(&year_dir)? {
                let Some(month) = numeric_name(&month_dir, 2).filter(|_| month_dir.is_dir())
                else {
                    continue;
                };
                for day_file in list_dir(&month_dir)? {
                    let day = day_file
                        .file_name()
                        .and_then(|n| n.to_str())
                        .and_then(|n| n.strip_suffix(".json"))
                        .filter(|stem| stem.len() == 2)
                        .and_then(|stem| stem.parse::<u32>().ok());
                    let date = day.and_then(|d| NaiveDate::from_ymd_opt(year as i32, month, d));

                    match date {
                        Some(date) if day_file.is_file() => files.push((date, day_file)),
                        _ => debug!(path = %day_file.display(), "Ignoring non-snapshot entry"),
                    }
                }
            }
        }

        Ok(files)
    }
}

/// Reads and parses one snapshot file.
fn read_records(path: &Path) -> Result<Vec<TrendingRecord>, SnapshotError> {
    let content = std::fs::read_to_string(path).map_err(|e| SnapshotError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| SnapshotError::JsonError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parses a directory name consisting of exactly `width` ASCII digits.
fn numeric_name(path: &Path, width: usize) -> Option<u32> {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| n.len() == width && n.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|n| n.parse().ok())
}

fn list_dir(path: &Path) -> Result<Vec<PathBuf>, SnapshotError> {
    let entries = std::fs::read_dir(path).map_err(|e| SnapshotError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SnapshotError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

fn create_dir(path: &Path) -> Result<(), SnapshotError> {
    std::fs::create_dir_all(path).map_err(|e| SnapshotError::IoError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Replaces `path` with `contents` via a temp file in the same directory.
fn write_file(path: &Path, contents: &[u8]) -> Result<(), SnapshotError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    create_dir(parent)?;

    let io_error = |e: std::io::Error| SnapshotError::IoError {
        path: path.display().to_string(),
        source: e,
    };
    let mut file = tempfile::NamedTempFile::new_in(parent).map_err(io_error)?;
    file.write_all(contents).map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(name: &str, rank: u32) -> TrendingRecord {
        TrendingRecord {
            name: name.to_string(),
            link: format!("https://github.com/{name}"),
            description: String::new(),
            language: "Rust".to_string(),
            rank,
            stars: Some(10),
            forks: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn saves_under_dated_path() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path());

        let path = store.save(date(2024, 3, 7), &[record("a/b", 1)]).unwrap();

        assert_eq!(path, temp.path().join("2024/03/07.json"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  {"), "snapshot should be pretty-printed");
        assert_eq!(store.load(date(2024, 3, 7)).unwrap(), vec![record("a/b", 1)]);
    }

    #[test]
    fn load_missing_date() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path());

        let result = store.load(date(2024, 1, 1));
        assert!(matches!(result, Err(SnapshotError::MissingSnapshot { .. })));
    }

    #[test]
    fn scan_sorts_and_skips_malformed() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path());
        store.save(date(2024, 1, 3), &[record("c/c", 1)]).unwrap();
        store.save(date(2023, 12, 31), &[record("a/a", 1)]).unwrap();

        fs::write(temp.path().join("2024/01/02.json"), "{ not json").unwrap();
        fs::write(temp.path().join("2024/01/notes.txt"), "ignored").unwrap();
        fs::create_dir_all(temp.path().join("archive")).unwrap();

        let snapshots = store.scan().unwrap();
        let dates: Vec<_> = snapshots.iter().map(|s| s.date).collect();

        assert_eq!(dates, vec![date(2023, 12, 31), date(2024, 1, 3)]);
    }

    #[test]
    fn scan_ignores_impossible_dates() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("2024/02")).unwrap();
        fs::write(temp.path().join("2024/02/30.json"), "[]").unwrap();

        let store = SnapshotStore::new(temp.path());
        assert!(store.scan().unwrap().is_empty());
    }

    #[test]
    fn scan_missing_root() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path().join("nope"));

        assert!(matches!(store.scan(), Err(SnapshotError::MissingRoot { .. })));
    }

    #[test]
    fn migrates_flat_files() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path());
        fs::write(temp.path().join("2024-05-01.json"), "[]").unwrap();
        fs::write(temp.path().join("2024-05-02.json"), "[]").unwrap();
        fs::write(temp.path().join("readme.json"), "[]").unwrap();
        store.save(date(2024, 5, 2), &[record("x/y", 1)]).unwrap();

        let report = store.migrate_flat_files().unwrap();

        assert_eq!(report, MigrationReport { moved: 1, skipped: 1 });
        assert!(temp.path().join("2024/05/01.json").exists());
        assert!(!temp.path().join("2024-05-01.json").exists());
        assert!(temp.path().join("2024-05-02.json").exists());
        assert_eq!(store.load(date(2024, 5, 2)).unwrap().len(), 1);
        let dates: Vec<_> = store.scan().unwrap().iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(2024, 5, 1), date(2024, 5, 2)]);
    }
}
