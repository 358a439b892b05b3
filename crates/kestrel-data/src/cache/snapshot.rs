//! Timestamped Parquet snapshot cache.
//!
//! Snapshots are stored as `{prefix}_{YYYYMMDD_HHMMSS}.parquet` in a single
//! directory. The timestamp suffix sorts lexicographically in time order, so
//! the latest snapshot is the greatest file name for a prefix.

use crate::error::{DataError, Result};
use chrono::NaiveDateTime;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Format of the timestamp suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const EXTENSION: &str = "parquet";

/// True when `ts` is a well-formed snapshot timestamp.
pub fn is_timestamp(ts: &str) -> bool {
    NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).is_ok()
}

/// Current local time formatted as a snapshot timestamp.
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Directory of timestamped snapshots sharing a file prefix.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
    prefix: String,
}

impl SnapshotCache {
    /// Create a cache rooted at `dir` for files named `{prefix}_*.parquet`.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a snapshot with the given timestamp is stored at.
    pub fn path_for(&self, timestamp: &str) -> PathBuf {
        self.dir
            .join(format!("{}_{}.{}", self.prefix, timestamp, EXTENSION))
    }

    /// Timestamp suffix of a snapshot file name, if it belongs to this cache.
    fn timestamp_of<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('_')?
            .strip_suffix(".parquet")
            .filter(|ts| is_timestamp(ts))
    }

    /// All snapshots, oldest first. A missing directory has no snapshots.
    ///
    /// Files whose suffix is not a `YYYYMMDD_HHMMSS` timestamp are skipped.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut snapshots = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(ts) = self.timestamp_of(name) {
                snapshots.push((ts.to_string(), entry.path()));
            }
        }
        snapshots.sort();

        Ok(snapshots.into_iter().map(|(_, path)| path).collect())
    }

    /// Most recent snapshot, if any.
    pub fn latest(&self) -> Result<Option<PathBuf>> {
        Ok(self.list()?.pop())
    }

    /// Read a snapshot.
    pub fn read(&self, path: &Path) -> Result<DataFrame> {
        let file = File::open(path)?;
        Ok(ParquetReader::new(file).finish()?)
    }

    /// Write a snapshot under `timestamp`, creating the directory if needed.
    pub fn write(&self, df: &mut DataFrame, timestamp: &str) -> Result<PathBuf> {
        if !is_timestamp(timestamp) {
            return Err(DataError::Cache(format!("invalid timestamp: {timestamp:?}")));
        }
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(timestamp);
        let file = File::create(&path)?;
        ParquetWriter::new(file).finish(df)?;
        Ok(path)
    }
}
