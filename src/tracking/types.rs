//! Type definitions specific to the tracking module.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// One parsed line of a tracked file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// Seconds, used as the x-axis.
    pub time: f64,
    pub current: f64,
    pub voltage: f64,
}

impl Record {
    pub fn new(time: f64, current: f64, voltage: f64) -> Self {
        Self { time, current, voltage }
    }
}

/// In-memory state of one tracked file.
///
/// Records are append-only and `cursor` never decreases; both are only changed by
/// [`DataStore::refresh`](super::store::DataStore::refresh).
#[derive(Debug, Clone)]
pub struct TrackedFile {
    name: String,
    path: PathBuf,
    pub(super) records: Vec<Record>,
    pub(super) cursor: usize,
    pub(super) last_refreshed: Option<DateTime<Local>>,
}

impl TrackedFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            records: Vec::new(),
            cursor: 0,
            last_refreshed: None,
        }
    }

    /// File name as configured, e.g. `data.bak`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved on-disk location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of lines already consumed from the file.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Local time of the last refresh that appended records or completed without error.
    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }
}
