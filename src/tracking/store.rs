//! Registry of tracked files and the incremental refresh that feeds it.
//!
//! The registry is built once at start-up from the configuration and owned by the
//! UI state. Only [`DataStore::refresh`] mutates it, and it is only called on the UI
//! thread, so no locking is involved.

use chrono::Local;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::record_parser::{RecordParseError, parse_record_line};
use super::types::TrackedFile;
use crate::config::PlotterConfig;

/// Failure modes of a single refresh. None of them is fatal to the process.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("'{0}' is not a tracked file")]
    UnknownFile(String),
    #[error("File '{}' not found", .0.display())]
    FileNotFound(PathBuf),
    #[error("File '{}' is empty", .0.display())]
    EmptyFile(PathBuf),
    #[error("Malformed record in '{}' at line {line}: '{content}': {source}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        content: String,
        #[source]
        source: RecordParseError,
    },
    #[error("Error reading '{}': {source}", .path.display())]
    UnexpectedIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Fixed set of tracked files, in configuration order.
#[derive(Debug)]
pub struct DataStore {
    data_dir: PathBuf,
    files: Vec<TrackedFile>,
}

impl DataStore {
    /// Create an empty record buffer for every name, resolved against `data_dir`.
    pub fn new<S: AsRef<str>>(data_dir: impl Into<PathBuf>, names: &[S]) -> Self {
        let data_dir = data_dir.into();
        let files = names
            .iter()
            .map(|name| TrackedFile::new(name.as_ref(), data_dir.join(name.as_ref())))
            .collect();
        Self { data_dir, files }
    }

    pub fn from_config(config: &PlotterConfig) -> Self {
        Self::new(config.data_dir.clone(), config.tracked_files.as_slice())
    }

    /// Directory the tracked files live in.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn get(&self, name: &str) -> Option<&TrackedFile> {
        self.files.iter().find(|f| f.name() == name)
    }

    pub fn files(&self) -> &[TrackedFile] {
        &self.files
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.name())
    }

    /// Read lines appended since the last refresh and append their records.
    ///
    /// Returns the number of records appended. On `MalformedRecord` the records parsed
    /// before the bad line stay appended, the cursor stops in front of it and the line is
    /// retried on the next refresh without appending the prefix again. The other errors
    /// leave the file's state untouched.
    pub fn refresh(&mut self, name: &str) -> Result<usize, RefreshError> {
        let file = self
            .files
            .iter_mut()
            .find(|f| f.name() == name)
            .ok_or_else(|| RefreshError::UnknownFile(name.to_string()))?;
        let path = file.path().to_path_buf();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(RefreshError::FileNotFound(path)),
            Err(source) => return Err(RefreshError::UnexpectedIo { path, source }),
        };

        let lines: Vec<&str> = content.lines().collect();
        if lines.is_empty() {
            return Err(RefreshError::EmptyFile(path));
        }

        let start = file.cursor;
        if lines.len() < start {
            log::warn!(
                "'{}' shrank to {} lines, below cursor {}; waiting for it to grow again",
                path.display(),
                lines.len(),
                start
            );
            return Ok(0);
        }

        let mut appended = 0;
        for (offset, line) in lines[start..].iter().enumerate() {
            match parse_record_line(line) {
                Ok(record) => {
                    file.records.push(record);
                    appended += 1;
                }
                Err(source) => {
                    file.cursor = start + appended;
                    if appended > 0 {
                        file.last_refreshed = Some(Local::now());
                    }
                    return Err(RefreshError::MalformedRecord {
                        path,
                        line: start + offset + 1,
                        content: line.to_string(),
                        source,
                    });
                }
            }
        }

        file.cursor = lines.len();
        file.last_refreshed = Some(Local::now());
        log::debug!("Refreshed '{}': {} new records, cursor {}", name, appended, file.cursor);
        Ok(appended)
    }

    /// [`refresh`](Self::refresh), reporting any failure through the log.
    pub fn refresh_reporting(&mut self, name: &str) -> Option<usize> {
        match self.refresh(name) {
            Ok(appended) => Some(appended),
            Err(e) => {
                match &e {
                    RefreshError::EmptyFile(_) | RefreshError::MalformedRecord { .. } => log::warn!("{}", e),
                    _ => log::error!("{}", e),
                }
                None
            }
        }
    }
}
