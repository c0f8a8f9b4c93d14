//! Tracking module for the append-only data files.
//!
//! Provides functionality for:
//! - Parsing `<time>,<current>,<voltage>` lines
//! - Incremental re-reading of each tracked file via a per-file line cursor
//! - Filesystem subscriptions that report modifications of a tracked file
//!
//! Nothing in here touches the UI. Watchers hand change notifications to a callback,
//! and the UI decides on which thread the refresh runs.

pub mod record_parser;
pub mod store;
pub mod types;
pub mod watcher;

pub use store::DataStore;
pub use types::{Record, TrackedFile};
pub use watcher::FileWatcher;
