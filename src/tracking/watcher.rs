//! Filesystem change subscription for one tracked file.
//!
//! The watcher runs on notify's own background thread. It never touches the
//! [`DataStore`](super::store::DataStore): when the tracked file is modified it only
//! calls the supplied callback, which is expected to enqueue work for the UI thread.

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;

/// Live subscription to modifications of one file. Dropping it ends the subscription.
pub struct FileWatcher {
    filename: String,
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch `watch_dir` (non-recursively) and call `on_change(filename)` for every
    /// modification event whose path ends with `filename`.
    ///
    /// Rapid writes produce one callback per event; nothing is coalesced.
    pub fn spawn<F>(watch_dir: &Path, filename: &str, on_change: F) -> notify::Result<Self>
    where
        F: Fn(&str) + Send + 'static,
    {
        let tracked = filename.to_string();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if is_modification_of(&event, &tracked) {
                        on_change(&tracked);
                    }
                }
                Err(e) => log::warn!("Watch error for '{}': {}", tracked, e),
            },
            Config::default(),
        )?;
        watcher.watch(watch_dir, RecursiveMode::NonRecursive)?;
        log::info!("Watching '{}' in {}", filename, watch_dir.display());

        Ok(Self {
            filename: filename.to_string(),
            _watcher: watcher,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Whether `event` reports a modification of a file named `filename`.
///
/// The match is on trailing path components rather than a plain string suffix, so
/// `olddata.bak` does not match `data.bak`. Creation alone does not count; a newly
/// created file is picked up by the modification that writes its first line.
pub fn is_modification_of(event: &Event, filename: &str) -> bool {
    matches!(event.kind, EventKind::Modify(_)) && event.paths.iter().any(|path| path.ends_with(filename))
}
