//! # Application State Management
//!
//! This module implements the central `AppState` struct which owns the data store,
//! the open plot windows and the file watchers. It implements the `eframe::App`
//! trait to integrate with the egui application framework.
//!
//! ## Responsibilities
//!
//! - Drains [`UiTask`]s sent by watcher threads and runs the refreshes on the UI thread
//! - Opens plot windows from main window clicks (initial refresh, then a watcher)
//! - Draws the main window and every open plot window each frame
//! - Persists user settings (records table visibility) across sessions
//!
//! ## Watcher lifetime
//!
//! Every single-file window opened creates a new watcher, and watchers are kept until
//! the process exits even after their window is closed. Repeated opens of the same
//! file therefore stack up subscriptions, each of which triggers its own refresh.

use eframe::egui;
use serde::{Deserialize, Serialize};

use super::main_window::{self, MainWindowAction};
use super::plot_window::PlotWindow;
use super::{UiTask, UiTaskReceiver, UiTaskSender};
use crate::config::PlotterConfig;
use crate::tracking::{DataStore, FileWatcher};

/// Central application state.
pub struct AppState {
    pub config: PlotterConfig,
    /// Records of every tracked file. Only mutated on the UI thread.
    pub store: DataStore,
    /// Receiver for tasks queued by watcher threads.
    pub ui_task_rx: UiTaskReceiver,
    /// Handed to every watcher.
    pub ui_task_tx: UiTaskSender,
    /// Open plot windows, in opening order.
    pub windows: Vec<PlotWindow>,
    /// Every watcher created so far.
    pub watchers: Vec<FileWatcher>,
    next_window_id: u64,
    /// Whether single-file windows list their latest records.
    pub show_records: bool,
}

/// Settings persisted across application sessions.
#[derive(Default, Serialize, Deserialize)]
struct PersistedSettings {
    show_records: bool,
}

impl AppState {
    /// Create the state with an empty store, loading persisted settings if available.
    pub fn new(config: PlotterConfig, rx: UiTaskReceiver, tx: UiTaskSender, storage: Option<&dyn eframe::Storage>) -> Self {
        let persisted: PersistedSettings = storage.and_then(|s| eframe::get_value(s, "app_settings")).unwrap_or_default();
        let store = DataStore::from_config(&config);

        Self {
            config,
            store,
            ui_task_rx: rx,
            ui_task_tx: tx,
            windows: Vec::new(),
            watchers: Vec::new(),
            next_window_id: 0,
            show_records: persisted.show_records,
        }
    }

    fn allocate_window_id(&mut self) -> u64 {
        let id = self.next_window_id;
        self.next_window_id += 1;
        id
    }

    /// Open a live window for one tracked file.
    pub fn open_plot_window(&mut self, ctx: &egui::Context, filename: &str) {
        if self.store.get(filename).is_none() {
            log::error!("Cannot open plot for untracked file '{}'", filename);
            return;
        }

        self.store.refresh_reporting(filename);
        let id = self.allocate_window_id();
        self.windows.push(PlotWindow::single(id, filename));
        self.spawn_watcher(ctx, filename);
    }

    /// Open the grid over all tracked files, loading each one first.
    pub fn open_grid_window(&mut self, ctx: &egui::Context) {
        let names: Vec<String> = self.store.names().map(str::to_string).collect();
        for name in &names {
            self.store.refresh_reporting(name);
        }

        let id = self.allocate_window_id();
        self.windows.push(PlotWindow::grid(id, &self.store, self.config.live_grid));
        if self.config.live_grid {
            for name in &names {
                self.spawn_watcher(ctx, name);
            }
        }
    }

    fn spawn_watcher(&mut self, ctx: &egui::Context, filename: &str) {
        let tx = self.ui_task_tx;
        let ctx = ctx.clone();
        let result = FileWatcher::spawn(self.store.data_dir(), filename, move |name| {
            match tx.try_send(UiTask::RefreshAndRedraw { filename: name.to_string() }) {
                Ok(()) => ctx.request_repaint(),
                Err(_) => log::warn!("UI task queue full, dropping refresh of '{}'", name),
            }
        });

        match result {
            Ok(watcher) => {
                log::debug!("{} watcher(s) active, newest on '{}'", self.watchers.len() + 1, watcher.filename());
                self.watchers.push(watcher);
            }
            Err(e) => log::error!("Failed to watch '{}': {}", filename, e),
        }
    }

    /// Run every queued task. Returns how many were processed.
    pub fn process_pending_tasks(&mut self, ctx: &egui::Context) -> usize {
        let mut processed = 0;
        while let Ok(task) = self.ui_task_rx.try_receive() {
            match task {
                UiTask::RefreshAndRedraw { filename } => {
                    self.store.refresh_reporting(&filename);
                    for window in self.windows.iter().filter(|w| w.open && w.is_bound_to(&filename)) {
                        ctx.request_repaint_of(window.viewport_id());
                    }
                }
            }
            processed += 1;
        }
        processed
    }
}

impl eframe::App for AppState {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            show_records: self.show_records,
        };
        eframe::set_value(storage, "app_settings", &settings);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_pending_tasks(ctx);

        let action = main_window::render(ctx, self.store.names(), self.windows.len());
        match action {
            Some(MainWindowAction::OpenPlot(filename)) => self.open_plot_window(ctx, &filename),
            Some(MainWindowAction::OpenGrid) => self.open_grid_window(ctx),
            None => {}
        }

        for window in &mut self.windows {
            window.show(ctx, &self.store, &mut self.show_records);
        }
        self.windows.retain(|w| w.open);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::leak_ui_task_channel;
    use crate::ui::plot_renderer::ChartSeries;
    use crate::ui::plot_window::WindowKind;
    use std::io::Write;
    use std::path::Path;
    use std::time::{Duration, Instant};

    fn app_in(dir: &Path, live_grid: bool) -> AppState {
        let config = PlotterConfig {
            data_dir: dir.to_path_buf(),
            live_grid,
            ..PlotterConfig::default()
        };
        let channel = leak_ui_task_channel();
        AppState::new(config, channel.receiver(), channel.sender(), None)
    }

    fn append(path: &Path, text: &str) {
        let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path).unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file.sync_all().unwrap();
    }

    #[test]
    fn test_opening_plot_loads_history_and_watches() {
        let dir = tempfile::tempdir().expect("tempdir");
        append(&dir.path().join("data.bak"), "0,1,2\n");
        let mut app = app_in(dir.path(), false);
        let ctx = egui::Context::default();

        app.open_plot_window(&ctx, "data.bak");
        assert_eq!(app.store.get("data.bak").unwrap().records().len(), 1);
        assert_eq!(app.windows.len(), 1);
        assert_eq!(app.watchers.len(), 1);
        assert_eq!(app.watchers[0].filename(), "data.bak");
    }

    #[test]
    fn test_untracked_file_opens_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path(), false);
        app.open_plot_window(&egui::Context::default(), "other.bak");
        assert!(app.windows.is_empty());
        assert!(app.watchers.is_empty());
    }

    #[test]
    fn test_queued_task_refreshes_on_ui_thread() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data1.bak");
        append(&path, "0,1,2\n");
        let mut app = app_in(dir.path(), false);
        let ctx = egui::Context::default();
        app.store.refresh("data1.bak").unwrap();

        append(&path, "1,2,3\n");
        let task = UiTask::RefreshAndRedraw {
            filename: "data1.bak".to_string(),
        };
        app.ui_task_tx.try_send(task.clone()).unwrap();
        app.ui_task_tx.try_send(task).unwrap();

        assert_eq!(app.process_pending_tasks(&ctx), 2);
        assert_eq!(app.store.get("data1.bak").unwrap().records().len(), 2);
        assert_eq!(app.process_pending_tasks(&ctx), 0);
    }

    #[test]
    fn test_appended_line_reaches_bound_window() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.bak");
        append(&path, "0,1,2\n");
        let mut app = app_in(dir.path(), false);
        let ctx = egui::Context::default();
        app.open_plot_window(&ctx, "data.bak");

        append(&path, "1,2,3\n");
        let deadline = Instant::now() + Duration::from_secs(10);
        while app.store.get("data.bak").unwrap().records().len() < 2 && Instant::now() < deadline {
            app.process_pending_tasks(&ctx);
            std::thread::sleep(Duration::from_millis(20));
        }

        let series = ChartSeries::from_records(app.store.get("data.bak").unwrap().records());
        assert_eq!(series.current.len(), 2);
        assert_eq!(series.voltage.len(), 2);
        assert_eq!(app.windows[0].title(), "Plot - data.bak");
    }

    #[test]
    fn test_missing_file_is_loaded_once_created() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path(), false);
        let ctx = egui::Context::default();

        app.open_plot_window(&ctx, "data2.bak");
        assert_eq!(app.windows.len(), 1);
        assert_eq!(app.watchers.len(), 1);
        assert!(app.store.get("data2.bak").unwrap().records().is_empty());

        std::fs::write(dir.path().join("data2.bak"), "0,1,2\n").unwrap();
        let deadline = Instant::now() + Duration::from_secs(10);
        while app.store.get("data2.bak").unwrap().records().is_empty() && Instant::now() < deadline {
            app.process_pending_tasks(&ctx);
            std::thread::sleep(Duration::from_millis(20));
        }

        let file = app.store.get("data2.bak").unwrap();
        assert_eq!(file.records().len(), 1);
        assert_eq!(file.cursor(), 1);
    }

    #[test]
    fn test_closed_window_keeps_its_watcher() {
        let dir = tempfile::tempdir().expect("tempdir");
        append(&dir.path().join("data.bak"), "0,1,2\n");
        let mut app = app_in(dir.path(), false);
        let ctx = egui::Context::default();

        app.open_plot_window(&ctx, "data.bak");
        app.open_plot_window(&ctx, "data.bak");
        app.windows[0].open = false;
        app.windows.retain(|w| w.open);

        assert_eq!(app.windows.len(), 1);
        assert_eq!(app.watchers.len(), 2);
        // Reopening did not reload history
        assert_eq!(app.store.get("data.bak").unwrap().records().len(), 1);
    }

    #[test]
    fn test_static_grid_keeps_open_time_data() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.bak");
        append(&path, "0,1,2\n");
        let mut app = app_in(dir.path(), false);
        let ctx = egui::Context::default();

        // data1..3.bak are missing; the grid still opens
        app.open_grid_window(&ctx);
        assert!(app.watchers.is_empty());

        append(&path, "1,2,3\n");
        app.ui_task_tx
            .try_send(UiTask::RefreshAndRedraw {
                filename: "data.bak".to_string(),
            })
            .unwrap();
        app.process_pending_tasks(&ctx);
        assert_eq!(app.store.get("data.bak").unwrap().records().len(), 2);

        match app.windows[0].kind() {
            WindowKind::Grid { snapshot: Some(files) } => {
                assert_eq!(files.len(), 4);
                assert_eq!(files[0].records().len(), 1);
            }
            other => panic!("Expected static grid, got {:?}", other),
        }
    }

    #[test]
    fn test_live_grid_watches_every_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path(), true);
        app.open_grid_window(&egui::Context::default());

        assert_eq!(app.watchers.len(), 4);
        assert!(app.windows[0].is_bound_to("data3.bak"));
    }
}
