// UI module for the data plotter
//
// This module organizes the UI into separate components:
// - `main_window`: Root window with one button per tracked file plus the grid button
// - `plot_window`: Single-file and grid plot windows, one viewport each
// - `plot_renderer`: Chart drawing for one or several tracked files
// - `app_state`: Application state management and main update loop

pub mod app_state;
pub mod main_window;
pub mod plot_renderer;
pub mod plot_window;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

pub use app_state::AppState;

/// Capacity of the queue between watcher threads and the UI thread.
pub const UI_TASK_CHANNEL_SIZE: usize = 100;
pub type UiTaskChannel = embassy_sync::channel::Channel<CriticalSectionRawMutex, UiTask, UI_TASK_CHANNEL_SIZE>;
pub type UiTaskReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, UiTask, UI_TASK_CHANNEL_SIZE>;
pub type UiTaskSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, UiTask, UI_TASK_CHANNEL_SIZE>;

/// Work that background threads hand to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiTask {
    /// Re-read the named tracked file, then redraw every window bound to it.
    RefreshAndRedraw { filename: String },
}

/// Allocate the task channel for the lifetime of the process.
pub fn leak_ui_task_channel() -> &'static UiTaskChannel {
    Box::leak(Box::new(UiTaskChannel::new()))
}
