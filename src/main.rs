use eframe::egui;
use env_logger::Builder;
use log::{LevelFilter, error, info};
use std::path::Path;

mod config;
mod tracking;
mod ui;

use config::PlotterConfig;
use ui::AppState;

fn main() {
    let (config, config_error) = match PlotterConfig::load_or_default(Path::new(".")) {
        Ok(config) => (config, None),
        Err(e) => (PlotterConfig::default(), Some(e)),
    };

    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("bak_multiplot"), config.crate_log_level().unwrap_or(LevelFilter::Debug))
        .init();

    if let Some(e) = config_error {
        error!("Ignoring {}: {:#}", config::CONFIG_FILE_NAME, e);
    }
    info!("Starting up, tracking {:?} in {}", config.tracked_files, config.data_dir.display());

    let ui_task_channel = ui::leak_ui_task_channel();
    let ui_task_rx = ui_task_channel.receiver();
    let ui_task_tx = ui_task_channel.sender();

    // The GUI runs on the main thread (required on macOS); watchers bring their own threads
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([320.0, 360.0]),
        ..Default::default()
    };
    if let Err(e) = eframe::run_native(
        "Data Plotter",
        native_options,
        Box::new(move |cc| Ok(Box::new(AppState::new(config, ui_task_rx, ui_task_tx, cc.storage)))),
    ) {
        error!("GUI terminated with error: {}", e);
    }
}
