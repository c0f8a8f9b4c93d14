//! # Plot Windows
//!
//! Each window is its own egui viewport, shown with `show_viewport_immediate` so it is
//! drawn on the UI thread as part of the root frame. Backends that cannot open native
//! windows get an embedded `egui::Window` instead.
//!
//! A single-file window is bound to one tracked file and reads it live from the
//! [`DataStore`]. The grid window shows every tracked file; unless configured as live
//! it keeps a copy of the records taken when it was opened.

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use super::plot_renderer::{self, RenderTarget};
use crate::tracking::{DataStore, TrackedFile};

/// Most recent records listed in the table under a single-file chart.
const RECORDS_TABLE_ROWS: usize = 200;

const SINGLE_WINDOW_SIZE: [f32; 2] = [900.0, 620.0];
const GRID_WINDOW_SIZE: [f32; 2] = [1000.0, 1000.0];

/// What a window is bound to.
#[derive(Debug)]
pub enum WindowKind {
    Single(String),
    /// `snapshot` is `None` for a live grid.
    Grid { snapshot: Option<Vec<TrackedFile>> },
}

#[derive(Debug)]
pub struct PlotWindow {
    id: u64,
    kind: WindowKind,
    /// Cleared when the user closes the window.
    pub open: bool,
}

impl PlotWindow {
    pub fn single(id: u64, filename: &str) -> Self {
        Self {
            id,
            kind: WindowKind::Single(filename.to_string()),
            open: true,
        }
    }

    /// Grid over every tracked file. A static grid copies the store as it is now.
    pub fn grid(id: u64, store: &DataStore, live: bool) -> Self {
        let snapshot = if live { None } else { Some(store.files().to_vec()) };
        Self {
            id,
            kind: WindowKind::Grid { snapshot },
            open: true,
        }
    }

    pub fn kind(&self) -> &WindowKind {
        &self.kind
    }

    pub fn title(&self) -> String {
        match &self.kind {
            WindowKind::Single(filename) => format!("Plot - {}", filename),
            WindowKind::Grid { .. } => "Grid View".to_string(),
        }
    }

    pub fn viewport_id(&self) -> egui::ViewportId {
        egui::ViewportId::from_hash_of(("plot_window", self.id))
    }

    /// Whether a change to `filename` should repaint this window.
    pub fn is_bound_to(&self, filename: &str) -> bool {
        match &self.kind {
            WindowKind::Single(bound) => bound == filename,
            WindowKind::Grid { snapshot } => snapshot.is_none(),
        }
    }

    /// Draw the window for this frame and clear `open` if the user closed it.
    pub fn show(&mut self, ctx: &egui::Context, store: &DataStore, show_records: &mut bool) {
        let title = self.title();
        let size = match self.kind() {
            WindowKind::Single(_) => SINGLE_WINDOW_SIZE,
            WindowKind::Grid { .. } => GRID_WINDOW_SIZE,
        };
        let viewport_id = self.viewport_id();
        let builder = egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size(size)
            .with_resizable(true);

        let mut close_requested = false;
        ctx.show_viewport_immediate(viewport_id, builder, |ctx, class| {
            if class == egui::ViewportClass::Embedded {
                let mut open = true;
                egui::Window::new(title.as_str())
                    .id(egui::Id::new(viewport_id))
                    .open(&mut open)
                    .resizable(true)
                    .default_size(egui::vec2(size[0] * 0.8, size[1] * 0.6))
                    .show(ctx, |ui| self.contents(ui, store, show_records));
                close_requested = !open;
            } else {
                egui::CentralPanel::default().show(ctx, |ui| self.contents(ui, store, show_records));
                close_requested = ctx.input(|i| i.viewport().close_requested());
            }
        });

        if close_requested {
            log::debug!("Closed window '{}'", title);
            self.open = false;
        }
    }

    fn contents(&self, ui: &mut egui::Ui, store: &DataStore, show_records: &mut bool) {
        match &self.kind {
            WindowKind::Single(filename) => {
                let Some(file) = store.get(filename) else {
                    ui.label(format!("'{}' is not tracked", filename));
                    return;
                };
                egui::TopBottomPanel::bottom(egui::Id::new(("plot_status", self.id))).show_inside(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(status_text(file));
                        ui.separator();
                        ui.checkbox(show_records, "Show latest records");
                    });
                    if *show_records {
                        ui.push_id(("records", self.id), |ui| records_table(ui, file));
                    }
                });
                egui::CentralPanel::default().show_inside(ui, |ui| {
                    plot_renderer::render(ui, self.id, RenderTarget::Single(file));
                });
            }
            WindowKind::Grid { snapshot } => {
                let files: Vec<&TrackedFile> = match snapshot {
                    Some(files) => files.iter().collect(),
                    None => store.files().iter().collect(),
                };
                plot_renderer::render(ui, self.id, RenderTarget::Grid(files));
            }
        }
    }
}

/// One-line summary under a single-file chart.
pub fn status_text(file: &TrackedFile) -> String {
    let refreshed = match file.last_refreshed() {
        Some(at) => at.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    };
    format!("{} records | {} lines read | last refresh {}", file.records().len(), file.cursor(), refreshed)
}

/// Newest-first table of the last records.
fn records_table(ui: &mut egui::Ui, file: &TrackedFile) {
    let records = file.records();
    let row_count = records.len().min(RECORDS_TABLE_ROWS);
    let row_height = 18.0;

    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(160.0)
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong("Time (s)");
            });
            header.col(|ui| {
                ui.strong(plot_renderer::CURRENT_SERIES_NAME);
            });
            header.col(|ui| {
                ui.strong(plot_renderer::VOLTAGE_SERIES_NAME);
            });
        })
        .body(|body| {
            body.rows(row_height, row_count, |mut row| {
                let record_idx = records.len() - 1 - row.index();
                let record = &records[record_idx];
                row.col(|ui| {
                    ui.label(format!("{}", record_idx + 1));
                });
                row.col(|ui| {
                    ui.monospace(format!("{:.3}", record.time));
                });
                row.col(|ui| {
                    ui.colored_label(plot_renderer::CURRENT_COLOR, format!("{:.4}", record.current));
                });
                row.col(|ui| {
                    ui.colored_label(plot_renderer::VOLTAGE_COLOR, format!("{:.4}", record.voltage));
                });
            });
        });
}
