//! # Plot Renderer
//!
//! Draws current and voltage against time for one tracked file, or for every tracked
//! file laid out two per row. Rendering only reads the [`TrackedFile`]s it is given;
//! egui rebuilds the chart from scratch every frame, so a redraw with unchanged data
//! looks the same.

use eframe::egui;
use egui::Color32;
use egui_extras::{Size, StripBuilder};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use std::hash::Hash;

use crate::tracking::{Record, TrackedFile};

pub const X_AXIS_LABEL: &str = "Time (s)";
pub const Y_AXIS_LABEL: &str = "Values";
pub const CURRENT_SERIES_NAME: &str = "Current (A)";
pub const VOLTAGE_SERIES_NAME: &str = "Voltage (V)";
pub const CURRENT_COLOR: Color32 = Color32::BLUE;
pub const VOLTAGE_COLOR: Color32 = Color32::RED;

/// Columns of the grid layout.
const GRID_COLUMNS: usize = 2;

/// What a window draws into.
pub enum RenderTarget<'a> {
    /// One full-size chart.
    Single(&'a TrackedFile),
    /// One chart per file, two per row.
    Grid(Vec<&'a TrackedFile>),
}

/// Points of the two line series, both against `time`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub current: Vec<[f64; 2]>,
    pub voltage: Vec<[f64; 2]>,
}

impl ChartSeries {
    pub fn from_records(records: &[Record]) -> Self {
        Self {
            current: records.iter().map(|r| [r.time, r.current]).collect(),
            voltage: records.iter().map(|r| [r.time, r.voltage]).collect(),
        }
    }
}

/// Title shown above a single-file chart.
pub fn single_chart_title(filename: &str) -> String {
    format!("Real-time Data Plot - {}", filename)
}

/// Render `target` into `ui`. `id_salt` keeps plot memory apart between windows.
pub fn render(ui: &mut egui::Ui, id_salt: impl Hash + Copy, target: RenderTarget<'_>) {
    match target {
        RenderTarget::Single(file) => {
            draw_chart(ui, (id_salt, file.name()), &single_chart_title(file.name()), file.records());
        }
        RenderTarget::Grid(files) => render_grid(ui, id_salt, &files),
    }
}

fn render_grid(ui: &mut egui::Ui, id_salt: impl Hash + Copy, files: &[&TrackedFile]) {
    let rows: Vec<&[&TrackedFile]> = files.chunks(GRID_COLUMNS).collect();
    StripBuilder::new(ui).sizes(Size::remainder(), rows.len()).vertical(|mut strip| {
        for row in rows {
            strip.strip(|builder| {
                builder.sizes(Size::remainder(), GRID_COLUMNS).horizontal(|mut strip| {
                    for column in 0..GRID_COLUMNS {
                        strip.cell(|ui| {
                            if let Some(file) = row.get(column) {
                                draw_chart(ui, (id_salt, file.name()), file.name(), file.records());
                            }
                        });
                    }
                });
            });
        }
    });
}

fn draw_chart(ui: &mut egui::Ui, id: impl Hash, title: &str, records: &[Record]) {
    let series = ChartSeries::from_records(records);

    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(title).strong().size(16.0));
    });

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(X_AXIS_LABEL)
        .y_axis_label(Y_AXIS_LABEL)
        .show_grid(true)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(CURRENT_SERIES_NAME, PlotPoints::from(series.current)).color(CURRENT_COLOR));
            plot_ui.line(Line::new(VOLTAGE_SERIES_NAME, PlotPoints::from(series.voltage)).color(VOLTAGE_COLOR));
        });
}
