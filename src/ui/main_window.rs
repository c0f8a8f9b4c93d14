//! Root window: one button per tracked file plus one for the grid view.

use eframe::egui;

/// Button clicked in the main window this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainWindowAction {
    OpenPlot(String),
    OpenGrid,
}

/// Render the button column and report which button, if any, was clicked.
pub fn render<'a>(ctx: &egui::Context, tracked_files: impl Iterator<Item = &'a str>, open_windows: usize) -> Option<MainWindowAction> {
    let mut action = None;
    let button_size = egui::vec2(220.0, 30.0);

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.heading("Data Plotter");
            ui.add_space(10.0);

            for filename in tracked_files {
                if ui.add_sized(button_size, egui::Button::new(format!("Open {} Plot", filename))).clicked() {
                    action = Some(MainWindowAction::OpenPlot(filename.to_string()));
                }
                ui.add_space(5.0);
            }

            if ui.add_sized(button_size, egui::Button::new("Open Grid View")).clicked() {
                action = Some(MainWindowAction::OpenGrid);
            }

            ui.add_space(10.0);
            ui.label(egui::RichText::new(format!("{} plot window(s) open", open_windows)).weak());
        });
    });

    action
}
