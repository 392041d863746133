use eframe::egui;
use crate::app::app_core::ThermalApp;
use crate::app::handlers::{ExportHandler, FileHandler};

pub fn render_status_bar(app: &mut ThermalApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("status_bar")
        .min_height(40.0)
        .show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.heading("🌡 ThermalHub");
                ui.separator();

                if ui.button("📂 Open CSV").on_hover_text("Ctrl+O").clicked() {
                    FileHandler::open_dialog(app);
                }

                let has_data = app.state.has_data();
                if ui
                    .add_enabled(has_data, egui::Button::new("📤 Export"))
                    .on_hover_text("Ctrl+S")
                    .clicked()
                {
                    ExportHandler::export_dialog(app);
                }

                ui.separator();
                render_dataset_details(app, ui);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.add_enabled(has_data, egui::Button::new("📋 Summary")).clicked() {
                        app.state.dialogs.show_summary = !app.state.dialogs.show_summary;
                    }
                    let can_analyze = has_data && !app.state.set_points.set.is_empty();
                    if ui.add_enabled(can_analyze, egui::Button::new("📍 Set Point Analysis")).clicked() {
                        app.state.dialogs.show_analysis = !app.state.dialogs.show_analysis;
                    }
                });
            });
            ui.add_space(5.0);
        });
}

fn render_dataset_details(app: &ThermalApp, ui: &mut egui::Ui) {
    match (&app.state.dataset.table, &app.state.dataset.report) {
        (Some(table), Some(report)) => {
            ui.label(format!("File: {}", app.state.dataset.file_name));
            ui.separator();
            ui.label(format!("Rows: {}", table.len()));
            ui.separator();
            ui.label(format!("Sensors: {}", report.temperature_sensors));
            ui.separator();
            ui.label(format!(
                "Duration: {:.1} min",
                table.max_elapsed(crate::types::TimeUnit::Minute)
            ));
        }
        _ => {
            ui.colored_label(egui::Color32::GRAY, "No data loaded");
        }
    }
}

pub fn render_bottom_status_bar(app: &mut ThermalApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("bottom_status_bar")
        .min_height(25.0)
        .show(ctx, |ui| {
            ui.add_space(3.0);
            ui.horizontal(|ui| {
                ui.colored_label(app.state.status_level.color(), &app.state.status);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Groups: {}", app.state.active_groups().len()));
                    ui.separator();
                    ui.label(format!("Set points: {}", app.state.set_points.set.len()));
                    ui.separator();
                    ui.label(format!("Mode: {}", app.state.grouping.mode.label()));
                });
            });
            ui.add_space(3.0);
        });
}
