use eframe::egui;
use crate::app::app_core::ThermalApp;
use crate::plotter::ChartView;
use crate::config::DataConfig;
use crate::types::{ReadingTable, TimeUnit};
use crate::utils::{format_timestamp, format_value};

pub fn render_main_panel(app: &mut ThermalApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(table) = app.state.dataset.table.as_ref() else {
            ui.centered_and_justified(|ui| {
                ui.label("📂 Open a thermal log (Ctrl+O) or drop a CSV file here");
            });
            return;
        };

        egui::ScrollArea::vertical().show(ui, |ui| {
            let config = app.config.get_config();
            let chart = &mut app.state.chart;
            let view = ChartView {
                title: &chart.title,
                unit: chart.unit,
                y_mode: chart.y_mode,
                signals: &chart.selected_signals,
                show_speed: chart.show_speed,
            };
            chart
                .chart
                .ui(ui, table, &view, &mut app.state.set_points.set, config);

            if chart.selected_signals.is_empty() {
                ui.colored_label(egui::Color32::GRAY, "Select signals in the side panel to plot them");
            }

            ui.add_space(10.0);
            egui::CollapsingHeader::new("Data Preview")
                .default_open(false)
                .show(ui, |ui| render_preview(table, &config.data, ui));
        });
    });
}

fn render_preview(table: &ReadingTable, config: &DataConfig, ui: &mut egui::Ui) {
    let rows = table.len().min(config.preview_rows);
    let minutes = table.elapsed(TimeUnit::Minute);

    ui.label(format!("First {} of {} rows", rows, table.len()));
    egui::ScrollArea::horizontal().id_salt("preview_scroll").show(ui, |ui| {
        egui::Grid::new("data_preview")
            .striped(true)
            .show(ui, |ui| {
                ui.strong(&config.time_column);
                ui.strong(TimeUnit::Minute.column_name());
                for column in table.columns() {
                    ui.strong(&column.name);
                }
                ui.end_row();

                for row in 0..rows {
                    ui.label(format_timestamp(&table.timestamps()[row]));
                    ui.label(format!("{:.2}", minutes[row]));
                    for column in table.columns() {
                        ui.label(format_value(column.values[row], ""));
                    }
                    ui.end_row();
                }
            });
    });
}
