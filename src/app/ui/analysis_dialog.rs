use eframe::egui;
use crate::app::app_core::ThermalApp;
use crate::plotter::palette_color;
use crate::utils::{format_elapsed, format_value};

pub fn render_analysis_dialog(app: &mut ThermalApp, ctx: &egui::Context) {
    if !app.state.dialogs.show_analysis {
        return;
    }
    let Some(table) = app.state.dataset.table.as_ref() else {
        return;
    };

    let config = app.config.get_config();
    let unit = app.state.chart.unit;
    let mut signals = app.state.chart.selected_signals.clone();
    if table.has_column(&config.data.speed_column) {
        signals.push(config.data.speed_column.clone());
    }
    let samples = app.state.set_points.set.sample_all(table, unit, &signals);
    let delta = app.state.set_points.set.time_difference();

    let mut open = app.state.dialogs.show_analysis;
    egui::Window::new("Set Point Analysis")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(520.0)
        .show(ctx, |ui| {
            if samples.is_empty() {
                ui.label("No set points placed");
                return;
            }

            egui::ScrollArea::horizontal().show(ui, |ui| {
                egui::Grid::new("set_point_table")
                    .striped(true)
                    .show(ui, |ui| {
                        ui.strong("Set Point");
                        ui.strong(format!("Position ({})", unit.suffix()));
                        ui.strong(format!("Sampled ({})", unit.suffix()));
                        for signal in &signals {
                            ui.strong(signal);
                        }
                        ui.end_row();

                        for (i, sample) in samples.iter().enumerate() {
                            ui.colored_label(
                                palette_color(&config.plot.colors.set_points, i),
                                sample.label.to_string(),
                            );
                            ui.label(format!("{:.1}", sample.position));
                            ui.label(format!("{:.2}", sample.time));
                            for signal in &signals {
                                let unit_label = if *signal == config.data.speed_column {
                                    &config.data.speed_unit
                                } else {
                                    &config.data.temperature_unit
                                };
                                ui.label(format_value(sample.value(signal), unit_label));
                            }
                            ui.end_row();
                        }
                    });
            });

            if let Some(delta) = delta {
                ui.add_space(8.0);
                ui.label(format!("Time difference (B - A): {}", format_elapsed(delta, unit)));
            }
        });
    app.state.dialogs.show_analysis = open;
}
