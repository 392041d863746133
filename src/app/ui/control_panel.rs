use eframe::egui;
use crate::app::app_core::ThermalApp;
use crate::app::handlers::{GroupingHandler, SetPointHandler, SettingsHandler};
use crate::app::state::GroupingMode;
use crate::plotter::{palette_color, YAxisMode};
use crate::types::TimeUnit;
use crate::utils::format_elapsed;

pub fn render_control_panel(app: &mut ThermalApp, ctx: &egui::Context) {
    egui::SidePanel::left("control_panel")
        .resizable(true)
        .default_width(300.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if !app.state.has_data() {
                    ui.add_space(10.0);
                    ui.label("Open a CSV file with a Time column and temperature sensors.");
                    return;
                }

                egui::CollapsingHeader::new("Sensor Groups")
                    .default_open(true)
                    .show(ui, |ui| render_grouping(app, ui));

                egui::CollapsingHeader::new("Signals")
                    .default_open(true)
                    .show(ui, |ui| render_signals(app, ui));

                egui::CollapsingHeader::new("Chart Settings")
                    .default_open(true)
                    .show(ui, |ui| render_chart_settings(app, ui));

                egui::CollapsingHeader::new("Set Points")
                    .default_open(true)
                    .show(ui, |ui| render_set_points(app, ui));
            });
        });
}

fn render_grouping(app: &mut ThermalApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        for mode in [GroupingMode::Manual, GroupingMode::Auto] {
            if ui
                .radio(app.state.grouping.mode == mode, mode.label())
                .clicked()
            {
                GroupingHandler::set_mode(app, mode);
            }
        }
    });
    ui.add_space(5.0);

    match app.state.grouping.mode {
        GroupingMode::Manual => render_manual_groups(app, ui),
        GroupingMode::Auto => render_auto_groups(app, ui),
    }

    for warning in &app.state.grouping.warnings {
        ui.colored_label(egui::Color32::from_rgb(255, 165, 0), format!("⚠ {}", warning));
    }
}

fn render_manual_groups(app: &mut ThermalApp, ui: &mut egui::Ui) {
    let marker = app.config.get_config().data.temperature_marker.clone();
    let sensors = app.state.temperature_sensors(&marker);
    let available = app.state.grouping.registry.available_sensors(&sensors);

    ui.label("Group name:");
    ui.add(
        egui::TextEdit::singleline(&mut app.state.grouping.new_group_name)
            .desired_width(f32::INFINITY)
            .hint_text("e.g. Vent"),
    );

    ui.label(format!("Available sensors ({}):", available.len()));
    egui::ScrollArea::vertical()
        .id_salt("available_sensors")
        .max_height(180.0)
        .show(ui, |ui| {
            if available.is_empty() {
                ui.colored_label(egui::Color32::GRAY, "All sensors are assigned");
            }
            for sensor in &available {
                let mut selected = app.state.grouping.selected_sensors.contains(sensor);
                if ui.checkbox(&mut selected, sensor).changed() {
                    if selected {
                        app.state.grouping.selected_sensors.insert(sensor.clone());
                    } else {
                        app.state.grouping.selected_sensors.remove(sensor);
                    }
                }
            }
        });

    ui.horizontal(|ui| {
        if ui.button("➕ Add Group").clicked() {
            GroupingHandler::add_group(app);
        }
        if ui.button("↩ Remove Last").clicked() {
            GroupingHandler::remove_last(app);
        }
    });

    ui.add_space(5.0);
    let groups = app.state.grouping.registry.groups().to_vec();
    if groups.is_empty() {
        ui.colored_label(egui::Color32::GRAY, "No groups defined");
    }
    for group in &groups {
        ui.horizontal(|ui| {
            if ui.small_button("🗑").on_hover_text("Remove group").clicked() {
                GroupingHandler::remove_group(app, &group.name);
            }
            ui.label(format!("{} ({} sensors)", group.name, group.members.len()))
                .on_hover_text(group.members.join("\n"));
        });
    }

    ui.horizontal(|ui| {
        if ui.button("💾 Save Groups").clicked() {
            GroupingHandler::save_preset(app);
        }
        if ui.button("📂 Load Groups").clicked() {
            GroupingHandler::load_preset(app);
        }
        if ui.add_enabled(!groups.is_empty(), egui::Button::new("Clear")).clicked() {
            GroupingHandler::clear_groups(app);
        }
    });
}

fn render_auto_groups(app: &mut ThermalApp, ui: &mut egui::Ui) {
    ui.label("Sensors are classified by mean and range:");
    for group in &app.state.grouping.auto_groups {
        let text = format!("{}: {} sensors", group.name, group.members.len());
        if group.is_empty() {
            ui.colored_label(egui::Color32::GRAY, text);
        } else {
            ui.label(text).on_hover_text(group.members.join("\n"));
        }
    }
}

fn render_signals(app: &mut ThermalApp, ui: &mut egui::Ui) {
    let config = app.config.get_config();
    let marker = config.data.temperature_marker.clone();
    let has_speed = app
        .state
        .dataset
        .table
        .as_ref()
        .is_some_and(|t| t.has_column(&config.data.speed_column));

    if ui
        .checkbox(&mut app.state.chart.show_raw_sensors, "Show individual sensors")
        .changed()
    {
        app.state.refresh_selected_signals(&marker);
    }
    if has_speed {
        ui.checkbox(&mut app.state.chart.show_speed, "Show speed");
    }

    let options = app.state.signal_options(&marker);
    ui.horizontal(|ui| {
        if ui.small_button("Select all").clicked() {
            app.state.chart.selected_signals = options.clone();
        }
        if ui.small_button("Clear").clicked() {
            app.state.chart.selected_signals.clear();
        }
    });

    egui::ScrollArea::vertical()
        .id_salt("signal_list")
        .max_height(220.0)
        .show(ui, |ui| {
            for option in &options {
                let mut selected = app.state.chart.selected_signals.contains(option);
                if ui.checkbox(&mut selected, option).changed() {
                    if selected {
                        app.state.chart.selected_signals.push(option.clone());
                    } else {
                        app.state.chart.selected_signals.retain(|s| s != option);
                    }
                }
            }
        });
}

fn render_chart_settings(app: &mut ThermalApp, ui: &mut egui::Ui) {
    ui.label("Chart title:");
    ui.add(egui::TextEdit::singleline(&mut app.state.chart.title).desired_width(f32::INFINITY));

    ui.add_space(5.0);
    ui.label("Time axis:");
    ui.horizontal(|ui| {
        for unit in [TimeUnit::Minute, TimeUnit::Second] {
            if ui.radio(app.state.chart.unit == unit, unit.label()).clicked() {
                SetPointHandler::change_unit(app, unit);
            }
        }
    });

    ui.label("Y axis:");
    ui.horizontal(|ui| {
        for mode in [YAxisMode::Auto, YAxisMode::FromZero] {
            ui.radio_value(&mut app.state.chart.y_mode, mode, mode.label());
        }
    });

    ui.add_space(5.0);
    if ui
        .button("💾 Save as Defaults")
        .on_hover_text("Keep this title and set point count for the next start")
        .clicked()
    {
        SettingsHandler::save_defaults(app);
    }
}

fn render_set_points(app: &mut ThermalApp, ui: &mut egui::Ui) {
    let max_count = app.config.get_config().set_points.max_count;
    let mut count = app.state.set_points.count;
    ui.horizontal(|ui| {
        ui.label("Number of set points:");
        if ui
            .add(egui::DragValue::new(&mut count).range(0..=max_count))
            .changed()
        {
            SetPointHandler::set_count(app, count);
        }
    });

    let unit = app.state.chart.unit;
    let palette = app.config.get_config().plot.colors.set_points.clone();
    for idx in 0..app.state.set_points.set.len() {
        let label = app.state.set_points.set.points()[idx].label;
        ui.horizontal(|ui| {
            ui.colored_label(palette_color(&palette, idx), format!("Set Point {}", label));
            let Some(input) = app.state.set_points.set.input_mut(idx) else {
                return;
            };
            let response = ui.add(egui::TextEdit::singleline(input).desired_width(70.0));
            if response.lost_focus() {
                SetPointHandler::commit_input(app, idx);
            }
            ui.label(unit.suffix());
        });
    }

    if let Some(delta) = app.state.set_points.set.time_difference() {
        ui.add_space(5.0);
        ui.label(format!("Time difference (B - A): {}", format_elapsed(delta, unit)));
    }
    if !app.state.set_points.set.is_empty() {
        ui.colored_label(egui::Color32::GRAY, "Drag the lines on the chart to move set points");
    }
}
