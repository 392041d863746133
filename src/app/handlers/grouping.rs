use log::{error, info, warn};

use crate::app::app_core::ThermalApp;
use crate::app::state::{GroupingMode, StatusLevel};
use crate::data::{apply_groups, classify_sensors, GroupPreset};
use crate::utils::display_name;

pub struct GroupingHandler;

impl GroupingHandler {
    /// Add a group from the form inputs
    pub fn add_group(app: &mut ThermalApp) {
        let name = app.state.grouping.new_group_name.trim().to_string();
        let sensors: Vec<String> = app.state.grouping.selected_sensors.iter().cloned().collect();
        let columns = app.state.data_columns();

        match app.state.grouping.registry.add(&name, sensors, &columns) {
            Ok(()) => {
                info!("Group '{}' added", name);
                app.state.grouping.new_group_name.clear();
                app.state.grouping.selected_sensors.clear();
                Self::recompute(app);
                if !app.state.chart.selected_signals.contains(&name) && app.state.has_data() {
                    app.state.chart.selected_signals.push(name.clone());
                }
                app.state.set_status(format!("Group '{}' created", name), StatusLevel::Success);
            }
            Err(e) => app.state.set_status(e.to_string(), StatusLevel::Warning),
        }
    }

    pub fn remove_group(app: &mut ThermalApp, name: &str) {
        match app.state.grouping.registry.remove(name) {
            Ok(group) => {
                info!("Group '{}' removed", group.name);
                Self::recompute(app);
                app.state.set_status(format!("Group '{}' removed", group.name), StatusLevel::Info);
            }
            Err(e) => app.state.set_status(e.to_string(), StatusLevel::Warning),
        }
    }

    pub fn remove_last(app: &mut ThermalApp) {
        match app.state.grouping.registry.remove_last() {
            Some(group) => {
                info!("Group '{}' removed", group.name);
                Self::recompute(app);
                app.state.set_status(format!("Group '{}' removed", group.name), StatusLevel::Info);
            }
            None => app.state.set_status("No groups to remove", StatusLevel::Warning),
        }
    }

    pub fn clear_groups(app: &mut ThermalApp) {
        app.state.grouping.registry.clear();
        Self::recompute(app);
        app.state.set_status("All groups cleared", StatusLevel::Info);
    }

    pub fn set_mode(app: &mut ThermalApp, mode: GroupingMode) {
        if app.state.grouping.mode == mode {
            return;
        }
        app.state.grouping.mode = mode;
        app.state.chart.selected_signals.clear();
        Self::recompute(app);
        info!("Grouping mode: {}", mode.label());
    }

    /// Rebuild group columns for the current mode and refresh the signal selection
    pub fn recompute(app: &mut ThermalApp) {
        let config = app.config.get_config();
        let marker = config.data.temperature_marker.clone();

        if let Some(table) = app.state.dataset.table.as_ref() {
            app.state.grouping.auto_groups = classify_sensors(table, &marker, &config.grouping);
        }

        let groups = app.state.active_groups().to_vec();
        let warnings = match app.state.dataset.table.as_mut() {
            Some(table) => apply_groups(table, &groups),
            None => Vec::new(),
        };
        for w in &warnings {
            warn!("{}", w);
        }
        if let Some(first) = warnings.first() {
            app.state.set_status(first.to_string(), StatusLevel::Warning);
        }
        app.state.grouping.warnings = warnings;
        app.state.refresh_selected_signals(&marker);
    }

    pub fn save_preset(app: &mut ThermalApp) {
        if app.state.grouping.registry.is_empty() {
            app.state.set_status("No groups to save", StatusLevel::Warning);
            return;
        }
        let groups = app.state.grouping.registry.groups().to_vec();
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save group preset")
            .add_filter("JSON", &["json"])
            .set_file_name("groups.json")
            .save_file()
        else {
            return;
        };

        match GroupPreset::new(groups).save_to_file(&path) {
            Ok(()) => app.state.set_status(format!("Groups saved to {}", display_name(&path)), StatusLevel::Success),
            Err(e) => {
                error!("Failed to save preset: {}", e);
                app.state.set_status(format!("Error saving groups: {}", e), StatusLevel::Error);
            }
        }
    }

    pub fn load_preset(app: &mut ThermalApp) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Load group preset")
            .add_filter("JSON", &["json"])
            .pick_file()
        else {
            return;
        };

        let preset = match GroupPreset::load_from_file(&path) {
            Ok(preset) => preset,
            Err(e) => {
                error!("Failed to load preset: {}", e);
                app.state.set_status(format!("Error loading groups: {}", e), StatusLevel::Error);
                return;
            }
        };

        let columns = app.state.data_columns();
        match app.state.grouping.registry.replace_all(preset.groups, &columns) {
            Ok(()) => {
                app.state.grouping.mode = GroupingMode::Manual;
                app.state.chart.selected_signals.clear();
                Self::recompute(app);
                // recompute may already have reported missing sensors
                if app.state.grouping.warnings.is_empty() {
                    app.state.set_status(
                        format!("Loaded {} groups from {}", app.state.grouping.registry.len(), display_name(&path)),
                        StatusLevel::Success,
                    );
                }
            }
            Err(e) => app.state.set_status(format!("Invalid preset: {}", e), StatusLevel::Error),
        }
    }
}
