use std::collections::BTreeSet;
use eframe::egui;

use crate::config::AppConfig;
use crate::data::{GroupRegistry, SetPointSet};
use crate::plotter::{ThermalChart, YAxisMode};
use crate::types::{GroupWarning, LoadReport, ReadingTable, SensorGroup, TimeUnit};

/// How group columns are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupingMode {
    #[default]
    Manual,
    Auto,
}

impl GroupingMode {
    pub fn label(&self) -> &'static str {
        match self {
            GroupingMode::Manual => "Manual",
            GroupingMode::Auto => "Auto (Vent / Head / Outside)",
        }
    }
}

/// Loaded file
#[derive(Debug, Default)]
pub struct DatasetState {
    pub table: Option<ReadingTable>,
    pub file_name: String,
    pub report: Option<LoadReport>,
}

/// Group definitions and the inputs of the "add group" form
#[derive(Debug, Default)]
pub struct GroupingState {
    pub mode: GroupingMode,
    pub registry: GroupRegistry,
    /// Result of the last automatic classification
    pub auto_groups: Vec<SensorGroup>,
    pub new_group_name: String,
    pub selected_sensors: BTreeSet<String>,
    pub warnings: Vec<GroupWarning>,
}

/// Chart settings chosen in the side panel
#[derive(Debug)]
pub struct ChartState {
    pub title: String,
    pub unit: TimeUnit,
    pub y_mode: YAxisMode,
    pub selected_signals: Vec<String>,
    /// Offer raw sensors next to group averages
    pub show_raw_sensors: bool,
    pub show_speed: bool,
    pub chart: ThermalChart,
}

impl ChartState {
    fn new(config: &AppConfig) -> Self {
        Self {
            title: config.plot.default_title.clone(),
            unit: TimeUnit::default(),
            y_mode: YAxisMode::default(),
            selected_signals: Vec::new(),
            show_raw_sensors: false,
            show_speed: true,
            chart: ThermalChart::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SetPointState {
    pub count: usize,
    pub set: SetPointSet,
}

#[derive(Debug, Default)]
pub struct DialogState {
    pub show_analysis: bool,
    pub show_summary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl StatusLevel {
    pub fn color(&self) -> egui::Color32 {
        match self {
            StatusLevel::Info => egui::Color32::from_rgb(0, 100, 200),
            StatusLevel::Success => egui::Color32::from_rgb(0, 150, 0),
            StatusLevel::Warning => egui::Color32::from_rgb(255, 165, 0),
            StatusLevel::Error => egui::Color32::from_rgb(150, 0, 0),
        }
    }
}

/// Application state owned by the eframe app
#[derive(Debug)]
pub struct AppState {
    pub dataset: DatasetState,
    pub grouping: GroupingState,
    pub chart: ChartState,
    pub set_points: SetPointState,
    pub dialogs: DialogState,
    pub status: String,
    pub status_level: StatusLevel,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            dataset: DatasetState::default(),
            grouping: GroupingState::default(),
            chart: ChartState::new(config),
            set_points: SetPointState {
                count: config.set_points.default_count,
                set: SetPointSet::default(),
            },
            dialogs: DialogState::default(),
            status: "Open a CSV file to begin".to_string(),
            status_level: StatusLevel::Info,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>, level: StatusLevel) {
        self.status = message.into();
        self.status_level = level;
    }

    pub fn has_data(&self) -> bool {
        self.dataset.table.is_some()
    }

    /// Groups in effect for the current mode
    pub fn active_groups(&self) -> &[SensorGroup] {
        match self.grouping.mode {
            GroupingMode::Manual => self.grouping.registry.groups(),
            GroupingMode::Auto => &self.grouping.auto_groups,
        }
    }

    pub fn temperature_sensors(&self, marker: &str) -> Vec<String> {
        self.dataset
            .table
            .as_ref()
            .map(|t| t.temperature_columns(marker))
            .unwrap_or_default()
    }

    /// Raw column names a group name must not shadow
    pub fn data_columns(&self) -> Vec<String> {
        self.dataset
            .table
            .as_ref()
            .map(|t| {
                t.columns()
                    .iter()
                    .filter(|c| c.kind == crate::types::ColumnKind::Sensor)
                    .map(|c| c.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Signals the user can plot: group averages first, then raw sensors when enabled
    pub fn signal_options(&self, marker: &str) -> Vec<String> {
        let Some(table) = &self.dataset.table else {
            return Vec::new();
        };
        let mut options = table.group_column_names();
        if self.chart.show_raw_sensors || options.is_empty() {
            options.extend(table.temperature_columns(marker));
        }
        options
    }

    pub fn max_time(&self) -> f64 {
        self.dataset
            .table
            .as_ref()
            .map(|t| t.max_elapsed(self.chart.unit))
            .unwrap_or(0.0)
    }

    /// Default selection after the available signals change: keep what is
    /// still valid, otherwise pick every group (or every sensor without groups).
    pub fn refresh_selected_signals(&mut self, marker: &str) {
        let options = self.signal_options(marker);
        self.chart.selected_signals.retain(|s| options.contains(s));
        if self.chart.selected_signals.is_empty() {
            let groups = self
                .dataset
                .table
                .as_ref()
                .map(|t| t.group_column_names())
                .unwrap_or_default();
            self.chart.selected_signals = if groups.is_empty() { options } else { groups };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::apply_groups;
    use crate::types::Column;
    use chrono::NaiveDate;

    fn state_with_table() -> AppState {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let table = ReadingTable::from_rows(
            vec![start, start + chrono::TimeDelta::minutes(3)],
            vec![
                Column::sensor("A_TEMP", vec![Some(1.0), Some(2.0)]),
                Column::sensor("B_TEMP", vec![Some(3.0), Some(4.0)]),
                Column::sensor("Dyno_Speed_[dyno_speed]", vec![Some(0.0), Some(5.0)]),
            ],
        );
        let mut state = AppState::new(&AppConfig::default());
        state.dataset.table = Some(table);
        state
    }

    #[test]
    fn sensors_are_selected_until_groups_exist() {
        let mut state = state_with_table();
        state.refresh_selected_signals("TEMP");
        assert_eq!(state.chart.selected_signals, vec!["A_TEMP", "B_TEMP"]);

        let groups = vec![SensorGroup::new("G", vec!["A_TEMP".into(), "B_TEMP".into()])];
        if let Some(table) = state.dataset.table.as_mut() {
            apply_groups(table, &groups);
        }
        state.chart.selected_signals.clear();
        state.refresh_selected_signals("TEMP");
        assert_eq!(state.chart.selected_signals, vec!["G"]);
        assert_eq!(state.data_columns().len(), 3);
    }

    #[test]
    fn max_time_follows_the_unit() {
        let mut state = state_with_table();
        assert_eq!(state.max_time(), 3.0);
        state.chart.unit = TimeUnit::Second;
        assert_eq!(state.max_time(), 180.0);
    }
}
