use std::path::Path;
use log::{error, info};

use crate::app::app_core::ThermalApp;
use crate::app::handlers::{GroupingHandler, SetPointHandler};
use crate::app::state::StatusLevel;
use crate::data::load_csv;
use crate::utils::display_name;

pub struct FileHandler;

impl FileHandler {
    pub fn open_dialog(app: &mut ThermalApp) {
        let picked = rfd::FileDialog::new()
            .set_title("Open thermal log")
            .add_filter("CSV", &["csv"])
            .pick_file();
        if let Some(path) = picked {
            Self::load_path(app, &path);
        }
    }

    /// Load a CSV file and rebuild everything derived from it.
    /// On failure the previous dataset stays loaded.
    pub fn load_path(app: &mut ThermalApp, path: &Path) {
        let file_name = display_name(path);
        let data_cfg = app.config.get_config().data.clone();

        match load_csv(path, &data_cfg) {
            Ok((table, report)) => {
                let level = if report.dropped_rows > 0 {
                    StatusLevel::Warning
                } else {
                    StatusLevel::Success
                };
                app.state.set_status(report.message(&file_name), level);
                app.state.dataset.table = Some(table);
                app.state.dataset.file_name = file_name;
                app.state.dataset.report = Some(report);

                app.state.grouping.selected_sensors.clear();
                app.state.chart.selected_signals.clear();
                GroupingHandler::recompute(app);
                SetPointHandler::reset(app);
                info!("Dataset ready, max elapsed {:.1} {}", app.state.max_time(), app.state.chart.unit.suffix());
            }
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                app.state.set_status(format!("Error loading {}: {}", file_name, e), StatusLevel::Error);
            }
        }
    }
}
