use std::path::Path;
use log::{error, info};

use crate::app::app_core::ThermalApp;
use crate::app::state::StatusLevel;
use crate::data::export_table;

pub struct ExportHandler;

impl ExportHandler {
    /// Default name offered in the save dialog
    pub fn suggested_file_name(source: &str) -> String {
        let stem = Path::new(source)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "thermal_data".to_string());
        format!("{}_processed.csv", stem)
    }

    pub fn export_dialog(app: &mut ThermalApp) {
        if !app.state.has_data() {
            app.state.set_status("Load a CSV file before exporting", StatusLevel::Warning);
            return;
        }
        let picked = rfd::FileDialog::new()
            .set_title("Export processed data")
            .add_filter("CSV", &["csv"])
            .add_filter("Excel", &["xlsx"])
            .set_file_name(Self::suggested_file_name(&app.state.dataset.file_name))
            .save_file();
        if let Some(path) = picked {
            Self::export_to(app, &path);
        }
    }

    pub fn export_to(app: &mut ThermalApp, path: &Path) {
        let Some(table) = app.state.dataset.table.as_ref() else {
            return;
        };
        let data_cfg = &app.config.get_config().data;

        match export_table(path, table, &data_cfg.time_column, &data_cfg.export_time_format) {
            Ok(result) => {
                info!("Exported {} rows to {}", result.rows, path.display());
                app.state.set_status(result.message, StatusLevel::Success);
            }
            Err(e) => {
                error!("Export to {} failed: {}", path.display(), e);
                app.state.set_status(format!("Export failed: {}", e), StatusLevel::Error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggested_name_uses_source_stem() {
        assert_eq!(ExportHandler::suggested_file_name("run_42.csv"), "run_42_processed.csv");
        assert_eq!(ExportHandler::suggested_file_name(""), "thermal_data_processed.csv");
    }
}
