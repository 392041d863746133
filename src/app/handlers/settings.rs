use log::{error, info};

use crate::app::app_core::ThermalApp;
use crate::app::state::StatusLevel;
use crate::config::config_path;

pub struct SettingsHandler;

impl SettingsHandler {
    /// Store the current chart title and set-point count as startup defaults
    pub fn save_defaults(app: &mut ThermalApp) {
        {
            let config = app.config.get_config_mut();
            config.plot.default_title = app.state.chart.title.clone();
            config.set_points.default_count = app.state.set_points.count;
        }

        let result = match app.config.config_path() {
            Some(_) => app.config.save(),
            None => app.config.save_to_file(config_path()),
        };
        match result {
            Ok(()) => {
                info!("Settings saved");
                app.state.set_status("Defaults saved", StatusLevel::Success);
            }
            Err(e) => {
                error!("Failed to save settings: {}", e);
                app.state.set_status(format!("Error saving settings: {}", e), StatusLevel::Error);
            }
        }
    }
}
