use std::path::PathBuf;
use eframe::{egui, Frame};
use log::info;

use crate::config::ConfigManager;
use super::handlers::FileHandler;
use super::state::AppState;

pub struct ThermalApp {
    pub state: AppState,
    pub config: ConfigManager,
}

impl ThermalApp {
    pub fn new(config: ConfigManager, initial_file: Option<PathBuf>) -> Self {
        let state = AppState::new(config.get_config());
        let mut app = ThermalApp { state, config };

        if let Some(path) = initial_file {
            info!("Opening {} from the command line", path.display());
            FileHandler::load_path(&mut app, &path);
        }

        app
    }
}

impl eframe::App for ThermalApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        ctx.set_visuals(egui::Visuals::light());

        crate::app::ui::render_status_bar(self, ctx);
        crate::app::ui::render_bottom_status_bar(self, ctx);
        crate::app::ui::render_control_panel(self, ctx);
        crate::app::ui::render_main_panel(self, ctx);
        crate::app::ui::render_analysis_dialog(self, ctx);
        crate::app::ui::render_summary_dialog(self, ctx);

        self.handle_keyboard_input(ctx);
        self.handle_dropped_files(ctx);
    }
}
