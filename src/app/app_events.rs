use eframe::egui;

use super::app_core::ThermalApp;
use super::handlers::{ExportHandler, FileHandler};

impl ThermalApp {
    /// Ctrl+O opens a file, Ctrl+S exports, Escape closes dialogs
    pub fn handle_keyboard_input(&mut self, ctx: &egui::Context) {
        let (open, export, escape) = ctx.input_mut(|i| {
            (
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::O),
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::S),
                i.key_pressed(egui::Key::Escape),
            )
        });

        if open {
            FileHandler::open_dialog(self);
        }
        if export {
            ExportHandler::export_dialog(self);
        }
        if escape {
            self.state.dialogs.show_analysis = false;
            self.state.dialogs.show_summary = false;
        }
    }

    /// A CSV dropped onto the window is loaded like an opened one
    pub fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));
        if let Some(path) = dropped {
            FileHandler::load_path(self, &path);
        }
    }
}
