mod app;
mod config;
mod data;
mod logger;
mod plotter;
mod types;
mod utils;

use std::path::PathBuf;
use dotenv::dotenv;
use eframe::egui;
use log::{error, info, warn};

use app::ThermalApp;
use config::{config_path, ConfigManager, WindowConfig};

/// Decode the configured window icon, if any
fn load_icon(path: &str) -> Option<egui::IconData> {
    match image::open(path) {
        Ok(img) => {
            let rgba = img.into_rgba8();
            let (width, height) = rgba.dimensions();
            Some(egui::IconData {
                rgba: rgba.into_raw(),
                width,
                height,
            })
        }
        Err(e) => {
            warn!("Failed to load window icon {}: {}", path, e);
            None
        }
    }
}

fn native_options(window: &WindowConfig) -> eframe::NativeOptions {
    let mut viewport = egui::ViewportBuilder::default()
        .with_title(window.title.clone())
        .with_inner_size([window.width, window.height])
        .with_resizable(window.resizable)
        .with_drag_and_drop(true);
    if let Some(icon) = window.icon_path.as_deref().and_then(load_icon) {
        viewport = viewport.with_icon(icon);
    }

    eframe::NativeOptions {
        vsync: window.vsync,
        hardware_acceleration: if window.hardware_acceleration {
            eframe::HardwareAcceleration::Preferred
        } else {
            eframe::HardwareAcceleration::Off
        },
        renderer: eframe::Renderer::Glow,
        viewport,
        ..Default::default()
    }
}

fn main() {
    logger::init_logger();
    dotenv().ok();
    info!("Application starting");

    let config = ConfigManager::load_or_default(config_path());
    let initial_file = std::env::args().nth(1).map(PathBuf::from);

    let window = config.get_config().window.clone();
    let options = native_options(&window);

    if let Err(e) = eframe::run_native(
        &window.title,
        options,
        Box::new(|_cc| Ok(Box::new(ThermalApp::new(config, initial_file)))),
    ) {
        error!("GUI failed: {}", e);
        std::process::exit(1);
    }

    info!("Application closed");
}
