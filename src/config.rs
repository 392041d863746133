use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
/// All sections fall back to defaults when missing from the file

/// Environment variable that overrides the config file location
pub const CONFIG_ENV_VAR: &str = "THERMALHUB_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub data: DataConfig,
    pub plot: PlotConfig,
    pub set_points: SetPointConfig,
    pub grouping: GroupingConfig,
}

/// Window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub resizable: bool,
    pub vsync: bool,
    pub hardware_acceleration: bool,
    pub icon_path: Option<String>,
}

/// Input file layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub time_column: String,
    /// chrono format of the time column
    pub time_format: String,
    /// chrono format used when writing the time column on export
    pub export_time_format: String,
    /// Substring identifying temperature channels (case-insensitive)
    pub temperature_marker: String,
    pub speed_column: String,
    pub temperature_unit: String,
    pub speed_unit: String,
    pub preview_rows: usize,
}

/// Chart settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub chart_height: f32,
    pub line_width: f32,
    pub speed_line_width: f32,
    pub set_point_line_width: f32,
    pub grid_step_minutes: f64,
    pub grid_step_seconds: f64,
    /// Upper bound factor applied to the maximum in "start from zero" mode
    pub zero_mode_headroom: f64,
    pub default_title: String,
    pub colors: PlotColors,
}

/// Chart colors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotColors {
    pub temperature: Vec<[u8; 3]>,
    pub speed: [u8; 3],
    pub set_points: Vec<[u8; 3]>,
}

/// Set point defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SetPointConfig {
    pub default_count: usize,
    pub max_count: usize,
    pub spacing_minutes: f64,
    pub spacing_seconds: f64,
}

/// Thresholds for automatic sensor classification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    pub min_samples: usize,
    pub vent_max_mean: f64,
    pub vent_min_range: f64,
    pub head_min_mean: f64,
    pub head_max_mean: f64,
    pub head_min_range: f64,
    pub outside_min_mean: f64,
    pub outside_max_range: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 860.0,
            title: "ThermalHub - HVAC Thermal Test Analyzer".to_string(),
            resizable: true,
            vsync: true,
            hardware_acceleration: true,
            icon_path: None,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            time_column: "Time".to_string(),
            time_format: "%Y.%m.%d._%H:%M:%S%.f".to_string(),
            export_time_format: "%Y.%m.%d._%H:%M:%S%.6f".to_string(),
            temperature_marker: "TEMP".to_string(),
            speed_column: "Dyno_Speed_[dyno_speed]".to_string(),
            temperature_unit: "°C".to_string(),
            speed_unit: "kph".to_string(),
            preview_rows: 30,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            chart_height: 560.0,
            line_width: 1.5,
            speed_line_width: 2.0,
            set_point_line_width: 2.0,
            grid_step_minutes: 2.0,
            grid_step_seconds: 50.0,
            zero_mode_headroom: 1.1,
            default_title: "Thermal Analysis Chart".to_string(),
            colors: PlotColors::default(),
        }
    }
}

impl Default for PlotColors {
    fn default() -> Self {
        Self {
            temperature: vec![
                [0x1f, 0x77, 0xb4],
                [0xff, 0x7f, 0x0e],
                [0x2c, 0xa0, 0x2c],
                [0xd6, 0x27, 0x28],
                [0x94, 0x67, 0xbd],
                [0x8c, 0x56, 0x4b],
            ],
            speed: [0, 0, 139], // darkblue
            set_points: vec![
                [255, 0, 0],
                [0, 128, 0],
                [0, 0, 255],
                [128, 0, 128],
                [255, 165, 0],
            ],
        }
    }
}

impl Default for SetPointConfig {
    fn default() -> Self {
        Self {
            default_count: 0,
            max_count: 5,
            spacing_minutes: 2.0,
            spacing_seconds: 50.0,
        }
    }
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            min_samples: 5,
            vent_max_mean: 20.0,
            vent_min_range: 20.0,
            head_min_mean: 20.0,
            head_max_mean: 35.0,
            head_min_range: 10.0,
            outside_min_mean: 35.0,
            outside_max_range: 5.0,
        }
    }
}

impl AppConfig {
    /// Load config from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(ConfigError::IoError)?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(ConfigError::ParseError)?;

        config.validate()?;
        Ok(config)
    }

    /// Save config to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(ConfigError::SerializeError)?;

        std::fs::write(path, content)
            .map_err(ConfigError::IoError)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            return Err(ConfigError::ValidationError("Window dimensions must be positive".to_string()));
        }

        if self.data.time_column.trim().is_empty() {
            return Err(ConfigError::ValidationError("Time column name must not be empty".to_string()));
        }

        if self.data.temperature_marker.trim().is_empty() {
            return Err(ConfigError::ValidationError("Temperature marker must not be empty".to_string()));
        }

        if self.plot.grid_step_minutes <= 0.0 || self.plot.grid_step_seconds <= 0.0 {
            return Err(ConfigError::ValidationError("Grid steps must be positive".to_string()));
        }

        if self.plot.colors.temperature.is_empty() || self.plot.colors.set_points.is_empty() {
            return Err(ConfigError::ValidationError("Color palettes must not be empty".to_string()));
        }

        if self.set_points.max_count > crate::types::SET_POINT_LABELS.len() {
            return Err(ConfigError::ValidationError(format!(
                "At most {} set points are supported",
                crate::types::SET_POINT_LABELS.len()
            )));
        }

        if self.set_points.default_count > self.set_points.max_count {
            return Err(ConfigError::ValidationError("Default set point count exceeds maximum".to_string()));
        }

        if self.grouping.min_samples == 0 {
            return Err(ConfigError::ValidationError("Minimum samples must be at least 1".to_string()));
        }

        Ok(())
    }
}

/// Config errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Config file location: `THERMALHUB_CONFIG` if set, otherwise `config.toml`
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Holds the active configuration and where it came from
pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            config_path: None,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            config,
            config_path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    /// A file that exists but fails to load is logged and ignored.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config file at {}, using defaults", path.display());
            return Self::new();
        }

        match Self::load_from_file(path) {
            Ok(manager) => {
                log::info!("Loaded config from {}", path.display());
                manager
            }
            Err(e) => {
                log::error!("Failed to load config {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn get_config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.config_path {
            self.config.save_to_file(path)?;
        }
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        self.config.save_to_file(path)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[data]\nspeed_column = \"Speed\"\n").unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.data.speed_column, "Speed");
        assert_eq!(config.data.time_column, "Time");
        assert_eq!(config.set_points.max_count, 5);
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = AppConfig::default();
        config.plot.grid_step_seconds = 30.0;
        config.save_to_file(&path).unwrap();

        let manager = ConfigManager::load_from_file(&path).unwrap();
        assert_eq!(manager.get_config().plot.grid_step_seconds, 30.0);
        assert_eq!(manager.config_path(), Some(path.as_path()));
    }

    #[test]
    fn rejects_too_many_set_points() {
        let mut config = AppConfig::default();
        config.set_points.max_count = 9;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let manager = ConfigManager::load_or_default("/nonexistent/thermalhub.toml");
        assert!(manager.config_path().is_none());
        assert_eq!(manager.get_config().data.time_column, "Time");
    }
}
