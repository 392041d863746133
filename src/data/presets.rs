use std::fs;
use std::path::Path;
use log::info;
use serde::{Deserialize, Serialize};

use crate::types::SensorGroup;

#[derive(thiserror::Error, Debug)]
pub enum PresetError {
    #[error("Failed to access the preset file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid preset file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Saved group definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupPreset {
    pub groups: Vec<SensorGroup>,
}

impl GroupPreset {
    pub fn new(groups: Vec<SensorGroup>) -> Self {
        Self { groups }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PresetError> {
        let content = fs::read_to_string(path.as_ref())?;
        let preset: GroupPreset = serde_json::from_str(&content)?;
        info!("Loaded {} groups from {}", preset.groups.len(), path.as_ref().display());
        Ok(preset)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PresetError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content)?;
        info!("Saved {} groups to {}", self.groups.len(), path.as_ref().display());
        Ok(())
    }
}
