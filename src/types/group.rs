use serde::{Deserialize, Serialize};

/// A named set of sensor channels averaged into one signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorGroup {
    pub name: String,
    pub members: Vec<String>,
}

impl SensorGroup {
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    pub fn contains(&self, sensor: &str) -> bool {
        self.members.iter().any(|m| m == sensor)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
