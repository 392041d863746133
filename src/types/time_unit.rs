use serde::{Deserialize, Serialize};

/// Unit of the elapsed-time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeUnit {
    #[default]
    Minute,
    Second,
}

impl TimeUnit {
    /// Column name used when exporting this elapsed-time series
    pub fn column_name(&self) -> &'static str {
        match self {
            TimeUnit::Minute => "Elapsed_min",
            TimeUnit::Second => "Elapsed_s",
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Minute => "min",
            TimeUnit::Second => "s",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeUnit::Minute => "Minute",
            TimeUnit::Second => "Second",
        }
    }

    /// Convert a position expressed in `self` into `target`
    pub fn convert(&self, value: f64, target: TimeUnit) -> f64 {
        match (self, target) {
            (TimeUnit::Minute, TimeUnit::Second) => value * 60.0,
            (TimeUnit::Second, TimeUnit::Minute) => value / 60.0,
            _ => value,
        }
    }
}
