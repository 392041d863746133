use crate::config::DataConfig;
use crate::types::{ReadingTable, SensorGroup, TimeUnit};

/// Sensors listed individually in the summary; the rest are only counted
const MAX_LISTED_SENSORS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelStats {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub name: String,
    pub sensors: usize,
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedStats {
    pub mean: f64,
    pub max: f64,
}

/// Overview of a loaded dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DataSummary {
    pub records: usize,
    pub start_min: f64,
    pub end_min: f64,
    pub temperature_sensors: usize,
    pub sensors: Vec<ChannelStats>,
    pub unlisted_sensors: usize,
    pub groups: Vec<GroupStats>,
    pub speed: Option<SpeedStats>,
}

impl DataSummary {
    pub fn compute(table: &ReadingTable, groups: &[SensorGroup], config: &DataConfig) -> Self {
        let minutes = table.elapsed(TimeUnit::Minute);
        let temp_cols = table.temperature_columns(&config.temperature_marker);

        let sensors = temp_cols
            .iter()
            .take(MAX_LISTED_SENSORS)
            .filter_map(|name| {
                let column = table.column(name)?;
                let (min, max) = column.range()?;
                Some(ChannelStats {
                    name: name.clone(),
                    min,
                    max,
                    mean: column.mean()?,
                })
            })
            .collect();

        let groups = groups
            .iter()
            .filter(|g| !g.is_empty() && table.has_column(&g.name))
            .map(|g| GroupStats {
                name: g.name.clone(),
                sensors: g.members.len(),
                mean: table.column(&g.name).and_then(|c| c.mean()),
            })
            .collect();

        let speed = table.column(&config.speed_column).and_then(|c| {
            Some(SpeedStats {
                mean: c.mean()?,
                max: c.range()?.1,
            })
        });

        Self {
            records: table.len(),
            start_min: minutes.first().copied().unwrap_or(0.0),
            end_min: minutes.last().copied().unwrap_or(0.0),
            temperature_sensors: temp_cols.len(),
            sensors,
            unlisted_sensors: temp_cols.len().saturating_sub(MAX_LISTED_SENSORS),
            groups,
            speed,
        }
    }

    pub fn duration_min(&self) -> f64 {
        self.end_min - self.start_min
    }

    /// Plain-text report shown in the summary window
    pub fn to_text(&self, config: &DataConfig) -> String {
        let t = &config.temperature_unit;
        let mut out = String::new();
        out.push_str("THERMAL DATA ANALYSIS SUMMARY\n");
        out.push_str(&"=".repeat(50));
        out.push_str("\n\nDataset Information:\n");
        out.push_str(&format!("• Total Records: {}\n", self.records));
        out.push_str(&format!(
            "• Time Range: {:.1} - {:.1} minutes\n",
            self.start_min, self.end_min
        ));
        out.push_str(&format!("• Duration: {:.1} minutes\n", self.duration_min()));
        out.push_str(&format!("• Temperature Sensors: {}\n", self.temperature_sensors));

        out.push_str("\nTemperature Sensor Details:\n");
        for s in &self.sensors {
            out.push_str(&format!(
                "• {}:\n  - Range: {:.1}{} to {:.1}{}\n  - Average: {:.1}{}\n",
                s.name, s.min, t, s.max, t, s.mean, t
            ));
        }
        if self.unlisted_sensors > 0 {
            out.push_str(&format!("... and {} more sensors\n", self.unlisted_sensors));
        }

        out.push_str("\nSensor Groups:\n");
        if self.groups.is_empty() {
            out.push_str("• No groups configured\n");
        }
        for g in &self.groups {
            match g.mean {
                Some(mean) => out.push_str(&format!(
                    "• {}: {} sensors (avg: {:.1}{})\n",
                    g.name, g.sensors, mean, t
                )),
                None => out.push_str(&format!("• {}: {} sensors (no data)\n", g.name, g.sensors)),
            }
        }

        if let Some(speed) = &self.speed {
            out.push_str(&format!(
                "\nSpeed Data:\n• Average Speed: {:.1} {}\n• Maximum Speed: {:.1} {}\n",
                speed.mean, config.speed_unit, speed.max, config.speed_unit
            ));
        }

        out
    }
}
