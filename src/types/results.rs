/// Outcome of loading a CSV file
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub rows: usize,
    /// Rows dropped because their timestamp could not be parsed
    pub dropped_rows: usize,
    pub temperature_sensors: usize,
    pub has_speed: bool,
}

impl LoadReport {
    pub fn message(&self, file_name: &str) -> String {
        let mut msg = format!(
            "Loaded {}: {} rows, {} sensors",
            file_name, self.rows, self.temperature_sensors
        );
        if self.has_speed {
            msg.push_str(", speed");
        }
        if self.dropped_rows > 0 {
            msg.push_str(&format!(" ({} rows with invalid time skipped)", self.dropped_rows));
        }
        msg
    }
}

/// Problems found while materializing group columns
#[derive(Debug, Clone, PartialEq)]
pub enum GroupWarning {
    /// None of the group's members exist in the table; the column was omitted
    NoValidMembers { group: String },
    /// Some members are absent from the table and were skipped
    MissingMembers { group: String, missing: Vec<String> },
    /// The group name equals a raw data column; the column was omitted
    NameCollision { group: String },
}

impl std::fmt::Display for GroupWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupWarning::NoValidMembers { group } => {
                write!(f, "Group '{}' has no valid sensors and was skipped", group)
            }
            GroupWarning::MissingMembers { group, missing } => write!(
                f,
                "Group '{}': sensors not found: {}",
                group,
                missing.join(", ")
            ),
            GroupWarning::NameCollision { group } => {
                write!(f, "Group '{}' shares its name with a data column and was skipped", group)
            }
        }
    }
}

/// Result of an export operation
#[derive(Debug)]
pub struct ExportResult {
    pub rows: usize,
    pub message: String,
}

impl ExportResult {
    pub fn new(rows: usize, columns: usize, file_name: &str) -> Self {
        Self {
            rows,
            message: format!("Exported {} rows x {} columns to {}", rows, columns, file_name),
        }
    }
}
