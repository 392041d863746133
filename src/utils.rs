use chrono::NaiveDateTime;

use crate::types::TimeUnit;

/// `12.3°C`, or `N/A` for a missing value
pub fn format_value(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.1}{}", v, unit_separator(unit)),
        None => "N/A".to_string(),
    }
}

fn unit_separator(unit: &str) -> String {
    // degree units attach directly, word units get a space
    if unit.is_empty() || unit.starts_with('°') || unit == "%" {
        unit.to_string()
    } else {
        format!(" {}", unit)
    }
}

/// Elapsed time with its unit suffix, e.g. `2.5 min`
pub fn format_elapsed(value: f64, unit: TimeUnit) -> String {
    format!("{:.1} {}", value, unit.suffix())
}

/// Axis tick label; whole numbers drop the decimal
pub fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Wall-clock time of a row for tables and tooltips
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// File name of a path for status messages
pub fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
