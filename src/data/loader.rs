use std::fs::File;
use std::io::Read;
use std::path::Path;
use chrono::NaiveDateTime;
use log::{info, warn};

use crate::config::DataConfig;
use crate::types::{Column, LoadReport, ReadingTable, TimeUnit};

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Failed to open the CSV file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read the CSV file: {0}")]
    Csv(#[from] csv::Error),
    #[error("Column '{0}' not found in CSV file")]
    MissingTimeColumn(String),
    #[error("No rows with a valid '{0}' value")]
    NoValidRows(String),
}
type Result<T> = std::result::Result<T, LoadError>;

/// Parse a timestamp; anything unparseable becomes `None`
pub fn parse_timestamp(raw: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), format).ok()
}

/// Parse a numeric cell; empty or non-numeric cells are missing values
pub fn parse_value(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Elapsed-time columns from a previous export are recomputed, never read
fn is_elapsed_column(name: &str) -> bool {
    name == TimeUnit::Second.column_name() || name == TimeUnit::Minute.column_name()
}

pub fn load_csv<P: AsRef<Path>>(path: P, config: &DataConfig) -> Result<(ReadingTable, LoadReport)> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let (table, report) = read_csv(file, config)?;
    info!(
        "Loaded {}: {} rows, {} temperature sensors",
        path.display(),
        report.rows,
        report.temperature_sensors
    );
    Ok((table, report))
}

/// Read readings from any CSV source.
/// Rows whose time cannot be parsed are dropped; the rest are sorted by time.
pub fn read_csv<R: Read>(reader: R, config: &DataConfig) -> Result<(ReadingTable, LoadReport)> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let time_idx = headers
        .iter()
        .position(|h| *h == config.time_column)
        .ok_or_else(|| LoadError::MissingTimeColumn(config.time_column.clone()))?;

    let mut timestamps = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); headers.len()];
    let mut dropped_rows = 0usize;

    for result in rdr.records() {
        let record = result?;
        let Some(ts) = record
            .get(time_idx)
            .and_then(|raw| parse_timestamp(raw, &config.time_format))
        else {
            dropped_rows += 1;
            continue;
        };

        timestamps.push(ts);
        for (idx, values) in columns.iter_mut().enumerate() {
            if idx == time_idx {
                continue;
            }
            values.push(record.get(idx).and_then(parse_value));
        }
    }

    if dropped_rows > 0 {
        warn!("Skipped {} rows with unparseable '{}' values", dropped_rows, config.time_column);
    }

    if timestamps.is_empty() {
        return Err(LoadError::NoValidRows(config.time_column.clone()));
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .zip(columns)
        .enumerate()
        .filter(|(idx, (name, _))| *idx != time_idx && !name.is_empty() && !is_elapsed_column(name))
        .map(|(_, (name, values))| Column::sensor(name, values))
        .collect();

    let table = ReadingTable::from_rows(timestamps, columns);
    let report = LoadReport {
        rows: table.len(),
        dropped_rows,
        temperature_sensors: table.temperature_columns(&config.temperature_marker).len(),
        has_speed: table.has_column(&config.speed_column),
    };

    Ok((table, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(csv: &str) -> Result<(ReadingTable, LoadReport)> {
        read_csv(csv.as_bytes(), &DataConfig::default())
    }

    #[test]
    fn derives_elapsed_time_from_first_timestamp() {
        let csv = "Time,A_TEMP,B_TEMP\n\
                   2024.05.01._10:00:00.000000,10,30\n\
                   2024.05.01._10:00:01.000000,20,40\n";
        let (table, report) = load(csv).unwrap();

        assert_eq!(report.rows, 2);
        assert_eq!(report.temperature_sensors, 2);
        assert!(!report.has_speed);
        assert_eq!(table.elapsed(TimeUnit::Second), &[0.0, 1.0]);
        assert_eq!(table.values("A_TEMP").unwrap(), &[Some(10.0), Some(20.0)]);
    }

    #[test]
    fn sorts_rows_and_keeps_elapsed_non_decreasing() {
        let csv = "Time,A_TEMP\n\
                   2024.05.01._10:02:00.500000,3\n\
                   2024.05.01._10:00:00.000000,1\n\
                   2024.05.01._10:01:00.250000,2\n";
        let (table, _) = load(csv).unwrap();

        let elapsed = table.elapsed(TimeUnit::Second);
        assert_eq!(elapsed[0], 0.0);
        assert!(elapsed.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(elapsed[2], 120.5);
        assert_eq!(table.values("A_TEMP").unwrap(), &[Some(1.0), Some(2.0), Some(3.0)]);
        assert!((table.max_elapsed(TimeUnit::Minute) - 120.5 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn missing_time_column_is_fatal() {
        let err = load("Stamp,A_TEMP\n1,2\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingTimeColumn(ref c) if c == "Time"));
    }

    #[test]
    fn invalid_timestamps_are_dropped() {
        let csv = "Time,A_TEMP\n\
                   garbage,99\n\
                   2024.05.01._10:00:05.000000,2\n\
                   2024.05.01._10:00:00.000000,1\n";
        let (table, report) = load(csv).unwrap();
        assert_eq!(report.dropped_rows, 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.elapsed(TimeUnit::Second), &[0.0, 5.0]);
    }

    #[test]
    fn no_valid_rows_is_an_error() {
        let err = load("Time,A_TEMP\nnope,1\n").unwrap_err();
        assert!(matches!(err, LoadError::NoValidRows(_)));
    }

    #[test]
    fn blank_and_text_cells_become_missing() {
        let csv = "Time,A_TEMP,Dyno_Speed_[dyno_speed]\n\
                   2024.05.01._10:00:00.000000,,50\n\
                   2024.05.01._10:00:01.000000,n/a\n";
        let (table, report) = load(csv).unwrap();
        assert!(report.has_speed);
        assert_eq!(table.values("A_TEMP").unwrap(), &[None, None]);
        assert_eq!(table.values("Dyno_Speed_[dyno_speed]").unwrap(), &[Some(50.0), None]);
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");
        std::fs::write(&path, "\u{feff}Time,A_TEMP\n2024.05.01._10:00:00.000000,1\n").unwrap();

        let (table, _) = load_csv(&path, &DataConfig::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.has_column("A_TEMP"));
    }
}
