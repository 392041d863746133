use std::io::Write;
use std::path::Path;
use rust_xlsxwriter::Workbook;

use crate::types::{Column, ColumnKind, ExportResult, ReadingTable, TimeUnit};

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("Failed to write the export file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to write XLSX: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("No data to export")]
    EmptyTable,
}

/// Output format, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// `.xlsx` (any case) selects XLSX, everything else CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => ExportFormat::Xlsx,
            _ => ExportFormat::Csv,
        }
    }
}

/// Column order shared by both writers: time, every data column, derived
/// elapsed times, then group averages.
struct Layout<'a> {
    sensors: Vec<&'a Column>,
    groups: Vec<&'a Column>,
}

impl<'a> Layout<'a> {
    fn new(table: &'a ReadingTable) -> Self {
        let (sensors, groups): (Vec<&Column>, Vec<&Column>) = table
            .columns()
            .iter()
            .partition(|c| c.kind == ColumnKind::Sensor);
        Self { sensors, groups }
    }

    fn header<'b>(&'b self, time_column: &'b str) -> Vec<&'b str> {
        let mut header = vec![time_column];
        header.extend(self.sensors.iter().map(|c| c.name.as_str()));
        header.push(TimeUnit::Second.column_name());
        header.push(TimeUnit::Minute.column_name());
        header.extend(self.groups.iter().map(|c| c.name.as_str()));
        header
    }

    /// Numeric cells of one row, after the time column
    fn values(&self, table: &ReadingTable, row: usize) -> Vec<Option<f64>> {
        let mut values = Vec::with_capacity(self.sensors.len() + self.groups.len() + 2);
        values.extend(self.sensors.iter().map(|c| c.values[row]));
        values.push(Some(table.elapsed(TimeUnit::Second)[row]));
        values.push(Some(table.elapsed(TimeUnit::Minute)[row]));
        values.extend(self.groups.iter().map(|c| c.values[row]));
        values
    }
}

/// Write the processed table as CSV. Missing values are left empty.
pub fn write_csv<W: Write>(
    writer: W,
    table: &ReadingTable,
    time_column: &str,
    time_format: &str,
) -> Result<usize, ExportError> {
    if table.is_empty() {
        return Err(ExportError::EmptyTable);
    }

    let mut wtr = csv::Writer::from_writer(writer);
    let layout = Layout::new(table);
    let header = layout.header(time_column);
    wtr.write_record(&header)?;

    for (row, ts) in table.timestamps().iter().enumerate() {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(ts.format(time_format).to_string());
        record.extend(layout.values(table, row).into_iter().map(format_cell));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(table.len())
}

/// Build a single-sheet workbook with the same layout as [`write_csv`].
/// Timestamps are text in `time_format`; missing values are blank cells.
pub fn build_workbook(
    table: &ReadingTable,
    time_column: &str,
    time_format: &str,
) -> Result<Workbook, ExportError> {
    if table.is_empty() {
        return Err(ExportError::EmptyTable);
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Processed")?;

    let layout = Layout::new(table);
    for (col, name) in layout.header(time_column).iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }

    for (row, ts) in table.timestamps().iter().enumerate() {
        let xl_row = row as u32 + 1;
        sheet.write_string(xl_row, 0, ts.format(time_format).to_string())?;
        for (col, value) in layout.values(table, row).into_iter().enumerate() {
            if let Some(v) = value.filter(|v| v.is_finite()) {
                sheet.write_number(xl_row, col as u16 + 1, v)?;
            }
        }
    }

    Ok(workbook)
}

/// Export to `path`, as XLSX for `.xlsx` files and CSV otherwise
pub fn export_table<P: AsRef<Path>>(
    path: P,
    table: &ReadingTable,
    time_column: &str,
    time_format: &str,
) -> Result<ExportResult, ExportError> {
    let path = path.as_ref();
    let rows = match ExportFormat::from_path(path) {
        ExportFormat::Csv => {
            let file = std::fs::File::create(path)?;
            write_csv(file, table, time_column, time_format)?
        }
        ExportFormat::Xlsx => {
            let mut workbook = build_workbook(table, time_column, time_format)?;
            workbook.save(path)?;
            table.len()
        }
    };
    let columns = table.columns().len() + 3;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ExportResult::new(rows, columns, &file_name))
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataConfig;
    use crate::data::grouping::apply_groups;
    use crate::data::loader::read_csv;
    use crate::types::SensorGroup;

    const INPUT: &str = "Time,A_TEMP,B_TEMP\n\
                         2024.05.01._10:00:01.000000,20,\n\
                         2024.05.01._10:00:00.000000,10,30\n";

    #[test]
    fn writes_derived_and_group_columns() {
        let config = DataConfig::default();
        let (mut table, _) = read_csv(INPUT.as_bytes(), &config).unwrap();
        apply_groups(&mut table, &[SensorGroup::new("G", vec!["A_TEMP".into(), "B_TEMP".into()])]);

        let mut out = Vec::new();
        let rows = write_csv(&mut out, &table, &config.time_column, &config.export_time_format).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(rows, 2);
        assert_eq!(lines[0], "Time,A_TEMP,B_TEMP,Elapsed_s,Elapsed_min,G");
        assert_eq!(lines[1], "2024.05.01._10:00:00.000000,10,30,0,0,20");

        let last: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(&last[..4], &["2024.05.01._10:00:01.000000", "20", "", "1"]);
        assert!((last[4].parse::<f64>().unwrap() - 1.0 / 60.0).abs() < 1e-12);
        assert_eq!(last[5], "20");
    }

    #[test]
    fn exported_file_loads_back() {
        let config = DataConfig::default();
        let (table, _) = read_csv(INPUT.as_bytes(), &config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thermal_processed.csv");
        let result = export_table(&path, &table, &config.time_column, &config.export_time_format).unwrap();
        assert_eq!(result.rows, 2);
        assert!(result.message.contains("thermal_processed.csv"));

        let (reloaded, _) = crate::data::loader::load_csv(&path, &config).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.values("B_TEMP").unwrap(), &[Some(30.0), None]);
        assert!(!reloaded.has_column("Elapsed_s"));
        assert_eq!(reloaded.elapsed(TimeUnit::Second), &[0.0, 1.0]);
    }

    #[test]
    fn xlsx_extension_writes_a_workbook() {
        let config = DataConfig::default();
        let (mut table, _) = read_csv(INPUT.as_bytes(), &config).unwrap();
        apply_groups(&mut table, &[SensorGroup::new("G", vec!["A_TEMP".into(), "B_TEMP".into()])]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thermal_processed.XLSX");
        let result = export_table(&path, &table, &config.time_column, &config.export_time_format).unwrap();

        assert_eq!(result.rows, 2);
        assert!(result.message.contains("2 rows x 6 columns"));
        let bytes = std::fs::read(&path).unwrap();
        // xlsx is a zip container
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a.xlsx")), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::from_path(Path::new("a.Xlsx")), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::from_path(Path::new("a.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("a")), ExportFormat::Csv);
    }

    #[test]
    fn empty_table_is_rejected() {
        let table = ReadingTable::default();
        let err = write_csv(Vec::new(), &table, "Time", "%Y").unwrap_err();
        assert!(matches!(err, ExportError::EmptyTable));
        assert!(matches!(build_workbook(&table, "Time", "%Y"), Err(ExportError::EmptyTable)));
    }
}
