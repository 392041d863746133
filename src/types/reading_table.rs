use chrono::NaiveDateTime;
use super::TimeUnit;

/// Origin of a column in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Read from the source CSV
    Sensor,
    /// Row-wise average of a sensor group
    Group,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Option<f64>>,
}

impl Column {
    pub fn sensor(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self { name: name.into(), kind: ColumnKind::Sensor, values }
    }

    pub fn group(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self { name: name.into(), kind: ColumnKind::Group, values }
    }

    /// Present values only
    pub fn valid_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v).filter(|v| v.is_finite())
    }

    /// (min, max) over present values
    pub fn range(&self) -> Option<(f64, f64)> {
        let (min, max) = self.valid_values().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), v| (min.min(v), max.max(v)),
        );
        if min.is_finite() && max.is_finite() {
            Some((min, max))
        } else {
            None
        }
    }

    pub fn mean(&self) -> Option<f64> {
        let (sum, count) = self.valid_values().fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}

/// Sensor readings sorted by timestamp, with elapsed time derived from the first row.
#[derive(Debug, Clone, Default)]
pub struct ReadingTable {
    timestamps: Vec<NaiveDateTime>,
    elapsed_s: Vec<f64>,
    elapsed_min: Vec<f64>,
    columns: Vec<Column>,
}

impl ReadingTable {
    /// Build a table from unsorted rows. Rows are sorted by timestamp (stable) and
    /// elapsed time is measured from the earliest one.
    pub fn from_rows(timestamps: Vec<NaiveDateTime>, columns: Vec<Column>) -> Self {
        let mut order: Vec<usize> = (0..timestamps.len()).collect();
        order.sort_by_key(|&i| timestamps[i]);

        let timestamps: Vec<NaiveDateTime> = order.iter().map(|&i| timestamps[i]).collect();
        let columns = columns
            .into_iter()
            .map(|c| Column {
                values: order
                    .iter()
                    .map(|&i| c.values.get(i).copied().flatten())
                    .collect(),
                ..c
            })
            .collect();

        let elapsed_s: Vec<f64> = match timestamps.first() {
            Some(&start) => timestamps
                .iter()
                .map(|t| (*t - start).num_microseconds().unwrap_or(0) as f64 / 1_000_000.0)
                .collect(),
            None => Vec::new(),
        };
        let elapsed_min = elapsed_s.iter().map(|s| s / 60.0).collect();

        Self {
            timestamps,
            elapsed_s,
            elapsed_min,
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn elapsed(&self, unit: TimeUnit) -> &[f64] {
        match unit {
            TimeUnit::Second => &self.elapsed_s,
            TimeUnit::Minute => &self.elapsed_min,
        }
    }

    pub fn max_elapsed(&self, unit: TimeUnit) -> f64 {
        self.elapsed(unit).last().copied().unwrap_or(0.0)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn values(&self, name: &str) -> Option<&[Option<f64>]> {
        self.column(name).map(|c| c.values.as_slice())
    }

    /// Sensor columns whose name contains `marker` (case-insensitive)
    pub fn temperature_columns(&self, marker: &str) -> Vec<String> {
        let marker = marker.to_lowercase();
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Sensor && c.name.to_lowercase().contains(&marker))
            .map(|c| c.name.clone())
            .collect()
    }

    /// Insert or replace a group column
    pub fn set_group_column(&mut self, name: &str, values: Vec<Option<f64>>) {
        if let Some(existing) = self
            .columns
            .iter_mut()
            .find(|c| c.name == name && c.kind == ColumnKind::Group)
        {
            existing.values = values;
        } else {
            self.columns.push(Column::group(name, values));
        }
    }

    pub fn remove_group_columns(&mut self) {
        self.columns.retain(|c| c.kind != ColumnKind::Group);
    }

    pub fn group_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Group)
            .map(|c| c.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn rows_are_sorted_and_elapsed_starts_at_zero() {
        let table = ReadingTable::from_rows(
            vec![ts(10, 0, 30), ts(10, 0, 0), ts(10, 1, 0)],
            vec![Column::sensor("A_TEMP", vec![Some(3.0), Some(1.0), Some(4.0)])],
        );

        assert_eq!(table.elapsed(TimeUnit::Second), &[0.0, 30.0, 60.0]);
        assert_eq!(table.elapsed(TimeUnit::Minute), &[0.0, 0.5, 1.0]);
        assert_eq!(table.values("A_TEMP").unwrap(), &[Some(1.0), Some(3.0), Some(4.0)]);
        assert_eq!(table.max_elapsed(TimeUnit::Second), 60.0);
    }

    #[test]
    fn temperature_columns_match_marker_case_insensitively() {
        let table = ReadingTable::from_rows(
            vec![ts(0, 0, 0)],
            vec![
                Column::sensor("Vent_TEMP_1", vec![Some(1.0)]),
                Column::sensor("head_temp", vec![Some(1.0)]),
                Column::sensor("Dyno_Speed_[dyno_speed]", vec![Some(1.0)]),
            ],
        );
        assert_eq!(table.temperature_columns("TEMP"), vec!["Vent_TEMP_1", "head_temp"]);
    }

    #[test]
    fn group_columns_are_replaced_not_duplicated() {
        let mut table = ReadingTable::from_rows(vec![ts(0, 0, 0)], vec![]);
        table.set_group_column("G", vec![Some(1.0)]);
        table.set_group_column("G", vec![Some(2.0)]);
        assert_eq!(table.columns().len(), 1);
        assert_eq!(table.values("G").unwrap(), &[Some(2.0)]);

        table.remove_group_columns();
        assert!(table.columns().is_empty());
    }

    #[test]
    fn column_stats_skip_missing_values() {
        let column = Column::sensor("A", vec![Some(10.0), None, Some(30.0)]);
        assert_eq!(column.mean(), Some(20.0));
        assert_eq!(column.range(), Some((10.0, 30.0)));
        assert_eq!(Column::sensor("B", vec![None]).mean(), None);
    }
}
