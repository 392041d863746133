use crate::config::SetPointConfig;
use crate::types::{ReadingTable, SetPoint, SetPointSample, TimeUnit};

/// Index of the entry closest to `target`. Ties go to the first occurrence;
/// NaN entries are never chosen.
pub fn nearest_index(times: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &t) in times.iter().enumerate() {
        let diff = (t - target).abs();
        if diff.is_nan() {
            continue;
        }
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((idx, diff)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Values of `signals` at the row nearest to `point`
pub fn sample_at(table: &ReadingTable, unit: TimeUnit, point: &SetPoint, signals: &[String]) -> Option<SetPointSample> {
    let times = table.elapsed(unit);
    let row = nearest_index(times, point.position)?;

    let values = signals
        .iter()
        .filter(|s| table.has_column(s))
        .map(|s| (s.clone(), table.values(s).and_then(|v| v[row])))
        .collect();

    Some(SetPointSample {
        label: point.label,
        position: point.position,
        row,
        time: times[row],
        values,
    })
}

/// Starting positions for `count` set points.
/// Points are spaced by the configured step; any that would fall past the end
/// of the data are spread evenly instead.
pub fn default_positions(count: usize, max_time: f64, unit: TimeUnit, config: &SetPointConfig) -> Vec<f64> {
    let spacing = match unit {
        TimeUnit::Minute => config.spacing_minutes,
        TimeUnit::Second => config.spacing_seconds,
    };
    (0..count)
        .map(|i| {
            let pos = (i + 1) as f64 * spacing;
            if pos > max_time {
                max_time * (i + 1) as f64 / (count + 1) as f64
            } else {
                pos
            }
        })
        .collect()
}

/// Parse a typed position. Empty or non-numeric text is rejected; numbers are
/// clamped into `[0, max_time]`.
pub fn parse_position(text: &str, max_time: f64) -> Option<f64> {
    let value = text.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(clamp_position(value, max_time))
}

pub fn clamp_position(value: f64, max_time: f64) -> f64 {
    value.max(0.0).min(max_time.max(0.0))
}

pub fn format_position(value: f64) -> String {
    format!("{:.1}", value)
}

/// Set points on the chart and the text fields that edit them
#[derive(Debug, Clone, Default)]
pub struct SetPointSet {
    points: Vec<SetPoint>,
    inputs: Vec<String>,
}

impl SetPointSet {
    pub fn points(&self) -> &[SetPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Recreate `count` points at their default positions
    pub fn reset(&mut self, count: usize, max_time: f64, unit: TimeUnit, config: &SetPointConfig) {
        self.points = default_positions(count, max_time, unit, config)
            .into_iter()
            .enumerate()
            .map(|(i, pos)| SetPoint::new(i, pos))
            .collect();
        self.sync_inputs();
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.inputs.clear();
    }

    pub fn input_mut(&mut self, index: usize) -> Option<&mut String> {
        self.inputs.get_mut(index)
    }

    /// Apply the text typed for point `index`. Invalid text reverts to the
    /// last valid position. Returns true when the position changed.
    pub fn commit_input(&mut self, index: usize, max_time: f64) -> bool {
        let Some(point) = self.points.get_mut(index) else {
            return false;
        };
        let parsed = self.inputs.get(index).and_then(|t| parse_position(t, max_time));
        let changed = match parsed {
            Some(pos) if pos != point.position => {
                point.position = pos;
                true
            }
            _ => false,
        };
        self.inputs[index] = format_position(point.position);
        changed
    }

    /// Move point `index` (used while dragging on the chart)
    pub fn set_position(&mut self, index: usize, position: f64, max_time: f64) {
        if let Some(point) = self.points.get_mut(index) {
            point.position = clamp_position(position, max_time);
            self.inputs[index] = format_position(point.position);
        }
    }

    /// Re-express every position in a new time unit
    pub fn convert_unit(&mut self, from: TimeUnit, to: TimeUnit, max_time: f64) {
        for point in &mut self.points {
            point.position = clamp_position(from.convert(point.position, to), max_time);
        }
        self.sync_inputs();
    }

    /// Keep positions inside a (possibly shorter) new dataset
    pub fn clamp_all(&mut self, max_time: f64) {
        for point in &mut self.points {
            point.position = clamp_position(point.position, max_time);
        }
        self.sync_inputs();
    }

    /// |B - A| when exactly two points are placed
    pub fn time_difference(&self) -> Option<f64> {
        match self.points.as_slice() {
            [a, b] => Some((b.position - a.position).abs()),
            _ => None,
        }
    }

    pub fn sample_all(&self, table: &ReadingTable, unit: TimeUnit, signals: &[String]) -> Vec<SetPointSample> {
        self.points
            .iter()
            .filter_map(|p| sample_at(table, unit, p, signals))
            .collect()
    }

    fn sync_inputs(&mut self) {
        self.inputs = self.points.iter().map(|p| format_position(p.position)).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;
    use chrono::{NaiveDate, TimeDelta};

    fn table() -> ReadingTable {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let stamps = (0..5).map(|i| start + TimeDelta::seconds(i * 30)).collect();
        ReadingTable::from_rows(
            stamps,
            vec![
                Column::sensor("A_TEMP", vec![Some(1.0), Some(2.0), None, Some(4.0), Some(5.0)]),
                Column::sensor("Speed", vec![Some(0.0), Some(10.0), Some(20.0), Some(30.0), Some(40.0)]),
            ],
        )
    }

    #[test]
    fn exact_match_returns_that_row() {
        let times = [0.0, 0.5, 1.0, 1.5];
        for (idx, t) in times.iter().enumerate() {
            assert_eq!(nearest_index(&times, *t), Some(idx));
        }
    }

    #[test]
    fn ties_pick_the_first_row() {
        assert_eq!(nearest_index(&[0.0, 1.0, 2.0], 0.5), Some(0));
        assert_eq!(nearest_index(&[0.0, 1.0, 1.0], 1.0), Some(1));
    }

    #[test]
    fn nearest_handles_edges() {
        assert_eq!(nearest_index(&[], 1.0), None);
        assert_eq!(nearest_index(&[0.0, 1.0, 2.0], -5.0), Some(0));
        assert_eq!(nearest_index(&[0.0, 1.0, 2.0], 99.0), Some(2));
        assert_eq!(nearest_index(&[f64::NAN, 3.0], 0.0), Some(1));
    }

    #[test]
    fn samples_signals_at_nearest_row() {
        let t = table();
        let point = SetPoint::new(0, 1.4); // minutes; rows at 0, 0.5, 1.0, 1.5, 2.0
        let signals = vec!["A_TEMP".to_string(), "Speed".to_string(), "Nope".to_string()];
        let sample = sample_at(&t, TimeUnit::Minute, &point, &signals).unwrap();

        assert_eq!(sample.label, 'A');
        assert_eq!(sample.row, 3);
        assert_eq!(sample.time, 1.5);
        assert_eq!(sample.value("A_TEMP"), Some(4.0));
        assert_eq!(sample.value("Speed"), Some(30.0));
        assert_eq!(sample.values.len(), 2);
    }

    #[test]
    fn missing_cell_samples_as_none() {
        let t = table();
        let sample = sample_at(&t, TimeUnit::Second, &SetPoint::new(1, 60.0), &["A_TEMP".to_string()]).unwrap();
        assert_eq!(sample.row, 2);
        assert_eq!(sample.value("A_TEMP"), None);
    }

    #[test]
    fn default_positions_use_spacing_then_spread() {
        let config = SetPointConfig::default();
        assert_eq!(default_positions(2, 10.0, TimeUnit::Minute, &config), vec![2.0, 4.0]);
        assert_eq!(default_positions(2, 300.0, TimeUnit::Second, &config), vec![50.0, 100.0]);
        // 2 min fits, 4 min does not: second point is spread as 3 * 2/3
        assert_eq!(default_positions(2, 3.0, TimeUnit::Minute, &config), vec![2.0, 2.0]);
        assert!(default_positions(0, 3.0, TimeUnit::Minute, &config).is_empty());
    }

    #[test]
    fn input_is_clamped_or_reverted() {
        let config = SetPointConfig::default();
        let mut set = SetPointSet::default();
        set.reset(2, 10.0, TimeUnit::Minute, &config);

        *set.input_mut(0).unwrap() = "7.3".to_string();
        assert!(set.commit_input(0, 10.0));
        assert_eq!(set.points()[0].position, 7.3);
        assert_eq!(set.input_mut(0).unwrap(), "7.3");

        *set.input_mut(0).unwrap() = "abc".to_string();
        assert!(!set.commit_input(0, 10.0));
        assert_eq!(set.points()[0].position, 7.3);

        *set.input_mut(1).unwrap() = "".to_string();
        assert!(!set.commit_input(1, 10.0));
        assert_eq!(set.input_mut(1).unwrap(), "4.0");

        *set.input_mut(1).unwrap() = "50".to_string();
        set.commit_input(1, 10.0);
        assert_eq!(set.points()[1].position, 10.0);

        *set.input_mut(1).unwrap() = "-3".to_string();
        set.commit_input(1, 10.0);
        assert_eq!(set.points()[1].position, 0.0);
    }

    #[test]
    fn time_difference_needs_exactly_two_points() {
        let config = SetPointConfig::default();
        let mut set = SetPointSet::default();
        set.reset(1, 10.0, TimeUnit::Minute, &config);
        assert_eq!(set.time_difference(), None);

        set.reset(2, 10.0, TimeUnit::Minute, &config);
        set.set_position(0, 9.0, 10.0);
        assert_eq!(set.time_difference(), Some(5.0));
    }

    #[test]
    fn unit_switch_converts_positions() {
        let config = SetPointConfig::default();
        let mut set = SetPointSet::default();
        set.reset(1, 10.0, TimeUnit::Minute, &config);

        set.convert_unit(TimeUnit::Minute, TimeUnit::Second, 600.0);
        assert_eq!(set.points()[0].position, 120.0);
        assert_eq!(set.input_mut(0).unwrap(), "120.0");

        set.clamp_all(60.0);
        assert_eq!(set.points()[0].position, 60.0);
    }

    #[test]
    fn sample_all_uses_each_point() {
        let t = table();
        let mut set = SetPointSet::default();
        set.reset(2, t.max_elapsed(TimeUnit::Second), TimeUnit::Second, &SetPointConfig::default());
        let samples = set.sample_all(&t, TimeUnit::Second, &["Speed".to_string()]);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].label, 'A');
        assert_eq!(samples[0].time, 60.0);
        assert_eq!(samples[1].label, 'B');
        // 100 s lies nearer the 90 s row than the 120 s row
        assert_eq!(samples[1].time, 90.0);
    }
}
