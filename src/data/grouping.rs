use std::collections::HashSet;
use log::{info, warn};

use crate::config::GroupingConfig;
use crate::types::{ColumnKind, GroupWarning, ReadingTable, SensorGroup};

pub const AUTO_GROUP_NAMES: [&str; 3] = ["Vent", "Head", "Outside"];

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GroupError {
    #[error("Please enter a group name")]
    EmptyName,
    #[error("Please select at least one sensor")]
    NoSensors,
    #[error("Group '{0}' already exists")]
    DuplicateName(String),
    #[error("'{0}' is already a data column")]
    NameCollidesWithColumn(String),
    #[error("Sensor '{sensor}' already belongs to group '{group}'")]
    SensorAlreadyAssigned { sensor: String, group: String },
    #[error("Group '{0}' not found")]
    NotFound(String),
}

/// Row-wise mean of a set of member columns
#[derive(Debug, Clone, PartialEq)]
pub enum GroupAverage {
    Averaged {
        values: Vec<Option<f64>>,
        /// Members found in the table
        used: Vec<String>,
        /// Members absent from the table
        missing: Vec<String>,
    },
    NoValidMembers,
}

/// Mean across the members present in `table`, skipping missing members
/// and missing cells. A row where every present member is missing yields `None`.
pub fn group_average(table: &ReadingTable, members: &[String]) -> GroupAverage {
    let mut used = Vec::new();
    let mut missing = Vec::new();
    let mut seen = HashSet::new();
    let mut series = Vec::new();

    for member in members {
        if !seen.insert(member.as_str()) {
            continue;
        }
        match table.values(member) {
            Some(values) => {
                used.push(member.clone());
                series.push(values);
            }
            None => missing.push(member.clone()),
        }
    }

    if series.is_empty() {
        return GroupAverage::NoValidMembers;
    }

    let values = (0..table.len())
        .map(|row| {
            let (sum, count) = series
                .iter()
                .filter_map(|s| s[row])
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            if count == 0 {
                None
            } else {
                Some(sum / count as f64)
            }
        })
        .collect();

    GroupAverage::Averaged { values, used, missing }
}

/// Replace all group columns in `table` with the averages of `groups`.
/// Empty groups are ignored; groups without any valid member, or named like a
/// raw data column, are omitted and reported.
pub fn apply_groups(table: &mut ReadingTable, groups: &[SensorGroup]) -> Vec<GroupWarning> {
    table.remove_group_columns();
    let mut warnings = Vec::new();

    for group in groups.iter().filter(|g| !g.is_empty()) {
        if table.column(&group.name).is_some_and(|c| c.kind == ColumnKind::Sensor) {
            warn!("Group '{}' collides with a data column, column omitted", group.name);
            warnings.push(GroupWarning::NameCollision {
                group: group.name.clone(),
            });
            continue;
        }
        match group_average(table, &group.members) {
            GroupAverage::Averaged { values, missing, used } => {
                if !missing.is_empty() {
                    warn!("Group '{}' skips missing sensors: {:?}", group.name, missing);
                    warnings.push(GroupWarning::MissingMembers {
                        group: group.name.clone(),
                        missing,
                    });
                }
                table.set_group_column(&group.name, values);
                info!("Group '{}' averaged over {} sensors", group.name, used.len());
            }
            GroupAverage::NoValidMembers => {
                warn!("Group '{}' has no valid sensors, column omitted", group.name);
                warnings.push(GroupWarning::NoValidMembers {
                    group: group.name.clone(),
                });
            }
        }
    }

    warnings
}

/// Sort temperature channels into Vent / Head / Outside by their mean and range.
/// Always returns the three groups, possibly empty.
pub fn classify_sensors(table: &ReadingTable, marker: &str, config: &GroupingConfig) -> Vec<SensorGroup> {
    let mut groups: Vec<SensorGroup> = AUTO_GROUP_NAMES
        .iter()
        .map(|name| SensorGroup::new(*name, Vec::new()))
        .collect();

    for name in table.temperature_columns(marker) {
        let Some(column) = table.column(&name) else {
            continue;
        };
        if column.valid_values().count() < config.min_samples {
            continue;
        }
        let (Some(mean), Some((min, max))) = (column.mean(), column.range()) else {
            continue;
        };
        let delta = max - min;

        let slot = if mean < config.vent_max_mean && delta > config.vent_min_range {
            Some(0)
        } else if mean >= config.head_min_mean && mean < config.head_max_mean && delta > config.head_min_range {
            Some(1)
        } else if mean > config.outside_min_mean && delta < config.outside_max_range {
            Some(2)
        } else {
            None
        };

        if let Some(slot) = slot {
            groups[slot].members.push(name);
        }
    }

    groups
}

/// Manually defined groups. A sensor belongs to at most one group.
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: Vec<SensorGroup>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[SensorGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SensorGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Group currently holding `sensor`
    pub fn assigned_group(&self, sensor: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.contains(sensor))
            .map(|g| g.name.as_str())
    }

    /// Add a group, enforcing unique names and unique sensor membership.
    /// `columns` are the raw data column names the group name must not shadow.
    pub fn add(&mut self, name: &str, sensors: Vec<String>, columns: &[String]) -> Result<(), GroupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GroupError::EmptyName);
        }
        if sensors.is_empty() {
            return Err(GroupError::NoSensors);
        }
        if self.get(name).is_some() {
            return Err(GroupError::DuplicateName(name.to_string()));
        }
        if columns.iter().any(|c| c == name) {
            return Err(GroupError::NameCollidesWithColumn(name.to_string()));
        }

        let mut members: Vec<String> = Vec::with_capacity(sensors.len());
        for sensor in sensors {
            if let Some(group) = self.assigned_group(&sensor) {
                return Err(GroupError::SensorAlreadyAssigned {
                    sensor,
                    group: group.to_string(),
                });
            }
            if !members.contains(&sensor) {
                members.push(sensor);
            }
        }

        self.groups.push(SensorGroup::new(name, members));
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<SensorGroup, GroupError> {
        let idx = self
            .groups
            .iter()
            .position(|g| g.name == name)
            .ok_or_else(|| GroupError::NotFound(name.to_string()))?;
        Ok(self.groups.remove(idx))
    }

    pub fn remove_last(&mut self) -> Option<SensorGroup> {
        self.groups.pop()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Replace all groups, validating each one as if added in order
    pub fn replace_all(&mut self, groups: Vec<SensorGroup>, columns: &[String]) -> Result<(), GroupError> {
        let mut next = GroupRegistry::new();
        for group in groups {
            next.add(&group.name, group.members, columns)?;
        }
        *self = next;
        Ok(())
    }

    /// Temperature sensors not yet assigned to any group, in `sensors` order
    pub fn available_sensors(&self, sensors: &[String]) -> Vec<String> {
        sensors
            .iter()
            .filter(|s| self.assigned_group(s).is_none())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;
    use chrono::NaiveDate;

    fn table(columns: Vec<Column>) -> ReadingTable {
        let rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        let start = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let stamps = (0..rows)
            .map(|i| start + chrono::TimeDelta::seconds(i as i64))
            .collect();
        ReadingTable::from_rows(stamps, columns)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn averages_two_members() {
        let mut t = table(vec![
            Column::sensor("A", vec![Some(10.0), Some(20.0)]),
            Column::sensor("B", vec![Some(30.0), Some(40.0)]),
        ]);
        let warnings = apply_groups(&mut t, &[SensorGroup::new("G", names(&["A", "B"]))]);

        assert!(warnings.is_empty());
        // row-wise: (10+30)/2, (20+40)/2
        assert_eq!(t.values("G").unwrap(), &[Some(20.0), Some(30.0)]);
    }

    #[test]
    fn skips_members_not_in_table() {
        let t = table(vec![
            Column::sensor("A", vec![Some(10.0)]),
            Column::sensor("B", vec![Some(30.0)]),
            Column::sensor("C", vec![Some(90.0)]),
        ]);
        match group_average(&t, &names(&["A", "B", "Z"])) {
            GroupAverage::Averaged { values, used, missing } => {
                assert_eq!(values, vec![Some(20.0)]);
                assert_eq!(used, names(&["A", "B"]));
                assert_eq!(missing, names(&["Z"]));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_cells_are_skipped_per_row() {
        let t = table(vec![
            Column::sensor("A", vec![Some(10.0), None, None]),
            Column::sensor("B", vec![Some(30.0), Some(40.0), None]),
        ]);
        match group_average(&t, &names(&["A", "B"])) {
            GroupAverage::Averaged { values, .. } => {
                assert_eq!(values, vec![Some(20.0), Some(40.0), None]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn group_without_valid_members_is_omitted_with_warning() {
        let mut t = table(vec![Column::sensor("A", vec![Some(1.0)])]);
        let warnings = apply_groups(&mut t, &[SensorGroup::new("Ghost", names(&["X", "Y"]))]);

        assert!(!t.has_column("Ghost"));
        assert_eq!(warnings, vec![GroupWarning::NoValidMembers { group: "Ghost".into() }]);
    }

    #[test]
    fn group_named_like_a_data_column_is_omitted_with_warning() {
        let mut t = table(vec![
            Column::sensor("Head", vec![Some(99.0), Some(99.0)]),
            Column::sensor("A_TEMP", vec![Some(10.0), Some(30.0)]),
            Column::sensor("B_TEMP", vec![Some(20.0), Some(40.0)]),
        ]);
        let groups = [
            SensorGroup::new("Head", names(&["A_TEMP", "B_TEMP"])),
            SensorGroup::new("Cabin", names(&["A_TEMP", "B_TEMP"])),
        ];
        let warnings = apply_groups(&mut t, &groups);

        assert_eq!(warnings, vec![GroupWarning::NameCollision { group: "Head".into() }]);
        assert_eq!(t.values("Head").unwrap(), &[Some(99.0), Some(99.0)]);
        assert_eq!(t.group_column_names(), names(&["Cabin"]));
        assert_eq!(t.values("Cabin").unwrap(), &[Some(15.0), Some(35.0)]);
        assert_eq!(t.columns().iter().filter(|c| c.name == "Head").count(), 1);
    }

    #[test]
    fn reapplying_drops_stale_group_columns() {
        let mut t = table(vec![Column::sensor("A", vec![Some(1.0)])]);
        apply_groups(&mut t, &[SensorGroup::new("Old", names(&["A"]))]);
        apply_groups(&mut t, &[SensorGroup::new("New", names(&["A"]))]);

        assert!(!t.has_column("Old"));
        assert_eq!(t.group_column_names(), names(&["New"]));
    }

    #[test]
    fn registry_enforces_single_membership() {
        let mut registry = GroupRegistry::new();
        registry.add("Vent", names(&["A", "B"]), &[]).unwrap();

        let err = registry.add("Head", names(&["B", "C"]), &[]).unwrap_err();
        assert_eq!(
            err,
            GroupError::SensorAlreadyAssigned { sensor: "B".into(), group: "Vent".into() }
        );
        assert_eq!(registry.available_sensors(&names(&["A", "B", "C"])), names(&["C"]));
    }

    #[test]
    fn registry_validates_names() {
        let mut registry = GroupRegistry::new();
        assert_eq!(registry.add("  ", names(&["A"]), &[]), Err(GroupError::EmptyName));
        assert_eq!(registry.add("G", vec![], &[]), Err(GroupError::NoSensors));
        assert_eq!(
            registry.add("A_TEMP", names(&["B"]), &names(&["A_TEMP"])),
            Err(GroupError::NameCollidesWithColumn("A_TEMP".into()))
        );
        registry.add(" G ", names(&["A"]), &[]).unwrap();
        assert_eq!(registry.get("G").unwrap().members, names(&["A"]));
        assert_eq!(registry.add("G", names(&["B"]), &[]), Err(GroupError::DuplicateName("G".into())));
    }

    #[test]
    fn removing_a_group_frees_its_sensors() {
        let mut registry = GroupRegistry::new();
        registry.add("G1", names(&["A"]), &[]).unwrap();
        registry.add("G2", names(&["B"]), &[]).unwrap();

        assert_eq!(registry.remove_last().unwrap().name, "G2");
        registry.remove("G1").unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.remove("G1"), Err(GroupError::NotFound("G1".into())));
        assert_eq!(registry.available_sensors(&names(&["A", "B"])), names(&["A", "B"]));
    }

    #[test]
    fn replace_all_rejects_overlapping_groups_and_keeps_previous() {
        let mut registry = GroupRegistry::new();
        registry.add("Keep", names(&["A"]), &[]).unwrap();

        let result = registry.replace_all(
            vec![
                SensorGroup::new("X", names(&["B"])),
                SensorGroup::new("Y", names(&["B"])),
            ],
            &[],
        );
        assert!(result.is_err());
        assert_eq!(registry.groups()[0].name, "Keep");
    }

    #[test]
    fn classifies_by_mean_and_range() {
        let vent = (0..6).map(|i| Some(i as f64 * 6.0 - 10.0)).collect(); // mean 5, range 30
        let head = (0..6).map(|i| Some(22.0 + i as f64 * 3.0)).collect(); // mean 29.5, range 15
        let outside = (0..6).map(|i| Some(40.0 + i as f64 * 0.5)).collect(); // mean 41.25, range 2.5
        let flat = vec![Some(25.0); 6];
        let short = vec![Some(-50.0), Some(50.0), None, None, None, None];
        let t = table(vec![
            Column::sensor("VENT_TEMP", vent),
            Column::sensor("HEAD_TEMP", head),
            Column::sensor("AMB_TEMP", outside),
            Column::sensor("FLAT_TEMP", flat),
            Column::sensor("SHORT_TEMP", short),
            Column::sensor("Speed", vec![Some(0.0); 6]),
        ]);

        let groups = classify_sensors(&t, "TEMP", &GroupingConfig::default());
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].members, names(&["VENT_TEMP"]));
        assert_eq!(groups[1].members, names(&["HEAD_TEMP"]));
        assert_eq!(groups[2].members, names(&["AMB_TEMP"]));
    }
}
