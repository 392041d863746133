pub mod reading_table;
pub mod time_unit;
pub mod group;
pub mod set_point;
pub mod results;

pub use reading_table::{Column, ColumnKind, ReadingTable};
pub use time_unit::TimeUnit;
pub use group::SensorGroup;
pub use set_point::{SetPoint, SetPointSample, SET_POINT_LABELS};
pub use results::{LoadReport, GroupWarning, ExportResult};
