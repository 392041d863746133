pub mod export;
pub mod grouping;
pub mod loader;
pub mod presets;
pub mod setpoints;
pub mod summary;

pub use export::export_table;
pub use grouping::{apply_groups, classify_sensors, GroupRegistry};
pub use loader::load_csv;
pub use presets::GroupPreset;
pub use setpoints::SetPointSet;
pub use summary::DataSummary;
