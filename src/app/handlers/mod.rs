pub mod export;
pub mod file;
pub mod grouping;
pub mod set_points;
pub mod settings;

pub use export::ExportHandler;
pub use file::FileHandler;
pub use grouping::GroupingHandler;
pub use set_points::SetPointHandler;
pub use settings::SettingsHandler;
