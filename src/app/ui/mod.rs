pub mod analysis_dialog;
pub mod control_panel;
pub mod main_panel;
pub mod status_bar;
pub mod summary_dialog;

pub use analysis_dialog::render_analysis_dialog;
pub use control_panel::render_control_panel;
pub use main_panel::render_main_panel;
pub use status_bar::{render_bottom_status_bar, render_status_bar};
pub use summary_dialog::render_summary_dialog;
