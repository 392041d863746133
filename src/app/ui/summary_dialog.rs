use eframe::egui;
use crate::app::app_core::ThermalApp;
use crate::data::DataSummary;

pub fn render_summary_dialog(app: &mut ThermalApp, ctx: &egui::Context) {
    if !app.state.dialogs.show_summary {
        return;
    }
    let Some(table) = app.state.dataset.table.as_ref() else {
        return;
    };

    let data_cfg = &app.config.get_config().data;
    let text = DataSummary::compute(table, app.state.active_groups(), data_cfg).to_text(data_cfg);

    let mut open = app.state.dialogs.show_summary;
    egui::Window::new("Data Summary")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(420.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().max_height(480.0).show(ui, |ui| {
                ui.monospace(&text);
            });
            ui.add_space(5.0);
            if ui.button("📋 Copy").clicked() {
                ui.ctx().copy_text(text.clone());
            }
        });
    app.state.dialogs.show_summary = open;
}
