use log::info;

use crate::app::app_core::ThermalApp;
use crate::types::TimeUnit;

pub struct SetPointHandler;

impl SetPointHandler {
    /// Place `count` points at their default positions
    pub fn set_count(app: &mut ThermalApp, count: usize) {
        let max_count = app.config.get_config().set_points.max_count;
        app.state.set_points.count = count.min(max_count);
        Self::reset(app);
    }

    pub fn reset(app: &mut ThermalApp) {
        if !app.state.has_data() {
            app.state.set_points.set.clear();
            return;
        }
        let max_time = app.state.max_time();
        let unit = app.state.chart.unit;
        let count = app.state.set_points.count;
        app.state
            .set_points
            .set
            .reset(count, max_time, unit, &app.config.get_config().set_points);
        info!("Placed {} set points", count);
    }

    pub fn commit_input(app: &mut ThermalApp, index: usize) {
        let max_time = app.state.max_time();
        app.state.set_points.set.commit_input(index, max_time);
    }

    pub fn change_unit(app: &mut ThermalApp, unit: TimeUnit) {
        let previous = app.state.chart.unit;
        if previous == unit {
            return;
        }
        app.state.chart.unit = unit;
        let max_time = app.state.max_time();
        app.state.set_points.set.convert_unit(previous, unit, max_time);
    }
}
