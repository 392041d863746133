use egui::{Align2, Color32, CursorIcon};
use egui_plot::{
    uniform_grid_spacer, AxisHints, HPlacement, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text, VLine,
};
use crate::config::{AppConfig, PlotConfig};
use crate::data::setpoints::nearest_index;
use crate::data::SetPointSet;
use crate::types::{ReadingTable, TimeUnit};
use crate::utils::format_tick;

/// Pixel distance within which a set-point line can be grabbed
const GRAB_TOLERANCE: f32 = 6.0;

/// Lower edge of the y axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YAxisMode {
    #[default]
    Auto,
    FromZero,
}

impl YAxisMode {
    pub fn label(&self) -> &'static str {
        match self {
            YAxisMode::Auto => "Auto Scale",
            YAxisMode::FromZero => "Start from zero",
        }
    }
}

/// Linear map from one value range onto another; used to draw speed on the
/// temperature axis and label it back in speed units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMapping {
    from: (f64, f64),
    to: (f64, f64),
}

impl AxisMapping {
    pub fn new(from: (f64, f64), to: (f64, f64)) -> Self {
        Self { from, to }
    }

    pub fn forward(&self, value: f64) -> f64 {
        let span = self.from.1 - self.from.0;
        if span.abs() < f64::EPSILON {
            return (self.to.0 + self.to.1) / 2.0;
        }
        self.to.0 + (value - self.from.0) / span * (self.to.1 - self.to.0)
    }

    pub fn inverse(&self, value: f64) -> f64 {
        let span = self.to.1 - self.to.0;
        if span.abs() < f64::EPSILON {
            return self.from.0;
        }
        self.from.0 + (value - self.to.0) / span * (self.from.1 - self.from.0)
    }
}

/// Visible y range for a set of values.
/// Auto pads the data range by 5%; FromZero spans `[0, max * headroom]` and
/// falls back to Auto when nothing is positive.
pub fn y_bounds(values: impl IntoIterator<Item = f64>, mode: YAxisMode, headroom: f64) -> Option<(f64, f64)> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| (min.min(v), max.max(v)));
    if !min.is_finite() || !max.is_finite() {
        return None;
    }

    if mode == YAxisMode::FromZero && max > 0.0 {
        return Some((0.0, max * headroom));
    }

    let range = (max - min).max(0.1);
    Some((min - range * 0.05, max + range * 0.05))
}

/// Plot points of a column against elapsed time, skipping missing cells
pub fn series_points(times: &[f64], values: &[Option<f64>]) -> Vec<[f64; 2]> {
    times
        .iter()
        .zip(values)
        .filter_map(|(&t, v)| v.map(|v| [t, v]))
        .collect()
}

/// Index of the line closest to `pointer_x` (screen space) within `tolerance`
pub fn hit_test(line_xs: &[f32], pointer_x: f32, tolerance: f32) -> Option<usize> {
    line_xs
        .iter()
        .enumerate()
        .map(|(i, x)| (i, (x - pointer_x).abs()))
        .filter(|(_, d)| *d <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

pub fn palette_color(palette: &[[u8; 3]], index: usize) -> Color32 {
    match palette.get(index % palette.len().max(1)) {
        Some([r, g, b]) => Color32::from_rgb(*r, *g, *b),
        None => Color32::GRAY,
    }
}

/// What to draw
pub struct ChartView<'a> {
    pub title: &'a str,
    pub unit: TimeUnit,
    pub y_mode: YAxisMode,
    pub signals: &'a [String],
    pub show_speed: bool,
}

/// Chart of the loaded readings with draggable set-point lines
#[derive(Debug, Default)]
pub struct ThermalChart {
    /// Set point under the pointer in the previous frame
    hovered: Option<usize>,
    dragging: Option<usize>,
}

impl ThermalChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the chart. Returns true when a set point was dragged.
    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        table: &ReadingTable,
        view: &ChartView,
        set_points: &mut SetPointSet,
        config: &AppConfig,
    ) -> bool {
        let plot_cfg = &config.plot;
        let data_cfg = &config.data;
        let times = table.elapsed(view.unit);
        let max_time = table.max_elapsed(view.unit);

        let signals: Vec<&String> = view.signals.iter().filter(|s| table.has_column(s)).collect();
        let speed = if view.show_speed { table.values(&data_cfg.speed_column) } else { None };

        let temp_bounds = y_bounds(
            signals
                .iter()
                .filter_map(|s| table.values(s))
                .flat_map(|v| v.iter().flatten().copied()),
            view.y_mode,
            plot_cfg.zero_mode_headroom,
        );
        let speed_bounds = speed.and_then(|v| y_bounds(v.iter().flatten().copied(), view.y_mode, plot_cfg.zero_mode_headroom));
        let y_range = temp_bounds.or(speed_bounds).unwrap_or((0.0, 1.0));
        let speed_map = speed_bounds.map(|b| AxisMapping::new(b, y_range));

        ui.vertical_centered(|ui| {
            ui.heading(view.title);
        });

        let grid_step = match view.unit {
            TimeUnit::Minute => plot_cfg.grid_step_minutes,
            TimeUnit::Second => plot_cfg.grid_step_seconds,
        };

        let mut y_axes = vec![AxisHints::new_y().label(format!("Temperature ({})", data_cfg.temperature_unit))];
        if let Some(map) = speed_map {
            y_axes.push(
                AxisHints::new_y()
                    .label(format!("Speed ({})", data_cfg.speed_unit))
                    .placement(HPlacement::Right)
                    .formatter(move |mark, _range| format!("{:.0}", map.inverse(mark.value))),
            );
        }

        let plot = Plot::new("thermal_chart")
            .height(plot_cfg.chart_height)
            .legend(Legend::default())
            .x_axis_label(format!("Elapsed Time ({})", view.unit.suffix()))
            .x_axis_formatter(|mark, _range| format_tick(mark.value))
            .x_grid_spacer(uniform_grid_spacer(move |_| [grid_step / 4.0, grid_step, grid_step * 5.0]))
            .custom_y_axes(y_axes)
            .set_margin_fraction(egui::Vec2::ZERO)
            .include_x(0.0)
            .include_x(max_time)
            .include_y(y_range.0)
            .include_y(y_range.1)
            .allow_drag(self.hovered.is_none() && self.dragging.is_none());

        let moved = plot
            .show(ui, |plot_ui| {
                for (i, name) in signals.iter().enumerate() {
                    if let Some(values) = table.values(name) {
                        plot_ui.line(
                            Line::new(name.as_str(), PlotPoints::from(series_points(times, values)))
                                .color(palette_color(&plot_cfg.colors.temperature, i))
                                .width(plot_cfg.line_width),
                        );
                    }
                }

                if let (Some(values), Some(map)) = (speed, speed_map) {
                    let points: Vec<[f64; 2]> = series_points(times, values)
                        .into_iter()
                        .map(|[t, v]| [t, map.forward(v)])
                        .collect();
                    plot_ui.line(
                        Line::new(format!("Speed ({})", data_cfg.speed_unit), PlotPoints::from(points))
                            .color(palette_color(std::slice::from_ref(&plot_cfg.colors.speed), 0))
                            .width(plot_cfg.speed_line_width),
                    );
                }

                // set-point interaction
                let response = plot_ui.response().clone();
                let pointer = plot_ui.pointer_coordinate();
                let mut moved = false;

                if response.drag_started() {
                    self.dragging = self.hovered;
                }
                if let (Some(idx), Some(pointer)) = (self.dragging, pointer) {
                    if response.dragged() {
                        set_points.set_position(idx, pointer.x, max_time);
                        moved = true;
                    }
                }
                if response.drag_stopped() {
                    self.dragging = None;
                }

                let line_xs: Vec<f32> = set_points
                    .points()
                    .iter()
                    .map(|p| plot_ui.screen_from_plot(PlotPoint::new(p.position, 0.0)).x)
                    .collect();
                self.hovered = response
                    .hover_pos()
                    .and_then(|pos| hit_test(&line_xs, pos.x, GRAB_TOLERANCE));

                draw_set_points(plot_ui, table, view.unit, &signals, speed.zip(speed_map), set_points, plot_cfg, y_range);

                moved
            })
            .inner;

        if self.hovered.is_some() || self.dragging.is_some() {
            ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
        }

        moved
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_set_points(
    plot_ui: &mut egui_plot::PlotUi,
    table: &ReadingTable,
    unit: TimeUnit,
    signals: &[&String],
    speed: Option<(&[Option<f64>], AxisMapping)>,
    set_points: &SetPointSet,
    config: &PlotConfig,
    y_range: (f64, f64),
) {
    let times = table.elapsed(unit);

    for (i, point) in set_points.points().iter().enumerate() {
        let color = palette_color(&config.colors.set_points, i);
        let label = format!("Set Point {}", point.label);

        plot_ui.vline(
            VLine::new(label.as_str(), point.position)
                .color(color)
                .width(config.set_point_line_width),
        );
        plot_ui.text(
            Text::new(
                label.as_str(),
                PlotPoint::new(point.position, y_range.1),
                format!("{}: {:.1}", point.label, point.position),
            )
            .color(color)
            .anchor(Align2::LEFT_TOP),
        );

        let Some(row) = nearest_index(times, point.position) else {
            continue;
        };
        let x = times[row];

        let mut markers = Vec::new();
        for name in signals {
            if let Some(value) = table.values(name).and_then(|v| v[row]) {
                markers.push(([x, value], format!("{:.1}", value)));
            }
        }
        if let Some((values, map)) = speed {
            if let Some(value) = values[row] {
                markers.push(([x, map.forward(value)], format!("{:.0}", value)));
            }
        }

        for (pos, text) in &markers {
            plot_ui.text(
                Text::new(label.as_str(), PlotPoint::new(pos[0], pos[1]), text.as_str())
                    .color(color)
                    .anchor(Align2::LEFT_BOTTOM),
            );
        }
        plot_ui.points(
            Points::new(label.as_str(), markers.into_iter().map(|(pos, _)| pos).collect::<Vec<_>>())
                .color(color)
                .radius(4.0),
        );
    }
}
