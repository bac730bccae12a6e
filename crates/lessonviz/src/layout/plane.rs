//! The Cartesian frame shared by coordinate planes and function graphs.
//!
//! A [`PlaneFrame`] owns the mapping from a data [`Window`] onto the fixed
//! 600×500 canvas and draws the furniture every plot has: grid, axes with
//! arrow heads, tick labels and axis names. Axes are only drawn where zero
//! lies inside the window; ticks then fall back to the window edge.

use lessonviz_core::{
    draw::{Primitive, RenderLayer, Scene, ShapeStyle, StrokeDefinition, TextAnchor, TextDefinition},
    geometry::{Bounds, Point, Size},
};

use super::common::{self, Coord, LinearScale, Swatch, Window};
use crate::{error::LessonVizError, params::format_number, request::VariantTag};

pub const TITLE_ROLE: &str = "title";
pub const X_TICK_ROLE: &str = "x-tick";
pub const Y_TICK_ROLE: &str = "y-tick";
pub const AXIS_LABEL_ROLE: &str = "axis-label";

pub(crate) const WIDTH: f32 = 600.0;
pub(crate) const HEIGHT: f32 = 500.0;
pub(crate) const PADDING: f32 = 70.0;
const TOP_PADDING: f32 = 60.0;
const TOP_PADDING_WITH_TITLE: f32 = 80.0;
const MAX_GRID_TICKS: usize = 40;

/// Returns the grid step for a data range: 5, 2 or 1 by range, widened to a
/// 1-2-5 step when that would draw more than 40 lines.
pub(crate) fn grid_step(range: f64) -> f64 {
    let base = if range > 20.0 {
        5.0
    } else if range > 10.0 {
        2.0
    } else {
        1.0
    };
    if range / base > MAX_GRID_TICKS as f64 {
        common::nice_step(range, MAX_GRID_TICKS)
    } else {
        base
    }
}

/// Builds the data window of a plot, rejecting empty or non-finite ranges.
pub(crate) fn checked_window(
    variant: VariantTag,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) -> Result<Window, LessonVizError> {
    for (axis, min, max) in [("x", x_min, x_max), ("y", y_min, y_max)] {
        if !(min.is_finite() && max.is_finite()) || max <= min {
            return Err(LessonVizError::malformed(
                variant,
                format!(
                    "{axis}Max ({}) must be greater than {axis}Min ({})",
                    format_number(max),
                    format_number(min)
                ),
            ));
        }
        if !(max - min).is_finite() {
            return Err(LessonVizError::malformed(
                variant,
                format!(
                    "{axis} range from {} to {} is too wide to draw",
                    format_number(min),
                    format_number(max)
                ),
            ));
        }
    }
    Ok(Window::new(x_min, x_max, y_min, y_max))
}

/// Maps a data window onto the plot area and draws its furniture.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlaneFrame {
    window: Window,
    x_scale: LinearScale,
    y_scale: LinearScale,
    top: f32,
}

impl PlaneFrame {
    pub fn new(window: Window, titled: bool) -> Self {
        let top = if titled { TOP_PADDING_WITH_TITLE } else { TOP_PADDING };
        let bottom = HEIGHT - PADDING;
        Self {
            window,
            x_scale: LinearScale::new(window.x_min(), window.x_max(), PADDING, WIDTH - PADDING),
            y_scale: LinearScale::new(window.y_min(), window.y_max(), bottom, top),
            top,
        }
    }

    pub fn window(&self) -> Window {
        self.window
    }

    /// Canvas position of a data coordinate.
    pub fn to_canvas(&self, (x, y): Coord) -> Point {
        Point::new(self.x_scale.map(x), self.y_scale.map(y))
    }

    pub fn x(&self, x: f64) -> f32 {
        self.x_scale.map(x)
    }

    pub fn y(&self, y: f64) -> f32 {
        self.y_scale.map(y)
    }

    /// The plot area on the canvas.
    pub fn chart(&self) -> Bounds {
        Bounds::new_from_top_left(
            Point::new(PADDING, self.top),
            Size::new(WIDTH - 2.0 * PADDING, HEIGHT - PADDING - self.top),
        )
    }

    pub fn scene(&self, variant: &'static str) -> Scene {
        Scene::new(variant, Size::new(WIDTH, HEIGHT))
    }

    fn x_axis_visible(&self) -> bool {
        self.window.y_min() <= 0.0 && self.window.y_max() >= 0.0
    }

    fn y_axis_visible(&self) -> bool {
        self.window.x_min() <= 0.0 && self.window.x_max() >= 0.0
    }

    pub fn draw_title(&self, scene: &mut Scene, title: &str) {
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                Point::new(WIDTH / 2.0, 30.0),
                title,
                TextDefinition::centered(16)
                    .bold()
                    .with_color(Swatch::TextPrimary.color()),
            )
            .with_role(TITLE_ROLE),
        );
    }

    /// Dashed grid lines at every step, skipping zero where the axes run.
    pub fn draw_grid(&self, scene: &mut Scene) {
        let chart = self.chart();
        let stroke = StrokeDefinition::patterned(Swatch::GridLine.color(), 1.0, "2,2");
        let window = self.window;

        for x in common::tick_values(window.x_min(), window.x_max(), grid_step(window.x_max() - window.x_min())) {
            if x == 0.0 {
                continue;
            }
            let svg_x = self.x(x);
            scene.push(
                RenderLayer::Grid,
                Primitive::line(
                    Point::new(svg_x, chart.min_y()),
                    Point::new(svg_x, chart.max_y()),
                    stroke.clone(),
                ),
            );
        }
        for y in common::tick_values(window.y_min(), window.y_max(), grid_step(window.y_max() - window.y_min())) {
            if y == 0.0 {
                continue;
            }
            let svg_y = self.y(y);
            scene.push(
                RenderLayer::Grid,
                Primitive::line(
                    Point::new(chart.min_x(), svg_y),
                    Point::new(chart.max_x(), svg_y),
                    stroke.clone(),
                ),
            );
        }
    }

    /// Axes through the origin, each with an arrow head at its positive end.
    pub fn draw_axes(&self, scene: &mut Scene) {
        let chart = self.chart();
        let color = Swatch::TextPrimary.color();
        let stroke = StrokeDefinition::solid(color, 2.0);

        if self.y_axis_visible() {
            let x = self.x(0.0);
            scene.push(
                RenderLayer::Axis,
                Primitive::line(Point::new(x, chart.min_y()), Point::new(x, chart.max_y()), stroke.clone()),
            );
            scene.push(
                RenderLayer::Axis,
                Primitive::polygon(
                    vec![
                        Point::new(x, chart.min_y() - 10.0),
                        Point::new(x - 4.0, chart.min_y()),
                        Point::new(x + 4.0, chart.min_y()),
                    ],
                    ShapeStyle::filled(color),
                ),
            );
        }
        if self.x_axis_visible() {
            let y = self.y(0.0);
            scene.push(
                RenderLayer::Axis,
                Primitive::line(Point::new(chart.min_x(), y), Point::new(chart.max_x(), y), stroke),
            );
            scene.push(
                RenderLayer::Axis,
                Primitive::polygon(
                    vec![
                        Point::new(chart.max_x() + 10.0, y),
                        Point::new(chart.max_x(), y - 4.0),
                        Point::new(chart.max_x(), y + 4.0),
                    ],
                    ShapeStyle::filled(color),
                ),
            );
        }
    }

    /// Tick marks and labels along both axes, or along the window edges when
    /// an axis is off screen.
    pub fn draw_ticks(&self, scene: &mut Scene) {
        let window = self.window;
        let tick = StrokeDefinition::solid(Swatch::TextPrimary.color(), 1.0);
        let label = TextDefinition::centered(11).with_color(Swatch::TextMuted.color());

        let x_tick_y = self.y(if self.x_axis_visible() { 0.0 } else { window.y_min() });
        for x in common::tick_values(window.x_min(), window.x_max(), grid_step(window.x_max() - window.x_min())) {
            let svg_x = self.x(x);
            scene.push(
                RenderLayer::Axis,
                Primitive::line(
                    Point::new(svg_x, x_tick_y - 5.0),
                    Point::new(svg_x, x_tick_y + 5.0),
                    tick.clone(),
                ),
            );
            scene.push(
                RenderLayer::Text,
                Primitive::text(Point::new(svg_x, x_tick_y + 20.0), format_number(x), label.clone())
                    .with_role(X_TICK_ROLE),
            );
        }

        let y_tick_x = self.x(if self.y_axis_visible() { 0.0 } else { window.x_min() });
        for y in common::tick_values(window.y_min(), window.y_max(), grid_step(window.y_max() - window.y_min())) {
            let svg_y = self.y(y);
            scene.push(
                RenderLayer::Axis,
                Primitive::line(
                    Point::new(y_tick_x - 5.0, svg_y),
                    Point::new(y_tick_x + 5.0, svg_y),
                    tick.clone(),
                ),
            );
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(y_tick_x - 10.0, svg_y + 4.0),
                    format_number(y),
                    label.clone().with_anchor(TextAnchor::End),
                )
                .with_role(Y_TICK_ROLE),
            );
        }
    }

    /// Names the axes: `x` below the right end of the x axis, `y` beside the
    /// top of the y axis.
    pub fn draw_axis_labels(&self, scene: &mut Scene, x_label: &str, y_label: &str) {
        let window = self.window;
        let style = TextDefinition::centered(14)
            .bold()
            .with_color(Swatch::TextPrimary.color());

        let axis_y = self.y(if self.x_axis_visible() { 0.0 } else { window.y_min() });
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                Point::new(WIDTH - PADDING - 10.0, axis_y + 45.0),
                x_label,
                style.clone().with_anchor(TextAnchor::End),
            )
            .with_role(AXIS_LABEL_ROLE),
        );

        let axis_x = self.x(if self.y_axis_visible() { 0.0 } else { window.x_min() });
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                Point::new(axis_x + 15.0, self.top - 5.0),
                y_label,
                style.with_anchor(TextAnchor::Start),
            )
            .with_role(AXIS_LABEL_ROLE),
        );
    }

    /// Draws grid (optional), axes, ticks and axis names in one go.
    pub fn draw_furniture(&self, scene: &mut Scene, show_grid: bool, x_label: &str, y_label: &str) {
        if show_grid {
            self.draw_grid(scene);
        }
        self.draw_axes(scene);
        self.draw_ticks(scene);
        self.draw_axis_labels(scene, x_label, y_label);
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn frame(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> PlaneFrame {
        PlaneFrame::new(Window::new(x_min, x_max, y_min, y_max), false)
    }

    #[test]
    fn test_grid_step_by_range() {
        assert_approx_eq!(f64, grid_step(10.0), 1.0);
        assert_approx_eq!(f64, grid_step(20.0), 2.0);
        assert_approx_eq!(f64, grid_step(30.0), 5.0);
        assert_approx_eq!(f64, grid_step(200.0), 5.0);
        assert_approx_eq!(f64, grid_step(1000.0), 50.0);
    }

    #[test]
    fn test_origin_maps_to_chart_center() {
        let frame = frame(-10.0, 10.0, -10.0, 10.0);
        let origin = frame.to_canvas((0.0, 0.0));
        let chart = frame.chart();
        assert_approx_eq!(f32, origin.x(), chart.center().x());
        assert_approx_eq!(f32, origin.y(), chart.center().y());
    }

    #[test]
    fn test_y_axis_points_up() {
        let frame = frame(0.0, 10.0, 0.0, 10.0);
        assert!(frame.y(10.0) < frame.y(0.0));
        assert_approx_eq!(f32, frame.y(10.0), TOP_PADDING);
        assert_approx_eq!(f32, frame.y(0.0), HEIGHT - PADDING);
    }

    #[test]
    fn test_title_lowers_chart_top() {
        let titled = PlaneFrame::new(Window::new(0.0, 1.0, 0.0, 1.0), true);
        assert_approx_eq!(f32, titled.chart().min_y(), TOP_PADDING_WITH_TITLE);
    }

    #[test]
    fn test_ticks_follow_grid_step() {
        let mut scene = Scene::new("test", Size::new(WIDTH, HEIGHT));
        frame(-10.0, 10.0, 0.0, 5.0).draw_ticks(&mut scene);
        assert_eq!(
            scene.texts_with_role(X_TICK_ROLE),
            vec!["-10", "-8", "-6", "-4", "-2", "0", "2", "4", "6", "8", "10"]
        );
        assert_eq!(scene.texts_with_role(Y_TICK_ROLE), vec!["0", "1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_axes_hidden_when_origin_outside() {
        let mut scene = Scene::new("test", Size::new(WIDTH, HEIGHT));
        frame(2.0, 8.0, 3.0, 9.0).draw_axes(&mut scene);
        assert!(scene.is_empty());

        let mut scene = Scene::new("test", Size::new(WIDTH, HEIGHT));
        frame(-2.0, 8.0, 3.0, 9.0).draw_axes(&mut scene);
        // y axis line and its arrow head only
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_checked_window_rejects_empty_range() {
        let err = checked_window(VariantTag::CartesianPlane, 0.0, 10.0, 5.0, 5.0).unwrap_err();
        assert_eq!(err.variant(), Some(VariantTag::CartesianPlane));
        assert!(err.to_string().contains("yMax"));
        assert!(checked_window(VariantTag::FunctionGraph, 0.0, f64::NAN, 0.0, 1.0).is_err());
        assert!(checked_window(VariantTag::FunctionGraph, -1.0, 1.0, -1.0, 1.0).is_ok());
    }

    #[test]
    fn test_checked_window_rejects_overflowing_range() {
        let err = checked_window(VariantTag::CartesianPlane, -1e308, 1e308, -10.0, 10.0).unwrap_err();
        assert_eq!(err.variant(), Some(VariantTag::CartesianPlane));
        assert!(err.to_string().contains("too wide"));
        assert!(checked_window(VariantTag::CartesianPlane, -1e300, 1e300, -10.0, 10.0).is_ok());
    }
}
