//! Plots of an expression in `x` over a fixed window.
//!
//! The curve is sampled evenly across the x range. Samples that are not
//! finite or that leave the y window break the curve, so asymptotes such as
//! `1/x` draw as separate branches instead of a spike across the plot.

use log::{debug, warn};
use serde::Deserialize;

use lessonviz_core::{
    color::Color,
    draw::{Primitive, RenderLayer, Scene, ShapeStyle, StrokeDefinition, TextAnchor, TextDefinition},
    geometry::Point,
};

use super::{
    LayoutEngine,
    common::{self, Swatch, Window},
    plane::{self, PlaneFrame},
};
use crate::{
    error::LessonVizError,
    expr::Expression,
    params::format_number,
    request::VariantTag,
};

pub const CURVE_ROLE: &str = "curve";
pub const FUNCTION_LABEL_ROLE: &str = "function-label";
pub const POINT_ROLE: &str = "point";
pub const POINT_LABEL_ROLE: &str = "point-label";

/// Samples taken across the x range.
pub const SAMPLES: usize = 241;

const AUTO_PADDING: f64 = 0.1;

/// Unit of the x axis. Degrees are converted to radians before evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisMode {
    #[default]
    Radians,
    Degrees,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkedPoint {
    x: f64,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

impl MarkedPoint {
    pub fn new(x: f64) -> Self {
        Self {
            x,
            label: None,
            color: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

fn default_x_min() -> f64 {
    -5.0
}

fn default_x_max() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

/// Parameters of the `functionGraph` variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionGraphParams {
    expression: String,
    #[serde(default = "default_x_min")]
    x_min: f64,
    #[serde(default = "default_x_max")]
    x_max: f64,
    #[serde(default)]
    y_min: Option<f64>,
    #[serde(default)]
    y_max: Option<f64>,
    #[serde(default = "default_true")]
    show_grid: bool,
    #[serde(default)]
    show_points: Vec<MarkedPoint>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    x_axis_mode: AxisMode,
    #[serde(default)]
    caption: Option<String>,
}

impl FunctionGraphParams {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            x_min: default_x_min(),
            x_max: default_x_max(),
            y_min: None,
            y_max: None,
            show_grid: true,
            show_points: Vec::new(),
            color: None,
            label: None,
            x_axis_mode: AxisMode::default(),
            caption: None,
        }
    }

    pub fn with_x_range(mut self, x_min: f64, x_max: f64) -> Self {
        self.x_min = x_min;
        self.x_max = x_max;
        self
    }

    pub fn with_y_range(mut self, y_min: f64, y_max: f64) -> Self {
        self.y_min = Some(y_min);
        self.y_max = Some(y_max);
        self
    }

    pub fn with_axis_mode(mut self, mode: AxisMode) -> Self {
        self.x_axis_mode = mode;
        self
    }

    pub fn with_point(mut self, point: MarkedPoint) -> Self {
        self.show_points.push(point);
        self
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Evaluates the expression at an axis value, converting degrees first.
    fn eval(&self, expression: &Expression, x: f64) -> f64 {
        match self.x_axis_mode {
            AxisMode::Radians => expression.eval(x),
            AxisMode::Degrees => expression.eval(x.to_radians()),
        }
    }
}

/// Evenly spaced x values from `min` to `max`, both ends included.
fn sample_xs(min: f64, max: f64) -> impl Iterator<Item = f64> {
    let step = (max - min) / (SAMPLES - 1) as f64;
    (0..SAMPLES).map(move |i| if i == SAMPLES - 1 { max } else { min + step * i as f64 })
}

/// The y range covering every finite sample, padded by a tenth of its span.
/// A flat or empty curve gets one unit either side.
fn auto_y_range(samples: &[(f64, f64)]) -> (f64, f64) {
    let finite = samples.iter().map(|&(_, y)| y).filter(|y| y.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
        (lo.min(y), hi.max(y))
    });
    if !min.is_finite() {
        return (-1.0, 1.0);
    }
    let span = max - min;
    if span <= f64::EPSILON * max.abs().max(1.0) {
        return (min - 1.0, max + 1.0);
    }
    (min - span * AUTO_PADDING, max + span * AUTO_PADDING)
}

/// Splits samples into runs that stay finite and inside the window.
fn curve_runs(samples: &[(f64, f64)], window: &Window) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for &(x, y) in samples {
        if y.is_finite() && window.contains((x, y)) {
            current.push((x, y));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs.retain(|run| run.len() > 1);
    runs
}

#[derive(Debug, Default)]
pub(crate) struct FunctionGraphEngine;

impl LayoutEngine for FunctionGraphEngine {
    type Params = FunctionGraphParams;

    fn calculate(&self, params: &FunctionGraphParams) -> Result<Scene, LessonVizError> {
        let expression = Expression::parse(&params.expression)
            .map_err(|err| LessonVizError::malformed(VariantTag::FunctionGraph, err.to_string()))?;

        if !(params.x_max - params.x_min).is_finite() || params.x_max <= params.x_min {
            return Err(LessonVizError::malformed(
                VariantTag::FunctionGraph,
                format!(
                    "xMax ({}) must be greater than xMin ({})",
                    format_number(params.x_max),
                    format_number(params.x_min)
                ),
            ));
        }

        let samples: Vec<(f64, f64)> = sample_xs(params.x_min, params.x_max)
            .map(|x| (x, params.eval(&expression, x)))
            .collect();
        let (auto_min, auto_max) = auto_y_range(&samples);
        let window = plane::checked_window(
            VariantTag::FunctionGraph,
            params.x_min,
            params.x_max,
            params.y_min.unwrap_or(auto_min),
            params.y_max.unwrap_or(auto_max),
        )?;

        let frame = PlaneFrame::new(window, false);
        let mut scene = frame.scene("functionGraph");
        frame.draw_furniture(&mut scene, params.show_grid, "x", "y");

        let color = common::resolve_color(params.color.as_deref(), Swatch::Blue.color());
        let runs = curve_runs(&samples, &window);
        debug!(
            expression = params.expression.as_str(),
            runs = runs.len();
            "Function sampled"
        );
        for run in runs {
            let points = run.into_iter().map(|coord| frame.to_canvas(coord)).collect();
            scene.push(
                RenderLayer::Content,
                Primitive::polyline(
                    points,
                    ShapeStyle::stroked(StrokeDefinition::solid(color, 2.5).with_round_cap()),
                )
                .with_role(CURVE_ROLE),
            );
        }

        if let Some(label) = &params.label {
            let chart = frame.chart();
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(chart.max_x() - 10.0, chart.min_y() + 20.0),
                    label.as_str(),
                    TextDefinition::centered(14)
                        .bold()
                        .with_color(color)
                        .with_anchor(TextAnchor::End),
                )
                .with_role(FUNCTION_LABEL_ROLE),
            );
        }

        for point in &params.show_points {
            draw_marked_point(&mut scene, &frame, params, &expression, point);
        }

        Ok(scene)
    }
}

fn draw_marked_point(
    scene: &mut Scene,
    frame: &PlaneFrame,
    params: &FunctionGraphParams,
    expression: &Expression,
    point: &MarkedPoint,
) {
    let y = params.eval(expression, point.x);
    if !y.is_finite() || !frame.window().contains((point.x, y)) {
        warn!(x = point.x, y = y; "Marked point is undefined or outside the window, skipped");
        return;
    }

    let color = common::resolve_color(point.color.as_deref(), Color::rgb8(0xef, 0x44, 0x44));
    let center = frame.to_canvas((point.x, y));
    scene.push(
        RenderLayer::Marker,
        Primitive::circle(
            center,
            5.0,
            ShapeStyle::filled(color).with_stroke(StrokeDefinition::solid(Color::rgb8(0xff, 0xff, 0xff), 1.5)),
        )
        .with_role(POINT_ROLE),
    );

    let label = point.label.clone().unwrap_or_else(|| {
        format!("({}, {})", format_number(point.x), format_number((y * 100.0).round() / 100.0))
    });
    scene.push(
        RenderLayer::Text,
        Primitive::text(
            center.add_point(Point::new(8.0, -10.0)),
            label,
            TextDefinition::centered(12)
                .bold()
                .with_color(color)
                .with_anchor(TextAnchor::Start),
        )
        .with_role(POINT_LABEL_ROLE),
    );
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_defaults() {
        let params: FunctionGraphParams = serde_json::from_value(json!({"expression": "x^2"})).unwrap();
        assert_approx_eq!(f64, params.x_min, -5.0);
        assert_approx_eq!(f64, params.x_max, 5.0);
        assert!(params.show_grid);
        assert_eq!(params.x_axis_mode, AxisMode::Radians);
    }

    #[test]
    fn test_sample_xs_cover_range() {
        let xs: Vec<f64> = sample_xs(-3.0, 3.0).collect();
        assert_eq!(xs.len(), SAMPLES);
        assert_approx_eq!(f64, xs[0], -3.0);
        assert_approx_eq!(f64, xs[SAMPLES / 2], 0.0, epsilon = 1e-12);
        assert_approx_eq!(f64, xs[SAMPLES - 1], 3.0);
    }

    #[test]
    fn test_auto_y_range_pads() {
        let (min, max) = auto_y_range(&[(0.0, 0.0), (1.0, 10.0), (2.0, f64::NAN)]);
        assert_approx_eq!(f64, min, -1.0);
        assert_approx_eq!(f64, max, 11.0);
    }

    #[test]
    fn test_auto_y_range_flat_curve() {
        let (min, max) = auto_y_range(&[(0.0, 3.0), (1.0, 3.0)]);
        assert_approx_eq!(f64, min, 2.0);
        assert_approx_eq!(f64, max, 4.0);
        assert_eq!(auto_y_range(&[(0.0, f64::NAN)]), (-1.0, 1.0));
    }

    #[test]
    fn test_parabola_is_one_run() {
        let scene = FunctionGraphEngine
            .calculate(&FunctionGraphParams::new("x^2").with_x_range(-3.0, 3.0))
            .unwrap();
        assert_eq!(scene.variant(), "functionGraph");
        assert_eq!(scene.primitives_with_role(CURVE_ROLE).count(), 1);
    }

    #[test]
    fn test_reciprocal_splits_at_asymptote() {
        let params = FunctionGraphParams::new("1/x")
            .with_x_range(-4.0, 4.0)
            .with_y_range(-5.0, 5.0);
        let scene = FunctionGraphEngine.calculate(&params).unwrap();
        assert_eq!(scene.primitives_with_role(CURVE_ROLE).count(), 2);
    }

    #[test]
    fn test_degree_mode_converts_before_evaluation() {
        let params = FunctionGraphParams::new("sin(x)")
            .with_x_range(0.0, 360.0)
            .with_axis_mode(AxisMode::Degrees)
            .with_point(MarkedPoint::new(90.0));
        assert_approx_eq!(f64, params.eval(&Expression::parse("sin(x)").unwrap(), 90.0), 1.0);

        let scene = FunctionGraphEngine.calculate(&params).unwrap();
        assert_eq!(scene.texts_with_role(POINT_LABEL_ROLE), vec!["(90, 1)"]);
    }

    #[test]
    fn test_marked_point_keeps_given_label() {
        let params = FunctionGraphParams::new("x^2")
            .with_x_range(-3.0, 3.0)
            .with_point(MarkedPoint::new(2.0).with_label("(2,4)"))
            .with_point(MarkedPoint::new(10.0));
        let scene = FunctionGraphEngine.calculate(&params).unwrap();
        assert_eq!(scene.texts_with_role(POINT_LABEL_ROLE), vec!["(2,4)"]);
    }

    #[test]
    fn test_parse_error_is_malformed() {
        let err = FunctionGraphEngine
            .calculate(&FunctionGraphParams::new("2 * (x + 1"))
            .unwrap_err();
        assert_eq!(err.variant(), Some(VariantTag::FunctionGraph));
        assert!(err.to_string().contains("2 * (x + 1"));
    }

    #[test]
    fn test_deeply_nested_expression_is_malformed() {
        let expression = format!("{}x{}", "(".repeat(3000), ")".repeat(3000));
        let err = FunctionGraphEngine
            .calculate(&FunctionGraphParams::new(expression))
            .unwrap_err();
        assert_eq!(err.variant(), Some(VariantTag::FunctionGraph));

        let expression = format!("{}x{}", "sin(".repeat(100), ")".repeat(100));
        let err = FunctionGraphEngine
            .calculate(&FunctionGraphParams::new(expression))
            .unwrap_err();
        assert!(err.to_string().contains("nested too deeply"));
    }

    #[test]
    fn test_empty_x_range_is_malformed() {
        let err = FunctionGraphEngine
            .calculate(&FunctionGraphParams::new("x").with_x_range(2.0, 2.0))
            .unwrap_err();
        assert!(err.to_string().contains("xMax"));

        let err = FunctionGraphEngine
            .calculate(&FunctionGraphParams::new("1").with_x_range(-1e308, 1e308))
            .unwrap_err();
        assert_eq!(err.variant(), Some(VariantTag::FunctionGraph));
    }

    #[test]
    fn test_huge_y_values_are_malformed() {
        let params = FunctionGraphParams::new("10^300 * x").with_x_range(-1e10, 1e10);
        assert!(FunctionGraphEngine.calculate(&params).is_err());
    }
}
