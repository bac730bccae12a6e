//! Number lines with shaded intervals and marked points.

use std::f32::consts::PI;

use log::{debug, warn};
use serde::Deserialize;

use lessonviz_core::{
    color::Color,
    draw::{Primitive, RenderLayer, Scene, ShapeStyle, StrokeDefinition, TextDefinition},
    geometry::{Point, Size},
};

use super::{
    LayoutEngine,
    common::{self, LinearScale, Swatch},
};
use crate::{error::LessonVizError, params::format_number, request::VariantTag};

pub const TITLE_ROLE: &str = "title";
pub const TICK_LABEL_ROLE: &str = "tick-label";
pub const POINT_LABEL_ROLE: &str = "point-label";
pub const INTERVAL_LABEL_ROLE: &str = "interval-label";
pub const CLOSED_ENDPOINT_ROLE: &str = "closed-endpoint";
pub const OPEN_ENDPOINT_ROLE: &str = "open-endpoint";

/// Ticks a single number line may carry.
pub const MAX_TICKS: usize = 200;

const WIDTH: f32 = 600.0;
const LINE_START: f32 = 40.0;
const LINE_END: f32 = 560.0;
const ARROW_OVERHANG: f32 = 20.0;
const TOP_PADDING: f32 = 10.0;
const TITLE_BAND: f32 = 30.0;
const LABEL_BAND: f32 = 40.0;
const TICK_LABEL_BAND: f32 = 28.0;
const INTERVAL_LABEL_BAND: f32 = 22.0;
const BOTTOM_PADDING: f32 = 12.0;
const ENDPOINT_RADIUS: f32 = 6.0;
const TICK: f32 = 6.0;
const INTEGER_TICK: f32 = 9.0;

/// How a point is marked on the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointStyle {
    Open,
    #[default]
    Closed,
    None,
}

fn default_true() -> bool {
    true
}

/// A shaded stretch of the line. A missing end runs out to the arrow.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    #[serde(default)]
    start: Option<f64>,
    #[serde(default)]
    end: Option<f64>,
    #[serde(default = "default_true")]
    start_inclusive: bool,
    #[serde(default = "default_true")]
    end_inclusive: bool,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

impl Interval {
    pub fn new(start: Option<f64>, end: Option<f64>) -> Self {
        Self {
            start,
            end,
            start_inclusive: true,
            end_inclusive: true,
            color: None,
            label: None,
        }
    }

    pub fn with_inclusive(mut self, start: bool, end: bool) -> Self {
        self.start_inclusive = start;
        self.end_inclusive = end;
        self
    }

    /// Returns `(start, start_inclusive, end, end_inclusive)` in increasing
    /// order.
    fn ordered(&self) -> (Option<f64>, bool, Option<f64>, bool) {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => {
                (Some(end), self.end_inclusive, Some(start), self.start_inclusive)
            }
            _ => (self.start, self.start_inclusive, self.end, self.end_inclusive),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinePoint {
    value: f64,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    style: PointStyle,
    #[serde(default)]
    color: Option<String>,
}

impl LinePoint {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            label: None,
            style: PointStyle::default(),
            color: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_style(mut self, style: PointStyle) -> Self {
        self.style = style;
        self
    }
}

/// Parameters of the `numberLine` variant. Every field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberLineParams {
    min: f64,
    max: f64,
    step: f64,
    intervals: Vec<Interval>,
    points: Vec<LinePoint>,
    show_tick_marks: bool,
    show_tick_labels: bool,
    show_arrows: bool,
    highlight_integers: bool,
    title: Option<String>,
    caption: Option<String>,
}

impl Default for NumberLineParams {
    fn default() -> Self {
        Self {
            min: -5.0,
            max: 5.0,
            step: 1.0,
            intervals: Vec::new(),
            points: Vec::new(),
            show_tick_marks: true,
            show_tick_labels: true,
            show_arrows: true,
            highlight_integers: false,
            title: None,
            caption: None,
        }
    }
}

impl NumberLineParams {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step,
            ..Self::default()
        }
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.intervals.push(interval);
        self
    }

    pub fn with_point(mut self, point: LinePoint) -> Self {
        self.points.push(point);
        self
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    fn validate(&self) -> Result<(), LessonVizError> {
        let malformed = |message: String| LessonVizError::malformed(VariantTag::NumberLine, message);
        if !(self.min.is_finite() && self.max.is_finite()) || self.max <= self.min {
            return Err(malformed(format!(
                "max ({}) must be greater than min ({})",
                format_number(self.max),
                format_number(self.min)
            )));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(malformed(format!(
                "step must be positive, got {}",
                format_number(self.step)
            )));
        }
        let ticks = common::tick_count(self.min, self.max, self.step);
        if ticks > MAX_TICKS {
            return Err(malformed(format!(
                "step {} produces {ticks} ticks, more than {MAX_TICKS}",
                format_number(self.step)
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct NumberLineEngine;

impl LayoutEngine for NumberLineEngine {
    type Params = NumberLineParams;

    fn calculate(&self, params: &NumberLineParams) -> Result<Scene, LessonVizError> {
        params.validate()?;

        let scale = LinearScale::new(params.min, params.max, LINE_START, LINE_END);
        let title_band = if params.title.is_some() { TITLE_BAND } else { 0.0 };
        let line_y = TOP_PADDING + title_band + LABEL_BAND;
        let has_interval_labels = params.intervals.iter().any(|i| i.label.is_some());
        let height = line_y
            + TICK_LABEL_BAND
            + if has_interval_labels { INTERVAL_LABEL_BAND } else { 0.0 }
            + BOTTOM_PADDING;
        let mut scene = Scene::new("numberLine", Size::new(WIDTH, height));

        if let Some(title) = &params.title {
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(WIDTH / 2.0, TOP_PADDING + 16.0),
                    title.as_str(),
                    TextDefinition::centered(16)
                        .bold()
                        .with_color(Swatch::TextPrimary.color()),
                )
                .with_role(TITLE_ROLE),
            );
        }

        let (left, right) = if params.show_arrows {
            (LINE_START - ARROW_OVERHANG, LINE_END + ARROW_OVERHANG)
        } else {
            (LINE_START, LINE_END)
        };
        let axis_color = Swatch::TextPrimary.color();
        scene.push(
            RenderLayer::Axis,
            Primitive::line(
                Point::new(left, line_y),
                Point::new(right, line_y),
                StrokeDefinition::solid(axis_color, 2.0),
            ),
        );
        if params.show_arrows {
            draw_arrow_heads(&mut scene, line_y, left, right, axis_color);
        }

        draw_ticks(&mut scene, params, &scale, line_y);
        for interval in &params.intervals {
            draw_interval(&mut scene, params, interval, &scale, line_y, left, right);
        }
        draw_points(&mut scene, params, &scale, line_y);

        debug!(
            ticks = common::tick_count(params.min, params.max, params.step),
            intervals = params.intervals.len(),
            points = params.points.len();
            "Number line laid out"
        );
        Ok(scene)
    }
}

fn draw_arrow_heads(scene: &mut Scene, y: f32, left: f32, right: f32, color: Color) {
    let style = ShapeStyle::filled(color);
    scene.push(
        RenderLayer::Axis,
        Primitive::polygon(
            common::arrow_head(Point::new(left, y), PI, 10.0, 5.0),
            style.clone(),
        ),
    );
    scene.push(
        RenderLayer::Axis,
        Primitive::polygon(common::arrow_head(Point::new(right, y), 0.0, 10.0, 5.0), style),
    );
}

fn draw_ticks(scene: &mut Scene, params: &NumberLineParams, scale: &LinearScale, line_y: f32) {
    let tick_stroke = StrokeDefinition::solid(Swatch::TextPrimary.color(), 1.5);
    for value in common::tick_values(params.min, params.max, params.step) {
        let x = scale.map(value);
        let integer = params.highlight_integers && (value - value.round()).abs() < 1e-9;
        let half = if integer { INTEGER_TICK } else { TICK };
        if params.show_tick_marks {
            scene.push(
                RenderLayer::Axis,
                Primitive::line(Point::new(x, line_y - half), Point::new(x, line_y + half), tick_stroke.clone()),
            );
        }
        if params.show_tick_labels {
            let mut style = TextDefinition::centered(12).with_color(Swatch::TextSecondary.color());
            if integer {
                style = style.bold().with_color(Swatch::TextPrimary.color());
            }
            scene.push(
                RenderLayer::Text,
                Primitive::text(Point::new(x, line_y + 24.0), format_number(value), style)
                    .with_role(TICK_LABEL_ROLE),
            );
        }
    }
}

fn endpoint(center: Point, color: Color, inclusive: bool) -> Primitive {
    if inclusive {
        Primitive::circle(
            center,
            ENDPOINT_RADIUS,
            ShapeStyle::filled(color).with_stroke(StrokeDefinition::solid(color, 2.0)),
        )
        .with_role(CLOSED_ENDPOINT_ROLE)
    } else {
        Primitive::circle(
            center,
            ENDPOINT_RADIUS,
            ShapeStyle::filled(Color::rgb8(0xff, 0xff, 0xff)).with_stroke(StrokeDefinition::solid(color, 2.0)),
        )
        .with_role(OPEN_ENDPOINT_ROLE)
    }
}

fn draw_interval(
    scene: &mut Scene,
    params: &NumberLineParams,
    interval: &Interval,
    scale: &LinearScale,
    line_y: f32,
    left: f32,
    right: f32,
) {
    let color = common::resolve_color(interval.color.as_deref(), Swatch::Blue.color());
    let (start, start_inclusive, end, end_inclusive) = interval.ordered();

    let clamp = |value: f64| scale.map(value.clamp(params.min, params.max));
    let start_x = start.map_or(left, clamp);
    let end_x = end.map_or(right, clamp);

    scene.push(
        RenderLayer::Region,
        Primitive::line(
            Point::new(start_x, line_y),
            Point::new(end_x, line_y),
            StrokeDefinition::solid(color.with_alpha(0.6), 6.0),
        ),
    );
    if start.is_none() {
        draw_interval_arrow(scene, Point::new(left, line_y), PI, color);
    }
    if end.is_none() {
        draw_interval_arrow(scene, Point::new(right, line_y), 0.0, color);
    }

    for (value, inclusive, x) in [(start, start_inclusive, start_x), (end, end_inclusive, end_x)] {
        if let Some(value) = value {
            if !(params.min..=params.max).contains(&value) {
                debug!(value; "Interval end outside the line, clamped");
            }
            scene.push(RenderLayer::Marker, endpoint(Point::new(x, line_y), color, inclusive));
        }
    }

    if let Some(label) = &interval.label {
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                Point::new((start_x + end_x) / 2.0, line_y + TICK_LABEL_BAND + 14.0),
                label.as_str(),
                TextDefinition::centered(12).bold().with_color(color),
            )
            .with_role(INTERVAL_LABEL_ROLE),
        );
    }
}

fn draw_interval_arrow(scene: &mut Scene, tip: Point, angle: f32, color: Color) {
    scene.push(
        RenderLayer::Region,
        Primitive::polygon(common::arrow_head(tip, angle, 12.0, 6.0), ShapeStyle::filled(color)),
    );
}

fn draw_points(scene: &mut Scene, params: &NumberLineParams, scale: &LinearScale, line_y: f32) {
    for point in &params.points {
        if !point.value.is_finite() || !scale.contains(point.value) {
            warn!(value = point.value; "Point outside the number line, skipped");
            continue;
        }
        let color = common::resolve_color(point.color.as_deref(), Swatch::Red.color());
        let center = Point::new(scale.map(point.value), line_y);
        match point.style {
            PointStyle::Closed => scene.push(RenderLayer::Marker, endpoint(center, color, true)),
            PointStyle::Open => scene.push(RenderLayer::Marker, endpoint(center, color, false)),
            PointStyle::None => {}
        }
        if let Some(label) = &point.label {
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(center.x(), line_y - 16.0),
                    label.as_str(),
                    TextDefinition::centered(12).bold().with_color(color),
                )
                .with_role(POINT_LABEL_ROLE),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let params: NumberLineParams = serde_json::from_value(json!({})).unwrap();
        let scene = NumberLineEngine.calculate(&params).unwrap();
        assert_eq!(
            scene.texts_with_role(TICK_LABEL_ROLE),
            vec!["-5", "-4", "-3", "-2", "-1", "0", "1", "2", "3", "4", "5"]
        );
    }

    #[test]
    fn test_decimal_step_labels() {
        let params = NumberLineParams::new(0.0, 1.0, 0.1);
        let scene = NumberLineEngine.calculate(&params).unwrap();
        let labels = scene.texts_with_role(TICK_LABEL_ROLE);
        assert_eq!(labels.len(), 11);
        assert_eq!(labels[3], "0.3");
        assert_eq!(labels[10], "1");
    }

    #[test]
    fn test_rejects_empty_range() {
        let err = NumberLineEngine
            .calculate(&NumberLineParams::new(5.0, 5.0, 1.0))
            .unwrap_err();
        assert_eq!(err.variant(), Some(VariantTag::NumberLine));
        assert!(NumberLineEngine.calculate(&NumberLineParams::new(3.0, -3.0, 1.0)).is_err());
    }

    #[test]
    fn test_rejects_bad_step_and_tick_flood() {
        assert!(NumberLineEngine.calculate(&NumberLineParams::new(0.0, 10.0, 0.0)).is_err());
        assert!(NumberLineEngine.calculate(&NumberLineParams::new(0.0, 10.0, -1.0)).is_err());
        assert!(NumberLineEngine.calculate(&NumberLineParams::new(0.0, 1000.0, 1.0)).is_err());
        assert!(NumberLineEngine.calculate(&NumberLineParams::new(0.0, 199.0, 1.0)).is_ok());
    }

    #[test]
    fn test_open_and_closed_endpoints() {
        let params = NumberLineParams::new(0.0, 10.0, 1.0)
            .with_interval(Interval::new(Some(2.0), Some(7.0)).with_inclusive(true, false));
        let scene = NumberLineEngine.calculate(&params).unwrap();
        assert_eq!(scene.primitives_with_role(CLOSED_ENDPOINT_ROLE).count(), 1);
        assert_eq!(scene.primitives_with_role(OPEN_ENDPOINT_ROLE).count(), 1);
    }

    #[test]
    fn test_unbounded_interval_reaches_arrow() {
        let params: NumberLineParams = serde_json::from_value(json!({
            "min": 0, "max": 10,
            "intervals": [{"start": null, "end": 7, "startInclusive": false, "endInclusive": false}]
        }))
        .unwrap();
        let scene = NumberLineEngine.calculate(&params).unwrap();
        assert_eq!(scene.primitives_with_role(OPEN_ENDPOINT_ROLE).count(), 1);

        let shaded = scene
            .items()
            .iter()
            .find_map(|(layer, primitive)| match primitive.kind() {
                lessonviz_core::draw::PrimitiveKind::Line { from, .. } if *layer == RenderLayer::Region => {
                    Some(*from)
                }
                _ => None,
            })
            .unwrap();
        assert_approx_eq!(f32, shaded.x(), LINE_START - ARROW_OVERHANG);
    }

    #[test]
    fn test_reversed_interval_is_ordered() {
        let interval = Interval::new(Some(7.0), Some(2.0)).with_inclusive(false, true);
        assert_eq!(interval.ordered(), (Some(2.0), true, Some(7.0), false));
    }

    #[test]
    fn test_point_styles() {
        let params = NumberLineParams::default()
            .with_point(LinePoint::new(1.0).with_label("A"))
            .with_point(LinePoint::new(2.0).with_style(PointStyle::Open))
            .with_point(LinePoint::new(3.0).with_style(PointStyle::None).with_label("C"))
            .with_point(LinePoint::new(40.0).with_label("far"));
        let scene = NumberLineEngine.calculate(&params).unwrap();
        assert_eq!(scene.texts_with_role(POINT_LABEL_ROLE), vec!["A", "C"]);
        assert_eq!(scene.primitives_with_role(CLOSED_ENDPOINT_ROLE).count(), 1);
        assert_eq!(scene.primitives_with_role(OPEN_ENDPOINT_ROLE).count(), 1);
    }

    #[test]
    fn test_point_style_decoding() {
        let point: LinePoint = serde_json::from_value(json!({"value": 1, "style": "none"})).unwrap();
        assert_eq!(point.style, PointStyle::None);
        let point: LinePoint = serde_json::from_value(json!({"value": 1})).unwrap();
        assert_eq!(point.style, PointStyle::Closed);
    }

    #[test]
    fn test_tick_positions_span_line() {
        let scene = NumberLineEngine.calculate(&NumberLineParams::default()).unwrap();
        let positions: Vec<f32> = scene
            .primitives_with_role(TICK_LABEL_ROLE)
            .filter_map(|p| p.text_position())
            .map(|p| p.x())
            .collect();
        assert_approx_eq!(f32, positions[0], LINE_START);
        assert_approx_eq!(f32, positions[positions.len() - 1], LINE_END);
    }
}
