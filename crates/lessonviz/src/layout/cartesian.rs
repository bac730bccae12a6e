//! Coordinate planes with points, lines, curves and a highlighted region.
//!
//! Lines are given by kind (`linear`, `vertical`, `horizontal`) and are
//! clipped to the visible window before drawing. Curves are pre-sampled
//! point lists. Labels are placed next to what they name and kept inside
//! the plot area.

use log::{debug, warn};
use serde::Deserialize;

use lessonviz_core::{
    color::Color,
    draw::{Primitive, RenderLayer, Scene, ShapeStyle, StrokeDefinition, TextAnchor, TextDefinition},
    geometry::{Bounds, Point},
};

use super::{
    LayoutEngine,
    common::{self, Coord, Swatch},
    plane::{self, PlaneFrame},
};
use crate::{error::LessonVizError, request::VariantTag};

pub const POINT_ROLE: &str = "point";
pub const POINT_LABEL_ROLE: &str = "point-label";
pub const LINE_LABEL_ROLE: &str = "line-label";
pub const CURVE_LABEL_ROLE: &str = "curve-label";
pub const REGION_LABEL_ROLE: &str = "region-label";

const POINT_RADIUS: f32 = 5.0;
const LABEL_WIDTH: f32 = 100.0;
const LABEL_HEIGHT: f32 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    Open,
    #[default]
    Closed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

impl LineStyle {
    fn stroke(self, color: Color) -> StrokeDefinition {
        match self {
            Self::Solid => StrokeDefinition::solid(color, 2.0),
            Self::Dashed => StrokeDefinition::dashed(color, 2.0),
        }
    }
}

/// Where a point label sits relative to its point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelPosition {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

impl LabelPosition {
    /// Offset from the point and the text anchor to use.
    fn placement(self) -> (f32, f32, TextAnchor) {
        match self {
            Self::Top => (0.0, -15.0, TextAnchor::Middle),
            Self::Bottom => (0.0, 20.0, TextAnchor::Middle),
            Self::Left => (-10.0, 4.0, TextAnchor::End),
            Self::Right => (10.0, 4.0, TextAnchor::Start),
            Self::TopLeft => (-10.0, -10.0, TextAnchor::End),
            Self::TopRight => (10.0, -10.0, TextAnchor::Start),
            Self::BottomLeft => (-10.0, 15.0, TextAnchor::End),
            Self::BottomRight => (10.0, 15.0, TextAnchor::Start),
        }
    }
}

/// Where along a line or curve its label goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlongPosition {
    Start,
    Middle,
    End,
    #[default]
    Auto,
}

/// Manual nudge applied after automatic label placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelOffset {
    dx: f32,
    dy: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotPoint {
    x: f64,
    y: f64,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    style: MarkerStyle,
    #[serde(default)]
    label_position: LabelPosition,
}

impl PlotPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            label: None,
            color: None,
            style: MarkerStyle::default(),
            label_position: LabelPosition::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Linear,
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotLine {
    #[serde(rename = "type")]
    kind: LineKind,
    #[serde(default)]
    slope: Option<f64>,
    #[serde(default)]
    y_intercept: Option<f64>,
    #[serde(default)]
    x_value: Option<f64>,
    #[serde(default)]
    y_value: Option<f64>,
    #[serde(default, alias = "label")]
    equation: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    style: LineStyle,
    #[serde(default)]
    label_position: AlongPosition,
    #[serde(default)]
    label_offset: LabelOffset,
}

impl PlotLine {
    fn new(kind: LineKind) -> Self {
        Self {
            kind,
            slope: None,
            y_intercept: None,
            x_value: None,
            y_value: None,
            equation: None,
            color: None,
            style: LineStyle::default(),
            label_position: AlongPosition::default(),
            label_offset: LabelOffset::default(),
        }
    }

    /// `y = slope·x + intercept`.
    pub fn linear(slope: f64, intercept: f64) -> Self {
        Self {
            slope: Some(slope),
            y_intercept: Some(intercept),
            ..Self::new(LineKind::Linear)
        }
    }

    /// `x = value`.
    pub fn vertical(value: f64) -> Self {
        Self {
            x_value: Some(value),
            ..Self::new(LineKind::Vertical)
        }
    }

    /// `y = value`.
    pub fn horizontal(value: f64) -> Self {
        Self {
            y_value: Some(value),
            ..Self::new(LineKind::Horizontal)
        }
    }

    pub fn with_equation(mut self, equation: impl Into<String>) -> Self {
        self.equation = Some(equation.into());
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurvePoint {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotCurve {
    points: Vec<CurvePoint>,
    #[serde(default, alias = "label")]
    equation: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    style: LineStyle,
    #[serde(default)]
    label_position: AlongPosition,
    #[serde(default)]
    label_offset: LabelOffset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    Vertical,
    Horizontal,
    Rectangle,
}

/// A shaded band or rectangle, e.g. a domain or range.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRegion {
    #[serde(rename = "type")]
    kind: RegionKind,
    #[serde(default)]
    x_min: Option<f64>,
    #[serde(default)]
    x_max: Option<f64>,
    #[serde(default)]
    y_min: Option<f64>,
    #[serde(default)]
    y_max: Option<f64>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

/// Parameters of the `cartesianPlane` variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CartesianParams {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    show_grid: bool,
    points: Vec<PlotPoint>,
    lines: Vec<PlotLine>,
    curves: Vec<PlotCurve>,
    highlight_region: Option<HighlightRegion>,
    title: Option<String>,
    x_label: String,
    y_label: String,
    caption: Option<String>,
}

impl Default for CartesianParams {
    fn default() -> Self {
        Self {
            x_min: -10.0,
            x_max: 10.0,
            y_min: -10.0,
            y_max: 10.0,
            show_grid: true,
            points: Vec::new(),
            lines: Vec::new(),
            curves: Vec::new(),
            highlight_region: None,
            title: None,
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            caption: None,
        }
    }
}

impl CartesianParams {
    pub fn with_range(mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        self.x_min = x_min;
        self.x_max = x_max;
        self.y_min = y_min;
        self.y_max = y_max;
        self
    }

    pub fn with_point(mut self, point: PlotPoint) -> Self {
        self.points.push(point);
        self
    }

    pub fn with_line(mut self, line: PlotLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }
}

#[derive(Debug, Default)]
pub(crate) struct CartesianEngine;

impl LayoutEngine for CartesianEngine {
    type Params = CartesianParams;

    fn calculate(&self, params: &CartesianParams) -> Result<Scene, LessonVizError> {
        let window = plane::checked_window(
            VariantTag::CartesianPlane,
            params.x_min,
            params.x_max,
            params.y_min,
            params.y_max,
        )?;
        let frame = PlaneFrame::new(window, params.title.is_some());
        let mut scene = frame.scene("cartesianPlane");

        if let Some(title) = &params.title {
            frame.draw_title(&mut scene, title);
        }
        if let Some(region) = &params.highlight_region {
            draw_region(&mut scene, &frame, region);
        }
        frame.draw_furniture(&mut scene, params.show_grid, &params.x_label, &params.y_label);

        for line in &params.lines {
            draw_line(&mut scene, &frame, line);
        }
        for curve in &params.curves {
            draw_curve(&mut scene, &frame, curve);
        }
        for point in &params.points {
            draw_point(&mut scene, &frame, point);
        }

        debug!(
            points = params.points.len(),
            lines = params.lines.len(),
            curves = params.curves.len();
            "Cartesian plane laid out"
        );
        Ok(scene)
    }
}

fn draw_region(scene: &mut Scene, frame: &PlaneFrame, region: &HighlightRegion) {
    let window = frame.window();
    let chart = frame.chart();
    let color = common::resolve_color(region.color.as_deref(), Color::rgb8(0xfb, 0xbf, 0x24));

    let x1 = frame.x(region.x_min.unwrap_or(window.x_min()));
    let x2 = frame.x(region.x_max.unwrap_or(window.x_max()));
    let y1 = frame.y(region.y_max.unwrap_or(window.y_max()));
    let y2 = frame.y(region.y_min.unwrap_or(window.y_min()));

    let (bounds, label_at, anchor) = match region.kind {
        RegionKind::Vertical => (
            Bounds::from_corners(Point::new(x1, chart.min_y()), Point::new(x2, chart.max_y())),
            Point::new((x1 + x2) / 2.0, chart.min_y() + 20.0),
            TextAnchor::Middle,
        ),
        RegionKind::Horizontal => (
            Bounds::from_corners(Point::new(chart.min_x(), y1), Point::new(chart.max_x(), y2)),
            Point::new(chart.min_x() + 20.0, (y1 + y2) / 2.0),
            TextAnchor::Start,
        ),
        RegionKind::Rectangle => (
            Bounds::from_corners(Point::new(x1, y1), Point::new(x2, y2)),
            Point::new(x1, y1).midpoint(Point::new(x2, y2)),
            TextAnchor::Middle,
        ),
    };

    scene.push(
        RenderLayer::Region,
        Primitive::rect(bounds, ShapeStyle::filled(color.with_alpha(0.2))),
    );
    if let Some(label) = &region.label {
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                label_at,
                label.as_str(),
                TextDefinition::centered(12)
                    .bold()
                    .with_color(color)
                    .with_anchor(anchor),
            )
            .with_role(REGION_LABEL_ROLE),
        );
    }
}

/// Resolves a line into its data-space endpoints, or `None` when the value
/// its kind needs is missing.
fn line_endpoints(line: &PlotLine, frame: &PlaneFrame) -> Option<(Coord, Coord)> {
    let window = frame.window();
    match line.kind {
        LineKind::Linear => {
            let (slope, intercept) = (line.slope?, line.y_intercept?);
            let at = |x: f64| (x, slope * x + intercept);
            Some((at(window.x_min()), at(window.x_max())))
        }
        LineKind::Vertical => {
            let x = line.x_value?;
            Some(((x, window.y_min()), (x, window.y_max())))
        }
        LineKind::Horizontal => {
            let y = line.y_value?;
            Some(((window.x_min(), y), (window.x_max(), y)))
        }
    }
}

fn draw_line(scene: &mut Scene, frame: &PlaneFrame, line: &PlotLine) {
    let Some((from, to)) = line_endpoints(line, frame) else {
        warn!(kind:? = line.kind; "Line is missing the value its type needs, skipped");
        return;
    };
    let Some((from, to)) = frame.window().clip_segment(from, to) else {
        debug!(kind:? = line.kind; "Line lies outside the window");
        return;
    };

    let color = common::resolve_color(line.color.as_deref(), Swatch::Emerald.color());
    scene.push(
        RenderLayer::Content,
        Primitive::line(frame.to_canvas(from), frame.to_canvas(to), line.style.stroke(color)),
    );

    let Some(equation) = &line.equation else {
        return;
    };
    let (position, anchor) = line_label_position(frame, line, from, to);
    let position = position.add_point(Point::new(line.label_offset.dx, line.label_offset.dy));
    scene.push(
        RenderLayer::Text,
        Primitive::text(position, equation.as_str(), label_style(color).with_anchor(anchor))
            .with_role(LINE_LABEL_ROLE),
    );
}

fn label_style(color: Color) -> TextDefinition {
    TextDefinition::centered(11).bold().with_color(color)
}

/// Places a line label beside the visible part of the line.
///
/// Linear lines are labelled part way along, nudged off the line according
/// to slope, then clamped into the plot area. Vertical and horizontal lines
/// are labelled at the middle of the chart unless a position is given.
fn line_label_position(frame: &PlaneFrame, line: &PlotLine, from: Coord, to: Coord) -> (Point, TextAnchor) {
    let chart = frame.chart();
    match line.kind {
        LineKind::Vertical => {
            let y = match line.label_position {
                AlongPosition::Start => chart.min_y() + 30.0,
                AlongPosition::End => chart.max_y() - 20.0,
                _ => chart.center().y(),
            };
            (Point::new(frame.x(from.0) + 5.0, y), TextAnchor::Start)
        }
        LineKind::Horizontal => {
            let x = match line.label_position {
                AlongPosition::Start => chart.min_x() + 10.0,
                AlongPosition::End => chart.max_x() - LABEL_WIDTH,
                _ => chart.center().x(),
            };
            (Point::new(x, frame.y(from.1) - 5.0), TextAnchor::Start)
        }
        LineKind::Linear => {
            let slope = line.slope.unwrap_or(0.0);
            let t = match line.label_position {
                AlongPosition::Start => 0.2,
                AlongPosition::Middle => 0.5,
                AlongPosition::End => 0.8,
                AlongPosition::Auto if slope > 0.0 => 0.4,
                AlongPosition::Auto if slope < 0.0 => 0.6,
                AlongPosition::Auto => 0.5,
            };
            let on_line = frame.to_canvas((from.0 + t * (to.0 - from.0), from.1 + t * (to.1 - from.1)));

            let (dx, dy, mut anchor) = if slope.abs() < 0.1 {
                (0.0, -15.0, TextAnchor::Middle)
            } else if slope.abs() > 10.0 {
                (10.0, 0.0, TextAnchor::Start)
            } else if slope > 0.0 {
                (-5.0, -10.0, TextAnchor::End)
            } else {
                (5.0, -10.0, TextAnchor::Start)
            };

            let max_x = chart.max_x() - LABEL_WIDTH;
            let mut x = (on_line.x() + dx).max(chart.min_x() + 5.0);
            if x > max_x {
                x = max_x;
                anchor = TextAnchor::End;
            }
            let y = (on_line.y() + dy).clamp(chart.min_y() + LABEL_HEIGHT, chart.max_y() - 5.0);
            (Point::new(x, y), anchor)
        }
    }
}

fn draw_curve(scene: &mut Scene, frame: &PlaneFrame, curve: &PlotCurve) {
    if curve.points.len() < 2 {
        debug!(points = curve.points.len(); "Curve needs at least two points");
        return;
    }
    let color = common::resolve_color(curve.color.as_deref(), Swatch::Emerald.color());
    let points: Vec<Point> = curve
        .points
        .iter()
        .map(|point| frame.to_canvas((point.x, point.y)))
        .collect();

    let index = match curve.label_position {
        AlongPosition::Start => 2.min(points.len() - 1),
        AlongPosition::End => points.len().saturating_sub(3),
        AlongPosition::Middle | AlongPosition::Auto => points.len() / 2,
    };
    let anchor_point = points[index];

    scene.push(
        RenderLayer::Content,
        Primitive::polyline(points, ShapeStyle::stroked(curve.style.stroke(color))),
    );

    if let Some(equation) = &curve.equation {
        let chart = frame.chart();
        let x = anchor_point.x().clamp(chart.min_x() + 10.0, chart.max_x() - LABEL_WIDTH);
        let y = (anchor_point.y() - 15.0).clamp(chart.min_y() + 20.0, chart.max_y() - 10.0);
        let position = Point::new(x + curve.label_offset.dx, y + curve.label_offset.dy);
        scene.push(
            RenderLayer::Text,
            Primitive::text(position, equation.as_str(), label_style(color).with_anchor(TextAnchor::Start))
                .with_role(CURVE_LABEL_ROLE),
        );
    }
}

fn draw_point(scene: &mut Scene, frame: &PlaneFrame, point: &PlotPoint) {
    let center = frame.to_canvas((point.x, point.y));
    let color = common::resolve_color(point.color.as_deref(), Swatch::Blue.color());
    let fill = match point.style {
        MarkerStyle::Closed => color,
        MarkerStyle::Open => Color::rgb8(0xff, 0xff, 0xff),
    };
    scene.push(
        RenderLayer::Marker,
        Primitive::circle(
            center,
            POINT_RADIUS,
            ShapeStyle::filled(fill).with_stroke(StrokeDefinition::solid(color, 2.0)),
        )
        .with_role(POINT_ROLE),
    );

    if let Some(label) = &point.label {
        let (dx, dy, anchor) = point.label_position.placement();
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                center.add_point(Point::new(dx, dy)),
                label.as_str(),
                label_style(color).with_anchor(anchor),
            )
            .with_role(POINT_LABEL_ROLE),
        );
    }
}
