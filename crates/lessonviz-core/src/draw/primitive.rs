//! Positioned drawable primitives.
//!
//! A [`Primitive`] is the unit a layout engine emits: one shape with fully
//! resolved geometry and style, plus an optional role class naming what the
//! shape means in the diagram (`set-element`, `overflow-marker`, ...).
//! Primitives are immutable once built; the drawing surface only reads them.

use std::fmt::Write as _;

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{SvgNode, StrokeDefinition, TextDefinition},
    geometry::{Bounds, Point},
};

/// Fill and stroke of a closed or open shape.
///
/// A missing fill paints `fill="none"`; a missing stroke paints no outline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeStyle {
    fill: Option<Color>,
    stroke: Option<StrokeDefinition>,
}

impl ShapeStyle {
    pub fn new(fill: Option<Color>, stroke: Option<StrokeDefinition>) -> Self {
        Self { fill, stroke }
    }

    /// A filled shape without outline.
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    /// An outlined shape without fill.
    pub fn stroked(stroke: StrokeDefinition) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke),
        }
    }

    /// Returns this style with the given outline.
    pub fn with_stroke(mut self, stroke: StrokeDefinition) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> Option<&StrokeDefinition> {
        self.stroke.as_ref()
    }
}

/// Applies fill and outline of a [`ShapeStyle`] to an SVG shape element.
macro_rules! paint {
    ($element:expr, $style:expr) => {{
        let style: &ShapeStyle = $style;
        let elem = match style.fill() {
            Some(color) => $element
                .set("fill", color.to_opaque_string())
                .set("fill-opacity", color.alpha()),
            None => $element.set("fill", "none"),
        };
        match style.stroke() {
            Some(stroke) => crate::apply_stroke!(elem, stroke),
            None => elem,
        }
    }};
}

/// The geometry of a primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveKind {
    /// A single line of text anchored at `position`.
    Text {
        position: Point,
        content: String,
        style: TextDefinition,
    },
    /// An axis-aligned rectangle with optional rounded corners.
    Rect {
        bounds: Bounds,
        corner_radius: f32,
        style: ShapeStyle,
    },
    Circle {
        center: Point,
        radius: f32,
        style: ShapeStyle,
    },
    Line {
        from: Point,
        to: Point,
        stroke: StrokeDefinition,
    },
    /// A chain of straight segments; `closed` chains are painted as polygons.
    Polyline {
        points: Vec<Point>,
        closed: bool,
        style: ShapeStyle,
    },
    /// A circular arc from `start_angle` to `end_angle` (radians, screen
    /// convention). A filled arc is painted as a sector through the center.
    Arc {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        style: ShapeStyle,
    },
}

/// A positioned, styled shape with an optional role class.
///
/// # Examples
///
/// ```
/// # use lessonviz_core::draw::{Primitive, TextDefinition};
/// # use lessonviz_core::geometry::Point;
/// let label = Primitive::text(Point::new(40.0, 30.0), "12", TextDefinition::centered(14))
///     .with_role("set-element");
///
/// assert_eq!(label.text_content(), Some("12"));
/// assert_eq!(label.role(), Some("set-element"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    kind: PrimitiveKind,
    role: Option<&'static str>,
}

impl Primitive {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self { kind, role: None }
    }

    pub fn text(position: Point, content: impl Into<String>, style: TextDefinition) -> Self {
        Self::new(PrimitiveKind::Text {
            position,
            content: content.into(),
            style,
        })
    }

    pub fn rect(bounds: Bounds, style: ShapeStyle) -> Self {
        Self::new(PrimitiveKind::Rect {
            bounds,
            corner_radius: 0.0,
            style,
        })
    }

    pub fn rounded_rect(bounds: Bounds, corner_radius: f32, style: ShapeStyle) -> Self {
        Self::new(PrimitiveKind::Rect {
            bounds,
            corner_radius,
            style,
        })
    }

    pub fn circle(center: Point, radius: f32, style: ShapeStyle) -> Self {
        Self::new(PrimitiveKind::Circle {
            center,
            radius,
            style,
        })
    }

    pub fn line(from: Point, to: Point, stroke: StrokeDefinition) -> Self {
        Self::new(PrimitiveKind::Line { from, to, stroke })
    }

    pub fn polyline(points: Vec<Point>, style: ShapeStyle) -> Self {
        Self::new(PrimitiveKind::Polyline {
            points,
            closed: false,
            style,
        })
    }

    pub fn polygon(points: Vec<Point>, style: ShapeStyle) -> Self {
        Self::new(PrimitiveKind::Polyline {
            points,
            closed: true,
            style,
        })
    }

    pub fn arc(
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        style: ShapeStyle,
    ) -> Self {
        Self::new(PrimitiveKind::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            style,
        })
    }

    /// Returns this primitive tagged with a role class.
    pub fn with_role(mut self, role: &'static str) -> Self {
        self.role = Some(role);
        self
    }

    pub fn kind(&self) -> &PrimitiveKind {
        &self.kind
    }

    pub fn role(&self) -> Option<&'static str> {
        self.role
    }

    /// Returns the content of a text primitive, `None` for shapes.
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            PrimitiveKind::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Returns the anchor position of a text primitive, `None` for shapes.
    pub fn text_position(&self) -> Option<Point> {
        match &self.kind {
            PrimitiveKind::Text { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Paints this primitive as a single SVG node.
    pub fn to_svg(&self) -> SvgNode {
        match &self.kind {
            PrimitiveKind::Text {
                position,
                content,
                style,
            } => {
                let text = svg_element::Text::new(content.as_str());
                let text = style.apply_to(text, position.x(), position.y());
                self.finish(text)
            }
            PrimitiveKind::Rect {
                bounds,
                corner_radius,
                style,
            } => {
                let mut rect = svg_element::Rectangle::new()
                    .set("x", bounds.min_x())
                    .set("y", bounds.min_y())
                    .set("width", bounds.width())
                    .set("height", bounds.height());
                if *corner_radius > 0.0 {
                    rect = rect.set("rx", *corner_radius);
                }
                self.finish(paint!(rect, style))
            }
            PrimitiveKind::Circle {
                center,
                radius,
                style,
            } => {
                let circle = svg_element::Circle::new()
                    .set("cx", center.x())
                    .set("cy", center.y())
                    .set("r", *radius);
                self.finish(paint!(circle, style))
            }
            PrimitiveKind::Line { from, to, stroke } => {
                let line = svg_element::Line::new()
                    .set("x1", from.x())
                    .set("y1", from.y())
                    .set("x2", to.x())
                    .set("y2", to.y());
                self.finish(crate::apply_stroke!(line, stroke))
            }
            PrimitiveKind::Polyline {
                points,
                closed: true,
                style,
            } => {
                let polygon = svg_element::Polygon::new().set("points", points_attribute(points));
                self.finish(paint!(polygon, style))
            }
            PrimitiveKind::Polyline {
                points,
                closed: false,
                style,
            } => {
                let polyline =
                    svg_element::Polyline::new().set("points", points_attribute(points));
                self.finish(paint!(polyline, style))
            }
            PrimitiveKind::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                style,
            } => {
                let data = arc_path_data(
                    *center,
                    *radius,
                    *start_angle,
                    *end_angle,
                    style.fill().is_some(),
                );
                let path = svg_element::Path::new().set("d", data);
                self.finish(paint!(path, style))
            }
        }
    }

    /// Tags the element with the role class and boxes it.
    fn finish<T: svg::Node>(&self, mut element: T) -> SvgNode {
        if let Some(role) = self.role {
            element.assign("class", role);
        }
        Box::new(element)
    }
}

fn points_attribute(points: &[Point]) -> String {
    let mut data = String::new();
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            data.push(' ');
        }
        let _ = write!(data, "{},{}", point.x(), point.y());
    }
    data
}

/// Builds SVG path data for an arc; sectors close through the center.
fn arc_path_data(center: Point, radius: f32, start: f32, end: f32, sector: bool) -> String {
    let from = Point::polar(center, radius, start);
    let to = Point::polar(center, radius, end);
    let sweep = end - start;
    let large_arc = u8::from(sweep.abs() > std::f32::consts::PI);
    let sweep_flag = u8::from(sweep > 0.0);

    if sector {
        format!(
            "M {} {} L {} {} A {radius} {radius} 0 {large_arc} {sweep_flag} {} {} Z",
            center.x(),
            center.y(),
            from.x(),
            from.y(),
            to.x(),
            to.y()
        )
    } else {
        format!(
            "M {} {} A {radius} {radius} 0 {large_arc} {sweep_flag} {} {}",
            from.x(),
            from.y(),
            to.x(),
            to.y()
        )
    }
}
