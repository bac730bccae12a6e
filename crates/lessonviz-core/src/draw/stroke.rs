//! Stroke and line-style definitions.
//!
//! # Overview
//!
//! - [`StrokeDefinition`]: color, width, dash pattern and cap of a stroke
//! - [`StrokeStyle`]: line patterns (solid, dashed or a custom dasharray)
//! - [`StrokeCap`]: how line endpoints are rendered
//! - [`apply_stroke!`](crate::apply_stroke!): applies stroke attributes to SVG elements
//!
//! Lesson diagrams use a handful of dash patterns: guide lines, grid lines
//! and dividers each have their own, so [`StrokeStyle::Custom`] carries the
//! raw SVG dasharray.
//!
//! ```
//! use lessonviz_core::draw::{StrokeDefinition, StrokeStyle, StrokeCap};
//! use lessonviz_core::color::Color;
//!
//! let axis = StrokeDefinition::solid(Color::rgb8(55, 65, 81), 2.0);
//!
//! let guide = StrokeDefinition::patterned(Color::rgb8(239, 68, 68), 1.5, "6 4").with_round_cap();
//! assert_eq!(*guide.style(), StrokeStyle::Custom("6 4".to_string()));
//! assert_eq!(guide.cap(), StrokeCap::Round);
//! ```
//!
//! # SVG Attribute Mapping
//!
//! | Rust Property | SVG Attribute | Example Values |
//! |--------------|---------------|----------------|
//! | `color` | `stroke`, `stroke-opacity` | `"#000000"`, `0.5` |
//! | `width` | `stroke-width` | `2.0` |
//! | `style` | `stroke-dasharray` | `"5,5"`, `"4 2"` |
//! | `cap` | `stroke-linecap` | `"butt"`, `"round"` |

use crate::color::Color;

/// Defines the visual style of a stroke, including dash patterns.
///
/// - `Solid`: No dasharray attribute
/// - `Dashed`: "5,5"
/// - `Custom(pattern)`: Uses the provided pattern string
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Dashed line with equal dash and gap lengths (5px dash, 5px gap)
    Dashed,
    /// Custom SVG dasharray pattern, e.g. "4 2"
    Custom(String),
}

impl StrokeStyle {
    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(&self) -> Option<String> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("5,5".to_string()),
            Self::Custom(pattern) => Some(pattern.clone()),
        }
    }
}

/// Defines how line endpoints are rendered.
///
/// Maps directly to SVG `stroke-linecap` attribute values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCap {
    /// Flat cap at the exact endpoint (SVG default)
    #[default]
    Butt,
    /// Rounded cap extending beyond the endpoint by half the stroke width
    Round,
}

impl StrokeCap {
    /// Returns the SVG stroke-linecap value
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
        }
    }
}

/// A stroke definition for rendering lines and borders.
///
/// # Examples
///
/// ```
/// use lessonviz_core::draw::{StrokeDefinition, StrokeStyle};
/// use lessonviz_core::color::Color;
///
/// // Default stroke (black, 1px, solid)
/// let stroke = StrokeDefinition::default();
/// assert_eq!(stroke.width(), 1.0);
///
/// let dashed = StrokeDefinition::dashed(Color::new("blue").unwrap(), 1.5);
/// assert_eq!(*dashed.style(), StrokeStyle::Dashed);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
    cap: StrokeCap,
}

impl StrokeDefinition {
    /// Creates a new solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            ..Self::default()
        }
    }

    /// Creates a solid stroke (convenience constructor).
    pub fn solid(color: Color, width: f32) -> Self {
        Self::new(color, width)
    }

    /// Creates a dashed stroke (convenience constructor).
    pub fn dashed(color: Color, width: f32) -> Self {
        Self {
            style: StrokeStyle::Dashed,
            ..Self::new(color, width)
        }
    }

    /// Creates a stroke with a raw SVG dasharray pattern.
    ///
    /// ```
    /// use lessonviz_core::draw::{StrokeDefinition, StrokeStyle};
    /// use lessonviz_core::color::Color;
    ///
    /// let stroke = StrokeDefinition::patterned(Color::default(), 1.0, "2,2");
    /// assert_eq!(stroke.style().to_svg_value().as_deref(), Some("2,2"));
    /// ```
    pub fn patterned(color: Color, width: f32, dasharray: &str) -> Self {
        Self {
            style: StrokeStyle::Custom(dasharray.to_string()),
            ..Self::new(color, width)
        }
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stroke style.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Returns the stroke cap style.
    pub fn cap(&self) -> StrokeCap {
        self.cap
    }

    /// Returns this stroke with a round cap.
    pub fn with_round_cap(mut self) -> Self {
        self.cap = StrokeCap::Round;
        self
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self {
            color: Color::default(),
            width: 1.0,
            style: StrokeStyle::default(),
            cap: StrokeCap::default(),
        }
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// Applies color, opacity, width, line cap and dash pattern (if not solid).
///
/// # Examples
///
/// ```
/// use lessonviz_core::draw::StrokeDefinition;
/// use lessonviz_core::color::Color;
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::solid(Color::new("black").unwrap(), 2.0);
/// let line = svg_element::Line::new()
///     .set("x1", 0)
///     .set("y1", 0)
///     .set("x2", 100)
///     .set("y2", 0);
///
/// let line = lessonviz_core::apply_stroke!(line, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_opaque_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width())
            .set("stroke-linecap", $stroke.cap().to_svg_value());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_eq!(stroke.width(), 1.0);
        assert_eq!(stroke.color().to_string(), "black");
        assert_eq!(*stroke.style(), StrokeStyle::Solid);
        assert_eq!(stroke.cap(), StrokeCap::Butt);
    }

    #[test]
    fn test_stroke_constructors() {
        let color = Color::new("red").unwrap();

        let solid = StrokeDefinition::solid(color, 2.0);
        assert_eq!(solid.width(), 2.0);
        assert_eq!(*solid.style(), StrokeStyle::Solid);

        let dashed = StrokeDefinition::dashed(color, 1.5);
        assert_eq!(*dashed.style(), StrokeStyle::Dashed);

        let patterned = StrokeDefinition::patterned(color, 1.0, "6 4");
        assert_eq!(*patterned.style(), StrokeStyle::Custom("6 4".to_string()));
    }

    #[test]
    fn test_stroke_with_round_cap() {
        let stroke = StrokeDefinition::solid(Color::default(), 3.0).with_round_cap();
        assert_eq!(stroke.cap(), StrokeCap::Round);
    }

    #[test]
    fn test_stroke_style_dasharray() {
        assert_eq!(StrokeStyle::Solid.to_svg_value(), None);
        assert_eq!(StrokeStyle::Dashed.to_svg_value(), Some("5,5".to_string()));

        let custom = StrokeStyle::Custom("4 2".to_string());
        assert_eq!(custom.to_svg_value(), Some("4 2".to_string()));
    }
}
