//! Text style definitions for diagram labels.
//!
//! A [`TextDefinition`] describes how a text primitive is painted: size,
//! weight, slant, color, horizontal anchor, vertical baseline and an
//! optional rotation. The font family is not part of the definition; the
//! drawing surface applies one family to the whole document.
//!
//! # Quick Start
//!
//! ```
//! # use lessonviz_core::draw::{TextAnchor, TextDefinition};
//! # use lessonviz_core::color::Color;
//! let style = TextDefinition::centered(14)
//!     .bold()
//!     .with_color(Color::rgb8(55, 65, 81));
//! assert_eq!(style.font_size(), 14);
//! assert_eq!(style.anchor(), TextAnchor::Middle);
//! ```

use svg::node::element as svg_element;

use crate::color::Color;

/// Horizontal alignment of a text line relative to its position.
///
/// Maps to the SVG `text-anchor` attribute.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    /// Returns the SVG text-anchor value
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Vertical alignment of a text line relative to its position.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    /// The position is on the alphabetic baseline (SVG default)
    #[default]
    Alphabetic,
    /// The position is the vertical center of the glyphs
    Central,
}

/// Defines the visual style for text elements in diagrams.
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Font size | `12` |
/// | Bold | `false` |
/// | Italic | `false` |
/// | Color | `None` (SVG default, black) |
/// | Anchor | [`TextAnchor::Start`] |
/// | Baseline | [`TextBaseline::Alphabetic`] |
/// | Rotation | `None` |
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_size: u16,
    bold: bool,
    italic: bool,
    color: Option<Color>,
    anchor: TextAnchor,
    baseline: TextBaseline,
    rotation: Option<f32>,
}

impl TextDefinition {
    /// Creates a new text definition with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a centered text definition of the given size.
    ///
    /// Centered labels are the most common kind in lesson diagrams (element
    /// labels, axis numbers, titles).
    pub fn centered(font_size: u16) -> Self {
        Self {
            font_size,
            anchor: TextAnchor::Middle,
            ..Self::default()
        }
    }

    /// Returns this definition drawn bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Returns this definition drawn italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Returns this definition in the given color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Returns this definition with the given anchor.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Returns this definition vertically centered on its position.
    pub fn centered_vertically(mut self) -> Self {
        self.baseline = TextBaseline::Central;
        self
    }

    /// Returns this definition rotated by `degrees` around its position.
    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn anchor(&self) -> TextAnchor {
        self.anchor
    }

    pub fn baseline(&self) -> TextBaseline {
        self.baseline
    }

    pub fn rotation(&self) -> Option<f32> {
        self.rotation
    }

    /// Applies the style attributes to an SVG `<text>` element positioned at `(x, y)`.
    pub(crate) fn apply_to(&self, text: svg_element::Text, x: f32, y: f32) -> svg_element::Text {
        let mut text = text
            .set("x", x)
            .set("y", y)
            .set("font-size", self.font_size)
            .set("text-anchor", self.anchor.to_svg_value());

        if self.bold {
            text = text.set("font-weight", "bold");
        }
        if self.italic {
            text = text.set("font-style", "italic");
        }
        if self.baseline == TextBaseline::Central {
            text = text.set("dominant-baseline", "central");
        }
        if let Some(color) = self.color {
            text = text
                .set("fill", color.to_opaque_string())
                .set("fill-opacity", color.alpha());
        }
        if let Some(degrees) = self.rotation {
            text = text.set("transform", format!("rotate({degrees} {x} {y})"));
        }
        text
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_size: 12,
            bold: false,
            italic: false,
            color: None,
            anchor: TextAnchor::default(),
            baseline: TextBaseline::default(),
            rotation: None,
        }
    }
}
