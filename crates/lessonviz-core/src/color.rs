//! Color handling for lessonviz diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Lesson content names colors as CSS strings
//! (`"#86efac"`, `"green"`, `"rgb(0, 0, 0)"`); layout engines also build
//! fixed palette colors from 8-bit components.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{AlphaColor, DynamicColor, Rgba8, Srgb};
use log::warn;

/// Wrapper around the `DynamicColor` type from the color crate
///
/// Two colors are equal when they paint the same 8-bit sRGBA value, however
/// they were written (`"black"`, `"#000000"` and `rgb8(0, 0, 0)` are equal).
#[derive(Clone, Copy, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    fn rgba8(&self) -> Rgba8 {
        self.color.to_alpha_color::<Srgb>().to_rgba8()
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.rgba8() == other.rgba8()
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let Rgba8 { r, g, b, a } = self.rgba8();
        [r, g, b, a].hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use lessonviz_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Create an opaque sRGB color from 8-bit components.
    ///
    /// Used for the fixed palettes of the layout engines.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            color: DynamicColor::from_alpha_color(AlphaColor::<Srgb>::from_rgb8(r, g, b)),
        }
    }

    /// Parse an optional CSS color supplied by lesson content, falling back to
    /// `fallback` when it is absent or cannot be parsed.
    ///
    /// An unparsable value is reported with a warning; it is never an error,
    /// since colors are always optional parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use lessonviz_core::color::Color;
    ///
    /// let fallback = Color::rgb8(0, 0, 255);
    /// assert_eq!(Color::parse_or(None, fallback), fallback);
    /// assert_eq!(Color::parse_or(Some("bogus"), fallback), fallback);
    /// assert_ne!(Color::parse_or(Some("red"), fallback), fallback);
    /// ```
    pub fn parse_or(value: Option<&str>, fallback: Color) -> Color {
        match value {
            None => fallback,
            Some(css) => Self::new(css).unwrap_or_else(|err| {
                warn!(err; "Ignoring unparsable color, using default");
                fallback
            }),
        }
    }

    /// Creates a new color with the specified alpha (transparency) value.
    ///
    /// # Examples
    ///
    /// ```
    /// use lessonviz_core::color::Color;
    ///
    /// let red = Color::new("red").unwrap();
    /// let semi_transparent_red = red.with_alpha(0.5);
    /// assert_eq!(semi_transparent_red.alpha(), 0.5);
    /// ```
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// CSS text of this color with its alpha dropped.
    ///
    /// SVG painting pairs this with a `fill-opacity` or `stroke-opacity`
    /// attribute carrying [`alpha`](Self::alpha), so the alpha is applied
    /// once.
    ///
    /// # Examples
    ///
    /// ```
    /// use lessonviz_core::color::Color;
    ///
    /// assert_eq!(Color::new("red").unwrap().to_opaque_string(), "red");
    /// let tint = Color::rgb8(59, 130, 246).with_alpha(0.21);
    /// assert!(!tint.to_opaque_string().contains('/'));
    /// ```
    pub fn to_opaque_string(&self) -> String {
        if self.alpha() >= 1.0 {
            self.to_string()
        } else {
            self.with_alpha(1.0).to_string()
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("#86efac").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_default() {
        let color = Color::default();
        assert_eq!(color.to_string(), "black");
    }

    #[test]
    fn test_color_rgb8_is_opaque() {
        let color = Color::rgb8(34, 197, 94);
        assert!((color.alpha() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_color_rgb8_matches_hex() {
        assert_eq!(Color::rgb8(255, 0, 0), Color::new("#ff0000").unwrap());
    }

    #[test]
    fn test_color_with_alpha() {
        let color = Color::new("red").unwrap();
        let transparent = color.with_alpha(0.5);
        assert!((transparent.alpha() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_color_parse_or_fallback() {
        let fallback = Color::rgb8(1, 2, 3);
        assert_eq!(Color::parse_or(None, fallback), fallback);
        assert_eq!(Color::parse_or(Some(""), fallback), fallback);
        assert_eq!(
            Color::parse_or(Some("blue"), fallback),
            Color::new("blue").unwrap()
        );
    }

    #[test]
    fn test_color_eq_ignores_spelling() {
        assert_eq!(Color::new("#000000").unwrap(), Color::rgb8(0, 0, 0));
        assert_eq!(Color::new("black").unwrap(), Color::rgb8(0, 0, 0));
        assert_ne!(Color::rgb8(0, 0, 0), Color::rgb8(0, 0, 0).with_alpha(0.5));
    }

    #[test]
    fn test_opaque_string_drops_alpha() {
        let tint = Color::rgb8(59, 130, 246).with_alpha(0.21);
        let opaque = Color::new(&tint.to_opaque_string()).unwrap();
        assert_eq!(opaque, Color::rgb8(59, 130, 246));
        assert!((opaque.alpha() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_color_eq_hash() {
        use std::collections::HashSet;

        let color1 = Color::new("red").unwrap();
        let color2 = Color::new("red").unwrap();
        let color3 = Color::new("blue").unwrap();

        assert_eq!(color1, color2);
        assert_ne!(color1, color3);

        let mut set = HashSet::new();
        set.insert(color1);
        assert!(set.contains(&color2));
        assert!(!set.contains(&color3));
    }
}
