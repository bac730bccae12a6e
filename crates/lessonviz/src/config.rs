//! Configuration types for lessonviz rendering.
//!
//! All types implement [`serde::Deserialize`] and can be loaded from TOML.
//!
//! # Overview
//!
//! - [`RenderConfig`] - Top-level configuration.
//! - [`StyleConfig`] - Visual styling of the drawing surface.
//!
//! # Example
//!
//! ```
//! # use lessonviz::config::RenderConfig;
//! let config = RenderConfig::from_toml_str(
//!     r#"
//!     [style]
//!     background_color = "white"
//!     caption_font_size = 14
//!     "#,
//! )
//! .unwrap();
//! assert!(config.style().background_color().unwrap().is_some());
//! assert_eq!(config.style().caption_font_size(), 14);
//! assert_eq!(config.style().font_family(), "sans-serif");
//! ```

use serde::Deserialize;

use lessonviz_core::color::Color;

use crate::error::LessonVizError;

/// Top-level rendering configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl RenderConfig {
    /// Creates a new [`RenderConfig`] with the specified style configuration.
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`LessonVizError::Config`] if the text is not valid TOML or
    /// does not match the configuration layout.
    pub fn from_toml_str(text: &str) -> Result<Self, LessonVizError> {
        toml::from_str(text).map_err(|err| LessonVizError::Config(err.to_string()))
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

fn default_font_family() -> String {
    "sans-serif".to_string()
}

fn default_caption_font_size() -> u16 {
    13
}

/// Visual styling configuration for rendered diagrams.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] painted behind every diagram, as a color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Font family applied to the whole document.
    #[serde(default = "default_font_family")]
    font_family: String,

    /// Font size of the caption line beneath the canvas.
    #[serde(default = "default_caption_font_size")]
    caption_font_size: u16,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            font_family: default_font_family(),
            caption_font_size: default_caption_font_size(),
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn caption_font_size(&self) -> u16 {
        self.caption_font_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.style().background_color(), Ok(None));
        assert_eq!(config.style().font_family(), "sans-serif");
        assert_eq!(config.style().caption_font_size(), 13);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = RenderConfig::from_toml_str("").unwrap();
        assert_eq!(config.style().font_family(), "sans-serif");
    }

    #[test]
    fn test_toml_overrides() {
        let config = RenderConfig::from_toml_str(
            r##"
            [style]
            background_color = "#f8fafc"
            font_family = "Inter"
            "##,
        )
        .unwrap();
        assert!(config.style().background_color().unwrap().is_some());
        assert_eq!(config.style().font_family(), "Inter");
        assert_eq!(config.style().caption_font_size(), 13);
    }

    #[test]
    fn test_invalid_background_color() {
        let config = RenderConfig::from_toml_str(
            r#"
            [style]
            background_color = "not-a-color"
            "#,
        )
        .unwrap();
        let err = config.style().background_color().unwrap_err();
        assert!(err.contains("Invalid background color"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = RenderConfig::from_toml_str("[style\nfont_family = 1").unwrap_err();
        assert!(matches!(err, LessonVizError::Config(_)));
    }

    #[test]
    fn test_wrong_field_type_is_config_error() {
        let err = RenderConfig::from_toml_str("[style]\ncaption_font_size = \"big\"").unwrap_err();
        assert!(matches!(err, LessonVizError::Config(_)));
    }
}
