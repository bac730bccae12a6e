//! SVG drawing surface.

use log::{debug, warn};
use svg::{Document, node::element as svg_element};

use lessonviz_core::{
    color::Color,
    draw::{Primitive, RenderLayer, Scene, TextDefinition},
    geometry::{Point, Size},
};

use crate::{config::StyleConfig, export};

/// Vertical space reserved beneath the canvas for each caption point of font size.
const CAPTION_BAND_PADDING: f32 = 16.0;

/// Paints scenes as standalone SVG documents.
///
/// # Examples
///
/// ```
/// # use lessonviz::export::{Exporter, svg::SvgSurface};
/// # use lessonviz::config::StyleConfig;
/// # use lessonviz_core::draw::Scene;
/// # use lessonviz_core::geometry::Size;
/// let surface = SvgSurface::new(StyleConfig::default());
/// let scene = Scene::new("percentageGrid", Size::new(240.0, 260.0));
/// let svg = surface.export_scene(&scene).unwrap();
/// assert!(svg.starts_with("<svg"));
/// assert!(svg.contains("viewBox=\"0 0 240 260\""));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    style: StyleConfig,
}

impl SvgSurface {
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    /// Builds the SVG document for a scene.
    ///
    /// The document is the scene canvas plus, when the scene has a caption,
    /// a caption band beneath it.
    pub fn render_document(&self, scene: &Scene) -> Result<Document, export::Error> {
        let canvas = scene.size();
        if !is_drawable(canvas) {
            return Err(export::Error::Render(format!(
                "scene `{}` has an undrawable canvas {}x{}",
                scene.variant(),
                canvas.width(),
                canvas.height()
            )));
        }

        let caption_band = scene
            .caption()
            .map(|_| f32::from(self.style.caption_font_size()) + CAPTION_BAND_PADDING)
            .unwrap_or_default();
        let size = Size::new(canvas.width(), canvas.height() + caption_band);

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
            .set("width", size.width())
            .set("height", size.height())
            .set("font-family", self.style.font_family())
            .set("data-variant", scene.variant());

        doc = self.add_background(doc, size);

        for node in scene.render_to_layers().render() {
            doc = doc.add(node);
        }

        if let Some(caption) = scene.caption() {
            doc = doc.add(self.render_caption(caption, canvas, caption_band));
        }

        debug!(variant = scene.variant(), primitives = scene.len(); "SVG document rendered");
        Ok(doc)
    }

    fn add_background(&self, doc: Document, size: Size) -> Document {
        let color = match self.style.background_color() {
            Ok(Some(color)) => color,
            Ok(None) => return doc,
            Err(err) => {
                warn!(err; "Skipping background");
                return doc;
            }
        };

        let background = svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", size.width())
            .set("height", size.height())
            .set("fill", color.to_opaque_string())
            .set("fill-opacity", color.alpha());
        doc.add(
            svg_element::Group::new()
                .set("data-layer", RenderLayer::Background.name())
                .add(background),
        )
    }

    fn render_caption(&self, caption: &str, canvas: Size, band: f32) -> svg_element::Group {
        let style = TextDefinition::centered(self.style.caption_font_size())
            .italic()
            .with_color(Color::rgb8(0x4b, 0x55, 0x63))
            .centered_vertically();
        let position = Point::new(canvas.width() / 2.0, canvas.height() + band / 2.0);
        let text = Primitive::text(position, caption, style).with_role("caption");

        svg_element::Group::new()
            .set("data-layer", "caption")
            .add(text.to_svg())
    }
}

impl export::Exporter for SvgSurface {
    fn export_scene(&self, scene: &Scene) -> Result<String, export::Error> {
        let doc = self.render_document(scene)?;
        Ok(doc.to_string())
    }
}

fn is_drawable(size: Size) -> bool {
    size.width().is_finite() && size.height().is_finite() && size.width() > 0.0 && size.height() > 0.0
}
