//! The output of a layout engine.

use crate::{
    draw::{LayeredOutput, Primitive, RenderLayer},
    geometry::Size,
};

/// An ordered collection of layered primitives on a fixed-size canvas.
///
/// A scene is built once by a layout engine and then only read: by the
/// drawing surface when painting, and by hosts or tests inspecting labels.
///
/// # Examples
///
/// ```
/// # use lessonviz_core::draw::{Primitive, RenderLayer, Scene, TextDefinition};
/// # use lessonviz_core::geometry::{Point, Size};
/// let mut scene = Scene::new("setBox", Size::new(400.0, 150.0));
/// scene.push(
///     RenderLayer::Text,
///     Primitive::text(Point::new(10.0, 10.0), "1", TextDefinition::default()).with_role("set-element"),
/// );
///
/// assert_eq!(scene.texts_with_role("set-element"), vec!["1"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    variant: &'static str,
    size: Size,
    caption: Option<String>,
    items: Vec<(RenderLayer, Primitive)>,
}

impl Scene {
    /// Creates an empty scene for the named variant.
    pub fn new(variant: &'static str, size: Size) -> Self {
        Self {
            variant,
            size,
            caption: None,
            items: Vec::new(),
        }
    }

    /// Appends a primitive to a layer.
    pub fn push(&mut self, layer: RenderLayer, primitive: Primitive) {
        self.items.push((layer, primitive));
    }

    /// Appends several primitives to the same layer, keeping their order.
    pub fn extend(&mut self, layer: RenderLayer, primitives: impl IntoIterator<Item = Primitive>) {
        self.items
            .extend(primitives.into_iter().map(|primitive| (layer, primitive)));
    }

    /// Sets the caption painted beneath the canvas.
    ///
    /// Blank captions are ignored.
    pub fn set_caption(&mut self, caption: Option<String>) {
        self.caption = caption.filter(|text| !text.trim().is_empty());
    }

    /// Returns the name of the variant that produced this scene.
    pub fn variant(&self) -> &'static str {
        self.variant
    }

    /// Returns the canvas size, excluding the caption band.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Returns all items in insertion order.
    pub fn items(&self) -> &[(RenderLayer, Primitive)] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the primitives carrying the given role class, in order.
    pub fn primitives_with_role<'a, 'r>(
        &'a self,
        role: &'r str,
    ) -> impl Iterator<Item = &'a Primitive> + use<'a, 'r> {
        self.items
            .iter()
            .map(|(_, primitive)| primitive)
            .filter(move |primitive| primitive.role() == Some(role))
    }

    /// Returns the contents of the text primitives carrying the given role class.
    pub fn texts_with_role<'a>(&'a self, role: &str) -> Vec<&'a str> {
        self.primitives_with_role(role)
            .filter_map(Primitive::text_content)
            .collect()
    }

    /// Returns the contents of every text primitive, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|(_, primitive)| primitive.text_content())
            .collect()
    }

    /// Paints every primitive into its layer.
    pub fn render_to_layers(&self) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        for (layer, primitive) in &self.items {
            output.add_to_layer(*layer, primitive.to_svg());
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        draw::{ShapeStyle, TextDefinition},
        geometry::Point,
    };

    fn label(content: &str, role: &'static str) -> Primitive {
        Primitive::text(Point::default(), content, TextDefinition::default()).with_role(role)
    }

    #[test]
    fn test_scene_new_is_empty() {
        let scene = Scene::new("numberLine", Size::new(600.0, 120.0));
        assert!(scene.is_empty());
        assert_eq!(scene.variant(), "numberLine");
        assert_eq!(scene.size(), Size::new(600.0, 120.0));
        assert_eq!(scene.caption(), None);
    }

    #[test]
    fn test_scene_roles_keep_order() {
        let mut scene = Scene::new("setCircle", Size::new(300.0, 200.0));
        scene.extend(
            RenderLayer::Text,
            [label("a", "set-element"), label("...", "overflow-marker")],
        );
        scene.push(RenderLayer::Text, label("b", "set-element"));
        scene.push(
            RenderLayer::Content,
            Primitive::circle(Point::default(), 80.0, ShapeStyle::default()),
        );

        assert_eq!(scene.len(), 4);
        assert_eq!(scene.texts_with_role("set-element"), vec!["a", "b"]);
        assert_eq!(scene.texts_with_role("overflow-marker"), vec!["..."]);
        assert_eq!(scene.texts(), vec!["a", "...", "b"]);
    }

    #[test]
    fn test_texts_outlive_role_name() {
        let mut scene = Scene::new("setBox", Size::new(400.0, 150.0));
        scene.push(RenderLayer::Text, label("A = { 1 }", "notation"));

        let texts = {
            let role = String::from("notation");
            scene.texts_with_role(&role)
        };
        assert_eq!(texts, vec!["A = { 1 }"]);
    }

    #[test]
    fn test_scene_blank_caption_ignored() {
        let mut scene = Scene::new("percentageGrid", Size::new(200.0, 200.0));
        scene.set_caption(Some("   ".to_string()));
        assert_eq!(scene.caption(), None);

        scene.set_caption(Some("43 out of 100".to_string()));
        assert_eq!(scene.caption(), Some("43 out of 100"));
    }

    #[test]
    fn test_scene_render_to_layers_groups() {
        let mut scene = Scene::new("setBox", Size::new(400.0, 150.0));
        scene.push(RenderLayer::Text, label("1", "set-element"));
        scene.push(
            RenderLayer::Background,
            Primitive::circle(Point::default(), 1.0, ShapeStyle::default()),
        );
        scene.push(RenderLayer::Text, label("2", "set-element"));

        let groups = scene.render_to_layers().render();
        assert_eq!(groups.len(), 2);
    }
}
