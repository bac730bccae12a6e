//! Layer-based rendering for SVG output.
//!
//! Every primitive of a scene is assigned a [`RenderLayer`]; the drawing
//! surface emits one `<g data-layer="...">` group per non-empty layer, from
//! bottom to top, so shaded regions never cover grid lines and labels are
//! never hidden behind shapes.
//!
//! # Example
//!
//! ```
//! # use lessonviz_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::Rectangle;
//! let mut output = LayeredOutput::new();
//!
//! let text = svg::node::element::Text::new("43%");
//! output.add_to_layer(RenderLayer::Text, Box::new(text));
//!
//! let cell = Rectangle::new().set("fill", "#3b82f6");
//! output.add_to_layer(RenderLayer::Content, Box::new(cell));
//!
//! // Content renders before Text
//! let svg_nodes = output.render();
//! assert_eq!(svg_nodes.len(), 2);
//! ```

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Defines the rendering layers for SVG output.
///
/// Layers are rendered from bottom to top in the order of declaration: the
/// `Ord` derive uses declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Backdrops and container fills - renders first
    Background,
    /// Highlighted regions and shaded areas
    Region,
    /// Grid lines and tick marks
    Grid,
    /// Axes, number lines and their arrowheads
    Axis,
    /// Main content: bars, cells, curves, set outlines
    Content,
    /// Points, brackets and endpoint markers drawn over the content
    Marker,
    /// Text labels and annotations - renders last
    Text,
}

impl RenderLayer {
    /// Returns a human-readable name for this layer.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Region => "region",
            Self::Grid => "grid",
            Self::Axis => "axis",
            Self::Content => "content",
            Self::Marker => "marker",
            Self::Text => "text",
        }
    }
}

/// SVG nodes grouped by rendering layer.
///
/// Nodes are emitted in layer order (bottom to top) and, within a layer, in
/// insertion order.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    /// Creates a new empty `LayeredOutput`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single node to the specified layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Returns `true` if there are no nodes in any layer.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each non-empty layer becomes an SVG `<g>` element with a `data-layer`
    /// attribute identifying the layer. Empty layers are skipped.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.is_empty() {
            return Vec::new();
        }

        // Stable sort keeps insertion order within a layer
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group = svg_element::Group::new().set("data-layer", current_layer.name());

        for (layer, node) in self.items {
            if layer != current_layer {
                result.push(Box::new(current_group) as SvgNode);

                current_layer = layer;
                current_group = svg_element::Group::new().set("data-layer", layer.name());
            }

            current_group = current_group.add(node);
        }

        result.push(Box::new(current_group) as SvgNode);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svg::node::element::Rectangle;

    #[test]
    fn test_layered_output_new() {
        let output = LayeredOutput::new();
        assert!(output.is_empty());
        assert!(output.render().is_empty());
    }

    #[test]
    fn test_layered_output_groups_same_layer() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Text, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Text, Box::new(Rectangle::new()));
        assert!(!output.is_empty());

        let nodes = output.render();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_layered_output_render_orders_layers() {
        let mut output = LayeredOutput::new();

        output.add_to_layer(RenderLayer::Text, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Background, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Axis, Box::new(Rectangle::new()));

        let rendered: Vec<String> = output
            .render()
            .iter()
            .map(|node| node.to_string())
            .collect();

        assert_eq!(rendered.len(), 3);
        assert!(rendered[0].contains("data-layer=\"background\""));
        assert!(rendered[1].contains("data-layer=\"axis\""));
        assert!(rendered[2].contains("data-layer=\"text\""));
    }

    #[test]
    fn test_render_layer_order() {
        assert!(RenderLayer::Background < RenderLayer::Region);
        assert!(RenderLayer::Region < RenderLayer::Grid);
        assert!(RenderLayer::Grid < RenderLayer::Axis);
        assert!(RenderLayer::Content < RenderLayer::Marker);
        assert!(RenderLayer::Marker < RenderLayer::Text);
    }
}
