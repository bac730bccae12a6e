//! The request dispatcher.

use log::{debug, info, trace, warn};

use lessonviz_core::{
    color::Color,
    draw::{Primitive, RenderLayer, Scene, ShapeStyle, StrokeDefinition, TextDefinition},
    geometry::{Bounds, Point, Size},
};

use crate::{
    config::RenderConfig,
    error::LessonVizError,
    export::{Exporter, svg::SvgSurface},
    layout::{
        LayoutEngine, cartesian::CartesianEngine, function_graph::FunctionGraphEngine,
        number_line::NumberLineEngine, opposite_angles::OppositeAnglesEngine,
        percentage_bar::PercentageBarEngine, percentage_grid::PercentageGridEngine, set::SetEngine,
        stacked_bar::StackedBarEngine, unitary_table::UnitaryTableEngine,
    },
    request::{DiagramRequest, VariantParameters},
};

/// Role class of the heading of an error scene.
pub const ERROR_TITLE_ROLE: &str = "error-title";
/// Role class of the message lines of an error scene.
pub const ERROR_MESSAGE_ROLE: &str = "error-message";

const ERROR_WIDTH: f32 = 400.0;
const ERROR_LINE_CHARS: usize = 56;

/// Renders diagram requests into scenes and SVG documents.
///
/// A renderer holds only its configuration; every render is independent, so
/// one renderer can be shared across threads.
///
/// # Examples
///
/// ```
/// use lessonviz::{DiagramRenderer, request::DiagramRequest};
///
/// let renderer = DiagramRenderer::default();
/// let request = DiagramRequest::from_json(
///     r#"{"toolName": "percentageGrid", "parameters": {"shadedCount": 43}}"#,
/// )
/// .unwrap();
///
/// let scene = renderer.render(&request).unwrap();
/// assert_eq!(scene.variant(), "percentageGrid");
///
/// let svg = renderer.render_svg(&request).unwrap();
/// assert!(svg.contains("43%"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiagramRenderer {
    config: RenderConfig,
}

impl DiagramRenderer {
    /// Create a renderer with the given configuration.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Lays out the diagram a request describes.
    ///
    /// The caption carried by the parameters wins over the request caption.
    ///
    /// # Errors
    ///
    /// Returns [`LessonVizError::UnknownVariant`] for an unregistered tool
    /// name and [`LessonVizError::MalformedParameters`] when the parameters do
    /// not decode or violate a constraint of the variant.
    pub fn render(&self, request: &DiagramRequest) -> Result<Scene, LessonVizError> {
        let tag = request.variant()?;
        info!(variant = tag.name(); "Rendering diagram");
        trace!(parameters:? = request.parameters(); "Request parameters");

        let params = VariantParameters::decode(tag, request.parameters())?;
        let mut scene = match &params {
            VariantParameters::Set(params) => SetEngine.calculate(params),
            VariantParameters::PercentageGrid(params) => PercentageGridEngine.calculate(params),
            VariantParameters::PercentageBar(params) => PercentageBarEngine.calculate(params),
            VariantParameters::PercentageStackedBar(params) => StackedBarEngine.calculate(params),
            VariantParameters::UnitaryMethodTable(params) => UnitaryTableEngine.calculate(params),
            VariantParameters::NumberLine(params) => NumberLineEngine.calculate(params),
            VariantParameters::CartesianPlane(params) => CartesianEngine.calculate(params),
            VariantParameters::FunctionGraph(params) => FunctionGraphEngine.calculate(params),
            VariantParameters::VerticallyOppositeAngles(params) => {
                OppositeAnglesEngine.calculate(params)
            }
        }?;

        let caption = params.caption().or(request.caption()).map(str::to_string);
        scene.set_caption(caption);

        debug!(variant = tag.name(), primitives = scene.len(); "Scene laid out");
        Ok(scene)
    }

    /// Paints a scene onto the SVG surface configured for this renderer.
    ///
    /// # Errors
    ///
    /// Returns [`LessonVizError::Export`] when the scene canvas cannot be
    /// drawn.
    pub fn paint_svg(&self, scene: &Scene) -> Result<String, LessonVizError> {
        let surface = SvgSurface::new(self.config.style().clone());
        Ok(surface.export_scene(scene)?)
    }

    /// Renders a request straight to an SVG document.
    ///
    /// # Errors
    ///
    /// Returns any error [`render`](Self::render) or
    /// [`paint_svg`](Self::paint_svg) returns.
    pub fn render_svg(&self, request: &DiagramRequest) -> Result<String, LessonVizError> {
        let scene = self.render(request)?;
        let svg = self.paint_svg(&scene)?;
        info!(variant = scene.variant(), bytes = svg.len(); "SVG rendered");
        Ok(svg)
    }

    /// Renders a request to SVG, drawing an error marker in place of a
    /// diagram that fails.
    pub fn render_svg_or_error(&self, request: &DiagramRequest) -> String {
        match self.render_svg(request) {
            Ok(svg) => svg,
            Err(err) => {
                warn!(tool_name = request.tool_name(), err:%; "Diagram failed, drawing error marker");
                let scene = self.error_scene(&err);
                self.paint_svg(&scene).unwrap_or_default()
            }
        }
    }

    /// Builds a scene that shows an error in place of a diagram: a red framed
    /// box naming the variant and the message.
    pub fn error_scene(&self, err: &LessonVizError) -> Scene {
        let heading = match err {
            LessonVizError::UnknownVariant { tool_name } => format!("Unknown diagram `{tool_name}`"),
            _ => match err.variant() {
                Some(variant) => format!("Cannot draw `{variant}`"),
                None => "Cannot draw diagram".to_string(),
            },
        };
        let message = match err {
            LessonVizError::MalformedParameters { message, .. } => message.clone(),
            other => other.to_string(),
        };
        let lines = wrap(&message, ERROR_LINE_CHARS);

        let height = 70.0 + 18.0 * lines.len() as f32;
        let mut scene = Scene::new("error", Size::new(ERROR_WIDTH, height));
        let red = Color::rgb8(0xdc, 0x26, 0x26);

        scene.push(
            RenderLayer::Background,
            Primitive::rounded_rect(
                Bounds::new_from_top_left(Point::new(4.0, 4.0), Size::new(ERROR_WIDTH - 8.0, height - 8.0)),
                6.0,
                ShapeStyle::filled(Color::rgb8(0xfe, 0xf2, 0xf2)).with_stroke(StrokeDefinition::solid(red, 2.0)),
            ),
        );
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                Point::new(ERROR_WIDTH / 2.0, 32.0),
                heading,
                TextDefinition::centered(15).bold().with_color(red),
            )
            .with_role(ERROR_TITLE_ROLE),
        );
        for (index, line) in lines.into_iter().enumerate() {
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(ERROR_WIDTH / 2.0, 58.0 + 18.0 * index as f32),
                    line,
                    TextDefinition::centered(12).with_color(Color::rgb8(0x7f, 0x1d, 0x1d)),
                )
                .with_role(ERROR_MESSAGE_ROLE),
            );
        }
        scene
    }
}

/// Breaks text into lines of at most `width` characters at spaces. Words
/// longer than a line stand on their own line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
