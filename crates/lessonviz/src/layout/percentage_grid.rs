//! Hundred-square percentage grids.

use log::{debug, warn};
use serde::Deserialize;

use lessonviz_core::{
    color::Color,
    draw::{Primitive, RenderLayer, Scene, ShapeStyle, StrokeDefinition, TextDefinition},
    geometry::{Bounds, Point, Size},
};

use super::{
    LayoutEngine,
    common::{self, Swatch},
};
use crate::{error::LessonVizError, params::format_number};

/// Role class of shaded grid cells.
pub const SHADED_CELL_ROLE: &str = "shaded-cell";
/// Role class of the `43%` label.
pub const PERCENTAGE_ROLE: &str = "percentage-label";
/// Role class of the `43/100` label.
pub const FRACTION_ROLE: &str = "fraction-label";

const CELL: f32 = 20.0;
const SIDE: usize = 10;
const MARGIN: f32 = 20.0;
const TITLE_HEIGHT: f32 = 30.0;
const LABEL_LINE: f32 = 24.0;

/// Parameters of the `percentageGrid` variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageGridParams {
    shaded_count: f64,
    #[serde(default = "default_true")]
    show_percentage: bool,
    #[serde(default)]
    show_fraction: bool,
    #[serde(default)]
    shaded_color: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    caption: Option<String>,
}

fn default_true() -> bool {
    true
}

impl PercentageGridParams {
    pub fn new(shaded_count: f64) -> Self {
        Self {
            shaded_count,
            show_percentage: true,
            show_fraction: false,
            shaded_color: None,
            title: None,
            caption: None,
        }
    }

    pub fn with_fraction(mut self, show: bool) -> Self {
        self.show_fraction = show;
        self
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Returns the number of shaded cells, clamped into `0..=100`.
    pub fn shaded_cells(&self) -> usize {
        let count = self.shaded_count;
        if !count.is_finite() || !(0.0..=100.0).contains(&count) {
            warn!(shaded_count = count; "Shaded count outside 0..=100, clamping");
        }
        if count.is_nan() {
            return 0;
        }
        count.round().clamp(0.0, 100.0) as usize
    }
}

#[derive(Debug, Default)]
pub(crate) struct PercentageGridEngine;

impl LayoutEngine for PercentageGridEngine {
    type Params = PercentageGridParams;

    fn calculate(&self, params: &PercentageGridParams) -> Result<Scene, LessonVizError> {
        let shaded = params.shaded_cells();
        let fill = common::resolve_color(params.shaded_color.as_deref(), Swatch::Blue.color());

        let grid_side = CELL * SIDE as f32;
        let title_height = if params.title.is_some() { TITLE_HEIGHT } else { 0.0 };
        let labels = label_lines(params, shaded);
        let width = grid_side + 2.0 * MARGIN;
        let height = title_height + MARGIN + grid_side + MARGIN + LABEL_LINE * labels.len() as f32;
        let mut scene = Scene::new("percentageGrid", Size::new(width, height));

        if let Some(title) = &params.title {
            let style = TextDefinition::centered(16)
                .bold()
                .with_color(Swatch::TextPrimary.color());
            scene.push(
                RenderLayer::Text,
                Primitive::text(Point::new(width / 2.0, 22.0), title.as_str(), style).with_role("title"),
            );
        }

        let origin = Point::new(MARGIN, title_height + MARGIN);
        let border = StrokeDefinition::solid(Swatch::Border.color(), 1.0);
        for index in 0..SIDE * SIDE {
            let top_left = common::grid_cell(origin, index, SIDE, Size::new(CELL, CELL));
            let bounds = Bounds::new_from_top_left(top_left, Size::new(CELL, CELL));
            let cell = if index < shaded {
                Primitive::rect(bounds, ShapeStyle::filled(fill).with_stroke(border.clone()))
                    .with_role(SHADED_CELL_ROLE)
            } else {
                Primitive::rect(
                    bounds,
                    ShapeStyle::filled(Color::rgb8(0xff, 0xff, 0xff)).with_stroke(border.clone()),
                )
            };
            scene.push(RenderLayer::Content, cell);
        }

        scene.push(
            RenderLayer::Marker,
            Primitive::rect(
                Bounds::new_from_top_left(origin, Size::new(grid_side, grid_side)),
                ShapeStyle::stroked(StrokeDefinition::solid(Swatch::TextSecondary.color(), 2.0)),
            ),
        );

        let labels_top = origin.y() + grid_side + MARGIN / 2.0;
        for (index, (text, role)) in labels.into_iter().enumerate() {
            let style = TextDefinition::centered(16)
                .bold()
                .with_color(Swatch::TextPrimary.color())
                .centered_vertically();
            let y = labels_top + LABEL_LINE * index as f32 + LABEL_LINE / 2.0;
            scene.push(
                RenderLayer::Text,
                Primitive::text(Point::new(width / 2.0, y), text, style).with_role(role),
            );
        }

        debug!(shaded; "Percentage grid laid out");
        Ok(scene)
    }
}

fn label_lines(params: &PercentageGridParams, shaded: usize) -> Vec<(String, &'static str)> {
    let mut lines = Vec::new();
    if params.show_percentage {
        lines.push((format!("{}%", format_number(shaded as f64)), PERCENTAGE_ROLE));
    }
    if params.show_fraction {
        lines.push((format!("{shaded}/100"), FRACTION_ROLE));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shades_first_cells_row_major() {
        let scene = PercentageGridEngine
            .calculate(&PercentageGridParams::new(43.0))
            .unwrap();
        assert_eq!(scene.primitives_with_role(SHADED_CELL_ROLE).count(), 43);
        assert_eq!(scene.texts_with_role(PERCENTAGE_ROLE), vec!["43%"]);
        assert!(scene.texts_with_role(FRACTION_ROLE).is_empty());

        let cells = scene
            .items()
            .iter()
            .filter(|(layer, _)| *layer == RenderLayer::Content)
            .count();
        assert_eq!(cells, 100);
    }

    #[test]
    fn test_fraction_label() {
        let params = PercentageGridParams::new(7.0).with_fraction(true);
        let scene = PercentageGridEngine.calculate(&params).unwrap();
        assert_eq!(scene.texts_with_role(FRACTION_ROLE), vec!["7/100"]);
    }

    #[test]
    fn test_count_is_clamped() {
        assert_eq!(PercentageGridParams::new(140.0).shaded_cells(), 100);
        assert_eq!(PercentageGridParams::new(-3.0).shaded_cells(), 0);
        assert_eq!(PercentageGridParams::new(f64::NAN).shaded_cells(), 0);
        assert_eq!(PercentageGridParams::new(12.6).shaded_cells(), 13);
    }

    #[test]
    fn test_shaded_count_is_required() {
        assert!(serde_json::from_str::<PercentageGridParams>("{}").is_err());
        let params: PercentageGridParams = serde_json::from_str(r#"{"shadedCount": 25}"#).unwrap();
        assert!(params.show_percentage);
        assert!(!params.show_fraction);
    }

    #[test]
    fn test_title_moves_grid_down() {
        let mut params = PercentageGridParams::new(10.0);
        let plain = PercentageGridEngine.calculate(&params).unwrap();
        params.title = Some("Shaded part".to_string());
        let titled = PercentageGridEngine.calculate(&params).unwrap();
        assert_eq!(titled.size().height(), plain.size().height() + TITLE_HEIGHT);
        assert_eq!(titled.texts_with_role("title"), vec!["Shaded part"]);
    }
}
