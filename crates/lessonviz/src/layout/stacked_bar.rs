//! A single stacked percentage bar.
//!
//! The bar spans a fixed width scaled to the segment total (never less than
//! 100%). Segment labels sit above the bar, values inside, sub-labels below,
//! then a percentage scale, and an optional bracket spanning the whole bar.

use log::debug;
use serde::Deserialize;

use lessonviz_core::{
    draw::{Primitive, RenderLayer, Scene, ShapeStyle, StrokeDefinition, TextDefinition},
    geometry::{Bounds, Point, Size},
};

use super::{
    LayoutEngine,
    common::Swatch,
    percentage_bar::{VerticalSide, segment_color},
};
use crate::{
    error::LessonVizError,
    params::{Label, clean_value, format_number},
    request::VariantTag,
};

pub const TITLE_ROLE: &str = "title";
pub const SEGMENT_LABEL_ROLE: &str = "segment-label";
pub const SEGMENT_VALUE_ROLE: &str = "segment-value";
pub const SUB_LABEL_ROLE: &str = "sub-label";
pub const SCALE_MARKER_ROLE: &str = "scale-marker";
pub const TOTAL_ROLE: &str = "total-value";
pub const ANNOTATION_ROLE: &str = "annotation";

const WIDTH: f32 = 600.0;
const BAR_X: f32 = 60.0;
const BAR_WIDTH: f32 = 480.0;
const BAR_HEIGHT: f32 = 50.0;
const TOP_PADDING: f32 = 10.0;
const TITLE_BAND: f32 = 30.0;
const TOP_BRACKET_BAND: f32 = 50.0;
const LABEL_BAND: f32 = 24.0;
const SUB_LABEL_BAND: f32 = 22.0;
const SCALE_GAP: f32 = 12.0;
const SCALE_BAND: f32 = 24.0;
const BOTTOM_BRACKET_BAND: f32 = 46.0;
const ANNOTATION_BAND: f32 = 28.0;
const BOTTOM_PADDING: f32 = 10.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackedSegment {
    #[serde(default)]
    label: Label,
    percentage: f64,
    #[serde(default)]
    value: Option<Label>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    sub_label: Option<String>,
    #[serde(default)]
    highlight: bool,
}

impl StackedSegment {
    pub fn new(label: impl Into<String>, percentage: f64) -> Self {
        Self {
            label: Label::new(label),
            percentage,
            value: None,
            color: None,
            sub_label: None,
            highlight: false,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(Label::new(value));
        self
    }

    pub fn with_sub_label(mut self, sub_label: impl Into<String>) -> Self {
        self.sub_label = Some(sub_label.into());
        self
    }
}

/// The bracket spanning the whole bar.
#[derive(Debug, Clone, Deserialize)]
pub struct TotalValue {
    value: Label,
    #[serde(default)]
    label: Option<String>,
    #[serde(default = "top")]
    position: VerticalSide,
}

fn top() -> VerticalSide {
    VerticalSide::Top
}

impl TotalValue {
    pub fn new(value: impl Into<String>, position: VerticalSide) -> Self {
        Self {
            value: Label::new(value),
            label: None,
            position,
        }
    }

    fn text(&self) -> String {
        let value = clean_value(self.value.as_str());
        match &self.label {
            Some(label) => format!("{label} = {value}"),
            None => value,
        }
    }
}

/// Parameters of the `percentageStackedBar` variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackedBarParams {
    #[serde(default)]
    title: Option<String>,
    segments: Vec<StackedSegment>,
    #[serde(default)]
    percentage_markers: Option<Vec<f64>>,
    #[serde(default)]
    total_value: Option<TotalValue>,
    #[serde(default)]
    annotation: Option<String>,
    #[serde(default)]
    caption: Option<String>,
}

impl StackedBarParams {
    pub fn new(segments: Vec<StackedSegment>) -> Self {
        Self {
            title: None,
            segments,
            percentage_markers: None,
            total_value: None,
            annotation: None,
            caption: None,
        }
    }

    pub fn with_total(mut self, total: TotalValue) -> Self {
        self.total_value = Some(total);
        self
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// The percentage the full bar width stands for.
    pub fn scale_total(&self) -> f64 {
        self.segments
            .iter()
            .map(|segment| segment.percentage)
            .sum::<f64>()
            .max(100.0)
    }

    /// The explicit markers, or 0 and every cumulative boundary.
    pub fn markers(&self) -> Vec<f64> {
        if let Some(markers) = &self.percentage_markers {
            return markers.clone();
        }
        let mut markers = vec![0.0];
        markers.extend(self.segments.iter().scan(0.0, |cumulative, segment| {
            *cumulative += segment.percentage;
            Some(*cumulative)
        }));
        markers.sort_by(f64::total_cmp);
        markers.dedup();
        markers
    }

    fn total_on(&self, side: VerticalSide) -> Option<&TotalValue> {
        self.total_value
            .as_ref()
            .filter(|total| total.position == side)
    }
}

#[derive(Debug, Default)]
pub(crate) struct StackedBarEngine;

impl LayoutEngine for StackedBarEngine {
    type Params = StackedBarParams;

    fn calculate(&self, params: &StackedBarParams) -> Result<Scene, LessonVizError> {
        if params.segments.is_empty() {
            return Err(LessonVizError::malformed(
                VariantTag::PercentageStackedBar,
                "`segments` must contain at least one segment",
            ));
        }

        let title_band = if params.title.is_some() { TITLE_BAND } else { 0.0 };
        let top_bracket = params.total_on(VerticalSide::Top);
        let bottom_bracket = params.total_on(VerticalSide::Bottom);
        let has_sub_labels = params.segments.iter().any(|s| s.sub_label.is_some());

        let bar_y = TOP_PADDING
            + title_band
            + if top_bracket.is_some() { TOP_BRACKET_BAND } else { 0.0 }
            + LABEL_BAND;
        let bar_bottom = bar_y + BAR_HEIGHT;
        let scale_y = bar_bottom + if has_sub_labels { SUB_LABEL_BAND } else { 0.0 } + SCALE_GAP;
        let below_scale = scale_y + SCALE_BAND;
        let bracket_band = if bottom_bracket.is_some() { BOTTOM_BRACKET_BAND } else { 0.0 };
        let annotation_band = if params.annotation.is_some() { ANNOTATION_BAND } else { 0.0 };
        let height = below_scale + bracket_band + annotation_band + BOTTOM_PADDING;

        let mut scene = Scene::new("percentageStackedBar", Size::new(WIDTH, height));
        let px_per_percent = BAR_WIDTH / params.scale_total() as f32;
        let x_of = |percent: f64| BAR_X + percent as f32 * px_per_percent;

        if let Some(title) = &params.title {
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(WIDTH / 2.0, TOP_PADDING + 16.0),
                    title.as_str(),
                    TextDefinition::centered(16)
                        .bold()
                        .with_color(Swatch::TextPrimary.color()),
                )
                .with_role(TITLE_ROLE),
            );
        }

        let mut cumulative = 0.0;
        for (index, segment) in params.segments.iter().enumerate() {
            let start = x_of(cumulative);
            cumulative += segment.percentage;
            let end = x_of(cumulative);
            let center = (start + end) / 2.0;
            let color = segment_color(index, segment.color.as_deref());

            let (fill_alpha, outline) = if segment.highlight {
                (0.45, StrokeDefinition::solid(Swatch::Red.color(), 3.0))
            } else {
                (0.25, StrokeDefinition::solid(color, 2.0))
            };
            scene.push(
                RenderLayer::Content,
                Primitive::rect(
                    Bounds::new_from_top_left(Point::new(start, bar_y), Size::new(end - start, BAR_HEIGHT)),
                    ShapeStyle::new(Some(color.with_alpha(fill_alpha)), Some(outline)),
                ),
            );

            if !segment.label.is_empty() {
                scene.push(
                    RenderLayer::Text,
                    Primitive::text(
                        Point::new(center, bar_y - 8.0),
                        segment.label.as_str(),
                        TextDefinition::centered(13)
                            .bold()
                            .with_color(Swatch::TextPrimary.color()),
                    )
                    .with_role(SEGMENT_LABEL_ROLE),
                );
            }

            let inside = match &segment.value {
                Some(value) => clean_value(value.as_str()),
                None => format!("{}%", format_number(segment.percentage)),
            };
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(center, bar_y + BAR_HEIGHT / 2.0),
                    inside,
                    TextDefinition::centered(15)
                        .bold()
                        .with_color(Swatch::TextPrimary.color())
                        .centered_vertically(),
                )
                .with_role(SEGMENT_VALUE_ROLE),
            );

            if let Some(sub_label) = &segment.sub_label {
                scene.push(
                    RenderLayer::Text,
                    Primitive::text(
                        Point::new(center, bar_bottom + 16.0),
                        sub_label.as_str(),
                        TextDefinition::centered(11).with_color(Swatch::TextMuted.color()),
                    )
                    .with_role(SUB_LABEL_ROLE),
                );
            }
        }

        draw_scale(&mut scene, params, scale_y, x_of);

        if let Some(total) = top_bracket {
            let near = bar_y - LABEL_BAND - 6.0;
            draw_total_bracket(&mut scene, total, near, near - 12.0, near - 20.0, x_of(0.0), x_of(cumulative));
        }
        if let Some(total) = bottom_bracket {
            let near = below_scale + 4.0;
            draw_total_bracket(&mut scene, total, near, near + 12.0, near + 30.0, x_of(0.0), x_of(cumulative));
        }

        if let Some(annotation) = &params.annotation {
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(WIDTH / 2.0, below_scale + bracket_band + ANNOTATION_BAND / 2.0 + 4.0),
                    clean_value(annotation),
                    TextDefinition::centered(14)
                        .bold()
                        .with_color(Swatch::Blue.color()),
                )
                .with_role(ANNOTATION_ROLE),
            );
        }

        debug!(segments = params.segments.len(), total = cumulative; "Stacked bar laid out");
        Ok(scene)
    }
}

fn draw_scale(scene: &mut Scene, params: &StackedBarParams, scale_y: f32, x_of: impl Fn(f64) -> f32) {
    scene.push(
        RenderLayer::Axis,
        Primitive::line(
            Point::new(BAR_X, scale_y),
            Point::new(BAR_X + BAR_WIDTH, scale_y),
            StrokeDefinition::solid(Swatch::Border.color(), 1.0),
        ),
    );
    let tick = StrokeDefinition::solid(Swatch::TextSecondary.color(), 1.0);
    for percent in params.markers() {
        let x = x_of(percent);
        scene.push(
            RenderLayer::Axis,
            Primitive::line(Point::new(x, scale_y - 4.0), Point::new(x, scale_y + 4.0), tick.clone()),
        );
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                Point::new(x, scale_y + 18.0),
                format!("{}%", format_number(percent)),
                TextDefinition::centered(11).with_color(Swatch::TextMuted.color()),
            )
            .with_role(SCALE_MARKER_ROLE),
        );
    }
}

fn draw_total_bracket(
    scene: &mut Scene,
    total: &TotalValue,
    near_y: f32,
    far_y: f32,
    text_y: f32,
    start_x: f32,
    end_x: f32,
) {
    scene.push(
        RenderLayer::Marker,
        Primitive::polyline(
            vec![
                Point::new(start_x, near_y),
                Point::new(start_x, far_y),
                Point::new(end_x, far_y),
                Point::new(end_x, near_y),
            ],
            ShapeStyle::stroked(StrokeDefinition::solid(Swatch::TextSecondary.color(), 2.0)),
        ),
    );
    scene.push(
        RenderLayer::Text,
        Primitive::text(
            Point::new((start_x + end_x) / 2.0, text_y),
            total.text(),
            TextDefinition::centered(14)
                .bold()
                .with_color(Swatch::Blue.color()),
        )
        .with_role(TOTAL_ROLE),
    );
}
