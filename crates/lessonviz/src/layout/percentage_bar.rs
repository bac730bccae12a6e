//! Horizontal percentage bars.
//!
//! One or more bars share a single percentage scale. Each bar is a run of
//! segments; brackets mark a partial range, the total of some bars, or the
//! difference between two bars. Text placement inside a segment depends on
//! its drawn width, so narrow segments push their percentage beneath the bar
//! instead of overlapping the value.

use log::debug;
use serde::Deserialize;

use lessonviz_core::{
    color::Color,
    draw::{Primitive, RenderLayer, Scene, ShapeStyle, StrokeDefinition, TextAnchor, TextDefinition},
    geometry::{Bounds, Point, Size},
};

use super::{
    LayoutEngine,
    common::{self, Swatch},
};
use crate::{
    error::LessonVizError,
    params::{Label, clean_value, format_number},
    request::VariantTag,
};

pub const TITLE_ROLE: &str = "title";
pub const BAR_LABEL_ROLE: &str = "bar-label";
pub const BAR_TOTAL_ROLE: &str = "bar-total";
pub const SEGMENT_LABEL_ROLE: &str = "segment-label";
pub const SEGMENT_VALUE_ROLE: &str = "segment-value";
pub const SEGMENT_PERCENTAGE_ROLE: &str = "segment-percentage";
pub const SCALE_MARKER_ROLE: &str = "scale-marker";
pub const REFERENCE_LABEL_ROLE: &str = "reference-label";
pub const BRACKET_VALUE_ROLE: &str = "bracket-value";
pub const BRACKET_LABEL_ROLE: &str = "bracket-label";
pub const DIFFERENCE_VALUE_ROLE: &str = "difference-value";
pub const DIFFERENCE_LABEL_ROLE: &str = "difference-label";
pub const ANNOTATION_ROLE: &str = "annotation";

const WIDTH: f32 = 560.0;
const LABEL_WIDTH: f32 = 90.0;
const BAR_START_X: f32 = LABEL_WIDTH + 20.0;
const RIGHT_MARGIN: f32 = 30.0;
const RIGHT_MARGIN_WITH_TOTAL: f32 = 70.0;
const BAR_HEIGHT: f32 = 40.0;
const BAR_SPACING: f32 = 65.0;
const SCALE_BAND: f32 = 40.0;
const BRACKET_BAND: f32 = 30.0;
const BOTTOM_BRACKET_BAND: f32 = 35.0;
const TITLE_BAND: f32 = 30.0;
const ANNOTATION_BAND: f32 = 30.0;
const BASE_BOTTOM: f32 = 30.0;
const MARKER_MIN_GAP: f32 = 35.0;
const MARKER_STAGGER: f32 = -15.0;
const NARROW_SEGMENT: f32 = 70.0;
const VALUE_MIN_WIDTH: f32 = 25.0;
const LABEL_MIN_WIDTH: f32 = 30.0;
const BELOW_PERCENTAGE_MIN_WIDTH: f32 = 20.0;

fn default_true() -> bool {
    true
}

/// Vertical side of a bar a bracket is drawn on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalSide {
    Top,
    #[default]
    Bottom,
}

/// Horizontal side of the bars a total bracket is drawn on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalSide {
    #[default]
    Right,
    Left,
}

/// One segment of a bar.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarSegment {
    percentage: f64,
    #[serde(default)]
    value: Option<Label>,
    #[serde(default)]
    label: Option<Label>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    highlight: bool,
}

impl BarSegment {
    pub fn new(percentage: f64) -> Self {
        Self {
            percentage,
            value: None,
            label: None,
            color: None,
            highlight: false,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(Label::new(value));
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(Label::new(label));
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// The segment's share of the bar; negative shares count as zero.
    pub fn percentage(&self) -> f64 {
        self.percentage.max(0.0)
    }
}

/// One horizontal bar.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    #[serde(default)]
    label: Label,
    segments: Vec<BarSegment>,
    #[serde(default)]
    total_value: Option<Label>,
}

impl Bar {
    pub fn new(label: impl Into<String>, segments: Vec<BarSegment>) -> Self {
        Self {
            label: Label::new(label),
            segments,
            total_value: None,
        }
    }

    /// Sum of the segment percentages.
    pub fn total_percentage(&self) -> f64 {
        self.segments.iter().map(BarSegment::percentage).sum()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceLine {
    percentage: f64,
    #[serde(default)]
    label: Option<String>,
}

/// A bracket spanning part of one bar.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialBracket {
    bar_index: usize,
    from_percent: f64,
    to_percent: f64,
    value: Label,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    position: VerticalSide,
}

/// A bracket spanning the full height of one or more bars.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalBracket {
    bar_indices: Vec<usize>,
    value: Label,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    position: HorizontalSide,
}

/// A highlighted region showing how much longer one bar is than another.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferenceBracket {
    bar_indices: [usize; 2],
    value: Label,
    #[serde(default)]
    label: Option<String>,
}

/// Parameters of the `percentageBar` variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageBarParams {
    #[serde(default)]
    title: Option<String>,
    bars: Vec<Bar>,
    #[serde(default = "default_true")]
    show_percentage_scale: bool,
    #[serde(default)]
    percentage_markers: Option<Vec<f64>>,
    #[serde(default)]
    reference_line: Option<ReferenceLine>,
    #[serde(default)]
    partial_bracket: Option<PartialBracket>,
    #[serde(default)]
    partial_bracket2: Option<PartialBracket>,
    #[serde(default)]
    total_bracket: Option<TotalBracket>,
    #[serde(default)]
    difference_bracket: Option<DifferenceBracket>,
    #[serde(default = "default_true")]
    show_segment_percentages: bool,
    #[serde(default = "default_true")]
    show_segment_values: bool,
    #[serde(default)]
    annotation: Option<String>,
    #[serde(default)]
    caption: Option<String>,
}

impl PercentageBarParams {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self {
            title: None,
            bars,
            show_percentage_scale: true,
            percentage_markers: None,
            reference_line: None,
            partial_bracket: None,
            partial_bracket2: None,
            total_bracket: None,
            difference_bracket: None,
            show_segment_percentages: true,
            show_segment_values: true,
            annotation: None,
            caption: None,
        }
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// The scale maximum: the longest bar, and never less than 100.
    pub fn max_percentage(&self) -> f64 {
        self.bars
            .iter()
            .map(Bar::total_percentage)
            .fold(100.0, f64::max)
    }

    /// The percentages marked on the scale.
    ///
    /// Explicit markers are used as given. Otherwise the markers are 0, every
    /// rounded cumulative segment boundary, 100, and the scale maximum when it
    /// exceeds 100; sorted and without duplicates.
    pub fn markers(&self) -> Vec<f64> {
        if let Some(markers) = &self.percentage_markers {
            return markers.clone();
        }

        let mut markers = vec![0.0, 100.0];
        for bar in &self.bars {
            let mut cumulative = 0.0;
            for segment in &bar.segments {
                cumulative += segment.percentage();
                markers.push(round_half_up(cumulative));
            }
        }
        let max = self.max_percentage();
        if max > 100.0 {
            markers.push(max);
        }
        markers.sort_by(f64::total_cmp);
        markers.dedup();
        markers
    }

    fn has_bracket_on(&self, side: VerticalSide) -> bool {
        [&self.partial_bracket, &self.partial_bracket2]
            .into_iter()
            .flatten()
            .any(|bracket| bracket.position == side)
    }

    /// Returns `(longer bar index, shorter total, longer total)` of the
    /// difference bracket, when both of its bars exist.
    fn difference_span(&self) -> Option<(usize, f64, f64)> {
        let bracket = self.difference_bracket.as_ref()?;
        let [first, second] = bracket.bar_indices;
        let first_total = self.bars.get(first)?.total_percentage();
        let second_total = self.bars.get(second)?.total_percentage();
        let longer = if first_total > second_total { first } else { second };
        Some((
            longer,
            first_total.min(second_total),
            first_total.max(second_total),
        ))
    }
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Canvas measurements derived from the parameters.
#[derive(Debug, Clone, Copy)]
struct BarGeometry {
    px_per_percent: f32,
    bars_start_y: f32,
    scale_y: f32,
    height: f32,
}

impl BarGeometry {
    fn new(params: &PercentageBarParams) -> Self {
        let right_margin = if params.total_bracket.is_some() {
            RIGHT_MARGIN_WITH_TOTAL
        } else {
            RIGHT_MARGIN
        };
        let bar_max_width = WIDTH - BAR_START_X - right_margin;
        let px_per_percent = bar_max_width / params.max_percentage() as f32;

        let top_padding = band(params.show_percentage_scale, SCALE_BAND)
            + band(params.has_bracket_on(VerticalSide::Top), BRACKET_BAND)
            + band(params.title.is_some(), TITLE_BAND);
        let bottom_padding = band(params.has_bracket_on(VerticalSide::Bottom), BOTTOM_BRACKET_BAND)
            + band(params.annotation.is_some(), ANNOTATION_BAND);
        let height = top_padding + params.bars.len() as f32 * BAR_SPACING + bottom_padding + BASE_BOTTOM;

        Self {
            px_per_percent,
            bars_start_y: top_padding + 15.0,
            scale_y: if params.title.is_some() { 50.0 } else { 25.0 },
            height,
        }
    }

    fn x(&self, percent: f64) -> f32 {
        BAR_START_X + percent as f32 * self.px_per_percent
    }

    fn bar_y(&self, index: usize) -> f32 {
        self.bars_start_y + index as f32 * BAR_SPACING
    }
}

fn band(present: bool, size: f32) -> f32 {
    if present { size } else { 0.0 }
}

fn text(size: u16, color: Color) -> TextDefinition {
    TextDefinition::centered(size).with_color(color)
}

/// Returns the color of segment `index`: a palette name, else the default
/// cycle. CSS colors outside the palette are honored as well.
pub(crate) fn segment_color(index: usize, name: Option<&str>) -> Color {
    let cycled = Swatch::SEGMENT_CYCLE[index % Swatch::SEGMENT_CYCLE.len()].color();
    common::resolve_color(name, cycled)
}

#[derive(Debug, Default)]
pub(crate) struct PercentageBarEngine;

impl LayoutEngine for PercentageBarEngine {
    type Params = PercentageBarParams;

    fn calculate(&self, params: &PercentageBarParams) -> Result<Scene, LessonVizError> {
        if params.bars.is_empty() {
            return Err(LessonVizError::malformed(
                VariantTag::PercentageBar,
                "`bars` must contain at least one bar",
            ));
        }

        let geometry = BarGeometry::new(params);
        let mut scene = Scene::new("percentageBar", Size::new(WIDTH, geometry.height));

        if let Some(title) = &params.title {
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(WIDTH / 2.0, 22.0),
                    title.as_str(),
                    text(16, Swatch::TextPrimary.color()).bold(),
                )
                .with_role(TITLE_ROLE),
            );
        }

        if params.show_percentage_scale {
            draw_scale(&mut scene, params, &geometry);
        }
        if let Some(reference) = &params.reference_line {
            draw_reference_line(&mut scene, params, reference, &geometry);
        }
        for (index, bar) in params.bars.iter().enumerate() {
            draw_bar(&mut scene, params, bar, index, &geometry);
        }
        for bracket in [&params.partial_bracket, &params.partial_bracket2]
            .into_iter()
            .flatten()
        {
            draw_partial_bracket(&mut scene, params, bracket, &geometry);
        }
        if let Some(bracket) = &params.total_bracket {
            draw_total_bracket(&mut scene, params, bracket, &geometry);
        }
        draw_difference_bracket(&mut scene, params, &geometry);

        if let Some(annotation) = &params.annotation {
            let y = geometry.bar_y(params.bars.len()) + 10.0;
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(geometry.x(50.0), y),
                    clean_value(annotation),
                    text(14, Swatch::Blue.color()).bold(),
                )
                .with_role(ANNOTATION_ROLE),
            );
        }

        debug!(
            bars = params.bars.len(),
            max_percentage = params.max_percentage();
            "Percentage bars laid out"
        );
        Ok(scene)
    }
}

/// Computes the upward stagger of each marker label so close labels do not
/// overlap: a marker closer than the minimum gap to its predecessor
/// alternates between raised and level.
fn marker_offsets(positions: &[f32]) -> Vec<f32> {
    let mut offsets: Vec<f32> = Vec::with_capacity(positions.len());
    for (index, x) in positions.iter().enumerate() {
        let offset = match index.checked_sub(1) {
            Some(prev) if x - positions[prev] < MARKER_MIN_GAP => {
                if offsets[prev] == 0.0 { MARKER_STAGGER } else { 0.0 }
            }
            _ => 0.0,
        };
        offsets.push(offset);
    }
    offsets
}

fn draw_scale(scene: &mut Scene, params: &PercentageBarParams, geometry: &BarGeometry) {
    let scale_y = geometry.scale_y;
    scene.push(
        RenderLayer::Axis,
        Primitive::line(
            Point::new(BAR_START_X, scale_y),
            Point::new(geometry.x(params.max_percentage()), scale_y),
            StrokeDefinition::solid(Swatch::Border.color(), 1.0),
        ),
    );

    let markers = params.markers();
    let positions: Vec<f32> = markers.iter().map(|percent| geometry.x(*percent)).collect();
    let offsets = marker_offsets(&positions);
    let tick = StrokeDefinition::solid(Swatch::TextSecondary.color(), 1.0);

    for ((percent, x), offset) in markers.iter().zip(&positions).zip(&offsets) {
        scene.push(
            RenderLayer::Axis,
            Primitive::line(
                Point::new(*x, scale_y - 5.0),
                Point::new(*x, scale_y + 5.0),
                tick.clone(),
            ),
        );
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                Point::new(*x, scale_y - 10.0 + offset),
                format!("{}%", format_number(*percent)),
                text(12, Swatch::TextMuted.color()),
            )
            .with_role(SCALE_MARKER_ROLE),
        );
    }
}

fn draw_reference_line(
    scene: &mut Scene,
    params: &PercentageBarParams,
    reference: &ReferenceLine,
    geometry: &BarGeometry,
) {
    let x = geometry.x(reference.percentage);
    let top = geometry.bars_start_y - 5.0;
    let bottom = geometry.bar_y(params.bars.len() - 1) + BAR_HEIGHT + 10.0;
    scene.push(
        RenderLayer::Grid,
        Primitive::line(
            Point::new(x, top),
            Point::new(x, bottom),
            StrokeDefinition::patterned(Swatch::TextMuted.color(), 2.0, "6 4"),
        ),
    );
    if let Some(label) = &reference.label {
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                Point::new(x, bottom + 15.0),
                label.as_str(),
                text(12, Swatch::TextMuted.color()),
            )
            .with_role(REFERENCE_LABEL_ROLE),
        );
    }
}

fn draw_bar(scene: &mut Scene, params: &PercentageBarParams, bar: &Bar, bar_index: usize, geometry: &BarGeometry) {
    let y = geometry.bar_y(bar_index);
    let difference = params.difference_span();

    scene.push(
        RenderLayer::Text,
        Primitive::text(
            Point::new(LABEL_WIDTH, y + BAR_HEIGHT / 2.0 + 5.0),
            bar.label.as_str(),
            text(14, Swatch::TextPrimary.color()).with_anchor(TextAnchor::End),
        )
        .with_role(BAR_LABEL_ROLE),
    );

    let mut cumulative = 0.0;
    let mut x = BAR_START_X;
    for (seg_index, segment) in bar.segments.iter().enumerate() {
        if segment.percentage < 0.0 {
            debug!(
                bar_index,
                seg_index,
                percentage = segment.percentage;
                "Negative segment clamped to zero width"
            );
        }
        let width = segment.percentage() as f32 * geometry.px_per_percent;
        let color = segment_color(seg_index, segment.color.as_deref());
        let start_percent = cumulative;
        cumulative += segment.percentage();
        let seg_x = x;
        x += width;

        let covered = difference.is_some_and(|(longer, shorter, _)| {
            bar_index == longer && start_percent >= shorter - 0.01
        });

        let outline = if segment.highlight {
            StrokeDefinition::solid(Swatch::Red.color(), 3.0)
        } else {
            StrokeDefinition::solid(color, 2.0)
        };
        let bounds = Bounds::new_from_top_left(Point::new(seg_x, y), Size::new(width, BAR_HEIGHT));
        let corner = if seg_index == 0 { 4.0 } else { 0.0 };
        scene.push(
            RenderLayer::Content,
            Primitive::rounded_rect(
                bounds,
                corner,
                ShapeStyle::new(Some(color.with_alpha(0.21)), Some(outline)),
            ),
        );
        if seg_index > 0 {
            scene.push(
                RenderLayer::Marker,
                Primitive::line(
                    Point::new(seg_x, y),
                    Point::new(seg_x, y + BAR_HEIGHT),
                    StrokeDefinition::patterned(color, 1.0, "4 2"),
                ),
            );
        }

        let center_x = seg_x + width / 2.0;
        let narrow = width < NARROW_SEGMENT;
        let value = segment
            .value
            .as_ref()
            .filter(|_| params.show_segment_values);
        let has_percentage = params.show_segment_percentages;

        let value_inside = value.is_some() && width > VALUE_MIN_WIDTH && !covered;
        let percentage_inside = has_percentage && !narrow && !covered;

        if let Some(label) = segment.label.as_ref().filter(|_| width > LABEL_MIN_WIDTH) {
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(center_x, y - 6.0),
                    label.as_str(),
                    text(12, Swatch::TextSecondary.color()),
                )
                .with_role(SEGMENT_LABEL_ROLE),
            );
        }

        if let Some(value) = value.filter(|_| value_inside) {
            let value_y = if percentage_inside {
                y + BAR_HEIGHT / 2.0 - 3.0
            } else {
                y + BAR_HEIGHT / 2.0 + 5.0
            };
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(center_x, value_y),
                    clean_value(value.as_str()),
                    text(14, Swatch::TextPrimary.color()).bold(),
                )
                .with_role(SEGMENT_VALUE_ROLE),
            );
        }

        let percentage_text = format!("{}%", format_number(segment.percentage()));
        if percentage_inside {
            let percentage_y = if value_inside {
                y + BAR_HEIGHT / 2.0 + 12.0
            } else {
                y + BAR_HEIGHT / 2.0 + 5.0
            };
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(center_x, percentage_y),
                    percentage_text,
                    text(12, Swatch::TextMuted.color()),
                )
                .with_role(SEGMENT_PERCENTAGE_ROLE),
            );
        } else if has_percentage && narrow && width > BELOW_PERCENTAGE_MIN_WIDTH && !covered {
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(center_x, y + BAR_HEIGHT + 12.0),
                    percentage_text,
                    text(12, Swatch::TextMuted.color()),
                )
                .with_role(SEGMENT_PERCENTAGE_ROLE),
            );
        }
    }

    if let Some(total) = &bar.total_value {
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                Point::new(x + 10.0, y + BAR_HEIGHT / 2.0 + 5.0),
                clean_value(total.as_str()),
                text(14, Swatch::Blue.color()).bold().with_anchor(TextAnchor::Start),
            )
            .with_role(BAR_TOTAL_ROLE),
        );
    }
}

fn bracket_stroke(width: f32) -> ShapeStyle {
    ShapeStyle::stroked(StrokeDefinition::solid(Swatch::TextSecondary.color(), width))
}

fn draw_partial_bracket(
    scene: &mut Scene,
    params: &PercentageBarParams,
    bracket: &PartialBracket,
    geometry: &BarGeometry,
) {
    if bracket.bar_index >= params.bars.len() {
        debug!(bar_index = bracket.bar_index; "Skipping partial bracket for missing bar");
        return;
    }

    let y = geometry.bar_y(bracket.bar_index);
    let start_x = geometry.x(bracket.from_percent);
    let end_x = geometry.x(bracket.to_percent);
    let (near_y, far_y, label_y) = match bracket.position {
        VerticalSide::Top => (y - 8.0, y - 20.0, y - 28.0),
        VerticalSide::Bottom => (
            y + BAR_HEIGHT + 8.0,
            y + BAR_HEIGHT + 20.0,
            y + BAR_HEIGHT + 34.0,
        ),
    };

    scene.push(
        RenderLayer::Marker,
        Primitive::polyline(
            vec![
                Point::new(start_x, near_y),
                Point::new(start_x, far_y),
                Point::new(end_x, far_y),
                Point::new(end_x, near_y),
            ],
            bracket_stroke(1.5),
        ),
    );

    let center_x = (start_x + end_x) / 2.0;
    scene.push(
        RenderLayer::Text,
        Primitive::text(
            Point::new(center_x, label_y),
            clean_value(bracket.value.as_str()),
            text(14, Swatch::Blue.color()).bold(),
        )
        .with_role(BRACKET_VALUE_ROLE),
    );
    if let Some(label) = &bracket.label {
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                Point::new(center_x, label_y + 14.0),
                label.as_str(),
                text(12, Swatch::TextMuted.color()),
            )
            .with_role(BRACKET_LABEL_ROLE),
        );
    }
}

fn draw_total_bracket(
    scene: &mut Scene,
    params: &PercentageBarParams,
    bracket: &TotalBracket,
    geometry: &BarGeometry,
) {
    let selected: Option<Vec<&Bar>> = bracket
        .bar_indices
        .iter()
        .map(|index| params.bars.get(*index))
        .collect();
    let (Some(selected), Some(first), Some(last)) = (
        selected,
        bracket.bar_indices.iter().min(),
        bracket.bar_indices.iter().max(),
    ) else {
        debug!(indices:? = bracket.bar_indices; "Skipping total bracket");
        return;
    };

    let top = geometry.bar_y(*first);
    let bottom = geometry.bar_y(*last) + BAR_HEIGHT;
    let middle = (top + bottom) / 2.0;
    let longest = selected
        .iter()
        .map(|bar| bar.total_percentage())
        .fold(0.0, f64::max);
    let longest_width = longest as f32 * geometry.px_per_percent;

    let (x, bracket_x, direction) = match bracket.position {
        HorizontalSide::Left => (BAR_START_X - 15.0, BAR_START_X - 30.0, -1.0),
        HorizontalSide::Right => {
            let x = BAR_START_X + longest_width + 15.0;
            (x, x + 15.0, 1.0)
        }
    };

    scene.push(
        RenderLayer::Marker,
        Primitive::polyline(
            vec![
                Point::new(x, top),
                Point::new(bracket_x, top),
                Point::new(bracket_x, bottom),
                Point::new(x, bottom),
            ],
            bracket_stroke(2.0),
        ),
    );

    let value_x = bracket_x + 15.0 * direction;
    scene.push(
        RenderLayer::Text,
        Primitive::text(
            Point::new(value_x, middle),
            clean_value(bracket.value.as_str()),
            text(14, Swatch::Blue.color())
                .bold()
                .centered_vertically()
                .rotated(-90.0),
        )
        .with_role(BRACKET_VALUE_ROLE),
    );
    if let Some(label) = &bracket.label {
        let label_x = bracket_x + 30.0 * direction;
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                Point::new(label_x, middle),
                label.as_str(),
                text(12, Swatch::TextMuted.color())
                    .centered_vertically()
                    .rotated(-90.0),
            )
            .with_role(BRACKET_LABEL_ROLE),
        );
    }
}

fn draw_difference_bracket(scene: &mut Scene, params: &PercentageBarParams, geometry: &BarGeometry) {
    let Some(bracket) = &params.difference_bracket else {
        return;
    };
    let Some((longer, shorter, longest)) = params.difference_span() else {
        debug!(indices:? = bracket.bar_indices; "Skipping difference bracket for missing bar");
        return;
    };

    let y = geometry.bar_y(longer);
    let start_x = geometry.x(shorter);
    let end_x = geometry.x(longest);
    let red = Swatch::Red.color();

    scene.push(
        RenderLayer::Marker,
        Primitive::rect(
            Bounds::new_from_top_left(Point::new(start_x, y), Size::new(end_x - start_x, BAR_HEIGHT)),
            ShapeStyle::new(Some(red.with_alpha(0.15)), Some(StrokeDefinition::solid(red, 2.0))),
        ),
    );

    let center_x = (start_x + end_x) / 2.0;
    let value_shift = if bracket.label.is_some() { -5.0 } else { 5.0 };
    scene.push(
        RenderLayer::Text,
        Primitive::text(
            Point::new(center_x, y + BAR_HEIGHT / 2.0 + value_shift),
            clean_value(bracket.value.as_str()),
            text(14, red).bold(),
        )
        .with_role(DIFFERENCE_VALUE_ROLE),
    );
    if let Some(label) = &bracket.label {
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                Point::new(center_x, y + BAR_HEIGHT / 2.0 + 10.0),
                label.as_str(),
                text(12, red),
            )
            .with_role(DIFFERENCE_LABEL_ROLE),
        );
    }
}
