//! Set diagrams.
//!
//! One engine serves three tool names: `setVisualizer` picks its display
//! mode from the parameters, `setBox` and `setCircle` force theirs. Every
//! mode draws the roster notation at the top and the relationship and
//! membership lines at the bottom; `box` and `circle` add a region between
//! them with the element labels laid out inside.
//!
//! Each surface has its own overflow cap: the notation line shows 10
//! elements, the box grid 15 and the circle 8.

use log::debug;
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
use crate::{error::LessonVizError, notation, params::Label};

/// Role class of element labels inside a box or circle region.
pub const ELEMENT_ROLE: &str = "set-element";
/// Role class of the `...` marker drawn when a region overflows.
pub const OVERFLOW_ROLE: &str = "overflow-marker";
/// Role class of the roster notation line.
pub const NOTATION_ROLE: &str = "notation";
/// Role class of the `(empty set)` annotation.
pub const EMPTY_SET_ROLE: &str = "empty-set";
/// Role class of the `n(A) = k` line.
pub const CARDINALITY_ROLE: &str = "cardinality";
/// Role class of the set name drawn above a region.
pub const SET_NAME_ROLE: &str = "set-name";
/// Role class of relationship lines (`A ⊆ B`, ...).
pub const RELATIONSHIP_ROLE: &str = "relationship";
/// Role class of membership lines (`2 ∈ A`, ...).
pub const MEMBERSHIP_ROLE: &str = "membership";

const CANVAS_WIDTH: f32 = 400.0;
const LINE_HEIGHT: f32 = 22.0;
const HEADER_TOP: f32 = 12.0;
const FOOTER_GAP: f32 = 8.0;
const BOTTOM_PADDING: f32 = 10.0;

const BOX_REGION: Size = Size::new(400.0, 150.0);
const BOX_CONTAINER_TOP_LEFT: Point = Point::new(20.0, 25.0);
const BOX_CONTAINER_SIZE: Size = Size::new(360.0, 117.0);
const BOX_GRID_ORIGIN: Point = Point::new(60.0, 60.0);
const BOX_COLUMNS: usize = 5;
const BOX_PITCH: Size = Size::new(65.0, 25.0);
const BOX_CAP: usize = 15;
const BOX_OVERFLOW_POSITION: Point = Point::new(200.0, 132.0);

const CIRCLE_REGION: Size = Size::new(300.0, 200.0);
const CIRCLE_CENTER: Point = Point::new(150.0, 100.0);
const CIRCLE_OUTLINE_RADIUS: f32 = 80.0;
const CIRCLE_LABEL_RADIUS: f32 = 45.0;
const CIRCLE_CAP: usize = 8;
const CIRCLE_OVERFLOW_POSITION: Point = Point::new(150.0, 162.0);

/// How the elements of a set are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Notation lines only.
    #[default]
    List,
    /// Elements in a row-major grid inside a rectangle.
    Box,
    /// Elements evenly spaced inside a circle.
    Circle,
}

/// One `element ∈ A` / `element ∉ A` example.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipExample {
    element: Label,
    #[serde(default)]
    is_member: bool,
}

impl MembershipExample {
    pub fn new(element: impl Into<String>, is_member: bool) -> Self {
        Self {
            element: Label::new(element),
            is_member,
        }
    }
}

/// Parameters of the set diagram variants.
///
/// | Field | Default |
/// |-------|---------|
/// | `setName` | `"A"` |
/// | `elements` | `[]` |
/// | `displayMode` | `list` |
/// | `showCardinality` | `false` |
/// | `showBraces` | `true` |
/// | `color` | blue |
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetParams {
    set_name: String,
    elements: Vec<Label>,
    set_description: Option<String>,
    display_mode: DisplayMode,
    show_cardinality: bool,
    show_braces: bool,
    is_subset_of: Option<String>,
    is_equal_to: Option<String>,
    is_disjoint_from: Option<String>,
    membership_examples: Vec<MembershipExample>,
    color: Option<String>,
    highlight_color: Option<String>,
    caption: Option<String>,
}

impl Default for SetParams {
    fn default() -> Self {
        Self {
            set_name: "A".to_string(),
            elements: Vec::new(),
            set_description: None,
            display_mode: DisplayMode::default(),
            show_cardinality: false,
            show_braces: true,
            is_subset_of: None,
            is_equal_to: None,
            is_disjoint_from: None,
            membership_examples: Vec::new(),
            color: None,
            highlight_color: None,
            caption: None,
        }
    }
}

impl SetParams {
    /// Creates parameters for a named set with the given elements.
    pub fn new(set_name: impl Into<String>, elements: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            set_name: set_name.into(),
            elements: elements.into_iter().map(Label::new).collect(),
            ..Self::default()
        }
    }

    /// Returns these parameters with the display mode replaced.
    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.set_description = Some(description.into());
        self
    }

    pub fn with_cardinality(mut self, show: bool) -> Self {
        self.show_cardinality = show;
        self
    }

    pub fn with_braces(mut self, show: bool) -> Self {
        self.show_braces = show;
        self
    }

    pub fn with_subset_of(mut self, other: impl Into<String>) -> Self {
        self.is_subset_of = Some(other.into());
        self
    }

    pub fn with_equal_to(mut self, other: impl Into<String>) -> Self {
        self.is_equal_to = Some(other.into());
        self
    }

    pub fn with_disjoint_from(mut self, other: impl Into<String>) -> Self {
        self.is_disjoint_from = Some(other.into());
        self
    }

    pub fn with_membership(mut self, example: MembershipExample) -> Self {
        self.membership_examples.push(example);
        self
    }

    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    pub fn elements(&self) -> &[Label] {
        &self.elements
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }
}

/// Lays out set diagrams in all three display modes.
#[derive(Debug, Default)]
pub(crate) struct SetEngine;

impl LayoutEngine for SetEngine {
    type Params = SetParams;

    fn calculate(&self, params: &SetParams) -> Result<Scene, LessonVizError> {
        let name = params.set_name.as_str();
        let color = common::resolve_color(params.color.as_deref(), Swatch::Blue.color());

        let header = header_lines(params);
        let footer = footer_lines(params);

        let region = match params.display_mode {
            DisplayMode::List => Size::default(),
            DisplayMode::Box => BOX_REGION,
            DisplayMode::Circle => CIRCLE_REGION,
        };
        let header_height = HEADER_TOP + LINE_HEIGHT * header.len() as f32;
        let footer_height = if footer.is_empty() {
            0.0
        } else {
            FOOTER_GAP + LINE_HEIGHT * footer.len() as f32
        };
        let width = CANVAS_WIDTH.max(region.width());
        let height = header_height + region.height() + footer_height + BOTTOM_PADDING;

        let variant = match params.display_mode {
            DisplayMode::List => "setVisualizer",
            DisplayMode::Box => "setBox",
            DisplayMode::Circle => "setCircle",
        };
        let mut scene = Scene::new(variant, Size::new(width, height));

        for (index, (text, role, style)) in header.into_iter().enumerate() {
            let y = HEADER_TOP + LINE_HEIGHT * index as f32 + LINE_HEIGHT / 2.0;
            scene.push(
                RenderLayer::Text,
                Primitive::text(Point::new(width / 2.0, y), text, style).with_role(role),
            );
        }

        let region_origin = Point::new((width - region.width()) / 2.0, header_height);
        match params.display_mode {
            DisplayMode::List => {}
            DisplayMode::Box => {
                layout_box(&mut scene, params, region_origin, color);
            }
            DisplayMode::Circle => {
                layout_circle(&mut scene, params, region_origin, color);
            }
        }

        let footer_top = header_height + region.height() + FOOTER_GAP;
        for (index, (text, role)) in footer.into_iter().enumerate() {
            let y = footer_top + LINE_HEIGHT * index as f32 + LINE_HEIGHT / 2.0;
            let style = TextDefinition::centered(13)
                .with_color(Swatch::TextSecondary.color())
                .centered_vertically();
            scene.push(
                RenderLayer::Text,
                Primitive::text(Point::new(width / 2.0, y), text, style).with_role(role),
            );
        }

        debug!(
            set_name = name,
            elements = params.elements.len(),
            mode:? = params.display_mode;
            "Set diagram laid out"
        );
        Ok(scene)
    }
}

/// Text lines above the region: notation, then the optional empty-set and
/// cardinality lines.
fn header_lines(params: &SetParams) -> Vec<(String, &'static str, TextDefinition)> {
    let name = params.set_name.as_str();
    let mut lines = vec![(
        notation::roster(
            name,
            &params.elements,
            params.set_description.as_deref(),
            params.show_braces,
        ),
        NOTATION_ROLE,
        TextDefinition::centered(16)
            .bold()
            .with_color(Swatch::TextPrimary.color())
            .centered_vertically(),
    )];

    if params.elements.is_empty() && params.set_description.is_none() {
        lines.push((
            notation::EMPTY_SET_NOTE.to_string(),
            EMPTY_SET_ROLE,
            TextDefinition::centered(13)
                .italic()
                .with_color(Swatch::TextMuted.color())
                .centered_vertically(),
        ));
    }
    if params.show_cardinality {
        lines.push((
            notation::cardinality(name, params.elements.len()),
            CARDINALITY_ROLE,
            TextDefinition::centered(14)
                .with_color(Swatch::TextSecondary.color())
                .centered_vertically(),
        ));
    }
    lines
}

/// Text lines beneath the region: relationships, then membership examples.
fn footer_lines(params: &SetParams) -> Vec<(String, &'static str)> {
    let name = params.set_name.as_str();
    let relationships = notation::relationships(
        params.is_subset_of.as_deref(),
        params.is_equal_to.as_deref(),
        params.is_disjoint_from.as_deref(),
    );

    relationships
        .iter()
        .map(|relationship| (relationship.line(name), RELATIONSHIP_ROLE))
        .chain(params.membership_examples.iter().map(|example| {
            (
                notation::membership(name, example.element.as_str(), example.is_member),
                MEMBERSHIP_ROLE,
            )
        }))
        .collect()
}

fn region_fill(params: &SetParams, color: Color) -> Color {
    match params.highlight_color.as_deref() {
        Some(highlight) => common::resolve_color(Some(highlight), color).with_alpha(0.15),
        None => color.with_alpha(0.06),
    }
}

fn element_style() -> TextDefinition {
    TextDefinition::centered(14)
        .with_color(Swatch::TextPrimary.color())
        .centered_vertically()
}

fn overflow_marker(position: Point) -> Primitive {
    let style = TextDefinition::centered(14)
        .bold()
        .with_color(Swatch::TextMuted.color())
        .centered_vertically();
    Primitive::text(position, "...", style).with_role(OVERFLOW_ROLE)
}

fn set_name_label(position: Point, name: &str, color: Color) -> Primitive {
    let style = TextDefinition::centered(14)
        .bold()
        .with_color(color)
        .centered_vertically();
    Primitive::text(position, name, style).with_role(SET_NAME_ROLE)
}

fn layout_box(scene: &mut Scene, params: &SetParams, origin: Point, color: Color) {
    let container = Bounds::new_from_top_left(origin.add_point(BOX_CONTAINER_TOP_LEFT), BOX_CONTAINER_SIZE);
    scene.push(
        RenderLayer::Region,
        Primitive::rounded_rect(
            container,
            8.0,
            ShapeStyle::new(
                Some(region_fill(params, color)),
                Some(StrokeDefinition::solid(color, 2.0)),
            ),
        ),
    );
    scene.push(
        RenderLayer::Text,
        set_name_label(
            Point::new(container.center().x(), container.min_y() - 12.0),
            &params.set_name,
            color,
        ),
    );

    let grid_origin = origin.add_point(BOX_GRID_ORIGIN);
    scene.extend(
        RenderLayer::Text,
        params.elements.iter().take(BOX_CAP).enumerate().map(|(index, element)| {
            let position = common::grid_cell(grid_origin, index, BOX_COLUMNS, BOX_PITCH);
            Primitive::text(position, element.as_str(), element_style()).with_role(ELEMENT_ROLE)
        }),
    );

    if params.elements.len() > BOX_CAP {
        debug!(shown = BOX_CAP, total = params.elements.len(); "Truncating box layout");
        scene.push(
            RenderLayer::Text,
            overflow_marker(origin.add_point(BOX_OVERFLOW_POSITION)),
        );
    }
}

fn layout_circle(scene: &mut Scene, params: &SetParams, origin: Point, color: Color) {
    let center = origin.add_point(CIRCLE_CENTER);
    scene.push(
        RenderLayer::Region,
        Primitive::circle(
            center,
            CIRCLE_OUTLINE_RADIUS,
            ShapeStyle::new(
                Some(region_fill(params, color)),
                Some(StrokeDefinition::solid(color, 2.0)),
            ),
        ),
    );
    scene.push(
        RenderLayer::Text,
        set_name_label(
            Point::new(center.x(), center.y() - CIRCLE_OUTLINE_RADIUS - 10.0),
            &params.set_name,
            color,
        ),
    );

    let shown = params.elements.len().min(CIRCLE_CAP);
    scene.extend(
        RenderLayer::Text,
        params
            .elements
            .iter()
            .take(shown)
            .enumerate()
            .filter_map(|(index, element)| {
                common::circular_slot(center, CIRCLE_LABEL_RADIUS, index, shown).map(|position| {
                    Primitive::text(position, element.as_str(), element_style())
                        .with_role(ELEMENT_ROLE)
                })
            }),
    );

    if params.elements.len() > CIRCLE_CAP {
        debug!(shown = CIRCLE_CAP, total = params.elements.len(); "Truncating circle layout");
        scene.push(
            RenderLayer::Text,
            overflow_marker(origin.add_point(CIRCLE_OVERFLOW_POSITION)),
        );
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn numbered(count: usize) -> Vec<String> {
        (1..=count).map(|i| i.to_string()).collect()
    }

    fn element_positions(scene: &Scene) -> Vec<Point> {
        scene
            .primitives_with_role(ELEMENT_ROLE)
            .filter_map(Primitive::text_position)
            .collect()
    }

    #[test]
    fn test_box_layout_six_factors() {
        let params = SetParams::new("A", ["1", "2", "3", "4", "6", "12"]).with_display_mode(DisplayMode::Box);
        let scene = SetEngine.calculate(&params).unwrap();

        assert_eq!(scene.texts_with_role(NOTATION_ROLE), vec!["A = { 1, 2, 3, 4, 6, 12 }"]);
        assert_eq!(scene.texts_with_role(ELEMENT_ROLE), vec!["1", "2", "3", "4", "6", "12"]);
        assert!(scene.texts_with_role(OVERFLOW_ROLE).is_empty());

        let positions = element_positions(&scene);
        let origin = positions[0];
        for (index, position) in positions.iter().enumerate() {
            let expected = common::grid_cell(origin, index, BOX_COLUMNS, BOX_PITCH);
            assert_approx_eq!(f32, position.x(), expected.x());
            assert_approx_eq!(f32, position.y(), expected.y());
        }
        assert_approx_eq!(f32, positions[5].x(), origin.x());
        assert_approx_eq!(f32, positions[5].y(), origin.y() + 25.0);
    }

    #[test]
    fn test_box_layout_truncates_after_fifteen() {
        let params = SetParams::new("A", numbered(20)).with_display_mode(DisplayMode::Box);
        let scene = SetEngine.calculate(&params).unwrap();

        let labels = scene.texts_with_role(ELEMENT_ROLE);
        assert_eq!(labels.len(), 15);
        assert_eq!(labels, numbered(15).iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(scene.texts_with_role(OVERFLOW_ROLE), vec!["..."]);
    }

    #[test]
    fn test_box_layout_exactly_fifteen_has_no_marker() {
        let params = SetParams::new("A", numbered(15)).with_display_mode(DisplayMode::Box);
        let scene = SetEngine.calculate(&params).unwrap();
        assert_eq!(scene.texts_with_role(ELEMENT_ROLE).len(), 15);
        assert!(scene.texts_with_role(OVERFLOW_ROLE).is_empty());
    }

    #[test]
    fn test_box_layout_empty_set() {
        let params = SetParams::new("E", Vec::<String>::new()).with_display_mode(DisplayMode::Box);
        let scene = SetEngine.calculate(&params).unwrap();
        assert!(scene.texts_with_role(ELEMENT_ROLE).is_empty());
        assert_eq!(scene.texts_with_role(NOTATION_ROLE), vec!["E = { }"]);
        assert_eq!(scene.texts_with_role(EMPTY_SET_ROLE), vec!["(empty set)"]);
        assert_eq!(scene.size().height(), HEADER_TOP + 2.0 * LINE_HEIGHT + 150.0 + BOTTOM_PADDING);
    }

    #[test]
    fn test_box_region_is_400_by_150() {
        let params = SetParams::new("A", numbered(3)).with_display_mode(DisplayMode::Box);
        let scene = SetEngine.calculate(&params).unwrap();
        assert_approx_eq!(f32, scene.size().width(), 400.0);
        assert_approx_eq!(f32, scene.size().height(), HEADER_TOP + LINE_HEIGHT + 150.0 + BOTTOM_PADDING);
    }

    #[test]
    fn test_circle_layout_ten_elements() {
        let params = SetParams::new("A", vec!["x"; 10]).with_display_mode(DisplayMode::Circle);
        let scene = SetEngine.calculate(&params).unwrap();

        assert_eq!(scene.texts_with_role(ELEMENT_ROLE).len(), 8);
        assert_eq!(scene.texts_with_role(OVERFLOW_ROLE), vec!["..."]);

        let marker = scene
            .primitives_with_role(OVERFLOW_ROLE)
            .find_map(Primitive::text_position)
            .unwrap();
        let region_origin = Point::new(50.0, HEADER_TOP + LINE_HEIGHT);
        assert_eq!(marker, region_origin.add_point(CIRCLE_OVERFLOW_POSITION));

        let notation = scene.texts_with_role(NOTATION_ROLE)[0];
        assert!(!notation.contains("..."));
        assert_eq!(notation.matches('x').count(), 10);
    }

    #[test]
    fn test_circle_layout_even_angles() {
        let params = SetParams::new("A", numbered(5)).with_display_mode(DisplayMode::Circle);
        let scene = SetEngine.calculate(&params).unwrap();
        let center = Point::new(50.0, HEADER_TOP + LINE_HEIGHT).add_point(CIRCLE_CENTER);

        let angles: Vec<f32> = element_positions(&scene)
            .into_iter()
            .map(|position| {
                let offset = position.sub_point(center);
                assert_approx_eq!(f32, offset.hypot(), CIRCLE_LABEL_RADIUS, epsilon = 1e-3);
                offset.y().atan2(offset.x())
            })
            .collect();

        assert_approx_eq!(f32, angles[0], -std::f32::consts::FRAC_PI_2, epsilon = 1e-4);
        let expected_gap = std::f32::consts::TAU / 5.0;
        for pair in angles.windows(2) {
            let gap = (pair[1] - pair[0]).rem_euclid(std::f32::consts::TAU);
            assert_approx_eq!(f32, gap, expected_gap, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_circle_layout_empty_set() {
        let params = SetParams::new("A", Vec::<String>::new()).with_display_mode(DisplayMode::Circle);
        let scene = SetEngine.calculate(&params).unwrap();
        assert!(scene.texts_with_role(ELEMENT_ROLE).is_empty());
        assert!(scene.texts_with_role(OVERFLOW_ROLE).is_empty());
    }

    #[test]
    fn test_list_mode_has_no_region() {
        let params = SetParams::new("A", numbered(4));
        let scene = SetEngine.calculate(&params).unwrap();
        assert!(scene.items().iter().all(|(layer, _)| *layer == RenderLayer::Text));
        assert!(scene.texts_with_role(ELEMENT_ROLE).is_empty());
        assert_eq!(scene.variant(), "setVisualizer");
    }

    #[test]
    fn test_cardinality_counts_full_list() {
        let params = SetParams::new("A", numbered(12)).with_cardinality(true);
        let scene = SetEngine.calculate(&params).unwrap();
        assert_eq!(scene.texts_with_role(CARDINALITY_ROLE), vec!["n(A) = 12"]);
        assert!(scene.texts_with_role(NOTATION_ROLE)[0].ends_with("10, ... }"));
    }

    #[test]
    fn test_relationship_lines_in_fixed_order() {
        let params = SetParams::new("A", numbered(2))
            .with_disjoint_from("C")
            .with_subset_of("B");
        let scene = SetEngine.calculate(&params).unwrap();
        let lines = scene.texts_with_role(RELATIONSHIP_ROLE);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("A ⊆ B"));
        assert!(lines[1].starts_with("A ∩ C = ∅"));
    }

    #[test]
    fn test_membership_lines_keep_order_and_duplicates() {
        let params = SetParams::new("A", ["2", "4"])
            .with_membership(MembershipExample::new("3", false))
            .with_membership(MembershipExample::new("2", true))
            .with_membership(MembershipExample::new("3", true));
        let scene = SetEngine.calculate(&params).unwrap();
        let lines = scene.texts_with_role(MEMBERSHIP_ROLE);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("3 ∉ A"));
        assert!(lines[1].starts_with("2 ∈ A"));
        assert!(lines[2].starts_with("3 ∈ A"));
    }

    #[test]
    fn test_description_replaces_elements() {
        let params = SetParams::new("F", Vec::<String>::new()).with_description("factors of 12");
        let scene = SetEngine.calculate(&params).unwrap();
        assert_eq!(scene.texts_with_role(NOTATION_ROLE), vec!["F = { factors of 12 }"]);
        assert!(scene.texts_with_role(EMPTY_SET_ROLE).is_empty());
    }

    #[test]
    fn test_params_defaults_from_json() {
        let params: SetParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.set_name(), "A");
        assert!(params.elements().is_empty());
        assert_eq!(params.display_mode(), DisplayMode::List);
        assert!(params.show_braces);
        assert!(!params.show_cardinality);
    }

    #[test]
    fn test_params_accept_numeric_elements() {
        let params: SetParams =
            serde_json::from_str(r#"{"elements": [1, "2", 3.5], "displayMode": "circle"}"#).unwrap();
        let labels: Vec<&str> = params.elements().iter().map(Label::as_str).collect();
        assert_eq!(labels, vec!["1", "2", "3.5"]);
        assert_eq!(params.display_mode(), DisplayMode::Circle);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn elements_strategy(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z0-9]{1,3}", 0..max)
    }

    fn check_box_labels_follow_grid(elements: Vec<String>) -> Result<(), TestCaseError> {
        let params = SetParams::new("A", elements.clone()).with_display_mode(DisplayMode::Box);
        let scene = SetEngine.calculate(&params).map_err(|err| TestCaseError::fail(err.to_string()))?;

        let shown = elements.len().min(BOX_CAP);
        let labels = scene.texts_with_role(ELEMENT_ROLE);
        prop_assert_eq!(labels.len(), shown);
        for (label, element) in labels.iter().zip(&elements) {
            prop_assert_eq!(*label, element.as_str());
        }

        let origin = Point::new(0.0, HEADER_TOP + LINE_HEIGHT).add_point(BOX_GRID_ORIGIN);
        let positions: Vec<Point> = scene
            .primitives_with_role(ELEMENT_ROLE)
            .filter_map(Primitive::text_position)
            .collect();
        for (index, position) in positions.iter().enumerate() {
            prop_assert_eq!(*position, common::grid_cell(origin, index, BOX_COLUMNS, BOX_PITCH));
        }

        let markers = scene.texts_with_role(OVERFLOW_ROLE).len();
        prop_assert_eq!(markers, usize::from(elements.len() > BOX_CAP));
        Ok(())
    }

    fn check_circle_labels_capped(elements: Vec<String>) -> Result<(), TestCaseError> {
        let params = SetParams::new("A", elements.clone()).with_display_mode(DisplayMode::Circle);
        let scene = SetEngine.calculate(&params).map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert_eq!(scene.texts_with_role(ELEMENT_ROLE).len(), elements.len().min(CIRCLE_CAP));
        prop_assert_eq!(
            scene.texts_with_role(OVERFLOW_ROLE).len(),
            usize::from(elements.len() > CIRCLE_CAP)
        );
        Ok(())
    }

    fn check_render_is_idempotent(elements: Vec<String>, mode: DisplayMode) -> Result<(), TestCaseError> {
        let params = SetParams::new("A", elements).with_display_mode(mode);
        let first = SetEngine.calculate(&params).map_err(|err| TestCaseError::fail(err.to_string()))?;
        let second = SetEngine.calculate(&params).map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(first, second);
        Ok(())
    }

    fn mode_strategy() -> impl Strategy<Value = DisplayMode> {
        prop_oneof![
            Just(DisplayMode::List),
            Just(DisplayMode::Box),
            Just(DisplayMode::Circle),
        ]
    }

    proptest! {
        #[test]
        fn box_labels_follow_grid(elements in elements_strategy(40)) {
            check_box_labels_follow_grid(elements)?;
        }

        #[test]
        fn circle_labels_capped(elements in elements_strategy(30)) {
            check_circle_labels_capped(elements)?;
        }

        #[test]
        fn render_is_idempotent(elements in elements_strategy(25), mode in mode_strategy()) {
            check_render_is_idempotent(elements, mode)?;
        }
    }
}
