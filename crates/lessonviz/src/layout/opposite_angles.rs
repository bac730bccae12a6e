//! Two intersecting lines and the four angles they form.
//!
//! Angles are numbered counter-clockwise from the ray pointing right:
//! `0` and `2` are one vertically opposite pair, `1` and `3` the other.

use std::f32::consts::PI;

use log::debug;
use serde::Deserialize;

use lessonviz_core::{
    color::Color,
    draw::{Primitive, RenderLayer, Scene, ShapeStyle, StrokeDefinition, TextDefinition},
    geometry::{Point, Size},
};

use super::{LayoutEngine, common::Swatch};
use crate::{
    error::LessonVizError,
    params::{Label, format_number},
    request::VariantTag,
};

pub const ANGLE_LABEL_ROLE: &str = "angle-label";
pub const ANGLE_ARC_ROLE: &str = "angle-arc";

const WIDTH: f32 = 320.0;
const HEIGHT: f32 = 260.0;
const RAY_LENGTH: f32 = 120.0;
const ARC_RADIUS: f32 = 28.0;
const LABEL_RADIUS: f32 = 50.0;
const DEFAULT_ANGLE: f64 = 60.0;
const LETTERS: [&str; 4] = ["a", "b", "c", "d"];

/// Parameters of the `verticallyOppositeAngles` variant.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OppositeAnglesParams {
    angles: Vec<Option<f64>>,
    labels: Vec<Option<Label>>,
    highlight: Option<usize>,
    caption: Option<String>,
}

impl OppositeAnglesParams {
    pub fn new(angles: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self {
            angles: angles.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.labels = labels.into_iter().map(|label| Some(Label::new(label))).collect();
        self
    }

    pub fn with_highlight(mut self, index: usize) -> Self {
        self.highlight = Some(index);
        self
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// The angle between the rightward ray and the next ray counter-clockwise,
    /// in degrees.
    ///
    /// Taken from the first given angle. An angle given at an odd position is
    /// the supplement of the reference angle.
    pub fn reference_angle(&self) -> f64 {
        self.angles
            .iter()
            .take(4)
            .enumerate()
            .find_map(|(index, angle)| angle.map(|value| (index, value)))
            .map_or(DEFAULT_ANGLE, |(index, value)| {
                if index % 2 == 0 { value } else { 180.0 - value }
            })
    }

    fn label(&self, index: usize) -> String {
        if let Some(Some(label)) = self.labels.get(index) {
            return label.to_string();
        }
        match self.angles.get(index).copied().flatten() {
            Some(value) => format!("{}°", format_number(value)),
            None => LETTERS[index].to_string(),
        }
    }
}

/// Returns the angle vertically opposite `index`.
pub fn opposite(index: usize) -> usize {
    (index + 2) % 4
}

#[derive(Debug, Default)]
pub(crate) struct OppositeAnglesEngine;

impl LayoutEngine for OppositeAnglesEngine {
    type Params = OppositeAnglesParams;

    fn calculate(&self, params: &OppositeAnglesParams) -> Result<Scene, LessonVizError> {
        let theta = params.reference_angle();
        if !(theta > 0.0 && theta < 180.0) {
            return Err(LessonVizError::malformed(
                VariantTag::VerticallyOppositeAngles,
                format!("angle must lie strictly between 0 and 180, got {}", format_number(theta)),
            ));
        }
        if params.angles.len() > 4 {
            debug!(given = params.angles.len(); "Only four angles are drawn");
        }

        let center = Point::new(WIDTH / 2.0, HEIGHT / 2.0);
        let theta = (theta as f32).to_radians();
        // Ray directions, counter-clockwise on screen.
        let rays = [0.0, theta, PI, PI + theta];

        let mut scene = Scene::new("verticallyOppositeAngles", Size::new(WIDTH, HEIGHT));
        let line_stroke = StrokeDefinition::solid(Swatch::TextPrimary.color(), 2.5).with_round_cap();
        for ray in [rays[0], rays[1]] {
            scene.push(
                RenderLayer::Content,
                Primitive::line(
                    Point::polar(center, RAY_LENGTH, -ray),
                    Point::polar(center, RAY_LENGTH, -(ray + PI)),
                    line_stroke.clone(),
                ),
            );
        }

        let highlighted = params.highlight.filter(|index| *index < 4);
        for index in 0..4 {
            let start = rays[index];
            let end = if index == 3 { 2.0 * PI } else { rays[index + 1] };
            let in_pair = highlighted.is_some_and(|h| h == index || opposite(h) == index);
            let (color, fill) = if in_pair {
                let color = Swatch::Orange.color();
                (color, Some(color.with_alpha(0.25)))
            } else {
                (Swatch::TextMuted.color(), None)
            };

            scene.push(
                RenderLayer::Region,
                Primitive::arc(
                    center,
                    ARC_RADIUS,
                    -start,
                    -end,
                    ShapeStyle::new(fill, Some(StrokeDefinition::solid(color, 2.0))),
                )
                .with_role(ANGLE_ARC_ROLE),
            );

            let bisector = (start + end) / 2.0;
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::polar(center, LABEL_RADIUS, -bisector),
                    params.label(index),
                    TextDefinition::centered(14)
                        .bold()
                        .with_color(if in_pair { color } else { Swatch::TextPrimary.color() })
                        .centered_vertically(),
                )
                .with_role(ANGLE_LABEL_ROLE),
            );
        }

        scene.push(
            RenderLayer::Marker,
            Primitive::circle(center, 4.0, ShapeStyle::filled(Color::rgb8(0x1f, 0x29, 0x37))),
        );

        debug!(theta_degrees = params.reference_angle(), highlight:? = highlighted; "Opposite angles laid out");
        Ok(scene)
    }
}
