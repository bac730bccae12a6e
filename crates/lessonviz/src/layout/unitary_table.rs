//! Unitary method tables.
//!
//! A two-column table pairs a percentage with a value per row. Each
//! operation links two rows with a curved arrow on both sides of the table,
//! labelled with the operation applied to that column (`÷ 7`, `× 20`).

use std::f32::consts::PI;

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
    params::{Label, clean_value},
    request::VariantTag,
};

pub const TITLE_ROLE: &str = "title";
pub const HEADER_ROLE: &str = "header";
pub const CELL_ROLE: &str = "cell";
pub const HIGHLIGHT_ROLE: &str = "highlight-row";
pub const OPERATION_ROLE: &str = "operation";
pub const ANNOTATION_ROLE: &str = "annotation";

const WIDTH: f32 = 480.0;
const COLUMN_WIDTH: f32 = 140.0;
const ROW_HEIGHT: f32 = 36.0;
const TABLE_X: f32 = (WIDTH - 2.0 * COLUMN_WIDTH) / 2.0;
const TOP_PADDING: f32 = 10.0;
const TITLE_BAND: f32 = 30.0;
const ANNOTATION_BAND: f32 = 30.0;
const BOTTOM_PADDING: f32 = 16.0;
const ARROW_GAP: f32 = 6.0;
const ARROW_BULGE: f32 = 26.0;
const ARROW_SAMPLES: usize = 12;

fn default_headers() -> [String; 2] {
    ["Percentage".to_string(), "Value".to_string()]
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableRow {
    percentage: Label,
    value: Label,
    #[serde(default)]
    highlight: bool,
}

impl TableRow {
    pub fn new(percentage: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            percentage: Label::new(percentage),
            value: Label::new(value),
            highlight: false,
        }
    }

    pub fn highlighted(mut self) -> Self {
        self.highlight = true;
        self
    }
}

/// The step applied to both columns between two rows.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOperation {
    from_row: usize,
    to_row: usize,
    left_op: Label,
    right_op: Label,
}

impl TableOperation {
    pub fn new(from_row: usize, to_row: usize, op: impl Into<String>) -> Self {
        let op = Label::new(op);
        Self {
            from_row,
            to_row,
            left_op: op.clone(),
            right_op: op,
        }
    }
}

/// Parameters of the `unitaryMethodTable` variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitaryTableParams {
    #[serde(default)]
    title: Option<String>,
    #[serde(default = "default_headers")]
    headers: [String; 2],
    rows: Vec<TableRow>,
    #[serde(default)]
    operations: Vec<TableOperation>,
    #[serde(default)]
    swap_columns: bool,
    #[serde(default)]
    annotation: Option<String>,
    #[serde(default)]
    caption: Option<String>,
}

impl UnitaryTableParams {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self {
            title: None,
            headers: default_headers(),
            rows,
            operations: Vec::new(),
            swap_columns: false,
            annotation: None,
            caption: None,
        }
    }

    pub fn with_operation(mut self, operation: TableOperation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn with_swapped_columns(mut self, swap: bool) -> Self {
        self.swap_columns = swap;
        self
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Returns the two cell texts of a row in display order.
    fn cells<'a>(&self, row: &'a TableRow) -> [&'a str; 2] {
        if self.swap_columns {
            [row.value.as_str(), row.percentage.as_str()]
        } else {
            [row.percentage.as_str(), row.value.as_str()]
        }
    }
}

/// Spells out the shorthand operators lesson content uses: `div 7` becomes
/// `÷ 7` and `x20` becomes `× 20`. Anything else is kept as written.
pub(crate) fn operator_text(op: &str) -> String {
    let op = op.trim();
    if let Some(rest) = op.strip_prefix("div") {
        return format!("÷ {}", rest.trim());
    }
    if let Some(rest) = op.strip_prefix(['x', '*']) {
        let rest = rest.trim_start();
        if rest.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            return format!("× {rest}");
        }
    }
    op.to_string()
}

/// Samples a curved arrow from `start` to `end` bowing sideways by `bulge`
/// (negative bows left). Returns the curve and its arrow head.
fn curved_arrow(start: Point, end: Point, bulge: f32) -> (Vec<Point>, Vec<Point>) {
    let curve: Vec<Point> = (0..=ARROW_SAMPLES)
        .map(|k| {
            let t = k as f32 / ARROW_SAMPLES as f32;
            Point::new(
                start.x() + bulge * (PI * t).sin(),
                start.y() + (end.y() - start.y()) * t,
            )
        })
        .collect();
    let before_tip = curve[curve.len() - 2];
    let direction = end.sub_point(before_tip);
    let head = common::arrow_head(end, direction.y().atan2(direction.x()), 8.0, 4.0);
    (curve, head)
}

#[derive(Debug, Default)]
pub(crate) struct UnitaryTableEngine;

impl LayoutEngine for UnitaryTableEngine {
    type Params = UnitaryTableParams;

    fn calculate(&self, params: &UnitaryTableParams) -> Result<Scene, LessonVizError> {
        if params.rows.is_empty() {
            return Err(LessonVizError::malformed(
                VariantTag::UnitaryMethodTable,
                "`rows` must contain at least one row",
            ));
        }

        let header_y = TOP_PADDING + if params.title.is_some() { TITLE_BAND } else { 0.0 };
        let table_bottom = header_y + ROW_HEIGHT * (params.rows.len() + 1) as f32;
        let annotation_band = if params.annotation.is_some() { ANNOTATION_BAND } else { 0.0 };
        let height = table_bottom + annotation_band + BOTTOM_PADDING;
        let mut scene = Scene::new("unitaryMethodTable", Size::new(WIDTH, height));

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

        let border = StrokeDefinition::solid(Swatch::Border.color(), 1.0);
        let header_cells = [params.headers[0].as_str(), params.headers[1].as_str()];
        draw_row(
            &mut scene,
            header_y,
            header_cells,
            Swatch::GridLine.color(),
            &border,
            HEADER_ROLE,
        );

        for (index, row) in params.rows.iter().enumerate() {
            let y = row_top(header_y, index);
            let fill = if row.highlight {
                Swatch::Yellow.color().with_alpha(0.3)
            } else {
                Color::rgb8(0xff, 0xff, 0xff)
            };
            if row.highlight {
                scene.push(
                    RenderLayer::Region,
                    Primitive::rect(
                        Bounds::new_from_top_left(
                            Point::new(TABLE_X, y),
                            Size::new(2.0 * COLUMN_WIDTH, ROW_HEIGHT),
                        ),
                        ShapeStyle::stroked(StrokeDefinition::solid(Swatch::Yellow.color(), 2.0)),
                    )
                    .with_role(HIGHLIGHT_ROLE),
                );
            }
            let cells = params.cells(row).map(clean_value);
            draw_row(
                &mut scene,
                y,
                [cells[0].as_str(), cells[1].as_str()],
                fill,
                &border,
                CELL_ROLE,
            );
        }

        for operation in &params.operations {
            if operation.from_row >= params.rows.len() || operation.to_row >= params.rows.len() {
                debug!(
                    from_row = operation.from_row,
                    to_row = operation.to_row;
                    "Skipping operation on missing row"
                );
                continue;
            }
            draw_operation(&mut scene, params, operation, header_y);
        }

        if let Some(annotation) = &params.annotation {
            scene.push(
                RenderLayer::Text,
                Primitive::text(
                    Point::new(WIDTH / 2.0, table_bottom + ANNOTATION_BAND / 2.0 + 5.0),
                    clean_value(annotation),
                    TextDefinition::centered(14)
                        .bold()
                        .with_color(Swatch::Blue.color()),
                )
                .with_role(ANNOTATION_ROLE),
            );
        }

        debug!(rows = params.rows.len(), operations = params.operations.len(); "Unitary table laid out");
        Ok(scene)
    }
}

fn row_top(header_y: f32, index: usize) -> f32 {
    header_y + ROW_HEIGHT * (index + 1) as f32
}

fn draw_row(
    scene: &mut Scene,
    y: f32,
    cells: [&str; 2],
    fill: Color,
    border: &StrokeDefinition,
    role: &'static str,
) {
    let bold = role != CELL_ROLE;
    for (column, text) in cells.into_iter().enumerate() {
        let x = TABLE_X + COLUMN_WIDTH * column as f32;
        scene.push(
            RenderLayer::Content,
            Primitive::rect(
                Bounds::new_from_top_left(Point::new(x, y), Size::new(COLUMN_WIDTH, ROW_HEIGHT)),
                ShapeStyle::filled(fill).with_stroke(border.clone()),
            ),
        );
        let mut style = TextDefinition::centered(14)
            .with_color(Swatch::TextPrimary.color())
            .centered_vertically();
        if bold {
            style = style.bold();
        }
        scene.push(
            RenderLayer::Text,
            Primitive::text(Point::new(x + COLUMN_WIDTH / 2.0, y + ROW_HEIGHT / 2.0), text, style)
                .with_role(role),
        );
    }
}

fn draw_operation(scene: &mut Scene, params: &UnitaryTableParams, operation: &TableOperation, header_y: f32) {
    let from_y = row_top(header_y, operation.from_row) + ROW_HEIGHT / 2.0;
    let to_y = row_top(header_y, operation.to_row) + ROW_HEIGHT / 2.0;
    let middle_y = (from_y + to_y) / 2.0;
    let left_x = TABLE_X - ARROW_GAP;
    let right_x = TABLE_X + 2.0 * COLUMN_WIDTH + ARROW_GAP;

    let (left_op, right_op) = if params.swap_columns {
        (&operation.right_op, &operation.left_op)
    } else {
        (&operation.left_op, &operation.right_op)
    };

    let sides = [
        (left_x, -ARROW_BULGE, left_op, TextAnchor::End),
        (right_x, ARROW_BULGE, right_op, TextAnchor::Start),
    ];
    let color = Swatch::Orange.color();
    for (x, bulge, op, anchor) in sides {
        let (curve, head) = curved_arrow(Point::new(x, from_y), Point::new(x, to_y), bulge);
        scene.push(
            RenderLayer::Marker,
            Primitive::polyline(curve, ShapeStyle::stroked(StrokeDefinition::solid(color, 2.0))),
        );
        scene.push(RenderLayer::Marker, Primitive::polygon(head, ShapeStyle::filled(color)));

        let label_x = x + bulge + bulge.signum() * 6.0;
        scene.push(
            RenderLayer::Text,
            Primitive::text(
                Point::new(label_x, middle_y),
                operator_text(op.as_str()),
                TextDefinition::centered(13)
                    .bold()
                    .with_color(color)
                    .with_anchor(anchor)
                    .centered_vertically(),
            )
            .with_role(OPERATION_ROLE),
        );
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use serde_json::json;

    use super::*;

    fn audience() -> UnitaryTableParams {
        serde_json::from_value(json!({
            "title": "Finding the Total Audience",
            "rows": [
                {"percentage": "35%", "value": "70"},
                {"percentage": "5%", "value": "10"},
                {"percentage": "100%", "value": "200", "highlight": true}
            ],
            "operations": [
                {"fromRow": 0, "toRow": 1, "leftOp": "div 7", "rightOp": "div 7"},
                {"fromRow": 1, "toRow": 2, "leftOp": "x20", "rightOp": "x20"}
            ],
            "annotation": "There were 200 people at the concert."
        }))
        .unwrap()
    }

    #[test]
    fn test_table_cells_in_row_order() {
        let scene = UnitaryTableEngine.calculate(&audience()).unwrap();
        assert_eq!(scene.texts_with_role(HEADER_ROLE), vec!["Percentage", "Value"]);
        assert_eq!(
            scene.texts_with_role(CELL_ROLE),
            vec!["35%", "70", "5%", "10", "100%", "200"]
        );
        assert_eq!(scene.primitives_with_role(HIGHLIGHT_ROLE).count(), 1);
    }

    #[test]
    fn test_operations_label_both_sides() {
        let scene = UnitaryTableEngine.calculate(&audience()).unwrap();
        assert_eq!(
            scene.texts_with_role(OPERATION_ROLE),
            vec!["÷ 7", "÷ 7", "× 20", "× 20"]
        );
    }

    #[test]
    fn test_swapped_columns() {
        let params = UnitaryTableParams::new(vec![TableRow::new("100%", "280")]).with_swapped_columns(true);
        let scene = UnitaryTableEngine.calculate(&params).unwrap();
        assert_eq!(scene.texts_with_role(CELL_ROLE), vec!["280", "100%"]);
    }

    #[test]
    fn test_operation_on_missing_row_skipped() {
        let params = UnitaryTableParams::new(vec![TableRow::new("10%", "5"), TableRow::new("100%", "50")])
            .with_operation(TableOperation::new(0, 1, "x10"))
            .with_operation(TableOperation::new(1, 4, "x2"));
        let scene = UnitaryTableEngine.calculate(&params).unwrap();
        assert_eq!(scene.texts_with_role(OPERATION_ROLE), vec!["× 10", "× 10"]);
    }

    #[test]
    fn test_canvas_height() {
        let params = UnitaryTableParams::new(vec![TableRow::new("10%", "5").highlighted()]);
        let scene = UnitaryTableEngine.calculate(&params).unwrap();
        assert_approx_eq!(f32, scene.size().height(), TOP_PADDING + 2.0 * ROW_HEIGHT + BOTTOM_PADDING);
    }

    #[test]
    fn test_operator_text() {
        assert_eq!(operator_text("div 4"), "÷ 4");
        assert_eq!(operator_text("x3"), "× 3");
        assert_eq!(operator_text("x 1.5"), "× 1.5");
        assert_eq!(operator_text("+ 10"), "+ 10");
        assert_eq!(operator_text("xyz"), "xyz");
    }

    #[test]
    fn test_curved_arrow_ends_at_target() {
        let (curve, head) = curved_arrow(Point::new(100.0, 50.0), Point::new(100.0, 120.0), -26.0);
        assert_eq!(curve.len(), ARROW_SAMPLES + 1);
        let last = curve[curve.len() - 1];
        assert_approx_eq!(f32, last.y(), 120.0);
        assert_approx_eq!(f32, last.x(), 100.0, epsilon = 1e-4);
        assert!(curve.iter().all(|point| point.x() <= 100.0 + 1e-4));
        assert_eq!(head.len(), 3);
    }

    #[test]
    fn test_default_headers() {
        let params: UnitaryTableParams =
            serde_json::from_value(json!({"rows": [{"percentage": 10, "value": 5}]})).unwrap();
        assert_eq!(params.headers, default_headers());
    }
}
