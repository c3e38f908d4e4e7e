//! Style projection: shapes to stacked CSS background layers.
//!
//! DESIGN
//! ======
//! Every shape becomes one gradient layer on a single element, so the whole
//! drawing is three parallel comma-joined lists: `background-image`,
//! `background-size` and `background-position`. Layer order follows the input
//! order (first layer paints on top).
//!
//! A submission that is still in flight can be overlaid on the persisted
//! shapes: `ADD_SHAPE` appends a transient shape, `MOVE_SHAPE` and
//! `RESIZE_SHAPE` replace the target's geometry. Values that fail to parse
//! fall back to the persisted geometry (or to the placement defaults), never
//! to zero. Projection is pure and cannot fail.

use serde::Serialize;

use super::{
    ColorStop, DEFAULT_COLOR, DEFAULT_HEIGHT, DEFAULT_OPACITY, DEFAULT_STOP, DEFAULT_WIDTH, DEFAULT_X, DEFAULT_Y,
    Shape, ShapeId, ShapeKind, Tool,
};
use crate::form::{self, ActionKind, FormFields};

/// Id carried by the transient shape of a pending `ADD_SHAPE`.
pub const PENDING_SHAPE_ID: ShapeId = -1;

const HIGHLIGHT_COLOR: &str = "hotpink";
const HIGHLIGHT_GROW: f64 = 5.0;
const LAYER_SEPARATOR: &str = ", ";

// =============================================================================
// PENDING SUBMISSION
// =============================================================================

/// Shape a pending submission points at.
///
/// Only `Shape` targets affect projection: they pick the layer a move or
/// resize overrides. `New` is informational. A pending `ADD_SHAPE` always
/// appends its transient layer whatever the target says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingTarget {
    /// Not persisted yet (`selected=new`).
    New,
    Shape(ShapeId),
}

/// In-flight form data used only for the optimistic preview.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingSubmission {
    pub action: Option<ActionKind>,
    pub target: Option<PendingTarget>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl PendingSubmission {
    /// Read the preview-relevant fields of a submission. Unparsable numbers
    /// become `None` so the projector can fall back.
    #[must_use]
    pub fn from_form(form: &FormFields) -> Self {
        let target = form.get(form::FIELD_SELECTED).and_then(|raw| {
            if raw == "new" {
                Some(PendingTarget::New)
            } else {
                form::parse_id(raw).map(PendingTarget::Shape)
            }
        });
        let number = |field: &str| form.get(field).and_then(form::parse_number);

        Self {
            action: form.action(),
            target,
            x: number(form::FIELD_X),
            y: number(form::FIELD_Y),
            width: number(form::FIELD_WIDTH),
            height: number(form::FIELD_HEIGHT),
        }
    }

    fn targets(&self, shape_id: ShapeId) -> bool {
        self.target == Some(PendingTarget::Shape(shape_id))
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

/// The three parallel layer lists for the drawing surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundStyle {
    pub background_image: String,
    pub background_size: String,
    pub background_position: String,
}

impl BackgroundStyle {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.background_image.is_empty()
    }

    /// Render as the body of an inline `style` attribute.
    #[must_use]
    pub fn to_style_attr(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!(
            "background-image: {}; background-size: {}; background-position: {};",
            self.background_image, self.background_size, self.background_position
        )
    }
}

/// Displayed position and size of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    fn of(shape: &Shape) -> Self {
        Self { x: shape.x, y: shape.y, width: shape.width, height: shape.height }
    }
}

// =============================================================================
// PROJECTION
// =============================================================================

/// Project `shapes` into background layers.
///
/// `pending` overlays an in-flight submission, `tool` is the session's active
/// tool (the kind of a pending placement), and `highlight` adds a selection
/// outline layer right after the matching shape.
#[must_use]
pub fn project(
    shapes: &[Shape],
    pending: Option<&PendingSubmission>,
    tool: Tool,
    highlight: Option<ShapeId>,
) -> BackgroundStyle {
    let placed = pending.and_then(|p| placed_shape(p, tool));

    let mut images = Vec::with_capacity(shapes.len() + 2);
    let mut sizes = Vec::with_capacity(shapes.len() + 2);
    let mut positions = Vec::with_capacity(shapes.len() + 2);

    for shape in shapes.iter().chain(placed.as_ref()) {
        let geometry = displayed_geometry(shape, pending);
        let direction = shape.direction_or_default();

        images.push(gradient(shape.kind, direction, &color_fragment(shape.kind, &shape.colors)));
        sizes.push(size_fragment(geometry));
        positions.push(position_fragment(geometry));

        if highlight == Some(shape.id) {
            let outline = Geometry {
                x: geometry.x - HIGHLIGHT_GROW / 2.0,
                y: geometry.y - HIGHLIGHT_GROW / 2.0,
                width: geometry.width + HIGHLIGHT_GROW,
                height: geometry.height + HIGHLIGHT_GROW,
            };
            images.push(gradient(shape.kind, direction, &highlight_fragment(shape.kind)));
            sizes.push(size_fragment(outline));
            positions.push(position_fragment(outline));
        }
    }

    BackgroundStyle {
        background_image: images.join(LAYER_SEPARATOR),
        background_size: sizes.join(LAYER_SEPARATOR),
        background_position: positions.join(LAYER_SEPARATOR),
    }
}

/// Transient shape for a pending `ADD_SHAPE`. The select tool places nothing.
fn placed_shape(pending: &PendingSubmission, tool: Tool) -> Option<Shape> {
    if pending.action != Some(ActionKind::AddShape) {
        return None;
    }
    let kind = tool.shape_kind()?;
    let gray = || ColorStop {
        id: PENDING_SHAPE_ID,
        shape_id: PENDING_SHAPE_ID,
        color: DEFAULT_COLOR.to_owned(),
        opacity: DEFAULT_OPACITY,
        stop: DEFAULT_STOP,
    };

    Some(Shape {
        id: PENDING_SHAPE_ID,
        kind,
        x: pending.x.unwrap_or(DEFAULT_X),
        y: pending.y.unwrap_or(DEFAULT_Y),
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        direction: None,
        colors: vec![gray(), gray()],
    })
}

/// Geometry to draw for `shape`, with a matching move/resize overlaid.
#[must_use]
pub fn displayed_geometry(shape: &Shape, pending: Option<&PendingSubmission>) -> Geometry {
    let base = Geometry::of(shape);
    let Some(pending) = pending.filter(|p| p.targets(shape.id)) else {
        return base;
    };

    match pending.action {
        Some(ActionKind::MoveShape) => Geometry {
            x: pending.x.unwrap_or(base.x),
            y: pending.y.unwrap_or(base.y),
            width: pending.width.unwrap_or(base.width),
            height: pending.height.unwrap_or(base.height),
        },
        Some(ActionKind::ResizeShape) => Geometry {
            width: pending.width.unwrap_or(base.width),
            height: pending.height.unwrap_or(base.height),
            ..base
        },
        _ => base,
    }
}

fn gradient(kind: ShapeKind, direction: f64, colors: &str) -> String {
    match kind {
        ShapeKind::Circle => format!("radial-gradient({colors})"),
        ShapeKind::Square => format!("linear-gradient({direction}deg, {colors})"),
    }
}

/// `color stop%` per stop in stored order. Circles get a hard transparent
/// edge at 50% so they don't fill their bounding square.
#[must_use]
pub fn color_fragment(kind: ShapeKind, colors: &[ColorStop]) -> String {
    let stops: Vec<String> = colors
        .iter()
        .map(|stop| format!("{} {}%", stop.color, stop.stop))
        .collect();
    with_circle_edge(kind, stops.join(LAYER_SEPARATOR))
}

fn highlight_fragment(kind: ShapeKind) -> String {
    with_circle_edge(kind, format!("{HIGHLIGHT_COLOR}, {HIGHLIGHT_COLOR}"))
}

fn with_circle_edge(kind: ShapeKind, mut colors: String) -> String {
    if kind == ShapeKind::Circle {
        if !colors.is_empty() {
            colors.push_str(LAYER_SEPARATOR);
        }
        colors.push_str("transparent 50%");
    }
    colors
}

fn size_fragment(geometry: Geometry) -> String {
    format!("{}px {}px", geometry.width, geometry.height)
}

fn position_fragment(geometry: Geometry) -> String {
    format!("{}px {}px", geometry.x, geometry.y)
}

#[cfg(test)]
#[path = "style_test.rs"]
mod tests;
