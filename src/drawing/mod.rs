//! Drawing model: shapes, their color stops, and the tools that create them.
//!
//! DESIGN
//! ======
//! A shape is a circle or a square rendered as one CSS gradient layer on the
//! drawing surface. Its gradient is described by an ordered list of color
//! stops. Every new shape starts from the same two-stop gray gradient and is
//! edited from there.

pub mod style;

use serde::{Deserialize, Serialize};

/// Server-assigned shape or color-stop identifier.
pub type ShapeId = i64;

pub const DEFAULT_X: f64 = 50.0;
pub const DEFAULT_Y: f64 = 50.0;
pub const DEFAULT_WIDTH: f64 = 50.0;
pub const DEFAULT_HEIGHT: f64 = 50.0;
pub const DEFAULT_DIRECTION: f64 = 90.0;
pub const DEFAULT_COLOR: &str = "#c4c4c4";
pub const DEFAULT_OPACITY: f64 = 1.0;
pub const DEFAULT_STOP: i32 = 50;

// =============================================================================
// KINDS AND TOOLS
// =============================================================================

/// Persisted shape type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShapeKind {
    Circle,
    Square,
}

impl ShapeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "CIRCLE",
            Self::Square => "SQUARE",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "CIRCLE" => Some(Self::Circle),
            "SQUARE" => Some(Self::Square),
            _ => None,
        }
    }
}

/// Active interaction mode. Drawing tools map onto a shape kind; `Select`
/// only picks existing shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tool {
    Circle,
    Square,
    #[default]
    Select,
}

impl Tool {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "CIRCLE",
            Self::Square => "SQUARE",
            Self::Select => "SELECT",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "CIRCLE" => Some(Self::Circle),
            "SQUARE" => Some(Self::Square),
            "SELECT" => Some(Self::Select),
            _ => None,
        }
    }

    /// Shape kind placed by this tool, `None` for `Select`.
    #[must_use]
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Self::Circle => Some(ShapeKind::Circle),
            Self::Square => Some(ShapeKind::Square),
            Self::Select => None,
        }
    }
}

// =============================================================================
// SHAPES
// =============================================================================

/// One `{color, stop%}` entry of a shape's gradient. Mirrors the `colors` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorStop {
    pub id: ShapeId,
    pub shape_id: ShapeId,
    pub color: String,
    /// Persisted but not used when rendering.
    pub opacity: f64,
    /// Position along the gradient, 0-100.
    pub stop: i32,
}

/// A persisted shape with its color stops. Mirrors the `shapes` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Gradient angle in degrees. Only squares use it.
    pub direction: Option<f64>,
    pub colors: Vec<ColorStop>,
}

impl Shape {
    #[must_use]
    pub fn direction_or_default(&self) -> f64 {
        self.direction.unwrap_or(DEFAULT_DIRECTION)
    }

    /// Whether `(x, y)` falls strictly inside the bounding box. Edges miss.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.x && x < self.x + self.width && y > self.y && y < self.y + self.height
    }
}

/// Color stop of a shape that has not been inserted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewColorStop {
    pub color: String,
    pub opacity: f64,
    pub stop: i32,
}

impl NewColorStop {
    #[must_use]
    pub fn default_gray() -> Self {
        Self { color: DEFAULT_COLOR.to_owned(), opacity: DEFAULT_OPACITY, stop: DEFAULT_STOP }
    }
}

/// Insert payload for the shape store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShape {
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub direction: Option<f64>,
    pub colors: Vec<NewColorStop>,
}

impl NewShape {
    /// A 50x50 shape at `(x, y)` with the two-stop gray gradient.
    #[must_use]
    pub fn with_defaults(kind: ShapeKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            direction: None,
            colors: vec![NewColorStop::default_gray(), NewColorStop::default_gray()],
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
