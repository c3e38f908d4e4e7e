//! Submitted form data and the field parsers shared by the projector and the
//! dispatcher.
//!
//! DESIGN
//! ======
//! HTML forms may repeat a field name (`colors`, `color-stops`, `colors-id`),
//! so the body is kept as ordered `(name, value)` pairs instead of a map.
//! Blank values count as absent: an emptied number input submits `""`.
//!
//! The parsers here only answer "does this parse". What a failed parse means
//! is up to the caller: the projector falls back to persisted geometry, the
//! dispatcher rejects the action.

use crate::drawing::ShapeId;

// =============================================================================
// FIELD NAMES
// =============================================================================

pub const FIELD_ACTION: &str = "action";
pub const FIELD_TOOL: &str = "tool";
pub const FIELD_SELECTED: &str = "selected";
pub const FIELD_SHAPE_ID: &str = "shapeId";
pub const FIELD_HAS_JS: &str = "has_js";
pub const FIELD_X: &str = "x";
pub const FIELD_Y: &str = "y";
pub const FIELD_WIDTH: &str = "width";
pub const FIELD_HEIGHT: &str = "height";
pub const FIELD_DIRECTION: &str = "direction";
pub const FIELD_COLORS: &str = "colors";
pub const FIELD_COLOR_STOPS: &str = "color-stops";
pub const FIELD_COLOR_IDS: &str = "colors-id";
/// Click point posted by the drawing surface's `<input type="image" name="at">`.
pub const FIELD_CLICK_X: &str = "at.x";
pub const FIELD_CLICK_Y: &str = "at.y";

// =============================================================================
// ACTIONS
// =============================================================================

/// Value of the `action` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    PickTool,
    AddShape,
    SelectShape,
    EditShape,
    MoveShape,
    ResizeShape,
    ClearSession,
    RemoveShape,
    HasJs,
}

impl ActionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PickTool => "PICK_TOOL",
            Self::AddShape => "ADD_SHAPE",
            Self::SelectShape => "SELECT_SHAPE",
            Self::EditShape => "EDIT_SHAPE",
            Self::MoveShape => "MOVE_SHAPE",
            Self::ResizeShape => "RESIZE_SHAPE",
            Self::ClearSession => "CLEAR_SESSION",
            Self::RemoveShape => "REMOVE_SHAPE",
            Self::HasJs => "HAS_JS",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PICK_TOOL" => Some(Self::PickTool),
            "ADD_SHAPE" => Some(Self::AddShape),
            "SELECT_SHAPE" => Some(Self::SelectShape),
            "EDIT_SHAPE" => Some(Self::EditShape),
            "MOVE_SHAPE" => Some(Self::MoveShape),
            "RESIZE_SHAPE" => Some(Self::ResizeShape),
            "CLEAR_SESSION" => Some(Self::ClearSession),
            "REMOVE_SHAPE" => Some(Self::RemoveShape),
            "HAS_JS" => Some(Self::HasJs),
            _ => None,
        }
    }
}

// =============================================================================
// FORM FIELDS
// =============================================================================

/// Ordered, possibly repeated form fields from one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    #[must_use]
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First non-blank value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.trim())
            .find(|value| !value.is_empty())
    }

    /// Every value submitted under `name`, in submission order, blanks included.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.trim())
            .collect()
    }

    /// Parsed `action` field. `None` when absent or unrecognized.
    #[must_use]
    pub fn action(&self) -> Option<ActionKind> {
        self.get(FIELD_ACTION).and_then(ActionKind::parse)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// =============================================================================
// PARSERS
// =============================================================================

/// Parse a finite number. NaN and infinities are rejected.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Parse a shape or color-stop id.
#[must_use]
pub fn parse_id(raw: &str) -> Option<ShapeId> {
    match raw.trim().parse::<ShapeId>() {
        Ok(id) if id > 0 => Some(id),
        _ => None,
    }
}

/// Parse a gradient stop percentage in `0..=100`.
#[must_use]
pub fn parse_stop(raw: &str) -> Option<i32> {
    match raw.trim().parse::<i32>() {
        Ok(stop) if (0..=100).contains(&stop) => Some(stop),
        _ => None,
    }
}

const MAX_COLOR_LEN: usize = 64;

/// Color functions accepted in functional notation.
const COLOR_FUNCTIONS: &[&str] = &["rgb", "rgba", "hsl", "hsla", "hwb", "lab", "lch", "oklab", "oklch", "color"];

/// Accept a color that splices into a gradient as exactly one color stop:
/// a hex color (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), a bare name, or a
/// single color function call like `rgb(1, 2, 3)`. Commas are only allowed
/// inside the call's parentheses, so a value can never end the gradient or
/// start another layer.
#[must_use]
pub fn is_css_color(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > MAX_COLOR_LEN {
        return false;
    }
    if let Some(hex) = raw.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    let Some((name, rest)) = raw.split_once('(') else {
        return raw.chars().all(|c| c.is_ascii_alphabetic());
    };
    let Some(args) = rest.strip_suffix(')') else {
        return false;
    };
    COLOR_FUNCTIONS.contains(&name.to_ascii_lowercase().as_str())
        && !args.trim().is_empty()
        && args
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ',' | '.' | '%' | ' ' | '-' | '+' | '/'))
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;
