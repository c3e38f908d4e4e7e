//! Action dispatcher: validate one form submission and apply it.
//!
//! DESIGN
//! ======
//! Each submission names one action. The dispatcher validates the fields that
//! action needs, performs exactly one logical write against the shape store,
//! and returns the next session. The session is always rebuilt from the
//! previous one, so `tool` and `hasJS` survive branches that do not mention
//! them.
//!
//! VALIDATION
//! ==========
//! One rule for every branch: a number is invalid when absent, unparsable or
//! non-finite. Zero is a valid coordinate and direction. Sizes must also be
//! positive. Failures are returned as values, never panics; store
//! infrastructure failures are logged here and surfaced as `StoreUnavailable`.

use serde::Serialize;
use tracing::{debug, error, info};

use super::session::DrawingSession;
use super::store::{ColorStopEdit, GeometryUpdate, ShapeEdit, ShapeStore, StoreError};
use crate::drawing::{DEFAULT_X, DEFAULT_Y, NewShape, ShapeId, ShapeKind, Tool};
use crate::error::ErrorCode;
use crate::form::{self, ActionKind, FormFields};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("no action submitted")]
    NoAction,
    #[error("no tool submitted")]
    NoTool,
    #[error("tool {tool} cannot be used here")]
    BadTool { tool: String },
    #[error("unknown action: {0}")]
    BadAction(String),
    #[error("invalid shape field: {field}")]
    BadShape { field: &'static str },
    #[error("invalid or missing shape selection")]
    BadSelection,
    #[error("failed to update shape {0}")]
    FailedUpdate(ShapeId),
    #[error("failed to delete shape {0}")]
    FailedDelete(ShapeId),
    #[error("shape store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ErrorCode for ActionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoAction => "NO_ACTION",
            Self::NoTool => "NO_TOOL",
            Self::BadTool { .. } => "BAD_TOOL",
            Self::BadAction(_) => "BAD_ACTION",
            Self::BadShape { .. } => "BAD_SHAPE",
            Self::BadSelection => "BAD_SELECTION",
            Self::FailedUpdate(_) => "FAILED_UPDATE",
            Self::FailedDelete(_) => "FAILED_DELETE",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }
}

impl ActionError {
    /// Offending field for `BAD_SHAPE`.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::BadShape { field } => Some(field),
            _ => None,
        }
    }

    #[must_use]
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            error: self.error_code(),
            field: self.field(),
            tool: match self {
                Self::BadTool { tool } => Some(tool.clone()),
                _ => None,
            },
        }
    }
}

/// Wire form of an [`ActionError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
}

fn store_unavailable(err: StoreError) -> ActionError {
    error!(error = %err, code = err.error_code(), "shape store failure");
    ActionError::StoreUnavailable(err.to_string())
}

fn update_failed(id: ShapeId, err: StoreError) -> ActionError {
    match err {
        StoreError::NotFound(_) | StoreError::ColorStopNotFound { .. } => {
            info!(shape = id, error = %err, code = err.error_code(), "shape update rejected");
            ActionError::FailedUpdate(id)
        }
        other => store_unavailable(other),
    }
}

// =============================================================================
// FIELD VALIDATION
// =============================================================================

fn required_number(form: &FormFields, field: &'static str) -> Result<f64, ActionError> {
    form.get(field)
        .and_then(form::parse_number)
        .ok_or(ActionError::BadShape { field })
}

fn required_size(form: &FormFields, field: &'static str) -> Result<f64, ActionError> {
    let value = required_number(form, field)?;
    if value <= 0.0 {
        return Err(ActionError::BadShape { field });
    }
    Ok(value)
}

fn optional_number(form: &FormFields, field: &'static str, default: f64) -> Result<f64, ActionError> {
    match form.get(field) {
        None => Ok(default),
        Some(raw) => form::parse_number(raw).ok_or(ActionError::BadShape { field }),
    }
}

fn selection(form: &FormFields, field: &str) -> Result<ShapeId, ActionError> {
    form.get(field)
        .and_then(form::parse_id)
        .ok_or(ActionError::BadSelection)
}

/// Turn the parallel `colors-id` / `colors` / `color-stops` fields into one
/// ordered list of edits. Lists of different lengths are rejected.
///
/// # Errors
///
/// Returns `BadShape` naming the first field that fails.
pub fn color_stop_edits(form: &FormFields) -> Result<Vec<ColorStopEdit>, ActionError> {
    let ids = form.get_all(form::FIELD_COLOR_IDS);
    let colors = form.get_all(form::FIELD_COLORS);
    let stops = form.get_all(form::FIELD_COLOR_STOPS);

    if ids.len() != colors.len() || ids.len() != stops.len() {
        return Err(ActionError::BadShape { field: form::FIELD_COLORS });
    }

    ids.into_iter()
        .zip(colors)
        .zip(stops)
        .map(|((id, color), stop)| {
            let id = form::parse_id(id).ok_or(ActionError::BadShape { field: form::FIELD_COLOR_IDS })?;
            if !form::is_css_color(color) {
                return Err(ActionError::BadShape { field: form::FIELD_COLORS });
            }
            let stop = form::parse_stop(stop).ok_or(ActionError::BadShape { field: form::FIELD_COLOR_STOPS })?;
            Ok(ColorStopEdit { id, color: color.to_owned(), stop })
        })
        .collect()
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Validate `form` and apply it, returning the session to persist.
///
/// `previous` is the verified cookie session, `None` on a first visit.
///
/// # Errors
///
/// Returns an [`ActionError`] describing the first validation or store
/// failure. Nothing is written when validation fails.
pub async fn dispatch(
    store: &dyn ShapeStore,
    previous: Option<&DrawingSession>,
    form: &FormFields,
) -> Result<DrawingSession, ActionError> {
    let session = previous.cloned().unwrap_or_default();

    let Some(raw_action) = form.get(form::FIELD_ACTION) else {
        return Err(ActionError::NoAction);
    };
    let Some(action) = ActionKind::parse(raw_action) else {
        return Err(ActionError::BadAction(raw_action.to_owned()));
    };
    debug!(action = action.as_str(), tool = session.tool.as_str(), "dispatching action");

    match action {
        ActionKind::HasJs => Ok(has_js(session, form)),
        ActionKind::PickTool => pick_tool(store, session, form).await,
        ActionKind::AddShape => add_shape(store, session, form).await,
        ActionKind::SelectShape => select_shape(session, form),
        ActionKind::EditShape => edit_shape(store, session, form).await,
        ActionKind::MoveShape => move_shape(store, session, form).await,
        ActionKind::ResizeShape => resize_shape(store, session, form).await,
        ActionKind::ClearSession => clear_session(store, session).await,
        ActionKind::RemoveShape => remove_shape(store, session, form).await,
    }
}

fn has_js(session: DrawingSession, form: &FormFields) -> DrawingSession {
    let has_js = form.get(form::FIELD_HAS_JS) == Some("true");
    DrawingSession { has_js: Some(has_js), ..session }
}

async fn create_default_shape(
    store: &dyn ShapeStore,
    kind: ShapeKind,
    x: f64,
    y: f64,
) -> Result<ShapeId, ActionError> {
    let shape = store
        .create_shape(&NewShape::with_defaults(kind, x, y))
        .await
        .map_err(store_unavailable)?;
    info!(shape = shape.id, kind = kind.as_str(), x, y, "shape created");
    Ok(shape.id)
}

async fn pick_tool(
    store: &dyn ShapeStore,
    session: DrawingSession,
    form: &FormFields,
) -> Result<DrawingSession, ActionError> {
    let raw = form.get(form::FIELD_TOOL).ok_or(ActionError::NoTool)?;
    let tool = Tool::parse(raw).ok_or_else(|| ActionError::BadTool { tool: raw.to_owned() })?;

    // Without script the client cannot place shapes by clicking, so picking a
    // drawing tool places one immediately.
    let selected_shape = match (tool.shape_kind(), session.script_assisted()) {
        (Some(kind), false) => Some(create_default_shape(store, kind, DEFAULT_X, DEFAULT_Y).await?),
        _ => None,
    };

    Ok(DrawingSession { tool, selected_shape, ..session })
}

/// Point clicked on the drawing surface, if the submission came from it.
/// Both coordinates must parse; a half-posted point is rejected.
fn click_point(form: &FormFields) -> Result<Option<(f64, f64)>, ActionError> {
    match (form.get(form::FIELD_CLICK_X), form.get(form::FIELD_CLICK_Y)) {
        (None, None) => Ok(None),
        (x, y) => {
            let x = x.and_then(form::parse_number).ok_or(ActionError::BadShape { field: form::FIELD_X })?;
            let y = y.and_then(form::parse_number).ok_or(ActionError::BadShape { field: form::FIELD_Y })?;
            Ok(Some((x, y)))
        }
    }
}

/// Place a shape of the session tool's kind. A click on the surface that
/// lands inside an existing shape selects the topmost one instead, whatever
/// the tool.
async fn add_shape(
    store: &dyn ShapeStore,
    session: DrawingSession,
    form: &FormFields,
) -> Result<DrawingSession, ActionError> {
    let click = click_point(form)?;
    if let Some((x, y)) = click {
        let shapes = store.list_shapes().await.map_err(store_unavailable)?;
        if let Some(hit) = shapes.iter().find(|shape| shape.contains(x, y)) {
            debug!(shape = hit.id, x, y, "click selected shape");
            return Ok(DrawingSession { selected_shape: Some(hit.id), ..session });
        }
    }

    let kind = session
        .tool
        .shape_kind()
        .ok_or_else(|| ActionError::BadTool { tool: session.tool.as_str().to_owned() })?;
    let (x, y) = match click {
        Some(point) => point,
        None => (
            optional_number(form, form::FIELD_X, DEFAULT_X)?,
            optional_number(form, form::FIELD_Y, DEFAULT_Y)?,
        ),
    };

    let id = create_default_shape(store, kind, x, y).await?;
    Ok(DrawingSession { selected_shape: Some(id), ..session })
}

fn select_shape(session: DrawingSession, form: &FormFields) -> Result<DrawingSession, ActionError> {
    let selected = selection(form, form::FIELD_SELECTED)?;
    Ok(DrawingSession { selected_shape: Some(selected), ..session })
}

async fn edit_shape(
    store: &dyn ShapeStore,
    session: DrawingSession,
    form: &FormFields,
) -> Result<DrawingSession, ActionError> {
    let selected = selection(form, form::FIELD_SELECTED)?;
    let width = required_size(form, form::FIELD_WIDTH)?;
    let height = required_size(form, form::FIELD_HEIGHT)?;
    let x = required_number(form, form::FIELD_X)?;
    let y = required_number(form, form::FIELD_Y)?;
    let direction = required_number(form, form::FIELD_DIRECTION)?;
    let colors = color_stop_edits(form)?;

    let edit = ShapeEdit {
        geometry: GeometryUpdate {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            direction: Some(direction),
        },
        colors,
    };
    store
        .edit_shape(selected, &edit)
        .await
        .map_err(|e| update_failed(selected, e))?;
    info!(shape = selected, stops = edit.colors.len(), "shape edited");

    Ok(session)
}

async fn move_shape(
    store: &dyn ShapeStore,
    session: DrawingSession,
    form: &FormFields,
) -> Result<DrawingSession, ActionError> {
    let selected = selection(form, form::FIELD_SELECTED)?;
    let width = required_size(form, form::FIELD_WIDTH)?;
    let height = required_size(form, form::FIELD_HEIGHT)?;
    let x = required_number(form, form::FIELD_X)?;
    let y = required_number(form, form::FIELD_Y)?;

    let update = GeometryUpdate { x: Some(x), y: Some(y), width: Some(width), height: Some(height), direction: None };
    store
        .update_geometry(selected, &update)
        .await
        .map_err(|e| update_failed(selected, e))?;
    debug!(shape = selected, x, y, width, height, "shape moved");

    Ok(session)
}

async fn resize_shape(
    store: &dyn ShapeStore,
    session: DrawingSession,
    form: &FormFields,
) -> Result<DrawingSession, ActionError> {
    let selected = selection(form, form::FIELD_SELECTED)?;
    let width = required_size(form, form::FIELD_WIDTH)?;
    let height = required_size(form, form::FIELD_HEIGHT)?;

    let update = GeometryUpdate { width: Some(width), height: Some(height), ..GeometryUpdate::default() };
    store
        .update_geometry(selected, &update)
        .await
        .map_err(|e| update_failed(selected, e))?;
    debug!(shape = selected, width, height, "shape resized");

    Ok(session)
}

async fn clear_session(store: &dyn ShapeStore, session: DrawingSession) -> Result<DrawingSession, ActionError> {
    let removed = store.clear().await.map_err(store_unavailable)?;
    info!(removed, "drawing cleared");
    Ok(DrawingSession { selected_shape: None, ..session })
}

async fn remove_shape(
    store: &dyn ShapeStore,
    session: DrawingSession,
    form: &FormFields,
) -> Result<DrawingSession, ActionError> {
    let id = selection(form, form::FIELD_SHAPE_ID)?;
    store.delete_shape(id).await.map_err(|e| match e {
        StoreError::NotFound(_) => {
            info!(shape = id, code = e.error_code(), "shape removal rejected");
            ActionError::FailedDelete(id)
        }
        other => store_unavailable(other),
    })?;
    info!(shape = id, "shape removed");

    let selected_shape = session.selected_shape.filter(|selected| *selected != id);
    Ok(DrawingSession { selected_shape, ..session })
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod tests;
