//! Drawing routes: the HTML page, its form posts, and the JSON mirror.
//!
//! DESIGN
//! ======
//! Both surfaces share one loader and one dispatcher call. The HTML flow
//! answers every post with a `303 See Other` so a reload never resubmits;
//! failures travel back as `?error=KIND&field=F` and render as a banner.
//! The JSON flow answers with the session or the error payload directly.

use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::page;
use crate::drawing::Shape;
use crate::drawing::style::{self, BackgroundStyle, PendingSubmission};
use crate::error::ErrorCode;
use crate::form::FormFields;
use crate::services::dispatch::{self, ActionError};
use crate::services::session::{self, DrawingSession};
use crate::services::store::{ShapeStore, StoreError};
use crate::state::AppState;

// =============================================================================
// LOADER
// =============================================================================

/// Everything the page needs to render one drawing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingData {
    pub session: DrawingSession,
    pub shapes: Vec<Shape>,
    pub selected_shape: Option<Shape>,
    pub style: BackgroundStyle,
}

/// Load shapes and project them. A selection pointing at a shape that no
/// longer exists is treated as no selection.
///
/// # Errors
///
/// Returns the store error if shapes cannot be listed.
pub async fn load_drawing(store: &dyn ShapeStore, session: DrawingSession) -> Result<DrawingData, StoreError> {
    let shapes = store.list_shapes().await?;
    let selected_shape = session
        .selected_shape
        .and_then(|id| shapes.iter().find(|shape| shape.id == id).cloned());
    let highlight = selected_shape.as_ref().map(|shape| shape.id);
    let style = style::project(&shapes, None, session.tool, highlight);

    Ok(DrawingData { session, shapes, selected_shape, style })
}

fn store_error_to_status(err: &StoreError) -> StatusCode {
    error!(error = %err, code = err.error_code(), "failed to load drawing");
    StatusCode::SERVICE_UNAVAILABLE
}

pub(crate) fn action_error_to_status(err: &ActionError) -> StatusCode {
    match err {
        ActionError::FailedUpdate(_) | ActionError::FailedDelete(_) => StatusCode::NOT_FOUND,
        ActionError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_REQUEST,
    }
}

/// Banner redirect target for a failed HTML form post.
pub(crate) fn error_location(err: &ActionError) -> String {
    let payload = err.payload();
    match payload.field {
        Some(field) => format!("/?error={}&field={field}", payload.error),
        None => format!("/?error={}", payload.error),
    }
}

fn write_cookie(jar: SignedCookieJar, next: &DrawingSession, secure: bool) -> Result<SignedCookieJar, StatusCode> {
    session::write_session(jar, next, secure).map_err(|e| {
        error!(error = %e, "failed to write session cookie");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct BannerQuery {
    pub error: Option<String>,
    pub field: Option<String>,
}

/// `GET /`: render the drawing page. A first visit gets the default session
/// cookie.
pub async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(banner): Query<BannerQuery>,
) -> Result<(SignedCookieJar, Html<String>), StatusCode> {
    let current = session::read_session(&jar);
    let jar = match current {
        Some(_) => jar,
        None => write_cookie(jar, &DrawingSession::default(), state.cookie_secure)?,
    };

    let data = load_drawing(state.store.as_ref(), current.unwrap_or_default())
        .await
        .map_err(|e| store_error_to_status(&e))?;
    let banner = page::banner_message(banner.error.as_deref(), banner.field.as_deref());

    Ok((jar, Html(page::render(&data, banner.as_deref()))))
}

/// `GET /api/drawing`: loader data as JSON.
pub async fn drawing_data(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<DrawingData>, StatusCode> {
    let current = session::read_session(&jar).unwrap_or_default();
    let data = load_drawing(state.store.as_ref(), current)
        .await
        .map_err(|e| store_error_to_status(&e))?;
    Ok(Json(data))
}

/// `POST /`: apply one form action, then redirect back to the page.
pub async fn submit_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let form = FormFields::new(pairs);
    let previous = session::read_session(&jar);

    match dispatch::dispatch(state.store.as_ref(), previous.as_ref(), &form).await {
        Ok(next) => match write_cookie(jar, &next, state.cookie_secure) {
            Ok(jar) => (jar, Redirect::to("/")).into_response(),
            Err(status) => status.into_response(),
        },
        Err(err) => {
            warn!(error = %err, code = err.payload().error, "form action rejected");
            Redirect::to(&error_location(&err)).into_response()
        }
    }
}

#[derive(Debug, Serialize)]
struct ActionResponse {
    session: DrawingSession,
}

/// `POST /api/action`: apply one form action and answer with JSON.
pub async fn submit_action(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let form = FormFields::new(pairs);
    let previous = session::read_session(&jar);

    match dispatch::dispatch(state.store.as_ref(), previous.as_ref(), &form).await {
        Ok(next) => match write_cookie(jar, &next, state.cookie_secure) {
            Ok(jar) => (jar, Json(ActionResponse { session: next })).into_response(),
            Err(status) => status.into_response(),
        },
        Err(err) => {
            warn!(error = %err, code = err.payload().error, "api action rejected");
            (action_error_to_status(&err), Json(err.payload())).into_response()
        }
    }
}

/// `POST /api/preview`: project a pending submission without writing.
pub async fn preview(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Json<BackgroundStyle>, StatusCode> {
    let current = session::read_session(&jar).unwrap_or_default();
    let pending = PendingSubmission::from_form(&FormFields::new(pairs));
    let shapes = state
        .store
        .list_shapes()
        .await
        .map_err(|e| store_error_to_status(&e))?;

    let highlight = current
        .selected_shape
        .filter(|id| shapes.iter().any(|shape| shape.id == *id));
    Ok(Json(style::project(&shapes, Some(&pending), current.tool, highlight)))
}

#[cfg(test)]
#[path = "drawing_test.rs"]
mod tests;
