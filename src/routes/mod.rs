//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the HTML page, its form posts, the JSON mirror of
//! the same operations, and a health check. Requests are traced and
//! responses compressed at the router level.

pub mod drawing;
pub mod page;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(drawing::index).post(drawing::submit_form))
        .route("/api/drawing", get(drawing::drawing_data))
        .route("/api/action", post(drawing::submit_action))
        .route("/api/preview", post(drawing::preview))
        .route("/healthz", get(healthz))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
