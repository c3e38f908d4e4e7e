//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! shape store is the only shared mutable resource; the drawing session
//! lives in each client's signed cookie, so nothing per-client is kept here.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::services::store::ShapeStore;

/// Clone is required by Axum. The store is behind an `Arc` and `Key` is cheap.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ShapeStore>,
    /// Signs and verifies the session cookie.
    pub cookie_key: Key,
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn ShapeStore>, cookie_key: Key, cookie_secure: bool) -> Self {
        Self { store, cookie_key, cookie_secure }
    }
}

/// Lets `SignedCookieJar` find its key in the router state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

#[cfg(test)]
#[path = "state_helpers_test.rs"]
pub mod test_helpers;
