//! Drawing session stored in a signed cookie.
//!
//! ARCHITECTURE
//! ============
//! The session is a small value (`tool`, `selectedShape`, `hasJS`) that every
//! handler receives explicitly and every successful action replaces whole.
//! It never touches the shape store: the codec below turns it into a cookie
//! value (JSON, hex-encoded so it stays cookie-safe) and the signed jar adds
//! an HMAC so clients cannot forge a selection or tool.
//!
//! TRADE-OFFS
//! ==========
//! A cookie that fails verification or decoding is treated as absent rather
//! than as an error. The worst case is a reset to the default tool.

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use time::Duration;

use crate::drawing::{ShapeId, Tool};

pub const SESSION_COOKIE: &str = "DRAW_session";
const SESSION_MAX_AGE_DAYS: i64 = 30;

// =============================================================================
// TYPES
// =============================================================================

/// Per-client drawing session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawingSession {
    pub tool: Tool,
    #[serde(rename = "selectedShape", default, skip_serializing_if = "Option::is_none")]
    pub selected_shape: Option<ShapeId>,
    /// Whether the client runs script and drives placement itself.
    #[serde(rename = "hasJS", default, skip_serializing_if = "Option::is_none")]
    pub has_js: Option<bool>,
}

impl DrawingSession {
    #[must_use]
    pub fn script_assisted(&self) -> bool {
        self.has_js.unwrap_or(false)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

// =============================================================================
// CODEC
// =============================================================================

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        s.push(char::from(HEX_DIGITS[usize::from(b >> 4)]));
        s.push(char::from(HEX_DIGITS[usize::from(b & 0x0f)]));
    }
    s
}

pub(crate) fn hex_to_bytes(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| match u8::from_str_radix(&hex[i..i + 2], 16) {
            Ok(byte) => Some(byte),
            Err(_) => None,
        })
        .collect()
}

/// Encode a session as a cookie value.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn encode_session(session: &DrawingSession) -> Result<String, SessionError> {
    let json = serde_json::to_vec(session)?;
    Ok(bytes_to_hex(&json))
}

/// Decode a cookie value. Anything malformed decodes as `None`.
#[must_use]
pub fn decode_session(raw: &str) -> Option<DrawingSession> {
    let bytes = hex_to_bytes(raw)?;
    match serde_json::from_slice(&bytes) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::debug!(error = %e, "discarding undecodable session cookie");
            None
        }
    }
}

// =============================================================================
// COOKIE JAR
// =============================================================================

/// Derive the 64-byte signing key from a secret of any length.
#[must_use]
pub fn derive_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Verified session from the request cookies, if any.
#[must_use]
pub fn read_session(jar: &SignedCookieJar) -> Option<DrawingSession> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| decode_session(cookie.value()))
}

/// Add the signed session cookie to `jar`.
///
/// # Errors
///
/// Returns an error if the session cannot be encoded.
pub fn write_session(
    jar: SignedCookieJar,
    session: &DrawingSession,
    secure: bool,
) -> Result<SignedCookieJar, SessionError> {
    let value = encode_session(session)?;
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::days(SESSION_MAX_AGE_DAYS));
    Ok(jar.add(cookie))
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
