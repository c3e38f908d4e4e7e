//! Grepable error codes shared by the store and the action dispatcher.

/// Map an error value onto the stable code sent to clients.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}
