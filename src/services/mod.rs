//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the drawing rules and persistence so route handlers
//! stay focused on protocol translation and cookie plumbing.

pub mod dispatch;
pub mod memory_store;
pub mod pg_store;
pub mod session;
pub mod store;
