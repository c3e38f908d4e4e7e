//! Shape store seam.
//!
//! DESIGN
//! ======
//! Route handlers and the dispatcher only see `dyn ShapeStore`. Postgres backs
//! it in production; an in-memory map backs it when no database is
//! configured and in tests.
//!
//! Every method is one logical write. `edit_shape` is a unit of work: the
//! geometry update and every color-stop update commit together or not at all.

use crate::drawing::{NewShape, Shape, ShapeId};
use crate::error::ErrorCode;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("shape not found: {0}")]
    NotFound(ShapeId),
    #[error("color stop {color_id} does not belong to shape {shape_id}")]
    ColorStopNotFound { shape_id: ShapeId, color_id: ShapeId },
    #[error("unknown shape kind in store: {0}")]
    UnknownKind(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_SHAPE_NOT_FOUND",
            Self::ColorStopNotFound { .. } => "E_COLOR_STOP_NOT_FOUND",
            Self::UnknownKind(_) => "E_UNKNOWN_KIND",
            Self::Database(_) => "E_DATABASE",
        }
    }
}

/// Sparse geometry update. Only present fields are written.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub direction: Option<f64>,
}

/// New color and stop for one existing color stop.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStopEdit {
    pub id: ShapeId,
    pub color: String,
    pub stop: i32,
}

/// Full edit of one shape, applied atomically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeEdit {
    pub geometry: GeometryUpdate,
    pub colors: Vec<ColorStopEdit>,
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Persistent shape collection. Enables swapping Postgres for memory in tests.
#[async_trait::async_trait]
pub trait ShapeStore: Send + Sync {
    /// All shapes, newest first, each with its color stops in insertion order.
    async fn list_shapes(&self) -> Result<Vec<Shape>, StoreError>;

    /// Insert a shape and its color stops, returning the stored record.
    async fn create_shape(&self, shape: &NewShape) -> Result<Shape, StoreError>;

    /// Apply a sparse geometry update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no shape has `id`.
    async fn update_geometry(&self, id: ShapeId, update: &GeometryUpdate) -> Result<(), StoreError>;

    /// Apply geometry and color-stop changes as one unit of work.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing shape and `ColorStopNotFound` when a
    /// stop id is not one of the shape's stops. Nothing is written in either case.
    async fn edit_shape(&self, id: ShapeId, edit: &ShapeEdit) -> Result<(), StoreError>;

    /// Delete one shape and its color stops.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no shape has `id`.
    async fn delete_shape(&self, id: ShapeId) -> Result<(), StoreError>;

    /// Delete every shape. Returns how many were removed.
    async fn clear(&self) -> Result<u64, StoreError>;
}
