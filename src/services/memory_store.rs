//! In-memory shape store.
//!
//! Used when `DATABASE_URL` is unset and by tests. Shapes live in a
//! `BTreeMap` keyed by id so listing newest-first is a reverse walk. Ids are
//! handed out from counters starting at 1, matching a `BIGSERIAL` column.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use super::store::{GeometryUpdate, ShapeEdit, ShapeStore, StoreError};
use crate::drawing::{ColorStop, NewShape, Shape, ShapeId};

struct Shapes {
    by_id: BTreeMap<ShapeId, Shape>,
    next_shape_id: ShapeId,
    next_color_id: ShapeId,
}

pub struct MemoryShapeStore {
    inner: RwLock<Shapes>,
}

impl MemoryShapeStore {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: RwLock::new(Shapes { by_id: BTreeMap::new(), next_shape_id: 1, next_color_id: 1 }) }
    }
}

impl Default for MemoryShapeStore {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_geometry(shape: &mut Shape, update: &GeometryUpdate) {
    if let Some(x) = update.x {
        shape.x = x;
    }
    if let Some(y) = update.y {
        shape.y = y;
    }
    if let Some(width) = update.width {
        shape.width = width;
    }
    if let Some(height) = update.height {
        shape.height = height;
    }
    if let Some(direction) = update.direction {
        shape.direction = Some(direction);
    }
}

#[async_trait::async_trait]
impl ShapeStore for MemoryShapeStore {
    async fn list_shapes(&self) -> Result<Vec<Shape>, StoreError> {
        let shapes = self.inner.read().await;
        Ok(shapes.by_id.values().rev().cloned().collect())
    }

    async fn create_shape(&self, new: &NewShape) -> Result<Shape, StoreError> {
        let mut shapes = self.inner.write().await;
        let id = shapes.next_shape_id;
        shapes.next_shape_id += 1;

        let mut colors = Vec::with_capacity(new.colors.len());
        for stop in &new.colors {
            colors.push(ColorStop {
                id: shapes.next_color_id,
                shape_id: id,
                color: stop.color.clone(),
                opacity: stop.opacity,
                stop: stop.stop,
            });
            shapes.next_color_id += 1;
        }

        let shape = Shape {
            id,
            kind: new.kind,
            x: new.x,
            y: new.y,
            width: new.width,
            height: new.height,
            direction: new.direction,
            colors,
        };
        shapes.by_id.insert(id, shape.clone());
        Ok(shape)
    }

    async fn update_geometry(&self, id: ShapeId, update: &GeometryUpdate) -> Result<(), StoreError> {
        let mut shapes = self.inner.write().await;
        let shape = shapes.by_id.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        apply_geometry(shape, update);
        Ok(())
    }

    async fn edit_shape(&self, id: ShapeId, edit: &ShapeEdit) -> Result<(), StoreError> {
        let mut shapes = self.inner.write().await;
        let shape = shapes.by_id.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        // Validate every stop before touching anything.
        let mut targets = Vec::with_capacity(edit.colors.len());
        for change in &edit.colors {
            let index = shape
                .colors
                .iter()
                .position(|stop| stop.id == change.id)
                .ok_or(StoreError::ColorStopNotFound { shape_id: id, color_id: change.id })?;
            targets.push((index, change));
        }

        apply_geometry(shape, &edit.geometry);
        for (index, change) in targets {
            let stop = &mut shape.colors[index];
            stop.color.clone_from(&change.color);
            stop.stop = change.stop;
        }
        Ok(())
    }

    async fn delete_shape(&self, id: ShapeId) -> Result<(), StoreError> {
        let mut shapes = self.inner.write().await;
        shapes.by_id.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let mut shapes = self.inner.write().await;
        let removed = shapes.by_id.len() as u64;
        shapes.by_id.clear();
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "memory_store_test.rs"]
mod tests;
