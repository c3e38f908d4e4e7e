//! Postgres shape store.
//!
//! DESIGN
//! ======
//! `shapes` holds geometry, `colors` holds the gradient stops with
//! `ON DELETE CASCADE`, so deleting a shape (or clearing the table) takes its
//! stops along. Multi-row writes run inside one transaction; returning early
//! with `?` drops the transaction, which rolls it back.

use std::collections::HashMap;

use sqlx::PgPool;

use super::store::{GeometryUpdate, ShapeEdit, ShapeStore, StoreError};
use crate::drawing::{ColorStop, NewShape, Shape, ShapeId, ShapeKind};

type ShapeRow = (ShapeId, String, f64, f64, f64, f64, Option<f64>);
type ColorRow = (ShapeId, ShapeId, String, f64, i32);

const UPDATE_GEOMETRY_SQL: &str = "UPDATE shapes
     SET x = COALESCE($2, x),
         y = COALESCE($3, y),
         width = COALESCE($4, width),
         height = COALESCE($5, height),
         direction = COALESCE($6, direction)
     WHERE id = $1";

pub struct PgShapeStore {
    pool: PgPool,
}

impl PgShapeStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn color_from_row((id, shape_id, color, opacity, stop): ColorRow) -> ColorStop {
    ColorStop { id, shape_id, color, opacity, stop }
}

fn shape_from_row(row: ShapeRow, colors: Vec<ColorStop>) -> Result<Shape, StoreError> {
    let (id, kind, x, y, width, height, direction) = row;
    let kind = ShapeKind::parse(&kind).ok_or(StoreError::UnknownKind(kind))?;
    Ok(Shape { id, kind, x, y, width, height, direction, colors })
}

#[async_trait::async_trait]
impl ShapeStore for PgShapeStore {
    async fn list_shapes(&self) -> Result<Vec<Shape>, StoreError> {
        let shape_rows = sqlx::query_as::<_, ShapeRow>(
            "SELECT id, kind, x, y, width, height, direction FROM shapes ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let color_rows = sqlx::query_as::<_, ColorRow>(
            "SELECT id, shape_id, color, opacity, stop FROM colors ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut colors_by_shape: HashMap<ShapeId, Vec<ColorStop>> = HashMap::new();
        for row in color_rows {
            let stop = color_from_row(row);
            colors_by_shape.entry(stop.shape_id).or_default().push(stop);
        }

        shape_rows
            .into_iter()
            .map(|row| {
                let colors = colors_by_shape.remove(&row.0).unwrap_or_default();
                shape_from_row(row, colors)
            })
            .collect()
    }

    async fn create_shape(&self, new: &NewShape) -> Result<Shape, StoreError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, ShapeId>(
            "INSERT INTO shapes (kind, x, y, width, height, direction)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(new.kind.as_str())
        .bind(new.x)
        .bind(new.y)
        .bind(new.width)
        .bind(new.height)
        .bind(new.direction)
        .fetch_one(tx.as_mut())
        .await?;

        let mut colors = Vec::with_capacity(new.colors.len());
        for stop in &new.colors {
            let color_id = sqlx::query_scalar::<_, ShapeId>(
                "INSERT INTO colors (shape_id, color, opacity, stop) VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(id)
            .bind(&stop.color)
            .bind(stop.opacity)
            .bind(stop.stop)
            .fetch_one(tx.as_mut())
            .await?;
            colors.push(ColorStop {
                id: color_id,
                shape_id: id,
                color: stop.color.clone(),
                opacity: stop.opacity,
                stop: stop.stop,
            });
        }

        tx.commit().await?;

        Ok(Shape {
            id,
            kind: new.kind,
            x: new.x,
            y: new.y,
            width: new.width,
            height: new.height,
            direction: new.direction,
            colors,
        })
    }

    async fn update_geometry(&self, id: ShapeId, update: &GeometryUpdate) -> Result<(), StoreError> {
        let result = sqlx::query(UPDATE_GEOMETRY_SQL)
            .bind(id)
            .bind(update.x)
            .bind(update.y)
            .bind(update.width)
            .bind(update.height)
            .bind(update.direction)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn edit_shape(&self, id: ShapeId, edit: &ShapeEdit) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let geometry = &edit.geometry;
        let result = sqlx::query(UPDATE_GEOMETRY_SQL)
            .bind(id)
            .bind(geometry.x)
            .bind(geometry.y)
            .bind(geometry.width)
            .bind(geometry.height)
            .bind(geometry.direction)
            .execute(tx.as_mut())
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        for change in &edit.colors {
            let result = sqlx::query("UPDATE colors SET color = $3, stop = $4 WHERE id = $1 AND shape_id = $2")
                .bind(change.id)
                .bind(id)
                .bind(&change.color)
                .bind(change.stop)
                .execute(tx.as_mut())
                .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::ColorStopNotFound { shape_id: id, color_id: change.id });
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_shape(&self, id: ShapeId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM shapes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM shapes").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[path = "pg_store_test.rs"]
mod tests;
