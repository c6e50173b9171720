//! Postgres-backed item store.
//!
//! Items are kept as JSONB documents keyed by id:
//!
//! ```sql
//! CREATE TABLE items (id UUID PRIMARY KEY, doc JSONB NOT NULL, ...)
//! ```
//!
//! Partial updates are applied with the JSONB concatenation operator, so each
//! update is a single statement against one row.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};

use geoitems_core::{Item, ItemChanges, ItemId};

use super::r#trait::{ItemStore, StoreError};

#[derive(Clone)]
pub struct PostgresItemStore {
    pool: Arc<PgPool>,
}

impl PostgresItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(backend)?;
        Ok(Self::new(pool))
    }

    /// Create the items table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id UUID PRIMARY KEY,
                doc JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn decode(row: &sqlx::postgres::PgRow) -> Result<Item, StoreError> {
    let Json(item) = row
        .try_get::<Json<Item>, _>("doc")
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(item)
}

#[async_trait]
impl ItemStore for PostgresItemStore {
    #[instrument(skip_all, fields(id = %id), err)]
    async fn get(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query("SELECT doc FROM items WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(backend)?;

        row.as_ref().map(decode).transpose()
    }

    #[instrument(skip_all, fields(id = %item.id), err)]
    async fn put(&self, item: Item) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO items (id, doc)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(Json(&item))
        .execute(&*self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::DuplicateKey(item.id));
        }
        debug!("item inserted");
        Ok(())
    }

    #[instrument(skip_all, fields(id = %id), err)]
    async fn update(&self, id: &ItemId, changes: &ItemChanges) -> Result<Item, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE items
            SET doc = doc || $2, updated_at = NOW()
            WHERE id = $1
            RETURNING doc
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(changes))
        .fetch_optional(&*self.pool)
        .await
        .map_err(backend)?;

        match row {
            Some(row) => decode(&row),
            None => Err(StoreError::NotFound(*id)),
        }
    }

    #[instrument(skip_all, fields(id = %id), err)]
    async fn delete(&self, id: &ItemId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip_all, err)]
    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        let rows = sqlx::query("SELECT doc FROM items ORDER BY id")
            .fetch_all(&*self.pool)
            .await
            .map_err(backend)?;

        rows.iter().map(decode).collect()
    }
}
