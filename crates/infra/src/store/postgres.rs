//! Postgres-backed product store.
//!
//! Queries are checked at runtime (no offline query cache), so the crate
//! builds without a database. Call [`PostgresProductStore::ensure_schema`]
//! once at startup.
//!
//! ## Ordering
//!
//! `list` orders by `(created_at, id)`. Ids are UUIDv7, so ties on the
//! timestamp still resolve in creation order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::instrument;
use uuid::Uuid;

use storefront_products::{FeaturedImage, Product, ProductAttributes, ProductId};

use super::r#trait::{ProductStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id             UUID PRIMARY KEY,
    name           TEXT NOT NULL,
    description    TEXT NOT NULL DEFAULT '',
    featured_image TEXT NULL,
    created_at     TIMESTAMPTZ NOT NULL,
    updated_at     TIMESTAMPTZ NOT NULL
)
"#;

/// Product store on a shared sqlx pool.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `products` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, featured_image, created_at, updated_at
            FROM products
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(|row| product_from_row("list", row)).collect()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, featured_image, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find", e))?;

        row.as_ref().map(|r| product_from_row("find", r)).transpose()
    }

    #[instrument(skip(self, attributes), err)]
    async fn insert(
        &self,
        attributes: ProductAttributes,
        now: DateTime<Utc>,
    ) -> Result<Product, StoreError> {
        let product = Product::new(ProductId::new(), attributes, now);

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, featured_image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.id_typed().as_uuid())
        .bind(product.name())
        .bind(product.description())
        .bind(product.featured_image().map(FeaturedImage::as_str))
        .bind(product.created_at())
        .bind(product.updated_at())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        Ok(product)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id_typed()), err)]
    async fn update(&self, product: &Product) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, featured_image = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(product.id_typed().as_uuid())
        .bind(product.name())
        .bind(product.description())
        .bind(product.featured_image().map(FeaturedImage::as_str))
        .bind(product.updated_at())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(product.id_typed()));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}

fn product_from_row(operation: &'static str, row: &PgRow) -> Result<Product, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error(operation, e);

    let id: Uuid = row.try_get("id").map_err(decode)?;
    let featured_image: Option<String> = row.try_get("featured_image").map_err(decode)?;
    let attributes = ProductAttributes {
        name: row.try_get("name").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        featured_image: featured_image.and_then(FeaturedImage::new),
    };

    Ok(Product::restore(
        ProductId::from_uuid(id),
        attributes,
        row.try_get("created_at").map_err(decode)?,
        row.try_get("updated_at").map_err(decode)?,
    ))
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    let message = match err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => format!("{} (code {})", db_err.message(), code),
            None => db_err.message().to_string(),
        },
        sqlx::Error::PoolClosed => "connection pool closed".to_string(),
        other => other.to_string(),
    };
    StoreError::Database { operation, message }
}
