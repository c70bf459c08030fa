use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use storefront_products::{Product, ProductAttributes, ProductId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing database rejected or failed an operation.
    #[error("database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// A row expected to exist was gone when written (concurrent delete).
    #[error("product {0} no longer exists")]
    Missing(ProductId),

    /// In-memory state was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Persistence collaborator for products.
///
/// Implementations must return [`ProductStore::list`] in creation order.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, oldest first.
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Persist a new product, assigning its identifier.
    async fn insert(
        &self,
        attributes: ProductAttributes,
        now: DateTime<Utc>,
    ) -> Result<Product, StoreError>;

    /// Overwrite the attributes and `updated_at` of an existing product.
    async fn update(&self, product: &Product) -> Result<(), StoreError>;

    /// Remove a product. Returns `false` if there was nothing to remove.
    async fn delete(&self, id: ProductId) -> Result<bool, StoreError>;
}

#[async_trait::async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list().await
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).find(id).await
    }

    async fn insert(
        &self,
        attributes: ProductAttributes,
        now: DateTime<Utc>,
    ) -> Result<Product, StoreError> {
        (**self).insert(attributes, now).await
    }

    async fn update(&self, product: &Product) -> Result<(), StoreError> {
        (**self).update(product).await
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }
}
