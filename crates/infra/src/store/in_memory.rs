use std::sync::RwLock;

use chrono::{DateTime, Utc};

use storefront_core::Entity;
use storefront_products::{Product, ProductAttributes, ProductId};

use super::r#trait::{ProductStore, StoreError};

/// In-memory product store.
///
/// Intended for tests/dev. Products are kept in insertion order, which is
/// the order `list` returns.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(|_| StoreError::Poisoned)?;
        Ok(products.clone())
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(|_| StoreError::Poisoned)?;
        Ok(products.iter().find(|p| p.id() == id).cloned())
    }

    async fn insert(
        &self,
        attributes: ProductAttributes,
        now: DateTime<Utc>,
    ) -> Result<Product, StoreError> {
        let product = Product::new(ProductId::new(), attributes, now);
        let mut products = self.products.write().map_err(|_| StoreError::Poisoned)?;
        products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, product: &Product) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(|_| StoreError::Poisoned)?;
        let slot = products
            .iter_mut()
            .find(|p| p.is_same(product))
            .ok_or(StoreError::Missing(product.id_typed()))?;
        *slot = product.clone();
        Ok(())
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut products = self.products.write().map_err(|_| StoreError::Poisoned)?;
        let before = products.len();
        products.retain(|p| p.id() != id);
        Ok(products.len() != before)
    }
}
