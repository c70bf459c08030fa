//! Product catalog service: load, validate-then-persist, destroy.
//!
//! This is the layer the HTTP controller talks to. It turns validation
//! failures into [`SaveOutcome::Invalid`] values and never touches the store
//! for an invalid candidate.

use chrono::Utc;
use thiserror::Error;

use storefront_core::DomainError;
use storefront_products::{Product, ProductAttributes, ProductId, ProductParams, SaveOutcome};

use crate::store::{ProductStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            // A row deleted between load and write is indistinguishable from
            // never having existed.
            StoreError::Missing(_) => CatalogError::Domain(DomainError::not_found()),
            other => CatalogError::Store(other),
        }
    }
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Domain(DomainError::NotFound))
    }
}

pub struct ProductCatalog<S> {
    store: S,
}

impl<S> ProductCatalog<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every product, in creation order.
    pub async fn all(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.store.list().await?)
    }

    /// Resolve an identifier to a stored product.
    pub async fn load(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    /// The empty, unsaved product bound to the creation form.
    pub fn build(&self) -> ProductAttributes {
        ProductAttributes::default()
    }

    pub async fn create(
        &self,
        params: ProductParams,
    ) -> Result<SaveOutcome<ProductAttributes>, CatalogError> {
        let candidate = ProductAttributes::from_params(params);
        if let Err(errors) = candidate.validate() {
            tracing::debug!(violations = errors.len(), "product create rejected");
            return Ok(SaveOutcome::Invalid { candidate, errors });
        }

        let product = self.store.insert(candidate, Utc::now()).await?;
        tracing::debug!(product_id = %product.id_typed(), "product inserted");
        Ok(SaveOutcome::Saved(product))
    }

    /// Apply `params` to a loaded product and persist it if still valid.
    pub async fn update(
        &self,
        mut product: Product,
        params: ProductParams,
    ) -> Result<SaveOutcome<Product>, CatalogError> {
        product.assign(params);
        if let Err(errors) = product.validate() {
            tracing::debug!(
                product_id = %product.id_typed(),
                violations = errors.len(),
                "product update rejected"
            );
            return Ok(SaveOutcome::Invalid {
                candidate: product,
                errors,
            });
        }

        product.touch(Utc::now());
        self.store.update(&product).await?;
        tracing::debug!(product_id = %product.id_typed(), "product saved");
        Ok(SaveOutcome::Saved(product))
    }

    pub async fn destroy(&self, product: Product) -> Result<(), CatalogError> {
        let id = product.id_typed();
        if !self.store.delete(id).await? {
            return Err(DomainError::not_found().into());
        }
        tracing::debug!(product_id = %id, "product deleted");
        Ok(())
    }
}
