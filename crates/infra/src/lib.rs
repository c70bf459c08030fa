//! Infrastructure layer: product storage and the catalog service built on it.

pub mod catalog;
pub mod store;

pub use catalog::{CatalogError, ProductCatalog};
pub use store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};
