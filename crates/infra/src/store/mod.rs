//! Product storage boundary.
//!
//! The store owns identity assignment and durability; it never validates.
//! Validation happens in [`crate::catalog`] before anything reaches a store.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use r#trait::{ProductStore, StoreError};
