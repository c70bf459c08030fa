//! Products domain module.
//!
//! This crate contains the product entity, its allow-listed input parameters
//! and its validation rules, implemented as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod params;
pub mod product;
pub mod validation;

pub use params::{PERMITTED_KEYS, ParamsError, ProductParams};
pub use product::{FeaturedImage, Product, ProductAttributes, ProductId};
pub use validation::{
    NAME_MAX_CHARS, ProductField, SaveOutcome, ValidationErrors, Violation, ViolationKind,
};
