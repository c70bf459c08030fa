//! `storefront-auth` — session authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how
//! to validate a session token, not where the token came from.

pub mod claims;
pub mod principal;
pub mod validator;

pub use claims::{CLOCK_SKEW_SECS, JwtClaims, TokenValidationError, validate_claims};
pub use principal::PrincipalId;
pub use validator::{Hs256JwtValidator, JwtValidator, TokenError};
