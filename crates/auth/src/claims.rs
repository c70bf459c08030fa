use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PrincipalId;

/// Session token claims (transport-agnostic).
///
/// This is the minimal set of claims the storefront expects once a token has
/// been decoded and its signature verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject / principal identifier.
    pub sub: PrincipalId,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Tolerated clock difference between the token issuer and this process.
pub const CLOCK_SKEW_SECS: i64 = 30;

/// Check the claim time window against `now`.
///
/// Only `issued_at` gets the skew allowance; an expired token is expired.
/// Signature verification lives in [`crate::validator`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }

    let earliest = claims.issued_at - Duration::seconds(CLOCK_SKEW_SECS);
    match now {
        now if now < earliest => Err(TokenValidationError::NotYetValid),
        now if now >= claims.expires_at => Err(TokenValidationError::Expired),
        _ => Ok(()),
    }
}
