//! Local inspection of stored session tokens.
//!
//! The backend issues JWTs. The client cannot verify their signature, but it
//! can read the `exp` claim and skip a doomed profile request when the token
//! has already expired. Tokens that are not JWTs are treated as opaque and
//! left for the backend to judge.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;

/// What can be learned about a token without asking the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// A JWT whose `exp` lies in the past
    Expired,

    /// A JWT that has not expired yet
    Live {
        /// Expiry as a Unix timestamp
        expires_at: u64,
    },

    /// Not a JWT, or a JWT without an `exp` claim
    Opaque,
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: u64,
}

/// Inspect a token's expiry without verifying its signature
pub fn inspect(token: &str) -> TokenStatus {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_aud = false;
    validation.leeway = 0;

    match decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => TokenStatus::Live {
            expires_at: data.claims.exp,
        },
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => TokenStatus::Expired,
            _ => TokenStatus::Opaque,
        },
    }
}
