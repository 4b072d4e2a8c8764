//! Typesafe JSON Web Signature (JWS) and JSON Web Token (JWT) encoding and
//! verification.
//!
//! This crate provides:
//! - HS256/384/512, RS256/384/512 and ES256/384/512 signing and verification
//! - Compact serialization with optional detached payloads
//! - Structural header and claims validation with typed claims models
//! - Distinct verified and unverified token types; the `none` algorithm is
//!   only ever accepted by [`Jwt::inspect`]
//!
//! ```
//! use cryypt_jws::{Algorithm, DecodeOptions, EncodeOptions, Jwt, JwtClaims};
//! use chrono::Duration;
//!
//! # fn main() -> cryypt_jws::JwtResult<()> {
//! let claims = JwtClaims::new()
//!     .issuer("issuer")
//!     .subject("user123")
//!     .issued_now()
//!     .with_expiration(Duration::minutes(30));
//!
//! let mut jwt = Jwt::new();
//! let token = jwt.encode(&claims, "secret", Algorithm::HS256, &EncodeOptions::default())?;
//! let decoded = jwt.decode::<JwtClaims>(&token, "secret", Algorithm::HS256, &DecodeOptions::default())?;
//! assert_eq!(decoded["sub"], "user123");
//! # Ok(())
//! # }
//! ```

pub mod algorithms;
pub mod claims;
pub mod codec;
mod error;
pub mod header;
pub mod jws;
mod jwt;
pub mod keys;
pub mod options;
pub mod token;

pub use algorithms::Algorithm;
pub use claims::{Audience, ClaimsModel, ClaimsShape, FieldKind, JwtClaims, JwtDatetime};
pub use error::*;
pub use header::JoseHeader;
pub use jws::Jws;
pub use jwt::Jwt;
pub use keys::{make_key, KeyMaterial, KeySource};
pub use options::{DecodeOptions, EncodeOptions};
pub use token::{UnsafeToken, ValidatedToken};

use serde_json::{Map, Value};

/// Encode `claims` with a fresh [`Jwt`]
///
/// # Errors
/// As [`Jwt::encode`].
pub fn encode<'k, C: ClaimsModel>(
    claims: &C,
    key: impl Into<KeySource<'k>>,
    algorithm: Algorithm,
    options: &EncodeOptions,
) -> JwtResult<Vec<u8>> {
    Jwt::new().encode(claims, key, algorithm, options)
}

/// Decode and verify `token` with a fresh [`Jwt`]
///
/// # Errors
/// As [`Jwt::decode`].
pub fn decode<'k, C: ClaimsModel>(
    token: impl AsRef<[u8]>,
    key: impl Into<KeySource<'k>>,
    algorithm: Algorithm,
    options: &DecodeOptions,
) -> JwtResult<Map<String, Value>> {
    Jwt::new().decode::<C>(token, key, algorithm, options)
}

/// Inspect `token` without verification with a fresh [`Jwt`]
///
/// # Errors
/// As [`Jwt::inspect`].
pub fn inspect(token: impl AsRef<[u8]>, has_detached_payload: bool) -> JwtResult<UnsafeToken> {
    Jwt::new().inspect(token, has_detached_payload)
}
