//! HMAC-based JWS algorithms (HS256, HS384, HS512)
//!
//! Verification recomputes the MAC and compares in constant time.

use crate::error::{JwtError, JwtResult};
use crate::keys::KeyMaterial;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

fn invalid_hmac_key() -> JwtError {
    JwtError::invalid_key("Invalid HMAC key")
}

#[inline]
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Sign with HMAC-SHA256 (HS256)
pub(crate) fn sign_hs256(key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key.hmac_secret()?).map_err(|_| invalid_hmac_key())?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Verify HMAC-SHA256 (HS256) signature
pub(crate) fn verify_hs256(key: &KeyMaterial, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
    let expected = sign_hs256(key, message)?;
    Ok(constant_time_eq(signature, &expected))
}

/// Sign with HMAC-SHA384 (HS384)
pub(crate) fn sign_hs384(key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = HmacSha384::new_from_slice(key.hmac_secret()?).map_err(|_| invalid_hmac_key())?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Verify HMAC-SHA384 (HS384) signature
pub(crate) fn verify_hs384(key: &KeyMaterial, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
    let expected = sign_hs384(key, message)?;
    Ok(constant_time_eq(signature, &expected))
}

/// Sign with HMAC-SHA512 (HS512)
pub(crate) fn sign_hs512(key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = HmacSha512::new_from_slice(key.hmac_secret()?).map_err(|_| invalid_hmac_key())?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Verify HMAC-SHA512 (HS512) signature
pub(crate) fn verify_hs512(key: &KeyMaterial, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
    let expected = sign_hs512(key, message)?;
    Ok(constant_time_eq(signature, &expected))
}
