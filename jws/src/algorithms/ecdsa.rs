//! ECDSA-based JWS algorithms (ES256, ES384, ES512)
//!
//! Signatures travel in the fixed-width `r || s` form of RFC 7518 §3.4,
//! never DER.

use crate::error::{JwtError, JwtResult};
use crate::keys::KeyMaterial;
use signature::{Signer, Verifier};

/// Sign with ECDSA P-256 / SHA-256 (ES256)
pub(crate) fn sign_es256(key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
    let signing_key = key.ec_key()?.p256()?.signing()?;
    let signature: p256::ecdsa::Signature = signing_key.try_sign(message).map_err(signing_failed)?;
    Ok(signature.to_bytes().to_vec())
}

/// Verify ECDSA P-256 / SHA-256 (ES256) signature
pub(crate) fn verify_es256(key: &KeyMaterial, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
    let verifying_key = key.ec_key()?.p256()?.verifying();
    let Ok(signature) = p256::ecdsa::Signature::from_slice(signature) else {
        return Ok(false);
    };
    Ok(verifying_key.verify(message, &signature).is_ok())
}

/// Sign with ECDSA P-384 / SHA-384 (ES384)
pub(crate) fn sign_es384(key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
    let signing_key = key.ec_key()?.p384()?.signing()?;
    let signature: p384::ecdsa::Signature = signing_key.try_sign(message).map_err(signing_failed)?;
    Ok(signature.to_bytes().to_vec())
}

/// Verify ECDSA P-384 / SHA-384 (ES384) signature
pub(crate) fn verify_es384(key: &KeyMaterial, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
    let verifying_key = key.ec_key()?.p384()?.verifying();
    let Ok(signature) = p384::ecdsa::Signature::from_slice(signature) else {
        return Ok(false);
    };
    Ok(verifying_key.verify(message, &signature).is_ok())
}

/// Sign with ECDSA P-521 / SHA-512 (ES512)
pub(crate) fn sign_es512(key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
    let signing_key = key.ec_key()?.p521()?.signing()?;
    let signature: p521::ecdsa::Signature = signing_key.try_sign(message).map_err(signing_failed)?;
    Ok(signature.to_bytes().to_vec())
}

/// Verify ECDSA P-521 / SHA-512 (ES512) signature
pub(crate) fn verify_es512(key: &KeyMaterial, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
    let verifying_key = key.ec_key()?.p521()?.verifying();
    let Ok(signature) = p521::ecdsa::Signature::from_slice(signature) else {
        return Ok(false);
    };
    Ok(verifying_key.verify(message, &signature).is_ok())
}

fn signing_failed(err: signature::Error) -> JwtError {
    JwtError::invalid_key(format!("ECDSA signing failed: {err}"))
}
