//! RSA-based JWS algorithms (RS256, RS384, RS512)
//!
//! RSASSA-PKCS1-v1_5 signatures; signing needs the private half of the key.

use crate::error::{JwtError, JwtResult};
use crate::keys::KeyMaterial;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::sha2::{Sha256, Sha384, Sha512};
use rsa::signature::{SignatureEncoding, Signer, Verifier};

/// Sign with RSA-SHA256 (RS256)
pub(crate) fn sign_rs256(key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
    let private_key = key.rsa_key()?.signing()?.clone();
    let signing_key = SigningKey::<Sha256>::new(private_key);
    signing_key
        .try_sign(message)
        .map(|signature| signature.to_vec())
        .map_err(signing_failed)
}

/// Verify RSA-SHA256 (RS256) signature
pub(crate) fn verify_rs256(key: &KeyMaterial, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
    let verifying_key = VerifyingKey::<Sha256>::new(key.rsa_key()?.public().clone());
    let Ok(signature) = Signature::try_from(signature) else {
        return Ok(false);
    };
    Ok(verifying_key.verify(message, &signature).is_ok())
}

/// Sign with RSA-SHA384 (RS384)
pub(crate) fn sign_rs384(key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
    let private_key = key.rsa_key()?.signing()?.clone();
    let signing_key = SigningKey::<Sha384>::new(private_key);
    signing_key
        .try_sign(message)
        .map(|signature| signature.to_vec())
        .map_err(signing_failed)
}

/// Verify RSA-SHA384 (RS384) signature
pub(crate) fn verify_rs384(key: &KeyMaterial, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
    let verifying_key = VerifyingKey::<Sha384>::new(key.rsa_key()?.public().clone());
    let Ok(signature) = Signature::try_from(signature) else {
        return Ok(false);
    };
    Ok(verifying_key.verify(message, &signature).is_ok())
}

/// Sign with RSA-SHA512 (RS512)
pub(crate) fn sign_rs512(key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
    let private_key = key.rsa_key()?.signing()?.clone();
    let signing_key = SigningKey::<Sha512>::new(private_key);
    signing_key
        .try_sign(message)
        .map(|signature| signature.to_vec())
        .map_err(signing_failed)
}

/// Verify RSA-SHA512 (RS512) signature
pub(crate) fn verify_rs512(key: &KeyMaterial, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
    let verifying_key = VerifyingKey::<Sha512>::new(key.rsa_key()?.public().clone());
    let Ok(signature) = Signature::try_from(signature) else {
        return Ok(false);
    };
    Ok(verifying_key.verify(message, &signature).is_ok())
}

fn signing_failed(err: rsa::signature::Error) -> JwtError {
    JwtError::invalid_key(format!("RSA signing failed: {err}"))
}
