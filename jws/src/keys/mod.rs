//! Key material for signing and verification
//!
//! [`KeyMaterial`] is polymorphic over the algorithm family. [`make_key`]
//! builds it from raw bytes for a given algorithm; [`KeySource`] lets the
//! facade accept either raw bytes or an already-built key.

mod ec;
mod hmac;
mod rsa;

pub use ec::{EcKey, EcKeyPair, P256KeyPair, P384KeyPair, P521KeyPair};
pub use self::hmac::HmacKey;
pub use self::rsa::RsaKey;

use crate::algorithms::{self, Algorithm, KeyFamily};
use crate::error::{JwtError, JwtResult};
use std::borrow::Cow;
use std::fmt;

/// Parsed key material, keyed by algorithm family
#[derive(Clone)]
pub enum KeyMaterial {
    /// Shared secret for HS256/384/512
    Hmac(HmacKey),
    /// RSA key pair or public key for RS256/384/512
    Rsa(RsaKey),
    /// ECDSA key pair or public key for ES256/384/512
    Ec(EcKey),
    /// No key, for the `none` algorithm
    None,
}

impl KeyMaterial {
    /// Family this key belongs to
    #[must_use]
    pub fn family(&self) -> KeyFamily {
        match self {
            KeyMaterial::Hmac(_) => KeyFamily::Hmac,
            KeyMaterial::Rsa(_) => KeyFamily::Rsa,
            KeyMaterial::Ec(key) => KeyFamily::Ec(key.curve()),
            KeyMaterial::None => KeyFamily::None,
        }
    }

    /// Whether this key can produce signatures
    #[must_use]
    pub fn can_sign(&self) -> bool {
        match self {
            KeyMaterial::Hmac(_) | KeyMaterial::None => true,
            KeyMaterial::Rsa(key) => key.has_private(),
            KeyMaterial::Ec(key) => key.has_private(),
        }
    }

    /// Whether this key can check signatures; every variant can
    #[must_use]
    pub fn can_verify(&self) -> bool {
        true
    }

    /// Sign `message` with `algorithm`
    ///
    /// # Errors
    /// [`JwtError::InvalidKey`] for a verify-only key or a key of another family.
    pub fn sign(&self, algorithm: Algorithm, message: &[u8]) -> JwtResult<Vec<u8>> {
        algorithms::entry(algorithm).sign(self, message)
    }

    /// Verify `signature` over `message` with `algorithm`
    ///
    /// # Errors
    /// [`JwtError::InvalidKey`] for a key of another family.
    pub fn verify(&self, algorithm: Algorithm, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
        algorithms::entry(algorithm).verify(self, message, signature)
    }

    pub(crate) fn hmac_secret(&self) -> JwtResult<&[u8]> {
        match self {
            KeyMaterial::Hmac(key) => Ok(key.secret()),
            other => Err(other.family_mismatch(KeyFamily::Hmac)),
        }
    }

    pub(crate) fn rsa_key(&self) -> JwtResult<&RsaKey> {
        match self {
            KeyMaterial::Rsa(key) => Ok(key),
            other => Err(other.family_mismatch(KeyFamily::Rsa)),
        }
    }

    pub(crate) fn ec_key(&self) -> JwtResult<&EcKey> {
        match self {
            KeyMaterial::Ec(key) => Ok(key),
            other => Err(JwtError::invalid_key(format!(
                "expected an EC key, got {} key",
                other.family()
            ))),
        }
    }

    fn family_mismatch(&self, expected: KeyFamily) -> JwtError {
        JwtError::invalid_key(format!(
            "expected {expected} key, got {} key",
            self.family()
        ))
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMaterial::Hmac(key) => f.debug_tuple("Hmac").field(key).finish(),
            KeyMaterial::Rsa(key) => f.debug_tuple("Rsa").field(key).finish(),
            KeyMaterial::Ec(key) => f.debug_tuple("Ec").field(key).finish(),
            KeyMaterial::None => f.write_str("None"),
        }
    }
}

impl From<HmacKey> for KeyMaterial {
    fn from(key: HmacKey) -> Self {
        KeyMaterial::Hmac(key)
    }
}

impl From<RsaKey> for KeyMaterial {
    fn from(key: RsaKey) -> Self {
        KeyMaterial::Rsa(key)
    }
}

impl From<EcKey> for KeyMaterial {
    fn from(key: EcKey) -> Self {
        KeyMaterial::Ec(key)
    }
}

/// Build key material for `algorithm` from raw bytes
///
/// HMAC secrets are used verbatim. RSA and EC keys are parsed from PEM or
/// DER; EC keys also accept a raw private scalar or SEC1 public point.
/// Raw bytes for `none` are ignored.
///
/// # Errors
/// [`JwtError::InvalidKey`] when the bytes are not a valid key for the
/// algorithm's family (or curve).
pub fn make_key(algorithm: Algorithm, raw: &[u8]) -> JwtResult<KeyMaterial> {
    match algorithm.family() {
        KeyFamily::Hmac => HmacKey::for_algorithm(raw, algorithm).map(KeyMaterial::Hmac),
        KeyFamily::Rsa => RsaKey::parse(raw).map(KeyMaterial::Rsa),
        KeyFamily::Ec(curve) => EcKey::parse(curve, raw).map(KeyMaterial::Ec),
        KeyFamily::None => Ok(KeyMaterial::None),
    }
}

/// Key input accepted by the JWT facade
#[derive(Debug, Clone, Copy)]
pub enum KeySource<'a> {
    /// Raw secret or encoded key bytes, interpreted per algorithm
    Raw(&'a [u8]),
    /// Key material built beforehand
    Material(&'a KeyMaterial),
}

impl<'a> KeySource<'a> {
    /// Resolve to key material for `algorithm`, borrowing when already built
    ///
    /// # Errors
    /// Propagates [`make_key`] failures for raw input.
    pub fn resolve(self, algorithm: Algorithm) -> JwtResult<Cow<'a, KeyMaterial>> {
        match self {
            KeySource::Raw(raw) => make_key(algorithm, raw).map(Cow::Owned),
            KeySource::Material(key) => Ok(Cow::Borrowed(key)),
        }
    }
}

impl<'a> From<&'a [u8]> for KeySource<'a> {
    fn from(raw: &'a [u8]) -> Self {
        KeySource::Raw(raw)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for KeySource<'a> {
    fn from(raw: &'a [u8; N]) -> Self {
        KeySource::Raw(raw)
    }
}

impl<'a> From<&'a str> for KeySource<'a> {
    fn from(raw: &'a str) -> Self {
        KeySource::Raw(raw.as_bytes())
    }
}

impl<'a> From<&'a String> for KeySource<'a> {
    fn from(raw: &'a String) -> Self {
        KeySource::Raw(raw.as_bytes())
    }
}

impl<'a> From<&'a Vec<u8>> for KeySource<'a> {
    fn from(raw: &'a Vec<u8>) -> Self {
        KeySource::Raw(raw)
    }
}

impl<'a> From<&'a KeyMaterial> for KeySource<'a> {
    fn from(key: &'a KeyMaterial) -> Self {
        KeySource::Material(key)
    }
}

/// PEM text of `raw`, when it is UTF-8 starting with a PEM boundary
pub(crate) fn pem_text(raw: &[u8]) -> Option<&str> {
    let text = std::str::from_utf8(raw).ok()?.trim();
    text.starts_with("-----BEGIN").then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EC_P256_PRIVATE: &str = include_str!("../../tests/keys/ec_p256_private.pem");
    const EC_P256_SEC1: &str = include_str!("../../tests/keys/ec_p256_private_sec1.pem");
    const EC_P256_PUBLIC: &str = include_str!("../../tests/keys/ec_p256_public.pem");
    const EC_P384_PRIVATE: &str = include_str!("../../tests/keys/ec_p384_private.pem");
    const EC_P521_PRIVATE: &str = include_str!("../../tests/keys/ec_p521_private.pem");
    const RSA_PRIVATE: &str = include_str!("../../tests/keys/rsa_private.pem");
    const RSA_PRIVATE_PKCS1: &str = include_str!("../../tests/keys/rsa_private_pkcs1.pem");
    const RSA_PUBLIC: &str = include_str!("../../tests/keys/rsa_public.pem");

    #[test]
    fn empty_hmac_secret_is_invalid() {
        assert!(matches!(
            make_key(Algorithm::HS256, b""),
            Err(JwtError::InvalidKey(_))
        ));
    }

    #[test]
    fn short_hmac_secret_is_accepted() {
        let key = make_key(Algorithm::HS512, b"secret").expect("short secrets only warn");
        assert_eq!(key.family(), KeyFamily::Hmac);
        assert!(key.can_sign());
    }

    #[test]
    fn rsa_private_pem_variants_parse_with_both_capabilities() {
        for pem in [RSA_PRIVATE, RSA_PRIVATE_PKCS1] {
            let key = make_key(Algorithm::RS256, pem.as_bytes()).expect("rsa private key");
            assert_eq!(key.family(), KeyFamily::Rsa);
            assert!(key.can_sign());
            assert!(key.can_verify());
        }
    }

    #[test]
    fn rsa_public_pem_is_verify_only() {
        let key = make_key(Algorithm::RS384, RSA_PUBLIC.as_bytes()).expect("rsa public key");
        assert!(!key.can_sign());
        let err = key
            .sign(Algorithm::RS384, b"message")
            .expect_err("public key cannot sign");
        assert!(matches!(err, JwtError::InvalidKey(_)));
    }

    #[test]
    fn ec_keys_parse_for_their_curve() {
        let p256 = make_key(Algorithm::ES256, EC_P256_PRIVATE.as_bytes()).expect("pkcs8 p256");
        assert_eq!(p256.family(), KeyFamily::Ec(algorithms::EcCurve::P256));
        assert!(p256.can_sign());

        let sec1 = make_key(Algorithm::ES256, EC_P256_SEC1.as_bytes()).expect("sec1 p256");
        assert!(sec1.can_sign());

        let public = make_key(Algorithm::ES256, EC_P256_PUBLIC.as_bytes()).expect("public p256");
        assert!(!public.can_sign());

        assert!(make_key(Algorithm::ES384, EC_P384_PRIVATE.as_bytes()).is_ok());
        assert!(make_key(Algorithm::ES512, EC_P521_PRIVATE.as_bytes()).is_ok());
    }

    #[test]
    fn ec_key_for_another_curve_is_invalid() {
        assert!(matches!(
            make_key(Algorithm::ES384, EC_P256_PRIVATE.as_bytes()),
            Err(JwtError::InvalidKey(_))
        ));
    }

    #[test]
    fn raw_scalar_builds_signing_key() {
        let scalar = [0x11_u8; 32];
        let key = make_key(Algorithm::ES256, &scalar).expect("raw p256 scalar");
        assert!(key.can_sign());
    }

    #[test]
    fn garbage_rsa_bytes_are_invalid() {
        assert!(matches!(
            make_key(Algorithm::RS256, b"not a key"),
            Err(JwtError::InvalidKey(_))
        ));
    }

    #[test]
    fn key_source_borrows_built_material() {
        let key = make_key(Algorithm::HS256, b"secret").expect("hmac key");
        let resolved = KeySource::from(&key)
            .resolve(Algorithm::HS256)
            .expect("material resolves");
        assert!(matches!(resolved, Cow::Borrowed(_)));
    }

    #[test]
    fn debug_output_never_contains_secret() {
        let key = make_key(Algorithm::HS256, b"super-secret-value").expect("hmac key");
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("len"));
    }
}
