//! JWS algorithm registry
//!
//! Maps an `alg` tag to its signing/verification function pair and to the
//! key family those functions require. Dispatch goes through a static table
//! indexed by [`Algorithm`] so every supported algorithm has exactly one entry.

mod ecdsa;
mod hmac;
mod rsa;

use crate::error::{JwtError, JwtResult};
use crate::keys::KeyMaterial;
use std::fmt;
use std::str::FromStr;

/// Supported JWS `alg` values
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    RS512,
    /// ECDSA using P-256 and SHA-256
    ES256,
    /// ECDSA using P-384 and SHA-384
    ES384,
    /// ECDSA using P-521 and SHA-512
    ES512,
    /// Unsecured JWS, only accepted by inspection
    None,
}

impl Algorithm {
    /// Every algorithm in registry order
    pub const ALL: [Algorithm; 10] = [
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::ES256,
        Algorithm::ES384,
        Algorithm::ES512,
        Algorithm::None,
    ];

    /// The registered `alg` header value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
            Algorithm::ES512 => "ES512",
            Algorithm::None => "none",
        }
    }

    /// Key family required by this algorithm
    #[must_use]
    pub fn family(self) -> KeyFamily {
        entry(self).family
    }

    /// Whether this is the unsecured `none` algorithm
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Algorithm::None)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = JwtError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .iter()
            .copied()
            .find(|alg| alg.as_str() == tag)
            .ok_or_else(|| JwtError::unsupported_algorithm(tag))
    }
}

/// Elliptic curves used by the ECDSA algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    /// NIST P-256
    P256,
    /// NIST P-384
    P384,
    /// NIST P-521
    P521,
}

impl EcCurve {
    /// Length in bytes of a private scalar on this curve
    #[must_use]
    pub const fn scalar_len(self) -> usize {
        match self {
            EcCurve::P256 => 32,
            EcCurve::P384 => 48,
            EcCurve::P521 => 66,
        }
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EcCurve::P256 => "P-256",
            EcCurve::P384 => "P-384",
            EcCurve::P521 => "P-521",
        })
    }
}

/// Family of key material an algorithm operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFamily {
    /// Shared HMAC secret
    Hmac,
    /// RSA key pair or public key
    Rsa,
    /// ECDSA key pair or public key on the given curve
    Ec(EcCurve),
    /// No key
    None,
}

impl fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyFamily::Hmac => f.write_str("HMAC"),
            KeyFamily::Rsa => f.write_str("RSA"),
            KeyFamily::Ec(curve) => write!(f, "EC {curve}"),
            KeyFamily::None => f.write_str("none"),
        }
    }
}

type SignFn = fn(&KeyMaterial, &[u8]) -> JwtResult<Vec<u8>>;
type VerifyFn = fn(&KeyMaterial, &[u8], &[u8]) -> JwtResult<bool>;

/// One registry row: the algorithm, its key family and its primitives
pub struct AlgorithmEntry {
    algorithm: Algorithm,
    family: KeyFamily,
    sign: SignFn,
    verify: VerifyFn,
}

impl AlgorithmEntry {
    /// Algorithm this entry implements
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Key family this entry requires
    #[must_use]
    pub fn family(&self) -> KeyFamily {
        self.family
    }

    /// Sign `message` with `key`
    ///
    /// # Errors
    /// [`JwtError::InvalidKey`] when the key belongs to another family or
    /// carries no private half.
    pub fn sign(&self, key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
        self.check_family(key)?;
        if !key.can_sign() {
            return Err(JwtError::invalid_key(format!(
                "{} key is verify-only and cannot sign {}",
                self.family, self.algorithm
            )));
        }
        (self.sign)(key, message)
    }

    /// Verify `signature` over `message` with `key`
    ///
    /// Returns `Ok(false)` for a signature that does not match or cannot be
    /// parsed for this algorithm.
    ///
    /// # Errors
    /// [`JwtError::InvalidKey`] when the key belongs to another family.
    pub fn verify(&self, key: &KeyMaterial, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
        self.check_family(key)?;
        (self.verify)(key, message, signature)
    }

    fn check_family(&self, key: &KeyMaterial) -> JwtResult<()> {
        let found = key.family();
        if found == self.family {
            Ok(())
        } else {
            Err(JwtError::invalid_key(format!(
                "{} requires a {} key, got {found} key",
                self.algorithm, self.family
            )))
        }
    }
}

impl fmt::Debug for AlgorithmEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmEntry")
            .field("algorithm", &self.algorithm)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

static REGISTRY: [AlgorithmEntry; 10] = [
    AlgorithmEntry {
        algorithm: Algorithm::HS256,
        family: KeyFamily::Hmac,
        sign: hmac::sign_hs256,
        verify: hmac::verify_hs256,
    },
    AlgorithmEntry {
        algorithm: Algorithm::HS384,
        family: KeyFamily::Hmac,
        sign: hmac::sign_hs384,
        verify: hmac::verify_hs384,
    },
    AlgorithmEntry {
        algorithm: Algorithm::HS512,
        family: KeyFamily::Hmac,
        sign: hmac::sign_hs512,
        verify: hmac::verify_hs512,
    },
    AlgorithmEntry {
        algorithm: Algorithm::RS256,
        family: KeyFamily::Rsa,
        sign: rsa::sign_rs256,
        verify: rsa::verify_rs256,
    },
    AlgorithmEntry {
        algorithm: Algorithm::RS384,
        family: KeyFamily::Rsa,
        sign: rsa::sign_rs384,
        verify: rsa::verify_rs384,
    },
    AlgorithmEntry {
        algorithm: Algorithm::RS512,
        family: KeyFamily::Rsa,
        sign: rsa::sign_rs512,
        verify: rsa::verify_rs512,
    },
    AlgorithmEntry {
        algorithm: Algorithm::ES256,
        family: KeyFamily::Ec(EcCurve::P256),
        sign: ecdsa::sign_es256,
        verify: ecdsa::verify_es256,
    },
    AlgorithmEntry {
        algorithm: Algorithm::ES384,
        family: KeyFamily::Ec(EcCurve::P384),
        sign: ecdsa::sign_es384,
        verify: ecdsa::verify_es384,
    },
    AlgorithmEntry {
        algorithm: Algorithm::ES512,
        family: KeyFamily::Ec(EcCurve::P521),
        sign: ecdsa::sign_es512,
        verify: ecdsa::verify_es512,
    },
    AlgorithmEntry {
        algorithm: Algorithm::None,
        family: KeyFamily::None,
        sign: sign_none,
        verify: verify_none,
    },
];

fn sign_none(_key: &KeyMaterial, _message: &[u8]) -> JwtResult<Vec<u8>> {
    Ok(Vec::new())
}

fn verify_none(_key: &KeyMaterial, _message: &[u8], _signature: &[u8]) -> JwtResult<bool> {
    Ok(true)
}

/// Registry entry for an algorithm
#[must_use]
pub fn entry(algorithm: Algorithm) -> &'static AlgorithmEntry {
    &REGISTRY[algorithm as usize]
}

/// Registry entry for an `alg` tag
///
/// # Errors
/// [`JwtError::UnsupportedAlgorithm`] for a tag outside the registry.
pub fn lookup(tag: &str) -> JwtResult<&'static AlgorithmEntry> {
    tag.parse::<Algorithm>().map(entry)
}

/// Recommended minimum key size in bytes for an algorithm
///
/// HMAC secrets should be at least as long as the digest output, RSA moduli
/// at least 2048 bits, EC keys are fixed by the curve.
#[must_use]
pub const fn recommended_key_size(algorithm: Algorithm) -> usize {
    match algorithm {
        Algorithm::HS256 => 32,
        Algorithm::HS384 => 48,
        Algorithm::HS512 => 64,
        Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => 256,
        Algorithm::ES256 => EcCurve::P256.scalar_len(),
        Algorithm::ES384 => EcCurve::P384.scalar_len(),
        Algorithm::ES512 => EcCurve::P521.scalar_len(),
        Algorithm::None => 0,
    }
}
