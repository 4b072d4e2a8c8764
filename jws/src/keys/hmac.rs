//! Shared-secret keys for the HS* algorithms

use crate::algorithms::{recommended_key_size, Algorithm};
use crate::error::{JwtError, JwtResult};
use std::fmt;
use zeroize::Zeroizing;

/// HMAC shared secret, wiped from memory on drop
#[derive(Clone)]
pub struct HmacKey {
    secret: Zeroizing<Vec<u8>>,
}

impl HmacKey {
    /// Wrap secret bytes
    ///
    /// # Errors
    /// [`JwtError::InvalidKey`] for an empty secret.
    pub fn new(secret: &[u8]) -> JwtResult<Self> {
        if secret.is_empty() {
            return Err(JwtError::invalid_key("HMAC secret must not be empty"));
        }
        Ok(Self {
            secret: Zeroizing::new(secret.to_vec()),
        })
    }

    /// Wrap secret bytes for a specific algorithm, warning when the secret is
    /// shorter than the digest output
    ///
    /// # Errors
    /// [`JwtError::InvalidKey`] for an empty secret.
    pub fn for_algorithm(secret: &[u8], algorithm: Algorithm) -> JwtResult<Self> {
        let key = Self::new(secret)?;
        let recommended = recommended_key_size(algorithm);
        if secret.len() < recommended {
            tracing::warn!(
                algorithm = %algorithm,
                key_len = secret.len(),
                recommended,
                "HMAC secret is shorter than the recommended length"
            );
        }
        Ok(key)
    }

    /// Secret length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.secret.len()
    }

    /// Always false; empty secrets are rejected on construction
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacKey")
            .field("len", &self.secret.len())
            .finish_non_exhaustive()
    }
}
