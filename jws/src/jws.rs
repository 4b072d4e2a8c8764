//! JWS engine: compact encode and verified decode
//!
//! The engine is an immutable value configured for one algorithm. Encoding
//! always signs the full payload; detached mode only changes what the
//! compact output carries. Decoding checks the token's algorithm against the
//! configured one before any signature work and never exposes the payload of
//! a token whose signature did not verify.

use crate::algorithms::{entry, Algorithm};
use crate::codec::{b64url_decode, b64url_encode, json_decode, json_encode};
use crate::error::{JwtError, JwtResult};
use crate::header::{validate_header, JoseHeader};
use crate::keys::KeyMaterial;
use crate::token::{EncodedSegments, UnsafeToken, ValidatedToken};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// JWS encoder/decoder bound to one algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jws {
    algorithm: Algorithm,
    detached: bool,
    validate_headers: bool,
}

impl Jws {
    /// Engine for `algorithm` with header validation on and an attached payload
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            detached: false,
            validate_headers: true,
        }
    }

    /// Produce compact tokens with a blank payload segment
    #[must_use]
    pub fn with_detached_payload(mut self) -> Self {
        self.detached = true;
        self
    }

    /// Skip structural header validation
    #[must_use]
    pub fn without_header_validation(mut self) -> Self {
        self.validate_headers = false;
        self
    }

    /// Configured algorithm
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Encode and sign `payload` under `header`
    ///
    /// # Errors
    /// - [`JwtError::UnsupportedAlgorithm`] for `none` or an unknown header `alg`
    /// - [`JwtError::AlgorithmMismatch`] when the header names another algorithm
    /// - [`JwtError::HeaderValidation`] when the header is structurally invalid
    /// - [`JwtError::InvalidKey`] when `key` cannot sign with this algorithm
    pub fn encode(
        &self,
        header: &JoseHeader,
        payload: &Map<String, Value>,
        key: &KeyMaterial,
    ) -> JwtResult<ValidatedToken> {
        self.reject_none()?;
        // The emitted header, not the struct field, decides the algorithm
        let header_map = header.to_map()?;
        let header_alg = token_algorithm(&header_map)?;
        if header_alg.is_none() {
            return Err(JwtError::unsupported_algorithm(header_alg.as_str()));
        }
        if header_alg != self.algorithm {
            return Err(JwtError::AlgorithmMismatch {
                expected: self.algorithm.to_string(),
                found: header_alg.to_string(),
            });
        }

        if self.validate_headers {
            validate_header(&header_map).map_err(|errors| JwtError::HeaderValidation(errors.into()))?;
        }

        let header_segment = b64url_encode(json_encode(&header_map)?);
        let payload_segment = b64url_encode(json_encode(payload)?);
        let signing_input = format!("{header_segment}.{payload_segment}");
        let signature = entry(self.algorithm).sign(key, signing_input.as_bytes())?;

        tracing::debug!(
            algorithm = %self.algorithm,
            header_len = header_segment.len(),
            payload_len = payload_segment.len(),
            detached = self.detached,
            "encoded JWS"
        );

        let encoded = EncodedSegments::new(
            header_segment,
            payload_segment,
            b64url_encode(&signature),
            self.detached,
        );
        Ok(ValidatedToken::verified(
            encoded,
            header_map,
            payload.clone(),
            signature,
        ))
    }

    /// Verify and decode a compact token carrying its payload
    ///
    /// # Errors
    /// - [`JwtError::MalformedToken`] for a wrong segment count or a blank payload segment
    /// - [`JwtError::Encoding`] for undecodable header or payload segments
    /// - [`JwtError::HeaderValidation`] when the header is structurally invalid
    /// - [`JwtError::UnsupportedAlgorithm`] for `none`, a missing or an unknown `alg`
    /// - [`JwtError::AlgorithmMismatch`] when `alg` differs from the configured algorithm
    /// - [`JwtError::InvalidKey`] when `key` belongs to another family
    /// - [`JwtError::SignatureVerification`] when the signature does not verify
    pub fn decode(&self, compact: &[u8], key: &KeyMaterial) -> JwtResult<ValidatedToken> {
        self.decode_with(compact, None, key)
    }

    /// Verify a detached-payload token against the caller's payload
    ///
    /// The token's payload segment must be blank; `payload` is encoded and
    /// substituted before verification.
    ///
    /// # Errors
    /// As [`Jws::decode`], plus [`JwtError::MalformedToken`] when the token
    /// still carries a payload segment.
    pub fn decode_detached(
        &self,
        compact: &[u8],
        payload: &Map<String, Value>,
        key: &KeyMaterial,
    ) -> JwtResult<ValidatedToken> {
        self.decode_with(compact, Some(payload), key)
    }

    fn decode_with(
        &self,
        compact: &[u8],
        detached_payload: Option<&Map<String, Value>>,
        key: &KeyMaterial,
    ) -> JwtResult<ValidatedToken> {
        self.reject_none()?;
        let [header_segment, payload_segment, signature_segment] = split_compact(compact)?;

        let payload_segment: Cow<'_, str> = match detached_payload {
            Some(payload) => {
                if !payload_segment.is_empty() {
                    return Err(JwtError::malformed(
                        "detached payload supplied but the token carries a payload segment",
                    ));
                }
                Cow::Owned(b64url_encode(json_encode(payload)?))
            }
            None => {
                if payload_segment.is_empty() {
                    return Err(JwtError::malformed(
                        "payload segment is empty; the token has a detached payload",
                    ));
                }
                Cow::Borrowed(payload_segment)
            }
        };

        let header = json_decode(&b64url_decode(header_segment)?)?;
        if self.validate_headers {
            validate_header(&header).map_err(|errors| JwtError::HeaderValidation(errors.into()))?;
        }

        let algorithm = token_algorithm(&header)?;
        if algorithm.is_none() {
            return Err(JwtError::unsupported_algorithm(algorithm.as_str()));
        }
        if algorithm != self.algorithm {
            return Err(JwtError::AlgorithmMismatch {
                expected: self.algorithm.to_string(),
                found: algorithm.to_string(),
            });
        }

        let Ok(signature) = b64url_decode(signature_segment) else {
            tracing::debug!(algorithm = %algorithm, "signature segment is not base64url");
            return Err(JwtError::SignatureVerification);
        };
        let signing_input = format!("{header_segment}.{payload_segment}");
        if !entry(algorithm).verify(key, signing_input.as_bytes(), &signature)? {
            tracing::debug!(algorithm = %algorithm, "signature verification failed");
            return Err(JwtError::SignatureVerification);
        }

        let payload = match detached_payload {
            Some(payload) => payload.clone(),
            None => json_decode(&b64url_decode(&*payload_segment)?)?,
        };

        tracing::debug!(
            algorithm = %algorithm,
            payload_len = payload_segment.len(),
            detached = detached_payload.is_some(),
            "decoded JWS"
        );

        let encoded = EncodedSegments::new(
            header_segment.to_string(),
            payload_segment.into_owned(),
            signature_segment.to_string(),
            detached_payload.is_some(),
        );
        Ok(ValidatedToken::verified(encoded, header, payload, signature))
    }

    fn reject_none(&self) -> JwtResult<()> {
        if self.algorithm.is_none() {
            Err(JwtError::unsupported_algorithm(self.algorithm.as_str()))
        } else {
            Ok(())
        }
    }
}

/// Parse every segment of a compact token without verifying anything
///
/// Only reachable through [`crate::Jwt::inspect`]. The header is not
/// validated and any `alg`, `none` included, is accepted. With
/// `has_detached_payload` the payload segment must be blank and the returned
/// payload is empty.
pub(crate) fn inspect_unverified(compact: &[u8], has_detached_payload: bool) -> JwtResult<UnsafeToken> {
    let [header_segment, payload_segment, signature_segment] = split_compact(compact)?;

    let header = json_decode(&b64url_decode(header_segment)?)?;
    let payload = if has_detached_payload {
        if !payload_segment.is_empty() {
            return Err(JwtError::malformed(
                "token carries a payload segment but was inspected as detached",
            ));
        }
        Map::new()
    } else {
        if payload_segment.is_empty() {
            return Err(JwtError::malformed(
                "payload segment is empty; the token has a detached payload",
            ));
        }
        json_decode(&b64url_decode(payload_segment)?)?
    };
    let signature = b64url_decode(signature_segment)?;

    let alg = header.get("alg").and_then(Value::as_str).unwrap_or("<missing>");
    tracing::warn!(
        alg,
        "inspecting JWS without signature verification; do not trust its contents"
    );

    let encoded = EncodedSegments::new(
        header_segment.to_string(),
        payload_segment.to_string(),
        signature_segment.to_string(),
        has_detached_payload,
    );
    Ok(UnsafeToken::unverified(encoded, header, payload, signature))
}

fn split_compact(compact: &[u8]) -> JwtResult<[&str; 3]> {
    let text = std::str::from_utf8(compact)
        .map_err(|_| JwtError::malformed("token is not valid UTF-8"))?;
    let segments: Vec<&str> = text.split('.').collect();
    match segments.as_slice() {
        [header, payload, signature] => Ok([*header, *payload, *signature]),
        _ => Err(JwtError::malformed(format!(
            "expected 3 segments, found {}",
            segments.len()
        ))),
    }
}

fn token_algorithm(header: &Map<String, Value>) -> JwtResult<Algorithm> {
    match header.get("alg") {
        Some(Value::String(tag)) => tag.parse(),
        Some(_) => Err(JwtError::unsupported_algorithm("alg is not a string")),
        None => Err(JwtError::unsupported_algorithm("alg is missing")),
    }
}
