//! Token envelopes
//!
//! A [`JwsToken`] is tagged with its verification state. Only the engine can
//! build a [`ValidatedToken`], and only after the signature and the algorithm
//! check both passed. An [`UnsafeToken`] comes out of inspection and cannot
//! be turned into a validated one.

use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Marker: signature and algorithm verified
#[derive(Debug, Clone, Copy)]
pub struct Verified;

/// Marker: parsed without verification
#[derive(Debug, Clone, Copy)]
pub struct Unverified;

/// Token whose signature was verified
pub type ValidatedToken = JwsToken<Verified>;

/// Token parsed without signature verification
pub type UnsafeToken = JwsToken<Unverified>;

/// The three base64url segments and the assembled compact form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSegments {
    header: String,
    payload: String,
    signature: String,
    detached: bool,
}

impl EncodedSegments {
    pub(crate) fn new(header: String, payload: String, signature: String, detached: bool) -> Self {
        Self {
            header,
            payload,
            signature,
            detached,
        }
    }

    /// Header segment
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Payload segment, always the full encoded payload even when detached
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Signature segment
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Whether the compact output omits the payload
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// `header.payload`, the bytes the signature covers
    #[must_use]
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.header, self.payload)
    }

    /// Compact serialization; the payload segment is blank when detached
    #[must_use]
    pub fn compact(&self) -> Vec<u8> {
        let payload = if self.detached { "" } else { self.payload.as_str() };
        format!("{}.{}.{}", self.header, payload, self.signature).into_bytes()
    }

    pub(crate) fn detached(mut self) -> Self {
        self.detached = true;
        self
    }
}

/// A JWS with its decoded header and payload
#[derive(Debug, Clone)]
pub struct JwsToken<S> {
    encoded: EncodedSegments,
    header: Map<String, Value>,
    payload: Map<String, Value>,
    signature: Vec<u8>,
    state: PhantomData<S>,
}

impl<S> JwsToken<S> {
    /// Encoded segments
    #[must_use]
    pub fn encoded(&self) -> &EncodedSegments {
        &self.encoded
    }

    /// Compact serialization
    #[must_use]
    pub fn compact(&self) -> Vec<u8> {
        self.encoded.compact()
    }

    /// Decoded header parameters
    #[must_use]
    pub fn header(&self) -> &Map<String, Value> {
        &self.header
    }

    /// Decoded payload claims
    #[must_use]
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Raw signature bytes
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Take the decoded payload
    #[must_use]
    pub fn into_payload(self) -> Map<String, Value> {
        self.payload
    }
}

impl JwsToken<Verified> {
    pub(crate) fn verified(
        encoded: EncodedSegments,
        header: Map<String, Value>,
        payload: Map<String, Value>,
        signature: Vec<u8>,
    ) -> Self {
        Self {
            encoded,
            header,
            payload,
            signature,
            state: PhantomData,
        }
    }

    /// Same token, serialized with the payload segment blank
    #[must_use]
    pub fn detach_payload(self) -> Self {
        Self {
            encoded: self.encoded.detached(),
            ..self
        }
    }
}

impl JwsToken<Unverified> {
    pub(crate) fn unverified(
        encoded: EncodedSegments,
        header: Map<String, Value>,
        payload: Map<String, Value>,
        signature: Vec<u8>,
    ) -> Self {
        Self {
            encoded,
            header,
            payload,
            signature,
            state: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_compact_blanks_only_the_payload() {
        let segments = EncodedSegments::new("aGVhZA".into(), "Ym9keQ".into(), "c2ln".into(), false);
        assert_eq!(segments.compact(), b"aGVhZA.Ym9keQ.c2ln".to_vec());

        let detached = segments.detached();
        assert_eq!(detached.compact(), b"aGVhZA..c2ln".to_vec());
        assert_eq!(detached.signing_input(), "aGVhZA.Ym9keQ");
    }
}
