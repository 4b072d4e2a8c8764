//! Codec - base64url segments and JSON object serialization
//!
//! Every compact token segment is base64url without padding (RFC 7515 §2).
//! Decoding is strict: padding characters, characters outside the URL-safe
//! alphabet and truncated groups are all rejected.

use crate::error::{JwtError, JwtResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Serialize;
use serde_json::{Map, Value};

/// Base64 URL-safe encoding without padding
#[inline]
#[must_use]
pub fn b64url_encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Base64 URL-safe decoding without padding
///
/// # Errors
/// Returns [`JwtError::Encoding`] on padding, an invalid alphabet character
/// or a truncated final group.
#[inline]
pub fn b64url_decode(input: impl AsRef<[u8]>) -> JwtResult<Vec<u8>> {
    Ok(URL_SAFE_NO_PAD.decode(input)?)
}

/// Serialize a value to compact JSON bytes
///
/// # Errors
/// Returns [`JwtError::Encoding`] when the value cannot be represented as JSON.
#[inline]
pub fn json_encode<T: Serialize + ?Sized>(value: &T) -> JwtResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Deserialize JSON bytes that must hold a top-level object
///
/// # Errors
/// Returns [`JwtError::Encoding`] on malformed JSON or a non-object document.
pub fn json_decode(input: &[u8]) -> JwtResult<Map<String, Value>> {
    match serde_json::from_slice::<Value>(input)? {
        Value::Object(map) => Ok(map),
        other => Err(JwtError::encoding(format!(
            "expected a JSON object, found {}",
            json_type_name(&other)
        ))),
    }
}

/// Serialize a value into a JSON object map
pub(crate) fn to_json_map<T: Serialize + ?Sized>(value: &T) -> JwtResult<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(JwtError::encoding(format!(
            "expected a JSON object, found {}",
            json_type_name(&other)
        ))),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
