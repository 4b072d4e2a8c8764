//! JWS/JWT error types

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// JWS/JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// A single structural validation failure on a header or claims field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Dotted/indexed path to the offending field, e.g. `aud[1]`.
    pub path: String,
    /// Human readable reason.
    pub message: String,
    /// The rejected value, absent when the field is missing.
    pub value: Option<Value>,
}

impl FieldError {
    /// Create a field error for a present but invalid value
    #[must_use]
    pub fn invalid(path: impl Into<String>, message: impl Into<String>, value: &Value) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            value: Some(value.clone()),
        }
    }

    /// Create a field error for a required field that is absent
    #[must_use]
    pub fn missing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: "field required".to_string(),
            value: None,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {} (got {value})", self.path, self.message),
            None => write!(f, "{}: {}", self.path, self.message),
        }
    }
}

/// Ordered, non-empty list of field errors produced by one validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Wrap the collected field errors
    #[must_use]
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    /// All field errors in the order they were found
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether any error concerns the given field path
    #[must_use]
    pub fn has_field(&self, path: &str) -> bool {
        self.0.iter().any(|e| e.path == path)
    }

    /// Number of field errors
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no errors were collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.0.len();
        write!(
            f,
            "{count} validation error{}",
            if count == 1 { "" } else { "s" }
        )?;
        for (i, error) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{error}")?;
        }
        Ok(())
    }
}

/// JWS/JWT error types
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    /// Malformed base64url or JSON in one of the token segments
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Wrong segment count or otherwise structurally invalid compact token
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Unknown `alg` tag, or `none` used outside inspection
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Token algorithm differs from the one the caller expects
    #[error("Algorithm mismatch: expected {expected}, found {found}")]
    AlgorithmMismatch {
        /// Algorithm the caller asked for
        expected: String,
        /// Algorithm carried by the token header
        found: String,
    },

    /// Key material unusable for the algorithm or direction
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// JOSE header failed structural validation
    #[error("Header validation failed: {0}")]
    HeaderValidation(ValidationErrors),

    /// Claims failed structural validation
    #[error("Claims validation failed: {0}")]
    ClaimsValidation(ValidationErrors),

    /// Recomputed signature does not match
    #[error("Signature verification failed")]
    SignatureVerification,

    /// Operation invoked before its required prior step
    #[error("Invalid state: {0}")]
    State(String),
}

impl JwtError {
    /// Create an encoding error
    #[inline]
    #[must_use]
    pub fn encoding(msg: impl Into<String>) -> Self {
        JwtError::Encoding(msg.into())
    }

    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        JwtError::MalformedToken(msg.into())
    }

    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: impl Into<String>) -> Self {
        JwtError::UnsupportedAlgorithm(alg.into())
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        JwtError::InvalidKey(msg.into())
    }

    /// Create a state error
    #[inline]
    #[must_use]
    pub fn state(msg: impl Into<String>) -> Self {
        JwtError::State(msg.into())
    }

    /// Field errors carried by a header or claims validation failure
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            JwtError::HeaderValidation(errors) | JwtError::ClaimsValidation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<base64::DecodeError> for JwtError {
    fn from(err: base64::DecodeError) -> Self {
        JwtError::Encoding(format!("invalid base64url: {err}"))
    }
}

impl From<serde_json::Error> for JwtError {
    fn from(err: serde_json::Error) -> Self {
        JwtError::Encoding(format!("invalid JSON: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validation_errors_display_lists_every_field() {
        let errors = ValidationErrors::new(vec![
            FieldError::missing("sub"),
            FieldError::invalid("aud[0]", "must be a string", &json!(7)),
        ]);
        let rendered = JwtError::ClaimsValidation(errors).to_string();
        assert_eq!(
            rendered,
            "Claims validation failed: 2 validation errors: sub: field required; aud[0]: must be a string (got 7)"
        );
    }

    #[test]
    fn validation_errors_are_reachable_from_error() {
        let err = JwtError::HeaderValidation(vec![FieldError::missing("alg")].into());
        let errors = err.validation_errors().expect("header validation carries errors");
        assert!(errors.has_field("alg"));
        assert!(JwtError::SignatureVerification.validation_errors().is_none());
    }
}
