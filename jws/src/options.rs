//! Per-call options for the JWT facade.

use crate::header::JoseHeader;
use chrono::Duration;

/// Encoding options.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Header to use instead of the default `{alg, typ: "JWT"}`.
    pub headers: Option<JoseHeader>,
    /// Build the claims without checking them against the claims shape.
    pub disable_claims_validation: bool,
    /// Skip structural header validation.
    pub disable_headers_validation: bool,
}

impl EncodeOptions {
    /// Default options: default header, all validation on.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom header.
    #[must_use]
    pub fn with_headers(mut self, headers: JoseHeader) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Skip claims validation.
    #[must_use]
    pub fn without_claims_validation(mut self) -> Self {
        self.disable_claims_validation = true;
        self
    }

    /// Skip header validation.
    #[must_use]
    pub fn without_headers_validation(mut self) -> Self {
        self.disable_headers_validation = true;
        self
    }
}

/// Decoding options.
///
/// Disabling claims validation only downgrades shape failures to a log
/// entry; the signature is always verified.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Log claims validation failures instead of returning them.
    pub disable_claims_validation: bool,
    /// Skip structural header validation.
    pub disable_headers_validation: bool,
    /// Check `exp` and `nbf` against the current time with this leeway.
    pub time_leeway: Option<Duration>,
}

impl DecodeOptions {
    /// Default options: all structural validation on, no time checks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip claims validation.
    #[must_use]
    pub fn without_claims_validation(mut self) -> Self {
        self.disable_claims_validation = true;
        self
    }

    /// Skip header validation.
    #[must_use]
    pub fn without_headers_validation(mut self) -> Self {
        self.disable_headers_validation = true;
        self
    }

    /// Reject expired and not-yet-valid tokens, allowing `leeway` clock skew.
    #[must_use]
    pub fn validate_time(mut self, leeway: Duration) -> Self {
        self.time_leeway = Some(leeway);
        self
    }
}
