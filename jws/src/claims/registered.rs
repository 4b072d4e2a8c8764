//! Registered JWT claims (RFC 7519 §4.1)

use super::datetime::JwtDatetime;
use super::shape::ClaimsShape;
use super::ClaimsModel;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `aud`: a single audience or a list of audiences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// One audience string
    Single(String),
    /// Several audience strings
    Many(Vec<String>),
}

impl Audience {
    /// Whether `audience` is among the listed audiences
    #[must_use]
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(value) => value == audience,
            Audience::Many(values) => values.iter().any(|v| v == audience),
        }
    }
}

impl From<&str> for Audience {
    fn from(value: &str) -> Self {
        Audience::Single(value.to_string())
    }
}

impl From<String> for Audience {
    fn from(value: String) -> Self {
        Audience::Single(value)
    }
}

impl From<Vec<String>> for Audience {
    fn from(values: Vec<String>) -> Self {
        Audience::Many(values)
    }
}

/// The registered claims plus any further claims
///
/// Every registered claim is optional. Additional claims are kept in
/// [`JwtClaims::extra`] and serialized alongside the registered ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    /// Expiration time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<JwtDatetime>,
    /// Not before
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<JwtDatetime>,
    /// Issued at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<JwtDatetime>,
    /// JWT ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Non-registered claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JwtClaims {
    /// Empty claims set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully compliant default claims: `iat` set to now
    #[must_use]
    pub fn compliant() -> Self {
        Self::new().issued_now()
    }

    /// Set `iss`
    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }

    /// Set `sub`
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.sub = Some(subject.into());
        self
    }

    /// Set `aud`
    #[must_use]
    pub fn audience(mut self, audience: impl Into<Audience>) -> Self {
        self.aud = Some(audience.into());
        self
    }

    /// Set `exp` to now plus `ttl`
    #[must_use]
    pub fn expires_in(mut self, ttl: Duration) -> Self {
        self.exp = Some(JwtDatetime::now() + ttl);
        self
    }

    /// Set `exp`
    #[must_use]
    pub fn expires_at(mut self, exp: impl Into<JwtDatetime>) -> Self {
        self.exp = Some(exp.into());
        self
    }

    /// Set `iat` to now
    #[must_use]
    pub fn issued_now(mut self) -> Self {
        self.iat = Some(JwtDatetime::now());
        self
    }

    /// Set `iat`
    #[must_use]
    pub fn issued_at(mut self, iat: impl Into<JwtDatetime>) -> Self {
        self.iat = Some(iat.into());
        self
    }

    /// Set `nbf`
    #[must_use]
    pub fn not_before(mut self, nbf: impl Into<JwtDatetime>) -> Self {
        self.nbf = Some(nbf.into());
        self
    }

    /// Set `jti`
    #[must_use]
    pub fn jwt_id(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }

    /// Add a non-registered claim
    #[must_use]
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Set `exp` relative to `iat`, stamping `iat` with now when absent
    #[must_use]
    pub fn with_expiration(mut self, lifetime: Duration) -> Self {
        let issued = *self.iat.get_or_insert_with(JwtDatetime::now);
        self.exp = Some(issued + lifetime);
        self
    }
}

impl ClaimsModel for JwtClaims {
    fn shape() -> ClaimsShape {
        ClaimsShape::registered()
    }
}
