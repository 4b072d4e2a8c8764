//! Rule-based structural schema for claims sets
//!
//! A [`ClaimsShape`] lists the fields it knows about together with their
//! expected JSON kind and whether they are required. Validation collects
//! every failing field instead of stopping at the first one, and normalizes
//! timestamp fields to integer epoch seconds. Fields the shape does not name
//! pass through untouched.

use super::datetime::JwtDatetime;
use crate::codec::json_type_name;
use crate::error::FieldError;
use serde_json::{Map, Value};
use std::fmt;

/// Expected JSON kind of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A string
    String,
    /// A string or an array of strings (`aud`)
    StringOrStrings,
    /// A NumericDate: epoch seconds or a timezone-aware datetime string
    Timestamp,
    /// An integer
    Integer,
    /// Any number
    Number,
    /// `true` or `false`
    Boolean,
    /// Any array
    Array,
    /// Any object
    Object,
    /// Any value, including `null`
    Any,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::String => "a string",
            FieldKind::StringOrStrings => "a string or an array of strings",
            FieldKind::Timestamp => "a timestamp",
            FieldKind::Integer => "an integer",
            FieldKind::Number => "a number",
            FieldKind::Boolean => "a boolean",
            FieldKind::Array => "an array",
            FieldKind::Object => "an object",
            FieldKind::Any => "any value",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct FieldRule {
    name: String,
    kind: FieldKind,
    required: bool,
}

/// Structural schema for a claims set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimsShape {
    rules: Vec<FieldRule>,
}

impl ClaimsShape {
    /// Shape with no rules; every mapping is valid
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The seven registered claims, all optional
    #[must_use]
    pub fn registered() -> Self {
        Self::new()
            .optional_field("iss", FieldKind::String)
            .optional_field("sub", FieldKind::String)
            .optional_field("aud", FieldKind::StringOrStrings)
            .optional_field("exp", FieldKind::Timestamp)
            .optional_field("nbf", FieldKind::Timestamp)
            .optional_field("iat", FieldKind::Timestamp)
            .optional_field("jti", FieldKind::String)
    }

    /// Mark a field required, keeping its kind when already described
    #[must_use]
    pub fn require(mut self, name: &str) -> Self {
        match self.rules.iter_mut().find(|rule| rule.name == name) {
            Some(rule) => rule.required = true,
            None => self.rules.push(FieldRule {
                name: name.to_string(),
                kind: FieldKind::Any,
                required: true,
            }),
        }
        self
    }

    /// Describe a required field
    #[must_use]
    pub fn field(self, name: &str, kind: FieldKind) -> Self {
        self.with_rule(name, kind, true)
    }

    /// Describe an optional field; `null` is accepted in its place
    #[must_use]
    pub fn optional_field(self, name: &str, kind: FieldKind) -> Self {
        self.with_rule(name, kind, false)
    }

    fn with_rule(mut self, name: &str, kind: FieldKind, required: bool) -> Self {
        let rule = FieldRule {
            name: name.to_string(),
            kind,
            required,
        };
        match self.rules.iter_mut().find(|existing| existing.name == name) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self
    }

    /// Whether the shape marks `name` as required
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.name == name && rule.required)
    }

    /// Validate `claims`, returning the normalized mapping
    ///
    /// # Errors
    /// Every failing field, in rule order.
    pub fn validate(&self, claims: &Map<String, Value>) -> Result<Map<String, Value>, Vec<FieldError>> {
        let mut normalized = claims.clone();
        let mut errors = Vec::new();

        for rule in &self.rules {
            let Some(value) = claims.get(&rule.name) else {
                if rule.required {
                    errors.push(FieldError::missing(rule.name.as_str()));
                }
                continue;
            };
            if value.is_null() && !rule.required {
                continue;
            }
            match check_kind(&rule.name, rule.kind, value) {
                Ok(Some(replacement)) => {
                    normalized.insert(rule.name.clone(), replacement);
                }
                Ok(None) => {}
                Err(mut field_errors) => errors.append(&mut field_errors),
            }
        }

        if errors.is_empty() {
            Ok(normalized)
        } else {
            Err(errors)
        }
    }
}

/// Check one value; `Ok(Some(_))` carries a normalized replacement
fn check_kind(name: &str, kind: FieldKind, value: &Value) -> Result<Option<Value>, Vec<FieldError>> {
    let mismatch = || {
        vec![FieldError::invalid(
            name,
            format!("must be {kind}, found {}", json_type_name(value)),
            value,
        )]
    };

    match kind {
        FieldKind::Any => Ok(None),
        FieldKind::String if value.is_string() => Ok(None),
        FieldKind::Number if value.is_number() => Ok(None),
        FieldKind::Boolean if value.is_boolean() => Ok(None),
        FieldKind::Array if value.is_array() => Ok(None),
        FieldKind::Object if value.is_object() => Ok(None),
        FieldKind::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(None),
            Value::Number(n) => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15 => {
                    #[allow(clippy::cast_possible_truncation)]
                    let whole = f as i64;
                    Ok(Some(Value::from(whole)))
                }
                _ => Err(vec![FieldError::invalid(name, "must be an integer, found a fractional number", value)]),
            },
            _ => Err(mismatch()),
        },
        FieldKind::StringOrStrings => match value {
            Value::String(_) => Ok(None),
            Value::Array(items) => {
                let errors: Vec<FieldError> = items
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| !item.is_string())
                    .map(|(i, item)| {
                        FieldError::invalid(
                            format!("{name}[{i}]"),
                            format!("must be a string, found {}", json_type_name(item)),
                            item,
                        )
                    })
                    .collect();
                if errors.is_empty() {
                    Ok(None)
                } else {
                    Err(errors)
                }
            }
            _ => Err(mismatch()),
        },
        FieldKind::Timestamp => match serde_json::from_value::<JwtDatetime>(value.clone()) {
            Ok(datetime) if value.as_i64() == Some(datetime.timestamp()) => Ok(None),
            Ok(datetime) => Ok(Some(Value::from(datetime.timestamp()))),
            Err(err) => Err(vec![FieldError::invalid(
                name,
                format!("must be a timestamp: {err}"),
                value,
            )]),
        },
        _ => Err(mismatch()),
    }
}

/// Time-based acceptance of `exp` and `nbf` against `now`, both in epoch seconds
///
/// Expects a mapping already normalized by [`ClaimsShape::validate`].
#[must_use]
pub fn check_times(claims: &Map<String, Value>, now: i64, leeway: i64) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if let Some(exp) = claims.get("exp") {
        if let Some(expires) = exp.as_i64() {
            if now > expires.saturating_add(leeway) {
                errors.push(FieldError::invalid("exp", "token has expired", exp));
            }
        }
    }
    if let Some(nbf) = claims.get("nbf") {
        if let Some(not_before) = nbf.as_i64() {
            if now.saturating_add(leeway) < not_before {
                errors.push(FieldError::invalid("nbf", "token is not yet valid", nbf));
            }
        }
    }
    errors
}
