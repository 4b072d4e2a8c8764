//! JOSE header model and validation

use crate::algorithms::Algorithm;
use crate::codec::{json_type_name, to_json_map};
use crate::error::{FieldError, JwtError, JwtResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Header parameters registered by RFC 7515 §4.1; these may never be listed in `crit`
const REGISTERED_PARAMETERS: [&str; 11] = [
    "alg", "jku", "jwk", "kid", "x5u", "x5c", "x5t", "x5t#S256", "typ", "cty", "crit",
];

/// Registered parameters that must be strings when present
const STRING_PARAMETERS: [&str; 7] = ["typ", "cty", "kid", "jku", "x5u", "x5t", "x5t#S256"];

/// Parameters carried by dedicated [`JoseHeader`] fields; `extra` may not repeat them
const FIELD_PARAMETERS: [&str; 5] = ["alg", "typ", "cty", "kid", "crit"];

/// Extension parameters this implementation understands; `crit` may only name these
const UNDERSTOOD_EXTENSIONS: [&str; 0] = [];

/// JOSE header of a JWS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoseHeader {
    /// Signature algorithm tag
    pub alg: String,
    /// Media type of the complete token, `JWT` by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Media type of the payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cty: Option<String>,
    /// Key identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Critical extension parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crit: Option<Vec<String>>,
    /// Any other parameters, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JoseHeader {
    /// Default header for `algorithm`: `{"alg": .., "typ": "JWT"}`
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            alg: algorithm.as_str().to_string(),
            typ: Some("JWT".to_string()),
            cty: None,
            kid: None,
            crit: None,
            extra: Map::new(),
        }
    }

    /// Set `kid`
    #[must_use]
    pub fn key_id(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Set `cty`
    #[must_use]
    pub fn content_type(mut self, cty: impl Into<String>) -> Self {
        self.cty = Some(cty.into());
        self
    }

    /// Set or clear `typ`
    #[must_use]
    pub fn token_type(mut self, typ: Option<String>) -> Self {
        self.typ = typ;
        self
    }

    /// Add a further header parameter
    ///
    /// `alg`, `typ`, `cty`, `kid` and `crit` have their own fields; naming
    /// one of them here makes [`JoseHeader::to_map`] fail.
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Parsed `alg`
    ///
    /// # Errors
    /// [`JwtError::UnsupportedAlgorithm`] for an unknown tag.
    pub fn algorithm(&self) -> JwtResult<Algorithm> {
        self.alg.parse()
    }

    /// Header as a JSON object
    ///
    /// # Errors
    /// - [`JwtError::HeaderValidation`] when `extra` repeats a parameter that
    ///   has its own field, since the flattened value would replace it
    /// - [`JwtError::Encoding`] if a parameter cannot be serialized
    pub fn to_map(&self) -> JwtResult<Map<String, Value>> {
        let shadowed: Vec<FieldError> = FIELD_PARAMETERS
            .iter()
            .filter_map(|name| {
                self.extra.get(*name).map(|value| {
                    FieldError::invalid(*name, "must be set through its header field", value)
                })
            })
            .collect();
        if !shadowed.is_empty() {
            return Err(JwtError::HeaderValidation(shadowed.into()));
        }
        to_json_map(self)
    }
}

/// Structural validation of a decoded or caller-supplied header
///
/// `alg` must be a registered algorithm tag (`none` included; rejecting it is
/// the engine's decision). Registered string parameters must be strings.
/// `crit` must be a non-empty array of strings naming parameters that are
/// present, are not registered, and are understood.
///
/// # Errors
/// All failing fields, in parameter order.
pub fn validate_header(header: &Map<String, Value>) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    match header.get("alg") {
        None => errors.push(FieldError::missing("alg")),
        Some(Value::String(tag)) => {
            if tag.parse::<Algorithm>().is_err() {
                errors.push(FieldError::invalid(
                    "alg",
                    "unknown algorithm",
                    &Value::String(tag.clone()),
                ));
            }
        }
        Some(other) => errors.push(FieldError::invalid(
            "alg",
            format!("must be a string, found {}", json_type_name(other)),
            other,
        )),
    }

    for name in STRING_PARAMETERS {
        if let Some(value) = header.get(name) {
            if !value.is_string() {
                errors.push(FieldError::invalid(
                    name,
                    format!("must be a string, found {}", json_type_name(value)),
                    value,
                ));
            }
        }
    }

    if let Some(crit) = header.get("crit") {
        validate_crit(header, crit, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_crit(header: &Map<String, Value>, crit: &Value, errors: &mut Vec<FieldError>) {
    let Value::Array(entries) = crit else {
        errors.push(FieldError::invalid(
            "crit",
            format!("must be an array of strings, found {}", json_type_name(crit)),
            crit,
        ));
        return;
    };
    if entries.is_empty() {
        errors.push(FieldError::invalid("crit", "must not be empty", crit));
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        let path = format!("crit[{i}]");
        let Value::String(name) = entry else {
            errors.push(FieldError::invalid(
                path,
                format!("must be a string, found {}", json_type_name(entry)),
                entry,
            ));
            continue;
        };
        if REGISTERED_PARAMETERS.contains(&name.as_str()) {
            errors.push(FieldError::invalid(path, "must not name a registered parameter", entry));
        } else if !header.contains_key(name) {
            errors.push(FieldError::invalid(path, "names a parameter absent from the header", entry));
        } else if !UNDERSTOOD_EXTENSIONS.contains(&name.as_str()) {
            errors.push(FieldError::invalid(path, "names an extension that is not understood", entry));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test input must be an object"),
        }
    }

    #[test]
    fn default_header_has_alg_and_typ() {
        let header = JoseHeader::new(Algorithm::ES384).to_map().expect("header map");
        assert_eq!(Value::Object(header), json!({"alg": "ES384", "typ": "JWT"}));
    }

    #[test]
    fn extra_parameters_round_trip() {
        let header = JoseHeader::new(Algorithm::HS256)
            .key_id("k1")
            .parameter("x-trace", "abc");
        let map = header.to_map().expect("header map");
        assert_eq!(map["x-trace"], json!("abc"));
        let back: JoseHeader = serde_json::from_value(Value::Object(map)).expect("header");
        assert_eq!(back, header);
    }

    #[test]
    fn extra_cannot_shadow_field_parameters() {
        for name in ["alg", "typ", "kid", "crit"] {
            let err = JoseHeader::new(Algorithm::HS256)
                .parameter(name, "HS512")
                .to_map()
                .expect_err("shadowed parameter");
            let errors = err.validation_errors().expect("header field errors");
            assert!(errors.has_field(name), "{name}");
        }
    }

    #[test]
    fn missing_and_unknown_alg() {
        let errors = validate_header(&map(json!({"typ": "JWT"}))).expect_err("alg missing");
        assert_eq!(errors[0].path, "alg");
        assert!(validate_header(&map(json!({"alg": "PS256"}))).is_err());
        assert!(validate_header(&map(json!({"alg": 256}))).is_err());
    }

    #[test]
    fn none_passes_structural_validation() {
        assert!(validate_header(&map(json!({"alg": "none"}))).is_ok());
    }

    #[test]
    fn registered_string_parameters_are_typed() {
        let errors = validate_header(&map(json!({"alg": "HS256", "typ": 1, "kid": ["a"]})))
            .expect_err("typ and kid must be strings");
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["typ", "kid"]);
    }

    #[test]
    fn crit_rules() {
        assert!(validate_header(&map(json!({"alg": "HS256", "crit": []}))).is_err());
        assert!(validate_header(&map(json!({"alg": "HS256", "crit": ["kid"], "kid": "a"}))).is_err());
        assert!(validate_header(&map(json!({"alg": "HS256", "crit": ["exp"]}))).is_err());
        let errors = validate_header(&map(json!({"alg": "HS256", "crit": ["exp"], "exp": 1})))
            .expect_err("extension not understood");
        assert_eq!(errors[0].path, "crit[0]");
    }
}
