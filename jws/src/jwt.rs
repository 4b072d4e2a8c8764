//! JWT facade
//!
//! [`Jwt`] binds a claims type to the JWS engine. It validates claims against
//! the type's [`ClaimsShape`](crate::claims::ClaimsShape) on the way in and,
//! after the signature has verified, on the way out. The token produced or
//! accepted by the most recent call is kept as the session and cleared at the
//! start of every call.

use crate::algorithms::Algorithm;
use crate::claims::{check_times, ClaimsModel, JwtClaims};
use crate::codec::to_json_map;
use crate::error::{FieldError, JwtError, JwtResult};
use crate::header::{validate_header, JoseHeader};
use crate::jws::{inspect_unverified, Jws};
use crate::keys::KeySource;
use crate::options::{DecodeOptions, EncodeOptions};
use crate::token::{UnsafeToken, ValidatedToken};
use chrono::Utc;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
enum Session {
    Encoded(ValidatedToken),
    Decoded(ValidatedToken),
    Inspected(UnsafeToken),
}

/// JWT encoder/decoder with per-call session state
#[derive(Debug, Clone, Default)]
pub struct Jwt {
    session: Option<Session>,
}

impl Jwt {
    /// Fresh facade with no session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Verified token from the last successful `encode` or `decode`
    #[must_use]
    pub fn token(&self) -> Option<&ValidatedToken> {
        match &self.session {
            Some(Session::Encoded(token) | Session::Decoded(token)) => Some(token),
            _ => None,
        }
    }

    /// Unverified token from the last successful `inspect`
    #[must_use]
    pub fn inspected(&self) -> Option<&UnsafeToken> {
        match &self.session {
            Some(Session::Inspected(token)) => Some(token),
            _ => None,
        }
    }

    /// Encode and sign `claims` as a compact JWT
    ///
    /// The claims are checked against `C::shape()` unless
    /// `disable_claims_validation` is set; timestamp claims are normalized to
    /// epoch seconds. Without custom headers the header is `{alg, typ: "JWT"}`.
    ///
    /// # Errors
    /// - [`JwtError::ClaimsValidation`] / [`JwtError::HeaderValidation`] for invalid input
    /// - [`JwtError::UnsupportedAlgorithm`] for `none`
    /// - [`JwtError::AlgorithmMismatch`] when custom headers name another algorithm
    /// - [`JwtError::InvalidKey`] when the key cannot sign with `algorithm`
    pub fn encode<'k, C: ClaimsModel>(
        &mut self,
        claims: &C,
        key: impl Into<KeySource<'k>>,
        algorithm: Algorithm,
        options: &EncodeOptions,
    ) -> JwtResult<Vec<u8>> {
        self.session = None;

        let payload = prepare_claims(claims, options.disable_claims_validation)?;
        let header = prepare_headers(
            options.headers.as_ref(),
            algorithm,
            options.disable_headers_validation,
        )?;
        let key = key.into().resolve(algorithm)?;

        let token = Jws::new(algorithm)
            .without_header_validation()
            .encode(&header, &payload, &key)?;
        let compact = token.compact();
        self.session = Some(Session::Encoded(token));
        Ok(compact)
    }

    /// Encode the default compliant claims (`iat` = now)
    ///
    /// # Errors
    /// As [`Jwt::encode`].
    pub fn encode_default<'k>(
        &mut self,
        key: impl Into<KeySource<'k>>,
        algorithm: Algorithm,
        options: &EncodeOptions,
    ) -> JwtResult<Vec<u8>> {
        self.encode(&JwtClaims::compliant(), key, algorithm, options)
    }

    /// Blank the payload segment of the token encoded in this session
    ///
    /// # Errors
    /// [`JwtError::State`] when the session holds no encoded token.
    pub fn detach_payload(&mut self) -> JwtResult<Vec<u8>> {
        match self.session.take() {
            Some(Session::Encoded(token)) => {
                let token = token.detach_payload();
                let compact = token.compact();
                self.session = Some(Session::Encoded(token));
                Ok(compact)
            }
            other => {
                self.session = other;
                Err(JwtError::state("JWT token has not been encoded yet"))
            }
        }
    }

    /// Verify `token` and return its claims
    ///
    /// Claims are checked against `C::shape()` only after the signature has
    /// verified. With `disable_claims_validation` a failing check is logged
    /// and the claims are still returned.
    ///
    /// # Errors
    /// Any [`Jws::decode`] error, or [`JwtError::ClaimsValidation`].
    pub fn decode<'k, C: ClaimsModel>(
        &mut self,
        token: impl AsRef<[u8]>,
        key: impl Into<KeySource<'k>>,
        algorithm: Algorithm,
        options: &DecodeOptions,
    ) -> JwtResult<Map<String, Value>> {
        self.session = None;
        let key = key.into().resolve(algorithm)?;
        let verified = engine(algorithm, options).decode(token.as_ref(), &key)?;
        self.accept::<C>(verified, options)
    }

    /// Verify a detached-payload `token` against `payload`
    ///
    /// # Errors
    /// As [`Jwt::decode`]; `payload` itself is checked against `C::shape()`
    /// before verification unless claims validation is disabled.
    pub fn decode_detached<'k, C: ClaimsModel>(
        &mut self,
        token: impl AsRef<[u8]>,
        payload: &C,
        key: impl Into<KeySource<'k>>,
        algorithm: Algorithm,
        options: &DecodeOptions,
    ) -> JwtResult<Map<String, Value>> {
        self.session = None;
        let key = key.into().resolve(algorithm)?;
        let payload = prepare_claims(payload, options.disable_claims_validation)?;
        let verified = engine(algorithm, options)
            .with_detached_payload()
            .decode_detached(token.as_ref(), &payload, &key)?;
        self.accept::<C>(verified, options)
    }

    /// Verify `token` and deserialize its claims into `C`
    ///
    /// # Errors
    /// As [`Jwt::decode`], plus [`JwtError::ClaimsValidation`] when the
    /// verified claims do not deserialize into `C`.
    pub fn decode_typed<'k, C: ClaimsModel>(
        &mut self,
        token: impl AsRef<[u8]>,
        key: impl Into<KeySource<'k>>,
        algorithm: Algorithm,
        options: &DecodeOptions,
    ) -> JwtResult<C> {
        let claims = self.decode::<C>(token, key, algorithm, options)?;
        serde_json::from_value(Value::Object(claims)).map_err(|e| {
            JwtError::ClaimsValidation(
                vec![FieldError {
                    path: "claims".to_string(),
                    message: e.to_string(),
                    value: None,
                }]
                .into(),
            )
        })
    }

    /// Parse `token` without verifying its signature or validating its header
    ///
    /// For debugging only; nothing in the returned token can be trusted.
    ///
    /// # Errors
    /// [`JwtError::MalformedToken`] or [`JwtError::Encoding`] when the token
    /// cannot be parsed at all.
    pub fn inspect(
        &mut self,
        token: impl AsRef<[u8]>,
        has_detached_payload: bool,
    ) -> JwtResult<UnsafeToken> {
        self.session = None;
        let unsafe_token = inspect_unverified(token.as_ref(), has_detached_payload)?;
        self.session = Some(Session::Inspected(unsafe_token.clone()));
        Ok(unsafe_token)
    }

    fn accept<C: ClaimsModel>(
        &mut self,
        verified: ValidatedToken,
        options: &DecodeOptions,
    ) -> JwtResult<Map<String, Value>> {
        let errors = match C::shape().validate(verified.payload()) {
            Ok(normalized) => match options.time_leeway {
                Some(leeway) => check_times(&normalized, Utc::now().timestamp(), leeway.num_seconds()),
                None => Vec::new(),
            },
            Err(errors) => errors,
        };

        if !errors.is_empty() {
            let errors = crate::error::ValidationErrors::new(errors);
            if !options.disable_claims_validation {
                return Err(JwtError::ClaimsValidation(errors));
            }
            tracing::info!(%errors, "claims validation failed during decoding");
        }

        let claims = verified.payload().clone();
        self.session = Some(Session::Decoded(verified));
        Ok(claims)
    }
}

fn engine(algorithm: Algorithm, options: &DecodeOptions) -> Jws {
    let jws = Jws::new(algorithm);
    if options.disable_headers_validation {
        jws.without_header_validation()
    } else {
        jws
    }
}

fn prepare_claims<C: ClaimsModel>(claims: &C, disable_validation: bool) -> JwtResult<Map<String, Value>> {
    let raw = to_json_map(claims)?;
    if disable_validation {
        return Ok(raw);
    }
    C::shape()
        .validate(&raw)
        .map_err(|errors| JwtError::ClaimsValidation(errors.into()))
}

fn prepare_headers(
    headers: Option<&JoseHeader>,
    algorithm: Algorithm,
    disable_validation: bool,
) -> JwtResult<JoseHeader> {
    let Some(headers) = headers else {
        return Ok(JoseHeader::new(algorithm));
    };
    let mut header = headers.clone();
    if header.alg.is_empty() {
        header.alg = algorithm.as_str().to_string();
    }
    if !disable_validation {
        validate_header(&header.to_map()?).map_err(|errors| JwtError::HeaderValidation(errors.into()))?;
    }
    Ok(header)
}
