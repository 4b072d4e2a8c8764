//! Shared fixtures for the integration tests

#![allow(dead_code)]

use cryypt_jws::claims::{ClaimsModel, ClaimsShape, FieldKind, JwtClaims};
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::{Arc, Mutex, Once};

pub const RSA_PRIVATE: &str = include_str!("../keys/rsa_private.pem");
pub const RSA_PRIVATE_PKCS1: &str = include_str!("../keys/rsa_private_pkcs1.pem");
pub const RSA_PUBLIC: &str = include_str!("../keys/rsa_public.pem");
pub const RSA_OTHER_PRIVATE: &str = include_str!("../keys/rsa_other_private.pem");
pub const RSA_OTHER_PUBLIC: &str = include_str!("../keys/rsa_other_public.pem");
pub const EC_P256_PRIVATE: &str = include_str!("../keys/ec_p256_private.pem");
pub const EC_P256_PRIVATE_SEC1: &str = include_str!("../keys/ec_p256_private_sec1.pem");
pub const EC_P256_PUBLIC: &str = include_str!("../keys/ec_p256_public.pem");
pub const EC_P384_PRIVATE: &str = include_str!("../keys/ec_p384_private.pem");
pub const EC_P384_PUBLIC: &str = include_str!("../keys/ec_p384_public.pem");
pub const EC_P521_PRIVATE: &str = include_str!("../keys/ec_p521_private.pem");
pub const EC_P521_PUBLIC: &str = include_str!("../keys/ec_p521_public.pem");

/// 64-byte HMAC secret, long enough for every HS* algorithm
pub const HMAC_SECRET: &[u8] = b"0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

static INIT: Once = Once::new();

/// Route `tracing` output through the test harness
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber recording `INFO` and above
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = buffer.0.lock().map(|bytes| String::from_utf8_lossy(&bytes).into_owned()).unwrap_or_default();
    (result, logs)
}

/// Application claims with a required subject and custom fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomClaims {
    #[serde(flatten)]
    pub registered: JwtClaims,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub optional_id: Option<i64>,
}

impl ClaimsModel for CustomClaims {
    fn shape() -> ClaimsShape {
        ClaimsShape::registered()
            .require("sub")
            .field("user_id", FieldKind::String)
            .optional_field("optional_id", FieldKind::Integer)
    }
}

/// Valid custom claims
pub fn custom_claims() -> CustomClaims {
    CustomClaims {
        registered: JwtClaims::new()
            .subject("user123")
            .issued_now()
            .with_expiration(chrono::Duration::minutes(30)),
        user_id: Some("u-42".to_string()),
        optional_id: None,
    }
}
