//! Tamper detection, algorithm confusion and inspection isolation

mod common;

use common::*;
use cryypt_jws::{
    codec::b64url_encode, Algorithm, DecodeOptions, EncodeOptions, Jwt, JwtClaims, JwtError,
};
use proptest::prelude::*;
use serde_json::json;

fn hs256_token() -> Vec<u8> {
    let claims = JwtClaims::new().subject("user123").issued_now();
    cryypt_jws::encode(&claims, HMAC_SECRET, Algorithm::HS256, &EncodeOptions::default())
        .expect("encode should succeed")
}

fn decode_hs256(token: &[u8]) -> Result<serde_json::Map<String, serde_json::Value>, JwtError> {
    cryypt_jws::decode::<JwtClaims>(token, HMAC_SECRET, Algorithm::HS256, &DecodeOptions::default())
}

fn unsigned_token(alg: &str) -> String {
    let header = b64url_encode(format!(r#"{{"alg":"{alg}","typ":"JWT"}}"#));
    let payload = b64url_encode(r#"{"sub":"admin"}"#);
    format!("{header}.{payload}.")
}

proptest! {
    #[test]
    fn test_signature_bit_flips_are_detected(byte in 0usize..32, bit in 0u8..8) {
        let token = hs256_token();
        let compact = String::from_utf8(token).expect("ascii token");
        let (signed, signature) = compact.rsplit_once('.').expect("three segments");

        let mut raw = cryypt_jws::codec::b64url_decode(signature).expect("signature decodes");
        raw[byte] ^= 1 << bit;
        let tampered = format!("{signed}.{}", b64url_encode(&raw));

        prop_assert!(matches!(
            decode_hs256(tampered.as_bytes()),
            Err(JwtError::SignatureVerification)
        ));
    }

    #[test]
    fn test_signature_segment_character_swaps_are_detected(position in 0usize..43, replacement in "[A-Za-z0-9_-]") {
        let token = hs256_token();
        let compact = String::from_utf8(token).expect("ascii token");
        let (signed, signature) = compact.rsplit_once('.').expect("three segments");

        let mut chars: Vec<char> = signature.chars().collect();
        let new_char = replacement.chars().next().expect("one character");
        prop_assume!(chars[position] != new_char);
        chars[position] = new_char;
        let tampered = format!("{signed}.{}", chars.into_iter().collect::<String>());

        prop_assert!(matches!(
            decode_hs256(tampered.as_bytes()),
            Err(JwtError::SignatureVerification)
        ));
    }
}

#[test]
fn test_payload_tampering_is_detected() {
    let token = hs256_token();
    let compact = String::from_utf8(token).expect("ascii token");
    let segments: Vec<&str> = compact.split('.').collect();
    let forged_payload = b64url_encode(r#"{"sub":"admin"}"#);
    let forged = format!("{}.{forged_payload}.{}", segments[0], segments[2]);
    assert!(matches!(
        decode_hs256(forged.as_bytes()),
        Err(JwtError::SignatureVerification)
    ));
}

#[test]
fn test_expected_algorithm_must_match_token() {
    let token = hs256_token();
    let err = cryypt_jws::decode::<JwtClaims>(
        &token,
        HMAC_SECRET,
        Algorithm::HS512,
        &DecodeOptions::default(),
    )
    .expect_err("HS256 token decoded as HS512");
    assert!(matches!(
        err,
        JwtError::AlgorithmMismatch { ref expected, ref found } if expected == "HS512" && found == "HS256"
    ));
}

#[test]
fn test_rsa_public_key_used_as_hmac_secret_is_rejected() {
    // Classic confusion: an RS256 verifier handed an HS256 token signed with the public PEM
    let claims = JwtClaims::new().subject("attacker");
    let forged = cryypt_jws::encode(&claims, RSA_PUBLIC, Algorithm::HS256, &EncodeOptions::default())
        .expect("anyone can HMAC with public bytes");
    let err = cryypt_jws::decode::<JwtClaims>(
        &forged,
        RSA_PUBLIC,
        Algorithm::RS256,
        &DecodeOptions::default(),
    )
    .expect_err("algorithm confusion must fail");
    assert!(matches!(err, JwtError::AlgorithmMismatch { .. }));
}

#[test]
fn test_none_algorithm_never_decodes() {
    let token = unsigned_token("none");
    for algorithm in [Algorithm::HS256, Algorithm::RS256, Algorithm::ES256, Algorithm::None] {
        let err = cryypt_jws::decode::<JwtClaims>(
            token.as_bytes(),
            HMAC_SECRET,
            algorithm,
            &DecodeOptions::default(),
        )
        .expect_err("none must be rejected");
        assert!(
            matches!(err, JwtError::UnsupportedAlgorithm(_) | JwtError::InvalidKey(_)),
            "{algorithm}: unexpected {err:?}"
        );
    }
}

#[test]
fn test_none_algorithm_is_rejected_even_without_header_validation() {
    let token = unsigned_token("none");
    let err = cryypt_jws::decode::<JwtClaims>(
        token.as_bytes(),
        HMAC_SECRET,
        Algorithm::HS256,
        &DecodeOptions::default().without_headers_validation(),
    )
    .expect_err("none must be rejected");
    assert!(matches!(err, JwtError::UnsupportedAlgorithm(_)));
}

#[test]
fn test_none_algorithm_cannot_encode() {
    let err = cryypt_jws::encode(
        &JwtClaims::new(),
        HMAC_SECRET,
        Algorithm::None,
        &EncodeOptions::default(),
    )
    .expect_err("none must be rejected");
    assert!(matches!(err, JwtError::UnsupportedAlgorithm(_)));
}

#[test]
fn test_unknown_algorithm_in_header() {
    let token = unsigned_token("HS1");
    let err = decode_hs256(token.as_bytes()).expect_err("unknown alg");
    assert!(err.validation_errors().is_some_and(|errors| errors.has_field("alg")));

    let err = cryypt_jws::decode::<JwtClaims>(
        token.as_bytes(),
        HMAC_SECRET,
        Algorithm::HS256,
        &DecodeOptions::default().without_headers_validation(),
    )
    .expect_err("unknown alg");
    assert!(matches!(err, JwtError::UnsupportedAlgorithm(ref alg) if alg == "HS1"));
}

#[test]
fn test_inspection_reads_tokens_decode_rejects() {
    let token = cryypt_jws::encode(
        &JwtClaims::new().subject("user123"),
        "some-other-secret",
        Algorithm::HS256,
        &EncodeOptions::default(),
    )
    .expect("encode should succeed");

    assert!(matches!(
        decode_hs256(&token),
        Err(JwtError::SignatureVerification)
    ));

    let mut jwt = Jwt::new();
    let unsafe_token = jwt.inspect(&token, false).expect("inspection parses");
    assert_eq!(unsafe_token.payload()["sub"], json!("user123"));
    assert_eq!(unsafe_token.header()["alg"], json!("HS256"));
    assert!(jwt.token().is_none(), "inspection never yields a verified token");
    assert!(jwt.inspected().is_some());
}

#[test]
fn test_inspection_accepts_none_and_still_rejects_garbage() {
    let token = unsigned_token("none");
    let inspected = cryypt_jws::inspect(token.as_bytes(), false).expect("inspect none token");
    assert_eq!(inspected.payload()["sub"], json!("admin"));

    assert!(matches!(
        cryypt_jws::inspect("only.two", false),
        Err(JwtError::MalformedToken(_))
    ));
    assert!(matches!(
        cryypt_jws::inspect("!!.e30.", false),
        Err(JwtError::Encoding(_))
    ));
}

#[test]
fn test_verify_only_key_cannot_sign() {
    for (algorithm, public) in [
        (Algorithm::RS256, RSA_PUBLIC),
        (Algorithm::ES256, EC_P256_PUBLIC),
        (Algorithm::ES384, EC_P384_PUBLIC),
    ] {
        let err = cryypt_jws::encode(&JwtClaims::new(), public, algorithm, &EncodeOptions::default())
            .expect_err("public keys cannot sign");
        assert!(matches!(err, JwtError::InvalidKey(_)), "{algorithm}");
    }
}

#[test]
fn test_key_of_wrong_family_is_invalid() {
    let hmac = cryypt_jws::make_key(Algorithm::HS256, HMAC_SECRET).expect("hmac key");
    let err = cryypt_jws::encode(&JwtClaims::new(), &hmac, Algorithm::RS256, &EncodeOptions::default())
        .expect_err("hmac key for RS256");
    assert!(matches!(err, JwtError::InvalidKey(_)));

    let p256 = cryypt_jws::make_key(Algorithm::ES256, EC_P256_PUBLIC.as_bytes()).expect("p256 key");
    let token = cryypt_jws::encode(&JwtClaims::new(), EC_P384_PRIVATE, Algorithm::ES384, &EncodeOptions::default())
        .expect("encode ES384");
    let err = cryypt_jws::decode::<JwtClaims>(&token, &p256, Algorithm::ES384, &DecodeOptions::default())
        .expect_err("P-256 key for ES384");
    assert!(matches!(err, JwtError::InvalidKey(_)));
}

#[test]
fn test_other_rsa_key_fails_verification() {
    let token = cryypt_jws::encode(
        &JwtClaims::new().subject("user123"),
        RSA_PRIVATE,
        Algorithm::RS256,
        &EncodeOptions::default(),
    )
    .expect("encode RS256");
    let err = cryypt_jws::decode::<JwtClaims>(
        &token,
        RSA_OTHER_PUBLIC,
        Algorithm::RS256,
        &DecodeOptions::default(),
    )
    .expect_err("other key");
    assert!(matches!(err, JwtError::SignatureVerification));
    assert!(cryypt_jws::decode::<JwtClaims>(
        &token,
        RSA_OTHER_PRIVATE,
        Algorithm::RS256,
        &DecodeOptions::default()
    )
    .is_err());
}
