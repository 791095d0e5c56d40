/// Integration tests for crypto-core session tokens
///
/// This test module covers:
/// - Token round trip with the embedded profile
/// - Expiry reported separately from other failures
/// - Rejection of tampered tokens and foreign algorithms
use chrono::{Duration, Utc};
use crypto_core::{TokenError, TokenSigner};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use portal_common::Profile;
use serde_json::json;
use uuid::Uuid;

const SECRET: &[u8] = b"integration-secret";

fn writer_profile() -> Profile {
    Profile {
        id: Uuid::new_v4(),
        username: "newsroom".to_string(),
        first_name: "Jane".to_string(),
        last_name: "Roe".to_string(),
        avatar_id: Some(Uuid::new_v4()),
        roles: vec!["reader".to_string(), "writer".to_string()],
        ..Default::default()
    }
}

fn foreign_token(alg: Algorithm, profile: &Profile) -> String {
    let now = Utc::now().timestamp();
    let claims = json!({
        "iat": now,
        "exp": now + 3600,
        "profile": profile,
    });
    encode(&Header::new(alg), &claims, &EncodingKey::from_secret(SECRET))
        .expect("Failed to encode foreign token")
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn test_token_carries_full_profile() {
    let signer = TokenSigner::new(SECRET);
    let profile = writer_profile();

    let token = signer.sign(&profile).expect("Failed to sign token");
    let parsed = signer.parse(&token).expect("Failed to parse token");

    assert_eq!(parsed.id, profile.id);
    assert_eq!(parsed.avatar_id, profile.avatar_id);
    assert!(parsed.has_role("writer"));
    assert_eq!(parsed, profile);
}

#[test]
fn test_same_secret_different_instances_agree() {
    let token = TokenSigner::new(SECRET)
        .sign(&writer_profile())
        .expect("Failed to sign token");

    assert!(TokenSigner::new(SECRET).parse(&token).is_ok());
}

// ============================================================================
// Rejection
// ============================================================================

#[test]
fn test_expired_token_rejected_as_expired() {
    let stale = TokenSigner::with_ttl(SECRET, Duration::minutes(-5));
    let token = stale.sign(&writer_profile()).expect("Failed to sign token");

    let result = TokenSigner::new(SECRET).parse(&token);
    assert_eq!(result, Err(TokenError::Expired));
}

#[test]
fn test_spliced_signature_rejected() {
    let signer = TokenSigner::new(SECRET);
    let first = signer.sign(&writer_profile()).expect("Failed to sign token");
    let second = signer.sign(&writer_profile()).expect("Failed to sign token");

    let first_parts: Vec<&str> = first.split('.').collect();
    let second_parts: Vec<&str> = second.split('.').collect();
    let spliced = format!("{}.{}.{}", first_parts[0], first_parts[1], second_parts[2]);

    assert!(matches!(
        signer.parse(&spliced),
        Err(TokenError::Invalid(_))
    ));
}

#[test]
fn test_other_hmac_algorithms_rejected() {
    let signer = TokenSigner::new(SECRET);
    let profile = writer_profile();

    for alg in [Algorithm::HS256, Algorithm::HS512] {
        let token = foreign_token(alg, &profile);
        assert!(
            matches!(signer.parse(&token), Err(TokenError::Invalid(_))),
            "{:?} token must be rejected",
            alg
        );
    }
}

#[test]
fn test_hs384_token_from_same_secret_accepted() {
    let profile = writer_profile();
    let token = foreign_token(Algorithm::HS384, &profile);

    assert_eq!(TokenSigner::new(SECRET).parse(&token), Ok(profile));
}

#[test]
fn test_malformed_tokens_rejected() {
    let signer = TokenSigner::new(SECRET);

    for malformed in ["", "invalid", "two.parts", "...", "invalid!@#$.token.x"] {
        assert!(
            signer.parse(malformed).is_err(),
            "Should reject malformed token: {}",
            malformed
        );
    }
}
