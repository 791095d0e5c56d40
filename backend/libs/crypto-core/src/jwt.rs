/// Session token signer shared by the portal services
///
/// Tokens are HS384 JWTs carrying the full user `Profile` as claims, valid for
/// 12 hours from signing. Verification is pure: no I/O, no session store.
///
/// ## Security Design
///
/// - **HS384 ONLY**: validation accepts a single symmetric algorithm, so a
///   token whose header names any other algorithm is rejected
/// - **Zero leeway**: a token is expired the second `exp` passes
/// - **No revocation**: the only way to invalidate outstanding tokens is to
///   rotate the shared secret, which invalidates all of them at once
///
/// ## Usage
///
/// ```rust
/// use crypto_core::jwt::TokenSigner;
/// use portal_common::Profile;
///
/// let signer = TokenSigner::new(b"shared-secret");
/// let token = signer.sign(&Profile::default()).unwrap();
/// let profile = signer.parse(&token).unwrap();
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use portal_common::Profile;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

pub const TOKEN_TTL_HOURS: i64 = 12;

/// JWT algorithm - the only one `parse` will accept
const JWT_ALGORITHM: Algorithm = Algorithm::HS384;

// ============================================================================
// Data Structures
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("can't sign token: {0}")]
    Signing(String),
}

/// JWT claims: registered timestamps plus the embedded profile
#[derive(Debug, Serialize, Deserialize, Clone)]
struct Claims {
    /// Issued at (Unix timestamp)
    iat: i64,
    /// Expiration time (Unix timestamp)
    exp: i64,
    profile: Profile,
}

/// Signs and verifies session tokens with a shared secret.
///
/// Cheap to clone behind an `Arc`; all state is immutable after construction.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("algorithm", &JWT_ALGORITHM)
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenSigner {
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::hours(TOKEN_TTL_HOURS))
    }

    /// Signer with a custom lifetime. Used by tests to mint expired tokens.
    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.algorithms = vec![JWT_ALGORITHM];
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    // ========================================================================
    // Token Generation
    // ========================================================================

    pub fn sign(&self, profile: &Profile) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            profile: profile.clone(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    // ========================================================================
    // Token Validation
    // ========================================================================

    /// Verify signature, algorithm and expiry; return the embedded profile.
    ///
    /// Expiry is reported as `TokenError::Expired` so callers can tell a
    /// stale session from a forged or malformed one.
    pub fn parse(&self, token: &str) -> Result<Profile, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.profile)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => {
                    tracing::debug!(error = %e, "Token validation failed");
                    TokenError::Invalid(e.to_string())
                }
            })
    }
}

// ============================================================================
// Tests
// ============================================================================
