/// Password hashing and verification using Argon2id
use crate::error::{Result, UserError};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

/// Hash verified when the login is unknown, so signin takes comparable time
/// whether or not the account exists.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"portal-dummy-password", &salt)
        .map(|h| h.to_string())
        .map_err(|e| tracing::error!(error = %e, "Failed to build dummy password hash"))
        .ok()
});

/// Hash a password with Argon2id and a random 16-byte salt.
///
/// Returns a PHC-formatted string safe for database storage.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| UserError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its PHC hash (constant-time comparison)
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| UserError::Internal(format!("Invalid password hash format: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(UserError::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

/// Burn one verification for a login that does not exist. Always false.
pub fn verify_dummy(password: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hash1 = hash_password("secret").unwrap();
        let hash2 = hash_password("secret").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_malformed_hash_is_internal_error() {
        assert!(matches!(
            verify_password("secret", "not-a-phc-string"),
            Err(UserError::Internal(_))
        ));
    }

    #[test]
    fn test_dummy_never_matches() {
        assert!(!verify_dummy("portal-dummy-password"));
        assert!(!verify_dummy(""));
    }
}
