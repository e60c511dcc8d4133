//! Password hashing (Argon2id, PHC string format)

use std::fmt;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};

/// Stored password hash. Never rendered in logs or responses.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashedCredential(String);

impl HashedCredential {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedCredential(<redacted>)")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Password hashing failed: {0}")]
pub struct PasswordError(String);

/// Hash a password with a fresh random salt.
///
/// Fails only if the hasher itself fails (entropy or parameter errors).
pub fn hash(password: &str) -> Result<HashedCredential, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| HashedCredential(h.to_string()))
        .map_err(|e| PasswordError(e.to_string()))
}

/// Check a password against a stored hash. A hash that cannot be parsed
/// verifies as `false`.
pub fn verify(password: &str, hashword: &HashedCredential) -> bool {
    PasswordHash::new(hashword.as_str())
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hashed = hash("examplePassword").unwrap();
        assert!(verify("examplePassword", &hashed));
        assert!(!verify("wrongPassword", &hashed));
        assert!(!verify("", &hashed));
        assert!(!hashed.as_str().contains("examplePassword"));
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash("examplePassword").unwrap();
        let b = hash("examplePassword").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let bogus = HashedCredential("not-a-phc-string".to_string());
        assert!(!verify("anything", &bogus));
    }

    #[test]
    fn test_debug_redacts() {
        let hashed = hash("examplePassword").unwrap();
        assert_eq!(format!("{hashed:?}"), "HashedCredential(<redacted>)");
    }
}
