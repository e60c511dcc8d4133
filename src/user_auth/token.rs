//! Bearer token issuing and verification (HS256 JWT)
//!
//! Tokens are self-contained: verification never touches the store, and
//! there is no revocation list. A token is valid until `exp`.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::models::UserProjection;

/// JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User projection as of issuance
    pub user: UserProjection,
    /// Subject (username)
    pub sub: String,
    /// Issued at (epoch seconds)
    #[serde(default)]
    pub iat: i64,
    /// Expiry (epoch seconds)
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token signature does not match")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token is malformed")]
    Malformed,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed,
        }
    }
}

pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token embedding `user`, expiring `ttl` from now
    pub fn issue(&self, user: UserProjection, subject: &str) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        self.sign(&Claims {
            user,
            sub: subject.to_string(),
            iat: now,
            exp: now + self.ttl_secs(),
        })
    }

    /// Check signature and expiry and return the embedded claims unchanged
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        Ok(decode::<Claims>(token, &self.decoding, &self.validation)?.claims)
    }

    /// Re-issue carrying the existing claim's user as-is (no reload).
    ///
    /// The new expiry is never earlier than the existing one.
    pub fn refresh(&self, existing: &Claims) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        self.sign(&Claims {
            user: existing.user.clone(),
            sub: existing.user.username.clone(),
            iat: now,
            exp: (now + self.ttl_secs()).max(existing.exp),
        })
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn ttl_secs(&self) -> i64 {
        i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";
    const WEEK: Duration = Duration::from_secs(7 * 24 * 3600);

    fn derek() -> UserProjection {
        UserProjection {
            id: None,
            username: "exampleUser".to_string(),
            first_name: "Derek".to_string(),
            last_name: "Jeter".to_string(),
            players: Vec::new(),
        }
    }

    fn raw_token(secret: &[u8], alg: Algorithm, exp: i64) -> String {
        let claims = Claims {
            user: derek(),
            sub: "exampleUser".to_string(),
            iat: Utc::now().timestamp(),
            exp,
        };
        encode(&Header::new(alg), &claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let issuer = TokenIssuer::new(SECRET, WEEK);
        let token = issuer.issue(derek(), "exampleUser").unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.user, derek());
        assert_eq!(claims.sub, "exampleUser");
        assert_eq!(claims.exp - claims.iat, WEEK.as_secs() as i64);
    }

    #[test]
    fn test_verify_is_idempotent() {
        let issuer = TokenIssuer::new(SECRET, WEEK);
        let token = issuer.issue(derek(), "exampleUser").unwrap();
        assert_eq!(issuer.verify(&token), issuer.verify(&token));
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let issuer = TokenIssuer::new(SECRET, WEEK);
        let exp = Utc::now().timestamp() + 3600;
        let token = raw_token(b"wrongSecret", Algorithm::HS256, exp);
        assert_eq!(issuer.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_other_algorithm_is_rejected() {
        let issuer = TokenIssuer::new(SECRET, WEEK);
        let exp = Utc::now().timestamp() + 3600;
        let token = raw_token(SECRET, Algorithm::HS512, exp);
        assert_eq!(issuer.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_expired_token() {
        let issuer = TokenIssuer::new(SECRET, WEEK);
        let token = raw_token(SECRET, Algorithm::HS256, Utc::now().timestamp() - 10);
        assert_eq!(issuer.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_malformed_token() {
        let issuer = TokenIssuer::new(SECRET, WEEK);
        assert_eq!(issuer.verify("abc"), Err(TokenError::Malformed));
        assert_eq!(issuer.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_refresh_keeps_stale_claim_and_extends_expiry() {
        let issuer = TokenIssuer::new(SECRET, WEEK);
        let original = issuer.verify(&issuer.issue(derek(), "exampleUser").unwrap()).unwrap();

        let refreshed = issuer.verify(&issuer.refresh(&original).unwrap()).unwrap();
        assert_eq!(refreshed.user, original.user);
        assert_eq!(refreshed.sub, "exampleUser");
        assert!(refreshed.exp >= original.exp);
    }

    #[test]
    fn test_refresh_never_shortens_expiry() {
        let long_lived = TokenIssuer::new(SECRET, WEEK);
        let short_lived = TokenIssuer::new(SECRET, Duration::from_secs(60));
        let original = long_lived
            .verify(&long_lived.issue(derek(), "exampleUser").unwrap())
            .unwrap();

        let refreshed = short_lived
            .verify(&short_lived.refresh(&original).unwrap())
            .unwrap();
        assert_eq!(refreshed.exp, original.exp);
    }
}
