use std::sync::Arc;

use serde_json::Value;

use super::password;
use super::token::{Claims, TokenIssuer};
use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::store::{Collection, DocumentStore, Filter};

/// Username/password pair taken from a login body
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Both fields must be present strings
    pub fn from_body(body: &Value) -> ApiResult<Self> {
        let field = |name: &str| body.get(name).and_then(Value::as_str).map(str::to_string);
        match (field("username"), field("password")) {
            (Some(username), Some(password)) => Ok(Self { username, password }),
            _ => Err(ApiError::bad_request("Missing credentials")),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Both authentication strategies plus token issuing
pub struct AuthService {
    users: Collection<User>,
    tokens: Arc<TokenIssuer>,
    refetch_user_on_verify: bool,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        tokens: Arc<TokenIssuer>,
        refetch_user_on_verify: bool,
    ) -> Self {
        Self {
            users: Collection::new(store),
            tokens,
            refetch_user_on_verify,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Primary strategy: exact username lookup, then password verification.
    /// Unknown user and wrong password fail identically.
    pub async fn authenticate_credentials(&self, creds: &Credentials) -> ApiResult<User> {
        let Some(user) = self
            .users
            .find_one(&Filter::new().eq("username", creds.username.as_str()))
            .await?
        else {
            tracing::warn!(username = %creds.username, "Login failed: unknown user");
            return Err(ApiError::Unauthorized);
        };

        let plain = creds.password.clone();
        let hashed = user.password.clone();
        let valid = tokio::task::spawn_blocking(move || password::verify(&plain, &hashed)).await?;
        if !valid {
            tracing::warn!(username = %creds.username, "Login failed: wrong password");
            return Err(ApiError::Unauthorized);
        }

        Ok(user)
    }

    /// Bearer strategy: resolve a token to its claims
    pub async fn authenticate_bearer(&self, token: &str) -> ApiResult<Claims> {
        let mut claims = self.tokens.verify(token).map_err(|e| {
            tracing::warn!("Bearer token rejected: {}", e);
            ApiError::from(e)
        })?;

        if self.refetch_user_on_verify {
            let current = self
                .users
                .find_one(&Filter::new().eq("username", claims.user.username.as_str()))
                .await?
                .ok_or_else(|| {
                    tracing::warn!(username = %claims.user.username, "Bearer token names an unknown user");
                    ApiError::Unauthorized
                })?;
            claims.user = current.projection();
        }

        Ok(claims)
    }

    /// Verify credentials and mint a token carrying the stored user
    pub async fn login(&self, body: &Value) -> ApiResult<String> {
        let creds = Credentials::from_body(body)?;
        let user = self.authenticate_credentials(&creds).await?;
        let token = self.tokens.issue(user.projection(), &user.username)?;
        tracing::info!(username = %user.username, "Token issued");
        Ok(token)
    }

    /// Re-issue from the caller's existing claim
    pub fn refresh(&self, claims: &Claims) -> ApiResult<String> {
        let token = self.tokens.refresh(claims)?;
        tracing::info!(username = %claims.user.username, "Token refreshed");
        Ok(token)
    }
}
