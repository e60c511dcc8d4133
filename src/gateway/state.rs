use std::sync::Arc;

use crate::config::{AuthConfig, ConfigError};
use crate::players::PlayerService;
use crate::store::DocumentStore;
use crate::user_auth::{AuthService, TokenIssuer};
use crate::users::UserService;

/// Gateway shared state
#[derive(Clone)]
pub struct AppState {
    /// Backing store (also pinged by the health check)
    pub store: Arc<dyn DocumentStore>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub players: Arc<PlayerService>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        tokens: Arc<TokenIssuer>,
        refetch_user_on_verify: bool,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(
                store.clone(),
                tokens,
                refetch_user_on_verify,
            )),
            users: Arc::new(UserService::new(store.clone())),
            players: Arc::new(PlayerService::new(store.clone())),
            store,
        }
    }

    /// Build from the `auth` config section
    pub fn from_config(
        store: Arc<dyn DocumentStore>,
        auth: &AuthConfig,
    ) -> Result<Self, ConfigError> {
        let tokens = TokenIssuer::new(auth.jwt_secret.as_bytes(), auth.token_ttl()?);
        Ok(Self::new(store, Arc::new(tokens), auth.refetch_user_on_verify))
    }
}
