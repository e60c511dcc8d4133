//! User registration and user-player association

use std::sync::Arc;

use serde_json::Value;

use super::validation::{ValidationError, validate_registration};
use crate::error::{ApiError, ApiResult};
use crate::integrity::parse_id;
use crate::models::{NewUser, Player, PlayerView, User, UserProjection};
use crate::store::{Collection, DocId, DocumentStore, Filter, StoreError, Update};
use crate::user_auth::password;

pub struct UserService {
    users: Collection<User>,
    players: Collection<Player>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            users: Collection::new(store.clone()),
            players: Collection::new(store),
        }
    }

    /// Validate, hash and store a new user
    pub async fn register(&self, body: &Value) -> ApiResult<UserProjection> {
        let reg = validate_registration(body).map_err(ApiError::Validation)?;

        let taken = self
            .users
            .count(&Filter::new().eq("username", reg.username.as_str()))
            .await?;
        if taken > 0 {
            return Err(username_taken());
        }

        let plain = reg.password;
        let hashed = tokio::task::spawn_blocking(move || password::hash(&plain)).await??;

        let user = self
            .users
            .insert(&NewUser {
                username: reg.username,
                password: hashed,
                first_name: reg.first_name,
                last_name: reg.last_name,
                players: Vec::new(),
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate { .. } => username_taken(),
                other => other.into(),
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user.projection())
    }

    pub async fn find_by_username(&self, username: &str) -> ApiResult<Option<User>> {
        Ok(self
            .users
            .find_one(&Filter::new().eq("username", username))
            .await?)
    }

    /// Append a player reference to the caller's list. The player itself is
    /// not looked up.
    pub async fn associate(
        &self,
        claim: &UserProjection,
        raw_player_id: &str,
    ) -> ApiResult<UserProjection> {
        let player_id = parse_id(raw_player_id, "Invalid player id")?;
        let user_id = claim_user_id(claim)?;

        let outcome = self
            .users
            .update_by_id(
                user_id,
                Update::Push {
                    field: "players".into(),
                    value: player_id.clone().into(),
                },
            )
            .await?;
        if !outcome.matched {
            return Err(unknown_user());
        }

        tracing::info!(user_id = %user_id, player_id = %player_id, "Player associated");
        self.reload(user_id).await
    }

    /// Remove every reference to the player from the caller's list
    pub async fn dissociate(
        &self,
        claim: &UserProjection,
        raw_player_id: &str,
    ) -> ApiResult<UserProjection> {
        let player_id = parse_id(raw_player_id, "Invalid player id")?;
        let user_id = claim_user_id(claim)?;

        let outcome = self
            .users
            .update_by_id(
                user_id,
                Update::Pull {
                    field: "players".into(),
                    matching: player_id.clone().into(),
                },
            )
            .await?;
        if !outcome.matched {
            return Err(unknown_user());
        }

        tracing::info!(user_id = %user_id, player_id = %player_id, "Player dissociated");
        self.reload(user_id).await
    }

    /// The caller's players, in list order. References that no longer
    /// resolve are skipped.
    pub async fn roster(&self, claim: &UserProjection) -> ApiResult<Vec<PlayerView>> {
        let user_id = claim_user_id(claim)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(unknown_user)?;

        let mut players = Vec::with_capacity(user.players.len());
        for id in &user.players {
            match self.players.find_by_id(id).await? {
                Some(player) => players.push(player.view()),
                None => tracing::debug!(user_id = %user.id, player_id = %id, "Skipping dangling player reference"),
            }
        }
        Ok(players)
    }

    async fn reload(&self, id: &DocId) -> ApiResult<UserProjection> {
        self.users
            .find_by_id(id)
            .await?
            .map(|u| u.projection())
            .ok_or_else(unknown_user)
    }
}

fn claim_user_id(claim: &UserProjection) -> ApiResult<&DocId> {
    claim
        .id
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("Token does not identify a user"))
}

fn username_taken() -> ApiError {
    ApiError::Validation(ValidationError::new("username already taken", "username"))
}

fn unknown_user() -> ApiError {
    ApiError::bad_request("User not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewPlayer, UNIQUE_FIELDS};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn setup() -> (UserService, Collection<Player>) {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new(UNIQUE_FIELDS));
        (UserService::new(store.clone()), Collection::new(store))
    }

    fn derek() -> Value {
        json!({
            "username": "exampleUser",
            "password": "examplePassword",
            "firstName": "Derek",
            "lastName": "Jeter"
        })
    }

    async fn add_player(players: &Collection<Player>, name: &str) -> DocId {
        players
            .insert(&NewPlayer {
                name: name.into(),
                position: "QB".into(),
                number: "13".into(),
                team: "Dolphins".into(),
                comments: vec![],
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_register_stores_hash() {
        let (svc, _) = setup();
        let user = svc.register(&derek()).await.unwrap();
        assert_eq!(user.username, "exampleUser");
        assert!(user.id.is_some());

        let stored = svc.find_by_username("exampleUser").await.unwrap().unwrap();
        assert_ne!(stored.password.as_str(), "examplePassword");
        assert!(password::verify("examplePassword", &stored.password));
        assert!(!password::verify("otherPassword", &stored.password));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let (svc, _) = setup();
        svc.register(&derek()).await.unwrap();

        let err = svc.register(&derek()).await.unwrap_err();
        match err {
            ApiError::Validation(v) => {
                assert_eq!(v.message, "username already taken");
                assert_eq!(v.location, "username");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_associate_and_dissociate() {
        let (svc, players) = setup();
        let claim = svc.register(&derek()).await.unwrap();
        let marino = add_player(&players, "Dan Marino").await;

        let user = svc.associate(&claim, marino.as_str()).await.unwrap();
        assert_eq!(user.players, vec![marino.clone()]);

        let roster = svc.roster(&claim).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Dan Marino");

        let user = svc.dissociate(&claim, marino.as_str()).await.unwrap();
        assert!(user.players.is_empty());
    }

    #[tokio::test]
    async fn test_roster_skips_dangling_references() {
        let (svc, players) = setup();
        let claim = svc.register(&derek()).await.unwrap();
        let marino = add_player(&players, "Dan Marino").await;
        let gone = DocId::generate();

        svc.associate(&claim, gone.as_str()).await.unwrap();
        svc.associate(&claim, marino.as_str()).await.unwrap();

        let roster = svc.roster(&claim).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, marino);
    }

    #[tokio::test]
    async fn test_associate_rejects_bad_input() {
        let (svc, _) = setup();
        let claim = svc.register(&derek()).await.unwrap();

        let err = svc.associate(&claim, "not-an-id").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(m) if m == "Invalid player id"));

        let sparse = UserProjection { id: None, ..claim };
        let err = svc
            .associate(&sparse, DocId::generate().as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
