use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::{DocId, Record};
use crate::user_auth::password::HashedCredential;

/// Stored user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: DocId,
    pub username: String,
    pub password: HashedCredential,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Owned player references, in association order (duplicates allowed)
    #[serde(default)]
    pub players: Vec<DocId>,
}

impl User {
    pub const COLLECTION_NAME: &'static str = "users";

    pub fn projection(&self) -> UserProjection {
        UserProjection {
            id: Some(self.id.clone()),
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            players: self.players.clone(),
        }
    }
}

impl Record for User {
    const COLLECTION: &'static str = Self::COLLECTION_NAME;
}

/// Insert payload for a new user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: HashedCredential,
    pub first_name: String,
    pub last_name: String,
    pub players: Vec<DocId>,
}

/// Client-facing user, also embedded as the token's `user` claim.
///
/// `id` and `players` may be absent in claims minted by other tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProjection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "01HV3K8Z6Q9YB4F2M7T1C5N0RD")]
    pub id: Option<DocId>,
    #[schema(example = "exampleUser")]
    pub username: String,
    #[serde(default)]
    #[schema(example = "Derek")]
    pub first_name: String,
    #[serde(default)]
    #[schema(example = "Jeter")]
    pub last_name: String,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub players: Vec<DocId>,
}
