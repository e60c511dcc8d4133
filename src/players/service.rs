//! Player CRUD and embedded comments

use std::sync::Arc;

use serde_json::{Value, json};

use crate::error::{ApiError, ApiResult};
use crate::integrity::{ensure_ids_match, parse_id, require_fields, text_field};
use crate::models::{Comment, NewPlayer, Player, PlayerView};
use crate::store::{Collection, DocId, Document, DocumentStore, Filter, StoreError, Update};

/// Required on create, in reporting order; also the fields PUT may replace
const PLAYER_FIELDS: [&str; 4] = ["name", "position", "number", "team"];
const COMMENT_FIELDS: [&str; 2] = ["content", "author"];

const INVALID_PLAYER_ID: &str = "Invalid player id";
const INVALID_COMMENT_ID: &str = "Invalid comment id";

pub struct PlayerService {
    players: Collection<Player>,
}

impl PlayerService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            players: Collection::new(store),
        }
    }

    pub async fn list(&self) -> ApiResult<Vec<PlayerView>> {
        Ok(self
            .players
            .find(&Filter::new())
            .await?
            .iter()
            .map(Player::view)
            .collect())
    }

    pub async fn get(&self, raw_id: &str) -> ApiResult<PlayerView> {
        let id = parse_id(raw_id, INVALID_PLAYER_ID)?;
        Ok(self.load(&id).await?.view())
    }

    pub async fn create(&self, body: &Value) -> ApiResult<PlayerView> {
        require_fields(body, &PLAYER_FIELDS)?;
        let [name, position, number, team] = PLAYER_FIELDS.map(|f| required_text(body, f));
        let new = NewPlayer {
            name: name?,
            position: position?,
            number: number?,
            team: team?,
            comments: Vec::new(),
        };

        let taken = self
            .players
            .count(&Filter::new().eq("name", new.name.as_str()))
            .await?;
        if taken > 0 {
            return Err(player_exists());
        }

        let player = self.players.insert(&new).await.map_err(duplicate_name)?;
        tracing::info!(player_id = %player.id, name = %player.name, "Player created");
        Ok(player.view())
    }

    /// Replace only the player fields present in the body
    pub async fn update(&self, raw_id: &str, body: &Value) -> ApiResult<PlayerView> {
        let id = parse_id(raw_id, INVALID_PLAYER_ID)?;
        self.load(&id).await?;
        ensure_ids_match(raw_id, &id, body)?;

        let mut fields = Document::new();
        for field in PLAYER_FIELDS {
            if let Some(value) = text_field(body, field)? {
                fields.insert(field.to_string(), Value::String(value));
            }
        }

        if !fields.is_empty() {
            let outcome = self
                .players
                .update_by_id(&id, Update::Set(fields))
                .await
                .map_err(duplicate_name)?;
            if !outcome.matched {
                return Err(player_not_found());
            }
            tracing::info!(player_id = %id, "Player updated");
        }

        Ok(self.load(&id).await?.view())
    }

    pub async fn delete(&self, raw_id: &str) -> ApiResult<()> {
        let id = parse_id(raw_id, INVALID_PLAYER_ID)?;
        if !self.players.delete_by_id(&id).await? {
            return Err(player_not_found());
        }
        tracing::info!(player_id = %id, "Player deleted");
        Ok(())
    }

    /// Append `body.comment` to the player's comments
    pub async fn add_comment(&self, raw_id: &str, body: &Value) -> ApiResult<Comment> {
        let id = parse_id(raw_id, INVALID_PLAYER_ID)?;
        self.load(&id).await?;

        require_fields(body, &["comment"])?;
        let input = &body["comment"];
        require_fields(input, &COMMENT_FIELDS)?;
        let comment = Comment::new(
            required_text(input, "content")?,
            required_text(input, "author")?,
        );

        let outcome = self
            .players
            .update_by_id(
                &id,
                Update::Push {
                    field: "comments".into(),
                    value: serde_json::to_value(&comment).map_err(StoreError::from)?,
                },
            )
            .await?;
        if !outcome.matched {
            return Err(player_not_found());
        }

        tracing::info!(player_id = %id, comment_id = %comment.id, "Comment added");
        Ok(comment)
    }

    pub async fn remove_comment(&self, raw_id: &str, raw_comment_id: &str) -> ApiResult<()> {
        let id = parse_id(raw_id, INVALID_PLAYER_ID)?;
        let comment_id = parse_id(raw_comment_id, INVALID_COMMENT_ID)?;

        let player = self.load(&id).await?;
        if !player.has_comment(&comment_id) {
            return Err(comment_not_found());
        }

        let outcome = self
            .players
            .update_by_id(
                &id,
                Update::Pull {
                    field: "comments".into(),
                    matching: json!({ "_id": comment_id }),
                },
            )
            .await?;
        if !outcome.modified {
            // Removed concurrently between the check and the pull
            return Err(comment_not_found());
        }

        tracing::info!(player_id = %id, comment_id = %comment_id, "Comment removed");
        Ok(())
    }

    async fn load(&self, id: &DocId) -> ApiResult<Player> {
        self.players
            .find_by_id(id)
            .await?
            .ok_or_else(player_not_found)
    }
}

fn required_text(body: &Value, field: &'static str) -> ApiResult<String> {
    text_field(body, field)?.ok_or(ApiError::MissingField(field))
}

fn player_exists() -> ApiError {
    ApiError::Conflict("Player already exists".into())
}

fn player_not_found() -> ApiError {
    ApiError::not_found("Player not found")
}

fn comment_not_found() -> ApiError {
    ApiError::not_found("Comment not found")
}

fn duplicate_name(err: StoreError) -> ApiError {
    match err {
        StoreError::Duplicate { .. } => player_exists(),
        other => other.into(),
    }
}
