use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::{DocId, Record};

/// Stored player with its embedded comments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "_id")]
    pub id: DocId,
    pub name: String,
    #[serde(default)]
    pub position: String,
    /// Jersey number, kept as text
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Player {
    pub const COLLECTION_NAME: &'static str = "players";

    pub fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id.clone(),
            name: self.name.clone(),
            position: self.position.clone(),
            number: self.number.clone(),
            team: self.team.clone(),
            comments: self.comments.iter().map(Comment::view).collect(),
        }
    }

    pub fn has_comment(&self, id: &DocId) -> bool {
        self.comments.iter().any(|c| &c.id == id)
    }
}

impl Record for Player {
    const COLLECTION: &'static str = Self::COLLECTION_NAME;
}

#[derive(Debug, Serialize)]
pub struct NewPlayer {
    pub name: String,
    pub position: String,
    pub number: String,
    pub team: String,
    pub comments: Vec<Comment>,
}

/// Comment embedded in a player; its id is assigned when appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: DocId,
    pub content: String,
    pub author: String,
    pub created: DateTime<Utc>,
}

impl Comment {
    pub fn new(content: String, author: String) -> Self {
        Self {
            id: DocId::generate(),
            content,
            author,
            created: Utc::now(),
        }
    }

    pub fn view(&self) -> CommentView {
        CommentView {
            id: self.id.clone(),
            content: self.content.clone(),
            author: self.author.clone(),
            created: self.created,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerView {
    #[schema(value_type = String)]
    pub id: DocId,
    #[schema(example = "Dan Marino")]
    pub name: String,
    #[schema(example = "QB")]
    pub position: String,
    #[schema(example = "13")]
    pub number: String,
    #[schema(example = "Dolphins")]
    pub team: String,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentView {
    #[schema(value_type = String)]
    pub id: DocId,
    pub content: String,
    pub author: String,
    pub created: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_comment_round_trips_id_key() {
        let comment = Comment::new("Test Content".into(), "Test Author".into());
        let stored = serde_json::to_value(&comment).unwrap();
        assert_eq!(stored["_id"], comment.id.as_str());

        let view = serde_json::to_value(comment.view()).unwrap();
        assert_eq!(view["id"], comment.id.as_str());
        assert!(view.get("_id").is_none());
    }

    #[test]
    fn test_has_comment() {
        let comment = Comment::new("a".into(), "b".into());
        let player = Player {
            id: DocId::generate(),
            name: "Dan Marino".into(),
            position: "QB".into(),
            number: "13".into(),
            team: "Dolphins".into(),
            comments: vec![comment.clone()],
        };
        assert!(player.has_comment(&comment.id));
        assert!(!player.has_comment(&DocId::generate()));
    }
}
