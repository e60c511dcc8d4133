//! HTTP boundary types
//!
//! - [`JsonBody`]: lenient JSON body extractor
//! - Response DTOs
//! - Request schemas (OpenAPI documentation only; handlers read raw JSON
//!   so that field checks report in a fixed order)

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::PlayerView;

// ============================================================================
// Extractor
// ============================================================================

/// Request body as untyped JSON. An empty body reads as `{}`; anything
/// that does not parse is a 400.
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl<S: Send + Sync> FromRequest<S> for JsonBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e.body_text())))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Value::Object(Default::default())));
        }

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {e}")))
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub auth_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Comment added to player")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlayersResponse {
    pub players: Vec<PlayerView>,
}

// ============================================================================
// Request schemas
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "exampleUser")]
    pub username: String,
    #[schema(example = "examplePassword")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "exampleUser", min_length = 1)]
    pub username: String,
    #[schema(example = "examplePassword", min_length = 7, max_length = 72)]
    pub password: String,
    #[schema(example = "Derek")]
    pub first_name: String,
    #[schema(example = "Jeter")]
    pub last_name: String,
}

/// Player fields. All required on create; on update only `id` is, and the
/// other present fields replace the stored ones.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlayerRequest {
    /// Must equal the path id on update
    pub id: Option<String>,
    #[schema(example = "Dan Marino")]
    pub name: Option<String>,
    #[schema(example = "QB")]
    pub position: Option<String>,
    #[schema(example = "13")]
    pub number: Option<String>,
    #[schema(example = "Dolphins")]
    pub team: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentInput {
    #[schema(example = "Great arm")]
    pub content: String,
    #[schema(example = "exampleUser")]
    pub author: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub comment: CommentInput,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    async fn extract(body: &'static str) -> Result<JsonBody, ApiError> {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap();
        JsonBody::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_object() {
        let JsonBody(value) = extract("").await.unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let err = extract("{not json").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_token_response_wire_name() {
        let json = serde_json::to_value(TokenResponse {
            auth_token: "t".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"authToken": "t"}));
    }
}
