//! API error type.
//!
//! Business failures are raised where they are detected; store, crypto and
//! task failures convert through `From` and surface as `Internal`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::store::StoreError;
use crate::user_auth::password::PasswordError;
use crate::user_auth::token::TokenError;
use crate::users::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Missing `{0}` in request body")]
    MissingField(&'static str),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{}", .0.message)]
    Validation(ValidationError),

    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::MissingField(_) | Self::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(v) => {
                StatusCode::from_u16(v.code).unwrap_or(StatusCode::UNPROCESSABLE_ENTITY)
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body for every non-validation error
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Player not found")]
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        match self {
            Self::Validation(v) => (status, Json(v)).into_response(),
            Self::Internal(err) => {
                tracing::error!("Request failed: {:#}", err);
                (status, Json(ErrorBody::new("Internal server error"))).into_response()
            }
            other => (status, Json(ErrorBody::new(other.to_string()))).into_response(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.into())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self::Internal(err.into())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => Self::Internal(err.into()),
            _ => Self::Unauthorized,
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status() {
        assert_eq!(
            ApiError::Conflict("Player already exists".into()).http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::MissingField("name").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::not_found("Player not found").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Validation(ValidationError::new("Missing Field", "username")).http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::MissingField("position").to_string(),
            "Missing `position` in request body"
        );
        assert_eq!(ApiError::Unauthorized.to_string(), "Unauthorized");
    }

    #[test]
    fn test_token_errors_are_unauthorized() {
        assert!(matches!(
            ApiError::from(TokenError::Expired),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from(TokenError::Signing("boom".into())),
            ApiError::Internal(_)
        ));
    }
}
