use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use super::token::Claims;
use crate::error::{ApiResult, ErrorBody};
use crate::gateway::state::AppState;
use crate::gateway::types::{JsonBody, LoginRequest, TokenResponse};

/// Exchange username and password for a bearer token
///
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Missing credentials", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<TokenResponse>> {
    let auth_token = state.auth.login(&body).await?;
    Ok(Json(TokenResponse { auth_token }))
}

/// Re-issue the caller's token with a fresh expiry
///
/// POST /api/auth/refresh
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "Token refreshed", body = TokenResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<TokenResponse>> {
    let auth_token = state.auth.refresh(&claims)?;
    Ok(Json(TokenResponse { auth_token }))
}
