use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::error::{ApiResult, ErrorBody};
use crate::gateway::state::AppState;
use crate::gateway::types::{JsonBody, PlayersResponse, RegisterRequest};
use crate::models::UserProjection;
use crate::user_auth::Claims;
use crate::users::ValidationError;

/// Register a new user
///
/// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserProjection),
        (status = 422, description = "Validation failed", body = ValidationError),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<UserProjection>)> {
    let user = state.users.register(&body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Players referenced by the caller
///
/// GET /api/users/players
#[utoipa::path(
    get,
    path = "/api/users/players",
    responses(
        (status = 200, description = "Caller's players", body = PlayersResponse),
        (status = 400, description = "Token does not identify a stored user", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_user_players(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<PlayersResponse>> {
    let players = state.users.roster(&claims.user).await?;
    Ok(Json(PlayersResponse { players }))
}

/// Add a player reference to the caller
///
/// PUT /api/users/players/{playerId}
#[utoipa::path(
    put,
    path = "/api/users/players/{playerId}",
    params(("playerId" = String, Path, description = "Player id")),
    responses(
        (status = 200, description = "Player associated", body = UserProjection),
        (status = 400, description = "Invalid player id", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn associate_player(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(player_id): Path<String>,
) -> ApiResult<Json<UserProjection>> {
    Ok(Json(state.users.associate(&claims.user, &player_id).await?))
}

/// Remove a player reference from the caller
///
/// DELETE /api/users/players/{playerId}
#[utoipa::path(
    delete,
    path = "/api/users/players/{playerId}",
    params(("playerId" = String, Path, description = "Player id")),
    responses(
        (status = 200, description = "Player dissociated", body = UserProjection),
        (status = 400, description = "Invalid player id", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn dissociate_player(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(player_id): Path<String>,
) -> ApiResult<Json<UserProjection>> {
    Ok(Json(state.users.dissociate(&claims.user, &player_id).await?))
}
