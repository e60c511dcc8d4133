use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::error::{ApiResult, ErrorBody};
use crate::gateway::state::AppState;
use crate::gateway::types::{
    CommentRequest, JsonBody, MessageResponse, PlayerRequest, PlayersResponse,
};
use crate::models::PlayerView;

/// List all players
///
/// GET /api/players
#[utoipa::path(
    get,
    path = "/api/players",
    responses(
        (status = 200, description = "All players", body = PlayersResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Players"
)]
pub async fn list_players(State(state): State<Arc<AppState>>) -> ApiResult<Json<PlayersResponse>> {
    let players = state.players.list().await?;
    Ok(Json(PlayersResponse { players }))
}

/// Get one player
///
/// GET /api/players/{id}
#[utoipa::path(
    get,
    path = "/api/players/{id}",
    params(("id" = String, Path, description = "Player id")),
    responses(
        (status = 200, description = "Player", body = PlayerView),
        (status = 400, description = "Invalid player id", body = ErrorBody),
        (status = 404, description = "Player not found", body = ErrorBody)
    ),
    tag = "Players"
)]
pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<PlayerView>> {
    Ok(Json(state.players.get(&id).await?))
}

/// Create a player
///
/// POST /api/players
#[utoipa::path(
    post,
    path = "/api/players",
    request_body = PlayerRequest,
    responses(
        (status = 201, description = "Player created", body = PlayerView),
        (status = 400, description = "Missing field or player already exists", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Players"
)]
pub async fn create_player(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<PlayerView>)> {
    let player = state.players.create(&body).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// Replace the fields present in the body
///
/// PUT /api/players/{id}
#[utoipa::path(
    put,
    path = "/api/players/{id}",
    params(("id" = String, Path, description = "Player id; must equal the body id")),
    request_body = PlayerRequest,
    responses(
        (status = 200, description = "Player updated", body = PlayerView),
        (status = 400, description = "Invalid id or path/body id mismatch", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Player not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Players"
)]
pub async fn update_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<PlayerView>> {
    Ok(Json(state.players.update(&id, &body).await?))
}

/// Delete a player
///
/// DELETE /api/players/{id}
#[utoipa::path(
    delete,
    path = "/api/players/{id}",
    params(("id" = String, Path, description = "Player id")),
    responses(
        (status = 204, description = "Player deleted"),
        (status = 400, description = "Invalid player id", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Player not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Players"
)]
pub async fn delete_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.players.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a comment to a player
///
/// POST /api/players/{id}
#[utoipa::path(
    post,
    path = "/api/players/{id}",
    params(("id" = String, Path, description = "Player id")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment added", body = MessageResponse),
        (status = 400, description = "Invalid player id or missing field", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Player not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Players"
)]
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    state.players.add_comment(&id, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Comment added to player")),
    ))
}

/// Remove a comment from a player
///
/// DELETE /api/players/{id}/{commentId}
#[utoipa::path(
    delete,
    path = "/api/players/{id}/{commentId}",
    params(
        ("id" = String, Path, description = "Player id"),
        ("commentId" = String, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment removed", body = MessageResponse),
        (status = 400, description = "Invalid player or comment id", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Player or comment not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Players"
)]
pub async fn remove_comment(
    State(state): State<Arc<AppState>>,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    state.players.remove_comment(&id, &comment_id).await?;
    Ok(Json(MessageResponse::new("Comment removed from player")))
}
