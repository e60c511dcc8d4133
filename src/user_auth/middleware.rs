use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::gateway::state::AppState;

/// Bearer gate: verifies `Authorization: Bearer <token>` and injects the
/// resulting [`Claims`](super::Claims) as a request extension.
pub async fn bearer_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| {
            tracing::warn!(path = %request.uri().path(), "Missing or malformed bearer token");
            ApiError::Unauthorized
        })?
        .to_string();

    let claims = state.auth.authenticate_bearer(&token).await?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Token part of a `Bearer` authorization value (scheme is case-insensitive)
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
