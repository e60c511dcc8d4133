//! HTTP handlers: thin adapters from requests to the services

pub mod health;
pub mod players;
pub mod users;

// Globs also carry the `__path_*` types that `ApiDoc` resolves
pub use health::*;
pub use players::*;
pub use users::*;

use axum::Json;

use crate::error::ErrorBody;

/// Catch-all for unmatched routes
pub async fn not_found() -> (axum::http::StatusCode, Json<ErrorBody>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Not found")),
    )
}
