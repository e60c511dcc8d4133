//! Health check handler

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use utoipa::ToSchema;

use super::super::state::AppState;

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_i64)]
    pub timestamp_ms: i64,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
}

/// Health check endpoint
///
/// Pings the document store; store details are logged, never returned.
///
/// - Healthy: 200 OK + {status: "ok", ...}
/// - Unhealthy: 503 Service Unavailable + {status: "unavailable", ...}
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json"),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::error!("[HEALTH] Store ping failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
