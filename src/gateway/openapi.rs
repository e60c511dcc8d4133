//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ErrorBody;
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    CommentInput, CommentRequest, LoginRequest, MessageResponse, PlayerRequest, PlayersResponse,
    RegisterRequest, TokenResponse,
};
use crate::models::{CommentView, PlayerView, UserProjection};
use crate::users::ValidationError;

/// HS256 JWT bearer security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Token from POST /api/auth/login, sent as `Authorization: Bearer <token>`",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Scouting API",
        version = "1.0.0",
        description = "Users, players and player comments behind session-less bearer tokens.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        // Auth
        crate::user_auth::handlers::login,
        crate::user_auth::handlers::refresh,
        // Users
        crate::gateway::handlers::register,
        crate::gateway::handlers::list_user_players,
        crate::gateway::handlers::associate_player,
        crate::gateway::handlers::dissociate_player,
        // Players
        crate::gateway::handlers::list_players,
        crate::gateway::handlers::get_player,
        crate::gateway::handlers::create_player,
        crate::gateway::handlers::update_player,
        crate::gateway::handlers::delete_player,
        crate::gateway::handlers::add_comment,
        crate::gateway::handlers::remove_comment,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            ValidationError,
            TokenResponse,
            MessageResponse,
            PlayersResponse,
            LoginRequest,
            RegisterRequest,
            PlayerRequest,
            CommentRequest,
            CommentInput,
            UserProjection,
            PlayerView,
            CommentView,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and token refresh"),
        (name = "Users", description = "Registration and the caller's players"),
        (name = "Players", description = "Players and their comments"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Scouting API");
        assert_eq!(spec.info.version, "1.0.0");
    }

    #[test]
    fn test_openapi_json_serializable() {
        let json_str = ApiDoc::openapi().to_json().unwrap();
        assert!(json_str.contains("Scouting API"));
    }

    #[test]
    fn test_endpoints_registered() {
        let paths = ApiDoc::openapi().paths;
        assert!(paths.paths.contains_key("/api/health"));
        assert!(paths.paths.contains_key("/api/auth/login"));
        assert!(paths.paths.contains_key("/api/users/players/{playerId}"));
        assert!(paths.paths.contains_key("/api/players/{id}/{commentId}"));
        assert!(paths.paths.contains_key("/api/users"));
        assert!(paths.paths.contains_key("/api/users/players"));
        assert!(paths.paths.contains_key("/api/players"));
        assert!(paths.paths.contains_key("/api/players/{id}"));
    }

    #[test]
    fn test_security_scheme_registered() {
        let components = ApiDoc::openapi().components.expect("should have components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
