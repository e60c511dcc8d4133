//! HTTP gateway: router, shared state and the owned server handle

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{Next, from_fn, from_fn_with_state},
    response::Response,
    routing::{get, post, put},
};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::user_auth::{self, bearer_auth_middleware};
use state::AppState;

/// One log line per request
async fn request_log_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

/// Build the complete application router
pub fn router(state: Arc<AppState>) -> Router {
    let bearer = || from_fn_with_state(state.clone(), bearer_auth_middleware);

    // ==========================================================================
    // Auth Routes
    // ==========================================================================
    let auth_routes = Router::new()
        .route("/login", post(user_auth::handlers::login))
        .route(
            "/refresh",
            post(user_auth::handlers::refresh).route_layer(bearer()),
        );

    // ==========================================================================
    // User Routes (registration public, roster behind the bearer gate)
    // ==========================================================================
    let user_routes = Router::new()
        .route("/", post(handlers::register))
        .route(
            "/players",
            get(handlers::list_user_players).route_layer(bearer()),
        )
        .route(
            "/players/{player_id}",
            put(handlers::associate_player)
                .delete(handlers::dissociate_player)
                .route_layer(bearer()),
        );

    // ==========================================================================
    // Player Routes (reads public, writes behind the bearer gate)
    // ==========================================================================
    let player_routes = Router::new()
        .route(
            "/",
            get(handlers::list_players).merge(post(handlers::create_player).route_layer(bearer())),
        )
        .route(
            "/{id}",
            get(handlers::get_player).merge(
                put(handlers::update_player)
                    .delete(handlers::delete_player)
                    .post(handlers::add_comment)
                    .route_layer(bearer()),
            ),
        )
        .route(
            "/{id}/{comment_id}",
            axum::routing::delete(handlers::remove_comment).route_layer(bearer()),
        );

    Router::new()
        .route("/api/health", get(handlers::health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/players", player_routes)
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(from_fn(request_log_middleware))
}

/// A running gateway. Dropping the handle without [`Server::stop`] leaves
/// the server running until the runtime shuts down.
pub struct Server {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<io::Result<()>>,
}

impl Server {
    /// Bind `host:port` (port 0 picks a free port) and start serving
    pub async fn start(host: &str, port: u16, state: Arc<AppState>) -> io::Result<Self> {
        let listener = TcpListener::bind((host, port)).await?;
        let local_addr = listener.local_addr()?;
        let app = router(state);
        let (shutdown, signal) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = signal.await;
                })
                .await
        });

        tracing::info!("Gateway listening on http://{}", local_addr);
        tracing::info!("API Docs: http://{}/docs", local_addr);

        Ok(Self {
            local_addr,
            shutdown: Some(shutdown),
            task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections, drain in-flight requests and wait for
    /// the serve task to finish
    pub async fn stop(mut self) -> io::Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let result = self.task.await.map_err(io::Error::other)?;
        tracing::info!("Gateway on {} stopped", self.local_addr);
        result
    }
}
