//! Scouting API - session-less bearer-token auth over users, players and
//! player comments
//!
//! # Modules
//!
//! - [`user_auth`] - Password hashing, HS256 tokens, credential/bearer strategies
//! - [`users`] - Registration and the user's player references
//! - [`players`] - Player CRUD and embedded comments
//! - [`integrity`] - Identifier, existence and required-field pre-checks
//! - [`models`] - Stored records and client projections
//! - [`store`] - Document store trait with in-memory and PostgreSQL backends
//! - [`db`] - PostgreSQL connection pool
//! - [`gateway`] - axum router, handlers, OpenAPI, owned server handle
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - API error type and its HTTP rendering

pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod integrity;
pub mod logging;
pub mod models;
pub mod players;
pub mod store;
pub mod user_auth;
pub mod users;

// Convenient re-exports at crate root
pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use gateway::{Server, router, state::AppState};
pub use store::{DocId, DocumentStore, MemoryStore, PgStore};
pub use user_auth::{Claims, TokenIssuer};
