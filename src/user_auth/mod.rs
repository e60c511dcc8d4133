//! Session-less authentication
//!
//! - [`password`]: Argon2id hashing
//! - [`token`]: HS256 bearer tokens
//! - [`service`]: credential and bearer strategies, login/refresh
//! - [`middleware`]: axum bearer gate
//! - [`handlers`]: `/api/auth` routes

pub mod handlers;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

pub use middleware::bearer_auth_middleware;
pub use service::{AuthService, Credentials};
pub use token::{Claims, TokenError, TokenIssuer};
