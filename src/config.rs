use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("auth.jwt_secret must not be empty")]
    EmptySecret,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
    /// The in-memory store is used when absent
    #[serde(default)]
    pub postgres: Option<PostgresConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct PostgresConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The URL may carry a password
        f.debug_struct("PostgresConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// `<n>[s|m|h|d]` or bare seconds
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry: String,
    /// Replace the token's embedded user with the stored one on every request
    #[serde(default)]
    pub refetch_user_on_verify: bool,
}

fn default_jwt_expiry() -> String {
    "7d".to_string()
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiry", &self.jwt_expiry)
            .field("refetch_user_on_verify", &self.refetch_user_on_verify)
            .finish()
    }
}

impl AuthConfig {
    pub fn token_ttl(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.jwt_expiry).ok_or_else(|| ConfigError::Invalid {
            key: "auth.jwt_expiry",
            value: self.jwt_expiry.clone(),
        })
    }
}

impl AppConfig {
    /// Read `config/<env>.yaml`, apply environment overrides, validate
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(format!("config/{}.yaml", env))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Overrides: `PORT`, `DATABASE_URL`, `JWT_SECRET`, `JWT_EXPIRY`
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(port) = lookup("PORT") {
            self.gateway.port = port.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            match self.postgres.as_mut() {
                Some(pg) => pg.url = url,
                None => self.postgres = Some(PostgresConfig::new(url)),
            }
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(expiry) = lookup("JWT_EXPIRY") {
            self.auth.jwt_expiry = expiry;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        self.auth.token_ttl()?;
        Ok(())
    }
}

/// `"30s"`, `"15m"`, `"12h"`, `"7d"` or `"3600"`
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last()? {
        (i, c) if c.is_ascii_alphabetic() => (&raw[..i], c),
        _ => (raw, 's'),
    };
    let n: u64 = digits.parse().ok()?;
    let secs = match unit {
        's' => n,
        'm' => n.checked_mul(60)?,
        'h' => n.checked_mul(3600)?,
        'd' => n.checked_mul(86_400)?,
        _ => return None,
    };
    Some(Duration::from_secs(secs))
}
