//! Scouting API server
//!
//! ```text
//! config/<env>.yaml ──▶ AppConfig ──▶ store (PgStore | MemoryStore)
//!                                          │
//!                               AppState ◀─┘ ──▶ Server (axum) ──▶ Ctrl-C ──▶ stop
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use scouting_api::config::AppConfig;
use scouting_api::db::Database;
use scouting_api::gateway::{Server, state::AppState};
use scouting_api::logging::init_logging;
use scouting_api::models::UNIQUE_FIELDS;
use scouting_api::store::{DocumentStore, MemoryStore};

#[derive(Parser)]
#[command(version, about = "Users, players and comments behind bearer tokens")]
struct Cli {
    /// Config environment: reads config/<env>.yaml
    #[arg(short, long, default_value = "dev")]
    env: String,

    /// Listen port (overrides config and PORT)
    #[arg(long)]
    port: Option<u16>,
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let Some(pg) = config.postgres.as_ref() else {
        tracing::warn!("No postgres section configured; using the in-memory store (data is lost on exit)");
        return Ok(Arc::new(MemoryStore::new(UNIQUE_FIELDS)));
    };

    let db = Database::connect(pg)
        .await
        .context("Failed to connect to PostgreSQL")?;
    db.health_check()
        .await
        .context("PostgreSQL health check failed")?;

    let store = db
        .document_store(UNIQUE_FIELDS)
        .await
        .context("Failed to prepare document schema")?;
    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.env)
        .with_context(|| format!("Failed to load config for env `{}`", cli.env))?;
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }

    let _guard = init_logging(&config);
    tracing::info!(env = %cli.env, version = env!("CARGO_PKG_VERSION"), "Starting scouting_api");

    let store = open_store(&config).await?;
    let state = Arc::new(AppState::from_config(store, &config.auth)?);

    let server = Server::start(&config.gateway.host, config.gateway.port, state)
        .await
        .with_context(|| {
            format!(
                "Failed to bind {}:{} (port may already be in use)",
                config.gateway.host, config.gateway.port
            )
        })?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    tracing::info!("Shutdown requested");

    server.stop().await.context("Server error")?;
    Ok(())
}
