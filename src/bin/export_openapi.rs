//! Export OpenAPI specification to JSON file
//!
//! Usage:
//!   cargo run --bin export_openapi > openapi.json
//!
//! Or with file output:
//!   cargo run --bin export_openapi -- --output docs/openapi.json

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use scouting_api::gateway::openapi::ApiDoc;
use utoipa::OpenApi;

#[derive(Parser)]
#[command(about = "Print or write the OpenAPI document")]
struct Cli {
    /// Write to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("Failed to serialize OpenAPI spec")?;

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("OpenAPI spec exported to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
