use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use contact_service::prelude::*;

/// Contact CRUD REST service
#[derive(Debug, Parser)]
#[command(name = "contact-service")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations
    #[arg(short, long, env = "CONTACT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::load().context("loading configuration")?,
    };
    if let Some(port) = cli.port {
        config.service.port = port;
    }

    init_tracing(&config)?;

    let state = AppState::builder()
        .config(config.clone())
        .build()
        .await
        .context("initializing application state")?;

    Server::new(config).serve(router(state)).await?;

    Ok(())
}
