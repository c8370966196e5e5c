mod config;
mod handlers;
mod state;

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use clap::Parser;
use heatroute_core::create_evacuation_model;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::handlers::build_router;
use crate::state::AppState;

/// Heat-risk-aware evacuation routing server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "heatroute.toml")]
    config: PathBuf,
    /// Address to listen on, overriding `[server].bind`
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = ServerConfig::load(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    info!("Building evacuation model from {}", cli.config.display());
    let model_config = config.model.clone();
    let model =
        tokio::task::spawn_blocking(move || create_evacuation_model(&model_config)).await??;

    let state = Arc::new(AppState::from_config(model, &config)?);
    let app = build_router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(config.server.bind).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
