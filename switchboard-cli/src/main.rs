mod settings;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use std::path::PathBuf;
use switchboard_server::{AppState, PeerRegistry, router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "switchboard")]
#[command(about = "Relays WebRTC offers from browsers to backend peers connected over WebSocket")]
struct Cli {
    /// Config file (yaml, toml or json). Defaults to `config.*` in ~/.switchboard or the working directory.
    #[arg(short, long, env = "SWITCHBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides the configured `addr`.
    #[arg(short, long)]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(addr) = cli.addr {
        settings.addr = addr;
    }

    let state = AppState::new(PeerRegistry::new(), settings.actor.to_actor_config());
    let shutdown = state.shutdown.clone();

    let app = router(state).layer(cors_layer(&settings.cors.allow_origins)?);

    let listener = tokio::net::TcpListener::bind(&settings.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", settings.addr))?;
    info!(
        "Signaling relay listening on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down, stopping all peer actors");
            shutdown.cancel();
        })
        .await
        .context("Server error")?;

    Ok(())
}

fn cors_layer(allow_origins: &[String]) -> Result<CorsLayer> {
    let origins: Vec<&str> = allow_origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .collect();

    let allow_origin = if origins.contains(&"*") {
        AllowOrigin::from(Any)
    } else {
        let values = origins
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid CORS origin: {origin:?}"))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
