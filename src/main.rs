//! Planning Poker Server
//!
//! Main entry point that wires the crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use poker_api::{AppState, build_router};
use poker_core::config::AppConfig;
use poker_core::error::AppError;
use poker_core::traits::clock::SystemClock;
use poker_realtime::RealtimeEngine;

/// Real-time planning poker server.
#[derive(Debug, Parser)]
#[command(name = "poker-server", version, about)]
struct Cli {
    /// Directory holding default.toml and the per-environment overlays
    #[arg(long, default_value = "config", env = "POKER_CONFIG_DIR")]
    config: String,

    /// Environment overlay to load, e.g. `development` or `production`
    #[arg(long, default_value = "development", env = "POKER_ENV")]
    env: String,

    /// Override the listening port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(&cli.config, &cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_logging(&config);
    tracing::info!(config_dir = %cli.config, env = %cli.env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting planning poker v{}", env!("CARGO_PKG_VERSION"));
    if config.admin.secret().is_none() {
        tracing::warn!("No admin secret configured, admin authentication will always fail");
    }

    let engine = Arc::new(RealtimeEngine::start(&config, Arc::new(SystemClock)));
    tracing::info!(
        max_rooms = config.rooms.max_rooms,
        room_ttl_seconds = config.rooms.room_ttl_seconds,
        "Session coordinator started"
    );

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let addr = config.server.bind_address()?;
    let state = AppState::new(Arc::new(config), engine.clone());
    let app = build_router(state).into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Planning poker server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            // Closing every socket lets the open upgrade handlers return.
            if tokio::time::timeout(grace, engine.shutdown())
                .await
                .is_err()
            {
                tracing::warn!(grace_seconds = grace.as_secs(), "Shutdown grace period elapsed");
            }
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Planning poker server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
