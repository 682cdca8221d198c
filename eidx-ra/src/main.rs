//! eidx-ra (Risk Analysis) - Economic Index analysis service
//!
//! Resolves configuration, builds the tabular source and its cache, and
//! serves the analysis views over HTTP.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use eidx_common::config::load_toml_config;
use eidx_ra::config::{Cli, ServiceConfig, MODULE_NAME};
use eidx_ra::{build_router, logging, AppState, SourceCache};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_filter = logging::init_tracing();

    info!(
        "Starting EIDX Risk Analysis ({}) v{}",
        MODULE_NAME,
        env!("CARGO_PKG_VERSION")
    );

    let (toml_config, config_path) = load_toml_config(cli.config.as_deref(), MODULE_NAME)
        .context("Failed to load configuration file")?;
    match &config_path {
        Some(path) => info!(path = %path.display(), "Loaded config file"),
        None => info!("No config file, using CLI/environment/defaults"),
    }

    let config = ServiceConfig::resolve(&cli, &toml_config).context("Invalid configuration")?;
    if logging::apply_configured_level(&log_filter, &config.log_level)
        .context("Failed to apply log level")?
    {
        info!(level = %config.log_level, "Applied configured log level");
    }
    info!(source = ?config.source, cache_ttl = ?config.cache_ttl, "Resolved configuration");

    let source = config.build_source().context("Failed to build tabular source")?;
    let cache = Arc::new(SourceCache::new(config.cache_ttl));
    let app = build_router(AppState::new(source, cache));

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;

    info!("eidx-ra listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
