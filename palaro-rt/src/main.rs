//! palaro-rt (Results Tabulation) - tabulation feed and medal tally service
//!
//! Serves the canonical placement feed and medal tables computed from the
//! bracket and performance feeders of the results store.

use anyhow::{Context, Result};
use clap::Parser;
use palaro_common::config::{self, Overrides};
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::filter::Directive;

use palaro_rt::{build_router, db, AppState};

/// Command-line arguments for palaro-rt
///
/// Each flag overrides its PALARO_* environment variable and the config file.
#[derive(Parser, Debug)]
#[command(name = "palaro-rt")]
#[command(about = "Results tabulation and medal tally service")]
#[command(version)]
struct Args {
    /// Results store (SQLite file)
    #[arg(long = "db")]
    db_path: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:5830
    #[arg(long)]
    bind: Option<String>,

    /// Tabulation rows per page (1-1000)
    #[arg(long)]
    page_size: Option<i64>,

    /// TOML config file
    #[arg(long = "config")]
    config_path: Option<PathBuf>,
}

impl From<Args> for Overrides {
    fn from(args: Args) -> Self {
        Overrides {
            db_path: args.db_path,
            bind: args.bind,
            page_size: args.page_size,
            config_path: args.config_path,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let overrides: Overrides = Args::parse().into();
    let config = config::resolve(&overrides).context("Failed to resolve configuration")?;

    let level: Directive = config
        .log_level
        .parse()
        .with_context(|| format!("Invalid logging.level '{}'", config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level))
        .init();

    // Build identification first, before any store access
    info!(
        "Starting Palaro Results Tabulation (palaro-rt) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config.config_file {
        Some(path) => info!("Config file: {}", path.display()),
        None => warn!("No config file found, using environment and defaults"),
    }
    info!("Results store: {}", config.db_path.display());

    let pool = match db::connect_readonly(&config.db_path).await {
        Ok(pool) => {
            info!("Connected to results store (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to open results store: {}", e);
            return Err(e.into());
        }
    };
    db::verify_schema(&pool)
        .await
        .context("Results store schema check failed")?;

    let app = build_router(AppState::new(pool, config.page_size));

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;
    info!("palaro-rt listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
