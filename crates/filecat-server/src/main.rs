//! filecatd - FileCat catalog service daemon
//!
//! Opens the SQLite catalog, serves the HTTP API and shuts down gracefully
//! on SIGTERM/SIGINT.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use filecat_core::config::{Config, ConfigBuilder};
use filecat_core::usecases::CatalogService;
use filecat_server::CatalogServer;
use filecat_store::{DatabasePool, SqliteCatalogStore};

/// FileCat catalog service
#[derive(Parser, Debug)]
#[command(name = "filecatd", version, about)]
struct Args {
    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides server.listen)
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Catalog database path (overrides server.database)
    #[arg(long)]
    database: Option<PathBuf>,
}

/// Cancels `token` on the first SIGINT or SIGTERM
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let loaded = if args.config.is_some() {
        Config::load(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?
    } else {
        Config::load_or_default(&config_path)
    };
    let mut builder = ConfigBuilder::from(loaded);
    if let Some(listen) = args.listen {
        builder = builder.server_listen(listen.to_string());
    }
    if let Some(database) = args.database {
        builder = builder.server_database(database);
    }
    let config = builder.build();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    info!(config_path = %config_path.display(), "FileCat catalog service starting (filecatd)");

    for problem in config.validate() {
        warn!(field = %problem.field, "Configuration problem: {}", problem.message);
    }

    let listen: SocketAddr = config
        .server
        .listen
        .parse()
        .with_context(|| format!("Invalid server.listen {:?}", config.server.listen))?;

    let pool = DatabasePool::new(&config.server.database)
        .await
        .context("Failed to open catalog database")?;
    let store = SqliteCatalogStore::new(pool.pool().clone());
    let server = CatalogServer::new(CatalogService::new(Arc::new(store)));

    let shutdown_token = CancellationToken::new();
    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    let result = server.run(listen, shutdown_token).await;
    pool.pool().close().await;

    match &result {
        Ok(()) => info!("Catalog service shut down gracefully"),
        Err(e) => error!(error = %e, "Catalog service exiting with error"),
    }

    result
}
