//! HTTP server initialization and runtime setup.
//!
//! Handles logging setup, store selection, service wiring and the Axum server
//! lifecycle.

use crate::config::{Config, StoreBackend};
use crate::domain::repositories::KeyValueStore;
use crate::infrastructure::persistence::{FileStore, MemoryStore, RedisStore};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::clock::SystemClock;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// `log_level` is an `EnvFilter` directive (e.g. `info,snaplink=debug`);
/// `log_format` selects `json` or human-readable `text` output.
pub fn init_tracing(log_level: &str, log_format: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true);

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Opens the key-value backend selected by `config`.
///
/// # Errors
///
/// Returns an error if the file directory cannot be created or Redis is unreachable.
pub async fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; links are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::File => Arc::new(
            FileStore::open(&config.store_path)
                .await
                .context("Failed to open file store")?,
        ),
        StoreBackend::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL must be set for the redis backend")?;
            Arc::new(
                RedisStore::connect(redis_url, config.redis_key_prefix.clone())
                    .await
                    .context("Failed to connect to Redis")?,
            )
        }
    };

    Ok(store)
}

/// Builds the shared state on top of `store` with the production clock and RNG.
pub fn build_state(config: &Config, store: Arc<dyn KeyValueStore>) -> AppState {
    AppState::new(
        store,
        Arc::new(SystemClock),
        CodeGenerator::from_os_rng(),
        config.base_url.clone(),
        config.event_log_capacity,
    )
}

/// Runs the HTTP server with the given configuration until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if:
/// - The store cannot be opened
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = open_store(&config).await?;
    tracing::info!("Store ready ({})", config.store_backend);

    let state = build_state(&config, store);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

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
            Ok(mut sig) => {
                sig.recv().await;
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

    tracing::info!("Shutdown signal received");
}
