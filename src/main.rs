//! Sync core entry point.
//!
//! Wires the domain cache, the periodic sweep and the push channel
//! together and runs until shutdown.
//!
//! # Startup Sequence
//! 1. Initialize tracing subscriber for logging
//! 2. Load configuration from environment variables
//! 3. Create the domain cache and start the sweep task
//! 4. Open the push channel when a session identity is configured
//! 5. Handle graceful shutdown on SIGINT/SIGTERM

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use examsync::{
    spawn_sweep_task, Config, DomainCache, PushClient, UpdateRouter, WsTransport,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "examsync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("starting sync core");

    let config = Config::from_env();
    info!(
        host = %config.channel_host,
        secure = config.channel_secure,
        sweep_interval_secs = config.sweep_interval,
        "configuration loaded"
    );

    let cache = Arc::new(DomainCache::new());
    let sweep_handle = spawn_sweep_task(cache.clone(), Duration::from_secs(config.sweep_interval));

    // Anonymous sessions get no push channel; the cache still serves
    // reads with TTL expiry.
    let client = match config.identity() {
        Some(identity) => {
            let transport = Arc::new(WsTransport::for_host(
                &config.channel_host,
                config.channel_secure,
            ));
            let router = Arc::new(UpdateRouter::new(cache.clone()));
            info!(user_id = %identity.user_id, role = %identity.role, "opening push channel");
            Some(PushClient::connect(transport, identity, router))
        }
        None => {
            warn!("no session identity configured, push channel disabled");
            None
        }
    };

    shutdown_signal().await;

    if let Some(client) = client {
        client.close().await;
        info!("push channel closed");
    }
    sweep_handle.abort();

    info!("sync core shutdown complete");
    Ok(())
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("received SIGTERM, shutting down");
        }
    }
}
