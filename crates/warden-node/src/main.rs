//! # warden-node
//!
//! Daemon guarding a payment-channel node's inbound channel openings.
//! Wires together the store, the signed control-plane API, and the
//! channel interceptor, then runs until interrupted.

mod config;
mod daemon;
mod keygen;
mod telemetry;

use anyhow::{Context, Result};
use config::NodeConfig;
use daemon::TcpChannelEventSource;
use std::sync::Arc;
use tracing::info;
use warden_admission::{ChannelInterceptor, InterceptorConfig};
use warden_api::AppState;
use warden_auth::RequestAuthenticator;
use warden_store::{RocksDbConfig, RocksDbEngine, Store};
use warden_types::DEFAULT_REJECT_MESSAGE;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("keygen") {
        return keygen::run(args.get(1).map(String::as_str));
    }

    let config = NodeConfig::from_env().context("loading configuration")?;
    run(config).await
}

async fn run(config: NodeConfig) -> Result<()> {
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data dir {}", config.data_dir.display()))?;

    let store = Arc::new(Store::new());
    let engine = RocksDbEngine::open(RocksDbConfig {
        path: config.db_path().display().to_string(),
        ..RocksDbConfig::default()
    })
    .context("opening database")?;
    store.init(Arc::new(engine));

    let store_sink = if config.log_window_ms > 0 {
        Some(telemetry::StoreLogLayer::new(
            store.log()?,
            config.log_window_ms,
        ))
    } else {
        None
    };
    telemetry::init(store_sink);

    info!(data_dir = %config.data_dir.display(), "Store opened");

    let authenticator =
        RequestAuthenticator::new(&config.auth_pubkey).context("WARDEN_AUTH_PUBKEY")?;

    let source = Arc::new(TcpChannelEventSource::new(config.node_addr.clone()));
    let interceptor = ChannelInterceptor::new(
        source,
        store.whitelist()?,
        store.policy()?,
        InterceptorConfig {
            default_reject_message: config
                .reject_message
                .clone()
                .unwrap_or_else(|| DEFAULT_REJECT_MESSAGE.to_string()),
            reconnect_delay: config.reconnect_delay,
        },
    );
    interceptor.start().await;
    info!(node = %config.node_addr, "Channel interceptor started");

    let app = warden_api::router(AppState::new(Arc::clone(&store), authenticator));
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "Control plane listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving control plane")?;

    interceptor.stop().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received interrupt, shutting down");
    }
}
