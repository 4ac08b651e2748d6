//! Environment-driven configuration.
//!
//! Built once at startup and passed by reference into the pieces that
//! need it. Nothing reads the environment after this point.

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use warden_types::{RejectMessage, DEFAULT_LOG_WINDOW_MS, RECONNECT_DELAY};

/// Runtime configuration for the warden daemon.
///
/// | Variable | Default | Meaning |
/// |---|---|---|
/// | `WARDEN_DATA_DIR` | `./warden-data` | Database and key directory |
/// | `WARDEN_LISTEN_ADDR` | `127.0.0.1:9080` | Control-plane bind address |
/// | `WARDEN_AUTH_PUBKEY` | required | Hex public key, or `@path` to read it from a file |
/// | `WARDEN_NODE_ADDR` | `127.0.0.1:10019` | Node daemon interceptor endpoint |
/// | `WARDEN_REJECT_MESSAGE` | built-in | Default reject message override |
/// | `WARDEN_LOG_WINDOW_MS` | 14 days | Log retention window; 0 disables persistence |
/// | `WARDEN_RECONNECT_DELAY_MS` | 1000 | Delay between resubscribe attempts |
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub data_dir: PathBuf,
    pub listen_addr: SocketAddr,
    pub auth_pubkey: String,
    pub node_addr: String,
    pub reject_message: Option<String>,
    pub log_window_ms: u64,
    pub reconnect_delay: Duration,
}

impl NodeConfig {
    pub fn from_env() -> Result<Self> {
        let data_dir = PathBuf::from(var_or("WARDEN_DATA_DIR", "./warden-data"));

        let listen_addr: SocketAddr = var_or("WARDEN_LISTEN_ADDR", "127.0.0.1:9080")
            .parse()
            .context("WARDEN_LISTEN_ADDR is not a valid socket address")?;

        let Some(auth_pubkey) = std::env::var("WARDEN_AUTH_PUBKEY").ok().filter(|v| !v.is_empty())
        else {
            bail!("WARDEN_AUTH_PUBKEY is required. Run `warden-node keygen` to create a keypair.");
        };
        let auth_pubkey = match auth_pubkey.strip_prefix('@') {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("reading auth public key from {path}"))?
                .trim()
                .to_string(),
            None => auth_pubkey,
        };

        let node_addr = var_or("WARDEN_NODE_ADDR", "127.0.0.1:10019");

        let reject_message = std::env::var("WARDEN_REJECT_MESSAGE")
            .ok()
            .filter(|v| !v.is_empty());
        if let Some(message) = &reject_message {
            RejectMessage::new(message.clone()).context("WARDEN_REJECT_MESSAGE is not usable")?;
        }

        let log_window_ms = match std::env::var("WARDEN_LOG_WINDOW_MS") {
            Ok(raw) => raw
                .parse()
                .context("WARDEN_LOG_WINDOW_MS is not a number")?,
            Err(_) => DEFAULT_LOG_WINDOW_MS,
        };

        let reconnect_delay = match std::env::var("WARDEN_RECONNECT_DELAY_MS") {
            Ok(raw) => Duration::from_millis(
                raw.parse()
                    .context("WARDEN_RECONNECT_DELAY_MS is not a number")?,
            ),
            Err(_) => RECONNECT_DELAY,
        };

        Ok(Self {
            data_dir,
            listen_addr,
            auth_pubkey,
            node_addr,
            reject_message,
            log_window_ms,
            reconnect_delay,
        })
    }

    /// Database directory under the data dir.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("db")
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
