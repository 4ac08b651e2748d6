//! Node-daemon adapter.
//!
//! Speaks newline-delimited JSON over TCP to the daemon's channel
//! interceptor endpoint. Inbound: `{"channel_request":{"peer":"<hex>"}}`.
//! Outbound, one per request: `{"accept":true}` or
//! `{"reject":"<reason>"}`. Connection loss surfaces as a stream error
//! and the interceptor's fixed-delay resubscribe reconnects.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;
use warden_admission::{AdmissionError, ChannelEventSource, ChannelRequestStream, Decision, OpenRequest};
use warden_types::PeerPubKey;

/// Connects to the daemon's interceptor endpoint on each subscribe.
pub struct TcpChannelEventSource {
    addr: String,
}

impl TcpChannelEventSource {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }
}

#[async_trait]
impl ChannelEventSource for TcpChannelEventSource {
    async fn subscribe(&self) -> Result<Box<dyn ChannelRequestStream>, AdmissionError> {
        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|e| AdmissionError::Subscribe(format!("{}: {e}", self.addr)))?;
        let (read, write) = stream.into_split();
        let (pending, queue) = mpsc::unbounded_channel();
        tokio::spawn(write_replies(write, queue));
        Ok(Box::new(TcpRequestStream {
            lines: BufReader::new(read).lines(),
            pending,
        }))
    }
}

/// Drains pending decisions in the order their requests were read, so
/// each reply line pairs with the request at the same position even
/// when decisions resolve out of order.
async fn write_replies(
    mut writer: OwnedWriteHalf,
    mut queue: mpsc::UnboundedReceiver<oneshot::Receiver<Decision>>,
) {
    while let Some(decision_rx) = queue.recv().await {
        // The sender is dropped without a decision only during
        // teardown; no reply owed then.
        let Ok(decision) = decision_rx.await else {
            continue;
        };
        let reply = match decision {
            Decision::Accept => serde_json::json!({ "accept": true }),
            Decision::Reject(reason) => serde_json::json!({ "reject": reason }),
        };
        let mut line = reply.to_string();
        line.push('\n');
        if let Err(e) = writer.write_all(line.as_bytes()).await {
            warn!(error = %e, "Failed to reply to daemon channel request");
            return;
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChannelEvent {
    channel_request: ChannelRequestEvent,
}

#[derive(Debug, Deserialize)]
struct ChannelRequestEvent {
    peer: String,
}

struct TcpRequestStream {
    lines: Lines<BufReader<OwnedReadHalf>>,
    pending: mpsc::UnboundedSender<oneshot::Receiver<Decision>>,
}

#[async_trait]
impl ChannelRequestStream for TcpRequestStream {
    async fn next_request(&mut self) -> Result<Option<OpenRequest>, AdmissionError> {
        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|e| AdmissionError::Stream(e.to_string()))?;
            let Some(line) = line else { return Ok(None) };
            if line.trim().is_empty() {
                continue;
            }

            // Malformed lines from the daemon are skipped rather than
            // treated as a disconnect; the connection itself is fine.
            let event: ChannelEvent = match serde_json::from_str(&line) {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "Skipping malformed daemon event");
                    continue;
                }
            };
            let peer = match PeerPubKey::from_hex(&event.channel_request.peer) {
                Ok(peer) => peer,
                Err(e) => {
                    warn!(error = %e, "Skipping daemon event with malformed peer key");
                    continue;
                }
            };

            let (request, decision_rx) = OpenRequest::new(peer);
            if self.pending.send(decision_rx).is_err() {
                return Err(AdmissionError::Stream(
                    "reply writer is gone".to_string(),
                ));
            }
            return Ok(Some(request));
        }
    }
}
