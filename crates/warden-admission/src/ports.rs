//! Ports to the node daemon's channel-open-request stream.
//!
//! The event-emitter shape of the upstream interface is reframed as a
//! pull-based stream plus a oneshot decision channel, so detaching from
//! a dead stream is structural (drop it) rather than listener bookkeeping.

use crate::errors::AdmissionError;
use async_trait::async_trait;
use tokio::sync::oneshot;
use warden_types::PeerPubKey;

/// The admission decision for one channel-open request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject(String),
}

/// One incoming channel-open request. Carries the requesting peer's
/// identity and a single-use reply channel; every request receives
/// exactly one decision.
pub struct OpenRequest {
    pub peer: PeerPubKey,
    responder: oneshot::Sender<Decision>,
}

impl OpenRequest {
    /// Create a request plus the receiver the transport waits on.
    pub fn new(peer: PeerPubKey) -> (Self, oneshot::Receiver<Decision>) {
        let (responder, rx) = oneshot::channel();
        (Self { peer, responder }, rx)
    }

    /// Deliver the decision. Consumes the request; a second reply is
    /// impossible by construction.
    pub fn respond(self, decision: Decision) {
        // The transport may have gone away mid-decision; nothing to do then.
        let _ = self.responder.send(decision);
    }
}

/// Factory for subscriptions to the node's channel-open-request stream.
#[async_trait]
pub trait ChannelEventSource: Send + Sync {
    async fn subscribe(&self) -> Result<Box<dyn ChannelRequestStream>, AdmissionError>;
}

/// A live subscription. `Ok(None)` means the stream closed cleanly;
/// `Err` means it failed. Dropping the stream detaches it.
#[async_trait]
pub trait ChannelRequestStream: Send {
    async fn next_request(&mut self) -> Result<Option<OpenRequest>, AdmissionError>;
}
