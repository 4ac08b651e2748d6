//! Admission error types.

use thiserror::Error;
use warden_store::StoreError;

/// Failures inside the admission subsystem. None of these reach a peer:
/// stream failures trigger a resubscribe, decision failures resolve to a
/// generic reject.
#[derive(Debug, Clone, Error)]
pub enum AdmissionError {
    /// Could not open a subscription to the node's event stream.
    #[error("Subscription failed: {0}")]
    Subscribe(String),

    /// The live stream disconnected or delivered a transport error.
    #[error("Stream error: {0}")]
    Stream(String),

    /// Whitelist or policy lookup failed while deciding.
    #[error(transparent)]
    Store(#[from] StoreError),
}
