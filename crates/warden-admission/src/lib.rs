//! # Channel Admission
//!
//! Maintains a live subscription to the node's channel-open-request
//! stream, consults the whitelist per request, and replies accept or
//! reject. On stream failure it resubscribes after a fixed delay,
//! indefinitely; teardown is explicit and idempotent.
//!
//! The node daemon is an external collaborator; this crate only defines
//! the stream port and the decision state machine.

pub mod errors;
pub mod interceptor;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use errors::AdmissionError;
pub use interceptor::{ChannelInterceptor, InterceptorConfig};
pub use ports::{ChannelEventSource, ChannelRequestStream, Decision, OpenRequest};
