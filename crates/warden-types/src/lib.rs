//! # Shared Types
//!
//! Domain types and protocol constants shared across the warden crates.

pub mod constants;
pub mod entities;
pub mod errors;

pub use constants::{
    DEFAULT_LOG_WINDOW_MS, DEFAULT_REJECT_MESSAGE, RECONNECT_DELAY, REJECT_MESSAGE_KEY,
    REJECT_MESSAGE_SIZE_LIMIT, UNKNOWN_ERROR_REJECT_MESSAGE,
};
pub use entities::{LogRecord, PeerPubKey, RejectMessage, Severity};
pub use errors::ValidationError;
