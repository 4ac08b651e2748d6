//! # Error Types
//!
//! Client-input validation failures shared across crates. These always map
//! to a 400-class response naming the specific defect.

use thiserror::Error;

/// Malformed client input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Peer identity is not a 33-byte compressed key in plain hex.
    #[error("Invalid pubKey")]
    InvalidPubKey,

    /// Reject message body is missing or empty.
    #[error("Missing message")]
    MissingMessage,

    /// Reject message exceeds the protocol limit.
    #[error("Message exceeds {limit} characters: got {len}")]
    MessageTooLong { len: usize, limit: usize },

    /// A date query parameter could not be parsed.
    #[error("Invalid {param}")]
    InvalidDate { param: &'static str },

    /// A date bound on a bulk log deletion could not be parsed.
    #[error("Invalid date for {param} param")]
    InvalidDateBound { param: &'static str },

    /// Bulk log deletion was requested without any date bound.
    #[error("Must provide at least one of before or after dates")]
    MissingDateBounds,
}
