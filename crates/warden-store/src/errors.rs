//! Store error types.

use thiserror::Error;

/// Errors from the key-value store and its collections.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A collection was used before `Store::init` completed.
    #[error("Store is not initialized. Did you call `init`?")]
    NotInitialized,

    /// The requested namespace does not exist in the engine.
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// Underlying engine failure (I/O, corruption, iteration).
    #[error("Engine error: {0}")]
    Engine(String),

    /// A stored value failed to decode.
    #[error("Corrupt value at key {key}: {reason}")]
    CorruptValue { key: String, reason: String },
}
