//! Operator policy collection.
//!
//! Holds the custom channel-reject message under a fixed sentinel key.
//! Absence means the built-in default applies.

use crate::adapters::rocksdb_engine::CF_POLICY;
use crate::errors::StoreError;
use crate::ports::KeyValueEngine;
use std::sync::Arc;
use warden_types::{RejectMessage, REJECT_MESSAGE_KEY};

/// Handle to the policy collection.
#[derive(Clone)]
pub struct PolicyCollection {
    engine: Arc<dyn KeyValueEngine>,
}

impl PolicyCollection {
    pub(crate) fn new(engine: Arc<dyn KeyValueEngine>) -> Self {
        Self { engine }
    }

    /// The stored custom reject message, if any.
    pub fn reject_message(&self) -> Result<Option<String>, StoreError> {
        let Some(raw) = self.engine.get(CF_POLICY, REJECT_MESSAGE_KEY)? else {
            return Ok(None);
        };
        let message = serde_json::from_slice(&raw).map_err(|e| StoreError::CorruptValue {
            key: REJECT_MESSAGE_KEY.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(message))
    }

    /// Store a custom reject message. Length is validated by
    /// [`RejectMessage`] construction, before the write.
    pub fn set_reject_message(&self, message: &RejectMessage) -> Result<(), StoreError> {
        let value = serde_json::to_vec(message.as_str())
            .map_err(|e| StoreError::Engine(e.to_string()))?;
        self.engine.put(CF_POLICY, REJECT_MESSAGE_KEY, &value)
    }

    /// Remove the custom message, reverting to the built-in default.
    pub fn clear_reject_message(&self) -> Result<(), StoreError> {
        self.engine.delete(CF_POLICY, REJECT_MESSAGE_KEY)
    }
}
