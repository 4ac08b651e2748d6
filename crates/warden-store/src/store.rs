//! Store initialization and collection handles.

use crate::collections::{LogCollection, PolicyCollection, WhitelistCollection};
use crate::errors::StoreError;
use crate::ports::KeyValueEngine;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// The warden's store: one engine instance, three independent collections.
///
/// `init` is an explicit, idempotent step; collection accessors fail with
/// [`StoreError::NotInitialized`] until it has completed. Handles returned
/// after that are owned references into the engine and can be cloned and
/// passed around freely.
#[derive(Default)]
pub struct Store {
    engine: RwLock<Option<Arc<dyn KeyValueEngine>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the engine. The first call wins; repeat calls are no-ops.
    pub fn init(&self, engine: Arc<dyn KeyValueEngine>) {
        let mut slot = self.engine.write();
        if slot.is_some() {
            debug!("Store already initialized, ignoring repeat init");
            return;
        }
        *slot = Some(engine);
    }

    fn engine(&self) -> Result<Arc<dyn KeyValueEngine>, StoreError> {
        self.engine
            .read()
            .clone()
            .ok_or(StoreError::NotInitialized)
    }

    /// Peer-identity allow-list.
    pub fn whitelist(&self) -> Result<WhitelistCollection, StoreError> {
        Ok(WhitelistCollection::new(self.engine()?))
    }

    /// Operator policy settings (custom reject message).
    pub fn policy(&self) -> Result<PolicyCollection, StoreError> {
        Ok(PolicyCollection::new(self.engine()?))
    }

    /// Timestamped operational log records.
    pub fn log(&self) -> Result<LogCollection, StoreError> {
        Ok(LogCollection::new(self.engine()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryEngine;

    #[test]
    fn test_collections_fail_before_init() {
        let store = Store::new();
        assert!(matches!(
            store.whitelist(),
            Err(StoreError::NotInitialized)
        ));
        assert!(matches!(store.policy(), Err(StoreError::NotInitialized)));
        assert!(matches!(store.log(), Err(StoreError::NotInitialized)));
    }

    #[test]
    fn test_init_is_idempotent() {
        let store = Store::new();
        let engine = Arc::new(MemoryEngine::new());

        store.init(engine.clone());
        let whitelist = store.whitelist().unwrap();
        let peer = warden_types::PeerPubKey::from_hex(
            "02a1633cafcc01ebfb6d78e39f687a1f0995c62fc95f51ead10a02ee0be551b5dc",
        )
        .unwrap();
        whitelist.allow(&peer).unwrap();

        // Second init must not replace the engine
        store.init(Arc::new(MemoryEngine::new()));
        assert!(store.whitelist().unwrap().is_allowed(&peer).unwrap());
    }
}
