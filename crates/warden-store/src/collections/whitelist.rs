//! Peer whitelist collection.
//!
//! Key: lowercase hex peer identity. Value: `{"allowed": bool}`.
//! Absence of a row is equivalent to `allowed=false`; revoking flips the
//! flag rather than deleting the row.

use crate::adapters::rocksdb_engine::CF_WHITELIST;
use crate::errors::StoreError;
use crate::ports::{KeyValueEngine, RangeFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use warden_types::PeerPubKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WhitelistEntry {
    allowed: bool,
}

/// Handle to the whitelist collection.
#[derive(Clone)]
pub struct WhitelistCollection {
    engine: Arc<dyn KeyValueEngine>,
}

impl WhitelistCollection {
    pub(crate) fn new(engine: Arc<dyn KeyValueEngine>) -> Self {
        Self { engine }
    }

    fn entry(&self, key: &str) -> Result<Option<WhitelistEntry>, StoreError> {
        let Some(raw) = self.engine.get(CF_WHITELIST, key)? else {
            return Ok(None);
        };
        let entry = serde_json::from_slice(&raw).map_err(|e| StoreError::CorruptValue {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(entry))
    }

    /// Permit a peer to open channels. No-op when already allowed.
    pub fn allow(&self, peer: &PeerPubKey) -> Result<(), StoreError> {
        let key = peer.as_hex();
        if let Some(entry) = self.entry(&key)? {
            if entry.allowed {
                debug!(peer = %key, "Peer already whitelisted");
                return Ok(());
            }
        }
        self.put_entry(&key, true)
    }

    /// Revoke a peer's permission. No-op when absent or already revoked;
    /// the row is kept with `allowed=false` rather than deleted.
    pub fn revoke(&self, peer: &PeerPubKey) -> Result<(), StoreError> {
        let key = peer.as_hex();
        match self.entry(&key)? {
            None => Ok(()),
            Some(entry) if !entry.allowed => Ok(()),
            Some(_) => self.put_entry(&key, false),
        }
    }

    fn put_entry(&self, key: &str, allowed: bool) -> Result<(), StoreError> {
        let value = serde_json::to_vec(&WhitelistEntry { allowed })
            .map_err(|e| StoreError::Engine(e.to_string()))?;
        self.engine.put(CF_WHITELIST, key, &value)
    }

    /// Whether a peer may open channels. Absent rows count as not allowed.
    pub fn is_allowed(&self, peer: &PeerPubKey) -> Result<bool, StoreError> {
        Ok(self
            .entry(&peer.as_hex())?
            .map(|entry| entry.allowed)
            .unwrap_or(false))
    }

    /// Allowed peer identities in key order, stopping once `limit` matches
    /// have been collected. Disallowed rows are scanned and skipped, so
    /// more raw rows than `limit` may be read.
    pub fn allowed_peers(&self, limit: Option<usize>) -> Result<Vec<String>, StoreError> {
        let mut peers = Vec::new();
        if limit == Some(0) {
            return Ok(peers);
        }
        for row in self.engine.range(CF_WHITELIST, &RangeFilter::new())? {
            let (key, raw) = row?;
            let entry: WhitelistEntry =
                serde_json::from_slice(&raw).map_err(|e| StoreError::CorruptValue {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;
            if !entry.allowed {
                continue;
            }
            peers.push(key);
            if Some(peers.len()) == limit {
                break;
            }
        }
        Ok(peers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryEngine;
    use crate::test_utils::CountingEngine;
    use warden_types::PeerPubKey;

    fn peer(first_byte: &str) -> PeerPubKey {
        let hex = format!("{}{}", first_byte, "0".repeat(64));
        PeerPubKey::from_hex(&hex).unwrap()
    }

    fn collection() -> (Arc<CountingEngine>, WhitelistCollection) {
        let engine = Arc::new(CountingEngine::new(Arc::new(MemoryEngine::new())));
        let collection = WhitelistCollection::new(engine.clone());
        (engine, collection)
    }

    #[test]
    fn test_allow_then_listed() {
        let (_engine, wl) = collection();
        let p = peer("02");

        wl.allow(&p).unwrap();
        assert!(wl.is_allowed(&p).unwrap());
        assert_eq!(wl.allowed_peers(None).unwrap(), vec![p.as_hex()]);
    }

    #[test]
    fn test_revoke_then_not_listed() {
        let (_engine, wl) = collection();
        let p = peer("02");

        wl.allow(&p).unwrap();
        wl.revoke(&p).unwrap();
        assert!(!wl.is_allowed(&p).unwrap());
        assert!(wl.allowed_peers(None).unwrap().is_empty());
    }

    #[test]
    fn test_allow_twice_writes_once() {
        let (engine, wl) = collection();
        let p = peer("02");

        wl.allow(&p).unwrap();
        assert_eq!(engine.put_count(), 1);
        wl.allow(&p).unwrap();
        assert_eq!(engine.put_count(), 1);
    }

    #[test]
    fn test_revoke_unknown_peer_writes_nothing() {
        let (engine, wl) = collection();

        wl.revoke(&peer("02")).unwrap();
        assert_eq!(engine.put_count(), 0);

        // Revoking an already-revoked peer is also write-free
        let p = peer("03");
        wl.allow(&p).unwrap();
        wl.revoke(&p).unwrap();
        let writes = engine.put_count();
        wl.revoke(&p).unwrap();
        assert_eq!(engine.put_count(), writes);
    }

    #[test]
    fn test_absent_peer_is_not_allowed() {
        let (_engine, wl) = collection();
        assert!(!wl.is_allowed(&peer("02")).unwrap());
    }

    #[test]
    fn test_limit_counts_matches_not_rows() {
        let (_engine, wl) = collection();
        let a = peer("02");
        let b = peer("03");
        let c = peer("04");
        let d = peer("05");

        wl.allow(&a).unwrap();
        wl.allow(&b).unwrap();
        wl.revoke(&b).unwrap();
        wl.allow(&c).unwrap();
        wl.allow(&d).unwrap();

        // B is scanned but skipped; the limit counts allowed entries only
        let listed = wl.allowed_peers(Some(2)).unwrap();
        assert_eq!(listed, vec![a.as_hex(), c.as_hex()]);
    }

    #[test]
    fn test_listing_preserves_key_order() {
        let (_engine, wl) = collection();
        let late = peer("05");
        let early = peer("02");

        wl.allow(&late).unwrap();
        wl.allow(&early).unwrap();
        assert_eq!(
            wl.allowed_peers(None).unwrap(),
            vec![early.as_hex(), late.as_hex()]
        );
    }
}
