//! Operational log collection.
//!
//! Keys are `{epoch_ms:013}_{severity}` so range queries by time come
//! back in time order; the fixed-width timestamp keeps bounds built from
//! any date exact. Retention is a rolling window enforced lazily: each append
//! sweeps everything older than the window, so under light traffic old
//! records may outlive the window until the next write. There is no
//! background sweep.

use crate::adapters::rocksdb_engine::CF_LOG;
use crate::errors::StoreError;
use crate::ports::{KeyValueEngine, RangeFilter};
use std::sync::Arc;
use tracing::debug;
use warden_types::LogRecord;

/// Handle to the log collection.
#[derive(Clone)]
pub struct LogCollection {
    engine: Arc<dyn KeyValueEngine>,
}

impl LogCollection {
    pub(crate) fn new(engine: Arc<dyn KeyValueEngine>) -> Self {
        Self { engine }
    }

    /// Persist a record, then evict records older than `window_ms`.
    /// A window of 0 disables persistence entirely.
    pub fn append(&self, record: &LogRecord, window_ms: u64) -> Result<(), StoreError> {
        if window_ms == 0 {
            return Ok(());
        }
        let value = serde_json::to_vec(record).map_err(|e| StoreError::Engine(e.to_string()))?;
        self.engine.put(CF_LOG, &record.key(), &value)?;

        let cutoff = record.timestamp.saturating_sub(window_ms);
        self.purge(&RangeFilter::new().lt(LogRecord::timestamp_key(cutoff)))
    }

    /// Records within the filter's bounds, oldest first unless reversed.
    /// Rows that fail to decode are skipped, not fatal.
    pub fn records(&self, filter: &RangeFilter) -> Result<Vec<LogRecord>, StoreError> {
        let mut records = Vec::new();
        for row in self.engine.range(CF_LOG, filter)? {
            let (key, raw) = row?;
            match serde_json::from_slice(&raw) {
                Ok(record) => records.push(record),
                Err(e) => debug!(key = %key, error = %e, "Skipping undecodable log record"),
            }
        }
        Ok(records)
    }

    /// Bulk-delete records matching the filter (bounds, optional limit,
    /// optional reverse order so a limited purge takes the newest first).
    pub fn purge(&self, filter: &RangeFilter) -> Result<(), StoreError> {
        let keys: Vec<String> = self
            .engine
            .range(CF_LOG, filter)?
            .map(|row| row.map(|(key, _)| key))
            .collect::<Result<_, _>>()?;
        for key in keys {
            self.engine.delete(CF_LOG, &key)?;
        }
        Ok(())
    }
}
