//! # RocksDB Storage Engine
//!
//! Production engine behind the `KeyValueEngine` port. Each collection
//! maps to its own column family.

use crate::errors::StoreError;
use crate::ports::{KeyValueEngine, RangeFilter, RangeIter};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, DB};

/// Column family per collection.
pub const CF_WHITELIST: &str = "whitelist";
pub const CF_POLICY: &str = "policy";
pub const CF_LOG: &str = "log";

/// All column families used by the warden.
pub const COLUMN_FAMILIES: &[&str] = &[CF_WHITELIST, CF_POLICY, CF_LOG];

/// RocksDB tuning knobs.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory.
    pub path: String,
    /// Write buffer size in bytes (default: 16MB).
    pub write_buffer_size: usize,
    /// fsync after each write (default: true).
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/db".to_string(),
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Smaller buffers, no fsync. For tests.
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            write_buffer_size: 4 * 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed engine implementing the `KeyValueEngine` port.
pub struct RocksDbEngine {
    db: DB,
    sync_writes: bool,
}

impl RocksDbEngine {
    /// Open or create the database with one column family per collection.
    pub fn open(config: RocksDbConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| StoreError::Engine(format!("Failed to open RocksDB: {}", e)))?;

        Ok(Self {
            db,
            sync_writes: config.sync_writes,
        })
    }

    fn cf(&self, ns: &str) -> Result<&ColumnFamily, StoreError> {
        self.db
            .cf_handle(ns)
            .ok_or_else(|| StoreError::UnknownCollection(ns.to_string()))
    }

    fn write_opts(&self) -> rocksdb::WriteOptions {
        let mut write_opts = rocksdb::WriteOptions::default();
        write_opts.set_sync(self.sync_writes);
        write_opts
    }
}

impl KeyValueEngine for RocksDbEngine {
    fn get(&self, ns: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let cf = self.cf(ns)?;
        self.db
            .get_cf(cf, key.as_bytes())
            .map_err(|e| StoreError::Engine(format!("RocksDB get failed: {}", e)))
    }

    fn put(&self, ns: &str, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let cf = self.cf(ns)?;
        self.db
            .put_cf_opt(cf, key.as_bytes(), value, &self.write_opts())
            .map_err(|e| StoreError::Engine(format!("RocksDB put failed: {}", e)))
    }

    fn delete(&self, ns: &str, key: &str) -> Result<(), StoreError> {
        let cf = self.cf(ns)?;
        self.db
            .delete_cf_opt(cf, key.as_bytes(), &self.write_opts())
            .map_err(|e| StoreError::Engine(format!("RocksDB delete failed: {}", e)))
    }

    fn range<'a>(&'a self, ns: &str, filter: &RangeFilter) -> Result<RangeIter<'a>, StoreError> {
        let cf = self.cf(ns)?;

        // Seed the raw iterator at the tight end for the scan direction;
        // the filter skips any boundary key the seek overshoots onto.
        let lower = filter.gte.as_deref().or(filter.gt.as_deref());
        let upper = filter.lte.as_deref().or(filter.lt.as_deref());
        let mode = if filter.reverse {
            match upper {
                Some(key) => IteratorMode::From(key.as_bytes(), Direction::Reverse),
                None => IteratorMode::End,
            }
        } else {
            match lower {
                Some(key) => IteratorMode::From(key.as_bytes(), Direction::Forward),
                None => IteratorMode::Start,
            }
        };

        let mut inner = self.db.iterator_cf(cf, mode);
        let filter = filter.clone();
        let mut remaining = filter.limit;

        Ok(Box::new(std::iter::from_fn(move || {
            if remaining == Some(0) {
                return None;
            }
            loop {
                match inner.next() {
                    None => return None,
                    Some(Err(e)) => {
                        return Some(Err(StoreError::Engine(format!(
                            "RocksDB scan failed: {}",
                            e
                        ))))
                    }
                    Some(Ok((key, value))) => {
                        let key = String::from_utf8_lossy(&key).into_owned();
                        if filter.past_end(&key) {
                            return None;
                        }
                        if !filter.contains(&key) {
                            continue;
                        }
                        if let Some(r) = remaining.as_mut() {
                            *r -= 1;
                        }
                        return Some(Ok((key, value.into_vec())));
                    }
                }
            }
        })))
    }
}
