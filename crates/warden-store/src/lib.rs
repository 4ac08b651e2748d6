//! # Key-Value Store & Collections
//!
//! Embedded ordered key-value storage for the warden, organized into
//! independent named collections sharing one engine instance.
//!
//! ## Architecture
//!
//! - **Ports** (`ports.rs`): the `KeyValueEngine` trait and `RangeFilter`
//! - **Adapters** (`adapters/`): RocksDB (production) and in-memory engines
//! - **Collections** (`collections/`): whitelist, policy, and log handles
//!
//! The store must be explicitly initialized before any collection handle
//! can be obtained; initialization is idempotent.

pub mod adapters;
pub mod collections;
pub mod errors;
pub mod ports;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::memory::MemoryEngine;
pub use adapters::rocksdb_engine::{RocksDbConfig, RocksDbEngine};
pub use collections::{LogCollection, PolicyCollection, WhitelistCollection};
pub use errors::StoreError;
pub use ports::{KeyValueEngine, RangeFilter, RangeIter};
pub use store::Store;
