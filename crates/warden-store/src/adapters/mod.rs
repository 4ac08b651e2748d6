//! Storage engine adapters.

pub mod memory;
pub mod rocksdb_engine;
