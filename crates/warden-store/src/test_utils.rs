//! Spy engines for store tests.

use crate::errors::StoreError;
use crate::ports::{KeyValueEngine, RangeFilter, RangeIter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Wraps an engine and counts writes, for asserting no-op paths stay
/// write-free.
pub struct CountingEngine {
    inner: Arc<dyn KeyValueEngine>,
    puts: AtomicUsize,
    deletes: AtomicUsize,
}

impl CountingEngine {
    pub fn new(inner: Arc<dyn KeyValueEngine>) -> Self {
        Self {
            inner,
            puts: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

impl KeyValueEngine for CountingEngine {
    fn get(&self, ns: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(ns, key)
    }

    fn put(&self, ns: &str, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(ns, key, value)
    }

    fn delete(&self, ns: &str, key: &str) -> Result<(), StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(ns, key)
    }

    fn range<'a>(&'a self, ns: &str, filter: &RangeFilter) -> Result<RangeIter<'a>, StoreError> {
        self.inner.range(ns, filter)
    }
}

/// Engine whose operations all fail, for exercising store-failure paths.
pub struct FailingEngine;

impl KeyValueEngine for FailingEngine {
    fn get(&self, _ns: &str, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(StoreError::Engine("injected failure".to_string()))
    }

    fn put(&self, _ns: &str, _key: &str, _value: &[u8]) -> Result<(), StoreError> {
        Err(StoreError::Engine("injected failure".to_string()))
    }

    fn delete(&self, _ns: &str, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Engine("injected failure".to_string()))
    }

    fn range<'a>(&'a self, _ns: &str, _filter: &RangeFilter) -> Result<RangeIter<'a>, StoreError> {
        Err(StoreError::Engine("injected failure".to_string()))
    }
}
