//! In-memory engine for unit tests.
//!
//! A `BTreeMap` per namespace keeps iteration in key order, matching the
//! production RocksDB engine. Production uses `RocksDbEngine`.

use crate::errors::StoreError;
use crate::ports::{KeyValueEngine, RangeFilter, RangeIter};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

#[derive(Default)]
pub struct MemoryEngine {
    namespaces: RwLock<HashMap<String, BTreeMap<String, Vec<u8>>>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueEngine for MemoryEngine {
    fn get(&self, ns: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let namespaces = self.namespaces.read();
        Ok(namespaces.get(ns).and_then(|map| map.get(key).cloned()))
    }

    fn put(&self, ns: &str, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut namespaces = self.namespaces.write();
        namespaces
            .entry(ns.to_string())
            .or_default()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, ns: &str, key: &str) -> Result<(), StoreError> {
        let mut namespaces = self.namespaces.write();
        if let Some(map) = namespaces.get_mut(ns) {
            map.remove(key);
        }
        Ok(())
    }

    fn range<'a>(&'a self, ns: &str, filter: &RangeFilter) -> Result<RangeIter<'a>, StoreError> {
        let namespaces = self.namespaces.read();
        let Some(map) = namespaces.get(ns) else {
            return Ok(Box::new(std::iter::empty()));
        };

        let lower = match (&filter.gt, &filter.gte) {
            (Some(gt), _) => Bound::Excluded(gt.clone()),
            (None, Some(gte)) => Bound::Included(gte.clone()),
            (None, None) => Bound::Unbounded,
        };
        let upper = match (&filter.lt, &filter.lte) {
            (Some(lt), _) => Bound::Excluded(lt.clone()),
            (None, Some(lte)) => Bound::Included(lte.clone()),
            (None, None) => Bound::Unbounded,
        };

        let mut rows: Vec<(String, Vec<u8>)> = map
            .range::<String, _>((lower, upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if filter.reverse {
            rows.reverse();
        }
        if let Some(limit) = filter.limit {
            rows.truncate(limit);
        }
        Ok(Box::new(rows.into_iter().map(Ok)))
    }
}
