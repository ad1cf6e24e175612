//! In-memory key-value store.
//!
//! Ordered by key, so range scans behave like the RocksDB adapter. Clones
//! share the same map.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{prefix_successor, BatchOperation, KeyValueStore, ScanOrder};

#[derive(Debug, Default, Clone)]
pub struct InMemoryKVStore {
    data: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.data.write().remove(key);
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        // Single write lock: readers see all or nothing.
        let mut data = self.data.write();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    data.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    data.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.read().contains_key(key))
    }

    fn range_scan(
        &self,
        prefix: &[u8],
        order: ScanOrder,
        after: Option<&[u8]>,
        limit: usize,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
        // A cursor outside the prefix leaves every candidate on one side.
        let after = match after {
            Some(cursor) if !cursor.starts_with(prefix) => {
                let before_prefix = cursor < prefix;
                match (order, before_prefix) {
                    (ScanOrder::Ascending, true) | (ScanOrder::Descending, false) => None,
                    _ => return Ok(Vec::new()),
                }
            }
            other => other,
        };

        let data = self.data.read();
        let upper = match prefix_successor(prefix) {
            Some(end) => Bound::Excluded(end),
            None => Bound::Unbounded,
        };

        let results = match order {
            ScanOrder::Ascending => {
                let lower = match after {
                    Some(after) => Bound::Excluded(after.to_vec()),
                    None => Bound::Included(prefix.to_vec()),
                };
                data.range((lower, upper))
                    .filter(|(k, _)| k.starts_with(prefix))
                    .take(limit)
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            }
            ScanOrder::Descending => {
                let upper = match after {
                    Some(after) => Bound::Excluded(after.to_vec()),
                    None => upper,
                };
                data.range((Bound::Included(prefix.to_vec()), upper))
                    .rev()
                    .filter(|(k, _)| k.starts_with(prefix))
                    .take(limit)
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            }
        };

        Ok(results)
    }
}
