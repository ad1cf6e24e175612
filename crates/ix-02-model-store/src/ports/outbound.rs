//! # Outbound Ports (Driven Ports)
//!
//! The storage contract the indexer needs from its host: point reads and
//! writes, atomic batches and ordered range scans.

use crate::domain::errors::KVStoreError;

/// Direction of a range scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    Ascending,
    Descending,
}

/// Ordered key-value store.
///
/// Production: `RocksDbStore` (ix-runtime, `rocksdb` feature)
/// Testing: `InMemoryKVStore`
pub trait KeyValueStore: Send + Sync {
    /// Raw value stored under `key`.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Insert or overwrite one key.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key. Deleting an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Either all operations are applied or none are.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Whether `key` has a value.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// Up to `limit` entries whose key starts with `prefix`, in byte order
    /// (or reverse), strictly after `after` in that direction when given.
    fn range_scan(
        &self,
        prefix: &[u8],
        order: ScanOrder,
        after: Option<&[u8]>,
        limit: usize,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError>;
}

/// One write inside a [`KeyValueStore::atomic_batch_write`]; applied in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}

/// Smallest key greater than every key starting with `prefix`, if any.
pub fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}
