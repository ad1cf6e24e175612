//! # RocksDB Storage Adapter
//!
//! RocksDB implementation of the model store's `KeyValueStore` port.
//!
//! ## Features
//!
//! - Atomic batch writes (WriteBatch)
//! - Snappy compression
//! - Bloom filters for point reads
//! - Ordered range scans in both directions via `IteratorMode::From`
//!
//! All models share the default column family; the model store's key
//! layout already separates tables by prefix.

use ix_02_model_store::ports::outbound::prefix_successor;
use ix_02_model_store::{BatchOperation, KVStoreError, KeyValueStore, ScanOrder};
use parking_lot::RwLock;
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, WriteOptions, DB};
use std::path::Path;
use std::sync::Arc;

/// RocksDB tuning.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: String,
    /// Block cache size in bytes (default: 256MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 64MB)
    pub write_buffer_size: usize,
    /// Maximum number of write buffers (default: 3)
    pub max_write_buffer_number: i32,
    /// Enable fsync after each write (default: true)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/ix".to_string(),
            block_cache_size: 256 * 1024 * 1024,
            write_buffer_size: 64 * 1024 * 1024,
            max_write_buffer_number: 3,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        }
    }

    /// Smaller buffers, no sync.
    pub fn for_testing(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
            block_cache_size: 8 * 1024 * 1024,
            write_buffer_size: 4 * 1024 * 1024,
            max_write_buffer_number: 2,
            sync_writes: false,
        }
    }
}

fn io_error(op: &str, e: rocksdb::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: format!("RocksDB {op} failed: {e}"),
    }
}

pub struct RocksDbStore {
    db: Arc<RwLock<DB>>,
    config: RocksDbConfig,
}

impl RocksDbStore {
    /// Open or create a RocksDB database.
    pub fn open(config: RocksDbConfig) -> Result<Self, KVStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_max_write_buffer_number(config.max_write_buffer_number);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, &config.path).map_err(|e| KVStoreError::IOError {
            message: format!("Failed to open RocksDB at {}: {}", config.path, e),
        })?;
        tracing::info!(path = %config.path, "[ix-runtime] RocksDB opened");

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            config,
        })
    }

    fn write_options(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.db.read().get(key).map_err(|e| io_error("get", e))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        let db = self.db.write();
        db.put_opt(key, value, &self.write_options())
            .map_err(|e| io_error("put", e))
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        let db = self.db.write();
        db.delete_opt(key, &self.write_options())
            .map_err(|e| io_error("delete", e))
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let db = self.db.write();
        let mut batch = WriteBatch::default();

        for op in operations {
            match op {
                BatchOperation::Put { key, value } => batch.put(&key, &value),
                BatchOperation::Delete { key } => batch.delete(&key),
            }
        }

        db.write_opt(batch, &self.write_options())
            .map_err(|e| io_error("batch write", e))
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        self.db
            .read()
            .get_pinned(key)
            .map(|v| v.is_some())
            .map_err(|e| io_error("exists check", e))
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

        let db = self.db.read();
        let mut results = Vec::new();
        if limit == 0 {
            return Ok(results);
        }

        // Exclusive start for the reverse walk.
        let upper = match order {
            ScanOrder::Ascending => None,
            ScanOrder::Descending => after.map(<[u8]>::to_vec).or_else(|| prefix_successor(prefix)),
        };

        let iter = match order {
            ScanOrder::Ascending => {
                db.iterator(IteratorMode::From(after.unwrap_or(prefix), Direction::Forward))
            }
            ScanOrder::Descending => match &upper {
                Some(start) => db.iterator(IteratorMode::From(start.as_slice(), Direction::Reverse)),
                None => db.iterator(IteratorMode::End),
            },
        };

        for item in iter {
            let (key, value) = item.map_err(|e| io_error("scan", e))?;
            let skip = match order {
                ScanOrder::Ascending => after.is_some_and(|a| *key == *a),
                ScanOrder::Descending => upper.as_deref().is_some_and(|u| *key >= *u),
            };
            if skip {
                continue;
            }
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_vec(), value.to_vec()));
            if results.len() == limit {
                break;
            }
        }

        Ok(results)
    }
}
