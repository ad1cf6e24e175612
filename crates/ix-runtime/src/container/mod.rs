//! # Runtime Container
//!
//! Configuration and the store it selects.

pub mod config;

pub use config::{ConfigError, FeedSource, RuntimeConfig, StorageBackend};

use anyhow::Result;
use ix_02_model_store::ModelStore;

/// Open the configured backend.
pub fn open_store(config: &RuntimeConfig) -> Result<ModelStore> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::warn!("[ix-runtime] in-memory store, nothing survives a restart");
            Ok(ModelStore::in_memory())
        }
        #[cfg(feature = "rocksdb")]
        StorageBackend::RocksDb => {
            use crate::adapters::storage::{RocksDbConfig, RocksDbStore};
            use anyhow::Context;

            let store = RocksDbStore::open(RocksDbConfig::new(&config.data_dir))
                .context("failed to open RocksDB store")?;
            Ok(ModelStore::new(store))
        }
        #[cfg(not(feature = "rocksdb"))]
        StorageBackend::RocksDb => Err(ConfigError::BackendUnavailable {
            backend: StorageBackend::RocksDb,
        }
        .into()),
    }
}
