//! # Production Storage Adapters
//!
//! Enable the `rocksdb` feature to use the RocksDB backend:
//!
//! ```toml
//! ix-runtime = { path = "...", features = ["rocksdb"] }
//! ```
//!
//! Without it only the in-memory store from `ix-02-model-store` is available.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};

pub use ix_02_model_store::InMemoryKVStore;
