//! # Model Store
//!
//! Maps projection entities onto an ordered key-value store.
//!
//! ## Key layout
//!
//! ```text
//! {table}:{id}                     -> entity (JSON)
//! {table}#{partition}#{sort}       -> id          (only for indexed models)
//! ```
//!
//! Sort keys are zero-padded hex so lexicographic order is chronological
//! order. Range queries walk the index rows of one partition in either
//! direction, starting after an optional cursor.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::memory::InMemoryKVStore;
pub use domain::errors::{KVStoreError, ModelError};
pub use domain::keys;
pub use domain::model::{IndexKey, Model};
pub use domain::models::*;
pub use ports::outbound::{BatchOperation, KeyValueStore, ScanOrder};
pub use service::ModelStore;
