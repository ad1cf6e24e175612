//! Adapters. Production RocksDB lives in the runtime crate.

pub mod memory;
