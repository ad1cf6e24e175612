//! # Indexer Runtime
//!
//! Wires configuration, telemetry and storage around the dispatcher and
//! replays a block feed through it.
//!
//! ## Startup Sequence
//!
//! 1. `RuntimeConfig::from_env` (fails fast on bad values)
//! 2. Telemetry (subscriber + metrics registry)
//! 3. Store (in-memory, or RocksDB with the `rocksdb` feature)
//! 4. Default registry and a metrics-counting decode sink
//! 5. Replay until the feed ends, an event fails, or shutdown is requested
//!
//! ## Feed format
//!
//! One JSON object per line:
//!
//! ```text
//! {"index": {"hash": "...", "height": 1, "time": 0, "medianTime": 0, "transactions": []}}
//! {"invalidate": "<block hash>"}
//! ```

pub mod adapters;
pub mod container;
pub mod feed;
pub mod replay;

pub use adapters::MetricsSink;
pub use container::{open_store, ConfigError, FeedSource, RuntimeConfig, StorageBackend};
pub use feed::{FeedError, FeedEvent, FeedReader};
pub use replay::{ReplayError, ReplaySummary, Replayer};
