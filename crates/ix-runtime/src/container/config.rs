//! # Runtime Configuration
//!
//! Everything the binary needs, read once at startup. Any bad value is a
//! startup failure.

use ix_03_indexers::IndexerConfig;
use ix_telemetry::TelemetryConfig;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown storage backend {value:?} (expected memory or rocksdb)")]
    UnknownBackend { value: String },

    #[error("storage backend {backend} requires building with the `{backend}` feature")]
    BackendUnavailable { backend: StorageBackend },

    #[error(transparent)]
    Indexer(#[from] ix_03_indexers::ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Memory,
    RocksDb,
}

impl StorageBackend {
    pub fn is_available(self) -> bool {
        match self {
            StorageBackend::Memory => true,
            StorageBackend::RocksDb => cfg!(feature = "rocksdb"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "rocksdb" => Ok(StorageBackend::RocksDb),
            _ => Err(ConfigError::UnknownBackend {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::RocksDb => write!(f, "rocksdb"),
        }
    }
}

/// Where block events come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedSource {
    #[default]
    Stdin,
    File(PathBuf),
}

impl FeedSource {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "-" => FeedSource::Stdin,
            path => FeedSource::File(PathBuf::from(path)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub backend: StorageBackend,
    /// RocksDB directory; unused by the in-memory backend.
    pub data_dir: PathBuf,
    pub feed: FeedSource,
    pub indexer: IndexerConfig,
    pub telemetry: TelemetryConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: PathBuf::from("./data/ix"),
            feed: FeedSource::default(),
            indexer: IndexerConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// # Environment Variables
    ///
    /// - `IX_STORAGE_BACKEND`: memory | rocksdb (default: memory)
    /// - `IX_DATA_DIR`: RocksDB directory (default: ./data/ix)
    /// - `IX_BLOCK_FEED`: JSON-lines feed path, `-` for stdin (default: stdin)
    ///
    /// Indexer and telemetry settings are read by their own crates.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            indexer: IndexerConfig::from_env()?,
            telemetry: TelemetryConfig::from_env(),
            ..Self::default()
        };

        if let Ok(v) = env::var("IX_STORAGE_BACKEND") {
            config.backend = v.parse()?;
        }
        if let Ok(v) = env::var("IX_DATA_DIR") {
            config.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("IX_BLOCK_FEED") {
            config.feed = FeedSource::parse(&v);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.backend.is_available() {
            return Err(ConfigError::BackendUnavailable {
                backend: self.backend,
            });
        }
        self.indexer.validate()?;
        Ok(())
    }
}
