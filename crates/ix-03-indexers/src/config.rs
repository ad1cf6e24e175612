//! Indexer configuration from environment variables.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("{0}")]
    Invalid(String),
}

/// Tunables of the aggregation and price indexers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Swap volume bucket widths in seconds.
    pub swap_intervals: Vec<u32>,

    /// Oracle price bucket widths in seconds.
    pub price_intervals: Vec<u32>,

    /// Active/next prices settle every this many blocks.
    pub active_price_block_interval: u32,

    /// Max distance in seconds between a feed (or aggregate) and block time.
    pub feed_freshness_secs: i64,

    /// Minimum active oracles for an aggregate to be staged as next price.
    pub min_active_oracles: u32,

    /// Max relative move between active and next for a live price.
    pub deviation_threshold: BigDecimal,

    /// Keep buckets whose last contribution was invalidated as explicit
    /// zero rows. `false` deletes them instead.
    pub retain_empty_buckets: bool,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            swap_intervals: vec![3_600, 86_400],
            price_intervals: vec![900, 3_600, 86_400],
            active_price_block_interval: 120,
            feed_freshness_secs: 3_600,
            min_active_oracles: 1,
            deviation_threshold: BigDecimal::new(3.into(), 1),
            retain_empty_buckets: true,
        }
    }
}

impl IndexerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `IX_SWAP_INTERVALS`: comma separated seconds (default: 3600,86400)
    /// - `IX_PRICE_INTERVALS`: comma separated seconds (default: 900,3600,86400)
    /// - `IX_ACTIVE_PRICE_BLOCK_INTERVAL`: blocks (default: 120)
    /// - `IX_FEED_FRESHNESS_SECS`: seconds (default: 3600)
    /// - `IX_MIN_ACTIVE_ORACLES`: count (default: 1)
    /// - `IX_DEVIATION_THRESHOLD`: decimal (default: 0.3)
    /// - `IX_RETAIN_EMPTY_BUCKETS`: bool (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(v) = env::var("IX_SWAP_INTERVALS") {
            config.swap_intervals = parse_intervals("IX_SWAP_INTERVALS", &v)?;
        }
        if let Ok(v) = env::var("IX_PRICE_INTERVALS") {
            config.price_intervals = parse_intervals("IX_PRICE_INTERVALS", &v)?;
        }
        if let Ok(v) = env::var("IX_ACTIVE_PRICE_BLOCK_INTERVAL") {
            config.active_price_block_interval = parse("IX_ACTIVE_PRICE_BLOCK_INTERVAL", &v)?;
        }
        if let Ok(v) = env::var("IX_FEED_FRESHNESS_SECS") {
            config.feed_freshness_secs = parse("IX_FEED_FRESHNESS_SECS", &v)?;
        }
        if let Ok(v) = env::var("IX_MIN_ACTIVE_ORACLES") {
            config.min_active_oracles = parse("IX_MIN_ACTIVE_ORACLES", &v)?;
        }
        if let Ok(v) = env::var("IX_DEVIATION_THRESHOLD") {
            config.deviation_threshold = parse("IX_DEVIATION_THRESHOLD", &v)?;
        }
        if let Ok(v) = env::var("IX_RETAIN_EMPTY_BUCKETS") {
            config.retain_empty_buckets = v.to_lowercase() == "true" || v == "1";
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.swap_intervals.contains(&0) || self.price_intervals.contains(&0) {
            return Err(ConfigError::Invalid("bucket intervals must be non-zero".into()));
        }
        if self.active_price_block_interval == 0 {
            return Err(ConfigError::Invalid(
                "active price block interval must be non-zero".into(),
            ));
        }
        if self.feed_freshness_secs <= 0 {
            return Err(ConfigError::Invalid("feed freshness must be positive".into()));
        }
        if self.deviation_threshold <= BigDecimal::from(0) {
            return Err(ConfigError::Invalid("deviation threshold must be positive".into()));
        }
        Ok(())
    }
}

fn parse<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}

fn parse_intervals(var: &'static str, value: &str) -> Result<Vec<u32>, ConfigError> {
    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| parse(var, part))
        .collect()
}
