//! Cache configuration.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached entries.
    pub capacity: usize,
    /// Time an entry stays valid after insertion.
    pub ttl: Duration,
    /// Concurrent fetches allowed per key.
    pub permits: usize,
    /// How long a miss waits for the key's lock.
    pub lock_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            ttl: Duration::from_secs(60),
            permits: 1,
            lock_timeout: Duration::from_secs(5),
        }
    }
}

impl CacheConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `IX_CACHE_CAPACITY`: entries (default: 10000)
    /// - `IX_CACHE_TTL_SECS`: seconds (default: 60)
    /// - `IX_CACHE_PERMITS`: per-key fetch permits (default: 1)
    /// - `IX_CACHE_LOCK_TIMEOUT_MS`: milliseconds (default: 5000)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |var: &str| env::var(var).ok().and_then(|v| v.parse::<u64>().ok());

        Self {
            capacity: read("IX_CACHE_CAPACITY")
                .map(|v| v as usize)
                .unwrap_or(defaults.capacity)
                .max(1),
            ttl: read("IX_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.ttl),
            permits: read("IX_CACHE_PERMITS")
                .map(|v| v as usize)
                .unwrap_or(defaults.permits)
                .max(1),
            lock_timeout: read("IX_CACHE_LOCK_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.lock_timeout),
        }
    }

    /// Builder-style TTL override.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_permits(mut self, permits: usize) -> Self {
        self.permits = permits.max(1);
        self
    }

    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }
}
