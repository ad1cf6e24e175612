use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// The key's lock could not be taken within the configured timeout.
    #[error("timed out waiting for cache lock on {key}")]
    Timeout { key: String },

    #[error("cache lock closed")]
    Closed,

    /// The upstream fetch failed; nothing was cached.
    #[error("fetch failed: {0}")]
    Fetch(String),
}
