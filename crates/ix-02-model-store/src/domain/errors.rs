//! # Domain Errors

use thiserror::Error;

/// Failure reported by a key-value backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

/// Failure while mapping entities to and from the store.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Store(#[from] KVStoreError),

    #[error("failed to serialize {table} entity: {source}")]
    Serialize {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to deserialize {table} entity at {key}: {source}")]
    Deserialize {
        table: &'static str,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// An index row points at an id with no primary row.
    #[error("dangling index row {index_key} -> {id}")]
    DanglingIndex { index_key: String, id: String },
}
