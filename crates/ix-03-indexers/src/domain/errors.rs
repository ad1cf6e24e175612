//! # Domain Errors
//!
//! Any of these aborts the whole index/invalidate call for the block.

use ix_02_model_store::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexingError {
    #[error("oracle {oracle_id} not found")]
    OracleNotFound { oracle_id: String },

    /// Oracle ids are appointing txids, so a transaction appoints at most one.
    #[error("oracle {oracle_id} already appointed")]
    OracleExists { oracle_id: String },

    #[error("oracle {oracle_id} has no history to restore from")]
    OracleHistoryMissing { oracle_id: String },

    #[error("pool pair not found for tokens {token_a}/{token_b}")]
    PoolPairNotFound { token_a: u32, token_b: u32 },

    #[error("pool pair {pool_pair_id} not found")]
    PoolPairIdNotFound { pool_pair_id: u32 },

    #[error("pool pair for tokens {token_a}/{token_b} already exists as {pool_pair_id}")]
    DuplicatePoolPair {
        token_a: u32,
        token_b: u32,
        pool_pair_id: u32,
    },

    #[error("swap path hop {hop} through pool {pool_pair_id} does not contain token {token_id}")]
    InvalidSwapPath {
        hop: usize,
        pool_pair_id: u32,
        token_id: u32,
    },

    #[error("swap event {id} missing")]
    SwapEventMissing { id: String },

    #[error("token {token} not found")]
    TokenNotFound { token: String },

    #[error("token id space exhausted")]
    TokenIdExhausted,

    #[error("masternode {id} not found")]
    MasternodeNotFound { id: String },

    #[error("masternode {id} already registered")]
    MasternodeExists { id: String },

    #[error("masternode {id} already resigned")]
    AlreadyResigned { id: String },

    #[error("aggregate bucket {id} missing or lacks dimension {dimension}")]
    BucketMissing { id: String, dimension: String },

    /// Invalidate was asked for a block this indexer never recorded.
    #[error("block {hash} was never indexed")]
    UnrecordedBlock { hash: String },

    /// Only the tip may be invalidated.
    #[error("block {hash} is not the indexed tip {tip}")]
    NotTip { hash: String, tip: String },

    #[error(transparent)]
    Store(#[from] ModelError),
}

impl IndexingError {
    /// Internal-consistency violations; retrying cannot help.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            IndexingError::UnrecordedBlock { .. } | IndexingError::NotTip { .. }
        )
    }
}
