//! # Indexers
//!
//! One module per DfTx family plus the block-level indexers. Each indexer
//! writes only deterministic keys so the whole block can be retried.

mod active_price;
mod auction;
mod block;
mod masternode;
mod oracle;
mod oracle_data;
mod poolpair;
mod price_interval;
mod swap;
mod swap_aggregated;
mod token;

pub use active_price::ActivePriceIndexer;
pub use auction::PlaceAuctionBidIndexer;
pub use block::BlockIndexer;
pub use masternode::{BlockMintedIndexer, CreateMasternodeIndexer, ResignMasternodeIndexer};
pub use oracle::{AppointOracleIndexer, RemoveOracleIndexer, UpdateOracleIndexer};
pub use oracle_data::SetOracleDataIndexer;
pub use poolpair::{CreatePoolPairIndexer, UpdatePoolPairIndexer};
pub use price_interval::OraclePriceIntervalIndexer;
pub use swap::{resolve_hops, CompositeSwapIndexer, PoolSwapIndexer, SwapHop};
pub use swap_aggregated::SwapAggregatedIndexer;
pub use token::{CreateTokenIndexer, SetLoanTokenIndexer};
