//! # Indexer Registry
//!
//! Registration order is the dispatch contract: forward hooks run in it,
//! undo hooks run against it.

use ix_01_dftx::DfTxType;
use std::collections::HashMap;

use crate::config::IndexerConfig;
use crate::indexers::{
    ActivePriceIndexer, AppointOracleIndexer, BlockIndexer, BlockMintedIndexer,
    CompositeSwapIndexer, CreateMasternodeIndexer, CreatePoolPairIndexer, CreateTokenIndexer,
    OraclePriceIntervalIndexer, PlaceAuctionBidIndexer, PoolSwapIndexer, RemoveOracleIndexer,
    ResignMasternodeIndexer, SetLoanTokenIndexer, SetOracleDataIndexer, SwapAggregatedIndexer,
    UpdateOracleIndexer, UpdatePoolPairIndexer,
};
use crate::ports::indexer::Indexer;

#[derive(Default)]
pub struct RegistryBuilder {
    indexers: Vec<Box<dyn Indexer>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, indexer: impl Indexer + 'static) -> Self {
        self.indexers.push(Box::new(indexer));
        self
    }

    pub fn build(self) -> IndexerRegistry {
        let mut by_opcode: HashMap<DfTxType, Vec<usize>> = HashMap::new();
        for (position, indexer) in self.indexers.iter().enumerate() {
            if let Some(opcode) = indexer.opcode() {
                by_opcode.entry(opcode).or_default().push(position);
            }
        }
        IndexerRegistry {
            indexers: self.indexers,
            by_opcode,
        }
    }
}

/// Immutable, ordered set of indexers with an opcode lookup.
pub struct IndexerRegistry {
    indexers: Vec<Box<dyn Indexer>>,
    by_opcode: HashMap<DfTxType, Vec<usize>>,
}

impl IndexerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Every built-in indexer in its canonical order.
    pub fn with_defaults(config: &IndexerConfig) -> Self {
        Self::builder()
            .register(BlockIndexer)
            .register(BlockMintedIndexer)
            .register(AppointOracleIndexer)
            .register(UpdateOracleIndexer)
            .register(RemoveOracleIndexer)
            .register(SetOracleDataIndexer::new(config))
            .register(OraclePriceIntervalIndexer::new(config))
            .register(ActivePriceIndexer::new(config))
            .register(CreateTokenIndexer)
            .register(SetLoanTokenIndexer)
            .register(CreatePoolPairIndexer)
            .register(UpdatePoolPairIndexer)
            .register(PoolSwapIndexer)
            .register(SwapAggregatedIndexer::pool_swap(config))
            .register(CompositeSwapIndexer)
            .register(SwapAggregatedIndexer::composite_swap(config))
            .register(CreateMasternodeIndexer)
            .register(ResignMasternodeIndexer)
            .register(PlaceAuctionBidIndexer)
            .build()
    }

    pub fn len(&self) -> usize {
        self.indexers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexers.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.indexers.iter().map(|i| i.name()).collect()
    }

    /// All indexers, registration order.
    pub fn indexers(&self) -> &[Box<dyn Indexer>] {
        &self.indexers
    }

    /// Indexers subscribed to `opcode`, registration order.
    pub fn for_opcode(&self, opcode: DfTxType) -> impl DoubleEndedIterator<Item = &dyn Indexer> + '_ {
        self.by_opcode
            .get(&opcode)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |position| self.indexers[*position].as_ref())
    }
}
