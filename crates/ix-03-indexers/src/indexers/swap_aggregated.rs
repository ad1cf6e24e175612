//! Swap volume per pool, bucketed by swap interval and keyed by source token.

use ix_01_dftx::{DfTxRecord, DfTxType};
use ix_02_model_store::{ModelStore, PoolSwap};
use shared_types::RawBlock;

use crate::algorithms::aggregation::{self, Contribution, EmptyBucketPolicy, AMOUNT_SCALE};
use crate::config::IndexerConfig;
use crate::domain::errors::IndexingError;
use crate::indexers::swap::{resolve_hops, swap_parts};
use crate::ports::indexer::Indexer;

/// Registered once per swap opcode, right after that opcode's event indexer.
pub struct SwapAggregatedIndexer {
    name: &'static str,
    opcode: DfTxType,
    intervals: Vec<u32>,
    policy: EmptyBucketPolicy,
}

impl SwapAggregatedIndexer {
    pub fn pool_swap(config: &IndexerConfig) -> Self {
        Self::new("PoolSwapAggregated", DfTxType::PoolSwap, config)
    }

    pub fn composite_swap(config: &IndexerConfig) -> Self {
        Self::new("CompositeSwapAggregated", DfTxType::CompositeSwap, config)
    }

    fn new(name: &'static str, opcode: DfTxType, config: &IndexerConfig) -> Self {
        Self {
            name,
            opcode,
            intervals: config.swap_intervals.clone(),
            policy: EmptyBucketPolicy::from_flag(config.retain_empty_buckets),
        }
    }

    /// `pool:{poolPairId}`
    pub fn series(pool_pair_id: u32) -> String {
        format!("pool:{pool_pair_id}")
    }

    /// The swap events the event indexer recorded for this transaction.
    fn events(store: &ModelStore, record: &DfTxRecord<'_>) -> Result<Vec<PoolSwap>, IndexingError> {
        let Some((swap, pools)) = swap_parts(record) else {
            return Ok(Vec::new());
        };
        let outpoint = record.outpoint();
        let mut events = Vec::new();
        for (i, hop) in resolve_hops(store, swap, pools)?.iter().enumerate() {
            let id = PoolSwap::make_id(hop.pool_pair_id, &outpoint, i);
            let event = store
                .get::<PoolSwap>(&id)?
                .ok_or(IndexingError::SwapEventMissing { id })?;
            events.push(event);
        }
        Ok(events)
    }

    fn contribution(event: &PoolSwap) -> [Contribution; 1] {
        [Contribution::new(
            event.from_token_id.to_string(),
            event.from_amount.with_scale(AMOUNT_SCALE),
        )]
    }
}

impl Indexer for SwapAggregatedIndexer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn opcode(&self) -> Option<DfTxType> {
        Some(self.opcode)
    }

    fn on_transaction(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let ctx = block.context();
        for event in Self::events(store, record)? {
            let series = Self::series(event.pool_pair_id);
            for interval in &self.intervals {
                aggregation::add(
                    store,
                    &ctx,
                    &series,
                    *interval,
                    block.median_time,
                    &Self::contribution(&event),
                )?;
            }
        }
        Ok(())
    }

    fn on_transaction_undo(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let ctx = block.context();
        for event in Self::events(store, record)?.iter().rev() {
            let series = Self::series(event.pool_pair_id);
            for interval in self.intervals.iter().rev() {
                aggregation::subtract(
                    store,
                    &ctx,
                    &series,
                    *interval,
                    block.median_time,
                    &Self::contribution(event),
                    self.policy,
                )?;
            }
        }
        Ok(())
    }
}
