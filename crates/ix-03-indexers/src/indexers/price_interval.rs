//! Oracle aggregates folded into fixed-interval price buckets.
//!
//! Registered after [`super::SetOracleDataIndexer`]: it reads the aggregate
//! rows that indexer wrote for the same transaction, and on undo runs before
//! they are removed.

use bigdecimal::BigDecimal;
use ix_01_dftx::{DfTx, DfTxRecord, DfTxType};
use ix_02_model_store::{ModelStore, OraclePriceAggregated};
use shared_types::RawBlock;

use crate::algorithms::aggregation::{self, Contribution, EmptyBucketPolicy, AMOUNT_SCALE};
use crate::config::IndexerConfig;
use crate::domain::errors::IndexingError;
use crate::ports::indexer::Indexer;

pub struct OraclePriceIntervalIndexer {
    intervals: Vec<u32>,
    policy: EmptyBucketPolicy,
}

impl OraclePriceIntervalIndexer {
    pub fn new(config: &IndexerConfig) -> Self {
        Self {
            intervals: config.price_intervals.clone(),
            policy: EmptyBucketPolicy::from_flag(config.retain_empty_buckets),
        }
    }

    /// `price:{TOKEN-CURRENCY}`
    pub fn series(pair_key: &str) -> String {
        format!("price:{pair_key}")
    }

    fn contributions(price: &OraclePriceAggregated) -> Vec<Contribution> {
        let whole = |n: u32| BigDecimal::from(n).with_scale(AMOUNT_SCALE);
        let aggregated = &price.aggregated;
        vec![
            Contribution::new("amount", aggregated.amount.with_scale(AMOUNT_SCALE)),
            Contribution::new("weightage", whole(aggregated.weightage)),
            Contribution::new("oracles.active", whole(aggregated.oracles.active)),
            Contribution::new("oracles.total", whole(aggregated.oracles.total)),
        ]
    }

    /// Aggregates the price indexer produced for this transaction, pair order.
    fn aggregates(
        store: &ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<Vec<OraclePriceAggregated>, IndexingError> {
        let DfTx::SetOracleData(msg) = &record.dftx else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        for pair in msg.pairs() {
            let id = OraclePriceAggregated::make_id(
                &pair.key(),
                block.height,
                record.tx_index,
                record.output_index,
            );
            if let Some(price) = store.get::<OraclePriceAggregated>(&id)? {
                out.push(price);
            }
        }
        Ok(out)
    }
}

impl Indexer for OraclePriceIntervalIndexer {
    fn name(&self) -> &'static str {
        "OraclePriceInterval"
    }

    fn opcode(&self) -> Option<DfTxType> {
        Some(DfTxType::SetOracleData)
    }

    fn on_transaction(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let ctx = block.context();
        for price in Self::aggregates(store, block, record)? {
            let series = Self::series(&price.key);
            let contributions = Self::contributions(&price);
            for interval in &self.intervals {
                aggregation::add(store, &ctx, &series, *interval, block.median_time, &contributions)?;
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
        for price in Self::aggregates(store, block, record)?.iter().rev() {
            let series = Self::series(&price.key);
            let contributions = Self::contributions(price);
            for interval in self.intervals.iter().rev() {
                aggregation::subtract(
                    store,
                    &ctx,
                    &series,
                    *interval,
                    block.median_time,
                    &contributions,
                    self.policy,
                )?;
            }
        }
        Ok(())
    }
}
