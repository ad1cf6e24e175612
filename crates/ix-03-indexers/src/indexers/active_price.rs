//! Active/next price settlement at a fixed block cadence.

use bigdecimal::{BigDecimal, Zero};
use ix_02_model_store::{
    keys, ActivePrice, ModelStore, OraclePriceActive, OraclePriceAggregated, PriceTicker,
};
use shared_types::RawBlock;

use crate::algorithms::oracle_math;
use crate::config::IndexerConfig;
use crate::domain::errors::IndexingError;
use crate::ports::indexer::Indexer;

pub struct ActivePriceIndexer {
    block_interval: u32,
    freshness_secs: i64,
    min_active_oracles: u32,
    deviation_threshold: BigDecimal,
}

impl ActivePriceIndexer {
    pub fn new(config: &IndexerConfig) -> Self {
        Self {
            block_interval: config.active_price_block_interval.max(1),
            freshness_secs: config.feed_freshness_secs,
            min_active_oracles: config.min_active_oracles,
            deviation_threshold: config.deviation_threshold.clone(),
        }
    }

    fn settles(&self, block: &RawBlock) -> bool {
        block.height % self.block_interval == 0
    }

    /// The aggregate may become `next` only while fresh and well supported.
    fn next_price(&self, block: &RawBlock, price: &OraclePriceAggregated) -> Option<ActivePrice> {
        let aggregated = &price.aggregated;
        let fresh = (price.block.time - block.time).abs() <= self.freshness_secs;
        let supported = aggregated.oracles.active >= self.min_active_oracles
            && aggregated.weightage > 0
            && aggregated.amount > BigDecimal::zero();
        (fresh && supported).then(|| ActivePrice::from(aggregated))
    }
}

impl Indexer for ActivePriceIndexer {
    fn name(&self) -> &'static str {
        "ActivePrice"
    }

    fn on_block_end(&self, store: &mut ModelStore, block: &RawBlock) -> Result<(), IndexingError> {
        if !self.settles(block) {
            return Ok(());
        }
        let ctx = block.context();

        for ticker in store.query_all::<PriceTicker>(PriceTicker::PARTITION)? {
            let key = ticker.id;
            let previous = store.latest::<OraclePriceActive>(&key)?;
            let active = previous.and_then(|p| p.next.or(p.active));
            let next = self.next_price(block, &ticker.price);
            let is_live =
                oracle_math::is_live(active.as_ref(), next.as_ref(), &self.deviation_threshold);

            tracing::debug!(pair = %key, height = block.height, is_live, "[ix-03] active price settled");
            store.put(&OraclePriceActive {
                id: OraclePriceActive::make_id(&key, block.height),
                sort: keys::height(block.height),
                key,
                active,
                next,
                is_live,
                block: ctx.clone(),
            })?;
        }
        Ok(())
    }

    fn on_block_end_undo(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
    ) -> Result<(), IndexingError> {
        if !self.settles(block) {
            return Ok(());
        }
        let tickers = store.query_all::<PriceTicker>(PriceTicker::PARTITION)?;
        for ticker in tickers.iter().rev() {
            store.delete::<OraclePriceActive>(&OraclePriceActive::make_id(&ticker.id, block.height))?;
        }
        Ok(())
    }
}
