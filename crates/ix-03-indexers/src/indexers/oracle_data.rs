//! Oracle price reports, the per-transaction aggregate and the ticker.

use ix_01_dftx::{DfTx, DfTxRecord, DfTxType, SetOracleData};
use ix_02_model_store::{
    keys, ModelStore, Oracle, OraclePriceAggregated, OraclePriceFeed, PriceTicker,
};
use shared_types::RawBlock;

use crate::algorithms::oracle_math;
use crate::config::IndexerConfig;
use crate::domain::errors::IndexingError;
use crate::ports::indexer::Indexer;

pub struct SetOracleDataIndexer {
    feed_freshness_secs: i64,
}

impl SetOracleDataIndexer {
    pub fn new(config: &IndexerConfig) -> Self {
        Self {
            feed_freshness_secs: config.feed_freshness_secs,
        }
    }

    /// Point the ticker at the latest aggregate left for the pair, if any.
    fn rederive_ticker(store: &mut ModelStore, pair_key: &str) -> Result<(), IndexingError> {
        match store.latest::<OraclePriceAggregated>(pair_key)? {
            Some(price) => store.put(&PriceTicker {
                id: pair_key.to_string(),
                price,
            })?,
            None => store.delete::<PriceTicker>(pair_key)?,
        }
        Ok(())
    }
}

impl Indexer for SetOracleDataIndexer {
    fn name(&self) -> &'static str {
        "SetOracleData"
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
        let DfTx::SetOracleData(msg) = &record.dftx else {
            return Ok(());
        };
        let oracle_id = msg.oracle_id.to_hex();
        if !store.contains::<Oracle>(&oracle_id)? {
            return Err(IndexingError::OracleNotFound { oracle_id });
        }
        let ctx = block.context();
        let txid = record.txid();
        let outpoint = record.outpoint();

        for (pair, amount) in msg.observations() {
            let key = pair.key();
            store.put(&OraclePriceFeed {
                id: OraclePriceFeed::make_id(&key, &oracle_id, &outpoint),
                sort: keys::height_txno_vout(block.height, record.tx_index, record.output_index),
                key,
                token: pair.token,
                currency: pair.currency,
                oracle_id: oracle_id.clone(),
                txid: txid.to_string(),
                time: msg.timestamp,
                amount: amount.to_decimal(),
                block: ctx.clone(),
            })?;
        }

        for pair in msg.pairs() {
            let key = pair.key();
            let Some(aggregated) =
                oracle_math::aggregate_pair(store, &key, block.time, self.feed_freshness_secs)?
            else {
                continue;
            };

            let price = OraclePriceAggregated {
                id: OraclePriceAggregated::make_id(
                    &key,
                    block.height,
                    record.tx_index,
                    record.output_index,
                ),
                sort: OraclePriceAggregated::make_sort(
                    block.height,
                    record.tx_index,
                    record.output_index,
                ),
                key: key.clone(),
                token: pair.token,
                currency: pair.currency,
                txid: txid.to_string(),
                aggregated,
                block: ctx.clone(),
            };
            tracing::debug!(
                pair = %key,
                amount = %price.aggregated.amount,
                active = price.aggregated.oracles.active,
                total = price.aggregated.oracles.total,
                "[ix-03] oracle price aggregated"
            );
            store.put(&price)?;
            store.put(&PriceTicker { id: key, price })?;
        }
        Ok(())
    }

    fn on_transaction_undo(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::SetOracleData(msg) = &record.dftx else {
            return Ok(());
        };

        for pair in msg.pairs().iter().rev() {
            let key = pair.key();
            let id = OraclePriceAggregated::make_id(
                &key,
                block.height,
                record.tx_index,
                record.output_index,
            );
            store.delete::<OraclePriceAggregated>(&id)?;
            Self::rederive_ticker(store, &key)?;
        }

        delete_feeds(store, msg, &record.outpoint())
    }
}

fn delete_feeds(
    store: &mut ModelStore,
    msg: &SetOracleData,
    outpoint: &str,
) -> Result<(), IndexingError> {
    let oracle_id = msg.oracle_id.to_hex();
    let observations: Vec<_> = msg.observations().collect();
    for (pair, _) in observations.iter().rev() {
        store.delete::<OraclePriceFeed>(&OraclePriceFeed::make_id(&pair.key(), &oracle_id, outpoint))?;
    }
    Ok(())
}
