//! Oracle lifecycle: appoint, update, remove.
//!
//! The snapshot and its token-currency rows always mirror the latest history
//! entry, so undo restores them from whichever entry is latest once the
//! undone one is gone.

use ix_01_dftx::{CurrencyPair, DfTx, DfTxRecord, DfTxType};
use ix_02_model_store::{
    ModelStore, Oracle, OracleEvent, OracleHistory, OracleTokenCurrency, PriceFeed,
};
use shared_types::{BlockContext, RawBlock};

use crate::domain::errors::IndexingError;
use crate::ports::indexer::Indexer;

fn to_feeds(pairs: &[CurrencyPair]) -> Vec<PriceFeed> {
    pairs
        .iter()
        .map(|pair| PriceFeed {
            token: pair.token.clone(),
            currency: pair.currency.clone(),
        })
        .collect()
}

fn put_token_currencies(
    store: &mut ModelStore,
    oracle_id: &str,
    feeds: &[PriceFeed],
    weightage: u8,
    block: &BlockContext,
) -> Result<(), IndexingError> {
    for feed in feeds {
        store.put(&OracleTokenCurrency::new(feed, oracle_id, weightage, block))?;
    }
    Ok(())
}

fn delete_token_currencies(
    store: &mut ModelStore,
    oracle_id: &str,
    feeds: &[PriceFeed],
) -> Result<(), IndexingError> {
    for feed in feeds {
        store.delete::<OracleTokenCurrency>(&OracleTokenCurrency::make_id(feed, oracle_id))?;
    }
    Ok(())
}

fn require_oracle(store: &ModelStore, oracle_id: &str) -> Result<Oracle, IndexingError> {
    store
        .get::<Oracle>(oracle_id)?
        .ok_or_else(|| IndexingError::OracleNotFound {
            oracle_id: oracle_id.to_string(),
        })
}

/// Drop the history entry written by `record` and return the entry before it.
fn pop_history(
    store: &mut ModelStore,
    oracle_id: &str,
    block: &RawBlock,
    record: &DfTxRecord<'_>,
) -> Result<OracleHistory, IndexingError> {
    let id = OracleHistory::make_id(oracle_id, block.height, &record.outpoint());
    store.delete::<OracleHistory>(&id)?;
    store
        .latest::<OracleHistory>(oracle_id)?
        .ok_or_else(|| IndexingError::OracleHistoryMissing {
            oracle_id: oracle_id.to_string(),
        })
}

#[derive(Debug, Default)]
pub struct AppointOracleIndexer;

impl Indexer for AppointOracleIndexer {
    fn name(&self) -> &'static str {
        "AppointOracle"
    }

    fn opcode(&self) -> Option<DfTxType> {
        Some(DfTxType::AppointOracle)
    }

    fn on_transaction(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::AppointOracle(msg) = &record.dftx else {
            return Ok(());
        };
        let oracle_id = record.txid();
        if store.contains::<Oracle>(oracle_id)? {
            return Err(IndexingError::OracleExists {
                oracle_id: oracle_id.to_string(),
            });
        }
        let ctx = block.context();
        let oracle = Oracle {
            id: oracle_id.to_string(),
            owner_address: msg.script.to_hex(),
            weightage: msg.weightage,
            price_feeds: to_feeds(&msg.price_feeds),
            block: ctx.clone(),
        };

        store.put(&oracle)?;
        store.put(&OracleHistory::new(
            &oracle,
            OracleEvent::Appointed,
            record.txid(),
            (record.tx_index, record.output_index),
            &ctx,
        ))?;
        put_token_currencies(store, &oracle.id, &oracle.price_feeds, oracle.weightage, &ctx)?;

        tracing::debug!(oracle_id = %oracle.id, feeds = oracle.price_feeds.len(), "[ix-03] oracle appointed");
        Ok(())
    }

    fn on_transaction_undo(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::AppointOracle(msg) = &record.dftx else {
            return Ok(());
        };
        let oracle_id = record.txid();

        delete_token_currencies(store, oracle_id, &to_feeds(&msg.price_feeds))?;
        store.delete::<OracleHistory>(&OracleHistory::make_id(
            oracle_id,
            block.height,
            &record.outpoint(),
        ))?;
        store.delete::<Oracle>(oracle_id)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct UpdateOracleIndexer;

impl Indexer for UpdateOracleIndexer {
    fn name(&self) -> &'static str {
        "UpdateOracle"
    }

    fn opcode(&self) -> Option<DfTxType> {
        Some(DfTxType::UpdateOracle)
    }

    fn on_transaction(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::UpdateOracle(msg) = &record.dftx else {
            return Ok(());
        };
        let oracle_id = msg.oracle_id.to_hex();
        let previous = require_oracle(store, &oracle_id)?;
        let ctx = block.context();

        let oracle = Oracle {
            id: oracle_id,
            owner_address: msg.script.to_hex(),
            weightage: msg.weightage,
            price_feeds: to_feeds(&msg.price_feeds),
            block: ctx.clone(),
        };
        let dropped: Vec<PriceFeed> = previous
            .price_feeds
            .iter()
            .filter(|feed| !oracle.price_feeds.contains(feed))
            .cloned()
            .collect();

        store.put(&oracle)?;
        store.put(&OracleHistory::new(
            &oracle,
            OracleEvent::Updated,
            record.txid(),
            (record.tx_index, record.output_index),
            &ctx,
        ))?;
        delete_token_currencies(store, &oracle.id, &dropped)?;
        put_token_currencies(store, &oracle.id, &oracle.price_feeds, oracle.weightage, &ctx)?;
        Ok(())
    }

    fn on_transaction_undo(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::UpdateOracle(msg) = &record.dftx else {
            return Ok(());
        };
        let oracle_id = msg.oracle_id.to_hex();

        delete_token_currencies(store, &oracle_id, &to_feeds(&msg.price_feeds))?;
        let previous = pop_history(store, &oracle_id, block, record)?;
        let restored = previous.to_oracle();
        put_token_currencies(
            store,
            &restored.id,
            &restored.price_feeds,
            restored.weightage,
            &restored.block,
        )?;
        store.put(&restored)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RemoveOracleIndexer;

impl Indexer for RemoveOracleIndexer {
    fn name(&self) -> &'static str {
        "RemoveOracle"
    }

    fn opcode(&self) -> Option<DfTxType> {
        Some(DfTxType::RemoveOracle)
    }

    fn on_transaction(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::RemoveOracle(msg) = &record.dftx else {
            return Ok(());
        };
        let oracle_id = msg.oracle_id.to_hex();
        let oracle = require_oracle(store, &oracle_id)?;

        delete_token_currencies(store, &oracle_id, &oracle.price_feeds)?;
        store.delete::<Oracle>(&oracle_id)?;
        store.put(&OracleHistory::new(
            &oracle,
            OracleEvent::Removed,
            record.txid(),
            (record.tx_index, record.output_index),
            &block.context(),
        ))?;

        tracing::debug!(oracle_id = %oracle_id, "[ix-03] oracle removed");
        Ok(())
    }

    fn on_transaction_undo(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::RemoveOracle(msg) = &record.dftx else {
            return Ok(());
        };
        let oracle_id = msg.oracle_id.to_hex();

        let previous = pop_history(store, &oracle_id, block, record)?;
        let restored = previous.to_oracle();
        store.put(&restored)?;
        put_token_currencies(
            store,
            &restored.id,
            &restored.price_feeds,
            restored.weightage,
            &restored.block,
        )?;
        Ok(())
    }
}
