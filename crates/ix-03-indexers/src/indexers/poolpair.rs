//! Pool pair creation and versioned updates.

use bigdecimal::BigDecimal;
use ix_01_dftx::{DfTx, DfTxRecord, DfTxType, TokenBalance};
use ix_02_model_store::{
    CustomReward, ModelStore, PoolPair, PoolPairCreation, PoolPairToken, PoolPairTokenRef, Token,
};
use shared_types::RawBlock;

use crate::domain::errors::IndexingError;
use crate::indexers::token::{insert_token, remove_token, NewToken};
use crate::ports::indexer::Indexer;

fn require_token(store: &ModelStore, id: u32) -> Result<Token, IndexingError> {
    store
        .get::<Token>(&id.to_string())?
        .ok_or_else(|| IndexingError::TokenNotFound {
            token: id.to_string(),
        })
}

fn to_rewards(balances: &[TokenBalance]) -> Vec<CustomReward> {
    balances
        .iter()
        .map(|b| CustomReward {
            token: b.token,
            amount: b.amount.to_decimal(),
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct CreatePoolPairIndexer;

impl Indexer for CreatePoolPairIndexer {
    fn name(&self) -> &'static str {
        "CreatePoolPair"
    }

    fn opcode(&self) -> Option<DfTxType> {
        Some(DfTxType::CreatePoolPair)
    }

    fn on_transaction(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::CreatePoolPair(msg) = &record.dftx else {
            return Ok(());
        };
        let token_a = require_token(store, msg.token_a)?;
        let token_b = require_token(store, msg.token_b)?;

        let bridge_id = PoolPairToken::make_id(token_a.id, token_b.id);
        if let Some(existing) = store.get::<PoolPairToken>(&bridge_id)? {
            return Err(IndexingError::DuplicatePoolPair {
                token_a: token_a.id,
                token_b: token_b.id,
                pool_pair_id: existing.pool_pair_id,
            });
        }

        let ctx = block.context();
        let txid = record.txid();
        let pair_symbol = if msg.pair_symbol.is_empty() {
            format!("{}-{}", token_a.symbol, token_b.symbol)
        } else {
            msg.pair_symbol.clone()
        };

        let lps = insert_token(
            store,
            NewToken {
                symbol: pair_symbol.clone(),
                name: format!("{}-{} LP Token", token_a.name, token_b.name),
                decimal: 8,
                limit: BigDecimal::from(0).with_scale(8),
                mintable: false,
                tradeable: true,
                is_dat: true,
                is_lps: true,
                finalized: true,
                loan: None,
            },
            record,
            &ctx,
        )?;

        store.put(&PoolPair {
            id: PoolPair::make_id(lps.id, block.height, record.tx_index, record.output_index),
            pool_pair_id: lps.id,
            sort: PoolPair::make_sort(block.height, record.tx_index, record.output_index),
            pair_symbol,
            name: lps.name.clone(),
            token_a: PoolPairTokenRef {
                id: token_a.id,
                symbol: token_a.symbol,
            },
            token_b: PoolPairTokenRef {
                id: token_b.id,
                symbol: token_b.symbol,
            },
            status: msg.status,
            commission: msg.commission.to_decimal(),
            owner_address: msg.owner_address.to_hex(),
            custom_rewards: to_rewards(&msg.custom_rewards),
            creation: PoolPairCreation {
                txid: txid.to_string(),
                height: block.height,
            },
            txid: txid.to_string(),
            block: ctx.clone(),
        })?;
        store.put(&PoolPairToken {
            id: bridge_id,
            pool_pair_id: lps.id,
            txid: txid.to_string(),
            block: ctx,
        })?;

        tracing::debug!(pool_pair_id = lps.id, symbol = %lps.symbol, "[ix-03] pool pair created");
        Ok(())
    }

    fn on_transaction_undo(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::CreatePoolPair(msg) = &record.dftx else {
            return Ok(());
        };
        store.delete::<PoolPairToken>(&PoolPairToken::make_id(msg.token_a, msg.token_b))?;

        let id = remove_token(store, record)?;
        store.delete::<PoolPair>(&PoolPair::make_id(
            id,
            block.height,
            record.tx_index,
            record.output_index,
        ))?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct UpdatePoolPairIndexer;

impl Indexer for UpdatePoolPairIndexer {
    fn name(&self) -> &'static str {
        "UpdatePoolPair"
    }

    fn opcode(&self) -> Option<DfTxType> {
        Some(DfTxType::UpdatePoolPair)
    }

    fn on_transaction(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::UpdatePoolPair(msg) = &record.dftx else {
            return Ok(());
        };
        let previous = store
            .latest::<PoolPair>(&msg.pool_id.to_string())?
            .ok_or(IndexingError::PoolPairIdNotFound {
                pool_pair_id: msg.pool_id,
            })?;

        let owner_address = if msg.owner_address.is_empty() {
            previous.owner_address.clone()
        } else {
            msg.owner_address.to_hex()
        };
        let custom_rewards = if msg.custom_rewards.is_empty() {
            previous.custom_rewards.clone()
        } else {
            to_rewards(&msg.custom_rewards)
        };

        store.put(&PoolPair {
            id: PoolPair::make_id(msg.pool_id, block.height, record.tx_index, record.output_index),
            sort: PoolPair::make_sort(block.height, record.tx_index, record.output_index),
            status: msg.status,
            commission: msg.commission.to_decimal(),
            owner_address,
            custom_rewards,
            txid: record.txid().to_string(),
            block: block.context(),
            ..previous
        })?;
        Ok(())
    }

    fn on_transaction_undo(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::UpdatePoolPair(msg) = &record.dftx else {
            return Ok(());
        };
        store.delete::<PoolPair>(&PoolPair::make_id(
            msg.pool_id,
            block.height,
            record.tx_index,
            record.output_index,
        ))?;
        Ok(())
    }
}
