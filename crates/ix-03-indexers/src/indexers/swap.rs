//! Swap events, one per pool hop.

use ix_01_dftx::{DfTx, DfTxRecord, DfTxType, PoolSwap as PoolSwapMsg};
use ix_02_model_store::{ModelStore, PoolPair, PoolPairToken, PoolSwap};
use shared_types::RawBlock;

use crate::domain::errors::IndexingError;
use crate::ports::indexer::Indexer;

/// One pool traversed by a swap and the token entering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapHop {
    pub pool_pair_id: u32,
    pub from_token_id: u32,
}

/// Split a swap record into its swap payload and explicit pool path.
pub(crate) fn swap_parts<'r>(record: &'r DfTxRecord<'_>) -> Option<(&'r PoolSwapMsg, &'r [u32])> {
    match &record.dftx {
        DfTx::PoolSwap(swap) => Some((swap, &[][..])),
        DfTx::CompositeSwap(composite) => Some((&composite.pool_swap, composite.pools.as_slice())),
        _ => None,
    }
}

/// Ordered hops of a swap.
///
/// Without an explicit path the swap takes the single pool bridging its two
/// tokens. With one, every pool must contain the token entering it, and the
/// token leaving is the pool's other side.
pub fn resolve_hops(
    store: &ModelStore,
    swap: &PoolSwapMsg,
    pools: &[u32],
) -> Result<Vec<SwapHop>, IndexingError> {
    if pools.is_empty() {
        let bridge = store
            .get::<PoolPairToken>(&PoolPairToken::make_id(swap.from_token_id, swap.to_token_id))?
            .ok_or(IndexingError::PoolPairNotFound {
                token_a: swap.from_token_id,
                token_b: swap.to_token_id,
            })?;
        return Ok(vec![SwapHop {
            pool_pair_id: bridge.pool_pair_id,
            from_token_id: swap.from_token_id,
        }]);
    }

    let mut hops = Vec::with_capacity(pools.len());
    let mut current = swap.from_token_id;
    for (hop, pool_pair_id) in pools.iter().copied().enumerate() {
        let pool = store
            .latest::<PoolPair>(&pool_pair_id.to_string())?
            .ok_or(IndexingError::PoolPairIdNotFound { pool_pair_id })?;
        let next = pool.other_side(current).ok_or(IndexingError::InvalidSwapPath {
            hop,
            pool_pair_id,
            token_id: current,
        })?;
        hops.push(SwapHop {
            pool_pair_id,
            from_token_id: current,
        });
        current = next;
    }
    Ok(hops)
}

fn record_hops(
    store: &mut ModelStore,
    block: &RawBlock,
    record: &DfTxRecord<'_>,
) -> Result<(), IndexingError> {
    let Some((swap, pools)) = swap_parts(record) else {
        return Ok(());
    };
    let hops = resolve_hops(store, swap, pools)?;
    let ctx = block.context();
    let txid = record.txid();
    let outpoint = record.outpoint();

    for (i, hop) in hops.iter().enumerate() {
        store.put(&PoolSwap {
            id: PoolSwap::make_id(hop.pool_pair_id, &outpoint, i),
            txid: txid.to_string(),
            txno: record.tx_index,
            vout: record.output_index,
            hop: i,
            pool_pair_id: hop.pool_pair_id,
            sort: PoolSwap::make_sort(block.height, record.tx_index, record.output_index, i),
            from_token_id: hop.from_token_id,
            from_amount: swap.from_amount.to_decimal(),
            block: ctx.clone(),
        })?;
    }
    tracing::debug!(outpoint = %outpoint, hops = hops.len(), "[ix-03] swap recorded");
    Ok(())
}

fn remove_hops(store: &mut ModelStore, record: &DfTxRecord<'_>) -> Result<(), IndexingError> {
    let Some((swap, pools)) = swap_parts(record) else {
        return Ok(());
    };
    let hops = resolve_hops(store, swap, pools)?;
    let outpoint = record.outpoint();
    for (i, hop) in hops.iter().enumerate().rev() {
        store.delete::<PoolSwap>(&PoolSwap::make_id(hop.pool_pair_id, &outpoint, i))?;
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct PoolSwapIndexer;

impl Indexer for PoolSwapIndexer {
    fn name(&self) -> &'static str {
        "PoolSwap"
    }

    fn opcode(&self) -> Option<DfTxType> {
        Some(DfTxType::PoolSwap)
    }

    fn on_transaction(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        record_hops(store, block, record)
    }

    fn on_transaction_undo(
        &self,
        store: &mut ModelStore,
        _block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        remove_hops(store, record)
    }
}

#[derive(Debug, Default)]
pub struct CompositeSwapIndexer;

impl Indexer for CompositeSwapIndexer {
    fn name(&self) -> &'static str {
        "CompositeSwap"
    }

    fn opcode(&self) -> Option<DfTxType> {
        Some(DfTxType::CompositeSwap)
    }

    fn on_transaction(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        record_hops(store, block, record)
    }

    fn on_transaction_undo(
        &self,
        store: &mut ModelStore,
        _block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        remove_hops(store, record)
    }
}
