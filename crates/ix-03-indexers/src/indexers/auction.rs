use ix_01_dftx::{DfTx, DfTxRecord, DfTxType};
use ix_02_model_store::{ModelStore, VaultAuctionBatchHistory};
use shared_types::RawBlock;

use crate::domain::errors::IndexingError;
use crate::ports::indexer::Indexer;

/// Bid history per (vault, auction batch).
#[derive(Debug, Default)]
pub struct PlaceAuctionBidIndexer;

impl Indexer for PlaceAuctionBidIndexer {
    fn name(&self) -> &'static str {
        "PlaceAuctionBid"
    }

    fn opcode(&self) -> Option<DfTxType> {
        Some(DfTxType::PlaceAuctionBid)
    }

    fn on_transaction(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::PlaceAuctionBid(bid) = &record.dftx else {
            return Ok(());
        };
        let vault_id = bid.vault_id.to_hex();
        let txid = record.txid();

        store.put(&VaultAuctionBatchHistory {
            id: VaultAuctionBatchHistory::make_id(&vault_id, bid.index, &record.outpoint()),
            key: VaultAuctionBatchHistory::partition(&vault_id, bid.index),
            sort: VaultAuctionBatchHistory::make_sort(block.height, txid, record.output_index),
            vault_id,
            index: bid.index,
            from: bid.from.to_hex(),
            token_id: bid.token_amount.token,
            amount: bid.token_amount.amount.to_decimal(),
            txid: txid.to_string(),
            block: block.context(),
        })?;
        Ok(())
    }

    fn on_transaction_undo(
        &self,
        store: &mut ModelStore,
        _block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::PlaceAuctionBid(bid) = &record.dftx else {
            return Ok(());
        };
        let id =
            VaultAuctionBatchHistory::make_id(&bid.vault_id.to_hex(), bid.index, &record.outpoint());
        store.delete::<VaultAuctionBatchHistory>(&id)?;
        Ok(())
    }
}
