//! Masternode registration, resignation and minted-block counts.

use bigdecimal::BigDecimal;
use ix_01_dftx::{DfTx, DfTxRecord, DfTxType};
use ix_02_model_store::{Masternode, MasternodeResign, ModelStore};
use shared_types::RawBlock;

use crate::domain::errors::IndexingError;
use crate::ports::indexer::Indexer;

fn require_masternode(store: &ModelStore, id: &str) -> Result<Masternode, IndexingError> {
    store
        .get::<Masternode>(id)?
        .ok_or_else(|| IndexingError::MasternodeNotFound { id: id.to_string() })
}

#[derive(Debug, Default)]
pub struct CreateMasternodeIndexer;

impl Indexer for CreateMasternodeIndexer {
    fn name(&self) -> &'static str {
        "CreateMasternode"
    }

    fn opcode(&self) -> Option<DfTxType> {
        Some(DfTxType::CreateMasternode)
    }

    fn on_transaction(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::CreateMasternode(msg) = &record.dftx else {
            return Ok(());
        };
        // Output 1 carries the collateral to the owner.
        let collateral_output = record.transaction.outputs.get(1);
        let txid = record.txid();
        if store.contains::<Masternode>(txid)? {
            return Err(IndexingError::MasternodeExists { id: txid.to_string() });
        }

        store.put(&Masternode {
            id: txid.to_string(),
            sort: Masternode::make_sort(block.height, txid),
            owner_address: collateral_output
                .map(|o| o.script_hex.clone())
                .unwrap_or_default(),
            operator_address: hex::encode(msg.operator_pub_key_hash),
            operator_type: msg.operator_type,
            collateral: collateral_output
                .and_then(|o| o.value.clone())
                .unwrap_or_else(|| BigDecimal::from(0))
                .with_scale(8),
            timelock: msg.timelock.unwrap_or(0),
            minted_blocks: 0,
            resign: None,
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
        store.delete::<Masternode>(record.txid())?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ResignMasternodeIndexer;

impl Indexer for ResignMasternodeIndexer {
    fn name(&self) -> &'static str {
        "ResignMasternode"
    }

    fn opcode(&self) -> Option<DfTxType> {
        Some(DfTxType::ResignMasternode)
    }

    fn on_transaction(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::ResignMasternode(msg) = &record.dftx else {
            return Ok(());
        };
        let id = msg.node_id.to_hex();
        let mut masternode = require_masternode(store, &id)?;
        if masternode.resign.is_some() {
            return Err(IndexingError::AlreadyResigned { id });
        }

        masternode.resign = Some(MasternodeResign {
            txid: record.txid().to_string(),
            height: block.height,
        });
        store.put(&masternode)?;
        Ok(())
    }

    fn on_transaction_undo(
        &self,
        store: &mut ModelStore,
        _block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::ResignMasternode(msg) = &record.dftx else {
            return Ok(());
        };
        let mut masternode = require_masternode(store, &msg.node_id.to_hex())?;
        masternode.resign = None;
        store.put(&masternode)?;
        Ok(())
    }
}

/// Credits the block's minter, when it is a known masternode.
#[derive(Debug, Default)]
pub struct BlockMintedIndexer;

impl Indexer for BlockMintedIndexer {
    fn name(&self) -> &'static str {
        "BlockMinted"
    }

    fn on_block_start(&self, store: &mut ModelStore, block: &RawBlock) -> Result<(), IndexingError> {
        let Some(minter) = &block.minter_id else {
            return Ok(());
        };
        if let Some(mut masternode) = store.get::<Masternode>(minter)? {
            masternode.minted_blocks += 1;
            store.put(&masternode)?;
        }
        Ok(())
    }

    fn on_block_start_undo(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
    ) -> Result<(), IndexingError> {
        let Some(minter) = &block.minter_id else {
            return Ok(());
        };
        if let Some(mut masternode) = store.get::<Masternode>(minter)? {
            masternode.minted_blocks = masternode.minted_blocks.saturating_sub(1);
            store.put(&masternode)?;
        }
        Ok(())
    }
}
