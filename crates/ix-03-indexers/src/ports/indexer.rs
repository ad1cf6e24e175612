//! # Indexer Port
//!
//! Every hook has an `_undo` mirror that must exactly reverse it. Hooks only
//! touch the store they are handed.

use ix_01_dftx::{DfTxRecord, DfTxType};
use ix_02_model_store::ModelStore;
use shared_types::RawBlock;

use crate::domain::errors::IndexingError;

pub trait Indexer: Send + Sync {
    /// Stable name for logs.
    fn name(&self) -> &'static str;

    /// Records this indexer receives; `None` for block-level indexers.
    fn opcode(&self) -> Option<DfTxType> {
        None
    }

    fn on_block_start(&self, _store: &mut ModelStore, _block: &RawBlock) -> Result<(), IndexingError> {
        Ok(())
    }

    fn on_block_start_undo(
        &self,
        _store: &mut ModelStore,
        _block: &RawBlock,
    ) -> Result<(), IndexingError> {
        Ok(())
    }

    fn on_transaction(
        &self,
        _store: &mut ModelStore,
        _block: &RawBlock,
        _record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        Ok(())
    }

    fn on_transaction_undo(
        &self,
        _store: &mut ModelStore,
        _block: &RawBlock,
        _record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        Ok(())
    }

    fn on_block_end(&self, _store: &mut ModelStore, _block: &RawBlock) -> Result<(), IndexingError> {
        Ok(())
    }

    fn on_block_end_undo(
        &self,
        _store: &mut ModelStore,
        _block: &RawBlock,
    ) -> Result<(), IndexingError> {
        Ok(())
    }
}
