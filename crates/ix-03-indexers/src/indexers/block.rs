use ix_02_model_store::{Block, ModelStore};
use shared_types::RawBlock;

use crate::domain::errors::IndexingError;
use crate::ports::indexer::Indexer;

/// Block header projection; the latest row is the indexed tip.
#[derive(Debug, Default)]
pub struct BlockIndexer;

impl Indexer for BlockIndexer {
    fn name(&self) -> &'static str {
        "Block"
    }

    fn on_block_start(&self, store: &mut ModelStore, block: &RawBlock) -> Result<(), IndexingError> {
        store.put(&Block::from_raw(block))?;
        Ok(())
    }

    fn on_block_start_undo(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
    ) -> Result<(), IndexingError> {
        store.delete::<Block>(&block.hash)?;
        Ok(())
    }
}
