//! # Dispatcher
//!
//! Runs a block through the registry: block start, records, block end.
//! Invalidation replays the same calls in exactly the opposite order.
//!
//! Each call runs inside a store journal. Any hook error aborts the call and
//! the journal is rolled back, so a failed call leaves the store as it was
//! and the whole block can simply be retried.

use ix_01_dftx::{DfTxExtractor, DfTxRecord};
use ix_02_model_store::{ModelStore, RawBlockRecord};
use shared_types::RawBlock;

use crate::config::IndexerConfig;
use crate::domain::errors::IndexingError;
use crate::ports::indexer::Indexer;
use crate::service::registry::IndexerRegistry;

pub struct Dispatcher {
    registry: IndexerRegistry,
    extractor: DfTxExtractor,
}

impl Dispatcher {
    pub fn new(registry: IndexerRegistry, extractor: DfTxExtractor) -> Self {
        Self { registry, extractor }
    }

    pub fn with_defaults(config: &IndexerConfig) -> Self {
        Self::new(IndexerRegistry::with_defaults(config), DfTxExtractor::default())
    }

    pub fn registry(&self) -> &IndexerRegistry {
        &self.registry
    }

    /// Height and hash of the most recently indexed block.
    pub fn tip(store: &ModelStore) -> Result<Option<(u32, String)>, IndexingError> {
        Ok(store
            .latest::<RawBlockRecord>(RawBlockRecord::PARTITION)?
            .map(|record| (record.block.height, record.block.hash)))
    }

    pub fn index(&self, store: &mut ModelStore, block: &RawBlock) -> Result<(), IndexingError> {
        let span = tracing::info_span!("index_block", height = block.height, hash = %block.hash);
        let _enter = span.enter();
        journaled(store, |store| self.apply(store, block))
    }

    fn apply(&self, store: &mut ModelStore, block: &RawBlock) -> Result<(), IndexingError> {
        store.put(&RawBlockRecord {
            block: block.clone(),
        })?;

        for indexer in self.registry.indexers() {
            guard(indexer.as_ref(), "block_start", indexer.on_block_start(store, block))?;
        }

        let records = self.extractor.extract(block);
        for record in &records {
            for indexer in self.registry.for_opcode(record.opcode()) {
                guard(indexer, "transaction", indexer.on_transaction(store, block, record))
                    .map_err(|e| log_record(e, record))?;
            }
        }

        for indexer in self.registry.indexers() {
            guard(indexer.as_ref(), "block_end", indexer.on_block_end(store, block))?;
        }

        tracing::info!(records = records.len(), "[ix-03] block indexed");
        Ok(())
    }

    pub fn invalidate(&self, store: &mut ModelStore, hash: &str) -> Result<(), IndexingError> {
        let block = store
            .get::<RawBlockRecord>(hash)?
            .ok_or_else(|| IndexingError::UnrecordedBlock {
                hash: hash.to_string(),
            })?
            .block;

        let span = tracing::info_span!("invalidate_block", height = block.height, hash = %block.hash);
        let _enter = span.enter();

        match Self::tip(store)? {
            Some((_, tip)) if tip == block.hash => {}
            Some((_, tip)) => {
                return Err(IndexingError::NotTip {
                    hash: block.hash,
                    tip,
                })
            }
            None => {
                return Err(IndexingError::UnrecordedBlock { hash: block.hash });
            }
        }

        journaled(store, |store| self.revert(store, &block))
    }

    fn revert(&self, store: &mut ModelStore, block: &RawBlock) -> Result<(), IndexingError> {
        for indexer in self.registry.indexers().iter().rev() {
            guard(indexer.as_ref(), "block_end_undo", indexer.on_block_end_undo(store, block))?;
        }

        let records = self.extractor.extract(block);
        for record in records.iter().rev() {
            for indexer in self.registry.for_opcode(record.opcode()).rev() {
                guard(indexer, "transaction_undo", indexer.on_transaction_undo(store, block, record))
                    .map_err(|e| log_record(e, record))?;
            }
        }

        for indexer in self.registry.indexers().iter().rev() {
            guard(
                indexer.as_ref(),
                "block_start_undo",
                indexer.on_block_start_undo(store, block),
            )?;
        }

        store.delete::<RawBlockRecord>(&block.hash)?;
        tracing::info!(records = records.len(), "[ix-03] block invalidated");
        Ok(())
    }
}

/// Run `call` in a journal; roll back everything it wrote if it fails.
fn journaled(
    store: &mut ModelStore,
    call: impl FnOnce(&mut ModelStore) -> Result<(), IndexingError>,
) -> Result<(), IndexingError> {
    store.begin_journal();
    match call(store) {
        Ok(()) => {
            store.commit_journal();
            Ok(())
        }
        Err(error) => {
            match store.rollback_journal() {
                Ok(reverted) => tracing::warn!(reverted, "[ix-03] block call rolled back"),
                Err(rollback) => {
                    tracing::error!(%rollback, "[ix-03] rollback failed, store is inconsistent")
                }
            }
            Err(error)
        }
    }
}

fn guard(indexer: &dyn Indexer, phase: &'static str, result: Result<(), IndexingError>) -> Result<(), IndexingError> {
    result.inspect_err(|error| {
        tracing::error!(indexer = indexer.name(), phase, %error, "[ix-03] indexer failed");
    })
}

fn log_record(error: IndexingError, record: &DfTxRecord<'_>) -> IndexingError {
    tracing::error!(
        txid = %record.txid(),
        tx_index = record.tx_index,
        output_index = record.output_index,
        dftx_type = %record.opcode(),
        "[ix-03] record aborted block"
    );
    error
}
