//! # Extraction
//!
//! Outputs that fail to decode are reported and skipped; everything else in
//! the block is still extracted, in order, and indexed.

#[cfg(test)]
mod tests {
    use ix_01_dftx::{CollectingSink, DecodeError, DfTxExtractor, DfTxType};
    use ix_02_model_store::{ModelStore, Token};
    use ix_03_indexers::{Dispatcher, IndexerConfig, IndexerRegistry};
    use shared_types::{RawBlock, RawOutput, RawTransaction};
    use std::sync::Arc;

    use crate::fixtures::*;

    /// Valid, unrelated, and three kinds of broken outputs, mixed across
    /// transactions.
    fn noisy_block() -> RawBlock {
        let mut first = dftx_tx(txid(1), &create_token("A", true));
        first.outputs.insert(0, RawOutput::new("6a04deadbeef"));
        first.outputs.push(RawOutput::new("zz"));

        let broken = RawTransaction {
            txid: txid(2),
            outputs: vec![
                RawOutput::new("6a05446654787f"),
                RawOutput::new("6a0a44665478"),
            ],
        };

        let mut last = dftx_tx(txid(3), &create_token("B", true));
        last.outputs.push(RawOutput::new("76a914"));

        BlockBuilder::new(1)
            .transaction(first)
            .transaction(broken)
            .transaction(last)
            .build()
    }

    #[test]
    fn test_failures_reported_and_skipped() {
        let sink = Arc::new(CollectingSink::new());
        let extractor = DfTxExtractor::new(sink.clone());
        let block = noisy_block();

        let records = extractor.extract(&block);
        let positions: Vec<_> = records
            .iter()
            .map(|r| (r.tx_index, r.output_index, r.opcode()))
            .collect();
        assert_eq!(
            positions,
            vec![(0, 1, DfTxType::CreateToken), (2, 0, DfTxType::CreateToken)]
        );

        let failures = sink.failures();
        assert_eq!(failures.len(), 3);
        assert_eq!((failures[0].1, failures[0].2), (0, 2));
        assert!(matches!(failures[0].3, DecodeError::InvalidHex(_)));
        assert_eq!(failures[1].3, DecodeError::UnknownType(0x7f));
        assert!(matches!(failures[2].3, DecodeError::MalformedPush { .. }));
        assert_eq!(failures[2].0, txid(2));
    }

    #[test]
    fn test_block_indexes_despite_bad_outputs() {
        let sink = Arc::new(CollectingSink::new());
        let dispatcher = Dispatcher::new(
            IndexerRegistry::with_defaults(&IndexerConfig::default()),
            DfTxExtractor::new(sink.clone()),
        );
        let mut store = ModelStore::in_memory();
        let block = noisy_block();

        dispatcher.index(&mut store, &block).unwrap();
        assert_eq!(store.get::<Token>("1").unwrap().unwrap().symbol, "A");
        assert_eq!(store.get::<Token>("2").unwrap().unwrap().symbol, "B");
        assert_eq!(sink.len(), 3);

        // Invalidation extracts again and reports again.
        dispatcher.invalidate(&mut store, &block.hash).unwrap();
        assert!(rows(&store).is_empty());
        assert_eq!(sink.len(), 6);
    }
}
