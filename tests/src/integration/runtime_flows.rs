//! # Runtime Flows
//!
//! The replay loop over a JSON-lines feed, as the runtime binary drives it.

#[cfg(test)]
mod tests {
    use ix_02_model_store::{ModelStore, Token};
    use ix_03_indexers::IndexingError;
    use ix_runtime::{FeedEvent, FeedReader, ReplayError, ReplaySummary, Replayer};
    use std::io::Cursor;
    use std::sync::atomic::AtomicBool;

    use crate::fixtures::*;

    fn feed(events: &[FeedEvent]) -> String {
        events
            .iter()
            .map(|e| serde_json::to_string(e).unwrap())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn token_block(height: u32, symbol: &str) -> FeedEvent {
        FeedEvent::Index(
            BlockBuilder::new(height)
                .dftx(txid(u64::from(height)), create_token(symbol, true))
                .build(),
        )
    }

    fn replay(replayer: &mut Replayer, text: &str) -> Result<ReplaySummary, ReplayError> {
        replayer.run(FeedReader::new(Cursor::new(text.to_string())), &AtomicBool::new(false))
    }

    #[test]
    fn test_replay_with_reorg() {
        let text = feed(&[
            token_block(1, "A"),
            token_block(2, "B"),
            FeedEvent::Invalidate(block_hash(2)),
            token_block(2, "C"),
            token_block(3, "D"),
        ]);
        let mut replayer = Replayer::new(dispatcher(), ModelStore::in_memory());

        let summary = replay(&mut replayer, &text).unwrap();
        assert_eq!(
            summary,
            ReplaySummary {
                indexed: 4,
                invalidated: 1,
                tip_height: Some(3),
                interrupted: false,
            }
        );

        let store = replayer.into_store();
        let symbols: Vec<_> = store
            .query_all::<Token>(Token::PARTITION)
            .unwrap()
            .into_iter()
            .map(|t| (t.id, t.symbol))
            .collect();
        // B took id 2 before it was invalidated.
        assert_eq!(
            symbols,
            vec![(1, "A".to_string()), (3, "C".to_string()), (4, "D".to_string())]
        );
    }

    /// A failing event stops the replay with the store as it was before
    /// that event; resuming from it with a fixed feed finishes the job.
    #[test]
    fn test_resume_after_failed_event() {
        let broken = FeedEvent::Index(
            BlockBuilder::new(2)
                .dftx(txid(2), create_token("B", true))
                .dftx(txid(0x22), remove_oracle(&txid(0xdead)))
                .build(),
        );
        let text = feed(&[token_block(1, "A"), broken, token_block(3, "C")]);
        let mut replayer = Replayer::new(dispatcher(), ModelStore::in_memory());

        let err = replay(&mut replayer, &text).unwrap_err();
        assert!(!err.is_fatal());
        assert!(matches!(
            err,
            ReplayError::Indexing { line: 2, source: IndexingError::OracleNotFound { .. } }
        ));
        assert!(replayer.store().get::<Token>("2").unwrap().is_none());

        let resumed = feed(&[token_block(2, "B"), token_block(3, "C")]);
        let summary = replay(&mut replayer, &resumed).unwrap();
        assert_eq!(summary.tip_height, Some(3));
        assert_eq!(replayer.store().get::<Token>("2").unwrap().unwrap().symbol, "B");
        assert_eq!(replayer.store().get::<Token>("3").unwrap().unwrap().symbol, "C");
    }

    #[test]
    fn test_invalidating_below_tip_is_fatal() {
        let text = feed(&[
            token_block(1, "A"),
            token_block(2, "B"),
            FeedEvent::Invalidate(block_hash(1)),
        ]);
        let mut replayer = Replayer::new(dispatcher(), ModelStore::in_memory());

        let err = replay(&mut replayer, &text).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, ReplayError::Indexing { line: 3, .. }));
    }
}
