//! # Swap Flows
//!
//! Implicit and explicit routing, path validation, and swap volume buckets
//! keyed by the token entering each pool.

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use ix_02_model_store::{AggregateBucket, ModelStore, PoolSwap, ScanOrder};
    use ix_03_indexers::{Dispatcher, IndexingError};
    use std::str::FromStr;

    use crate::fixtures::*;

    const COIN: i64 = 100_000_000;

    /// Tokens 1, 2, 3 and pools 4 (1-2) and 5 (2-3).
    fn with_pools(dispatcher: &Dispatcher) -> ModelStore {
        let mut store = ModelStore::in_memory();
        let block = BlockBuilder::new(1)
            .dftx(txid(1), create_token("BTC", true))
            .dftx(txid(2), create_token("DFI", true))
            .dftx(txid(3), create_token("ETH", true))
            .dftx(txid(4), create_pool_pair(1, 2))
            .dftx(txid(5), create_pool_pair(2, 3))
            .build();
        dispatcher.index(&mut store, &block).unwrap();
        store
    }

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn volume(store: &ModelStore, pool: u32, interval: u32) -> Vec<AggregateBucket> {
        store
            .query::<AggregateBucket>(
                &AggregateBucket::partition(&format!("pool:{pool}"), interval),
                usize::MAX,
                ScanOrder::Ascending,
                None,
            )
            .unwrap()
    }

    // =========================================================================
    // ROUTING
    // =========================================================================

    #[test]
    fn test_implicit_route_either_direction() {
        let dispatcher = dispatcher();
        let mut store = with_pools(&dispatcher);

        let block = BlockBuilder::new(2)
            .dftx(txid(0x21), pool_swap(1, 2, COIN))
            .dftx(txid(0x22), pool_swap(2, 1, 2 * COIN))
            .build();
        dispatcher.index(&mut store, &block).unwrap();

        let events = store.query_all::<PoolSwap>("4").unwrap();
        let sides: Vec<_> = events.iter().map(|e| (e.txno, e.from_token_id)).collect();
        assert_eq!(sides, vec![(0, 1), (1, 2)]);

        let hour = &volume(&store, 4, 3_600)[0];
        assert_eq!(hour.aggregated["1"].amount, decimal("1"));
        assert_eq!(hour.aggregated["2"].amount, decimal("2"));
        assert_eq!(hour.count, 2);
    }

    #[test]
    fn test_composite_path_hops() {
        let dispatcher = dispatcher();
        let mut store = with_pools(&dispatcher);

        let block = BlockBuilder::new(2)
            .dftx(txid(0x21), composite_swap(3, 1, 7 * COIN, &[5, 4]))
            .build();
        dispatcher.index(&mut store, &block).unwrap();

        let first = store
            .get::<PoolSwap>(&PoolSwap::make_id(5, &format!("{}-0", txid(0x21)), 0))
            .unwrap()
            .unwrap();
        assert_eq!(first.from_token_id, 3);
        let second = store
            .get::<PoolSwap>(&PoolSwap::make_id(4, &format!("{}-0", txid(0x21)), 1))
            .unwrap()
            .unwrap();
        assert_eq!(second.from_token_id, 2);
        assert_eq!(second.from_amount, decimal("7"));

        assert_eq!(volume(&store, 5, 86_400)[0].aggregated["3"].amount, decimal("7"));
        assert_eq!(volume(&store, 4, 86_400)[0].aggregated["2"].amount, decimal("7"));
    }

    #[test]
    fn test_path_must_chain() {
        let dispatcher = dispatcher();
        let mut store = with_pools(&dispatcher);
        let before = store.snapshot().unwrap();

        let err = dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(2)
                    .dftx(txid(0x21), composite_swap(1, 3, COIN, &[5]))
                    .build(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            IndexingError::InvalidSwapPath { hop: 0, pool_pair_id: 5, token_id: 1 }
        ));

        let err = dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(2)
                    .dftx(txid(0x22), composite_swap(1, 3, COIN, &[4, 99]))
                    .build(),
            )
            .unwrap_err();
        assert!(matches!(err, IndexingError::PoolPairIdNotFound { pool_pair_id: 99 }));
        assert_eq!(store.snapshot().unwrap(), before);
    }

    // =========================================================================
    // VOLUME BUCKETS
    // =========================================================================

    #[test]
    fn test_volume_across_hours() {
        let dispatcher = dispatcher();
        let mut store = with_pools(&dispatcher);

        dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(2)
                    .time(DAY_START + 100)
                    .dftx(txid(0x21), pool_swap(1, 2, 3 * COIN))
                    .build(),
            )
            .unwrap();
        dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(3)
                    .time(DAY_START + 3_700)
                    .dftx(txid(0x31), pool_swap(1, 2, 5 * COIN))
                    .build(),
            )
            .unwrap();

        let hours = volume(&store, 4, 3_600);
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[0].bucket_start, DAY_START);
        assert_eq!(hours[1].bucket_start, DAY_START + 3_600);
        let day = &volume(&store, 4, 86_400)[0];
        assert_eq!(day.aggregated["1"].amount, decimal("8"));
        assert_eq!(day.block.height, 3);

        dispatcher.invalidate(&mut store, &block_hash(3)).unwrap();
        let hours = volume(&store, 4, 3_600);
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[1].count, 0);
        assert_eq!(hours[1].aggregated["1"].amount, decimal("0"));
        assert_eq!(zero_buckets(&store, "pool:4", 3_600).len(), 1);
        let day = &volume(&store, 4, 86_400)[0];
        assert_eq!(day.aggregated["1"].amount, decimal("3"));
        assert_eq!(day.aggregated["1"].count, 1);
        assert_eq!(day.block.height, 2);
    }
}
