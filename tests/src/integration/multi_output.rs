//! # Several DfTx Outputs per Transaction
//!
//! A transaction may carry more than one DfTx output. Each output is its own
//! record: rows it owns are keyed by `{txid}-{vout}`, records run in output
//! order, and invalidation takes every one of them back out.

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use ix_01_dftx::DfTx;
    use ix_02_model_store::{
        AggregateBucket, ModelStore, OraclePriceAggregated, OraclePriceFeed, PoolSwap, PriceTicker,
        Token, TokenCreation,
    };
    use ix_03_indexers::{Dispatcher, IndexingError};
    use shared_types::RawBlock;
    use std::str::FromStr;

    use crate::fixtures::*;

    const COIN: i64 = 100_000_000;

    fn oracle() -> String {
        txid(0xa1)
    }

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    /// Oracle on TA-USD, tokens 1 and 2, and their pool (id 3).
    fn genesis() -> RawBlock {
        BlockBuilder::new(1)
            .dftx(oracle(), appoint_oracle(1, &[("TA", "USD")]))
            .dftx(txid(0x11), create_token("BTC", true))
            .dftx(txid(0x12), create_token("DFI", true))
            .dftx(txid(0x13), create_pool_pair(1, 2))
            .build()
    }

    /// Timed at height 2.
    fn report(sats: i64) -> DfTx {
        set_oracle_data(&oracle(), DAY_START + 60, &[("TA", "USD", sats)])
    }

    /// Index genesis, then `block` at height 2 and hand the store to `check`.
    /// Invalidating must give back the genesis rows, twice over.
    fn round_trip(block: &RawBlock, check: impl FnOnce(&ModelStore)) {
        let dispatcher = dispatcher();
        let mut store = ModelStore::in_memory();
        dispatcher.index(&mut store, &genesis()).unwrap();
        let before = rows(&store);

        dispatcher.index(&mut store, block).unwrap();
        check(&store);

        dispatcher.invalidate(&mut store, &block.hash).unwrap();
        assert_eq!(rows(&store), before);

        dispatcher.index(&mut store, block).unwrap();
        dispatcher.invalidate(&mut store, &block.hash).unwrap();
        assert_eq!(rows(&store), before);
    }

    fn swaps(store: &ModelStore) -> Vec<PoolSwap> {
        store.query_all::<PoolSwap>("3").unwrap()
    }

    fn volume_hour(store: &ModelStore) -> AggregateBucket {
        store
            .latest::<AggregateBucket>(&AggregateBucket::partition("pool:3", 3_600))
            .unwrap()
            .unwrap()
    }

    // =========================================================================
    // ONE FAMILY PER TRANSACTION
    // =========================================================================

    #[test]
    fn test_two_swaps() {
        let block = BlockBuilder::new(2)
            .dftxs(txid(0x21), &[pool_swap(1, 2, COIN), pool_swap(1, 2, 3 * COIN)])
            .build();

        round_trip(&block, |store| {
            let events = swaps(store);
            assert_eq!(events.len(), 2);
            assert_eq!((events[0].vout, events[1].vout), (0, 1));
            assert_eq!(events[1].from_amount, decimal("3"));
            let hour = volume_hour(store);
            assert_eq!(hour.count, 2);
            assert_eq!(hour.aggregated["1"].amount, decimal("4"));
        });
    }

    #[test]
    fn test_two_token_creations() {
        let block = BlockBuilder::new(2)
            .dftxs(txid(0x22), &[create_token("ETH", true), create_token("USDT", true)])
            .build();

        round_trip(&block, |store| {
            assert_eq!(store.get::<Token>("4").unwrap().unwrap().symbol, "ETH");
            assert_eq!(store.get::<Token>("5").unwrap().unwrap().symbol, "USDT");
            let second = store
                .get::<TokenCreation>(&format!("{}-1", txid(0x22)))
                .unwrap()
                .unwrap();
            assert_eq!(second.token_id, 5);
        });
    }

    #[test]
    fn test_two_oracle_reports() {
        let block = BlockBuilder::new(2)
            .dftxs(txid(0x23), &[report(COIN), report(2 * COIN)])
            .build();

        round_trip(&block, |store| {
            let partition = OraclePriceFeed::partition("TA-USD", &oracle());
            assert_eq!(store.query_all::<OraclePriceFeed>(&partition).unwrap().len(), 2);
            let prices = store.query_all::<OraclePriceAggregated>("TA-USD").unwrap();
            assert_eq!(prices.len(), 2);
            assert_eq!(prices[0].aggregated.amount, decimal("1"));
            assert_eq!(prices[1].aggregated.amount, decimal("2"));
            let ticker = store.get::<PriceTicker>("TA-USD").unwrap().unwrap();
            assert_eq!(ticker.price.id, prices[1].id);

            let quarter = store
                .latest::<AggregateBucket>(&AggregateBucket::partition("price:TA-USD", 900))
                .unwrap()
                .unwrap();
            assert_eq!(quarter.count, 2);
            assert_eq!(quarter.average("amount"), Some(decimal("1.5")));
        });
    }

    // =========================================================================
    // MIXED
    // =========================================================================

    #[test]
    fn test_mixed_families_across_transactions() {
        let block = BlockBuilder::new(2)
            .dftxs(txid(0x24), &[create_token("ETH", true), pool_swap(2, 1, COIN), report(COIN)])
            .dftxs(txid(0x25), &[report(3 * COIN), create_token("USDT", true), pool_swap(1, 2, COIN)])
            .build();

        round_trip(&block, |store| {
            assert_eq!(store.get::<Token>("4").unwrap().unwrap().symbol, "ETH");
            assert_eq!(store.get::<Token>("5").unwrap().unwrap().symbol, "USDT");

            let events = swaps(store);
            assert_eq!(events.len(), 2);
            assert_eq!((events[0].txno, events[0].vout), (0, 1));
            assert_eq!((events[1].txno, events[1].vout), (1, 2));

            let ticker = store.get::<PriceTicker>("TA-USD").unwrap().unwrap();
            assert_eq!(ticker.price.aggregated.amount, decimal("3"));
            assert_eq!(store.query_all::<OraclePriceAggregated>("TA-USD").unwrap().len(), 2);
        });
    }

    #[test]
    fn test_invalidate_leaves_explicit_zero_buckets() {
        let dispatcher = dispatcher();
        let mut store = ModelStore::in_memory();
        dispatcher.index(&mut store, &genesis()).unwrap();
        let block = BlockBuilder::new(2)
            .dftxs(txid(0x26), &[pool_swap(1, 2, COIN), report(COIN), report(2 * COIN)])
            .build();
        dispatcher.index(&mut store, &block).unwrap();
        dispatcher.invalidate(&mut store, &block.hash).unwrap();

        let hour = volume_hour(&store);
        assert_eq!(hour.count, 0);
        assert_eq!(hour.aggregated["1"].count, 0);
        for interval in [900, 3_600, 86_400] {
            let zeros = zero_buckets(&store, "price:TA-USD", interval);
            assert_eq!(zeros.len(), 1, "{interval}");
            assert_eq!(zeros[0].aggregated["amount"].amount, decimal("0"));
        }
    }

    #[test]
    fn test_failing_output_rolls_back_earlier_outputs() {
        let dispatcher = dispatcher();
        let mut store = ModelStore::in_memory();
        dispatcher.index(&mut store, &genesis()).unwrap();
        let before = store.snapshot().unwrap();

        // No pool bridges tokens 1 and 9.
        let block = BlockBuilder::new(2)
            .dftxs(txid(0x27), &[create_token("ETH", true), pool_swap(1, 9, COIN)])
            .build();
        let err = dispatcher.index(&mut store, &block).unwrap_err();
        assert!(matches!(err, IndexingError::PoolPairNotFound { token_a: 1, token_b: 9 }));
        assert_eq!(store.snapshot().unwrap(), before);
        assert_eq!(Dispatcher::tip(&store).unwrap().unwrap().0, 1);
    }
}
