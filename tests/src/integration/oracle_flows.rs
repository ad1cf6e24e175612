//! # Oracle Flows
//!
//! Weighted aggregation across oracles, feed freshness, the oracle lifecycle
//! and active price settlement.

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use ix_02_model_store::{
        ModelStore, Oracle, OracleHistory, OraclePriceActive, OraclePriceAggregated,
        OracleTokenCurrency, PriceTicker,
    };
    use std::str::FromStr;

    use crate::fixtures::*;

    const COIN: i64 = 100_000_000;

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn ticker(store: &ModelStore) -> PriceTicker {
        store.get::<PriceTicker>("TA-USD").unwrap().unwrap()
    }

    // =========================================================================
    // WEIGHTING AND FRESHNESS
    // =========================================================================

    /// Weights 1 and 2 report 1.1 and 1.5; a weight 0 oracle is counted but
    /// never averaged.
    #[test]
    fn test_weighted_mean_across_oracles() {
        let dispatcher = dispatcher();
        let mut store = ModelStore::in_memory();
        let (o1, o2, o3) = (txid(0xa1), txid(0xa2), txid(0xa3));

        let appoint = BlockBuilder::new(1)
            .dftx(&o1, appoint_oracle(1, &[("TA", "USD")]))
            .dftx(&o2, appoint_oracle(2, &[("TA", "USD")]))
            .dftx(&o3, appoint_oracle(0, &[("TA", "USD")]))
            .build();
        dispatcher.index(&mut store, &appoint).unwrap();

        let time = DAY_START + 60;
        let report = BlockBuilder::new(2)
            .dftx(txid(0xb1), set_oracle_data(&o1, time, &[("TA", "USD", 110_000_000)]))
            .dftx(txid(0xb2), set_oracle_data(&o2, time, &[("TA", "USD", 150_000_000)]))
            .dftx(txid(0xb3), set_oracle_data(&o3, time, &[("TA", "USD", 9 * COIN)]))
            .build();
        dispatcher.index(&mut store, &report).unwrap();

        let history = store.query_all::<OraclePriceAggregated>("TA-USD").unwrap();
        let amounts: Vec<_> = history.iter().map(|p| p.aggregated.amount.clone()).collect();
        assert_eq!(
            amounts,
            vec![decimal("1.1"), decimal("1.36666667"), decimal("1.36666667")]
        );

        let latest = ticker(&store).price;
        assert_eq!(latest.aggregated.amount, decimal("1.36666667"));
        assert_eq!(latest.aggregated.weightage, 3);
        assert_eq!(latest.aggregated.oracles.active, 2);
        assert_eq!(latest.aggregated.oracles.total, 3);
        assert_eq!(latest.txid, txid(0xb3));
    }

    #[test]
    fn test_stale_report_drops_out_of_the_mean() {
        let dispatcher = dispatcher();
        let mut store = ModelStore::in_memory();
        let (o1, o2) = (txid(0xa1), txid(0xa2));

        dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(1)
                    .dftx(&o1, appoint_oracle(1, &[("TA", "USD")]))
                    .dftx(&o2, appoint_oracle(1, &[("TA", "USD")]))
                    .build(),
            )
            .unwrap();

        let early = DAY_START + 60;
        dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(2)
                    .time(early)
                    .dftx(txid(0xb1), set_oracle_data(&o1, early, &[("TA", "USD", COIN)]))
                    .dftx(txid(0xb2), set_oracle_data(&o2, early, &[("TA", "USD", 3 * COIN)]))
                    .build(),
            )
            .unwrap();
        assert_eq!(ticker(&store).price.aggregated.amount, decimal("2"));

        // Two hours on, only o1 reports again.
        let late = early + 7_200;
        dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(3)
                    .time(late)
                    .dftx(txid(0xc1), set_oracle_data(&o1, late, &[("TA", "USD", 4 * COIN)]))
                    .build(),
            )
            .unwrap();

        let latest = ticker(&store).price;
        assert_eq!(latest.aggregated.amount, decimal("4"));
        assert_eq!(latest.aggregated.oracles.active, 1);
        assert_eq!(latest.aggregated.oracles.total, 2);

        dispatcher.invalidate(&mut store, &block_hash(3)).unwrap();
        assert_eq!(ticker(&store).price.aggregated.amount, decimal("2"));
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    #[test]
    fn test_appoint_then_invalidate() {
        let dispatcher = dispatcher();
        let mut store = ModelStore::in_memory();
        let oracle = txid(0xa1);

        let block = BlockBuilder::new(1)
            .dftx(&oracle, appoint_oracle(5, &[("TA", "USD"), ("TB", "USD")]))
            .build();
        dispatcher.index(&mut store, &block).unwrap();

        let appointed = store.get::<Oracle>(&oracle).unwrap().unwrap();
        assert_eq!(appointed.weightage, 5);
        assert_eq!(appointed.price_feeds.len(), 2);
        for pair in ["TA-USD", "TB-USD"] {
            let rows = store.query_all::<OracleTokenCurrency>(pair).unwrap();
            assert_eq!(rows.len(), 1, "{pair}");
            assert_eq!(rows[0].oracle_id, oracle);
        }
        assert_eq!(store.query_all::<OracleHistory>(&oracle).unwrap().len(), 1);

        dispatcher.invalidate(&mut store, &block.hash).unwrap();
        assert!(store.get::<Oracle>(&oracle).unwrap().is_none());
        assert!(store.query_all::<OracleHistory>(&oracle).unwrap().is_empty());
        assert!(store.query_all::<OracleTokenCurrency>("TA-USD").unwrap().is_empty());
        assert!(rows(&store).is_empty());
    }

    #[test]
    fn test_remove_then_invalidate_restores_oracle() {
        let dispatcher = dispatcher();
        let mut store = ModelStore::in_memory();
        let oracle = txid(0xa1);

        dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(1)
                    .dftx(&oracle, appoint_oracle(1, &[("TA", "USD")]))
                    .build(),
            )
            .unwrap();
        let appointed = rows(&store);

        dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(2).dftx(txid(0xd1), remove_oracle(&oracle)).build(),
            )
            .unwrap();
        assert!(store.get::<Oracle>(&oracle).unwrap().is_none());
        assert!(store.query_all::<OracleTokenCurrency>("TA-USD").unwrap().is_empty());
        assert_eq!(store.query_all::<OracleHistory>(&oracle).unwrap().len(), 2);

        dispatcher.invalidate(&mut store, &block_hash(2)).unwrap();
        assert_eq!(rows(&store), appointed);
    }

    // =========================================================================
    // ACTIVE PRICE
    // =========================================================================

    /// Settles every 120 blocks: the first settlement only stages `next`,
    /// the second promotes it and turns live, a large move breaks liveness.
    #[test]
    fn test_active_price_settlement() {
        let dispatcher = dispatcher();
        let mut store = ModelStore::in_memory();
        let oracle = txid(0xa1);

        dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(1)
                    .dftx(&oracle, appoint_oracle(1, &[("TA", "USD")]))
                    .build(),
            )
            .unwrap();

        let t120 = DAY_START + 3_600;
        dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(120)
                    .time(t120)
                    .dftx(txid(0xe1), set_oracle_data(&oracle, t120, &[("TA", "USD", 2 * COIN)]))
                    .build(),
            )
            .unwrap();
        let first = store
            .get::<OraclePriceActive>(&OraclePriceActive::make_id("TA-USD", 120))
            .unwrap()
            .unwrap();
        assert!(first.active.is_none());
        assert_eq!(first.next.as_ref().map(|p| p.amount.clone()), Some(decimal("2")));
        assert!(!first.is_live);

        dispatcher
            .index(&mut store, &BlockBuilder::new(240).time(t120 + 3_600).build())
            .unwrap();
        let second = store.latest::<OraclePriceActive>("TA-USD").unwrap().unwrap();
        assert_eq!(second.block.height, 240);
        assert_eq!(second.active.as_ref().map(|p| p.amount.clone()), Some(decimal("2")));
        assert!(second.is_live);

        let t360 = t120 + 7_200;
        dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(360)
                    .time(t360)
                    .dftx(txid(0xe2), set_oracle_data(&oracle, t360, &[("TA", "USD", 3 * COIN)]))
                    .build(),
            )
            .unwrap();
        let third = store.latest::<OraclePriceActive>("TA-USD").unwrap().unwrap();
        assert_eq!(third.next.as_ref().map(|p| p.amount.clone()), Some(decimal("3")));
        assert!(!third.is_live);

        dispatcher.invalidate(&mut store, &block_hash(360)).unwrap();
        let restored = store.latest::<OraclePriceActive>("TA-USD").unwrap().unwrap();
        assert_eq!(restored, second);
    }
}
