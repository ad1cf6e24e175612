//! # Token Flows
//!
//! Id allocation for DAT and non-DAT tokens, LP tokens minted by pool pair
//! creation, and ids staying retired after their block is invalidated.

#[cfg(test)]
mod tests {
    use ix_02_model_store::{ModelStore, PoolPair, Token};
    use ix_03_indexers::IndexingError;

    use crate::fixtures::*;

    fn token(store: &ModelStore, id: u32) -> Token {
        store.get::<Token>(&id.to_string()).unwrap().unwrap()
    }

    #[test]
    fn test_ids_by_class() {
        let dispatcher = dispatcher();
        let mut store = ModelStore::in_memory();

        let block = BlockBuilder::new(1)
            .dftx(txid(1), create_token("A", true))
            .dftx(txid(2), create_token("X", false))
            .dftx(txid(3), create_token("B", true))
            .dftx(txid(4), create_token("Y", false))
            .build();
        dispatcher.index(&mut store, &block).unwrap();

        let ids: Vec<_> = store
            .query_all::<Token>(Token::PARTITION)
            .unwrap()
            .into_iter()
            .map(|t| (t.id, t.symbol))
            .collect();
        assert_eq!(
            ids,
            vec![
                (1, "A".to_string()),
                (2, "B".to_string()),
                (128, "X".to_string()),
                (129, "Y".to_string()),
            ]
        );
        assert!(token(&store, 1).mintable);
        assert!(token(&store, 1).tradeable);
    }

    #[test]
    fn test_invalidated_ids_are_not_reused() {
        let dispatcher = dispatcher();
        let mut store = ModelStore::in_memory();

        let first = BlockBuilder::new(1)
            .dftx(txid(1), create_token("A", true))
            .dftx(txid(2), create_token("X", false))
            .build();
        dispatcher.index(&mut store, &first).unwrap();
        dispatcher.invalidate(&mut store, &first.hash).unwrap();
        assert!(store.query_all::<Token>(Token::PARTITION).unwrap().is_empty());

        let replacement = BlockBuilder::new(1)
            .hash(txid(0xf1))
            .dftx(txid(3), create_token("C", true))
            .dftx(txid(4), create_token("Z", false))
            .build();
        dispatcher.index(&mut store, &replacement).unwrap();
        assert_eq!(token(&store, 2).symbol, "C");
        assert_eq!(token(&store, 129).symbol, "Z");
        assert!(store.get::<Token>("1").unwrap().is_none());
    }

    #[test]
    fn test_pool_pair_mints_lp_token() {
        let dispatcher = dispatcher();
        let mut store = ModelStore::in_memory();

        let block = BlockBuilder::new(1)
            .dftx(txid(1), create_token("BTC", true))
            .dftx(txid(2), create_token("DFI", true))
            .dftx(txid(3), create_pool_pair(1, 2))
            .build();
        dispatcher.index(&mut store, &block).unwrap();

        let lp = token(&store, 3);
        assert_eq!(lp.symbol, "BTC-DFI");
        assert!(lp.is_dat);
        assert!(lp.is_lps);
        assert_eq!(lp.creation_txid, txid(3));

        let pool = store.latest::<PoolPair>("3").unwrap().unwrap();
        assert_eq!(pool.token_a.symbol, "BTC");
        assert_eq!(pool.token_b.id, 2);
        assert_eq!(pool.creation.height, 1);
    }

    #[test]
    fn test_duplicate_pool_pair_rejected() {
        let dispatcher = dispatcher();
        let mut store = ModelStore::in_memory();
        dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(1)
                    .dftx(txid(1), create_token("BTC", true))
                    .dftx(txid(2), create_token("DFI", true))
                    .dftx(txid(3), create_pool_pair(1, 2))
                    .build(),
            )
            .unwrap();
        let before = store.snapshot().unwrap();

        let err = dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(2).dftx(txid(4), create_pool_pair(1, 2)).build(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            IndexingError::DuplicatePoolPair { pool_pair_id: 3, .. }
        ));
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn test_pool_pair_needs_both_tokens() {
        let dispatcher = dispatcher();
        let mut store = ModelStore::in_memory();

        let err = dispatcher
            .index(
                &mut store,
                &BlockBuilder::new(1)
                    .dftx(txid(1), create_token("BTC", true))
                    .dftx(txid(2), create_pool_pair(1, 7))
                    .build(),
            )
            .unwrap_err();
        assert!(matches!(err, IndexingError::TokenNotFound { ref token } if token == "7"));
        assert!(store.snapshot().unwrap().is_empty());
    }
}
