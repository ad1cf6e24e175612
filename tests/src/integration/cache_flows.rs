//! # Cache Flows
//!
//! The read cache in front of store lookups: concurrent misses collapse into
//! one read, and a new block is only visible once its key is invalidated.

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use ix_02_model_store::{ModelStore, PriceTicker};
    use ix_04_read_cache::{CacheConfig, CacheError, SemaphoreCache};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::str::FromStr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::RwLock;

    use crate::fixtures::*;

    type Shared = Arc<RwLock<ModelStore>>;

    fn oracle() -> String {
        txid(0xa1)
    }

    /// Height 1 also appoints the oracle.
    fn priced(height: u32, sats: i64) -> shared_types::RawBlock {
        let time = DAY_START + i64::from(height) * 30;
        let mut builder = BlockBuilder::new(height);
        if height == 1 {
            builder = builder.dftx(oracle(), appoint_oracle(1, &[("TA", "USD")]));
        }
        builder
            .dftx(
                txid(0xb000 + u64::from(height)),
                set_oracle_data(&oracle(), time, &[("TA", "USD", sats)]),
            )
            .build()
    }

    async fn read_ticker(store: Shared, reads: Arc<AtomicUsize>) -> Result<PriceTicker, String> {
        reads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        store
            .read()
            .await
            .get::<PriceTicker>("TA-USD")
            .map_err(|e| e.to_string())?
            .ok_or_else(|| "no ticker".to_string())
    }

    #[tokio::test]
    async fn test_concurrent_ticker_reads_hit_store_once() {
        let mut store = ModelStore::in_memory();
        dispatcher().index(&mut store, &priced(1, 250_000_000)).unwrap();
        let store: Shared = Arc::new(RwLock::new(store));

        let cache = Arc::new(SemaphoreCache::<PriceTicker>::new(CacheConfig::default()));
        let reads = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let (cache, store, reads) = (cache.clone(), store.clone(), reads.clone());
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_compute("ticker", "TA-USD", || read_ticker(store, reads))
                    .await
            }));
        }
        for handle in handles {
            let ticker = handle.await.unwrap().unwrap();
            assert_eq!(ticker.price.aggregated.amount, BigDecimal::from_str("2.5").unwrap());
        }
        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.pending_locks(), 0);
    }

    #[tokio::test]
    async fn test_new_block_visible_after_invalidate() {
        let dispatcher = dispatcher();
        let mut store = ModelStore::in_memory();
        dispatcher.index(&mut store, &priced(1, 100_000_000)).unwrap();
        let store: Shared = Arc::new(RwLock::new(store));

        let cache = SemaphoreCache::<PriceTicker>::new(CacheConfig::default());
        let reads = Arc::new(AtomicUsize::new(0));
        let fetch = || read_ticker(store.clone(), reads.clone());

        let first = cache.get_or_compute("ticker", "TA-USD", fetch).await.unwrap();
        assert_eq!(first.price.block.height, 1);

        dispatcher
            .index(&mut *store.write().await, &priced(2, 200_000_000))
            .unwrap();
        let cached = cache.get_or_compute("ticker", "TA-USD", fetch).await.unwrap();
        assert_eq!(cached, first);

        cache.invalidate("ticker", "TA-USD");
        let fresh = cache.get_or_compute("ticker", "TA-USD", fetch).await.unwrap();
        assert_eq!(fresh.price.block.height, 2);
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_row_is_not_cached() {
        let store: Shared = Arc::new(RwLock::new(ModelStore::in_memory()));
        let cache = SemaphoreCache::<PriceTicker>::new(CacheConfig::default());
        let reads = Arc::new(AtomicUsize::new(0));

        let err = cache
            .get_or_compute("ticker", "TA-USD", || read_ticker(store.clone(), reads.clone()))
            .await
            .unwrap_err();
        assert_eq!(err, CacheError::Fetch("no ticker".into()));
        assert!(cache.is_empty());
    }
}
