//! # Semaphore Cache
//!
//! Locks are never held across an `.await`: the entry map and the lock map
//! are only touched inside short synchronous sections.

use lru::LruCache;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::{timeout, Instant};

use crate::config::CacheConfig;
use crate::errors::CacheError;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

pub struct SemaphoreCache<V> {
    config: CacheConfig,
    entries: Mutex<LruCache<String, Entry<V>>>,
    locks: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl<V: Clone> SemaphoreCache<V> {
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            locks: Mutex::new(HashMap::new()),
            config,
        }
    }

    fn cache_key(namespace: &str, key: &str) -> String {
        format!("{namespace}:{key}")
    }

    /// Cached value if present and unexpired. Expired entries are dropped.
    pub fn get(&self, namespace: &str, key: &str) -> Option<V> {
        self.lookup(&Self::cache_key(namespace, key))
    }

    fn lookup(&self, cache_key: &str) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.get(cache_key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.pop(cache_key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, namespace: &str, key: &str, value: V) {
        self.store(Self::cache_key(namespace, key), value);
    }

    fn store(&self, cache_key: String, value: V) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + self.config.ttl,
        };
        self.entries.lock().put(cache_key, entry);
    }

    pub fn invalidate(&self, namespace: &str, key: &str) {
        self.entries.lock().pop(&Self::cache_key(namespace, key));
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys with a live lock entry; drained once their waiters finish.
    pub fn pending_locks(&self) -> usize {
        self.locks.lock().len()
    }

    fn semaphore(&self, cache_key: &str) -> Arc<Semaphore> {
        self.locks
            .lock()
            .entry(cache_key.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.config.permits)))
            .clone()
    }

    /// Drop the key's lock once no other caller holds a handle to it.
    fn release(&self, cache_key: &str, semaphore: Arc<Semaphore>) {
        let mut locks = self.locks.lock();
        // One reference in the map, one here.
        if Arc::strong_count(&semaphore) <= 2 {
            locks.remove(cache_key);
        }
    }

    /// Return the cached value, or run `fetch` under the key's semaphore and
    /// cache its result.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        namespace: &str,
        key: &str,
        fetch: F,
    ) -> Result<V, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Display,
    {
        let cache_key = Self::cache_key(namespace, key);
        if let Some(value) = self.lookup(&cache_key) {
            return Ok(value);
        }

        let semaphore = self.semaphore(&cache_key);
        let permit = match timeout(self.config.lock_timeout, semaphore.clone().acquire_owned()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => {
                self.release(&cache_key, semaphore);
                return Err(CacheError::Closed);
            }
            Err(_) => {
                tracing::warn!(key = %cache_key, "[ix-04] cache lock timeout");
                self.release(&cache_key, semaphore);
                return Err(CacheError::Timeout { key: cache_key });
            }
        };

        // Another holder may have filled the entry while we waited.
        let result = match self.lookup(&cache_key) {
            Some(value) => Ok(value),
            None => {
                tracing::debug!(key = %cache_key, "[ix-04] cache miss, fetching");
                match fetch().await {
                    Ok(value) => {
                        self.store(cache_key.clone(), value.clone());
                        Ok(value)
                    }
                    Err(error) => Err(CacheError::Fetch(error.to_string())),
                }
            }
        };

        drop(permit);
        self.release(&cache_key, semaphore);
        result
    }
}
