//! # Read Cache
//!
//! Query-side cache in front of slow upstream lookups. Entries expire after
//! a TTL and the least recently used are evicted past capacity. Misses on
//! one key are serialized through that key's semaphore, so N permits bound
//! concurrent upstream fetches for the key to N.
//!
//! ```text
//! get_or_compute(ns, key)
//!   hit?                      -> value
//!   acquire key semaphore     -> CacheError::Timeout after lock_timeout
//!   hit? (filled meanwhile)   -> value
//!   fetch, insert, release    -> value | CacheError::Fetch
//! ```

pub mod config;
pub mod errors;
pub mod service;

pub use config::CacheConfig;
pub use errors::CacheError;
pub use service::SemaphoreCache;
