//! # DfTx Indexers
//!
//! Drives every registered [`Indexer`] over a block, forward on index and in
//! exactly mirrored order on invalidate, so that indexing a block and then
//! invalidating it leaves the store as it was.
//!
//! ## Layout
//!
//! ```text
//! ports/        Indexer trait
//! service/      RegistryBuilder, IndexerRegistry, Dispatcher
//! indexers/     one module per DfTx family plus block-level indexers
//! algorithms/   bucket arithmetic, oracle weighting, token id allocation
//! ```
//!
//! ## Ordering
//!
//! | Phase | index | invalidate |
//! |-------|-------|------------|
//! | block end | last, registration order | first, reverse registration order |
//! | records | (tx, output) order, registration order | reversed records, reverse registration order |
//! | block start | first, registration order | last, reverse registration order |

pub mod algorithms;
pub mod config;
pub mod domain;
pub mod indexers;
pub mod ports;
pub mod service;

pub use config::{ConfigError, IndexerConfig};
pub use domain::errors::IndexingError;
pub use ports::indexer::Indexer;
pub use service::dispatcher::Dispatcher;
pub use service::registry::{IndexerRegistry, RegistryBuilder};
