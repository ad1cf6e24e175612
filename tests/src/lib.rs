//! # DfTx Indexer Test Suite
//!
//! Cross-crate scenarios driven through the real extractor and the default
//! registry, on the in-memory store.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs      # block builder, DfTx payload shorthands
//! └── integration/     # one module per scenario family
//! tests/benches/       # criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ix-tests
//! cargo test -p ix-tests integration::oracle_flows
//! cargo bench -p ix-tests
//! ```

pub mod fixtures;
