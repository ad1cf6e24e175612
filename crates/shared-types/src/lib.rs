//! # Shared Types Crate
//!
//! Block shapes shared by every indexing crate.
//!
//! ## Design Principles
//!
//! - **Borrowed, never copied**: the core receives a `&RawBlock` for the
//!   duration of one index/invalidate call.
//! - **Provenance everywhere**: every stored projection embeds the
//!   `BlockContext` of the block that last wrote it.

pub mod entities;

pub use entities::*;
