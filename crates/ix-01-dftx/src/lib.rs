//! # DfTx Extraction
//!
//! Scans a block's outputs for `OP_RETURN` data carriers holding the `DfTx`
//! marker and decodes them into typed, opcode-tagged records.
//!
//! ## Layout
//!
//! ```text
//! domain/   payload types, script stack, decode errors
//! codec/    binary reader/writer and per-payload (de)serialization
//! ports/    DecodeFailureSink (injected reporting of skipped outputs)
//! service   DfTxExtractor
//! ```
//!
//! ## Failure handling
//!
//! A malformed payload never aborts the block. The failing output is reported
//! to the configured [`DecodeFailureSink`] and skipped; every other output is
//! still extracted.

pub mod codec;
pub mod domain;
pub mod ports;
pub mod service;

pub use codec::{decode_script, encode_script, Decodable, Encodable, Reader, Writer};
pub use domain::errors::DecodeError;
pub use domain::script::{ScriptElement, DFTX_MAGIC, OP_RETURN};
pub use domain::types::*;
pub use ports::outbound::{CollectingSink, DecodeFailure, DecodeFailureSink, TracingSink};
pub use service::{DfTxExtractor, DfTxRecord};
