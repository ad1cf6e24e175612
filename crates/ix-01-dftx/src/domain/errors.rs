//! # Domain Errors
//!
//! Everything that can go wrong while turning an output script into a `DfTx`.

use thiserror::Error;

/// Decoding failure for a single output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// `scriptHex` is not valid hex.
    #[error("invalid script hex: {0}")]
    InvalidHex(String),

    /// Ran out of bytes while reading a field.
    #[error("unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A push opcode claims more bytes than the script holds.
    #[error("malformed script push at offset {offset}")]
    MalformedPush { offset: usize },

    /// Second stack element is not the `DfTx` push.
    #[error("script does not carry a DfTx push as its second element")]
    MissingCustomTx,

    /// Marker present but no type byte follows.
    #[error("DfTx payload has no type byte")]
    MissingType,

    /// Type byte is not a known DfTx opcode.
    #[error("unknown DfTx type 0x{0:02x}")]
    UnknownType(u8),

    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid boolean byte 0x{0:02x}")]
    InvalidBool(u8),

    /// Variable-length integer does not fit its target width.
    #[error("variable-length integer overflow")]
    VarIntOverflow,

    /// Payload decoded but bytes remain in the push.
    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),
}
