//! # Core Domain Entities
//!
//! JSON field names follow the node RPC (`camelCase`).

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Block hash as rendered by the node (lowercase hex).
pub type BlockHash = String;

/// Transaction id as rendered by the node (lowercase hex).
pub type Txid = String;

/// One transaction output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOutput {
    pub script_hex: String,
    #[serde(default)]
    pub script_asm: String,
    /// Output amount with 8 implied decimals, when the source provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<BigDecimal>,
}

impl RawOutput {
    pub fn new(script_hex: impl Into<String>) -> Self {
        Self {
            script_hex: script_hex.into(),
            script_asm: String::new(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: BigDecimal) -> Self {
        self.value = Some(value);
        self
    }
}

/// A confirmed transaction with its outputs in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub txid: Txid,
    pub outputs: Vec<RawOutput>,
}

/// A confirmed block as delivered by the block source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    pub hash: BlockHash,
    pub height: u32,
    pub time: i64,
    pub median_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minter_id: Option<String>,
    pub transactions: Vec<RawTransaction>,
}

impl RawBlock {
    /// Provenance stamped onto entities written while indexing this block.
    pub fn context(&self) -> BlockContext {
        BlockContext {
            hash: self.hash.clone(),
            height: self.height,
            time: self.time,
            median_time: self.median_time,
        }
    }
}

/// Block provenance embedded in stored entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockContext {
    pub hash: BlockHash,
    pub height: u32,
    pub time: i64,
    pub median_time: i64,
}
