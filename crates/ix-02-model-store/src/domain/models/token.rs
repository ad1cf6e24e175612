use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use shared_types::BlockContext;

use crate::domain::keys;
use crate::domain::model::{IndexKey, Model};

/// First id of the non-DAT range.
pub const DST_ID_START: u32 = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTokenInfo {
    pub fixed_interval_price_id: String,
    pub interest: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: u32,
    pub symbol: String,
    pub name: String,
    pub decimal: u8,
    pub limit: BigDecimal,
    pub mintable: bool,
    pub tradeable: bool,
    pub is_dat: bool,
    pub is_lps: bool,
    pub finalized: bool,
    pub loan: Option<LoanTokenInfo>,
    pub creation_txid: String,
    pub block: BlockContext,
}

impl Token {
    /// Every token shares one partition so id allocation is a range query.
    pub const PARTITION: &'static str = "tokens";
}

impl Model for Token {
    const TABLE: &'static str = "token";

    fn id(&self) -> String {
        self.id.to_string()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(Self::PARTITION, keys::token_id(self.id)))
    }
}

/// Which token id a creating DfTx output received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCreation {
    /// `{txid}-{vout}` of the creating output.
    pub outpoint: String,
    pub txid: String,
    pub token_id: u32,
}

impl Model for TokenCreation {
    const TABLE: &'static str = "token_creation";

    fn id(&self) -> String {
        self.outpoint.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        None
    }
}

/// Highest id ever handed out per class. Only rises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIdWatermark {
    pub highest_dat: u32,
    pub highest_dst: Option<u32>,
}

impl TokenIdWatermark {
    pub const ID: &'static str = "watermark";
}

impl Model for TokenIdWatermark {
    const TABLE: &'static str = "token_watermark";

    fn id(&self) -> String {
        Self::ID.to_string()
    }

    fn index(&self) -> Option<IndexKey> {
        None
    }
}
