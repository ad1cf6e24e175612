use serde::{Deserialize, Serialize};
use shared_types::BlockContext;

use crate::domain::keys;
use crate::domain::model::{IndexKey, Model};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFeed {
    pub token: String,
    pub currency: String,
}

impl PriceFeed {
    pub fn key(&self) -> String {
        format!("{}-{}", self.token, self.currency)
    }
}

/// Current oracle registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Oracle {
    pub id: String,
    pub owner_address: String,
    pub weightage: u8,
    pub price_feeds: Vec<PriceFeed>,
    pub block: BlockContext,
}

impl Model for Oracle {
    const TABLE: &'static str = "oracle";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new("oracle", self.id.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OracleEvent {
    Appointed,
    Updated,
    Removed,
}

/// Oracle state as of one appoint/update/remove transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleHistory {
    pub id: String,
    pub oracle_id: String,
    pub sort: String,
    pub event: OracleEvent,
    pub owner_address: String,
    pub weightage: u8,
    pub price_feeds: Vec<PriceFeed>,
    pub txid: String,
    pub block: BlockContext,
}

impl OracleHistory {
    /// `outpoint` is the `{txid}-{vout}` of the changing output.
    pub fn make_id(oracle_id: &str, height: u32, outpoint: &str) -> String {
        format!("{oracle_id}-{height}-{outpoint}")
    }

    /// Entries of one oracle sort by (height, tx index, output index), so
    /// several changes within a block keep record order.
    pub fn new(
        oracle: &Oracle,
        event: OracleEvent,
        txid: &str,
        (txno, vout): (usize, usize),
        block: &BlockContext,
    ) -> Self {
        Self {
            id: Self::make_id(&oracle.id, block.height, &format!("{txid}-{vout}")),
            oracle_id: oracle.id.clone(),
            sort: keys::height_txno_vout(block.height, txno, vout),
            event,
            owner_address: oracle.owner_address.clone(),
            weightage: oracle.weightage,
            price_feeds: oracle.price_feeds.clone(),
            txid: txid.to_string(),
            block: block.clone(),
        }
    }

    /// Oracle snapshot as recorded by this entry.
    pub fn to_oracle(&self) -> Oracle {
        Oracle {
            id: self.oracle_id.clone(),
            owner_address: self.owner_address.clone(),
            weightage: self.weightage,
            price_feeds: self.price_feeds.clone(),
            block: self.block.clone(),
        }
    }
}

impl Model for OracleHistory {
    const TABLE: &'static str = "oracle_history";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(self.oracle_id.clone(), self.sort.clone()))
    }
}

/// Registration of one oracle for one token/currency pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleTokenCurrency {
    pub id: String,
    pub key: String,
    pub token: String,
    pub currency: String,
    pub oracle_id: String,
    pub weightage: u8,
    pub block: BlockContext,
}

impl OracleTokenCurrency {
    pub fn make_id(feed: &PriceFeed, oracle_id: &str) -> String {
        format!("{}-{}", feed.key(), oracle_id)
    }

    pub fn new(feed: &PriceFeed, oracle_id: &str, weightage: u8, block: &BlockContext) -> Self {
        Self {
            id: Self::make_id(feed, oracle_id),
            key: feed.key(),
            token: feed.token.clone(),
            currency: feed.currency.clone(),
            oracle_id: oracle_id.to_string(),
            weightage,
            block: block.clone(),
        }
    }
}

impl Model for OracleTokenCurrency {
    const TABLE: &'static str = "oracle_token_currency";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(self.key.clone(), self.oracle_id.clone()))
    }
}
