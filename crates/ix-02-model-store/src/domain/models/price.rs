use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use shared_types::BlockContext;

use crate::domain::keys;
use crate::domain::model::{IndexKey, Model};

/// One raw observation reported by an oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OraclePriceFeed {
    pub id: String,
    pub key: String,
    pub sort: String,
    pub token: String,
    pub currency: String,
    pub oracle_id: String,
    pub txid: String,
    /// Oracle-reported timestamp.
    pub time: i64,
    pub amount: BigDecimal,
    pub block: BlockContext,
}

impl OraclePriceFeed {
    /// Partition holding one oracle's history for one pair.
    pub fn partition(pair_key: &str, oracle_id: &str) -> String {
        format!("{pair_key}-{oracle_id}")
    }

    /// `outpoint` is the `{txid}-{vout}` of the reporting output.
    pub fn make_id(pair_key: &str, oracle_id: &str, outpoint: &str) -> String {
        format!("{pair_key}-{oracle_id}-{outpoint}")
    }
}

impl Model for OraclePriceFeed {
    const TABLE: &'static str = "oracle_price_feed";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(
            Self::partition(&self.key, &self.oracle_id),
            self.sort.clone(),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleCount {
    pub active: u32,
    pub total: u32,
}

/// Weighted mean over the active oracles of a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPrice {
    pub amount: BigDecimal,
    pub weightage: u32,
    pub oracles: OracleCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OraclePriceAggregated {
    pub id: String,
    pub key: String,
    pub sort: String,
    pub token: String,
    pub currency: String,
    pub txid: String,
    pub aggregated: AggregatedPrice,
    pub block: BlockContext,
}

impl OraclePriceAggregated {
    pub fn make_id(pair_key: &str, height: u32, txno: usize, vout: usize) -> String {
        format!("{pair_key}-{height}-{txno}-{vout}")
    }

    pub fn make_sort(height: u32, txno: usize, vout: usize) -> String {
        keys::height_txno_vout(height, txno, vout)
    }
}

impl Model for OraclePriceAggregated {
    const TABLE: &'static str = "oracle_price_aggregated";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(self.key.clone(), self.sort.clone()))
    }
}

/// Latest aggregate of every priced pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTicker {
    pub id: String,
    pub price: OraclePriceAggregated,
}

impl PriceTicker {
    pub const PARTITION: &'static str = "ticker";
}

impl Model for PriceTicker {
    const TABLE: &'static str = "price_ticker";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(Self::PARTITION, self.id.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePrice {
    pub amount: BigDecimal,
    pub weightage: u32,
    pub oracles: OracleCount,
}

impl From<&AggregatedPrice> for ActivePrice {
    fn from(aggregated: &AggregatedPrice) -> Self {
        Self {
            amount: aggregated.amount.clone(),
            weightage: aggregated.weightage,
            oracles: aggregated.oracles,
        }
    }
}

/// Settled active/next price of a pair at one settlement height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OraclePriceActive {
    pub id: String,
    pub key: String,
    pub sort: String,
    pub active: Option<ActivePrice>,
    pub next: Option<ActivePrice>,
    pub is_live: bool,
    pub block: BlockContext,
}

impl OraclePriceActive {
    pub fn make_id(pair_key: &str, height: u32) -> String {
        format!("{pair_key}-{height}")
    }
}

impl Model for OraclePriceActive {
    const TABLE: &'static str = "oracle_price_active";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(self.key.clone(), self.sort.clone()))
    }
}
