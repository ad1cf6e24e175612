use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use shared_types::BlockContext;

use crate::domain::keys;
use crate::domain::model::{IndexKey, Model};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPairTokenRef {
    pub id: u32,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomReward {
    pub token: u32,
    pub amount: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPairCreation {
    pub txid: String,
    pub height: u32,
}

/// One version of a pool pair; the latest by sort key is current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPair {
    pub id: String,
    pub pool_pair_id: u32,
    pub sort: String,
    pub pair_symbol: String,
    pub name: String,
    pub token_a: PoolPairTokenRef,
    pub token_b: PoolPairTokenRef,
    pub status: bool,
    pub commission: BigDecimal,
    pub owner_address: String,
    pub custom_rewards: Vec<CustomReward>,
    pub creation: PoolPairCreation,
    pub txid: String,
    pub block: BlockContext,
}

impl PoolPair {
    pub fn make_id(pool_pair_id: u32, height: u32, txno: usize, vout: usize) -> String {
        format!("{pool_pair_id}-{height}-{txno}-{vout}")
    }

    pub fn make_sort(height: u32, txno: usize, vout: usize) -> String {
        keys::height_txno_vout(height, txno, vout)
    }

    /// Token on the other side of the pool, if `token` is in it at all.
    pub fn other_side(&self, token: u32) -> Option<u32> {
        if self.token_a.id == token {
            Some(self.token_b.id)
        } else if self.token_b.id == token {
            Some(self.token_a.id)
        } else {
            None
        }
    }
}

impl Model for PoolPair {
    const TABLE: &'static str = "pool_pair";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(self.pool_pair_id.to_string(), self.sort.clone()))
    }
}

/// Token pair to pool bridge used for implicit swap routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPairToken {
    pub id: String,
    pub pool_pair_id: u32,
    pub txid: String,
    pub block: BlockContext,
}

impl PoolPairToken {
    /// Order-independent key of a token pair.
    pub fn make_id(token_a: u32, token_b: u32) -> String {
        let (low, high) = if token_a <= token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        format!("{low}-{high}")
    }
}

impl Model for PoolPairToken {
    const TABLE: &'static str = "pool_pair_token";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        None
    }
}

/// One hop of a swap through a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSwap {
    pub id: String,
    pub txid: String,
    pub txno: usize,
    pub vout: usize,
    pub hop: usize,
    pub pool_pair_id: u32,
    pub sort: String,
    pub from_token_id: u32,
    pub from_amount: BigDecimal,
    pub block: BlockContext,
}

impl PoolSwap {
    /// `outpoint` is the `{txid}-{vout}` of the swapping output.
    pub fn make_id(pool_pair_id: u32, outpoint: &str, hop: usize) -> String {
        format!("{pool_pair_id}-{outpoint}-{hop}")
    }

    pub fn make_sort(height: u32, txno: usize, vout: usize, hop: usize) -> String {
        format!("{}{:04x}", keys::height_txno_vout(height, txno, vout), hop as u16)
    }
}

impl Model for PoolSwap {
    const TABLE: &'static str = "pool_swap";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(self.pool_pair_id.to_string(), self.sort.clone()))
    }
}
