use serde::{Deserialize, Serialize};
use shared_types::RawBlock;

use crate::domain::keys;
use crate::domain::model::{IndexKey, Model};

/// Indexed block summary, newest last by height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub hash: String,
    pub height: u32,
    pub time: i64,
    pub median_time: i64,
    pub minter_id: Option<String>,
    pub transaction_count: usize,
}

impl Block {
    pub const PARTITION: &'static str = "block";

    pub fn from_raw(raw: &RawBlock) -> Self {
        Self {
            hash: raw.hash.clone(),
            height: raw.height,
            time: raw.time,
            median_time: raw.median_time,
            minter_id: raw.minter_id.clone(),
            transaction_count: raw.transactions.len(),
        }
    }
}

impl Model for Block {
    const TABLE: &'static str = "block";

    fn id(&self) -> String {
        self.hash.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(Self::PARTITION, keys::height(self.height)))
    }
}

/// Raw form of every indexed block, kept so invalidation can replay it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlockRecord {
    pub block: RawBlock,
}

impl RawBlockRecord {
    pub const PARTITION: &'static str = "raw";
}

impl Model for RawBlockRecord {
    const TABLE: &'static str = "raw_block";

    fn id(&self) -> String {
        self.block.hash.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(Self::PARTITION, keys::height(self.block.height)))
    }
}
