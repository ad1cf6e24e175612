use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use shared_types::BlockContext;

use crate::domain::keys;
use crate::domain::model::{IndexKey, Model};

/// One bid on a vault auction batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultAuctionBatchHistory {
    pub id: String,
    pub key: String,
    pub sort: String,
    pub vault_id: String,
    pub index: u32,
    pub from: String,
    pub token_id: u32,
    pub amount: BigDecimal,
    pub txid: String,
    pub block: BlockContext,
}

impl VaultAuctionBatchHistory {
    pub fn partition(vault_id: &str, index: u32) -> String {
        format!("{vault_id}-{index}")
    }

    /// `outpoint` is the `{txid}-{vout}` of the bidding output.
    pub fn make_id(vault_id: &str, index: u32, outpoint: &str) -> String {
        format!("{vault_id}-{index}-{outpoint}")
    }

    pub fn make_sort(height: u32, txid: &str, vout: usize) -> String {
        format!("{}-{:08x}", keys::height_txid(height, txid), vout as u32)
    }
}

impl Model for VaultAuctionBatchHistory {
    const TABLE: &'static str = "vault_auction_history";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(self.key.clone(), self.sort.clone()))
    }
}
