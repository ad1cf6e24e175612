use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use shared_types::BlockContext;

use crate::domain::keys;
use crate::domain::model::{IndexKey, Model};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasternodeResign {
    pub txid: String,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Masternode {
    pub id: String,
    pub sort: String,
    pub owner_address: String,
    pub operator_address: String,
    pub operator_type: u8,
    pub collateral: BigDecimal,
    pub timelock: u16,
    pub minted_blocks: u32,
    pub resign: Option<MasternodeResign>,
    pub block: BlockContext,
}

impl Masternode {
    pub const PARTITION: &'static str = "masternode";

    pub fn make_sort(height: u32, txid: &str) -> String {
        keys::height_txid(height, txid)
    }
}

impl Model for Masternode {
    const TABLE: &'static str = "masternode";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(Self::PARTITION, self.sort.clone()))
    }
}
