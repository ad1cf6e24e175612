//! # Shared Fixtures
//!
//! Blocks are built from typed payloads and encoded with the real script
//! codec, so every scenario also exercises extraction.

use ix_01_dftx::{
    encode_script, Amount, AppointOracle, CompositeSwap, CreateMasternode, CreatePoolPair,
    CreateToken, CurrencyAmount, CurrencyPair, DfTx, Hash32, MaxPrice, PlaceAuctionBid, PoolSwap,
    RemoveOracle, Script, SetOracleData, TokenAmount, TokenPrice,
};
use ix_02_model_store::{AggregateBucket, Model, ModelStore, TokenIdWatermark};
use ix_03_indexers::{Dispatcher, IndexerConfig};
use shared_types::{RawBlock, RawOutput, RawTransaction};
use std::collections::HashSet;

/// 2023-12-09T00:00:00Z, a day boundary.
pub const DAY_START: i64 = 1_702_080_000;

/// A 64-hex-digit txid that sorts by `n`.
pub fn txid(n: u64) -> String {
    format!("{n:064x}")
}

pub fn block_hash(height: u32) -> String {
    format!("{:064x}", 0xb10c_0000_0000u64 + u64::from(height))
}

/// One transaction whose first output carries `dftx`.
pub fn dftx_tx(txid: impl Into<String>, dftx: &DfTx) -> RawTransaction {
    dftxs_tx(txid, std::slice::from_ref(dftx))
}

/// One transaction with a DfTx output per payload, in order.
pub fn dftxs_tx(txid: impl Into<String>, dftxs: &[DfTx]) -> RawTransaction {
    RawTransaction {
        txid: txid.into(),
        outputs: dftxs
            .iter()
            .map(|dftx| RawOutput::new(hex::encode(encode_script(dftx))))
            .collect(),
    }
}

pub struct BlockBuilder {
    block: RawBlock,
}

impl BlockBuilder {
    /// Block `height`, timed 30 seconds per height after [`DAY_START`].
    pub fn new(height: u32) -> Self {
        let time = DAY_START + i64::from(height) * 30;
        Self {
            block: RawBlock {
                hash: block_hash(height),
                height,
                time,
                median_time: time,
                minter_id: None,
                transactions: Vec::new(),
            },
        }
    }

    pub fn time(mut self, time: i64) -> Self {
        self.block.time = time;
        self.block.median_time = time;
        self
    }

    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.block.hash = hash.into();
        self
    }

    pub fn minter(mut self, masternode: impl Into<String>) -> Self {
        self.block.minter_id = Some(masternode.into());
        self
    }

    pub fn dftx(mut self, txid: impl Into<String>, dftx: DfTx) -> Self {
        self.block.transactions.push(dftx_tx(txid, &dftx));
        self
    }

    pub fn dftxs(mut self, txid: impl Into<String>, dftxs: &[DfTx]) -> Self {
        self.block.transactions.push(dftxs_tx(txid, dftxs));
        self
    }

    pub fn transaction(mut self, transaction: RawTransaction) -> Self {
        self.block.transactions.push(transaction);
        self
    }

    pub fn build(self) -> RawBlock {
        self.block
    }
}

pub fn dispatcher() -> Dispatcher {
    Dispatcher::with_defaults(&IndexerConfig::default())
}

/// Every row except the token id watermark, which only ever rises, and
/// explicit zero buckets.
///
/// Invalidation keeps an emptied bucket as a zero row and a dimension with
/// no events left as a zero entry. Both are dropped here so a state compares
/// equal to the one before the invalidated blocks were indexed.
pub fn rows(store: &ModelStore) -> Vec<(Vec<u8>, Vec<u8>)> {
    let watermark = format!("{}:", <TokenIdWatermark as Model>::TABLE);
    let bucket_row = format!("{}:", <AggregateBucket as Model>::TABLE);
    let bucket_index = format!("{}#", <AggregateBucket as Model>::TABLE);

    let mut empty: HashSet<Vec<u8>> = HashSet::new();
    let mut kept = Vec::new();
    for (key, value) in store.snapshot().expect("snapshot") {
        if key.starts_with(watermark.as_bytes()) {
            continue;
        }
        if key.starts_with(bucket_row.as_bytes()) {
            let mut bucket: AggregateBucket = serde_json::from_slice(&value).expect("bucket row");
            if bucket.count == 0 {
                empty.insert(bucket.id.into_bytes());
                continue;
            }
            let dimensions = bucket.aggregated.len();
            bucket.aggregated.retain(|_, acc| acc.count > 0);
            if bucket.aggregated.len() != dimensions {
                kept.push((key, serde_json::to_vec(&bucket).expect("bucket row")));
                continue;
            }
        }
        kept.push((key, value));
    }
    // Index rows sort before primary rows, so they are filtered afterwards.
    kept.retain(|(key, id)| !(key.starts_with(bucket_index.as_bytes()) && empty.contains(id)));
    kept
}

/// Buckets of one series and interval that hold no events.
pub fn zero_buckets(store: &ModelStore, series: &str, interval: u32) -> Vec<AggregateBucket> {
    store
        .query_all::<AggregateBucket>(&AggregateBucket::partition(series, interval))
        .expect("bucket query")
        .into_iter()
        .filter(|bucket| bucket.count == 0)
        .collect()
}

pub fn oracle_id(txid: &str) -> Hash32 {
    Hash32::from_hex(txid).expect("txid is 32 bytes of hex")
}

pub fn appoint_oracle(weightage: u8, feeds: &[(&str, &str)]) -> DfTx {
    DfTx::AppointOracle(AppointOracle {
        script: Script(vec![0x00, 0x14, weightage]),
        weightage,
        price_feeds: feeds
            .iter()
            .map(|(token, currency)| CurrencyPair::new(*token, *currency))
            .collect(),
    })
}

pub fn remove_oracle(oracle_txid: &str) -> DfTx {
    DfTx::RemoveOracle(RemoveOracle {
        oracle_id: oracle_id(oracle_txid),
    })
}

/// Prices as `(token, currency, satoshis)`, grouped by token in input order.
pub fn set_oracle_data(oracle_txid: &str, timestamp: i64, prices: &[(&str, &str, i64)]) -> DfTx {
    let mut token_prices: Vec<TokenPrice> = Vec::new();
    for (token, currency, sats) in prices {
        let amount = CurrencyAmount {
            currency: currency.to_string(),
            amount: Amount::from_sats(*sats),
        };
        match token_prices.iter_mut().find(|p| p.token == *token) {
            Some(entry) => entry.prices.push(amount),
            None => token_prices.push(TokenPrice {
                token: token.to_string(),
                prices: vec![amount],
            }),
        }
    }
    DfTx::SetOracleData(SetOracleData {
        oracle_id: oracle_id(oracle_txid),
        timestamp,
        token_prices,
    })
}

pub fn create_token(symbol: &str, dat: bool) -> DfTx {
    let mut flags = CreateToken::FLAG_MINTABLE | CreateToken::FLAG_TRADEABLE;
    if dat {
        flags |= CreateToken::FLAG_DAT;
    }
    DfTx::CreateToken(CreateToken {
        symbol: symbol.to_string(),
        name: format!("{symbol} token"),
        decimal: 8,
        limit: Amount::from_coins(0),
        flags,
    })
}

pub fn create_pool_pair(token_a: u32, token_b: u32) -> DfTx {
    DfTx::CreatePoolPair(CreatePoolPair {
        token_a,
        token_b,
        commission: Amount::from_sats(200_000),
        owner_address: Script(vec![0x51]),
        status: true,
        pair_symbol: String::new(),
        custom_rewards: Vec::new(),
    })
}

pub fn swap_payload(from: u32, to: u32, sats: i64) -> PoolSwap {
    PoolSwap {
        from_script: Script(vec![0x00, 0x14, 0x01]),
        from_token_id: from,
        from_amount: Amount::from_sats(sats),
        to_script: Script(vec![0x00, 0x14, 0x02]),
        to_token_id: to,
        max_price: MaxPrice::default(),
    }
}

pub fn pool_swap(from: u32, to: u32, sats: i64) -> DfTx {
    DfTx::PoolSwap(swap_payload(from, to, sats))
}

pub fn composite_swap(from: u32, to: u32, sats: i64, pools: &[u32]) -> DfTx {
    DfTx::CompositeSwap(CompositeSwap {
        pool_swap: swap_payload(from, to, sats),
        pools: pools.to_vec(),
    })
}

pub fn create_masternode() -> DfTx {
    DfTx::CreateMasternode(CreateMasternode {
        operator_type: 1,
        operator_pub_key_hash: [0x22; 20],
        timelock: None,
    })
}

/// Masternode creation: DfTx output, then the collateral output.
pub fn masternode_tx(txid: impl Into<String>) -> RawTransaction {
    let mut tx = dftx_tx(txid, &create_masternode());
    tx.outputs
        .push(RawOutput::new("0014bbbb").with_value(bigdecimal::BigDecimal::from(20_000)));
    tx
}

pub fn place_auction_bid(vault_txid: &str, index: u32, token: u32, sats: i64) -> DfTx {
    DfTx::PlaceAuctionBid(PlaceAuctionBid {
        vault_id: oracle_id(vault_txid),
        index,
        from: Script(vec![0x00, 0x14, 0x03]),
        token_amount: TokenAmount {
            token,
            amount: Amount::from_sats(sats),
        },
    })
}
