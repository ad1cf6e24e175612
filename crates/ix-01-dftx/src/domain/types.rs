//! # DfTx Payload Types
//!
//! One struct per custom transaction family, tied together by [`DfTx`].

use bigdecimal::BigDecimal;
use std::fmt;

use crate::domain::errors::DecodeError;

/// Satoshis per coin; amounts carry 8 implied decimals.
pub const COIN: i64 = 100_000_000;

/// One-byte DfTx type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DfTxType {
    AppointOracle = b'o',
    RemoveOracle = b'h',
    UpdateOracle = b't',
    SetOracleData = b'y',
    CreateToken = b'T',
    SetLoanToken = b'g',
    CreatePoolPair = b'p',
    UpdatePoolPair = b'u',
    PoolSwap = b's',
    CompositeSwap = b'i',
    CreateMasternode = b'C',
    ResignMasternode = b'R',
    PlaceAuctionBid = b'I',
}

impl DfTxType {
    pub const ALL: [DfTxType; 13] = [
        DfTxType::AppointOracle,
        DfTxType::RemoveOracle,
        DfTxType::UpdateOracle,
        DfTxType::SetOracleData,
        DfTxType::CreateToken,
        DfTxType::SetLoanToken,
        DfTxType::CreatePoolPair,
        DfTxType::UpdatePoolPair,
        DfTxType::PoolSwap,
        DfTxType::CompositeSwap,
        DfTxType::CreateMasternode,
        DfTxType::ResignMasternode,
        DfTxType::PlaceAuctionBid,
    ];

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            DfTxType::AppointOracle => "AppointOracle",
            DfTxType::RemoveOracle => "RemoveOracle",
            DfTxType::UpdateOracle => "UpdateOracle",
            DfTxType::SetOracleData => "SetOracleData",
            DfTxType::CreateToken => "CreateToken",
            DfTxType::SetLoanToken => "SetLoanToken",
            DfTxType::CreatePoolPair => "CreatePoolPair",
            DfTxType::UpdatePoolPair => "UpdatePoolPair",
            DfTxType::PoolSwap => "PoolSwap",
            DfTxType::CompositeSwap => "CompositeSwap",
            DfTxType::CreateMasternode => "CreateMasternode",
            DfTxType::ResignMasternode => "ResignMasternode",
            DfTxType::PlaceAuctionBid => "PlaceAuctionBid",
        }
    }
}

impl TryFrom<u8> for DfTxType {
    type Error = DecodeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        DfTxType::ALL
            .iter()
            .copied()
            .find(|t| t.as_byte() == byte)
            .ok_or(DecodeError::UnknownType(byte))
    }
}

impl fmt::Display for DfTxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-point amount as carried on the wire (8 implied decimals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Amount(pub i64);

impl Amount {
    pub fn from_sats(sats: i64) -> Self {
        Amount(sats)
    }

    /// Whole coins, mostly for fixtures.
    pub fn from_coins(coins: i64) -> Self {
        Amount(coins * COIN)
    }

    pub fn sats(self) -> i64 {
        self.0
    }

    /// Exact decimal view with scale 8.
    pub fn to_decimal(self) -> BigDecimal {
        (BigDecimal::from(self.0) / BigDecimal::from(COIN)).with_scale(8)
    }
}

/// Raw script bytes embedded in a payload (owner addresses and the like).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script(pub Vec<u8>);

impl Script {
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 32-byte hash stored little-endian on the wire, displayed reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    /// Conventional big-endian hex (txid form).
    pub fn to_hex(&self) -> String {
        let mut bytes = self.0;
        bytes.reverse();
        hex::encode(bytes)
    }

    /// Parse the conventional txid form.
    pub fn from_hex(s: &str) -> Result<Self, DecodeError> {
        let decoded = hex::decode(s).map_err(|e| DecodeError::InvalidHex(e.to_string()))?;
        let mut bytes: [u8; 32] = decoded
            .try_into()
            .map_err(|_| DecodeError::InvalidHex(format!("expected 32 bytes in {s}")))?;
        bytes.reverse();
        Ok(Hash32(bytes))
    }
}

/// Token/currency pair an oracle declares it will price.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyPair {
    pub token: String,
    pub currency: String,
}

impl CurrencyPair {
    pub fn new(token: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            currency: currency.into(),
        }
    }

    /// `TOKEN-CURRENCY`
    pub fn key(&self) -> String {
        format!("{}-{}", self.token, self.currency)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyAmount {
    pub currency: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPrice {
    pub token: String,
    pub prices: Vec<CurrencyAmount>,
}

/// Token id with an amount; token encoded as `VARINT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    pub token: u32,
    pub amount: Amount,
}

/// Token id with an amount; token encoded as fixed `u32`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAmount {
    pub token: u32,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointOracle {
    pub script: Script,
    pub weightage: u8,
    pub price_feeds: Vec<CurrencyPair>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOracle {
    pub oracle_id: Hash32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOracle {
    pub oracle_id: Hash32,
    pub script: Script,
    pub weightage: u8,
    pub price_feeds: Vec<CurrencyPair>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOracleData {
    pub oracle_id: Hash32,
    pub timestamp: i64,
    pub token_prices: Vec<TokenPrice>,
}

impl SetOracleData {
    /// Every reported (pair, amount) in payload order.
    pub fn observations(&self) -> impl Iterator<Item = (CurrencyPair, Amount)> + '_ {
        self.token_prices.iter().flat_map(|tp| {
            tp.prices
                .iter()
                .map(move |p| (CurrencyPair::new(&tp.token, &p.currency), p.amount))
        })
    }

    /// Distinct pairs in first-seen order.
    pub fn pairs(&self) -> Vec<CurrencyPair> {
        let mut pairs: Vec<CurrencyPair> = Vec::new();
        for (pair, _) in self.observations() {
            if !pairs.contains(&pair) {
                pairs.push(pair);
            }
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateToken {
    pub symbol: String,
    pub name: String,
    pub decimal: u8,
    pub limit: Amount,
    pub flags: u8,
}

impl CreateToken {
    pub const FLAG_MINTABLE: u8 = 0x01;
    pub const FLAG_TRADEABLE: u8 = 0x02;
    pub const FLAG_DAT: u8 = 0x04;
    pub const FLAG_LPS: u8 = 0x08;
    pub const FLAG_FINALIZED: u8 = 0x10;
    pub const FLAG_LOAN_TOKEN: u8 = 0x20;

    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    pub fn is_dat(&self) -> bool {
        self.has_flag(Self::FLAG_DAT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetLoanToken {
    pub symbol: String,
    pub name: String,
    pub currency_pair: CurrencyPair,
    pub mintable: bool,
    pub interest: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePoolPair {
    pub token_a: u32,
    pub token_b: u32,
    pub commission: Amount,
    pub owner_address: Script,
    pub status: bool,
    pub pair_symbol: String,
    pub custom_rewards: Vec<TokenBalance>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePoolPair {
    pub pool_id: u32,
    pub status: bool,
    pub commission: Amount,
    pub owner_address: Script,
    pub custom_rewards: Vec<TokenBalance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaxPrice {
    pub integer: i64,
    pub fraction: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSwap {
    pub from_script: Script,
    pub from_token_id: u32,
    pub from_amount: Amount,
    pub to_script: Script,
    pub to_token_id: u32,
    pub max_price: MaxPrice,
}

/// Multi-hop swap; an empty `pools` list means "route via the pair bridge".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeSwap {
    pub pool_swap: PoolSwap,
    pub pools: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMasternode {
    pub operator_type: u8,
    pub operator_pub_key_hash: [u8; 20],
    pub timelock: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResignMasternode {
    pub node_id: Hash32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceAuctionBid {
    pub vault_id: Hash32,
    pub index: u32,
    pub from: Script,
    pub token_amount: TokenAmount,
}

/// Decoded custom transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DfTx {
    AppointOracle(AppointOracle),
    RemoveOracle(RemoveOracle),
    UpdateOracle(UpdateOracle),
    SetOracleData(SetOracleData),
    CreateToken(CreateToken),
    SetLoanToken(SetLoanToken),
    CreatePoolPair(CreatePoolPair),
    UpdatePoolPair(UpdatePoolPair),
    PoolSwap(PoolSwap),
    CompositeSwap(CompositeSwap),
    CreateMasternode(CreateMasternode),
    ResignMasternode(ResignMasternode),
    PlaceAuctionBid(PlaceAuctionBid),
}

impl DfTx {
    pub fn tx_type(&self) -> DfTxType {
        match self {
            DfTx::AppointOracle(_) => DfTxType::AppointOracle,
            DfTx::RemoveOracle(_) => DfTxType::RemoveOracle,
            DfTx::UpdateOracle(_) => DfTxType::UpdateOracle,
            DfTx::SetOracleData(_) => DfTxType::SetOracleData,
            DfTx::CreateToken(_) => DfTxType::CreateToken,
            DfTx::SetLoanToken(_) => DfTxType::SetLoanToken,
            DfTx::CreatePoolPair(_) => DfTxType::CreatePoolPair,
            DfTx::UpdatePoolPair(_) => DfTxType::UpdatePoolPair,
            DfTx::PoolSwap(_) => DfTxType::PoolSwap,
            DfTx::CompositeSwap(_) => DfTxType::CompositeSwap,
            DfTx::CreateMasternode(_) => DfTxType::CreateMasternode,
            DfTx::ResignMasternode(_) => DfTxType::ResignMasternode,
            DfTx::PlaceAuctionBid(_) => DfTxType::PlaceAuctionBid,
        }
    }
}
