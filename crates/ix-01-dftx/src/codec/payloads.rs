//! Per-family payload layouts.

use super::{Decodable, Encodable, Reader, Writer};
use crate::domain::errors::DecodeError;
use crate::domain::types::*;

pub(super) fn decode_payload(tx_type: DfTxType, r: &mut Reader<'_>) -> Result<DfTx, DecodeError> {
    Ok(match tx_type {
        DfTxType::AppointOracle => DfTx::AppointOracle(AppointOracle::decode(r)?),
        DfTxType::RemoveOracle => DfTx::RemoveOracle(RemoveOracle::decode(r)?),
        DfTxType::UpdateOracle => DfTx::UpdateOracle(UpdateOracle::decode(r)?),
        DfTxType::SetOracleData => DfTx::SetOracleData(SetOracleData::decode(r)?),
        DfTxType::CreateToken => DfTx::CreateToken(CreateToken::decode(r)?),
        DfTxType::SetLoanToken => DfTx::SetLoanToken(SetLoanToken::decode(r)?),
        DfTxType::CreatePoolPair => DfTx::CreatePoolPair(CreatePoolPair::decode(r)?),
        DfTxType::UpdatePoolPair => DfTx::UpdatePoolPair(UpdatePoolPair::decode(r)?),
        DfTxType::PoolSwap => DfTx::PoolSwap(PoolSwap::decode(r)?),
        DfTxType::CompositeSwap => DfTx::CompositeSwap(CompositeSwap::decode(r)?),
        DfTxType::CreateMasternode => DfTx::CreateMasternode(CreateMasternode::decode(r)?),
        DfTxType::ResignMasternode => DfTx::ResignMasternode(ResignMasternode::decode(r)?),
        DfTxType::PlaceAuctionBid => DfTx::PlaceAuctionBid(PlaceAuctionBid::decode(r)?),
    })
}

pub(super) fn encode_payload(dftx: &DfTx, w: &mut Writer) {
    match dftx {
        DfTx::AppointOracle(p) => p.encode(w),
        DfTx::RemoveOracle(p) => p.encode(w),
        DfTx::UpdateOracle(p) => p.encode(w),
        DfTx::SetOracleData(p) => p.encode(w),
        DfTx::CreateToken(p) => p.encode(w),
        DfTx::SetLoanToken(p) => p.encode(w),
        DfTx::CreatePoolPair(p) => p.encode(w),
        DfTx::UpdatePoolPair(p) => p.encode(w),
        DfTx::PoolSwap(p) => p.encode(w),
        DfTx::CompositeSwap(p) => p.encode(w),
        DfTx::CreateMasternode(p) => p.encode(w),
        DfTx::ResignMasternode(p) => p.encode(w),
        DfTx::PlaceAuctionBid(p) => p.encode(w),
    }
}

// =============================================================================
// SHARED ELEMENTS
// =============================================================================

impl Decodable for CurrencyPair {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(CurrencyPair {
            token: r.read_string()?,
            currency: r.read_string()?,
        })
    }
}

impl Encodable for CurrencyPair {
    fn encode(&self, w: &mut Writer) {
        w.write_string(&self.token);
        w.write_string(&self.currency);
    }
}

impl Decodable for CurrencyAmount {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(CurrencyAmount {
            currency: r.read_string()?,
            amount: r.read_amount()?,
        })
    }
}

impl Encodable for CurrencyAmount {
    fn encode(&self, w: &mut Writer) {
        w.write_string(&self.currency);
        w.write_amount(self.amount);
    }
}

impl Decodable for TokenPrice {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(TokenPrice {
            token: r.read_string()?,
            prices: r.read_vec()?,
        })
    }
}

impl Encodable for TokenPrice {
    fn encode(&self, w: &mut Writer) {
        w.write_string(&self.token);
        w.write_vec(&self.prices);
    }
}

impl Decodable for TokenBalance {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(TokenBalance {
            token: r.read_varint_u32()?,
            amount: r.read_amount()?,
        })
    }
}

impl Encodable for TokenBalance {
    fn encode(&self, w: &mut Writer) {
        w.write_varint(self.token as u64);
        w.write_amount(self.amount);
    }
}

impl Decodable for TokenAmount {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(TokenAmount {
            token: r.read_u32()?,
            amount: r.read_amount()?,
        })
    }
}

impl Encodable for TokenAmount {
    fn encode(&self, w: &mut Writer) {
        w.write_u32(self.token);
        w.write_amount(self.amount);
    }
}

struct PoolId(u32);

impl Decodable for PoolId {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(PoolId(r.read_varint_u32()?))
    }
}

// =============================================================================
// ORACLES
// =============================================================================

impl Decodable for AppointOracle {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(AppointOracle {
            script: r.read_script()?,
            weightage: r.read_u8()?,
            price_feeds: r.read_vec()?,
        })
    }
}

impl Encodable for AppointOracle {
    fn encode(&self, w: &mut Writer) {
        w.write_script(&self.script);
        w.write_u8(self.weightage);
        w.write_vec(&self.price_feeds);
    }
}

impl Decodable for RemoveOracle {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(RemoveOracle {
            oracle_id: r.read_hash32()?,
        })
    }
}

impl Encodable for RemoveOracle {
    fn encode(&self, w: &mut Writer) {
        w.write_hash32(&self.oracle_id);
    }
}

impl Decodable for UpdateOracle {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(UpdateOracle {
            oracle_id: r.read_hash32()?,
            script: r.read_script()?,
            weightage: r.read_u8()?,
            price_feeds: r.read_vec()?,
        })
    }
}

impl Encodable for UpdateOracle {
    fn encode(&self, w: &mut Writer) {
        w.write_hash32(&self.oracle_id);
        w.write_script(&self.script);
        w.write_u8(self.weightage);
        w.write_vec(&self.price_feeds);
    }
}

impl Decodable for SetOracleData {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(SetOracleData {
            oracle_id: r.read_hash32()?,
            timestamp: r.read_i64()?,
            token_prices: r.read_vec()?,
        })
    }
}

impl Encodable for SetOracleData {
    fn encode(&self, w: &mut Writer) {
        w.write_hash32(&self.oracle_id);
        w.write_i64(self.timestamp);
        w.write_vec(&self.token_prices);
    }
}

// =============================================================================
// TOKENS
// =============================================================================

impl Decodable for CreateToken {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(CreateToken {
            symbol: r.read_string()?,
            name: r.read_string()?,
            decimal: r.read_u8()?,
            limit: r.read_amount()?,
            flags: r.read_u8()?,
        })
    }
}

impl Encodable for CreateToken {
    fn encode(&self, w: &mut Writer) {
        w.write_string(&self.symbol);
        w.write_string(&self.name);
        w.write_u8(self.decimal);
        w.write_amount(self.limit);
        w.write_u8(self.flags);
    }
}

impl Decodable for SetLoanToken {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(SetLoanToken {
            symbol: r.read_string()?,
            name: r.read_string()?,
            currency_pair: CurrencyPair::decode(r)?,
            mintable: r.read_bool()?,
            interest: r.read_amount()?,
        })
    }
}

impl Encodable for SetLoanToken {
    fn encode(&self, w: &mut Writer) {
        w.write_string(&self.symbol);
        w.write_string(&self.name);
        self.currency_pair.encode(w);
        w.write_bool(self.mintable);
        w.write_amount(self.interest);
    }
}

// =============================================================================
// POOL PAIRS AND SWAPS
// =============================================================================

impl Decodable for CreatePoolPair {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(CreatePoolPair {
            token_a: r.read_varint_u32()?,
            token_b: r.read_varint_u32()?,
            commission: r.read_amount()?,
            owner_address: r.read_script()?,
            status: r.read_bool()?,
            pair_symbol: r.read_string()?,
            custom_rewards: r.read_vec()?,
        })
    }
}

impl Encodable for CreatePoolPair {
    fn encode(&self, w: &mut Writer) {
        w.write_varint(self.token_a as u64);
        w.write_varint(self.token_b as u64);
        w.write_amount(self.commission);
        w.write_script(&self.owner_address);
        w.write_bool(self.status);
        w.write_string(&self.pair_symbol);
        w.write_vec(&self.custom_rewards);
    }
}

impl Decodable for UpdatePoolPair {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(UpdatePoolPair {
            pool_id: r.read_varint_u32()?,
            status: r.read_bool()?,
            commission: r.read_amount()?,
            owner_address: r.read_script()?,
            custom_rewards: r.read_vec()?,
        })
    }
}

impl Encodable for UpdatePoolPair {
    fn encode(&self, w: &mut Writer) {
        w.write_varint(self.pool_id as u64);
        w.write_bool(self.status);
        w.write_amount(self.commission);
        w.write_script(&self.owner_address);
        w.write_vec(&self.custom_rewards);
    }
}

impl Decodable for PoolSwap {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(PoolSwap {
            from_script: r.read_script()?,
            from_token_id: r.read_varint_u32()?,
            from_amount: r.read_amount()?,
            to_script: r.read_script()?,
            to_token_id: r.read_varint_u32()?,
            max_price: MaxPrice {
                integer: r.read_i64()?,
                fraction: r.read_i64()?,
            },
        })
    }
}

impl Encodable for PoolSwap {
    fn encode(&self, w: &mut Writer) {
        w.write_script(&self.from_script);
        w.write_varint(self.from_token_id as u64);
        w.write_amount(self.from_amount);
        w.write_script(&self.to_script);
        w.write_varint(self.to_token_id as u64);
        w.write_i64(self.max_price.integer);
        w.write_i64(self.max_price.fraction);
    }
}

impl Decodable for CompositeSwap {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let pool_swap = PoolSwap::decode(r)?;
        let pools: Vec<PoolId> = r.read_vec()?;
        Ok(CompositeSwap {
            pool_swap,
            pools: pools.into_iter().map(|p| p.0).collect(),
        })
    }
}

impl Encodable for CompositeSwap {
    fn encode(&self, w: &mut Writer) {
        self.pool_swap.encode(w);
        w.write_compact_size(self.pools.len() as u64);
        for pool in &self.pools {
            w.write_varint(*pool as u64);
        }
    }
}

// =============================================================================
// MASTERNODES AND AUCTIONS
// =============================================================================

impl Decodable for CreateMasternode {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let operator_type = r.read_u8()?;
        let mut operator_pub_key_hash = [0u8; 20];
        operator_pub_key_hash.copy_from_slice(r.read_bytes(20)?);
        // Timelock is only present on newer masternodes.
        let timelock = if r.is_empty() { None } else { Some(r.read_u16()?) };
        Ok(CreateMasternode {
            operator_type,
            operator_pub_key_hash,
            timelock,
        })
    }
}

impl Encodable for CreateMasternode {
    fn encode(&self, w: &mut Writer) {
        w.write_u8(self.operator_type);
        w.write_bytes(&self.operator_pub_key_hash);
        if let Some(timelock) = self.timelock {
            w.write_u16(timelock);
        }
    }
}

impl Decodable for ResignMasternode {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(ResignMasternode {
            node_id: r.read_hash32()?,
        })
    }
}

impl Encodable for ResignMasternode {
    fn encode(&self, w: &mut Writer) {
        w.write_hash32(&self.node_id);
    }
}

impl Decodable for PlaceAuctionBid {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(PlaceAuctionBid {
            vault_id: r.read_hash32()?,
            index: r.read_u32()?,
            from: r.read_script()?,
            token_amount: TokenAmount::decode(r)?,
        })
    }
}

impl Encodable for PlaceAuctionBid {
    fn encode(&self, w: &mut Writer) {
        w.write_hash32(&self.vault_id);
        w.write_u32(self.index);
        w.write_script(&self.from);
        self.token_amount.encode(w);
    }
}
