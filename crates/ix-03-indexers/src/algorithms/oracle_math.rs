//! # Oracle Price Weighting
//!
//! Weighted mean over the active oracles of a pair, and the liveness rule
//! applied when active prices settle.

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use ix_02_model_store::{
    ActivePrice, AggregatedPrice, ModelStore, OracleCount, OraclePriceFeed, OracleTokenCurrency,
    ScanOrder,
};

use crate::domain::errors::IndexingError;

/// Fractional digits of every aggregated price.
pub const PRICE_SCALE: i64 = 8;

/// Σ(weight × price) / Σ(weight), rounded half-up to 8 digits.
///
/// `None` when the total weight is zero.
pub fn weighted_mean(observations: &[(u32, BigDecimal)]) -> Option<BigDecimal> {
    let total_weight: u64 = observations.iter().map(|(w, _)| u64::from(*w)).sum();
    if total_weight == 0 {
        return None;
    }

    let weighted_sum = observations
        .iter()
        .fold(BigDecimal::zero(), |acc, (w, price)| acc + BigDecimal::from(*w) * price);

    Some((weighted_sum / BigDecimal::from(total_weight)).with_scale_round(PRICE_SCALE, RoundingMode::HalfUp))
}

/// Aggregate the latest fresh report of every weighted oracle on `pair_key`.
///
/// Returns `None` when no oracle is active.
pub fn aggregate_pair(
    store: &ModelStore,
    pair_key: &str,
    block_time: i64,
    freshness_secs: i64,
) -> Result<Option<AggregatedPrice>, IndexingError> {
    let oracles = store.query_all::<OracleTokenCurrency>(pair_key)?;
    let total = oracles.len() as u32;

    let mut observations = Vec::new();
    for oracle in &oracles {
        if oracle.weightage == 0 {
            continue;
        }
        let partition = OraclePriceFeed::partition(pair_key, &oracle.oracle_id);
        let Some(feed) = store
            .query::<OraclePriceFeed>(&partition, 1, ScanOrder::Descending, None)?
            .into_iter()
            .next()
        else {
            continue;
        };
        if (feed.time - block_time).abs() > freshness_secs {
            continue;
        }
        observations.push((u32::from(oracle.weightage), feed.amount));
    }

    let Some(amount) = weighted_mean(&observations) else {
        return Ok(None);
    };
    Ok(Some(AggregatedPrice {
        amount,
        weightage: observations.iter().map(|(w, _)| *w).sum(),
        oracles: OracleCount {
            active: observations.len() as u32,
            total,
        },
    }))
}

/// Live iff both prices exist, are positive and `|next - active|` stays
/// strictly below `active × threshold`.
pub fn is_live(
    active: Option<&ActivePrice>,
    next: Option<&ActivePrice>,
    threshold: &BigDecimal,
) -> bool {
    let (Some(active), Some(next)) = (active, next) else {
        return false;
    };
    let zero = BigDecimal::zero();
    if active.amount <= zero || next.amount <= zero {
        return false;
    }
    (&next.amount - &active.amount).abs() < &active.amount * threshold
}
