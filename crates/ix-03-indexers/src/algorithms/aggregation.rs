//! # Reversible Time-Bucket Aggregation
//!
//! Buckets accumulate per-dimension sums and counts for a series over a fixed
//! interval. Every [`add`] has an exact [`subtract`]: amounts are kept at
//! scale 8 so a value added and removed leaves the accumulator bit-identical.
//!
//! Each block that touches a bucket owns a [`BucketContribution`] row. It
//! counts the block's events in the bucket and lets provenance be restored
//! to the latest remaining contributor when a block is invalidated.

use bigdecimal::BigDecimal;
use ix_02_model_store::{Accumulated, AggregateBucket, BucketContribution, ModelStore};
use shared_types::BlockContext;
use std::collections::BTreeMap;

use crate::domain::errors::IndexingError;

/// Fixed scale of accumulated amounts.
pub const AMOUNT_SCALE: i64 = 8;

/// Start of the bucket containing `time`, floored even for negative times.
pub fn bucket_start(time: i64, interval: u32) -> i64 {
    let interval = i64::from(interval);
    time.div_euclid(interval) * interval
}

/// One dimension of a bucket event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub dimension: String,
    pub amount: BigDecimal,
}

impl Contribution {
    pub fn new(dimension: impl Into<String>, amount: BigDecimal) -> Self {
        Self {
            dimension: dimension.into(),
            amount,
        }
    }
}

/// What happens to a bucket once its last contribution is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyBucketPolicy {
    /// Delete the bucket, restoring the pre-index state exactly.
    Prune,
    /// Keep an explicit zero row so series show a zero, not a gap.
    #[default]
    Retain,
}

impl EmptyBucketPolicy {
    pub fn from_flag(retain_empty_buckets: bool) -> Self {
        if retain_empty_buckets {
            EmptyBucketPolicy::Retain
        } else {
            EmptyBucketPolicy::Prune
        }
    }
}

/// Add one event, timed at `time`, into the `interval` bucket of `series`.
pub fn add(
    store: &mut ModelStore,
    block: &BlockContext,
    series: &str,
    interval: u32,
    time: i64,
    contributions: &[Contribution],
) -> Result<(), IndexingError> {
    let start = bucket_start(time, interval);
    let id = AggregateBucket::make_id(series, interval, start);

    let mut bucket = match store.get::<AggregateBucket>(&id)? {
        Some(bucket) => bucket,
        None => AggregateBucket {
            id: id.clone(),
            key: series.to_string(),
            interval,
            bucket_start: start,
            aggregated: BTreeMap::new(),
            count: 0,
            block: block.clone(),
        },
    };

    for c in contributions {
        let acc = bucket
            .aggregated
            .entry(c.dimension.clone())
            .or_insert_with(|| Accumulated {
                amount: BigDecimal::from(0).with_scale(AMOUNT_SCALE),
                count: 0,
            });
        acc.amount = (&acc.amount + &c.amount).with_scale(AMOUNT_SCALE);
        acc.count += 1;
    }
    bucket.count += 1;
    bucket.block = block.clone();
    store.put(&bucket)?;

    let contribution_id = BucketContribution::make_id(&id, block.height);
    let contribution = match store.get::<BucketContribution>(&contribution_id)? {
        Some(mut existing) => {
            existing.events += 1;
            existing
        }
        None => BucketContribution {
            id: contribution_id,
            bucket_id: id,
            events: 1,
            block: block.clone(),
        },
    };
    store.put(&contribution)?;
    Ok(())
}

/// Exact inverse of [`add`] with the same arguments.
pub fn subtract(
    store: &mut ModelStore,
    block: &BlockContext,
    series: &str,
    interval: u32,
    time: i64,
    contributions: &[Contribution],
    policy: EmptyBucketPolicy,
) -> Result<(), IndexingError> {
    let start = bucket_start(time, interval);
    let id = AggregateBucket::make_id(series, interval, start);
    let missing = |dimension: &str| IndexingError::BucketMissing {
        id: id.clone(),
        dimension: dimension.to_string(),
    };

    let mut bucket = store
        .get::<AggregateBucket>(&id)?
        .ok_or_else(|| missing(""))?;

    for c in contributions {
        let acc = bucket
            .aggregated
            .get_mut(&c.dimension)
            .ok_or_else(|| missing(&c.dimension))?;
        acc.amount = (&acc.amount - &c.amount).with_scale(AMOUNT_SCALE);
        acc.count = acc.count.saturating_sub(1);
        if acc.count == 0 && policy == EmptyBucketPolicy::Prune {
            bucket.aggregated.remove(&c.dimension);
        }
    }
    bucket.count = bucket.count.saturating_sub(1);

    let contribution_id = BucketContribution::make_id(&id, block.height);
    if let Some(mut contribution) = store.get::<BucketContribution>(&contribution_id)? {
        contribution.events = contribution.events.saturating_sub(1);
        if contribution.events == 0 {
            store.delete::<BucketContribution>(&contribution_id)?;
        } else {
            store.put(&contribution)?;
        }
    }

    match store.latest::<BucketContribution>(&id)? {
        Some(latest) => {
            bucket.block = latest.block;
            store.put(&bucket)?;
        }
        None => match policy {
            EmptyBucketPolicy::Retain => store.put(&bucket)?,
            EmptyBucketPolicy::Prune => store.delete::<AggregateBucket>(&id)?,
        },
    }
    Ok(())
}
