use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use shared_types::BlockContext;
use std::collections::BTreeMap;

use crate::domain::keys;
use crate::domain::model::{IndexKey, Model};

/// Running sum of one dimension and how many events it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accumulated {
    pub amount: BigDecimal,
    pub count: u32,
}

/// Fixed-width time window over one series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateBucket {
    pub id: String,
    pub key: String,
    pub interval: u32,
    pub bucket_start: i64,
    pub aggregated: BTreeMap<String, Accumulated>,
    pub count: u32,
    /// Latest contributing block.
    pub block: BlockContext,
}

impl AggregateBucket {
    pub fn partition(series: &str, interval: u32) -> String {
        format!("{series}-{interval}")
    }

    pub fn make_id(series: &str, interval: u32, bucket_start: i64) -> String {
        format!("{series}-{interval}-{bucket_start}")
    }

    /// Mean of a dimension over the bucket's events.
    pub fn average(&self, dimension: &str) -> Option<BigDecimal> {
        let acc = self.aggregated.get(dimension)?;
        if acc.count == 0 {
            return None;
        }
        Some(&acc.amount / BigDecimal::from(acc.count))
    }
}

impl Model for AggregateBucket {
    const TABLE: &'static str = "aggregate_bucket";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(
            Self::partition(&self.key, self.interval),
            keys::timestamp(self.bucket_start),
        ))
    }
}

/// Events one block added to one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketContribution {
    pub id: String,
    pub bucket_id: String,
    pub events: u32,
    pub block: BlockContext,
}

impl BucketContribution {
    pub fn make_id(bucket_id: &str, height: u32) -> String {
        format!("{bucket_id}-{height}")
    }
}

impl Model for BucketContribution {
    const TABLE: &'static str = "bucket_contribution";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn index(&self) -> Option<IndexKey> {
        Some(IndexKey::new(self.bucket_id.clone(), keys::height(self.block.height)))
    }
}
