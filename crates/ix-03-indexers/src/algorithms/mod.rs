//! Pure-ish helpers shared by several indexers.

pub mod aggregation;
pub mod oracle_math;
pub mod token_id;
