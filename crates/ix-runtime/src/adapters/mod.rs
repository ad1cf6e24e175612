//! # Runtime Adapters
//!
//! - `MetricsSink`: decode failure sink feeding the Prometheus counter
//! - `storage`: RocksDB key-value backend (`rocksdb` feature)

pub mod storage;

use ix_01_dftx::{DecodeFailure, DecodeFailureSink, TracingSink};
use ix_telemetry::DFTX_DECODE_FAILURES;

/// Logs like [`TracingSink`] and counts every skipped output.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsSink {
    log: TracingSink,
}

impl DecodeFailureSink for MetricsSink {
    fn report(&self, failure: &DecodeFailure<'_>) {
        self.log.report(failure);
        ix_telemetry::metric_inc!(DFTX_DECODE_FAILURES);
    }
}
