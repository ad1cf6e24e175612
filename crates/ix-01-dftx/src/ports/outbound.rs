//! # Outbound Ports (Driven Ports)
//!
//! Where the extractor reports outputs it had to skip.

use parking_lot::Mutex;

use crate::domain::errors::DecodeError;

/// One skipped output.
#[derive(Debug, Clone, Copy)]
pub struct DecodeFailure<'a> {
    pub txid: &'a str,
    pub tx_index: usize,
    pub output_index: usize,
    pub error: &'a DecodeError,
}

/// Receives decode failures. Reporting is data, never control flow: the
/// extractor carries on with the next output whatever the sink does.
pub trait DecodeFailureSink: Send + Sync {
    fn report(&self, failure: &DecodeFailure<'_>);
}

/// Default sink: one `warn!` per skipped output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DecodeFailureSink for TracingSink {
    fn report(&self, failure: &DecodeFailure<'_>) {
        tracing::warn!(
            txid = %failure.txid,
            tx_index = failure.tx_index,
            output_index = failure.output_index,
            error = %failure.error,
            "[ix-01] skipping undecodable DfTx output"
        );
    }
}

/// Keeps every failure in memory, for assertions and diagnostics.
#[derive(Debug, Default)]
pub struct CollectingSink {
    failures: Mutex<Vec<(String, usize, usize, DecodeError)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(txid, tx_index, output_index, error)` in report order.
    pub fn failures(&self) -> Vec<(String, usize, usize, DecodeError)> {
        self.failures.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.failures.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DecodeFailureSink for CollectingSink {
    fn report(&self, failure: &DecodeFailure<'_>) {
        self.failures.lock().push((
            failure.txid.to_string(),
            failure.tx_index,
            failure.output_index,
            failure.error.clone(),
        ));
    }
}
