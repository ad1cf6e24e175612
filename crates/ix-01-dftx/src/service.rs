//! # Extractor Service
//!
//! Walks a block in (transaction, output) order and yields every decodable
//! DfTx as a [`DfTxRecord`].

use std::sync::Arc;

use shared_types::{RawBlock, RawTransaction};

use crate::codec::decode_script;
use crate::domain::errors::DecodeError;
use crate::domain::types::{DfTx, DfTxType};
use crate::ports::outbound::{DecodeFailure, DecodeFailureSink, TracingSink};

/// A decoded custom transaction, borrowing its transaction from the block.
#[derive(Debug, Clone)]
pub struct DfTxRecord<'b> {
    pub tx_index: usize,
    pub output_index: usize,
    pub transaction: &'b RawTransaction,
    pub dftx: DfTx,
}

impl DfTxRecord<'_> {
    pub fn opcode(&self) -> DfTxType {
        self.dftx.tx_type()
    }

    pub fn txid(&self) -> &str {
        &self.transaction.txid
    }

    /// `{txid}-{output_index}`. A transaction can carry several DfTx
    /// outputs, so rows owned by one record are keyed by this, never by the
    /// txid alone.
    pub fn outpoint(&self) -> String {
        format!("{}-{}", self.transaction.txid, self.output_index)
    }
}

/// Turns blocks into ordered DfTx records.
#[derive(Clone)]
pub struct DfTxExtractor {
    sink: Arc<dyn DecodeFailureSink>,
}

impl Default for DfTxExtractor {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl DfTxExtractor {
    pub fn new(sink: Arc<dyn DecodeFailureSink>) -> Self {
        Self { sink }
    }

    /// Ordered by transaction index, then output index. Undecodable outputs
    /// are reported to the sink and left out.
    pub fn extract<'b>(&self, block: &'b RawBlock) -> Vec<DfTxRecord<'b>> {
        let mut records = Vec::new();

        for (tx_index, transaction) in block.transactions.iter().enumerate() {
            for (output_index, output) in transaction.outputs.iter().enumerate() {
                let decoded = hex::decode(&output.script_hex)
                    .map_err(|e| DecodeError::InvalidHex(e.to_string()))
                    .and_then(|bytes| decode_script(&bytes));

                match decoded {
                    Ok(Some(dftx)) => {
                        tracing::debug!(
                            txid = %transaction.txid,
                            tx_index,
                            output_index,
                            dftx_type = %dftx.tx_type(),
                            "[ix-01] extracted DfTx"
                        );
                        records.push(DfTxRecord {
                            tx_index,
                            output_index,
                            transaction,
                            dftx,
                        });
                    }
                    Ok(None) => {}
                    Err(error) => self.sink.report(&DecodeFailure {
                        txid: &transaction.txid,
                        tx_index,
                        output_index,
                        error: &error,
                    }),
                }
            }
        }

        records
    }
}
