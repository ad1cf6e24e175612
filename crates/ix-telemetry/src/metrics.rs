//! Prometheus metrics for the indexer.
//!
//! Naming: `ix_<metric>_<unit>`.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref BLOCKS_INDEXED: Counter = Counter::new(
        "ix_blocks_indexed_total",
        "Total number of blocks indexed"
    ).expect("metric creation failed");

    pub static ref BLOCKS_INVALIDATED: Counter = Counter::new(
        "ix_blocks_invalidated_total",
        "Total number of blocks invalidated"
    ).expect("metric creation failed");

    /// Outputs carrying the DfTx marker that failed to decode
    pub static ref DFTX_DECODE_FAILURES: Counter = Counter::new(
        "ix_dftx_decode_failures_total",
        "Total DfTx outputs skipped because they failed to decode"
    ).expect("metric creation failed");

    pub static ref INDEXING_ERRORS: CounterVec = CounterVec::new(
        Opts::new("ix_indexing_errors_total", "Aborted index or invalidate calls"),
        &["phase"]  // phase: index/invalidate
    ).expect("metric creation failed");

    pub static ref INDEXED_HEIGHT: Gauge = Gauge::new(
        "ix_indexed_height",
        "Height of the indexed tip"
    ).expect("metric creation failed");

    pub static ref BLOCK_INDEX_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "ix_block_index_duration_seconds",
            "Time spent indexing one block"
        ).buckets(exponential_buckets(0.0001, 2.0, 15).expect("valid buckets"))
    ).expect("metric creation failed");
}

/// Keeps the registry alive alongside the telemetry guard.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(BLOCKS_INDEXED.clone()),
        Box::new(BLOCKS_INVALIDATED.clone()),
        Box::new(DFTX_DECODE_FAILURES.clone()),
        Box::new(INDEXING_ERRORS.clone()),
        Box::new(INDEXED_HEIGHT.clone()),
        Box::new(BLOCK_INDEX_DURATION.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Observes elapsed seconds into the histogram on drop.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
