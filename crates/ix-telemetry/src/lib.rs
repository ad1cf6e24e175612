//! # Indexer Telemetry
//!
//! Logging and metrics for the indexer process.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ix_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `IX_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directive |
//! | `IX_JSON_LOGS` | `false` | One JSON object per log line |
//! | `IX_SERVICE_NAME` | `dftx-index` | Service name attached to startup log |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, MetricsHandle, BLOCKS_INDEXED,
    BLOCKS_INVALIDATED, BLOCK_INDEX_DURATION, DFTX_DECODE_FAILURES, INDEXED_HEIGHT,
    INDEXING_ERRORS,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Install the log subscriber and register all metrics.
///
/// Hold the returned guard for the lifetime of the process.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    init_logging(config)?;
    let metrics = register_metrics()?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "[ix-telemetry] telemetry initialized"
    );
    Ok(TelemetryGuard { _metrics: metrics })
}

pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("[ix-telemetry] shutting down telemetry");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
