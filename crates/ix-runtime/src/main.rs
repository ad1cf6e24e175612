//! # Indexer Runtime Binary
//!
//! Replays a JSON-lines block feed (stdin or `IX_BLOCK_FEED`) through the
//! default indexer registry. Exits non-zero on the first failing event.

use std::fs::File;
use std::io::{self, BufReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use ix_01_dftx::DfTxExtractor;
use ix_03_indexers::{Dispatcher, IndexerRegistry};
use ix_runtime::{
    open_store, FeedReader, FeedSource, MetricsSink, ReplaySummary, Replayer, RuntimeConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("invalid configuration")?;
    let _telemetry =
        ix_telemetry::init_telemetry(&config.telemetry).context("failed to init telemetry")?;

    tracing::info!(
        backend = %config.backend,
        data_dir = ?config.data_dir,
        feed = ?config.feed,
        "[ix-runtime] starting DfTx indexer"
    );

    let store = open_store(&config)?;
    let registry = IndexerRegistry::with_defaults(&config.indexer);
    tracing::info!(indexers = ?registry.names(), "[ix-runtime] registry built");
    let dispatcher = Dispatcher::new(registry, DfTxExtractor::new(Arc::new(MetricsSink::default())));
    let mut replayer = Replayer::new(dispatcher, store);

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    let feed = config.feed.clone();
    let mut task = tokio::task::spawn_blocking(move || -> Result<ReplaySummary> {
        let summary = match feed {
            FeedSource::Stdin => replayer.run(FeedReader::new(io::stdin().lock()), &flag),
            FeedSource::File(path) => {
                let file = File::open(&path)
                    .with_context(|| format!("failed to open block feed {}", path.display()))?;
                replayer.run(FeedReader::new(BufReader::new(file)), &flag)
            }
        };
        summary.map_err(|error| {
            if error.is_fatal() {
                anyhow::Error::new(error).context("index is inconsistent with the feed, rebuild required")
            } else {
                anyhow::Error::new(error)
            }
        })
    });

    let summary = tokio::select! {
        joined = &mut task => joined.context("replay task panicked")??,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("[ix-runtime] ctrl-c received, finishing current event");
            shutdown.store(true, Ordering::SeqCst);
            task.await.context("replay task panicked")??
        }
    };

    match ix_telemetry::encode_metrics() {
        Ok(text) => tracing::debug!(metrics = %text, "[ix-runtime] final metrics"),
        Err(error) => tracing::warn!(%error, "[ix-runtime] failed to encode metrics"),
    }
    tracing::info!(
        indexed = summary.indexed,
        invalidated = summary.invalidated,
        tip = ?summary.tip_height,
        interrupted = summary.interrupted,
        "[ix-runtime] stopped"
    );
    Ok(())
}
