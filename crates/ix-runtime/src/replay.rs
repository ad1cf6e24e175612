//! # Replay Loop
//!
//! Applies feed events to the store one at a time. The first failing event
//! stops the replay: a retry has to start from that event, and fatal errors
//! mean the store no longer matches the feed at all.

use ix_02_model_store::ModelStore;
use ix_03_indexers::{Dispatcher, IndexingError};
use ix_telemetry::{
    log_block_event, metric_inc, HistogramTimer, BLOCKS_INDEXED, BLOCKS_INVALIDATED,
    BLOCK_INDEX_DURATION, INDEXED_HEIGHT, INDEXING_ERRORS,
};
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

use crate::feed::{FeedError, FeedEvent, FeedReader};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("feed line {line}: {source}")]
    Indexing {
        line: usize,
        #[source]
        source: IndexingError,
    },
}

impl ReplayError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReplayError::Indexing { source, .. } if source.is_fatal())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub indexed: u64,
    pub invalidated: u64,
    pub tip_height: Option<u32>,
    /// The feed was cut short by a shutdown request.
    pub interrupted: bool,
}

pub struct Replayer {
    dispatcher: Dispatcher,
    store: ModelStore,
}

impl Replayer {
    pub fn new(dispatcher: Dispatcher, store: ModelStore) -> Self {
        Self { dispatcher, store }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn into_store(self) -> ModelStore {
        self.store
    }

    /// Apply one event, recording metrics either way.
    pub fn apply(&mut self, event: &FeedEvent) -> Result<(), IndexingError> {
        let (phase, result) = match event {
            FeedEvent::Index(block) => {
                let _timer = HistogramTimer::new(&BLOCK_INDEX_DURATION);
                ("index", self.dispatcher.index(&mut self.store, block))
            }
            FeedEvent::Invalidate(hash) => {
                ("invalidate", self.dispatcher.invalidate(&mut self.store, hash))
            }
        };

        if let Err(error) = &result {
            metric_inc!(INDEXING_ERRORS, &[phase]);
            if error.is_fatal() {
                tracing::error!(phase, %error, "[ix-runtime] fatal: store and feed disagree");
            } else {
                tracing::error!(phase, %error, "[ix-runtime] event aborted, retry from this event");
            }
            return result;
        }

        let height = Dispatcher::tip(&self.store)?.map_or(0, |(height, _)| height);
        INDEXED_HEIGHT.set(f64::from(height));
        match event {
            FeedEvent::Index(block) => {
                metric_inc!(BLOCKS_INDEXED);
                log_block_event!(debug, "[ix-runtime] block indexed", block.height, block.hash);
            }
            FeedEvent::Invalidate(hash) => {
                metric_inc!(BLOCKS_INVALIDATED);
                tracing::debug!(block_hash = %hash, tip = height, "[ix-runtime] block invalidated");
            }
        }
        Ok(())
    }

    /// Replay until the feed ends, an event fails, or `shutdown` is set.
    pub fn run<R: BufRead>(
        &mut self,
        feed: FeedReader<R>,
        shutdown: &AtomicBool,
    ) -> Result<ReplaySummary, ReplayError> {
        let mut summary = ReplaySummary::default();

        for item in feed {
            if shutdown.load(Ordering::SeqCst) {
                tracing::info!("[ix-runtime] shutdown requested, stopping replay");
                summary.interrupted = true;
                break;
            }
            let (line, event) = item?;
            self.apply(&event)
                .map_err(|source| ReplayError::Indexing { line, source })?;
            match event {
                FeedEvent::Index(_) => summary.indexed += 1,
                FeedEvent::Invalidate(_) => summary.invalidated += 1,
            }
        }

        summary.tip_height = Dispatcher::tip(&self.store)
            .map_err(|source| ReplayError::Indexing { line: 0, source })?
            .map(|(height, _)| height);
        tracing::info!(
            indexed = summary.indexed,
            invalidated = summary.invalidated,
            tip = ?summary.tip_height,
            "[ix-runtime] replay finished"
        );
        Ok(summary)
    }
}
