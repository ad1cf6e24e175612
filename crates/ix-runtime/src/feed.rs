//! # Block Feed
//!
//! JSON-lines stream of index and invalidate events. Blank lines are
//! ignored; any other unparseable line ends the replay.

use serde::{Deserialize, Serialize};
use shared_types::{BlockHash, RawBlock};
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedEvent {
    Index(RawBlock),
    Invalidate(BlockHash),
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read block feed: {0}")]
    Io(#[from] io::Error),

    #[error("malformed feed event on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Yields `(line number, event)` pairs, 1-based.
pub struct FeedReader<R> {
    lines: io::Lines<R>,
    line: usize,
}

impl<R: BufRead> FeedReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for FeedReader<R> {
    type Item = Result<(usize, FeedEvent), FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            if text.trim().is_empty() {
                continue;
            }
            let line = self.line;
            return Some(
                serde_json::from_str(&text)
                    .map(|event| (line, event))
                    .map_err(|source| FeedError::Parse { line, source }),
            );
        }
    }
}
