//! Ports for the extractor.

pub mod outbound;
