//! Ports for the model store.

pub mod outbound;
