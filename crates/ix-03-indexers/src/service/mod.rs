//! Registry and dispatcher.

pub mod dispatcher;
pub mod registry;
