//! Domain layer: payload types, script stack and errors.

pub mod errors;
pub mod script;
pub mod types;
