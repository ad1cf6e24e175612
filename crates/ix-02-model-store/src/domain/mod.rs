//! Domain layer: the `Model` mapping, key helpers and entities.

pub mod errors;
pub mod keys;
pub mod model;
pub mod models;
