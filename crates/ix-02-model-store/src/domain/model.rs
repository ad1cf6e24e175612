//! The entity-to-row mapping.

use serde::{de::DeserializeOwned, Serialize};

/// Secondary index position of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexKey {
    pub partition: String,
    pub sort: String,
}

impl IndexKey {
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: sort.into(),
        }
    }
}

/// A stored entity.
///
/// `id` must be stable for the lifetime of the entity. `index` must be unique
/// within its partition; models that are only ever read by id return `None`.
pub trait Model: Serialize + DeserializeOwned {
    const TABLE: &'static str;

    fn id(&self) -> String;

    fn index(&self) -> Option<IndexKey>;
}
