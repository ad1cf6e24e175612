//! # Model Store Service
//!
//! Typed access to entities. Primary and index rows of one entity are always
//! written and removed in a single atomic batch.
//!
//! While a journal is open every write first records the prior value of each
//! key it touches; rolling the journal back restores them in reverse order.

use crate::adapters::memory::InMemoryKVStore;
use crate::domain::errors::ModelError;
use crate::domain::model::{IndexKey, Model};
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanOrder};

/// Prior value of a key, `None` when it was absent.
type JournalEntry = (Vec<u8>, Option<Vec<u8>>);

pub struct ModelStore {
    kv: Box<dyn KeyValueStore>,
    journal: Option<Vec<JournalEntry>>,
}

impl ModelStore {
    pub fn new(kv: impl KeyValueStore + 'static) -> Self {
        Self {
            kv: Box::new(kv),
            journal: None,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(InMemoryKVStore::new())
    }

    fn primary_key<M: Model>(id: &str) -> Vec<u8> {
        format!("{}:{}", M::TABLE, id).into_bytes()
    }

    fn partition_prefix<M: Model>(partition: &str) -> Vec<u8> {
        format!("{}#{}#", M::TABLE, partition).into_bytes()
    }

    fn index_key<M: Model>(index: &IndexKey) -> Vec<u8> {
        let mut key = Self::partition_prefix::<M>(&index.partition);
        key.extend_from_slice(index.sort.as_bytes());
        key
    }

    /// Insert or replace an entity.
    pub fn put<M: Model>(&mut self, model: &M) -> Result<(), ModelError> {
        let id = model.id();
        let value = serde_json::to_vec(model).map_err(|source| ModelError::Serialize {
            table: M::TABLE,
            source,
        })?;

        let mut ops = Vec::with_capacity(3);
        // A replaced entity may have moved within its partition.
        if let Some(previous) = self.get::<M>(&id)? {
            if let Some(old_index) = previous.index() {
                if model.index().as_ref() != Some(&old_index) {
                    ops.push(BatchOperation::delete(Self::index_key::<M>(&old_index)));
                }
            }
        }
        if let Some(index) = model.index() {
            ops.push(BatchOperation::put(Self::index_key::<M>(&index), id.as_bytes()));
        }
        ops.push(BatchOperation::put(Self::primary_key::<M>(&id), value));

        self.write(ops)
    }

    pub fn get<M: Model>(&self, id: &str) -> Result<Option<M>, ModelError> {
        let key = Self::primary_key::<M>(id);
        match self.kv.get(&key)? {
            Some(bytes) => Self::decode::<M>(&key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    pub fn contains<M: Model>(&self, id: &str) -> Result<bool, ModelError> {
        Ok(self.kv.exists(&Self::primary_key::<M>(id))?)
    }

    /// Remove an entity and its index row. Absent ids are a no-op.
    pub fn delete<M: Model>(&mut self, id: &str) -> Result<(), ModelError> {
        let Some(existing) = self.get::<M>(id)? else {
            return Ok(());
        };

        let mut ops = vec![BatchOperation::delete(Self::primary_key::<M>(id))];
        if let Some(index) = existing.index() {
            ops.push(BatchOperation::delete(Self::index_key::<M>(&index)));
        }
        self.write(ops)
    }

    fn write(&mut self, ops: Vec<BatchOperation>) -> Result<(), ModelError> {
        if let Some(journal) = self.journal.as_mut() {
            for op in &ops {
                let key = match op {
                    BatchOperation::Put { key, .. } | BatchOperation::Delete { key } => key,
                };
                journal.push((key.clone(), self.kv.get(key)?));
            }
        }
        self.kv.atomic_batch_write(ops)?;
        Ok(())
    }

    /// Start recording prior values. An open journal is discarded.
    pub fn begin_journal(&mut self) {
        self.journal = Some(Vec::new());
    }

    pub fn in_journal(&self) -> bool {
        self.journal.is_some()
    }

    /// Keep every write since [`Self::begin_journal`].
    pub fn commit_journal(&mut self) {
        self.journal = None;
    }

    /// Undo every write since [`Self::begin_journal`] in one batch. Returns
    /// the number of key writes reverted.
    pub fn rollback_journal(&mut self) -> Result<usize, ModelError> {
        let Some(journal) = self.journal.take() else {
            return Ok(0);
        };
        let reverted = journal.len();
        let ops = journal
            .into_iter()
            .rev()
            .map(|(key, previous)| match previous {
                Some(value) => BatchOperation::put(key, value),
                None => BatchOperation::delete(key),
            })
            .collect();
        self.kv.atomic_batch_write(ops)?;
        tracing::debug!(reverted, "[ix-02] journal rolled back");
        Ok(reverted)
    }

    /// Entities of one partition ordered by sort key, starting strictly after
    /// `cursor` (a sort key) in the requested direction.
    pub fn query<M: Model>(
        &self,
        partition: &str,
        limit: usize,
        order: ScanOrder,
        cursor: Option<&str>,
    ) -> Result<Vec<M>, ModelError> {
        let prefix = Self::partition_prefix::<M>(partition);
        let after = cursor.map(|sort| {
            let mut key = prefix.clone();
            key.extend_from_slice(sort.as_bytes());
            key
        });

        let rows = self
            .kv
            .range_scan(&prefix, order, after.as_deref(), limit)?;

        let mut models = Vec::with_capacity(rows.len());
        for (index_key, id) in rows {
            let id = String::from_utf8_lossy(&id).into_owned();
            let model = self.get::<M>(&id)?.ok_or_else(|| ModelError::DanglingIndex {
                index_key: String::from_utf8_lossy(&index_key).into_owned(),
                id,
            })?;
            models.push(model);
        }
        Ok(models)
    }

    /// Every entity of a partition in ascending order.
    pub fn query_all<M: Model>(&self, partition: &str) -> Result<Vec<M>, ModelError> {
        self.query(partition, usize::MAX, ScanOrder::Ascending, None)
    }

    /// Last entity of a partition by sort key.
    pub fn latest<M: Model>(&self, partition: &str) -> Result<Option<M>, ModelError> {
        Ok(self
            .query(partition, 1, ScanOrder::Descending, None)?
            .into_iter()
            .next())
    }

    /// Raw dump of every row, in key order.
    pub fn snapshot(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>, ModelError> {
        Ok(self.kv.range_scan(&[], ScanOrder::Ascending, None, usize::MAX)?)
    }

    fn decode<M: Model>(key: &[u8], bytes: &[u8]) -> Result<M, ModelError> {
        serde_json::from_slice(bytes).map_err(|source| ModelError::Deserialize {
            table: M::TABLE,
            key: String::from_utf8_lossy(key).into_owned(),
            source,
        })
    }
}
