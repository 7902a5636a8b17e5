//! Store contract consumed by the UUID bindings.
//!
//! The persistence engine is an external collaborator. The bindings need exactly three things
//! from it:
//! - equality and set-membership queries on a single field,
//! - generic create/read/update of records,
//! - a hook that runs immediately before a record is first created.
//!
//! [`MemoryStore`] is a small in-process implementation used by the CLI and the tests.

use crate::record::{Record, RecordId};
use attr_uuid_types::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Callback run against a new record immediately before its first persistence.
pub type BeforeCreateHook = Box<dyn Fn(&mut Record) + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(RecordId),
    #[error("record {0} is already persisted")]
    AlreadyPersisted(RecordId),
    #[error("record has not been persisted")]
    NotPersisted,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A key-value record store holding records of a single type.
///
/// Implementations provide their own transaction and locking discipline; callers perform no
/// retries or coordination around these calls.
pub trait RecordStore {
    /// Persists a new record, running every registered [`BeforeCreateHook`] first.
    ///
    /// Returns the stored record with its id assigned.
    fn create(&mut self, record: Record) -> StoreResult<Record>;

    fn read(&self, id: RecordId) -> StoreResult<Option<Record>>;

    /// Overwrites the fields of an existing record. Hooks are not run.
    fn update(&mut self, record: &Record) -> StoreResult<()>;

    /// Returns the first record (in store order) whose `field` equals `value`.
    fn query_one_by_field(&self, field: &str, value: &Value) -> StoreResult<Option<Record>>;

    /// Returns every record whose `field` equals one of `values`, in store order.
    fn query_all_by_field_in(&self, field: &str, values: &[Value]) -> StoreResult<Vec<Record>>;

    fn register_before_create(&mut self, hook: BeforeCreateHook);
}

/// In-memory [`RecordStore`].
///
/// Records are kept ordered by id, and ids are allocated monotonically from 1, so store order is
/// creation order.
#[derive(Default)]
pub struct MemoryStore {
    rows: BTreeMap<RecordId, Record>,
    next_id: u64,
    hooks: Vec<BeforeCreateHook>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over stored records in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.rows.values()
    }

    fn matches(record: &Record, field: &str, value: &Value) -> bool {
        record.get(field).unwrap_or(&Value::Null) == value
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("rows", &self.rows)
            .field("next_id", &self.next_id)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl RecordStore for MemoryStore {
    fn create(&mut self, mut record: Record) -> StoreResult<Record> {
        if let Some(id) = record.id() {
            return Err(StoreError::AlreadyPersisted(id));
        }

        for hook in &self.hooks {
            hook(&mut record);
        }

        self.next_id += 1;
        let id = RecordId::new(self.next_id);
        record.set_id(id);
        self.rows.insert(id, record.clone());

        tracing::trace!("created record {}", id);
        Ok(record)
    }

    fn read(&self, id: RecordId) -> StoreResult<Option<Record>> {
        Ok(self.rows.get(&id).cloned())
    }

    fn update(&mut self, record: &Record) -> StoreResult<()> {
        let id = record.id().ok_or(StoreError::NotPersisted)?;
        let row = self.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *row = record.clone();
        Ok(())
    }

    fn query_one_by_field(&self, field: &str, value: &Value) -> StoreResult<Option<Record>> {
        Ok(self
            .rows
            .values()
            .find(|record| Self::matches(record, field, value))
            .cloned())
    }

    fn query_all_by_field_in(&self, field: &str, values: &[Value]) -> StoreResult<Vec<Record>> {
        Ok(self
            .rows
            .values()
            .filter(|record| values.iter().any(|v| Self::matches(record, field, v)))
            .cloned()
            .collect())
    }

    fn register_before_create(&mut self, hook: BeforeCreateHook) {
        self.hooks.push(hook);
    }
}
