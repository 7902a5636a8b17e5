//! Records as seen by the UUID bindings.
//!
//! A record is an opaque bag of named fields owned by a store. The bindings only ever read and
//! write the one binary field they are configured for.

use attr_uuid_types::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Primary key assigned by a store on creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single record.
///
/// # Equality
/// Two persisted records are equal when their ids match, regardless of field content (one may
/// be a stale copy of the other). Unsaved records have no identity and compare by fields. A
/// persisted record never equals an unsaved one.
#[derive(Clone, Debug, Default)]
pub struct Record {
    id: Option<RecordId>,
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field assignment.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    /// Assigns the primary key. Intended for store implementations.
    pub fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.fields == other.fields,
            _ => false,
        }
    }
}
