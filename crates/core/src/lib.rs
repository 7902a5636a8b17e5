//! # attr-uuid core
//!
//! UUID field bindings for records that store a UUID as a 16-byte binary value.
//!
//! This crate wires the codec onto record types:
//! - [`FieldBinding`]: formatted/hex accessors over one binary field, string-keyed finders that
//!   resolve to binary-keyed store queries, and optional autofill on create
//! - [`RecordType`] / [`Model`]: name-keyed registries of the operations each binding produces
//! - [`RecordStore`]: the contract an external store must meet, with [`MemoryStore`] as an
//!   in-process implementation
//! - [`BindingConfig`]: YAML declaration of record types and bindings
//!
//! **No persistence concerns**: transactions, locking and schema introspection belong to the
//! store.

pub mod binding;
pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod record;
pub mod store;

pub use attr_uuid_codec::{BinaryUuid, CodecError, CodecResult, UuidCodec};
pub use attr_uuid_types::{NonEmptyText, Value};
pub use binding::{BindingOptions, Cardinality, Encoding, FieldBinding, SkipReason, UuidSource};
pub use config::{resolve_config_path, BindingConfig, ConfiguredType, SkippedBinding};
pub use error::{CoreError, CoreResult};
pub use model::{BindOutcome, Model, RecordType};
pub use record::{Record, RecordId};
pub use store::{BeforeCreateHook, MemoryStore, RecordStore, StoreError, StoreResult};
