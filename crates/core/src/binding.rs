//! Field bindings.
//!
//! A [`FieldBinding`] attaches the UUID codec to one binary field of a record type. From a
//! *virtual attribute name* `N` and a *backing field* `F` (defaulting to `N`) it provides:
//!
//! - accessors `formatted_N` / `hex_N` (and their setters) that read and write `F` through the
//!   codec,
//! - finders `find_by_formatted_N`, `find_by_hex_N`, `find_all_by_formatted_N` and
//!   `find_all_by_hex_N` that translate textual keys into binary-keyed store queries,
//! - optional autofill of `F` with a freshly generated UUID before a record is first created.
//!
//! ## Error policy
//! - Setters surface [`CodecError::InvalidFormat`] and leave the record untouched.
//! - Finders never fail on a bad key: null, non-textual and malformed keys simply miss. Store
//!   failures still propagate.
//! - Getters return `Ok(None)` when the backing field is absent or empty.

use crate::constants::{
    FIND_ALL_BY_PREFIX, FIND_BY_PREFIX, FORMATTED_PREFIX, HEX_PREFIX, SETTER_SUFFIX,
};
use crate::record::Record;
use crate::store::{BeforeCreateHook, RecordStore, StoreResult};
use attr_uuid_codec::{BinaryUuid, CodecError, CodecResult, UuidCodec};
use attr_uuid_types::{NonEmptyText, Value};
use std::fmt;
use std::sync::Arc;

/// Source of new UUIDs for autofill.
pub type UuidSource = Arc<dyn Fn() -> BinaryUuid + Send + Sync>;

/// The two textual projections of a binary UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// `8-4-4-4-12` hyphenated form.
    Formatted,
    /// 32-character hex digest.
    Hex,
}

impl Encoding {
    pub const ALL: [Encoding; 2] = [Encoding::Formatted, Encoding::Hex];

    /// Accessor name prefix for this encoding.
    pub fn prefix(&self) -> &'static str {
        match self {
            Encoding::Formatted => FORMATTED_PREFIX,
            Encoding::Hex => HEX_PREFIX,
        }
    }

    /// Parses a field value in this encoding.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidFormat`] if `input` is not text or is malformed.
    pub fn parse(&self, input: &Value) -> CodecResult<BinaryUuid> {
        let text = input.as_text().ok_or_else(|| {
            CodecError::InvalidFormat(format!("expected text, got {}", input.kind()))
        })?;
        match self {
            Encoding::Formatted => UuidCodec::parse_formatted(text),
            Encoding::Hex => UuidCodec::parse_hex(text),
        }
    }

    /// Renders raw bytes in this encoding; `Ok(None)` for empty input.
    pub fn render(&self, bytes: &[u8]) -> CodecResult<Option<String>> {
        match self {
            Encoding::Formatted => UuidCodec::format(bytes),
            Encoding::Hex => UuidCodec::hex(bytes),
        }
    }
}

/// Whether a finder returns one record or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    One,
    All,
}

impl Cardinality {
    pub const ALL: [Cardinality; 2] = [Cardinality::One, Cardinality::All];

    pub fn prefix(&self) -> &'static str {
        match self {
            Cardinality::One => FIND_BY_PREFIX,
            Cardinality::All => FIND_ALL_BY_PREFIX,
        }
    }
}

/// Why a binding was not created.
///
/// This is an outcome rather than an error: the record type is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NonTextualAttribute,
    NonTextualColumn,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NonTextualAttribute => write!(f, "attribute name is not textual"),
            SkipReason::NonTextualColumn => write!(f, "column name is not textual"),
        }
    }
}

/// Setup-time options for a binding.
#[derive(Clone, Default)]
pub struct BindingOptions {
    column_name: Option<Value>,
    autofill: bool,
    uuid_source: Option<UuidSource>,
}

impl BindingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backs the binding with a differently named field.
    ///
    /// A null value is treated as "not given".
    pub fn column_name(mut self, column_name: impl Into<Value>) -> Self {
        self.column_name = Some(column_name.into());
        self
    }

    /// Fill the backing field with a new UUID before a record is first created.
    pub fn autofill(mut self, autofill: bool) -> Self {
        self.autofill = autofill;
        self
    }

    /// Replaces [`UuidCodec::generate`] as the autofill source.
    pub fn uuid_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> BinaryUuid + Send + Sync + 'static,
    {
        self.uuid_source = Some(Arc::new(source));
        self
    }
}

impl fmt::Debug for BindingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingOptions")
            .field("column_name", &self.column_name)
            .field("autofill", &self.autofill)
            .field("custom_uuid_source", &self.uuid_source.is_some())
            .finish()
    }
}

/// A UUID binding between a virtual attribute and a binary field.
///
/// Immutable once created, and cheap to clone.
#[derive(Clone)]
pub struct FieldBinding {
    attribute: NonEmptyText,
    column: NonEmptyText,
    autofill: bool,
    uuid_source: UuidSource,
}

impl FieldBinding {
    /// Creates a binding for `attribute`.
    ///
    /// # Arguments
    ///
    /// * `attribute` - Virtual attribute name; accessor names are derived from it.
    /// * `options` - Backing column override, autofill flag and UUID source.
    ///
    /// # Errors
    ///
    /// Returns a [`SkipReason`] if `attribute`, or a given column name, is not non-empty text.
    pub fn new(attribute: impl Into<Value>, options: BindingOptions) -> Result<Self, SkipReason> {
        let attribute = NonEmptyText::from_value(&attribute.into())
            .ok_or(SkipReason::NonTextualAttribute)?;

        let column = match options.column_name {
            None | Some(Value::Null) => attribute.clone(),
            Some(value) => {
                NonEmptyText::from_value(&value).ok_or(SkipReason::NonTextualColumn)?
            }
        };

        Ok(Self {
            attribute,
            column,
            autofill: options.autofill,
            uuid_source: options
                .uuid_source
                .unwrap_or_else(|| Arc::new(UuidCodec::generate) as UuidSource),
        })
    }

    /// The virtual attribute name.
    pub fn attribute(&self) -> &str {
        self.attribute.as_str()
    }

    /// The backing binary field.
    pub fn column(&self) -> &str {
        self.column.as_str()
    }

    pub fn autofill_enabled(&self) -> bool {
        self.autofill
    }

    /// Getter name, e.g. `formatted_uuid`.
    pub fn getter_name(&self, encoding: Encoding) -> String {
        format!("{}{}", encoding.prefix(), self.attribute)
    }

    /// Setter name, e.g. `formatted_uuid=`.
    pub fn setter_name(&self, encoding: Encoding) -> String {
        format!("{}{}", self.getter_name(encoding), SETTER_SUFFIX)
    }

    /// Finder name, e.g. `find_all_by_hex_uuid`.
    pub fn finder_name(&self, cardinality: Cardinality, encoding: Encoding) -> String {
        format!("{}{}", cardinality.prefix(), self.getter_name(encoding))
    }

    /// All getter and setter names.
    pub fn accessor_names(&self) -> Vec<String> {
        Encoding::ALL
            .iter()
            .flat_map(|&e| [self.getter_name(e), self.setter_name(e)])
            .collect()
    }

    /// All finder names.
    pub fn finder_names(&self) -> Vec<String> {
        Cardinality::ALL
            .iter()
            .flat_map(|&c| Encoding::ALL.iter().map(move |&e| self.finder_name(c, e)))
            .collect()
    }

    /// Reads the backing field in `encoding`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the field is absent, null or empty.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidFormat`] if the field holds something other than a 16-byte
    /// binary value.
    pub fn read(&self, record: &Record, encoding: Encoding) -> CodecResult<Option<String>> {
        match record.get(self.column()) {
            None => Ok(None),
            Some(value) if value.is_blank() => Ok(None),
            Some(Value::Bytes(bytes)) => encoding.render(bytes),
            Some(other) => Err(CodecError::InvalidFormat(format!(
                "field '{}' holds {}, expected binary",
                self.column(),
                other.kind()
            ))),
        }
    }

    /// Parses `input` in `encoding` and stores the binary value in the backing field.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidFormat`] if `input` does not parse; the record is unchanged.
    pub fn write(
        &self,
        record: &mut Record,
        encoding: Encoding,
        input: impl Into<Value>,
    ) -> CodecResult<()> {
        let uuid = encoding.parse(&input.into())?;
        record.set(self.column(), uuid.into_vec());
        Ok(())
    }

    pub fn formatted(&self, record: &Record) -> CodecResult<Option<String>> {
        self.read(record, Encoding::Formatted)
    }

    pub fn hex(&self, record: &Record) -> CodecResult<Option<String>> {
        self.read(record, Encoding::Hex)
    }

    pub fn set_formatted(&self, record: &mut Record, input: impl Into<Value>) -> CodecResult<()> {
        self.write(record, Encoding::Formatted, input)
    }

    pub fn set_hex(&self, record: &mut Record, input: impl Into<Value>) -> CodecResult<()> {
        self.write(record, Encoding::Hex, input)
    }

    /// Finds the record whose backing field matches `key`.
    ///
    /// A key that is null, not text, or malformed yields `Ok(None)` without querying the store.
    ///
    /// # Errors
    ///
    /// Store failures propagate unchanged.
    pub fn find_by<S>(
        &self,
        store: &S,
        encoding: Encoding,
        key: impl Into<Value>,
    ) -> StoreResult<Option<Record>>
    where
        S: RecordStore + ?Sized,
    {
        let key = key.into();
        let uuid = match encoding.parse(&key) {
            Ok(uuid) => uuid,
            Err(e) => {
                tracing::trace!("lookup on '{}' missed: {}", self.column(), e);
                return Ok(None);
            }
        };
        store.query_one_by_field(self.column(), &Value::Bytes(uuid.into_vec()))
    }

    /// Finds every record whose backing field matches one of `keys`.
    ///
    /// `keys` must be a list; anything else yields an empty result. Elements that fail to parse
    /// are dropped. The surviving keys are resolved with a single set-membership query, and
    /// results come back in store order. No query is issued if no key survives.
    ///
    /// # Errors
    ///
    /// Store failures propagate unchanged.
    pub fn find_all_by<S>(
        &self,
        store: &S,
        encoding: Encoding,
        keys: impl Into<Value>,
    ) -> StoreResult<Vec<Record>>
    where
        S: RecordStore + ?Sized,
    {
        let keys = keys.into();
        let Some(items) = keys.as_list() else {
            tracing::trace!(
                "batch lookup on '{}' given {}, expected list",
                self.column(),
                keys.kind()
            );
            return Ok(Vec::new());
        };

        let values: Vec<Value> = items
            .iter()
            .filter_map(|item| match encoding.parse(item) {
                Ok(uuid) => Some(Value::Bytes(uuid.into_vec())),
                Err(e) => {
                    tracing::trace!("dropping batch key for '{}': {}", self.column(), e);
                    None
                }
            })
            .collect();

        if values.is_empty() {
            return Ok(Vec::new());
        }
        store.query_all_by_field_in(self.column(), &values)
    }

    pub fn find_by_formatted<S>(
        &self,
        store: &S,
        key: impl Into<Value>,
    ) -> StoreResult<Option<Record>>
    where
        S: RecordStore + ?Sized,
    {
        self.find_by(store, Encoding::Formatted, key)
    }

    pub fn find_by_hex<S>(
        &self,
        store: &S,
        key: impl Into<Value>,
    ) -> StoreResult<Option<Record>>
    where
        S: RecordStore + ?Sized,
    {
        self.find_by(store, Encoding::Hex, key)
    }

    pub fn find_all_by_formatted<S>(
        &self,
        store: &S,
        keys: impl Into<Value>,
    ) -> StoreResult<Vec<Record>>
    where
        S: RecordStore + ?Sized,
    {
        self.find_all_by(store, Encoding::Formatted, keys)
    }

    pub fn find_all_by_hex<S>(
        &self,
        store: &S,
        keys: impl Into<Value>,
    ) -> StoreResult<Vec<Record>>
    where
        S: RecordStore + ?Sized,
    {
        self.find_all_by(store, Encoding::Hex, keys)
    }

    /// Fills the backing field from the UUID source if it is absent or empty.
    ///
    /// Returns true if a value was generated.
    pub fn autofill(&self, record: &mut Record) -> bool {
        let blank = record.get(self.column()).map_or(true, Value::is_blank);
        if !blank {
            return false;
        }

        let uuid = (self.uuid_source)();
        tracing::debug!("autofilled '{}' with {}", self.column(), uuid);
        record.set(self.column(), uuid.into_vec());
        true
    }

    /// Packages [`FieldBinding::autofill`] for [`RecordStore::register_before_create`].
    pub fn before_create_hook(&self) -> BeforeCreateHook {
        let binding = self.clone();
        Box::new(move |record: &mut Record| {
            binding.autofill(record);
        })
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("attribute", &self.attribute)
            .field("column", &self.column)
            .field("autofill", &self.autofill)
            .finish()
    }
}
