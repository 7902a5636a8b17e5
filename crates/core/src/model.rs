//! Record types and models.
//!
//! [`RecordType`] collects the UUID bindings declared for one kind of record and turns each into
//! named accessors (`formatted_N`, `formatted_N=`, `hex_N`, `hex_N=`). The name → operation table
//! is built once, at bind time; calls by name are then a map lookup.
//!
//! [`Model`] pairs a finished record type with the store that holds its records. Constructing a
//! model adds the type-level finders and registers autofill hooks with the store, so a record type
//! without a store (a plain value type) never exposes finders.

use crate::binding::{BindingOptions, Cardinality, Encoding, FieldBinding, SkipReason};
use crate::error::{CoreError, CoreResult};
use crate::record::{Record, RecordId};
use crate::store::RecordStore;
use attr_uuid_types::{NonEmptyText, Value};
use std::collections::HashMap;

/// Result of [`RecordType::bind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Bound,
    /// Nothing was added to the record type.
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accessor {
    Get(usize, Encoding),
    Set(usize, Encoding),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Finder {
    binding: usize,
    cardinality: Cardinality,
    encoding: Encoding,
}

/// A named record type and its UUID bindings.
#[derive(Debug, Clone)]
pub struct RecordType {
    name: NonEmptyText,
    bindings: Vec<FieldBinding>,
    accessors: HashMap<String, Accessor>,
}

impl RecordType {
    /// Creates a record type with no bindings.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if `name` is empty.
    pub fn new(name: impl AsRef<str>) -> CoreResult<Self> {
        let name = NonEmptyText::new(name)
            .map_err(|_| CoreError::InvalidInput("record type name cannot be empty".into()))?;
        Ok(Self {
            name,
            bindings: Vec::new(),
            accessors: HashMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Declares a UUID binding for `attribute`.
    ///
    /// A non-textual attribute or column name leaves the record type unchanged and reports
    /// [`BindOutcome::Skipped`]; nothing is raised. Binding an attribute that is already bound
    /// replaces the earlier binding.
    ///
    /// # Arguments
    ///
    /// * `attribute` - Virtual attribute name used to derive accessor names.
    /// * `options` - See [`BindingOptions`].
    pub fn bind(&mut self, attribute: impl Into<Value>, options: BindingOptions) -> BindOutcome {
        let attribute = attribute.into();
        let binding = match FieldBinding::new(attribute.clone(), options) {
            Ok(binding) => binding,
            Err(reason) => {
                tracing::warn!(
                    "skipped UUID binding {} on '{}': {}",
                    attribute,
                    self.name,
                    reason
                );
                return BindOutcome::Skipped(reason);
            }
        };

        let index = match self
            .bindings
            .iter()
            .position(|b| b.attribute() == binding.attribute())
        {
            Some(index) => {
                tracing::debug!("rebinding '{}' on '{}'", binding.attribute(), self.name);
                self.bindings[index] = binding;
                index
            }
            None => {
                self.bindings.push(binding);
                self.bindings.len() - 1
            }
        };

        let binding = &self.bindings[index];
        for encoding in Encoding::ALL {
            self.accessors
                .insert(binding.getter_name(encoding), Accessor::Get(index, encoding));
            self.accessors
                .insert(binding.setter_name(encoding), Accessor::Set(index, encoding));
        }

        tracing::debug!(
            "bound '{}' on '{}' to field '{}' (autofill: {})",
            binding.attribute(),
            self.name,
            binding.column(),
            binding.autofill_enabled()
        );
        BindOutcome::Bound
    }

    /// True if `operation` names one of this type's accessors.
    pub fn responds_to(&self, operation: &str) -> bool {
        self.accessors.contains_key(operation)
    }

    /// Calls the getter named `operation` (e.g. `hex_uuid`) on `record`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::UndefinedOperation`] if `operation` is not a getter of this type.
    /// - [`CoreError::Codec`] if the backing field holds a malformed value.
    pub fn read(&self, record: &Record, operation: &str) -> CoreResult<Option<String>> {
        match self.accessors.get(operation) {
            Some(&Accessor::Get(index, encoding)) => {
                Ok(self.bindings[index].read(record, encoding)?)
            }
            _ => Err(self.undefined(operation)),
        }
    }

    /// Calls the setter named `operation` (e.g. `formatted_uuid=`) on `record`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::UndefinedOperation`] if `operation` is not a setter of this type.
    /// - [`CoreError::Codec`] if `value` does not parse; `record` is left unchanged.
    pub fn write(
        &self,
        record: &mut Record,
        operation: &str,
        value: impl Into<Value>,
    ) -> CoreResult<()> {
        match self.accessors.get(operation) {
            Some(&Accessor::Set(index, encoding)) => {
                Ok(self.bindings[index].write(record, encoding, value)?)
            }
            _ => Err(self.undefined(operation)),
        }
    }

    /// The binding declared for `attribute`, if any.
    pub fn binding(&self, attribute: &str) -> Option<&FieldBinding> {
        self.bindings.iter().find(|b| b.attribute() == attribute)
    }

    pub fn bindings(&self) -> &[FieldBinding] {
        &self.bindings
    }

    /// Sorted accessor names.
    pub fn operation_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.accessors.keys().cloned().collect();
        names.sort();
        names
    }

    fn undefined(&self, operation: &str) -> CoreError {
        CoreError::UndefinedOperation {
            record_type: self.name.to_string(),
            operation: operation.to_string(),
        }
    }
}

/// A record type backed by a store.
pub struct Model<S: RecordStore> {
    record_type: RecordType,
    finders: HashMap<String, Finder>,
    store: S,
}

impl<S: RecordStore> Model<S> {
    /// Attaches `record_type` to `store`.
    ///
    /// Registers one before-create hook per autofill binding and builds the finder table. The
    /// record type cannot be changed afterwards.
    pub fn new(record_type: RecordType, mut store: S) -> Self {
        let mut finders = HashMap::new();

        for (index, binding) in record_type.bindings().iter().enumerate() {
            for cardinality in Cardinality::ALL {
                for encoding in Encoding::ALL {
                    finders.insert(
                        binding.finder_name(cardinality, encoding),
                        Finder {
                            binding: index,
                            cardinality,
                            encoding,
                        },
                    );
                }
            }

            if binding.autofill_enabled() {
                store.register_before_create(binding.before_create_hook());
            }
        }

        tracing::debug!(
            "model '{}' ready with {} binding(s)",
            record_type.name(),
            record_type.bindings().len()
        );

        Self {
            record_type,
            finders,
            store,
        }
    }

    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// True if `operation` names an accessor or a finder of this model.
    pub fn responds_to(&self, operation: &str) -> bool {
        self.finders.contains_key(operation) || self.record_type.responds_to(operation)
    }

    /// Sorted accessor and finder names.
    pub fn operation_names(&self) -> Vec<String> {
        let mut names = self.record_type.operation_names();
        names.extend(self.finders.keys().cloned());
        names.sort();
        names
    }

    /// Calls the single-record finder named `operation` (e.g. `find_by_hex_uuid`).
    ///
    /// Malformed, null or non-textual keys return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::UndefinedOperation`] if `operation` is not a `find_by_*` finder.
    /// - [`CoreError::Store`] if the store query fails.
    pub fn find_by(&self, operation: &str, key: impl Into<Value>) -> CoreResult<Option<Record>> {
        match self.finders.get(operation) {
            Some(finder) if finder.cardinality == Cardinality::One => {
                let binding = &self.record_type.bindings()[finder.binding];
                Ok(binding.find_by(&self.store, finder.encoding, key)?)
            }
            _ => Err(self.record_type.undefined(operation)),
        }
    }

    /// Calls the batch finder named `operation` (e.g. `find_all_by_formatted_uuid`).
    ///
    /// Returns an empty list for null, non-list or empty input; invalid elements are dropped.
    ///
    /// # Errors
    ///
    /// - [`CoreError::UndefinedOperation`] if `operation` is not a `find_all_by_*` finder.
    /// - [`CoreError::Store`] if the store query fails.
    pub fn find_all_by(&self, operation: &str, keys: impl Into<Value>) -> CoreResult<Vec<Record>> {
        match self.finders.get(operation) {
            Some(finder) if finder.cardinality == Cardinality::All => {
                let binding = &self.record_type.bindings()[finder.binding];
                Ok(binding.find_all_by(&self.store, finder.encoding, keys)?)
            }
            _ => Err(self.record_type.undefined(operation)),
        }
    }

    /// Persists a new record, running autofill first.
    pub fn create(&mut self, record: Record) -> CoreResult<Record> {
        Ok(self.store.create(record)?)
    }

    /// Creates `record` if it is new, otherwise updates it.
    ///
    /// On creation `record` is replaced by the stored copy, id and autofilled fields included.
    /// If the store fails, `record` is left as it was.
    pub fn save(&mut self, record: &mut Record) -> CoreResult<()> {
        if record.is_persisted() {
            self.store.update(record)?;
        } else {
            *record = self.store.create(record.clone())?;
        }
        Ok(())
    }

    pub fn read(&self, id: RecordId) -> CoreResult<Option<Record>> {
        Ok(self.store.read(id)?)
    }
}
