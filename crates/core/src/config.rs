//! Binding configuration.
//!
//! Record types and their UUID bindings can be declared in YAML and resolved once at startup:
//!
//! ```yaml
//! record_types:
//!   - name: dummy
//!     bindings:
//!       - attribute: uuid
//!         column_name: x_uuid
//!         autofill: true
//! ```
//!
//! Attribute and column names are read as raw YAML values, so `attribute: 1` produces a skipped
//! binding (logged and reported) rather than a configuration error.

use crate::binding::{BindingOptions, SkipReason};
use crate::constants::DEFAULT_CONFIG_FILENAME;
use crate::error::{CoreError, CoreResult};
use crate::model::{BindOutcome, RecordType};
use attr_uuid_types::{NonEmptyText, Value};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BindingConfig {
    #[serde(default)]
    pub record_types: Vec<RecordTypeConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordTypeConfig {
    pub name: NonEmptyText,
    #[serde(default)]
    pub bindings: Vec<BindingEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BindingEntry {
    pub attribute: serde_yaml::Value,
    #[serde(default)]
    pub column_name: Option<serde_yaml::Value>,
    #[serde(default)]
    pub autofill: bool,
}

/// A record type built from configuration, with the bindings that were skipped.
#[derive(Debug, Clone)]
pub struct ConfiguredType {
    pub record_type: RecordType,
    pub skipped: Vec<SkippedBinding>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedBinding {
    pub attribute: Value,
    pub reason: SkipReason,
}

impl BindingConfig {
    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::YamlDeserialization`] for malformed YAML or an empty record type name.
    pub fn from_yaml_str(input: &str) -> CoreResult<Self> {
        serde_yaml::from_str(input).map_err(CoreError::YamlDeserialization)
    }

    /// Reads and parses the YAML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FileRead`] if the file cannot be read, otherwise as
    /// [`BindingConfig::from_yaml_str`].
    pub fn load(path: &Path) -> CoreResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(CoreError::FileRead)?;
        let config = Self::from_yaml_str(&contents)?;
        tracing::debug!(
            "loaded {} record type(s) from {}",
            config.record_types.len(),
            path.display()
        );
        Ok(config)
    }

    /// Builds every configured record type, in declaration order.
    pub fn build(&self) -> CoreResult<Vec<ConfiguredType>> {
        self.record_types.iter().map(RecordTypeConfig::build).collect()
    }
}

impl RecordTypeConfig {
    pub fn build(&self) -> CoreResult<ConfiguredType> {
        let mut record_type = RecordType::new(self.name.as_str())?;
        let mut skipped = Vec::new();

        for entry in &self.bindings {
            let attribute = yaml_to_value(&entry.attribute);
            let mut options = BindingOptions::new().autofill(entry.autofill);
            if let Some(column_name) = &entry.column_name {
                options = options.column_name(yaml_to_value(column_name));
            }

            if let BindOutcome::Skipped(reason) = record_type.bind(attribute.clone(), options) {
                skipped.push(SkippedBinding { attribute, reason });
            }
        }

        Ok(ConfiguredType {
            record_type,
            skipped,
        })
    }
}

/// Resolve the configuration file path without reading environment variables.
///
/// If `override_path` is provided it must be an existing file. Otherwise
/// [`DEFAULT_CONFIG_FILENAME`] is looked up in the current working directory.
pub fn resolve_config_path(override_path: Option<PathBuf>) -> CoreResult<PathBuf> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Ok(path);
        }
        return Err(CoreError::InvalidInput(format!(
            "configuration file not found: {}",
            path.display()
        )));
    }

    let cwd_relative = PathBuf::from(DEFAULT_CONFIG_FILENAME);
    if cwd_relative.is_file() {
        return Ok(cwd_relative);
    }

    Err(CoreError::InvalidInput(format!(
        "could not locate {} in the working directory",
        DEFAULT_CONFIG_FILENAME
    )))
}

fn yaml_to_value(value: &serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Yaml::String(s) => Value::Text(s.clone()),
        Yaml::Sequence(items) => Value::List(items.iter().map(yaml_to_value).collect()),
        Yaml::Mapping(map) => Value::List(
            map.iter()
                .map(|(k, v)| Value::List(vec![yaml_to_value(k), yaml_to_value(v)]))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_value(&tagged.value),
    }
}
