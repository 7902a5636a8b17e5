//! Constants used throughout the core crate.
//!
//! Operation name fragments are kept here so that the accessor and finder registries, the CLI
//! listing and the tests all agree on spelling.

/// Prefix of accessors over the formatted representation.
pub const FORMATTED_PREFIX: &str = "formatted_";

/// Prefix of accessors over the hex-digest representation.
pub const HEX_PREFIX: &str = "hex_";

/// Suffix distinguishing a setter from its getter.
pub const SETTER_SUFFIX: &str = "=";

/// Prefix of single-record finders.
pub const FIND_BY_PREFIX: &str = "find_by_";

/// Prefix of batch finders.
pub const FIND_ALL_BY_PREFIX: &str = "find_all_by_";

/// Filename looked up in the working directory when no configuration path is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "attr_uuid.yaml";
