use crate::store::StoreError;
use attr_uuid_codec::CodecError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("undefined operation '{operation}' for record type '{record_type}'")]
    UndefinedOperation {
        record_type: String,
        operation: String,
    },
    #[error("failed to read configuration file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
