//! Binary UUID codec.
//!
//! Records persist a UUID as a fixed-length **16-byte binary value**. Two textual projections of
//! that value exist purely for interchange:
//!
//! - *Formatted*: `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`, lowercase hex in `8-4-4-4-12` groups
//!   (36 characters).
//! - *Hex digest*: the same 16 bytes as 32 contiguous lowercase hex characters.
//!
//! This crate provides:
//! - A small wrapper type ([`BinaryUuid`]) that *guarantees* exactly 16 bytes once constructed.
//! - [`UuidCodec`], the set of conversions between the binary value and both textual forms,
//!   plus random generation for newly created records.
//!
//! ## Validation
//! Parsing is strict. Input case is ignored, but anything off-pattern (wrong length, misplaced
//! hyphens, braces, `urn:uuid:` prefixes, non-hex characters) is rejected with
//! [`CodecError::InvalidFormat`]. Rendered output is always lowercase.
//!
//! ## Empty values
//! [`UuidCodec::format`] and [`UuidCodec::hex`] treat an empty byte slice as "no value" and
//! return `Ok(None)` rather than an error.
//!
//! Example:
//! `faea220a-e94e-442c-9ca0-5b39753e3549` ↔ `faea220ae94e442c9ca05b39753e3549`

mod codec;

// Re-export public types
pub use codec::{BinaryUuid, Uuid, UuidCodec, FORMATTED_LEN, HEX_LEN, UUID_BYTES};

/// Error type for UUID conversions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Input did not match the expected representation
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Result type for UUID conversions.
pub type CodecResult<T> = Result<T, CodecError>;
