//! Internal implementation of the binary UUID codec.
//!
//! This module contains the conversions between the raw 16-byte value stored on records and its
//! formatted and hex-digest text forms.

use crate::{CodecError, CodecResult};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Number of bytes in a binary UUID.
pub const UUID_BYTES: usize = 16;

/// Length of the formatted (`8-4-4-4-12`) representation.
pub const FORMATTED_LEN: usize = 36;

/// Length of the hex-digest representation.
pub const HEX_LEN: usize = 32;

/// Byte offsets of the hyphens in the formatted representation.
const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// A UUID held as its raw 16-byte binary value.
///
/// This wrapper type guarantees that once constructed, the contained value is exactly
/// [`UUID_BYTES`] long, so it can be written to a binary record field as-is.
///
/// # Construction
/// - [`UuidCodec::generate`] allocates a new random value (for newly created records).
/// - [`UuidCodec::parse_formatted`] / [`UuidCodec::parse_hex`] validate text supplied by callers.
/// - [`BinaryUuid::from_slice`] validates a stored blob.
///
/// # Display format
/// `BinaryUuid` displays in the formatted (hyphenated, lowercase) form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinaryUuid([u8; UUID_BYTES]);

impl BinaryUuid {
    /// Wraps 16 raw bytes.
    pub const fn from_bytes(bytes: [u8; UUID_BYTES]) -> Self {
        Self(bytes)
    }

    /// Validates a byte slice read back from storage.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidFormat`] unless `bytes` is exactly 16 bytes long.
    pub fn from_slice(bytes: &[u8]) -> CodecResult<Self> {
        let raw: [u8; UUID_BYTES] = bytes.try_into().map_err(|_| {
            CodecError::InvalidFormat(format!(
                "binary UUID must be {} bytes, got {}",
                UUID_BYTES,
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8; UUID_BYTES] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Returns the value as a `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        Uuid::from_bytes(self.0)
    }

    /// Renders the 36-character hyphenated lowercase form.
    pub fn formatted(&self) -> String {
        self.uuid().hyphenated().to_string()
    }

    /// Renders the 32-character lowercase hex digest.
    pub fn hex(&self) -> String {
        self.uuid().simple().to_string()
    }
}

impl From<[u8; UUID_BYTES]> for BinaryUuid {
    fn from(bytes: [u8; UUID_BYTES]) -> Self {
        Self(bytes)
    }
}

impl From<Uuid> for BinaryUuid {
    fn from(uuid: Uuid) -> Self {
        Self(*uuid.as_bytes())
    }
}

impl From<BinaryUuid> for Uuid {
    fn from(value: BinaryUuid) -> Self {
        Uuid::from_bytes(value.0)
    }
}

impl From<BinaryUuid> for Vec<u8> {
    fn from(value: BinaryUuid) -> Self {
        value.into_vec()
    }
}

impl AsRef<[u8]> for BinaryUuid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for BinaryUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid().hyphenated())
    }
}

impl FromStr for BinaryUuid {
    type Err = CodecError;

    /// Parses the formatted representation.
    ///
    /// This is equivalent to calling [`UuidCodec::parse_formatted`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UuidCodec::parse_formatted(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for BinaryUuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.formatted())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for BinaryUuid {
    /// Accepts either the formatted or the hex-digest form.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.len() == HEX_LEN {
            UuidCodec::parse_hex(&s).map_err(serde::de::Error::custom)
        } else {
            UuidCodec::parse_formatted(&s).map_err(serde::de::Error::custom)
        }
    }
}

/// Conversions between the binary, formatted and hex-digest representations.
///
/// All operations are pure. Parsing rejects anything off-pattern; rendering is defined for
/// exactly 16 bytes and reports an empty input as "no value".
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidCodec;

impl UuidCodec {
    /// Parses the canonical hyphenated form.
    ///
    /// Hex digits may be upper or lower case.
    ///
    /// # Arguments
    ///
    /// * `input` - Candidate string, e.g. `faea220a-e94e-442c-9ca0-5b39753e3549`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidFormat`] unless `input` is exactly 36 characters with hyphens
    /// at positions 8, 13, 18 and 23 and hex digits everywhere else.
    pub fn parse_formatted(input: &str) -> CodecResult<BinaryUuid> {
        if !Self::is_formatted(input) {
            return Err(CodecError::InvalidFormat(format!(
                "UUID must be 36 characters in 8-4-4-4-12 hyphenated hex form, got: '{}'",
                input
            )));
        }
        Self::decode(input)
    }

    /// Parses the 32-character hex digest.
    ///
    /// Hex digits may be upper or lower case.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidFormat`] unless `input` is exactly 32 hex characters.
    pub fn parse_hex(input: &str) -> CodecResult<BinaryUuid> {
        if !Self::is_hex(input) {
            return Err(CodecError::InvalidFormat(format!(
                "UUID must be 32 hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Self::decode(input)
    }

    /// Renders `bytes` in the formatted form.
    ///
    /// # Returns
    ///
    /// `Ok(None)` for an empty slice, otherwise the 36-character lowercase string.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidFormat`] if `bytes` is neither empty nor 16 bytes long.
    pub fn format(bytes: &[u8]) -> CodecResult<Option<String>> {
        if bytes.is_empty() {
            return Ok(None);
        }
        BinaryUuid::from_slice(bytes).map(|uuid| Some(uuid.formatted()))
    }

    /// Renders `bytes` as a hex digest.
    ///
    /// Same empty-input rule as [`UuidCodec::format`].
    pub fn hex(bytes: &[u8]) -> CodecResult<Option<String>> {
        if bytes.is_empty() {
            return Ok(None);
        }
        BinaryUuid::from_slice(bytes).map(|uuid| Some(uuid.hex()))
    }

    /// Generates a new random UUID (RFC 4122 version 4).
    pub fn generate() -> BinaryUuid {
        BinaryUuid::from(Uuid::new_v4())
    }

    /// Returns true if `input` is syntactically a formatted UUID.
    pub fn is_formatted(input: &str) -> bool {
        input.len() == FORMATTED_LEN
            && input.bytes().enumerate().all(|(i, b)| {
                if HYPHEN_POSITIONS.contains(&i) {
                    b == b'-'
                } else {
                    b.is_ascii_hexdigit()
                }
            })
    }

    /// Returns true if `input` is syntactically a hex digest.
    pub fn is_hex(input: &str) -> bool {
        input.len() == HEX_LEN && input.bytes().all(|b| b.is_ascii_hexdigit())
    }

    // Input has already passed one of the syntactic checks above.
    fn decode(input: &str) -> CodecResult<BinaryUuid> {
        Uuid::try_parse(input)
            .map(BinaryUuid::from)
            .map_err(|e| CodecError::InvalidFormat(format!("'{}': {}", input, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMATTED: &str = "faea220a-e94e-442c-9ca0-5b39753e3549";
    const HEX: &str = "faea220ae94e442c9ca05b39753e3549";
    const RAW: [u8; 16] = [
        0xfa, 0xea, 0x22, 0x0a, 0xe9, 0x4e, 0x44, 0x2c, 0x9c, 0xa0, 0x5b, 0x39, 0x75, 0x3e, 0x35,
        0x49,
    ];

    #[test]
    fn test_parse_formatted_valid() {
        let uuid = UuidCodec::parse_formatted(FORMATTED).unwrap();
        assert_eq!(uuid.as_bytes(), &RAW);
    }

    #[test]
    fn test_parse_formatted_accepts_uppercase() {
        let uuid = UuidCodec::parse_formatted(&FORMATTED.to_uppercase()).unwrap();
        assert_eq!(uuid.as_bytes(), &RAW);
    }

    #[test]
    fn test_parse_formatted_rejects_hex_digest() {
        let result = UuidCodec::parse_formatted(HEX);

        match result {
            Err(CodecError::InvalidFormat(msg)) => {
                assert!(msg.contains("8-4-4-4-12"));
            }
            _ => panic!("Expected InvalidFormat error"),
        }
    }

    #[test]
    fn test_parse_formatted_rejects_misplaced_hyphens() {
        assert!(UuidCodec::parse_formatted("faea220ae-94e-442c-9ca0-5b39753e3549").is_err());
        assert!(UuidCodec::parse_formatted("faea220a-e94e-442c-9ca05-b39753e3549").is_err());
    }

    #[test]
    fn test_parse_formatted_rejects_other_uuid_notations() {
        assert!(UuidCodec::parse_formatted("{faea220a-e94e-442c-9ca0-5b39753e3549}").is_err());
        assert!(
            UuidCodec::parse_formatted("urn:uuid:faea220a-e94e-442c-9ca0-5b39753e3549").is_err()
        );
    }

    #[test]
    fn test_parse_formatted_rejects_invalid() {
        assert!(UuidCodec::parse_formatted("invalid").is_err());
        assert!(UuidCodec::parse_formatted("").is_err());
        assert!(UuidCodec::parse_formatted("faea220a-e94e-442c-9ca0-5b39753e35zz").is_err());
    }

    #[test]
    fn test_parse_hex_valid() {
        let uuid = UuidCodec::parse_hex(HEX).unwrap();
        assert_eq!(uuid.as_bytes(), &RAW);
    }

    #[test]
    fn test_parse_hex_accepts_uppercase() {
        let uuid = UuidCodec::parse_hex(&HEX.to_uppercase()).unwrap();
        assert_eq!(uuid.hex(), HEX);
    }

    #[test]
    fn test_parse_hex_rejects_hyphenated() {
        let result = UuidCodec::parse_hex(FORMATTED);

        match result {
            Err(CodecError::InvalidFormat(msg)) => {
                assert!(msg.contains("32 hex characters"));
            }
            _ => panic!("Expected InvalidFormat error"),
        }
    }

    #[test]
    fn test_parse_hex_rejects_wrong_length() {
        assert!(UuidCodec::parse_hex("faea220ae94e442c9ca05b39753e354").is_err());
        assert!(UuidCodec::parse_hex("faea220ae94e442c9ca05b39753e35490").is_err());
    }

    #[test]
    fn test_parse_hex_rejects_invalid_characters() {
        assert!(UuidCodec::parse_hex("faea220ae94e442c9ca05b39753e3zzz").is_err());
        // Multi-byte characters must not slip through a byte-length check.
        assert!(UuidCodec::parse_hex("faea220ae94e442c9ca05b39753e35é").is_err());
    }

    #[test]
    fn test_format_renders_lowercase_hyphenated() {
        assert_eq!(UuidCodec::format(&RAW).unwrap().as_deref(), Some(FORMATTED));
    }

    #[test]
    fn test_hex_renders_lowercase_digest() {
        assert_eq!(UuidCodec::hex(&RAW).unwrap().as_deref(), Some(HEX));
    }

    #[test]
    fn test_format_and_hex_empty_input_is_no_value() {
        assert_eq!(UuidCodec::format(&[]).unwrap(), None);
        assert_eq!(UuidCodec::hex(&[]).unwrap(), None);
    }

    #[test]
    fn test_format_rejects_wrong_length_blob() {
        assert!(UuidCodec::format(&RAW[..5]).is_err());
        assert!(UuidCodec::hex(&[0u8; 17]).is_err());
    }

    #[test]
    fn test_cross_encoding_equivalence() {
        let upper = "D8354FFF-F782-4B86-B4A7-7DB46A5426D7";
        let uuid = UuidCodec::parse_formatted(upper).unwrap();

        assert_eq!(uuid.hex(), upper.replace('-', "").to_lowercase());
    }

    #[test]
    fn test_round_trip_generated_values() {
        for _ in 0..32 {
            let original = UuidCodec::generate();
            let formatted = UuidCodec::format(original.as_bytes()).unwrap().unwrap();
            let hex = UuidCodec::hex(original.as_bytes()).unwrap().unwrap();

            assert_eq!(UuidCodec::parse_formatted(&formatted).unwrap(), original);
            assert_eq!(UuidCodec::parse_hex(&hex).unwrap(), original);
        }
    }

    #[test]
    fn test_round_trip_boundary_values() {
        for raw in [[0u8; 16], [0xff; 16]] {
            let uuid = BinaryUuid::from_bytes(raw);
            assert_eq!(UuidCodec::parse_formatted(&uuid.formatted()).unwrap(), uuid);
            assert_eq!(UuidCodec::parse_hex(&uuid.hex()).unwrap(), uuid);
        }
    }

    #[test]
    fn test_generate_produces_distinct_v4_values() {
        let a = UuidCodec::generate();
        let b = UuidCodec::generate();

        assert_ne!(a, b);
        assert_eq!(a.uuid().get_version_num(), 4);
    }

    #[test]
    fn test_from_slice_validates_length() {
        assert_eq!(BinaryUuid::from_slice(&RAW).unwrap().as_bytes(), &RAW);
        assert!(BinaryUuid::from_slice(&[]).is_err());
        assert!(BinaryUuid::from_slice(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_display_and_from_str() {
        let uuid: BinaryUuid = FORMATTED.parse().unwrap();

        assert_eq!(uuid.to_string(), FORMATTED);
        assert!("invalid".parse::<BinaryUuid>().is_err());
    }

    #[test]
    fn test_is_formatted_and_is_hex() {
        assert!(UuidCodec::is_formatted(FORMATTED));
        assert!(!UuidCodec::is_formatted(HEX));
        assert!(UuidCodec::is_hex(HEX));
        assert!(!UuidCodec::is_hex(FORMATTED));
        assert!(!UuidCodec::is_hex(""));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_serializes_formatted() {
        let uuid = UuidCodec::parse_hex(HEX).unwrap();
        let json = serde_json::to_string(&uuid).unwrap();

        assert_eq!(json, format!("\"{}\"", FORMATTED));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_deserializes_either_form() {
        let from_formatted: BinaryUuid =
            serde_json::from_str(&format!("\"{}\"", FORMATTED)).unwrap();
        let from_hex: BinaryUuid = serde_json::from_str(&format!("\"{}\"", HEX)).unwrap();

        assert_eq!(from_formatted, from_hex);
        assert!(serde_json::from_str::<BinaryUuid>("\"invalid\"").is_err());
    }
}
