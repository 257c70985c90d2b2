use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural problems found in a record after the protective layer has been
/// removed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordFault {
    #[error("invalid SIN length after decoding: {got} (expected {expected})")]
    Length { got: usize, expected: usize },

    #[error("incorrect verifier")]
    Verifier,

    #[error("record contains non-digit characters")]
    NonDigit,

    #[error("secured value is not a multiple of the PIN factor")]
    Remainder,

    #[error("packed record is truncated")]
    Truncated,

    #[error("unknown gender tag {0}")]
    GenderTag(u8),

    #[error("name is not valid UTF-8")]
    Utf8,

    #[error("{field} is too long to pack ({len} bytes)")]
    FieldTooLong { field: &'static str, len: usize },
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid character in name: {0}")]
    InvalidCharacter(char),

    #[error("Invalid country code: {0}")]
    UnknownCountry(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(RecordFault),

    #[error("Unsupported protocol version: {0}")]
    UnsupportedVersion(u8),

    /// Wrong PIN and damaged ciphertext are deliberately reported the same way.
    #[error("Invalid PIN or corrupted SIN code")]
    DecryptionFailed,

    #[error("Malformed hex code: {0}")]
    MalformedHex(String),

    #[error("Invalid PIN: {0}")]
    InvalidPin(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}

impl From<RecordFault> for CodecError {
    fn from(fault: RecordFault) -> Self {
        CodecError::MalformedRecord(fault)
    }
}

/// Stable, serializable error category reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidCharacter,
    UnknownCountry,
    MalformedRecord,
    UnsupportedVersion,
    DecryptionFailed,
    MalformedHex,
    InvalidPin,
    Internal,
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::InvalidCharacter(_) => ErrorKind::InvalidCharacter,
            CodecError::UnknownCountry(_) => ErrorKind::UnknownCountry,
            CodecError::MalformedRecord(_) => ErrorKind::MalformedRecord,
            CodecError::UnsupportedVersion(_) => ErrorKind::UnsupportedVersion,
            CodecError::DecryptionFailed => ErrorKind::DecryptionFailed,
            CodecError::MalformedHex(_) => ErrorKind::MalformedHex,
            CodecError::InvalidPin(_) => ErrorKind::InvalidPin,
            CodecError::EncryptionFailed(_) | CodecError::RngFailed(_) => ErrorKind::Internal,
        }
    }
}
