use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Leading tag digit of every legacy canonical record. A format marker, not a version.
pub const LEGACY_VERIFIER: char = '1';

/// Width of an encoded name field: 13 letter slots of two digits each.
pub const NAME_FIELD_WIDTH: usize = 26;

/// Longest first token that fits in a name field.
pub const MAX_NAME_LETTERS: usize = NAME_FIELD_WIDTH / 2;

pub const COUNTRY_FIELD_WIDTH: usize = 4;

/// `YYYYMMDD`.
pub const DATE_FIELD_WIDTH: usize = 8;

pub const GENDER_FIELD_WIDTH: usize = 1;

/// verifier(1) + first(26) + last(26) + country(4) + date(8) + gender(1).
pub const CANONICAL_RECORD_LENGTH: usize =
    1 + 2 * NAME_FIELD_WIDTH + COUNTRY_FIELD_WIDTH + DATE_FIELD_WIDTH + GENDER_FIELD_WIDTH;

/// Added to the PIN to form the legacy multiply-add factor.
pub const LEGACY_PIN_OFFSET: u64 = 2025;

/// Version byte at the head of every quantum frame.
///
/// Format: [version=2:1B][salt:8B][IV:12B][ciphertext+tag]
pub const QUANTUM_VERSION: u8 = 2;

/// PBKDF2 salt length in bytes.
pub const SALT_LENGTH: usize = 8;

/// AES-GCM IV length in bytes (96 bits per NIST recommendation).
pub const AES_GCM_IV_LENGTH: usize = 12;

/// AES-GCM tag length in bytes (128 bits).
pub const AES_GCM_TAG_LENGTH: usize = 16;

/// AES key length in bytes (256 bits).
pub const AES_KEY_LENGTH: usize = 32;

/// version + salt + IV.
pub const FRAME_HEADER_LENGTH: usize = 1 + SALT_LENGTH + AES_GCM_IV_LENGTH;

/// PBKDF2-HMAC-SHA256 rounds used by the quantum protocol.
pub const DEFAULT_KDF_ITERATIONS: u32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            other => Err(format!("unknown gender: {other}")),
        }
    }
}

/// Protocol generation. Selected explicitly by the caller; codes are never
/// sniffed to guess which one produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Protocol {
    /// Arithmetic multiply-add obfuscation over the 66-digit canonical record.
    #[serde(rename = "v1")]
    V1,
    /// PBKDF2-SHA256 + AES-256-GCM with a versioned frame.
    #[serde(rename = "v2")]
    #[default]
    V2,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::V1 => f.write_str("v1"),
            Protocol::V2 => f.write_str("v2"),
        }
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" | "legacy" => Ok(Protocol::V1),
            "v2" | "2" | "quantum" => Ok(Protocol::V2),
            other => Err(format!("unknown protocol: {other}")),
        }
    }
}

/// The plaintext identity tuple accepted by both protocols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub birth_year: u16,
    pub birth_month: u8,
    pub birth_day: u8,
    pub gender: Gender,
}

/// Decoded identity as handed back to callers.
///
/// Every field is text so that legacy sentinels (`"??"`, `"????"`) travel as
/// data rather than as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub birth_year: String,
    pub birth_month: String,
    pub birth_day: String,
    pub gender: String,
}

impl PersonalInfo {
    /// Convert back into a typed record. Returns `None` if any field holds a
    /// sentinel or otherwise does not parse.
    pub fn to_record(&self) -> Option<IdentityRecord> {
        if self.country_code == crate::fields::UNKNOWN_COUNTRY {
            return None;
        }
        Some(IdentityRecord {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            country_code: self.country_code.clone(),
            birth_year: self.birth_year.parse().ok()?,
            birth_month: self.birth_month.parse().ok()?,
            birth_day: self.birth_day.parse().ok()?,
            gender: self.gender.parse().ok()?,
        })
    }
}

impl From<&IdentityRecord> for PersonalInfo {
    fn from(record: &IdentityRecord) -> Self {
        PersonalInfo {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            country_code: record.country_code.clone(),
            birth_year: format!("{:04}", record.birth_year),
            birth_month: format!("{:02}", record.birth_month),
            birth_day: format!("{:02}", record.birth_day),
            gender: record.gender.to_string(),
        }
    }
}
