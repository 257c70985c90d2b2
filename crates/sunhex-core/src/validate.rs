//! Input checks applied by the front ends before anything reaches the codec.
//!
//! The codec itself accepts anything it can encode; these rules are the
//! stricter contract offered to end users.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::countries;
use crate::types::{Gender, IdentityRecord};

pub const MAX_NAME_CHARS: usize = 50;
pub const MIN_BIRTH_YEAR: i64 = 1900;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{path} is required")]
    Required { path: &'static str },

    #[error("{path} too long (max {max} characters)")]
    TooLong { path: &'static str, max: usize },

    #[error("Invalid country code")]
    UnknownCountry { path: &'static str },

    #[error("{path} must be between {min} and {max}, got {got}")]
    OutOfRange {
        path: &'static str,
        min: i64,
        max: i64,
        got: i64,
    },

    #[error("Invalid birth date (e.g., February 31st)")]
    InvalidDate { path: &'static str },

    #[error("Gender must be Male, Female or Other")]
    InvalidGender { path: &'static str },

    #[error("PIN must be 4-6 digits")]
    InvalidPin { path: &'static str },

    #[error("Invalid hex format")]
    InvalidHex { path: &'static str },
}

impl ValidationError {
    /// The camelCase name of the offending input field.
    pub fn path(&self) -> &'static str {
        match self {
            ValidationError::Required { path }
            | ValidationError::TooLong { path, .. }
            | ValidationError::UnknownCountry { path }
            | ValidationError::OutOfRange { path, .. }
            | ValidationError::InvalidDate { path }
            | ValidationError::InvalidGender { path }
            | ValidationError::InvalidPin { path }
            | ValidationError::InvalidHex { path } => path,
        }
    }
}

pub fn name(path: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { path });
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::TooLong {
            path,
            max: MAX_NAME_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

/// Returns the upper-cased code.
pub fn country(value: &str) -> Result<String, ValidationError> {
    let code = value.trim().to_ascii_uppercase();
    if !countries::is_supported(&code) {
        return Err(ValidationError::UnknownCountry { path: "countryCode" });
    }
    Ok(code)
}

fn in_range(path: &'static str, got: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if got < min || got > max {
        return Err(ValidationError::OutOfRange {
            path,
            min,
            max,
            got,
        });
    }
    Ok(())
}

/// Checks each part's range, then that the triple is a real calendar date.
pub fn birth_date(year: i64, month: i64, day: i64) -> Result<(u16, u8, u8), ValidationError> {
    in_range("birthYear", year, MIN_BIRTH_YEAR, i64::from(Utc::now().year()))?;
    in_range("birthMonth", month, 1, 12)?;
    in_range("birthDay", day, 1, 31)?;

    // Ranges are checked above, so these conversions cannot truncate.
    let (year, month, day) = (year as u16, month as u8, day as u8);
    NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
        .ok_or(ValidationError::InvalidDate { path: "birthDay" })?;
    Ok((year, month, day))
}

pub fn gender(value: &str) -> Result<Gender, ValidationError> {
    value
        .parse()
        .map_err(|_| ValidationError::InvalidGender { path: "gender" })
}

pub fn pin(value: &str) -> Result<&str, ValidationError> {
    let ok = (4..=6).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit());
    if !ok {
        return Err(ValidationError::InvalidPin { path: "pin" });
    }
    Ok(value)
}

/// A validated PIN as the number the legacy protocol works with.
pub fn numeric_pin(value: &str) -> Result<u32, ValidationError> {
    pin(value)?
        .parse()
        .map_err(|_| ValidationError::InvalidPin { path: "pin" })
}

pub fn hex_code(value: &str) -> Result<&str, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required { path: "hexCode" });
    }
    if !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidHex { path: "hexCode" });
    }
    Ok(value)
}

/// Raw generate input as it arrives from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub birth_year: i64,
    pub birth_month: i64,
    pub birth_day: i64,
    pub gender: String,
    pub pin: String,
}

impl GenerateRequest {
    /// Validate every field, stopping at the first failure.
    pub fn validate(&self) -> Result<IdentityRecord, ValidationError> {
        let first_name = name("firstName", &self.first_name)?;
        let last_name = name("lastName", &self.last_name)?;
        let country_code = country(&self.country_code)?;
        let (birth_year, birth_month, birth_day) =
            birth_date(self.birth_year, self.birth_month, self.birth_day)?;
        let gender = gender(&self.gender)?;
        pin(&self.pin)?;
        Ok(IdentityRecord {
            first_name,
            last_name,
            country_code,
            birth_year,
            birth_month,
            birth_day,
            gender,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeRequest {
    pub hex_code: String,
    pub pin: String,
}

impl DecodeRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        hex_code(&self.hex_code)?;
        pin(&self.pin)?;
        Ok(())
    }
}
