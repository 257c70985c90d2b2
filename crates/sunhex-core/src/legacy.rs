//! Legacy (V1) arithmetic cipher.
//!
//! The 66-digit canonical record is read as one integer `r` and protected as
//! `r * f + f` where `f = pin + 2025`. This is obfuscation only: the PIN space
//! is small and a wrong guess is detectable, so the record can be brute-forced.
//! It is kept solely so previously issued codes keep decoding.

use num_bigint::BigUint;
use num_traits::{CheckedSub, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, RecordFault};
use crate::record::CanonicalRecord;
use crate::types::{PersonalInfo, LEGACY_PIN_OFFSET};

/// The encoded sub-fields reported by a legacy generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedComponents {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub date: String,
    pub gender: String,
}

/// Intermediate values of a legacy generate, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTrace {
    /// The 66-digit canonical record.
    pub original_sin: String,
    /// The secured integer in decimal.
    pub secured_sin: String,
    pub components: EncodedComponents,
}

/// The raw sub-fields sliced out of a decoded legacy record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComponents {
    pub verifier: String,
    pub first_name_encoded: String,
    pub last_name_encoded: String,
    pub country_encoded: String,
    pub date_encoded: String,
    pub gender_encoded: String,
}

/// Intermediate values of a legacy decode, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeTrace {
    /// The code exactly as the caller supplied it.
    pub hex_code: String,
    pub secured_sin: String,
    pub original_sin: String,
    pub raw_components: RawComponents,
}

impl From<&CanonicalRecord> for EncodedComponents {
    fn from(record: &CanonicalRecord) -> Self {
        EncodedComponents {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            country: record.country.clone(),
            date: record.date.clone(),
            gender: record.gender.clone(),
        }
    }
}

impl From<CanonicalRecord> for RawComponents {
    fn from(record: CanonicalRecord) -> Self {
        RawComponents {
            verifier: record.verifier,
            first_name_encoded: record.first_name,
            last_name_encoded: record.last_name,
            country_encoded: record.country,
            date_encoded: record.date,
            gender_encoded: record.gender,
        }
    }
}

fn factor(pin: u32) -> BigUint {
    BigUint::from(u64::from(pin) + LEGACY_PIN_OFFSET)
}

/// `digits * (pin + 2025) + (pin + 2025)`.
pub fn secure(record_digits: &str, pin: u32) -> Result<BigUint, CodecError> {
    if record_digits.is_empty() || !record_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RecordFault::NonDigit.into());
    }
    let value =
        BigUint::parse_bytes(record_digits.as_bytes(), 10).ok_or(RecordFault::NonDigit)?;
    let f = factor(pin);
    Ok(value * &f + &f)
}

/// `(secured - (pin + 2025)) / (pin + 2025)`, rendered in decimal.
///
/// The division must be exact; a remainder means the PIN is wrong or the code
/// was altered.
pub fn resolve(secured: &BigUint, pin: u32) -> Result<String, CodecError> {
    let f = factor(pin);
    let shifted = secured.checked_sub(&f).ok_or(RecordFault::Remainder)?;
    if !(&shifted % &f).is_zero() {
        return Err(RecordFault::Remainder.into());
    }
    Ok((shifted / &f).to_str_radix(10))
}

/// Upper-case hex, no prefix.
pub fn to_hex(value: &BigUint) -> String {
    value.to_str_radix(16).to_uppercase()
}

pub fn from_hex(hex: &str) -> Result<BigUint, CodecError> {
    if hex.is_empty() {
        return Err(CodecError::MalformedHex("empty code".into()));
    }
    if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(CodecError::MalformedHex(format!("unexpected character {bad:?}")));
    }
    BigUint::parse_bytes(hex.as_bytes(), 16)
        .ok_or_else(|| CodecError::MalformedHex("not a hexadecimal number".into()))
}

/// Secure an already-encoded canonical record and render it as hex.
pub fn generate(record: &CanonicalRecord, pin: u32) -> Result<(String, GenerateTrace), CodecError> {
    let digits = record.to_digits()?;
    let secured = secure(&digits, pin)?;
    let hex_code = to_hex(&secured);
    let trace = GenerateTrace {
        original_sin: digits,
        secured_sin: secured.to_str_radix(10),
        components: EncodedComponents::from(record),
    };
    Ok((hex_code, trace))
}

/// Reverse [`generate`]: hex parse, resolve, then the length and verifier checks.
pub fn decode(hex_code: &str, pin: u32) -> Result<(PersonalInfo, DecodeTrace), CodecError> {
    let secured = from_hex(hex_code)?;
    let digits = resolve(&secured, pin)?;
    let components = CanonicalRecord::parse(&digits)?;
    let info = components.decode();
    let trace = DecodeTrace {
        hex_code: hex_code.to_string(),
        secured_sin: secured.to_str_radix(10),
        original_sin: digits,
        raw_components: components.into(),
    };
    Ok((info, trace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::build;
    use crate::types::{Gender, IdentityRecord};

    fn john() -> IdentityRecord {
        IdentityRecord {
            first_name: "John".into(),
            last_name: "Doe".into(),
            country_code: "US".into(),
            birth_year: 1990,
            birth_month: 5,
            birth_day: 15,
            gender: Gender::Male,
        }
    }

    #[test]
    fn secure_is_multiply_add() {
        // 1 * (0 + 2025) + 2025
        assert_eq!(secure("1", 0).unwrap(), BigUint::from(4050u32));
        // 10 * 3259 + 3259
        assert_eq!(secure("10", 1234).unwrap(), BigUint::from(35849u32));
    }

    #[test]
    fn resolve_inverts_secure() {
        let digits = build(&john()).unwrap();
        for pin in [0, 1234, 99_999, 999_999] {
            let secured = secure(&digits, pin).unwrap();
            assert_eq!(resolve(&secured, pin).unwrap(), digits);
        }
    }

    #[test]
    fn secure_rejects_non_digits() {
        assert!(secure("", 1234).is_err());
        assert!(secure("12a4", 1234).is_err());
        assert!(secure("1_000", 1234).is_err());
    }

    #[test]
    fn resolve_rejects_value_below_factor() {
        assert!(matches!(
            resolve(&BigUint::from(10u32), 1234),
            Err(CodecError::MalformedRecord(RecordFault::Remainder))
        ));
    }

    #[test]
    fn hex_is_uppercase_without_prefix() {
        assert_eq!(to_hex(&BigUint::from(0xabcdefu32)), "ABCDEF");
        assert_eq!(from_hex("abcdef").unwrap(), BigUint::from(0xabcdefu32));
        assert_eq!(from_hex("00FF").unwrap(), BigUint::from(255u32));
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(matches!(from_hex(""), Err(CodecError::MalformedHex(_))));
        assert!(matches!(from_hex("0xFF"), Err(CodecError::MalformedHex(_))));
        assert!(matches!(from_hex("12 34"), Err(CodecError::MalformedHex(_))));
        assert!(matches!(from_hex("GG"), Err(CodecError::MalformedHex(_))));
    }

    #[test]
    fn generate_decode_round_trip() {
        let record = CanonicalRecord::from_identity(&john()).unwrap();
        let (hex_code, trace) = generate(&record, 1234).unwrap();
        assert_eq!(trace.original_sin.len(), 66);
        assert_eq!(to_hex(&trace.secured_sin.parse::<BigUint>().unwrap()), hex_code);

        let (info, decoded) = decode(&hex_code, 1234).unwrap();
        assert_eq!(info.to_record(), Some(john()));
        assert_eq!(decoded.hex_code, hex_code);
        assert_eq!(decoded.secured_sin, trace.secured_sin);
        assert_eq!(decoded.original_sin, trace.original_sin);
        assert_eq!(decoded.raw_components.verifier, "1");
        assert_eq!(decoded.raw_components.first_name_encoded, trace.components.first_name);
        assert_eq!(decoded.raw_components.country_encoded, "2119");
    }

    #[test]
    fn reference_code_is_stable() {
        let record = CanonicalRecord::from_identity(&john()).unwrap();
        let (hex_code, _) = generate(&record, 1234).unwrap();
        assert_eq!(
            hex_code,
            "D50BBB1A7D3C46A10C77BF800C0071B0D214F898318FAE773C0A4E6A0"
        );
    }

    #[test]
    fn generate_is_deterministic() {
        let record = CanonicalRecord::from_identity(&john()).unwrap();
        let (a, _) = generate(&record, 4321).unwrap();
        let (b, _) = generate(&record, 4321).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn wrong_pin_fails() {
        let record = CanonicalRecord::from_identity(&john()).unwrap();
        let (hex_code, _) = generate(&record, 1234).unwrap();
        assert!(decode(&hex_code, 1235).is_err());
        assert!(decode(&hex_code, 4321).is_err());
    }

    #[test]
    fn decode_reports_length_fault() {
        // 5 * 3259 + 3259: divides cleanly but resolves to the single digit 5.
        let hex_code = to_hex(&secure("5", 1234).unwrap());
        assert!(matches!(
            decode(&hex_code, 1234),
            Err(CodecError::MalformedRecord(RecordFault::Length { got: 1, expected: 66 }))
        ));
    }

    #[test]
    fn decode_reports_verifier_fault() {
        let digits = format!("2{}", &build(&john()).unwrap()[1..]);
        let hex_code = to_hex(&secure(&digits, 1234).unwrap());
        assert!(matches!(
            decode(&hex_code, 1234),
            Err(CodecError::MalformedRecord(RecordFault::Verifier))
        ));
    }
}
