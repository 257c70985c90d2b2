//! Canonical record layouts.
//!
//! Legacy (V1) records are 66 decimal digits at fixed offsets:
//! `[0]` verifier, `[1..27]` first name, `[27..53]` last name,
//! `[53..57]` country, `[57..65]` date, `[65]` gender.
//!
//! Quantum (V2) records are packed bytes:
//! `[first_len:2 BE][first UTF-8][last_len:2 BE][last UTF-8][country:2 BE][year:2 BE][month:1][day:1][gender:1]`

use serde::{Deserialize, Serialize};

use crate::countries;
use crate::error::{CodecError, RecordFault};
use crate::fields::{
    decode_country, decode_date, decode_gender, decode_name, encode_country, encode_date,
    encode_gender, encode_name, UNKNOWN_COUNTRY,
};
use crate::types::{
    Gender, IdentityRecord, PersonalInfo, CANONICAL_RECORD_LENGTH, COUNTRY_FIELD_WIDTH,
    LEGACY_VERIFIER, NAME_FIELD_WIDTH,
};

const FIRST_NAME_AT: usize = 1;
const LAST_NAME_AT: usize = FIRST_NAME_AT + NAME_FIELD_WIDTH;
const COUNTRY_AT: usize = LAST_NAME_AT + NAME_FIELD_WIDTH;
const DATE_AT: usize = COUNTRY_AT + COUNTRY_FIELD_WIDTH;
const GENDER_AT: usize = CANONICAL_RECORD_LENGTH - 1;

/// The encoded sub-fields of a legacy record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    pub verifier: String,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub date: String,
    pub gender: String,
}

impl CanonicalRecord {
    /// Encode loosely-typed legacy inputs. `gender` accepts any label; see
    /// [`encode_gender`].
    pub fn from_fields(
        first_name: &str,
        last_name: &str,
        country_code: &str,
        birth_year: u32,
        birth_month: u32,
        birth_day: u32,
        gender: &str,
    ) -> Result<Self, CodecError> {
        Ok(CanonicalRecord {
            verifier: LEGACY_VERIFIER.to_string(),
            first_name: encode_name(first_name)?,
            last_name: encode_name(last_name)?,
            country: encode_country(country_code)?,
            date: encode_date(birth_year, birth_month, birth_day),
            gender: encode_gender(gender).to_string(),
        })
    }

    pub fn from_identity(record: &IdentityRecord) -> Result<Self, CodecError> {
        Self::from_fields(
            &record.first_name,
            &record.last_name,
            &record.country_code,
            u32::from(record.birth_year),
            u32::from(record.birth_month),
            u32::from(record.birth_day),
            record.gender.as_str(),
        )
    }

    /// Concatenate the sub-fields, failing if the result is not exactly 66
    /// digits (e.g. a five-digit year), since such a record could never decode.
    pub fn to_digits(&self) -> Result<String, CodecError> {
        let digits = [
            self.verifier.as_str(),
            &self.first_name,
            &self.last_name,
            &self.country,
            &self.date,
            &self.gender,
        ]
        .concat();
        if digits.len() != CANONICAL_RECORD_LENGTH {
            return Err(RecordFault::Length {
                got: digits.len(),
                expected: CANONICAL_RECORD_LENGTH,
            }
            .into());
        }
        Ok(digits)
    }

    /// Split a 66-digit string at the fixed offsets.
    pub fn parse(digits: &str) -> Result<Self, CodecError> {
        if digits.len() != CANONICAL_RECORD_LENGTH {
            return Err(RecordFault::Length {
                got: digits.len(),
                expected: CANONICAL_RECORD_LENGTH,
            }
            .into());
        }
        if !digits.starts_with(LEGACY_VERIFIER) {
            return Err(RecordFault::Verifier.into());
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RecordFault::NonDigit.into());
        }
        Ok(CanonicalRecord {
            verifier: digits[..FIRST_NAME_AT].to_string(),
            first_name: digits[FIRST_NAME_AT..LAST_NAME_AT].to_string(),
            last_name: digits[LAST_NAME_AT..COUNTRY_AT].to_string(),
            country: digits[COUNTRY_AT..DATE_AT].to_string(),
            date: digits[DATE_AT..GENDER_AT].to_string(),
            gender: digits[GENDER_AT..].to_string(),
        })
    }

    /// Best-effort decode; unrecognized sub-fields come back as sentinels.
    pub fn decode(&self) -> PersonalInfo {
        let (birth_year, birth_month, birth_day) = decode_date(&self.date);
        PersonalInfo {
            first_name: decode_name(&self.first_name),
            last_name: decode_name(&self.last_name),
            country_code: decode_country(&self.country),
            birth_year,
            birth_month,
            birth_day,
            gender: decode_gender(&self.gender).to_string(),
        }
    }
}

/// Build the 66-digit legacy record for `record`.
pub fn build(record: &IdentityRecord) -> Result<String, CodecError> {
    CanonicalRecord::from_identity(record)?.to_digits()
}

/// Parse and decode a 66-digit legacy record.
pub fn parse(digits: &str) -> Result<PersonalInfo, CodecError> {
    Ok(CanonicalRecord::parse(digits)?.decode())
}

fn gender_tag(gender: Gender) -> u8 {
    match gender {
        Gender::Male => 0,
        Gender::Female => 1,
        Gender::Other => 2,
    }
}

fn gender_from_tag(tag: u8) -> Result<Gender, RecordFault> {
    match tag {
        0 => Ok(Gender::Male),
        1 => Ok(Gender::Female),
        2 => Ok(Gender::Other),
        other => Err(RecordFault::GenderTag(other)),
    }
}

fn push_text(buf: &mut Vec<u8>, field: &'static str, text: &str) -> Result<(), CodecError> {
    let len = u16::try_from(text.len()).map_err(|_| RecordFault::FieldTooLong {
        field,
        len: text.len(),
    })?;
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(text.as_bytes());
    Ok(())
}

/// Pack a record for the quantum protocol. Lossless for every field.
pub fn pack(record: &IdentityRecord) -> Result<Vec<u8>, CodecError> {
    let country = encode_country(&record.country_code)?;
    let country: u16 = country
        .parse()
        .map_err(|_| CodecError::UnknownCountry(record.country_code.clone()))?;

    let mut buf = Vec::with_capacity(2 + record.first_name.len() + 2 + record.last_name.len() + 7);
    push_text(&mut buf, "first name", &record.first_name)?;
    push_text(&mut buf, "last name", &record.last_name)?;
    buf.extend_from_slice(&country.to_be_bytes());
    buf.extend_from_slice(&record.birth_year.to_be_bytes());
    buf.push(record.birth_month);
    buf.push(record.birth_day);
    buf.push(gender_tag(record.gender));
    Ok(buf)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], RecordFault> {
        let end = self.pos.checked_add(n).ok_or(RecordFault::Truncated)?;
        let slice = self.buf.get(self.pos..end).ok_or(RecordFault::Truncated)?;
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, RecordFault> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, RecordFault> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn text(&mut self) -> Result<String, RecordFault> {
        let len = self.u16()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| RecordFault::Utf8)
    }
}

/// Inverse of [`pack`]. An unknown country number decodes to `"??"`.
pub fn unpack(bytes: &[u8]) -> Result<IdentityRecord, CodecError> {
    let mut reader = Reader { buf: bytes, pos: 0 };
    let first_name = reader.text()?;
    let last_name = reader.text()?;
    let country = format!("{:04}", reader.u16()?);
    let birth_year = reader.u16()?;
    let birth_month = reader.u8()?;
    let birth_day = reader.u8()?;
    let gender = gender_from_tag(reader.u8()?)?;
    if reader.pos != bytes.len() {
        return Err(RecordFault::Length {
            got: bytes.len(),
            expected: reader.pos,
        }
        .into());
    }
    Ok(IdentityRecord {
        first_name,
        last_name,
        country_code: countries::code_for(&country)
            .unwrap_or(UNKNOWN_COUNTRY)
            .to_string(),
        birth_year,
        birth_month,
        birth_day,
        gender,
    })
}
