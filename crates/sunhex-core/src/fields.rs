//! Per-attribute encoders for the fixed-width legacy record.
//!
//! Encoders are total except for names (unencodable characters) and countries
//! (codes missing from the table). Decoders never fail: malformed input comes
//! back as a sentinel that callers must treat as "unparseable".

use crate::countries;
use crate::error::CodecError;
use crate::types::{Gender, DATE_FIELD_WIDTH, MAX_NAME_LETTERS, NAME_FIELD_WIDTH};

/// "OVERFLOW" pre-encoded and padded to a full name field.
pub const NAME_OVERFLOW_FIELD: &str = "15220518061215230000000000";

/// Decoded country when the numeric identifier is not in the table.
pub const UNKNOWN_COUNTRY: &str = "??";

/// Decoded year when the date field is malformed.
pub const UNKNOWN_YEAR: &str = "????";

/// Decoded month or day when the date field is malformed.
pub const UNKNOWN_DATE_PART: &str = "??";

/// Placeholder for a name slot that does not map to a letter.
const UNKNOWN_LETTER: char = '?';

fn letter_code(c: char) -> Option<u8> {
    match c {
        '-' => Some(0),
        'A'..='Z' => Some(c as u8 - b'A' + 1),
        _ => None,
    }
}

fn letter_for(chunk: &[u8]) -> Option<char> {
    let text = std::str::from_utf8(chunk).ok()?;
    if text.len() != 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match text.parse::<u8>().ok()? {
        n @ 1..=26 => Some((b'A' + n - 1) as char),
        _ => None,
    }
}

/// Encode the first whitespace-delimited token of `name` into 26 digits.
///
/// Tokens longer than 13 letters yield [`NAME_OVERFLOW_FIELD`]; an empty name
/// yields an all-padding field.
pub fn encode_name(name: &str) -> Result<String, CodecError> {
    let token = name.split_whitespace().next().unwrap_or("");
    let codes = token
        .chars()
        .map(|ch| letter_code(ch.to_ascii_uppercase()).ok_or(CodecError::InvalidCharacter(ch)))
        .collect::<Result<Vec<u8>, _>>()?;
    if codes.len() > MAX_NAME_LETTERS {
        return Ok(NAME_OVERFLOW_FIELD.to_string());
    }
    let encoded: String = codes.iter().map(|code| format!("{code:02}")).collect();
    Ok(format!("{encoded:0<width$}", width = NAME_FIELD_WIDTH))
}

/// Decode a name field. Reading stops at the first `00` pair; unknown pairs
/// become `?`. The result is capitalized ("JOHN" -> "John").
pub fn decode_name(field: &str) -> String {
    let mut letters = String::with_capacity(MAX_NAME_LETTERS);
    for chunk in field.as_bytes().chunks(2) {
        if chunk == b"00" {
            break;
        }
        letters.push(letter_for(chunk).unwrap_or(UNKNOWN_LETTER));
    }
    capitalize(&letters.to_lowercase())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_alphanumeric() || first == '_' => {
            first.to_uppercase().chain(chars).collect()
        }
        _ => word.to_string(),
    }
}

pub fn encode_country(code: &str) -> Result<String, CodecError> {
    countries::number_for(&code.to_ascii_uppercase())
        .map(str::to_string)
        .ok_or_else(|| CodecError::UnknownCountry(code.to_string()))
}

pub fn decode_country(field: &str) -> String {
    countries::code_for(field)
        .unwrap_or(UNKNOWN_COUNTRY)
        .to_string()
}

/// `YYYYMMDD`. Calendar validity is the caller's concern.
pub fn encode_date(year: u32, month: u32, day: u32) -> String {
    format!("{year:04}{month:02}{day:02}")
}

/// Split a date field into `(year, month, day)`, or the sentinel triple
/// `("????", "??", "??")` if it is not exactly eight characters.
pub fn decode_date(field: &str) -> (String, String, String) {
    if field.len() != DATE_FIELD_WIDTH || !field.is_ascii() {
        return (
            UNKNOWN_YEAR.to_string(),
            UNKNOWN_DATE_PART.to_string(),
            UNKNOWN_DATE_PART.to_string(),
        );
    }
    (
        field[0..4].to_string(),
        field[4..6].to_string(),
        field[6..8].to_string(),
    )
}

/// Collapse a gender label to one digit: male-like labels (`male`, `m`, `1`,
/// any case) become `1`, everything else `0`. Lossy by construction.
pub fn encode_gender(gender: &str) -> &'static str {
    match gender.to_lowercase().as_str() {
        "male" | "m" | "1" => "1",
        _ => "0",
    }
}

pub fn decode_gender(field: &str) -> Gender {
    if field == "1" {
        Gender::Male
    } else {
        Gender::Female
    }
}
