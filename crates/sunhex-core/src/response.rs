//! The `{status, ...}` envelope returned by the four public entry points.

use serde::{Deserialize, Serialize};

use crate::codec::{Decoded, Encoded};
use crate::error::{CodecError, ErrorKind};
use crate::legacy::{self, DecodeTrace, GenerateTrace};
use crate::quantum;
use crate::record::CanonicalRecord;
use crate::types::{IdentityRecord, PersonalInfo, DEFAULT_KDF_ITERATIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Legacy diagnostics. Generate and decode report different shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DebugInfo {
    Decode(DecodeTrace),
    Generate(GenerateTrace),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinResponse {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<DebugInfo>,
}

impl SinResponse {
    fn empty(status: Status) -> Self {
        Self {
            status,
            hex_code: None,
            personal_info: None,
            message: None,
            code: None,
            debug_info: None,
        }
    }

    pub fn encoded(encoded: Encoded) -> Self {
        Self {
            hex_code: Some(encoded.hex_code),
            debug_info: encoded.trace.map(DebugInfo::Generate),
            ..Self::empty(Status::Success)
        }
    }

    pub fn decoded(decoded: Decoded) -> Self {
        Self {
            personal_info: Some(decoded.info),
            debug_info: decoded.trace.map(DebugInfo::Decode),
            ..Self::empty(Status::Success)
        }
    }

    pub fn failure(err: &CodecError) -> Self {
        Self {
            message: Some(err.to_string()),
            code: Some(err.kind()),
            ..Self::empty(Status::Error)
        }
    }

    /// A rejection that happened before the codec ran, e.g. failed input
    /// validation.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty(Status::Error)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn from_generate(result: Result<Encoded, CodecError>) -> Self {
        result.map_or_else(|e| Self::failure(&e), Self::encoded)
    }

    pub fn from_decode(result: Result<Decoded, CodecError>) -> Self {
        result.map_or_else(|e| Self::failure(&e), Self::decoded)
    }
}

/// Legacy generate over loosely-typed fields. `gender` accepts any label.
#[allow(clippy::too_many_arguments)]
pub fn generate_v1(
    first_name: &str,
    last_name: &str,
    country_code: &str,
    birth_year: u32,
    birth_month: u32,
    birth_day: u32,
    gender: &str,
    pin: u32,
) -> SinResponse {
    let result = CanonicalRecord::from_fields(
        first_name,
        last_name,
        country_code,
        birth_year,
        birth_month,
        birth_day,
        gender,
    )
    .and_then(|record| legacy::generate(&record, pin))
    .map(|(hex_code, trace)| Encoded {
        hex_code,
        trace: Some(trace),
    });
    SinResponse::from_generate(result)
}

pub fn decode_v1(hex_code: &str, pin: u32) -> SinResponse {
    let result = legacy::decode(hex_code, pin).map(|(info, trace)| Decoded {
        info,
        trace: Some(trace),
    });
    SinResponse::from_decode(result)
}

/// Quantum generate at the standard KDF cost.
pub fn generate_v2(record: &IdentityRecord, pin: &str) -> SinResponse {
    let result =
        quantum::encrypt_frame(record, pin, DEFAULT_KDF_ITERATIONS).map(|hex_code| Encoded {
            hex_code,
            trace: None,
        });
    SinResponse::from_generate(result)
}

pub fn decode_v2(hex_code: &str, pin: &str) -> SinResponse {
    let result =
        quantum::decrypt_frame(hex_code, pin, DEFAULT_KDF_ITERATIONS).map(|record| Decoded {
            info: PersonalInfo::from(&record),
            trace: None,
        });
    SinResponse::from_decode(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gender;
    use serde_json::{json, Value};

    const JOHN_DOE_V1: &str = "D50BBB1A7D3C46A10C77BF800C0071B0D214F898318FAE773C0A4E6A0";
    const JOHN_DOE_DIGITS: &str =
        "110150814000000000000000000041505000000000000000000002119199005151";
    const JOHN_DOE_SECURED: &str =
        "358981502826000000000000000135264795000000000000000006906469557790368";

    #[test]
    fn generate_v1_success_shape() {
        let response = generate_v1("John", "Doe", "US", 1990, 5, 15, "Male", 1234);
        assert!(response.is_success());
        assert_eq!(response.hex_code.as_deref(), Some(JOHN_DOE_V1));

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["hexCode"], JOHN_DOE_V1);
        assert!(value.get("message").is_none());
        assert!(value.get("personalInfo").is_none());
        assert_eq!(
            value["debugInfo"],
            json!({
                "originalSin": JOHN_DOE_DIGITS,
                "securedSin": JOHN_DOE_SECURED,
                "components": {
                    "firstName": "10150814000000000000000000",
                    "lastName": "04150500000000000000000000",
                    "country": "2119",
                    "date": "19900515",
                    "gender": "1",
                },
            })
        );
    }

    #[test]
    fn generate_v1_gender_labels_are_loose() {
        let male = generate_v1("John", "Doe", "US", 1990, 5, 15, "m", 1234);
        assert_eq!(male.hex_code.as_deref(), Some(JOHN_DOE_V1));
        let other = generate_v1("John", "Doe", "US", 1990, 5, 15, "nonbinary", 1234);
        let decoded = decode_v1(other.hex_code.as_deref().unwrap(), 1234);
        assert_eq!(decoded.personal_info.unwrap().gender, "Female");
    }

    #[test]
    fn decode_v1_success_shape() {
        let response = decode_v1(JOHN_DOE_V1, 1234);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value["personalInfo"],
            json!({
                "firstName": "John",
                "lastName": "Doe",
                "countryCode": "US",
                "birthYear": "1990",
                "birthMonth": "05",
                "birthDay": "15",
                "gender": "Male",
            })
        );
        assert_eq!(
            value["debugInfo"],
            json!({
                "hexCode": JOHN_DOE_V1,
                "securedSin": JOHN_DOE_SECURED,
                "originalSin": JOHN_DOE_DIGITS,
                "rawComponents": {
                    "verifier": "1",
                    "firstNameEncoded": "10150814000000000000000000",
                    "lastNameEncoded": "04150500000000000000000000",
                    "countryEncoded": "2119",
                    "dateEncoded": "19900515",
                    "genderEncoded": "1",
                },
            })
        );
    }

    #[test]
    fn decode_debug_info_echoes_the_code_as_given() {
        let lower = JOHN_DOE_V1.to_lowercase();
        let response = decode_v1(&lower, 1234);
        let Some(DebugInfo::Decode(trace)) = response.debug_info else {
            panic!("expected decode debug info");
        };
        assert_eq!(trace.hex_code, lower);
    }

    #[test]
    fn debug_info_round_trips_through_json() {
        let generated = generate_v1("John", "Doe", "US", 1990, 5, 15, "Male", 1234);
        let decoded = decode_v1(JOHN_DOE_V1, 1234);
        for response in [generated, decoded] {
            let json = serde_json::to_string(&response).unwrap();
            let back: SinResponse = serde_json::from_str(&json).unwrap();
            assert_eq!(back, response);
        }
    }

    #[test]
    fn errors_carry_message_and_code() {
        let response = generate_v1("J0hn", "Doe", "US", 1990, 5, 15, "Male", 1234);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["code"], "INVALID_CHARACTER");
        assert_eq!(value["message"], "Invalid character in name: 0");
        assert!(value.get("hexCode").is_none());
        assert!(value.get("debugInfo").is_none());

        let response = generate_v1("John", "Doe", "XX", 1990, 5, 15, "Male", 1234);
        assert_eq!(response.code, Some(ErrorKind::UnknownCountry));

        let response = decode_v1("not hex", 1234);
        assert_eq!(response.code, Some(ErrorKind::MalformedHex));

        let response = decode_v1(JOHN_DOE_V1, 1235);
        assert_eq!(response.code, Some(ErrorKind::MalformedRecord));
    }

    #[test]
    fn v2_round_trip_has_no_debug_info() {
        let record = IdentityRecord {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            country_code: "US".into(),
            birth_year: 1995,
            birth_month: 5,
            birth_day: 12,
            gender: Gender::Female,
        };
        let generated = generate_v2(&record, "1234");
        assert!(generated.is_success());
        assert!(generated.debug_info.is_none());

        let decoded = decode_v2(generated.hex_code.as_deref().unwrap(), "1234");
        let value: Value = serde_json::to_value(&decoded).unwrap();
        assert!(value.get("debugInfo").is_none());
        assert_eq!(value["personalInfo"]["birthMonth"], "05");
        assert_eq!(decoded.personal_info.unwrap().to_record().unwrap(), record);
    }

    #[test]
    fn v2_wrong_pin_is_generic() {
        let record = IdentityRecord {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            country_code: "FR".into(),
            birth_year: 1995,
            birth_month: 5,
            birth_day: 12,
            gender: Gender::Other,
        };
        let generated = generate_v2(&record, "1234");
        let decoded = decode_v2(generated.hex_code.as_deref().unwrap(), "0000");
        assert_eq!(decoded.code, Some(ErrorKind::DecryptionFailed));
        assert_eq!(
            decoded.message.as_deref(),
            Some("Invalid PIN or corrupted SIN code")
        );
        assert!(decoded.personal_info.is_none());
    }

    #[test]
    fn rejected_has_no_code() {
        let value = serde_json::to_value(SinResponse::rejected("PIN must be 4-6 digits")).unwrap();
        assert_eq!(
            value,
            json!({"status": "error", "message": "PIN must be 4-6 digits"})
        );
    }
}
