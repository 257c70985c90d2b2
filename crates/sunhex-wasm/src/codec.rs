//! WASM bindings for sunhex-core.

use crate::error::{to_js_error, to_js_value};
use sunhex_core::{
    decode_v1, decode_v2, generate_v1, generate_v2, supported_codes, validate, DecodeRequest,
    GenerateRequest, SinResponse,
};
use wasm_bindgen::prelude::*;

/// Validates the PIN as text, so leading zeros count toward its length.
fn v1_pin(pin: &str) -> Result<u32, SinResponse> {
    validate::numeric_pin(pin).map_err(|e| SinResponse::rejected(e.to_string()))
}

pub fn generate_v1_checked(
    first_name: &str,
    last_name: &str,
    country_code: &str,
    birth_year: u32,
    birth_month: u32,
    birth_day: u32,
    gender: &str,
    pin: &str,
) -> SinResponse {
    let pin = match v1_pin(pin) {
        Ok(pin) => pin,
        Err(rejected) => return rejected,
    };
    generate_v1(
        first_name,
        last_name,
        country_code,
        birth_year,
        birth_month,
        birth_day,
        gender,
        pin,
    )
}

pub fn decode_v1_checked(hex_code: &str, pin: &str) -> SinResponse {
    let pin = match v1_pin(pin) {
        Ok(pin) => pin,
        Err(rejected) => return rejected,
    };
    match validate::hex_code(hex_code) {
        Ok(hex_code) => decode_v1(hex_code, pin),
        Err(e) => SinResponse::rejected(e.to_string()),
    }
}

pub fn generate_v2_checked(request: &GenerateRequest) -> SinResponse {
    match request.validate() {
        Ok(record) => generate_v2(&record, &request.pin),
        Err(e) => SinResponse::rejected(e.to_string()),
    }
}

pub fn decode_v2_checked(request: &DecodeRequest) -> SinResponse {
    match request.validate() {
        Ok(()) => decode_v2(&request.hex_code, &request.pin),
        Err(e) => SinResponse::rejected(e.to_string()),
    }
}

// --- Legacy (V1) ---

/// `pin` is the 4-6 digit PIN as text.
#[wasm_bindgen(js_name = "generateV1")]
pub fn wasm_generate_v1(
    first_name: &str,
    last_name: &str,
    country_code: &str,
    birth_year: u32,
    birth_month: u32,
    birth_day: u32,
    gender: &str,
    pin: &str,
) -> Result<JsValue, JsValue> {
    to_js_value(&generate_v1_checked(
        first_name,
        last_name,
        country_code,
        birth_year,
        birth_month,
        birth_day,
        gender,
        pin,
    ))
}

#[wasm_bindgen(js_name = "decodeV1")]
pub fn wasm_decode_v1(hex_code: &str, pin: &str) -> Result<JsValue, JsValue> {
    to_js_value(&decode_v1_checked(hex_code, pin))
}

// --- Quantum (V2) ---

/// `record` is `{firstName, lastName, countryCode, birthYear, birthMonth,
/// birthDay, gender, pin}`.
#[wasm_bindgen(js_name = "generateV2")]
pub fn wasm_generate_v2(record: JsValue) -> Result<JsValue, JsValue> {
    let request: GenerateRequest = serde_wasm_bindgen::from_value(record).map_err(to_js_error)?;
    to_js_value(&generate_v2_checked(&request))
}

#[wasm_bindgen(js_name = "decodeV2")]
pub fn wasm_decode_v2(hex_code: String, pin: String) -> Result<JsValue, JsValue> {
    to_js_value(&decode_v2_checked(&DecodeRequest { hex_code, pin }))
}

// --- Countries ---

#[wasm_bindgen(js_name = "countries")]
pub fn wasm_countries() -> js_sys::Array {
    supported_codes().into_iter().map(JsValue::from_str).collect()
}
