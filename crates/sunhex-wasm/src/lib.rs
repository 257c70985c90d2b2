#![allow(clippy::too_many_arguments)]
//! WASM bindings for SunHex.
//!
//! Exposes the four codec entry points and the country list to browser code.
//! Codec failures come back as `{status: "error", ...}` objects; only a
//! malformed JS argument rejects with a thrown error.

pub mod codec;
mod error;
