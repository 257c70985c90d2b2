//! Protocol-independent entry point.
//!
//! [`SinCodec`] owns one implementation per protocol and routes each call by
//! the explicit [`Protocol`] the caller passes. It never inspects a code to
//! guess which protocol produced it.

use tracing::{debug, warn};

use crate::config::{CodecConfig, ConfigError, MIN_KDF_ITERATIONS};
use crate::error::CodecError;
use crate::legacy::{self, DecodeTrace, GenerateTrace};
use crate::quantum;
use crate::record::CanonicalRecord;
use crate::types::{IdentityRecord, PersonalInfo, Protocol, DEFAULT_KDF_ITERATIONS};

/// Output of a successful generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub hex_code: String,
    /// Legacy intermediates; always `None` for the quantum protocol.
    pub trace: Option<GenerateTrace>,
}

/// Output of a successful decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub info: PersonalInfo,
    pub trace: Option<DecodeTrace>,
}

/// One protocol's generate/decode pair.
pub trait Codec: Send + Sync {
    fn protocol(&self) -> Protocol;

    fn generate(&self, record: &IdentityRecord, pin: &str) -> Result<Encoded, CodecError>;

    fn decode(&self, hex_code: &str, pin: &str) -> Result<Decoded, CodecError>;
}

/// The V1 multiply-add cipher. PINs must be decimal numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyCodec;

impl LegacyCodec {
    fn numeric_pin(pin: &str) -> Result<u32, CodecError> {
        pin.trim()
            .parse()
            .map_err(|_| CodecError::InvalidPin("legacy PIN must be numeric".into()))
    }
}

impl Codec for LegacyCodec {
    fn protocol(&self) -> Protocol {
        Protocol::V1
    }

    fn generate(&self, record: &IdentityRecord, pin: &str) -> Result<Encoded, CodecError> {
        let pin = Self::numeric_pin(pin)?;
        let canonical = CanonicalRecord::from_identity(record)?;
        let (hex_code, trace) = legacy::generate(&canonical, pin)?;
        Ok(Encoded {
            hex_code,
            trace: Some(trace),
        })
    }

    fn decode(&self, hex_code: &str, pin: &str) -> Result<Decoded, CodecError> {
        let pin = Self::numeric_pin(pin)?;
        let (info, trace) = legacy::decode(hex_code, pin)?;
        Ok(Decoded {
            info,
            trace: Some(trace),
        })
    }
}

/// The V2 PBKDF2 + AES-256-GCM frame.
#[derive(Debug, Clone, Copy)]
pub struct QuantumCodec {
    iterations: u32,
}

impl Default for QuantumCodec {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_KDF_ITERATIONS,
        }
    }
}

impl QuantumCodec {
    /// Fails if `iterations` is below [`MIN_KDF_ITERATIONS`].
    pub fn new(iterations: u32) -> Result<Self, ConfigError> {
        if iterations < MIN_KDF_ITERATIONS {
            return Err(ConfigError::IterationsTooLow {
                got: iterations,
                min: MIN_KDF_ITERATIONS,
            });
        }
        Ok(Self { iterations })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl Codec for QuantumCodec {
    fn protocol(&self) -> Protocol {
        Protocol::V2
    }

    fn generate(&self, record: &IdentityRecord, pin: &str) -> Result<Encoded, CodecError> {
        let hex_code = quantum::encrypt_frame(record, pin, self.iterations)?;
        Ok(Encoded {
            hex_code,
            trace: None,
        })
    }

    fn decode(&self, hex_code: &str, pin: &str) -> Result<Decoded, CodecError> {
        let record = quantum::decrypt_frame(hex_code, pin, self.iterations)?;
        Ok(Decoded {
            info: PersonalInfo::from(&record),
            trace: None,
        })
    }
}

/// Facade over both protocols. Holds no mutable state, so one instance can be
/// shared freely across threads.
#[derive(Debug, Clone)]
pub struct SinCodec {
    legacy: LegacyCodec,
    quantum: QuantumCodec,
    default_protocol: Protocol,
}

impl Default for SinCodec {
    fn default() -> Self {
        Self {
            legacy: LegacyCodec,
            quantum: QuantumCodec::default(),
            default_protocol: CodecConfig::default().default_protocol,
        }
    }
}

impl SinCodec {
    /// Validates `config` first, so a codec never runs below the KDF floor.
    pub fn new(config: &CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            legacy: LegacyCodec,
            quantum: QuantumCodec::new(config.kdf_iterations)?,
            default_protocol: config.default_protocol,
        })
    }

    pub fn default_protocol(&self) -> Protocol {
        self.default_protocol
    }

    pub fn codec(&self, protocol: Protocol) -> &dyn Codec {
        match protocol {
            Protocol::V1 => &self.legacy,
            Protocol::V2 => &self.quantum,
        }
    }

    pub fn generate(
        &self,
        record: &IdentityRecord,
        pin: &str,
        protocol: Protocol,
    ) -> Result<Encoded, CodecError> {
        debug!(%protocol, "generate");
        self.codec(protocol)
            .generate(record, pin)
            .inspect_err(|e| warn!(%protocol, kind = ?e.kind(), "generate failed"))
    }

    pub fn decode(
        &self,
        hex_code: &str,
        pin: &str,
        protocol: Protocol,
    ) -> Result<Decoded, CodecError> {
        debug!(%protocol, code_len = hex_code.len(), "decode");
        self.codec(protocol)
            .decode(hex_code, pin)
            .inspect_err(|e| warn!(%protocol, kind = ?e.kind(), "decode failed"))
    }
}
