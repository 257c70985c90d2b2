use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Protocol, DEFAULT_KDF_ITERATIONS};

/// Lowest PBKDF2 cost accepted for the quantum protocol.
pub const MIN_KDF_ITERATIONS: u32 = DEFAULT_KDF_ITERATIONS;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("kdf_iterations must be at least {min}, got {got}")]
    IterationsTooLow { got: u32, min: u32 },

    #[error("invalid codec config: {0}")]
    Parse(String),
}

/// Tunables for the codec facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub kdf_iterations: u32,
    /// Protocol used when the caller does not name one. New issuance is V2.
    pub default_protocol: Protocol,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
            default_protocol: Protocol::V2,
        }
    }
}

impl CodecConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kdf_iterations < MIN_KDF_ITERATIONS {
            return Err(ConfigError::IterationsTooLow {
                got: self.kdf_iterations,
                min: MIN_KDF_ITERATIONS,
            });
        }
        Ok(())
    }
}
