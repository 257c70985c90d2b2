use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sunhex_core::{CodecConfig, ConfigError};
use thiserror::Error;

pub const CONFIG_ENV: &str = "SUNHEX_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "sunhex.toml";
pub const DEFAULT_LOG_FILTER: &str = "sunhex=info";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Codec(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    pub log_filter: String,
    pub codec: CodecConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            codec: CodecConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, LoadError> {
        let config: Self = toml::from_str(text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.codec.validate()?;
        Ok(config)
    }

    /// Precedence: `--config`, then `$SUNHEX_CONFIG`, then `./sunhex.toml`,
    /// then defaults. Only an explicitly named file is required to exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, LoadError> {
        if let Some(path) = explicit {
            return Self::read(path);
        }
        let candidate = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if candidate.is_file() {
            Self::read(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    fn read(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }
}
