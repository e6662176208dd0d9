use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AenkerError, AenkerResult};

/// Plaintext bytes per chunk used by aenker producers: 1984 + 16 tag bytes
/// gives 2000-byte chunks on the wire.
pub const DEFAULT_CHUNK_SIZE: usize = 1984;

/// Upper bound on a configured chunk size (1 GiB).
pub const MAX_CHUNK_SIZE: usize = 1 << 30;

/// Top-level configuration (loaded from aenker.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AenkerConfig {
    pub stream: StreamConfig,
    pub log: LogConfig,
}

/// How the padded-final framing variant strips its padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaddingMode {
    /// Remove every trailing byte equal to the pad byte (aenker-compatible)
    #[default]
    ByValue,
    /// Remove exactly as many trailing bytes as the pad byte says
    ByCount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Plaintext chunk size; must match the producer (default: 1984)
    pub chunk_size: usize,
    /// Padding removal for the final chunk (default: by-value)
    pub padding: PaddingMode,
    /// Fail if bytes follow the final chunk (default: false)
    pub reject_trailing_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: info)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            padding: PaddingMode::ByValue,
            reject_trailing_data: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl AenkerConfig {
    /// Load a config file, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> AenkerResult<Self> {
        if !path.exists() {
            tracing::debug!("config file not found: {} (using defaults)", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| AenkerError::Config(format!("parsing {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> AenkerResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| AenkerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AenkerResult<()> {
        self.stream.validate()?;
        match self.log.format.as_str() {
            "json" | "text" => Ok(()),
            other => Err(AenkerError::Config(format!(
                "log.format must be \"json\" or \"text\", got {other:?}"
            ))),
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> AenkerResult<()> {
        validate_chunk_size(self.chunk_size)
    }
}

/// A chunk must hold at least the framing tag, and stays under 1 GiB.
pub fn validate_chunk_size(chunk_size: usize) -> AenkerResult<()> {
    if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
        return Err(AenkerError::Config(format!(
            "chunk_size must be between 1 and {MAX_CHUNK_SIZE}, got {chunk_size}"
        )));
    }
    Ok(())
}
