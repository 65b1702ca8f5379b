//! Error types for fwgauge core.

use std::io;

use thiserror::Error;

/// Error type for fwgauge core operations.
///
/// Per-file and per-log problems never surface here; they are logged and
/// folded into zeroed metrics. Only configuration and output failures escape.
#[derive(Debug, Error)]
pub enum GaugeError {
    /// An underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// A file-name glob pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] globset::Error),
    /// Configuration could not be parsed or holds invalid values.
    #[error("invalid config: {0}")]
    Config(String),
    /// JSON serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A catch-all error with a message.
    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for GaugeError {
    fn from(value: toml::de::Error) -> Self {
        Self::Config(value.to_string())
    }
}

/// Convenience result type for fwgauge core.
pub type Result<T> = std::result::Result<T, GaugeError>;
