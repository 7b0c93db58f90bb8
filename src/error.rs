//! Error types for loading and decoding configuration.

use std::path::PathBuf;
use thiserror::Error;

use crate::decode::DecodeError;

/// Errors raised while applying sources or decoding the merged result.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A buffer could not be parsed in its declared format.
    #[error("cannot parse {format} buffer: {message}")]
    Parse {
        /// Format the buffer was read as.
        format: String,
        /// Parser message.
        message: String,
    },

    /// The format tag or file extension is not one we can read.
    #[error("{0} is not a valid yaml or json extension")]
    UnsupportedFormat(String),

    /// A file source could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The merged tree could not be bound onto the target type.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A structural source value could not be serialized.
    #[error("cannot serialize source value: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A key or key segment breaks the key path rules.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// An explicit override was not written as `key=value`.
    #[error("invalid override {0:?}: expected key=value")]
    InvalidOverride(String),
}

impl ConfigError {
    pub fn parse(format: impl std::fmt::Display, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            format: format.to_string(),
            message: message.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
