//! Error types for the intake pipeline

use thiserror::Error;

/// Local key/value storage failures. The secure store logs these and
/// reports absence to its callers.
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded
    #[error("encode error: {0}")]
    Encode(String),

    /// Stored value could not be decoded
    #[error("decode error: {0}")]
    Decode(String),
}

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Home directory could not be resolved
    #[error("cannot find home directory")]
    NoHomeDir,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed config file
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be serialized
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Endpoint URL is not a valid absolute URL
    #[error("invalid url for {field}: {reason}")]
    InvalidUrl { field: &'static str, reason: String },
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
