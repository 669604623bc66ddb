//! Error types for the informer_core library.

use std::convert::Infallible;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for informer_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred (opening the file sink, reading config)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Unrecognized level name
    #[error("Invalid level: {0:?}")]
    InvalidLevel(String),

    /// Engine selector does not name a known engine
    #[error("Invalid logger instance: {0}")]
    InvalidLoggerInstance(i32),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
