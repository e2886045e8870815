//! Error types for the wrist UI runtime.

use std::io;

/// Errors produced by the runtime and its collaborators.
///
/// All of these are returned synchronously to the caller. Malformed sensor
/// input is never an error; the classifier clamps it instead.
#[derive(Debug, thiserror::Error)]
pub enum WristError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("display error: {0}")]
    Display(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("wire error: {0}")]
    Wire(String),

    #[error("channel error: {0}")]
    Channel(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, WristError>;
