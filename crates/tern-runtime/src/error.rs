//! Error types for tern-runtime.

use thiserror::Error;

/// Result type for tern-runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors raised while configuring or booting the intern table.
///
/// Interning itself cannot fail; these cover the surrounding setup.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Failed to read a configuration or image file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// Encoded string data could not be decoded.
    #[error("Failed to decode string: {0}")]
    Decode(#[from] tern_common::DecodeError),

    /// Configuration validation error.
    #[error("Config validation error: {0}")]
    Validation(String),
}
