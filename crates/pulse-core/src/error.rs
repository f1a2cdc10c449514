//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Read(String),

    #[error("Failed to write configuration: {0}")]
    Write(String),

    #[error("Configuration parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {field}: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    /// User-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Read(_) => "Configuration could not be read. Using defaults.",
            ConfigError::Write(_) => "Configuration could not be saved.",
            ConfigError::Parse(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::Invalid { .. } => "Invalid configuration. Check your settings.",
        }
    }
}
