//! Error types for Alertboard
//!
//! Registry operations never fail; these errors cover the application around
//! it (configuration, runtime setup, the terminal).

use thiserror::Error;

/// Result type alias using Alertboard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Alertboard operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error raised while layering configuration sources
    #[error("Configuration error: {0}")]
    Settings(#[from] config::ConfigError),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// No async runtime available to drive expiry timers
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Terminal UI error
    #[error("TUI error: {0}")]
    Tui(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a TUI error
    pub fn tui(err: impl std::fmt::Display) -> Self {
        Self::Tui(err.to_string())
    }
}
