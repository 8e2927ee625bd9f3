//! Error types for the macrofit_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for macrofit_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or out-of-range numeric input to the formula engine
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Local form validation failure (empty field, malformed email)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote call failure outside the gateway's fallback policy
    /// (login, registration, contact submission)
    #[error("Remote error: {0}")]
    Remote(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
