//! Core error types for mindwave-core.
//!
//! The error surface is deliberately small: the engines have no I/O, so the
//! only fatal condition is failing to set up a timing facility. Gameplay
//! outcomes (a mismatched symbol, an early click) are events, not errors,
//! and inputs arriving outside an accepting state are silently dropped.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for mindwave-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The host could not provide a timing facility. Fatal to session
    /// construction; there is no retry.
    #[error("Failed to initialize tick source: {0}")]
    Init(#[source] std::io::Error),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
