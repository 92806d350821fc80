//! Core error types for wakeup-core.
//!
//! This module defines the error hierarchy using thiserror. Engine
//! computations only ever fail with [`ChallengeError`]; the API client and
//! configuration layer bring their own variants.

use std::path::PathBuf;
use thiserror::Error;

use crate::challenge::ChallengeId;

/// Core error type for wakeup-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed challenge fields
    #[error("Challenge error: {0}")]
    Challenge(#[from] ChallengeError),

    /// Challenge API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while interpreting a challenge record's date/time fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChallengeError {
    /// Wake-up time is not `HH:MM` with hour 00-23 and minute 00-59
    #[error("Invalid wake-up time '{value}': expected HH:MM (00-23:00-59)")]
    InvalidTimeFormat { value: String },

    /// Calendar date is not `YYYY-MM-DD` (or names a day that does not exist)
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDateFormat { value: String },

    /// Cancel attempted on a challenge that is not future-dated
    #[error("Challenge {id} cannot be cancelled: {reason}")]
    CancellationRefused { id: ChallengeId, reason: String },

    /// Check-in attempted outside the window or on a resolved challenge
    #[error("Challenge {id} cannot be checked in: {reason}")]
    CheckInRefused { id: ChallengeId, reason: String },
}

/// Challenge API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Base URL or endpoint could not be built
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport-level failure (connect, TLS, body decode)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    /// Backend answered 2xx with a body we could not interpret
    #[error("Unexpected response body: {0}")]
    UnexpectedBody(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Home/config directory could not be prepared
    #[error("Failed to prepare config directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
