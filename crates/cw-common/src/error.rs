//! Error types for Citywatch.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//!
//! All failures propagate to the caller; nothing here retries or swallows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Citywatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Settings file errors (missing, unparseable, out-of-range values).
    Config,
    /// Reading store errors (unreachable database, failed statements).
    Storage,
    /// Detection and input-validation errors.
    Detection,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Storage => write!(f, "storage"),
            ErrorCategory::Detection => write!(f, "detection"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for Citywatch.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid settings file {path}: {message}")]
    InvalidSettings { path: String, message: String },

    // Storage errors (20-29)
    #[error("storage failure: {0}")]
    Storage(String),

    // Detection errors (30-39)
    #[error("validation failure: {0}")]
    Validation(String),

    #[error("detection failed: {0}")]
    Detection(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// Error codes are grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Storage errors
    /// - 30-39: Detection errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidSettings { .. } => 11,
            Error::Storage(_) => 20,
            Error::Validation(_) => 30,
            Error::Detection(_) => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidSettings { .. } => ErrorCategory::Config,
            Error::Storage(_) => ErrorCategory::Storage,
            Error::Validation(_) | Error::Detection(_) => ErrorCategory::Detection,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }
}
