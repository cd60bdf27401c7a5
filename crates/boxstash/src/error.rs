//! Error types for boxstash.
//!
//! This module defines all error types used throughout the boxstash crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for boxstash operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Store Errors ===
    /// A box identifier failed path-safety validation.
    #[error("invalid box identifier: {id:?}")]
    InvalidBoxId {
        /// The rejected identifier.
        id: String,
    },

    /// A photo filename failed path-safety validation.
    #[error("invalid filename: {name:?}")]
    InvalidFilename {
        /// The rejected filename.
        name: String,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === QR Errors ===
    /// The QR encoder rejected the input.
    #[error("QR encoding failed: {0}")]
    QrEncode(#[from] qrcode::types::QrError),

    /// PNG encoding of the rendered QR image failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] image::ImageError),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for boxstash operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid box identifier error.
    #[must_use]
    pub fn invalid_box_id(id: impl Into<String>) -> Self {
        Self::InvalidBoxId { id: id.into() }
    }

    /// Create an invalid filename error.
    #[must_use]
    pub fn invalid_filename(name: impl Into<String>) -> Self {
        Self::InvalidFilename { name: name.into() }
    }

    /// Check if this error was caused by unsafe user-supplied input.
    ///
    /// Such errors map to a client error response rather than a server one.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidBoxId { .. } | Self::InvalidFilename { .. }
        )
    }
}
