//! Error types for SiteCheck.
//!
//! All fallible operations return [`Result`], backed by [`SiteCheckError`].
//! Errors carry the source location where they were raised so a bug report
//! can point at the exact line that produced it.
//!
//! # Error Categories
//!
//! - **Response errors**: the scanner API returned something that is not a
//!   report (the raw payload is kept for inspection)
//! - **Transport errors**: connection failures, non-2xx statuses, timeouts
//! - **Config errors**: invalid configuration files or values
//!
//! # Example
//!
//! ```rust
//! use sitecheck::error::{SiteCheckError, Result};
//!
//! fn load(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).map_err(|e| SiteCheckError::Io {
//!         path: path.into(),
//!         source: e,
//!         src_path: file!(),
//!         src_line: line!(),
//!     })
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Macro to create errors with automatic source location tracking.
///
/// Usage:
/// ```ignore
/// return Err(err!(ConfigValue { key: "render.line_width".to_string(), message: "must be positive".to_string() }));
/// ```
#[macro_export]
macro_rules! err {
    ($variant:ident { $($field:ident: $value:expr),* $(,)? }) => {
        $crate::error::SiteCheckError::$variant {
            $($field: $value,)*
            src_path: file!(),
            src_line: line!(),
        }
    };
}

/// A specialized Result type for SiteCheck operations.
pub type Result<T> = std::result::Result<T, SiteCheckError>;

/// The main error type for SiteCheck.
#[derive(Error, Debug)]
pub enum SiteCheckError {
    // =========================================================================
    // Response Errors
    // =========================================================================
    /// The response body is not valid JSON or does not have the report shape.
    #[error("Malformed scanner response at line {line}, column {column} ({src_path}:{src_line}): {message}")]
    MalformedResponse {
        /// Decoder message
        message: String,
        /// Line in the payload where decoding stopped
        line: usize,
        /// Column in the payload where decoding stopped
        column: usize,
        /// The undecoded payload, lossily converted to UTF-8
        payload: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request to '{url}' failed ({src_path}:{src_line}): {message}")]
    Transport {
        /// The requested URL
        url: String,
        /// Error message
        message: String,
        /// HTTP status code (if available)
        status_code: Option<u16>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// The request did not complete within the configured timeout.
    #[error("Request to '{url}' timed out ({src_path}:{src_line}): {message}")]
    Timeout {
        /// The requested URL
        url: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// The scan URL could not be built.
    #[error("Invalid URL '{url}' ({src_path}:{src_line}): {message}")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// I/O error with path context.
    #[error("I/O error at '{path}' ({src_path}:{src_line}): {source}")]
    Io {
        /// The path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration parsing error.
    #[error("Failed to parse configuration ({src_path}:{src_line}): {message}")]
    ConfigParse {
        /// Error message
        message: String,
        /// The underlying error (if any)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}' ({src_path}:{src_line}): {message}")]
    ConfigValue {
        /// The configuration key
        key: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },
}

impl SiteCheckError {
    /// Creates a `MalformedResponse` error from a decoder failure and the raw bytes.
    #[must_use]
    pub fn malformed(source: &serde_json::Error, raw: &[u8], src_path: &'static str, src_line: u32) -> Self {
        Self::MalformedResponse {
            message: source.to_string(),
            line: source.line(),
            column: source.column(),
            payload: String::from_utf8_lossy(raw).into_owned(),
            src_path,
            src_line,
        }
    }

    /// Creates a `ConfigParse` error.
    #[must_use]
    pub fn config_parse(message: String, source: Option<Box<dyn std::error::Error + Send + Sync>>, src_path: &'static str, src_line: u32) -> Self {
        Self::ConfigParse { message, source, src_path, src_line }
    }

    /// Returns true when the scanner answered with something that is not a report.
    #[must_use]
    pub const fn is_malformed_response(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }

    /// The undecoded response body, when the error kept one.
    #[must_use]
    pub fn raw_payload(&self) -> Option<&str> {
        match self {
            Self::MalformedResponse { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Returns the appropriate exit code for the error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MalformedResponse { .. } => 3,
            Self::Transport { .. } | Self::InvalidUrl { .. } => 4,
            Self::Timeout { .. } => 5,
            Self::ConfigParse { .. } | Self::ConfigValue { .. } => 6,
            Self::Io { .. } => 1,
        }
    }
}

/// Extension trait for `Result` to add context to errors.
pub trait ResultExt<T> {
    /// Adds a file path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| SiteCheckError::Io {
            path: path.into(),
            source,
            src_path: file!(),
            src_line: line!(),
        })
    }
}
