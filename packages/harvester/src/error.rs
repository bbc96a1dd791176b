//! Error types for the harvester.
//!
//! Transport failures (`Http`, `HttpStatus`) and protocol failures
//! (`Diagnostic`) are kept apart so callers can decide whether a retry with
//! the same query makes sense.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Start record outside the 1-based SRU range.
    #[error("Invalid start record: {0}. SRU positions start at 1")]
    InvalidStartRecord(u64),

    /// Page size of zero.
    #[error("Invalid page size: {0}. At least one record per page is required")]
    InvalidPageSize(u64),

    /// Base filename unusable as part of an output file name.
    #[error("Invalid base filename: '{0}'. Use letters, digits, '_', '-' or '.'")]
    InvalidFilename(String),

    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response without a diagnostics body.
    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// The SRU service answered with a diagnostics document.
    #[error("SRU diagnostic: {message}")]
    Diagnostic { message: String },

    /// Response body is not valid UTF-8.
    #[error("Response from {url} is not valid UTF-8: {source}")]
    InvalidEncoding {
        url: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Missing required XML element.
    #[error("Missing required XML element: {element} in {context}")]
    MissingElement { element: String, context: String },

    /// `numberOfRecords` is not a non-negative integer.
    #[error("Invalid record count: '{0}'")]
    InvalidRecordCount(String),

    /// A result item lacks one of the extracted fields.
    #[error("Missing field '{field}' in result item {item}")]
    MissingField { field: String, item: usize },

    /// File or directory could not be created, written or read.
    #[error("Path not found or not writable: {}: {source}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarvesterError {
    /// Whether the failure happened in the HTTP layer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::HttpStatus { .. })
    }

    /// Whether the remote service rejected the query.
    #[must_use]
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Diagnostic { .. })
    }

    /// Wrap an IO error with the path it concerns.
    ///
    /// A missing file stays distinguishable from other IO problems by the
    /// `source` kind.
    pub(crate) fn at_path(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::NotFound {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
