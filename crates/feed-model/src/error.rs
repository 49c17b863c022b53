//! Error types for the feed-model crate.
//!
//! The pure feed pipeline never fails at runtime. Everything that can go
//! wrong happens at the edges: invalid preferences, and snapshot files that
//! cannot be read or parsed.

use thiserror::Error;

/// Errors raised while loading a snapshot or validating preferences.
#[derive(Error, Debug)]
pub enum FeedError {
    /// A preference value is outside its allowed range
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    /// I/O error occurred while reading a snapshot file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// Snapshot file exists but is not valid JSON for its record type
    #[error("Parse error in {file}: {reason}")]
    ParseError { file: String, reason: String },

    /// Two content items in the catalog share an id
    #[error("Duplicate content id: {id}")]
    DuplicateContent { id: String },
}

impl FeedError {
    pub(crate) fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
        FeedError::InvalidConfig {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, FeedError>;
