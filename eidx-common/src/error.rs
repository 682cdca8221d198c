//! Common error types for EIDX

use thiserror::Error;

/// Common result type for EIDX operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the EIDX pipeline and services
#[derive(Error, Debug)]
pub enum Error {
    /// A required tabular source could not be retrieved
    #[error("Source unavailable: {source_name}: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    /// A row failed to decode into its expected schema
    #[error("Malformed record in {source_name} at row {row}: {reason}")]
    MalformedRecord {
        source_name: String,
        row: u64,
        reason: String,
    },

    /// An aggregate was requested over zero qualifying records
    #[error("Empty result set: {0}")]
    EmptyResultSet(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid caller input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a [`Error::SourceUnavailable`]
    pub fn source_unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}
