//! Error types for flightops.
//!
//! This module defines all error types used throughout the flightops crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for flightops operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
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

    // === Record Errors ===
    /// A record with the given id does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record (`"pilot"`, `"flight"`, ...).
        entity: &'static str,
        /// The identifier that was looked up.
        id: i64,
    },

    /// A record failed field validation.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the validation failure.
        message: String,
    },

    /// A search was requested on a column that is not searchable.
    #[error("cannot search {entity} by '{field}'")]
    InvalidSearchField {
        /// Kind of record being searched.
        entity: &'static str,
        /// The rejected field name.
        field: String,
    },

    /// A crew member is not eligible for the requested window.
    #[error("pilot {pilot_id} is not available for this flight window")]
    PilotUnavailable {
        /// The pilot that failed the eligibility check.
        pilot_id: i64,
    },

    /// A timestamp string could not be parsed.
    #[error("invalid timestamp '{value}': expected YYYY-MM-DD HH:MM")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
    },

    // === Shell Errors ===
    /// The interactive line editor failed.
    #[error("shell error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for flightops operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a validation error for the given field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a not-found error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Create an invalid search field error.
    #[must_use]
    pub fn invalid_search_field(entity: &'static str, field: impl Into<String>) -> Self {
        Self::InvalidSearchField {
            entity,
            field: field.into(),
        }
    }

    /// Check if this error means a record was missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error was raised by record validation.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::InvalidSearchField { .. } | Self::InvalidTimestamp { .. }
        )
    }

    /// Check if this error comes from the underlying store.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. } | Self::DatabaseQuery(_) | Self::DatabaseMigration { .. }
        )
    }
}
