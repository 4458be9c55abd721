//! Error types for the persistence layer.
//!
//! Errors are split into the ones a client caused (bad input, unknown songs)
//! and the ones the backend caused. [`StorageError::is_user_error`] draws
//! that line for the HTTP layer.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;
use uuid::Uuid;

use crate::params::ParseParametersError;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Song state errors
    #[error(transparent)]
    Song(#[from] SongError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns true if the error was caused by the request rather than the backend.
    pub fn is_user_error(&self) -> bool {
        matches!(self, StorageError::Validation(_))
    }

    /// Returns true if the requested song does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Song(SongError::NotFound { .. }))
    }
}

impl From<ParseParametersError> for StorageError {
    fn from(err: ParseParametersError) -> Self {
        StorageError::Validation(ValidationError::Parameters(err))
    }
}

/// Errors related to song state.
#[derive(Error, Debug)]
pub enum SongError {
    /// The song does not exist or has been deleted.
    #[error("song not found: {id}")]
    NotFound { id: Uuid },
}

/// Errors caused by invalid input.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A release date does not match `DD.MM.YYYY`.
    #[error("invalid release date '{value}', expected DD.MM.YYYY")]
    InvalidReleaseDate { value: String },

    /// A required field is missing or blank.
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    /// An update that would change nothing.
    #[error("update contains no fields")]
    EmptyPatch,

    /// Query parameters could not be parsed.
    #[error(transparent)]
    Parameters(#[from] ParseParametersError),
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
