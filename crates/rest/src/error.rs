//! Error types for the music catalog REST API.
//!
//! Errors from the persistence layer and the details client are mapped to
//! HTTP status codes here:
//!
//! | Source Error | HTTP Status |
//! |--------------|-------------|
//! | Parameter parse failure | 400 |
//! | Song validation (date, empty patch) | 400 |
//! | Song not found | 404 |
//! | Details service rejected the title | 400 |
//! | Backend / details transport failure | 500 |
//!
//! Every error body has the shape
//! `{"error": {"status": <code>, "message": <text>}}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cadence_persistence::error::{SongError, StorageError};
use cadence_persistence::params::ParseParametersError;
use std::fmt;
use tracing::error;

use crate::details::DetailsError;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Invalid request (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Song not found (HTTP 404).
    NotFound {
        /// The song ID.
        id: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::NotFound { id } => write!(f, "Song not found: {}", id),
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match &self {
            RestError::BadRequest { message } => message.clone(),
            RestError::NotFound { id } => format!("Song {} not found", id),
            RestError::InternalError { message } => {
                error!(error = %message, "Request failed");
                message.clone()
            }
        };

        (status, Json(create_error_body(status, &details))).into_response()
    }
}

/// Creates the JSON error body.
fn create_error_body(status: StatusCode, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "status": status.as_u16(),
            "message": message
        }
    })
}

// Implement conversions from lower layer errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Song(SongError::NotFound { id }) => RestError::NotFound {
                id: id.to_string(),
            },
            StorageError::Validation(e) => RestError::BadRequest {
                message: e.to_string(),
            },
            StorageError::Backend(e) => RestError::InternalError {
                message: e.to_string(),
            },
        }
    }
}

impl From<ParseParametersError> for RestError {
    fn from(err: ParseParametersError) -> Self {
        RestError::BadRequest {
            message: err.to_string(),
        }
    }
}

impl From<DetailsError> for RestError {
    fn from(err: DetailsError) -> Self {
        if err.is_user_error() {
            RestError::BadRequest {
                message: err.to_string(),
            }
        } else {
            RestError::InternalError {
                message: err.to_string(),
            }
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
