//! Song ID path extractor.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::error::RestError;

/// The `{id}` path segment parsed as a UUID.
///
/// Rejects malformed IDs with a 400 error body instead of axum's plain-text
/// rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongId(pub Uuid);

impl SongId {
    /// Returns the parsed ID.
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl<S> FromRequestParts<S> for SongId
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| RestError::BadRequest {
                message: e.body_text(),
            })?;

        Uuid::parse_str(&raw)
            .map(SongId)
            .map_err(|_| RestError::BadRequest {
                message: format!("Invalid id '{}'", raw),
            })
    }
}
