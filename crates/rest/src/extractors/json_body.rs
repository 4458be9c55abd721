//! JSON request body extractor.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::RestError;

/// A JSON body whose rejections are reported as 400 errors.
///
/// Missing content type, malformed JSON and missing fields all map to
/// [`RestError::BadRequest`].
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| RestError::BadRequest {
                message: format!("Invalid body content: {}", e.body_text()),
            })?;
        Ok(JsonBody(value))
    }
}
