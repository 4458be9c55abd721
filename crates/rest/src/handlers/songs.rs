//! Song write handlers.
//!
//! - `POST [base]/song`
//! - `PATCH [base]/song/{id}`
//! - `DELETE [base]/song/{id}`

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use cadence_persistence::core::SongStorage;
use cadence_persistence::types::{NewSong, SongPatch, SongTitle};
use tracing::{debug, info};

use crate::error::{RestError, RestResult};
use crate::extractors::{JsonBody, SongId};
use crate::state::AppState;

/// Handler for adding a song.
///
/// Looks up the release date, lyrics and link for the band/title pair and
/// stores the enriched song.
///
/// # Response
///
/// - `201 Created` - `text/plain` body holding the new song ID
/// - `400 Bad Request` - Invalid body or the details service rejected the title
/// - `500 Internal Server Error` - Details service or storage failure
///
/// # Example
///
/// ```http
/// POST /api/v1/song HTTP/1.1
/// Content-Type: application/json
///
/// {"group": "Muse", "song": "Supermassive Black Hole"}
/// ```
pub async fn add_song_handler<S>(
    State(state): State<AppState<S>>,
    JsonBody(title): JsonBody<SongTitle>,
) -> RestResult<Response>
where
    S: SongStorage + Send + Sync,
{
    title.validate().map_err(|e| RestError::BadRequest {
        message: e.to_string(),
    })?;

    debug!(song = %title.song, group = %title.group, "Processing add song request");

    let details = state.details().details(&title).await?;
    let song = NewSong::new(title, details).map_err(|e| RestError::InternalError {
        message: format!("Details service returned an invalid song: {}", e),
    })?;

    let song_name = song.title.song.clone();
    let id = state.storage().add_song(song).await?;

    info!(song_id = %id, song = %song_name, "Song added");

    Ok((
        StatusCode::CREATED,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        id.to_string(),
    )
        .into_response())
}

/// Handler for a partial song update.
///
/// Only the fields present and non-empty in the body are changed.
///
/// # Response
///
/// - `200 OK` - Song updated
/// - `400 Bad Request` - Invalid ID, body, or release date, or nothing to change
/// - `404 Not Found` - Song does not exist
pub async fn update_song_handler<S>(
    State(state): State<AppState<S>>,
    SongId(id): SongId,
    JsonBody(patch): JsonBody<SongPatch>,
) -> RestResult<StatusCode>
where
    S: SongStorage + Send + Sync,
{
    debug!(song_id = %id, "Processing update song request");

    state.storage().update_song(id, patch).await?;

    debug!(song_id = %id, "Song updated");
    Ok(StatusCode::OK)
}

/// Handler for deleting a song.
///
/// # Response
///
/// - `204 No Content` - Song deleted
/// - `400 Bad Request` - Invalid ID
/// - `404 Not Found` - Song does not exist
pub async fn delete_song_handler<S>(
    State(state): State<AppState<S>>,
    SongId(id): SongId,
) -> RestResult<StatusCode>
where
    S: SongStorage + Send + Sync,
{
    debug!(song_id = %id, "Processing delete song request");

    state.storage().delete_song(id).await?;

    info!(song_id = %id, "Song deleted");
    Ok(StatusCode::NO_CONTENT)
}
