//! Song lyrics handler.
//!
//! `GET [base]/song/{id}/lyrics`

use axum::{Json, extract::State};
use cadence_persistence::core::SongStorage;
use cadence_persistence::lyrics::paginate_lyrics;
use cadence_persistence::params::ParameterSet;
use cadence_persistence::types::Lyrics;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{QueryParams, SongId};
use crate::state::AppState;

/// Handler for a window of a song's verses.
///
/// Accepts only `limit` and `offset`, counted in verses. Requests past the
/// last verse return empty lyrics rather than an error.
///
/// # Response
///
/// - `200 OK` - [`Lyrics`] JSON
/// - `400 Bad Request` - Invalid ID or query parameters
/// - `404 Not Found` - Song does not exist
pub async fn lyrics_handler<S>(
    State(state): State<AppState<S>>,
    SongId(id): SongId,
    query: QueryParams,
) -> RestResult<Json<Lyrics>>
where
    S: SongStorage + Send + Sync,
{
    let params = ParameterSet::build(state.lyrics_params(), query.into_inner())?;

    debug!(
        song_id = %id,
        limit = params.limit(),
        offset = params.offset(),
        "Processing lyrics request"
    );

    let text = state.storage().lyrics(id).await?;
    let (lyrics, pagination) = paginate_lyrics(&text, params.limit(), params.offset());

    Ok(Json(Lyrics { lyrics, pagination }))
}
