//! Library listing handler.
//!
//! `GET [base]/library`

use axum::{Json, extract::State};
use cadence_persistence::core::SongStorage;
use cadence_persistence::params::ParameterSet;
use cadence_persistence::types::Library;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::QueryParams;
use crate::state::AppState;

/// Handler for the library listing.
///
/// Filters, orders and pages the song library according to the query string.
///
/// # Query Parameters
///
/// - `title`, `group`, `text`, `link` - case-insensitive substring match
/// - `releaseDate` - `DD.MM.YYYY`, `>DD.MM.YYYY`, `<DD.MM.YYYY` or
///   `DD.MM.YYYY-DD.MM.YYYY`
/// - `limit`, `offset` - page window
///
/// # Response
///
/// - `200 OK` - [`Library`] JSON
/// - `400 Bad Request` - Unknown or malformed parameter
///
/// # Example
///
/// ```http
/// GET /api/v1/library?group=muse&releaseDate=>01.01.2000&limit=10 HTTP/1.1
/// ```
pub async fn library_handler<S>(
    State(state): State<AppState<S>>,
    query: QueryParams,
) -> RestResult<Json<Library>>
where
    S: SongStorage + Send + Sync,
{
    let params = ParameterSet::build(state.library_params(), query.into_inner())?;

    debug!(
        filters = params.parameters().len(),
        limit = params.limit(),
        offset = params.offset(),
        "Processing library request"
    );

    let library = state.storage().list_songs(&params).await?;

    debug!(
        songs = library.songs.len(),
        total = library.pagination.total,
        "Library retrieved"
    );

    Ok(Json(library))
}
