//! Catalog route configuration.
//!
//! Defines all routes for the music catalog API.

use axum::{
    Router,
    routing::{get, post},
};
use cadence_persistence::core::SongStorage;

use crate::handlers;
use crate::state::AppState;

/// Prefix under which the catalog routes are mounted.
pub const API_PREFIX: &str = "/api/v1";

/// Creates all catalog routes.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `GET /api/v1/library` - Filtered song listing
/// - `GET /api/v1/song/{id}/lyrics` - Verse window
/// - `POST /api/v1/song` - Add a song
/// - `PATCH /api/v1/song/{id}` - Update a song
/// - `DELETE /api/v1/song/{id}` - Delete a song
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: SongStorage + Send + Sync + 'static,
{
    let api = Router::new()
        .route("/library", get(handlers::library_handler::<S>))
        .route("/song", post(handlers::add_song_handler::<S>))
        .route(
            "/song/{id}",
            axum::routing::patch(handlers::update_song_handler::<S>)
                .delete(handlers::delete_song_handler::<S>),
        )
        .route("/song/{id}/lyrics", get(handlers::lyrics_handler::<S>));

    Router::new()
        .route("/health", get(handlers::health_handler::<S>))
        .nest(API_PREFIX, api)
        .with_state(state)
}
