//! Axum extractors for catalog requests.

pub mod json_body;
pub mod query_params;
pub mod song_id;

pub use json_body::JsonBody;
pub use query_params::QueryParams;
pub use song_id::SongId;
