//! Route configuration for the catalog API.

pub mod song_routes;

pub use song_routes::{API_PREFIX, create_routes};
