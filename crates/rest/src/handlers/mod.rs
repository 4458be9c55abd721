//! HTTP request handlers for the catalog API.
//!
//! - [`library`] - Filtered, paged song listing
//! - [`lyrics`] - Verse window of one song
//! - [`songs`] - Add, update and delete songs
//! - [`health`] - Health check endpoint

pub mod health;
pub mod library;
pub mod lyrics;
pub mod songs;

// Re-export handlers for convenience
pub use health::health_handler;
pub use library::library_handler;
pub use lyrics::lyrics_handler;
pub use songs::{add_song_handler, delete_song_handler, update_song_handler};
