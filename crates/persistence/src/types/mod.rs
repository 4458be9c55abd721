//! Core types for the persistence layer.
//!
//! - [`Song`], [`SongTitle`], [`SongDetails`] - song records and payloads
//! - [`NewSong`], [`SongPatch`] - validated inputs for writes
//! - [`Library`], [`Lyrics`] - listing results
//! - [`Pagination`] - window metadata

mod pagination;
mod song;

pub use pagination::Pagination;
pub use song::{FieldChange, Library, Lyrics, NewSong, Song, SongDetails, SongPatch, SongTitle};
