//! Core song storage trait.
//!
//! This module defines the [`SongStorage`] trait, which the HTTP layer uses
//! for every read and write against the catalog.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StorageResult;
use crate::params::ParameterSet;
use crate::types::{Library, NewSong, SongPatch};

/// Storage operations for the song catalog.
///
/// # Soft Deletes
///
/// [`delete_song`](SongStorage::delete_song) only marks a song as deleted.
/// Deleted songs are invisible to every other operation and report
/// `SongError::NotFound`.
///
/// # Example
///
/// ```
/// use cadence_persistence::backends::memory::MemoryBackend;
/// use cadence_persistence::core::SongStorage;
/// use cadence_persistence::params::{ParamRegistry, ParameterSet};
/// use cadence_persistence::types::{NewSong, SongDetails, SongTitle};
///
/// # tokio_test::block_on(async {
/// let storage = MemoryBackend::new();
/// let song = NewSong::new(
///     SongTitle::new("Muse", "Hysteria"),
///     SongDetails {
///         release_date: "01.12.2003".to_string(),
///         text: "It's bugging me".to_string(),
///         link: "https://example.com".to_string(),
///     },
/// )?;
/// let id = storage.add_song(song).await?;
///
/// let set = ParameterSet::build(
///     &ParamRegistry::song_library(),
///     vec![("group".to_string(), vec!["muse".to_string()])],
/// )?;
/// let library = storage.list_songs(&set).await?;
/// assert_eq!(library.songs[0].id, id);
/// # Ok::<(), cadence_persistence::error::StorageError>(())
/// # }).unwrap();
/// ```
#[async_trait]
pub trait SongStorage: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Lists songs matching `params`, ordered and windowed as the set describes.
    ///
    /// `pagination.limit` of the result is the number of songs returned,
    /// `offset` the requested offset and `total` the number of matches
    /// before windowing.
    async fn list_songs(&self, params: &ParameterSet) -> StorageResult<Library>;

    /// Returns the full lyrics of a song.
    ///
    /// # Errors
    ///
    /// * `StorageError::Song(NotFound)` - If the song is missing or deleted
    async fn lyrics(&self, id: Uuid) -> StorageResult<String>;

    /// Stores a new song and returns its generated ID.
    async fn add_song(&self, song: NewSong) -> StorageResult<Uuid>;

    /// Applies every provided field of `patch` atomically.
    ///
    /// # Errors
    ///
    /// * `StorageError::Validation` - If the patch is empty or has a bad date
    /// * `StorageError::Song(NotFound)` - If the song is missing or deleted
    async fn update_song(&self, id: Uuid, patch: SongPatch) -> StorageResult<()>;

    /// Marks a song as deleted.
    ///
    /// # Errors
    ///
    /// * `StorageError::Song(NotFound)` - If no live song has this ID
    async fn delete_song(&self, id: Uuid) -> StorageResult<()>;
}
