//! In-memory backend.
//!
//! Evaluates a [`ParameterSet`] directly against songs held in a vector,
//! with the same semantics the PostgreSQL backend gets from SQL: substring
//! matches ignore case, dates compare by day, rows are ordered ascending by
//! the set's order column and then windowed by offset and limit.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::core::SongStorage;
use crate::error::{BackendError, SongError, StorageError, StorageResult};
use crate::params::{BindValue, Parameter, ParameterSet};
use crate::types::{Library, NewSong, Pagination, Song, SongPatch};

const BACKEND_NAME: &str = "memory";

const COLUMNS: &[&str] = &["id", "title", "band", "lyrics", "link", "release_date"];

/// A stored row, column names matching the PostgreSQL schema.
#[derive(Debug, Clone)]
struct SongRow {
    id: Uuid,
    title: String,
    band: String,
    lyrics: String,
    link: String,
    release_date: NaiveDate,
    deleted: bool,
}

enum Column<'a> {
    Text(&'a str),
    Date(NaiveDate),
    Id(Uuid),
}

impl SongRow {
    fn column(&self, name: &str) -> Option<Column<'_>> {
        match name {
            "id" => Some(Column::Id(self.id)),
            "title" => Some(Column::Text(&self.title)),
            "band" => Some(Column::Text(&self.band)),
            "lyrics" => Some(Column::Text(&self.lyrics)),
            "link" => Some(Column::Text(&self.link)),
            "release_date" => Some(Column::Date(self.release_date)),
            _ => None,
        }
    }

    fn to_song(&self) -> Song {
        Song::from_storage(
            self.id,
            self.title.clone(),
            self.band.clone(),
            self.release_date,
            self.lyrics.clone(),
            self.link.clone(),
        )
    }
}

/// Song storage kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    songs: RwLock<Vec<SongRow>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored songs, including soft-deleted ones.
    pub fn len(&self) -> usize {
        self.songs.read().len()
    }

    /// Returns true if nothing has ever been stored.
    pub fn is_empty(&self) -> bool {
        self.songs.read().is_empty()
    }
}

fn unknown_column(name: &str) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: BACKEND_NAME.to_string(),
        message: format!("unknown column '{}'", name),
        source: None,
    })
}

fn not_found(id: Uuid) -> StorageError {
    StorageError::Song(SongError::NotFound { id })
}

fn matches(row: &SongRow, parameter: &Parameter) -> StorageResult<bool> {
    match parameter {
        Parameter::TextMatch { field, value } => match row.column(field) {
            Some(Column::Text(text)) => Ok(text.to_lowercase().contains(&value.to_lowercase())),
            _ => Err(unknown_column(field)),
        },
        Parameter::Date { field, filter } => match row.column(field) {
            Some(Column::Date(date)) => Ok(filter.matches(date)),
            _ => Err(unknown_column(field)),
        },
        Parameter::Limit(_) | Parameter::Offset(_) => Ok(true),
    }
}

fn compare(a: &SongRow, b: &SongRow, column: &str) -> Ordering {
    match (a.column(column), b.column(column)) {
        (Some(Column::Text(x)), Some(Column::Text(y))) => x.cmp(y),
        (Some(Column::Date(x)), Some(Column::Date(y))) => x.cmp(&y),
        (Some(Column::Id(x)), Some(Column::Id(y))) => x.cmp(&y),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl SongStorage for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn list_songs(&self, params: &ParameterSet) -> StorageResult<Library> {
        if !COLUMNS.contains(&params.order_by()) {
            return Err(unknown_column(params.order_by()));
        }

        let songs = self.songs.read();
        let mut matched = Vec::new();
        for row in songs.iter().filter(|row| !row.deleted) {
            let mut keep = true;
            for parameter in params.parameters() {
                if !matches(row, parameter)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                matched.push(row);
            }
        }
        matched.sort_by(|a, b| compare(a, b, params.order_by()));

        let total = matched.len() as u64;
        let window: Vec<Song> = matched
            .into_iter()
            .skip(params.offset() as usize)
            .take(if params.limit() == 0 {
                usize::MAX
            } else {
                params.limit() as usize
            })
            .map(SongRow::to_song)
            .collect();

        debug!(
            matched = total,
            returned = window.len(),
            "Listed songs from memory"
        );

        Ok(Library {
            pagination: Pagination::new(window.len() as u64, params.offset(), total),
            songs: window,
        })
    }

    async fn lyrics(&self, id: Uuid) -> StorageResult<String> {
        self.songs
            .read()
            .iter()
            .find(|row| row.id == id && !row.deleted)
            .map(|row| row.lyrics.clone())
            .ok_or_else(|| not_found(id))
    }

    async fn add_song(&self, song: NewSong) -> StorageResult<Uuid> {
        let id = Uuid::new_v4();
        self.songs.write().push(SongRow {
            id,
            title: song.title.song,
            band: song.title.group,
            lyrics: song.text,
            link: song.link,
            release_date: song.release_date,
            deleted: false,
        });
        debug!(song_id = %id, "Song added");
        Ok(id)
    }

    async fn update_song(&self, id: Uuid, patch: SongPatch) -> StorageResult<()> {
        let changes = patch.changes()?;

        let mut songs = self.songs.write();
        let row = songs
            .iter_mut()
            .find(|row| row.id == id && !row.deleted)
            .ok_or_else(|| not_found(id))?;

        // A failed change leaves the stored row untouched
        let mut updated = row.clone();
        for change in changes {
            match (change.column, change.value) {
                ("title", BindValue::Text(v)) => updated.title = v,
                ("band", BindValue::Text(v)) => updated.band = v,
                ("lyrics", BindValue::Text(v)) => updated.lyrics = v,
                ("link", BindValue::Text(v)) => updated.link = v,
                ("release_date", BindValue::Date(d)) => updated.release_date = d,
                (column, _) => return Err(unknown_column(column)),
            }
        }
        *row = updated;

        debug!(song_id = %id, "Song updated");
        Ok(())
    }

    async fn delete_song(&self, id: Uuid) -> StorageResult<()> {
        let mut songs = self.songs.write();
        let row = songs
            .iter_mut()
            .find(|row| row.id == id && !row.deleted)
            .ok_or_else(|| not_found(id))?;
        row.deleted = true;
        debug!(song_id = %id, "Song deleted");
        Ok(())
    }
}
