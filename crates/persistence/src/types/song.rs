//! Song records and the payloads that create or change them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Pagination;
use crate::error::ValidationError;
use crate::params::{BindValue, format_date, parse_date};

/// A stored song as returned by the library listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Unique identifier.
    pub id: Uuid,
    /// Song title.
    pub song: String,
    /// Band name.
    pub group: String,
    /// Release date formatted as `DD.MM.YYYY`.
    pub release_date: String,
    /// Lyrics, verses separated by a blank line.
    pub text: String,
    /// Link to the song.
    pub link: String,
}

impl Song {
    /// Builds a song from stored columns.
    pub fn from_storage(
        id: Uuid,
        title: String,
        band: String,
        release_date: NaiveDate,
        lyrics: String,
        link: String,
    ) -> Self {
        Self {
            id,
            song: title,
            group: band,
            release_date: format_date(release_date),
            text: lyrics,
            link,
        }
    }
}

/// Band and title identifying a song to add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongTitle {
    /// Band name.
    pub group: String,
    /// Song title.
    pub song: String,
}

impl SongTitle {
    /// Creates a title.
    pub fn new(group: impl Into<String>, song: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            song: song.into(),
        }
    }

    /// Checks that both parts are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.group.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "group".to_string(),
            });
        }
        if self.song.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "song".to_string(),
            });
        }
        Ok(())
    }
}

/// Enrichment data returned by the details service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDetails {
    /// Release date formatted as `DD.MM.YYYY`.
    pub release_date: String,
    /// Lyrics.
    pub text: String,
    /// Link to the song.
    pub link: String,
}

/// A validated song ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    /// Band and title.
    pub title: SongTitle,
    /// Parsed release date.
    pub release_date: NaiveDate,
    /// Lyrics.
    pub text: String,
    /// Link to the song.
    pub link: String,
}

impl NewSong {
    /// Combines a title with its details, validating the release date.
    pub fn new(title: SongTitle, details: SongDetails) -> Result<Self, ValidationError> {
        title.validate()?;
        let release_date = parse_release_date(&details.release_date)?;
        Ok(Self {
            title,
            release_date,
            text: details.text,
            link: details.link,
        })
    }
}

/// Partial update of a song. Absent or empty fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SongPatch {
    /// New title.
    pub song: Option<String>,
    /// New band name.
    pub group: Option<String>,
    /// New release date (`DD.MM.YYYY`).
    pub release_date: Option<String>,
    /// New lyrics.
    pub text: Option<String>,
    /// New link.
    pub link: Option<String>,
}

/// One column assignment derived from a [`SongPatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// Store column.
    pub column: &'static str,
    /// New value.
    pub value: BindValue,
}

impl SongPatch {
    /// Returns true if the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        [
            &self.song,
            &self.group,
            &self.release_date,
            &self.text,
            &self.link,
        ]
        .iter()
        .all(|field| field.as_deref().is_none_or(str::is_empty))
    }

    /// Column assignments for every provided field, in a fixed order.
    pub fn changes(&self) -> Result<Vec<FieldChange>, ValidationError> {
        let mut changes = Vec::new();

        let text_fields = [
            ("title", &self.song),
            ("band", &self.group),
            ("lyrics", &self.text),
            ("link", &self.link),
        ];
        for (column, field) in text_fields {
            if let Some(value) = field.as_deref().filter(|v| !v.is_empty()) {
                changes.push(FieldChange {
                    column,
                    value: BindValue::text(value),
                });
            }
        }

        if let Some(raw) = self.release_date.as_deref().filter(|v| !v.is_empty()) {
            changes.push(FieldChange {
                column: "release_date",
                value: BindValue::Date(parse_release_date(raw)?),
            });
        }

        if changes.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }

        Ok(changes)
    }
}

/// Songs matching a listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    /// Matching songs for the requested window.
    pub songs: Vec<Song>,
    /// Window description; `total` counts every match.
    pub pagination: Pagination,
}

/// A window of a song's verses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyrics {
    /// Selected verses joined by a blank line.
    pub lyrics: String,
    /// Window description in verses.
    pub pagination: Pagination,
}

fn parse_release_date(value: &str) -> Result<NaiveDate, ValidationError> {
    parse_date(value).map_err(|_| ValidationError::InvalidReleaseDate {
        value: value.to_string(),
    })
}
