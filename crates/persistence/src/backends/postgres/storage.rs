//! SongStorage implementation for PostgreSQL.

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio_postgres::types::ToSql;
use tracing::{debug, error};
use uuid::Uuid;

use crate::core::SongStorage;
use crate::error::{BackendError, SongError, StorageError, StorageResult};
use crate::params::{BindValue, ParameterSet};
use crate::types::{Library, NewSong, Pagination, Song, SongPatch};

use super::PostgresBackend;
use super::backend::BACKEND_NAME;

/// Base listing query. Filters, ordering and paging are appended by
/// [`ParameterSet::to_query`]; deleted songs never reach the outer query.
const LIBRARY_QUERY: &str = "SELECT COUNT(*) OVER() AS total_count, id, title, band, lyrics, link, release_date \
     FROM (SELECT * FROM songs WHERE deleted = FALSE) AS songs";

/// Counts every match when the requested window is past the last row.
const LIBRARY_COUNT_QUERY: &str =
    "SELECT COUNT(*) FROM (SELECT * FROM songs WHERE deleted = FALSE) AS songs";

const LYRICS_QUERY: &str = "SELECT lyrics FROM songs WHERE id = $1 AND deleted = FALSE";

const ADD_SONG_QUERY: &str = "INSERT INTO songs (title, band, lyrics, link, release_date) \
     VALUES ($1, $2, $3, $4, $5) RETURNING id";

const LOCK_SONG_QUERY: &str = "SELECT 1 FROM songs WHERE id = $1 AND deleted = FALSE FOR UPDATE";

const DELETE_SONG_QUERY: &str = "UPDATE songs SET deleted = TRUE WHERE id = $1 AND deleted = FALSE";

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: BACKEND_NAME.to_string(),
        message,
        source: None,
    })
}

fn boxed_params(values: &[BindValue]) -> Vec<Box<dyn ToSql + Sync + Send>> {
    values
        .iter()
        .map(|value| -> Box<dyn ToSql + Sync + Send> {
            match value {
                BindValue::Text(s) => Box::new(s.clone()),
                BindValue::Date(d) => Box::new(*d),
            }
        })
        .collect()
}

fn param_refs(params: &[Box<dyn ToSql + Sync + Send>]) -> Vec<&(dyn ToSql + Sync)> {
    params
        .iter()
        .map(|p| p.as_ref() as &(dyn ToSql + Sync))
        .collect()
}

#[async_trait]
impl SongStorage for PostgresBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn list_songs(&self, params: &ParameterSet) -> StorageResult<Library> {
        let client = self.get_client().await?;

        let (sql, values) = params.to_query(LIBRARY_QUERY);
        debug!(query = %sql, bound = values.len(), "Retrieving library");

        let boxed = boxed_params(&values);
        let rows = client
            .query(&sql, &param_refs(&boxed))
            .await
            .map_err(|e| {
                error!(query = %sql, error = %e, "Failed to list songs");
                internal_error(format!("Failed to list songs: {}", e))
            })?;

        let mut total: i64 = 0;
        let mut songs = Vec::with_capacity(rows.len());
        for row in &rows {
            total = row.get(0);
            let release_date: NaiveDate = row.get(6);
            songs.push(Song::from_storage(
                row.get(1),
                row.get(2),
                row.get(3),
                release_date,
                row.get(4),
                row.get(5),
            ));
        }

        // An empty window carries no COUNT(*) OVER() row
        if rows.is_empty() && params.offset() > 0 {
            let (count_sql, count_values) = params.to_count_query(LIBRARY_COUNT_QUERY);
            let boxed = boxed_params(&count_values);
            let row = client
                .query_one(&count_sql, &param_refs(&boxed))
                .await
                .map_err(|e| {
                    error!(query = %count_sql, error = %e, "Failed to count songs");
                    internal_error(format!("Failed to count songs: {}", e))
                })?;
            total = row.get(0);
        }

        debug!(songs = songs.len(), total, "Library retrieved");

        Ok(Library {
            pagination: Pagination::new(songs.len() as u64, params.offset(), total as u64),
            songs,
        })
    }

    async fn lyrics(&self, id: Uuid) -> StorageResult<String> {
        let client = self.get_client().await?;

        let row = client
            .query_opt(LYRICS_QUERY, &[&id])
            .await
            .map_err(|e| internal_error(format!("Failed to read lyrics: {}", e)))?;

        match row {
            Some(row) => Ok(row.get(0)),
            None => {
                debug!(song_id = %id, "Song lyrics not found");
                Err(StorageError::Song(SongError::NotFound { id }))
            }
        }
    }

    async fn add_song(&self, song: NewSong) -> StorageResult<Uuid> {
        let client = self.get_client().await?;

        let row = client
            .query_one(
                ADD_SONG_QUERY,
                &[
                    &song.title.song,
                    &song.title.group,
                    &song.text,
                    &song.link,
                    &song.release_date,
                ],
            )
            .await
            .map_err(|e| {
                error!(
                    title = %song.title.song,
                    group = %song.title.group,
                    error = %e,
                    "Failed to add song"
                );
                internal_error(format!("Failed to add song: {}", e))
            })?;

        let id: Uuid = row.get(0);
        debug!(song_id = %id, title = %song.title.song, group = %song.title.group, "Song added");
        Ok(id)
    }

    async fn update_song(&self, id: Uuid, patch: SongPatch) -> StorageResult<()> {
        let changes = patch.changes()?;

        let mut client = self.get_client().await?;
        let tx = client
            .transaction()
            .await
            .map_err(|e| internal_error(format!("Failed to begin transaction: {}", e)))?;

        let exists = tx
            .query_opt(LOCK_SONG_QUERY, &[&id])
            .await
            .map_err(|e| internal_error(format!("Failed to lock song: {}", e)))?;
        if exists.is_none() {
            return Err(StorageError::Song(SongError::NotFound { id }));
        }

        // Dropping the transaction on an early return rolls it back
        for change in &changes {
            let sql = format!("UPDATE songs SET {} = $1 WHERE id = $2", change.column);
            let value = boxed_params(std::slice::from_ref(&change.value));
            tx.execute(&sql, &[value[0].as_ref() as &(dyn ToSql + Sync), &id])
                .await
                .map_err(|e| {
                    internal_error(format!("Failed to update {}: {}", change.column, e))
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| internal_error(format!("Failed to commit update: {}", e)))?;

        debug!(song_id = %id, fields = changes.len(), "Song updated");
        Ok(())
    }

    async fn delete_song(&self, id: Uuid) -> StorageResult<()> {
        let client = self.get_client().await?;

        let affected = client
            .execute(DELETE_SONG_QUERY, &[&id])
            .await
            .map_err(|e| internal_error(format!("Failed to delete song: {}", e)))?;

        if affected == 0 {
            return Err(StorageError::Song(SongError::NotFound { id }));
        }

        debug!(song_id = %id, "Song deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamRegistry;

    #[test]
    fn test_library_query_renders_against_base() {
        let set = ParameterSet::build(
            &ParamRegistry::song_library(),
            vec![
                ("title".to_string(), vec!["love".to_string()]),
                ("limit".to_string(), vec!["2".to_string()]),
            ],
        )
        .unwrap();
        let (sql, values) = set.to_query(LIBRARY_QUERY);
        assert!(sql.starts_with(LIBRARY_QUERY));
        assert!(sql.ends_with(
            " WHERE 1=1 AND title ILIKE '%' || $1 || '%' ESCAPE '\\' ORDER BY title ASC LIMIT 2;"
        ));
        assert_eq!(boxed_params(&values).len(), 1);
    }

    #[test]
    fn test_count_query_shares_filters_with_listing() {
        let set = ParameterSet::build(
            &ParamRegistry::song_library(),
            vec![
                ("group".to_string(), vec!["muse".to_string()]),
                ("offset".to_string(), vec!["10".to_string()]),
            ],
        )
        .unwrap();
        let (sql, values) = set.to_count_query(LIBRARY_COUNT_QUERY);
        assert_eq!(
            sql,
            format!(
                "{} WHERE 1=1 AND band ILIKE '%' || $1 || '%' ESCAPE '\\';",
                LIBRARY_COUNT_QUERY
            )
        );
        assert_eq!(values, set.to_query(LIBRARY_QUERY).1);
    }
}
