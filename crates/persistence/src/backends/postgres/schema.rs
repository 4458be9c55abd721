//! PostgreSQL schema definitions and migrations.

use tracing::info;

use crate::error::{BackendError, StorageError, StorageResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
pub async fn initialize_schema(client: &deadpool_postgres::Client) -> StorageResult<()> {
    let current_version = get_schema_version(client).await?;

    if current_version == 0 {
        create_schema_v1(client).await?;
        set_schema_version(client, 1).await?;
        info!(version = SCHEMA_VERSION, "Created songs schema");
    } else if current_version > SCHEMA_VERSION {
        return Err(StorageError::Backend(BackendError::MigrationError {
            message: format!(
                "database schema version {} is newer than supported version {}",
                current_version, SCHEMA_VERSION
            ),
        }));
    }

    Ok(())
}

/// Get the current schema version.
async fn get_schema_version(client: &deadpool_postgres::Client) -> StorageResult<i32> {
    client
        .execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER NOT NULL
            )",
            &[],
        )
        .await
        .map_err(|e| pg_error(format!("Failed to create schema_version table: {}", e)))?;

    let row = client
        .query_opt("SELECT version FROM schema_version LIMIT 1", &[])
        .await
        .map_err(|e| pg_error(format!("Failed to query schema version: {}", e)))?;

    Ok(row.map(|r| r.get::<_, i32>(0)).unwrap_or(0))
}

/// Set the schema version.
async fn set_schema_version(client: &deadpool_postgres::Client, version: i32) -> StorageResult<()> {
    client
        .execute("DELETE FROM schema_version", &[])
        .await
        .map_err(|e| pg_error(format!("Failed to clear schema_version: {}", e)))?;

    client
        .execute(
            "INSERT INTO schema_version (version) VALUES ($1)",
            &[&version],
        )
        .await
        .map_err(|e| pg_error(format!("Failed to set schema_version: {}", e)))?;

    Ok(())
}

/// Create the initial schema (version 1).
async fn create_schema_v1(client: &deadpool_postgres::Client) -> StorageResult<()> {
    client
        .execute(
            "CREATE TABLE IF NOT EXISTS songs (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                title TEXT NOT NULL,
                band TEXT NOT NULL,
                lyrics TEXT NOT NULL DEFAULT '',
                link TEXT NOT NULL DEFAULT '',
                release_date DATE NOT NULL,
                deleted BOOLEAN NOT NULL DEFAULT FALSE
            )",
            &[],
        )
        .await
        .map_err(|e| pg_error(format!("Failed to create songs table: {}", e)))?;

    client
        .execute(
            "CREATE INDEX IF NOT EXISTS idx_songs_title ON songs (title) WHERE deleted = FALSE",
            &[],
        )
        .await
        .map_err(|e| pg_error(format!("Failed to create title index: {}", e)))?;

    client
        .execute(
            "CREATE INDEX IF NOT EXISTS idx_songs_release_date ON songs (release_date) WHERE deleted = FALSE",
            &[],
        )
        .await
        .map_err(|e| pg_error(format!("Failed to create release_date index: {}", e)))?;

    Ok(())
}

fn pg_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::MigrationError { message })
}
