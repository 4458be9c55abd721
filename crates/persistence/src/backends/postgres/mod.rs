//! PostgreSQL backend implementation.
//!
//! Songs live in a single `songs` table accessed through a deadpool-postgres
//! connection pool. Listing queries are rendered by
//! [`ParameterSet::to_query`](crate::params::ParameterSet::to_query) with
//! every user-supplied value bound as a parameter.
//!
//! # Example
//!
//! ```no_run
//! use cadence_persistence::backends::postgres::{PostgresBackend, PostgresConfig};
//!
//! # async fn main_example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = PostgresBackend::new(PostgresConfig::default()).await?;
//! backend.init_schema().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS songs (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     title TEXT NOT NULL,
//!     band TEXT NOT NULL,
//!     lyrics TEXT NOT NULL DEFAULT '',
//!     link TEXT NOT NULL DEFAULT '',
//!     release_date DATE NOT NULL,
//!     deleted BOOLEAN NOT NULL DEFAULT FALSE
//! );
//! ```

mod backend;
pub(crate) mod schema;
mod storage;

pub use backend::{PostgresBackend, PostgresConfig, PostgresSslMode};
