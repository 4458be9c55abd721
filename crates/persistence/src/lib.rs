//! Cadence Persistence Layer
//!
//! This crate holds everything between an HTTP request and the song table:
//! the dynamic query-parameter builder, the lyrics paginator, the song model
//! and the storage backends.
//!
//! # Features
//!
//! - **Parameter builder**: turns an open-ended set of query parameters into a
//!   validated [`ParameterSet`](params::ParameterSet) and renders it as an
//!   injection-safe, parameterized SQL fragment
//! - **Lyrics pagination**: verse windows with clamped, off-by-one-free metadata
//! - **Soft deletes** and **transactional partial updates**
//!
//! # Backend Features
//!
//! - `postgres` (default) - PostgreSQL via tokio-postgres and deadpool-postgres
//!
//! The in-memory backend is always available.
//!
//! # Architecture
//!
//! - [`params`] - Parameter registry, filter values and the query builder
//! - [`lyrics`] - Verse splitting and windowing
//! - [`types`] - Songs, payloads and pagination metadata
//! - [`error`] - Error types for all operations
//! - [`core`] - The [`SongStorage`](core::SongStorage) trait
//! - [`backends`] - Memory and PostgreSQL implementations
//!
//! # Quick Start
//!
//! ```
//! use cadence_persistence::params::{ParamRegistry, ParameterSet};
//! use cadence_persistence::lyrics::paginate_lyrics;
//!
//! let registry = ParamRegistry::song_library();
//! let set = ParameterSet::build(
//!     &registry,
//!     vec![
//!         ("releaseDate".to_string(), vec![">01.01.2000".to_string()]),
//!         ("offset".to_string(), vec!["10".to_string()]),
//!     ],
//! )
//! .unwrap();
//! let (sql, values) = set.to_query("SELECT * FROM songs");
//! assert!(sql.contains("release_date > $1"));
//! assert_eq!(values.len(), 1);
//!
//! let (verses, page) = paginate_lyrics("A\n\nB\n\nC", 1, 2);
//! assert_eq!(verses, "C");
//! assert_eq!(page.total, 3);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod lyrics;
pub mod params;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};
pub use params::{ParamRegistry, ParameterSet};
pub use types::Pagination;

// Re-export core traits
pub use core::SongStorage;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
