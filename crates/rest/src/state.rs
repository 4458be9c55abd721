//! Application state for the music catalog REST API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the storage backend, the details lookup, the parameter
//! registries and the server configuration.

use std::sync::Arc;

use cadence_persistence::core::SongStorage;
use cadence_persistence::params::ParamRegistry;

use crate::config::ServerConfig;
use crate::details::SongDetailsLookup;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`SongStorage`])
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use cadence_persistence::backends::memory::MemoryBackend;
/// use cadence_rest::details::{DetailsClient, RetryPolicy};
/// use cadence_rest::{AppState, ServerConfig};
///
/// let details = DetailsClient::new("http://localhost:8081", RetryPolicy::default());
/// let state = AppState::new(
///     Arc::new(MemoryBackend::new()),
///     Arc::new(details),
///     ServerConfig::default(),
/// );
/// assert_eq!(state.library_params().order_by(), "title");
/// ```
pub struct AppState<S> {
    /// The storage backend.
    storage: Arc<S>,

    /// Lookup used to enrich new songs.
    details: Arc<dyn SongDetailsLookup>,

    /// Vocabulary of the library listing.
    library_params: Arc<ParamRegistry>,

    /// Vocabulary of the lyrics window.
    lyrics_params: Arc<ParamRegistry>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            details: Arc::clone(&self.details),
            library_params: Arc::clone(&self.library_params),
            lyrics_params: Arc::clone(&self.lyrics_params),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: SongStorage> AppState<S> {
    /// Creates a new AppState with the given storage, details lookup and
    /// configuration.
    pub fn new(
        storage: Arc<S>,
        details: Arc<dyn SongDetailsLookup>,
        config: ServerConfig,
    ) -> Self {
        Self {
            storage,
            details,
            library_params: Arc::new(ParamRegistry::song_library()),
            lyrics_params: Arc::new(ParamRegistry::pagination_only()),
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a clone of the storage Arc.
    pub fn storage_arc(&self) -> Arc<S> {
        Arc::clone(&self.storage)
    }

    /// Returns the details lookup.
    pub fn details(&self) -> &dyn SongDetailsLookup {
        self.details.as_ref()
    }

    /// Returns the library listing registry.
    pub fn library_params(&self) -> &ParamRegistry {
        &self.library_params
    }

    /// Returns the lyrics window registry.
    pub fn lyrics_params(&self) -> &ParamRegistry {
        &self.lyrics_params
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
