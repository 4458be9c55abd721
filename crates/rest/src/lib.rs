//! # cadence-rest - Music catalog REST API
//!
//! This crate exposes the song library over HTTP: a filtered and paged
//! listing, verse windows over lyrics, and song creation, partial update and
//! deletion. New songs are enriched through an external details service before
//! they are stored.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cadence_persistence::backends::memory::MemoryBackend;
//! use cadence_rest::details::DetailsClient;
//! use cadence_rest::{ServerConfig, create_app_with_config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let details = DetailsClient::from_config(&config);
//!
//!     let app = create_app_with_config(MemoryBackend::new(), Arc::new(details), config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Interaction | HTTP Method | URL Pattern |
//! |------------|-------------|-------------|
//! | library | GET | `/api/v1/library?params` |
//! | lyrics | GET | `/api/v1/song/{id}/lyrics?limit&offset` |
//! | add | POST | `/api/v1/song` |
//! | update | PATCH | `/api/v1/song/{id}` |
//! | delete | DELETE | `/api/v1/song/{id}` |
//! | health | GET | `/health` |
//!
//! ## Error Handling
//!
//! Errors are returned as `{"error": {"status": .., "message": ..}}` with
//! 400 for invalid input, 404 for missing songs and 500 for everything else.
//!
//! ## Architecture
//!
//! - [`error`] - Error types and response bodies
//! - [`config`] - Server configuration
//! - [`details`] - Song details service client
//! - [`state`] - Application state (storage, details lookup, registries)
//! - [`extractors`] - Axum extractors for query strings, IDs and bodies
//! - [`handlers`] - HTTP request handlers
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod details;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::{ServerConfig, StorageBackendMode};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, StatusCode};
use cadence_persistence::core::SongStorage;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::details::SongDetailsLookup;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S, details: Arc<dyn SongDetailsLookup>) -> Router
where
    S: SongStorage + Send + Sync + 'static,
{
    create_app_with_config(storage, details, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Sets up the catalog routes together with tracing, timeout, body size,
/// CORS and request ID middleware.
///
/// # Arguments
///
/// * `storage` - The storage backend to use
/// * `details` - Lookup used to enrich new songs
/// * `config` - Server configuration
pub fn create_app_with_config<S>(
    storage: S,
    details: Arc<dyn SongDetailsLookup>,
    config: ServerConfig,
) -> Router
where
    S: SongStorage + Send + Sync + 'static,
{
    info!(
        "Creating REST API server with backend: {}",
        storage.backend_name()
    );

    let state = AppState::new(Arc::new(storage), details, config.clone());

    let router = routing::create_routes(state).layer(DefaultBodyLimit::max(config.max_body_size));

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    let router = router.layer(service_builder);

    // Outermost, so the trace span sees the ID
    if config.enable_request_id {
        router
            .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
            .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
    } else {
        router
    }
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` overrides
/// the default filter.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "cadence={level},cadence_rest={level},cadence_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
