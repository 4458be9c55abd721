//! Server configuration for the music catalog REST API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CADENCE_SERVER_PORT` | 8080 | Server port |
//! | `CADENCE_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `CADENCE_LOG_LEVEL` | info | Log level |
//! | `CADENCE_MAX_BODY_SIZE` | 1048576 | Max request body (bytes) |
//! | `CADENCE_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `CADENCE_ENABLE_CORS` | true | Enable CORS |
//! | `CADENCE_CORS_ORIGINS` | * | Allowed origins |
//! | `CADENCE_CORS_METHODS` | GET,POST,PATCH,DELETE,OPTIONS | Allowed methods |
//! | `CADENCE_CORS_HEADERS` | Content-Type,Accept,Authorization | Allowed headers |
//! | `CADENCE_ENABLE_REQUEST_ID` | true | Tag requests with `x-request-id` |
//! | `CADENCE_STORAGE_BACKEND` | postgres | Storage backend (postgres, memory) |
//! | `CADENCE_DATABASE_URL` | | PostgreSQL connection string |
//! | `CADENCE_DB_RETRY_COUNT` | 3 | Database connection attempts |
//! | `CADENCE_DB_RETRY_BACKOFF` | 1s | Pause between database attempts |
//! | `CADENCE_DETAILS_URL` | http://localhost:8081 | Song details service |
//! | `CADENCE_DETAILS_RETRY_COUNT` | 3 | Details request retries |
//! | `CADENCE_DETAILS_RETRY_BACKOFF` | 1s | First retry pause |
//! | `CADENCE_DETAILS_MAX_RETRY_BACKOFF` | 10s | Retry pause cap |
//!
//! # Example
//!
//! ```rust
//! use cadence_rest::ServerConfig;
//!
//! // Create from environment
//! let config = ServerConfig::from_env();
//!
//! // Or create programmatically
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     enable_cors: true,
//!     ..Default::default()
//! };
//! assert_eq!(config.socket_addr(), "0.0.0.0:3000");
//! ```

use std::fmt;
use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Storage backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StorageBackendMode {
    /// PostgreSQL via a connection pool.
    #[default]
    Postgres,
    /// In-process storage, lost on shutdown.
    Memory,
}

impl fmt::Display for StorageBackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackendMode::Postgres => write!(f, "postgres"),
            StorageBackendMode::Memory => write!(f, "memory"),
        }
    }
}

/// Server configuration for the music catalog REST API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "cadence")]
#[command(about = "Music catalog REST server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "CADENCE_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "CADENCE_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "CADENCE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "CADENCE_MAX_BODY_SIZE", default_value = "1048576")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "CADENCE_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "CADENCE_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "CADENCE_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "CADENCE_CORS_METHODS",
        default_value = "GET,POST,PATCH,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "CADENCE_CORS_HEADERS",
        default_value = "Content-Type,Accept,Authorization"
    )]
    pub cors_headers: String,

    /// Enable request ID tracking.
    #[arg(long, env = "CADENCE_ENABLE_REQUEST_ID", default_value = "true")]
    pub enable_request_id: bool,

    /// Storage backend.
    #[arg(long, env = "CADENCE_STORAGE_BACKEND", value_enum, default_value_t = StorageBackendMode::Postgres)]
    pub storage_backend: StorageBackendMode,

    /// Database connection string.
    #[arg(long, env = "CADENCE_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Number of database connection attempts at startup.
    #[arg(long, env = "CADENCE_DB_RETRY_COUNT", default_value = "3")]
    pub db_retry_count: u32,

    /// Pause between database connection attempts.
    #[arg(long, env = "CADENCE_DB_RETRY_BACKOFF", default_value = "1s", value_parser = humantime::parse_duration)]
    pub db_retry_backoff: Duration,

    /// Base URL of the song details service.
    #[arg(long, env = "CADENCE_DETAILS_URL", default_value = "http://localhost:8081")]
    pub details_url: String,

    /// Number of retries for a failed details request.
    #[arg(long, env = "CADENCE_DETAILS_RETRY_COUNT", default_value = "3")]
    pub details_retry_count: u32,

    /// Pause before the first details retry; doubled on each further retry.
    #[arg(long, env = "CADENCE_DETAILS_RETRY_BACKOFF", default_value = "1s", value_parser = humantime::parse_duration)]
    pub details_retry_backoff: Duration,

    /// Upper bound for the pause between details retries.
    #[arg(long, env = "CADENCE_DETAILS_MAX_RETRY_BACKOFF", default_value = "10s", value_parser = humantime::parse_duration)]
    pub details_max_retry_backoff: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 1024 * 1024, // 1MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PATCH,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Accept,Authorization".to_string(),
            enable_request_id: true,
            storage_backend: StorageBackendMode::Postgres,
            database_url: None,
            db_retry_count: 3,
            db_retry_backoff: Duration::from_secs(1),
            details_url: "http://localhost:8081".to_string(),
            details_retry_count: 3,
            details_retry_backoff: Duration::from_secs(1),
            details_max_retry_backoff: Duration::from_secs(10),
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        // Try to parse from environment, falling back to defaults
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.db_retry_count == 0 {
            errors.push("Database retry count cannot be 0".to_string());
        }

        if let Err(e) = url::Url::parse(&self.details_url) {
            errors.push(format!("Invalid details URL '{}': {}", self.details_url, e));
        }

        if self.details_retry_backoff > self.details_max_retry_backoff {
            errors.push("Details retry backoff cannot exceed max retry backoff".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0, the in-memory backend, and disables
    /// features that might interfere with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            max_body_size: 64 * 1024,
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            enable_request_id: false,
            storage_backend: StorageBackendMode::Memory,
            database_url: None,
            db_retry_count: 1,
            db_retry_backoff: Duration::from_millis(10),
            details_url: "http://127.0.0.1:8081".to_string(),
            details_retry_count: 0,
            details_retry_backoff: Duration::from_millis(10),
            details_max_retry_backoff: Duration::from_millis(50),
        }
    }
}
