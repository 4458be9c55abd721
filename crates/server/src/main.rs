//! Cadence music catalog server.
//!
//! Serves the song library REST API backed by PostgreSQL or in-process
//! storage.

use std::sync::Arc;

use clap::Parser;
use cadence_persistence::backends::memory::MemoryBackend;
use cadence_rest::details::{DetailsClient, SongDetailsLookup};
use cadence_rest::{ServerConfig, StorageBackendMode, create_app_with_config, init_logging};
use tracing::info;

/// Starts the Axum HTTP server and runs it until a shutdown signal arrives.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        storage_backend = %config.storage_backend,
        details_url = %config.details_url,
        "Starting Cadence server"
    );

    let details: Arc<dyn SongDetailsLookup> = Arc::new(DetailsClient::from_config(&config));

    match config.storage_backend {
        StorageBackendMode::Postgres => {
            start_postgres(config, details).await?;
        }
        StorageBackendMode::Memory => {
            start_memory(config, details).await?;
        }
    }

    Ok(())
}

/// Starts the server with in-process storage.
async fn start_memory(
    config: ServerConfig,
    details: Arc<dyn SongDetailsLookup>,
) -> anyhow::Result<()> {
    info!("Initializing in-memory backend; songs are lost on shutdown");
    let app = create_app_with_config(MemoryBackend::new(), details, config.clone());
    serve(app, &config).await
}

/// Starts the server with PostgreSQL backend.
#[cfg(feature = "postgres")]
async fn start_postgres(
    config: ServerConfig,
    details: Arc<dyn SongDetailsLookup>,
) -> anyhow::Result<()> {
    use cadence_persistence::backends::postgres::{PostgresBackend, PostgresConfig};

    let mut pg_config = match config.database_url {
        Some(ref url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {
            info!("Initializing PostgreSQL backend from connection string");
            PostgresConfig::from_connection_string(url)
        }
        _ => {
            info!("Initializing PostgreSQL backend from environment variables");
            PostgresConfig::from_env()
        }
    };
    pg_config.retry_count = config.db_retry_count;
    pg_config.retry_backoff = config.db_retry_backoff;

    let backend = PostgresBackend::new(pg_config).await?;
    backend.init_schema().await?;

    let app = create_app_with_config(backend, details, config.clone());
    serve(app, &config).await
}

/// Fallback when postgres feature is not enabled.
#[cfg(not(feature = "postgres"))]
async fn start_postgres(
    _config: ServerConfig,
    _details: Arc<dyn SongDetailsLookup>,
) -> anyhow::Result<()> {
    anyhow::bail!(
        "The postgres backend requires the 'postgres' feature. \
         Build with: cargo build -p cadence-server --features postgres, \
         or run with --storage-backend memory"
    )
}
