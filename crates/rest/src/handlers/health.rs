//! Health check endpoint handler.
//!
//! Provides a simple health check endpoint for monitoring and load balancers.

use axum::{Json, extract::State};
use cadence_persistence::core::SongStorage;
use tracing::debug;

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> Json<serde_json::Value>
where
    S: SongStorage + Send + Sync,
{
    debug!("Processing health check request");

    Json(serde_json::json!({
        "status": "healthy",
        "backend": state.storage().backend_name(),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
