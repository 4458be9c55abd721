//! Client for the external song details service.
//!
//! New songs are enriched with their release date, lyrics and link before they
//! are stored. The lookup sits behind the [`SongDetailsLookup`] trait so the
//! HTTP client can be replaced in tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cadence_persistence::types::{SongDetails, SongTitle};
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::ServerConfig;

/// Errors returned by a details lookup.
#[derive(Debug, Error)]
pub enum DetailsError {
    /// The details service rejected the band/title pair.
    #[error("details service rejected the request for '{group} - {song}'")]
    BadRequest {
        /// Band name.
        group: String,
        /// Song title.
        song: String,
    },

    /// The details service answered with an unexpected status.
    #[error("unexpected details service status {status}")]
    Status {
        /// HTTP status code received.
        status: u16,
    },

    /// The details payload could not be decoded.
    #[error("failed to decode song details: {0}")]
    BadResponse(String),

    /// The HTTP request failed.
    #[error("details request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl DetailsError {
    /// Returns true if the failure was caused by the requested title.
    pub fn is_user_error(&self) -> bool {
        matches!(self, DetailsError::BadRequest { .. })
    }

    fn is_retryable(&self) -> bool {
        match self {
            DetailsError::Transport(_) => true,
            DetailsError::Status { status } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            DetailsError::BadRequest { .. } | DetailsError::BadResponse(_) => false,
        }
    }
}

/// Looks up enrichment data for a song.
#[async_trait]
pub trait SongDetailsLookup: Send + Sync {
    /// Returns the details for `title`.
    async fn details(&self, title: &SongTitle) -> Result<SongDetails, DetailsError>;
}

/// Retry policy for the details client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retry_count: u32,
    /// Pause before the first retry.
    pub backoff: Duration,
    /// Upper bound for any single pause.
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Pause before retry number `retry` (starting at 1): the base backoff
    /// doubled for each earlier retry, capped at `max_backoff`.
    pub fn delay(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_count: 3,
            backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
        }
    }
}

/// `reqwest`-backed implementation of [`SongDetailsLookup`].
#[derive(Debug, Clone)]
pub struct DetailsClient {
    base_url: String,
    http: Arc<reqwest::Client>,
    retry: RetryPolicy,
}

impl DetailsClient {
    /// Creates a client targeting `base_url`.
    pub fn new(base_url: impl Into<String>, retry: RetryPolicy) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "Creating details client");
        Self {
            base_url,
            http: Arc::new(reqwest::Client::new()),
            retry,
        }
    }

    /// Creates a client from the server configuration.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.details_url.clone(),
            RetryPolicy {
                retry_count: config.details_retry_count,
                backoff: config.details_retry_backoff,
                max_backoff: config.details_max_retry_backoff,
            },
        )
    }

    /// Returns the service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, title: &SongTitle) -> Result<SongDetails, DetailsError> {
        let response = self
            .http
            .get(format!("{}/info", self.base_url))
            .query(&[("group", title.group.as_str()), ("song", title.song.as_str())])
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => response.json::<SongDetails>().await.map_err(|e| {
                error!(
                    song = %title.song,
                    group = %title.group,
                    error = %e,
                    "Failed to decode song details"
                );
                DetailsError::BadResponse(e.to_string())
            }),
            StatusCode::BAD_REQUEST => {
                debug!(song = %title.song, group = %title.group, "Bad details request");
                Err(DetailsError::BadRequest {
                    group: title.group.clone(),
                    song: title.song.clone(),
                })
            }
            status => Err(DetailsError::Status {
                status: status.as_u16(),
            }),
        }
    }
}

#[async_trait]
impl SongDetailsLookup for DetailsClient {
    async fn details(&self, title: &SongTitle) -> Result<SongDetails, DetailsError> {
        debug!(song = %title.song, group = %title.group, "Getting song details");

        let mut retry = 0;
        loop {
            match self.fetch(title).await {
                Ok(details) => return Ok(details),
                Err(e) if e.is_retryable() && retry < self.retry.retry_count => {
                    retry += 1;
                    let delay = self.retry.delay(retry);
                    warn!(
                        song = %title.song,
                        group = %title.group,
                        retry,
                        delay = %humantime::format_duration(delay),
                        error = %e,
                        "Retrying song details request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if !e.is_user_error() {
                        error!(
                            song = %title.song,
                            group = %title.group,
                            error = %e,
                            "Error while getting song details"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_doubles_and_caps() {
        let policy = RetryPolicy {
            retry_count: 5,
            backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
        };
        assert_eq!(policy.delay(1), Duration::from_secs(1));
        assert_eq!(policy.delay(2), Duration::from_secs(2));
        assert_eq!(policy.delay(3), Duration::from_secs(4));
        assert_eq!(policy.delay(4), Duration::from_secs(8));
        assert_eq!(policy.delay(5), Duration::from_secs(10));
        assert_eq!(policy.delay(40), Duration::from_secs(10));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(DetailsError::Status { status: 503 }.is_retryable());
        assert!(DetailsError::Status { status: 429 }.is_retryable());
        assert!(!DetailsError::Status { status: 404 }.is_retryable());
        assert!(!DetailsError::BadResponse("eof".to_string()).is_retryable());

        let bad = DetailsError::BadRequest {
            group: "Muse".to_string(),
            song: "Hysteria".to_string(),
        };
        assert!(!bad.is_retryable());
        assert!(bad.is_user_error());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = DetailsClient::new("http://details.local:8081/", RetryPolicy::default());
        assert_eq!(client.base_url(), "http://details.local:8081");
    }

    #[tokio::test]
    async fn test_unreachable_service_gives_transport_error() {
        let client = DetailsClient::new(
            "http://127.0.0.1:1",
            RetryPolicy {
                retry_count: 1,
                backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(1),
            },
        );
        let err = client
            .details(&SongTitle::new("Muse", "Hysteria"))
            .await
            .unwrap_err();
        assert!(matches!(err, DetailsError::Transport(_)));
        assert!(!err.is_user_error());
    }
}
