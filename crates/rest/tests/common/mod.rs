//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use cadence_persistence::backends::memory::MemoryBackend;
use cadence_persistence::types::{SongDetails, SongTitle};
use cadence_rest::details::{DetailsError, SongDetailsLookup};
use cadence_rest::{AppState, ServerConfig};
use parking_lot::Mutex;

/// Details lookup answering from a fixed table.
///
/// Unknown titles are rejected like the real service rejects them. The band
/// `"Offline"` simulates an unreachable service.
#[derive(Default)]
pub struct StubDetails {
    known: HashMap<(String, String), SongDetails>,
    calls: Mutex<Vec<SongTitle>>,
}

impl StubDetails {
    pub fn with_catalog() -> Self {
        let mut stub = Self::default();
        stub.insert(
            "Muse",
            "Supermassive Black Hole",
            "16.07.2006",
            "Ooh baby, don't you know I suffer?\n\nOoh baby, can you hear me moan?\n\nYou caught me under false pretenses",
        );
        stub.insert(
            "Muse",
            "Hysteria",
            "01.12.2003",
            "It's bugging me\n\nGrating me",
        );
        stub.insert(
            "Queen",
            "Innuendo",
            "14.01.1991",
            "While the sun hangs in the sky",
        );
        stub.insert("Broken", "Bad Date", "2006-07-16", "x");
        stub
    }

    pub fn insert(&mut self, group: &str, song: &str, date: &str, text: &str) {
        self.known.insert(
            (group.to_string(), song.to_string()),
            SongDetails {
                release_date: date.to_string(),
                text: text.to_string(),
                link: format!("https://songs.example/{}", song.replace(' ', "-")),
            },
        );
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl SongDetailsLookup for StubDetails {
    async fn details(&self, title: &SongTitle) -> Result<SongDetails, DetailsError> {
        self.calls.lock().push(title.clone());

        if title.group == "Offline" {
            return Err(DetailsError::Status { status: 503 });
        }

        self.known
            .get(&(title.group.clone(), title.song.clone()))
            .cloned()
            .ok_or_else(|| DetailsError::BadRequest {
                group: title.group.clone(),
                song: title.song.clone(),
            })
    }
}

/// Creates a test server over an empty memory backend.
pub fn create_test_server() -> (TestServer, Arc<StubDetails>) {
    create_test_server_with_config(ServerConfig::for_testing())
}

/// Creates a test server with a custom configuration.
pub fn create_test_server_with_config(config: ServerConfig) -> (TestServer, Arc<StubDetails>) {
    let details = Arc::new(StubDetails::with_catalog());
    let state = AppState::new(
        Arc::new(MemoryBackend::new()),
        Arc::clone(&details) as Arc<dyn SongDetailsLookup>,
        config,
    );
    let app = cadence_rest::routing::create_routes(state);
    let server = TestServer::new(app).expect("Failed to create test server");
    (server, details)
}

/// Adds a song through the API and returns its ID.
pub async fn add_song(server: &TestServer, group: &str, song: &str) -> String {
    let response = server
        .post("/api/v1/song")
        .json(&serde_json::json!({ "group": group, "song": song }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.text()
}
