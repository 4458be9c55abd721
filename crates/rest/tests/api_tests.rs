//! HTTP API tests.
//!
//! Exercises every catalog route against the in-memory backend and a stub
//! details lookup:
//! - status codes (200, 201, 204, 400, 404, 500)
//! - library filtering and pagination metadata
//! - lyrics windows
//! - error bodies

mod common;

use axum::http::StatusCode;
use cadence_persistence::types::{Library, Lyrics, Pagination};
use serde_json::{Value, json};

use common::{add_song, create_test_server};

async fn seed(server: &axum_test::TestServer) -> (String, String, String) {
    let black_hole = add_song(server, "Muse", "Supermassive Black Hole").await;
    let hysteria = add_song(server, "Muse", "Hysteria").await;
    let innuendo = add_song(server, "Queen", "Innuendo").await;
    (black_hole, hysteria, innuendo)
}

fn assert_error(body: &Value, status: u16) {
    assert_eq!(body["error"]["status"], status, "unexpected body: {}", body);
    assert!(body["error"]["message"].is_string());
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (server, _) = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
}

// =============================================================================
// Add song
// =============================================================================

#[tokio::test]
async fn test_add_song_returns_plain_text_id() {
    let (server, details) = create_test_server();

    let response = server
        .post("/api/v1/song")
        .json(&json!({ "group": "Muse", "song": "Hysteria" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let content_type = response.header("content-type");
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    assert!(uuid::Uuid::parse_str(&response.text()).is_ok());
    assert_eq!(details.calls(), 1);
}

#[tokio::test]
async fn test_add_song_rejected_by_details_service() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/song")
        .json(&json!({ "group": "Nobody", "song": "Unknown" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_error(&response.json(), 400);
}

#[tokio::test]
async fn test_add_song_details_service_down() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/song")
        .json(&json!({ "group": "Offline", "song": "Anything" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_error(&response.json(), 500);
}

#[tokio::test]
async fn test_add_song_details_with_bad_date_is_internal() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/song")
        .json(&json!({ "group": "Broken", "song": "Bad Date" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_add_song_invalid_body() {
    let (server, details) = create_test_server();

    let response = server.post("/api/v1/song").text("{not json").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/v1/song")
        .json(&json!({ "group": "Muse" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/v1/song")
        .json(&json!({ "group": "Muse", "song": "  " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(details.calls(), 0);
}

// =============================================================================
// Library
// =============================================================================

#[tokio::test]
async fn test_library_lists_all_songs_by_title() {
    let (server, _) = create_test_server();
    seed(&server).await;

    let response = server.get("/api/v1/library").await;
    response.assert_status_ok();

    let library: Library = response.json();
    let titles: Vec<_> = library.songs.iter().map(|s| s.song.as_str()).collect();
    assert_eq!(titles, vec!["Hysteria", "Innuendo", "Supermassive Black Hole"]);
    assert_eq!(library.pagination, Pagination::new(3, 0, 3));
}

#[tokio::test]
async fn test_library_song_json_shape() {
    let (server, _) = create_test_server();
    let id = add_song(&server, "Queen", "Innuendo").await;

    let body: Value = server.get("/api/v1/library").await.json();
    let song = &body["songs"][0];
    assert_eq!(song["id"], id.as_str());
    assert_eq!(song["song"], "Innuendo");
    assert_eq!(song["group"], "Queen");
    assert_eq!(song["releaseDate"], "14.01.1991");
    assert_eq!(song["link"], "https://songs.example/Innuendo");
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_library_filters() {
    let (server, _) = create_test_server();
    seed(&server).await;

    let library: Library = server
        .get("/api/v1/library")
        .add_query_param("group", "muse")
        .add_query_param("releaseDate", ">01.01.2005")
        .await
        .json();
    assert_eq!(library.songs.len(), 1);
    assert_eq!(library.songs[0].song, "Supermassive Black Hole");

    let library: Library = server
        .get("/api/v1/library")
        .add_query_param("releaseDate", "31.12.2004-01.01.1990")
        .await
        .json();
    let titles: Vec<_> = library.songs.iter().map(|s| s.song.as_str()).collect();
    assert_eq!(titles, vec!["Hysteria", "Innuendo"]);

    let library: Library = server
        .get("/api/v1/library")
        .add_query_param("text", "GRATING")
        .await
        .json();
    assert_eq!(library.songs.len(), 1);
    assert_eq!(library.songs[0].song, "Hysteria");
}

#[tokio::test]
async fn test_library_repeated_parameter_uses_first_value() {
    let (server, _) = create_test_server();
    seed(&server).await;

    let library: Library = server
        .get("/api/v1/library?group=queen&group=muse")
        .await
        .json();
    assert_eq!(library.songs.len(), 1);
    assert_eq!(library.songs[0].group, "Queen");
}

#[tokio::test]
async fn test_library_pagination() {
    let (server, _) = create_test_server();
    seed(&server).await;

    let library: Library = server
        .get("/api/v1/library")
        .add_query_param("limit", "2")
        .add_query_param("offset", "1")
        .await
        .json();
    let titles: Vec<_> = library.songs.iter().map(|s| s.song.as_str()).collect();
    assert_eq!(titles, vec!["Innuendo", "Supermassive Black Hole"]);
    assert_eq!(library.pagination, Pagination::new(2, 1, 3));
}

#[tokio::test]
async fn test_library_rejects_bad_parameters() {
    let (server, _) = create_test_server();

    for query in [
        "genre=rock",
        "limit=-1",
        "offset=ten",
        "releaseDate=2020-01-01",
        "releaseDate=01.01.2000-02.02.2001-03.03.2002",
        "releaseDate=%3E31.02.2020",
        "releaseDate=20.12.22",
        "releaseDate=1.1.2022-2.2.2022",
        "limit=18446744073709551615",
        "offset=9223372036854775808",
    ] {
        let response = server.get(&format!("/api/v1/library?{}", query)).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_error(&body, 400);
        assert!(
            body["error"]["message"]
                .as_str()
                .unwrap()
                .starts_with("failed to parse parameters"),
            "query {} gave {}",
            query,
            body
        );
    }
}

// =============================================================================
// Lyrics
// =============================================================================

#[tokio::test]
async fn test_lyrics_full_and_windowed() {
    let (server, _) = create_test_server();
    let id = add_song(&server, "Muse", "Supermassive Black Hole").await;

    let lyrics: Lyrics = server
        .get(&format!("/api/v1/song/{}/lyrics", id))
        .await
        .json();
    assert_eq!(lyrics.pagination, Pagination::new(3, 0, 3));
    assert!(lyrics.lyrics.starts_with("Ooh baby, don't you know"));

    let lyrics: Lyrics = server
        .get(&format!("/api/v1/song/{}/lyrics", id))
        .add_query_param("limit", "1")
        .add_query_param("offset", "1")
        .await
        .json();
    assert_eq!(lyrics.lyrics, "Ooh baby, can you hear me moan?");
    assert_eq!(lyrics.pagination, Pagination::new(1, 1, 3));
}

#[tokio::test]
async fn test_lyrics_offset_past_end() {
    let (server, _) = create_test_server();
    let id = add_song(&server, "Muse", "Hysteria").await;

    let lyrics: Lyrics = server
        .get(&format!("/api/v1/song/{}/lyrics?offset=5&limit=2", id))
        .await
        .json();
    assert_eq!(lyrics.lyrics, "");
    assert_eq!(lyrics.pagination, Pagination::new(0, 2, 2));
}

#[tokio::test]
async fn test_lyrics_errors() {
    let (server, _) = create_test_server();
    let id = add_song(&server, "Muse", "Hysteria").await;

    server
        .get("/api/v1/song/not-a-uuid/lyrics")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .get(&format!("/api/v1/song/{}/lyrics", uuid::Uuid::new_v4()))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // Only pagination parameters are accepted here
    server
        .get(&format!("/api/v1/song/{}/lyrics?title=x", id))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_song_changes_only_given_fields() {
    let (server, _) = create_test_server();
    let id = add_song(&server, "Muse", "Hysteria").await;

    server
        .patch(&format!("/api/v1/song/{}", id))
        .json(&json!({ "group": "MUSE", "releaseDate": "02.12.2003", "song": "" }))
        .await
        .assert_status_ok();

    let library: Library = server.get("/api/v1/library").await.json();
    let song = &library.songs[0];
    assert_eq!(song.group, "MUSE");
    assert_eq!(song.song, "Hysteria");
    assert_eq!(song.release_date, "02.12.2003");
}

#[tokio::test]
async fn test_update_song_errors() {
    let (server, _) = create_test_server();
    let id = add_song(&server, "Muse", "Hysteria").await;

    let response = server
        .patch(&format!("/api/v1/song/{}", id))
        .json(&json!({ "releaseDate": "2003-12-02" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_error(&response.json(), 400);

    server
        .patch(&format!("/api/v1/song/{}", id))
        .json(&json!({}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .patch(&format!("/api/v1/song/{}", uuid::Uuid::new_v4()))
        .json(&json!({ "link": "https://elsewhere.example" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .patch("/api/v1/song/42")
        .json(&json!({ "link": "https://elsewhere.example" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_song() {
    let (server, _) = create_test_server();
    let (_, hysteria, _) = seed(&server).await;

    server
        .delete(&format!("/api/v1/song/{}", hysteria))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let library: Library = server.get("/api/v1/library").await.json();
    assert_eq!(library.pagination.total, 2);
    assert!(library.songs.iter().all(|s| s.song != "Hysteria"));

    server
        .get(&format!("/api/v1/song/{}/lyrics", hysteria))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let response = server.delete(&format!("/api/v1/song/{}", hysteria)).await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_error(&response.json(), 404);
}

#[tokio::test]
async fn test_unknown_route() {
    let (server, _) = create_test_server();
    server
        .get("/api/v1/songs")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
