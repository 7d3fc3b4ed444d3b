//! End-to-end tests with mocked external dependencies.
//!
//! These tests run the full server stack in-process with mock implementations
//! for the media extractor and the audio backend.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use id3::TagLike;
use serde_json::json;
use tubetape_core::testing::MOCK_AUDIO;
use tubetape_core::{ConverterError, FetcherError};

use common::{TestConfig, TestFixture, TestResponse};

/// Reads the ID3 tag back from a delivered body.
fn read_tag(response: &TestResponse) -> id3::Tag {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("delivered.mp3");
    std::fs::write(&path, &response.bytes).unwrap();
    id3::Tag::read_from_path(&path).unwrap()
}

fn frame_text(tag: &id3::Tag, id: &str) -> Option<String> {
    tag.get(id)
        .and_then(|frame| frame.content().text())
        .map(str::to_string)
}

// =============================================================================
// Basic API Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert!(response.body["version"].is_string());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;
    fixture.get("/api/health").await;

    let response = fixture.get("/metrics").await;
    assert_eq!(response.status, StatusCode::OK);
    let text = String::from_utf8_lossy(&response.bytes);
    assert!(text.contains("tubetape_http_requests_total"));
}

#[tokio::test]
async fn test_options_convert() {
    let fixture = TestFixture::new().await;
    let response = fixture.options("/api/convert").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_cors_preflight_allows_frontend() {
    let fixture = TestFixture::new().await;
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/convert")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = fixture.send(request).await;
    assert!(response.status.is_success());
    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some("http://localhost:3000")
    );
    assert_eq!(response.body, json!({"status": "ok"}));
    assert_eq!(
        response.header("content-type").as_deref(),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_options_other_routes_left_alone() {
    let fixture = TestFixture::new().await;
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/health")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "GET")
        .body(Body::empty())
        .unwrap();

    let response = fixture.send(request).await;
    assert!(response.status.is_success());
    assert!(response.bytes.is_empty());
}

#[tokio::test]
async fn test_cors_exposes_custom_headers() {
    let fixture = TestFixture::new().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/convert")
        .header("Origin", "http://localhost:3000")
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"url": "https://valid/video"}"#))
        .unwrap();

    let response = fixture.send(request).await;
    assert_eq!(response.status, StatusCode::OK);
    let exposed = response
        .header("access-control-expose-headers")
        .unwrap()
        .to_lowercase();
    assert!(exposed.contains("x-video-title"));
    assert!(exposed.contains("content-disposition"));
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_missing_url() {
    let fixture = TestFixture::new().await;
    let response = fixture
        .post("/api/convert", json!({"url": "", "title": "x"}))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"error": "Missing YouTube URL"}));
    assert!(fixture.fetcher.recorded_jobs().await.is_empty());
    assert_eq!(fixture.scratch_entries(), 0);
}

#[tokio::test]
async fn test_absent_url() {
    let fixture = TestFixture::new().await;
    let response = fixture.post("/api/convert", json!({"artist": "A"})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Missing YouTube URL");
}

#[tokio::test]
async fn test_malformed_json() {
    let fixture = TestFixture::new().await;
    let response = fixture.post_raw("/api/convert", "{not json").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON body"));
    assert_eq!(fixture.scratch_entries(), 0);
}

#[tokio::test]
async fn test_malformed_start() {
    let fixture = TestFixture::new().await;
    let response = fixture
        .post(
            "/api/convert",
            json!({"url": "https://valid/video", "start": "soon"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid start time"));
    assert!(fixture.fetcher.recorded_jobs().await.is_empty());
}

// =============================================================================
// Conversion
// =============================================================================

#[tokio::test]
async fn test_plain_conversion() {
    let fixture = TestFixture::new().await;
    fixture.fetcher.set_title("Some Video").await;

    let response = fixture
        .post("/api/convert", json!({"url": "https://valid/video"}))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("content-type").as_deref(), Some("audio/mpeg"));
    assert_eq!(response.header("x-video-title").as_deref(), Some("Some Video"));
    assert!(response
        .header("content-disposition")
        .unwrap()
        .contains("filename=\"Some Video.mp3\""));
    assert!(response.header("x-conversion-warnings").is_none());
    assert_eq!(response.bytes.as_ref(), MOCK_AUDIO);

    // Full length, untagged
    assert!(fixture.converter.recorded_trims().await.is_empty());
    assert!(fixture.mock_tagger().recorded_writes().await.is_empty());

    assert_eq!(fixture.scratch_entries(), 0);
}

#[tokio::test]
async fn test_long_source_title_is_truncated() {
    let fixture = TestFixture::new().await;
    let long_title = "A".repeat(70);
    fixture.fetcher.set_title(long_title.clone()).await;

    let response = fixture
        .post("/api/convert", json!({"url": "https://valid/video"}))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let expected = format!("filename=\"{}.mp3\"", "A".repeat(50));
    assert!(response.header("content-disposition").unwrap().contains(&expected));
    // The header carries the full title
    assert_eq!(response.header("x-video-title"), Some(long_title));
}

#[tokio::test]
async fn test_user_title_names_download() {
    let fixture = TestFixture::new().await;
    fixture.fetcher.set_title("Source Title").await;

    let response = fixture
        .post(
            "/api/convert",
            json!({"url": "https://valid/video", "title": "Café Session"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let disposition = response.header("content-disposition").unwrap();
    assert!(disposition.contains("filename*=UTF-8''Caf%C3%A9%20Session.mp3"));
    assert_eq!(response.header("x-video-title").as_deref(), Some("Source Title"));
}

#[tokio::test]
async fn test_inverted_trim_bounds_collapse() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post(
            "/api/convert",
            json!({"url": "https://valid/video", "start": 10, "end": 5}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let trims = fixture.converter.recorded_trims().await;
    assert_eq!(trims.len(), 1);
    assert_eq!(trims[0].window.start_ms, 10_000);
    assert_eq!(trims[0].window.end_ms, 10_000);
    assert_eq!(fixture.scratch_entries(), 0);
}

#[tokio::test]
async fn test_numeric_string_bounds() {
    let fixture = TestFixture::new().await;
    fixture.converter.set_duration_secs(30.0).await;

    let response = fixture
        .post(
            "/api/convert",
            json!({"url": "https://valid/video", "start": "2.5", "end": "90"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let trims = fixture.converter.recorded_trims().await;
    assert_eq!(trims[0].window.start_ms, 2_500);
    assert_eq!(trims[0].window.end_ms, 30_000);
}

#[tokio::test]
async fn test_artist_fills_both_frames() {
    let fixture = TestFixture::with_config(TestConfig { real_tagger: true }).await;

    let response = fixture
        .post(
            "/api/convert",
            json!({"url": "https://valid/video", "artist": "A"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let tag = read_tag(&response);
    assert_eq!(frame_text(&tag, "TPE1").as_deref(), Some("A"));
    assert_eq!(frame_text(&tag, "TPE2").as_deref(), Some("A"));
    assert!(response.bytes.ends_with(MOCK_AUDIO));
}

#[tokio::test]
async fn test_genre_only_leaves_other_frames_absent() {
    let fixture = TestFixture::with_config(TestConfig { real_tagger: true }).await;

    let response = fixture
        .post(
            "/api/convert",
            json!({"url": "https://valid/video", "genre": "Jazz"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let tag = read_tag(&response);
    assert_eq!(frame_text(&tag, "TCON").as_deref(), Some("Jazz"));
    assert!(tag.get("TIT2").is_none());
    assert!(tag.get("TPE1").is_none());
    assert!(tag.get("TALB").is_none());
}

#[tokio::test]
async fn test_tag_failure_still_delivers() {
    let fixture = TestFixture::new().await;
    fixture.mock_tagger().fail_with("read-only file").await;

    let response = fixture
        .post(
            "/api/convert",
            json!({"url": "https://valid/video", "album": "Record"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes.as_ref(), MOCK_AUDIO);
    assert!(response
        .header("x-conversion-warnings")
        .unwrap()
        .contains("read-only file"));
    assert_eq!(fixture.scratch_entries(), 0);
}

#[tokio::test]
async fn test_fetch_failure() {
    let fixture = TestFixture::new().await;
    fixture
        .fetcher
        .set_next_error(FetcherError::extraction_failed("Video unavailable", None))
        .await;

    let response = fixture
        .post("/api/convert", json!({"url": "https://invalid/video"}))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.body,
        json!({"error": "Conversion failed: Video unavailable"})
    );
    assert_eq!(fixture.scratch_entries(), 0);
}

#[tokio::test]
async fn test_trim_failure_reports_ffmpeg_output() {
    let fixture = TestFixture::new().await;
    fixture
        .converter
        .set_next_error(ConverterError::trim_failed(
            "FFmpeg exited with code: Some(1)",
            Some("Invalid argument: -t\n".to_string()),
        ))
        .await;

    let response = fixture
        .post("/api/convert", json!({"url": "https://valid/video", "end": 5}))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = response.body["error"].as_str().unwrap();
    assert!(message.starts_with("Conversion failed: FFmpeg exited with code: Some(1)"));
    assert!(message.contains("Invalid argument: -t"));
    assert_eq!(fixture.scratch_entries(), 0);
}

#[tokio::test]
async fn test_sequential_requests_leave_no_scratch() {
    let fixture = TestFixture::new().await;

    for body in [
        json!({"url": "https://valid/1"}),
        json!({"url": "https://valid/2", "end": 3}),
        json!({"url": "https://valid/3", "title": "T", "genre": "G"}),
    ] {
        let response = fixture.post("/api/convert", body).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    assert_eq!(fixture.fetcher.recorded_jobs().await.len(), 3);
    assert_eq!(fixture.scratch_entries(), 0);
}
