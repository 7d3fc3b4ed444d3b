//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, so the full request flow can be
//! exercised without yt-dlp or ffmpeg installed.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use tubetape_core::{
    testing::{MockConverter, MockFetcher, MockTagWriter},
    Config, ConversionPipeline, Converter, Fetcher, Id3TagWriter, ScratchSpace, TagWriter,
};
use tubetape_server::{create_router, AppState};

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - Media download (MockFetcher)
/// - Probing and trimming (MockConverter)
/// - Tag writing (MockTagWriter, unless the real ID3 writer is requested)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_plain_conversion() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/convert", json!({
///         "url": "https://valid/video"
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock fetcher - configure titles and failures
    pub fetcher: Arc<MockFetcher>,
    /// Mock converter - configure durations, inspect trim jobs
    pub converter: Arc<MockConverter>,
    /// Mock tag writer (`None` when the real ID3 writer is used)
    pub tagger: Option<Arc<MockTagWriter>>,
    /// Temporary directory holding the scratch root
    pub temp_dir: TempDir,
    /// Scratch root used by the pipeline
    pub scratch_dir: PathBuf,
}

/// Options for building a fixture.
#[derive(Debug, Default)]
pub struct TestConfig {
    /// Write real ID3 tags instead of recording calls.
    pub real_tagger: bool,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Bytes,
    /// Parsed JSON body, or `Null` when the body is not JSON.
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
    }
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let scratch_dir = temp_dir.path().join("scratch");

        let mut config = Config::default();
        config.scratch.dir = scratch_dir.clone();

        let scratch = ScratchSpace::new(&scratch_dir);
        scratch.reset().await.expect("Failed to prepare scratch dir");

        // Create mocks
        let fetcher = Arc::new(MockFetcher::new());
        let converter = Arc::new(MockConverter::new());
        let (tagger, tag_writer): (Option<Arc<MockTagWriter>>, Arc<dyn TagWriter>) =
            if test_config.real_tagger {
                (None, Arc::new(Id3TagWriter::new()) as Arc<dyn TagWriter>)
            } else {
                let mock = Arc::new(MockTagWriter::new());
                (Some(Arc::clone(&mock)), mock as Arc<dyn TagWriter>)
            };

        let pipeline = ConversionPipeline::new(
            Arc::clone(&fetcher) as Arc<dyn Fetcher>,
            Arc::clone(&converter) as Arc<dyn Converter>,
            tag_writer,
            scratch,
            config.encoding.bitrate_kbps,
        );

        let state = Arc::new(AppState::new(config, pipeline));
        let router = create_router(state);

        Self {
            router,
            fetcher,
            converter,
            tagger,
            temp_dir,
            scratch_dir,
        }
    }

    /// The mock tag writer. Panics when the fixture uses the real writer.
    pub fn mock_tagger(&self) -> &Arc<MockTagWriter> {
        self.tagger.as_ref().expect("fixture uses the real tag writer")
    }

    /// Number of entries left under the scratch root.
    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(&self.scratch_dir)
            .expect("Failed to read scratch dir")
            .count()
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send an OPTIONS request without CORS preflight headers.
    pub async fn options(&self, path: &str) -> TestResponse {
        self.request("OPTIONS", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send an arbitrary request.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(path);

        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }
}
