//! Conversion endpoint: runs the pipeline and streams the resulting MP3.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::BufReader;
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};
use tubetape_core::{
    ConversionOutcome, ConversionRequest, ConversionRequestBody, ConversionResult, PipelineError,
    PipelineStage, PipelineWarning,
};

use crate::state::AppState;

/// Source title as reported by the extractor.
pub static X_VIDEO_TITLE: HeaderName = HeaderName::from_static("x-video-title");
/// Present when the file was delivered despite a non-fatal problem.
pub static X_CONVERSION_WARNINGS: HeaderName = HeaderName::from_static("x-conversion-warnings");

const STREAM_BUFFER_SIZE: usize = 4096 * 16;

/// Full path of the conversion endpoint.
pub const CONVERT_PATH: &str = "/api/convert";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Maps pipeline errors to `400`/`500` JSON bodies.
pub struct PipelineErrorResponse(pub PipelineError);

impl IntoResponse for PipelineErrorResponse {
    fn into_response(self) -> Response {
        let status = if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        error_response(status, self.0.to_string())
    }
}

/// `OPTIONS /api/convert`
pub async fn convert_options() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

/// Gives every successful `OPTIONS /api/convert` response the status body.
///
/// The CORS layer answers OPTIONS requests itself with an empty body, so this
/// sits outside it and swaps in the body while keeping the CORS headers.
pub async fn options_status_body(request: Request<Body>, next: Next) -> Response {
    let wants_body =
        request.method() == Method::OPTIONS && request.uri().path() == CONVERT_PATH;
    let response = next.run(request).await;
    if !wants_body || !response.status().is_success() {
        return response;
    }

    let (parts, _) = response.into_parts();
    let mut with_body = convert_options().await.into_response();
    for (name, value) in parts.headers.iter() {
        if *name == header::CONTENT_LENGTH || *name == header::CONTENT_TYPE {
            continue;
        }
        with_body.headers_mut().append(name.clone(), value.clone());
    }
    with_body
}

/// `POST /api/convert`
pub async fn convert(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConversionRequestBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected conversion request body");
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON body: {}", rejection.body_text()),
            );
        }
    };

    let request = match ConversionRequest::from_body(body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejected conversion request");
            return PipelineErrorResponse(e).into_response();
        }
    };

    match state.pipeline().run(request).await {
        Ok(outcome) => deliver(outcome).await,
        Err(e) => PipelineErrorResponse(e).into_response(),
    }
}

/// Opens the final file, releases the scratch directory and streams the
/// open handle back to the client.
async fn deliver(outcome: ConversionOutcome) -> Response {
    let ConversionOutcome { result, warnings } = outcome;
    let download_filename = result.download_filename();
    let ConversionResult {
        file_path,
        source_title,
        scratch,
        ..
    } = result;

    let opened = match File::open(&file_path).await {
        Ok(file) => file.metadata().await.map(|m| (file, m.len())),
        Err(e) => Err(e),
    };

    // The open handle keeps the data readable after the directory is unlinked
    if let Err(e) = scratch.remove().await {
        warn!(error = %e, "Failed to remove scratch directory after conversion");
    }

    let (file, len) = match opened {
        Ok(opened) => opened,
        Err(e) => {
            error!(stage = %PipelineStage::Failed, error = %e, "Failed to open converted file");
            return PipelineErrorResponse(PipelineError::conversion_failed(
                PipelineStage::Delivering,
                e.to_string(),
            ))
            .into_response();
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    if let Ok(value) = HeaderValue::from_str(&content_disposition(&download_filename)) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Some(value) = header_text(&source_title) {
        headers.insert(X_VIDEO_TITLE.clone(), value);
    }
    if let Some(value) = warnings_header(&warnings) {
        headers.insert(X_CONVERSION_WARNINGS.clone(), value);
    }

    info!(
        stage = %PipelineStage::Completed,
        filename = %download_filename,
        size_bytes = len,
        "Streaming converted audio"
    );

    let stream = ReaderStream::with_capacity(
        BufReader::with_capacity(STREAM_BUFFER_SIZE, file),
        STREAM_BUFFER_SIZE,
    );

    (StatusCode::OK, headers, Body::from_stream(stream)).into_response()
}

/// Builds an attachment disposition with an ASCII fallback name and the
/// exact UTF-8 name in `filename*`.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

/// Header value carrying arbitrary text, with control characters dropped.
fn header_text(text: &str) -> Option<HeaderValue> {
    let cleaned: String = text.chars().filter(|c| !c.is_control()).collect();
    HeaderValue::from_bytes(cleaned.trim().as_bytes()).ok()
}

fn warnings_header(warnings: &[PipelineWarning]) -> Option<HeaderValue> {
    if warnings.is_empty() {
        return None;
    }
    let joined = warnings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    header_text(&joined)
}
