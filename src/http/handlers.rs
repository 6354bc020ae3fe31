//! Request handlers for the HTTP API.

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::app::{ProcessInteractor, ProcessRequest, ProcessResponse, RetrieveInteractor};
use crate::http::error::ApiError;

/// Shared handler state.
pub struct HttpState {
    pub process: Arc<ProcessInteractor>,
    pub retrieve: Arc<RetrieveInteractor>,
    pub default_interval: u32,
    pub max_upload_bytes: usize,
}

/// Body of a successful `/process` call.
#[derive(Debug, Serialize)]
pub struct ProcessSuccess {
    pub success: bool,
    pub message: String,
    pub request_id: String,
    pub filename: String,
    pub title: String,
    pub frame_count: usize,
    pub duration_seconds: String,
}

impl From<ProcessResponse> for ProcessSuccess {
    fn from(response: ProcessResponse) -> Self {
        let summary = response.summary;
        Self {
            success: true,
            message: format!("PDF created successfully with {} frames", summary.frame_count),
            request_id: response.request_id,
            duration_seconds: summary.duration_display(),
            filename: summary.filename,
            title: summary.title,
            frame_count: summary.frame_count,
        }
    }
}

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Video to PDF</title></head>
<body>
<h1>Video frames to PDF</h1>
<form action="/process" method="post" enctype="multipart/form-data">
  <p><label>Video URL <input type="url" name="video_url" required></label></p>
  <p><label>Interval (seconds) <input type="number" name="frame_interval" min="1" value="20"></label></p>
  <p><label>Cookies file (optional) <input type="file" name="cookies_file"></label></p>
  <p><button type="submit">Create PDF</button></p>
</form>
</body>
</html>
"#;

/// Body-limit failures keep their 413; anything else is a malformed form
fn multipart_error(err: MultipartError, what: &str, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large(format!(
            "Upload exceeds the {} byte limit while reading {}",
            limit, what
        ));
    }
    ApiError::bad_request(format!("Failed to read {}: {}", what, err))
}

/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `POST /process`
///
/// Accepts multipart/form-data with:
/// - `video_url`: source URL
/// - `frame_interval`: seconds between frames (defaults to the configured interval)
/// - `cookies_file`: optional cookie bundle
pub async fn process(
    State(state): State<Arc<HttpState>>,
    mut multipart: Multipart,
) -> Result<Json<ProcessSuccess>, ApiError> {
    let mut url: Option<String> = None;
    let mut interval: Option<String> = None;
    let mut cookies: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "multipart field", state.max_upload_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "video_url" => {
                url = Some(field.text().await.map_err(|e| {
                    multipart_error(e, "video_url", state.max_upload_bytes)
                })?);
            }
            "frame_interval" => {
                interval = Some(field.text().await.map_err(|e| {
                    multipart_error(e, "frame_interval", state.max_upload_bytes)
                })?);
            }
            "cookies_file" => {
                let named = field.file_name().is_some_and(|n| !n.is_empty());
                let bytes = field.bytes().await.map_err(|e| {
                    multipart_error(e, "cookies_file", state.max_upload_bytes)
                })?;
                if named && !bytes.is_empty() {
                    cookies = Some(bytes.to_vec());
                }
            }
            _ => {}
        }
    }

    let request = ProcessRequest {
        url: url.unwrap_or_default(),
        interval: interval.unwrap_or_else(|| state.default_interval.to_string()),
        cookies,
    };

    let response = state.process.process(request).await?;
    Ok(Json(ProcessSuccess::from(response)))
}

/// `GET /download/:filename`
pub async fn download(
    State(state): State<Arc<HttpState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let file = state.retrieve.retrieve(&filename).await?;

    let content_type = if file.name.to_ascii_lowercase().ends_with(".pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    };
    let ascii_name: String = file
        .name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' || c == ' ' { c } else { '_' })
        .collect();
    let disposition = format!("attachment; filename=\"{}\"", ascii_name);

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}
