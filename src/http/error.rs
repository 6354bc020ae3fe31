//! Structured error responses for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::errors::{AcquisitionFailure, ProcessError};

/// JSON body of every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error_kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solutions: Option<Vec<String>>,
}

/// Application-level error that converts into an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error_kind: String,
    pub message: String,
    pub solutions: Option<Vec<String>>,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error_kind: "invalid_request".into(),
            message: msg.into(),
            solutions: None,
        }
    }

    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            error_kind: "payload_too_large".into(),
            message: msg.into(),
            solutions: None,
        }
    }
}

fn blocked_solutions() -> Vec<String> {
    vec![
        "Try videos from other platforms: Vimeo, Dailymotion, Facebook, Twitter, Instagram".into(),
        "Upload a cookies.txt file exported from a signed-in browser session".into(),
        "Run the command-line version from your own machine instead".into(),
        "Some videos from this site may still work, try a different one".into(),
    ]
}

impl From<ProcessError> for ApiError {
    fn from(err: ProcessError) -> Self {
        let status = match &err {
            ProcessError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProcessError::Acquisition(e) => match e.kind {
                AcquisitionFailure::Blocked => StatusCode::FORBIDDEN,
                AcquisitionFailure::NotFound => StatusCode::NOT_FOUND,
                AcquisitionFailure::Transient => StatusCode::SERVICE_UNAVAILABLE,
                AcquisitionFailure::Failed => StatusCode::BAD_GATEWAY,
            },
            ProcessError::Pipeline(crate::domain::errors::PipelineError::Assembly { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProcessError::Pipeline(_) | ProcessError::NoFrames { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ProcessError::NotFound(_) => StatusCode::NOT_FOUND,
            ProcessError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let (message, solutions) = match &err {
            ProcessError::Acquisition(e) if e.kind == AcquisitionFailure::Blocked => (
                format!("The video site is blocking downloads from this server: {}", e.message),
                Some(blocked_solutions()),
            ),
            ProcessError::NotFound(_) => ("File not found".to_string(), None),
            _ => (err.to_string(), None),
        };

        Self {
            status,
            error_kind: err.error_kind().to_string(),
            message,
            solutions,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = axum::Json(ErrorBody {
            success: false,
            error_kind: self.error_kind,
            message: self.message,
            solutions: self.solutions,
        });
        (self.status, body).into_response()
    }
}
