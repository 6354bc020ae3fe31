// Domain errors - Failure taxonomy for acquisition, sampling and assembly

use thiserror::Error;

/// Failures raised while turning a local media file into a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The media could not be opened for decoding (missing file, corrupt
    /// container, no video stream, unsupported codec)
    #[error("Could not open video file {path}: {reason}")]
    Open { path: String, reason: String },

    /// A frame was decoded but could not be converted to RGB
    #[error("Frame decoding failed: {reason}")]
    Decode { reason: String },

    /// Writing the output document failed
    #[error("Document assembly failed: {reason}")]
    Assembly { reason: String },
}

impl PipelineError {
    pub fn open(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Open {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(reason: impl ToString) -> Self {
        Self::Decode {
            reason: reason.to_string(),
        }
    }

    pub fn assembly(reason: impl ToString) -> Self {
        Self::Assembly {
            reason: reason.to_string(),
        }
    }
}

/// Cause of an acquisition failure, as far as the fetcher can tell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionFailure {
    /// The origin refused to serve this client (bot detection, sign-in wall)
    Blocked,
    /// The resource does not exist or is unavailable
    NotFound,
    /// Network trouble that may go away on retry
    Transient,
    /// Anything the fetcher could not classify
    Failed,
}

/// Error produced by an acquisition strategy
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct AcquisitionError {
    pub kind: AcquisitionFailure,
    pub message: String,
}

impl AcquisitionError {
    pub fn new(kind: AcquisitionFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify raw fetcher diagnostics into a failure kind
    pub fn classify(diagnostics: &str) -> Self {
        let lowered = diagnostics.to_lowercase();
        let kind = if lowered.contains("sign in to confirm") || lowered.contains("bot") {
            AcquisitionFailure::Blocked
        } else if lowered.contains("http error 404")
            || lowered.contains("not found")
            || lowered.contains("unavailable")
            || lowered.contains("unsupported url")
        {
            AcquisitionFailure::NotFound
        } else if lowered.contains("timed out")
            || lowered.contains("connection reset")
            || lowered.contains("temporary failure")
            || lowered.contains("network is unreachable")
            || lowered.contains("http error 5")
        {
            AcquisitionFailure::Transient
        } else {
            AcquisitionFailure::Failed
        };

        let message = diagnostics
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("unknown retrieval failure")
            .to_string();

        Self { kind, message }
    }
}

/// Caller-facing failure of a processing request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Download error: {0}")]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("No frames were captured (video duration {duration_seconds:.1}s)")]
    NoFrames { duration_seconds: f64 },

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ProcessError {
    /// Stable machine-readable identifier for this failure
    pub fn error_kind(&self) -> &'static str {
        match self {
            ProcessError::InvalidRequest(_) => "invalid_request",
            ProcessError::Acquisition(e) => match e.kind {
                AcquisitionFailure::Blocked => "acquisition_blocked",
                AcquisitionFailure::NotFound => "acquisition_not_found",
                AcquisitionFailure::Transient => "acquisition_transient",
                AcquisitionFailure::Failed => "acquisition_failed",
            },
            ProcessError::Pipeline(PipelineError::Open { .. }) => "open_failed",
            ProcessError::Pipeline(PipelineError::Decode { .. }) => "decode_failed",
            ProcessError::Pipeline(PipelineError::Assembly { .. }) => "assembly_failed",
            ProcessError::NoFrames { .. } => "no_frames",
            ProcessError::NotFound(_) => "not_found",
            ProcessError::Storage(_) => "storage_failed",
        }
    }
}
