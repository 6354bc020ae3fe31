// Domain models - Core types and data structures

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::domain::errors::ProcessError;
use crate::domain::rules::format_duration;


/// A decodable media file on local storage plus the metadata read from it
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSource {
    pub path: PathBuf,
    pub title: String,
    pub frame_rate: f64,
    pub total_frames: u64,
}

impl MediaSource {
    pub fn new(
        path: impl Into<PathBuf>,
        title: impl Into<String>,
        frame_rate: f64,
        total_frames: u64,
    ) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            frame_rate,
            total_frames,
        }
    }

    /// Duration in seconds, 0 when the frame rate is unknown or malformed
    pub fn duration_seconds(&self) -> f64 {
        if self.frame_rate > 0.0 && self.frame_rate.is_finite() {
            self.total_frames as f64 / self.frame_rate
        } else {
            0.0
        }
    }
}

/// Wall-clock spacing between sampled frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingSpec {
    interval_seconds: u32,
}

impl SamplingSpec {
    /// Create a sampling spec, rejecting a zero interval
    pub fn new(interval_seconds: u32) -> Result<Self, ProcessError> {
        if interval_seconds == 0 {
            return Err(ProcessError::InvalidRequest(
                "Frame interval must be a positive number".to_string(),
            ));
        }
        Ok(Self { interval_seconds })
    }

    /// Parse user input. Only plain digit strings with a value above zero are
    /// accepted; signs, decimals and whitespace are rejected.
    pub fn parse(input: &str) -> Result<Self, ProcessError> {
        if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
            return Err(ProcessError::InvalidRequest(
                "Frame interval must be a positive number".to_string(),
            ));
        }
        let value = input.parse::<u32>().map_err(|_| {
            ProcessError::InvalidRequest(format!("Frame interval is too large: {}", input))
        })?;
        Self::new(value)
    }

    pub fn interval_seconds(&self) -> u32 {
        self.interval_seconds
    }
}

/// Ordered sequence of sampled frames, in source order
#[derive(Debug, Clone, Default)]
pub struct FrameBatch {
    frames: Vec<RgbImage>,
}

impl FrameBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: RgbImage) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RgbImage> {
        self.frames.iter()
    }
}

impl From<Vec<RgbImage>> for FrameBatch {
    fn from(frames: Vec<RgbImage>) -> Self {
        Self { frames }
    }
}

/// Per-request namespace for temporary and output files
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestContext {
    id: String,
}

impl RequestContext {
    /// Generate a fresh 8-character identifier
    pub fn generate() -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
        Self { id }
    }

    /// Wrap an existing identifier (tests, replays)
    pub fn from_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Prefix a file name with this request's identifier
    pub fn namespaced(&self, name: &str) -> String {
        format!("{}_{}", self.id, name)
    }
}

/// Everything the sampling engine needs for one run
#[derive(Debug, Clone)]
pub struct ExtractionJob {
    pub media_path: PathBuf,
    pub sampling: SamplingSpec,
    pub title: String,
    pub context: RequestContext,
}

impl ExtractionJob {
    pub fn new(
        media_path: impl Into<PathBuf>,
        sampling: SamplingSpec,
        title: impl Into<String>,
        context: RequestContext,
    ) -> Self {
        Self {
            media_path: media_path.into(),
            sampling,
            title: title.into(),
            context,
        }
    }
}

/// Result of a successful extraction
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSummary {
    pub filename: String,
    pub output_path: PathBuf,
    pub title: String,
    pub frame_count: usize,
    pub duration_seconds: f64,
}

impl ExtractionSummary {
    pub fn duration_display(&self) -> String {
        format_duration(self.duration_seconds)
    }
}

/// Terminal result of the sampling engine. An empty batch is an outcome,
/// not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(ExtractionSummary),
    NoFrames { duration_seconds: f64 },
}

/// What an acquisition strategy hands back
#[derive(Debug, Clone, PartialEq)]
pub struct AcquiredMedia {
    pub path: PathBuf,
    pub title: String,
    pub duration_hint: Option<f64>,
}

impl AcquiredMedia {
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            duration_hint: None,
        }
    }

    pub fn exists(&self) -> bool {
        Path::new(&self.path).is_file()
    }
}
