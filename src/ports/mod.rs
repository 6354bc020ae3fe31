// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::RgbImage;

use crate::domain::errors::*;
use crate::domain::model::*;

/// An opened, sequentially decodable video. Dropping it releases the decoder.
pub trait FrameSource {
    /// Frames per second reported by the container, 0 when unknown
    fn frame_rate(&self) -> f64;

    /// Total frame count reported by the container, 0 when unknown
    fn total_frames(&self) -> u64;

    /// Advance to the next decoded frame. Returns false at end of stream.
    fn grab(&mut self) -> Result<bool, PipelineError>;

    /// Convert the most recently grabbed frame to packed RGB
    fn retrieve_rgb(&mut self) -> Result<RgbImage, PipelineError>;
}

/// Port for opening local media files for decoding
pub trait MediaOpener: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, PipelineError>;
}

/// Acquisition strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcquisitionStrategy {
    /// Plain download of the best progressive format
    Standard,
    /// Alternate player clients, mobile user agent and optional cookies
    Hardened,
}

impl AcquisitionStrategy {
    /// Parse strategy name from string
    pub fn parse(name: &str) -> Result<Self, ProcessError> {
        match name.to_lowercase().as_str() {
            "standard" => Ok(AcquisitionStrategy::Standard),
            "hardened" => Ok(AcquisitionStrategy::Hardened),
            _ => Err(ProcessError::InvalidRequest(format!(
                "Invalid acquisition strategy: {}. Valid strategies: standard, hardened",
                name
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionStrategy::Standard => "standard",
            AcquisitionStrategy::Hardened => "hardened",
        }
    }
}

/// Input to an acquisition strategy
#[derive(Debug, Clone)]
pub struct AcquisitionRequest {
    pub url: String,
    /// Directory the media file is written into
    pub output_dir: PathBuf,
    pub context: RequestContext,
    /// Optional cookie bundle (Netscape cookies.txt format)
    pub cookies: Option<PathBuf>,
}

/// Port for resolving a remote video reference into a local file
#[async_trait]
pub trait AcquisitionPort: Send + Sync {
    async fn acquire(&self, request: &AcquisitionRequest) -> Result<AcquiredMedia, AcquisitionError>;

    fn strategy(&self) -> AcquisitionStrategy;
}

/// A stored file ready to be served
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Port for the flat, name-addressed output directory
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Directory holding every stored file
    fn root(&self) -> &Path;

    /// Location a file called `name` would have
    fn path_for(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Store `bytes` under `name`, returning its path
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, ProcessError>;

    /// Read a stored file. `ProcessError::NotFound` when absent or unsafe.
    async fn open(&self, name: &str) -> Result<StoredFile, ProcessError>;

    /// Delete a file, logging instead of failing.
    ///
    /// Synchronous so it can run from `Drop` when a request is cancelled.
    fn discard(&self, path: &Path);

    /// Delete every file named under `context` except finished documents
    fn discard_namespace(&self, context: &RequestContext);
}

/// Progress hooks for a processing request
pub trait SamplingObserver: Send + Sync {
    fn on_media_acquired(&self, _media: &AcquiredMedia) {}

    fn on_source_opened(&self, _source: &MediaSource, _step: u64) {}

    fn on_frame_captured(&self, _captured: usize, _timestamp_seconds: f64) {}

    fn on_sampling_finished(&self, _captured: usize) {}

    fn on_assembling(&self, _pages: usize) {}
}

/// Observer that ignores every event
pub struct SilentObserver;

impl SamplingObserver for SilentObserver {}

/// Observer that reports progress through `tracing`
pub struct TracingObserver;

impl SamplingObserver for TracingObserver {
    fn on_source_opened(&self, source: &MediaSource, step: u64) {
        tracing::info!(
            path = %source.path.display(),
            title = %source.title,
            fps = source.frame_rate,
            frames = source.total_frames,
            duration = source.duration_seconds(),
            step,
            "Video opened"
        );
    }

    fn on_frame_captured(&self, captured: usize, timestamp_seconds: f64) {
        tracing::debug!(captured, timestamp_seconds, "Captured frame");
    }

    fn on_sampling_finished(&self, captured: usize) {
        tracing::info!(captured, "Sampling finished");
    }

    fn on_assembling(&self, pages: usize) {
        tracing::info!(pages, "Assembling document");
    }
}
