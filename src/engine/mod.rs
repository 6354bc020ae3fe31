//! Frame sampling and document assembly engine
//!
//! Given a local media file and a sampling interval, decodes frames in order,
//! keeps one per interval, and writes the kept frames as the pages of a single
//! document in the output directory.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::PipelineError;
use crate::domain::model::{ExtractionJob, ExtractionSummary, Outcome};
use crate::domain::rules::{output_filename, sanitize_title};
use crate::output::writer::PdfDocumentWriter;
use crate::ports::{MediaOpener, SamplingObserver};

pub mod sampler;

pub use sampler::{FrameSampler, SampledFrames};

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory the document is written into
    pub output_dir: PathBuf,
    /// Resolution recorded for every page
    pub resolution_dpi: u32,
}

/// Synchronous sampling and assembly engine
pub struct SamplingEngine {
    opener: Arc<dyn MediaOpener>,
    writer: PdfDocumentWriter,
    output_dir: PathBuf,
}

impl SamplingEngine {
    pub fn new(opener: Arc<dyn MediaOpener>, config: EngineConfig) -> Self {
        Self {
            opener,
            writer: PdfDocumentWriter::new(config.resolution_dpi),
            output_dir: config.output_dir,
        }
    }

    /// Decode `job.media_path`, sample it and assemble the document.
    ///
    /// Writes exactly one file on `Outcome::Success` and nothing otherwise.
    /// The input media file is left in place.
    pub fn extract_and_assemble(
        &self,
        job: &ExtractionJob,
        observer: &dyn SamplingObserver,
    ) -> Result<Outcome, PipelineError> {
        let sampled = FrameSampler::new(self.opener.as_ref()).sample(job, observer)?;
        let duration_seconds = sampled.source.duration_seconds();

        info!(
            fps = sampled.source.frame_rate,
            frames = sampled.source.total_frames,
            duration = duration_seconds,
            step = sampled.step.step,
            captured = sampled.frames.len(),
            "Sampling complete"
        );

        if sampled.frames.is_empty() {
            return Ok(Outcome::NoFrames { duration_seconds });
        }

        let filename = output_filename(&job.context, &job.title);
        let output_path = self.output_dir.join(&filename);

        observer.on_assembling(sampled.frames.len());
        self.writer.write(&sampled.frames, &output_path)?;

        info!(path = %output_path.display(), pages = sampled.frames.len(), "Document written");

        Ok(Outcome::Success(ExtractionSummary {
            filename,
            output_path,
            title: sanitize_title(&job.title),
            frame_count: sampled.frames.len(),
            duration_seconds,
        }))
    }
}
