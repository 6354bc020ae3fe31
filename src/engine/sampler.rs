//! Sequential frame sampling at a fixed wall-clock cadence

use tracing::{debug, warn};

use crate::domain::errors::PipelineError;
use crate::domain::model::{ExtractionJob, FrameBatch, MediaSource};
use crate::domain::rules::{frame_step, FrameStep};
use crate::ports::{MediaOpener, SamplingObserver};

/// Frames selected from one pass over a video
#[derive(Debug)]
pub struct SampledFrames {
    pub source: MediaSource,
    pub step: FrameStep,
    pub frames: FrameBatch,
    /// Frames decoded in total, selected or not
    pub decoded: u64,
}

/// Decodes a video front to back and keeps every `step`-th frame
pub struct FrameSampler<'a> {
    opener: &'a dyn MediaOpener,
}

impl<'a> FrameSampler<'a> {
    pub fn new(opener: &'a dyn MediaOpener) -> Self {
        Self { opener }
    }

    /// Sample `job.media_path` every `job.sampling` seconds.
    ///
    /// The frame source lives only for the duration of this call, so the
    /// decoder is released on every return path, including errors.
    pub fn sample(
        &self,
        job: &ExtractionJob,
        observer: &dyn SamplingObserver,
    ) -> Result<SampledFrames, PipelineError> {
        let interval_seconds = job.sampling.interval_seconds();
        let mut source = self.opener.open(&job.media_path)?;

        let media = MediaSource::new(
            &job.media_path,
            &job.title,
            source.frame_rate(),
            source.total_frames(),
        );
        let step = frame_step(media.frame_rate, interval_seconds);
        if step.degenerate {
            warn!(
                fps = media.frame_rate,
                interval_seconds, "Frame step below one frame, sampling every frame"
            );
        }
        observer.on_source_opened(&media, step.step);

        let mut frames = FrameBatch::new();
        let mut index: u64 = 0;
        while source.grab()? {
            if step.selects(index) {
                frames.push(source.retrieve_rgb()?);
                let timestamp = if media.frame_rate > 0.0 {
                    index as f64 / media.frame_rate
                } else {
                    0.0
                };
                observer.on_frame_captured(frames.len(), timestamp);
            }
            index += 1;
        }

        debug!(decoded = index, captured = frames.len(), "End of stream");
        observer.on_sampling_finished(frames.len());

        Ok(SampledFrames {
            source: media,
            step,
            frames,
            decoded: index,
        })
    }
}
