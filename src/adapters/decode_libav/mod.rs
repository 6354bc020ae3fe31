//! LibAV decoding adapter
//!
//! Opens a media file with ffmpeg, decodes its best video stream frame by
//! frame and converts selected frames to packed RGB with swscale.

use std::path::Path;

use ffmpeg_next::format::{context::Input, Pixel};
use ffmpeg_next::media::Type;
use ffmpeg_next::software::scaling;
use ffmpeg_next::util::frame::video::Video;
use ffmpeg_next::{codec, decoder, Rational};
use image::RgbImage;
use tracing::{debug, warn};

use crate::domain::errors::PipelineError;
use crate::ports::{FrameSource, MediaOpener};

/// Opens media files through libavformat/libavcodec
pub struct LibavMediaOpener;

impl LibavMediaOpener {
    /// Create new LibAV opener, initializing FFmpeg
    pub fn new() -> Result<Self, PipelineError> {
        ffmpeg_next::init()
            .map_err(|e| PipelineError::open("<ffmpeg>", format!("FFmpeg initialization failed: {}", e)))?;
        Ok(Self)
    }
}

impl MediaOpener for LibavMediaOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, PipelineError> {
        let display = path.display().to_string();
        if !path.is_file() {
            return Err(PipelineError::open(display, "file does not exist"));
        }

        let input = ffmpeg_next::format::input(&path).map_err(|e| PipelineError::open(&display, e))?;
        let source = LibavFrameSource::new(input).map_err(|reason| PipelineError::open(&display, reason))?;

        debug!(
            path = %display,
            fps = source.frame_rate,
            frames = source.total_frames,
            "Opened video stream"
        );
        Ok(Box::new(source))
    }
}

/// Frames-per-second value of a rational, 0 when undefined
fn rational_to_fps(rate: Rational) -> f64 {
    if rate.numerator() <= 0 || rate.denominator() <= 0 {
        0.0
    } else {
        rate.numerator() as f64 / rate.denominator() as f64
    }
}

/// Sequential decoder over the best video stream of an input
pub struct LibavFrameSource {
    input: Input,
    stream_index: usize,
    decoder: decoder::Video,
    scaler: Option<scaling::Context>,
    current: Video,
    frame_rate: f64,
    total_frames: u64,
    eof_sent: bool,
    decoded: u64,
}

impl LibavFrameSource {
    fn new(input: Input) -> Result<Self, String> {
        let stream = input
            .streams()
            .best(Type::Video)
            .ok_or_else(|| "no video stream found".to_string())?;
        let stream_index = stream.index();

        let mut frame_rate = rational_to_fps(stream.avg_frame_rate());
        if frame_rate == 0.0 {
            frame_rate = rational_to_fps(stream.rate());
        }

        let mut total_frames = stream.frames().max(0) as u64;
        if total_frames == 0 && frame_rate > 0.0 && input.duration() > 0 {
            // Container duration is in AV_TIME_BASE units
            let seconds = input.duration() as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE);
            total_frames = (seconds * frame_rate).round() as u64;
        }

        let context = codec::context::Context::from_parameters(stream.parameters())
            .map_err(|e| format!("unsupported codec parameters: {}", e))?;
        let decoder = context
            .decoder()
            .video()
            .map_err(|e| format!("no decoder for video stream: {}", e))?;

        Ok(Self {
            input,
            stream_index,
            decoder,
            scaler: None,
            current: Video::empty(),
            frame_rate,
            total_frames,
            eof_sent: false,
            decoded: 0,
        })
    }

    /// Push the next packet of our stream into the decoder. Returns false
    /// once end of stream has already been signalled.
    fn feed(&mut self) -> Result<bool, PipelineError> {
        if self.eof_sent {
            return Ok(false);
        }
        loop {
            match self.input.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() != self.stream_index {
                        continue;
                    }
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        warn!("Skipping undecodable packet: {}", e);
                        continue;
                    }
                    return Ok(true);
                }
                None => {
                    self.decoder
                        .send_eof()
                        .map_err(|e| PipelineError::decode(format!("failed to flush decoder: {}", e)))?;
                    self.eof_sent = true;
                    return Ok(true);
                }
            }
        }
    }
}

/// Reuse `cached` when it already converts frames shaped like `frame`
fn converter_for<'a>(
    cached: &'a mut Option<scaling::Context>,
    frame: &Video,
) -> Result<&'a mut scaling::Context, PipelineError> {
    let (format, width, height) = (frame.format(), frame.width(), frame.height());
    let stale = match cached.as_ref() {
        Some(s) => s.input().format != format || s.input().width != width || s.input().height != height,
        None => true,
    };
    if stale {
        let scaler = scaling::Context::get(
            format,
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            scaling::Flags::BILINEAR,
        )
        .map_err(|e| PipelineError::decode(format!("cannot build RGB converter: {}", e)))?;
        *cached = Some(scaler);
    }
    cached
        .as_mut()
        .ok_or_else(|| PipelineError::decode("RGB converter unavailable"))
}

/// A broken tail after good frames ends the stream; a stream that never
/// produced a frame is a decode failure.
fn decoder_stopped(decoded: u64, err: ffmpeg_next::Error) -> Result<bool, PipelineError> {
    if decoded == 0 {
        return Err(PipelineError::decode(format!("no frame could be decoded: {}", err)));
    }
    warn!(frame = decoded, "Decoder stopped early at frame {}: {}", decoded, err);
    Ok(false)
}

impl FrameSource for LibavFrameSource {
    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn total_frames(&self) -> u64 {
        self.total_frames
    }

    fn grab(&mut self) -> Result<bool, PipelineError> {
        loop {
            match self.decoder.receive_frame(&mut self.current) {
                Ok(()) => {
                    self.decoded += 1;
                    return Ok(true);
                }
                Err(ffmpeg_next::Error::Eof) => return Ok(false),
                Err(ffmpeg_next::Error::Other { errno }) if errno == ffmpeg_next::util::error::EAGAIN => {
                    if !self.feed()? {
                        return Ok(false);
                    }
                }
                Err(e) => return decoder_stopped(self.decoded, e),
            }
        }
    }

    fn retrieve_rgb(&mut self) -> Result<RgbImage, PipelineError> {
        let mut rgb = Video::empty();
        converter_for(&mut self.scaler, &self.current)?
            .run(&self.current, &mut rgb)
            .map_err(|e| PipelineError::decode(format!("color conversion failed: {}", e)))?;

        let (width, height) = (rgb.width(), rgb.height());
        let stride = rgb.stride(0);
        let row_bytes = width as usize * 3;
        let data = rgb.data(0);

        let mut packed = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let start = row * stride;
            packed.extend_from_slice(&data[start..start + row_bytes]);
        }

        RgbImage::from_raw(width, height, packed)
            .ok_or_else(|| PipelineError::decode("decoded frame has inconsistent dimensions"))
    }
}
