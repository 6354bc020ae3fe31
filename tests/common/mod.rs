//! Shared fixtures: synthetic frame sources, a scripted downloader and a
//! PDF reader for checking produced documents.

#![allow(dead_code)]

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use flate2::read::ZlibDecoder;
use image::{Rgb, RgbImage};
use lopdf::{Document, Object};

use framedoc::domain::errors::{AcquisitionError, AcquisitionFailure, PipelineError};
use framedoc::domain::model::{AcquiredMedia, MediaSource};
use framedoc::ports::{
    AcquisitionPort, AcquisitionRequest, AcquisitionStrategy, FrameSource, MediaOpener,
    SamplingObserver,
};

pub const FRAME_WIDTH: u32 = 8;
pub const FRAME_HEIGHT: u32 = 6;

/// Colour of synthetic frame `index`
pub fn frame_color(index: u64) -> Rgb<u8> {
    let i = (index % 256) as u8;
    Rgb([i, 255 - i, 42])
}

/// In-memory video with a known frame rate and length
pub struct SyntheticSource {
    frame_rate: f64,
    total_frames: u64,
    next: u64,
    fail_at: Option<u64>,
    released: Arc<AtomicBool>,
}

impl FrameSource for SyntheticSource {
    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn total_frames(&self) -> u64 {
        self.total_frames
    }

    fn grab(&mut self) -> Result<bool, PipelineError> {
        if self.fail_at == Some(self.next) {
            return Err(PipelineError::decode("corrupt packet"));
        }
        if self.next >= self.total_frames {
            return Ok(false);
        }
        self.next += 1;
        Ok(true)
    }

    fn retrieve_rgb(&mut self) -> Result<RgbImage, PipelineError> {
        let index = self.next - 1;
        Ok(RgbImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, frame_color(index)))
    }
}

impl Drop for SyntheticSource {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Opens `SyntheticSource`s regardless of the path
pub struct SyntheticOpener {
    pub frame_rate: f64,
    pub total_frames: u64,
    pub fail_open: bool,
    pub fail_at: Option<u64>,
    pub released: Arc<AtomicBool>,
}

impl SyntheticOpener {
    pub fn new(frame_rate: f64, total_frames: u64) -> Self {
        Self {
            frame_rate,
            total_frames,
            fail_open: false,
            fail_at: None,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::new(25.0, 100)
        }
    }

    pub fn failing_at(frame_rate: f64, total_frames: u64, index: u64) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new(frame_rate, total_frames)
        }
    }

    pub fn was_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl MediaOpener for SyntheticOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, PipelineError> {
        if self.fail_open {
            return Err(PipelineError::open(path.display().to_string(), "unsupported container"));
        }
        Ok(Box::new(SyntheticSource {
            frame_rate: self.frame_rate,
            total_frames: self.total_frames,
            next: 0,
            fail_at: self.fail_at,
            released: Arc::clone(&self.released),
        }))
    }
}

/// What the scripted downloader does when asked for a video
pub enum Script {
    /// Write a placeholder media file and report `title`
    Download { title: String },
    /// Fail with the given error
    Fail(AcquisitionError),
    /// Report success but never write the file
    Vanish,
    /// Leave a partial download behind and never finish
    Hang,
}

/// Acquisition port that follows a `Script`
pub struct ScriptedAcquisition {
    script: Script,
    calls: AtomicUsize,
    /// Cookie path handed over on the last call and whether it existed then
    pub seen_cookies: Mutex<Option<(PathBuf, bool)>>,
}

impl ScriptedAcquisition {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            seen_cookies: Mutex::new(None),
        }
    }

    pub fn downloading(title: &str) -> Self {
        Self::new(Script::Download {
            title: title.to_string(),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AcquisitionPort for ScriptedAcquisition {
    async fn acquire(&self, request: &AcquisitionRequest) -> Result<AcquiredMedia, AcquisitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(cookies) = &request.cookies {
            *self.seen_cookies.lock().unwrap() = Some((cookies.clone(), cookies.exists()));
        }

        let path = request
            .output_dir
            .join(request.context.namespaced("video.mp4"));
        match &self.script {
            Script::Download { title } => {
                tokio::fs::write(&path, b"synthetic media").await.unwrap();
                Ok(AcquiredMedia::new(path, title.clone()))
            }
            Script::Fail(err) => Err(err.clone()),
            Script::Vanish => Ok(AcquiredMedia::new(path, "gone")),
            Script::Hang => {
                let partial = request
                    .output_dir
                    .join(request.context.namespaced("clip.mp4.part"));
                tokio::fs::write(&partial, b"half a video").await.unwrap();
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                Err(AcquisitionError::new(AcquisitionFailure::Transient, "timed out"))
            }
        }
    }

    fn strategy(&self) -> AcquisitionStrategy {
        AcquisitionStrategy::Standard
    }
}

/// Observer that keeps a log of the events it saw
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl SamplingObserver for RecordingObserver {
    fn on_media_acquired(&self, media: &AcquiredMedia) {
        self.record(format!("acquired {}", media.title));
    }

    fn on_source_opened(&self, source: &MediaSource, step: u64) {
        self.record(format!("opened {} step {}", source.title, step));
    }

    fn on_sampling_finished(&self, captured: usize) {
        self.record(format!("finished {}", captured));
    }
}

/// Names of every entry in `dir`, sorted
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// One embedded page image
#[derive(Debug)]
pub struct PageImage {
    pub width: i64,
    pub height: i64,
    pub rgb: Vec<u8>,
}

/// Read every page image of the PDF at `path`, in page order
pub fn read_pages(path: &Path) -> Vec<PageImage> {
    let doc = Document::load(path).expect("document loads");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let resources = page.get(b"Resources").and_then(Object::as_dict).unwrap();
            let xobjects = resources.get(b"XObject").and_then(Object::as_dict).unwrap();
            let image_id = xobjects.get(b"Im0").and_then(Object::as_reference).unwrap();
            let stream = doc.get_object(image_id).and_then(Object::as_stream).unwrap();

            let filter = stream.dict.get(b"Filter").and_then(Object::as_name).unwrap();
            assert_eq!(filter, b"FlateDecode", "page images are Flate encoded");
            let mut rgb = Vec::new();
            ZlibDecoder::new(stream.content.as_slice())
                .read_to_end(&mut rgb)
                .expect("image stream inflates");

            PageImage {
                width: stream.dict.get(b"Width").and_then(Object::as_i64).unwrap(),
                height: stream.dict.get(b"Height").and_then(Object::as_i64).unwrap(),
                rgb,
            }
        })
        .collect()
}

/// Raw RGB bytes of synthetic frame `index`
pub fn expected_rgb(index: u64) -> Vec<u8> {
    RgbImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, frame_color(index)).into_raw()
}
