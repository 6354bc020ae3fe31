//! Sampling engine tests against synthetic sources

mod common;

use std::sync::Arc;

use tempfile::TempDir;

use common::*;
use framedoc::domain::errors::PipelineError;
use framedoc::domain::model::{ExtractionJob, Outcome, RequestContext, SamplingSpec};
use framedoc::domain::rules::{expected_capture_count, frame_step};
use framedoc::engine::{EngineConfig, FrameSampler, SamplingEngine};
use framedoc::ports::{MediaOpener, SilentObserver};

fn engine(opener: Arc<SyntheticOpener>, dir: &TempDir) -> SamplingEngine {
    SamplingEngine::new(
        opener as Arc<dyn MediaOpener>,
        EngineConfig {
            output_dir: dir.path().to_path_buf(),
            resolution_dpi: 100,
        },
    )
}

fn job(interval: u32, title: &str) -> ExtractionJob {
    ExtractionJob::new(
        "input.mp4",
        SamplingSpec::new(interval).unwrap(),
        title,
        RequestContext::from_id("abcd1234"),
    )
}

#[test]
fn test_ten_second_clip_every_two_seconds() {
    let dir = TempDir::new().unwrap();
    let opener = Arc::new(SyntheticOpener::new(10.0, 100));
    let outcome = engine(Arc::clone(&opener), &dir)
        .extract_and_assemble(&job(2, "My Talk: part 1"), &SilentObserver)
        .unwrap();

    let summary = match outcome {
        Outcome::Success(summary) => summary,
        other => panic!("expected success, got {:?}", other),
    };
    assert_eq!(summary.frame_count, 5);
    assert_eq!(summary.duration_display(), "10.0");
    assert_eq!(summary.title, "My Talk_ part 1");
    assert_eq!(summary.filename, "abcd1234_My Talk_ part 1_frames.pdf");
    assert_eq!(summary.output_path, dir.path().join(&summary.filename));
    assert_eq!(dir_entries(dir.path()), vec![summary.filename.clone()]);
    assert!(opener.was_released());

    let pages = read_pages(&summary.output_path);
    assert_eq!(pages.len(), 5);
    for (page, index) in pages.iter().zip([0u64, 20, 40, 60, 80]) {
        assert_eq!(page.width, FRAME_WIDTH as i64);
        assert_eq!(page.height, FRAME_HEIGHT as i64);
        assert_eq!(page.rgb, expected_rgb(index), "page for frame {}", index);
    }
}

#[test]
fn test_capture_count_matches_ceiling() {
    let dir = TempDir::new().unwrap();
    for (fps, total, interval) in [(25.0, 250, 3), (29.97, 1000, 1), (30.0, 31, 1), (24.0, 7, 5)] {
        let opener = Arc::new(SyntheticOpener::new(fps, total));
        let sampled = FrameSampler::new(opener.as_ref())
            .sample(&job(interval, "clip"), &SilentObserver)
            .unwrap();
        let step = frame_step(fps, interval).step;
        assert_eq!(
            sampled.frames.len() as u64,
            expected_capture_count(total, step),
            "fps={} total={} interval={}",
            fps,
            total,
            interval
        );
        assert_eq!(sampled.decoded, total);
    }
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn test_unknown_frame_rate_samples_every_frame() {
    let dir = TempDir::new().unwrap();
    let opener = Arc::new(SyntheticOpener::new(0.0, 4));
    let outcome = engine(opener, &dir)
        .extract_and_assemble(&job(20, "clip"), &SilentObserver)
        .unwrap();

    match outcome {
        Outcome::Success(summary) => {
            assert_eq!(summary.frame_count, 4);
            assert_eq!(summary.duration_display(), "0.0");
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[test]
fn test_empty_stream_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let opener = Arc::new(SyntheticOpener::new(30.0, 0));
    let outcome = engine(Arc::clone(&opener), &dir)
        .extract_and_assemble(&job(1, "empty"), &SilentObserver)
        .unwrap();

    assert_eq!(outcome, Outcome::NoFrames { duration_seconds: 0.0 });
    assert!(dir_entries(dir.path()).is_empty());
    assert!(opener.was_released());
}

#[test]
fn test_open_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let err = engine(Arc::new(SyntheticOpener::failing_open()), &dir)
        .extract_and_assemble(&job(1, "broken"), &SilentObserver)
        .unwrap_err();

    assert!(matches!(err, PipelineError::Open { .. }));
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn test_decode_failure_releases_source() {
    let dir = TempDir::new().unwrap();
    let opener = Arc::new(SyntheticOpener::failing_at(10.0, 100, 37));
    let err = engine(Arc::clone(&opener), &dir)
        .extract_and_assemble(&job(1, "broken"), &SilentObserver)
        .unwrap_err();

    assert!(matches!(err, PipelineError::Decode { .. }));
    assert!(opener.was_released());
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn test_unwritable_destination_is_assembly_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, b"file").unwrap();

    let engine = SamplingEngine::new(
        Arc::new(SyntheticOpener::new(10.0, 20)) as Arc<dyn MediaOpener>,
        EngineConfig {
            output_dir: blocker.clone(),
            resolution_dpi: 100,
        },
    );
    let err = engine
        .extract_and_assemble(&job(1, "clip"), &SilentObserver)
        .unwrap_err();

    assert!(matches!(err, PipelineError::Assembly { .. }));
    assert_eq!(dir_entries(dir.path()), vec!["not_a_dir".to_string()]);
}

#[test]
fn test_blank_title_falls_back() {
    let dir = TempDir::new().unwrap();
    let outcome = engine(Arc::new(SyntheticOpener::new(1.0, 3)), &dir)
        .extract_and_assemble(&job(1, "   "), &SilentObserver)
        .unwrap();

    match outcome {
        Outcome::Success(summary) => assert_eq!(summary.filename, "abcd1234_video_frames.pdf"),
        other => panic!("expected success, got {:?}", other),
    }
}

#[test]
fn test_opened_source_carries_job_title() {
    let opener = SyntheticOpener::new(10.0, 100);
    let observer = RecordingObserver::default();
    let sampled = FrameSampler::new(&opener)
        .sample(&job(5, "Lecture 3"), &observer)
        .unwrap();

    assert_eq!(sampled.source.title, "Lecture 3");
    assert_eq!(observer.events(), vec!["opened Lecture 3 step 50", "finished 2"]);
}
