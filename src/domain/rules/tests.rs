// Unit tests for sampling and naming rules

use super::*;

#[test]
fn test_frame_step_regular() {
    let step = frame_step(10.0, 2);
    assert_eq!(step, FrameStep { step: 20, degenerate: false });
}

#[test]
fn test_frame_step_floors_fractional_rates() {
    assert_eq!(frame_step(29.97, 1).step, 29);
    assert_eq!(frame_step(29.97, 20).step, 599);
}

#[test]
fn test_frame_step_low_rate_clamps_to_one() {
    // 0.04 fps * 20 s = 0.8 frames
    let step = frame_step(0.04, 20);
    assert_eq!(step, FrameStep { step: 1, degenerate: true });
}

#[test]
fn test_frame_step_zero_rate_clamps_to_one() {
    let step = frame_step(0.0, 5);
    assert!(step.degenerate);
    assert_eq!(step.step, 1);
    assert!(step.selects(0));
    assert!(step.selects(7));
}

#[test]
fn test_frame_step_non_finite_rate_clamps_to_one() {
    assert_eq!(frame_step(f64::NAN, 5).step, 1);
    assert_eq!(frame_step(f64::INFINITY, 5).step, 1);
    assert_eq!(frame_step(-25.0, 5).step, 1);
}

#[test]
fn test_selects_multiples_only() {
    let step = frame_step(10.0, 2);
    let picked: Vec<u64> = (0..100).filter(|i| step.selects(*i)).collect();
    assert_eq!(picked, vec![0, 20, 40, 60, 80]);
}

#[test]
fn test_expected_capture_count() {
    assert_eq!(expected_capture_count(100, 20), 5);
    assert_eq!(expected_capture_count(101, 20), 6);
    assert_eq!(expected_capture_count(0, 20), 0);
    assert_eq!(expected_capture_count(7, 1), 7);
    assert_eq!(expected_capture_count(7, 0), 7);
}

#[test]
fn test_expected_count_matches_selection() {
    for (rate, interval, total) in [(10.0, 2, 100u64), (29.97, 1, 301), (0.5, 1, 9), (24.0, 3, 71)] {
        let step = frame_step(rate, interval);
        let selected = (0..total).filter(|i| step.selects(*i)).count() as u64;
        assert_eq!(selected, expected_capture_count(total, step.step));
    }
}

#[test]
fn test_sanitize_title_replaces_unsafe_characters() {
    assert_eq!(sanitize_title("Hello: World/2024?"), "Hello_ World_2024_");
    assert_eq!(sanitize_title("a-b_c d"), "a-b_c d");
    assert_eq!(sanitize_title("../../etc/passwd"), "______etc_passwd");
}

#[test]
fn test_sanitize_title_keeps_unicode_letters() {
    assert_eq!(sanitize_title("Café №5"), "Café _5");
}

#[test]
fn test_sanitize_title_is_idempotent() {
    for title in ["Hello: World!", "", "ok", "東京 tour #1", "a/b\\c\"d'e"] {
        let once = sanitize_title(title);
        assert_eq!(sanitize_title(&once), once);
    }
}

#[test]
fn test_output_filename_is_namespaced() {
    let ctx = RequestContext::from_id("abcd1234");
    assert_eq!(
        output_filename(&ctx, "My Video: Part 1"),
        "abcd1234_My Video_ Part 1_frames.pdf"
    );
}

#[test]
fn test_output_filename_falls_back_for_empty_title() {
    let ctx = RequestContext::from_id("abcd1234");
    assert_eq!(output_filename(&ctx, ""), "abcd1234_video_frames.pdf");
    assert_eq!(output_filename(&ctx, "   "), "abcd1234_video_frames.pdf");
}

#[test]
fn test_format_duration_one_decimal() {
    assert_eq!(format_duration(10.0), "10.0");
    assert_eq!(format_duration(0.0), "0.0");
    assert_eq!(format_duration(3.14159), "3.1");
}

#[test]
fn test_is_safe_filename() {
    assert!(is_safe_filename("abcd1234_My Video_frames.pdf"));
    assert!(!is_safe_filename(""));
    assert!(!is_safe_filename("../secret"));
    assert!(!is_safe_filename("a/b.pdf"));
    assert!(!is_safe_filename("a\\b.pdf"));
    assert!(!is_safe_filename(".."));
}
