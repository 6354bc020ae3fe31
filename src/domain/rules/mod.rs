// Domain rules - Sampling arithmetic and naming policies

use crate::domain::model::RequestContext;

#[cfg(test)]
mod tests;

/// Title used when sanitization leaves nothing behind
pub const FALLBACK_TITLE: &str = "video";

/// Suffix and extension of every produced document
pub const DOCUMENT_SUFFIX: &str = "_frames.pdf";

/// Number of decoded frames between two samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStep {
    pub step: u64,
    /// True when `floor(frame_rate * interval)` fell below 1 and was clamped
    pub degenerate: bool,
}

impl FrameStep {
    /// Whether the frame at `index` is selected
    pub fn selects(&self, index: u64) -> bool {
        index % self.step == 0
    }
}

/// `floor(frame_rate * interval)`, clamped to 1 when the product is below 1
/// or not a finite number. A clamped step samples every decoded frame.
pub fn frame_step(frame_rate: f64, interval_seconds: u32) -> FrameStep {
    let raw = (frame_rate * interval_seconds as f64).floor();
    if !raw.is_finite() || raw < 1.0 {
        return FrameStep {
            step: 1,
            degenerate: true,
        };
    }
    FrameStep {
        step: raw as u64,
        degenerate: false,
    }
}

/// How many frames a stream of `total_frames` yields at `step`
pub fn expected_capture_count(total_frames: u64, step: u64) -> u64 {
    let step = step.max(1);
    total_frames.div_ceil(step)
}

/// Replace every character that is not alphanumeric, a space, a hyphen or an
/// underscore with an underscore.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Name of the document produced for `title` under `context`
pub fn output_filename(context: &RequestContext, title: &str) -> String {
    let mut safe = sanitize_title(title);
    if safe.trim().is_empty() {
        safe = FALLBACK_TITLE.to_string();
    }
    context.namespaced(&format!("{}{}", safe, DOCUMENT_SUFFIX))
}

/// Seconds with one decimal place
pub fn format_duration(seconds: f64) -> String {
    format!("{:.1}", seconds)
}

/// Whether `name` may be looked up in the flat output directory
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0'])
}
