//! Recognized speech segments, the input of every subtitle pass.

use std::path::Path;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ResultExt, SubtitleError, SubtitleResult};

/// One recognized span of speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SpeechSegment {
    pub content: String,
    /// Seconds from the start of the clip.
    pub timestamp: f64,
    /// Seconds.
    pub duration: f64,
}

impl SpeechSegment {
    pub fn new(content: impl Into<String>, timestamp: f64, duration: f64) -> Self {
        Self {
            content: content.into(),
            timestamp,
            duration,
        }
    }

    /// Seconds at which the word stops being spoken.
    pub fn end(&self) -> f64 {
        self.timestamp + self.duration
    }

    fn validate_at(&self, index: usize) -> SubtitleResult<()> {
        let invalid = |reason: String| SubtitleError::InvalidSegment { index, reason };
        if !self.timestamp.is_finite() || self.timestamp < 0.0 {
            return Err(invalid(format!("timestamp {} is negative", self.timestamp)));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(invalid(format!("duration {} is negative", self.duration)));
        }
        Ok(())
    }
}

/// All segment contents joined by single spaces.
pub fn as_sentence(segments: &[SpeechSegment]) -> String {
    segments
        .iter()
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when timestamps never decrease.
pub fn is_ordered(segments: &[SpeechSegment]) -> bool {
    segments
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp)
}

/// Stable sort by timestamp. Recognizers occasionally emit out-of-order
/// segments; layout and timing assume ascending order.
pub fn sort_by_timestamp(segments: &mut [SpeechSegment]) {
    segments.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
}

/// Seconds from zero to the end of the last spoken word.
pub fn total_span(segments: &[SpeechSegment]) -> f64 {
    segments.iter().map(SpeechSegment::end).fold(0.0, f64::max)
}

/// Check every segment's timing invariants and the track's ordering.
pub fn validate_track(segments: &[SpeechSegment]) -> SubtitleResult<()> {
    for (index, segment) in segments.iter().enumerate() {
        segment.validate_at(index)?;
    }
    if let Some(index) = segments
        .windows(2)
        .position(|pair| pair[0].timestamp > pair[1].timestamp)
    {
        return Err(SubtitleError::InvalidSegment {
            index: index + 1,
            reason: "timestamp precedes the previous segment".to_string(),
        });
    }
    Ok(())
}

/// Parse a JSON array of segments.
pub fn segments_from_json(json: &str) -> SubtitleResult<Vec<SpeechSegment>> {
    Ok(serde_json::from_str(json)?)
}

/// Load a JSON segment track from disk.
pub fn load_segments(path: impl AsRef<Path>) -> SubtitleResult<Vec<SpeechSegment>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read speech segments {}", path.display()))?;
    let segments = segments_from_json(&json)?;
    log::debug!(
        "[SPEECH] Loaded {} segments from {}",
        segments.len(),
        path.display()
    );
    Ok(segments)
}
