//! Central error types for the subtitles engine.
//!
//! Layout and animation passes never abort: they absorb these errors into
//! log warnings. The typed errors exist for the surrounding operations
//! (config loading, segment validation, export composition) and for the
//! fail-soft paths to report what went wrong.
//! All errors implement `Serialize` so they can cross an IPC boundary.

use serde::Serialize;
use thiserror::Error;

/// Main error type for subtitle composition.
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Number of text layers does not match the number of speech segments
    #[error("Segment count mismatch: {segments} segments, {layers} layers")]
    CountMismatch { segments: usize, layers: usize },

    /// Speech segment violates a timing invariant
    #[error("Invalid segment at index {index}: {reason}")]
    InvalidSegment { index: usize, reason: String },

    /// Color string could not be parsed
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Source video has no video track to compose onto
    #[error("Source video has no video track")]
    NoVideoTrack,

    /// Source video has no audio track
    #[error("Source video has no audio track")]
    NoAudioTrack,

    /// Font loading or shaping failed
    #[error("Font error: {0}")]
    Font(String),

    /// Reading a config or segment file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Serialize as the error message string.
impl Serialize for SubtitleError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<String> for SubtitleError {
    fn from(msg: String) -> Self {
        SubtitleError::Other(msg)
    }
}

impl From<&str> for SubtitleError {
    fn from(msg: &str) -> Self {
        SubtitleError::Other(msg.to_string())
    }
}

/// Extension trait for adding context to Results.
///
/// # Example
/// ```ignore
/// use crate::error::{ResultExt, SubtitleResult};
///
/// fn read_track(path: &Path) -> SubtitleResult<String> {
///     std::fs::read_to_string(path).context("failed to read subtitle track")
/// }
/// ```
pub trait ResultExt<T> {
    /// Add context to an error, converting it to SubtitleError::Other.
    fn context(self, msg: &str) -> SubtitleResult<T>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F: FnOnce() -> String>(self, f: F) -> SubtitleResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> SubtitleResult<T> {
        self.map_err(|e| SubtitleError::Other(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> SubtitleResult<T> {
        self.map_err(|e| SubtitleError::Other(format!("{}: {}", f(), e)))
    }
}

/// Extension trait for adding context to Option types.
pub trait OptionExt<T> {
    /// Convert None to SubtitleError::Other with the given message.
    fn context(self, msg: &str) -> SubtitleResult<T>;

    /// Convert None to SubtitleError::Other with a lazily evaluated message.
    fn with_context<F: FnOnce() -> String>(self, f: F) -> SubtitleResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context(self, msg: &str) -> SubtitleResult<T> {
        self.ok_or_else(|| SubtitleError::Other(msg.to_string()))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> SubtitleResult<T> {
        self.ok_or_else(|| SubtitleError::Other(f()))
    }
}

/// Type alias for Results using SubtitleError.
pub type SubtitleResult<T> = Result<T, SubtitleError>;
