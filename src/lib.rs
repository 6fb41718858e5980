//! Word-synchronized subtitles for short video clips.
//!
//! Recognized speech arrives as timed words. The engine lays the words out
//! over a canvas, attaches opacity animations that reveal them in sync with
//! the speech, and targets either a live preview (top-left origin, animations
//! anchored to the preview clock) or an exported movie (bottom-left origin,
//! animations anchored to the composition start).

pub mod config;
pub mod error;
pub mod logging;
pub mod rendering;
pub mod subtitles;

pub use config::{ComposerConfig, RenderEnvironment, WordSpacing};
pub use error::{SubtitleError, SubtitleResult};
pub use logging::init_logging;
pub use subtitles::{
    compose_export, AnimationDestination, CompositionContext, CompositionReport, PreviewSession,
    SpeechSegment, SubtitleComposer, SubtitleStyle,
};
