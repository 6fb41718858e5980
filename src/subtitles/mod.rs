//! Dynamic subtitles: speech data, styling and the composition passes that
//! put words on a preview canvas or into an exported video.

pub mod composer;
pub mod context;
pub mod export;
pub mod session;
pub mod speech;
pub mod style;


pub use composer::{CompositionReport, SubtitleComposer};
pub use context::{AnimationDestination, CompositionContext, OverlayHost, PreviewCanvas, VideoComposition};
pub use export::{compose_export, export_file_name, ExportComposition, Orientation, SourceVideo, SubtitledVideo};
pub use session::PreviewSession;
pub use speech::SpeechSegment;
pub use style::{Color, Effect, Font, StyleModification, SubtitleStyle, TextAttributes};
