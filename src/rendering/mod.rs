//! Subtitle layout and animation.
//!
//! ## Components
//! - `coord`: Point/Size/Rect geometry for both coordinate conventions
//! - `metrics`: Text measurement (glyphon-backed, fixed-advance, LRU cached)
//! - `layout`: Word placement for preview and export
//! - `overlay`: Layer tree the words are attached to
//! - `animation`: Opacity animation scheduling with bezier easing
//! - `clock`: Media time sources
//! - `text`: Sampling an overlay into drawable text

pub mod animation;
pub mod clock;
pub mod coord;
pub mod layout;
pub mod metrics;
pub mod overlay;
pub mod text;

pub use animation::{AnimationDescriptor, AnimationKey, AnimationScheduler, Easing, ScheduleReport, TimeBasis};
pub use clock::{ManualClock, MediaClock, SystemClock};
pub use coord::{Point, Rect, Size};
pub use layout::{LayoutEngine, PositionedTextElement};
pub use metrics::{CachedMetrics, FixedAdvanceMetrics, GlyphonMetrics, TextMetrics};
pub use overlay::{AnimationTool, OverlayLayer, TextLayer};
pub use text::{prepare_subtitles, PreparedText};
