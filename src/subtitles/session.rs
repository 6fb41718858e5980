//! Live preview session.
//!
//! Holds the preview's render environment, current subtitles and the canvas
//! the overlay lives on. Gesture handlers update the environment through a
//! shared handle while passes read snapshots, so an export started from
//! another thread sees a consistent copy.

use std::sync::Arc;

use parking_lot::RwLock;

use super::composer::{CompositionReport, SubtitleComposer};
use super::context::{CompositionContext, OverlayHost};
use super::speech::SpeechSegment;
use super::style::{StyleModification, SubtitleStyle};
use crate::config::RenderEnvironment;
use crate::rendering::animation::ScheduleReport;
use crate::rendering::clock::MediaClock;
use crate::rendering::coord::{Point, Size};
use crate::rendering::metrics::TextMetrics;
use crate::rendering::overlay::OverlayLayer;
use crate::rendering::text::{prepare_subtitles, PreparedText};

pub struct PreviewSession<M, C> {
    composer: SubtitleComposer<M, C>,
    host: OverlayHost,
    environment: Arc<RwLock<RenderEnvironment>>,
    segments: Vec<SpeechSegment>,
    canvas: Size,
    /// Accumulated drag in preview points, reapplied to rebuilt overlays.
    pan_translation: Point,
}

impl<M: TextMetrics, C: MediaClock> PreviewSession<M, C> {
    pub fn new(composer: SubtitleComposer<M, C>, segments: Vec<SpeechSegment>, canvas: Size) -> Self {
        Self {
            composer,
            host: OverlayHost::new(),
            environment: Arc::new(RwLock::new(RenderEnvironment::default())),
            segments,
            canvas,
            pan_translation: Point::ZERO,
        }
    }

    pub fn with_environment(self, env: RenderEnvironment) -> Self {
        *self.environment.write() = env;
        self
    }

    /// Shared handle to the live environment, for gesture handlers running
    /// outside the session.
    pub fn environment_handle(&self) -> Arc<RwLock<RenderEnvironment>> {
        Arc::clone(&self.environment)
    }

    pub fn environment(&self) -> RenderEnvironment {
        *self.environment.read()
    }

    /// Snapshot for an export pass; the preview keeps its own copy.
    pub fn export_environment(&self) -> RenderEnvironment {
        *self.environment.read()
    }

    pub fn composer(&self) -> &SubtitleComposer<M, C> {
        &self.composer
    }

    pub fn style(&self) -> &SubtitleStyle {
        self.composer.style()
    }

    pub fn segments(&self) -> &[SpeechSegment] {
        &self.segments
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn overlay(&self) -> Option<&OverlayLayer> {
        self.host.overlay()
    }

    pub fn host(&self) -> &OverlayHost {
        &self.host
    }

    /// Drag the subtitles by `(dx, dy)` preview points.
    ///
    /// The attached overlay moves with the gesture; the accumulated offset
    /// is kept in export pixels for the next export.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let env = {
            let mut env = self.environment.write();
            *env = env.with_pan_translation(dx, dy);
            *env
        };
        self.pan_translation = self.pan_translation + Point::new(dx, dy);
        if let Some(overlay) = self.host.overlay_mut() {
            overlay.frame = overlay.frame.offset_by(dx, dy);
        }
        log::debug!(
            "[SESSION] Pan by ({:.1}, {:.1}), export offset now ({:.1}, {:.1})",
            dx,
            dy,
            env.offset_x,
            env.offset_y
        );
    }

    pub fn set_video_scale(&mut self, scale: f64) {
        self.environment.write().video_scale = scale;
    }

    pub fn set_always_show_subtitles(&mut self, always_show: bool) {
        self.environment.write().always_show_subtitles = always_show;
    }

    pub fn set_segments(&mut self, segments: Vec<SpeechSegment>) {
        self.segments = segments;
    }

    /// Change the style and rebuild the preview overlay with it.
    pub fn modify_style(&mut self, modification: StyleModification) -> CompositionReport {
        let style = self.composer.style().modified(modification);
        self.apply_with(Some(style), 0.0)
    }

    /// Rebuild the overlay from the current segments and style.
    pub fn apply(&mut self, start_time: f64) -> CompositionReport {
        self.apply_with(None, start_time)
    }

    fn apply_with(&mut self, style: Option<SubtitleStyle>, start_time: f64) -> CompositionReport {
        let env = self.environment();
        let report = self.composer.apply(
            CompositionContext::Preview(&mut self.host),
            &self.segments,
            style,
            self.canvas,
            start_time,
            &env,
        );
        // Preview layouts are unshifted; the drag lives on the overlay.
        let pan = self.pan_translation;
        if let Some(overlay) = self.host.overlay_mut() {
            overlay.frame = overlay.frame.offset_by(pan.x, pan.y);
        }
        report
    }

    /// Re-run the animations on the attached overlay when the preview loops
    /// or seeks, keeping the laid-out layers.
    pub fn restart_loop(&mut self, start_time: f64) -> Option<ScheduleReport> {
        let env = self.environment();
        let Some(overlay) = self.host.overlay_mut() else {
            log::debug!("[SESSION] Loop restart before any overlay was attached");
            return None;
        };
        self.composer
            .reschedule(overlay, &self.segments, start_time, &env)
    }

    /// Visible words at preview clock `time`, in canvas points.
    pub fn sample(&self, time: f64) -> Vec<PreparedText> {
        self.host
            .overlay()
            .map(|overlay| prepare_subtitles(overlay, time, self.canvas))
            .unwrap_or_default()
    }
}
