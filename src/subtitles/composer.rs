//! Subtitle composition driver.
//!
//! One `apply` call is one pass: lay the words out for the target, build an
//! overlay with one text layer per word, schedule the opacity animations
//! and hand the overlay to the preview canvas or the export composition.

use crate::config::{ComposerConfig, RenderEnvironment};
use crate::rendering::animation::{AnimationScheduler, ScheduleReport};
use crate::rendering::clock::{MediaClock, SystemClock};
use crate::rendering::coord::Size;
use crate::rendering::layout::{LayoutEngine, PositionedTextElement};
use crate::rendering::metrics::TextMetrics;
use crate::rendering::overlay::{AnimationTool, OverlayLayer, TextLayer};

use super::context::{AnimationDestination, CompositionContext};
use super::speech::SpeechSegment;
use super::style::SubtitleStyle;

/// Outcome of one composition pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositionReport {
    pub destination: AnimationDestination,
    pub elements: usize,
    /// `None` when animations could not be applied.
    pub schedule: Option<ScheduleReport>,
}

impl CompositionReport {
    pub fn animations_applied(&self) -> bool {
        self.schedule.is_some()
    }
}

/// Lays out, animates and attaches dynamic subtitles.
pub struct SubtitleComposer<M, C = SystemClock> {
    metrics: M,
    clock: C,
    config: ComposerConfig,
    layout: LayoutEngine,
    scheduler: AnimationScheduler,
    style: SubtitleStyle,
}

impl<M: TextMetrics> SubtitleComposer<M, SystemClock> {
    pub fn new(metrics: M, config: ComposerConfig) -> Self {
        Self::with_clock(metrics, SystemClock::new(), config)
    }
}

impl<M: TextMetrics, C: MediaClock> SubtitleComposer<M, C> {
    pub fn with_clock(metrics: M, clock: C, config: ComposerConfig) -> Self {
        Self {
            layout: LayoutEngine::new(config.clone()),
            scheduler: AnimationScheduler::new(&config),
            metrics,
            clock,
            config,
            style: SubtitleStyle::default(),
        }
    }

    pub fn with_style(mut self, style: SubtitleStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &SubtitleStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: SubtitleStyle) {
        self.style = style;
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Word frames for `destination` with the current style.
    pub fn layout(
        &self,
        segments: &[SpeechSegment],
        canvas: Size,
        destination: AnimationDestination,
        env: &RenderEnvironment,
    ) -> Vec<PositionedTextElement> {
        self.layout
            .layout(&self.metrics, segments, canvas, destination, &self.style, env)
    }

    /// Build an animated overlay without attaching it anywhere.
    pub fn build_overlay(
        &self,
        segments: &[SpeechSegment],
        canvas: Size,
        destination: AnimationDestination,
        start_time: f64,
        env: &RenderEnvironment,
    ) -> (OverlayLayer, Option<ScheduleReport>) {
        let env = env.for_destination(destination);
        let attributes = self.layout.attributes(&self.style, destination, &env);

        let mut overlay = OverlayLayer::new(canvas, destination);
        for element in self.layout(segments, canvas, destination, &env) {
            overlay.add_sublayer(TextLayer::new(
                element,
                attributes.clone(),
                env.initial_opacity(),
                self.config.contents_scale,
            ));
        }

        let schedule = self.reschedule(&mut overlay, segments, start_time, &env);
        (overlay, schedule)
    }

    /// Replace the animations on an existing overlay, e.g. when the preview
    /// loops or playback resumes at `start_time`.
    pub fn reschedule(
        &self,
        overlay: &mut OverlayLayer,
        segments: &[SpeechSegment],
        start_time: f64,
        env: &RenderEnvironment,
    ) -> Option<ScheduleReport> {
        let destination = overlay.destination;
        match self.scheduler.schedule(
            overlay.sublayers_mut(),
            segments,
            self.style.effect,
            destination,
            start_time,
            &env.for_destination(destination),
            &self.clock,
        ) {
            Ok(report) => Some(report),
            Err(e) => {
                log::warn!("[COMPOSER] Subtitles left unanimated: {}", e);
                None
            }
        }
    }

    /// Compose subtitles onto `context`.
    ///
    /// `style` replaces the composer's current style when given.
    pub fn apply(
        &mut self,
        context: CompositionContext<'_>,
        segments: &[SpeechSegment],
        style: Option<SubtitleStyle>,
        canvas: Size,
        start_time: f64,
        env: &RenderEnvironment,
    ) -> CompositionReport {
        log::debug!(
            "[COMPOSER] Applying {} subtitles to {:?} ({}x{})",
            segments.len(),
            context,
            canvas.width,
            canvas.height
        );
        if let Some(style) = style {
            self.style = style;
        }

        let destination = context.destination();
        let (overlay, schedule) =
            self.build_overlay(segments, canvas, destination, start_time, env);
        let elements = overlay.sublayers().len();

        match context {
            CompositionContext::Preview(target) => target.attach_overlay(overlay),
            CompositionContext::Export(composition) => {
                composition.set_animation_tool(AnimationTool::new(overlay))
            }
        }

        CompositionReport {
            destination,
            elements,
            schedule,
        }
    }
}
