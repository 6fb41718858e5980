//! Opacity animation scheduling.
//!
//! Turns segment timing into opacity animations on text layers:
//!
//! - **One after another**: each word fades in over its spoken duration and
//!   stays visible.
//! - **One word only**: each word pops in when spoken and pops out when the
//!   word ends, so only one word is visible at a time.
//!
//! Preview animations are anchored to the preview clock at scheduling time,
//! since the live canvas is already running. Export animations are anchored
//! to the composition's zero so the whole timeline is declared up front.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::clock::MediaClock;
use super::overlay::TextLayer;
use crate::config::{ComposerConfig, RenderEnvironment};
use crate::error::{SubtitleError, SubtitleResult};
use crate::subtitles::context::AnimationDestination;
use crate::subtitles::speech::SpeechSegment;
use crate::subtitles::style::Effect;

/// Timing curve applied to animation progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Eased progress for linear progress `t` in 0.0-1.0.
    pub fn apply(&self, t: f64) -> f64 {
        let (x1, y1, x2, y2) = match self {
            Easing::Linear => return t,
            Easing::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Easing::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Easing::EaseInOut => (0.42, 0.0, 0.58, 1.0),
        };
        match bezier_easing::bezier_easing(x1, y1, x2, y2) {
            Ok(curve) => curve(t as f32) as f64,
            Err(_) => t,
        }
    }
}

/// Slot an animation occupies on its layer. Adding an animation replaces
/// the one already in its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum AnimationKey {
    Reveal,
    FadeOut,
}

/// Timeline an animation's begin time is expressed on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", tag = "kind")]
#[ts(export)]
pub enum TimeBasis {
    /// Preview clock; `origin` is the clock reading at scheduling time.
    Clock { origin: f64 },
    /// Start of the video composition.
    CompositionZero,
}

impl TimeBasis {
    pub fn for_destination(destination: AnimationDestination, clock: &dyn MediaClock) -> Self {
        match destination {
            AnimationDestination::Preview => TimeBasis::Clock {
                origin: clock.now(),
            },
            AnimationDestination::Movie => TimeBasis::CompositionZero,
        }
    }

    /// Absolute time of local zero on this basis' timeline.
    pub fn zero(&self) -> f64 {
        match self {
            TimeBasis::Clock { origin } => *origin,
            TimeBasis::CompositionZero => 0.0,
        }
    }
}

/// One opacity animation attached to a text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AnimationDescriptor {
    pub key: AnimationKey,
    /// `None` animates from the currently presented value.
    pub from_opacity: Option<f32>,
    pub to_opacity: f32,
    /// Absolute begin time on the basis' timeline.
    pub begin_time: f64,
    pub basis: TimeBasis,
    pub duration: f64,
    pub speed: f64,
    /// Keep the final value once finished.
    pub fill_forwards: bool,
    pub removed_on_completion: bool,
    pub autoreverses: bool,
    pub easing: Easing,
}

impl AnimationDescriptor {
    fn opacity(
        key: AnimationKey,
        to_opacity: f32,
        begin_time: f64,
        basis: TimeBasis,
        duration: f64,
        speed: f64,
        easing: Easing,
    ) -> Self {
        Self {
            key,
            from_opacity: None,
            to_opacity,
            begin_time,
            basis,
            duration,
            speed,
            fill_forwards: true,
            removed_on_completion: false,
            autoreverses: false,
            easing,
        }
    }

    /// Fade in to fully opaque and hold.
    pub fn reveal(begin_time: f64, basis: TimeBasis, duration: f64, speed: f64, easing: Easing) -> Self {
        Self::opacity(AnimationKey::Reveal, 1.0, begin_time, basis, duration, speed, easing)
    }

    /// Fade out to transparent and hold.
    pub fn fade_out(
        begin_time: f64,
        basis: TimeBasis,
        duration: f64,
        speed: f64,
        easing: Easing,
    ) -> Self {
        Self::opacity(AnimationKey::FadeOut, 0.0, begin_time, basis, duration, speed, easing)
    }

    /// Begin time relative to the basis zero.
    pub fn local_begin_time(&self) -> f64 {
        self.begin_time - self.basis.zero()
    }

    /// Linear progress at `time`, or `None` when the animation does not
    /// contribute (not started yet, or finished and removed).
    pub fn progress_at(&self, time: f64) -> Option<f64> {
        if time < self.begin_time {
            return None;
        }
        // Zero-length animations jump to their end value at begin time.
        if self.duration <= 0.0 {
            return Some(1.0);
        }
        let progress = (time - self.begin_time) * self.speed.max(0.0) / self.duration;
        if progress >= 1.0 {
            if self.fill_forwards {
                Some(if self.autoreverses { 0.0 } else { 1.0 })
            } else {
                None
            }
        } else if self.autoreverses && progress > 0.5 {
            Some((1.0 - progress) * 2.0)
        } else if self.autoreverses {
            Some(progress * 2.0)
        } else {
            Some(progress)
        }
    }

    /// Presented value at `time`, starting from `current` when no explicit
    /// from-value is set.
    pub fn value_at(&self, time: f64, current: f32) -> Option<f32> {
        let progress = self.progress_at(time)?;
        let from = self.from_opacity.unwrap_or(current);
        let eased = self.easing.apply(progress.clamp(0.0, 1.0)) as f32;
        Some(from + (self.to_opacity - from) * eased)
    }
}

/// Begin time and duration of one segment relative to the schedule start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentTiming {
    pub begin_time: f64,
    pub duration: f64,
}

impl SegmentTiming {
    pub fn new(segment: &SpeechSegment, start_time: f64) -> Self {
        Self {
            begin_time: segment.timestamp - start_time,
            duration: segment.duration,
        }
    }

    pub fn finish_time(&self) -> f64 {
        self.begin_time + self.duration
    }
}

/// What one scheduling pass did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleReport {
    pub basis: TimeBasis,
    /// Layers with at least one animation attached.
    pub animated: usize,
    /// Layers shown without a reveal because their word already started.
    pub revealed_immediately: usize,
    /// Layers hidden because their word already ended.
    pub hidden_immediately: usize,
}

/// Attaches opacity animations to text layers.
#[derive(Debug, Clone)]
pub struct AnimationScheduler {
    flash_speed: f64,
    easing: Easing,
}

impl AnimationScheduler {
    pub fn new(config: &ComposerConfig) -> Self {
        Self {
            flash_speed: config.flash_speed,
            easing: config.easing,
        }
    }

    /// Schedule animations for `effect` on `layers`, one layer per segment.
    ///
    /// Every layer loses its previous animations and has its opacity reset
    /// first, so scheduling again (a preview loop restart) never stacks
    /// animations. With `start_time > 0` the schedule resumes mid-clip:
    /// words already started are shown at once and only later words animate.
    #[allow(clippy::too_many_arguments)]
    pub fn schedule(
        &self,
        layers: &mut [TextLayer],
        segments: &[SpeechSegment],
        effect: Effect,
        destination: AnimationDestination,
        start_time: f64,
        env: &RenderEnvironment,
        clock: &dyn MediaClock,
    ) -> SubtitleResult<ScheduleReport> {
        if layers.len() != segments.len() {
            log::warn!(
                "[ANIMATION] Segments and text layers count don't match ({} vs {})",
                segments.len(),
                layers.len()
            );
            return Err(SubtitleError::CountMismatch {
                segments: segments.len(),
                layers: layers.len(),
            });
        }

        let basis = TimeBasis::for_destination(destination, clock);
        let zero = basis.zero();
        let resuming = start_time > 0.0;
        let mut report = ScheduleReport {
            basis,
            animated: 0,
            revealed_immediately: 0,
            hidden_immediately: 0,
        };

        for (layer, segment) in layers.iter_mut().zip(segments) {
            layer.remove_all_animations();
            layer.opacity = env.initial_opacity();

            let timing = SegmentTiming::new(segment, start_time);
            let already_started = resuming && segment.timestamp <= start_time;

            match effect {
                Effect::OneAfterAnother => {
                    if already_started {
                        layer.opacity = 1.0;
                        report.revealed_immediately += 1;
                        continue;
                    }
                    layer.add_animation(AnimationDescriptor::reveal(
                        zero + timing.begin_time,
                        basis,
                        timing.duration,
                        1.0,
                        self.easing,
                    ));
                }
                Effect::OneWordOnly => {
                    if already_started {
                        if timing.finish_time() <= 0.0 {
                            layer.opacity = 0.0;
                            report.hidden_immediately += 1;
                            continue;
                        }
                        layer.opacity = 1.0;
                        report.revealed_immediately += 1;
                    } else {
                        layer.add_animation(AnimationDescriptor::reveal(
                            zero + timing.begin_time,
                            basis,
                            0.0,
                            self.flash_speed,
                            self.easing,
                        ));
                    }
                    layer.add_animation(AnimationDescriptor::fade_out(
                        zero + timing.finish_time(),
                        basis,
                        0.0,
                        self.flash_speed,
                        self.easing,
                    ));
                }
            }
            report.animated += 1;
        }

        log::debug!(
            "[ANIMATION] Scheduled {:?} for {} layers ({:?}, start {:.2}s): {} animated, {} shown, {} hidden",
            effect,
            layers.len(),
            destination,
            start_time,
            report.animated,
            report.revealed_immediately,
            report.hidden_immediately
        );

        Ok(report)
    }
}
