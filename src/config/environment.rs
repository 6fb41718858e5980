//! Per-pass render environment.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::subtitles::context::AnimationDestination;

/// Mode-dependent parameters read by layout and animation.
///
/// Callers build one of these per pass. The preview session keeps its own
/// copy behind a lock and hands snapshots to export, so a preview and an
/// export never observe each other's state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct RenderEnvironment {
    /// True while laying out for the exported video.
    pub is_rendering_video: bool,
    /// Video pixels per preview point.
    pub video_scale: f64,
    /// Horizontal pan offset in export pixels.
    pub offset_x: f64,
    /// Vertical pan offset in export pixels (y-up basis).
    pub offset_y: f64,
    /// Start text layers fully visible instead of transparent.
    pub always_show_subtitles: bool,
}

impl Default for RenderEnvironment {
    fn default() -> Self {
        Self {
            is_rendering_video: false,
            video_scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            always_show_subtitles: false,
        }
    }
}

impl RenderEnvironment {
    /// Copy of this environment with the render flag matching `destination`.
    pub fn for_destination(&self, destination: AnimationDestination) -> Self {
        Self {
            is_rendering_video: destination == AnimationDestination::Movie,
            ..*self
        }
    }

    /// Pan offsets that apply to a layout for `destination`.
    ///
    /// The live overlay is moved by the gesture itself, so preview layouts
    /// always start unshifted.
    pub fn offsets_for(&self, destination: AnimationDestination) -> (f64, f64) {
        match destination {
            AnimationDestination::Preview => (0.0, 0.0),
            AnimationDestination::Movie => (self.offset_x, self.offset_y),
        }
    }

    /// Video scale usable as a divisor.
    pub fn effective_video_scale(&self) -> f64 {
        if self.video_scale.is_finite() && self.video_scale > 0.0 {
            self.video_scale
        } else {
            log::warn!(
                "[ENV] Ignoring invalid video scale {}, using 1.0",
                self.video_scale
            );
            1.0
        }
    }

    /// Opacity text layers start with before any animation runs.
    pub fn initial_opacity(&self) -> f32 {
        if self.always_show_subtitles {
            1.0
        } else {
            0.0
        }
    }

    /// Accumulate a pan gesture translation given in preview points
    /// (top-left origin) into the export pixel offsets.
    pub fn with_pan_translation(&self, dx: f64, dy: f64) -> Self {
        let scale = self.effective_video_scale();
        Self {
            offset_x: self.offset_x - dx * scale,
            offset_y: self.offset_y - dy * scale,
            ..*self
        }
    }
}
