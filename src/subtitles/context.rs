//! Targets subtitles are composed onto.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::rendering::coord::Size;
use crate::rendering::overlay::{AnimationTool, OverlayLayer};

/// Where animations will play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum AnimationDestination {
    /// Interactive canvas that is already running.
    Preview,
    /// Offline composition rendered from time zero.
    Movie,
}

/// Live surface that displays the subtitle overlay.
pub trait PreviewCanvas {
    /// Show `overlay`, replacing any overlay attached earlier.
    fn attach_overlay(&mut self, overlay: OverlayLayer);
}

/// Offline video composition the subtitles get baked into.
pub trait VideoComposition {
    fn render_size(&self) -> Size;

    /// Install the layer bridge the composition renders its frames through.
    fn set_animation_tool(&mut self, tool: AnimationTool);
}

/// Which surface a pass targets.
pub enum CompositionContext<'a> {
    Preview(&'a mut dyn PreviewCanvas),
    Export(&'a mut dyn VideoComposition),
}

impl CompositionContext<'_> {
    pub fn destination(&self) -> AnimationDestination {
        match self {
            CompositionContext::Preview(_) => AnimationDestination::Preview,
            CompositionContext::Export(_) => AnimationDestination::Movie,
        }
    }

    pub fn is_export(&self) -> bool {
        matches!(self, CompositionContext::Export(_))
    }
}

impl std::fmt::Debug for CompositionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompositionContext::Preview(_) => write!(f, "CompositionContext::Preview"),
            CompositionContext::Export(_) => write!(f, "CompositionContext::Export"),
        }
    }
}

/// Preview canvas that simply holds the most recent overlay.
#[derive(Debug, Default)]
pub struct OverlayHost {
    overlay: Option<OverlayLayer>,
    attach_count: usize,
}

impl OverlayHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay(&self) -> Option<&OverlayLayer> {
        self.overlay.as_ref()
    }

    pub fn overlay_mut(&mut self) -> Option<&mut OverlayLayer> {
        self.overlay.as_mut()
    }

    /// How many overlays have been attached over the host's lifetime.
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }
}

impl PreviewCanvas for OverlayHost {
    fn attach_overlay(&mut self, overlay: OverlayLayer) {
        self.overlay = Some(overlay);
        self.attach_count += 1;
    }
}
