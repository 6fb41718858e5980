//! In-memory layer tree the subtitles are attached to.
//!
//! A pass produces one `OverlayLayer` sized to the canvas, holding one
//! `TextLayer` per word. Live previews keep the overlay on their canvas;
//! exports wrap it in an `AnimationTool` next to the video layer so the
//! composition renderer can bake it into every frame.

use uuid::Uuid;

use super::animation::{AnimationDescriptor, AnimationKey};
use super::coord::{Rect, Size};
use super::layout::PositionedTextElement;
use crate::subtitles::context::AnimationDestination;
use crate::subtitles::style::TextAttributes;

/// One positioned word with its attached opacity animations.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    pub id: Uuid,
    pub text: String,
    pub frame: Rect,
    pub attributes: TextAttributes,
    pub contents_scale: f64,
    /// Model opacity, shown whenever no animation is active.
    pub opacity: f32,
    animations: Vec<AnimationDescriptor>,
}

impl TextLayer {
    pub fn new(
        element: PositionedTextElement,
        attributes: TextAttributes,
        opacity: f32,
        contents_scale: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: element.text,
            frame: element.frame,
            attributes,
            contents_scale,
            opacity,
            animations: Vec::new(),
        }
    }

    /// Attach an animation, replacing any animation with the same key.
    /// Animations added later take precedence while active.
    pub fn add_animation(&mut self, animation: AnimationDescriptor) {
        self.animations.retain(|a| a.key != animation.key);
        self.animations.push(animation);
    }

    pub fn remove_all_animations(&mut self) {
        self.animations.clear();
    }

    pub fn animation(&self, key: AnimationKey) -> Option<&AnimationDescriptor> {
        self.animations.iter().find(|a| a.key == key)
    }

    pub fn animations(&self) -> &[AnimationDescriptor] {
        &self.animations
    }

    /// Presented opacity at `time` on the animations' timeline.
    pub fn opacity_at(&self, time: f64) -> f32 {
        self.animations
            .iter()
            .fold(self.opacity, |current, animation| {
                animation.value_at(time, current).unwrap_or(current)
            })
    }
}

/// Transparent container sized to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    pub id: Uuid,
    pub frame: Rect,
    pub masks_to_bounds: bool,
    /// Which target the sublayer frames were laid out for.
    pub destination: AnimationDestination,
    sublayers: Vec<TextLayer>,
}

impl OverlayLayer {
    pub fn new(size: Size, destination: AnimationDestination) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame: Rect::new(Default::default(), size),
            masks_to_bounds: false,
            destination,
            sublayers: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.frame.size
    }

    pub fn add_sublayer(&mut self, layer: TextLayer) {
        self.sublayers.push(layer);
    }

    pub fn sublayers(&self) -> &[TextLayer] {
        &self.sublayers
    }

    pub fn sublayers_mut(&mut self) -> &mut [TextLayer] {
        &mut self.sublayers
    }
}

/// Plain layer with no content of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerLayer {
    pub id: Uuid,
    pub frame: Rect,
}

impl ContainerLayer {
    fn sized(size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame: Rect::new(Default::default(), size),
        }
    }
}

/// Bridge handed to a video composition: the decoded video frames are
/// drawn into `video_layer`, and `parent_layer` (video + overlay) is what
/// ends up in the exported pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTool {
    pub parent_layer: ContainerLayer,
    pub video_layer: ContainerLayer,
    pub overlay: OverlayLayer,
}

impl AnimationTool {
    pub fn new(overlay: OverlayLayer) -> Self {
        let size = overlay.size();
        Self {
            parent_layer: ContainerLayer::sized(size),
            video_layer: ContainerLayer::sized(size),
            overlay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::animation::{Easing, TimeBasis};
    use crate::subtitles::style::SubtitleStyle;

    fn layer() -> TextLayer {
        let attributes = SubtitleStyle::default().text_attributes(
            false,
            1.0,
            &crate::config::ComposerConfig::default(),
        );
        TextLayer::new(
            PositionedTextElement {
                text: "word".to_string(),
                frame: Rect::from_coords(0.0, 0.0, 40.0, 20.0),
            },
            attributes,
            0.0,
            2.0,
        )
    }

    fn reveal(begin: f64) -> AnimationDescriptor {
        AnimationDescriptor::reveal(begin, TimeBasis::CompositionZero, 1.0, 1.0, Easing::Linear)
    }

    #[test]
    fn test_add_animation_replaces_same_key() {
        let mut layer = layer();
        layer.add_animation(reveal(0.0));
        layer.add_animation(reveal(2.0));
        assert_eq!(layer.animations().len(), 1);
        assert_eq!(layer.animation(AnimationKey::Reveal).unwrap().begin_time, 2.0);

        layer.remove_all_animations();
        assert!(layer.animations().is_empty());
    }

    #[test]
    fn test_opacity_without_animations_is_model_value() {
        let mut layer = layer();
        assert_eq!(layer.opacity_at(5.0), 0.0);
        layer.opacity = 1.0;
        assert_eq!(layer.opacity_at(5.0), 1.0);
    }

    #[test]
    fn test_animation_tool_layers_match_overlay() {
        let overlay = OverlayLayer::new(Size::new(1920.0, 1080.0), AnimationDestination::Movie);
        let tool = AnimationTool::new(overlay);
        assert_eq!(tool.parent_layer.frame.size, Size::new(1920.0, 1080.0));
        assert_eq!(tool.video_layer.frame, tool.parent_layer.frame);
        assert!(!tool.overlay.masks_to_bounds);
        assert_ne!(tool.parent_layer.id, tool.video_layer.id);
    }
}
