//! Text preparation for rendering.
//!
//! Samples an overlay at one point on its timeline and converts each visible
//! word into a PreparedText ready for glyphon, in top-left pixel space.

use serde::Serialize;

use super::coord::Size;
use super::overlay::OverlayLayer;
use crate::subtitles::context::AnimationDestination;

/// Maximum font size in pixels to prevent performance issues.
const MAX_FONT_SIZE_PX: f32 = 256.0;

/// One visible word ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedText {
    /// Text content to render.
    pub content: String,
    /// Bounding box [left, top, right, bottom] in pixels.
    pub bounds: [f32; 4],
    /// Fill color as RGBA (0.0-1.0), alpha already multiplied by opacity.
    pub color: [f32; 4],
    /// Font family name.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Font weight (100-900).
    pub font_weight: f32,
    /// Stroke width as a percentage of the font size; negative strokes and fills.
    pub stroke_width: f32,
    pub stroke_color: [f32; 4],
    /// Opacity (0.0-1.0) at the sampled time.
    pub opacity: f32,
}

/// Sample `overlay` at `time` into drawable text for an output of
/// `output_size` pixels.
///
/// `time` is on the overlay's animation timeline: preview clock seconds for
/// preview overlays, composition seconds for export overlays. Words that are
/// fully transparent at `time` are skipped. Word frames are placed relative
/// to the overlay's own origin, so a dragged overlay moves its words.
pub fn prepare_subtitles(overlay: &OverlayLayer, time: f64, output_size: Size) -> Vec<PreparedText> {
    let canvas = overlay.size();
    if canvas.is_degenerate() {
        return Vec::new();
    }
    let scale_x = (output_size.width / canvas.width) as f32;
    let scale_y = (output_size.height / canvas.height) as f32;

    let origin = overlay.frame.origin;

    let mut prepared = Vec::new();
    for layer in overlay.sublayers() {
        let opacity = layer.opacity_at(time).clamp(0.0, 1.0);
        if opacity <= 0.0 {
            continue;
        }

        let frame = layer.frame.offset_by(origin.x, origin.y);
        let frame = match overlay.destination {
            AnimationDestination::Movie => frame.flipped_vertically(canvas.height),
            AnimationDestination::Preview => frame,
        };
        let [left, top, right, bottom] = frame.to_ltrb();

        let attributes = &layer.attributes;
        let fill = attributes.foreground_color;
        let stroke = attributes.stroke_color;

        prepared.push(PreparedText {
            content: layer.text.clone(),
            bounds: [left * scale_x, top * scale_y, right * scale_x, bottom * scale_y],
            color: fill.with_alpha(fill.a * opacity).to_array(),
            font_family: attributes.font.family.clone(),
            font_size: ((attributes.font.size as f32) * scale_y)
                .clamp(1.0, MAX_FONT_SIZE_PX),
            font_weight: attributes.font.weight as f32,
            stroke_width: attributes.stroke_width as f32,
            stroke_color: stroke.with_alpha(stroke.a * opacity).to_array(),
            opacity,
        });
    }

    prepared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComposerConfig;
    use crate::rendering::animation::{AnimationDescriptor, Easing, TimeBasis};
    use crate::rendering::coord::Rect;
    use crate::rendering::layout::PositionedTextElement;
    use crate::rendering::overlay::TextLayer;
    use crate::subtitles::style::SubtitleStyle;

    fn overlay(destination: AnimationDestination) -> OverlayLayer {
        let attributes =
            SubtitleStyle::default().text_attributes(false, 1.0, &ComposerConfig::default());
        let mut overlay = OverlayLayer::new(Size::new(200.0, 100.0), destination);
        let mut layer = TextLayer::new(
            PositionedTextElement {
                text: "Hello".to_string(),
                frame: Rect::from_coords(10.0, 10.0, 50.0, 20.0),
            },
            attributes,
            0.0,
            2.0,
        );
        layer.add_animation(AnimationDescriptor::reveal(
            1.0,
            TimeBasis::CompositionZero,
            1.0,
            1.0,
            Easing::Linear,
        ));
        overlay.add_sublayer(layer);
        overlay
    }

    #[test]
    fn test_hidden_words_are_skipped() {
        let overlay = overlay(AnimationDestination::Preview);
        assert!(prepare_subtitles(&overlay, 0.5, Size::new(200.0, 100.0)).is_empty());
    }

    #[test]
    fn test_opacity_follows_animation() {
        let overlay = overlay(AnimationDestination::Preview);
        let half = prepare_subtitles(&overlay, 1.5, Size::new(200.0, 100.0));
        assert_eq!(half.len(), 1);
        assert!((half[0].opacity - 0.5).abs() < 1e-6);
        assert!((half[0].color[3] - 0.5).abs() < 1e-6);

        let full = prepare_subtitles(&overlay, 3.0, Size::new(200.0, 100.0));
        assert_eq!(full[0].opacity, 1.0);
        assert_eq!(full[0].font_weight, 700.0);
        assert_eq!(full[0].stroke_width, -2.0);
    }

    #[test]
    fn test_preview_bounds_are_top_left() {
        let overlay = overlay(AnimationDestination::Preview);
        let text = &prepare_subtitles(&overlay, 3.0, Size::new(200.0, 100.0))[0];
        assert_eq!(text.bounds, [10.0, 10.0, 60.0, 30.0]);
    }

    #[test]
    fn test_overlay_origin_moves_words() {
        let mut overlay = overlay(AnimationDestination::Preview);
        overlay.frame = overlay.frame.offset_by(40.0, -5.0);
        let text = &prepare_subtitles(&overlay, 3.0, Size::new(200.0, 100.0))[0];
        assert_eq!(text.bounds, [50.0, 5.0, 100.0, 25.0]);
    }

    #[test]
    fn test_movie_bounds_are_flipped_and_scaled() {
        let overlay = overlay(AnimationDestination::Movie);
        let text = &prepare_subtitles(&overlay, 3.0, Size::new(400.0, 200.0))[0];
        // y-up rect 10..30 in a 100 high canvas is 70..90 from the top.
        assert_eq!(text.bounds, [20.0, 140.0, 120.0, 180.0]);
        assert_eq!(text.font_size, 48.0);
    }
}
