//! Word-by-word subtitle layout.
//!
//! Words flow left to right and wrap when they would cross the canvas'
//! right edge. The vertical anchor of the first line is estimated up front
//! from the width of the whole sentence, so every line's position is known
//! before its words are placed:
//!
//! ```text
//! Preview (y down) : anchor = H - h * lines * spacing + offset_y, lines advance +y
//! Export  (y up)   : anchor = h * (lines - 1) * spacing + offset_y, lines advance -y
//! ```
//!
//! The one-word-only effect ignores the flow and puts every word in the
//! same centered slot; opacity animations show one at a time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::coord::{Point, Rect, Size};
use super::metrics::TextMetrics;
use crate::config::{ComposerConfig, RenderEnvironment, WordSpacing};
use crate::subtitles::context::AnimationDestination;
use crate::subtitles::speech::{as_sentence, SpeechSegment};
use crate::subtitles::style::{Effect, SubtitleStyle, TextAttributes};

/// A word and where it goes on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PositionedTextElement {
    pub text: String,
    pub frame: Rect,
}

/// Computes word frames for a canvas.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: ComposerConfig,
}

impl LayoutEngine {
    pub fn new(config: ComposerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Attributes words are measured with for this destination.
    pub fn attributes(
        &self,
        style: &SubtitleStyle,
        destination: AnimationDestination,
        env: &RenderEnvironment,
    ) -> TextAttributes {
        style.attributes_for(&env.for_destination(destination), &self.config)
    }

    /// Lay out one element per segment, in segment order.
    pub fn layout<M: TextMetrics + ?Sized>(
        &self,
        metrics: &M,
        segments: &[SpeechSegment],
        canvas: Size,
        destination: AnimationDestination,
        style: &SubtitleStyle,
        env: &RenderEnvironment,
    ) -> Vec<PositionedTextElement> {
        if segments.is_empty() {
            return Vec::new();
        }

        if canvas.is_degenerate() {
            log::warn!(
                "[LAYOUT] Degenerate canvas {}x{}, placing {} words at origin",
                canvas.width,
                canvas.height,
                segments.len()
            );
            return segments
                .iter()
                .map(|segment| PositionedTextElement {
                    text: segment.content.clone(),
                    frame: Rect::ZERO,
                })
                .collect();
        }

        let env = env.for_destination(destination);
        let attributes = style.attributes_for(&env, &self.config);
        let (offset_x, offset_y) = env.offsets_for(destination);
        let spacing = self.config.line_spacing;

        let sentence_size = metrics.measure(&as_sentence(segments), &attributes);
        let estimated_lines = (sentence_size.width / canvas.width).ceil();
        let mut y = match destination {
            AnimationDestination::Movie => {
                sentence_size.height * (estimated_lines - 1.0) * spacing + offset_y
            }
            AnimationDestination::Preview => {
                canvas.height - sentence_size.height * estimated_lines * spacing + offset_y
            }
        };

        // Only the first word carries the pan offset; wrapped lines start at 0.
        let mut x = -offset_x;
        let mut elements = Vec::with_capacity(segments.len());

        for segment in segments {
            let size = metrics.measure(&segment.content, &attributes);

            if x + size.width > canvas.width {
                let advance = size.height * spacing;
                y += if env.is_rendering_video {
                    -advance
                } else {
                    advance
                };
                x = 0.0;
            }

            let centered = Rect::centered_in(size, canvas);
            let frame = match style.effect {
                Effect::OneWordOnly => centered.offset_by(-offset_x, offset_y),
                Effect::OneAfterAnother => {
                    let correction = centered.size.height - centered.min_y();
                    let correction = if env.is_rendering_video {
                        -correction
                    } else {
                        correction
                    };
                    Rect::new(Point::new(x, y), size).offset_by(0.0, correction)
                }
            };

            elements.push(PositionedTextElement {
                text: segment.content.clone(),
                frame,
            });
            x += size.width + self.space_width(metrics, &segment.content, size, &attributes);
        }

        log::debug!(
            "[LAYOUT] Placed {} words on {}x{} ({:?}, ~{} lines)",
            elements.len(),
            canvas.width,
            canvas.height,
            destination,
            estimated_lines
        );

        elements
    }

    fn space_width<M: TextMetrics + ?Sized>(
        &self,
        metrics: &M,
        word: &str,
        word_size: Size,
        attributes: &TextAttributes,
    ) -> f64 {
        match self.config.word_spacing {
            WordSpacing::CharacterAverage => match word.chars().count() {
                0 => 0.0,
                count => word_size.width / count as f64,
            },
            WordSpacing::MeasuredSpace => metrics.measure(" ", attributes).width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::metrics::FixedAdvanceMetrics;

    /// 10 units per character, 20 tall, regardless of font size.
    struct FlatMetrics;

    impl TextMetrics for FlatMetrics {
        fn measure(&self, text: &str, _attributes: &TextAttributes) -> Size {
            Size::new(text.chars().count() as f64 * 10.0, 20.0)
        }
    }

    fn engine() -> LayoutEngine {
        LayoutEngine::new(ComposerConfig::default())
    }

    fn words(words: &[&str]) -> Vec<SpeechSegment> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| SpeechSegment::new(*w, i as f64 * 0.5, 0.4))
            .collect()
    }

    #[test]
    fn test_empty_segments() {
        let elements = engine().layout(
            &FlatMetrics,
            &[],
            Size::new(300.0, 100.0),
            AnimationDestination::Preview,
            &SubtitleStyle::default(),
            &RenderEnvironment::default(),
        );
        assert!(elements.is_empty());
    }

    #[test]
    fn test_hello_world_scenario() {
        let segments = vec![
            SpeechSegment::new("Hello", 0.0, 0.5),
            SpeechSegment::new("world", 0.6, 0.4),
        ];
        let elements = engine().layout(
            &FixedAdvanceMetrics::default(),
            &segments,
            Size::new(300.0, 100.0),
            AnimationDestination::Preview,
            &SubtitleStyle::default(),
            &RenderEnvironment::default(),
        );

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text, "Hello");
        assert_eq!(elements[0].frame.min_x(), 0.0);
        assert!(elements[1].frame.min_x() > elements[0].frame.max_x());
        // Same line.
        assert_eq!(elements[0].frame.min_y(), elements[1].frame.min_y());
    }

    #[test]
    fn test_exact_width_does_not_wrap() {
        // 30 characters * 10 = 300 = canvas width.
        let segments = words(&["abcdefghijklmnopqrstuvwxyzabcd"]);
        let canvas = Size::new(300.0, 100.0);
        let elements = engine().layout(
            &FlatMetrics,
            &segments,
            canvas,
            AnimationDestination::Preview,
            &SubtitleStyle::default(),
            &RenderEnvironment::default(),
        );

        // lines = 1: anchor = 100 - 20 * 1.2 = 76; correction = 20 - 40 = -20.
        assert_eq!(elements[0].frame.min_x(), 0.0);
        assert!((elements[0].frame.min_y() - 56.0).abs() < 1e-9);
    }

    #[test]
    fn test_overflowing_word_wraps_to_next_line() {
        // 31 characters = 310 > 300.
        let segments = words(&["abcdefghijklmnopqrstuvwxyzabcde"]);
        let canvas = Size::new(300.0, 100.0);
        let elements = engine().layout(
            &FlatMetrics,
            &segments,
            canvas,
            AnimationDestination::Preview,
            &SubtitleStyle::default(),
            &RenderEnvironment::default(),
        );

        // lines = 2: anchor = 100 - 48 = 52, wrapped +24, correction -20.
        assert_eq!(elements[0].frame.min_x(), 0.0);
        assert!((elements[0].frame.min_y() - 56.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrapping_resets_x() {
        let segments = words(&["aaaaaaaaaa", "bbbbbbbbbb", "cccccccccc"]);
        let elements = engine().layout(
            &FlatMetrics,
            &segments,
            Size::new(250.0, 400.0),
            AnimationDestination::Preview,
            &SubtitleStyle::default(),
            &RenderEnvironment::default(),
        );

        // 100 wide words, 10 wide spaces: "a b" fits in 210, "c" would end at 320.
        assert_eq!(elements[0].frame.min_x(), 0.0);
        assert_eq!(elements[1].frame.min_x(), 110.0);
        assert_eq!(elements[2].frame.min_x(), 0.0);
        assert!((elements[2].frame.min_y() - elements[0].frame.min_y() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrapped_line_ignores_pan_offset() {
        let segments = words(&["aaaaaaaaaa", "bbbbbbbbbb", "cccccccccc"]);
        let env = RenderEnvironment {
            offset_x: 15.0,
            ..Default::default()
        };
        let elements = engine().layout(
            &FlatMetrics,
            &segments,
            Size::new(250.0, 400.0),
            AnimationDestination::Movie,
            &SubtitleStyle::default(),
            &env,
        );

        assert_eq!(elements[0].frame.min_x(), -15.0);
        assert_eq!(elements[1].frame.min_x(), 95.0);
        assert_eq!(elements[2].frame.min_x(), 0.0);
        assert!(elements[2].frame.min_y() < elements[0].frame.min_y());
    }

    #[test]
    fn test_mode_duality() {
        let segments = words(&["aaaaaaaaaa", "bbbbbbbbbb", "cccccccccc"]);
        let canvas = Size::new(250.0, 400.0);
        let env = RenderEnvironment::default();
        let style = SubtitleStyle::default();

        let preview = engine().layout(
            &FlatMetrics,
            &segments,
            canvas,
            AnimationDestination::Preview,
            &style,
            &env,
        );
        let movie = engine().layout(
            &FlatMetrics,
            &segments,
            canvas,
            AnimationDestination::Movie,
            &style,
            &env,
        );

        for (p, m) in preview.iter().zip(&movie) {
            assert_eq!(p.frame.min_x(), m.frame.min_x());
        }
        // Preview lines advance downward in y-down space, export lines
        // advance downward in y-up space.
        assert!(preview[2].frame.min_y() > preview[0].frame.min_y());
        assert!(movie[2].frame.min_y() < movie[0].frame.min_y());
    }

    #[test]
    fn test_one_word_only_centering() {
        let segments = words(&["a", "medium", "considerably"]);
        let canvas = Size::new(300.0, 100.0);
        let style = SubtitleStyle {
            effect: Effect::OneWordOnly,
            ..Default::default()
        };
        let elements = engine().layout(
            &FlatMetrics,
            &segments,
            canvas,
            AnimationDestination::Preview,
            &style,
            &RenderEnvironment::default(),
        );

        for element in &elements {
            assert_eq!(element.frame.center(), Point::new(150.0, 50.0));
        }
        assert_eq!(elements[1].frame.origin, Point::new(120.0, 40.0));
    }

    #[test]
    fn test_export_offsets_apply() {
        let segments = words(&["word"]);
        let canvas = Size::new(300.0, 100.0);
        let env = RenderEnvironment {
            offset_x: 15.0,
            offset_y: 7.0,
            ..Default::default()
        };
        let style = SubtitleStyle {
            effect: Effect::OneWordOnly,
            ..Default::default()
        };

        let movie = engine().layout(
            &FlatMetrics,
            &segments,
            canvas,
            AnimationDestination::Movie,
            &style,
            &env,
        );
        assert_eq!(movie[0].frame.origin, Point::new(130.0 - 15.0, 40.0 + 7.0));

        // The live preview never applies the pan offset itself.
        let preview = engine().layout(
            &FlatMetrics,
            &segments,
            canvas,
            AnimationDestination::Preview,
            &style,
            &env,
        );
        assert_eq!(preview[0].frame.origin, Point::new(130.0, 40.0));

        let flow = engine().layout(
            &FlatMetrics,
            &segments,
            canvas,
            AnimationDestination::Movie,
            &SubtitleStyle::default(),
            &env,
        );
        assert_eq!(flow[0].frame.min_x(), -15.0);
    }

    #[test]
    fn test_degenerate_canvas() {
        let elements = engine().layout(
            &FlatMetrics,
            &words(&["a", "b"]),
            Size::new(0.0, 100.0),
            AnimationDestination::Movie,
            &SubtitleStyle::default(),
            &RenderEnvironment::default(),
        );
        assert_eq!(elements.len(), 2);
        assert!(elements.iter().all(|e| e.frame == Rect::ZERO));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let segments = words(&["the", "quick", "brown", "fox", "jumps"]);
        let canvas = Size::new(120.0, 300.0);
        let env = RenderEnvironment {
            offset_x: 3.0,
            offset_y: -2.0,
            video_scale: 1.5,
            ..Default::default()
        };
        let run = || {
            engine().layout(
                &FixedAdvanceMetrics::default(),
                &segments,
                canvas,
                AnimationDestination::Movie,
                &SubtitleStyle::default(),
                &env,
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_measured_space() {
        let config = ComposerConfig {
            word_spacing: WordSpacing::MeasuredSpace,
            ..Default::default()
        };
        let elements = LayoutEngine::new(config).layout(
            &FlatMetrics,
            &words(&["aaaa", "bb"]),
            Size::new(300.0, 100.0),
            AnimationDestination::Preview,
            &SubtitleStyle::default(),
            &RenderEnvironment::default(),
        );
        assert_eq!(elements[1].frame.min_x(), 50.0);
    }
}
