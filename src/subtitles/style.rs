//! Subtitle style and its resolution into concrete text attributes.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::{ComposerConfig, RenderEnvironment};
use crate::error::{SubtitleError, SubtitleResult};

/// Font families offered by the style picker.
pub const PRESET_FONT_FAMILIES: &[&str] = &[
    "Copperplate",
    "Courier New",
    "Gill Sans",
    "Apple SD Gothic Neo",
    "Avenir Next Condensed",
    "Tamil Sangam MN",
    "Helvetica Neue",
    "Georgia",
    "Arial Rounded MT Bold",
    "Chalkboard SE",
    "Futura",
    SYSTEM_FONT_FAMILY,
];

/// Colors offered by the style picker.
pub const PRESET_COLORS: &[&str] = &[
    "#000000", "#FFFFFF", "#246590", "#3DACF7", "#3802DA", "#8E5AF7", "#CE0755", "#EC3C1A",
    "#F07F5A", "#F3AF22", "#F9D98C", "#77C344", "#B8E297",
];

/// Family name resolved to the platform's default sans-serif face.
pub const SYSTEM_FONT_FAMILY: &str = "sans-serif";

/// How words appear over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum Effect {
    /// Words fade in one after another and stay, forming a paragraph.
    #[default]
    OneAfterAnother,
    /// One centered word at a time, replaced in sync with speech.
    OneWordOnly,
}

/// RGBA color, components in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> SubtitleResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| -> SubtitleResult<f32> {
            digits
                .get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .map(|v| v as f32 / 255.0)
                .ok_or_else(|| SubtitleError::InvalidColor(hex.to_string()))
        };

        match digits.len() {
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self {
                r: channel(0..2)?,
                g: channel(2..4)?,
                b: channel(4..6)?,
                a: channel(6..8)?,
            }),
            _ => Err(SubtitleError::InvalidColor(hex.to_string())),
        }
    }

    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", byte(self.r), byte(self.g), byte(self.b))
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self { a: alpha, ..*self }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Font face description. `size` is overridden by effect-specific sizing
/// when resolving attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Font {
    pub family: String,
    /// Weight (100-900).
    pub weight: u16,
    pub size: f64,
}

impl Font {
    pub fn new(family: impl Into<String>, weight: u16, size: f64) -> Self {
        Self {
            family: family.into(),
            weight,
            size,
        }
    }

    /// Bold system font, the default subtitle face.
    pub fn bold_system(size: f64) -> Self {
        Self::new(SYSTEM_FONT_FAMILY, 700, size)
    }

    pub fn with_size(&self, size: f64) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::bold_system(16.0)
    }
}

/// Concrete attributes text is measured and drawn with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TextAttributes {
    /// Negative widths stroke and fill the glyphs.
    pub stroke_width: f64,
    pub stroke_color: Color,
    pub font: Font,
    pub foreground_color: Color,
}

/// One user edit of the style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum StyleModification {
    Effect(Effect),
    Color(Color),
    Font(Font),
}

/// Subtitle look: effect, font and color.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct SubtitleStyle {
    pub effect: Effect,
    pub font: Font,
    pub color: Color,
}

impl SubtitleStyle {
    pub fn new(effect: Effect, font: Font, color: Color) -> Self {
        Self {
            effect,
            font,
            color,
        }
    }

    /// Copy of this style with one modification applied.
    pub fn modified(&self, modification: StyleModification) -> Self {
        let mut style = self.clone();
        match modification {
            StyleModification::Effect(effect) => style.effect = effect,
            StyleModification::Color(color) => style.color = color,
            StyleModification::Font(font) => style.font = font,
        }
        style
    }

    /// Font size for the current effect and render target.
    ///
    /// Exported video is rendered larger than the preview surface; the
    /// preview divides by the video scale so that the on-screen size
    /// matches what the export will show.
    pub fn font_size(
        &self,
        for_rendering_video: bool,
        video_scale: f64,
        config: &ComposerConfig,
    ) -> f64 {
        let base = match self.effect {
            Effect::OneAfterAnother => config.one_after_another_font_size,
            Effect::OneWordOnly => config.one_word_only_font_size,
        };
        if for_rendering_video {
            base * config.video_font_multiplier
        } else {
            base / video_scale
        }
    }

    pub fn text_attributes(
        &self,
        for_rendering_video: bool,
        video_scale: f64,
        config: &ComposerConfig,
    ) -> TextAttributes {
        TextAttributes {
            stroke_width: config.stroke_width,
            stroke_color: Color::BLACK,
            font: self
                .font
                .with_size(self.font_size(for_rendering_video, video_scale, config)),
            foreground_color: self.color,
        }
    }

    /// Attributes for a pass running in `env`.
    pub fn attributes_for(&self, env: &RenderEnvironment, config: &ComposerConfig) -> TextAttributes {
        let scale = if env.is_rendering_video {
            1.0
        } else {
            env.effective_video_scale()
        };
        self.text_attributes(env.is_rendering_video, scale, config)
    }
}
