//! Composer tuning constants.

use std::path::Path;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ResultExt, SubtitleResult};
use crate::rendering::animation::Easing;

/// How the gap between two consecutive words is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum WordSpacing {
    /// Word width divided by its character count.
    #[default]
    CharacterAverage,
    /// Width of a literal space in the active font.
    MeasuredSpace,
}

/// Layout, font and animation constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ComposerConfig {
    /// Line advance as a multiple of the measured text height.
    pub line_spacing: f64,
    /// Font size for the reveal (one after another) effect.
    pub one_after_another_font_size: f64,
    /// Font size for the show-and-hide (one word only) effect.
    pub one_word_only_font_size: f64,
    /// Extra font multiplier applied when rendering into the exported video.
    pub video_font_multiplier: f64,
    /// Stroke width; negative strokes and fills the glyphs.
    pub stroke_width: f64,
    /// Playback speed of the show-and-hide pop animations.
    pub flash_speed: f64,
    pub word_spacing: WordSpacing,
    /// Rasterization scale for text layers.
    pub contents_scale: f64,
    /// Timing curve of opacity animations.
    pub easing: Easing,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            line_spacing: 1.2,
            one_after_another_font_size: 24.0,
            one_word_only_font_size: 48.0,
            video_font_multiplier: 1.5,
            stroke_width: -2.0,
            flash_speed: 4.0,
            word_spacing: WordSpacing::CharacterAverage,
            contents_scale: 2.0,
            easing: Easing::Linear,
        }
    }
}

impl ComposerConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> SubtitleResult<Self> {
        let config: ComposerConfig = serde_json::from_str(json)?;
        log::debug!("[CONFIG] Loaded composer config: {:?}", config);
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> SubtitleResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read composer config {}", path.display()))?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ComposerConfig::default();
        assert_eq!(config.line_spacing, 1.2);
        assert_eq!(config.one_after_another_font_size, 24.0);
        assert_eq!(config.one_word_only_font_size, 48.0);
        assert_eq!(config.video_font_multiplier, 1.5);
        assert_eq!(config.stroke_width, -2.0);
        assert_eq!(config.flash_speed, 4.0);
        assert_eq!(config.word_spacing, WordSpacing::CharacterAverage);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            ComposerConfig::from_json_str(r#"{"lineSpacing": 1.5, "wordSpacing": "measuredSpace"}"#)
                .unwrap();
        assert_eq!(config.line_spacing, 1.5);
        assert_eq!(config.word_spacing, WordSpacing::MeasuredSpace);
        assert_eq!(config.flash_speed, 4.0);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(ComposerConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"oneWordOnlyFontSize": 64.0}}"#).unwrap();

        let config = ComposerConfig::load(file.path()).unwrap();
        assert_eq!(config.one_word_only_font_size, 64.0);
        assert_eq!(config.one_after_another_font_size, 24.0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ComposerConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read composer config"));
    }
}
