//! Export composition: the video description subtitles are baked into.
//!
//! Decoding and encoding happen elsewhere. This module validates the source,
//! sizes the render, declares the single full-length instruction and attaches
//! the subtitle overlay through the composer's export context.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::composer::{CompositionReport, SubtitleComposer};
use super::context::{CompositionContext, VideoComposition};
use super::speech::SpeechSegment;
use super::style::SubtitleStyle;
use crate::config::RenderEnvironment;
use crate::error::{SubtitleError, SubtitleResult};
use crate::rendering::clock::MediaClock;
use crate::rendering::coord::Size;
use crate::rendering::metrics::TextMetrics;
use crate::rendering::overlay::AnimationTool;
use crate::rendering::text::{prepare_subtitles, PreparedText};

/// Export frame rate.
pub const EXPORT_FRAME_RATE: u32 = 30;

const EXPORT_FILE_PREFIX: &str = "finalVideo";
const EXPORT_FILE_EXTENSION: &str = "mov";

/// Recorded orientation of the source video track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum Orientation {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Orientation {
    /// Rotated a quarter turn, so the stored frame is sideways.
    pub fn is_portrait(&self) -> bool {
        matches!(self, Orientation::Left | Orientation::Right)
    }
}

/// Source clip metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SourceVideo {
    /// Stored frame size, before orientation is applied.
    pub natural_size: Size,
    pub orientation: Orientation,
    /// Seconds.
    pub duration: f64,
    pub has_video_track: bool,
    pub has_audio_track: bool,
}

impl SourceVideo {
    /// Size frames are displayed and exported at.
    pub fn render_size(&self) -> Size {
        if self.orientation.is_portrait() {
            self.natural_size.transposed()
        } else {
            self.natural_size
        }
    }
}

/// A clip together with its recognized speech and chosen style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitledVideo {
    pub video: SourceVideo,
    pub segments: Vec<SpeechSegment>,
    pub style: SubtitleStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start: f64,
    pub duration: f64,
}

impl TimeRange {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// How the source track is drawn within an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInstruction {
    pub orientation: Orientation,
    /// The video layer turns transparent from this time on.
    pub hidden_from: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionInstruction {
    pub time_range: TimeRange,
    pub layer_instructions: Vec<LayerInstruction>,
}

/// Render description handed to the encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportComposition {
    pub render_size: Size,
    /// Seconds per frame.
    pub frame_duration: f64,
    pub instructions: Vec<CompositionInstruction>,
    pub animation_tool: Option<AnimationTool>,
}

impl ExportComposition {
    pub fn new(video: &SourceVideo) -> Self {
        Self {
            render_size: video.render_size(),
            frame_duration: 1.0 / EXPORT_FRAME_RATE as f64,
            instructions: vec![CompositionInstruction {
                time_range: TimeRange {
                    start: 0.0,
                    duration: video.duration,
                },
                layer_instructions: vec![LayerInstruction {
                    orientation: video.orientation,
                    hidden_from: video.duration,
                }],
            }],
            animation_tool: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.instructions
            .iter()
            .map(|i| i.time_range.end())
            .fold(0.0, f64::max)
    }

    pub fn frame_count(&self) -> u64 {
        (self.duration() / self.frame_duration).ceil() as u64
    }

    /// Subtitles visible in frame `index`, in render pixels.
    pub fn subtitles_for_frame(&self, index: u64) -> Vec<PreparedText> {
        let time = index as f64 * self.frame_duration;
        self.animation_tool
            .as_ref()
            .map(|tool| prepare_subtitles(&tool.overlay, time, self.render_size))
            .unwrap_or_default()
    }
}

impl VideoComposition for ExportComposition {
    fn render_size(&self) -> Size {
        self.render_size
    }

    fn set_animation_tool(&mut self, tool: AnimationTool) {
        self.animation_tool = Some(tool);
    }
}

/// Build the export composition for `subtitled` with its subtitles attached.
///
/// `env` is a snapshot of the preview environment (pan offsets, video
/// scale); the render flag is set for the export pass.
pub fn compose_export<M: TextMetrics, C: MediaClock>(
    subtitled: &SubtitledVideo,
    composer: &mut SubtitleComposer<M, C>,
    env: &RenderEnvironment,
) -> SubtitleResult<(ExportComposition, CompositionReport)> {
    let video = &subtitled.video;
    if !video.has_audio_track {
        log::error!("[EXPORT] No audio during video/audio composition");
        return Err(SubtitleError::NoAudioTrack);
    }
    if !video.has_video_track {
        log::error!("[EXPORT] No video during video/audio composition");
        return Err(SubtitleError::NoVideoTrack);
    }

    let mut composition = ExportComposition::new(video);
    let render_size = composition.render_size();
    log::info!(
        "[EXPORT] Composing {:.2}s at {}x{} ({:?}) with {} subtitles",
        video.duration,
        render_size.width,
        render_size.height,
        video.orientation,
        subtitled.segments.len()
    );

    let report = composer.apply(
        CompositionContext::Export(&mut composition),
        &subtitled.segments,
        Some(subtitled.style.clone()),
        render_size,
        0.0,
        env,
    );

    Ok((composition, report))
}

/// Unique file name for an exported movie.
pub fn export_file_name() -> String {
    format!(
        "{}{}.{}",
        EXPORT_FILE_PREFIX,
        Uuid::new_v4().simple(),
        EXPORT_FILE_EXTENSION
    )
}

/// Unique output path inside `dir`.
pub fn export_path(dir: impl AsRef<Path>) -> PathBuf {
    dir.as_ref().join(export_file_name())
}
