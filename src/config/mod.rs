//! Subtitle engine configuration.
//!
//! - `ComposerConfig`: tuning constants for layout, font scaling and
//!   animation (line spacing, font sizes, flash speed, ...). Loadable from
//!   JSON with every field optional.
//! - `RenderEnvironment`: the mode-dependent parameters of one pass
//!   (export vs. preview, pan offset, video scale). Passed by value into
//!   every entry point; nothing here is global.

pub mod composer;
pub mod environment;

pub use composer::{ComposerConfig, WordSpacing};
pub use environment::RenderEnvironment;
