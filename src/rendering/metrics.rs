//! Text measurement.
//!
//! Layout only needs the rendered bounding size of a string. Whatever
//! measures must agree with whatever draws, or words clip and overlap:
//! `GlyphonMetrics` shapes with the same cosmic-text engine the GPU text
//! renderer uses. `FixedAdvanceMetrics` is a deterministic stand-in for
//! headless runs and tests.

use std::num::NonZeroUsize;

use glyphon::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};
use lru::LruCache;
use parking_lot::Mutex;

use super::coord::Size;
use crate::subtitles::style::{TextAttributes, SYSTEM_FONT_FAMILY};

/// Line height as a multiple of font size.
const LINE_HEIGHT_RATIO: f32 = 1.2;

/// Measures rendered text.
pub trait TextMetrics {
    /// Bounding size of `text` drawn with `attributes`. Never fails; empty
    /// text yields a zero width.
    fn measure(&self, text: &str, attributes: &TextAttributes) -> Size;
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn measure(&self, text: &str, attributes: &TextAttributes) -> Size {
        (**self).measure(text, attributes)
    }
}

impl<T: TextMetrics + ?Sized> TextMetrics for Box<T> {
    fn measure(&self, text: &str, attributes: &TextAttributes) -> Size {
        (**self).measure(text, attributes)
    }
}

/// Every character advances by the same fraction of the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMetrics {
    /// Advance per character as a multiple of font size.
    pub advance_ratio: f64,
    /// Line height as a multiple of font size.
    pub line_height_ratio: f64,
}

impl FixedAdvanceMetrics {
    pub fn new(advance_ratio: f64, line_height_ratio: f64) -> Self {
        Self {
            advance_ratio,
            line_height_ratio,
        }
    }
}

impl Default for FixedAdvanceMetrics {
    fn default() -> Self {
        Self::new(0.6, LINE_HEIGHT_RATIO as f64)
    }
}

impl TextMetrics for FixedAdvanceMetrics {
    fn measure(&self, text: &str, attributes: &TextAttributes) -> Size {
        let size = attributes.font.size.max(0.0);
        Size::new(
            text.chars().count() as f64 * size * self.advance_ratio,
            size * self.line_height_ratio,
        )
    }
}

/// Shapes text with glyphon's cosmic-text font system.
pub struct GlyphonMetrics {
    font_system: Mutex<FontSystem>,
}

impl GlyphonMetrics {
    /// Use the system font database.
    pub fn new() -> Self {
        Self::from_font_system(FontSystem::new())
    }

    /// System fonts plus an embedded font.
    pub fn with_font_data(data: Vec<u8>) -> Self {
        let mut font_system = FontSystem::new();
        let len = data.len();
        font_system.db_mut().load_font_data(data);
        log::info!("[METRICS] Embedded font loaded ({} bytes)", len);
        Self::from_font_system(font_system)
    }

    pub fn from_font_system(font_system: FontSystem) -> Self {
        Self {
            font_system: Mutex::new(font_system),
        }
    }
}

impl Default for GlyphonMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn family_for(name: &str) -> Family<'_> {
    match name.trim() {
        "" => Family::SansSerif,
        name => match name.to_ascii_lowercase().as_str() {
            SYSTEM_FONT_FAMILY | "sans" | "system sans" => Family::SansSerif,
            "serif" | "system serif" => Family::Serif,
            "mono" | "monospace" | "system mono" => Family::Monospace,
            _ => Family::Name(name),
        },
    }
}

impl TextMetrics for GlyphonMetrics {
    fn measure(&self, text: &str, attributes: &TextAttributes) -> Size {
        let font_size = attributes.font.size.max(1.0) as f32;
        let line_height = font_size * LINE_HEIGHT_RATIO;
        if text.is_empty() {
            return Size::new(0.0, line_height as f64);
        }

        let mut font_system = self.font_system.lock();
        let mut buffer = Buffer::new(&mut font_system, Metrics::new(font_size, line_height));
        // Unbounded: measure the natural single-line extent.
        buffer.set_size(&mut font_system, None, None);

        let weight = Weight(attributes.font.weight.clamp(100, 900));
        let attrs = Attrs::new()
            .family(family_for(&attributes.font.family))
            .weight(weight);
        buffer.set_text(&mut font_system, text, &attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut font_system, false);

        let (width, height) = buffer
            .layout_runs()
            .fold((0.0f32, 0.0f32), |(w, h), run| {
                (w.max(run.line_w), h + run.line_height)
            });

        Size::new(width as f64, height.max(line_height) as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MetricsKey {
    text: String,
    family: String,
    weight: u16,
    size_bits: u64,
}

impl MetricsKey {
    fn new(text: &str, attributes: &TextAttributes) -> Self {
        Self {
            text: text.to_string(),
            family: attributes.font.family.clone(),
            weight: attributes.font.weight,
            size_bits: attributes.font.size.to_bits(),
        }
    }
}

/// LRU cache in front of another provider.
///
/// Layout measures the whole sentence and then every word, and preview
/// passes repeat on every loop restart, so shaping results are reused.
pub struct CachedMetrics<M> {
    inner: M,
    cache: Mutex<LruCache<MetricsKey, Size>>,
}

impl<M: TextMetrics> CachedMetrics<M> {
    pub fn new(inner: M, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

impl<M: TextMetrics> TextMetrics for CachedMetrics<M> {
    fn measure(&self, text: &str, attributes: &TextAttributes) -> Size {
        let key = MetricsKey::new(text, attributes);
        if let Some(size) = self.cache.lock().get(&key) {
            return *size;
        }
        // Measure without holding the cache lock.
        let size = self.inner.measure(text, attributes);
        self.cache.lock().put(key, size);
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComposerConfig;
    use crate::subtitles::style::SubtitleStyle;
    use std::cell::Cell;

    fn attrs(size: f64) -> TextAttributes {
        let mut attributes =
            SubtitleStyle::default().text_attributes(true, 1.0, &ComposerConfig::default());
        attributes.font.size = size;
        attributes
    }

    #[test]
    fn test_fixed_advance() {
        let metrics = FixedAdvanceMetrics::new(0.5, 1.0);
        let size = metrics.measure("Hello", &attrs(10.0));
        assert_eq!(size, Size::new(25.0, 10.0));
    }

    #[test]
    fn test_fixed_advance_empty_and_unicode() {
        let metrics = FixedAdvanceMetrics::new(0.5, 1.0);
        assert_eq!(metrics.measure("", &attrs(10.0)).width, 0.0);
        // Characters, not bytes.
        assert_eq!(metrics.measure("żółw", &attrs(10.0)).width, 20.0);
    }

    #[test]
    fn test_fixed_advance_is_deterministic() {
        let metrics = FixedAdvanceMetrics::default();
        let a = metrics.measure("determinism", &attrs(24.0));
        let b = metrics.measure("determinism", &attrs(24.0));
        assert_eq!(a, b);
    }

    struct CountingMetrics {
        calls: Cell<usize>,
    }

    impl TextMetrics for CountingMetrics {
        fn measure(&self, text: &str, attributes: &TextAttributes) -> Size {
            self.calls.set(self.calls.get() + 1);
            FixedAdvanceMetrics::default().measure(text, attributes)
        }
    }

    #[test]
    fn test_cached_metrics_reuses_results() {
        let cached = CachedMetrics::new(
            CountingMetrics {
                calls: Cell::new(0),
            },
            8,
        );
        let first = cached.measure("word", &attrs(24.0));
        let second = cached.measure("word", &attrs(24.0));
        assert_eq!(first, second);
        assert_eq!(cached.inner().calls.get(), 1);

        // Different size is a different entry.
        cached.measure("word", &attrs(36.0));
        assert_eq!(cached.inner().calls.get(), 2);
        assert_eq!(cached.cached_len(), 2);
    }

    #[test]
    fn test_cached_metrics_evicts() {
        let cached = CachedMetrics::new(FixedAdvanceMetrics::default(), 1);
        cached.measure("a", &attrs(10.0));
        cached.measure("b", &attrs(10.0));
        assert_eq!(cached.cached_len(), 1);
    }

    #[test]
    fn test_glyphon_empty_text() {
        let metrics = GlyphonMetrics::new();
        let size = metrics.measure("", &attrs(20.0));
        assert_eq!(size.width, 0.0);
        assert!(size.height > 0.0);
    }

    #[test]
    fn test_family_mapping() {
        assert_eq!(family_for(""), Family::SansSerif);
        assert_eq!(family_for(SYSTEM_FONT_FAMILY), Family::SansSerif);
        assert_eq!(family_for("Monospace"), Family::Monospace);
        assert_eq!(family_for("Georgia"), Family::Name("Georgia"));
    }
}
