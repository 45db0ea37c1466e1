//! Text measurement.
//!
//! The layout engine never loads fonts itself. It asks a [`TextMetrics`] provider for the
//! advance width of every leaf it places.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

/// Measures rendered text.
pub trait TextMetrics {
    /// Advance width of `text` drawn at `scale` times the base font size.
    fn measure_width(&self, text: &str, scale: f32) -> f32;

    /// Whether the font can draw `text`. Only the drawing stage uses this.
    fn has_glyph(&self, _text: &str) -> bool {
        true
    }
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    #[inline]
    fn measure_width(&self, text: &str, scale: f32) -> f32 {
        (**self).measure_width(text, scale)
    }

    #[inline]
    fn has_glyph(&self, text: &str) -> bool {
        (**self).has_glyph(text)
    }
}

/// A monospaced stand-in for a real font: every character advances by the same amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance {
    pub font_size: f32,
    /// Advance per character, in ems.
    pub advance: f32,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        FixedAdvance {
            font_size: 20.0,
            advance: 0.5,
        }
    }
}

impl TextMetrics for FixedAdvance {
    fn measure_width(&self, text: &str, scale: f32) -> f32 {
        text.chars().count() as f32 * self.advance * self.font_size * scale
    }
}

/// Memoizes the widths reported by another provider.
///
/// Widths are keyed by text, then by the exact bit pattern of the scale. A cache hit
/// allocates nothing.
#[derive(Debug)]
pub struct CachedMetrics<M> {
    inner: M,
    cache: RefCell<FxHashMap<Box<str>, FxHashMap<u32, f32>>>,
}

impl<M: TextMetrics> CachedMetrics<M> {
    pub fn new(inner: M) -> Self {
        CachedMetrics {
            inner,
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// Number of distinct (text, scale) pairs measured so far.
    pub fn cached_entries(&self) -> usize {
        self.cache.borrow().values().map(FxHashMap::len).sum()
    }

    /// Number of distinct texts measured so far.
    pub fn cached_texts(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<M: TextMetrics> TextMetrics for CachedMetrics<M> {
    fn measure_width(&self, text: &str, scale: f32) -> f32 {
        let bits = scale.to_bits();
        if let Some(width) = self
            .cache
            .borrow()
            .get(text)
            .and_then(|widths| widths.get(&bits))
        {
            return *width;
        }
        let width = self.inner.measure_width(text, scale);
        let mut cache = self.cache.borrow_mut();
        match cache.get_mut(text) {
            Some(widths) => {
                widths.insert(bits, width);
            }
            None => {
                let mut widths = FxHashMap::default();
                widths.insert(bits, width);
                cache.insert(text.into(), widths);
            }
        }
        width
    }

    fn has_glyph(&self, text: &str) -> bool {
        self.inner.has_glyph(text)
    }
}
