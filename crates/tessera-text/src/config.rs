/// Capacities of the text system, fixed at construction.
///
/// | Config | Atlas | Atlas memory | Cache slots |
/// |--------|-------|--------------|-------------|
/// | small() | 1024x1024 | 1 MB | 4096 |
/// | medium() | 2048x2048 | 4 MB | 8192 |
/// | default / large() | 4096x4096 | 16 MB | 16384 |
///
/// The atlas is one byte per pixel, and the glyph cache never grows, so the
/// per-character path does not allocate.
///
/// ```
/// use tessera_text::TextConfig;
///
/// let config = TextConfig::small().with_max_chars_per_batch(512);
/// assert_eq!(config.atlas_size, 1024);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextConfig {
    /// Atlas width and height in pixels.
    pub atlas_size: u32,
    /// Slots in the open-addressed glyph cache.
    pub cache_slots: usize,
    /// Glyph quads per draw call before a forced flush.
    pub max_chars_per_batch: usize,
    /// Maximum number of registered fonts.
    pub max_fonts: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            atlas_size: 4096,
            cache_slots: 16384,
            max_chars_per_batch: 2048,
            max_fonts: 16,
        }
    }
}

impl TextConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// For mostly-Latin interfaces.
    pub fn small() -> Self {
        Self {
            atlas_size: 1024,
            cache_slots: 4096,
            ..Default::default()
        }
    }

    pub fn medium() -> Self {
        Self {
            atlas_size: 2048,
            cache_slots: 8192,
            ..Default::default()
        }
    }

    /// For CJK-heavy text.
    pub fn large() -> Self {
        Self::default()
    }

    pub fn with_atlas_size(mut self, size: u32) -> Self {
        self.atlas_size = size;
        self
    }

    pub fn with_cache_slots(mut self, slots: usize) -> Self {
        self.cache_slots = slots;
        self
    }

    /// Batches hold at most 16383 glyphs so indices fit in `u16`.
    pub fn with_max_chars_per_batch(mut self, chars: usize) -> Self {
        self.max_chars_per_batch = chars;
        self
    }

    pub fn with_max_fonts(mut self, fonts: usize) -> Self {
        self.max_fonts = fonts;
        self
    }
}
