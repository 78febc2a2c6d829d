//! Per-frame text coordination.
//!
//! [`TextEngine`] owns every piece of CPU-side text state (fonts, glyph
//! cache, atlas mirror, current batch) and turns strings into batches for a
//! [`TextTarget`]. A frame looks like:
//!
//! ```text
//! begin_frame(target)          upload atlas if a previous frame dirtied it
//! add_string(target, ...)*     may flush on font/colour change or full batch
//! end_frame(target)            flush what is left
//! ```

use std::path::{Path, PathBuf};

use glam::{Vec2, vec2};
use tessera_core::profiling::{profile_function, profile_scope};
use tessera_render::{Color, Viewport};

use crate::atlas::GlyphAtlas;
use crate::batch::{FlushReason, TextBatch, TextTarget};
use crate::cache::{CacheStats, Glyph, GlyphCache};
use crate::config::TextConfig;
use crate::error::{TextError, TextResult};
use crate::font::{Font, FontId, FontRegistry, OutlineFace};
use crate::raster;
use crate::utf8;

#[derive(Clone, Copy, Debug, Default)]
struct Counters {
    dynamic_generations: u64,
    atlas_full_failures: u64,
    atlas_uploads: u64,
    draw_calls: u64,
    frame_draw_calls: u64,
    frames: u64,
}

/// Snapshot of text system counters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextStats {
    pub cache: CacheStats,
    /// Glyphs rasterized on a cache miss.
    pub dynamic_generations: u64,
    /// Glyphs that found no room in the atlas. Each is cached blank.
    pub atlas_full_failures: u64,
    pub atlas_uploads: u64,
    pub draw_calls: u64,
    pub frame_draw_calls: u64,
    pub frames: u64,
    pub atlas_glyphs: usize,
    pub atlas_utilization: f32,
}

/// Fonts, glyph cache, atlas and batch builder for one renderer.
pub struct TextEngine {
    config: TextConfig,
    fonts: FontRegistry,
    cache: GlyphCache,
    atlas: GlyphAtlas,
    batch: TextBatch,
    viewport: Viewport,
    counters: Counters,
}

impl TextEngine {
    pub fn new(config: TextConfig, viewport: Viewport) -> Self {
        tracing::debug!(
            "Creating text engine: {}x{} atlas, {} cache slots, {} glyphs per batch",
            config.atlas_size,
            config.atlas_size,
            config.cache_slots,
            config.max_chars_per_batch
        );
        Self {
            fonts: FontRegistry::new(config.max_fonts),
            cache: GlyphCache::new(config.cache_slots),
            atlas: GlyphAtlas::new(config.atlas_size),
            batch: TextBatch::new(config.max_chars_per_batch),
            viewport,
            counters: Counters::default(),
            config,
        }
    }

    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    pub fn load_font(&mut self, path: impl AsRef<Path>, pixel_size: f32) -> TextResult<FontId> {
        self.fonts.load_font(path, pixel_size)
    }

    /// See [`FontRegistry::load_first`].
    pub fn load_first<P: AsRef<Path>>(
        &mut self,
        candidates: &[P],
        pixel_size: f32,
    ) -> TextResult<FontId> {
        self.fonts.load_first(candidates, pixel_size)
    }

    pub fn load_font_bytes(&mut self, bytes: &[u8], pixel_size: f32) -> TextResult<FontId> {
        self.fonts.load_font_bytes(bytes, pixel_size)
    }

    pub fn register_face(
        &mut self,
        face: Box<dyn OutlineFace>,
        pixel_size: f32,
        path: Option<PathBuf>,
    ) -> TextResult<FontId> {
        self.fonts.register_face(face, pixel_size, path)
    }

    pub fn set_default_font(&mut self, font: FontId) -> TextResult<()> {
        self.fonts.set_default_font(font)
    }

    pub fn default_font(&self) -> Option<FontId> {
        self.fonts.default_font()
    }

    pub fn get_font(&self, font: FontId) -> Option<&Font> {
        self.fonts.get_font(font)
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Screen size used for NDC conversion from the next quad on.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Cached glyph, rasterizing it on first use. `None` when the font is
    /// unknown. A glyph the atlas had no room for comes back blank.
    pub fn glyph(&mut self, codepoint: char, font: FontId) -> Option<Glyph> {
        let font = self.fonts.get_font(font)?;
        Some(resolve_glyph(
            &mut self.cache,
            &mut self.atlas,
            &mut self.counters,
            font,
            codepoint,
        ))
    }

    /// Start a frame: drop any stale batch and push atlas changes made
    /// since the last upload.
    pub fn begin_frame(&mut self, target: &mut dyn TextTarget) {
        target.begin_frame();
        self.batch.reset();
        self.counters.frame_draw_calls = 0;
        upload_atlas(&mut self.atlas, &mut self.counters, target);
    }

    /// Lay out `text` starting with the pen at `position`, whose y is the
    /// baseline, and return the final pen position.
    ///
    /// `\n` returns the pen to `position.x` and moves it down one line
    /// height. Malformed UTF-8 draws U+FFFD.
    pub fn add_string(
        &mut self,
        target: &mut dyn TextTarget,
        text: &[u8],
        position: Vec2,
        color: Color,
        font: Option<FontId>,
    ) -> Vec2 {
        profile_function!();

        let Some(font) = self.fonts.resolve(font) else {
            tracing::warn!("No font available, dropping {} bytes of text", text.len());
            return position;
        };
        let font_id = font.id();
        let mut pen = position;

        for codepoint in utf8::chars(text).map(|d| d.codepoint) {
            if codepoint == '\n' {
                pen = vec2(position.x, pen.y + font.line_height());
                continue;
            }

            let glyph = resolve_glyph(
                &mut self.cache,
                &mut self.atlas,
                &mut self.counters,
                font,
                codepoint,
            );

            if !glyph.is_blank() {
                if let Some(reason) = self.batch.flush_reason(font_id, color) {
                    tracing::trace!("Flushing text batch: {:?}", reason);
                    flush_batch(&mut self.batch, &mut self.atlas, &mut self.counters, target);
                }

                let top_left = vec2(pen.x + glyph.bearing_x, pen.y - glyph.bearing_y);
                let bottom_right = top_left + vec2(glyph.width as f32, glyph.height as f32);
                self.batch.push_quad(
                    font_id,
                    color,
                    self.viewport.to_ndc(top_left),
                    self.viewport.to_ndc(bottom_right),
                    glyph.uv,
                );
            }
            pen.x += glyph.advance;
        }
        pen
    }

    /// [`TextEngine::add_string`] for `&str`.
    pub fn add_str(
        &mut self,
        target: &mut dyn TextTarget,
        text: &str,
        position: Vec2,
        color: Color,
        font: Option<FontId>,
    ) -> Vec2 {
        self.add_string(target, text.as_bytes(), position, color, font)
    }

    /// Draw the current batch, if any.
    pub fn flush(&mut self, target: &mut dyn TextTarget) {
        flush_batch(&mut self.batch, &mut self.atlas, &mut self.counters, target);
    }

    pub fn end_frame(&mut self, target: &mut dyn TextTarget) {
        if !self.batch.is_empty() {
            tracing::trace!("Flushing text batch: {:?}", FlushReason::FrameEnd);
        }
        flush_batch(&mut self.batch, &mut self.atlas, &mut self.counters, target);
        self.counters.frames += 1;
    }

    /// Width of the widest line in `text`, counting at most `max_chars`
    /// codepoints when given. Glyphs are rasterized on a miss.
    pub fn measure_width(
        &mut self,
        text: &[u8],
        font: Option<FontId>,
        max_chars: Option<usize>,
    ) -> f32 {
        self.measure_lines(text, font, max_chars).x
    }

    /// Widest line and total height of `text`.
    pub fn measure(&mut self, text: &[u8], font: Option<FontId>) -> Vec2 {
        self.measure_lines(text, font, None)
    }

    fn measure_lines(&mut self, text: &[u8], font: Option<FontId>, max_chars: Option<usize>) -> Vec2 {
        profile_scope!("measure_text");

        let Some(font) = self.fonts.resolve(font) else {
            return Vec2::ZERO;
        };
        let (mut widest, mut line, mut lines) = (0.0f32, 0.0f32, 1u32);
        for codepoint in utf8::chars(text)
            .map(|d| d.codepoint)
            .take(max_chars.unwrap_or(usize::MAX))
        {
            if codepoint == '\n' {
                widest = widest.max(line);
                line = 0.0;
                lines += 1;
                continue;
            }
            line += resolve_glyph(
                &mut self.cache,
                &mut self.atlas,
                &mut self.counters,
                font,
                codepoint,
            )
            .advance;
        }
        vec2(widest.max(line), lines as f32 * font.line_height())
    }

    /// Baseline-to-baseline distance of `font`, or of the default font.
    pub fn line_height(&self, font: Option<FontId>) -> TextResult<f32> {
        match self.fonts.resolve(font) {
            Some(font) => Ok(font.line_height()),
            None => Err(TextError::UnknownFont(
                font.or(self.fonts.default_font()).unwrap_or(FontId::new(0)),
            )),
        }
    }

    pub fn stats(&self) -> TextStats {
        let c = self.counters;
        TextStats {
            cache: self.cache.stats(),
            dynamic_generations: c.dynamic_generations,
            atlas_full_failures: c.atlas_full_failures,
            atlas_uploads: c.atlas_uploads,
            draw_calls: c.draw_calls,
            frame_draw_calls: c.frame_draw_calls,
            frames: c.frames,
            atlas_glyphs: self.atlas.glyph_count(),
            atlas_utilization: self.atlas.utilization(),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.stats();
        tracing::info!(
            "Text: {} frames, {} draws ({} last frame), {} glyphs rasterized, {} atlas uploads",
            stats.frames,
            stats.draw_calls,
            stats.frame_draw_calls,
            stats.dynamic_generations,
            stats.atlas_uploads
        );
        tracing::info!(
            "Glyph cache: {}/{} slots, {:.1}% hit rate, {} evictions",
            stats.cache.occupied,
            stats.cache.capacity,
            stats.cache.hit_rate() * 100.0,
            stats.cache.evictions
        );
        tracing::info!(
            "Glyph atlas: {} glyphs, {:.1}% of rows used, {} placements failed",
            stats.atlas_glyphs,
            stats.atlas_utilization * 100.0,
            stats.atlas_full_failures
        );
    }

    /// Zero the counters. Cached glyphs and atlas contents are kept.
    pub fn reset_stats(&mut self) {
        self.cache.reset_stats();
        self.counters = Counters::default();
    }
}

fn resolve_glyph(
    cache: &mut GlyphCache,
    atlas: &mut GlyphAtlas,
    counters: &mut Counters,
    font: &Font,
    codepoint: char,
) -> Glyph {
    if let Some(glyph) = cache.get(codepoint, font.id()) {
        return glyph;
    }

    let glyph = match raster::rasterize(font, codepoint, atlas) {
        Ok(glyph) => {
            counters.dynamic_generations += 1;
            glyph
        }
        Err(e) => {
            // Cached blank so the pen still advances and later lookups hit.
            counters.atlas_full_failures += 1;
            tracing::warn!(
                "Skipping U+{:04X} in font {}: {}",
                codepoint as u32,
                font.id().index(),
                e
            );
            Glyph::blank(font.advance(codepoint))
        }
    };
    cache.insert(codepoint, font.id(), glyph);
    glyph
}

fn upload_atlas(atlas: &mut GlyphAtlas, counters: &mut Counters, target: &mut dyn TextTarget) {
    if atlas.flush(|pixels, width, height| target.upload_atlas(pixels, width, height)) {
        counters.atlas_uploads += 1;
    }
}

fn flush_batch(
    batch: &mut TextBatch,
    atlas: &mut GlyphAtlas,
    counters: &mut Counters,
    target: &mut dyn TextTarget,
) {
    if batch.is_empty() {
        return;
    }
    profile_scope!("flush_text_batch");

    upload_atlas(atlas, counters, target);
    target.draw(batch);
    counters.draw_calls += 1;
    counters.frame_draw_calls += 1;
    batch.reset();
}
