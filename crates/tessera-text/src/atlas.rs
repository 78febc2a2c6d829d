//! Single-channel glyph atlas with shelf packing.

use crate::error::{TextError, TextResult};

/// Empty pixels left between neighbouring glyphs, horizontally and between
/// rows, so linear sampling never bleeds across glyphs.
pub const GUTTER: u32 = 1;

/// A reserved rectangle in the atlas, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl AtlasRegion {
    /// `[u0, v0, u1, v1]` for an atlas of the given size.
    pub fn uv(&self, atlas_width: u32, atlas_height: u32) -> [f32; 4] {
        let w = atlas_width as f32;
        let h = atlas_height as f32;
        [
            self.x as f32 / w,
            self.y as f32 / h,
            (self.x + self.width) as f32 / w,
            (self.y + self.height) as f32 / h,
        ]
    }

    pub fn overlaps(&self, other: &AtlasRegion) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Row-by-row packer: glyphs fill a row left to right, and a glyph that
/// does not fit starts a new row below the tallest glyph of the current one.
#[derive(Clone, Debug)]
pub struct ShelfPacker {
    width: u32,
    height: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
}

impl ShelfPacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
            row_height: 0,
        }
    }

    /// Reserve `width` x `height` pixels, or `None` once the atlas is out
    /// of rows. A failed call leaves the cursor untouched.
    pub fn pack(&mut self, width: u32, height: u32) -> Option<AtlasRegion> {
        if width > self.width || height > self.height {
            return None;
        }

        let (mut x, mut y, mut row_height) = (self.cursor_x, self.cursor_y, self.row_height);
        if x + width > self.width {
            x = 0;
            y += row_height + GUTTER;
            row_height = 0;
        }
        if y + height > self.height {
            return None;
        }

        self.cursor_x = x + width + GUTTER;
        self.cursor_y = y;
        self.row_height = row_height.max(height);
        Some(AtlasRegion {
            x,
            y,
            width,
            height,
        })
    }

    /// Fraction of rows consumed so far.
    pub fn utilization(&self) -> f32 {
        ((self.cursor_y + self.row_height) as f32 / self.height as f32).min(1.0)
    }
}

/// CPU copy of the atlas texture plus the packer that manages it.
///
/// Writes mark the atlas dirty. [`GlyphAtlas::flush`] hands the whole pixel
/// buffer to an uploader once and clears the flag; there is no sub-region
/// tracking.
pub struct GlyphAtlas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    packer: ShelfPacker,
    dirty: bool,
    glyph_count: usize,
}

impl GlyphAtlas {
    pub fn new(size: u32) -> Self {
        Self::with_dimensions(size, size)
    }

    pub fn with_dimensions(width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
            packer: ShelfPacker::new(width, height),
            dirty: false,
            glyph_count: 0,
        }
    }

    /// Reserve space for a bitmap.
    pub fn allocate(&mut self, width: u32, height: u32) -> TextResult<AtlasRegion> {
        self.packer.pack(width, height).ok_or(TextError::AtlasFull { width, height })
    }

    /// Let `fill` write into `region`. It receives the slice starting at the
    /// region's top-left pixel and the row stride in bytes.
    pub fn write_region(&mut self, region: AtlasRegion, fill: impl FnOnce(&mut [u8], usize)) {
        if region.width == 0 || region.height == 0 {
            return;
        }
        let stride = self.width as usize;
        let start = region.y as usize * stride + region.x as usize;
        let end = (region.y + region.height - 1) as usize * stride
            + region.x as usize
            + region.width as usize;
        fill(&mut self.pixels[start..end], stride);
        self.glyph_count += 1;
        self.dirty = true;
    }

    /// Upload the whole atlas if anything changed since the last flush.
    /// Returns whether `upload` was called.
    pub fn flush(&mut self, upload: impl FnOnce(&[u8], u32, u32)) -> bool {
        if !self.dirty {
            return false;
        }
        tracing::trace!("Uploading {}x{} glyph atlas", self.width, self.height);
        upload(&self.pixels, self.width, self.height);
        self.dirty = false;
        true
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bitmaps written so far.
    pub fn glyph_count(&self) -> usize {
        self.glyph_count
    }

    pub fn utilization(&self) -> f32 {
        self.packer.utilization()
    }
}
