//! Outline-font backends.

/// Unscaled vertical metrics in font design units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerticalMetrics {
    pub ascent: f32,
    /// Negative when the face extends below the baseline.
    pub descent: f32,
    pub line_gap: f32,
}

/// Pixel bounding box of a glyph bitmap relative to the pen on the baseline.
///
/// Y grows downward: `y0` is the top edge (negative above the baseline) and
/// `y1` the bottom edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitmapBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl BitmapBox {
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    /// Whitespace and glyphs without contours.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

/// An outline font that can report metrics and rasterise coverage bitmaps.
///
/// `scale` is always pixels per design unit.
pub trait OutlineFace: Send + Sync {
    fn units_per_em(&self) -> f32;

    fn vertical_metrics(&self) -> VerticalMetrics;

    /// Horizontal advance in design units.
    fn advance_width(&self, codepoint: char) -> f32;

    fn bitmap_box(&self, codepoint: char, scale: f32) -> BitmapBox;

    /// Write an 8-bit coverage bitmap of `width` x `height` pixels into
    /// `target`, whose rows are `stride` bytes apart.
    fn rasterize(
        &self,
        codepoint: char,
        scale: f32,
        target: &mut [u8],
        width: usize,
        height: usize,
        stride: usize,
    );
}

/// [`OutlineFace`] backed by `fontdue`.
pub struct FontdueFace {
    font: fontdue::Font,
    metrics: VerticalMetrics,
}

impl FontdueFace {
    /// Parse TrueType or OpenType data.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(str::to_string)?;
        let units_per_em = font.units_per_em();
        // Asking for line metrics at one pixel per unit yields design units.
        let metrics = font
            .horizontal_line_metrics(units_per_em)
            .map(|m| VerticalMetrics {
                ascent: m.ascent,
                descent: m.descent,
                line_gap: m.line_gap,
            })
            .ok_or_else(|| "font has no horizontal line metrics".to_string())?;
        Ok(Self { font, metrics })
    }

    #[inline]
    fn px(&self, scale: f32) -> f32 {
        scale * self.font.units_per_em()
    }
}

impl OutlineFace for FontdueFace {
    fn units_per_em(&self) -> f32 {
        self.font.units_per_em()
    }

    fn vertical_metrics(&self) -> VerticalMetrics {
        self.metrics
    }

    fn advance_width(&self, codepoint: char) -> f32 {
        self.font
            .metrics(codepoint, self.font.units_per_em())
            .advance_width
    }

    fn bitmap_box(&self, codepoint: char, scale: f32) -> BitmapBox {
        let m = self.font.metrics(codepoint, self.px(scale));
        // fontdue reports ymin upward from the baseline.
        let y1 = -m.ymin;
        BitmapBox {
            x0: m.xmin,
            y0: y1 - m.height as i32,
            x1: m.xmin + m.width as i32,
            y1,
        }
    }

    fn rasterize(
        &self,
        codepoint: char,
        scale: f32,
        target: &mut [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) {
        let (m, coverage) = self.font.rasterize(codepoint, self.px(scale));
        let cols = width.min(m.width);
        for row in 0..height.min(m.height) {
            let src = &coverage[row * m.width..row * m.width + cols];
            target[row * stride..row * stride + cols].copy_from_slice(src);
        }
    }
}

/// Deterministic face that draws every visible glyph as a solid block.
///
/// 1000 units per em, ascent 800, descent -200. Whitespace advances 250
/// units and has no bitmap; everything else advances 500 units and covers
/// x 50..450, y 0..700 above the baseline. `g j p q y` also descend 150
/// units below it.
///
/// Useful headless, where no system font can be assumed.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockFace;

impl BlockFace {
    const UNITS_PER_EM: f32 = 1000.0;

    fn descends(codepoint: char) -> bool {
        matches!(codepoint, 'g' | 'j' | 'p' | 'q' | 'y')
    }
}

impl OutlineFace for BlockFace {
    fn units_per_em(&self) -> f32 {
        Self::UNITS_PER_EM
    }

    fn vertical_metrics(&self) -> VerticalMetrics {
        VerticalMetrics {
            ascent: 800.0,
            descent: -200.0,
            line_gap: 0.0,
        }
    }

    fn advance_width(&self, codepoint: char) -> f32 {
        if codepoint.is_whitespace() { 250.0 } else { 500.0 }
    }

    fn bitmap_box(&self, codepoint: char, scale: f32) -> BitmapBox {
        if codepoint.is_whitespace() || codepoint.is_control() {
            return BitmapBox::default();
        }
        let units = |v: f32| (v * scale).round() as i32;
        BitmapBox {
            x0: units(50.0),
            y0: -units(700.0),
            x1: units(450.0),
            y1: if Self::descends(codepoint) { units(150.0) } else { 0 },
        }
    }

    fn rasterize(
        &self,
        _codepoint: char,
        _scale: f32,
        target: &mut [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) {
        for row in 0..height {
            target[row * stride..row * stride + width].fill(255);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_face_boxes() {
        let face = BlockFace;
        let scale = 16.0 / 1000.0;

        let a = face.bitmap_box('A', scale);
        assert_eq!(a, BitmapBox { x0: 1, y0: -11, x1: 7, y1: 0 });
        assert_eq!((a.width(), a.height()), (6, 11));

        let g = face.bitmap_box('g', scale);
        assert_eq!(g.y1, 2);
        assert_eq!(g.height(), 13);

        assert!(face.bitmap_box(' ', scale).is_empty());
        assert!(face.bitmap_box('\t', scale).is_empty());
    }

    #[test]
    fn test_block_face_fills_only_requested_area() {
        let mut target = vec![0u8; 4 * 3];
        BlockFace.rasterize('x', 1.0, &mut target, 2, 2, 4);
        assert_eq!(target, vec![255, 255, 0, 0, 255, 255, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_fontdue_rejects_garbage() {
        assert!(FontdueFace::from_bytes(b"definitely not a font").is_err());
    }
}
