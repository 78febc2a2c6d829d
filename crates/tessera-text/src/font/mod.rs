//! Font registry and per-font pixel metrics.

mod face;

pub use face::{BitmapBox, BlockFace, FontdueFace, OutlineFace, VerticalMetrics};

use std::path::{Path, PathBuf};

use crate::error::{TextError, TextResult};

/// Index of a font in its [`FontRegistry`]. Stable for the registry's life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(u16);

impl FontId {
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u16 {
        self.0
    }
}

/// A loaded face at one pixel size.
///
/// Metrics are in pixels with y growing up, so `descent` is negative.
pub struct Font {
    id: FontId,
    path: Option<PathBuf>,
    pixel_size: f32,
    scale: f32,
    ascent: f32,
    descent: f32,
    line_gap: f32,
    face: Box<dyn OutlineFace>,
}

impl Font {
    fn new(
        id: FontId,
        face: Box<dyn OutlineFace>,
        pixel_size: f32,
        path: Option<PathBuf>,
    ) -> TextResult<Self> {
        if !(pixel_size.is_finite() && pixel_size > 0.0) {
            return Err(TextError::InvalidPixelSize(pixel_size));
        }
        let vm = face.vertical_metrics();
        let extent = vm.ascent - vm.descent;
        if !(extent.is_finite() && extent > 0.0) {
            return Err(TextError::InvalidFont {
                path: path.unwrap_or_default(),
                reason: format!("degenerate vertical metrics {vm:?}"),
            });
        }

        // pixel_size spans ascent to descent
        let scale = pixel_size / extent;
        Ok(Self {
            id,
            path,
            pixel_size,
            scale,
            ascent: vm.ascent * scale,
            descent: vm.descent * scale,
            line_gap: vm.line_gap * scale,
            face,
        })
    }

    pub fn id(&self) -> FontId {
        self.id
    }

    /// Where the font was loaded from, for diagnostics.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    /// Pixels per design unit.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn descent(&self) -> f32 {
        self.descent
    }

    pub fn line_gap(&self) -> f32 {
        self.line_gap
    }

    /// Baseline-to-baseline distance.
    pub fn line_height(&self) -> f32 {
        self.ascent - self.descent + self.line_gap
    }

    /// Advance of `codepoint` in pixels.
    pub fn advance(&self, codepoint: char) -> f32 {
        self.face.advance_width(codepoint) * self.scale
    }

    /// Baseline that vertically centres the font's ascent-to-descent box
    /// inside a box starting at `top` with the given `height`.
    pub fn centered_baseline(&self, top: f32, height: f32) -> f32 {
        top + (height - (self.ascent - self.descent)) * 0.5 + self.ascent
    }

    pub fn face(&self) -> &dyn OutlineFace {
        self.face.as_ref()
    }
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("pixel_size", &self.pixel_size)
            .field("scale", &self.scale)
            .field("line_height", &self.line_height())
            .finish_non_exhaustive()
    }
}

/// Fixed-capacity list of loaded fonts.
///
/// A font's id is its index. The first font registered becomes the default
/// unless [`FontRegistry::set_default_font`] picks another. Fonts are only
/// freed when the registry is dropped.
pub struct FontRegistry {
    fonts: Vec<Font>,
    capacity: usize,
    default_font: Option<FontId>,
}

impl FontRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            fonts: Vec::with_capacity(capacity),
            capacity: capacity.min(u16::MAX as usize),
            default_font: None,
        }
    }

    /// Read, parse and register a TrueType/OpenType file.
    pub fn load_font(&mut self, path: impl AsRef<Path>, pixel_size: f32) -> TextResult<FontId> {
        let path = path.as_ref();
        self.check_capacity()?;

        let face = std::fs::read(path)
            .map_err(|source| TextError::Io {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|bytes| {
                FontdueFace::from_bytes(&bytes).map_err(|reason| TextError::InvalidFont {
                    path: path.to_path_buf(),
                    reason,
                })
            })
            .inspect_err(|e| tracing::warn!("{}", e))?;
        self.register_face(Box::new(face), pixel_size, Some(path.to_path_buf()))
    }

    /// Register font data already in memory.
    pub fn load_font_bytes(&mut self, bytes: &[u8], pixel_size: f32) -> TextResult<FontId> {
        self.check_capacity()?;
        let face = FontdueFace::from_bytes(bytes).map_err(|reason| TextError::InvalidFont {
            path: PathBuf::from("<memory>"),
            reason,
        })?;
        self.register_face(Box::new(face), pixel_size, None)
    }

    /// Register any outline backend.
    pub fn register_face(
        &mut self,
        face: Box<dyn OutlineFace>,
        pixel_size: f32,
        path: Option<PathBuf>,
    ) -> TextResult<FontId> {
        self.check_capacity()?;

        let id = FontId(self.fonts.len() as u16);
        let font = Font::new(id, face, pixel_size, path)?;
        tracing::info!(
            "Loaded font {} from {} at {}px (line height {:.1})",
            id.index(),
            font.path().map_or("<memory>".into(), |p| p.display().to_string()),
            pixel_size,
            font.line_height()
        );

        self.fonts.push(font);
        if self.default_font.is_none() {
            self.default_font = Some(id);
        }
        Ok(id)
    }

    /// Try each candidate path in order and keep the first that loads.
    pub fn load_first<P: AsRef<Path>>(
        &mut self,
        candidates: &[P],
        pixel_size: f32,
    ) -> TextResult<FontId> {
        let mut tried = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match self.load_font(candidate, pixel_size) {
                Ok(id) => return Ok(id),
                Err(e @ (TextError::RegistryFull { .. } | TextError::InvalidPixelSize(_))) => {
                    return Err(e);
                }
                Err(_) => tried.push(candidate.as_ref().to_path_buf()),
            }
        }
        tracing::warn!("No usable font among {} candidates", tried.len());
        Err(TextError::NoFontFound { tried })
    }

    fn check_capacity(&self) -> TextResult<()> {
        if self.fonts.len() >= self.capacity {
            tracing::warn!("Font registry full ({} fonts)", self.capacity);
            return Err(TextError::RegistryFull {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    pub fn get_font(&self, id: FontId) -> Option<&Font> {
        self.fonts.get(id.index() as usize)
    }

    pub fn set_default_font(&mut self, id: FontId) -> TextResult<()> {
        if self.get_font(id).is_none() {
            return Err(TextError::UnknownFont(id));
        }
        self.default_font = Some(id);
        Ok(())
    }

    pub fn default_font(&self) -> Option<FontId> {
        self.default_font
    }

    /// `font`, or the default font when `None`.
    pub fn resolve(&self, font: Option<FontId>) -> Option<&Font> {
        self.get_font(font.or(self.default_font)?)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Font> {
        self.fonts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_blocks(count: usize) -> FontRegistry {
        let mut registry = FontRegistry::new(16);
        for _ in 0..count {
            registry.register_face(Box::new(BlockFace), 16.0, None).unwrap();
        }
        registry
    }

    #[test]
    fn test_scale_spans_ascent_to_descent() {
        let registry = registry_with_blocks(1);
        let font = registry.get_font(FontId::new(0)).unwrap();

        assert_eq!(font.scale(), 0.016);
        assert!((font.ascent() - 12.8).abs() < 1e-4);
        assert!((font.descent() + 3.2).abs() < 1e-4);
        assert!((font.line_height() - 16.0).abs() < 1e-4);
        assert!((font.advance('A') - 8.0).abs() < 1e-5);
        assert!((font.advance(' ') - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_ids_are_indices_and_first_is_default() {
        let mut registry = registry_with_blocks(2);
        assert_eq!(registry.default_font(), Some(FontId::new(0)));
        assert_eq!(registry.get_font(FontId::new(1)).unwrap().id(), FontId::new(1));

        registry.set_default_font(FontId::new(1)).unwrap();
        assert_eq!(registry.resolve(None).unwrap().id(), FontId::new(1));
        assert_eq!(registry.resolve(Some(FontId::new(0))).unwrap().id(), FontId::new(0));
    }

    #[test]
    fn test_set_default_out_of_range() {
        let mut registry = registry_with_blocks(1);
        assert!(matches!(
            registry.set_default_font(FontId::new(3)),
            Err(TextError::UnknownFont(id)) if id == FontId::new(3)
        ));
        assert_eq!(registry.default_font(), Some(FontId::new(0)));
    }

    #[test]
    fn test_capacity_enforced() {
        let mut registry = FontRegistry::new(2);
        registry.register_face(Box::new(BlockFace), 12.0, None).unwrap();
        registry.register_face(Box::new(BlockFace), 24.0, None).unwrap();
        let err = registry.register_face(Box::new(BlockFace), 32.0, None).unwrap_err();
        assert!(matches!(err, TextError::RegistryFull { capacity: 2 }));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_rejects_bad_pixel_size() {
        let mut registry = FontRegistry::new(4);
        for size in [0.0, -4.0, f32::NAN] {
            assert!(matches!(
                registry.register_face(Box::new(BlockFace), size, None),
                Err(TextError::InvalidPixelSize(_))
            ));
        }
        assert!(registry.is_empty());
        assert_eq!(registry.default_font(), None);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut registry = FontRegistry::new(4);
        let err = registry
            .load_font("/nonexistent/tessera/font.ttf", 16.0)
            .unwrap_err();
        assert!(matches!(err, TextError::Io { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_invalid_font() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"\x00\x01\x00\x00garbage").unwrap();

        let mut registry = FontRegistry::new(4);
        let err = registry.load_font(file.path(), 16.0).unwrap_err();
        assert!(matches!(err, TextError::InvalidFont { .. }));
    }

    #[test]
    fn test_load_first_reports_every_candidate() {
        let mut registry = FontRegistry::new(4);
        let err = registry
            .load_first(&["/nonexistent/a.ttf", "/nonexistent/b.ttf"], 16.0)
            .unwrap_err();
        match err {
            TextError::NoFontFound { tried } => assert_eq!(tried.len(), 2),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_centered_baseline() {
        let registry = registry_with_blocks(1);
        let font = registry.get_font(FontId::new(0)).unwrap();
        // 16px of font inside a 40px box leaves 12px above, then 12.8px ascent.
        let baseline = font.centered_baseline(100.0, 40.0);
        assert!((baseline - 124.8).abs() < 1e-4);
    }
}
