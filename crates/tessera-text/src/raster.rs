//! Rasterize a glyph into the atlas on first use.

use tessera_core::profiling::profile_function;

use crate::atlas::GlyphAtlas;
use crate::cache::Glyph;
use crate::error::TextResult;
use crate::font::Font;

/// Rasterize `codepoint` and describe where it landed.
///
/// Glyphs with an empty bounding box consume no atlas space and come back
/// as [`Glyph::blank`] carrying their advance. Fails only with
/// `TextError::AtlasFull`, in which case nothing was written.
pub fn rasterize(font: &Font, codepoint: char, atlas: &mut GlyphAtlas) -> TextResult<Glyph> {
    profile_function!();

    let scale = font.scale();
    let face = font.face();
    let advance = font.advance(codepoint);
    let bbox = face.bitmap_box(codepoint, scale);
    if bbox.is_empty() {
        return Ok(Glyph::blank(advance));
    }

    let (width, height) = (bbox.width() as u32, bbox.height() as u32);
    let region = atlas.allocate(width, height)?;
    atlas.write_region(region, |target, stride| {
        face.rasterize(codepoint, scale, target, width as usize, height as usize, stride);
    });

    Ok(Glyph {
        width,
        height,
        advance,
        bearing_x: bbox.x0 as f32,
        // top edge sits -y0 pixels above the baseline
        bearing_y: -bbox.y0 as f32,
        uv: region.uv(atlas.width(), atlas.height()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TextError;
    use crate::font::{BlockFace, FontId, FontRegistry};

    fn block_font(pixel_size: f32) -> FontRegistry {
        let mut registry = FontRegistry::new(1);
        registry.register_face(Box::new(BlockFace), pixel_size, None).unwrap();
        registry
    }

    #[test]
    fn test_visible_glyph_lands_in_atlas() {
        let registry = block_font(16.0);
        let font = registry.get_font(FontId::new(0)).unwrap();
        let mut atlas = GlyphAtlas::new(64);

        let glyph = rasterize(font, 'A', &mut atlas).unwrap();
        assert_eq!((glyph.width, glyph.height), (6, 11));
        assert_eq!(glyph.bearing_x, 1.0);
        assert_eq!(glyph.bearing_y, 11.0);
        assert!((glyph.advance - 8.0).abs() < 1e-5);
        assert_eq!(glyph.uv, [0.0, 0.0, 6.0 / 64.0, 11.0 / 64.0]);

        assert!(atlas.is_dirty());
        assert_eq!(atlas.pixels()[0], 255);
        assert_eq!(atlas.pixels()[64 * 10 + 5], 255);
        assert_eq!(atlas.pixels()[6], 0);
    }

    #[test]
    fn test_descender_bearing() {
        let registry = block_font(16.0);
        let font = registry.get_font(FontId::new(0)).unwrap();
        let mut atlas = GlyphAtlas::new(64);

        let g = rasterize(font, 'g', &mut atlas).unwrap();
        // bitmap extends 2px under the baseline
        assert_eq!(g.bearing_y - g.height as f32, -2.0);
    }

    #[test]
    fn test_space_is_blank_and_uses_no_atlas() {
        let registry = block_font(16.0);
        let font = registry.get_font(FontId::new(0)).unwrap();
        let mut atlas = GlyphAtlas::new(64);

        let space = rasterize(font, ' ', &mut atlas).unwrap();
        assert!(space.is_blank());
        assert!((space.advance - 4.0).abs() < 1e-5);
        assert!(!atlas.is_dirty());
        assert_eq!(atlas.glyph_count(), 0);
    }

    #[test]
    fn test_atlas_full_is_reported() {
        let registry = block_font(16.0);
        let font = registry.get_font(FontId::new(0)).unwrap();
        let mut atlas = GlyphAtlas::new(8);

        let err = rasterize(font, 'A', &mut atlas).unwrap_err();
        assert!(matches!(err, TextError::AtlasFull { .. }));
        assert!(!atlas.is_dirty());
    }
}
