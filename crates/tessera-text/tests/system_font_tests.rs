//! Integration tests against a real TrueType file.
//!
//! Each test returns early when no common system font is installed.

use std::sync::Arc;

use tessera_core::math::{Vec2, vec2};
use tessera_render::{Color, Viewport};
use tessera_test_utils::MockRenderContext;
use tessera_text::{FontId, TextConfig, TextEngine, TextError, TextFrame, TextTarget};

const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn engine_with_system_font() -> Option<(TextEngine, FontId)> {
    let mut engine = TextEngine::new(TextConfig::small(), Viewport::new(800, 600));
    match engine.load_first(CANDIDATES, 16.0) {
        Ok(id) => Some((engine, id)),
        Err(TextError::NoFontFound { .. }) => {
            eprintln!("no system font found, skipping");
            None
        }
        Err(e) => panic!("unexpected error: {e}"),
    }
}

#[test]
fn test_real_font_metrics() {
    let Some((engine, id)) = engine_with_system_font() else {
        return;
    };
    let font = engine.get_font(id).unwrap();

    assert!(font.ascent() > 0.0);
    assert!(font.descent() < 0.0);
    // pixel size spans ascent to descent
    assert!((font.ascent() - font.descent() - 16.0).abs() < 1e-3);
    assert!(font.line_height() >= 16.0);
    assert!(font.advance('W') > font.advance('i'));
}

#[test]
fn test_real_font_ascii_line() {
    let Some((mut engine, _)) = engine_with_system_font() else {
        return;
    };
    let mock = Arc::new(MockRenderContext::new());
    let mut frame = TextFrame::new(mock.clone(), engine.config().atlas_size, 64);

    engine.begin_frame(&mut frame);
    let pen = engine.add_str(&mut frame, "Hi", Vec2::ZERO, Color::WHITE, None);
    engine.end_frame(&mut frame);

    assert_eq!(frame.draws().len(), 1);
    assert_eq!(frame.draws()[0].indices, 0..12);
    assert_eq!(frame.vertex_count(), 8);
    assert_eq!(mock.count_texture_writes(), 1);
    assert!(pen.x > 0.0);
}

#[test]
fn test_real_font_space_is_blank() {
    let Some((mut engine, id)) = engine_with_system_font() else {
        return;
    };
    let space = engine.glyph(' ', id).unwrap();
    assert!(space.is_blank());
    assert!(space.advance > 0.0);
    assert_eq!(engine.atlas().glyph_count(), 0);
}

#[test]
fn test_real_font_descender_sits_below_baseline() {
    let Some((mut engine, id)) = engine_with_system_font() else {
        return;
    };
    let g = engine.glyph('g', id).unwrap();
    let x = engine.glyph('x', id).unwrap();

    assert!(g.bearing_y - (g.height as f32) < 0.0);
    assert!(x.bearing_y > 0.0);
    assert!(g.uv[2] > g.uv[0] && g.uv[3] > g.uv[1]);
}

#[test]
fn test_real_font_measure_matches_pen() {
    let Some((mut engine, _)) = engine_with_system_font() else {
        return;
    };

    struct Discard;
    impl TextTarget for Discard {
        fn upload_atlas(&mut self, _: &[u8], _: u32, _: u32) {}
        fn draw(&mut self, _: &tessera_text::TextBatch) {}
    }

    let text = "Sphinx of black quartz";
    let width = engine.measure_width(text.as_bytes(), None, None);
    let pen = engine.add_str(&mut Discard, text, vec2(5.0, 0.0), Color::WHITE, None);
    assert!((pen.x - 5.0 - width).abs() < 1e-3);
}
