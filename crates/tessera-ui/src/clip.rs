//! Scissor rectangles for `SCISSOR_START` / `SCISSOR_END`.

use tessera_render::Viewport;

use crate::command::BoundingBox;

/// A clip rectangle in physical pixel coordinates.
///
/// Used directly with `RenderPass::set_scissor_rect`, which rejects
/// rectangles that leave the render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole render target, i.e. no clipping.
    pub fn full(viewport: Viewport) -> Self {
        Self::new(0, 0, viewport.width, viewport.height)
    }

    /// Intersect `bounds` with the screen, rounding outward to whole
    /// pixels. `None` when nothing of it is left.
    pub fn clamped(bounds: &BoundingBox, viewport: Viewport) -> Option<Self> {
        let (screen_w, screen_h) = (viewport.width as f32, viewport.height as f32);
        let x0 = bounds.x.floor().clamp(0.0, screen_w);
        let y0 = bounds.y.floor().clamp(0.0, screen_h);
        let x1 = (bounds.x + bounds.width).ceil().clamp(0.0, screen_w);
        let y1 = (bounds.y + bounds.height).ceil().clamp(0.0, screen_h);

        // also rejects NaN
        if !(x1 > x0 && y1 > y0) {
            return None;
        }
        Some(Self::new(
            x0 as u32,
            y0 as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Viewport = Viewport {
        width: 800,
        height: 600,
    };

    #[test]
    fn test_inside_screen_is_unchanged() {
        let clip = ScissorRect::clamped(&BoundingBox::new(10.0, 20.0, 100.0, 50.0), SCREEN);
        assert_eq!(clip, Some(ScissorRect::new(10, 20, 100, 50)));
    }

    #[test]
    fn test_overhang_is_clamped() {
        let clip = ScissorRect::clamped(&BoundingBox::new(700.0, -20.0, 300.0, 100.0), SCREEN);
        assert_eq!(clip, Some(ScissorRect::new(700, 0, 100, 80)));
    }

    #[test]
    fn test_fractional_bounds_round_outward() {
        let clip = ScissorRect::clamped(&BoundingBox::new(10.5, 10.5, 5.0, 5.0), SCREEN);
        assert_eq!(clip, Some(ScissorRect::new(10, 10, 6, 6)));
    }

    #[test]
    fn test_degenerate_is_rejected() {
        for bounds in [
            BoundingBox::new(10.0, 10.0, 0.0, 50.0),
            BoundingBox::new(900.0, 10.0, 50.0, 50.0),
            BoundingBox::new(10.0, -80.0, 50.0, 40.0),
            BoundingBox::new(f32::NAN, 0.0, 10.0, 10.0),
        ] {
            assert_eq!(ScissorRect::clamped(&bounds, SCREEN), None, "{bounds:?}");
        }
    }

    #[test]
    fn test_full() {
        let full = ScissorRect::full(SCREEN);
        assert_eq!(full, ScissorRect::new(0, 0, 800, 600));
    }
}
