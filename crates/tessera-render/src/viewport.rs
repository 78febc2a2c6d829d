use glam::{Vec2, vec2};

/// Size of the render target in physical pixels.
///
/// Owns the pixel to normalized-device-coordinate mapping: x grows right
/// from -1 to 1, y grows up from -1 to 1, while pixel y grows down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Zero dimensions are raised to 1 so conversions stay finite while a
    /// window is minimised.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        vec2(self.width as f32, self.height as f32)
    }

    /// Pixel position to NDC.
    #[inline]
    pub fn to_ndc(&self, pixel: Vec2) -> Vec2 {
        vec2(
            pixel.x / self.width as f32 * 2.0 - 1.0,
            1.0 - pixel.y / self.height as f32 * 2.0,
        )
    }

    /// Vertical pixel distance expressed as an NDC distance.
    #[inline]
    pub fn ndc_height(&self, pixels: f32) -> f32 {
        pixels / self.height as f32 * 2.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
