/// An RGBA colour with `f32` components in `0.0..=1.0`.
///
/// `#[repr(C)]` and `Pod`, so it is written straight into the per-draw text
/// colour uniform and the rectangle vertex stream.
///
/// ```
/// use tessera_render::Color;
///
/// let title = Color::from_hex(0xE0E0E0);
/// let faded = Color::rgba(1.0, 1.0, 1.0, 0.5);
/// assert_eq!(Color::from_rgba_u8(255, 0, 0, 255), Color::RED);
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 8-bit channels mapped to `0.0..=1.0`.
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Channels already expressed on a `0.0..=255.0` scale, as layout
    /// engines commonly hand them out.
    pub fn from_rgba_255(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::rgba(r / 255.0, g / 255.0, b / 255.0, a / 255.0)
    }

    /// 24-bit RGB hex value, e.g. `0xFF8800`.
    pub fn from_hex(hex: u32) -> Self {
        Self::from_rgba_u8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 255)
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_channels() {
        let c = Color::from_hex(0xFF8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_from_255_scale() {
        let c = Color::from_rgba_255(255.0, 0.0, 51.0, 255.0);
        assert_eq!(c.to_array(), [1.0, 0.0, 0.2, 1.0]);
    }
}
