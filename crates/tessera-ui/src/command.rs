//! Draw commands produced by an external layout engine.
//!
//! The list is ordered back to front and consumed as-is; nothing here sorts
//! or culls.

use glam::{Vec2, vec2};
use tessera_render::Color;
use tessera_text::FontId;

/// Axis-aligned box in screen pixels, y down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min(&self) -> Vec2 {
        vec2(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn max(&self) -> Vec2 {
        self.min() + self.size()
    }
}

/// Per-side border thickness in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BorderWidths {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl BorderWidths {
    pub const fn uniform(width: f32) -> Self {
        Self {
            left: width,
            right: width,
            top: width,
            bottom: width,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextData {
    /// UTF-8, possibly malformed.
    pub text: Vec<u8>,
    /// Size the layout engine measured with. Glyphs are drawn at the
    /// resolved font's own pixel size.
    pub font_size: f32,
    pub color: Color,
    /// `None` selects the default font.
    pub font: Option<FontId>,
}

/// Type-specific payload of a [`RenderCommand`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommandData {
    None,
    Rectangle { color: Color },
    Text(TextData),
    /// Drawn as a placeholder quad in `background`.
    Image { background: Color },
    Border { color: Color, widths: BorderWidths },
    ScissorStart,
    ScissorEnd,
    /// Drawn as a quad in `background`.
    Custom { background: Color },
}

/// Command tag, mostly for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    None,
    Rectangle,
    Text,
    Image,
    Border,
    ScissorStart,
    ScissorEnd,
    Custom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderCommand {
    pub bounding_box: BoundingBox,
    pub data: CommandData,
}

impl RenderCommand {
    pub fn rectangle(bounding_box: BoundingBox, color: Color) -> Self {
        Self {
            bounding_box,
            data: CommandData::Rectangle { color },
        }
    }

    pub fn text(
        bounding_box: BoundingBox,
        text: impl Into<Vec<u8>>,
        font_size: f32,
        color: Color,
        font: Option<FontId>,
    ) -> Self {
        Self {
            bounding_box,
            data: CommandData::Text(TextData {
                text: text.into(),
                font_size,
                color,
                font,
            }),
        }
    }

    pub fn image(bounding_box: BoundingBox, background: Color) -> Self {
        Self {
            bounding_box,
            data: CommandData::Image { background },
        }
    }

    pub fn border(bounding_box: BoundingBox, color: Color, widths: BorderWidths) -> Self {
        Self {
            bounding_box,
            data: CommandData::Border { color, widths },
        }
    }

    pub fn scissor_start(bounding_box: BoundingBox) -> Self {
        Self {
            bounding_box,
            data: CommandData::ScissorStart,
        }
    }

    pub fn scissor_end() -> Self {
        Self {
            bounding_box: BoundingBox::default(),
            data: CommandData::ScissorEnd,
        }
    }

    pub fn custom(bounding_box: BoundingBox, background: Color) -> Self {
        Self {
            bounding_box,
            data: CommandData::Custom { background },
        }
    }

    pub fn none() -> Self {
        Self {
            bounding_box: BoundingBox::default(),
            data: CommandData::None,
        }
    }

    pub fn command_type(&self) -> CommandType {
        match self.data {
            CommandData::None => CommandType::None,
            CommandData::Rectangle { .. } => CommandType::Rectangle,
            CommandData::Text(_) => CommandType::Text,
            CommandData::Image { .. } => CommandType::Image,
            CommandData::Border { .. } => CommandType::Border,
            CommandData::ScissorStart => CommandType::ScissorStart,
            CommandData::ScissorEnd => CommandType::ScissorEnd,
            CommandData::Custom { .. } => CommandType::Custom,
        }
    }
}

/// Edge rectangles of a border, as `(min, size)` pairs.
///
/// Top and bottom span the full width; left and right fill the height
/// between them, so no pixel is covered twice. Zero-width sides are
/// omitted.
pub fn border_edges(bounds: &BoundingBox, widths: &BorderWidths) -> Vec<(Vec2, Vec2)> {
    let BoundingBox { x, y, .. } = *bounds;
    let (width, height) = (bounds.width.max(0.0), bounds.height.max(0.0));
    let top = widths.top.clamp(0.0, height);
    let bottom = widths.bottom.clamp(0.0, height - top);
    let inner = height - top - bottom;

    let edges = [
        (vec2(x, y), vec2(width, top)),
        (vec2(x, y + height - bottom), vec2(width, bottom)),
        (vec2(x, y + top), vec2(widths.left.clamp(0.0, width), inner)),
        (
            vec2(x + width - widths.right.clamp(0.0, width), y + top),
            vec2(widths.right.clamp(0.0, width), inner),
        ),
    ];
    edges
        .into_iter()
        .filter(|(_, size)| size.x > 0.0 && size.y > 0.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_types() {
        let bb = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(RenderCommand::rectangle(bb, Color::RED).command_type(), CommandType::Rectangle);
        assert_eq!(
            RenderCommand::text(bb, "hi", 16.0, Color::WHITE, None).command_type(),
            CommandType::Text
        );
        assert_eq!(RenderCommand::scissor_end().command_type(), CommandType::ScissorEnd);
        assert_eq!(RenderCommand::none().command_type(), CommandType::None);
    }

    #[test]
    fn test_uniform_border_edges_do_not_overlap() {
        let bb = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        let edges = border_edges(&bb, &BorderWidths::uniform(2.0));

        assert_eq!(
            edges,
            vec![
                (vec2(10.0, 20.0), vec2(100.0, 2.0)),
                (vec2(10.0, 68.0), vec2(100.0, 2.0)),
                (vec2(10.0, 22.0), vec2(2.0, 46.0)),
                (vec2(108.0, 22.0), vec2(2.0, 46.0)),
            ]
        );
        let area: f32 = edges.iter().map(|(_, s)| s.x * s.y).sum();
        assert_eq!(area, 100.0 * 50.0 - 96.0 * 46.0);
    }

    #[test]
    fn test_missing_sides_are_skipped() {
        let bb = BoundingBox::new(0.0, 0.0, 40.0, 40.0);
        let widths = BorderWidths {
            bottom: 3.0,
            ..Default::default()
        };
        let edges = border_edges(&bb, &widths);
        assert_eq!(edges, vec![(vec2(0.0, 37.0), vec2(40.0, 3.0))]);
    }

    #[test]
    fn test_oversized_border_is_clamped() {
        let bb = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let edges = border_edges(&bb, &BorderWidths::uniform(20.0));
        // top takes everything, nothing is left for the other sides
        assert_eq!(edges, vec![(vec2(0.0, 0.0), vec2(10.0, 10.0))]);
    }
}
