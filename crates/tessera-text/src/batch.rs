//! Glyph quad accumulation for one draw call.
//!
//! A [`TextBatch`] holds quads that share one font and one colour. The
//! engine flushes it into a [`TextTarget`] when the font or colour changes,
//! when it is full, and at the end of the frame.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use tessera_render::{Color, wgpu};

use crate::font::FontId;

/// Upper bound on glyphs per batch so indices fit in `u16`.
pub const MAX_BATCH_GLYPHS: usize = (u16::MAX as usize + 1) / 4 - 1;

/// Two triangles over the quad's top-left, top-right, bottom-left and
/// bottom-right vertices.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 1, 3, 2];

/// Glyph vertex: NDC position and atlas UV.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TextVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

static_assertions::const_assert_eq!(std::mem::size_of::<TextVertex>(), 16);

impl TextVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TextVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Receives atlas uploads and finished batches.
///
/// One [`TextTarget::draw`] call is one GPU draw.
pub trait TextTarget {
    fn begin_frame(&mut self) {}

    /// Replace the atlas texture contents with `pixels` (one byte per pixel).
    fn upload_atlas(&mut self, pixels: &[u8], width: u32, height: u32);

    fn draw(&mut self, batch: &TextBatch);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchState {
    Empty,
    Accumulating,
}

/// Why a non-empty batch had to be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushReason {
    Full,
    FontChanged,
    ColorChanged,
    FrameEnd,
}

pub struct TextBatch {
    vertices: Vec<TextVertex>,
    indices: Vec<u16>,
    font: Option<FontId>,
    color: Color,
    max_glyphs: usize,
}

impl TextBatch {
    /// Storage for `max_glyphs` quads is reserved up front.
    pub fn new(max_glyphs: usize) -> Self {
        let max_glyphs = max_glyphs.clamp(1, MAX_BATCH_GLYPHS);
        Self {
            vertices: Vec::with_capacity(max_glyphs * 4),
            indices: Vec::with_capacity(max_glyphs * 6),
            font: None,
            color: Color::WHITE,
            max_glyphs,
        }
    }

    pub fn state(&self) -> BatchState {
        if self.vertices.is_empty() {
            BatchState::Empty
        } else {
            BatchState::Accumulating
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.glyph_count() >= self.max_glyphs
    }

    pub fn glyph_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn max_glyphs(&self) -> usize {
        self.max_glyphs
    }

    /// Font of the accumulated quads, `None` while empty.
    pub fn font(&self) -> Option<FontId> {
        self.font
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn vertices(&self) -> &[TextVertex] {
        &self.vertices
    }

    /// Batch-relative indices, six per quad.
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Whether appending a quad in `font`/`color` requires drawing what is
    /// already here first.
    pub fn flush_reason(&self, font: FontId, color: Color) -> Option<FlushReason> {
        if self.is_empty() {
            None
        } else if self.font != Some(font) {
            Some(FlushReason::FontChanged)
        } else if self.color != color {
            Some(FlushReason::ColorChanged)
        } else if self.is_full() {
            Some(FlushReason::Full)
        } else {
            None
        }
    }

    /// Append a quad given its top-left and bottom-right corners in NDC.
    ///
    /// The caller flushes first whenever [`TextBatch::flush_reason`] asks it
    /// to; the first quad of an empty batch sets its font and colour.
    pub fn push_quad(&mut self, font: FontId, color: Color, top_left: Vec2, bottom_right: Vec2, uv: [f32; 4]) {
        debug_assert!(self.flush_reason(font, color).is_none());
        if self.is_empty() {
            self.font = Some(font);
            self.color = color;
        }

        let [u0, v0, u1, v1] = uv;
        let base = self.vertices.len() as u16;
        self.vertices.extend_from_slice(&[
            TextVertex { position: [top_left.x, top_left.y], uv: [u0, v0] },
            TextVertex { position: [bottom_right.x, top_left.y], uv: [u1, v0] },
            TextVertex { position: [top_left.x, bottom_right.y], uv: [u0, v1] },
            TextVertex { position: [bottom_right.x, bottom_right.y], uv: [u1, v1] },
        ]);
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    /// Back to [`BatchState::Empty`], keeping allocations.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.font = None;
    }
}
