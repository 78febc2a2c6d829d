//! Solid-colour quads in normalized device coordinates.
//!
//! Rectangles are expanded on the CPU into two triangles each and drawn
//! without an index buffer. [`RectBatch`] collects them for a frame and
//! [`RectPipeline`] draws contiguous vertex ranges of it.

use crate::{Color, GraphicsContext, Viewport};
use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use std::ops::Range;
use std::sync::Arc;
use tessera_core::profiling::profile_function;
use tessera_test_utils::{GpuBuffer, RenderContext};

/// Solid-colour shader: NDC position in, per-vertex colour out.
pub const RECT_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(in.position, 0.0, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

const VERTICES_PER_RECT: usize = 6;
const INITIAL_RECT_CAPACITY: usize = 256;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RectVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

static_assertions::const_assert_eq!(std::mem::size_of::<RectVertex>(), 24);

impl RectVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-frame rectangle vertices and their GPU buffer.
pub struct RectBatch {
    context: Arc<dyn RenderContext>,
    viewport: Viewport,
    vertices: Vec<RectVertex>,
    buffer: GpuBuffer,
}

impl RectBatch {
    pub fn new(context: Arc<dyn RenderContext>, viewport: Viewport) -> Self {
        let buffer = Self::create_buffer(context.as_ref(), INITIAL_RECT_CAPACITY * VERTICES_PER_RECT);
        Self {
            context,
            viewport,
            vertices: Vec::with_capacity(INITIAL_RECT_CAPACITY * VERTICES_PER_RECT),
            buffer,
        }
    }

    fn create_buffer(context: &dyn RenderContext, vertex_capacity: usize) -> GpuBuffer {
        context.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Rect Vertex Buffer"),
            size: (vertex_capacity * std::mem::size_of::<RectVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Drop the previous frame's rectangles.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Append a rectangle given in pixels and return its vertex range.
    pub fn push(&mut self, min: Vec2, size: Vec2, color: Color) -> Range<u32> {
        let start = self.vertices.len() as u32;
        let tl = self.viewport.to_ndc(min);
        let br = self.viewport.to_ndc(min + size);
        let color = color.to_array();
        let vertex = |x: f32, y: f32| RectVertex {
            position: [x, y],
            color,
        };

        self.vertices.extend_from_slice(&[
            vertex(tl.x, tl.y),
            vertex(br.x, tl.y),
            vertex(tl.x, br.y),
            vertex(br.x, tl.y),
            vertex(br.x, br.y),
            vertex(tl.x, br.y),
        ]);
        start..self.vertices.len() as u32
    }

    pub fn vertices(&self) -> &[RectVertex] {
        &self.vertices
    }

    pub fn rect_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_RECT
    }

    pub fn buffer(&self) -> &GpuBuffer {
        &self.buffer
    }

    /// Copy this frame's vertices to the GPU, growing the buffer if needed.
    pub fn upload(&mut self) {
        profile_function!();

        if self.vertices.is_empty() {
            return;
        }

        let bytes: &[u8] = bytemuck::cast_slice(&self.vertices);
        if bytes.len() as u64 > self.buffer.size() {
            let capacity = self.vertices.len().next_power_of_two();
            tracing::debug!("Growing rect vertex buffer to {} vertices", capacity);
            self.buffer = Self::create_buffer(self.context.as_ref(), capacity);
        }
        self.context.write_buffer(&self.buffer, 0, bytes);
    }
}

/// Render pipeline for [`RectBatch`] vertices.
pub struct RectPipeline {
    pipeline: wgpu::RenderPipeline,
}

impl RectPipeline {
    pub fn new(context: &GraphicsContext, target_format: wgpu::TextureFormat) -> Self {
        let shader = context
            .device()
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Rect Shader"),
                source: wgpu::ShaderSource::Wgsl(RECT_SHADER.into()),
            });

        let layout = context
            .device()
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Rect Pipeline Layout"),
                bind_group_layouts: &[],
                push_constant_ranges: &[],
            });

        let pipeline = context
            .device()
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Rect Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[RectVertex::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: target_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        Self { pipeline }
    }

    /// Draw a vertex range previously returned by [`RectBatch::push`].
    pub fn draw(&self, pass: &mut wgpu::RenderPass, batch: &RectBatch, vertices: Range<u32>) {
        if vertices.is_empty() {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, batch.buffer().as_wgpu().slice(..));
        pass.draw(vertices, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use tessera_test_utils::MockRenderContext;

    fn batch() -> (Arc<MockRenderContext>, RectBatch) {
        let mock = Arc::new(MockRenderContext::new());
        let batch = RectBatch::new(mock.clone(), Viewport::new(800, 600));
        (mock, batch)
    }

    #[test]
    fn test_full_screen_rect_covers_ndc() {
        let (_, mut batch) = batch();
        let range = batch.push(Vec2::ZERO, vec2(800.0, 600.0), Color::RED);

        assert_eq!(range, 0..6);
        let v = batch.vertices();
        assert_eq!(v[0].position, [-1.0, 1.0]);
        assert_eq!(v[4].position, [1.0, -1.0]);
        assert!(v.iter().all(|v| v.color == [1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_ranges_are_contiguous() {
        let (_, mut batch) = batch();
        let a = batch.push(Vec2::ZERO, Vec2::ONE, Color::WHITE);
        let b = batch.push(Vec2::ONE, Vec2::ONE, Color::WHITE);
        assert_eq!(a.end, b.start);
        assert_eq!(batch.rect_count(), 2);
    }

    #[test]
    fn test_upload_skips_empty_frames() {
        let (mock, mut batch) = batch();
        batch.upload();
        assert_eq!(mock.count_buffer_writes(), 0);

        batch.push(Vec2::ZERO, Vec2::ONE, Color::WHITE);
        batch.upload();
        assert_eq!(mock.count_buffer_writes(), 1);
    }

    #[test]
    fn test_upload_grows_buffer() {
        let (mock, mut batch) = batch();
        for i in 0..(INITIAL_RECT_CAPACITY + 1) {
            batch.push(vec2(i as f32, 0.0), Vec2::ONE, Color::WHITE);
        }
        batch.upload();

        assert_eq!(mock.count_buffer_creates(), 2);
        assert!(batch.buffer().size() >= (batch.vertices().len() * 24) as u64);
    }
}
