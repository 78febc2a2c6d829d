//! GPU side of text batches.
//!
//! [`TextFrame`] is the [`TextTarget`] a renderer hands to the engine. It
//! owns the atlas texture and the vertex, index and colour-uniform buffers,
//! writes each flushed batch into them, and records one [`TextDraw`] per
//! batch for the render pass to replay.

use std::ops::Range;
use std::sync::Arc;

use tessera_core::profiling::profile_function;
use tessera_render::{Color, GpuBuffer, GpuTexture, RenderContext, wgpu};

use crate::batch::{TextBatch, TextTarget, TextVertex};

const COLOR_UNIFORM_SIZE: u64 = std::mem::size_of::<Color>() as u64;
const INITIAL_DRAWS: usize = 16;

/// One recorded draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextDraw {
    /// Range in the frame's index buffer.
    pub indices: Range<u32>,
    /// Added to every index of the batch.
    pub base_vertex: i32,
    /// Dynamic offset of this draw's colour in the uniform buffer.
    pub uniform_offset: u32,
}

pub struct TextFrame {
    context: Arc<dyn RenderContext>,
    uniform_buffer: GpuBuffer,
    index_buffer: GpuBuffer,
    vertex_buffer: GpuBuffer,
    atlas: GpuTexture,

    vertices: Vec<TextVertex>,
    indices: Vec<u16>,
    uniforms: Vec<u8>,
    uniform_stride: u64,
    draws: Vec<TextDraw>,
    generation: u64,
}

impl TextFrame {
    /// Allocate an `atlas_size` square R8 texture and buffers sized for one
    /// full batch of `glyphs_per_batch` quads.
    pub fn new(context: Arc<dyn RenderContext>, atlas_size: u32, glyphs_per_batch: usize) -> Self {
        let glyphs = glyphs_per_batch.max(1);
        let uniform_stride = (context.uniform_offset_alignment() as u64)
            .max(COLOR_UNIFORM_SIZE)
            .next_multiple_of(COLOR_UNIFORM_SIZE);

        let atlas = context.create_texture(&wgpu::TextureDescriptor {
            label: Some("Text Atlas"),
            size: wgpu::Extent3d {
                width: atlas_size,
                height: atlas_size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let vertex_buffer = create_vertex_buffer(context.as_ref(), glyphs * 4);
        let index_buffer = create_index_buffer(context.as_ref(), glyphs * 6);
        let uniform_buffer = create_uniform_buffer(context.as_ref(), INITIAL_DRAWS, uniform_stride);

        Self {
            context,
            uniform_buffer,
            index_buffer,
            vertex_buffer,
            atlas,
            vertices: Vec::with_capacity(glyphs * 4),
            indices: Vec::with_capacity(glyphs * 6),
            uniforms: Vec::with_capacity(INITIAL_DRAWS * uniform_stride as usize),
            uniform_stride,
            draws: Vec::with_capacity(INITIAL_DRAWS),
            generation: 0,
        }
    }

    pub fn draws(&self) -> &[TextDraw] {
        &self.draws
    }

    pub fn atlas(&self) -> &GpuTexture {
        &self.atlas
    }

    pub fn vertex_buffer(&self) -> &GpuBuffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &GpuBuffer {
        &self.index_buffer
    }

    pub fn uniform_buffer(&self) -> &GpuBuffer {
        &self.uniform_buffer
    }

    /// Changes whenever a buffer referenced by the bind group is replaced.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// This frame's vertices, in NDC.
    pub fn vertices(&self) -> &[TextVertex] {
        &self.vertices
    }

    fn append(&mut self, batch: &TextBatch) -> TextDraw {
        let base_vertex = self.vertices.len() as i32;
        let first_index = self.indices.len() as u32;
        let uniform_offset = self.uniforms.len() as u64;

        self.vertices.extend_from_slice(batch.vertices());
        self.indices.extend_from_slice(batch.indices());
        self.uniforms.extend_from_slice(bytemuck::bytes_of(&batch.color()));
        self.uniforms
            .resize((uniform_offset + self.uniform_stride) as usize, 0);

        TextDraw {
            indices: first_index..self.indices.len() as u32,
            base_vertex,
            uniform_offset: uniform_offset as u32,
        }
    }

    /// Write the newest draw's data, replacing any buffer it outgrew. A
    /// replaced buffer receives everything staged so far this frame.
    fn upload(&mut self, draw: &TextDraw) {
        let ctx = self.context.as_ref();

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&self.vertices);
        if vertex_bytes.len() as u64 > self.vertex_buffer.size() {
            let capacity = self.vertices.len().next_power_of_two();
            tracing::debug!("Growing text vertex buffer to {} vertices", capacity);
            self.vertex_buffer = create_vertex_buffer(ctx, capacity);
            ctx.write_buffer(&self.vertex_buffer, 0, vertex_bytes);
        } else {
            let start = draw.base_vertex as usize * std::mem::size_of::<TextVertex>();
            ctx.write_buffer(&self.vertex_buffer, start as u64, &vertex_bytes[start..]);
        }

        let index_bytes: &[u8] = bytemuck::cast_slice(&self.indices);
        if index_bytes.len() as u64 > self.index_buffer.size() {
            let capacity = self.indices.len().next_power_of_two();
            tracing::debug!("Growing text index buffer to {} indices", capacity);
            self.index_buffer = create_index_buffer(ctx, capacity);
            ctx.write_buffer(&self.index_buffer, 0, index_bytes);
        } else {
            let start = draw.indices.start as usize * std::mem::size_of::<u16>();
            ctx.write_buffer(&self.index_buffer, start as u64, &index_bytes[start..]);
        }

        if self.uniforms.len() as u64 > self.uniform_buffer.size() {
            let draws = (self.uniforms.len() as u64 / self.uniform_stride) as usize;
            let capacity = draws.next_power_of_two();
            tracing::debug!("Growing text colour buffer to {} draws", capacity);
            self.uniform_buffer = create_uniform_buffer(ctx, capacity, self.uniform_stride);
            ctx.write_buffer(&self.uniform_buffer, 0, &self.uniforms);
            self.generation += 1;
        } else {
            let start = draw.uniform_offset as usize;
            ctx.write_buffer(
                &self.uniform_buffer,
                start as u64,
                &self.uniforms[start..start + COLOR_UNIFORM_SIZE as usize],
            );
        }
    }
}

impl TextTarget for TextFrame {
    fn begin_frame(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.uniforms.clear();
        self.draws.clear();
    }

    fn upload_atlas(&mut self, pixels: &[u8], width: u32, height: u32) {
        profile_function!();
        self.context.write_texture(
            &self.atlas,
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn draw(&mut self, batch: &TextBatch) {
        profile_function!();
        let draw = self.append(batch);
        self.upload(&draw);
        self.draws.push(draw);
    }
}

fn create_vertex_buffer(ctx: &dyn RenderContext, vertices: usize) -> GpuBuffer {
    ctx.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Text Vertex Buffer"),
        size: (vertices * std::mem::size_of::<TextVertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(ctx: &dyn RenderContext, indices: usize) -> GpuBuffer {
    // copies must be 4-byte multiples; quads always add 6 indices
    let size = (indices * std::mem::size_of::<u16>()) as u64;
    ctx.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Text Index Buffer"),
        size: size.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT),
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_uniform_buffer(ctx: &dyn RenderContext, draws: usize, stride: u64) -> GpuBuffer {
    ctx.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Text Colour Uniforms"),
        size: draws as u64 * stride,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
