//! Trait abstracting the GPU calls made by the renderer.

use crate::gpu_types::*;
use wgpu::{
    BufferDescriptor, Extent3d, SamplerDescriptor, ShaderModuleDescriptor, TexelCopyBufferLayout,
    TextureDescriptor,
};

/// GPU resource creation and upload.
///
/// Methods take `&self` and return owned handles, so one context can be
/// shared through an `Arc` and a mock can record calls behind a mutex.
///
/// Descriptors that reference other GPU objects (pipeline layouts, bind
/// groups) are not part of this trait; those are built directly against a
/// `wgpu::Device` by code that only runs with a real adapter.
///
/// ```rust,no_run
/// use tessera_test_utils::RenderContext;
/// use wgpu::{BufferDescriptor, BufferUsages};
///
/// fn upload_quads(ctx: &dyn RenderContext, bytes: &[u8]) {
///     let buffer = ctx.create_buffer(&BufferDescriptor {
///         label: Some("quads"),
///         size: bytes.len() as u64,
///         usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
///         mapped_at_creation: false,
///     });
///     ctx.write_buffer(&buffer, 0, bytes);
/// }
/// ```
pub trait RenderContext: Send + Sync {
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer;

    /// Queue a write of `data` into `buffer` at `offset`.
    ///
    /// `offset` and `data.len()` must be multiples of
    /// `wgpu::COPY_BUFFER_ALIGNMENT`.
    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]);

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture;

    /// Queue a write of `data` into mip level 0 of `texture`, starting at the
    /// origin and covering `size`.
    fn write_texture(
        &self,
        texture: &GpuTexture,
        data: &[u8],
        layout: TexelCopyBufferLayout,
        size: Extent3d,
    );

    fn create_sampler(&self, desc: &SamplerDescriptor) -> GpuSampler;

    fn create_shader_module(&self, desc: &ShaderModuleDescriptor) -> GpuShaderModule;

    /// Required alignment of dynamic uniform buffer offsets.
    fn uniform_offset_alignment(&self) -> u32;
}
