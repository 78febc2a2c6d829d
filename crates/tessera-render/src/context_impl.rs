//! [`RenderContext`] backed by a real device and queue.

use crate::context::GraphicsContext;
use tessera_test_utils::{GpuBuffer, GpuSampler, GpuShaderModule, GpuTexture, RenderContext};
use wgpu::{
    BufferDescriptor, Extent3d, SamplerDescriptor, ShaderModuleDescriptor, TexelCopyBufferLayout,
    TextureDescriptor,
};

impl RenderContext for GraphicsContext {
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        GpuBuffer::from_wgpu(self.device.create_buffer(desc))
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        self.queue.write_buffer(buffer.as_wgpu(), offset, data);
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        GpuTexture::from_wgpu(self.device.create_texture(desc))
    }

    fn write_texture(
        &self,
        texture: &GpuTexture,
        data: &[u8],
        layout: TexelCopyBufferLayout,
        size: Extent3d,
    ) {
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: texture.as_wgpu(),
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            layout,
            size,
        );
    }

    fn create_sampler(&self, desc: &SamplerDescriptor) -> GpuSampler {
        GpuSampler::from_wgpu(self.device.create_sampler(desc))
    }

    fn create_shader_module(&self, desc: &ShaderModuleDescriptor) -> GpuShaderModule {
        GpuShaderModule::from_wgpu(self.device.create_shader_module(desc.clone()))
    }

    fn uniform_offset_alignment(&self) -> u32 {
        self.device.limits().min_uniform_buffer_offset_alignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_test_utils::MockRenderContext;

    fn upload(ctx: &dyn RenderContext) -> GpuBuffer {
        let buffer = ctx.create_buffer(&BufferDescriptor {
            label: Some("Test Buffer"),
            size: 256,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        ctx.write_buffer(&buffer, 0, &[0u8; 64]);
        buffer
    }

    #[test]
    fn test_render_context_trait_object() {
        let mock = MockRenderContext::new();
        let buffer = upload(&mock);

        assert!(buffer.is_mock());
        assert_eq!(mock.count_buffer_creates(), 1);
        assert_eq!(mock.count_buffer_writes(), 1);
    }

    #[test]
    #[ignore] // Requires GPU
    fn test_graphics_context_as_render_context() {
        let ctx = GraphicsContext::new_sync().expect("GPU adapter");
        let buffer = upload(ctx.as_ref());
        assert_eq!(buffer.size(), 256);
        assert!(ctx.uniform_offset_alignment().is_power_of_two());
    }
}
