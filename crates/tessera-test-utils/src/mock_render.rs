//! Mock [`RenderContext`] that records calls instead of touching a GPU.

use crate::{gpu_types::*, render_context::RenderContext};
use parking_lot::Mutex;
use wgpu::*;

/// A recorded GPU call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    CreateBuffer {
        id: usize,
        label: Option<String>,
        size: u64,
        usage: BufferUsages,
    },
    WriteBuffer {
        buffer_id: usize,
        offset: u64,
        size: usize,
    },
    CreateTexture {
        id: usize,
        width: u32,
        height: u32,
        format: TextureFormat,
    },
    WriteTexture {
        texture_id: usize,
        width: u32,
        height: u32,
        bytes: usize,
    },
    CreateSampler {
        label: Option<String>,
    },
    CreateShaderModule {
        label: Option<String>,
    },
}

/// Records every call for later assertions.
///
/// `parking_lot::Mutex` keeps the type `Send + Sync` as the trait requires.
///
/// ```rust
/// use tessera_test_utils::{MockRenderContext, RenderContext};
/// use wgpu::*;
///
/// let mock = MockRenderContext::new();
/// let texture = mock.create_texture(&TextureDescriptor {
///     label: Some("atlas"),
///     size: Extent3d { width: 64, height: 64, depth_or_array_layers: 1 },
///     mip_level_count: 1,
///     sample_count: 1,
///     dimension: TextureDimension::D2,
///     format: TextureFormat::R8Unorm,
///     usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
///     view_formats: &[],
/// });
/// assert!(texture.is_mock());
/// assert_eq!(mock.count_texture_creates(), 1);
/// ```
pub struct MockRenderContext {
    calls: Mutex<Vec<RenderCall>>,
    next_buffer_id: Mutex<usize>,
    next_texture_id: Mutex<usize>,
    next_sampler_id: Mutex<usize>,
    next_shader_id: Mutex<usize>,
    uniform_alignment: u32,
}

impl MockRenderContext {
    pub fn new() -> Self {
        Self::with_uniform_alignment(256)
    }

    /// Mock reporting a custom dynamic-offset alignment.
    pub fn with_uniform_alignment(uniform_alignment: u32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_buffer_id: Mutex::new(0),
            next_texture_id: Mutex::new(0),
            next_sampler_id: Mutex::new(0),
            next_shader_id: Mutex::new(0),
            uniform_alignment,
        }
    }

    /// Copy of all recorded calls.
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    fn count(&self, predicate: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    pub fn count_buffer_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateBuffer { .. }))
    }

    pub fn count_buffer_writes(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::WriteBuffer { .. }))
    }

    /// Buffer writes that targeted one specific buffer.
    pub fn count_writes_to(&self, buffer: &GpuBuffer) -> usize {
        let Some(target) = buffer.mock_id() else {
            return 0;
        };
        self.count(|call| {
            matches!(call, RenderCall::WriteBuffer { buffer_id, .. } if *buffer_id == target)
        })
    }

    pub fn count_texture_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateTexture { .. }))
    }

    pub fn count_texture_writes(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::WriteTexture { .. }))
    }

    pub fn count_shader_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateShaderModule { .. }))
    }

    /// Clear recorded calls between test steps.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn next_id(counter: &Mutex<usize>) -> usize {
        let mut next = counter.lock();
        let id = *next;
        *next += 1;
        id
    }
}

impl Default for MockRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for MockRenderContext {
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        let id = Self::next_id(&self.next_buffer_id);
        self.calls.lock().push(RenderCall::CreateBuffer {
            id,
            label: desc.label.map(str::to_string),
            size: desc.size,
            usage: desc.usage,
        });
        GpuBuffer::mock(id, desc.size)
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        if let Some(buffer_id) = buffer.mock_id() {
            assert!(
                offset + data.len() as u64 <= buffer.size(),
                "write of {} bytes at {offset} overruns buffer {buffer_id} of {} bytes",
                data.len(),
                buffer.size()
            );
            self.calls.lock().push(RenderCall::WriteBuffer {
                buffer_id,
                offset,
                size: data.len(),
            });
        }
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        let id = Self::next_id(&self.next_texture_id);
        self.calls.lock().push(RenderCall::CreateTexture {
            id,
            width: desc.size.width,
            height: desc.size.height,
            format: desc.format,
        });
        GpuTexture::mock(id, desc.size.width, desc.size.height, desc.format)
    }

    fn write_texture(
        &self,
        texture: &GpuTexture,
        data: &[u8],
        _layout: TexelCopyBufferLayout,
        size: Extent3d,
    ) {
        if let Some(texture_id) = texture.mock_id() {
            self.calls.lock().push(RenderCall::WriteTexture {
                texture_id,
                width: size.width,
                height: size.height,
                bytes: data.len(),
            });
        }
    }

    fn create_sampler(&self, desc: &SamplerDescriptor) -> GpuSampler {
        let id = Self::next_id(&self.next_sampler_id);
        self.calls.lock().push(RenderCall::CreateSampler {
            label: desc.label.map(str::to_string),
        });
        GpuSampler::mock(id)
    }

    fn create_shader_module(&self, desc: &ShaderModuleDescriptor) -> GpuShaderModule {
        let id = Self::next_id(&self.next_shader_id);
        self.calls.lock().push(RenderCall::CreateShaderModule {
            label: desc.label.map(str::to_string),
        });
        GpuShaderModule::mock(id)
    }

    fn uniform_offset_alignment(&self) -> u32 {
        self.uniform_alignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex_buffer(mock: &MockRenderContext, size: u64) -> GpuBuffer {
        mock.create_buffer(&BufferDescriptor {
            label: Some("test_buffer"),
            size,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    #[test]
    fn test_mock_buffer_creation() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 1024);

        assert!(buffer.is_mock());
        assert_eq!(buffer.size(), 1024);
        assert_eq!(mock.count_buffer_creates(), 1);
    }

    #[test]
    fn test_writes_are_attributed_to_buffers() {
        let mock = MockRenderContext::new();
        let a = vertex_buffer(&mock, 256);
        let b = vertex_buffer(&mock, 256);

        mock.write_buffer(&a, 0, &[0u8; 16]);
        mock.write_buffer(&a, 16, &[0u8; 16]);
        mock.write_buffer(&b, 0, &[0u8; 32]);

        assert_eq!(mock.count_buffer_writes(), 3);
        assert_eq!(mock.count_writes_to(&a), 2);
        assert_eq!(mock.count_writes_to(&b), 1);
    }

    #[test]
    #[should_panic(expected = "overruns")]
    fn test_write_past_end_panics() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 16);
        mock.write_buffer(&buffer, 8, &[0u8; 16]);
    }

    #[test]
    fn test_texture_write_records_extent() {
        let mock = MockRenderContext::new();
        let texture = mock.create_texture(&TextureDescriptor {
            label: Some("atlas"),
            size: Extent3d {
                width: 128,
                height: 64,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::R8Unorm,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let pixels = vec![0u8; 128 * 64];
        mock.write_texture(
            &texture,
            &pixels,
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(128),
                rows_per_image: Some(64),
            },
            Extent3d {
                width: 128,
                height: 64,
                depth_or_array_layers: 1,
            },
        );

        assert_eq!(texture.width(), 128);
        assert_eq!(texture.format(), TextureFormat::R8Unorm);
        assert_eq!(
            mock.calls().last(),
            Some(&RenderCall::WriteTexture {
                texture_id: 0,
                width: 128,
                height: 64,
                bytes: 128 * 64,
            })
        );
    }

    #[test]
    fn test_shader_and_sampler_ids_are_sequential() {
        let mock = MockRenderContext::new();
        let shader = |label| {
            mock.create_shader_module(&ShaderModuleDescriptor {
                label: Some(label),
                source: ShaderSource::Wgsl("".into()),
            })
        };
        let rect = shader("rect");
        let text = shader("text");
        let sampler = mock.create_sampler(&SamplerDescriptor::default());

        assert_eq!(rect.mock_id(), Some(0));
        assert_eq!(text.mock_id(), Some(1));
        assert_eq!(sampler.mock_id(), Some(0));
        assert_eq!(mock.count_shader_creates(), 2);
        assert_eq!(
            mock.calls()[1],
            RenderCall::CreateShaderModule {
                label: Some("text".to_string())
            }
        );
    }

    #[test]
    fn test_clear_calls() {
        let mock = MockRenderContext::new();
        vertex_buffer(&mock, 64);
        assert_eq!(mock.call_count(), 1);

        mock.clear_calls();
        assert_eq!(mock.call_count(), 0);
    }
}
