//! GPU resource handles that can be real or mock.
//!
//! A handle hides whether it wraps a `wgpu` object or a test stand-in. Real
//! `wgpu` objects are reference counted, so cloning a handle is cheap.

/// GPU buffer handle.
#[derive(Clone, Debug)]
pub struct GpuBuffer {
    inner: GpuBufferInner,
}

#[derive(Clone, Debug)]
enum GpuBufferInner {
    Real(wgpu::Buffer),
    #[cfg(feature = "mock")]
    Mock { id: usize, size: u64 },
}

impl GpuBuffer {
    pub fn from_wgpu(buffer: wgpu::Buffer) -> Self {
        Self {
            inner: GpuBufferInner::Real(buffer),
        }
    }

    #[cfg(feature = "mock")]
    pub fn mock(id: usize, size: u64) -> Self {
        Self {
            inner: GpuBufferInner::Mock { id, size },
        }
    }

    /// Allocated size in bytes.
    pub fn size(&self) -> u64 {
        match &self.inner {
            GpuBufferInner::Real(buffer) => buffer.size(),
            #[cfg(feature = "mock")]
            GpuBufferInner::Mock { size, .. } => *size,
        }
    }

    /// The underlying `wgpu::Buffer`.
    ///
    /// # Panics
    /// Panics on a mock buffer. Only draw-encoding code calls this, and that
    /// code never runs against a mock context.
    pub fn as_wgpu(&self) -> &wgpu::Buffer {
        match &self.inner {
            GpuBufferInner::Real(buffer) => buffer,
            #[cfg(feature = "mock")]
            GpuBufferInner::Mock { .. } => {
                panic!("attempted to get wgpu::Buffer from a mock buffer")
            }
        }
    }

    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuBufferInner::Mock { .. })
    }

    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuBufferInner::Mock { id, .. } => Some(*id),
            GpuBufferInner::Real(_) => None,
        }
    }
}

/// GPU texture handle.
#[derive(Clone, Debug)]
pub struct GpuTexture {
    inner: GpuTextureInner,
}

#[derive(Clone, Debug)]
enum GpuTextureInner {
    Real(wgpu::Texture),
    #[cfg(feature = "mock")]
    Mock {
        id: usize,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    },
}

impl GpuTexture {
    pub fn from_wgpu(texture: wgpu::Texture) -> Self {
        Self {
            inner: GpuTextureInner::Real(texture),
        }
    }

    #[cfg(feature = "mock")]
    pub fn mock(id: usize, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            inner: GpuTextureInner::Mock {
                id,
                width,
                height,
                format,
            },
        }
    }

    pub fn width(&self) -> u32 {
        match &self.inner {
            GpuTextureInner::Real(texture) => texture.width(),
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock { width, .. } => *width,
        }
    }

    pub fn height(&self) -> u32 {
        match &self.inner {
            GpuTextureInner::Real(texture) => texture.height(),
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock { height, .. } => *height,
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        match &self.inner {
            GpuTextureInner::Real(texture) => texture.format(),
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock { format, .. } => *format,
        }
    }

    /// The underlying `wgpu::Texture`.
    ///
    /// # Panics
    /// Panics on a mock texture.
    pub fn as_wgpu(&self) -> &wgpu::Texture {
        match &self.inner {
            GpuTextureInner::Real(texture) => texture,
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock { .. } => {
                panic!("attempted to get wgpu::Texture from a mock texture")
            }
        }
    }

    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuTextureInner::Mock { .. })
    }

    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuTextureInner::Mock { id, .. } => Some(*id),
            GpuTextureInner::Real(_) => None,
        }
    }
}

/// Declares a handle for a GPU object that carries no data we need to
/// inspect in tests.
macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident, $inner:ident, $wgpu:ty) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            inner: $inner,
        }

        #[derive(Clone, Debug)]
        enum $inner {
            Real($wgpu),
            #[cfg(feature = "mock")]
            Mock { id: usize },
        }

        impl $name {
            pub fn from_wgpu(value: $wgpu) -> Self {
                Self {
                    inner: $inner::Real(value),
                }
            }

            #[cfg(feature = "mock")]
            pub fn mock(id: usize) -> Self {
                Self {
                    inner: $inner::Mock { id },
                }
            }

            /// # Panics
            /// Panics on a mock handle.
            pub fn as_wgpu(&self) -> &$wgpu {
                match &self.inner {
                    $inner::Real(value) => value,
                    #[cfg(feature = "mock")]
                    $inner::Mock { .. } => panic!(concat!(
                        "attempted to get ",
                        stringify!($wgpu),
                        " from a mock handle"
                    )),
                }
            }

            #[cfg(feature = "mock")]
            pub fn is_mock(&self) -> bool {
                matches!(self.inner, $inner::Mock { .. })
            }

            #[cfg(feature = "mock")]
            pub fn mock_id(&self) -> Option<usize> {
                match &self.inner {
                    $inner::Mock { id } => Some(*id),
                    $inner::Real(_) => None,
                }
            }
        }
    };
}

opaque_handle!(
    /// GPU sampler handle.
    GpuSampler,
    GpuSamplerInner,
    wgpu::Sampler
);

opaque_handle!(
    /// Compiled shader module handle.
    GpuShaderModule,
    GpuShaderModuleInner,
    wgpu::ShaderModule
);
