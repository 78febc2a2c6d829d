use crate::GraphicsError;
use std::sync::Arc;

/// Options for [`GraphicsContext`] creation.
#[derive(Debug, Clone)]
pub struct GraphicsContextDescriptor {
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    pub force_fallback_adapter: bool,
    pub limits: wgpu::Limits,
    pub label: Option<&'static str>,
}

impl Default for GraphicsContextDescriptor {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
            limits: wgpu::Limits::default(),
            label: Some("Tessera Device"),
        }
    }
}

/// Shared GPU context.
///
/// Held in an `Arc` so the text and rectangle paths can keep their own
/// handle to it:
///
/// ```rust,no_run
/// use tessera_render::GraphicsContext;
///
/// let ctx = GraphicsContext::new_sync().expect("no GPU");
/// let for_text = ctx.clone();
/// ```
pub struct GraphicsContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GraphicsContext {
    /// Acquire an adapter and device with default options.
    pub async fn new() -> Result<Arc<Self>, GraphicsError> {
        Self::with_descriptor(GraphicsContextDescriptor::default()).await
    }

    /// Blocking variant of [`GraphicsContext::new`].
    ///
    /// The adapter and device requests are driven to completion on the
    /// calling thread, so the frame loop never sees a pending device.
    pub fn new_sync() -> Result<Arc<Self>, GraphicsError> {
        pollster::block_on(Self::new())
    }

    /// Blocking creation with custom options.
    pub fn with_descriptor_sync(
        descriptor: GraphicsContextDescriptor,
    ) -> Result<Arc<Self>, GraphicsError> {
        pollster::block_on(Self::with_descriptor(descriptor))
    }

    pub async fn with_descriptor(
        descriptor: GraphicsContextDescriptor,
    ) -> Result<Arc<Self>, GraphicsError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: descriptor.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: descriptor.power_preference,
                compatible_surface: None,
                force_fallback_adapter: descriptor.force_fallback_adapter,
            })
            .await?;

        let info = adapter.get_info();
        tracing::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: descriptor.label,
                required_limits: descriptor.limits,
                ..Default::default()
            })
            .await?;

        Ok(Arc::new(Self {
            instance,
            adapter,
            device,
            queue,
        }))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }

    /// Run `create` inside a validation error scope, turning anything wgpu
    /// reports into [`GraphicsError::ResourceCreation`].
    pub fn create_checked<T>(
        &self,
        what: &str,
        create: impl FnOnce(&Self) -> T,
    ) -> Result<T, GraphicsError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = create(self);
        match pollster::block_on(self.device.pop_error_scope()) {
            None => Ok(value),
            Some(error) => {
                tracing::error!("Failed to create {}: {}", what, error);
                Err(GraphicsError::ResourceCreation {
                    what: what.to_string(),
                    reason: error.to_string(),
                })
            }
        }
    }

    /// Largest 2D texture edge the device accepts.
    #[inline]
    pub fn max_texture_dimension_2d(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}
