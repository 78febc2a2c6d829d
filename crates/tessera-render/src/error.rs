use thiserror::Error;

/// Failure to bring up the GPU.
///
/// Renderer construction is all-or-nothing: any of these aborts it and no
/// partially initialised renderer is returned.
#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("no suitable GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("failed to create {what}: {reason}")]
    ResourceCreation { what: String, reason: String },
}
