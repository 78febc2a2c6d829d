//! GPU plumbing for the Tessera renderer.
//!
//! - [`GraphicsContext`]: instance, adapter, device and queue, acquired
//!   synchronously.
//! - [`Color`] and [`Viewport`]: colours and the pixel to NDC mapping shared
//!   by the rectangle and text paths.
//! - [`RectBatch`] / [`RectPipeline`]: solid-colour quads for rectangles,
//!   borders and image placeholders.

mod color;
mod context;
mod context_impl;
mod error;
mod rect;
mod viewport;

pub use color::Color;
pub use context::{GraphicsContext, GraphicsContextDescriptor};
pub use error::GraphicsError;
pub use rect::{RECT_SHADER, RectBatch, RectPipeline, RectVertex};
pub use viewport::Viewport;

pub use tessera_test_utils::{GpuBuffer, GpuSampler, GpuShaderModule, GpuTexture, RenderContext};
pub use wgpu;
