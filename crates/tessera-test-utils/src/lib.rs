//! GPU seam for the Tessera renderer.
//!
//! Everything that uploads data to the GPU goes through [`RenderContext`], so
//! the glyph atlas and batch upload paths can run against
//! `MockRenderContext` (feature `mock`) in tests and against the real
//! `GraphicsContext` in `tessera-render` otherwise.
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use tessera_test_utils::{MockRenderContext, RenderContext};
//! use wgpu::*;
//!
//! let mock = MockRenderContext::new();
//! let buffer = mock.create_buffer(&BufferDescriptor {
//!     label: Some("glyph_vertices"),
//!     size: 1024,
//!     usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
//!     mapped_at_creation: false,
//! });
//! mock.write_buffer(&buffer, 0, &[0u8; 64]);
//!
//! assert_eq!(mock.count_buffer_writes(), 1);
//! assert!(buffer.is_mock());
//! # }
//! ```
//!
//! Handles are owned and cheap to clone, and the trait is object safe, so
//! callers hold an `Arc<dyn RenderContext>` without lifetimes leaking into
//! renderer structs.

pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_render;
pub mod render_context;

pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_render::*;
pub use render_context::*;
