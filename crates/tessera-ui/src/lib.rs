//! Tessera UI - turns a layout engine's draw commands into GPU work.
//!
//! A frame is a flat, back-to-front list of [`RenderCommand`]s. The
//! [`CommandTranslator`] converts it into rectangle vertices, batched text
//! draws and scissor changes, recorded as a list of [`FrameOp`]s so that
//! painter's order survives batching. [`UiRenderer`] replays those ops in a
//! single render pass.
//!
//! | Command | Drawn as |
//! |---------|----------|
//! | `Rectangle` | solid quad |
//! | `Text` | glyph quads, baseline centred in the box |
//! | `Image`, `Custom` | solid quad in the background colour |
//! | `Border` | up to four edge quads |
//! | `ScissorStart` | scissor clamped to the screen |
//! | `ScissorEnd` | scissor reset to the full screen |
//! | `None` | nothing |
//!
//! ```rust,no_run
//! use tessera_render::{Color, GraphicsContext, wgpu};
//! use tessera_ui::{BoundingBox, RenderCommand, UiRenderer, UiRendererConfig};
//!
//! let context = GraphicsContext::new_sync().expect("no GPU");
//! let mut ui = UiRenderer::new(
//!     context,
//!     wgpu::TextureFormat::Rgba8UnormSrgb,
//!     UiRendererConfig::default(),
//!     1280,
//!     720,
//! )
//! .expect("renderer");
//! ui.load_font("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf", 16.0)
//!     .expect("font");
//!
//! let commands = [
//!     RenderCommand::rectangle(BoundingBox::new(10.0, 10.0, 200.0, 40.0), Color::BLACK),
//!     RenderCommand::text(BoundingBox::new(10.0, 10.0, 200.0, 40.0), "Hello", 16.0, Color::WHITE, None),
//! ];
//! # let view: wgpu::TextureView = unimplemented!();
//! ui.render(&commands, &view);
//! ```

pub mod clip;
pub mod command;
pub mod renderer;
pub mod translate;

pub use clip::ScissorRect;
pub use command::{
    BorderWidths, BoundingBox, CommandData, CommandType, RenderCommand, TextData, border_edges,
};
pub use renderer::{UiRenderer, UiRendererConfig};
pub use translate::{CommandTranslator, FrameOp};
