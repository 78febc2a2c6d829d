//! wgpu renderer for a command list.

use std::path::Path;
use std::sync::Arc;

use tessera_core::profiling::profile_function;
use tessera_render::{Color, GraphicsContext, GraphicsError, RectPipeline, RenderContext, Viewport, wgpu};
use tessera_text::{FontId, TextConfig, TextEngine, TextPipeline, TextResult, TextStats};

use crate::command::RenderCommand;
use crate::translate::{CommandTranslator, FrameOp};

#[derive(Debug, Clone)]
pub struct UiRendererConfig {
    /// Colour the target is cleared to before the first command.
    pub clear_color: Color,
    pub text: TextConfig,
}

impl Default for UiRendererConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::rgb(0.1, 0.1, 0.1),
            text: TextConfig::default(),
        }
    }
}

/// Draws [`RenderCommand`] lists into a texture view, one render pass per
/// frame.
pub struct UiRenderer {
    // Fields drop in declaration order: pipelines, then the buffers they
    // reference, then the device.
    text_pipeline: TextPipeline,
    rect_pipeline: RectPipeline,
    translator: CommandTranslator,
    clear_color: Color,
    context: Arc<GraphicsContext>,
}

impl UiRenderer {
    pub fn new(
        context: Arc<GraphicsContext>,
        target_format: wgpu::TextureFormat,
        config: UiRendererConfig,
        width: u32,
        height: u32,
    ) -> Result<Self, GraphicsError> {
        profile_function!();

        let max_dimension = context.max_texture_dimension_2d();
        if config.text.atlas_size > max_dimension {
            return Err(GraphicsError::ResourceCreation {
                what: "glyph atlas".to_string(),
                reason: format!(
                    "{0}x{0} exceeds the device limit of {1}",
                    config.text.atlas_size, max_dimension
                ),
            });
        }

        let viewport = Viewport::new(width, height);
        let render_context: Arc<dyn RenderContext> = context.clone();
        let text_config = config.text.clone();
        let translator = context.create_checked("frame buffers", move |_| {
            CommandTranslator::new(render_context, text_config, viewport)
        })?;
        let rect_pipeline = context.create_checked("rectangle pipeline", |ctx| {
            RectPipeline::new(ctx, target_format)
        })?;
        let text_pipeline = context.create_checked("text pipeline", |ctx| {
            TextPipeline::new(ctx, target_format)
        })?;

        tracing::info!(
            "UI renderer ready: {}x{}, {}px atlas, {:?}",
            viewport.width,
            viewport.height,
            config.text.atlas_size,
            target_format
        );

        Ok(Self {
            text_pipeline,
            rect_pipeline,
            translator,
            clear_color: config.clear_color,
            context,
        })
    }

    pub fn load_font(&mut self, path: impl AsRef<Path>, pixel_size: f32) -> TextResult<FontId> {
        self.translator.load_font(path, pixel_size)
    }

    pub fn text(&self) -> &TextEngine {
        self.translator.text()
    }

    pub fn text_mut(&mut self) -> &mut TextEngine {
        self.translator.text_mut()
    }

    pub fn text_stats(&self) -> TextStats {
        self.translator.text().stats()
    }

    pub fn measure_text(&mut self, text: &[u8], font: Option<FontId>) -> glam::Vec2 {
        self.translator.measure_text(text, font)
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.translator.resize(width, height);
    }

    pub fn viewport(&self) -> Viewport {
        self.translator.viewport()
    }

    /// Operations replayed by the last frame.
    pub fn last_frame(&self) -> &[FrameOp] {
        self.translator.ops()
    }

    /// Draw `commands` into `view` and submit.
    pub fn render(&mut self, commands: &[RenderCommand], view: &wgpu::TextureView) {
        profile_function!();

        let mut encoder = self
            .context
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Render Encoder"),
            });
        self.encode(&mut encoder, commands, view);
        self.context.queue().submit(std::iter::once(encoder.finish()));
    }

    /// Record the frame into a caller-owned encoder. Buffer and atlas writes
    /// go through the queue immediately, so submit before the next frame.
    pub fn encode(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        commands: &[RenderCommand],
        view: &wgpu::TextureView,
    ) {
        self.translator.translate(commands);
        self.text_pipeline
            .prepare(&self.context, self.translator.text_frame());

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("UI Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        for op in self.translator.ops() {
            match op {
                FrameOp::Rects(vertices) => {
                    self.rect_pipeline
                        .draw(&mut pass, self.translator.rects(), vertices.clone());
                }
                FrameOp::Text(draws) => {
                    self.text_pipeline
                        .draw(&mut pass, self.translator.text_frame(), draws.clone());
                }
                FrameOp::Scissor(clip) => {
                    pass.set_scissor_rect(clip.x, clip.y, clip.width, clip.height);
                }
            }
        }
    }
}
