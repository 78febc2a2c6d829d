//! Command list to GPU work.
//!
//! [`CommandTranslator::translate`] walks the commands once, filling the
//! rectangle batch and the text frame, and produces a list of [`FrameOp`]s
//! that a render pass replays in order. The translator needs no device, only
//! a [`RenderContext`], so it runs headless under `MockRenderContext`.

use std::ops::Range;
use std::sync::Arc;

use glam::vec2;
use tessera_core::profiling::profile_function;
use tessera_render::{Color, RectBatch, RenderContext, Viewport};
use tessera_text::{FontId, TextConfig, TextEngine, TextFrame, TextResult};

use crate::clip::ScissorRect;
use crate::command::{CommandData, RenderCommand, TextData, border_edges};

/// One step of the replayed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOp {
    /// Vertex range of the rectangle batch.
    Rects(Range<u32>),
    /// Range of `TextFrame::draws`.
    Text(Range<usize>),
    Scissor(ScissorRect),
}

pub struct CommandTranslator {
    text: TextEngine,
    text_frame: TextFrame,
    rects: RectBatch,
    viewport: Viewport,
    ops: Vec<FrameOp>,
    recorded_text_draws: usize,
}

impl CommandTranslator {
    pub fn new(context: Arc<dyn RenderContext>, config: TextConfig, viewport: Viewport) -> Self {
        let text_frame = TextFrame::new(
            context.clone(),
            config.atlas_size,
            config.max_chars_per_batch,
        );
        Self {
            text: TextEngine::new(config, viewport),
            text_frame,
            rects: RectBatch::new(context, viewport),
            viewport,
            ops: Vec::new(),
            recorded_text_draws: 0,
        }
    }

    pub fn text(&self) -> &TextEngine {
        &self.text
    }

    /// Font loading and statistics.
    pub fn text_mut(&mut self) -> &mut TextEngine {
        &mut self.text
    }

    pub fn text_frame(&self) -> &TextFrame {
        &self.text_frame
    }

    pub fn rects(&self) -> &RectBatch {
        &self.rects
    }

    pub fn ops(&self) -> &[FrameOp] {
        &self.ops
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Propagate a new screen size to rectangle and text NDC conversion.
    pub fn resize(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width, height);
        tracing::debug!("Resizing UI to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
        self.rects.set_viewport(viewport);
        self.text.set_viewport(viewport);
    }

    pub fn load_font(&mut self, path: impl AsRef<std::path::Path>, pixel_size: f32) -> TextResult<FontId> {
        self.text.load_font(path, pixel_size)
    }

    /// Width and height of `text` as it would be drawn, for the layout
    /// engine's measure callback.
    pub fn measure_text(&mut self, text: &[u8], font: Option<FontId>) -> glam::Vec2 {
        self.text.measure(text, font)
    }

    /// Build this frame's GPU data and replay list from `commands`.
    pub fn translate(&mut self, commands: &[RenderCommand]) -> &[FrameOp] {
        profile_function!();

        self.ops.clear();
        self.rects.clear();
        self.recorded_text_draws = 0;
        self.text.begin_frame(&mut self.text_frame);

        for command in commands {
            let bounds = &command.bounding_box;
            match &command.data {
                CommandData::None => {}
                CommandData::Rectangle { color } => {
                    self.push_rect(bounds.min(), bounds.size(), *color);
                }
                CommandData::Image { background } | CommandData::Custom { background } => {
                    self.push_rect(bounds.min(), bounds.size(), *background);
                }
                CommandData::Border { color, widths } => {
                    for (min, size) in border_edges(bounds, widths) {
                        self.push_rect(min, size, *color);
                    }
                }
                CommandData::Text(data) => self.push_text(command, data),
                CommandData::ScissorStart => match ScissorRect::clamped(bounds, self.viewport) {
                    Some(clip) => self.push_scissor(clip),
                    None => tracing::warn!(
                        "Skipping degenerate scissor {:?} on {}x{} screen",
                        bounds,
                        self.viewport.width,
                        self.viewport.height
                    ),
                },
                CommandData::ScissorEnd => self.push_scissor(ScissorRect::full(self.viewport)),
            }
        }

        self.text.end_frame(&mut self.text_frame);
        self.record_text_draws();
        self.rects.upload();
        &self.ops
    }

    fn push_text(&mut self, command: &RenderCommand, data: &TextData) {
        let bounds = &command.bounding_box;
        let Some(font) = self.text.fonts().resolve(data.font) else {
            tracing::warn!("No font for text command at {:?}, skipping", bounds);
            return;
        };
        if data.font_size > 0.0 && (data.font_size - font.pixel_size()).abs() > 0.5 {
            tracing::trace!(
                "Text requested at {}px drawn with font {} at {}px",
                data.font_size,
                font.id().index(),
                font.pixel_size()
            );
        }

        let baseline = font.centered_baseline(bounds.y, bounds.height);
        self.text.add_string(
            &mut self.text_frame,
            &data.text,
            vec2(bounds.x, baseline),
            data.color,
            data.font,
        );
    }

    fn push_rect(&mut self, min: glam::Vec2, size: glam::Vec2, color: Color) {
        if !(size.x > 0.0 && size.y > 0.0) {
            return;
        }
        self.flush_text();
        let range = self.rects.push(min, size, color);
        if let Some(FrameOp::Rects(last)) = self.ops.last_mut()
            && last.end == range.start
        {
            last.end = range.end;
            return;
        }
        self.ops.push(FrameOp::Rects(range));
    }

    fn push_scissor(&mut self, clip: ScissorRect) {
        self.flush_text();
        self.ops.push(FrameOp::Scissor(clip));
    }

    /// Text queued so far must be drawn before anything that follows it.
    fn flush_text(&mut self) {
        self.text.flush(&mut self.text_frame);
        self.record_text_draws();
    }

    fn record_text_draws(&mut self) {
        let total = self.text_frame.draws().len();
        if total > self.recorded_text_draws {
            self.ops.push(FrameOp::Text(self.recorded_text_draws..total));
            self.recorded_text_draws = total;
        }
    }
}
