//! Tessera Text - dynamic glyph atlas and batched text drawing.
//!
//! Strings go through a small fixed pipeline:
//!
//! - [`utf8`] decodes bytes one codepoint at a time, substituting U+FFFD
//!   for malformed input.
//! - [`FontRegistry`] holds up to [`TextConfig::max_fonts`] faces at a fixed
//!   pixel size each.
//! - [`GlyphCache`] maps `(codepoint, font)` to a [`Glyph`]; a miss is
//!   rasterized into the shelf-packed [`GlyphAtlas`].
//! - [`TextEngine`] lays out quads into a [`TextBatch`] and flushes it to a
//!   [`TextTarget`] whenever the font or colour changes, the batch fills up,
//!   or the frame ends.
//! - [`TextFrame`] and [`TextPipeline`] are the wgpu target and pipeline.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tessera_render::{Color, GraphicsContext, Viewport};
//! use tessera_text::{TextConfig, TextEngine, TextFrame};
//! use tessera_core::math::vec2;
//!
//! let context = GraphicsContext::new_sync().expect("no GPU");
//! let config = TextConfig::default();
//! let mut engine = TextEngine::new(config.clone(), Viewport::new(1280, 720));
//! engine.load_font("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf", 16.0)?;
//!
//! let mut frame = TextFrame::new(context.clone(), config.atlas_size, config.max_chars_per_batch);
//! engine.begin_frame(&mut frame);
//! engine.add_str(&mut frame, "Hello, World!", vec2(10.0, 30.0), Color::WHITE, None);
//! engine.end_frame(&mut frame);
//! // TextPipeline::draw replays frame.draws() inside a render pass.
//! # Ok::<(), tessera_text::TextError>(())
//! ```

pub mod atlas;
pub mod batch;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod font;
pub mod frame;
pub mod pipeline;
pub mod raster;
pub mod utf8;

pub use atlas::{AtlasRegion, GlyphAtlas, ShelfPacker};
pub use batch::{BatchState, FlushReason, MAX_BATCH_GLYPHS, TextBatch, TextTarget, TextVertex};
pub use cache::{CacheStats, Glyph, GlyphCache, InsertOutcome};
pub use config::TextConfig;
pub use engine::{TextEngine, TextStats};
pub use error::{TextError, TextResult};
pub use font::{BlockFace, Font, FontId, FontRegistry, FontdueFace, OutlineFace};
pub use frame::{TextDraw, TextFrame};
pub use pipeline::{TEXT_SHADER, TextPipeline};
