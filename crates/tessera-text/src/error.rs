use std::path::PathBuf;

use thiserror::Error;

use crate::font::FontId;

/// Errors that can occur in the text rendering system.
///
/// Only font loading surfaces errors to callers in normal operation.
/// Malformed UTF-8 is replaced, and atlas exhaustion during drawing is
/// logged and degraded to a blank advance.
#[derive(Debug, Error)]
pub enum TextError {
    #[error("font registry is full ({capacity} fonts)")]
    RegistryFull { capacity: usize },

    #[error("failed to read font file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid font data in {}: {reason}", .path.display())]
    InvalidFont { path: PathBuf, reason: String },

    #[error("invalid pixel size {0}")]
    InvalidPixelSize(f32),

    #[error("no font with id {}", .0.index())]
    UnknownFont(FontId),

    #[error("glyph atlas is full: cannot place {width}x{height} bitmap")]
    AtlasFull { width: u32, height: u32 },

    #[error("none of the {} candidate font paths could be loaded", .tried.len())]
    NoFontFound { tried: Vec<PathBuf> },
}

pub type TextResult<T> = Result<T, TextError>;
