//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;
use crate::history::HistoryError;

/// Errors produced by the stagehand crate.
#[derive(Debug)]
pub enum StagehandError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// WGSL shader composition failure.
    Shader(String),
    /// Command history persistence/rehydration failure.
    History(HistoryError),
    /// GPU pixel readback failure (buffer mapping did not complete).
    Readback(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for StagehandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::History(e) => write!(f, "history error: {e}"),
            Self::Readback(msg) => write!(f, "readback error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for StagehandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::History(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for StagehandError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<HistoryError> for StagehandError {
    fn from(e: HistoryError) -> Self {
        Self::History(e)
    }
}

impl From<std::io::Error> for StagehandError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
