//! Error types
//!
//! Only construction and storage can fail. The simulation keeps its
//! invariants by construction and has no error path.

use thiserror::Error;

/// Fatal errors that prevent an engine from being built
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("drawing surface could not provide a 2D rendering context")]
    NoRenderingContext,

    #[error("drawing surface has unusable dimensions {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("failed to parse tuning: {0}")]
    TuningParse(#[from] serde_json::Error),
}

/// Non-fatal high score storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("failed to read stored value: {0}")]
    Read(String),

    #[error("failed to write stored value: {0}")]
    Write(String),

    #[error("stored value {0:?} is not a valid score")]
    Corrupt(String),
}
