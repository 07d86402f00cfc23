//! Error types for the decode and encode boundary

use sw_core::{CoreError, Violation};
use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("unsupported media kind: {0}")]
    UnsupportedMedia(String),

    #[error("failed to decode audio: {0}")]
    Decode(String),

    #[error("clip set failed validation ({count} violations)", count = .0.len())]
    Validation(Vec<Violation>),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("an encoding task is already running")]
    EncoderBusy,
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
