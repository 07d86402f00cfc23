//! Error types for sample-domain operations

use thiserror::Error;

/// Sample-domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid trim range: {start:.3}s..{end:.3}s")]
    InvalidRange { start: f64, end: f64 },

    #[error("no buffers to concatenate")]
    EmptyInput,
}

/// Result type for sample-domain operations
pub type CoreResult<T> = Result<T, CoreError>;
