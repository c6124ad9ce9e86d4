//! Error types for thumbnail generation.

use fabmesh_io::IoError;
use thiserror::Error;

/// Errors that can occur while producing a preview.
#[derive(Error, Debug)]
pub enum ThumbnailError {
    /// The model bytes could not be decoded.
    #[error("could not decode model: {0}")]
    Decode(#[from] IoError),

    /// The model has no extent to frame a camera around.
    #[error("model has no usable extent (largest dimension {0})")]
    DegenerateBounds(f64),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// Rejected render settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for thumbnail operations.
pub type Result<T> = std::result::Result<T, ThumbnailError>;
