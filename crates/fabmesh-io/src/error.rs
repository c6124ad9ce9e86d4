//! Error types for model decoding.

use std::path::PathBuf;

use fabmesh_mesh::MeshError;
use thiserror::Error;

use crate::format::ModelFormat;

/// Errors that can occur while reading or decoding a model file.
#[derive(Error, Debug)]
pub enum IoError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The extension does not name a supported format.
    #[error("unsupported model format: {}", .0.as_deref().unwrap_or("<no extension>"))]
    UnsupportedFormat(Option<String>),

    /// The format decoder rejected the bytes.
    #[error("{format} decode failed: {details}")]
    Decode {
        /// Format the bytes were decoded as.
        format: ModelFormat,
        /// Decoder message.
        details: String,
    },

    /// The file decoded but held no triangles.
    #[error("{0} file contains no triangles")]
    EmptyModel(ModelFormat),

    /// The decoder produced buffers that do not form a valid mesh.
    #[error("invalid mesh: {0}")]
    Mesh(#[from] MeshError),
}

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, IoError>;
