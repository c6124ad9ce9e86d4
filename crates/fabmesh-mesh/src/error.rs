//! Error types for mesh construction.

use thiserror::Error;

/// Buffer layouts rejected when building a [`crate::Mesh`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Position buffer length is not a multiple of 3.
    #[error("position buffer length {0} is not a multiple of 3")]
    PositionsNotTriples(usize),

    /// Index buffer length is not a multiple of 3.
    #[error("index buffer length {0} is not a multiple of 3")]
    IndicesNotTriples(usize),

    /// Non-indexed mesh whose vertex count does not form whole triangles.
    #[error("non-indexed mesh has {0} vertices, which is not a multiple of 3")]
    VertexCountNotTriangles(usize),

    /// An index refers past the end of the vertex buffer.
    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index value.
        index: u32,
        /// Offset of the index within the index buffer.
        position: usize,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A merge would need vertex indices past `u32::MAX`.
    #[error("merged mesh would have {0} vertices, more than 32-bit indices can address")]
    TooManyVertices(usize),
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
