//! STL decoding (binary and ASCII) via `stl_io`.

use std::borrow::Cow;
use std::io::Cursor;

use fabmesh_mesh::Mesh;
use tracing::debug;

use crate::error::{IoError, Result};
use crate::format::ModelFormat;

/// Decode an STL file held in memory.
///
/// `stl_io` merges coincident corners, so the result is an indexed mesh.
/// Degenerate facets are kept; they add nothing to area or volume.
pub fn decode_stl(bytes: &[u8]) -> Result<Mesh> {
    let mut reader = Cursor::new(binary_safe(bytes));
    let stl = stl_io::read_stl(&mut reader).map_err(|e| IoError::Decode {
        format: ModelFormat::Stl,
        details: e.to_string(),
    })?;

    debug!(
        "STL contains {} vertices, {} triangles",
        stl.vertices.len(),
        stl.faces.len()
    );

    let mut positions = Vec::with_capacity(stl.vertices.len() * 3);
    for v in &stl.vertices {
        positions.extend_from_slice(&v.0);
    }

    let mut indices = Vec::with_capacity(stl.faces.len() * 3);
    for face in &stl.faces {
        indices.extend(face.vertices.iter().map(|&i| i as u32));
    }

    Ok(Mesh::indexed(positions, indices)?)
}

/// Size of the binary header plus facet count.
const BINARY_PREAMBLE: usize = 84;

/// Size of one binary facet record.
const BINARY_FACET: usize = 50;

/// Whether `bytes` is exactly a binary STL by its facet count.
fn is_binary(bytes: &[u8]) -> bool {
    let Some(count) = bytes.get(80..BINARY_PREAMBLE) else {
        return false;
    };
    let count = u32::from_le_bytes([count[0], count[1], count[2], count[3]]) as u64;
    count * BINARY_FACET as u64 + BINARY_PREAMBLE as u64 == bytes.len() as u64
}

/// `stl_io` picks its ASCII parser from a leading `solid`, which many CAD
/// exporters also write into binary headers. Blank it for binary files.
fn binary_safe(bytes: &[u8]) -> Cow<'_, [u8]> {
    if is_binary(bytes) && bytes.starts_with(b"solid") {
        debug!("binary STL with ASCII-style header");
        let mut owned = bytes.to_vec();
        owned[..5].fill(b' ');
        Cow::Owned(owned)
    } else {
        Cow::Borrowed(bytes)
    }
}
