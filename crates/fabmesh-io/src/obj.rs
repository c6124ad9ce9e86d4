//! Wavefront OBJ decoding via `tobj`.

use std::io::{BufReader, Cursor};

use fabmesh_mesh::Mesh;
use tracing::debug;

use crate::error::{IoError, Result};
use crate::format::ModelFormat;

/// Decode an OBJ file held in memory.
///
/// Polygons are triangulated and every object/group is merged into one
/// mesh. Material libraries are never opened; an upload arrives as a single
/// file and colors are not part of a preview.
pub fn decode_obj(bytes: &[u8]) -> Result<Mesh> {
    let mut reader = BufReader::new(Cursor::new(bytes));
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    let (models, _materials) =
        tobj::load_obj_buf(&mut reader, &options, |_| Err(tobj::LoadError::OpenFileFailed))
            .map_err(|e| IoError::Decode {
                format: ModelFormat::Obj,
                details: e.to_string(),
            })?;

    let mut mesh = Mesh::empty();
    for model in &models {
        let part = Mesh::indexed(model.mesh.positions.clone(), model.mesh.indices.clone())?;
        debug!(
            "OBJ model '{}': {} vertices, {} triangles",
            model.name,
            part.num_vertices(),
            part.num_triangles()
        );
        mesh.merge(&part)?;
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_AND_TRI: &str = "# two objects
o plate
v 0 0 0
v 20 0 0
v 20 10 0
v 0 10 0
f 1 2 3 4
o flag
v 0 0 5
v 1 0 5
v 0 1 5
f 5 6 7
";

    #[test]
    fn test_triangulates_and_merges_objects() {
        let mesh = decode_obj(QUAD_AND_TRI.as_bytes()).unwrap();
        assert_eq!(mesh.num_triangles(), 3);
        assert_eq!(mesh.num_vertices(), 7);
        let bbox = mesh.bounding_box().unwrap();
        assert_eq!(bbox.max.x, 20.0);
        assert_eq!(bbox.max.z, 5.0);
    }

    #[test]
    fn test_missing_material_library_is_ignored() {
        let src = "mtllib missing.mtl\nusemtl red\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = decode_obj(src.as_bytes()).unwrap();
        assert_eq!(mesh.num_triangles(), 1);
    }

    #[test]
    fn test_bad_face_reference_is_decode_error() {
        let src = "v 0 0 0\nf 1 2 x\n";
        assert!(decode_obj(src.as_bytes()).is_err());
    }
}
