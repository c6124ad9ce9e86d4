//! glTF 2.0 decoding (`.gltf` with embedded buffers, or `.glb`).

use fabmesh_math::{Point3, Transform};
use fabmesh_mesh::Mesh;
use nalgebra::Matrix4;
use tracing::debug;

use crate::error::{IoError, Result};
use crate::format::ModelFormat;

/// Decode a glTF asset held in memory.
///
/// The default scene (or the first scene) is walked and every triangle
/// primitive is baked into one mesh with its node's world transform applied.
/// Assets without scenes fall back to their raw mesh list. External buffer
/// URIs cannot be resolved from a byte slice and fail to decode.
pub fn decode_gltf(bytes: &[u8]) -> Result<Mesh> {
    let (document, buffers, _images) = gltf::import_slice(bytes).map_err(|e| IoError::Decode {
        format: ModelFormat::Gltf,
        details: e.to_string(),
    })?;

    let mut mesh = Mesh::empty();
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                collect_node(&node, &Transform::identity(), &buffers, &mut mesh)?;
            }
        }
        None => {
            for gmesh in document.meshes() {
                append_mesh(&gmesh, &Transform::identity(), &buffers, &mut mesh)?;
            }
        }
    }

    Ok(mesh)
}

fn collect_node(
    node: &gltf::Node<'_>,
    parent: &Transform,
    buffers: &[gltf::buffer::Data],
    out: &mut Mesh,
) -> Result<()> {
    let local = Transform {
        matrix: Matrix4::<f32>::from(node.transform().matrix()).cast::<f64>(),
    };
    let world = parent.then(&local);

    if let Some(gmesh) = node.mesh() {
        append_mesh(&gmesh, &world, buffers, out)?;
    }
    for child in node.children() {
        collect_node(&child, &world, buffers, out)?;
    }
    Ok(())
}

fn append_mesh(
    gmesh: &gltf::Mesh<'_>,
    world: &Transform,
    buffers: &[gltf::buffer::Data],
    out: &mut Mesh,
) -> Result<()> {
    for primitive in gmesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            debug!(
                "skipping glTF primitive {} of mesh {:?} (mode {:?})",
                primitive.index(),
                gmesh.name(),
                primitive.mode()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));
        let Some(read_positions) = reader.read_positions() else {
            continue;
        };

        let mut positions = Vec::with_capacity(read_positions.size_hint().0 * 3);
        for [x, y, z] in read_positions {
            let p = world.apply_point(&Point3::new(x as f64, y as f64, z as f64));
            positions.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        }

        let part = match reader.read_indices() {
            Some(indices) => Mesh::indexed(positions, indices.into_u32().collect())?,
            None => Mesh::non_indexed(positions)?,
        };
        out.merge(&part)?;
    }
    Ok(())
}
