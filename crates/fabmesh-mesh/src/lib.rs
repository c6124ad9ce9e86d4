#![warn(missing_docs)]

//! Triangle mesh buffers for fabmesh.
//!
//! A [`Mesh`] is a flat position buffer plus an optional index buffer. When
//! the index buffer is absent every three consecutive vertices form one
//! triangle. The buffer layout is checked once, in the constructors, so code
//! holding a `Mesh` can index it without further checks.
//!
//! # Example
//!
//! ```
//! use fabmesh_mesh::Mesh;
//!
//! let tri = Mesh::non_indexed(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]).unwrap();
//! assert_eq!(tri.num_triangles(), 1);
//! assert!(Mesh::indexed(vec![0.0; 9], vec![0, 1, 3]).is_err());
//! ```

pub mod bounds;
pub mod error;

pub use bounds::BoundingBox;
pub use error::{MeshError, Result};

use fabmesh_math::{Point3, Transform};
use serde::{Deserialize, Serialize};

/// Which source axis points away from the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpAxis {
    /// +Y is up (glTF, most real-time renderers).
    Y,
    /// +Z is up (print beds, most STL/OBJ exporters).
    Z,
}

/// A validated triangle mesh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    positions: Vec<f32>,
    indices: Option<Vec<u32>>,
}

impl Mesh {
    /// An empty, non-indexed mesh.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an indexed mesh.
    ///
    /// Fails if either buffer is not made of triples or an index points
    /// past the end of the vertex buffer.
    pub fn indexed(positions: Vec<f32>, indices: Vec<u32>) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(MeshError::PositionsNotTriples(positions.len()));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndicesNotTriples(indices.len()));
        }
        let vertex_count = positions.len() / 3;
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                position,
                vertex_count,
            });
        }
        Ok(Self {
            positions,
            indices: Some(indices),
        })
    }

    /// Build a flat triangle list.
    pub fn non_indexed(positions: Vec<f32>) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(MeshError::PositionsNotTriples(positions.len()));
        }
        let vertex_count = positions.len() / 3;
        if vertex_count % 3 != 0 {
            return Err(MeshError::VertexCountNotTriangles(vertex_count));
        }
        Ok(Self {
            positions,
            indices: None,
        })
    }

    /// Flat array of vertex positions `[x0, y0, z0, x1, y1, z1, ...]`.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat array of triangle indices, if the mesh is indexed.
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    /// Whether triangles are described by an index buffer.
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.num_vertices() / 3,
        }
    }

    /// True when the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.num_triangles() == 0
    }

    /// Position of vertex `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.num_vertices()`.
    pub fn vertex(&self, i: usize) -> Point3 {
        let p = &self.positions[i * 3..i * 3 + 3];
        Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)
    }

    /// Corners of triangle `t` in winding order.
    ///
    /// # Panics
    ///
    /// Panics if `t >= self.num_triangles()`.
    pub fn triangle(&self, t: usize) -> [Point3; 3] {
        match &self.indices {
            Some(indices) => [
                self.vertex(indices[t * 3] as usize),
                self.vertex(indices[t * 3 + 1] as usize),
                self.vertex(indices[t * 3 + 2] as usize),
            ],
            None => [
                self.vertex(t * 3),
                self.vertex(t * 3 + 1),
                self.vertex(t * 3 + 2),
            ],
        }
    }

    /// Iterate over all triangles.
    pub fn triangles(&self) -> Triangles<'_> {
        self.triangles_in(0..self.num_triangles())
    }

    /// Iterate over the triangles in `range`, clamped to the mesh.
    pub fn triangles_in(&self, range: std::ops::Range<usize>) -> Triangles<'_> {
        let end = range.end.min(self.num_triangles());
        Triangles {
            mesh: self,
            next: range.start.min(end),
            end,
        }
    }

    /// Axis-aligned bounds over every vertex, `None` for an empty buffer.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_positions(&self.positions)
    }

    /// Equivalent non-indexed mesh with duplicated vertices.
    pub fn flattened(&self) -> Mesh {
        match &self.indices {
            None => self.clone(),
            Some(indices) => {
                let mut positions = Vec::with_capacity(indices.len() * 3);
                for &i in indices {
                    let i = i as usize * 3;
                    positions.extend_from_slice(&self.positions[i..i + 3]);
                }
                Mesh {
                    positions,
                    indices: None,
                }
            }
        }
    }

    /// Same surface with every triangle's winding reversed.
    pub fn reversed_winding(&self) -> Mesh {
        match &self.indices {
            Some(indices) => {
                let mut flipped = indices.clone();
                for tri in flipped.chunks_exact_mut(3) {
                    tri.swap(1, 2);
                }
                Mesh {
                    positions: self.positions.clone(),
                    indices: Some(flipped),
                }
            }
            None => {
                let mut positions = self.positions.clone();
                for tri in positions.chunks_exact_mut(9) {
                    for k in 0..3 {
                        tri.swap(3 + k, 6 + k);
                    }
                }
                Mesh {
                    positions,
                    indices: None,
                }
            }
        }
    }

    /// Append another mesh.
    ///
    /// The result stays indexed only when both inputs are indexed. Fails
    /// with [`MeshError::TooManyVertices`] if the indexed result would not
    /// fit `u32` indices; `self` is unchanged then.
    pub fn merge(&mut self, other: &Mesh) -> Result<()> {
        if self.positions.is_empty() {
            *self = other.clone();
            return Ok(());
        }
        let existing = self.num_vertices();
        match (self.indices.as_mut(), other.indices.as_ref()) {
            (Some(mine), Some(theirs)) => {
                let offset = index_offset(existing, other.num_vertices())?;
                mine.extend(theirs.iter().map(|&i| i + offset));
                self.positions.extend_from_slice(&other.positions);
            }
            (None, None) => self.positions.extend_from_slice(&other.positions),
            _ => {
                let mut flat = self.flattened();
                flat.positions
                    .extend_from_slice(other.flattened().positions());
                *self = flat;
            }
        }
        Ok(())
    }

    /// Apply `transform` to every vertex in place.
    pub fn transform(&mut self, transform: &Transform) {
        for p in self.positions.chunks_exact_mut(3) {
            let q = transform.apply_point(&Point3::new(p[0] as f64, p[1] as f64, p[2] as f64));
            p[0] = q.x as f32;
            p[1] = q.y as f32;
            p[2] = q.z as f32;
        }
    }

    /// Rotate a mesh authored with `up` into a Y-up frame.
    pub fn to_y_up(&mut self, up: UpAxis) {
        if up == UpAxis::Z {
            // (x, y, z) -> (x, z, -y)
            self.transform(&Transform::rotation_x(-std::f64::consts::FRAC_PI_2));
        }
    }

    /// Stand a Y-up mesh on the ground plane.
    ///
    /// Afterwards the bounding box is centered on X and Z and its lowest
    /// point sits at Y = 0. Returns the bounds after the move, or `None`
    /// for an empty mesh (which is left untouched).
    pub fn recenter_on_ground(&mut self) -> Option<BoundingBox> {
        let bbox = self.bounding_box()?;
        let center = bbox.center();
        self.transform(&Transform::translation(-center.x, -bbox.min.y, -center.z));
        self.bounding_box()
    }
}

/// Index offset for appending `added` vertices after `existing` ones.
///
/// Every index of the combined mesh, at most `existing + added - 1`, must
/// fit in a `u32`.
fn index_offset(existing: usize, added: usize) -> Result<u32> {
    let total = existing.saturating_add(added);
    if total as u64 > u32::MAX as u64 + 1 {
        return Err(MeshError::TooManyVertices(total));
    }
    u32::try_from(existing).map_err(|_| MeshError::TooManyVertices(total))
}

/// Iterator over mesh triangles, see [`Mesh::triangles`].
pub struct Triangles<'a> {
    mesh: &'a Mesh,
    next: usize,
    end: usize,
}

impl Iterator for Triangles<'_> {
    type Item = [Point3; 3];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let tri = self.mesh.triangle(self.next);
        self.next += 1;
        Some(tri)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Triangles<'_> {}
