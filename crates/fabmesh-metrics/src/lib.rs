#![warn(missing_docs)]

//! Model metrics for print quoting.
//!
//! Computes enclosed volume, surface area and bounding-box dimensions of a
//! triangle mesh. Input coordinates are taken to be millimeters; results are
//! reported in centimeters, square centimeters and cubic centimeters.
//!
//! Volume uses the divergence theorem: each triangle contributes the signed
//! volume of the tetrahedron it spans with the origin. The sum is only
//! meaningful for a closed, consistently wound mesh; open or self-intersecting
//! meshes produce a number, just not a physical one.
//!
//! # Example
//!
//! ```
//! use fabmesh_mesh::Mesh;
//! use fabmesh_metrics::analyze;
//!
//! let mesh = Mesh::non_indexed(vec![0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 10.0, 0.0]).unwrap();
//! let result = analyze(&mesh);
//! assert!((result.surface_area - 0.5).abs() < 1e-9);
//! ```

use fabmesh_math::{Point3, MM2_PER_CM2, MM3_PER_CM3, MM_PER_CM};
use fabmesh_mesh::Mesh;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Triangles folded into one partial sum before it joins the total.
pub const CHUNK_TRIANGLES: usize = 1 << 16;

/// PLA density in g/cm³, the shop default for mass estimates.
pub const PLA_DENSITY: f64 = 1.24;

/// Bounding-box extents in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    /// Extent along X (cm).
    pub x: f64,
    /// Extent along Y (cm).
    pub y: f64,
    /// Extent along Z (cm).
    pub z: f64,
}

/// Metrics of one mesh snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Enclosed volume (cm³), independent of winding order.
    pub volume: f64,
    /// Bounding-box extents (cm).
    pub bounding_box: Dimensions,
    /// Total surface area (cm²).
    pub surface_area: f64,
    /// Triangles analyzed.
    pub triangle_count: usize,
    /// Vertices in the source buffer.
    pub vertex_count: usize,
}

impl AnalysisResult {
    /// Printed mass in grams for a solid part of the given material density.
    pub fn mass_grams(&self, density_g_per_cm3: f64) -> f64 {
        self.volume * density_g_per_cm3
    }
}

/// Signed volume of the tetrahedron `(origin, v1, v2, v3)`.
///
/// Positive when the triangle winds counter-clockwise seen from outside a
/// mesh that encloses the origin side.
pub fn signed_volume(v1: &Point3, v2: &Point3, v3: &Point3) -> f64 {
    (-v3.x * v2.y * v1.z + v2.x * v3.y * v1.z + v3.x * v1.y * v2.z
        - v1.x * v3.y * v2.z
        - v2.x * v1.y * v3.z
        + v1.x * v2.y * v3.z)
        / 6.0
}

/// Area of triangle `(v1, v2, v3)`.
pub fn triangle_area(v1: &Point3, v2: &Point3, v3: &Point3) -> f64 {
    (v2 - v1).cross(&(v3 - v1)).norm() / 2.0
}

/// Raw sums in mesh units (mm³ / mm²).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulated {
    /// Sum of signed tetrahedron volumes.
    pub signed_volume: f64,
    /// Sum of triangle areas.
    pub area: f64,
}

/// Accumulate signed volume and area over every triangle.
pub fn accumulate(mesh: &Mesh) -> Accumulated {
    let triangles = mesh.num_triangles();
    let mut total = Accumulated::default();
    let mut start = 0;
    while start < triangles {
        let end = (start + CHUNK_TRIANGLES).min(triangles);
        let mut chunk = Accumulated::default();
        for [v1, v2, v3] in mesh.triangles_in(start..end) {
            chunk.signed_volume += signed_volume(&v1, &v2, &v3);
            chunk.area += triangle_area(&v1, &v2, &v3);
        }
        total.signed_volume += chunk.signed_volume;
        total.area += chunk.area;
        start = end;
    }
    total
}

/// Analyze a mesh whose coordinates are in millimeters.
///
/// An empty mesh yields zero volume, area and extents.
pub fn analyze(mesh: &Mesh) -> AnalysisResult {
    let bounding_box = mesh
        .bounding_box()
        .map(|bbox| {
            let size = bbox.size();
            Dimensions {
                x: size.x / MM_PER_CM,
                y: size.y / MM_PER_CM,
                z: size.z / MM_PER_CM,
            }
        })
        .unwrap_or_default();

    let sums = accumulate(mesh);
    let result = AnalysisResult {
        volume: sums.signed_volume.abs() / MM3_PER_CM3,
        bounding_box,
        surface_area: sums.area / MM2_PER_CM2,
        triangle_count: mesh.num_triangles(),
        vertex_count: mesh.num_vertices(),
    };

    debug!(
        triangles = result.triangle_count,
        signed_volume_mm3 = sums.signed_volume,
        volume_cm3 = result.volume,
        area_cm2 = result.surface_area,
        "analyzed mesh"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// 10mm cube, outward-facing CCW winding.
    fn make_cube_mesh() -> Mesh {
        let size = 10.0f32;
        let vertices = vec![
            0.0, 0.0, 0.0, size, 0.0, 0.0, size, size, 0.0, 0.0, size, 0.0,
            0.0, 0.0, size, size, 0.0, size, size, size, size, 0.0, size, size,
        ];
        let indices = vec![
            0, 2, 1, 0, 3, 2,
            4, 5, 6, 4, 6, 7,
            0, 1, 5, 0, 5, 4,
            2, 3, 7, 2, 7, 6,
            0, 4, 7, 0, 7, 3,
            1, 2, 6, 1, 6, 5,
        ];
        Mesh::indexed(vertices, indices).unwrap()
    }

    fn make_box_mesh(x0: f32, y0: f32, z0: f32, sx: f32, sy: f32, sz: f32) -> Mesh {
        let (x1, y1, z1) = (x0 + sx, y0 + sy, z0 + sz);
        let vertices = vec![
            x0, y0, z0, x1, y0, z0, x1, y1, z0, x0, y1, z0,
            x0, y0, z1, x1, y0, z1, x1, y1, z1, x0, y1, z1,
        ];
        let indices = make_cube_mesh().indices().unwrap().to_vec();
        Mesh::indexed(vertices, indices).unwrap()
    }

    #[test]
    fn test_unit_cube_volume_and_area() {
        let result = analyze(&make_cube_mesh());
        assert_relative_eq!(result.volume, 1.0, epsilon = 1e-9);
        assert_relative_eq!(result.surface_area, 6.0, epsilon = 1e-9);
        assert_eq!(result.triangle_count, 12);
        assert_eq!(result.vertex_count, 8);
    }

    #[test]
    fn test_cube_winding_is_outward() {
        assert!(accumulate(&make_cube_mesh()).signed_volume > 0.0);
    }

    #[test]
    fn test_bounding_box_matches_independent_scan() {
        let mesh = make_box_mesh(-3.0, 2.5, 7.0, 12.0, 4.0, 25.0);
        let result = analyze(&mesh);

        let positions = mesh.positions();
        for axis in 0..3 {
            let values = positions.iter().skip(axis).step_by(3).map(|&v| v as f64);
            let min = values.clone().fold(f64::INFINITY, f64::min);
            let max = values.fold(f64::NEG_INFINITY, f64::max);
            let reported = match axis {
                0 => result.bounding_box.x,
                1 => result.bounding_box.y,
                _ => result.bounding_box.z,
            };
            assert_relative_eq!(reported, (max - min) / 10.0, epsilon = 1e-9);
        }
        assert_relative_eq!(result.bounding_box.x, 1.2, epsilon = 1e-6);
        assert_relative_eq!(result.bounding_box.y, 0.4, epsilon = 1e-6);
        assert_relative_eq!(result.bounding_box.z, 2.5, epsilon = 1e-6);
    }

    #[test]
    fn test_volume_is_translation_invariant() {
        let near = analyze(&make_box_mesh(0.0, 0.0, 0.0, 20.0, 10.0, 5.0));
        let far = analyze(&make_box_mesh(150.0, -80.0, 40.0, 20.0, 10.0, 5.0));
        assert_relative_eq!(near.volume, 1.0, epsilon = 1e-9);
        assert_relative_eq!(far.volume, near.volume, epsilon = 1e-6);
    }

    #[test]
    fn test_reversed_winding_keeps_volume() {
        let mesh = make_cube_mesh();
        let reversed = mesh.reversed_winding();
        assert!(accumulate(&reversed).signed_volume < 0.0);

        let a = analyze(&mesh);
        let b = analyze(&reversed);
        assert_relative_eq!(a.volume, b.volume, epsilon = 1e-12);
        assert_relative_eq!(a.surface_area, b.surface_area, epsilon = 1e-12);
    }

    #[test]
    fn test_indexed_and_flattened_agree() {
        let mesh = make_box_mesh(1.0, 2.0, 3.0, 7.0, 11.0, 13.0);
        let flat = mesh.flattened();
        assert!(!flat.is_indexed());

        let a = analyze(&mesh);
        let b = analyze(&flat);
        assert_relative_eq!(a.volume, b.volume, epsilon = 1e-9);
        assert_relative_eq!(a.surface_area, b.surface_area, epsilon = 1e-9);
        assert_eq!(a.bounding_box, b.bounding_box);
        assert_eq!(a.triangle_count, b.triangle_count);
    }

    #[test]
    fn test_degenerate_triangle_contributes_nothing() {
        let p = Point3::new(4.0, 5.0, 6.0);
        let q = Point3::new(-1.0, 2.0, 8.0);
        assert_eq!(triangle_area(&p, &p, &q), 0.0);
        assert_relative_eq!(signed_volume(&p, &p, &q), 0.0, epsilon = 1e-12);

        let degenerate = Mesh::non_indexed(vec![4.0, 5.0, 6.0, 4.0, 5.0, 6.0, -1.0, 2.0, 8.0]).unwrap();
        let result = analyze(&degenerate);
        assert_eq!(result.surface_area, 0.0);
        assert_relative_eq!(result.volume, 0.0, epsilon = 1e-12);

        let mut cube = make_cube_mesh().flattened();
        let before = analyze(&cube);
        cube.merge(&degenerate).unwrap();
        let after = analyze(&cube);
        assert_relative_eq!(before.volume, after.volume, epsilon = 1e-12);
        assert_relative_eq!(before.surface_area, after.surface_area, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_mesh_is_all_zero() {
        let result = analyze(&Mesh::empty());
        assert_eq!(result.volume, 0.0);
        assert_eq!(result.surface_area, 0.0);
        assert_eq!(result.bounding_box, Dimensions::default());
    }

    #[test]
    fn test_chunked_sum_spans_many_chunks() {
        // Enough copies of the cube to cross several chunk boundaries.
        let cube = make_cube_mesh();
        let copies = CHUNK_TRIANGLES / 12 * 2 + 5;
        let mut mesh = Mesh::empty();
        for _ in 0..copies {
            mesh.merge(&cube).unwrap();
        }
        assert!(mesh.num_triangles() > 2 * CHUNK_TRIANGLES);
        let result = analyze(&mesh);
        assert_relative_eq!(result.volume, copies as f64, max_relative = 1e-9);
        assert_relative_eq!(result.surface_area, 6.0 * copies as f64, max_relative = 1e-9);
    }

    #[test]
    fn test_mass_estimate() {
        let result = analyze(&make_cube_mesh());
        assert_relative_eq!(result.mass_grams(PLA_DENSITY), 1.24, epsilon = 1e-9);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(analyze(&make_cube_mesh())).unwrap();
        assert!(json.get("volume").is_some());
        assert!(json.get("surfaceArea").is_some());
        assert!(json["boundingBox"].get("x").is_some());
        assert!(json["boundingBox"].get("z").is_some());
    }
}
