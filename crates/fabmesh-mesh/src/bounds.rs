//! Axis-aligned bounding boxes.

use fabmesh_math::{Point3, Vec3};

/// Axis-aligned bounding box in 3D.
///
/// Always derived from a vertex buffer; there is no way to build one that
/// does not enclose at least one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl BoundingBox {
    /// Scan a flat `[x0, y0, z0, x1, ...]` buffer once.
    ///
    /// Returns `None` for an empty buffer.
    pub fn from_positions(positions: &[f32]) -> Option<Self> {
        let mut chunks = positions.chunks_exact(3);
        let first = chunks.next()?;
        let start = Point3::new(first[0] as f64, first[1] as f64, first[2] as f64);
        let mut bbox = Self {
            min: start,
            max: start,
        };
        for chunk in chunks {
            bbox.include(&Point3::new(
                chunk[0] as f64,
                chunk[1] as f64,
                chunk[2] as f64,
            ));
        }
        Some(bbox)
    }

    /// Grow to include `p`.
    pub fn include(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Box center.
    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Largest of the three extents.
    pub fn max_dimension(&self) -> f64 {
        let s = self.size();
        s.x.max(s.y).max(s.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_no_bounds() {
        assert!(BoundingBox::from_positions(&[]).is_none());
    }

    #[test]
    fn test_bounds_of_scattered_points() {
        let bbox =
            BoundingBox::from_positions(&[1.0, -2.0, 3.0, -4.0, 5.0, 0.5, 2.0, 0.0, -1.0]).unwrap();
        assert_eq!(bbox.min, Point3::new(-4.0, -2.0, -1.0));
        assert_eq!(bbox.max, Point3::new(2.0, 5.0, 3.0));
        assert_eq!(bbox.size(), Vec3::new(6.0, 7.0, 4.0));
        assert_eq!(bbox.max_dimension(), 7.0);
        assert_eq!(bbox.center(), Point3::new(-1.0, 1.5, 1.0));
    }

    #[test]
    fn test_single_point_has_zero_extent() {
        let bbox = BoundingBox::from_positions(&[3.0, 3.0, 3.0]).unwrap();
        assert_eq!(bbox.max_dimension(), 0.0);
    }
}
