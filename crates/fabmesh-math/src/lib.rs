#![warn(missing_docs)]

//! Math types for fabmesh.
//!
//! Thin wrappers around nalgebra: points, vectors, a 4x4 affine/projective
//! transform with the handful of constructors the preview camera needs,
//! and the millimeter/centimeter conversion factors used by the analysis.

use nalgebra::{Matrix4, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Millimeters per centimeter.
pub const MM_PER_CM: f64 = 10.0;

/// Square millimeters per square centimeter.
pub const MM2_PER_CM2: f64 = MM_PER_CM * MM_PER_CM;

/// Cubic millimeters per cubic centimeter.
pub const MM3_PER_CM3: f64 = MM_PER_CM * MM_PER_CM * MM_PER_CM;

/// A 4x4 transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Right-handed view matrix looking from `eye` toward `target`.
    ///
    /// Camera space has +X right, +Y up and looks down -Z.
    pub fn look_at(eye: &Point3, target: &Point3, up: &Vec3) -> Self {
        Self {
            matrix: Matrix4::look_at_rh(eye, target, up),
        }
    }

    /// Right-handed perspective projection into clip space.
    ///
    /// `fov_y` is the vertical field of view in radians. Depth maps to
    /// `[-1, 1]` in normalized device coordinates.
    pub fn perspective(aspect: f64, fov_y: f64, near: f64, far: f64) -> Self {
        Self {
            matrix: Matrix4::new_perspective(aspect, fov_y, near, far),
        }
    }

    /// Compose: `self` then `other` (self * other).
    ///
    /// Applying the result to a point applies `other` first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point (affine, `w` assumed 1 and dropped).
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a point and keep the homogeneous coordinate.
    pub fn apply_homogeneous(&self, p: &Point3) -> Vector4<f64> {
        self.matrix * Vector4::new(p.x, p.y, p.z, 1.0)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
