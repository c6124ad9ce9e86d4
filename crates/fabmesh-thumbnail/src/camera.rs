//! Camera placement for the three-quarter preview.
//!
//! The model is expected to be Y-up and already standing on the ground plane
//! (see [`fabmesh_mesh::Mesh::recenter_on_ground`]). Every distance here is a
//! multiple of the model's largest dimension, so a 5 mm bolt and a 300 mm
//! vase fill the frame the same way.

use fabmesh_math::{Point3, Transform, Vec3};
use fabmesh_mesh::BoundingBox;
use tracing::debug;

use crate::error::{Result, ThumbnailError};
use crate::settings::ThumbnailSettings;

/// Model pose and camera for one preview.
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Fixed tilt-and-turn applied to the model about its center.
    pub model: Transform,
    /// Camera position.
    pub eye: Point3,
    /// Point the camera looks at.
    pub target: Point3,
    /// World to camera.
    pub view: Transform,
    /// World to clip space.
    pub view_projection: Transform,
}

impl CameraRig {
    /// Frame a grounded model.
    ///
    /// Fails with [`ThumbnailError::DegenerateBounds`] when the largest
    /// dimension is zero or not finite.
    pub fn frame(bounds: &BoundingBox, settings: &ThumbnailSettings) -> Result<Self> {
        let max_dim = bounds.max_dimension();
        if !(max_dim.is_finite() && max_dim > 0.0) {
            return Err(ThumbnailError::DegenerateBounds(max_dim));
        }

        let mid_height = bounds.center().y;
        let model = Transform::translation(0.0, mid_height, 0.0)
            .then(&Transform::rotation_x(settings.tilt_deg.to_radians()))
            .then(&Transform::rotation_y(settings.turn_deg.to_radians()))
            .then(&Transform::translation(0.0, -mid_height, 0.0));

        let target = Point3::new(0.0, mid_height, 0.0);
        let eye = Point3::new(
            0.0,
            settings.height_factor * max_dim,
            settings.distance_factor * max_dim,
        );
        let view = Transform::look_at(&eye, &target, &Vec3::y());

        let distance = (eye - target).norm();
        let near = (distance - max_dim).max(distance * 0.01);
        let far = distance + 2.0 * max_dim;
        let projection = Transform::perspective(1.0, settings.fov_deg.to_radians(), near, far);

        debug!(
            max_dim,
            eye_y = eye.y,
            eye_z = eye.z,
            near,
            far,
            "framed preview camera"
        );

        Ok(Self {
            model,
            eye,
            target,
            view_projection: projection.then(&view),
            view,
        })
    }
}
