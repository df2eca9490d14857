/// Model transforms that place loaded meshes in front of the orbit camera
use std::f32::consts::FRAC_PI_2;

use nalgebra::{Matrix4, Vector3};

use crate::geometry::Bounds;

/// Transform builder for model matrices
pub struct Transform;

impl Transform {
    /// Rotate a Z-up model (the usual STL convention) into the Y-up camera frame.
    pub fn z_up_to_y_up() -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(-FRAC_PI_2, 0.0, 0.0))
    }

    /// Center `bounds` on the origin and scale it to a sphere of `radius`,
    /// then stand it up in the Y-up frame.
    pub fn fit(bounds: &Bounds, radius: f32) -> Matrix4<f32> {
        let extent = bounds.radius();
        let scale = if extent > f32::EPSILON {
            radius / extent
        } else {
            1.0
        };
        let center = bounds.center().coords;

        Self::z_up_to_y_up()
            * Matrix4::new_scaling(scale)
            * Matrix4::new_translation(&-center)
    }
}
