/// Perspective projection and screen mapping for an orbit camera
use nalgebra::{Matrix4, Point3};

use crate::camera::OrbitalCamera;

/// Perspective frustum matching a camera's field of view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Create the projection matrix for `camera`'s field of view
    pub fn matrix(&self, camera: &OrbitalCamera) -> Matrix4<f32> {
        Matrix4::new_perspective(
            self.aspect,
            camera.field_of_view().to_radians(),
            self.near,
            self.far,
        )
    }

    /// Projection × view × model, ready to transform model-space points.
    pub fn mvp(&self, camera: &OrbitalCamera, model: &Matrix4<f32>) -> Matrix4<f32> {
        self.matrix(camera) * camera.view_matrix() * model
    }

    /// Map a point through `mvp` onto a `width` × `height` raster.
    ///
    /// Returns `(x, y, depth)` with depth in normalized device units, or `None`
    /// when the point falls outside the frustum.
    pub fn project_to_screen(
        mvp: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = mvp * point.to_homogeneous();

        // Behind the eye or on the camera plane
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        if !(-1.0..=1.0).contains(&depth) {
            return None;
        }

        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_creation() {
        let projection = Projection::new(800, 600);
        assert!((projection.aspect - 800.0 / 600.0).abs() < 1e-6);

        let degenerate = Projection::new(80, 0);
        assert!(degenerate.aspect.is_finite());
    }

    #[test]
    fn test_projection_resize() {
        let mut projection = Projection::new(800, 600);
        projection.resize(100, 50);
        assert!((projection.aspect - 2.0).abs() < 1e-6);

        projection.resize(100, 0);
        assert!(projection.aspect.is_finite());
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = OrbitalCamera::default();
        let projection = Projection::new(80, 40);
        let mvp = projection.mvp(&camera, &Matrix4::identity());

        let (x, y, depth) =
            Projection::project_to_screen(&mvp, &Point3::origin(), 80, 40).unwrap();
        assert!((x - 40.0).abs() < 1e-3);
        assert!((y - 20.0).abs() < 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_points_behind_camera_are_rejected() {
        let camera = OrbitalCamera::default();
        let projection = Projection::default();
        let mvp = projection.mvp(&camera, &Matrix4::identity());

        // Default camera sits on +X looking back at the origin
        let behind = Point3::new(20.0, 0.0, 0.0);
        assert!(Projection::project_to_screen(&mvp, &behind, 800, 600).is_none());
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let camera = OrbitalCamera::default();
        let projection = Projection::default();
        let mvp = projection.mvp(&camera, &Matrix4::identity());

        let (_, _, near) =
            Projection::project_to_screen(&mvp, &Point3::new(1.0, 0.0, 0.0), 800, 600).unwrap();
        let (_, _, far) =
            Projection::project_to_screen(&mvp, &Point3::new(-1.0, 0.0, 0.0), 800, 600).unwrap();
        assert!(near < far);
    }
}
