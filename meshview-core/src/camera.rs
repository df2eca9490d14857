/// Orbit camera circling the world origin
use std::f32::consts::FRAC_PI_2;

use nalgebra::{Matrix4, Point3, Vector3};

pub const MIN_RADIUS: f32 = 1.0;
pub const MAX_RADIUS: f32 = 50.0;
/// Gap kept between the polar angle and the poles.
pub const POLAR_EPSILON: f32 = 0.001;
pub const MAX_POLAR: f32 = FRAC_PI_2 - POLAR_EPSILON;
pub const MIN_POLAR: f32 = -MAX_POLAR;
pub const FIELD_OF_VIEW_DEGREES: f32 = 45.0;

/// Initial placement and input scaling for an [`OrbitalCamera`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub radius: f32,
    pub azimuth: f32,
    pub polar: f32,
    /// Radians per unit of pointer motion.
    pub mouse_sensitivity: f32,
    /// Radius change per unit of scroll.
    pub zoom_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            radius: 5.0,
            azimuth: 0.0,
            polar: 0.0,
            mouse_sensitivity: 0.005,
            zoom_sensitivity: 0.5,
        }
    }
}

/// Camera position in spherical coordinates around the origin.
///
/// `polar` is elevation above the XZ plane, `azimuth` is rotation about +Y
/// measured from +X toward +Z. Zooming changes only `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalCamera {
    radius: f32,
    azimuth: f32,
    polar: f32,
    mouse_sensitivity: f32,
    zoom_sensitivity: f32,
}

impl OrbitalCamera {
    /// Start from `config`, pulling radius and polar angle into their limits.
    pub fn new(config: CameraConfig) -> Self {
        Self {
            radius: config.radius.clamp(MIN_RADIUS, MAX_RADIUS),
            azimuth: config.azimuth,
            polar: config.polar.clamp(MIN_POLAR, MAX_POLAR),
            mouse_sensitivity: config.mouse_sensitivity,
            zoom_sensitivity: config.zoom_sensitivity,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    /// Orbit by a pointer drag. Positive `dy` lowers the polar angle.
    pub fn apply_pointer_delta(&mut self, dx: f32, dy: f32) {
        self.azimuth += dx * self.mouse_sensitivity;
        self.polar = (self.polar - dy * self.mouse_sensitivity).clamp(MIN_POLAR, MAX_POLAR);
    }

    /// Zoom by a scroll step. Positive `dy` moves the camera closer.
    pub fn apply_zoom_delta(&mut self, dy: f32) {
        self.radius = (self.radius - dy * self.zoom_sensitivity).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    /// Eye position in world space.
    pub fn position(&self) -> Point3<f32> {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        Point3::new(
            self.radius * cos_polar * cos_azimuth,
            self.radius * sin_polar,
            self.radius * cos_polar * sin_azimuth,
        )
    }

    /// Right-handed look-at from `position()` to the origin with +Y up.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position(), &Point3::origin(), &Vector3::y())
    }

    /// Vertical field of view in degrees. Constant; zoom is carried by the radius.
    pub fn field_of_view(&self) -> f32 {
        FIELD_OF_VIEW_DEGREES
    }
}

impl Default for OrbitalCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(radius: f32, azimuth: f32, polar: f32) -> OrbitalCamera {
        OrbitalCamera::new(CameraConfig {
            radius,
            azimuth,
            polar,
            ..CameraConfig::default()
        })
    }

    #[test]
    fn test_camera_defaults() {
        let camera = OrbitalCamera::default();
        assert_eq!(camera.radius(), 5.0);
        assert_eq!(camera.azimuth(), 0.0);
        assert_eq!(camera.polar(), 0.0);
        assert_eq!(camera.field_of_view(), 45.0);
    }

    #[test]
    fn test_construction_clamps() {
        let camera = camera_at(0.1, 0.0, 3.0);
        assert_eq!(camera.radius(), MIN_RADIUS);
        assert_eq!(camera.polar(), MAX_POLAR);

        let camera = camera_at(500.0, 0.0, -3.0);
        assert_eq!(camera.radius(), MAX_RADIUS);
        assert_eq!(camera.polar(), MIN_POLAR);
    }

    #[test]
    fn test_pointer_delta() {
        let mut camera = OrbitalCamera::default();
        camera.apply_pointer_delta(100.0, 20.0);
        assert!((camera.azimuth() - 0.5).abs() < 1e-6);
        assert!((camera.polar() + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_polar_clamps_at_poles() {
        let mut camera = OrbitalCamera::default();
        camera.apply_pointer_delta(0.0, -1.0e6);
        assert_eq!(camera.polar(), FRAC_PI_2 - 0.001);

        camera.apply_pointer_delta(0.0, 1.0e6);
        assert_eq!(camera.polar(), -(FRAC_PI_2 - 0.001));
    }

    #[test]
    fn test_azimuth_is_not_wrapped() {
        let mut camera = OrbitalCamera::default();
        for _ in 0..10 {
            camera.apply_pointer_delta(1000.0, 0.0);
        }
        assert!((camera.azimuth() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut camera = OrbitalCamera::default();
        camera.apply_zoom_delta(1.0);
        assert!((camera.radius() - 4.5).abs() < 1e-6);

        camera.apply_zoom_delta(1000.0);
        assert_eq!(camera.radius(), 1.0);

        camera.apply_zoom_delta(-1000.0);
        assert_eq!(camera.radius(), 50.0);
    }

    #[test]
    fn test_position_on_equator() {
        let camera = camera_at(7.0, 0.0, 0.0);
        assert!((camera.position() - Point3::new(7.0, 0.0, 0.0)).norm() < 1e-6);

        let camera = camera_at(7.0, FRAC_PI_2, 0.0);
        assert!((camera.position() - Point3::new(0.0, 0.0, 7.0)).norm() < 1e-5);
    }

    #[test]
    fn test_position_near_pole() {
        let camera = camera_at(7.0, 0.0, MAX_POLAR);
        let position = camera.position();
        assert!((position - Point3::new(0.0, 7.0, 0.0)).norm() < 7.0 * 2.0 * POLAR_EPSILON);
        assert!(position.y < 7.0);
    }

    #[test]
    fn test_view_matrix_moves_origin_in_front() {
        let mut camera = OrbitalCamera::default();
        camera.apply_pointer_delta(120.0, -45.0);
        let view = camera.view_matrix();

        let origin = view.transform_point(&Point3::origin());
        assert!(origin.x.abs() < 1e-5);
        assert!(origin.y.abs() < 1e-5);
        assert!((origin.z + camera.radius()).abs() < 1e-4);
    }

    #[test]
    fn test_view_matrix_at_pole_is_finite() {
        let mut camera = OrbitalCamera::default();
        camera.apply_pointer_delta(0.0, -1.0e6);
        assert!(camera.view_matrix().iter().all(|value| value.is_finite()));
    }
}
