/// Pointer handling that turns raw host events into camera updates
use nalgebra::Point2;

use crate::camera::{CameraConfig, OrbitalCamera};

/// Owns the orbit camera plus the pointer state needed to derive drag deltas.
///
/// The host forwards absolute pointer positions, button changes and scroll
/// steps; the controller decides what reaches the camera. Only movement
/// while the primary button is held orbits.
#[derive(Debug, Clone, Default)]
pub struct OrbitController {
    camera: OrbitalCamera,
    last_pointer: Option<Point2<f32>>,
    dragging: bool,
}

impl OrbitController {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            camera: OrbitalCamera::new(config),
            last_pointer: None,
            dragging: false,
        }
    }

    pub fn camera(&self) -> &OrbitalCamera {
        &self.camera
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_primary_button(&mut self, pressed: bool) {
        self.dragging = pressed;
    }

    /// Record a new absolute pointer position, orbiting if a drag is active.
    ///
    /// The first position ever seen only seeds the tracker. Screen y grows
    /// downward, so the delta passed on is `last_y - y`.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let current = Point2::new(x, y);
        let Some(last) = self.last_pointer.replace(current) else {
            return;
        };

        if self.dragging {
            self.camera.apply_pointer_delta(x - last.x, last.y - y);
        }
    }

    /// Orbit by a delta that did not come from the pointer, e.g. a key press.
    pub fn orbit_by(&mut self, dx: f32, dy: f32) {
        self.camera.apply_pointer_delta(dx, dy);
    }

    pub fn scrolled(&mut self, dy: f32) {
        self.camera.apply_zoom_delta(dy);
    }
}
