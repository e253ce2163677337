use cgmath::{InnerSpace, Matrix4, Point3, Vector3};

use crate::config;

/// Discrete movement directions, decoupled from any windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Free-fly camera driven by yaw/pitch Euler angles (degrees).
///
/// The derived `front` and `right` vectors are kept unit-length and
/// consistent with yaw/pitch at all times; pitch is clamped to avoid
/// flipping over the vertical axis.
#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    pub position: Vector3<f32>,
    pub front: Vector3<f32>,
    pub right: Vector3<f32>,
    pub world_up: Vector3<f32>,

    /// Yaw in degrees. -90 looks down negative Z.
    pub yaw: f32,
    /// Pitch in degrees, clamped to [-89, 89].
    pub pitch: f32,

    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees, clamped to [1, 150].
    pub zoom: f32,
}

const PITCH_LIMIT: f32 = 89.0;
const MIN_FOV: f32 = 1.0;
const MAX_FOV: f32 = 150.0;

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(config::CAMERA_START_POSITION.into())
    }
}

impl FlyCamera {
    pub fn new(position: Vector3<f32>) -> Self {
        let mut camera = Self {
            position,
            front: Vector3::new(0.0, 0.0, -1.0),
            right: Vector3::new(1.0, 0.0, 0.0),
            world_up: Vector3::unit_y(),
            yaw: -90.0,
            pitch: 0.0,
            movement_speed: config::CAMERA_SPEED,
            mouse_sensitivity: config::CAMERA_SENSITIVITY,
            zoom: config::CAMERA_DEFAULT_ZOOM,
        };
        camera.update_vectors();
        camera
    }

    /// Returns the look-at view matrix for the current pose.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::new(self.position.x, self.position.y, self.position.z);
        let target = eye + self.front;
        Matrix4::look_at_rh(eye, target, self.world_up)
    }

    /// Moves the camera along its basis vectors. No bounds checking.
    pub fn process_movement(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Up => self.position += self.world_up * velocity,
            CameraMovement::Down => self.position -= self.world_up * velocity,
        }
    }

    /// Applies a cursor delta in pixels. Positive `y_offset` pitches up
    /// (callers invert raw window coordinates before passing them in).
    pub fn process_look(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Applies a scroll-wheel delta to the field of view.
    pub fn process_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset * 2.0).clamp(MIN_FOV, MAX_FOV);
    }

    /// Recomputes `front` and `right` from the current Euler angles.
    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let front = Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );
        self.front = front.normalize();
        // Re-normalized because the cross product shrinks toward zero as
        // the camera looks straight up or down.
        self.right = self.front.cross(self.world_up).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{EuclideanSpace, Point3, Transform};

    const EPS: f32 = 1e-5;

    #[test]
    fn basis_vectors_stay_unit_length_and_orthogonal() {
        let mut camera = FlyCamera::new(Vector3::new(0.0, 0.0, 0.0));
        for (dx, dy) in [(35.0, 10.0), (-120.0, -60.0), (400.0, 88.0), (7.5, -88.0)] {
            camera.process_look(dx, dy, true);
            assert_relative_eq!(camera.front.magnitude(), 1.0, epsilon = EPS);
            assert_relative_eq!(camera.right.magnitude(), 1.0, epsilon = EPS);
            assert_relative_eq!(camera.front.dot(camera.right), 0.0, epsilon = EPS);
        }
    }

    #[test]
    fn pitch_clamps_exactly_to_boundary() {
        let mut camera = FlyCamera::default();
        // Sensitivity is 0.1, so 5000 pixels overshoots far past the limit.
        camera.process_look(0.0, 5000.0, true);
        assert_eq!(camera.pitch, 89.0);
        camera.process_look(0.0, -100_000.0, true);
        assert_eq!(camera.pitch, -89.0);
    }

    #[test]
    fn unconstrained_pitch_is_not_clamped() {
        let mut camera = FlyCamera::default();
        camera.process_look(0.0, 5000.0, false);
        assert!(camera.pitch > 89.0);
    }

    #[test]
    fn scroll_zoom_steps_and_clamps() {
        let mut camera = FlyCamera::default();
        let initial = camera.zoom;
        camera.process_scroll(1.0);
        assert_relative_eq!(camera.zoom, initial - 2.0, epsilon = EPS);

        camera.process_scroll(1000.0);
        assert_eq!(camera.zoom, 1.0);
        camera.process_scroll(-1000.0);
        assert_eq!(camera.zoom, 150.0);
    }

    #[test]
    fn movement_follows_basis_vectors() {
        let mut camera = FlyCamera::new(Vector3::new(0.0, 0.0, 0.0));
        camera.process_movement(CameraMovement::Forward, 1.0);
        let expected = camera.front * camera.movement_speed;
        assert_relative_eq!(camera.position.x, expected.x, epsilon = EPS);
        assert_relative_eq!(camera.position.y, expected.y, epsilon = EPS);
        assert_relative_eq!(camera.position.z, expected.z, epsilon = EPS);

        let before = camera.position;
        camera.process_movement(CameraMovement::Up, 0.5);
        let dy = camera.position.y - before.y;
        assert_relative_eq!(dy, camera.movement_speed * 0.5, epsilon = EPS);
    }

    #[test]
    fn view_matrix_maps_position_to_origin() {
        let camera = FlyCamera::new(Vector3::new(3.0, -2.0, 7.0));
        let view = camera.view_matrix();
        let eye = Point3::new(3.0, -2.0, 7.0);
        let transformed = view.transform_point(eye);
        assert_relative_eq!(transformed.to_vec().magnitude(), 0.0, epsilon = 1e-4);
    }
}
