use std::collections::HashSet;

use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::fly_camera::{CameraMovement, FlyCamera};

/// Translates winit input events into camera state changes.
///
/// All input state lives here rather than in process-wide globals: the
/// pressed-key set, the flashlight toggle, and the look/scroll plumbing.
/// Held movement keys are applied once per frame with the frame delta.
pub struct CameraController {
    pressed: HashSet<KeyCode>,
    pub flashlight_enabled: bool,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            flashlight_enabled: false,
        }
    }

    /// Records key transitions. Returns true if the event was consumed.
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) -> bool {
        let PhysicalKey::Code(code) = event.physical_key else {
            return false;
        };

        match code {
            KeyCode::KeyW
            | KeyCode::KeyA
            | KeyCode::KeyS
            | KeyCode::KeyD
            | KeyCode::Space
            | KeyCode::ShiftLeft => {
                match event.state {
                    ElementState::Pressed => self.pressed.insert(code),
                    ElementState::Released => self.pressed.remove(&code),
                };
                true
            }
            KeyCode::KeyF => {
                if event.state == ElementState::Pressed && !event.repeat {
                    self.flashlight_enabled = !self.flashlight_enabled;
                }
                true
            }
            _ => false,
        }
    }

    /// Applies continuous look/scroll input from raw device events.
    pub fn process_device_event(&mut self, event: &DeviceEvent, camera: &mut FlyCamera) {
        match event {
            DeviceEvent::MouseMotion { delta } => {
                // Raw deltas grow downward; the camera expects pitch-up
                // to be positive.
                camera.process_look(delta.0 as f32, -delta.1 as f32, true);
            }
            DeviceEvent::MouseWheel { delta } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32,
                };
                camera.process_scroll(scroll);
            }
            _ => (),
        }
    }

    /// Applies held movement keys for this frame.
    pub fn update_camera(&self, camera: &mut FlyCamera, delta_time: f32) {
        for (code, movement) in [
            (KeyCode::KeyW, CameraMovement::Forward),
            (KeyCode::KeyS, CameraMovement::Backward),
            (KeyCode::KeyA, CameraMovement::Left),
            (KeyCode::KeyD, CameraMovement::Right),
            (KeyCode::Space, CameraMovement::Up),
            (KeyCode::ShiftLeft, CameraMovement::Down),
        ] {
            if self.pressed.contains(&code) {
                camera.process_movement(movement, delta_time);
            }
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}
