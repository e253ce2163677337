pub mod camera_controller;
pub mod fly_camera;

pub use camera_controller::CameraController;
pub use fly_camera::{CameraMovement, FlyCamera};
