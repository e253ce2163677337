//! Graphics: camera, rendering pipelines, scene graph, skybox, and GPU
//! resource handling.

pub mod camera;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod skybox;

pub use camera::{CameraController, FlyCamera};
pub use rendering::render_engine::RenderEngine;
pub use scene::Scene;
pub use skybox::Skybox;
