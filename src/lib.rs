//! glint: a small real-time 3D renderer built on wgpu.
//!
//! Fly camera, OBJ model loading, Phong-style lighting with orbiting
//! point lights and a camera flashlight, cubemap skyboxes, depth-sorted
//! transparency, and a fullscreen post-processing pass, with an ImGui
//! settings panel on top.
//!
//! The entry point is [`GlintApp`]: register a setup callback that
//! builds the [`Scene`], optionally add skybox presets, then `run()`.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod ui;
pub mod wgpu_utils;

pub use app::{AssetContext, GlintApp};
pub use error::AssetError;
pub use gfx::{
    camera::{CameraController, CameraMovement, FlyCamera},
    rendering::{PostMode, RenderEngine},
    resources::{TextureCache, TextureResource},
    scene::{
        DrawableRef, Mesh, MeshId, Model, ModelId, PipelineKind, Scene, SceneObject,
        TextureBinding, TextureRole, Transform, VertexLayout,
    },
    skybox::Skybox,
};
