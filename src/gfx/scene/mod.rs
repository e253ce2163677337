//! Scene graph: vertex layouts, meshes, models, objects, and the scene
//! container that owns them.

pub mod mesh;
pub mod model;
pub mod scene;
pub mod scene_object;
pub mod vertex;

pub use mesh::{DrawMesh, Mesh, TextureBinding, TextureRole};
pub use model::Model;
pub use scene::{orbit_position, Scene};
pub use scene_object::{
    DrawableRef, MeshId, ModelId, PipelineKind, SceneObject, Transform,
};
pub use vertex::{SkyVertex, Vertex3D, VertexLayout};
