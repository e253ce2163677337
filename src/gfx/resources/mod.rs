pub mod global_bindings;
pub mod material;
pub mod texture;

pub use global_bindings::{GlobalBindings, PointLight};
pub use material::{DefaultTextures, MaterialBindings};
pub use texture::{PathCache, TextureCache, TextureResource};
