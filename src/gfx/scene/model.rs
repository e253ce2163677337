//! OBJ model loading.
//!
//! A model is an ordered list of meshes flattened from the file; no node
//! hierarchy survives import; geometry is baked into object space. Each
//! referenced texture resolves relative to the model's directory and
//! loads through the shared path-keyed cache, so one file uploads once
//! regardless of how many meshes reference it.

use std::path::Path;

use crate::{
    error::AssetError,
    gfx::resources::{
        material::{DefaultTextures, MaterialBindings},
        texture::TextureCache,
    },
};

use super::{
    mesh::{Mesh, TextureBinding, TextureRole},
    vertex::Vertex3D,
};

pub struct Model {
    pub name: String,
    meshes: Vec<Mesh>,
}

impl Model {
    /// Parses an OBJ file into meshes. A parse failure aborts
    /// construction and propagates; per-texture failures do not (the
    /// cache substitutes a placeholder).
    pub fn load(
        path: &Path,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        textures: &mut TextureCache,
    ) -> Result<Self, AssetError> {
        let (models, materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|source| AssetError::ObjParse {
            path: path.to_path_buf(),
            source,
        })?;

        let materials = materials.unwrap_or_else(|err| {
            log::warn!("no usable MTL for {}: {}", path.display(), err);
            Vec::new()
        });

        let directory = path.parent().unwrap_or_else(|| Path::new("."));
        let mut meshes = Vec::with_capacity(models.len());

        for m in &models {
            let mesh = &m.mesh;
            let vertex_count = mesh.positions.len() / 3;

            let mut vertices = Vec::with_capacity(vertex_count);
            for i in 0..vertex_count {
                let normal = if mesh.normals.len() == mesh.positions.len() {
                    [
                        mesh.normals[i * 3],
                        mesh.normals[i * 3 + 1],
                        mesh.normals[i * 3 + 2],
                    ]
                } else {
                    [0.0; 3]
                };
                let uv = if mesh.texcoords.len() / 2 == vertex_count {
                    // OBJ uv origin is bottom-left; flip to top-left.
                    [mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1]]
                } else {
                    [0.0; 2]
                };
                vertices.push(Vertex3D {
                    position: [
                        mesh.positions[i * 3],
                        mesh.positions[i * 3 + 1],
                        mesh.positions[i * 3 + 2],
                    ],
                    normal,
                    uv,
                });
            }

            let mut bindings = Vec::new();
            if let Some(material_id) = mesh.material_id {
                if let Some(material) = materials.get(material_id) {
                    for (texture_path, role) in [
                        (&material.diffuse_texture, TextureRole::Diffuse),
                        (&material.specular_texture, TextureRole::Specular),
                    ] {
                        if let Some(texture_path) = texture_path {
                            let resolved = directory.join(texture_path);
                            let texture = textures.load(device, queue, &resolved);
                            bindings.push(TextureBinding::new(texture, role));
                        }
                    }
                }
            }

            meshes.push(Mesh::from_vertices(
                vertices,
                mesh.indices.clone(),
                bindings,
            ));
        }

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());

        log::info!(
            "loaded model '{}': {} meshes from {}",
            name,
            meshes.len(),
            path.display()
        );

        Ok(Self { name, meshes })
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn init_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        materials: &MaterialBindings,
        defaults: &DefaultTextures,
    ) {
        for mesh in &mut self.meshes {
            mesh.init_gpu_resources(device, materials, defaults);
        }
    }
}
