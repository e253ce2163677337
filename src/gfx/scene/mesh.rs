//! Mesh: a vertex buffer, optional index buffer, and texture bindings.

use std::sync::Arc;

use crate::gfx::resources::{
    material::{DefaultTextures, MaterialBindings},
    texture::TextureResource,
};

use super::vertex::{Vertex3D, VertexLayout};

/// Semantic role of a bound texture, determining which shader slot and
/// naming index it resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureRole {
    Diffuse,
    Specular,
}

impl TextureRole {
    /// Shader-facing name for the nth texture of this role (1-based),
    /// e.g. the first diffuse map is `material.texture_diffuse1`.
    pub fn binding_name(self, occurrence: u32) -> String {
        let base = match self {
            TextureRole::Diffuse => "texture_diffuse",
            TextureRole::Specular => "texture_specular",
        };
        format!("material.{}{}", base, occurrence)
    }
}

/// A texture bound to a mesh under a semantic role.
pub struct TextureBinding {
    pub texture: Arc<TextureResource>,
    pub role: TextureRole,
}

impl TextureBinding {
    pub fn new(texture: Arc<TextureResource>, role: TextureRole) -> Self {
        Self { texture, role }
    }
}

/// Geometry plus texture bindings, GPU-resident after
/// `init_gpu_resources`.
///
/// The material bind group holds exactly one diffuse and one specular
/// slot, so only the first binding of each role is sampled at draw time;
/// `binding_slots` still reports the full occurrence-numbered assignment.
///
/// Construction from flat data treats malformed input (layout not evenly
/// dividing the buffer, out-of-range indices) as a programming error and
/// panics; these are caller preconditions, not recoverable failures.
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    textures: Vec<TextureBinding>,
    vertex_count: u32,
    index_count: u32,

    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    material_bind_group: Option<wgpu::BindGroup>,
}

impl Mesh {
    /// Builds a mesh from a flat interleaved buffer and its layout.
    ///
    /// # Panics
    /// Panics if the layout does not evenly partition `data`, or if any
    /// index references a vertex outside the derived range.
    pub fn from_raw(
        data: &[f32],
        layout: &VertexLayout,
        textures: Vec<TextureBinding>,
        indices: Vec<u32>,
    ) -> Self {
        let vertices = layout.unpack(data);
        Self::from_vertices(vertices, indices, textures)
    }

    /// Builds a mesh from already-normalized vertices (the model loader
    /// path).
    pub fn from_vertices(
        vertices: Vec<Vertex3D>,
        indices: Vec<u32>,
        textures: Vec<TextureBinding>,
    ) -> Self {
        let vertex_count = vertices.len() as u32;
        let index_count = indices.len() as u32;
        if let Some(&max) = indices.iter().max() {
            assert!(
                max < vertex_count,
                "index {} out of range for {} vertices",
                max,
                vertex_count
            );
        }

        Self {
            vertices,
            indices,
            textures,
            vertex_count,
            index_count,
            vertex_buffer: None,
            index_buffer: None,
            material_bind_group: None,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// First bound texture of the given role, if any.
    pub fn texture_for(&self, role: TextureRole) -> Option<&Arc<TextureResource>> {
        self.textures
            .iter()
            .find(|binding| binding.role == role)
            .map(|binding| &binding.texture)
    }

    /// Slot assignment in binding order: each texture gets the unit
    /// matching its list position and the shader name derived from its
    /// occurrence count within its role (independent counters per role).
    pub fn binding_slots(&self) -> Vec<(u32, String)> {
        let roles: Vec<TextureRole> = self.textures.iter().map(|b| b.role).collect();
        assign_slots(&roles)
    }

    /// Uploads vertex/index data and builds the material bind group.
    pub fn init_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        materials: &MaterialBindings,
        defaults: &DefaultTextures,
    ) {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        self.vertex_buffer = Some(vertex_buffer);

        if !self.indices.is_empty() {
            let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
                device,
                &wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh Index Buffer"),
                    contents: bytemuck::cast_slice(&self.indices),
                    usage: wgpu::BufferUsages::INDEX,
                },
            );
            self.index_buffer = Some(index_buffer);
        }

        let roles: Vec<TextureRole> = self.textures.iter().map(|b| b.role).collect();
        let surplus = surplus_material_bindings(&roles);
        if surplus > 0 {
            log::warn!(
                "mesh binds {} extra texture(s) beyond the one-diffuse one-specular material layout; they will not be sampled",
                surplus
            );
        }

        let diffuse = self
            .texture_for(TextureRole::Diffuse)
            .unwrap_or(&defaults.white);
        let specular = self
            .texture_for(TextureRole::Specular)
            .unwrap_or(&defaults.white);
        self.material_bind_group =
            Some(materials.bind(device, "Mesh Material Bind Group", diffuse, specular));
    }

    pub fn material_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.material_bind_group.as_ref()
    }
}

/// Number of bindings beyond the first of each role. The material bind
/// group samples one diffuse and one specular map, so these never reach
/// the shader.
pub fn surplus_material_bindings(roles: &[TextureRole]) -> usize {
    let diffuse = roles.iter().filter(|r| **r == TextureRole::Diffuse).count();
    let specular = roles
        .iter()
        .filter(|r| **r == TextureRole::Specular)
        .count();
    diffuse.saturating_sub(1) + specular.saturating_sub(1)
}

/// Maps an ordered role list to (texture unit, shader name) pairs.
/// Unit = position in the binding list; name index = occurrence within
/// the role, counted independently per role.
pub fn assign_slots(roles: &[TextureRole]) -> Vec<(u32, String)> {
    let mut diffuse_nr = 0u32;
    let mut specular_nr = 0u32;
    roles
        .iter()
        .enumerate()
        .map(|(unit, role)| {
            let counter = match role {
                TextureRole::Diffuse => {
                    diffuse_nr += 1;
                    diffuse_nr
                }
                TextureRole::Specular => {
                    specular_nr += 1;
                    specular_nr
                }
            };
            (unit as u32, role.binding_name(counter))
        })
        .collect()
}

/// Draw helpers for render passes.
pub trait DrawMesh<'a> {
    /// Binds the mesh's material and buffers and issues one draw call.
    /// Mutates the pass's texture-binding state; callers must not assume
    /// bindings survive across calls.
    fn draw_mesh(&mut self, mesh: &'a Mesh);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        let Some(vertex_buffer) = &mesh.vertex_buffer else {
            return; // GPU resources not initialized yet
        };

        if let Some(material) = &mesh.material_bind_group {
            self.set_bind_group(2, material, &[]);
        }

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        match &mesh.index_buffer {
            Some(index_buffer) => {
                self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                self.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
            None => {
                self.draw(0..mesh.vertex_count, 0..1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_count_derived_from_layout() {
        let layout = VertexLayout::new(VertexLayout::POS_NORMAL_UV);
        let data = vec![0.0f32; 8 * 36];
        let mesh = Mesh::from_raw(&data, &layout, Vec::new(), Vec::new());
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.index_count(), 0);
    }

    #[test]
    #[should_panic(expected = "not divisible")]
    fn uneven_vertex_buffer_panics() {
        let layout = VertexLayout::new(VertexLayout::POS_NORMAL_UV);
        let data = vec![0.0f32; 8 * 4 + 3];
        Mesh::from_raw(&data, &layout, Vec::new(), Vec::new());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_index_panics() {
        let layout = VertexLayout::new(VertexLayout::POS);
        let data = vec![0.0f32; 3 * 3];
        Mesh::from_raw(&data, &layout, Vec::new(), vec![0, 1, 3]);
    }

    #[test]
    fn material_layout_caps_one_binding_per_role() {
        use TextureRole::{Diffuse, Specular};
        assert_eq!(surplus_material_bindings(&[]), 0);
        assert_eq!(surplus_material_bindings(&[Diffuse, Specular]), 0);
        assert_eq!(surplus_material_bindings(&[Diffuse, Diffuse, Specular]), 1);
        assert_eq!(
            surplus_material_bindings(&[Diffuse, Diffuse, Specular, Specular, Specular]),
            3
        );
    }

    #[test]
    fn role_naming_uses_independent_counters() {
        assert_eq!(
            TextureRole::Diffuse.binding_name(1),
            "material.texture_diffuse1"
        );
        assert_eq!(
            TextureRole::Diffuse.binding_name(2),
            "material.texture_diffuse2"
        );
        assert_eq!(
            TextureRole::Specular.binding_name(1),
            "material.texture_specular1"
        );
    }

    #[test]
    fn slots_follow_binding_order_with_per_role_counters() {
        let slots = assign_slots(&[
            TextureRole::Diffuse,
            TextureRole::Specular,
            TextureRole::Diffuse,
        ]);
        assert_eq!(
            slots,
            vec![
                (0, "material.texture_diffuse1".to_string()),
                (1, "material.texture_specular1".to_string()),
                (2, "material.texture_diffuse2".to_string()),
            ]
        );
    }
}
