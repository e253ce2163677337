//! Skybox rendering: a unit cube sampled with a cubemap, drawn with depth
//! writes disabled so the rest of the scene always paints over it.

use std::path::PathBuf;

use cgmath::Matrix4;
use wgpu::util::DeviceExt;

use crate::{
    error::AssetError,
    gfx::{resources::TextureResource, scene::SkyVertex},
    wgpu_utils::binding_types,
};

/// 36 positions of a unit cube, wound to face inward.
#[rustfmt::skip]
const CUBE_POSITIONS: [[f32; 3]; 36] = [
    [-1.0,  1.0, -1.0], [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],

    [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0],

    [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],

    [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],

    [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],

    [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0],
];

/// Strips the translation column so the skybox stays centered on the
/// camera while still rotating with it.
pub fn rotation_only(view: Matrix4<f32>) -> Matrix4<f32> {
    let mut out = view;
    out.w.x = 0.0;
    out.w.y = 0.0;
    out.w.z = 0.0;
    out
}

pub struct Skybox {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl Skybox {
    pub fn new(device: &wgpu::Device, texture: &TextureResource) -> Self {
        let vertices: Vec<SkyVertex> = CUBE_POSITIONS
            .iter()
            .map(|&position| SkyVertex { position })
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skybox Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bind_group_layout = binding_types::layout(
            device,
            "Skybox Bind Group Layout",
            &[
                (wgpu::ShaderStages::FRAGMENT, binding_types::texture_cube()),
                (
                    wgpu::ShaderStages::FRAGMENT,
                    binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        );
        let bind_group = Self::build_bind_group(device, &bind_group_layout, texture);

        Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            bind_group_layout,
            bind_group,
        }
    }

    /// Loads the six cubemap faces in the conventional +X -X +Y -Y +Z -Z
    /// order from a directory of `right/left/top/bottom/front/back` images.
    pub fn load_faces(
        dir: &std::path::Path,
        extension: &str,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<TextureResource, AssetError> {
        let face = |name: &str| -> PathBuf { dir.join(format!("{}.{}", name, extension)) };
        let faces = [
            face("right"),
            face("left"),
            face("top"),
            face("bottom"),
            face("front"),
            face("back"),
        ];
        TextureResource::cubemap_from_files(device, queue, &faces, "Skybox Cubemap")
    }

    /// Swaps the sampled cubemap (skybox preset change).
    pub fn set_texture(&mut self, device: &wgpu::Device, texture: &TextureResource) {
        self.bind_group = Self::build_bind_group(device, &self.bind_group_layout, texture);
    }

    fn build_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        texture: &TextureResource,
    ) -> wgpu::BindGroup {
        binding_types::bind_group(
            device,
            "Skybox Bind Group",
            layout,
            vec![
                wgpu::BindingResource::TextureView(&texture.view),
                wgpu::BindingResource::Sampler(&texture.sampler),
            ],
        )
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Point3, SquareMatrix, Vector3};

    #[test]
    fn cube_has_36_unit_corners() {
        assert_eq!(CUBE_POSITIONS.len(), 36);
        for p in CUBE_POSITIONS {
            for c in p {
                assert_eq!(c.abs(), 1.0);
            }
        }
    }

    #[test]
    fn rotation_only_drops_translation_keeps_rotation() {
        let view = Matrix4::look_at_rh(
            Point3::new(3.0, 4.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        let stripped = rotation_only(view);
        assert_eq!(stripped.w.x, 0.0);
        assert_eq!(stripped.w.y, 0.0);
        assert_eq!(stripped.w.z, 0.0);
        assert_eq!(stripped.w.w, view.w.w);
        assert_eq!(stripped.x, view.x);
        assert_eq!(stripped.y, view.y);
        assert_eq!(stripped.z, view.z);
    }

    #[test]
    fn rotation_only_is_invariant_under_camera_translation() {
        use approx::assert_relative_eq;

        let rotate = Matrix4::from_angle_y(Deg(35.0));
        let a = rotate;
        let b = Matrix4::from_translation(Vector3::new(10.0, -2.0, 7.0)) * rotate;
        // Same orientation, different positions: identical skybox view.
        let va = rotation_only(a.invert().unwrap());
        let vb = rotation_only(b.invert().unwrap());
        for col in 0..4 {
            for row in 0..4 {
                assert_relative_eq!(va[col][row], vb[col][row], epsilon = 1e-5);
            }
        }
    }
}
