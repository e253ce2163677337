//! Material bind group plumbing for textured meshes.
//!
//! Scene pipelines bind materials at group 2: a diffuse map, a specular
//! map, and a shared sampler. Meshes without a map for a role bind the
//! solid white default so one pipeline layout serves every mesh.

use std::sync::Arc;

use super::texture::TextureResource;
use crate::wgpu_utils;

pub struct MaterialBindings {
    layout: wgpu::BindGroupLayout,
}

impl MaterialBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = wgpu_utils::binding_types::layout(
            device,
            "Material Bind Group Layout",
            &[
                (
                    wgpu::ShaderStages::FRAGMENT,
                    wgpu_utils::binding_types::texture_2d(),
                ),
                (
                    wgpu::ShaderStages::FRAGMENT,
                    wgpu_utils::binding_types::texture_2d(),
                ),
                (
                    wgpu::ShaderStages::FRAGMENT,
                    wgpu_utils::binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        );
        Self { layout }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Creates a material bind group; the sampler comes from the diffuse
    /// texture so wrap modes follow the primary map.
    pub fn bind(
        &self,
        device: &wgpu::Device,
        label: &str,
        diffuse: &TextureResource,
        specular: &TextureResource,
    ) -> wgpu::BindGroup {
        wgpu_utils::binding_types::bind_group(
            device,
            label,
            &self.layout,
            vec![
                wgpu::BindingResource::TextureView(&diffuse.view),
                wgpu::BindingResource::TextureView(&specular.view),
                wgpu::BindingResource::Sampler(&diffuse.sampler),
            ],
        )
    }
}

/// Textures substituted when a mesh has no map for a semantic role.
pub struct DefaultTextures {
    pub white: Arc<TextureResource>,
}

impl DefaultTextures {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            white: Arc::new(TextureResource::white(device, queue)),
        }
    }
}
