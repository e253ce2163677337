//! Fullscreen post-processing pass.
//!
//! The scene renders into an offscreen color target; this pass samples it
//! and writes the surface, applying the selected framebuffer effect.
//! Kernel effects sample a 3x3 neighborhood spread by `1 / offset`.

use crate::{
    gfx::resources::TextureResource,
    wgpu_utils::{binding_types, UniformBuffer},
};

/// Framebuffer effect applied by the post pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostMode {
    Regular,
    Inverse,
    Grayscale,
    WeightedGrayscale,
    Sharpen,
    Emboss,
    EdgeDetect,
}

impl PostMode {
    pub const ALL: [PostMode; 7] = [
        PostMode::Regular,
        PostMode::Inverse,
        PostMode::Grayscale,
        PostMode::WeightedGrayscale,
        PostMode::Sharpen,
        PostMode::Emboss,
        PostMode::EdgeDetect,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PostMode::Regular => "Regular",
            PostMode::Inverse => "Inverse",
            PostMode::Grayscale => "Grey Scale",
            PostMode::WeightedGrayscale => "Weighted Grey Scale",
            PostMode::Sharpen => "Sharpen",
            PostMode::Emboss => "Emboss",
            PostMode::EdgeDetect => "Edge Detection",
        }
    }

    fn shader_index(self) -> u32 {
        match self {
            PostMode::Regular => 0,
            PostMode::Inverse => 1,
            PostMode::Grayscale => 2,
            PostMode::WeightedGrayscale => 3,
            PostMode::Sharpen => 4,
            PostMode::Emboss => 5,
            PostMode::EdgeDetect => 6,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct PostUniforms {
    mode: u32,
    /// Kernel sample spread divisor.
    offset: f32,
    _pad: [f32; 2],
}

/// Offscreen scene target plus the bindings the fullscreen pass reads.
pub struct PostProcess {
    target: TextureResource,
    ubo: UniformBuffer<PostUniforms>,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    format: wgpu::TextureFormat,
}

impl PostProcess {
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let target =
            TextureResource::create_render_target(device, width, height, format, "Scene Color");

        let ubo = UniformBuffer::new_with_data(
            device,
            &PostUniforms {
                mode: 0,
                offset: 500.0,
                _pad: [0.0; 2],
            },
        );

        let bind_group_layout = binding_types::layout(
            device,
            "Post Bind Group Layout",
            &[
                (wgpu::ShaderStages::FRAGMENT, binding_types::texture_2d()),
                (
                    wgpu::ShaderStages::FRAGMENT,
                    binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
                (wgpu::ShaderStages::FRAGMENT, binding_types::uniform()),
            ],
        );
        let bind_group = Self::build_bind_group(device, &bind_group_layout, &target, &ubo);

        Self {
            target,
            ubo,
            bind_group_layout,
            bind_group,
            format,
        }
    }

    fn build_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        target: &TextureResource,
        ubo: &UniformBuffer<PostUniforms>,
    ) -> wgpu::BindGroup {
        binding_types::bind_group(
            device,
            "Post Bind Group",
            layout,
            vec![
                wgpu::BindingResource::TextureView(&target.view),
                wgpu::BindingResource::Sampler(&target.sampler),
                ubo.binding_resource(),
            ],
        )
    }

    /// Recreates the offscreen target at the new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.target = TextureResource::create_render_target(
            device,
            width,
            height,
            self.format,
            "Scene Color",
        );
        self.bind_group =
            Self::build_bind_group(device, &self.bind_group_layout, &self.target, &self.ubo);
    }

    pub fn update(&mut self, queue: &wgpu::Queue, mode: PostMode, offset: f32) {
        self.ubo.update_content(
            queue,
            PostUniforms {
                mode: mode.shader_index(),
                offset: offset.clamp(1.0, 5000.0),
                _pad: [0.0; 2],
            },
        );
    }

    /// View the scene passes render into.
    pub fn target_view(&self) -> &wgpu::TextureView {
        &self.target.view
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Draws the fullscreen triangle sampling the offscreen target.
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_labels_match_shader_indices() {
        for (i, mode) in PostMode::ALL.iter().enumerate() {
            assert_eq!(mode.shader_index() as usize, i);
            assert!(!mode.label().is_empty());
        }
    }
}
