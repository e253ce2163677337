//! Global uniform bindings shared by every draw call.
//!
//! Carries the camera matrices plus the full lighting rig: one
//! directional light, two orbiting point lights, and the camera-attached
//! spotlight (flashlight). Bound at group 0 in all scene pipelines.
//! The struct layouts here must match `scene.wgsl` exactly; everything is
//! padded to vec4 boundaries to keep host and shader layouts identical.

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::{config, gfx::camera::FlyCamera, wgpu_utils, wgpu_utils::UniformBuffer};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// constant, linear, quadratic, unused
    pub attenuation: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniforms {
    pub view: [[f32; 4]; 4],
    /// View with the translation column zeroed, for the skybox.
    pub sky_view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// Camera position in world space (w unused).
    pub view_position: [f32; 4],

    pub dir_direction: [f32; 4],
    pub dir_ambient: [f32; 4],
    pub dir_diffuse: [f32; 4],
    pub dir_specular: [f32; 4],

    pub point_lights: [PointLightUniform; 2],

    pub spot_position: [f32; 4],
    pub spot_direction: [f32; 4],
    pub spot_ambient: [f32; 4],
    pub spot_diffuse: [f32; 4],
    pub spot_specular: [f32; 4],
    /// inner cutoff cos, outer cutoff cos, flashlight enabled, shininess
    pub spot_params: [f32; 4],
}

impl Default for GlobalUniforms {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        Self {
            view: identity,
            sky_view: identity,
            projection: identity,
            view_position: [0.0; 4],
            dir_direction: [-0.2, -1.0, -0.3, 0.0],
            dir_ambient: [0.1, 0.1, 0.1, 0.0],
            dir_diffuse: [0.3, 0.3, 0.3, 0.0],
            dir_specular: [1.0, 1.0, 1.0, 0.0],
            point_lights: [PointLightUniform::default(); 2],
            spot_position: [0.0; 4],
            spot_direction: [0.0, 0.0, -1.0, 0.0],
            spot_ambient: [0.2, 0.2, 0.2, 0.0],
            spot_diffuse: [0.5, 0.5, 0.5, 0.0],
            spot_specular: [1.0, 1.0, 1.0, 0.0],
            spot_params: [
                config::SPOTLIGHT_INNER_CUTOFF_DEG.to_radians().cos(),
                config::SPOTLIGHT_OUTER_CUTOFF_DEG.to_radians().cos(),
                0.0,
                config::MATERIAL_SHININESS,
            ],
        }
    }
}

impl Default for PointLightUniform {
    fn default() -> Self {
        Self {
            position: [0.0; 4],
            ambient: [0.0; 4],
            diffuse: [0.0; 4],
            specular: [0.0; 4],
            attenuation: [
                config::LIGHT_ATTENUATION_CONSTANT,
                config::LIGHT_ATTENUATION_LINEAR,
                config::LIGHT_ATTENUATION_QUADRATIC,
                0.0,
            ],
        }
    }
}

/// CPU-side description of one point light.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub color: Vector3<f32>,
}

impl PointLight {
    pub fn new(color: Vector3<f32>) -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            color,
        }
    }

    fn to_uniform(self) -> PointLightUniform {
        let ambient = self.color * 0.1;
        PointLightUniform {
            position: [self.position.x, self.position.y, self.position.z, 1.0],
            ambient: [ambient.x, ambient.y, ambient.z, 0.0],
            diffuse: [self.color.x, self.color.y, self.color.z, 0.0],
            specular: [self.color.x, self.color.y, self.color.z, 0.0],
            ..Default::default()
        }
    }
}

/// Owns the global uniform buffer and its bind group.
pub struct GlobalBindings {
    ubo: UniformBuffer<GlobalUniforms>,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let ubo = UniformBuffer::new_with_data(device, &GlobalUniforms::default());

        let bind_group_layout = wgpu_utils::binding_types::layout(
            device,
            "Globals Bind Group Layout",
            &[(
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                wgpu_utils::binding_types::uniform(),
            )],
        );

        let bind_group = wgpu_utils::binding_types::bind_group(
            device,
            "Globals Bind Group",
            &bind_group_layout,
            vec![ubo.binding_resource()],
        );

        Self {
            ubo,
            bind_group_layout,
            bind_group,
        }
    }

    /// Uploads per-frame camera and lighting state.
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        camera: &FlyCamera,
        aspect: f32,
        point_lights: &[PointLight; 2],
        flashlight_enabled: bool,
    ) {
        let projection = cgmath::perspective(
            cgmath::Deg(camera.zoom),
            aspect,
            config::Z_NEAR,
            config::Z_FAR,
        );

        let view = camera.view_matrix();
        let mut content = GlobalUniforms {
            view: view.into(),
            sky_view: crate::gfx::skybox::rotation_only(view).into(),
            projection: projection.into(),
            view_position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
            point_lights: [
                point_lights[0].to_uniform(),
                point_lights[1].to_uniform(),
            ],
            ..Default::default()
        };
        // The spotlight rides on the camera.
        content.spot_position = [camera.position.x, camera.position.y, camera.position.z, 1.0];
        content.spot_direction = [camera.front.x, camera.front.y, camera.front.z, 0.0];
        content.spot_params[2] = if flashlight_enabled { 1.0 } else { 0.0 };

        self.ubo.update_content(queue, content);
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
