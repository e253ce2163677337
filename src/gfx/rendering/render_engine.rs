//! wgpu-based rendering engine.
//!
//! Owns the surface, device, pipelines, and the frame loop: skybox first,
//! then opaque objects grouped by pipeline, then transparent objects in
//! farthest-first order, then the fullscreen post pass and UI overlay.

use std::sync::Arc;

use anyhow::Context;
use wgpu::{Device, TextureFormat};

use crate::gfx::{
    resources::{
        material::{DefaultTextures, MaterialBindings},
        GlobalBindings, TextureResource,
    },
    scene::{PipelineKind, Scene},
    skybox::Skybox,
};

use super::{
    pipeline_manager::{PipelineConfig, PipelineManager, VertexLayoutKind},
    post_process::{PostMode, PostProcess},
};

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: TextureResource,

    pub pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    material_bindings: MaterialBindings,
    default_textures: DefaultTextures,
    object_bind_group_layout: wgpu::BindGroupLayout,
    post_process: PostProcess,

    skybox: Option<Skybox>,
}

impl RenderEngine {
    /// Initializes wgpu for the given window and compiles every pipeline.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to request adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to request device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_bindings = GlobalBindings::new(&device);
        let material_bindings = MaterialBindings::new(&device);
        let default_textures = DefaultTextures::new(&device, &queue);

        let object_bind_group_layout = crate::wgpu_utils::binding_types::layout(
            &device,
            "Object Bind Group Layout",
            &[(
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                crate::wgpu_utils::binding_types::uniform(),
            )],
        );

        let post_process = PostProcess::new(&device, width, height, format);

        // The skybox builds its own structurally identical bind group
        // layout; this one backs the pipeline.
        let skybox_layout = crate::wgpu_utils::binding_types::layout(
            &device,
            "Skybox Bind Group Layout",
            &[
                (
                    wgpu::ShaderStages::FRAGMENT,
                    crate::wgpu_utils::binding_types::texture_cube(),
                ),
                (
                    wgpu::ShaderStages::FRAGMENT,
                    crate::wgpu_utils::binding_types::sampler(
                        wgpu::SamplerBindingType::Filtering,
                    ),
                ),
            ],
        );

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));
        pipeline_manager.load_shader("unlit", include_str!("unlit.wgsl"));
        pipeline_manager.load_shader("light", include_str!("light.wgsl"));
        pipeline_manager.load_shader("skybox", include_str!("skybox.wgsl"));
        pipeline_manager.load_shader("post", include_str!("post.wgsl"));

        let depth_format = TextureResource::DEPTH_FORMAT;

        pipeline_manager.register_pipeline(
            "lit",
            PipelineConfig::default_with_shader("scene")
                .with_label("Lit Pipeline")
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_bind_group_layout.clone(),
                    material_bindings.layout().clone(),
                ])
                .with_depth(depth_format)
                .with_color_format(format),
        );

        // Unlit draws the foliage and window quads as well, so it blends
        // and skips back-face culling.
        pipeline_manager.register_pipeline(
            "unlit",
            PipelineConfig::default_with_shader("unlit")
                .with_label("Unlit Pipeline")
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_bind_group_layout.clone(),
                    material_bindings.layout().clone(),
                ])
                .with_depth(depth_format)
                .with_cull_mode(None)
                .with_alpha_blending(format),
        );

        pipeline_manager.register_pipeline(
            "flat",
            PipelineConfig::default_with_shader("light")
                .with_label("Flat Pipeline")
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_bind_group_layout.clone(),
                ])
                .with_depth(depth_format)
                .with_color_format(format),
        );

        pipeline_manager.register_pipeline(
            "skybox",
            PipelineConfig::default_with_shader("skybox")
                .with_label("Skybox Pipeline")
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    skybox_layout,
                ])
                .with_read_only_depth(depth_format)
                .with_cull_mode(None)
                .with_color_format(format)
                .with_vertex_layout(VertexLayoutKind::Sky),
        );

        pipeline_manager.register_pipeline(
            "post",
            PipelineConfig::default_with_shader("post")
                .with_label("Post Pipeline")
                .with_bind_group_layouts(vec![post_process.bind_group_layout().clone()])
                .with_cull_mode(None)
                .with_color_format(format)
                .with_vertex_layout(VertexLayoutKind::None),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            anyhow::bail!("pipeline creation failed: {}", errors.join("; "));
        }

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            format,
            depth_texture,
            pipeline_manager,
            global_bindings,
            material_bindings,
            default_textures,
            object_bind_group_layout,
            post_process,
            skybox: None,
        })
    }

    /// Points the skybox at a new cubemap, creating the skybox on first
    /// use.
    pub fn set_skybox_texture(&mut self, texture: &TextureResource) {
        match &mut self.skybox {
            Some(skybox) => skybox.set_texture(&self.device, texture),
            None => self.skybox = Some(Skybox::new(&self.device, texture)),
        }
    }

    /// Uploads GPU buffers and bind groups for everything the scene owns.
    pub fn init_scene_resources(&self, scene: &mut Scene) {
        scene.init_gpu_resources(
            &self.device,
            &self.material_bindings,
            &self.default_textures,
            &self.object_bind_group_layout,
        );
    }

    /// Per-frame uniform upload: camera, lights, per-object matrices, and
    /// the post-processing settings.
    pub fn update(
        &mut self,
        scene: &mut Scene,
        flashlight_enabled: bool,
        post_mode: PostMode,
        conv_offset: f32,
    ) {
        let aspect = self.config.width as f32 / self.config.height.max(1) as f32;
        self.global_bindings.update(
            &self.queue,
            &scene.camera,
            aspect,
            &scene.point_lights,
            flashlight_enabled,
        );
        scene.write_uniforms(&self.queue);
        self.post_process.update(&self.queue, post_mode, conv_offset);
    }

    /// Renders a frame with an optional UI overlay.
    ///
    /// Scene pass into the offscreen target (skybox, opaque by pipeline,
    /// transparent farthest-first), then the post pass onto the surface,
    /// then the UI callback.
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: Option<F>)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::warn!("surface error, skipping frame: {e}");
                return;
            }
        };
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.post_process.target_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.1,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            if let (Some(skybox), Some(pipeline)) =
                (&self.skybox, self.pipeline_manager.pipeline("skybox"))
            {
                render_pass.set_pipeline(pipeline);
                skybox.draw(&mut render_pass);
            }

            // Opaque objects, grouped to avoid redundant pipeline switches.
            for kind in [PipelineKind::Lit, PipelineKind::Unlit, PipelineKind::Flat] {
                let objects = scene.objects.iter().filter(|o| o.pipeline == kind);
                let Some(pipeline) = self.pipeline_manager.pipeline(kind.pipeline_name()) else {
                    continue;
                };
                let mut bound = false;
                for object in objects {
                    if !bound {
                        render_pass.set_pipeline(pipeline);
                        bound = true;
                    }
                    scene.draw_object(&mut render_pass, object);
                }
            }

            // Transparent objects strictly in sorted order, even when that
            // forces extra pipeline switches.
            let mut current: Option<PipelineKind> = None;
            for index in scene.sorted_transparent_indices() {
                let object = &scene.transparent_objects[index];
                if current != Some(object.pipeline) {
                    let Some(pipeline) =
                        self.pipeline_manager.pipeline(object.pipeline.pipeline_name())
                    else {
                        continue;
                    };
                    render_pass.set_pipeline(pipeline);
                    current = Some(object.pipeline);
                }
                scene.draw_object(&mut render_pass, object);
            }
        }

        {
            let mut post_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Post Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.pipeline("post") {
                post_pass.set_pipeline(pipeline);
                self.post_process.draw(&mut post_pass);
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Resizes the surface and every size-dependent attachment.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        self.post_process.resize(&self.device, width, height);
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn set_vsync(&mut self, enable: bool) {
        self.config.present_mode = if enable {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::Immediate
        };
        self.surface.configure(&self.device, &self.config);
    }
}
