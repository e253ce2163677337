//! Application shell: window, event loop, and the per-frame wiring
//! between input, scene, renderer, and UI.

use std::{
    path::PathBuf,
    sync::Arc,
    time::Instant,
};

use anyhow::Context;
use cgmath::Vector3;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowAttributes},
};

use crate::{
    config,
    gfx::{
        camera::{CameraController, FlyCamera},
        rendering::render_engine::RenderEngine,
        resources::TextureCache,
        scene::Scene,
        skybox::Skybox,
    },
    ui::{render_settings_panel, RenderSettings, UiManager},
};

/// Asset-loading handles passed to the scene setup callback.
pub struct AssetContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub textures: &'a mut TextureCache,
}

/// A named cubemap directory selectable from the settings panel.
#[derive(Debug, Clone)]
pub struct SkyboxPreset {
    pub name: String,
    pub dir: PathBuf,
    pub extension: String,
}

type SetupFn = Box<dyn FnOnce(&mut Scene, &mut AssetContext) + 'static>;

pub struct GlintApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,

    scene: Scene,
    controller: CameraController,
    settings: RenderSettings,
    texture_cache: TextureCache,
    skybox_presets: Vec<SkyboxPreset>,
    setup: Option<SetupFn>,

    /// True while the cursor is grabbed and mouse motion drives the
    /// camera. Tab releases it for UI interaction.
    cursor_captured: bool,
    start_time: Instant,
    last_frame: Instant,
}

impl GlintApp {
    pub fn new() -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;

        let camera = FlyCamera::new(Vector3::from(config::CAMERA_START_POSITION));
        let scene = Scene::new(camera);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                controller: CameraController::new(),
                settings: RenderSettings::default(),
                texture_cache: TextureCache::new(),
                skybox_presets: Vec::new(),
                setup: None,
                cursor_captured: true,
                start_time: Instant::now(),
                last_frame: Instant::now(),
            },
        })
    }

    /// Registers the scene-building callback, run once the GPU is up.
    pub fn set_setup<F>(&mut self, setup: F)
    where
        F: FnOnce(&mut Scene, &mut AssetContext) + 'static,
    {
        self.app_state.setup = Some(Box::new(setup));
    }

    pub fn add_skybox_preset(&mut self, name: &str, dir: impl Into<PathBuf>, extension: &str) {
        self.app_state.skybox_presets.push(SkyboxPreset {
            name: name.to_string(),
            dir: dir.into(),
            extension: extension.to_string(),
        });
    }

    /// Consumes the app and runs the event loop until exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop
            .run_app(&mut self.app_state)
            .context("event loop error")?;
        Ok(())
    }
}

impl AppState {
    fn apply_cursor_mode(&self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if self.cursor_captured {
            if window.set_cursor_grab(CursorGrabMode::Locked).is_err() {
                // Locked is unsupported on some platforms.
                let _ = window.set_cursor_grab(CursorGrabMode::Confined);
            }
            window.set_cursor_visible(false);
        } else {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            window.set_cursor_visible(true);
        }
    }

    fn load_skybox_preset(&mut self, index: usize) {
        let Some(engine) = self.render_engine.as_mut() else {
            return;
        };
        let Some(preset) = self.skybox_presets.get(index) else {
            return;
        };

        match Skybox::load_faces(
            &preset.dir,
            &preset.extension,
            engine.device(),
            engine.queue(),
        ) {
            Ok(texture) => {
                engine.set_skybox_texture(&texture);
                log::info!("loaded skybox preset '{}'", preset.name);
            }
            Err(e) => {
                log::warn!("failed to load skybox preset '{}': {e}", preset.name);
            }
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title("glint")
            .with_inner_size(winit::dpi::LogicalSize::new(
                config::WINDOW_WIDTH,
                config::WINDOW_HEIGHT,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        let engine = match pollster::block_on(RenderEngine::new(window.clone(), width, height)) {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("failed to initialize renderer: {e:#}");
                event_loop.exit();
                return;
            }
        };

        if let Some(setup) = self.setup.take() {
            let mut ctx = AssetContext {
                device: engine.device(),
                queue: engine.queue(),
                textures: &mut self.texture_cache,
            };
            setup(&mut self.scene, &mut ctx);
        }
        engine.init_scene_resources(&mut self.scene);

        let ui_manager = UiManager::new(
            engine.device(),
            engine.queue(),
            engine.surface_format(),
            &window,
        );

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(engine);

        self.load_skybox_preset(self.settings.skybox_index);
        self.apply_cursor_mode();
        self.start_time = Instant::now();
        self.last_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // UI sees events first when the cursor is free.
        if !self.cursor_captured {
            if let Some(ui_manager) = self.ui_manager.as_mut() {
                let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                    window_id,
                    event: event.clone(),
                };
                if ui_manager.handle_input(&window, &ui_event) {
                    window.request_redraw();
                    return;
                }
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                match key_event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => {
                        event_loop.exit();
                        return;
                    }
                    PhysicalKey::Code(KeyCode::Tab) => {
                        if key_event.state.is_pressed() && !key_event.repeat {
                            self.cursor_captured = !self.cursor_captured;
                            self.apply_cursor_mode();
                        }
                        return;
                    }
                    _ => {}
                }
                self.controller.process_keyboard_event(&key_event);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(engine) = self.render_engine.as_mut() {
                    engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let Some(engine) = self.render_engine.as_mut() else {
                    return;
                };

                let now = Instant::now();
                let delta_time = (now - self.last_frame).as_secs_f32();
                self.last_frame = now;
                let elapsed = (now - self.start_time).as_secs_f32();

                self.controller.update_camera(&mut self.scene.camera, delta_time);
                self.scene.update(elapsed);
                engine.update(
                    &mut self.scene,
                    self.controller.flashlight_enabled,
                    self.settings.post_mode,
                    self.settings.conv_offset,
                );

                let mut skybox_changed = false;
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    let settings = &mut self.settings;
                    let presets: Vec<String> = self
                        .skybox_presets
                        .iter()
                        .map(|p| p.name.clone())
                        .collect();
                    let flashlight = self.controller.flashlight_enabled;

                    ui_manager.update_logic(&window, |ui| {
                        skybox_changed =
                            render_settings_panel(ui, settings, &presets, flashlight);
                    });

                    engine.render_frame(
                        &self.scene,
                        Some(|device: &wgpu::Device,
                              queue: &wgpu::Queue,
                              encoder: &mut wgpu::CommandEncoder,
                              view: &wgpu::TextureView| {
                            ui_manager.render_display_only(device, queue, encoder, view);
                        }),
                    );
                } else {
                    engine.render_frame(
                        &self.scene,
                        None::<fn(
                            &wgpu::Device,
                            &wgpu::Queue,
                            &mut wgpu::CommandEncoder,
                            &wgpu::TextureView,
                        )>,
                    );
                }

                if skybox_changed {
                    self.load_skybox_preset(self.settings.skybox_index);
                }
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        // Mouse look only while the cursor is grabbed.
        if !self.cursor_captured {
            return;
        }
        self.controller
            .process_device_event(&event, &mut self.scene.camera);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
