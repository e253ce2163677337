//! Demo scene: textured cubes, a metal floor, foliage, transparent
//! windows, two orbiting point lights, a skybox, and an optional OBJ
//! model. WASD + mouse to fly, F for the flashlight, Tab to free the
//! cursor for the settings panel.

use std::path::Path;

use cgmath::Vector3;
use rand::Rng;

use glint::{
    app::AssetContext,
    DrawableRef, GlintApp, Mesh, Model, PipelineKind, Scene, TextureBinding, TextureRole,
    VertexLayout,
};

/// Unit cube, interleaved position / normal / uv.
#[rustfmt::skip]
const CUBE_VERTICES: [f32; 36 * 8] = [
    // back face
    -0.5, -0.5, -0.5,  0.0,  0.0, -1.0,  0.0, 0.0,
     0.5,  0.5, -0.5,  0.0,  0.0, -1.0,  1.0, 1.0,
     0.5, -0.5, -0.5,  0.0,  0.0, -1.0,  1.0, 0.0,
     0.5,  0.5, -0.5,  0.0,  0.0, -1.0,  1.0, 1.0,
    -0.5, -0.5, -0.5,  0.0,  0.0, -1.0,  0.0, 0.0,
    -0.5,  0.5, -0.5,  0.0,  0.0, -1.0,  0.0, 1.0,
    // front face
    -0.5, -0.5,  0.5,  0.0,  0.0,  1.0,  0.0, 0.0,
     0.5, -0.5,  0.5,  0.0,  0.0,  1.0,  1.0, 0.0,
     0.5,  0.5,  0.5,  0.0,  0.0,  1.0,  1.0, 1.0,
     0.5,  0.5,  0.5,  0.0,  0.0,  1.0,  1.0, 1.0,
    -0.5,  0.5,  0.5,  0.0,  0.0,  1.0,  0.0, 1.0,
    -0.5, -0.5,  0.5,  0.0,  0.0,  1.0,  0.0, 0.0,
    // left face
    -0.5,  0.5,  0.5, -1.0,  0.0,  0.0,  1.0, 0.0,
    -0.5,  0.5, -0.5, -1.0,  0.0,  0.0,  1.0, 1.0,
    -0.5, -0.5, -0.5, -1.0,  0.0,  0.0,  0.0, 1.0,
    -0.5, -0.5, -0.5, -1.0,  0.0,  0.0,  0.0, 1.0,
    -0.5, -0.5,  0.5, -1.0,  0.0,  0.0,  0.0, 0.0,
    -0.5,  0.5,  0.5, -1.0,  0.0,  0.0,  1.0, 0.0,
    // right face
     0.5,  0.5,  0.5,  1.0,  0.0,  0.0,  1.0, 0.0,
     0.5, -0.5, -0.5,  1.0,  0.0,  0.0,  0.0, 1.0,
     0.5,  0.5, -0.5,  1.0,  0.0,  0.0,  1.0, 1.0,
     0.5, -0.5, -0.5,  1.0,  0.0,  0.0,  0.0, 1.0,
     0.5,  0.5,  0.5,  1.0,  0.0,  0.0,  1.0, 0.0,
     0.5, -0.5,  0.5,  1.0,  0.0,  0.0,  0.0, 0.0,
    // bottom face
    -0.5, -0.5, -0.5,  0.0, -1.0,  0.0,  0.0, 1.0,
     0.5, -0.5, -0.5,  0.0, -1.0,  0.0,  1.0, 1.0,
     0.5, -0.5,  0.5,  0.0, -1.0,  0.0,  1.0, 0.0,
     0.5, -0.5,  0.5,  0.0, -1.0,  0.0,  1.0, 0.0,
    -0.5, -0.5,  0.5,  0.0, -1.0,  0.0,  0.0, 0.0,
    -0.5, -0.5, -0.5,  0.0, -1.0,  0.0,  0.0, 1.0,
    // top face
    -0.5,  0.5, -0.5,  0.0,  1.0,  0.0,  0.0, 1.0,
     0.5,  0.5,  0.5,  0.0,  1.0,  0.0,  1.0, 0.0,
     0.5,  0.5, -0.5,  0.0,  1.0,  0.0,  1.0, 1.0,
     0.5,  0.5,  0.5,  0.0,  1.0,  0.0,  1.0, 0.0,
    -0.5,  0.5, -0.5,  0.0,  1.0,  0.0,  0.0, 1.0,
    -0.5,  0.5,  0.5,  0.0,  1.0,  0.0,  0.0, 0.0,
];

/// Floor quad, uv tiled twice.
#[rustfmt::skip]
const PLANE_VERTICES: [f32; 6 * 8] = [
     5.0, -0.5,  5.0,  0.0, 1.0, 0.0,  2.0, 0.0,
    -5.0, -0.5, -5.0,  0.0, 1.0, 0.0,  0.0, 2.0,
    -5.0, -0.5,  5.0,  0.0, 1.0, 0.0,  0.0, 0.0,
     5.0, -0.5,  5.0,  0.0, 1.0, 0.0,  2.0, 0.0,
     5.0, -0.5, -5.0,  0.0, 1.0, 0.0,  2.0, 2.0,
    -5.0, -0.5, -5.0,  0.0, 1.0, 0.0,  0.0, 2.0,
];

/// Upright unit quad for foliage and windows.
#[rustfmt::skip]
const QUAD_VERTICES: [f32; 6 * 8] = [
    0.0,  0.5, 0.0,  0.0, 0.0, 1.0,  0.0, 0.0,
    0.0, -0.5, 0.0,  0.0, 0.0, 1.0,  0.0, 1.0,
    1.0, -0.5, 0.0,  0.0, 0.0, 1.0,  1.0, 1.0,
    0.0,  0.5, 0.0,  0.0, 0.0, 1.0,  0.0, 0.0,
    1.0, -0.5, 0.0,  0.0, 0.0, 1.0,  1.0, 1.0,
    1.0,  0.5, 0.0,  0.0, 0.0, 1.0,  1.0, 0.0,
];

fn build_scene(scene: &mut Scene, assets: &mut AssetContext) {
    let layout = VertexLayout::new(VertexLayout::POS_NORMAL_UV);

    let marble = assets
        .textures
        .load(assets.device, assets.queue, Path::new("assets/marble.jpg"));
    let metal = assets
        .textures
        .load(assets.device, assets.queue, Path::new("assets/metal.png"));
    let grass = assets
        .textures
        .load(assets.device, assets.queue, Path::new("assets/grass.png"));
    let window = assets.textures.load(
        assets.device,
        assets.queue,
        Path::new("assets/window.png"),
    );
    let container = assets.textures.load(
        assets.device,
        assets.queue,
        Path::new("assets/container.png"),
    );
    let container_specular = assets.textures.load(
        assets.device,
        assets.queue,
        Path::new("assets/container_specular.png"),
    );

    let marble_cube = scene.add_mesh(Mesh::from_raw(
        &CUBE_VERTICES,
        &layout,
        vec![TextureBinding::new(marble, TextureRole::Diffuse)],
        Vec::new(),
    ));
    let lit_cube = scene.add_mesh(Mesh::from_raw(
        &CUBE_VERTICES,
        &layout,
        vec![
            TextureBinding::new(container, TextureRole::Diffuse),
            TextureBinding::new(container_specular, TextureRole::Specular),
        ],
        Vec::new(),
    ));
    let floor = scene.add_mesh(Mesh::from_raw(
        &PLANE_VERTICES,
        &layout,
        vec![TextureBinding::new(metal, TextureRole::Diffuse)],
        Vec::new(),
    ));
    let grass_quad = scene.add_mesh(Mesh::from_raw(
        &QUAD_VERTICES,
        &layout,
        vec![TextureBinding::new(grass, TextureRole::Diffuse)],
        Vec::new(),
    ));
    let window_quad = scene.add_mesh(Mesh::from_raw(
        &QUAD_VERTICES,
        &layout,
        vec![TextureBinding::new(window, TextureRole::Diffuse)],
        Vec::new(),
    ));
    let marker_cube = scene.add_mesh(Mesh::from_raw(
        &CUBE_VERTICES,
        &layout,
        Vec::new(),
        Vec::new(),
    ));

    // Two marble cubes and the floor.
    for position in [Vector3::new(-1.0, 0.0, -1.0), Vector3::new(2.0, 0.0, 0.0)] {
        scene
            .add_object(DrawableRef::Mesh(marble_cube), PipelineKind::Unlit)
            .transform
            .position = position;
    }
    scene.add_object(DrawableRef::Mesh(floor), PipelineKind::Unlit);

    // A loose field of lit crates.
    let mut rng = rand::rng();
    for _ in 0..100 {
        let object = scene.add_object(DrawableRef::Mesh(lit_cube), PipelineKind::Lit);
        object.transform.position = Vector3::new(
            rng.random_range(-25.0..25.0),
            rng.random_range(-2.0..10.0),
            rng.random_range(-25.0..-5.0),
        );
        object.transform.rotation = Vector3::new(
            rng.random_range(0.0..360.0),
            rng.random_range(0.0..360.0),
            rng.random_range(0.0..360.0),
        );
    }

    for position in [
        Vector3::new(-1.5, 0.0, -0.48),
        Vector3::new(1.5, 0.0, 0.51),
        Vector3::new(0.0, 0.0, 0.7),
        Vector3::new(-0.3, 0.0, -2.3),
        Vector3::new(0.5, 0.0, -0.6),
    ] {
        scene
            .add_object(DrawableRef::Mesh(grass_quad), PipelineKind::Unlit)
            .transform
            .position = position;
    }

    // Windows go in the transparent list so they sort against the camera.
    for position in [
        Vector3::new(-1.5, 0.0, 1.48),
        Vector3::new(1.5, 0.0, 1.51),
        Vector3::new(0.0, 0.0, 1.7),
        Vector3::new(-0.3, 0.0, 2.3),
        Vector3::new(0.5, 0.0, 2.6),
    ] {
        scene
            .add_transparent_object(DrawableRef::Mesh(window_quad), PipelineKind::Unlit)
            .transform
            .position = position;
    }

    scene.add_light_marker(0, marker_cube);
    scene.add_light_marker(1, marker_cube);

    let backpack_path = Path::new("assets/backpack/backpack.obj");
    if backpack_path.exists() {
        match Model::load(backpack_path, assets.device, assets.queue, assets.textures) {
            Ok(model) => {
                let id = scene.add_model(model);
                let object = scene.add_object(DrawableRef::Model(id), PipelineKind::Lit);
                object.transform.position = Vector3::new(0.0, 1.5, -3.0);
                object.transform.scale = Vector3::new(0.5, 0.5, 0.5);
            }
            Err(e) => log::warn!("skipping backpack model: {e}"),
        }
    } else {
        log::info!("no backpack model at {}, skipping", backpack_path.display());
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = GlintApp::new()?;
    app.add_skybox_preset("Lake", "assets/skybox", "jpg");
    app.add_skybox_preset("Night", "assets/skybox_night", "png");
    app.set_setup(build_scene);
    app.run()
}
