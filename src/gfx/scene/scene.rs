//! Scene composition: arenas of drawables, scene objects, lights, and
//! the per-frame transparency ordering.
//!
//! Meshes and models are owned by the scene in index-keyed arenas;
//! objects reference them by id. GPU resources therefore have a single
//! owner and outlive every object that points at them.

use cgmath::{Deg, InnerSpace, Matrix4, Vector3, Vector4};

use crate::{
    config,
    gfx::{
        camera::FlyCamera,
        resources::{
            material::{DefaultTextures, MaterialBindings},
            PointLight,
        },
    },
};

use super::{
    mesh::{DrawMesh, Mesh},
    model::Model,
    scene_object::{DrawableRef, MeshId, ModelId, PipelineKind, SceneObject},
};

pub struct Scene {
    pub camera: FlyCamera,

    meshes: Vec<Mesh>,
    models: Vec<Model>,

    /// Opaque objects, drawn in insertion order.
    pub objects: Vec<SceneObject>,
    /// Alpha-blended objects, re-sorted farthest-first every frame.
    pub transparent_objects: Vec<SceneObject>,

    pub point_lights: [PointLight; 2],
    light_marker_ids: [Option<usize>; 2],
}

impl Scene {
    pub fn new(camera: FlyCamera) -> Self {
        Self {
            camera,
            meshes: Vec::new(),
            models: Vec::new(),
            objects: Vec::new(),
            transparent_objects: Vec::new(),
            point_lights: [
                PointLight::new(Vector3::new(1.0, 0.3, 0.3)),
                PointLight::new(Vector3::new(0.3, 0.3, 1.0)),
            ],
            light_marker_ids: [None, None],
        }
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn add_model(&mut self, model: Model) -> ModelId {
        self.models.push(model);
        ModelId(self.models.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> &Mesh {
        &self.meshes[id.0]
    }

    pub fn model(&self, id: ModelId) -> &Model {
        &self.models[id.0]
    }

    /// Adds an opaque object and returns it for transform setup.
    pub fn add_object(&mut self, drawable: DrawableRef, pipeline: PipelineKind) -> &mut SceneObject {
        let index = self.objects.len();
        self.objects.push(SceneObject::new(drawable, pipeline));
        &mut self.objects[index]
    }

    /// Adds an object participating in the per-frame distance sort.
    pub fn add_transparent_object(
        &mut self,
        drawable: DrawableRef,
        pipeline: PipelineKind,
    ) -> &mut SceneObject {
        let index = self.transparent_objects.len();
        self.transparent_objects
            .push(SceneObject::new(drawable, pipeline));
        &mut self.transparent_objects[index]
    }

    /// Adds a small flat-colored cube tracking one of the point lights.
    pub fn add_light_marker(&mut self, light: usize, mesh: MeshId) {
        let color = self.point_lights[light].color;
        let object = self.add_object(DrawableRef::Mesh(mesh), PipelineKind::Flat);
        object.tint = [color.x, color.y, color.z, 1.0];
        object.transform.scale = Vector3::new(0.2, 0.2, 0.2);
        self.light_marker_ids[light] = Some(self.objects.len() - 1);
    }

    /// Advances animated state: the two point lights orbit the origin on
    /// tilted circles, and their marker cubes follow.
    pub fn update(&mut self, elapsed_seconds: f32) {
        let positions = [
            orbit_position(elapsed_seconds, 0.0, config::LIGHT_ORBIT_TILT_DEG),
            orbit_position(
                elapsed_seconds,
                config::LIGHT_ORBIT_PHASE,
                -config::LIGHT_ORBIT_TILT_DEG,
            ),
        ];
        for (i, position) in positions.into_iter().enumerate() {
            self.point_lights[i].position = position;
            if let Some(id) = self.light_marker_ids[i] {
                self.objects[id].transform.position = position;
            }
        }
    }

    /// Transparent-object draw order for the current camera position:
    /// indices sorted by descending squared distance (farthest first).
    ///
    /// Computed as an explicit keyed list with a stable sort; exact
    /// distance ties keep insertion order and never drop objects.
    pub fn sorted_transparent_indices(&self) -> Vec<usize> {
        let mut keyed: Vec<(f32, usize)> = self
            .transparent_objects
            .iter()
            .enumerate()
            .map(|(i, object)| {
                let offset = object.transform.position - self.camera.position;
                (offset.magnitude2(), i)
            })
            .collect();
        keyed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        keyed.into_iter().map(|(_, i)| i).collect()
    }

    pub fn init_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        materials: &MaterialBindings,
        defaults: &DefaultTextures,
        object_layout: &wgpu::BindGroupLayout,
    ) {
        for mesh in &mut self.meshes {
            mesh.init_gpu_resources(device, materials, defaults);
        }
        for model in &mut self.models {
            model.init_gpu_resources(device, materials, defaults);
        }
        for object in self.objects.iter_mut().chain(&mut self.transparent_objects) {
            object.init_gpu_resources(device, object_layout);
        }
    }

    /// Uploads per-object matrices for the current camera view.
    pub fn write_uniforms(&mut self, queue: &wgpu::Queue) {
        let view = self.camera.view_matrix();
        for object in self.objects.iter_mut().chain(&mut self.transparent_objects) {
            object.update_uniforms(queue, view);
        }
    }

    /// Records one object's draw: bind its uniforms, then delegate to the
    /// referenced mesh or every mesh of the referenced model.
    pub fn draw_object<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, object: &'a SceneObject) {
        let Some(bind_group) = object.bind_group() else {
            return;
        };
        pass.set_bind_group(1, bind_group, &[]);

        match object.drawable {
            DrawableRef::Mesh(id) => pass.draw_mesh(self.mesh(id)),
            DrawableRef::Model(id) => {
                for mesh in self.model(id).meshes() {
                    pass.draw_mesh(mesh);
                }
            }
        }
    }
}

/// Position on a tilted circular orbit around the origin.
///
/// The orbit sits in the XZ plane at `LIGHT_ORBIT_RADIUS`, rotating at
/// `LIGHT_ORBIT_SPEED` rad/s, then tilts about the Z axis by `tilt_deg`.
pub fn orbit_position(elapsed_seconds: f32, phase: f32, tilt_deg: f32) -> Vector3<f32> {
    let angle = (elapsed_seconds + phase) * config::LIGHT_ORBIT_SPEED;
    let base = Vector3::new(
        angle.sin() * config::LIGHT_ORBIT_RADIUS,
        0.0,
        angle.cos() * config::LIGHT_ORBIT_RADIUS,
    );
    let tilt = Matrix4::from_angle_z(Deg(tilt_deg));
    (tilt * Vector4::new(base.x, base.y, base.z, 1.0)).truncate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::vertex::VertexLayout;
    use approx::assert_relative_eq;

    fn quad_mesh() -> Mesh {
        let layout = VertexLayout::new(VertexLayout::POS_UV);
        let data = [
            0.0, 0.5, 0.0, 0.0, 0.0, //
            0.0, -0.5, 0.0, 0.0, 1.0, //
            1.0, -0.5, 0.0, 1.0, 1.0,
        ];
        Mesh::from_raw(&data, &layout, Vec::new(), Vec::new())
    }

    fn scene_with_transparent_at(positions: &[Vector3<f32>]) -> Scene {
        let mut scene = Scene::new(FlyCamera::new(Vector3::new(0.0, 0.0, 0.0)));
        let mesh = scene.add_mesh(quad_mesh());
        for &position in positions {
            scene
                .add_transparent_object(DrawableRef::Mesh(mesh), PipelineKind::Unlit)
                .transform
                .position = position;
        }
        scene
    }

    #[test]
    fn transparent_objects_sort_farthest_first() {
        let scene = scene_with_transparent_at(&[
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(5.0, 0.0, 0.0),
            Vector3::new(3.0, 0.0, 0.0),
        ]);
        // Distances 1, 5, 3 from the origin camera.
        assert_eq!(scene.sorted_transparent_indices(), vec![1, 2, 0]);
    }

    #[test]
    fn ordering_is_rederived_after_camera_moves() {
        let mut scene = scene_with_transparent_at(&[
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(5.0, 0.0, 0.0),
        ]);
        assert_eq!(scene.sorted_transparent_indices(), vec![1, 0]);

        // Past the far object: relative order flips.
        scene.camera.position = Vector3::new(6.0, 0.0, 0.0);
        assert_eq!(scene.sorted_transparent_indices(), vec![0, 1]);
    }

    #[test]
    fn equal_distances_keep_insertion_order() {
        let scene = scene_with_transparent_at(&[
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(0.0, 0.0, 2.0),
        ]);
        // All ties: the stable sort must not reorder or drop any of them.
        assert_eq!(scene.sorted_transparent_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn orbit_preserves_radius() {
        for t in [0.0f32, 0.37, 1.0, 4.2, 100.5] {
            let p = orbit_position(t, 0.0, config::LIGHT_ORBIT_TILT_DEG);
            assert_relative_eq!(
                p.magnitude(),
                config::LIGHT_ORBIT_RADIUS,
                epsilon = 1e-4
            );
        }
    }

    #[test]
    fn scene_update_moves_lights_and_markers_together() {
        let mut scene = Scene::new(FlyCamera::default());
        let mesh = scene.add_mesh(quad_mesh());
        scene.add_light_marker(0, mesh);
        scene.add_light_marker(1, mesh);

        scene.update(1.25);
        for i in 0..2 {
            let light = scene.point_lights[i].position;
            let marker = scene.objects[i].transform.position;
            assert_eq!(light, marker);
        }
        // The two lights are out of phase, never coincident.
        assert!(
            (scene.point_lights[0].position - scene.point_lights[1].position).magnitude() > 1e-3
        );
    }
}
