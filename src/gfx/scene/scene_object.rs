//! Scene objects: a transform bound to exactly one drawable.

use cgmath::{Deg, Matrix, Matrix3, Matrix4, SquareMatrix, Vector3};

use crate::wgpu_utils::{self, UniformBuffer};

/// Position / Euler rotation (degrees) / non-uniform scale.
///
/// The model matrix composes in a fixed order: translate, then rotate
/// X, Y, Z, then scale. Rotation is non-commutative, so this order is
/// part of the contract, not an implementation detail.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Euler angles in degrees, applied X then Y then Z.
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Deg(self.rotation.x))
            * Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_z(Deg(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// Transpose of the inverse of the upper 3x3 of (view * model).
/// Correct for normals under non-uniform scale.
pub fn normal_matrix(view: Matrix4<f32>, model: Matrix4<f32>) -> Matrix3<f32> {
    let mv = view * model;
    let upper = Matrix3::from_cols(
        mv.x.truncate(),
        mv.y.truncate(),
        mv.z.truncate(),
    );
    upper
        .invert()
        .map(|inv| inv.transpose())
        .unwrap_or_else(Matrix3::identity)
}

/// Index into the scene's mesh arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshId(pub(crate) usize);

/// Index into the scene's model arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelId(pub(crate) usize);

/// Reference to exactly one drawable. A sum type, so "both" and
/// "neither" are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawableRef {
    Mesh(MeshId),
    Model(ModelId),
}

/// Which pipeline an object is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    /// Full lighting: diffuse/specular maps, point/dir/spot lights.
    Lit,
    /// Textured, no lighting.
    Unlit,
    /// Flat tint color (light marker cubes).
    Flat,
}

impl PipelineKind {
    /// Name of the registered render pipeline drawing this kind.
    pub fn pipeline_name(self) -> &'static str {
        match self {
            PipelineKind::Lit => "lit",
            PipelineKind::Unlit => "unlit",
            PipelineKind::Flat => "flat",
        }
    }
}

/// Per-object uniform data uploaded before each draw.
///
/// The normal matrix is stored as three vec4 columns to satisfy WGSL's
/// mat3 column alignment.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_0: [f32; 4],
    pub normal_1: [f32; 4],
    pub normal_2: [f32; 4],
    pub tint: [f32; 4],
}

impl ObjectUniforms {
    pub fn new(model: Matrix4<f32>, normal: Matrix3<f32>, tint: [f32; 4]) -> Self {
        Self {
            model: model.into(),
            normal_0: [normal.x.x, normal.x.y, normal.x.z, 0.0],
            normal_1: [normal.y.x, normal.y.y, normal.y.z, 0.0],
            normal_2: [normal.z.x, normal.z.y, normal.z.z, 0.0],
            tint,
        }
    }
}

pub struct ObjectGpuResources {
    pub uniform_buffer: UniformBuffer<ObjectUniforms>,
    pub bind_group: wgpu::BindGroup,
}

/// A transform paired with a non-owning drawable reference.
///
/// The GPU geometry lives in the scene arenas; destroying a SceneObject
/// never touches buffers shared with other objects.
pub struct SceneObject {
    pub transform: Transform,
    pub drawable: DrawableRef,
    pub pipeline: PipelineKind,
    /// Flat-pipeline color; multiplied into the shaded result elsewhere.
    pub tint: [f32; 4],
    pub(crate) gpu: Option<ObjectGpuResources>,
}

impl SceneObject {
    pub fn new(drawable: DrawableRef, pipeline: PipelineKind) -> Self {
        Self {
            transform: Transform::default(),
            drawable,
            pipeline,
            tint: [1.0; 4],
            gpu: None,
        }
    }

    pub fn init_gpu_resources(&mut self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout) {
        let uniform_buffer = UniformBuffer::new(device);
        let bind_group = wgpu_utils::binding_types::bind_group(
            device,
            "Object Bind Group",
            layout,
            vec![uniform_buffer.binding_resource()],
        );
        self.gpu = Some(ObjectGpuResources {
            uniform_buffer,
            bind_group,
        });
    }

    /// Recomputes model and normal matrices from the current transform
    /// and uploads them. Pure function of present state, so orchestration
    /// code may mutate the transform freely between calls.
    pub fn update_uniforms(&mut self, queue: &wgpu::Queue, view: Matrix4<f32>) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let model = self.transform.model_matrix();
        let normal = normal_matrix(view, model);
        gpu.uniform_buffer
            .update_content(queue, ObjectUniforms::new(model, normal, self.tint));
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{InnerSpace, Transform as _, Vector4};

    #[test]
    fn identity_rotation_and_scale_yield_pure_translation() {
        let transform = Transform {
            position: Vector3::new(1.5, -2.0, 4.25),
            ..Default::default()
        };
        let expected = Matrix4::from_translation(Vector3::new(1.5, -2.0, 4.25));
        assert_eq!(transform.model_matrix(), expected);
    }

    #[test]
    fn composition_order_is_translate_rx_ry_rz_scale() {
        let transform = Transform {
            position: Vector3::new(1.0, 2.0, 3.0),
            rotation: Vector3::new(30.0, 45.0, 60.0),
            scale: Vector3::new(2.0, 1.0, 0.5),
        };
        let expected = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0))
            * Matrix4::from_angle_x(Deg(30.0))
            * Matrix4::from_angle_y(Deg(45.0))
            * Matrix4::from_angle_z(Deg(60.0))
            * Matrix4::from_nonuniform_scale(2.0, 1.0, 0.5);
        let actual = transform.model_matrix();
        for col in 0..4 {
            for row in 0..4 {
                assert_relative_eq!(actual[col][row], expected[col][row], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn normal_matrix_restores_unit_normals_under_nonuniform_scale() {
        let model = Matrix4::from_nonuniform_scale(2.0, 1.0, 0.5);
        let view = Matrix4::identity();
        let n = normal_matrix(view, model);

        // A plane normal on a scaled surface must stay perpendicular to
        // the transformed tangent.
        let tangent = Vector3::new(1.0, 0.0, 1.0);
        let normal = Vector3::new(1.0, 0.0, -1.0).normalize();
        let moved_tangent = (model * Vector4::new(tangent.x, tangent.y, tangent.z, 0.0)).truncate();
        let moved_normal = (n * normal).normalize();
        assert_relative_eq!(moved_normal.dot(moved_tangent.normalize()), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn normal_matrix_of_rigid_transform_matches_rotation() {
        let model = Matrix4::from_angle_y(Deg(40.0)) * Matrix4::from_translation(Vector3::new(3.0, 1.0, -2.0));
        let view = Matrix4::identity();
        let n = normal_matrix(view, model);
        // For pure rotation the normal matrix equals the rotation itself.
        let rotated = n * Vector3::unit_z();
        let expected = Matrix4::from_angle_y(Deg(40.0)).transform_vector(Vector3::unit_z());
        assert_relative_eq!(rotated.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(rotated.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(rotated.z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn drawable_ref_is_exactly_one_of_mesh_or_model() {
        let mesh_ref = DrawableRef::Mesh(MeshId(0));
        let model_ref = DrawableRef::Model(ModelId(0));
        assert_ne!(mesh_ref, model_ref);
        match mesh_ref {
            DrawableRef::Mesh(id) => assert_eq!(id, MeshId(0)),
            DrawableRef::Model(_) => panic!("constructed as mesh"),
        }
    }
}
