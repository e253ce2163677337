//! Vertex formats and attribute-layout bookkeeping.
//!
//! Meshes are built from flat interleaved `f32` buffers described by a
//! [`VertexLayout`] (an ordered list of per-attribute component counts,
//! e.g. `[3, 3, 2]` for position/normal/uv). The flat data is normalized
//! into the canonical [`Vertex3D`] GPU format at construction time;
//! attributes the layout omits are zero-filled.

/// Canonical GPU vertex: position, normal, texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex3D {
    /// Vertex buffer layout for pipelines drawing scene geometry.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Position-only vertex used by the skybox cube.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyVertex {
    pub position: [f32; 3],
}

impl SkyVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SkyVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

/// Ordered per-vertex attribute component counts.
///
/// Describes how a flat interleaved buffer is partitioned. A buffer whose
/// length is not a multiple of the stride is a caller bug, not a runtime
/// error; the partitioning methods panic on malformed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    sizes: Vec<u32>,
}

impl VertexLayout {
    /// Position + normal + uv.
    pub const POS_NORMAL_UV: [u32; 3] = [3, 3, 2];
    /// Position + uv (unlit geometry).
    pub const POS_UV: [u32; 2] = [3, 2];
    /// Position only.
    pub const POS: [u32; 1] = [3];

    pub fn new(sizes: impl Into<Vec<u32>>) -> Self {
        let sizes = sizes.into();
        assert!(!sizes.is_empty(), "vertex layout must have at least one attribute");
        assert!(
            sizes.iter().all(|&s| (1..=4).contains(&s)),
            "attribute component counts must be 1..=4, got {:?}",
            sizes
        );
        Self { sizes }
    }

    /// Total floats per vertex.
    pub fn stride(&self) -> u32 {
        self.sizes.iter().sum()
    }

    /// Float offset of each attribute within a vertex.
    pub fn offsets(&self) -> Vec<u32> {
        let mut offsets = Vec::with_capacity(self.sizes.len());
        let mut acc = 0;
        for &size in &self.sizes {
            offsets.push(acc);
            acc += size;
        }
        offsets
    }

    /// Number of vertices in a flat buffer of `len` floats.
    ///
    /// # Panics
    /// Panics if the layout does not evenly partition the buffer.
    pub fn vertex_count(&self, len: usize) -> u32 {
        let stride = self.stride() as usize;
        assert!(
            len % stride == 0,
            "vertex buffer length {} is not divisible by layout stride {}",
            len,
            stride
        );
        (len / stride) as u32
    }

    /// Normalizes a flat interleaved buffer into canonical vertices.
    ///
    /// The first attribute is taken as position; a 3-component second
    /// attribute as normal; the first 2-component attribute as uv.
    /// Missing attributes are zero-filled.
    pub fn unpack(&self, data: &[f32]) -> Vec<Vertex3D> {
        let stride = self.stride() as usize;
        let count = self.vertex_count(data.len()) as usize;
        let offsets = self.offsets();

        let mut normal_at = None;
        let mut uv_at = None;
        for (i, &size) in self.sizes.iter().enumerate().skip(1) {
            match size {
                3 if normal_at.is_none() => normal_at = Some(offsets[i] as usize),
                2 if uv_at.is_none() => uv_at = Some(offsets[i] as usize),
                _ => (),
            }
        }

        let mut vertices = Vec::with_capacity(count);
        for chunk in data.chunks_exact(stride) {
            let position = [chunk[0], chunk[1], chunk[2]];
            let normal = match normal_at {
                Some(o) => [chunk[o], chunk[o + 1], chunk[o + 2]],
                None => [0.0; 3],
            };
            let uv = match uv_at {
                Some(o) => [chunk[o], chunk[o + 1]],
                None => [0.0; 2],
            };
            vertices.push(Vertex3D {
                position,
                normal,
                uv,
            });
        }
        vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_and_offsets() {
        let layout = VertexLayout::new(VertexLayout::POS_NORMAL_UV);
        assert_eq!(layout.stride(), 8);
        assert_eq!(layout.offsets(), vec![0, 3, 6]);
    }

    #[test]
    fn vertex_count_for_pos_normal_uv() {
        let layout = VertexLayout::new(VertexLayout::POS_NORMAL_UV);
        for n in 1..=16usize {
            assert_eq!(layout.vertex_count(8 * n), n as u32);
        }
    }

    #[test]
    #[should_panic(expected = "not divisible")]
    fn uneven_buffer_is_a_contract_violation() {
        let layout = VertexLayout::new(VertexLayout::POS_NORMAL_UV);
        layout.vertex_count(13);
    }

    #[test]
    fn unpack_fills_missing_attributes_with_zeros() {
        let layout = VertexLayout::new(VertexLayout::POS_UV);
        let data = [1.0, 2.0, 3.0, 0.25, 0.75];
        let vertices = layout.unpack(&data);
        assert_eq!(
            vertices,
            vec![Vertex3D {
                position: [1.0, 2.0, 3.0],
                normal: [0.0; 3],
                uv: [0.25, 0.75],
            }]
        );
    }

    #[test]
    fn unpack_interleaved_pos_normal_uv() {
        let layout = VertexLayout::new(VertexLayout::POS_NORMAL_UV);
        let data = [
            -0.5, -0.5, -0.5, 0.0, 0.0, -1.0, 0.0, 0.0, //
            0.5, -0.5, -0.5, 0.0, 0.0, -1.0, 1.0, 0.0,
        ];
        let vertices = layout.unpack(&data);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[1].position, [0.5, -0.5, -0.5]);
        assert_eq!(vertices[1].normal, [0.0, 0.0, -1.0]);
        assert_eq!(vertices[1].uv, [1.0, 0.0]);
    }
}
