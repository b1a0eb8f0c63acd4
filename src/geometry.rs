use std::f32::consts::PI;

/// Interleaved vertex of the instanced sphere: position, normal, texcoord.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl SphereVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];
        wgpu::VertexBufferLayout {
            array_stride: size_of::<SphereVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// A unit UV sphere indexed as one triangle strip.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Builds `(x_segments + 1) * (y_segments + 1)` vertices, row by row.
    ///
    /// Rows are stitched in alternating directions (even rows left to
    /// right, odd rows right to left) so the strip needs no restart index.
    pub fn uv_sphere(x_segments: u32, y_segments: u32) -> Self {
        let x_segments = x_segments.max(1);
        let y_segments = y_segments.max(1);
        let row = x_segments + 1;

        let mut vertices = Vec::with_capacity((row * (y_segments + 1)) as usize);
        for y in 0..=y_segments {
            let y_segment = y as f32 / y_segments as f32;
            for x in 0..=x_segments {
                let x_segment = x as f32 / x_segments as f32;
                let position = [
                    (x_segment * 2.0 * PI).cos() * (y_segment * PI).sin(),
                    (y_segment * PI).cos(),
                    (x_segment * 2.0 * PI).sin() * (y_segment * PI).sin(),
                ];
                vertices.push(SphereVertex { position, normal: position, uv: [x_segment, y_segment] });
            }
        }

        let mut indices = Vec::with_capacity((2 * row * y_segments) as usize);
        for y in 0..y_segments {
            if y % 2 == 0 {
                for x in 0..=x_segments {
                    indices.push(y * row + x);
                    indices.push((y + 1) * row + x);
                }
            } else {
                for x in (0..=x_segments).rev() {
                    indices.push((y + 1) * row + x);
                    indices.push(y * row + x);
                }
            }
        }

        Self { vertices, indices }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}
