use wgpu::util::DeviceExt;

use crate::error::{Error, Result};

/// Components per vertex (2D positions).
pub const COMPONENTS: usize = 2;

/// Full-viewport quad in NDC, ordered for a triangle strip.
pub const FULLSCREEN_QUAD: [f32; 8] = [
    -1.0, 1.0, //
    1.0, 1.0, //
    -1.0, -1.0, //
    1.0, -1.0,
];

/// Upload hint for vertex data.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUsage {
    /// Written once at creation.
    Static,
    /// May be rewritten with `queue.write_buffer`.
    Dynamic,
}

impl BufferUsage {
    fn to_wgpu(self) -> wgpu::BufferUsages {
        match self {
            BufferUsage::Static => wgpu::BufferUsages::VERTEX,
            BufferUsage::Dynamic => wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        }
    }
}

/// Tightly packed 2D `f32` vertices in GPU memory.
pub struct GeometryBuffer {
    buffer: wgpu::Buffer,
    vertex_count: u32,
    usage: BufferUsage,
}

impl GeometryBuffer {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    /// Uploads `vertices` (`x0, y0, x1, y1, ...`) once.
    pub fn create(
        device: &wgpu::Device,
        label: &str,
        vertices: &[f32],
        usage: BufferUsage,
    ) -> Result<Self> {
        let vertex_count = count_vertices(vertices)?;

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: usage.to_wgpu(),
        });

        log::debug!("uploaded {label}: {vertex_count} vertices ({usage:?})");

        Ok(Self {
            buffer,
            vertex_count,
            usage,
        })
    }

    /// Attribute layout: location 0, two 32-bit floats, not normalized,
    /// stride 8 bytes, offset 0.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: (COMPONENTS * std::mem::size_of::<f32>()) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    #[inline]
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

fn count_vertices(vertices: &[f32]) -> Result<u32> {
    if vertices.is_empty() {
        return Err(Error::Geometry {
            reason: "no vertices".into(),
        });
    }
    if vertices.len() % COMPONENTS != 0 {
        return Err(Error::Geometry {
            reason: format!(
                "{} floats do not form whole {COMPONENTS}D vertices",
                vertices.len()
            ),
        });
    }
    u32::try_from(vertices.len() / COMPONENTS).map_err(|_| Error::Geometry {
        reason: "too many vertices".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_has_four_vertices() {
        assert_eq!(count_vertices(&FULLSCREEN_QUAD).unwrap(), 4);
    }

    #[test]
    fn quad_covers_ndc_corners() {
        let corners: Vec<(f32, f32)> = FULLSCREEN_QUAD
            .chunks_exact(COMPONENTS)
            .map(|v| (v[0], v[1]))
            .collect();
        for corner in [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
            assert!(corners.contains(&corner), "missing {corner:?}");
        }
    }

    #[test]
    fn rejects_empty_and_odd_data() {
        assert!(matches!(count_vertices(&[]), Err(Error::Geometry { .. })));
        assert!(matches!(count_vertices(&[0.0, 1.0, 2.0]), Err(Error::Geometry { .. })));
    }

    #[test]
    fn layout_is_tightly_packed_vec2() {
        let layout = GeometryBuffer::layout();
        assert_eq!(layout.array_stride, 8);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 1);

        let attr = layout.attributes[0];
        assert_eq!(attr.format, wgpu::VertexFormat::Float32x2);
        assert_eq!(attr.offset, 0);
        assert_eq!(attr.shader_location, 0);
    }

    #[test]
    fn static_usage_is_not_writable() {
        assert!(!BufferUsage::Static.to_wgpu().contains(wgpu::BufferUsages::COPY_DST));
        assert!(BufferUsage::Dynamic.to_wgpu().contains(wgpu::BufferUsages::COPY_DST));
    }
}
