use std::marker::PhantomData;

use wgpu::naga;

/// Value type of a uniform block member, as far as uploads are concerned.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformKind {
    Float,
    Vec2,
    Vec3,
    Vec4,
    /// Anything else (matrices, ints, arrays). Resolvable, but not writable.
    Other,
}

impl UniformKind {
    pub(crate) fn from_naga(inner: &naga::TypeInner) -> Self {
        use naga::{Scalar, ScalarKind, TypeInner, VectorSize};

        const F32: Scalar = Scalar {
            kind: ScalarKind::Float,
            width: 4,
        };

        match *inner {
            TypeInner::Scalar(scalar) if scalar == F32 => UniformKind::Float,
            TypeInner::Vector { size, scalar } if scalar == F32 => match size {
                VectorSize::Bi => UniformKind::Vec2,
                VectorSize::Tri => UniformKind::Vec3,
                VectorSize::Quad => UniformKind::Vec4,
            },
            _ => UniformKind::Other,
        }
    }

    /// Bytes written by an upload of this kind.
    #[inline]
    pub fn byte_size(self) -> Option<usize> {
        match self {
            UniformKind::Float => Some(4),
            UniformKind::Vec2 => Some(8),
            UniformKind::Vec3 => Some(12),
            UniformKind::Vec4 => Some(16),
            UniformKind::Other => None,
        }
    }

    pub fn glsl_name(self) -> &'static str {
        match self {
            UniformKind::Float => "float",
            UniformKind::Vec2 => "vec2",
            UniformKind::Vec3 => "vec3",
            UniformKind::Vec4 => "vec4",
            UniformKind::Other => "<non-float>",
        }
    }
}

/// Opaque handle to one uniform: a byte range inside a reflected block.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation {
    pub(crate) block: usize,
    pub(crate) offset: u32,
    pub(crate) kind: UniformKind,
}

impl UniformLocation {
    #[inline]
    pub fn kind(self) -> UniformKind {
        self.kind
    }

    #[inline]
    pub fn offset(self) -> u32 {
        self.offset
    }

    #[inline]
    pub fn block(self) -> usize {
        self.block
    }
}

/// Named member of a uniform block.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UniformMember {
    pub name: String,
    pub offset: u32,
    pub kind: UniformKind,
}

/// A `uniform` block reflected at link time.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformBlock {
    pub name: Option<String>,
    pub group: u32,
    pub binding: u32,
    /// Size in bytes, including trailing std140 padding.
    pub span: u32,
    pub visibility: wgpu::ShaderStages,
    pub members: Vec<UniformMember>,
}

/// A fixed set of uniforms a program variant expects.
///
/// Implemented by small enums so a misspelt uniform is a compile error in Rust
/// rather than a silent null location at runtime.
pub trait UniformSite: Copy + 'static {
    /// Every site, in `index` order.
    const ALL: &'static [Self];

    /// Name as declared in the shader.
    fn name(self) -> &'static str;

    fn kind(self) -> UniformKind;

    /// Position of `self` in `ALL`.
    fn index(self) -> usize;
}

/// Locations for every site of `U`, resolved once after linking.
#[derive(Debug, Clone)]
pub struct UniformTable<U> {
    slots: Vec<Option<UniformLocation>>,
    _site: PhantomData<U>,
}

impl<U: UniformSite> UniformTable<U> {
    pub(crate) fn from_slots(slots: Vec<Option<UniformLocation>>) -> Self {
        debug_assert_eq!(slots.len(), U::ALL.len());
        Self {
            slots,
            _site: PhantomData,
        }
    }

    /// `None` when the program does not declare the site.
    #[inline]
    pub fn get(&self, site: U) -> Option<UniformLocation> {
        self.slots.get(site.index()).copied().flatten()
    }
}

/// CPU mirror of every uniform block in a program.
///
/// Writes land at the resolved byte offsets; the renderer copies whole blocks
/// to the GPU once per frame.
#[derive(Debug, Clone)]
pub struct UniformStaging {
    blocks: Vec<Vec<u8>>,
}

impl UniformStaging {
    pub fn new(blocks: &[UniformBlock]) -> Self {
        Self {
            blocks: blocks.iter().map(|b| vec![0u8; b.span as usize]).collect(),
        }
    }

    /// Writes a `float`. A `None` location is ignored, as with an unused uniform.
    #[inline]
    pub fn set_float(&mut self, location: Option<UniformLocation>, value: f32) {
        self.write(location, UniformKind::Float, bytemuck::bytes_of(&value));
    }

    /// Writes a `vec2`. A `None` location is ignored.
    #[inline]
    pub fn set_vec2(&mut self, location: Option<UniformLocation>, value: [f32; 2]) {
        self.write(location, UniformKind::Vec2, bytemuck::cast_slice(&value));
    }

    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn bytes(&self, block: usize) -> &[u8] {
        self.blocks.get(block).map_or(&[], Vec::as_slice)
    }

    fn write(&mut self, location: Option<UniformLocation>, kind: UniformKind, bytes: &[u8]) {
        let Some(loc) = location else { return };

        if loc.kind != kind {
            log::debug!(
                "uniform write skipped: location holds {}, got {}",
                loc.kind.glsl_name(),
                kind.glsl_name()
            );
            return;
        }

        let Some(block) = self.blocks.get_mut(loc.block) else { return };
        let start = loc.offset as usize;
        let Some(dst) = block.get_mut(start..start + bytes.len()) else {
            log::debug!("uniform write out of block bounds at offset {start}");
            return;
        };
        dst.copy_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(span: u32) -> UniformBlock {
        UniformBlock {
            name: Some("Params".into()),
            group: 0,
            binding: 0,
            span,
            visibility: wgpu::ShaderStages::FRAGMENT,
            members: Vec::new(),
        }
    }

    fn loc(offset: u32, kind: UniformKind) -> Option<UniformLocation> {
        Some(UniformLocation {
            block: 0,
            offset,
            kind,
        })
    }

    fn read_f32(bytes: &[u8], offset: usize) -> f32 {
        f32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn writes_land_at_offsets() {
        let mut staging = UniformStaging::new(&[block(32)]);
        staging.set_vec2(loc(0, UniformKind::Vec2), [100.0, 50.0]);
        staging.set_vec2(loc(8, UniformKind::Vec2), [3.0, 4.0]);
        staging.set_float(loc(16, UniformKind::Float), 12.5);

        let bytes = staging.bytes(0);
        assert_eq!(bytes.len(), 32);
        assert_eq!(read_f32(bytes, 0), 100.0);
        assert_eq!(read_f32(bytes, 4), 50.0);
        assert_eq!(read_f32(bytes, 8), 3.0);
        assert_eq!(read_f32(bytes, 12), 4.0);
        assert_eq!(read_f32(bytes, 16), 12.5);
        assert!(bytes[20..].iter().all(|b| *b == 0));
    }

    #[test]
    fn none_location_is_a_no_op() {
        let mut staging = UniformStaging::new(&[block(16)]);
        staging.set_float(None, 9.0);
        assert!(staging.bytes(0).iter().all(|b| *b == 0));
    }

    #[test]
    fn kind_mismatch_is_skipped() {
        let mut staging = UniformStaging::new(&[block(16)]);
        staging.set_vec2(loc(0, UniformKind::Float), [1.0, 2.0]);
        assert!(staging.bytes(0).iter().all(|b| *b == 0));
    }

    #[test]
    fn out_of_bounds_write_is_skipped() {
        let mut staging = UniformStaging::new(&[block(8)]);
        staging.set_vec2(loc(4, UniformKind::Vec2), [1.0, 2.0]);
        assert!(staging.bytes(0).iter().all(|b| *b == 0));
        assert_eq!(staging.bytes(3), &[] as &[u8]);
    }
}
