use crate::error::Result;
use crate::paint::Palette;
use crate::shader::{
    self, LinkedProgram, ShaderSource, UniformKind, UniformSite, UniformStaging, UniformTable,
};
use crate::sim::RectState;

const VERTEX_SRC: &str = include_str!("shaders/quad.vert");
const FRAGMENT_SRC: &str = include_str!("shaders/blur_rect.frag");

/// Uniforms read by `blur_rect.frag`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RectUniform {
    /// `vec2 size`, rectangle extent in pixels.
    Size,
    /// `vec2 pos`, top-left corner in pixels.
    Pos,
    /// `float blur`, edge blend width in pixels.
    Blur,
}

impl UniformSite for RectUniform {
    const ALL: &'static [Self] = &[RectUniform::Size, RectUniform::Pos, RectUniform::Blur];

    fn name(self) -> &'static str {
        match self {
            RectUniform::Size => "size",
            RectUniform::Pos => "pos",
            RectUniform::Blur => "blur",
        }
    }

    fn kind(self) -> UniformKind {
        match self {
            RectUniform::Size | RectUniform::Pos => UniformKind::Vec2,
            RectUniform::Blur => UniformKind::Float,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Compiles and links the blurred-rectangle program with `palette` baked in.
pub fn build_rect_program(palette: &Palette) -> Result<(LinkedProgram, UniformTable<RectUniform>)> {
    let vertex = shader::compile(&ShaderSource::vertex(VERTEX_SRC))?;
    let fragment = shader::compile(
        &ShaderSource::fragment(FRAGMENT_SRC)
            .with_define("FOREGROUND", palette.foreground.to_glsl())
            .with_define("BACKGROUND", palette.background.to_glsl()),
    )?;

    let program = shader::link(vertex, fragment)?;
    let sites = program.resolve_sites::<RectUniform>()?;

    Ok((program, sites))
}

/// Stages `size`, `pos` and `blur` from the current state.
pub fn write_rect_uniforms(
    staging: &mut UniformStaging,
    sites: &UniformTable<RectUniform>,
    state: &RectState,
) {
    staging.set_vec2(sites.get(RectUniform::Size), state.size().to_array());
    staging.set_vec2(sites.get(RectUniform::Pos), state.position().to_array());
    staging.set_float(sites.get(RectUniform::Blur), state.blur());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Vec2, Viewport};
    use crate::error::Error;
    use crate::shader::{compile, link};
    use crate::sim::BounceParams;

    fn read_f32(bytes: &[u8], offset: u32) -> f32 {
        let at = offset as usize;
        bytemuck::pod_read_unaligned(&bytes[at..at + 4])
    }

    #[test]
    fn shipped_program_resolves_all_uniforms() {
        let (program, sites) = build_rect_program(&Palette::default()).unwrap();

        let resolved = program.resolve_uniforms(&["size", "pos", "blur"]);
        assert!(resolved.values().all(Option::is_some), "{resolved:?}");

        for &site in RectUniform::ALL {
            let loc = sites.get(site).unwrap();
            assert_eq!(loc.kind(), site.kind());
        }
    }

    #[test]
    fn unknown_uniform_is_absent() {
        let (program, _) = build_rect_program(&Palette::default()).unwrap();
        assert_eq!(program.uniform_location("velocity"), None);
    }

    #[test]
    fn broken_fragment_reports_compile_log() {
        let broken = FRAGMENT_SRC.replace("out_color = FOREGROUND;", "out_color = FOREGROUND");
        let err = compile(&ShaderSource::fragment(broken)).unwrap_err();
        match err {
            Error::Compile { log, .. } => assert!(!log.is_empty()),
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn shipped_pair_links_without_palette_defines() {
        let vertex = compile(&ShaderSource::vertex(VERTEX_SRC)).unwrap();
        let fragment = compile(&ShaderSource::fragment(FRAGMENT_SRC)).unwrap();
        let program = link(vertex, fragment).unwrap();
        assert_eq!(program.blocks().len(), 1);
    }

    #[test]
    fn state_lands_at_resolved_offsets() {
        let (program, sites) = build_rect_program(&Palette::default()).unwrap();
        let mut staging = UniformStaging::new(program.blocks());

        let state = RectState::new(
            Vec2::new(10.0, 20.0),
            Vec2::zero(),
            Vec2::new(100.0, 50.0),
            Viewport::new(800.0, 600.0),
            BounceParams::default(),
        )
        .unwrap()
        .with_blur(12.5);

        write_rect_uniforms(&mut staging, &sites, &state);

        let size = sites.get(RectUniform::Size).unwrap();
        let pos = sites.get(RectUniform::Pos).unwrap();
        let blur = sites.get(RectUniform::Blur).unwrap();
        let bytes = staging.bytes(size.block());

        assert_eq!(read_f32(bytes, size.offset()), 100.0);
        assert_eq!(read_f32(bytes, size.offset() + 4), 50.0);
        assert_eq!(read_f32(bytes, pos.offset()), 10.0);
        assert_eq!(read_f32(bytes, pos.offset() + 4), 20.0);
        assert_eq!(read_f32(bytes, blur.offset()), 12.5);
    }
}
