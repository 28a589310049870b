use crate::error::Result;
use crate::geometry::{BufferUsage, GeometryBuffer, FULLSCREEN_QUAD};
use crate::paint::{Color, Palette};
use crate::shader::UniformTable;
use crate::sim::RectState;

use super::blur_rect::{build_rect_program, write_rect_uniforms, RectUniform};
use super::{GpuProgram, RenderCtx, RenderTarget};

/// Draws the blurred rectangle over a full-viewport quad.
///
/// The program, quad and uniform sites are created once; `draw` only uploads
/// uniforms and records one pass.
pub struct BounceRenderer {
    program: GpuProgram,
    sites: UniformTable<RectUniform>,
    quad: GeometryBuffer,
    background: Color,
}

impl BounceRenderer {
    pub fn new(ctx: &RenderCtx<'_>, palette: &Palette) -> Result<Self> {
        let (linked, sites) = build_rect_program(palette)?;
        let program = GpuProgram::new(ctx, "blur rect", &linked);
        let quad = GeometryBuffer::create(
            ctx.device,
            "fullscreen quad",
            &FULLSCREEN_QUAD,
            BufferUsage::Static,
        )?;

        Ok(Self {
            program,
            sites,
            quad,
            background: palette.background,
        })
    }

    /// Clears to the background, then draws `state` as a 4-vertex strip.
    pub fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, state: &RectState) {
        write_rect_uniforms(self.program.uniforms_mut(), &self.sites, state);
        self.program.upload_uniforms(ctx.queue);

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("blurbox pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.background.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        self.program.bind(&mut rpass);
        rpass.set_vertex_buffer(0, self.quad.slice());
        rpass.draw(0..self.quad.vertex_count(), 0..1);
    }
}
