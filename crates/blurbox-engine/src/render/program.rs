use std::borrow::Cow;
use std::num::NonZeroU64;

use crate::geometry::GeometryBuffer;
use crate::shader::{LinkedProgram, UniformStaging};

use super::RenderCtx;

/// Device objects for a linked program: modules, pipeline, uniform buffers.
///
/// Built once at startup. Uniform values are staged on the CPU and copied to
/// the GPU by `upload_uniforms` before each draw.
pub struct GpuProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffers: Vec<wgpu::Buffer>,
    staging: UniformStaging,
}

impl GpuProgram {
    /// Creates the pipeline for `program`, drawing 2D vertices as a triangle strip.
    pub fn new(ctx: &RenderCtx<'_>, label: &str, program: &LinkedProgram) -> Self {
        let vertex = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{label} vertex")),
            source: wgpu::ShaderSource::Naga(Cow::Owned(program.vertex().module().clone())),
        });
        let fragment = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{label} fragment")),
            source: wgpu::ShaderSource::Naga(Cow::Owned(program.fragment().module().clone())),
        });

        let blocks = program.blocks();

        let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = blocks
            .iter()
            .map(|block| wgpu::BindGroupLayoutEntry {
                binding: block.binding,
                visibility: block.visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(block.span as u64),
                },
                count: None,
            })
            .collect();

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(&format!("{label} bgl")),
                    entries: &layout_entries,
                });

        let uniform_buffers: Vec<wgpu::Buffer> = blocks
            .iter()
            .map(|block| {
                ctx.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("{label} ubo {}", block.binding)),
                    size: (block.span as u64).next_multiple_of(16).max(16),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            })
            .collect();

        let group_entries: Vec<wgpu::BindGroupEntry> = blocks
            .iter()
            .zip(&uniform_buffers)
            .map(|(block, buffer)| wgpu::BindGroupEntry {
                binding: block.binding,
                resource: buffer.as_entire_binding(),
            })
            .collect();

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} bind group")),
            layout: &bind_group_layout,
            entries: &group_entries,
        });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some(&format!("{label} pipeline layout")),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{label} pipeline")),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                buffers: &[GeometryBuffer::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::info!(
            "{label}: pipeline ready ({} uniform block(s), {:?})",
            blocks.len(),
            ctx.surface_format
        );

        Self {
            pipeline,
            bind_group,
            uniform_buffers,
            staging: UniformStaging::new(blocks),
        }
    }

    /// CPU-side uniform values, written through resolved locations.
    #[inline]
    pub fn uniforms_mut(&mut self) -> &mut UniformStaging {
        &mut self.staging
    }

    /// Copies every staged block to its GPU buffer.
    pub fn upload_uniforms(&self, queue: &wgpu::Queue) {
        for (i, buffer) in self.uniform_buffers.iter().enumerate() {
            queue.write_buffer(buffer, 0, self.staging.bytes(i));
        }
    }

    /// Activates the program on `pass`.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
    }
}
