//! Shader programs.
//!
//! GL-style flow on top of wgpu's shader front-end:
//! - `compile` parses one GLSL stage and validates it
//! - `link` pairs a vertex and a fragment stage, checks their interface and
//!   reflects uniform blocks
//! - uniform names resolve to byte locations inside those blocks
//!
//! Everything here runs on the CPU; device objects are created later by
//! `render::GpuProgram`.

mod compile;
mod link;
mod source;
mod uniforms;

pub use compile::{compile, CompiledShader};
pub use link::{link, LinkedProgram};
pub use source::{ShaderSource, ShaderStage};
pub use uniforms::{
    UniformBlock, UniformKind, UniformLocation, UniformMember, UniformSite, UniformStaging,
    UniformTable,
};
