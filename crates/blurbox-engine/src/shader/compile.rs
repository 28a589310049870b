use wgpu::naga;
use wgpu::naga::front::glsl;
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::{Error, Result};

use super::{ShaderSource, ShaderStage};

/// Validated shader IR for one stage.
///
/// Only produced by [`compile`]; a rejected source never yields a value, so
/// nothing needs releasing on the failure path.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    stage: ShaderStage,
    module: naga::Module,
}

impl CompiledShader {
    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    #[inline]
    pub fn module(&self) -> &naga::Module {
        &self.module
    }

    /// The `main` entry point for this shader's stage.
    pub(crate) fn entry_point(&self) -> Option<&naga::EntryPoint> {
        let stage = self.stage.to_naga();
        self.module.entry_points.iter().find(|ep| ep.stage == stage)
    }
}

/// Compiles GLSL (`#version 450`) for the source's stage.
///
/// Parsing and IR validation both run here, so every diagnostic the device
/// would raise later is surfaced with the offending source lines attached.
pub fn compile(source: &ShaderSource) -> Result<CompiledShader> {
    let stage = source.stage();
    let text = source.text();

    let mut options = glsl::Options::from(stage.to_naga());
    for (name, value) in source.defines() {
        options.defines.insert(name.clone(), value.clone());
    }

    let module = glsl::Frontend::default()
        .parse(&options, text)
        .map_err(|errors| {
            let log = errors.emit_to_string(text);
            Error::Compile {
                stage,
                log: non_empty(log, || errors.to_string()),
            }
        })?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|err| {
            let log = err.emit_to_string(text);
            Error::Compile {
                stage,
                log: non_empty(log, || err.to_string()),
            }
        })?;

    let shader = CompiledShader { stage, module };
    if shader.entry_point().is_none() {
        return Err(Error::Compile {
            stage,
            log: format!("no `main` entry point for the {stage} stage"),
        });
    }

    log::debug!(
        "compiled {stage} shader: {} globals, {} functions",
        shader.module.global_variables.len(),
        shader.module.functions.len()
    );

    Ok(shader)
}

fn non_empty(log: String, fallback: impl FnOnce() -> String) -> String {
    if log.trim().is_empty() { fallback() } else { log }
}
