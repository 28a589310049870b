use std::borrow::Cow;
use std::fmt;

use wgpu::naga;

/// Pipeline stage a source is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    #[inline]
    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }

    /// Visibility flag used when binding resources declared by this stage.
    #[inline]
    pub fn visibility(self) -> wgpu::ShaderStages {
        match self {
            ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderStage::Fragment => wgpu::ShaderStages::FRAGMENT,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// GLSL source text tagged with its stage.
///
/// Defines are handed to the preprocessor as if declared with `#define`
/// ahead of the first line.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    stage: ShaderStage,
    text: Cow<'static, str>,
    defines: Vec<(String, String)>,
}

impl ShaderSource {
    pub fn new(stage: ShaderStage, text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            stage,
            text: text.into(),
            defines: Vec::new(),
        }
    }

    #[inline]
    pub fn vertex(text: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ShaderStage::Vertex, text)
    }

    #[inline]
    pub fn fragment(text: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ShaderStage::Fragment, text)
    }

    /// Adds a preprocessor define. A later define with the same name wins.
    pub fn with_define(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.defines.retain(|(n, _)| *n != name);
        self.defines.push((name, value.into()));
        self
    }

    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn defines(&self) -> &[(String, String)] {
        &self.defines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_define_replaces_earlier() {
        let src = ShaderSource::fragment("void main() {}")
            .with_define("COLOR", "vec4(0.0)")
            .with_define("COLOR", "vec4(1.0)");
        assert_eq!(src.defines(), &[("COLOR".to_string(), "vec4(1.0)".to_string())]);
    }

    #[test]
    fn stage_display_is_lowercase() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
