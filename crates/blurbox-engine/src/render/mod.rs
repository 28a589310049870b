//! GPU rendering subsystem.
//!
//! One program, one quad, one pass per frame:
//! - `GpuProgram` turns a linked shader program into a pipeline plus uniform buffers
//! - `BounceRenderer` clears, uploads the rectangle uniforms and draws the strip
//!
//! Convention: uniforms are in pixels with a top-left origin, matching
//! `gl_FragCoord`; vertices are already in NDC.

mod blur_rect;
mod ctx;
mod program;
mod renderer;

pub use blur_rect::{build_rect_program, write_rect_uniforms, RectUniform};
pub use ctx::{RenderCtx, RenderTarget};
pub use program::GpuProgram;
pub use renderer::BounceRenderer;
