//! Coordinate types shared by the simulation and the renderer.
//!
//! Canonical CPU space:
//! - Viewport pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! This matches `gl_FragCoord` on wgpu backends, so positions are uploaded to
//! the fragment stage without conversion.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
