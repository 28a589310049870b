//! Vertex geometry uploaded once at startup.

mod buffer;

pub use buffer::{BufferUsage, GeometryBuffer, COMPONENTS, FULLSCREEN_QUAD};
