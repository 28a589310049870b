//! Blurbox engine crate.
//!
//! A rectangle bouncing inside a fixed viewport, drawn by a GLSL fragment
//! shader whose edge blur spikes on every wall impact and decays over time.
//!
//! Layers, bottom-up:
//! - `coords`, `paint`: pixel-space vectors and linear colors
//! - `shader`: GLSL compile/link and uniform reflection (CPU only)
//! - `geometry`, `device`, `render`: wgpu objects and the per-frame pass
//! - `sim`, `time`, `anim`: physics, frame timing and the refresh loop
//! - `window`: the winit host tying it together

pub mod anim;
pub mod config;
pub mod coords;
pub mod device;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod paint;
pub mod render;
pub mod shader;
pub mod sim;
pub mod time;
pub mod window;

pub use error::{Error, Result};
