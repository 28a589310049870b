//! Animation loop.
//!
//! `AnimationDriver` advances the simulation once per display refresh and hands
//! the result to a `FrameSink`. Scheduling the next refresh is delegated to a
//! `Scheduler`, so the loop runs the same under winit and in tests.

mod driver;
mod scheduler;

pub use driver::{AnimationDriver, FrameSink, FrameStatus};
pub use scheduler::{AppControl, Scheduler, StopHandle};
