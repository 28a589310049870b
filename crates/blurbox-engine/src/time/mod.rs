//! Time subsystem.
//!
//! Frame timing decoupled from the runtime:
//! - one `FrameClock` per animation loop
//! - `tick(now)` once per display callback; the first call only primes

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
