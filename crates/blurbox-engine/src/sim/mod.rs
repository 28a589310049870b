//! Rectangle physics: integration, wall reflection and the impact blur.

mod rect_state;

pub use rect_state::{BounceParams, Collisions, RectState};
