use std::time::Duration;

use crate::coords::{Vec2, Viewport};
use crate::error::Result;
use crate::paint::Palette;
use crate::sim::{BounceParams, RectState};
use crate::time::FrameClock;

/// Scene parameters: viewport, initial rectangle, physics and colors.
#[derive(Debug, Clone, PartialEq)]
pub struct BounceConfig {
    /// Window client area in physical pixels.
    pub viewport: Viewport,
    pub position: Vec2,
    /// Pixels per second.
    pub velocity: Vec2,
    pub size: Vec2,
    pub initial_blur: f32,
    pub params: BounceParams,
    pub palette: Palette,
    /// Upper bound on a single frame's `dt`; `None` lets long stalls through.
    pub max_frame_dt: Option<Duration>,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(800.0, 600.0),
            position: Vec2::new(10.0, 10.0),
            velocity: Vec2::new(200.0, 200.0),
            size: Vec2::new(100.0, 100.0),
            initial_blur: 0.0,
            params: BounceParams::default(),
            palette: Palette::default(),
            max_frame_dt: None,
        }
    }
}

impl BounceConfig {
    /// Validated initial state.
    pub fn rect_state(&self) -> Result<RectState> {
        Ok(RectState::new(
            self.position,
            self.velocity,
            self.size,
            self.viewport,
            self.params,
        )?
        .with_blur(self.initial_blur))
    }

    pub fn frame_clock(&self) -> FrameClock {
        match self.max_frame_dt {
            Some(dt_max) => FrameClock::with_max_dt(dt_max),
            None => FrameClock::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn defaults_build_a_valid_state() {
        let s = BounceConfig::default().rect_state().unwrap();
        assert_eq!(s.position(), Vec2::new(10.0, 10.0));
        assert_eq!(s.velocity(), Vec2::new(200.0, 200.0));
        assert_eq!(s.blur(), 0.0);
    }

    #[test]
    fn oversized_rect_is_rejected() {
        let cfg = BounceConfig {
            size: Vec2::new(801.0, 100.0),
            ..Default::default()
        };
        assert!(matches!(cfg.rect_state(), Err(Error::InvalidState { .. })));
    }
}
