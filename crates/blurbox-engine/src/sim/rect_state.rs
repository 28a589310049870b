use crate::coords::{Vec2, Viewport};
use crate::error::{Error, Result};

/// Blur response to time and impacts.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BounceParams {
    /// Blur lost per second.
    pub decay_rate: f32,
    /// Blur gained per wall hit.
    pub blur_impact: f32,
}

impl Default for BounceParams {
    fn default() -> Self {
        Self {
            decay_rate: 200.0,
            blur_impact: 50.0,
        }
    }
}

/// Walls hit during one `update`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Collisions {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Collisions {
    /// Number of walls hit; at most one per axis.
    #[inline]
    pub fn count(self) -> u32 {
        [self.left, self.right, self.top, self.bottom]
            .into_iter()
            .filter(|hit| *hit)
            .count() as u32
    }

    #[inline]
    pub fn any(self) -> bool {
        self.count() > 0
    }
}

/// The bouncing rectangle.
///
/// Invariants held between calls:
/// - `0 <= position <= viewport - size` on both axes
/// - `blur >= 0`
///
/// `size`, `viewport` and `params` never change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RectState {
    position: Vec2,
    velocity: Vec2,
    size: Vec2,
    blur: f32,
    viewport: Viewport,
    params: BounceParams,
}

impl RectState {
    /// Creates a state with zero blur.
    ///
    /// Fails if the rectangle does not fit the viewport, starts outside it, or
    /// any input is not finite.
    pub fn new(
        position: Vec2,
        velocity: Vec2,
        size: Vec2,
        viewport: Viewport,
        params: BounceParams,
    ) -> Result<Self> {
        let invalid = |reason: String| Err(Error::InvalidState { reason });

        if !viewport.is_valid() {
            return invalid(format!("viewport {viewport:?} is not a positive finite size"));
        }
        if !size.is_finite() || size.x <= 0.0 || size.y <= 0.0 {
            return invalid(format!("size {size:?} must be positive"));
        }
        if !viewport.fits(size) {
            return invalid(format!("size {size:?} does not fit viewport {viewport:?}"));
        }
        let max = viewport.max_origin(size);
        if !position.is_finite()
            || position.x < 0.0
            || position.y < 0.0
            || position.x > max.x
            || position.y > max.y
        {
            return invalid(format!("position {position:?} is outside [0, {max:?}]"));
        }
        if !velocity.is_finite() {
            return invalid(format!("velocity {velocity:?} is not finite"));
        }
        if !(params.decay_rate.is_finite() && params.decay_rate >= 0.0)
            || !(params.blur_impact.is_finite() && params.blur_impact >= 0.0)
        {
            return invalid(format!("{params:?} must be non-negative"));
        }

        Ok(Self {
            position,
            velocity,
            size,
            blur: 0.0,
            viewport,
            params,
        })
    }

    /// Replaces the current blur; negative or non-finite values become 0.
    pub fn with_blur(mut self, blur: f32) -> Self {
        self.blur = if blur.is_finite() { blur.max(0.0) } else { 0.0 };
        self
    }

    /// Top-left corner in viewport pixels.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Pixels per second.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn blur(&self) -> f32 {
        self.blur
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn params(&self) -> BounceParams {
        self.params
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Order: blur decay, integration, then per-axis reflection. Each wall hit
    /// clamps the position, flips that axis's velocity and adds one impact.
    /// Negative or non-finite `dt` is treated as 0.
    pub fn update(&mut self, dt: f32) -> Collisions {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.blur = (self.blur - self.params.decay_rate * dt).max(0.0);
        self.position += self.velocity * dt;

        let max = self.viewport.max_origin(self.size);
        let mut hits = Collisions::default();

        // `x > W - w` rather than `x + w > W`: a clamped rect must not re-hit.
        if self.position.x < 0.0 {
            self.position.x = 0.0;
            self.velocity.x = -self.velocity.x;
            hits.left = true;
        } else if self.position.x > max.x {
            self.position.x = max.x;
            self.velocity.x = -self.velocity.x;
            hits.right = true;
        }

        if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.velocity.y = -self.velocity.y;
            hits.top = true;
        } else if self.position.y > max.y {
            self.position.y = max.y;
            self.velocity.y = -self.velocity.y;
            hits.bottom = true;
        }

        self.blur += self.params.blur_impact * hits.count() as f32;

        if hits.any() {
            log::trace!(
                "impact {hits:?} at {:?}, velocity {:?}, blur {:.1}",
                self.position,
                self.velocity,
                self.blur
            );
        }

        hits
    }
}
