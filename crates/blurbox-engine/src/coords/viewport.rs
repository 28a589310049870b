use super::Vec2;

/// Fixed-size rendering surface in pixels.
///
/// The simulation bounds and the fragment stage share this coordinate basis.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Largest top-left origin at which a box of `size` still fits.
    ///
    /// Negative when `size` exceeds the viewport on that axis.
    #[inline]
    pub fn max_origin(self, size: Vec2) -> Vec2 {
        Vec2::new(self.width - size.x, self.height - size.y)
    }

    /// Whether a box of `size` fits on both axes.
    #[inline]
    pub fn fits(self, size: Vec2) -> bool {
        size.x <= self.width && size.y <= self.height
    }

    /// Size in whole physical pixels, rounded up and never zero.
    #[inline]
    pub fn physical_size(self) -> (u32, u32) {
        (
            (self.width.ceil() as u32).max(1),
            (self.height.ceil() as u32).max(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_origin_subtracts_size() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.max_origin(Vec2::new(100.0, 50.0)), Vec2::new(700.0, 550.0));
    }

    #[test]
    fn fits_is_inclusive() {
        let vp = Viewport::new(800.0, 600.0);
        assert!(vp.fits(Vec2::new(800.0, 600.0)));
        assert!(!vp.fits(Vec2::new(800.5, 10.0)));
    }

    #[test]
    fn physical_size_never_zero() {
        assert_eq!(Viewport::new(0.0, 0.2).physical_size(), (1, 1));
        assert_eq!(Viewport::new(800.0, 600.0).physical_size(), (800, 600));
    }

    #[test]
    fn invalid_viewports() {
        assert!(!Viewport::new(0.0, 10.0).is_valid());
        assert!(!Viewport::new(f32::INFINITY, 10.0).is_valid());
        assert!(Viewport::new(1.0, 1.0).is_valid());
    }
}
