use super::Color;

/// Foreground (rectangle) and background (clear and blur target) colors.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Palette {
    pub foreground: Color,
    pub background: Color,
}

impl Default for Palette {
    /// Yellow `#FFFF00` on dark grey `#181818`.
    fn default() -> Self {
        Self {
            foreground: Color::from_srgb_u8(0xff, 0xff, 0x00, 0xff),
            background: Color::from_srgb_u8(0x18, 0x18, 0x18, 0xff),
        }
    }
}
