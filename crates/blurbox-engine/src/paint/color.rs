/// Straight-alpha RGBA color in linear space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a linear color from sRGB-encoded bytes (`0`–`255`).
    ///
    /// Alpha is not gamma-encoded and is only rescaled.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: srgb_to_linear(r as f32 / 255.0),
            g: srgb_to_linear(g as f32 / 255.0),
            b: srgb_to_linear(b as f32 / 255.0),
            a: a as f32 / 255.0,
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Clear value for a render pass.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    /// GLSL constructor expression, e.g. `vec4(1.000000, 1.000000, 0.000000, 1.000000)`.
    ///
    /// Fixed-point formatting keeps the literal parseable as a float in every case.
    pub fn to_glsl(self) -> String {
        format!(
            "vec4({:.6}, {:.6}, {:.6}, {:.6})",
            self.r, self.g, self.b, self.a
        )
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_extremes_are_preserved() {
        let c = Color::from_srgb_u8(255, 255, 0, 255);
        assert_eq!(c, Color::new(1.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn srgb_midtones_are_linearized() {
        // 0x18 = 24 -> ~0.00913 linear
        let c = Color::from_srgb_u8(0x18, 0x18, 0x18, 0xff);
        assert!((c.r - 0.00913).abs() < 1e-4, "r = {}", c.r);
        assert_eq!(c.r, c.g);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn glsl_literal_always_has_decimal_point() {
        let s = Color::new(1.0, 0.0, 0.5, 1.0).to_glsl();
        assert_eq!(s, "vec4(1.000000, 0.000000, 0.500000, 1.000000)");
    }
}
