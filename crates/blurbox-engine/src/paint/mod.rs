//! Color model shared between the clear pass and the fragment stage.
//!
//! Colors are kept in linear space; the surface is configured with an sRGB
//! format when available, so both the clear value and shader output are encoded
//! on write.

mod color;
mod palette;

pub use color::Color;
pub use palette::Palette;
