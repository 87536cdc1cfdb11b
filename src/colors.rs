//! Named colors and HSV helpers.
//!
//! HSV is handy for host-side test patterns (rainbow cycles, hue sweeps).
//! Results are quantized to the 8-bit [`Color`] the encoder consumes.

use crate::types::Color;
use palette::{FromColor, Hsv, Srgb};

pub const OFF: Color = Color::new(0, 0, 0);
pub const RED: Color = Color::new(255, 0, 0);
pub const GREEN: Color = Color::new(0, 255, 0);
pub const BLUE: Color = Color::new(0, 0, 255);
pub const YELLOW: Color = Color::new(255, 255, 0);
pub const CYAN: Color = Color::new(0, 255, 255);
pub const MAGENTA: Color = Color::new(255, 0, 255);
pub const WHITE: Color = Color::new(255, 255, 255);

/// Creates a color from HSV (hue in degrees, saturation and value in 0.0-1.0).
#[inline]
pub fn hsv(hue: f32, saturation: f32, value: f32) -> Color {
    let hsv = Hsv::new(hue, saturation, value);
    quantize(Srgb::from_color(hsv))
}

/// Creates a fully saturated, full-value color from a hue.
#[inline]
pub fn hue(hue: f32) -> Color {
    hsv(hue, 1.0, 1.0)
}

/// Converts a floating-point color (0.0-1.0 per channel) to 8 bits per channel.
#[inline]
pub fn quantize(color: Srgb<f32>) -> Color {
    color.into_format()
}
