// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 8-bit RGBA colours.

/// An sRGB colour with straight (non-premultiplied) alpha.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha; zero means the colour emits no geometry.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba8(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba8(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba8(0, 0, 0, 255);

    /// Build a colour from 8-bit channels.
    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a colour from channels in `0.0..=1.0`; out of range values are clamped.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self::rgba8(channel(r), channel(g), channel(b), channel(a))
    }

    /// True when drawing with this colour would be invisible.
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Pack into the vertex format: red in the lowest byte, alpha in the highest.
    pub const fn to_packed(self) -> u32 {
        (self.a as u32) << 24 | (self.b as u32) << 16 | (self.g as u32) << 8 | self.r as u32
    }

    /// Scale alpha by `factor` (clamped to `0.0..=1.0`).
    pub fn multiply_alpha(self, factor: f64) -> Self {
        Self {
            a: channel(f64::from(self.a) / 255.0 * factor),
            ..self
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "value is clamped and rounded into u8 range first"
)]
fn channel(v: f64) -> u8 {
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    (v * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_red_in_low_byte() {
        assert_eq!(Color::rgba8(0x11, 0x22, 0x33, 0x44).to_packed(), 0x4433_2211);
    }

    #[test]
    fn alpha_scaling_clamps() {
        assert_eq!(Color::WHITE.multiply_alpha(0.0).a, 0);
        assert_eq!(Color::WHITE.multiply_alpha(2.0).a, 255);
        assert_eq!(Color::WHITE.multiply_alpha(0.5).a, 128);
        assert!(Color::rgba(1.0, 0.0, 0.0, 0.0).is_transparent());
    }
}
