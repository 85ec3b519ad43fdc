// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement seam.

use canopy_draw::{Color, DrawList, TextureId};
use kurbo::{Point, Rect, Size};

/// Measures (and optionally draws) text for the context.
///
/// Glyph rasterisation lives outside this crate. An implementation only has to
/// measure; drawing defaults to emitting nothing.
pub trait FontProvider: core::fmt::Debug {
    /// Nominal size at scale 1.
    fn font_size(&self) -> f64;

    /// Bounding size of `text` laid out at `size`.
    fn calc_text_size(&self, text: &str, size: f64) -> Size;

    /// Atlas texture the glyphs live in.
    fn texture_id(&self) -> TextureId {
        TextureId::default()
    }

    /// Emit glyph quads for `text` with its top-left at `pos`.
    fn render_text(&self, list: &mut DrawList, size: f64, pos: Point, color: Color, clip: Rect, text: &str) {
        let _ = (list, size, pos, color, clip, text);
    }
}

/// Monospaced measuring font with no glyphs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedFont {
    /// Line height at scale 1.
    pub font_size: f64,
    /// Horizontal advance of every character at scale 1.
    pub glyph_advance: f64,
}

impl Default for FixedFont {
    fn default() -> Self {
        Self {
            font_size: 13.0,
            glyph_advance: 7.0,
        }
    }
}

impl FontProvider for FixedFont {
    fn font_size(&self) -> f64 {
        self.font_size
    }

    #[allow(clippy::cast_precision_loss, reason = "line and character counts are small")]
    fn calc_text_size(&self, text: &str, size: f64) -> Size {
        let scale = size / self.font_size;
        let mut lines = 0_usize;
        let mut widest = 0_usize;
        for line in text.split('\n') {
            lines += 1;
            widest = widest.max(line.chars().count());
        }
        Size::new(widest as f64 * self.glyph_advance * scale, lines as f64 * size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_font_measures_lines() {
        let f = FixedFont::default();
        assert_eq!(f.calc_text_size("", 13.0), Size::new(0.0, 13.0));
        assert_eq!(f.calc_text_size("OK", 13.0), Size::new(14.0, 13.0));
        assert_eq!(f.calc_text_size("a\nabc", 26.0), Size::new(42.0, 52.0));
    }
}
