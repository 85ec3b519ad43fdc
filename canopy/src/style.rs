// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sizes, spacing and the colour table.

use canopy_draw::Color;
use kurbo::{Size, Vec2};

/// Slots of the colour table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs, reason = "names are self-describing")]
pub enum StyleColor {
    Text,
    TextDisabled,
    WindowBg,
    ChildBg,
    PopupBg,
    Border,
    BorderShadow,
    FrameBg,
    FrameBgHovered,
    FrameBgActive,
    TitleBg,
    TitleBgActive,
    TitleBgCollapsed,
    MenuBarBg,
    CheckMark,
    Button,
    ButtonHovered,
    ButtonActive,
    Header,
    HeaderHovered,
    HeaderActive,
    Separator,
    NavHighlight,
    ModalWindowDarkening,
}

impl StyleColor {
    /// Number of slots.
    pub const COUNT: usize = 24;

    /// Position in [`Style::colors`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Global look and spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    /// Global alpha applied to every colour.
    pub alpha: f64,
    /// Padding inside windows.
    pub window_padding: Vec2,
    /// Corner radius of top-level windows.
    pub window_rounding: f64,
    /// Border thickness of top-level windows.
    pub window_border_size: f64,
    /// Smallest size a window can be given.
    pub window_min_size: Size,
    /// Title text alignment, `0.0` left to `1.0` right.
    pub window_title_align: Vec2,
    /// Corner radius of child windows.
    pub child_rounding: f64,
    /// Border thickness of child windows.
    pub child_border_size: f64,
    /// Corner radius of popups.
    pub popup_rounding: f64,
    /// Border thickness of popups.
    pub popup_border_size: f64,
    /// Padding inside framed widgets.
    pub frame_padding: Vec2,
    /// Corner radius of framed widgets.
    pub frame_rounding: f64,
    /// Border thickness of framed widgets.
    pub frame_border_size: f64,
    /// Gap between consecutive items.
    pub item_spacing: Vec2,
    /// Gap between the parts of one widget.
    pub item_inner_spacing: Vec2,
    /// Extra hit area around items for touch input.
    pub touch_extra_padding: Vec2,
    /// Width of one indentation step.
    pub indent_spacing: f64,
    /// Label alignment inside buttons.
    pub button_text_align: Vec2,
    /// Windows are kept this far inside the display when clamped.
    pub display_window_padding: Vec2,
    /// Popups keep this far from the display edges.
    pub display_safe_area_padding: Vec2,
    /// Tessellation tolerance for curves.
    pub curve_tessellation_tol: f64,
    /// Colour table indexed by [`StyleColor`].
    pub colors: [Color; StyleColor::COUNT],
}

impl Default for Style {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            window_padding: Vec2::new(8.0, 8.0),
            window_rounding: 7.0,
            window_border_size: 1.0,
            window_min_size: Size::new(32.0, 32.0),
            window_title_align: Vec2::new(0.0, 0.5),
            child_rounding: 0.0,
            child_border_size: 1.0,
            popup_rounding: 0.0,
            popup_border_size: 1.0,
            frame_padding: Vec2::new(4.0, 3.0),
            frame_rounding: 0.0,
            frame_border_size: 0.0,
            item_spacing: Vec2::new(8.0, 4.0),
            item_inner_spacing: Vec2::new(4.0, 4.0),
            touch_extra_padding: Vec2::ZERO,
            indent_spacing: 21.0,
            button_text_align: Vec2::new(0.5, 0.5),
            display_window_padding: Vec2::new(20.0, 20.0),
            display_safe_area_padding: Vec2::new(3.0, 3.0),
            curve_tessellation_tol: 1.25,
            colors: dark_colors(),
        }
    }
}

fn dark_colors() -> [Color; StyleColor::COUNT] {
    use StyleColor as C;
    let mut c = [Color::TRANSPARENT; StyleColor::COUNT];
    c[C::Text.index()] = Color::rgba(1.00, 1.00, 1.00, 1.00);
    c[C::TextDisabled.index()] = Color::rgba(0.50, 0.50, 0.50, 1.00);
    c[C::WindowBg.index()] = Color::rgba(0.06, 0.06, 0.06, 0.94);
    c[C::ChildBg.index()] = Color::rgba(1.00, 1.00, 1.00, 0.00);
    c[C::PopupBg.index()] = Color::rgba(0.08, 0.08, 0.08, 0.94);
    c[C::Border.index()] = Color::rgba(0.43, 0.43, 0.50, 0.50);
    c[C::BorderShadow.index()] = Color::rgba(0.00, 0.00, 0.00, 0.00);
    c[C::FrameBg.index()] = Color::rgba(0.16, 0.29, 0.48, 0.54);
    c[C::FrameBgHovered.index()] = Color::rgba(0.26, 0.59, 0.98, 0.40);
    c[C::FrameBgActive.index()] = Color::rgba(0.26, 0.59, 0.98, 0.67);
    c[C::TitleBg.index()] = Color::rgba(0.04, 0.04, 0.04, 1.00);
    c[C::TitleBgActive.index()] = Color::rgba(0.16, 0.29, 0.48, 1.00);
    c[C::TitleBgCollapsed.index()] = Color::rgba(0.00, 0.00, 0.00, 0.51);
    c[C::MenuBarBg.index()] = Color::rgba(0.14, 0.14, 0.14, 1.00);
    c[C::CheckMark.index()] = Color::rgba(0.26, 0.59, 0.98, 1.00);
    c[C::Button.index()] = Color::rgba(0.26, 0.59, 0.98, 0.40);
    c[C::ButtonHovered.index()] = Color::rgba(0.26, 0.59, 0.98, 1.00);
    c[C::ButtonActive.index()] = Color::rgba(0.06, 0.53, 0.98, 1.00);
    c[C::Header.index()] = Color::rgba(0.26, 0.59, 0.98, 0.31);
    c[C::HeaderHovered.index()] = Color::rgba(0.26, 0.59, 0.98, 0.80);
    c[C::HeaderActive.index()] = Color::rgba(0.26, 0.59, 0.98, 1.00);
    c[C::Separator.index()] = Color::rgba(0.43, 0.43, 0.50, 0.50);
    c[C::NavHighlight.index()] = Color::rgba(0.26, 0.59, 0.98, 1.00);
    c[C::ModalWindowDarkening.index()] = Color::rgba(0.80, 0.80, 0.80, 0.35);
    c
}

impl Style {
    /// Colour of `slot` with the global alpha applied.
    pub fn color(&self, slot: StyleColor) -> Color {
        self.colors[slot.index()].multiply_alpha(self.alpha)
    }

    /// Replace one variable, returning the value it replaced.
    pub fn apply(&mut self, var: StyleVar) -> StyleVar {
        match var {
            StyleVar::Alpha(v) => StyleVar::Alpha(core::mem::replace(&mut self.alpha, v)),
            StyleVar::WindowPadding(v) => StyleVar::WindowPadding(core::mem::replace(&mut self.window_padding, v)),
            StyleVar::WindowRounding(v) => StyleVar::WindowRounding(core::mem::replace(&mut self.window_rounding, v)),
            StyleVar::WindowBorderSize(v) => {
                StyleVar::WindowBorderSize(core::mem::replace(&mut self.window_border_size, v))
            }
            StyleVar::WindowMinSize(v) => StyleVar::WindowMinSize(core::mem::replace(&mut self.window_min_size, v)),
            StyleVar::ChildRounding(v) => StyleVar::ChildRounding(core::mem::replace(&mut self.child_rounding, v)),
            StyleVar::ChildBorderSize(v) => StyleVar::ChildBorderSize(core::mem::replace(&mut self.child_border_size, v)),
            StyleVar::PopupRounding(v) => StyleVar::PopupRounding(core::mem::replace(&mut self.popup_rounding, v)),
            StyleVar::PopupBorderSize(v) => StyleVar::PopupBorderSize(core::mem::replace(&mut self.popup_border_size, v)),
            StyleVar::FramePadding(v) => StyleVar::FramePadding(core::mem::replace(&mut self.frame_padding, v)),
            StyleVar::FrameRounding(v) => StyleVar::FrameRounding(core::mem::replace(&mut self.frame_rounding, v)),
            StyleVar::FrameBorderSize(v) => StyleVar::FrameBorderSize(core::mem::replace(&mut self.frame_border_size, v)),
            StyleVar::ItemSpacing(v) => StyleVar::ItemSpacing(core::mem::replace(&mut self.item_spacing, v)),
            StyleVar::ItemInnerSpacing(v) => StyleVar::ItemInnerSpacing(core::mem::replace(&mut self.item_inner_spacing, v)),
            StyleVar::IndentSpacing(v) => StyleVar::IndentSpacing(core::mem::replace(&mut self.indent_spacing, v)),
            StyleVar::ButtonTextAlign(v) => StyleVar::ButtonTextAlign(core::mem::replace(&mut self.button_text_align, v)),
        }
    }
}

/// A style variable together with its new value.
#[derive(Copy, Clone, Debug, PartialEq)]
#[allow(missing_docs, reason = "each variant mirrors the Style field of the same name")]
pub enum StyleVar {
    Alpha(f64),
    WindowPadding(Vec2),
    WindowRounding(f64),
    WindowBorderSize(f64),
    WindowMinSize(Size),
    ChildRounding(f64),
    ChildBorderSize(f64),
    PopupRounding(f64),
    PopupBorderSize(f64),
    FramePadding(Vec2),
    FrameRounding(f64),
    FrameBorderSize(f64),
    ItemSpacing(Vec2),
    ItemInnerSpacing(Vec2),
    IndentSpacing(f64),
    ButtonTextAlign(Vec2),
}

/// A saved value restored when the matching [`StyleToken`] is popped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum StyleBackup {
    Color(StyleColor, Color),
    Var(StyleVar),
}

/// Scope of a [`Context::push_style_color`](crate::Context::push_style_color) or
/// [`Context::push_style_var`](crate::Context::push_style_var).
#[must_use = "hand the token back to Context::pop_style"]
#[derive(Debug, PartialEq, Eq)]
pub struct StyleToken {
    pub(crate) depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_returns_previous_value() {
        let mut style = Style::default();
        let old = style.apply(StyleVar::ItemSpacing(Vec2::new(2.0, 2.0)));
        assert_eq!(old, StyleVar::ItemSpacing(Vec2::new(8.0, 4.0)));
        assert_eq!(style.item_spacing, Vec2::new(2.0, 2.0));
        style.apply(old);
        assert_eq!(style, Style::default());
    }

    #[test]
    fn color_applies_global_alpha() {
        let style = Style {
            alpha: 0.5,
            ..Style::default()
        };
        let text = style.color(StyleColor::Text);
        assert_eq!(text.a, 128);
        assert_eq!(StyleColor::ModalWindowDarkening.index() + 1, StyleColor::COUNT);
    }
}
