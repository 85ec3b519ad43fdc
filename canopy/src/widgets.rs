// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render helpers and a handful of widgets built on the arbiter.
//!
//! The widgets here are deliberately small: they exist to drive the ID stack,
//! hover/active arbitration, navigation and popups the way a full widget
//! library would.

use canopy_draw::{Color, Corners};
use canopy_nav::NavDir;
use kurbo::{Point, Rect, Size, Vec2};

use crate::context::Context;
use crate::flags::{ButtonOptions, ButtonPolicy, ItemFlags, SelectableOptions, SelectableRole, WindowFlags};
use crate::id::{Id, display_text};
use crate::style::StyleColor;

impl Context {
    /// Height of a framed widget with one line of text.
    pub fn frame_height(&self) -> f64 {
        self.font_size + self.style.frame_padding.y * 2.0
    }

    /// Resolve a requested item size: zero takes the default, negative is relative to the
    /// right/bottom edge of the content region.
    pub(crate) fn calc_item_size(&self, size: Size, default: Size) -> Size {
        let w = self.cur_window();
        let content_max = w.pos + w.content_region_max().to_vec2();
        let cursor = w.dc.cursor_pos;
        let resolve = |req: f64, default: f64, max: f64, cursor: f64| {
            if req == 0.0 {
                default
            } else if req < 0.0 {
                (max - cursor).max(4.0) + req
            } else {
                req
            }
        };
        Size::new(
            resolve(size.width, default.width, content_max.x, cursor.x),
            resolve(size.height, default.height, content_max.y, cursor.y),
        )
    }

    /// Filled frame with the optional style border.
    pub(crate) fn render_frame(&mut self, bb: Rect, fill: Color, border: bool, rounding: f64) {
        let border_size = self.style.frame_border_size;
        let shadow = self.style.color(StyleColor::BorderShadow);
        let border_col = self.style.color(StyleColor::Border);
        let list = &mut self.cur_window_mut().draw_list;
        let (min, max) = (bb.origin(), Point::new(bb.x1, bb.y1));
        list.add_rect_filled(min, max, fill, rounding);
        if border && border_size > 0.0 {
            let one = Vec2::new(1.0, 1.0);
            list.add_rect(min + one, max + one, shadow, rounding, Corners::all(), border_size);
            list.add_rect(min, max, border_col, rounding, Corners::all(), border_size);
        }
    }

    /// Draw `text` with its top-left at `pos`; with `hide_after_hash` only the part before `"##"`.
    pub(crate) fn render_text(&mut self, pos: Point, text: &str, hide_after_hash: bool) {
        let shown = if hide_after_hash { display_text(text) } else { text };
        if shown.is_empty() {
            return;
        }
        let col = self.style.color(StyleColor::Text);
        let size = self.font_size;
        let h = self.cur();
        let list = &mut self.windows.at_mut(h).draw_list;
        let clip = list.clip_rect();
        self.font.render_text(list, size, pos, col, clip, shown);
    }

    /// Draw the display part of `text` aligned inside `bb`, clipped to `clip` (or `bb`).
    pub(crate) fn render_text_clipped(
        &mut self,
        bb: Rect,
        text: &str,
        text_size: Option<Size>,
        align: Vec2,
        clip: Option<Rect>,
    ) {
        let shown = display_text(text);
        if shown.is_empty() {
            return;
        }
        let text_size = text_size.unwrap_or_else(|| self.calc_text_size(shown));
        let mut pos = bb.origin();
        let (clip_min, clip_max) = match clip {
            Some(c) => (c.origin(), Point::new(c.x1, c.y1)),
            None => (bb.origin(), Point::new(bb.x1, bb.y1)),
        };
        let mut need_clipping = pos.x + text_size.width >= clip_max.x || pos.y + text_size.height >= clip_max.y;
        if clip.is_some() {
            need_clipping |= pos.x < clip_min.x || pos.y < clip_min.y;
        }
        if align.x > 0.0 {
            pos.x = pos.x.max(pos.x + (bb.x1 - pos.x - text_size.width) * align.x);
        }
        if align.y > 0.0 {
            pos.y = pos.y.max(pos.y + (bb.y1 - pos.y - text_size.height) * align.y);
        }

        let col = self.style.color(StyleColor::Text);
        let size = self.font_size;
        let h = self.cur();
        let list = &mut self.windows.at_mut(h).draw_list;
        let fine = if need_clipping {
            Rect::from_points(clip_min, clip_max)
        } else {
            list.clip_rect()
        };
        self.font.render_text(list, size, pos, col, fine, shown);
    }

    /// Filled triangle pointing `dir`, sized to the font.
    pub(crate) fn render_arrow(&mut self, pos: Point, dir: NavDir, scale: f64) {
        let h = self.font_size;
        let mut r = h * 0.40 * scale;
        let mut centre = pos + Vec2::new(h * 0.50, h * 0.50 * scale);
        let (a, b, c) = match dir {
            NavDir::Up | NavDir::Down => {
                if dir == NavDir::Up {
                    r = -r;
                }
                centre.y -= r * 0.25;
                (Vec2::new(0.0, 1.0) * r, Vec2::new(-0.866, -0.5) * r, Vec2::new(0.866, -0.5) * r)
            }
            NavDir::Left | NavDir::Right => {
                if dir == NavDir::Left {
                    r = -r;
                }
                centre.x -= r * 0.25;
                (Vec2::new(1.0, 0.0) * r, Vec2::new(-0.5, 0.866) * r, Vec2::new(-0.5, -0.866) * r)
            }
        };
        let col = self.style.color(StyleColor::Text);
        self.cur_window_mut()
            .draw_list
            .add_triangle_filled(centre + a, centre + b, centre + c, col);
    }

    /// Tick of side `size` with its top-left near `pos`.
    pub(crate) fn render_check_mark(&mut self, pos: Point, col: Color, size: f64) {
        let thickness = (size / 5.0).max(1.0);
        let size = size - thickness * 0.5;
        let pos = pos + Vec2::new(thickness * 0.25, thickness * 0.25);
        let third = size / 3.0;
        let bx = pos.x + third;
        let by = pos.y + size - third * 0.5;
        let list = &mut self.cur_window_mut().draw_list;
        list.path_line_to(Point::new(bx - third, by - third));
        list.path_line_to(Point::new(bx, by));
        list.path_line_to(Point::new(bx + third * 2.0, by - third * 2.0));
        list.path_stroke(col, false, thickness);
    }

    /// One line of text at the cursor.
    pub fn text(&mut self, text: &str) {
        if self.cur_window().skip_items {
            return;
        }
        let pos = {
            let dc = &self.cur_window().dc;
            dc.cursor_pos + Vec2::new(0.0, dc.current_line_text_base_offset)
        };
        let size = self.calc_text_size(text);
        let bb = Rect::from_origin_size(pos, size);
        self.item_size(size, 0.0);
        if !self.item_add(bb, Id::NONE, None) {
            return;
        }
        self.render_text(pos, text, false);
    }

    /// Text in the disabled colour.
    pub fn text_disabled(&mut self, text: &str) {
        let disabled = self.style.colors[StyleColor::TextDisabled.index()];
        let t = self.push_style_color(StyleColor::Text, disabled);
        self.text(text);
        self.pop_style(t);
    }

    /// Push button sized to its label; `true` on the frame it is pressed.
    pub fn button(&mut self, label: &str) -> bool {
        self.button_with(label, Size::ZERO, ButtonOptions::default())
    }

    /// Push button of `size`: zero fits the label, negative is relative to the
    /// right/bottom edge of the content region.
    pub fn button_with(&mut self, label: &str, size: Size, options: ButtonOptions) -> bool {
        if self.cur_window().skip_items {
            return false;
        }
        let id = self.get_id(label);
        let label_size = self.calc_text_size(display_text(label));
        let pad = self.style.frame_padding;
        let pos = self.cur_window().dc.cursor_pos;
        let size = self.calc_item_size(
            size,
            Size::new(label_size.width + pad.x * 2.0, label_size.height + pad.y * 2.0),
        );
        let bb = Rect::from_origin_size(pos, size);
        self.item_size(size, pad.y);
        if !self.item_add(bb, id, None) {
            return false;
        }
        let r = self.button_behavior(bb, id, options);

        let slot = if r.hovered && r.held {
            StyleColor::ButtonActive
        } else if r.hovered {
            StyleColor::ButtonHovered
        } else {
            StyleColor::Button
        };
        let col = self.style.color(slot);
        let rounding = self.style.frame_rounding;
        let align = self.style.button_text_align;
        self.render_nav_highlight(bb, id, false);
        self.render_frame(bb, col, true, rounding);
        let inner = Rect::new(bb.x0 + pad.x, bb.y0 + pad.y, bb.x1 - pad.x, bb.y1 - pad.y);
        self.render_text_clipped(inner, label, Some(label_size), align, Some(bb));
        r.pressed
    }

    /// Clickable area with no visuals.
    ///
    /// # Panics
    ///
    /// When either dimension of `size` is zero.
    pub fn invisible_button(&mut self, str_id: &str, size: Size) -> bool {
        assert!(
            size.width != 0.0 && size.height != 0.0,
            "invisible_button needs a non-zero size"
        );
        if self.cur_window().skip_items {
            return false;
        }
        let id = self.get_id(str_id);
        let size = self.calc_item_size(size, Size::ZERO);
        let bb = Rect::from_origin_size(self.cur_window().dc.cursor_pos, size);
        self.item_size(size, 0.0);
        if !self.item_add(bb, id, None) {
            return false;
        }
        self.button_behavior(bb, id, ButtonOptions::default()).pressed
    }

    /// Box with a tick; flips `value` when pressed and returns `true` then.
    pub fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        if self.cur_window().skip_items {
            return false;
        }
        let id = self.get_id(label);
        let label_size = self.calc_text_size(display_text(label));
        let square = self.frame_height();
        let (pad, inner) = (self.style.frame_padding, self.style.item_inner_spacing);
        let pos = self.cur_window().dc.cursor_pos;
        let label_w = if label_size.width > 0.0 {
            inner.x + label_size.width
        } else {
            0.0
        };
        let total = Size::new(square + label_w, label_size.height + pad.y * 2.0);
        let total_bb = Rect::from_origin_size(pos, total);
        self.item_size(total, pad.y);
        if !self.item_add(total_bb, id, None) {
            return false;
        }
        let r = self.button_behavior(total_bb, id, ButtonOptions::default());
        if r.pressed {
            *value = !*value;
        }

        let check_bb = Rect::from_origin_size(pos, Size::new(square, square));
        let slot = if r.held && r.hovered {
            StyleColor::FrameBgActive
        } else if r.hovered {
            StyleColor::FrameBgHovered
        } else {
            StyleColor::FrameBg
        };
        let col = self.style.color(slot);
        let rounding = self.style.frame_rounding;
        self.render_nav_highlight(total_bb, id, false);
        self.render_frame(check_bb, col, true, rounding);
        if *value {
            let p = (square / 6.0).floor().max(1.0);
            let mark = self.style.color(StyleColor::CheckMark);
            self.render_check_mark(check_bb.origin() + Vec2::new(p, p), mark, square - p * 2.0);
        }
        if label_size.width > 0.0 {
            self.render_text(Point::new(check_bb.x1 + inner.x, check_bb.y0 + pad.y), label, true);
        }
        r.pressed
    }

    /// Highlightable row; `true` when clicked. Inside a popup a click closes it
    /// unless `options.dont_close_popups` is set.
    pub fn selectable(&mut self, label: &str, selected: bool, options: SelectableOptions) -> bool {
        self.selectable_ex(label, selected, options, SelectableRole::Plain, false)
    }

    pub(crate) fn selectable_ex(
        &mut self,
        label: &str,
        selected: bool,
        options: SelectableOptions,
        role: SelectableRole,
        fill_avail_width: bool,
    ) -> bool {
        if self.cur_window().skip_items {
            return false;
        }
        let id = self.get_id(label);
        let label_size = self.calc_text_size(display_text(label));
        let size_arg = options.size;
        let size = Size::new(
            if size_arg.width != 0.0 { size_arg.width } else { label_size.width },
            if size_arg.height != 0.0 { size_arg.height } else { label_size.height },
        );
        let (pos, window_padding, max_x, win_x, cursor_x) = {
            let w = self.cur_window();
            let pos = w.dc.cursor_pos + Vec2::new(0.0, w.dc.current_line_text_base_offset);
            (pos, w.window_padding, w.content_region_max().x, w.pos.x, w.dc.cursor_pos.x)
        };
        let bb = Rect::from_origin_size(pos, size);
        self.item_size(size, 0.0);

        // Fill the available width and cover the spacing between neighbours.
        let w_draw = label_size.width.max(win_x + max_x - window_padding.x - cursor_x);
        let draw_w = if size_arg.width != 0.0 && !fill_avail_width {
            size_arg.width
        } else {
            w_draw
        };
        let draw_h = if size_arg.height != 0.0 { size_arg.height } else { size.height };
        let mut bb_spacing = Rect::from_origin_size(pos, Size::new(draw_w, draw_h));
        if size_arg.width == 0.0 || fill_avail_width {
            bb_spacing.x1 += window_padding.x;
        }
        let spacing = self.style.item_spacing;
        let (left, up) = ((spacing.x * 0.5).floor(), (spacing.y * 0.5).floor());
        bb_spacing.x0 -= left;
        bb_spacing.y0 -= up;
        bb_spacing.x1 += spacing.x - left;
        bb_spacing.y1 += spacing.y - up;
        if !self.item_add(bb_spacing, id, None) {
            return false;
        }

        let mut button = match role {
            SelectableRole::Plain => ButtonOptions::default(),
            SelectableRole::Menu => ButtonOptions::with_policy(ButtonPolicy::Click),
            SelectableRole::MenuItem => ButtonOptions::with_policy(ButtonPolicy::Release),
        };
        button.disabled = options.disabled;
        button.also_double_click = options.allow_double_click;
        let r = self.button_behavior(bb_spacing, id, button);
        let selected = selected && !options.disabled;

        // Mouse hover moves the nav cursor so keyboard navigation resumes from here.
        let h = self.cur();
        if (r.pressed || r.hovered)
            && !self.nav.disable_mouse_hover
            && self.nav.window == Some(h)
            && self.nav.layer == self.windows.at(h).dc.nav_layer_current
        {
            self.nav.disable_highlight = true;
            let layer = self.windows.at(h).dc.nav_layer_current;
            self.set_nav_id(id, layer);
        }

        if r.hovered || selected {
            let slot = if r.held && r.hovered {
                StyleColor::HeaderActive
            } else if r.hovered {
                StyleColor::HeaderHovered
            } else {
                StyleColor::Header
            };
            let col = self.style.color(slot);
            self.render_frame(bb_spacing, col, false, 0.0);
            self.render_nav_highlight(bb_spacing, id, true);
        }

        let dimmed = options
            .disabled
            .then(|| self.style.colors[StyleColor::TextDisabled.index()]);
        let t = dimmed.map(|c| self.push_style_color(StyleColor::Text, c));
        let text_bb = Rect::new(bb.x0, bb.y0, bb_spacing.x1, bb_spacing.y1);
        self.render_text_clipped(text_bb, label, Some(label_size), Vec2::ZERO, None);
        if let Some(t) = t {
            self.pop_style(t);
        }

        let w = self.windows.at(h);
        let keeps_popup = options.dont_close_popups
            || role == SelectableRole::Menu
            || w.dc.item_flags.contains(ItemFlags::SELECTABLE_DONT_CLOSE_POPUP);
        if r.pressed && w.flags.contains(WindowFlags::POPUP) && !keeps_popup {
            self.close_current_popup();
        }
        r.pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Cond;
    use canopy_input::MouseButton;

    fn frame(ctx: &mut Context, mouse: Point, down: bool) {
        let io = ctx.input_mut();
        io.display_size = Size::new(800.0, 600.0);
        io.delta_time = 1.0 / 60.0;
        io.mouse_pos = mouse;
        io.set_mouse_down(MouseButton::Left, down);
        ctx.new_frame().unwrap();
    }

    fn window(ctx: &mut Context, f: impl FnOnce(&mut Context)) {
        ctx.set_next_window_pos(Point::new(0.0, 0.0), Cond::Always);
        ctx.set_next_window_size(Size::new(300.0, 200.0), Cond::Always);
        let w = ctx.begin("W", WindowFlags::NO_TITLE_BAR);
        f(ctx);
        ctx.end(w);
        ctx.end_frame();
    }

    #[test]
    fn item_size_rules() {
        let mut ctx = Context::new();
        frame(&mut ctx, Point::new(-1.0, -1.0), false);
        window(&mut ctx, |ctx| {
            let d = Size::new(50.0, 20.0);
            assert_eq!(ctx.calc_item_size(Size::ZERO, d), d);
            assert_eq!(ctx.calc_item_size(Size::new(10.0, 12.0), d), Size::new(10.0, 12.0));
            // Window padding is 8 on every side; the cursor starts at the padding.
            let stretched = ctx.calc_item_size(Size::new(-1.0, 0.0), d);
            assert_eq!(stretched.width, 300.0 - 16.0 - 1.0);
        });
    }

    #[test]
    fn button_advances_the_cursor_by_its_frame() {
        let mut ctx = Context::new();
        frame(&mut ctx, Point::new(-1.0, -1.0), false);
        window(&mut ctx, |ctx| {
            ctx.button("OK");
            let r = ctx.last_item_rect();
            assert_eq!(r.origin(), Point::new(8.0, 8.0));
            assert_eq!(r.size(), Size::new(14.0 + 8.0, 13.0 + 6.0));
            assert_eq!(ctx.cursor_screen_pos().y, r.y1 + 4.0);
        });
    }

    #[test]
    fn checkbox_toggles_on_click() {
        let mut ctx = Context::new();
        let mut on = false;
        frame(&mut ctx, Point::new(-1.0, -1.0), false);
        window(&mut ctx, |ctx| {
            ctx.checkbox("Enabled", &mut on);
        });
        let target = Point::new(12.0, 12.0);
        frame(&mut ctx, target, true);
        window(&mut ctx, |ctx| {
            assert!(!ctx.checkbox("Enabled", &mut on));
        });
        frame(&mut ctx, target, false);
        window(&mut ctx, |ctx| {
            assert!(ctx.checkbox("Enabled", &mut on));
        });
        assert!(on);
    }

    #[test]
    fn hidden_label_parts_do_not_change_the_size() {
        let mut ctx = Context::new();
        frame(&mut ctx, Point::new(-1.0, -1.0), false);
        window(&mut ctx, |ctx| {
            ctx.button("Go##first");
            let a = ctx.last_item_rect().size();
            ctx.button("Go##second");
            let b = ctx.last_item_rect().size();
            assert_eq!(a, b);
        });
    }

    #[test]
    fn selectable_closes_its_popup() {
        fn popup_frame(ctx: &mut Context) -> Rect {
            let mut row = Rect::ZERO;
            window(ctx, |ctx| {
                if let Some(p) = ctx.begin_popup("menu", WindowFlags::empty()) {
                    ctx.selectable("Pick", false, SelectableOptions::default());
                    row = ctx.last_item_rect();
                    ctx.end_popup(p);
                }
            });
            row
        }

        let mut ctx = Context::new();
        let away = Point::new(500.0, 300.0);
        frame(&mut ctx, away, false);
        window(&mut ctx, |ctx| ctx.open_popup("menu"));
        assert_eq!(ctx.open_popup_count(), 1);

        // The popup appears hidden for one frame while it measures itself.
        let mut row = Rect::ZERO;
        for _ in 0..3 {
            frame(&mut ctx, away, false);
            row = popup_frame(&mut ctx);
        }
        assert_eq!(ctx.open_popup_count(), 1);

        for down in [true, false] {
            frame(&mut ctx, row.center(), down);
            popup_frame(&mut ctx);
        }
        assert_eq!(ctx.open_popup_count(), 0);
    }
}
