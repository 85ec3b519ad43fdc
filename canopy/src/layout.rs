// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout cursor: item sizing, lines, indentation and groups.

use kurbo::{Point, Rect, Size, Vec2};

use crate::context::Context;
use crate::id::Id;
use crate::registry::WindowHandle;
use crate::style::StyleColor;
use crate::window::{GroupData, LayoutType};

/// Scope of a [`Context::begin_group`].
#[must_use = "hand the token back to Context::end_group"]
#[derive(Debug, PartialEq, Eq)]
pub struct GroupToken {
    window: WindowHandle,
    depth: usize,
}

impl Context {
    /// Advance the cursor past an item of `size`; `text_offset_y` aligns text baselines on the line.
    pub fn item_size(&mut self, size: Size, text_offset_y: f64) {
        let spacing = self.style.item_spacing;
        let w = self.cur_window_mut();
        if w.skip_items {
            return;
        }
        let pos = w.pos;
        let dc = &mut w.dc;
        let line_height = dc.current_line_height.max(size.height);
        let text_base_offset = dc.current_line_text_base_offset.max(text_offset_y);
        dc.cursor_pos_prev_line = Point::new(dc.cursor_pos.x + size.width, dc.cursor_pos.y);
        dc.cursor_pos = Point::new(
            (pos.x + dc.indent_x).floor(),
            (dc.cursor_pos.y + line_height + spacing.y).floor(),
        );
        dc.cursor_max_pos.x = dc.cursor_max_pos.x.max(dc.cursor_pos_prev_line.x);
        dc.cursor_max_pos.y = dc.cursor_max_pos.y.max(dc.cursor_pos.y - spacing.y);
        dc.prev_line_height = line_height;
        dc.prev_line_text_base_offset = text_base_offset;
        dc.current_line_height = 0.0;
        dc.current_line_text_base_offset = 0.0;
        if dc.layout_type == LayoutType::Horizontal {
            self.same_line();
        }
    }

    /// Put the next item on the same line as the previous one, after the default spacing.
    pub fn same_line(&mut self) {
        self.same_line_with(0.0, -1.0);
    }

    /// Put the next item on the same line.
    ///
    /// A non-zero `pos_x` places it at that window-local x; `spacing` below zero means
    /// the style's item spacing (or none when `pos_x` is given).
    pub fn same_line_with(&mut self, pos_x: f64, spacing: f64) {
        let item_spacing_x = self.style.item_spacing.x;
        let w = self.cur_window_mut();
        if w.skip_items {
            return;
        }
        let (pos, scroll) = (w.pos, w.scroll);
        let dc = &mut w.dc;
        if pos_x != 0.0 {
            let spacing = spacing.max(0.0);
            dc.cursor_pos.x = pos.x - scroll.x + pos_x + spacing + dc.group_offset_x;
        } else {
            let spacing = if spacing < 0.0 { item_spacing_x } else { spacing };
            dc.cursor_pos.x = dc.cursor_pos_prev_line.x + spacing;
        }
        dc.cursor_pos.y = dc.cursor_pos_prev_line.y;
        dc.current_line_height = dc.prev_line_height;
        dc.current_line_text_base_offset = dc.prev_line_text_base_offset;
    }

    /// End the current line; an empty line is one font size tall.
    pub fn new_line(&mut self) {
        let font_size = self.font_size;
        let w = self.cur_window_mut();
        if w.skip_items {
            return;
        }
        let backup = core::mem::replace(&mut w.dc.layout_type, LayoutType::Vertical);
        let height = if w.dc.current_line_height > 0.0 { 0.0 } else { font_size };
        self.item_size(Size::new(0.0, height), 0.0);
        self.cur_window_mut().dc.layout_type = backup;
    }

    /// Add vertical spacing.
    pub fn spacing(&mut self) {
        if self.cur_window().skip_items {
            return;
        }
        self.item_size(Size::ZERO, 0.0);
    }

    /// Reserve `size` without drawing anything.
    pub fn dummy(&mut self, size: Size) {
        if self.cur_window().skip_items {
            return;
        }
        let bb = Rect::from_origin_size(self.cur_window().dc.cursor_pos, size);
        self.item_size(size, 0.0);
        self.item_add(bb, Id::NONE, None);
    }

    /// Move following items right by `width`, or the style's indent spacing when zero.
    pub fn indent(&mut self, width: f64) {
        let step = if width != 0.0 { width } else { self.style.indent_spacing };
        let w = self.cur_window_mut();
        w.dc.indent_x += step;
        w.dc.cursor_pos.x = w.pos.x + w.dc.indent_x;
    }

    /// Undo an [`indent`](Self::indent) of the same width.
    pub fn unindent(&mut self, width: f64) {
        let step = if width != 0.0 { width } else { self.style.indent_spacing };
        let w = self.cur_window_mut();
        w.dc.indent_x -= step;
        w.dc.cursor_pos.x = w.pos.x + w.dc.indent_x;
    }

    /// A line across the window, or a vertical bar inside horizontal layouts such as menu bars.
    pub fn separator(&mut self) {
        let col = self.style.color(StyleColor::Separator);
        let w = self.cur_window();
        if w.skip_items {
            return;
        }
        let cursor = w.dc.cursor_pos;
        if w.dc.layout_type == LayoutType::Horizontal {
            let bb = Rect::new(cursor.x, cursor.y, cursor.x + 1.0, cursor.y + w.dc.current_line_height);
            self.item_size(Size::new(bb.width(), 0.0), 0.0);
            if !self.item_add(bb, Id::NONE, None) {
                return;
            }
            self.cur_window_mut()
                .draw_list
                .add_line(bb.origin(), Point::new(bb.x0, bb.y1), col, 1.0);
            return;
        }
        let mut x0 = w.pos.x;
        let x1 = w.pos.x + w.size.width;
        if !w.dc.group_stack.is_empty() {
            x0 += w.dc.indent_x;
        }
        let bb = Rect::new(x0, cursor.y, x1, cursor.y + 1.0);
        // Width stays out of the item size so that separators do not widen auto-fit windows.
        self.item_size(Size::ZERO, 0.0);
        if !self.item_add(bb, Id::NONE, None) {
            return;
        }
        self.cur_window_mut()
            .draw_list
            .add_line(bb.origin(), Point::new(bb.x1, bb.y0), col, 1.0);
    }

    /// Give the current line the height of a framed widget so plain text lines up with it.
    pub fn align_text_to_frame_padding(&mut self) {
        let height = self.font_size + self.style.frame_padding.y * 2.0;
        let offset = self.style.frame_padding.y;
        let w = self.cur_window_mut();
        if w.skip_items {
            return;
        }
        w.dc.current_line_height = w.dc.current_line_height.max(height);
        w.dc.current_line_text_base_offset = w.dc.current_line_text_base_offset.max(offset);
    }

    /// Lay out the following items as one item.
    pub fn begin_group(&mut self) -> GroupToken {
        let active_alive = self.active_id_is_alive;
        let window = self.cur();
        let w = self.windows.at_mut(window);
        let dc = &mut w.dc;
        dc.group_stack.push(GroupData {
            backup_cursor_pos: dc.cursor_pos,
            backup_cursor_max_pos: dc.cursor_max_pos,
            backup_indent_x: dc.indent_x,
            backup_group_offset_x: dc.group_offset_x,
            backup_current_line_height: dc.current_line_height,
            backup_current_line_text_base_offset: dc.current_line_text_base_offset,
            backup_active_id_is_alive: active_alive,
            advance_cursor: true,
        });
        dc.group_offset_x = dc.cursor_pos.x - w.pos.x;
        dc.indent_x = dc.group_offset_x;
        dc.cursor_max_pos = dc.cursor_pos;
        dc.current_line_height = 0.0;
        GroupToken {
            window,
            depth: dc.group_stack.len(),
        }
    }

    /// Close the group; its bounds become the last item.
    pub fn end_group(&mut self, token: GroupToken) {
        assert_eq!(self.current_window, Some(token.window), "end_group called in another window");
        let w = self.windows.at_mut(token.window);
        assert_eq!(
            w.dc.group_stack.len(),
            token.depth,
            "end_group does not match the innermost begin_group"
        );
        let Some(group) = w.dc.group_stack.pop() else {
            panic!("end_group without begin_group");
        };
        let dc = &mut w.dc;
        let min = group.backup_cursor_pos;
        let max = Point::new(dc.cursor_max_pos.x.max(min.x), dc.cursor_max_pos.y.max(min.y));
        let group_bb = Rect::from_points(min, max);

        dc.cursor_pos = group.backup_cursor_pos;
        dc.cursor_max_pos = Point::new(
            group.backup_cursor_max_pos.x.max(dc.cursor_max_pos.x),
            group.backup_cursor_max_pos.y.max(dc.cursor_max_pos.y),
        );
        dc.current_line_height = group.backup_current_line_height;
        dc.current_line_text_base_offset = group.backup_current_line_text_base_offset;
        dc.indent_x = group.backup_indent_x;
        dc.group_offset_x = group.backup_group_offset_x;
        if group.advance_cursor {
            dc.current_line_text_base_offset = dc
                .prev_line_text_base_offset
                .max(group.backup_current_line_text_base_offset);
            self.item_size(group_bb.size(), group.backup_current_line_text_base_offset);
            self.item_add(group_bb, Id::NONE, None);
        }

        // An item activated inside the group makes the whole group report active.
        let root = self.windows.at(token.window).root;
        let active_within = !group.backup_active_id_is_alive
            && self.active_id_is_alive
            && self.active_id.is_some()
            && self
                .active_id_window
                .and_then(|h| self.windows.get(h))
                .is_some_and(|aw| aw.root == root);
        let active_id = self.active_id;
        let dc = &mut self.windows.at_mut(token.window).dc;
        if active_within {
            dc.last_item_id = active_id;
        }
        dc.last_item_rect = group_bb;
    }

    /// Window-local bottom-right corner of the content region.
    pub fn content_region_max(&self) -> Point {
        self.cur_window().content_region_max()
    }

    /// Space left between the cursor and the bottom-right of the content region.
    pub fn content_region_avail(&self) -> Vec2 {
        let w = self.cur_window();
        let max = w.content_region_max();
        max - (w.dc.cursor_pos - w.pos.to_vec2())
    }

    /// Cursor position in screen space.
    pub fn cursor_screen_pos(&self) -> Point {
        self.cur_window().dc.cursor_pos
    }

    /// Move the cursor to screen position `pos`.
    pub fn set_cursor_screen_pos(&mut self, pos: Point) {
        let dc = &mut self.cur_window_mut().dc;
        dc.cursor_pos = pos;
        dc.cursor_max_pos = Point::new(dc.cursor_max_pos.x.max(pos.x), dc.cursor_max_pos.y.max(pos.y));
    }

    /// Cursor position relative to the window, including scrolling.
    pub fn cursor_pos(&self) -> Point {
        let w = self.cur_window();
        w.dc.cursor_pos - w.pos.to_vec2() + w.scroll
    }

    /// Move the cursor to window-local `pos`.
    pub fn set_cursor_pos(&mut self, pos: Point) {
        let w = self.cur_window();
        let screen = w.pos - w.scroll + pos.to_vec2();
        self.set_cursor_screen_pos(screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{Cond, WindowFlags};

    fn frame(ctx: &mut Context) {
        ctx.input_mut().display_size = Size::new(800.0, 600.0);
        ctx.new_frame().unwrap();
    }

    fn fixed_window(ctx: &mut Context) -> crate::WindowToken {
        ctx.set_next_window_pos(Point::new(0.0, 0.0), Cond::Always);
        ctx.set_next_window_size(Size::new(300.0, 300.0), Cond::Always);
        ctx.begin("Layout", WindowFlags::NO_TITLE_BAR)
    }

    #[test]
    fn items_stack_and_same_line_continues_the_row() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let w = fixed_window(&mut ctx);
        let pad = ctx.style().window_padding;
        let spacing = ctx.style().item_spacing;
        assert_eq!(ctx.cursor_screen_pos(), Point::new(pad.x, pad.y));

        ctx.dummy(Size::new(40.0, 10.0));
        assert_eq!(ctx.cursor_screen_pos(), Point::new(pad.x, pad.y + 10.0 + spacing.y));

        ctx.same_line();
        assert_eq!(ctx.cursor_screen_pos(), Point::new(pad.x + 40.0 + spacing.x, pad.y));
        ctx.dummy(Size::new(20.0, 30.0));
        // The taller item sets the line height.
        assert_eq!(ctx.cursor_screen_pos().y, pad.y + 30.0 + spacing.y);
        ctx.end(w);
        ctx.end_frame();
    }

    #[test]
    fn indent_shifts_following_items() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let w = fixed_window(&mut ctx);
        let x = ctx.cursor_screen_pos().x;
        ctx.indent(0.0);
        assert_eq!(ctx.cursor_screen_pos().x, x + ctx.style().indent_spacing);
        ctx.unindent(0.0);
        assert_eq!(ctx.cursor_screen_pos().x, x);
        ctx.end(w);
        ctx.end_frame();
    }

    #[test]
    fn group_becomes_one_item() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let w = fixed_window(&mut ctx);
        let start = ctx.cursor_screen_pos();
        let g = ctx.begin_group();
        ctx.dummy(Size::new(50.0, 10.0));
        ctx.dummy(Size::new(80.0, 10.0));
        ctx.end_group(g);
        let spacing_y = ctx.style().item_spacing.y;
        assert_eq!(ctx.last_item_rect(), Rect::new(start.x, start.y, start.x + 80.0, start.y + 20.0 + spacing_y));
        ctx.same_line();
        assert_eq!(ctx.cursor_screen_pos().x, start.x + 80.0 + ctx.style().item_spacing.x);
        ctx.end(w);
        ctx.end_frame();
    }

    #[test]
    fn available_region_shrinks_as_the_cursor_moves() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let w = fixed_window(&mut ctx);
        let before = ctx.content_region_avail();
        ctx.dummy(Size::new(10.0, 50.0));
        let after = ctx.content_region_avail();
        assert_eq!(before.x, after.x);
        assert_eq!(before.y - after.y, 50.0 + ctx.style().item_spacing.y);
        ctx.end(w);
        ctx.end_frame();
    }

    #[test]
    #[should_panic(expected = "end_group does not match")]
    fn mismatched_groups_panic() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let a = ctx.begin_group();
        let b = ctx.begin_group();
        ctx.end_group(a);
        ctx.end_group(b);
    }
}
