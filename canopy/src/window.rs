// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-persistent window records and their layout cursor.

use canopy_draw::{DrawList, DrawListSharedData};
use canopy_nav::{NavDir, NavLayer, TabFocus};
use kurbo::{Point, Rect, Size, Vec2};
use smallvec::SmallVec;

use crate::flags::{CondMask, ItemFlags, ItemStatusFlags, WindowFlags};
use crate::id::{Id, IdFragment};
use crate::registry::WindowHandle;

/// Horizontal or vertical item flow.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutType {
    /// Items stack downwards.
    #[default]
    Vertical,
    /// Items flow to the right (menu bars).
    Horizontal,
}

/// Saved cursor state of an open group.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct GroupData {
    pub backup_cursor_pos: Point,
    pub backup_cursor_max_pos: Point,
    pub backup_indent_x: f64,
    pub backup_group_offset_x: f64,
    pub backup_current_line_height: f64,
    pub backup_current_line_text_base_offset: f64,
    pub backup_active_id_is_alive: bool,
    pub advance_cursor: bool,
}

/// Layout cursor and per-item scratch state, rebuilt by every first `begin` of a frame.
#[derive(Clone, Debug, Default)]
pub(crate) struct DrawContext {
    pub cursor_pos: Point,
    pub cursor_pos_prev_line: Point,
    pub cursor_start_pos: Point,
    pub cursor_max_pos: Point,
    pub current_line_height: f64,
    pub current_line_text_base_offset: f64,
    pub prev_line_height: f64,
    pub prev_line_text_base_offset: f64,
    pub indent_x: f64,
    pub group_offset_x: f64,
    pub last_item_id: Id,
    pub last_item_status_flags: ItemStatusFlags,
    pub last_item_rect: Rect,
    pub nav_layer_current: NavLayer,
    pub nav_layer_active_mask: u8,
    pub nav_layer_active_mask_next: u8,
    pub nav_has_scroll: bool,
    pub nav_hide_highlight_one_frame: bool,
    pub menu_bar_appending: bool,
    pub menu_bar_offset_x: f64,
    pub child_windows: Vec<WindowHandle>,
    pub layout_type: LayoutType,
    pub parent_layout_type: LayoutType,
    pub item_flags: ItemFlags,
    pub item_flags_stack: Vec<ItemFlags>,
    pub group_stack: SmallVec<[GroupData; 4]>,
}

/// Widths of the columns of a menu (label, shortcut, check mark).
///
/// Each frame items declare the widths they need; the next frame lays out with the
/// maximum seen, so every item in the menu lines up.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MenuColumns {
    spacing: f64,
    width: f64,
    next_width: f64,
    pos: [f64; 3],
    next_widths: [f64; 3],
}

impl MenuColumns {
    /// Start a frame: lay out with the widths declared since the last update.
    pub fn update(&mut self, spacing: f64, clear: bool) {
        self.width = 0.0;
        self.next_width = 0.0;
        self.spacing = spacing;
        if clear {
            self.next_widths = [0.0; 3];
        }
        for i in 0..self.pos.len() {
            if i > 0 && self.next_widths[i] > 0.0 {
                self.width += self.spacing;
            }
            self.pos[i] = self.width.floor();
            self.width += self.next_widths[i];
            self.next_widths[i] = 0.0;
        }
    }

    /// Declare the widths of one item; returns the total width the menu needs.
    pub fn decl_columns(&mut self, w0: f64, w1: f64, w2: f64) -> f64 {
        self.next_width = 0.0;
        for (i, w) in [w0, w1, w2].into_iter().enumerate() {
            self.next_widths[i] = self.next_widths[i].max(w);
            let gap = if i > 0 && self.next_widths[i] > 0.0 { self.spacing } else { 0.0 };
            self.next_width += self.next_widths[i] + gap;
        }
        self.width.max(self.next_width)
    }

    /// Offset of column `i` from the item start.
    pub fn pos(&self, i: usize) -> f64 {
        self.pos[i]
    }
}

/// A named, frame-persistent window.
///
/// Windows are created on their first `begin` and live until the application calls
/// [`Context::discard_window`](crate::Context::discard_window).
#[derive(Debug)]
pub struct Window {
    pub(crate) name: String,
    pub(crate) id: Id,
    pub(crate) flags: WindowFlags,
    pub(crate) pos: Point,
    pub(crate) size: Size,
    pub(crate) size_full: Size,
    pub(crate) size_contents: Size,
    pub(crate) size_contents_explicit: Size,
    pub(crate) window_padding: Vec2,
    pub(crate) window_rounding: f64,
    pub(crate) window_border_size: f64,
    pub(crate) move_id: Id,
    pub(crate) child_id: Id,
    pub(crate) scroll: Vec2,
    pub(crate) scroll_target: Point,
    pub(crate) scroll_target_center_ratio: Vec2,
    pub(crate) title_bar_height: f64,
    pub(crate) menu_bar_height: f64,
    pub(crate) active: bool,
    pub(crate) was_active: bool,
    pub(crate) write_accessed: bool,
    pub(crate) collapsed: bool,
    pub(crate) skip_items: bool,
    pub(crate) appearing: bool,
    pub(crate) begin_count: u32,
    pub(crate) begin_order_within_parent: u32,
    pub(crate) begin_order_within_context: u32,
    pub(crate) popup_id: Id,
    pub(crate) auto_fit_frames_x: i32,
    pub(crate) auto_fit_frames_y: i32,
    pub(crate) auto_fit_only_grows: bool,
    pub(crate) auto_pos_last_direction: Option<NavDir>,
    pub(crate) hidden_frames: u32,
    pub(crate) set_window_pos_allow_flags: CondMask,
    pub(crate) set_window_size_allow_flags: CondMask,
    pub(crate) set_window_collapsed_allow_flags: CondMask,
    pub(crate) set_window_pos_val: Option<Point>,
    pub(crate) set_window_pos_pivot: Vec2,
    pub(crate) last_frame_active: i64,
    pub(crate) menu_columns: MenuColumns,
    pub(crate) font_window_scale: f64,
    pub(crate) draw_list: DrawList,
    pub(crate) parent: Option<WindowHandle>,
    pub(crate) root: Option<WindowHandle>,
    pub(crate) root_for_title_bar_highlight: Option<WindowHandle>,
    pub(crate) nav_last_child_nav_window: Option<WindowHandle>,
    pub(crate) nav_last_ids: [Id; NavLayer::COUNT],
    pub(crate) nav_rect_rel: [Rect; NavLayer::COUNT],
    pub(crate) id_stack: SmallVec<[Id; 8]>,
    pub(crate) dc: DrawContext,
    pub(crate) focus: TabFocus,
    pub(crate) clip_rect: Rect,
    pub(crate) outer_rect_clipped: Rect,
    pub(crate) inner_main_rect: Rect,
    pub(crate) inner_clip_rect: Rect,
    pub(crate) content_region_rect: Rect,
}

impl Window {
    pub(crate) fn new(name: &str, shared: DrawListSharedData) -> Self {
        let id = Id::from_str_seeded(name, Id::NONE);
        let mut id_stack = SmallVec::new();
        id_stack.push(id);
        Self {
            name: name.to_owned(),
            id,
            flags: WindowFlags::empty(),
            pos: Point::new(60.0, 60.0),
            size: Size::ZERO,
            size_full: Size::ZERO,
            size_contents: Size::ZERO,
            size_contents_explicit: Size::ZERO,
            window_padding: Vec2::ZERO,
            window_rounding: 0.0,
            window_border_size: 0.0,
            move_id: Id::from_str_seeded("#MOVE", id),
            child_id: Id::NONE,
            scroll: Vec2::ZERO,
            scroll_target: Point::new(f64::MAX, f64::MAX),
            scroll_target_center_ratio: Vec2::new(0.5, 0.5),
            title_bar_height: 0.0,
            menu_bar_height: 0.0,
            active: false,
            was_active: false,
            write_accessed: false,
            collapsed: false,
            skip_items: false,
            appearing: false,
            begin_count: 0,
            begin_order_within_parent: 0,
            begin_order_within_context: 0,
            popup_id: Id::NONE,
            auto_fit_frames_x: -1,
            auto_fit_frames_y: -1,
            auto_fit_only_grows: false,
            auto_pos_last_direction: None,
            hidden_frames: 0,
            set_window_pos_allow_flags: CondMask::all(),
            set_window_size_allow_flags: CondMask::all(),
            set_window_collapsed_allow_flags: CondMask::all(),
            set_window_pos_val: None,
            set_window_pos_pivot: Vec2::ZERO,
            last_frame_active: -1,
            menu_columns: MenuColumns::default(),
            font_window_scale: 1.0,
            draw_list: DrawList::new(shared),
            parent: None,
            root: None,
            root_for_title_bar_highlight: None,
            nav_last_child_nav_window: None,
            nav_last_ids: [Id::NONE; NavLayer::COUNT],
            nav_rect_rel: [Rect::ZERO; NavLayer::COUNT],
            id_stack,
            dc: DrawContext::default(),
            focus: TabFocus::default(),
            clip_rect: Rect::ZERO,
            outer_rect_clipped: Rect::ZERO,
            inner_main_rect: Rect::ZERO,
            inner_clip_rect: Rect::ZERO,
            content_region_rect: Rect::ZERO,
        }
    }

    /// Name the window was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hash of the name.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Flags of the current (or last) frame.
    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    /// Top-left corner in screen space.
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Size, or the title bar size when collapsed.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Size when not collapsed.
    pub fn size_full(&self) -> Size {
        self.size_full
    }

    /// Size of the contents measured last frame.
    pub fn size_contents(&self) -> Size {
        self.size_contents
    }

    /// Scroll offset.
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Begun this frame.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begun last frame.
    pub fn was_active(&self) -> bool {
        self.was_active
    }

    /// Collapsed to its title bar.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Items submitted to this window are skipped this frame.
    pub fn skip_items(&self) -> bool {
        self.skip_items
    }

    /// First frame of visibility after being hidden.
    pub fn is_appearing(&self) -> bool {
        self.appearing
    }

    /// Id used for dragging the window.
    pub fn move_id(&self) -> Id {
        self.move_id
    }

    /// Window this one was begun inside of, for child windows, popups and tooltips.
    pub fn parent(&self) -> Option<WindowHandle> {
        self.parent
    }

    /// Nearest ancestor reached through child-window links.
    pub fn root(&self) -> Option<WindowHandle> {
        self.root
    }

    /// Geometry recorded this frame.
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Screen-space rectangle.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.pos, self.size)
    }

    /// Child windows begun inside this one this frame, in submission order.
    pub fn child_windows(&self) -> &[WindowHandle] {
        &self.dc.child_windows
    }

    /// Rectangle of the last item submitted.
    pub fn last_item_rect(&self) -> Rect {
        self.dc.last_item_rect
    }

    /// Hash `fragment` on top of this window's ID stack.
    pub fn get_id<'a>(&self, fragment: impl Into<IdFragment<'a>>) -> Id {
        let seed = self.id_stack.last().copied().unwrap_or(self.id);
        Id::from_fragment(fragment.into(), seed)
    }

    pub(crate) fn title_bar_rect(&self) -> Rect {
        Rect::new(
            self.pos.x,
            self.pos.y,
            self.pos.x + self.size_full.width,
            self.pos.y + self.title_bar_height,
        )
    }

    pub(crate) fn menu_bar_rect(&self) -> Rect {
        let y0 = self.pos.y + self.title_bar_height;
        Rect::new(self.pos.x, y0, self.pos.x + self.size_full.width, y0 + self.menu_bar_height)
    }

    /// Scroll offset that puts `scroll_target` at its centre ratio, clamped to the contents.
    pub(crate) fn calc_next_scroll(&self) -> Vec2 {
        let mut scroll = self.scroll;
        let cr = self.scroll_target_center_ratio;
        if self.scroll_target.x < f64::MAX {
            scroll.x = self.scroll_target.x - cr.x * self.size_full.width;
        }
        if self.scroll_target.y < f64::MAX {
            let decoration = self.title_bar_height + self.menu_bar_height;
            scroll.y = self.scroll_target.y - (1.0 - cr.y) * decoration - cr.y * self.size_full.height;
        }
        scroll.x = scroll.x.max(0.0);
        scroll.y = scroll.y.max(0.0);
        if !self.collapsed && !self.skip_items {
            scroll.x = scroll.x.min(self.scroll_max_x());
            scroll.y = scroll.y.min(self.scroll_max_y());
        }
        scroll
    }

    pub(crate) fn scroll_max_x(&self) -> f64 {
        (self.size_contents.width - self.size_full.width).max(0.0)
    }

    pub(crate) fn scroll_max_y(&self) -> f64 {
        (self.size_contents.height - self.size_full.height).max(0.0)
    }

    /// Schedule scrolling so that window-space `local_y` lands at `center_ratio`.
    pub(crate) fn set_scroll_from_pos_y(&mut self, local_y: f64, center_ratio: f64, item_spacing_y: f64) {
        self.scroll_target.y = (local_y + self.scroll.y).floor();
        self.scroll_target_center_ratio.y = center_ratio;
        // Targets within the padding snap to the edges.
        if center_ratio <= 0.0 && self.scroll_target.y <= self.window_padding.y {
            self.scroll_target.y = 0.0;
        } else if center_ratio >= 1.0
            && self.scroll_target.y >= self.size_contents.height - self.window_padding.y + item_spacing_y
        {
            self.scroll_target.y = self.size_contents.height;
        }
    }

    /// Schedule a vertical scroll that makes `rect` visible; returns the resulting offset.
    pub(crate) fn scroll_to_bring_rect_into_view(&mut self, rect: Rect, item_spacing_y: f64) -> Vec2 {
        let window_rect = self.inner_main_rect.inflate(1.0, 1.0);
        if window_rect.contains_rect(rect) {
            return Vec2::ZERO;
        }
        if rect.y0 < window_rect.y0 {
            self.set_scroll_from_pos_y(rect.y0 - self.pos.y - item_spacing_y, 0.0, item_spacing_y);
        } else if rect.y1 >= window_rect.y1 {
            self.set_scroll_from_pos_y(rect.y1 - self.pos.y + item_spacing_y, 1.0, item_spacing_y);
        }
        self.calc_next_scroll() - self.scroll
    }

    /// Window-local bottom-right corner of the content region.
    pub(crate) fn content_region_max(&self) -> Point {
        Point::new(
            self.content_region_rect.x1 - self.pos.x,
            self.content_region_rect.y1 - self.pos.y,
        )
    }

    pub(crate) fn is_child(&self) -> bool {
        self.flags.contains(WindowFlags::CHILD_WINDOW)
    }

    pub(crate) fn is_popup(&self) -> bool {
        self.flags.contains(WindowFlags::POPUP)
    }

    pub(crate) fn is_tooltip(&self) -> bool {
        self.flags.contains(WindowFlags::TOOLTIP)
    }

    pub(crate) fn is_modal(&self) -> bool {
        self.flags.contains(WindowFlags::MODAL)
    }

    pub(crate) fn set_conditions_allowed(&mut self, allow: CondMask) {
        self.set_window_pos_allow_flags = allow;
        self.set_window_size_allow_flags = allow;
        self.set_window_collapsed_allow_flags = allow;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_window_has_move_id_under_its_name() {
        let w = Window::new("Demo", DrawListSharedData::default());
        assert_eq!(w.id(), Id::from_str_seeded("Demo", Id::NONE));
        assert_eq!(w.move_id(), Id::from_str_seeded("#MOVE", w.id()));
        assert_eq!(w.get_id("OK"), Id::from_str_seeded("OK", w.id()));
        assert_eq!(w.pos(), Point::new(60.0, 60.0));
    }

    #[test]
    fn menu_columns_align_to_widest_declaration() {
        let mut mc = MenuColumns::default();
        mc.update(10.0, false);
        assert_eq!(mc.decl_columns(40.0, 0.0, 12.0), 62.0);
        assert_eq!(mc.decl_columns(60.0, 20.0, 0.0), 112.0);
        mc.update(10.0, false);
        assert_eq!(mc.pos(0), 0.0);
        assert_eq!(mc.pos(1), 70.0);
        assert_eq!(mc.pos(2), 100.0);
        assert_eq!(mc.decl_columns(0.0, 0.0, 0.0), 112.0);
    }

    #[test]
    fn scroll_target_is_clamped_to_contents() {
        let mut w = Window::new("S", DrawListSharedData::default());
        w.size_full = Size::new(100.0, 100.0);
        w.size_contents = Size::new(100.0, 300.0);
        w.scroll_target = Point::new(f64::MAX, 1000.0);
        w.scroll_target_center_ratio = Vec2::new(0.5, 0.0);
        assert_eq!(w.calc_next_scroll().y, 200.0);
    }

    #[test]
    fn rect_below_view_scrolls_down() {
        let mut w = Window::new("S", DrawListSharedData::default());
        w.size_full = Size::new(100.0, 100.0);
        w.size_contents = Size::new(100.0, 300.0);
        w.inner_main_rect = Rect::new(60.0, 60.0, 160.0, 160.0);
        let delta = w.scroll_to_bring_rect_into_view(Rect::new(70.0, 180.0, 150.0, 200.0), 4.0);
        // Bottom edge (200 - 60 + 4 = 144) lands at the bottom of the window.
        assert_eq!(delta, Vec2::new(0.0, 44.0));
        assert_eq!(w.scroll_to_bring_rect_into_view(Rect::new(70.0, 70.0, 80.0, 80.0), 4.0), Vec2::ZERO);
    }
}
