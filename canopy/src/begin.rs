// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window `begin`/`end`, child windows and the set-next-window directives.

use canopy_draw::{Color, Corners};
use canopy_input::MouseButton;
use canopy_nav::{NavDir, NavLayer};
use kurbo::{Point, Rect, Size, Vec2};

use crate::context::{Context, InputSource};
use crate::flags::{Cond, CondMask, ItemFlags, ItemStatusFlags, WindowFlags};
use crate::id::{Id, display_text};
use crate::registry::WindowHandle;
use crate::style::{StyleColor, StyleVar};
use crate::window::{LayoutType, Window};

/// Scope of a window between [`Context::begin`] and [`Context::end`].
#[must_use = "hand the token back to Context::end"]
#[derive(Debug, PartialEq, Eq)]
pub struct WindowToken {
    pub(crate) window: WindowHandle,
    pub(crate) depth: usize,
    scopes: ScopeDepths,
    visible: bool,
}

/// Depths of the per-window stacks when a window scope opened; `end` must find them again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ScopeDepths {
    id: usize,
    clip: usize,
    item_flags: usize,
    group: usize,
}

impl ScopeDepths {
    fn of(w: &Window) -> Self {
        Self {
            id: w.id_stack.len(),
            clip: w.draw_list.clip_rect_depth(),
            item_flags: w.dc.item_flags_stack.len(),
            group: w.dc.group_stack.len(),
        }
    }
}

impl WindowToken {
    /// Whether items submitted now will be shown. `end` is required either way.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Window the token belongs to.
    pub fn window(&self) -> WindowHandle {
        self.window
    }
}

fn floor_point(p: Point) -> Point {
    Point::new(p.x.floor(), p.y.floor())
}

/// Clamp that tolerates `lo > hi` by preferring `lo`.
fn clamp_loose(v: f64, lo: f64, hi: f64) -> f64 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

pub(crate) fn set_window_pos(w: &mut Window, pos: Point, cond: Cond) {
    if !w.set_window_pos_allow_flags.allows(cond) {
        return;
    }
    w.set_window_pos_allow_flags = CondMask::empty();
    w.set_window_pos_val = None;
    let old = w.pos;
    w.pos = floor_point(pos);
    // Keep the cursor in place relative to the window when moved mid-build.
    let delta = w.pos - old;
    w.dc.cursor_pos += delta;
    w.dc.cursor_max_pos += delta;
}

fn set_window_size(w: &mut Window, size: Size, cond: Cond) {
    if !w.set_window_size_allow_flags.allows(cond) {
        return;
    }
    w.set_window_size_allow_flags = CondMask::empty();
    if size.width > 0.0 {
        w.auto_fit_frames_x = 0;
        w.size_full.width = size.width;
    } else {
        w.auto_fit_frames_x = 2;
        w.auto_fit_only_grows = false;
    }
    if size.height > 0.0 {
        w.auto_fit_frames_y = 0;
        w.size_full.height = size.height;
    } else {
        w.auto_fit_frames_y = 2;
        w.auto_fit_only_grows = false;
    }
}

fn set_window_collapsed(w: &mut Window, collapsed: bool, cond: Cond) {
    if !w.set_window_collapsed_allow_flags.allows(cond) {
        return;
    }
    w.set_window_collapsed_allow_flags = CondMask::empty();
    w.collapsed = collapsed;
}

fn calc_size_contents(w: &Window) -> Size {
    let width = if w.size_contents_explicit.width != 0.0 {
        w.size_contents_explicit.width
    } else {
        w.dc.cursor_max_pos.x - w.pos.x + w.scroll.x
    };
    let height = if w.size_contents_explicit.height != 0.0 {
        w.size_contents_explicit.height
    } else {
        w.dc.cursor_max_pos.y - w.pos.y + w.scroll.y
    };
    Size::new(width.trunc() + w.window_padding.x, height.trunc() + w.window_padding.y)
}

/// Place a `size` box near `ref_pos` without overlapping `r_avoid`, staying inside `r_outer`.
///
/// Directions are tried right, down, up, left, starting with `last_dir` when set; the
/// chosen direction is written back. When nothing fits, `last_dir` becomes `None` and
/// the box is pushed inside `r_outer`.
pub(crate) fn find_best_window_pos(
    ref_pos: Point,
    size: Size,
    last_dir: &mut Option<NavDir>,
    r_outer: Rect,
    r_avoid: Rect,
) -> Point {
    const ORDER: [NavDir; 4] = [NavDir::Right, NavDir::Down, NavDir::Up, NavDir::Left];
    let base = Point::new(
        clamp_loose(ref_pos.x, r_outer.x0, r_outer.x1 - size.width),
        clamp_loose(ref_pos.y, r_outer.y0, r_outer.y1 - size.height),
    );
    let first = *last_dir;
    let candidates = first.into_iter().chain(ORDER.into_iter().filter(|&d| Some(d) != first));
    for dir in candidates {
        let avail_w = (if dir == NavDir::Left { r_avoid.x0 } else { r_outer.x1 })
            - (if dir == NavDir::Right { r_avoid.x1 } else { r_outer.x0 });
        let avail_h = (if dir == NavDir::Up { r_avoid.y0 } else { r_outer.y1 })
            - (if dir == NavDir::Down { r_avoid.y1 } else { r_outer.y0 });
        if avail_w < size.width || avail_h < size.height {
            continue;
        }
        let x = match dir {
            NavDir::Left => r_avoid.x0 - size.width,
            NavDir::Right => r_avoid.x1,
            _ => base.x,
        };
        let y = match dir {
            NavDir::Up => r_avoid.y0 - size.height,
            NavDir::Down => r_avoid.y1,
            _ => base.y,
        };
        *last_dir = Some(dir);
        return Point::new(x, y);
    }
    *last_dir = None;
    Point::new(
        ((ref_pos.x + size.width).min(r_outer.x1) - size.width).max(r_outer.x0),
        ((ref_pos.y + size.height).min(r_outer.y1) - size.height).max(r_outer.y0),
    )
}

impl Context {
    /// Position the next window begun; `pivot` `(0.5, 0.5)` centres it on `pos`.
    pub fn set_next_window_pos_pivot(&mut self, pos: Point, cond: Cond, pivot: Vec2) {
        self.next_window.pos = Some((pos, cond, pivot));
    }

    /// Position the top-left corner of the next window begun.
    pub fn set_next_window_pos(&mut self, pos: Point, cond: Cond) {
        self.set_next_window_pos_pivot(pos, cond, Vec2::ZERO);
    }

    /// Size the next window begun; a zero axis is fitted to the contents.
    pub fn set_next_window_size(&mut self, size: Size, cond: Cond) {
        self.next_window.size = Some((size, cond));
    }

    /// Declare the content size of the next window instead of measuring it.
    pub fn set_next_window_content_size(&mut self, size: Size) {
        self.next_window.content_size = Some(size);
    }

    /// Collapse or expand the next window begun.
    pub fn set_next_window_collapsed(&mut self, collapsed: bool, cond: Cond) {
        self.next_window.collapsed = Some((collapsed, cond));
    }

    /// Focus the next window begun.
    pub fn set_next_window_focus(&mut self) {
        self.next_window.focus = true;
    }

    /// Override the background alpha of the next window begun.
    pub fn set_next_window_bg_alpha(&mut self, alpha: f64) {
        self.next_window.bg_alpha = Some(alpha);
    }

    fn create_window(&mut self, name: &str, id: Id, flags: WindowFlags) -> WindowHandle {
        let mut w = Window::new(name, self.shared.clone());
        w.flags = flags;
        if !flags.contains(WindowFlags::NO_SAVED_SETTINGS) {
            if let Some(s) = self.settings.get(id) {
                w.set_conditions_allowed(CondMask::all() - CondMask::FIRST_USE_EVER);
                w.pos = floor_point(s.pos);
                w.collapsed = s.collapsed;
                if s.size.width * s.size.width + s.size.height * s.size.height > 0.00001 {
                    w.size = s.size;
                    w.size_full = s.size;
                }
            }
        }
        if flags.contains(WindowFlags::ALWAYS_AUTO_RESIZE) {
            w.auto_fit_frames_x = 2;
            w.auto_fit_frames_y = 2;
            w.auto_fit_only_grows = false;
        } else {
            if w.size.width <= 0.0 {
                w.auto_fit_frames_x = 2;
            }
            if w.size.height <= 0.0 {
                w.auto_fit_frames_y = 2;
            }
            w.auto_fit_only_grows = w.auto_fit_frames_x > 0 || w.auto_fit_frames_y > 0;
        }
        let handle = self
            .windows
            .insert(w, !flags.contains(WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS));
        tracing::debug!(name, ?handle, "window created");
        handle
    }

    fn find_best_window_pos_for_popup(&self, h: WindowHandle) -> (Point, Option<NavDir>) {
        let w = self.windows.at(h);
        let pad = self.style.display_safe_area_padding;
        let vp = self.viewport_rect();
        let sx = if vp.width() > pad.x * 2.0 { pad.x } else { 0.0 };
        let sy = if vp.height() > pad.y * 2.0 { pad.y } else { 0.0 };
        let r_outer = Rect::new(vp.x0 + sx, vp.y0 + sy, vp.x1 - sx, vp.y1 - sy);
        let mut last_dir = w.auto_pos_last_direction;

        if w.flags.contains(WindowFlags::CHILD_MENU) {
            let Some(p) = w.parent.and_then(|p| self.windows.get(p)) else {
                return (w.pos, last_dir);
            };
            let r_avoid = if p.dc.menu_bar_appending {
                let y0 = p.pos.y + p.title_bar_height;
                Rect::new(-f64::MAX, y0, f64::MAX, y0 + p.menu_bar_height)
            } else {
                let overlap = self.style.item_spacing.x;
                Rect::new(p.pos.x + overlap, -f64::MAX, p.pos.x + p.size.width - overlap, f64::MAX)
            };
            let pos = find_best_window_pos(w.pos, w.size, &mut last_dir, r_outer, r_avoid);
            return (pos, last_dir);
        }
        if w.is_popup() {
            let anchor = self
                .begin_popups
                .iter()
                .rev()
                .find(|p| p.window == Some(h))
                .and_then(|p| p.anchor);
            let r_avoid = anchor.unwrap_or_else(|| Rect::new(w.pos.x - 1.0, w.pos.y - 1.0, w.pos.x + 1.0, w.pos.y + 1.0));
            let pos = find_best_window_pos(w.pos, w.size, &mut last_dir, r_outer, r_avoid);
            return (pos, last_dir);
        }
        // Tooltips follow the mouse (or the nav cursor) and avoid the cursor shape.
        let r = self.nav_calc_preferred_ref_pos();
        let r_avoid = if !self.nav.disable_highlight && self.nav.disable_mouse_hover {
            Rect::new(r.x - 16.0, r.y - 8.0, r.x + 16.0, r.y + 8.0)
        } else {
            Rect::new(r.x - 16.0, r.y - 8.0, r.x + 24.0, r.y + 24.0)
        };
        let mut pos = find_best_window_pos(r, w.size, &mut last_dir, r_outer, r_avoid);
        if last_dir.is_none() {
            pos = r + Vec2::new(2.0, 2.0);
        }
        (pos, last_dir)
    }

    /// Begin (or append to) the window called `name`.
    ///
    /// The first `begin` of a frame fixes the window's flags, geometry and decorations;
    /// later calls append items. Every call must be matched by [`end`](Self::end), even
    /// when the returned token is not visible.
    pub fn begin(&mut self, name: &str, flags: WindowFlags) -> WindowToken {
        assert!(self.within_frame, "begin called outside of new_frame/end_frame");
        assert!(!name.is_empty(), "window names must not be empty");
        let id = Id::from_str_seeded(name, Id::NONE);
        let (h, just_created) = match self.windows.find(id) {
            Some(h) => (h, false),
            None => (self.create_window(name, id, flags), true),
        };
        let frame = self.frame_count;
        let first_begin = self.windows.at(h).last_frame_active != frame;
        let flags = if first_begin {
            self.windows.at_mut(h).flags = flags;
            flags
        } else {
            self.windows.at(h).flags
        };
        let parent = if first_begin {
            if flags.intersects(WindowFlags::CHILD_WINDOW | WindowFlags::POPUP) {
                self.window_stack.last().copied()
            } else {
                None
            }
        } else {
            self.windows.at(h).parent
        };
        assert!(
            !flags.contains(WindowFlags::CHILD_WINDOW) || parent.is_some(),
            "child windows must be begun inside another window"
        );

        let mut just_activated = self.windows.at(h).last_frame_active < frame - 1;
        let just_appearing_after_hidden = self.windows.at(h).hidden_frames == 1;
        let popup_slot = if flags.contains(WindowFlags::POPUP) {
            let depth = self.begin_popups.len();
            let Some(popup) = self.open_popups.get(depth) else {
                panic!("popup window {name:?} begun without a matching open popup");
            };
            let w = self.windows.at(h);
            just_activated |= w.popup_id != popup.popup_id || popup.window != Some(h);
            Some(depth)
        } else {
            None
        };
        let w = self.windows.at_mut(h);
        w.appearing = just_activated || just_appearing_after_hidden;
        if w.appearing {
            w.set_window_pos_allow_flags |= CondMask::APPEARING;
            w.set_window_size_allow_flags |= CondMask::APPEARING;
            w.set_window_collapsed_allow_flags |= CondMask::APPEARING;
        }

        self.window_stack.push(h);
        self.set_current_window(Some(h));
        if let Some(depth) = popup_slot {
            self.open_popups[depth].window = Some(h);
            let popup = self.open_popups[depth].clone();
            self.windows.at_mut(h).popup_id = popup.popup_id;
            self.begin_popups.push(popup);
        }
        if just_appearing_after_hidden && !flags.contains(WindowFlags::CHILD_WINDOW) {
            self.windows.at_mut(h).nav_last_ids[0] = Id::NONE;
        }

        let title_bar_height = if flags.contains(WindowFlags::NO_TITLE_BAR) {
            0.0
        } else {
            self.font_size + self.style.frame_padding.y * 2.0
        };
        let menu_bar_height = if flags.contains(WindowFlags::MENU_BAR) {
            self.font_size + self.style.frame_padding.y * 2.0
        } else {
            0.0
        };

        let next = core::mem::take(&mut self.next_window);
        let mut pos_set_by_api = false;
        let mut size_x_set_by_api = false;
        let mut size_y_set_by_api = false;
        let w = self.windows.at_mut(h);
        if let Some((pos, cond, pivot)) = next.pos {
            pos_set_by_api = w.set_window_pos_allow_flags.allows(cond);
            if pos_set_by_api && pivot.hypot2() > 0.00001 {
                // Applied once the size is known, possibly next frame.
                w.set_window_pos_val = Some(pos);
                w.set_window_pos_pivot = pivot;
                w.set_window_pos_allow_flags = CondMask::empty();
            } else {
                set_window_pos(w, pos, cond);
            }
        }
        if let Some((size, cond)) = next.size {
            let allowed = w.set_window_size_allow_flags.allows(cond);
            size_x_set_by_api = allowed && size.width > 0.0;
            size_y_set_by_api = allowed && size.height > 0.0;
            set_window_size(w, size, cond);
        }
        if let Some(content) = next.content_size {
            w.size_contents_explicit = content;
            if content.height != 0.0 {
                w.size_contents_explicit.height += title_bar_height + menu_bar_height;
            }
        } else if first_begin {
            w.size_contents_explicit = Size::ZERO;
        }
        if let Some((collapsed, cond)) = next.collapsed {
            set_window_collapsed(w, collapsed, cond);
        }
        if w.appearing {
            w.set_window_pos_allow_flags -= CondMask::APPEARING;
            w.set_window_size_allow_flags -= CondMask::APPEARING;
            w.set_window_collapsed_allow_flags -= CondMask::APPEARING;
        }
        if next.focus {
            self.focus_window(Some(h));
        }

        if first_begin {
            self.begin_first_of_frame(BeginFrame {
                h,
                name,
                flags,
                parent,
                just_created,
                just_activated,
                just_appearing_after_hidden,
                pos_set_by_api,
                size_x_set_by_api,
                size_y_set_by_api,
                title_bar_height,
                menu_bar_height,
                bg_alpha: next.bg_alpha,
            });
        }

        let w = self.windows.at_mut(h);
        let inner = w.inner_clip_rect;
        w.draw_list.push_clip_rect(inner.origin(), Point::new(inner.x1, inner.y1), true);
        w.clip_rect = w.draw_list.clip_rect();
        if first_begin {
            // Stays false for windows nothing is submitted to, like an unused implicit window.
            w.write_accessed = false;
        }
        w.begin_count += 1;

        if flags.contains(WindowFlags::CHILD_WINDOW) {
            let parent_collapsed = parent.is_some_and(|p| self.windows.at(p).collapsed);
            let w = self.windows.at_mut(h);
            w.collapsed = parent_collapsed;
            if !flags.contains(WindowFlags::ALWAYS_AUTO_RESIZE) && w.auto_fit_frames_x <= 0 && w.auto_fit_frames_y <= 0 {
                let c = w.clip_rect;
                w.collapsed |= c.x0 >= c.x1 || c.y0 >= c.y1;
            }
            if w.collapsed {
                w.active = false;
            }
        }
        let alpha = self.style.alpha;
        let w = self.windows.at_mut(h);
        if alpha <= 0.0 {
            w.active = false;
        }
        w.skip_items = (w.collapsed || !w.active) && w.auto_fit_frames_x <= 0 && w.auto_fit_frames_y <= 0;
        WindowToken {
            window: h,
            depth: self.window_stack.len(),
            scopes: ScopeDepths::of(w),
            visible: !w.skip_items,
        }
    }

    fn begin_first_of_frame(&mut self, b: BeginFrame<'_>) {
        let BeginFrame { h, flags, parent, .. } = b;
        let frame = self.frame_count;
        let root = match parent {
            Some(p) if flags.contains(WindowFlags::CHILD_WINDOW) => self.windows.at(p).root.unwrap_or(p),
            _ => h,
        };
        let root_for_title_bar_highlight = match parent {
            Some(p)
                if !flags.contains(WindowFlags::MODAL)
                    && flags.intersects(WindowFlags::CHILD_WINDOW | WindowFlags::POPUP) =>
            {
                self.windows.at(p).root_for_title_bar_highlight
            }
            _ => Some(h),
        };
        let (parent_clip, parent_layout, parent_item_flags) = match parent {
            Some(p) => {
                let pw = self.windows.at(p);
                (Some(pw.clip_rect), pw.dc.layout_type, Some(pw.dc.item_flags))
            }
            None => (None, LayoutType::Vertical, None),
        };
        let order = self.begin_order_counter;
        self.begin_order_counter += 1;

        let style = &self.style;
        let (rounding, border_size) = if flags.contains(WindowFlags::CHILD_WINDOW) {
            (style.child_rounding, style.child_border_size)
        } else if flags.contains(WindowFlags::POPUP) && !flags.contains(WindowFlags::MODAL) {
            (style.popup_rounding, style.popup_border_size)
        } else {
            (style.window_rounding, style.window_border_size)
        };
        let w = self.windows.at_mut(h);
        w.parent = parent;
        w.root = Some(root);
        w.root_for_title_bar_highlight = root_for_title_bar_highlight;
        w.active = true;
        w.begin_order_within_parent = 0;
        w.begin_order_within_context = order;
        w.begin_count = 0;
        w.last_frame_active = frame;
        w.id_stack.truncate(1);
        w.focus.begin_frame();
        w.window_rounding = rounding;
        w.window_border_size = border_size;
        w.title_bar_height = b.title_bar_height;
        w.menu_bar_height = b.menu_bar_height;
        w.window_padding = style.window_padding;
        if flags.contains(WindowFlags::CHILD_WINDOW) && !flags.contains(WindowFlags::POPUP) && border_size == 0.0 {
            let pad_y = if flags.contains(WindowFlags::MENU_BAR) { style.window_padding.y } else { 0.0 };
            w.window_padding = Vec2::new(0.0, pad_y);
        }

        // Double-clicking the title bar toggles collapse.
        if flags.intersects(WindowFlags::NO_TITLE_BAR | WindowFlags::NO_COLLAPSE) {
            self.windows.at_mut(h).collapsed = false;
        } else {
            let title = self.windows.at(h).title_bar_rect();
            if self.hovered_window == Some(h)
                && title.contains(self.input.mouse_pos())
                && self.input.is_mouse_double_clicked(MouseButton::Left)
            {
                let w = self.windows.at_mut(h);
                w.collapsed = !w.collapsed;
                tracing::debug!(name = b.name, collapsed = w.collapsed, "window collapse toggled");
                self.mark_settings_dirty(h);
                self.focus_window(Some(h));
            }
        }

        self.update_window_size(&b);
        self.update_window_pos(&b);

        let w = self.windows.at_mut(h);
        w.scroll = w.calc_next_scroll();
        w.scroll_target = Point::new(f64::MAX, f64::MAX);

        let want_focus = b.just_activated
            && !flags.contains(WindowFlags::NO_FOCUS_ON_APPEARING)
            && (!flags.intersects(WindowFlags::CHILD_WINDOW | WindowFlags::TOOLTIP) || flags.contains(WindowFlags::POPUP));

        // Draw list and outer clip.
        let viewport = self.viewport_rect();
        let shared = self.shared.clone();
        let tex = self.font.texture_id();
        let w = self.windows.at_mut(h);
        w.draw_list.set_shared_data(shared);
        w.draw_list.clear();
        w.draw_list.push_texture_id(tex);
        let outer_clip = match parent_clip {
            Some(c) if flags.contains(WindowFlags::CHILD_WINDOW) && !flags.contains(WindowFlags::POPUP) => c,
            _ => viewport,
        };
        w.draw_list.push_clip_rect(outer_clip.origin(), Point::new(outer_clip.x1, outer_clip.y1), true);
        w.clip_rect = w.draw_list.clip_rect();

        self.draw_window_frame(&b, want_focus, viewport);
        self.setup_window_layout(&b, parent_layout, parent_item_flags);

        if want_focus {
            self.focus_window(Some(h));
            self.nav_init_window(h, false);
        }

        if !flags.contains(WindowFlags::NO_TITLE_BAR) {
            self.draw_title_bar(&b);
        }

        let mouse = self.input.mouse_pos();
        let style = &self.style;
        let w = self.windows.at_mut(h);
        let title = w.title_bar_rect();
        w.outer_rect_clipped = w.rect().intersect(w.clip_rect);
        let inner_top_border = if flags.contains(WindowFlags::MENU_BAR) || !flags.contains(WindowFlags::NO_TITLE_BAR) {
            style.frame_border_size
        } else {
            w.window_border_size
        };
        w.inner_main_rect = Rect::new(
            title.x0 + w.window_border_size,
            title.y1 + w.menu_bar_height + inner_top_border,
            w.pos.x + w.size.width - w.window_border_size,
            w.pos.y + w.size.height - w.window_border_size,
        );
        let shrink = (w.window_padding.x * 0.5 - w.window_border_size).floor().max(0.0);
        let m = w.inner_main_rect;
        w.inner_clip_rect = Rect::new(
            (0.5 + m.x0 + shrink).floor(),
            (0.5 + m.y0).floor(),
            (0.5 + m.x1 - shrink).floor(),
            (0.5 + m.y1).floor(),
        );
        // The title bar stands in as the last item until something is submitted.
        w.dc.last_item_id = w.move_id;
        w.dc.last_item_rect = title;
        w.dc.last_item_status_flags = if title.contains(mouse) {
            ItemStatusFlags::HOVERED_RECT
        } else {
            ItemStatusFlags::empty()
        };
    }

    fn update_window_size(&mut self, b: &BeginFrame<'_>) {
        let flags = b.flags;
        let min_size = self.style.window_min_size;
        let safe = self.style.display_safe_area_padding;
        let display = self.raw.display_size;
        let w = self.windows.at_mut(b.h);
        w.size_contents = calc_size_contents(w);
        if w.hidden_frames > 0 {
            w.hidden_frames -= 1;
        }
        if b.just_created && (w.auto_fit_frames_x > 0 || w.auto_fit_frames_y > 0) {
            // Measured from contents: hide the first frame.
            w.hidden_frames = 1;
        }
        if flags.intersects(WindowFlags::POPUP | WindowFlags::TOOLTIP) && b.just_activated {
            w.hidden_frames = 1;
            if flags.contains(WindowFlags::ALWAYS_AUTO_RESIZE) {
                if !b.size_x_set_by_api {
                    w.size.width = 0.0;
                    w.size_full.width = 0.0;
                }
                if !b.size_y_set_by_api {
                    w.size.height = 0.0;
                    w.size_full.height = 0.0;
                }
                w.size_contents = Size::ZERO;
            }
        }

        let contents = w.size_contents;
        let auto_fit = if flags.contains(WindowFlags::TOOLTIP) {
            contents
        } else {
            let max_w = min_size.width.max(display.width - safe.x * 2.0);
            let max_h = min_size.height.max(display.height - safe.y * 2.0);
            Size::new(
                contents.width.max(min_size.width).min(max_w),
                contents.height.max(min_size.height).min(max_h),
            )
        };
        let mut dirty = false;
        if flags.contains(WindowFlags::ALWAYS_AUTO_RESIZE) && !w.collapsed {
            if !b.size_x_set_by_api {
                w.size_full.width = auto_fit.width;
            }
            if !b.size_y_set_by_api {
                w.size_full.height = auto_fit.height;
            }
        } else if w.auto_fit_frames_x > 0 || w.auto_fit_frames_y > 0 {
            if !b.size_x_set_by_api && w.auto_fit_frames_x > 0 {
                w.size_full.width = if w.auto_fit_only_grows {
                    w.size_full.width.max(auto_fit.width)
                } else {
                    auto_fit.width
                };
            }
            if !b.size_y_set_by_api && w.auto_fit_frames_y > 0 {
                w.size_full.height = if w.auto_fit_only_grows {
                    w.size_full.height.max(auto_fit.height)
                } else {
                    auto_fit.height
                };
            }
            dirty = !w.collapsed;
        }
        if !flags.intersects(WindowFlags::CHILD_WINDOW | WindowFlags::ALWAYS_AUTO_RESIZE) {
            w.size_full = Size::new(w.size_full.width.max(min_size.width), w.size_full.height.max(min_size.height));
        }
        w.size = if w.collapsed && !flags.contains(WindowFlags::CHILD_WINDOW) {
            Size::new(w.size_full.width, w.title_bar_height)
        } else {
            w.size_full
        };
        if dirty {
            self.mark_settings_dirty(b.h);
        }
    }

    fn update_window_pos(&mut self, b: &BeginFrame<'_>) {
        let (h, flags) = (b.h, b.flags);
        if let Some(p) = b.parent.filter(|_| flags.contains(WindowFlags::CHILD_WINDOW)) {
            let pw = self.windows.at_mut(p);
            let order = u32::try_from(pw.dc.child_windows.len()).unwrap_or(u32::MAX);
            pw.dc.child_windows.push(h);
            let cursor = pw.dc.cursor_pos;
            let w = self.windows.at_mut(h);
            w.begin_order_within_parent = order;
            if !flags.contains(WindowFlags::POPUP) && !b.pos_set_by_api {
                w.pos = cursor;
            }
        }

        if b.just_activated {
            let open_pos = self.begin_popups.last().map(|p| p.open_popup_pos);
            let w = self.windows.at_mut(h);
            w.auto_pos_last_direction = None;
            if flags.contains(WindowFlags::POPUP) && !b.pos_set_by_api {
                if let Some(pos) = open_pos {
                    w.pos = pos;
                }
            }
        }

        let safe = self.style.display_safe_area_padding;
        let w = self.windows.at_mut(h);
        if w.hidden_frames == 0 && w.set_window_pos_val.is_some() {
            if let Some(val) = w.set_window_pos_val.take() {
                let piv = w.set_window_pos_pivot;
                let pos = Point::new(
                    (val.x - w.size_full.width * piv.x).max(safe.x),
                    (val.y - w.size_full.height * piv.y).max(safe.y),
                );
                set_window_pos(w, pos, Cond::Always);
            }
        } else if flags.contains(WindowFlags::CHILD_MENU)
            || (flags.contains(WindowFlags::POPUP) && !b.pos_set_by_api && b.just_appearing_after_hidden)
            || (flags.contains(WindowFlags::TOOLTIP) && !b.pos_set_by_api)
        {
            let (pos, dir) = self.find_best_window_pos_for_popup(h);
            let w = self.windows.at_mut(h);
            w.pos = pos;
            w.auto_pos_last_direction = dir;
        }

        let padding = self.style.display_window_padding;
        let padding = Vec2::new(padding.x.max(safe.x), padding.y.max(safe.y));
        let display = self.raw.display_size;
        let w = self.windows.at_mut(h);
        if !flags.contains(WindowFlags::CHILD_WINDOW)
            && !b.pos_set_by_api
            && w.auto_fit_frames_x <= 0
            && w.auto_fit_frames_y <= 0
            && display.width > 0.0
            && display.height > 0.0
        {
            // Keep at least `padding` of the window on screen.
            let (sz, p) = (w.size, w.pos);
            let x = (p.x + sz.width).max(padding.x) - sz.width;
            let y = (p.y + sz.height).max(padding.y) - sz.height;
            w.pos = Point::new(x.min(display.width - padding.x), y.min(display.height - padding.y));
        }
        w.pos = floor_point(w.pos);
    }

    fn draw_window_frame(&mut self, b: &BeginFrame<'_>, want_focus: bool, viewport: Rect) {
        let (h, flags) = (b.h, b.flags);
        let darken = (flags.contains(WindowFlags::MODAL) && self.front_most_modal() == Some(h)).then(|| {
            self.style
                .color(StyleColor::ModalWindowDarkening)
                .multiply_alpha(self.modal_darkening_ratio)
        });
        let highlight = self.windows.at(h).root_for_title_bar_highlight;
        let focused = want_focus
            || self
                .nav
                .window
                .and_then(|nw| self.windows.get(nw))
                .is_some_and(|nw| nw.root_for_title_bar_highlight == highlight);
        let style = &self.style;
        let collapsed = self.windows.at(h).collapsed;
        let title_col = if collapsed {
            style.color(if focused && !self.nav.disable_highlight {
                StyleColor::TitleBgActive
            } else {
                StyleColor::TitleBgCollapsed
            })
        } else {
            style.color(if focused { StyleColor::TitleBgActive } else { StyleColor::TitleBg })
        };
        let bg_slot = if flags.intersects(WindowFlags::TOOLTIP | WindowFlags::POPUP) {
            StyleColor::PopupBg
        } else if flags.contains(WindowFlags::CHILD_WINDOW) {
            StyleColor::ChildBg
        } else {
            StyleColor::WindowBg
        };
        let mut bg_col = style.color(bg_slot);
        if let Some(alpha) = b.bg_alpha {
            bg_col = Color { a: 255, ..bg_col }.multiply_alpha(alpha);
        }
        let border_col = style.color(StyleColor::Border);
        let menu_col = style.color(StyleColor::MenuBarBg);
        let frame_border = style.frame_border_size;
        let window_border_style = style.window_border_size;

        let w = self.windows.at_mut(h);
        let rect = w.rect();
        let title = w.title_bar_rect();
        let menu = w.menu_bar_rect().intersect(rect);
        let (rounding, border) = (w.window_rounding, w.window_border_size);
        let list = &mut w.draw_list;
        if let Some(col) = darken {
            list.add_rect_filled(viewport.origin(), Point::new(viewport.x1, viewport.y1), col, 0.0);
        }
        if collapsed {
            list.add_rect_filled(title.origin(), Point::new(title.x1, title.y1), title_col, rounding);
            if border > 0.0 {
                list.add_rect(title.origin(), Point::new(title.x1, title.y1), border_col, rounding, Corners::all(), border);
            }
            return;
        }
        let no_title = flags.contains(WindowFlags::NO_TITLE_BAR);
        let bg_corners = if no_title { Corners::all() } else { Corners::BOTTOM };
        list.add_rect_filled_corners(
            Point::new(rect.x0, rect.y0 + w.title_bar_height),
            Point::new(rect.x1, rect.y1),
            bg_col,
            rounding,
            bg_corners,
        );
        if !no_title {
            list.add_rect_filled_corners(title.origin(), Point::new(title.x1, title.y1), title_col, rounding, Corners::TOP);
        }
        if flags.contains(WindowFlags::MENU_BAR) {
            let r = if no_title { rounding } else { 0.0 };
            list.add_rect_filled_corners(menu.origin(), Point::new(menu.x1, menu.y1), menu_col, r, Corners::TOP);
            if frame_border > 0.0 && menu.y1 < rect.y1 {
                list.add_line(Point::new(menu.x0, menu.y1), Point::new(menu.x1, menu.y1), border_col, frame_border);
            }
        }
        if border > 0.0 {
            list.add_rect(rect.origin(), Point::new(rect.x1, rect.y1), border_col, rounding, Corners::all(), border);
        }
        if frame_border > 0.0 && !no_title {
            list.add_line(
                Point::new(title.x0 + window_border_style, title.y1 - 1.0),
                Point::new(title.x1 - window_border_style, title.y1 - 1.0),
                border_col,
                frame_border,
            );
        }
    }

    fn setup_window_layout(&mut self, b: &BeginFrame<'_>, parent_layout: LayoutType, parent_item_flags: Option<ItemFlags>) {
        let spacing = self.style.item_spacing;
        let w = self.windows.at_mut(b.h);
        let (pos, scroll, pad, size) = (w.pos, w.scroll, w.window_padding, w.size);
        let explicit = w.size_contents_explicit;
        let decoration = w.title_bar_height + w.menu_bar_height;
        w.content_region_rect = Rect::new(
            pos.x - scroll.x + pad.x,
            pos.y - scroll.y + pad.y + decoration,
            pos.x - scroll.x - pad.x + if explicit.width != 0.0 { explicit.width } else { size.width },
            pos.y - scroll.y - pad.y + if explicit.height != 0.0 { explicit.height } else { size.height },
        );
        let has_scroll = w.scroll_max_y() > 0.0;
        let dc = &mut w.dc;
        dc.indent_x = pad.x - scroll.x;
        dc.group_offset_x = 0.0;
        dc.cursor_start_pos = pos + Vec2::new(dc.indent_x, decoration + pad.y - scroll.y);
        dc.cursor_pos = dc.cursor_start_pos;
        dc.cursor_pos_prev_line = dc.cursor_pos;
        dc.cursor_max_pos = dc.cursor_start_pos;
        dc.current_line_height = 0.0;
        dc.prev_line_height = 0.0;
        dc.current_line_text_base_offset = 0.0;
        dc.prev_line_text_base_offset = 0.0;
        dc.nav_hide_highlight_one_frame = false;
        dc.nav_has_scroll = has_scroll;
        dc.nav_layer_current = NavLayer::Main;
        dc.nav_layer_active_mask = dc.nav_layer_active_mask_next;
        dc.nav_layer_active_mask_next = 0;
        dc.menu_bar_appending = false;
        dc.menu_bar_offset_x = pad.x.max(spacing.x);
        dc.child_windows.clear();
        dc.layout_type = LayoutType::Vertical;
        dc.parent_layout_type = parent_layout;
        dc.item_flags = ItemFlags::default();
        dc.item_flags_stack.clear();
        dc.group_stack.clear();
        if let Some(inherited) = parent_item_flags.filter(|&f| b.flags.contains(WindowFlags::CHILD_WINDOW) && f != dc.item_flags) {
            dc.item_flags = inherited;
            dc.item_flags_stack.push(inherited);
        }
        w.menu_columns.update(spacing.x, b.just_activated);
        if w.auto_fit_frames_x > 0 {
            w.auto_fit_frames_x -= 1;
        }
        if w.auto_fit_frames_y > 0 {
            w.auto_fit_frames_y -= 1;
        }
    }

    fn draw_title_bar(&mut self, b: &BeginFrame<'_>) {
        let flags = b.flags;
        let (pos, collapsed, title, size) = {
            let w = self.windows.at(b.h);
            (w.pos, w.collapsed, w.title_bar_rect(), w.size)
        };
        let fp = self.style.frame_padding;
        let align = self.style.window_title_align;
        if !flags.contains(WindowFlags::NO_COLLAPSE) {
            let dir = if collapsed { NavDir::Right } else { NavDir::Down };
            self.render_arrow(pos + fp, dir, 1.0);
        }
        let text_size = self.calc_text_size(display_text(b.name));
        let pad_left = if flags.contains(WindowFlags::NO_COLLAPSE) {
            fp.x
        } else {
            fp.x + self.font_size + self.style.item_inner_spacing.x
        };
        let mut pad_right = fp.x;
        if align.x > 0.0 {
            pad_right += (pad_left - pad_right) * align.x;
        }
        let text_r = Rect::new(title.x0 + pad_left, title.y0, title.x1 - pad_right, title.y1);
        let clip = Rect::new(text_r.x0, text_r.y0, pos.x + size.width - fp.x, text_r.y1);
        self.render_text_clipped(text_r, b.name, Some(text_size), align, Some(clip));
    }

    /// Close the scope opened by the matching [`begin`](Self::begin).
    pub fn end(&mut self, token: WindowToken) {
        assert!(
            self.window_stack.last() == Some(&token.window) && self.window_stack.len() == token.depth,
            "end does not match the innermost begin"
        );
        let w = self.windows.at_mut(token.window);
        let found = ScopeDepths::of(w);
        let opened = token.scopes;
        assert!(
            found.id == opened.id,
            "end found {} ID stack entries instead of {}; every push_id needs a pop_id",
            found.id,
            opened.id
        );
        assert!(
            found.clip == opened.clip,
            "end found {} clip rects instead of {}; every push_clip_rect needs a pop_clip_rect",
            found.clip,
            opened.clip
        );
        assert!(
            found.item_flags == opened.item_flags,
            "end found {} item flag entries instead of {}; every push_item_flag needs a pop_item_flag",
            found.item_flags,
            opened.item_flags
        );
        assert!(
            found.group == opened.group,
            "end found {} open groups instead of {}; every begin_group needs an end_group",
            found.group,
            opened.group
        );
        w.draw_list.pop_clip_rect();
        w.clip_rect = w.draw_list.clip_rect();
        let is_popup = w.is_popup();
        self.window_stack.pop();
        if is_popup {
            self.begin_popups.pop();
        }
        self.set_current_window(self.window_stack.last().copied());
    }

    /// Begin a scrolling region inside the current window.
    ///
    /// A size component `<= 0` is relative to the available content region
    /// (`0` fills it). `border` draws the child's frame.
    pub fn begin_child(&mut self, str_id: &str, size: Size, border: bool, flags: WindowFlags) -> WindowToken {
        let id = self.get_id(str_id);
        let parent = self.cur_window();
        let name = format!("{}/{}_{:08X}", parent.name, str_id, id.0);
        let flags = flags
            | WindowFlags::NO_TITLE_BAR
            | WindowFlags::NO_RESIZE
            | WindowFlags::NO_SAVED_SETTINGS
            | WindowFlags::CHILD_WINDOW
            | (parent.flags & WindowFlags::NO_MOVE);
        let avail = self.content_region_avail();
        let mut sz = Size::new(size.width.floor(), size.height.floor());
        if sz.width <= 0.0 {
            sz.width = (avail.x + sz.width).max(4.0);
        }
        if sz.height <= 0.0 {
            sz.height = (avail.y + sz.height).max(4.0);
        }

        let border_token = (!border).then(|| self.push_style_var(StyleVar::ChildBorderSize(0.0)));
        self.set_next_window_size(sz, Cond::Always);
        let token = self.begin(&name, flags);
        if let Some(t) = border_token {
            self.pop_style(t);
        }
        let h = token.window;
        let w = self.windows.at_mut(h);
        w.child_id = id;
        // Activating the child from the parent enters it right away.
        let navigable = w.dc.nav_layer_active_mask != 0 || w.dc.nav_has_scroll;
        if self.nav.activate_id == id && navigable {
            self.focus_window(Some(h));
            self.nav_init_window(h, false);
            self.set_active_id(Id(id.0.wrapping_add(1)), Some(h));
            self.active_id_source = InputSource::Nav;
        }
        token
    }

    /// Close a [`begin_child`](Self::begin_child) and lay it out as an item of the parent.
    pub fn end_child(&mut self, token: WindowToken) {
        let h = token.window;
        let w = self.windows.at(h);
        assert!(
            w.is_child() && !w.is_popup(),
            "end_child called for a window not begun with begin_child"
        );
        if w.begin_count > 1 {
            self.end(token);
            return;
        }
        let size = w.size;
        let child_id = w.child_id;
        let navigable = w.dc.nav_layer_active_mask != 0 || w.dc.nav_has_scroll;
        let scroll_only = w.dc.nav_layer_active_mask == 0 && self.nav.window == Some(h);
        self.end(token);

        let cursor = self.cur_window().dc.cursor_pos;
        let bb = Rect::from_origin_size(cursor, size);
        self.item_size(size, 0.0);
        if navigable {
            self.item_add(bb, child_id, None);
            self.render_nav_highlight(bb, child_id, false);
            if scroll_only {
                let nav_id = self.nav.id;
                self.render_nav_highlight(bb.inflate(2.0, 2.0), nav_id, true);
            }
        } else {
            self.item_add(bb, Id::NONE, None);
        }
    }

    /// Drop a window that was not begun this frame, forgetting every reference to it.
    ///
    /// Returns `false` (and does nothing) for stale handles and windows that are
    /// active this frame.
    pub fn discard_window(&mut self, window: WindowHandle) -> bool {
        let Some(w) = self.windows.get(window) else {
            return false;
        };
        if w.active || self.window_stack.contains(&window) {
            return false;
        }
        let scrub = |slot: &mut Option<WindowHandle>| {
            if *slot == Some(window) {
                *slot = None;
            }
        };
        scrub(&mut self.hovered_window);
        scrub(&mut self.hovered_root_window);
        scrub(&mut self.moving_window);
        scrub(&mut self.render_front_most);
        if self.active_id_window == Some(window) {
            self.clear_active_id();
        }
        if self.nav.window == Some(window) {
            self.nav.window = None;
            self.nav.id = Id::NONE;
        }
        if let Some(i) = self
            .open_popups
            .iter()
            .position(|p| p.window == Some(window) || p.parent_window == window)
        {
            self.open_popups.truncate(i);
        }
        let others: Vec<WindowHandle> = self.windows.order().iter().copied().filter(|&o| o != window).collect();
        for other in others {
            let o = self.windows.at_mut(other);
            o.dc.child_windows.retain(|&c| c != window);
            scrub(&mut o.nav_last_child_nav_window);
            scrub(&mut o.parent);
            if o.root == Some(window) {
                o.root = Some(other);
            }
            if o.root_for_title_bar_highlight == Some(window) {
                o.root_for_title_bar_highlight = Some(other);
            }
        }
        let removed = self.windows.remove(window);
        tracing::debug!(?window, "window discarded");
        removed.is_some()
    }
}

/// Inputs of the first `begin` of a window in a frame.
struct BeginFrame<'a> {
    h: WindowHandle,
    name: &'a str,
    flags: WindowFlags,
    parent: Option<WindowHandle>,
    just_created: bool,
    just_activated: bool,
    just_appearing_after_hidden: bool,
    pos_set_by_api: bool,
    size_x_set_by_api: bool,
    size_y_set_by_api: bool,
    title_bar_height: f64,
    menu_bar_height: f64,
    bg_alpha: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(ctx: &mut Context) {
        ctx.input_mut().display_size = Size::new(800.0, 600.0);
        ctx.new_frame().unwrap();
    }

    #[test]
    fn best_pos_prefers_right_of_the_avoided_rect() {
        let outer = Rect::new(0.0, 0.0, 800.0, 600.0);
        let avoid = Rect::new(100.0, 100.0, 200.0, 120.0);
        let mut dir = None;
        let pos = find_best_window_pos(Point::new(100.0, 100.0), Size::new(50.0, 50.0), &mut dir, outer, avoid);
        assert_eq!(pos, Point::new(200.0, 100.0));
        assert_eq!(dir, Some(NavDir::Right));
    }

    #[test]
    fn best_pos_falls_back_inside_outer() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let avoid = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut dir = Some(NavDir::Down);
        let pos = find_best_window_pos(Point::new(90.0, 90.0), Size::new(50.0, 50.0), &mut dir, outer, avoid);
        assert_eq!(pos, Point::new(50.0, 50.0));
        assert_eq!(dir, None);
    }

    #[test]
    fn set_next_directives_apply_once() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        ctx.set_next_window_pos(Point::new(30.0, 40.0), Cond::Once);
        ctx.set_next_window_size(Size::new(200.0, 150.0), Cond::Once);
        let w = ctx.begin("Once", WindowFlags::empty());
        let h = w.window();
        assert!(w.is_visible());
        ctx.end(w);
        ctx.end_frame();
        assert_eq!(ctx.windows().get(h).unwrap().pos(), Point::new(30.0, 40.0));

        frame(&mut ctx);
        ctx.set_next_window_pos(Point::new(300.0, 300.0), Cond::Once);
        let w = ctx.begin("Once", WindowFlags::empty());
        ctx.end(w);
        ctx.end_frame();
        let win = ctx.windows().get(h).unwrap();
        assert_eq!(win.pos(), Point::new(30.0, 40.0));
        assert_eq!(win.size(), Size::new(200.0, 150.0));
    }

    #[test]
    fn appending_keeps_first_flags_and_counts_begins() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let w = ctx.begin("Twice", WindowFlags::NO_TITLE_BAR);
        let h = w.window();
        ctx.end(w);
        let w = ctx.begin("Twice", WindowFlags::empty());
        ctx.end(w);
        let win = ctx.windows().get(h).unwrap();
        assert_eq!(win.flags(), WindowFlags::NO_TITLE_BAR);
        assert_eq!(win.begin_count, 2);
        ctx.end_frame();
    }

    #[test]
    fn child_windows_follow_their_parent() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        ctx.set_next_window_pos(Point::new(10.0, 10.0), Cond::Always);
        ctx.set_next_window_size(Size::new(300.0, 200.0), Cond::Always);
        let w = ctx.begin("Parent", WindowFlags::empty());
        let parent = w.window();
        let c = ctx.begin_child("list", Size::new(0.0, 100.0), true, WindowFlags::empty());
        let child = c.window();
        ctx.end_child(c);
        ctx.end(w);
        ctx.end_frame();
        let cw = ctx.windows().get(child).unwrap();
        assert_eq!(cw.parent(), Some(parent));
        assert_eq!(cw.root(), Some(parent));
        assert_eq!(cw.size().height, 100.0);
        assert!(cw.name().starts_with("Parent/list_"));
        assert_eq!(ctx.windows().get(parent).unwrap().child_windows(), &[child]);
        let order = ctx.windows().order();
        let pi = order.iter().position(|&x| x == parent).unwrap();
        assert_eq!(order.get(pi + 1), Some(&child));
    }

    #[test]
    #[should_panic(expected = "end does not match the innermost begin")]
    fn mismatched_window_tokens_panic() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let a = ctx.begin("A", WindowFlags::empty());
        let b = ctx.begin("B", WindowFlags::empty());
        ctx.end(a);
        ctx.end(b);
    }

    #[test]
    fn discard_only_idle_windows() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let w = ctx.begin("Gone", WindowFlags::empty());
        let h = w.window();
        ctx.end(w);
        assert!(!ctx.discard_window(h), "active windows stay");
        ctx.end_frame();
        frame(&mut ctx);
        ctx.end_frame();
        assert!(ctx.discard_window(h));
        assert!(ctx.windows().get(h).is_none());
        assert!(!ctx.discard_window(h));
    }

    #[test]
    #[should_panic(expected = "every push_id needs a pop_id")]
    fn id_pushed_inside_a_window_must_be_popped_before_end() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let w = ctx.begin("Leaky", WindowFlags::empty());
        let _leak = ctx.push_id("row");
        ctx.end(w);
    }

    #[test]
    #[should_panic(expected = "every push_id needs a pop_id")]
    fn id_pushed_at_top_level_is_caught_by_end_frame() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let _leak = ctx.push_id("row");
        ctx.end_frame();
    }

    #[test]
    #[should_panic(expected = "every push_clip_rect needs a pop_clip_rect")]
    fn clip_pushed_inside_a_window_must_be_popped_before_end() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let w = ctx.begin("Leaky", WindowFlags::empty());
        let _leak = ctx.push_clip_rect(Point::new(0.0, 0.0), Point::new(50.0, 50.0), true);
        ctx.end(w);
    }

    #[test]
    #[should_panic(expected = "every push_item_flag needs a pop_item_flag")]
    fn item_flag_pushed_inside_a_window_must_be_popped_before_end() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let w = ctx.begin("Leaky", WindowFlags::empty());
        let _leak = ctx.push_item_flag(ItemFlags::DISABLED, true);
        ctx.end(w);
    }

    #[test]
    #[should_panic(expected = "every begin_group needs an end_group")]
    fn group_opened_inside_a_window_must_be_closed_before_end() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let w = ctx.begin("Leaky", WindowFlags::empty());
        let _leak = ctx.begin_group();
        ctx.end(w);
    }

    #[test]
    #[should_panic(expected = "every push_style_* needs a pop_style")]
    fn style_pushed_during_a_frame_must_be_popped_by_end_frame() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let w = ctx.begin("Leaky", WindowFlags::empty());
        let _leak = ctx.push_style_color(StyleColor::Text, Color::BLACK);
        ctx.end(w);
        ctx.end_frame();
    }

    #[test]
    fn balanced_scopes_leave_only_the_outer_clip_after_end() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let w = ctx.begin("Tidy", WindowFlags::empty());
        let h = w.window();
        let id = ctx.push_id("row");
        let clip = ctx.push_clip_rect(Point::new(0.0, 0.0), Point::new(800.0, 600.0), true);
        let c = ctx.begin_child("inner", Size::new(0.0, 40.0), false, WindowFlags::empty());
        let g = ctx.begin_group();
        ctx.end_group(g);
        ctx.end_child(c);
        ctx.pop_clip_rect(clip);
        ctx.pop_id(id);
        ctx.end(w);
        let w = ctx.begin("Tidy", WindowFlags::empty());
        ctx.end(w);
        ctx.end_frame();
        assert_eq!(ctx.windows().get(h).unwrap().draw_list().clip_rect_depth(), 1);
    }
}
