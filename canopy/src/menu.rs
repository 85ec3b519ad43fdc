// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu bars, menus and menu items.

use canopy_nav::{NavDir, NavForward, NavLayer};
use kurbo::{Point, Rect, Size, Vec2};

use crate::context::{ClipToken, Context, IdToken};
use crate::flags::{Cond, SelectableOptions, SelectableRole, WindowFlags};
use crate::id::display_text;
use crate::layout::GroupToken;
use crate::popup::{POPUP_FLAGS, PopupToken};
use crate::style::{StyleColor, StyleVar};
use crate::window::LayoutType;

/// Scope of a [`Context::begin_menu_bar`].
#[must_use = "hand the token back to Context::end_menu_bar"]
#[derive(Debug, PartialEq, Eq)]
pub struct MenuBarToken {
    group: GroupToken,
    id: IdToken,
    clip: ClipToken,
}

/// Scope of an open menu from [`Context::begin_menu`].
#[must_use = "hand the token back to Context::end_menu"]
#[derive(Debug, PartialEq, Eq)]
pub struct MenuToken {
    popup: PopupToken,
}

/// `p` lies strictly on the same side of all three edges.
fn triangle_contains_point(a: Point, b: Point, c: Point, p: Point) -> bool {
    let side = |from: Point, to: Point| (p.x - from.x) * (to.y - from.y) - (p.y - from.y) * (to.x - from.x) < 0.0;
    let b1 = side(b, a);
    let b2 = side(c, b);
    let b3 = side(a, c);
    b1 == b2 && b2 == b3
}

impl Context {
    /// Start appending to the menu bar of the current window.
    ///
    /// Returns `None` when the window has no [`WindowFlags::MENU_BAR`] or is skipping items.
    pub fn begin_menu_bar(&mut self) -> Option<MenuBarToken> {
        let h = self.cur();
        let w = self.windows.at(h);
        if w.skip_items || !w.flags.contains(WindowFlags::MENU_BAR) {
            return None;
        }
        assert!(!w.dc.menu_bar_appending, "begin_menu_bar called twice without end_menu_bar");

        let group = self.begin_group();
        let id = self.push_id("##menubar");
        let w = self.windows.at(h);
        let bar = w.menu_bar_rect();
        let clip = Rect::new(
            (bar.x0 + 0.5).floor(),
            (bar.y0 + w.window_border_size + 0.5).floor(),
            (bar.x0.max(bar.x1 - w.window_rounding) + 0.5).floor(),
            (bar.y1 + 0.5).floor(),
        )
        .intersect(w.outer_rect_clipped);
        let clip = self.push_clip_rect(clip.origin(), Point::new(clip.x1, clip.y1), false);

        let dc = &mut self.windows.at_mut(h).dc;
        dc.cursor_pos = Point::new(bar.x0 + dc.menu_bar_offset_x, bar.y0);
        dc.layout_type = LayoutType::Horizontal;
        dc.nav_layer_current = NavLayer::Menu;
        dc.menu_bar_appending = true;
        self.align_text_to_frame_padding();
        Some(MenuBarToken { group, id, clip })
    }

    /// Finish the menu bar.
    pub fn end_menu_bar(&mut self, token: MenuBarToken) {
        let h = self.cur();
        assert!(
            self.windows.at(h).dc.menu_bar_appending,
            "end_menu_bar without a matching begin_menu_bar"
        );

        // A sideways move that found nothing inside one of our menus moves to the sibling menu.
        let dir = self.nav.move_dir.filter(|d| matches!(d, NavDir::Left | NavDir::Right));
        let in_child_menu = self
            .nav
            .window
            .and_then(|nw| self.windows.get(nw))
            .is_some_and(|nw| nw.flags.contains(WindowFlags::CHILD_MENU));
        if let (Some(dir), Some(nav_window)) = (dir, self.nav.window)
            && in_child_menu
            && self.nav.move_request_but_no_result_yet()
        {
            let mut earliest = nav_window;
            if let Some(p) = self.windows.at(earliest).parent
                && self.windows.at(p).flags.contains(WindowFlags::CHILD_MENU)
            {
                earliest = p;
            }
            let e = self.windows.at(earliest);
            if e.parent == Some(h) && e.dc.parent_layout_type == LayoutType::Horizontal && self.nav.forward == NavForward::None {
                self.focus_window(Some(h));
                let w = self.windows.at(h);
                let layer = NavLayer::Menu;
                let (id, rel) = (w.nav_last_ids[layer.index()], w.nav_rect_rel[layer.index()]);
                self.set_nav_id_with_rect_rel(id, layer, rel);
                self.nav.layer = layer;
                // Hide the intermediate selection for this frame.
                self.nav.disable_highlight = true;
                self.nav.forward = NavForward::Queued(dir);
                self.nav.move_request_cancel();
                tracing::trace!(?dir, "nav move forwarded to sibling menu");
            }
        }

        let MenuBarToken { group, id, clip } = token;
        self.pop_clip_rect(clip);
        self.pop_id(id);
        let w = self.windows.at_mut(h);
        let bar_x0 = w.menu_bar_rect().x0;
        w.dc.menu_bar_offset_x = w.dc.cursor_pos.x - bar_x0;
        if let Some(g) = w.dc.group_stack.last_mut() {
            g.advance_cursor = false;
        }
        self.end_group(group);
        let dc = &mut self.windows.at_mut(h).dc;
        dc.layout_type = LayoutType::Vertical;
        dc.nav_layer_current = NavLayer::Main;
        dc.menu_bar_appending = false;
    }

    /// Menu entry that opens a sub-menu popup while hovered or clicked.
    ///
    /// Submit the menu's items and call [`end_menu`](Self::end_menu) when this returns a token.
    /// A disabled menu is drawn dimmed and closes if it was open.
    pub fn begin_menu(&mut self, label: &str, enabled: bool) -> Option<MenuToken> {
        let h = self.cur();
        if self.windows.at(h).skip_items {
            return None;
        }
        let id = self.get_id(label);
        let label_size = self.calc_text_size(display_text(label));
        let spacing = self.style.item_spacing;
        let level = self.begin_popups.len();

        let mut menu_is_open = self.is_popup_id_open(id);
        let w = self.windows.at(h);
        let stack_top = w.id_stack.last().copied();
        let menuset_is_open = !w.flags.contains(WindowFlags::POPUP)
            && self
                .open_popups
                .get(level)
                .is_some_and(|p| Some(p.open_parent_id) == stack_top);
        // Hovering across the menus of one bar works while any of them is open.
        let backed_nav_window = self.nav.window;
        if menuset_is_open {
            self.nav.window = Some(h);
        }

        let pos = self.windows.at(h).dc.cursor_pos;
        let layout = self.windows.at(h).dc.layout_type;
        let options = SelectableOptions {
            dont_close_popups: true,
            disabled: !enabled,
            ..SelectableOptions::default()
        };
        let (popup_pos, pressed) = if layout == LayoutType::Horizontal {
            // Selectables extend by half the item spacing on each side; match that in the bar.
            let w = self.windows.at_mut(h);
            let popup_pos = Point::new(
                pos.x - w.window_padding.x,
                pos.y - self.style.frame_padding.y + w.menu_bar_height,
            );
            w.dc.cursor_pos.x += (spacing.x * 0.5).floor();
            let t = self.push_style_var(StyleVar::ItemSpacing(spacing * 2.0));
            let options = SelectableOptions {
                size: Size::new(label_size.width, 0.0),
                ..options
            };
            let pressed = self.selectable_ex(label, menu_is_open, options, SelectableRole::Menu, false);
            self.pop_style(t);
            self.windows.at_mut(h).dc.cursor_pos.x += (spacing.x * (-1.0 + 0.5)).floor();
            (popup_pos, pressed)
        } else {
            let popup_pos = Point::new(pos.x, pos.y - self.style.window_padding.y);
            let font_size = self.font_size;
            let width = self
                .windows
                .at_mut(h)
                .menu_columns
                .decl_columns(label_size.width, 0.0, (font_size * 1.20).floor());
            let extra_w = (self.content_region_avail().x - width).max(0.0);
            let options = SelectableOptions {
                size: Size::new(width, 0.0),
                ..options
            };
            let pressed = self.selectable_ex(label, menu_is_open, options, SelectableRole::Menu, true);
            let dimmed = (!enabled).then(|| self.style.colors[StyleColor::TextDisabled.index()]);
            let t = dimmed.map(|c| self.push_style_color(StyleColor::Text, c));
            let arrow_x = self.windows.at(h).menu_columns.pos(2) + extra_w + font_size * 0.30;
            self.render_arrow(pos + Vec2::new(arrow_x, 0.0), NavDir::Right, 1.0);
            if let Some(t) = t {
                self.pop_style(t);
            }
            (popup_pos, pressed)
        };

        let item_rect = self.windows.at(h).dc.last_item_rect;
        let hovered = enabled && self.item_hoverable(item_rect, id);
        if menuset_is_open {
            self.nav.window = backed_nav_window;
        }

        let mut want_open = false;
        let mut want_close = false;
        if layout == LayoutType::Vertical {
            // While the mouse travels towards the open child menu, hovering other items
            // does not close it.
            let mut moving_within_opened_triangle = false;
            let w = self.windows.at(h);
            let child_popup = self
                .open_popups
                .get(level)
                .filter(|p| p.parent_window == h)
                .and_then(|p| p.window)
                .and_then(|c| self.windows.get(c));
            if self.hovered_window == Some(h)
                && !w.flags.contains(WindowFlags::MENU_BAR)
                && let Some(next) = child_popup
            {
                let r = next.rect();
                let mouse = self.input.mouse_pos();
                let mut ta = mouse - self.input.mouse_delta();
                let right = w.pos.x < next.pos.x;
                let (mut tb, mut tc) = if right {
                    (Point::new(r.x0, r.y0), Point::new(r.x0, r.y1))
                } else {
                    (Point::new(r.x1, r.y0), Point::new(r.x1, r.y1))
                };
                let extra = ((ta.x - tb.x).abs() * 0.30).clamp(5.0, 30.0);
                ta.x += if right { -0.5 } else { 0.5 };
                tb.y = ta.y + ((tb.y - extra) - ta.y).max(-100.0);
                tc.y = ta.y + ((tc.y + extra) - ta.y).min(100.0);
                moving_within_opened_triangle = triangle_contains_point(ta, tb, tc, mouse);
            }
            want_close = menu_is_open
                && !hovered
                && self.hovered_window == Some(h)
                && self.hovered_id_prev.is_some()
                && self.hovered_id_prev != id
                && !moving_within_opened_triangle;
            want_open = !menu_is_open && hovered && (!moving_within_opened_triangle || pressed);

            if self.nav.activate_id == id {
                want_close = menu_is_open;
                want_open = !menu_is_open;
            }
            if self.nav.id == id && self.nav.move_request && self.nav.move_dir == Some(NavDir::Right) {
                want_open = true;
                self.nav.move_request_cancel();
            }
        } else if menu_is_open && pressed && menuset_is_open {
            // Clicking an open menu of the bar closes it.
            want_close = true;
            want_open = false;
            menu_is_open = false;
        } else if pressed || (hovered && menuset_is_open && !menu_is_open) {
            want_open = true;
        } else if self.nav.id == id && self.nav.move_request && self.nav.move_dir == Some(NavDir::Down) {
            want_open = true;
            self.nav.move_request_cancel();
        }

        if !enabled {
            want_close = true;
        }
        if want_close && self.is_popup_id_open(id) {
            self.close_popup_to_level(level);
        }

        if !menu_is_open && want_open && self.open_popups.len() > level {
            // Another menu of this level is open: replace it and show ours next frame.
            self.open_popup_ex(id, None);
            return None;
        }
        if want_open {
            menu_is_open = true;
            self.open_popup_ex(id, None);
        }
        if !menu_is_open {
            return None;
        }

        self.set_next_window_pos(popup_pos, Cond::Always);
        let mut flags = POPUP_FLAGS | WindowFlags::CHILD_MENU;
        if self.windows.at(h).flags.intersects(WindowFlags::POPUP | WindowFlags::CHILD_MENU) {
            flags |= WindowFlags::CHILD_WINDOW;
        }
        self.begin_popup_ex(id, flags).map(|popup| MenuToken { popup })
    }

    /// Close the menu opened by the matching [`begin_menu`](Self::begin_menu).
    pub fn end_menu(&mut self, token: MenuToken) {
        let h = self.cur();
        // A Left move that failed inside our child menu closes that child.
        let nav_in_child = self
            .nav
            .window
            .and_then(|nw| self.windows.get(nw))
            .is_some_and(|nw| nw.parent == Some(h));
        if nav_in_child
            && self.nav.move_dir == Some(NavDir::Left)
            && self.nav.move_request_but_no_result_yet()
            && self.windows.at(h).dc.layout_type == LayoutType::Vertical
        {
            let level = self.open_popups.len().saturating_sub(1);
            self.close_popup_to_level(level);
            self.nav.move_request_cancel();
        }
        self.end_popup(token.popup);
    }

    /// Menu entry; `true` when activated. Inside a menu, `shortcut` is shown right-aligned
    /// and `selected` draws a check mark.
    pub fn menu_item(&mut self, label: &str, shortcut: Option<&str>, selected: bool, enabled: bool) -> bool {
        let h = self.cur();
        if self.windows.at(h).skip_items {
            return false;
        }
        let label_size = self.calc_text_size(display_text(label));
        let spacing = self.style.item_spacing;
        let pos = self.windows.at(h).dc.cursor_pos;
        let options = SelectableOptions {
            disabled: !enabled,
            ..SelectableOptions::default()
        };

        if self.windows.at(h).dc.layout_type == LayoutType::Horizontal {
            // Same spacing as a menu of the bar.
            self.windows.at_mut(h).dc.cursor_pos.x += (spacing.x * 0.5).floor();
            let t = self.push_style_var(StyleVar::ItemSpacing(spacing * 2.0));
            let options = SelectableOptions {
                size: Size::new(label_size.width, 0.0),
                ..options
            };
            let pressed = self.selectable_ex(label, false, options, SelectableRole::MenuItem, false);
            self.pop_style(t);
            self.windows.at_mut(h).dc.cursor_pos.x += (spacing.x * (-1.0 + 0.5)).floor();
            return pressed;
        }

        let shortcut_w = shortcut.map_or(0.0, |s| self.calc_text_size(s).width);
        let font_size = self.font_size;
        let width = self
            .windows
            .at_mut(h)
            .menu_columns
            .decl_columns(label_size.width, shortcut_w, (font_size * 1.20).floor());
        let extra_w = (self.content_region_avail().x - width).max(0.0);
        let options = SelectableOptions {
            size: Size::new(width, 0.0),
            ..options
        };
        let pressed = self.selectable_ex(label, false, options, SelectableRole::MenuItem, true);
        let columns = self.windows.at(h).menu_columns.clone();
        if let Some(s) = shortcut.filter(|_| shortcut_w > 0.0) {
            let disabled = self.style.colors[StyleColor::TextDisabled.index()];
            let t = self.push_style_color(StyleColor::Text, disabled);
            self.render_text(pos + Vec2::new(columns.pos(1) + extra_w, 0.0), s, false);
            self.pop_style(t);
        }
        if selected {
            let slot = if enabled { StyleColor::Text } else { StyleColor::TextDisabled };
            let col = self.style.color(slot);
            let at = pos + Vec2::new(columns.pos(2) + extra_w + font_size * 0.40, font_size * 0.134 * 0.5);
            self.render_check_mark(at, col, font_size * 0.866);
        }
        pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_input::{Key, MouseButton};

    use crate::flags::ConfigFlags;
    use crate::id::Id;

    #[test]
    fn triangle_hit_test() {
        let (a, b, c) = (Point::new(0.0, 0.0), Point::new(10.0, -10.0), Point::new(10.0, 10.0));
        assert!(triangle_contains_point(a, b, c, Point::new(5.0, 0.0)));
        assert!(triangle_contains_point(a, c, b, Point::new(5.0, 0.0)));
        assert!(!triangle_contains_point(a, b, c, Point::new(-1.0, 0.0)));
        assert!(!triangle_contains_point(a, b, c, Point::new(5.0, 8.0)));
    }

    struct Ui {
        file: Rect,
        quit: Option<Rect>,
        quit_pressed: bool,
    }

    fn run(ctx: &mut Context, mouse: Point, down: bool) -> Ui {
        let io = ctx.input_mut();
        io.display_size = Size::new(800.0, 600.0);
        io.delta_time = 1.0 / 60.0;
        io.mouse_pos = mouse;
        io.set_mouse_down(MouseButton::Left, down);
        ctx.new_frame().unwrap();

        let mut ui = Ui {
            file: Rect::ZERO,
            quit: None,
            quit_pressed: false,
        };
        ctx.set_next_window_pos(Point::new(0.0, 0.0), Cond::Always);
        ctx.set_next_window_size(Size::new(300.0, 200.0), Cond::Always);
        let w = ctx.begin("App", WindowFlags::MENU_BAR);
        if let Some(bar) = ctx.begin_menu_bar() {
            if let Some(menu) = ctx.begin_menu("File", true) {
                ctx.menu_item("New", Some("Ctrl+N"), false, true);
                ui.quit_pressed = ctx.menu_item("Quit", None, false, true);
                ui.quit = Some(ctx.last_item_rect());
                ctx.end_menu(menu);
            }
            // Back in the bar, the last item is the menu entry itself.
            ui.file = ctx.last_item_rect();
            ctx.end_menu_bar(bar);
        }
        ctx.text("body");
        ctx.end(w);
        ctx.end_frame();
        ui
    }

    #[test]
    fn menu_bar_lays_out_in_the_bar() {
        let mut ctx = Context::new();
        let ui = run(&mut ctx, Point::new(250.0, 150.0), false);
        // The title bar is font size + 2 * frame padding tall; the bar follows it.
        let title = 13.0 + 6.0;
        assert!(ui.file.y0 <= title && ui.file.y1 > title);
        assert!(ui.quit.is_none());
        assert_eq!(ctx.open_popup_count(), 0);
    }

    #[test]
    fn clicking_a_menu_opens_it_and_an_item_closes_it() {
        let mut ctx = Context::new();
        let away = Point::new(250.0, 150.0);
        let file = run(&mut ctx, away, false).file.center();

        let ui = run(&mut ctx, file, true);
        assert_eq!(ctx.open_popup_count(), 1);
        assert!(ui.quit.is_some());

        // Let the menu measure and place itself.
        run(&mut ctx, file, false);
        let quit = run(&mut ctx, file, false).quit.unwrap().center();
        assert_eq!(ctx.open_popup_count(), 1);

        let ui = run(&mut ctx, quit, true);
        assert!(!ui.quit_pressed);
        let ui = run(&mut ctx, quit, false);
        assert!(ui.quit_pressed);
        assert_eq!(ctx.open_popup_count(), 0);
    }

    #[test]
    fn disabled_menu_never_opens() {
        let mut ctx = Context::new();
        let io = ctx.input_mut();
        io.display_size = Size::new(800.0, 600.0);
        ctx.new_frame().unwrap();
        let w = ctx.begin("Bar", WindowFlags::MENU_BAR);
        let bar = ctx.begin_menu_bar().unwrap();
        assert!(ctx.begin_menu("Edit", false).is_none());
        ctx.end_menu_bar(bar);
        ctx.end(w);
        ctx.end_frame();
        assert_eq!(ctx.open_popup_count(), 0);
    }

    #[test]
    fn sideways_move_with_no_target_in_a_menu_is_forwarded_to_the_bar() {
        let mut ctx = Context::new();
        ctx.config_mut().flags |= ConfigFlags::NAV_ENABLE_KEYBOARD;
        let file = run(&mut ctx, Point::new(250.0, 150.0), false).file.center();
        run(&mut ctx, file, true);
        run(&mut ctx, file, false);
        run(&mut ctx, file, false);
        assert_eq!(ctx.open_popup_count(), 1);
        let menu = ctx.nav_window().unwrap();
        assert!(ctx.windows().get(menu).unwrap().flags().contains(WindowFlags::CHILD_MENU));

        // The menu's items are all below, so a move right finds nothing inside it.
        ctx.input_mut().set_key_down(Key::RightArrow, true);
        run(&mut ctx, file, false);
        ctx.input_mut().set_key_down(Key::RightArrow, false);
        assert_eq!(ctx.nav.forward, NavForward::Queued(NavDir::Right));
        let app = ctx.windows().find(Id::from_str_seeded("App", Id::NONE)).unwrap();
        assert_eq!(ctx.nav_window(), Some(app));
        assert_eq!(ctx.nav.layer, NavLayer::Menu);

        // The next nav pass turns the forward into the move request, once.
        run(&mut ctx, file, false);
        assert!(!ctx.nav.forward.is_queued());
        assert!(ctx.nav.forward_active);
        assert_eq!(ctx.nav.move_dir, Some(NavDir::Right));
        run(&mut ctx, file, false);
        assert!(!ctx.nav.forward_active);
        assert_eq!(ctx.nav.move_dir, None);
    }
}
