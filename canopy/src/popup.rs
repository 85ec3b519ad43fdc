// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popup, modal and tooltip windows.
//!
//! Two stacks track popups. `open_popups` persists between frames and lists the
//! chain of popups the user opened; `begin_popups` mirrors the popups begun so
//! far in the current frame. A popup at begin depth `d` is shown while
//! `open_popups[d]` names it.

use canopy_input::MouseButton;
use canopy_nav::NavLayer;
use kurbo::{Point, Rect, Vec2};

use crate::begin::WindowToken;
use crate::context::{Context, NextWindowData};
use crate::flags::{Cond, HoveredFlags, WindowFlags};
use crate::id::Id;
use crate::registry::WindowHandle;

/// One entry of the popup stacks.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PopupRef {
    pub popup_id: Id,
    /// Resolved at the popup's first `begin`.
    pub window: Option<WindowHandle>,
    pub parent_window: WindowHandle,
    pub open_frame: i64,
    pub open_parent_id: Id,
    pub open_popup_pos: Point,
    pub open_mouse_pos: Point,
    /// Rectangle the popup should not cover, such as the item that opened it.
    pub anchor: Option<Rect>,
}

/// Scope of an open popup, tooltip or modal.
#[must_use = "hand the token back to Context::end_popup"]
#[derive(Debug, PartialEq, Eq)]
pub struct PopupToken {
    pub(crate) window: WindowToken,
}

impl PopupToken {
    /// Popup window.
    pub fn window(&self) -> WindowHandle {
        self.window.window()
    }
}

pub(crate) const POPUP_FLAGS: WindowFlags = WindowFlags::ALWAYS_AUTO_RESIZE
    .union(WindowFlags::NO_TITLE_BAR)
    .union(WindowFlags::NO_SAVED_SETTINGS);

impl Context {
    /// Mark the popup `str_id` of the current window as open.
    pub fn open_popup(&mut self, str_id: &str) {
        let id = self.get_id(str_id);
        self.open_popup_ex(id, None);
    }

    /// Like [`open_popup`](Self::open_popup), placing the popup so that it avoids `anchor`.
    pub fn open_popup_with_anchor(&mut self, str_id: &str, anchor: Rect) {
        let id = self.get_id(str_id);
        self.open_popup_ex(id, Some(anchor));
    }

    pub(crate) fn open_popup_ex(&mut self, id: Id, anchor: Option<Rect>) {
        let parent = self.cur();
        let level = self.begin_popups.len();
        let open_popup_pos = self.nav_calc_preferred_ref_pos();
        let open_mouse_pos = if self.input.is_mouse_pos_valid() {
            self.input.mouse_pos()
        } else {
            open_popup_pos
        };
        let popup = PopupRef {
            popup_id: id,
            window: None,
            parent_window: parent,
            open_frame: self.frame_count,
            open_parent_id: self.windows.at(parent).id_stack.last().copied().unwrap_or(Id::NONE),
            open_popup_pos,
            open_mouse_pos,
            anchor,
        };
        if self.open_popups.len() <= level {
            tracing::debug!(?id, level, "popup opened");
            self.open_popups.push(popup);
            return;
        }
        let existing = &mut self.open_popups[level];
        if existing.popup_id == id && existing.open_frame == self.frame_count - 1 {
            // Opened every frame: keep the entry and its window.
            existing.open_frame = self.frame_count;
            if anchor.is_some() {
                existing.anchor = anchor;
            }
        } else {
            tracing::debug!(?id, level, "popup replaced");
            self.open_popups.truncate(level + 1);
            self.open_popups[level] = popup;
        }
    }

    /// Whether popup `str_id` of the current window is open at the current depth.
    pub fn is_popup_open(&self, str_id: &str) -> bool {
        self.is_popup_id_open(self.get_id(str_id))
    }

    pub(crate) fn is_popup_id_open(&self, id: Id) -> bool {
        self.open_popups
            .get(self.begin_popups.len())
            .is_some_and(|p| p.popup_id == id)
    }

    /// Number of popups currently open.
    pub fn open_popup_count(&self) -> usize {
        self.open_popups.len()
    }

    /// Close every popup from `remaining` up, focusing whatever is below.
    pub fn close_popup_to_level(&mut self, remaining: usize) {
        if remaining >= self.open_popups.len() {
            return;
        }
        let below = if remaining > 0 {
            let p = &self.open_popups[remaining - 1];
            p.window.filter(|&h| self.windows.is_alive(h)).or(Some(p.parent_window))
        } else {
            Some(self.open_popups[0].parent_window)
        };
        let focus = below.filter(|&h| self.windows.is_alive(h));
        tracing::debug!(remaining, closed = self.open_popups.len() - remaining, "popups closed");
        self.open_popups.truncate(remaining);
        let Some(mut focus) = focus else {
            self.focus_window(None);
            return;
        };
        if self.nav.layer == NavLayer::Main {
            focus = self.nav_restore_last_child_nav_window(focus);
        }
        self.focus_window(Some(focus));
        self.windows.at_mut(focus).dc.nav_hide_highlight_one_frame = true;
    }

    /// Close the popup being built, along with the child menus it opened from.
    pub fn close_current_popup(&mut self) {
        let Some(mut idx) = self.begin_popups.len().checked_sub(1) else {
            return;
        };
        let same = self
            .open_popups
            .get(idx)
            .is_some_and(|p| p.popup_id == self.begin_popups[idx].popup_id);
        if !same {
            return;
        }
        while idx > 0
            && self.open_popups[idx]
                .window
                .and_then(|h| self.windows.get(h))
                .is_some_and(|w| w.flags.contains(WindowFlags::CHILD_MENU))
        {
            idx -= 1;
        }
        self.close_popup_to_level(idx);
    }

    /// Close the popups stacked above `window`'s chain.
    ///
    /// Popups that belong to the same root as `window`, and child menus, stay open.
    pub(crate) fn close_popups_over_window(&mut self, window: Option<WindowHandle>) {
        if self.open_popups.is_empty() {
            return;
        }
        let mut n = 0;
        if let Some(root) = window.and_then(|h| self.windows.get(h)).and_then(|w| w.root) {
            while n < self.open_popups.len() {
                let Some(pw) = self.open_popups[n].window.and_then(|h| self.windows.get(h)) else {
                    n += 1;
                    continue;
                };
                if pw.flags.contains(WindowFlags::CHILD_MENU) {
                    n += 1;
                    continue;
                }
                let has_focus = self.open_popups[n..].iter().any(|p| {
                    p.window
                        .and_then(|h| self.windows.get(h))
                        .is_some_and(|w| w.root == Some(root))
                });
                if !has_focus {
                    break;
                }
                n += 1;
            }
        }
        if n < self.open_popups.len() {
            self.close_popup_to_level(n);
        }
    }

    /// Drop popups whose parent window was not submitted last frame.
    pub(crate) fn close_unreachable_popups(&mut self) {
        let first_dead = self.open_popups.iter().position(|p| {
            self.windows
                .get(p.parent_window)
                .is_none_or(|w| !w.was_active)
        });
        if let Some(level) = first_dead {
            tracing::debug!(level, "unreachable popups closed");
            self.open_popups.truncate(level);
        }
    }

    pub(crate) fn begin_popup_ex(&mut self, id: Id, flags: WindowFlags) -> Option<PopupToken> {
        if !self.is_popup_id_open(id) {
            self.next_window = NextWindowData::default();
            return None;
        }
        let name = if flags.contains(WindowFlags::CHILD_MENU) {
            format!("##Menu_{:02}", self.begin_popups.len())
        } else {
            format!("##Popup_{:08x}", id.0)
        };
        let token = self.begin(&name, flags | WindowFlags::POPUP);
        if !token.is_visible() {
            self.end(token);
            return None;
        }
        Some(PopupToken { window: token })
    }

    /// Begin popup `str_id` if it is open.
    pub fn begin_popup(&mut self, str_id: &str, flags: WindowFlags) -> Option<PopupToken> {
        if self.open_popups.len() <= self.begin_popups.len() {
            self.next_window = NextWindowData::default();
            return None;
        }
        let id = self.get_id(str_id);
        self.begin_popup_ex(id, flags | POPUP_FLAGS)
    }

    /// Begin the modal popup `name` if it is open; it is centred on the display when it appears.
    pub fn begin_popup_modal(&mut self, name: &str, flags: WindowFlags) -> Option<PopupToken> {
        let id = self.get_id(name);
        if !self.is_popup_id_open(id) {
            self.next_window = NextWindowData::default();
            return None;
        }
        if self.next_window.pos.is_none() {
            let center = (self.raw.display_size.to_vec2() * 0.5).to_point();
            self.set_next_window_pos_pivot(center, Cond::Appearing, Vec2::new(0.5, 0.5));
        }
        let token = self.begin(
            name,
            flags | WindowFlags::POPUP | WindowFlags::MODAL | WindowFlags::NO_COLLAPSE | WindowFlags::NO_SAVED_SETTINGS,
        );
        if !token.is_visible() {
            self.end(token);
            return None;
        }
        Some(PopupToken { window: token })
    }

    /// Open a popup when the last item is clicked with `button`, and begin it while open.
    ///
    /// `str_id` defaults to the last item's id.
    pub fn begin_popup_context_item(&mut self, str_id: Option<&str>, button: MouseButton) -> Option<PopupToken> {
        let id = match str_id {
            Some(s) => self.get_id(s),
            None => self.cur_window().dc.last_item_id,
        };
        assert!(id.is_some(), "context popups need an id; pass one for items without an id");
        if self.input.is_mouse_clicked(button, false) && self.is_item_hovered(HoveredFlags::ALLOW_WHEN_BLOCKED_BY_POPUP) {
            let anchor = self.cur_window().dc.last_item_rect;
            self.open_popup_ex(id, Some(anchor));
        }
        self.begin_popup_ex(id, POPUP_FLAGS)
    }

    /// Close the popup scope opened by a `begin_popup*` call.
    pub fn end_popup(&mut self, token: PopupToken) {
        assert!(
            self.windows.at(token.window.window).is_popup(),
            "end_popup called for a window that is not a popup"
        );
        assert!(!self.begin_popups.is_empty(), "end_popup without a begun popup");
        self.end(token.window);
    }

    /// Begin a tooltip near the mouse; submit its contents and call [`end_tooltip`](Self::end_tooltip).
    pub fn begin_tooltip(&mut self) -> WindowToken {
        let flags = WindowFlags::TOOLTIP
            | WindowFlags::NO_INPUTS
            | WindowFlags::NO_TITLE_BAR
            | WindowFlags::NO_MOVE
            | WindowFlags::NO_RESIZE
            | WindowFlags::NO_SAVED_SETTINGS
            | WindowFlags::ALWAYS_AUTO_RESIZE
            | WindowFlags::NO_NAV;
        self.begin("##Tooltip_00", flags)
    }

    /// Close the tooltip scope.
    pub fn end_tooltip(&mut self, token: WindowToken) {
        assert!(
            self.windows.at(token.window).is_tooltip(),
            "end_tooltip called for a window that is not a tooltip"
        );
        self.end(token);
    }

    /// Show `text` in a tooltip this frame.
    pub fn set_tooltip(&mut self, text: &str) {
        let token = self.begin_tooltip();
        self.text(text);
        self.end_tooltip(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn frame(ctx: &mut Context) {
        ctx.input_mut().display_size = Size::new(800.0, 600.0);
        ctx.new_frame().unwrap();
    }

    /// Submits window "Host" with popup "outer" containing popup "inner".
    fn host_frame(ctx: &mut Context, open_outer: bool, open_inner: bool) -> (bool, bool) {
        frame(ctx);
        let w = ctx.begin("Host", WindowFlags::empty());
        if open_outer {
            ctx.open_popup("outer");
        }
        let mut shown = (false, false);
        if let Some(outer) = ctx.begin_popup("outer", WindowFlags::empty()) {
            shown.0 = true;
            ctx.text("outer");
            if open_inner {
                ctx.open_popup("inner");
            }
            if let Some(inner) = ctx.begin_popup("inner", WindowFlags::empty()) {
                shown.1 = true;
                ctx.text("inner");
                ctx.end_popup(inner);
            }
            ctx.end_popup(outer);
        }
        ctx.end(w);
        ctx.end_frame();
        shown
    }

    #[test]
    fn nested_popups_stay_open_until_closed_to_a_level() {
        let mut ctx = Context::new();
        assert_eq!(host_frame(&mut ctx, true, true), (true, true));
        assert_eq!(host_frame(&mut ctx, false, false), (true, true));
        assert_eq!(ctx.open_popup_count(), 2);

        ctx.close_popup_to_level(1);
        assert_eq!(ctx.open_popup_count(), 1);
        assert_eq!(host_frame(&mut ctx, false, false), (true, false));

        ctx.close_popup_to_level(0);
        assert_eq!(ctx.open_popup_count(), 0);
        assert_eq!(host_frame(&mut ctx, false, false), (false, false));
    }

    #[test]
    fn reopening_keeps_the_caller_anchor() {
        let mut ctx = Context::new();
        host_frame(&mut ctx, true, false);
        ctx.close_popup_to_level(0);
        frame(&mut ctx);
        let w = ctx.begin("Host", WindowFlags::empty());
        let anchor = Rect::new(100.0, 100.0, 160.0, 120.0);
        ctx.open_popup_with_anchor("outer", anchor);
        assert_eq!(ctx.open_popup_count(), 1);
        assert_eq!(ctx.open_popups[0].anchor, Some(anchor));
        ctx.end(w);
        ctx.end_frame();
    }

    #[test]
    fn close_current_popup_from_inside() {
        let mut ctx = Context::new();
        host_frame(&mut ctx, true, false);
        frame(&mut ctx);
        let w = ctx.begin("Host", WindowFlags::empty());
        let p = ctx.begin_popup("outer", WindowFlags::empty()).unwrap();
        ctx.close_current_popup();
        ctx.end_popup(p);
        ctx.end(w);
        ctx.end_frame();
        assert_eq!(ctx.open_popup_count(), 0);
    }

    #[test]
    fn focusing_the_host_closes_its_popups() {
        let mut ctx = Context::new();
        host_frame(&mut ctx, true, false);
        let host = ctx.windows().find(Id::from_str_seeded("Host", Id::NONE)).unwrap();
        ctx.focus_window(Some(host));
        assert_eq!(host_frame(&mut ctx, false, false), (false, false));
        assert_eq!(ctx.open_popup_count(), 0);
    }

    #[test]
    fn popups_of_vanished_windows_close() {
        let mut ctx = Context::new();
        host_frame(&mut ctx, true, false);
        frame(&mut ctx);
        ctx.end_frame();
        frame(&mut ctx);
        ctx.end_frame();
        assert_eq!(ctx.open_popup_count(), 0);
    }
}
