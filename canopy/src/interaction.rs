// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover, active and focus arbitration between items and windows.

use canopy_input::{Modifiers, MouseButton, NavInput, NavReadMode};
use canopy_nav::TabHit;
use kurbo::Rect;

use crate::context::{Context, InputSource};
use crate::flags::{
    ButtonOptions, ButtonResponse, FocusedFlags, HoveredFlags, ItemFlags, ItemStatusFlags, PressFlags, WindowFlags,
};
use crate::id::Id;
use crate::registry::WindowHandle;

/// Strict overlap test; touching edges do not overlap.
pub(crate) fn rect_overlaps(a: Rect, b: Rect) -> bool {
    a.y0 < b.y1 && a.y1 > b.y0 && a.x0 < b.x1 && a.x1 > b.x0
}

impl Context {
    /// Give `id` ownership of the mouse (or nav activation) for `window`.
    pub fn set_active_id(&mut self, id: Id, window: Option<WindowHandle>) {
        self.active_id_is_just_activated = self.active_id != id;
        if self.active_id_is_just_activated {
            self.active_id_timer = 0.0;
            tracing::trace!(?id, "active id changed");
        }
        self.active_id = id;
        self.active_id_allow_overlap = false;
        self.active_id_window = window;
        if id.is_some() {
            self.active_id_is_alive = true;
            self.active_id_source = if self.nav.activate_id == id || self.nav.input_id == id || self.nav.just_tabbed_id == id
            {
                InputSource::Nav
            } else {
                InputSource::Mouse
            };
        } else {
            self.active_id_source = InputSource::None;
        }
    }

    /// Drop the active id.
    pub fn clear_active_id(&mut self) {
        self.set_active_id(Id::NONE, None);
    }

    pub(crate) fn set_hovered_id(&mut self, id: Id) {
        self.hovered_id = id;
        self.hovered_id_allow_overlap = false;
        if id.is_some() && self.hovered_id_prev != id {
            self.hovered_id_timer = 0.0;
        }
    }

    /// Mark `id` as still submitted this frame, so it keeps the active id.
    pub fn keep_alive_id(&mut self, id: Id) {
        if self.active_id == id {
            self.active_id_is_alive = true;
        }
    }

    /// Let items submitted after the last one steal its hover.
    pub fn set_item_allow_overlap(&mut self) {
        let last = self.cur_window().dc.last_item_id;
        if self.hovered_id == last {
            self.hovered_id_allow_overlap = true;
        }
        if self.active_id == last {
            self.active_id_allow_overlap = true;
        }
    }

    /// Mouse inside `rect`, clipped to the current window unless `clip` is false.
    pub fn is_mouse_hovering_rect(&self, rect: Rect, clip: bool) -> bool {
        let mut r = rect;
        if clip {
            r = r.intersect(self.clip_rect());
        }
        let pad = self.style.touch_extra_padding;
        let r = r.inflate(pad.x, pad.y);
        self.input.is_mouse_pos_valid() && r.contains(self.input.mouse_pos())
    }

    /// Whether items of `window` may react to the mouse, given the focused popup or modal.
    pub(crate) fn is_window_content_hoverable(&self, window: WindowHandle, flags: HoveredFlags) -> bool {
        let Some(nav_window) = self.nav.window.filter(|&h| self.windows.is_alive(h)) else {
            return true;
        };
        let Some(focused_root) = self.windows.at(nav_window).root else {
            return true;
        };
        if Some(focused_root) == self.windows.at(window).root {
            return true;
        }
        let root = self.windows.at(focused_root);
        if root.is_modal() {
            return false;
        }
        !(root.is_popup() && !flags.contains(HoveredFlags::ALLOW_WHEN_BLOCKED_BY_POPUP))
    }

    /// Whether `window` is `parent` or one of its descendants.
    pub fn is_window_child_of(&self, window: WindowHandle, parent: WindowHandle) -> bool {
        if self.windows.get(window).and_then(|w| w.root) == Some(parent) {
            return true;
        }
        let mut cursor = Some(window);
        while let Some(h) = cursor {
            if h == parent {
                return true;
            }
            cursor = self.windows.get(h).and_then(|w| w.parent);
        }
        false
    }

    /// Topmost open modal popup.
    pub fn front_most_modal(&self) -> Option<WindowHandle> {
        self.open_popups
            .iter()
            .rev()
            .filter_map(|p| p.window)
            .find(|&h| self.windows.get(h).is_some_and(|w| w.is_modal()))
    }

    /// Focus `window` (or nothing) and bring its root to the front.
    pub fn focus_window(&mut self, window: Option<WindowHandle>) {
        if self.nav.window != window {
            tracing::debug!(?window, "focus changed");
            self.nav.window = window;
            self.nav.init_request = false;
            self.nav.id = window.map_or(Id::NONE, |h| self.windows.at(h).nav_last_ids[0]);
            self.nav.id_is_alive = false;
            self.nav.layer = canopy_nav::NavLayer::Main;
        }
        let Some(h) = window else { return };
        let root = self.windows.at(h).root.unwrap_or(h);
        let root_window = self.windows.at(root);
        if root_window.is_popup()
            && self.active_id.is_some()
            && self
                .active_id_window
                .and_then(|aw| self.windows.get(aw))
                .is_some_and(|aw| aw.root != Some(root))
        {
            self.clear_active_id();
        }
        if !self.windows.at(root).flags.contains(WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS) {
            self.windows.bring_to_front(root);
        }
    }

    /// Focus the frontmost window that was visible last frame, skipping `ignore`.
    pub(crate) fn focus_front_most_active_window(&mut self, ignore: Option<WindowHandle>) {
        let found = self.windows.iter().rev().find_map(|(h, w)| {
            (Some(h) != ignore && w.was_active && !w.is_child()).then_some(h)
        });
        if let Some(h) = found {
            let target = self.nav_restore_last_child_nav_window(h);
            self.focus_window(Some(target));
        }
    }

    /// Record an item of `rect` for layout queries, navigation and clipping.
    ///
    /// Returns `false` when the item is clipped and should not be drawn.
    pub fn item_add(&mut self, rect: Rect, id: Id, nav_rect: Option<Rect>) -> bool {
        let h = self.cur();
        if id.is_some() {
            self.nav_process_item(h, nav_rect.unwrap_or(rect), id);
            self.keep_alive_id(id);
        }
        let w = self.windows.at_mut(h);
        w.write_accessed = true;
        w.dc.last_item_id = id;
        w.dc.last_item_rect = rect;
        w.dc.last_item_status_flags = ItemStatusFlags::empty();
        let layer = w.dc.nav_layer_current;
        w.dc.nav_layer_active_mask_next |= 1 << layer.index();
        if id.is_some() && self.focusable_item_register(h, id) {
            self.windows.at_mut(h).dc.last_item_status_flags |= ItemStatusFlags::FOCUSED_BY_TAB;
        }

        let clip = self.windows.at(h).clip_rect;
        if !rect_overlaps(rect, clip) && (id.is_none() || id != self.active_id) {
            return false;
        }
        if self.is_mouse_hovering_rect(rect, false) {
            self.windows.at_mut(h).dc.last_item_status_flags |= ItemStatusFlags::HOVERED_RECT;
        }
        true
    }

    fn focusable_item_register(&mut self, h: WindowHandle, id: Id) -> bool {
        let w = self.windows.at_mut(h);
        let flags = w.dc.item_flags;
        let tab_stop = flags & (ItemFlags::ALLOW_KEYBOARD_FOCUS | ItemFlags::DISABLED) == ItemFlags::ALLOW_KEYBOARD_FOCUS;
        let hit = w.focus.register(tab_stop);
        match hit {
            TabHit::Miss => false,
            TabHit::Requested | TabHit::Tabbed => {
                if hit == TabHit::Tabbed {
                    self.nav.just_tabbed_id = id;
                }
                self.set_focus_id(id, h);
                self.nav.disable_highlight = false;
                true
            }
        }
    }

    /// Claim hover for `id` when nothing else holds it and the mouse is over `rect`.
    pub fn item_hoverable(&mut self, rect: Rect, id: Id) -> bool {
        if self.hovered_id.is_some() && self.hovered_id != id && !self.hovered_id_allow_overlap {
            return false;
        }
        let h = self.cur();
        if self.hovered_window != Some(h) {
            return false;
        }
        if self.active_id.is_some() && self.active_id != id && !self.active_id_allow_overlap {
            return false;
        }
        if !self.is_mouse_hovering_rect(rect, true) {
            return false;
        }
        if self.nav.disable_mouse_hover {
            return false;
        }
        if !self.is_window_content_hoverable(h, HoveredFlags::empty()) {
            return false;
        }
        if self.windows.at(h).dc.item_flags.contains(ItemFlags::DISABLED) {
            return false;
        }
        self.set_hovered_id(id);
        true
    }

    /// Press/hold/release logic shared by every clickable item.
    pub fn button_behavior(&mut self, rect: Rect, id: Id, options: ButtonOptions) -> ButtonResponse {
        let h = self.cur();
        let item_flags = self.windows.at(h).dc.item_flags;
        if options.disabled || item_flags.contains(ItemFlags::DISABLED) {
            if self.active_id == id {
                self.clear_active_id();
            }
            return ButtonResponse::default();
        }
        let press = PressFlags::from_options(&options);
        let repeat = options.repeat || item_flags.contains(ItemFlags::BUTTON_REPEAT);

        let backup_hovered_window = self.hovered_window;
        let flatten = options.flatten_children && self.hovered_root_window == Some(h);
        if flatten {
            self.hovered_window = Some(h);
        }
        let mut hovered = self.item_hoverable(rect, id);
        if flatten {
            self.hovered_window = backup_hovered_window;
        }

        let mut pressed = false;
        if hovered {
            let no_modifiers = (self.input.modifiers() & (Modifiers::CTRL | Modifiers::SHIFT | Modifiers::ALT)).is_empty();
            if !options.no_key_modifiers || no_modifiers {
                let left = self.input.button(MouseButton::Left);
                let (clicked, double_clicked, released) = (left.clicked, left.double_clicked, left.released);
                if press.on_click_release && clicked {
                    self.set_active_id(id, Some(h));
                    if !options.no_nav_focus {
                        self.set_focus_id(id, h);
                    }
                    self.focus_window(Some(h));
                }
                if (press.on_click && clicked) || (press.on_double_click && double_clicked) {
                    pressed = true;
                    if press.no_holding_active_id {
                        self.clear_active_id();
                    } else {
                        self.set_active_id(id, Some(h));
                        self.active_id_click_offset = self.input.mouse_pos() - rect.origin();
                    }
                    if !options.no_nav_focus {
                        self.set_focus_id(id, h);
                    }
                    self.focus_window(Some(h));
                }
                if press.on_release && released {
                    let held_long = self.input.button(MouseButton::Left).down_duration_prev >= self.input.config.key_repeat_delay;
                    if !(repeat && held_long) {
                        pressed = true;
                    }
                    self.clear_active_id();
                }
                let left = self.input.button(MouseButton::Left);
                if repeat && self.active_id == id && left.down_duration > 0.0 && self.input.is_mouse_clicked(MouseButton::Left, true) {
                    pressed = true;
                }
            }
            if pressed {
                self.nav.disable_highlight = true;
            }
        }

        if self.nav.id == id
            && !self.nav.disable_highlight
            && self.nav.disable_mouse_hover
            && (self.active_id.is_none() || self.active_id == id || self.active_id == self.windows.at(h).move_id)
        {
            hovered = true;
        }

        if self.nav.activate_down_id == id {
            let by_code = self.nav.activate_id == id;
            let mode = if repeat { NavReadMode::Repeat } else { NavReadMode::Pressed };
            let by_inputs = self.input.is_nav_input_pressed(NavInput::Activate, mode);
            if by_code || by_inputs {
                pressed = true;
            }
            if by_code || by_inputs || self.active_id == id {
                self.nav.activate_id = id;
                self.set_active_id(id, Some(h));
            }
        }

        let mut held = false;
        if self.active_id == id {
            match self.active_id_source {
                InputSource::Mouse => {
                    if self.active_id_is_just_activated {
                        self.active_id_click_offset = self.input.mouse_pos() - rect.origin();
                    }
                    if self.input.is_mouse_down(MouseButton::Left) {
                        held = true;
                    } else {
                        if hovered && press.on_click_release {
                            let held_long =
                                self.input.button(MouseButton::Left).down_duration_prev >= self.input.config.key_repeat_delay;
                            if !(repeat && held_long) {
                                pressed = true;
                            }
                        }
                        self.clear_active_id();
                    }
                    if !options.no_nav_focus {
                        self.nav.disable_highlight = true;
                    }
                }
                InputSource::Nav => {
                    if self.nav.activate_down_id != id {
                        self.clear_active_id();
                    }
                }
                InputSource::None => {}
            }
        }

        ButtonResponse { pressed, hovered, held }
    }

    /// Last item is hovered and reachable.
    pub fn is_item_hovered(&self, flags: HoveredFlags) -> bool {
        let w = self.cur_window();
        if self.nav.disable_mouse_hover && !self.nav.disable_highlight {
            return self.is_item_focused();
        }
        if !w.dc.last_item_status_flags.contains(ItemStatusFlags::HOVERED_RECT) {
            return false;
        }
        if !flags.contains(HoveredFlags::ALLOW_WHEN_OVERLAPPED) && self.hovered_root_window != w.root {
            return false;
        }
        if !flags.contains(HoveredFlags::ALLOW_WHEN_BLOCKED_BY_ACTIVE_ITEM)
            && self.active_id.is_some()
            && self.active_id != w.dc.last_item_id
            && !self.active_id_allow_overlap
            && self.active_id != w.move_id
        {
            return false;
        }
        if !self.is_window_content_hoverable(self.cur(), flags) {
            return false;
        }
        if w.dc.item_flags.contains(ItemFlags::DISABLED) {
            return false;
        }
        // The title bar stands in as the first item until something else is submitted.
        !(w.dc.last_item_id == w.move_id && w.write_accessed)
    }

    /// Last item holds the active id.
    pub fn is_item_active(&self) -> bool {
        self.active_id.is_some() && self.active_id == self.cur_window().dc.last_item_id
    }

    /// Last item is under the navigation cursor.
    pub fn is_item_focused(&self) -> bool {
        let w = self.cur_window();
        self.nav.id.is_some()
            && !self.nav.disable_highlight
            && self.nav.id == w.dc.last_item_id
            && self.nav.window == self.current_window
    }

    /// Last item was clicked with `button` this frame.
    pub fn is_item_clicked(&self, button: MouseButton) -> bool {
        self.input.is_mouse_clicked(button, false) && self.is_item_hovered(HoveredFlags::empty())
    }

    /// Rectangle of the last item.
    pub fn last_item_rect(&self) -> Rect {
        self.cur_window().dc.last_item_rect
    }

    /// Current window (or a relative selected by `flags`) is under the mouse.
    pub fn is_window_hovered(&self, flags: HoveredFlags) -> bool {
        let h = self.cur();
        let root = self.windows.at(h).root;
        if flags.contains(HoveredFlags::ANY_WINDOW) {
            if self.hovered_window.is_none() {
                return false;
            }
        } else {
            let ok = match (
                flags.contains(HoveredFlags::ROOT_WINDOW),
                flags.contains(HoveredFlags::CHILD_WINDOWS),
            ) {
                (true, true) => self.hovered_root_window == root,
                (true, false) => self.hovered_window == root,
                (false, true) => self.hovered_window.is_some_and(|hw| self.is_window_child_of(hw, h)),
                (false, false) => self.hovered_window == Some(h),
            };
            if !ok {
                return false;
            }
        }
        let Some(hovered_root) = self.hovered_root_window else {
            return false;
        };
        if !self.is_window_content_hoverable(hovered_root, flags) {
            return false;
        }
        if !flags.contains(HoveredFlags::ALLOW_WHEN_BLOCKED_BY_ACTIVE_ITEM)
            && self.active_id.is_some()
            && !self.active_id_allow_overlap
            && self.hovered_window.is_some_and(|hw| self.windows.at(hw).move_id != self.active_id)
        {
            return false;
        }
        true
    }

    /// Current window (or a relative selected by `flags`) has focus.
    pub fn is_window_focused(&self, flags: FocusedFlags) -> bool {
        if flags.contains(FocusedFlags::ANY_WINDOW) {
            return self.nav.window.is_some();
        }
        let h = self.cur();
        let root = self.windows.at(h).root;
        let nav_root = self.nav.window.and_then(|nw| self.windows.get(nw)).and_then(|w| w.root);
        match (
            flags.contains(FocusedFlags::ROOT_WINDOW),
            flags.contains(FocusedFlags::CHILD_WINDOWS),
        ) {
            (true, true) => self.nav.window.is_some() && nav_root == root,
            (true, false) => self.nav.window == root,
            (false, true) => self.nav.window.is_some_and(|nw| self.is_window_child_of(nw, h)),
            (false, false) => self.nav.window == Some(h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Cond;
    use canopy_input::InputEvent;
    use kurbo::{Point, Size};

    fn frame(ctx: &mut Context, mouse: Point, down: bool) {
        let io = ctx.input_mut();
        io.display_size = Size::new(800.0, 600.0);
        io.mouse_pos = mouse;
        io.set_mouse_down(MouseButton::Left, down);
        ctx.new_frame().unwrap();
    }

    fn window_with_button(ctx: &mut Context) -> (bool, Rect) {
        ctx.set_next_window_pos(Point::new(10.0, 10.0), Cond::Always);
        ctx.set_next_window_size(Size::new(200.0, 100.0), Cond::Always);
        let w = ctx.begin("A", WindowFlags::empty());
        let pressed = ctx.button("OK");
        let rect = ctx.last_item_rect();
        ctx.end(w);
        ctx.end_frame();
        (pressed, rect)
    }

    #[test]
    fn click_fires_once_on_release() {
        let mut ctx = Context::new();
        frame(&mut ctx, Point::new(-100.0, -100.0), false);
        let (_, rect) = window_with_button(&mut ctx);
        let centre = rect.center();

        frame(&mut ctx, centre, true);
        let (pressed_down, _) = window_with_button(&mut ctx);
        assert!(!pressed_down);
        assert_eq!(ctx.active_id(), ctx.windows().iter().find(|(_, w)| w.name() == "A").map(|(_, w)| w.get_id("OK")).unwrap());

        frame(&mut ctx, centre, false);
        let (pressed_up, _) = window_with_button(&mut ctx);
        assert!(pressed_up);
        assert_eq!(ctx.active_id(), Id::NONE);

        frame(&mut ctx, centre, false);
        let (again, _) = window_with_button(&mut ctx);
        assert!(!again);
    }

    #[test]
    fn release_outside_does_not_fire() {
        let mut ctx = Context::new();
        frame(&mut ctx, Point::new(-100.0, -100.0), false);
        let (_, rect) = window_with_button(&mut ctx);
        frame(&mut ctx, rect.center(), true);
        window_with_button(&mut ctx);
        frame(&mut ctx, Point::new(700.0, 500.0), false);
        let (pressed, _) = window_with_button(&mut ctx);
        assert!(!pressed);
        assert_eq!(ctx.active_id(), Id::NONE);
    }

    #[test]
    fn stale_active_id_is_cleared() {
        let mut ctx = Context::new();
        frame(&mut ctx, Point::new(-100.0, -100.0), false);
        let (_, rect) = window_with_button(&mut ctx);
        frame(&mut ctx, rect.center(), true);
        window_with_button(&mut ctx);
        assert!(ctx.active_id().is_some());

        // The button stops being submitted while the mouse is still down.
        frame(&mut ctx, rect.center(), true);
        let w = ctx.begin("A", WindowFlags::empty());
        ctx.end(w);
        ctx.end_frame();
        frame(&mut ctx, rect.center(), true);
        assert_eq!(ctx.active_id(), Id::NONE);
        ctx.end_frame();
    }

    #[test]
    fn disabled_items_never_activate() {
        let mut ctx = Context::new();
        frame(&mut ctx, Point::new(-100.0, -100.0), false);
        let (_, rect) = window_with_button(&mut ctx);
        frame(&mut ctx, rect.center(), true);
        ctx.set_next_window_pos(Point::new(10.0, 10.0), Cond::Always);
        ctx.set_next_window_size(Size::new(200.0, 100.0), Cond::Always);
        let w = ctx.begin("A", WindowFlags::empty());
        let t = ctx.push_item_flag(ItemFlags::DISABLED, true);
        ctx.button("OK");
        ctx.pop_item_flag(t);
        ctx.end(w);
        ctx.end_frame();
        assert_eq!(ctx.hovered_id(), Id::NONE);
        assert_eq!(ctx.active_id(), Id::NONE);
    }

    #[test]
    fn press_and_release_queued_in_one_frame_click_once() {
        let mut ctx = Context::new();
        frame(&mut ctx, Point::new(-100.0, -100.0), false);
        let (_, rect) = window_with_button(&mut ctx);

        let io = ctx.input_mut();
        io.push_event(InputEvent::MousePos(rect.center()));
        io.push_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            down: true,
        });
        io.push_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            down: false,
        });
        let mut presses = 0;
        for _ in 0..4 {
            ctx.new_frame().unwrap();
            let (pressed, _) = window_with_button(&mut ctx);
            presses += usize::from(pressed);
        }
        assert_eq!(ctx.input_mut().queued_events(), 0);
        assert_eq!(presses, 1);
        assert_eq!(ctx.active_id(), Id::NONE);
    }

    #[test]
    fn disabling_the_active_item_releases_it() {
        let mut ctx = Context::new();
        frame(&mut ctx, Point::new(-100.0, -100.0), false);
        let (_, rect) = window_with_button(&mut ctx);
        frame(&mut ctx, rect.center(), true);
        window_with_button(&mut ctx);
        let ok = ctx.windows().iter().find(|(_, w)| w.name() == "A").map(|(_, w)| w.get_id("OK")).unwrap();
        assert_eq!(ctx.active_id(), ok);

        // Still held, but now submitted disabled.
        frame(&mut ctx, rect.center(), true);
        ctx.set_next_window_pos(Point::new(10.0, 10.0), Cond::Always);
        ctx.set_next_window_size(Size::new(200.0, 100.0), Cond::Always);
        let w = ctx.begin("A", WindowFlags::empty());
        let t = ctx.push_item_flag(ItemFlags::DISABLED, true);
        let pressed = ctx.button("OK");
        assert_eq!(ctx.active_id(), Id::NONE);
        ctx.pop_item_flag(t);
        ctx.end(w);
        ctx.end_frame();
        assert!(!pressed);

        // Releasing over it afterwards does not click.
        frame(&mut ctx, rect.center(), false);
        let (pressed, _) = window_with_button(&mut ctx);
        assert!(!pressed);
    }

    #[test]
    fn overlap_requires_opt_in() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_overlaps(a, Rect::new(5.0, 5.0, 20.0, 20.0)));
        assert!(!rect_overlaps(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
    }
}
