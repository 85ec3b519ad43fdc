// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard and gamepad navigation driver.
//!
//! A navigation pass runs once per frame from `new_frame`. It applies the result
//! of last frame's init or move request, reads cancel/activate/directional
//! inputs, and sets up the scoring rectangle. Items then score themselves in
//! [`Context::item_add`] against that rectangle while the frame is built.

use canopy_draw::Corners;
use canopy_input::{NavInput, NavReadMode};
use canopy_nav::{NavCandidate, NavDir, NavForward, NavLayer, NavMoveResult, NavScorer};
use kurbo::{Point, Rect, Vec2};

use crate::context::{Context, InputSource};
use crate::flags::{ConfigFlags, ItemFlags, WindowFlags};
use crate::id::Id;
use crate::registry::WindowHandle;
use crate::style::StyleColor;

/// Navigation state of a context.
#[derive(Clone, Debug)]
pub(crate) struct NavState {
    /// Focused window; keyboard input goes here.
    pub window: Option<WindowHandle>,
    /// Item under the navigation cursor.
    pub id: Id,
    pub activate_id: Id,
    pub activate_down_id: Id,
    pub activate_pressed_id: Id,
    pub input_id: Id,
    pub just_tabbed_id: Id,
    pub just_moved_to_id: Id,
    /// Tab index of the nav item, recorded while it is submitted.
    pub id_tab_counter: Option<i32>,
    pub id_is_alive: bool,
    pub layer: NavLayer,
    pub disable_highlight: bool,
    pub disable_mouse_hover: bool,
    pub active: bool,
    pub visible: bool,
    pub init_request: bool,
    pub init_request_from_move: bool,
    pub init_result_id: Id,
    pub init_result_rect_rel: Rect,
    pub move_request: bool,
    pub move_dir: Option<NavDir>,
    pub move_dir_last: Option<NavDir>,
    pub move_result: NavMoveResult<(Id, WindowHandle)>,
    /// Origin of this frame's move request, in screen space.
    pub scoring_rect: Rect,
    /// The nav item was already submitted this frame.
    pub id_seen: bool,
    pub forward: NavForward,
    /// The current move request was forwarded from last frame.
    pub forward_active: bool,
}

impl Default for NavState {
    fn default() -> Self {
        Self {
            window: None,
            id: Id::NONE,
            activate_id: Id::NONE,
            activate_down_id: Id::NONE,
            activate_pressed_id: Id::NONE,
            input_id: Id::NONE,
            just_tabbed_id: Id::NONE,
            just_moved_to_id: Id::NONE,
            id_tab_counter: None,
            id_is_alive: false,
            layer: NavLayer::Main,
            disable_highlight: true,
            disable_mouse_hover: false,
            active: false,
            visible: false,
            init_request: false,
            init_request_from_move: false,
            init_result_id: Id::NONE,
            init_result_rect_rel: Rect::ZERO,
            move_request: false,
            move_dir: None,
            move_dir_last: None,
            move_result: NavMoveResult::default(),
            scoring_rect: Rect::ZERO,
            id_seen: false,
            forward: NavForward::None,
            forward_active: false,
        }
    }
}

impl NavState {
    fn any_request(&self) -> bool {
        self.move_request || self.init_request
    }

    /// A move was requested and nothing has scored yet.
    pub(crate) fn move_request_but_no_result_yet(&self) -> bool {
        self.move_request && self.move_result.target.is_none()
    }

    pub(crate) fn move_request_cancel(&mut self) {
        self.move_request = false;
    }
}

fn rect_is_inverted(r: Rect) -> bool {
    r.x0 > r.x1 || r.y0 > r.y1
}

impl Context {
    /// Navigation pass of `new_frame`.
    pub(crate) fn nav_update(&mut self) {
        let nav = &mut self.nav;
        nav.just_tabbed_id = Id::NONE;
        nav.id_seen = false;
        if self.input.mouse_delta() != Vec2::ZERO {
            nav.disable_mouse_hover = false;
        }

        // Result of last frame's init request.
        if let Some(h) = self.nav.window.filter(|&h| self.windows.is_alive(h)) {
            let nav = &self.nav;
            if nav.init_result_id.is_some() && (!nav.disable_highlight || nav.init_request_from_move) {
                let (id, layer, rel) = (nav.init_result_id, nav.layer, nav.init_result_rect_rel);
                if nav.init_request_from_move {
                    self.set_nav_id_with_rect_rel(id, layer, rel);
                } else {
                    self.set_nav_id(id, layer);
                }
                self.windows.at_mut(h).nav_rect_rel[layer.index()] = rel;
            }
        }
        let nav = &mut self.nav;
        nav.init_request = false;
        nav.init_request_from_move = false;
        nav.init_result_id = Id::NONE;
        nav.just_moved_to_id = Id::NONE;

        // Result of last frame's move request.
        if self.nav.move_request && self.nav.move_result.target.is_some() {
            self.nav_apply_move_result();
        }
        if self.nav.forward_active {
            if self.nav.move_result.target.is_none() {
                self.nav.disable_highlight = false;
            }
            self.nav.forward_active = false;
        }

        // Remember the child the nav window was in, to return to it from the menu layer.
        if let Some(h) = self.nav.window.filter(|&h| self.windows.is_alive(h)) {
            self.nav_save_last_child_nav_window(h);
            if self.nav.layer == NavLayer::Main {
                self.windows.at_mut(h).nav_last_child_nav_window = None;
            }
        }

        let nav_window_flags = self
            .nav
            .window
            .and_then(|h| self.windows.get(h))
            .map(|w| w.flags);
        let accepts_inputs = nav_window_flags.is_some_and(|f| !f.contains(WindowFlags::NO_NAV_INPUTS));
        let enabled = self
            .config
            .flags
            .intersects(ConfigFlags::NAV_ENABLE_KEYBOARD | ConfigFlags::NAV_ENABLE_GAMEPAD);
        self.nav.active = enabled && accepts_inputs;
        self.nav.visible = self.nav.active && self.nav.id.is_some() && !self.nav.disable_highlight;

        if accepts_inputs && self.input.is_nav_input_pressed(NavInput::Menu, NavReadMode::Pressed) {
            self.nav_toggle_menu_layer();
        }
        if self.input.is_nav_input_pressed(NavInput::Cancel, NavReadMode::Pressed) {
            self.nav_cancel();
        }

        // Activation.
        let nav = &mut self.nav;
        nav.activate_id = Id::NONE;
        nav.activate_down_id = Id::NONE;
        nav.activate_pressed_id = Id::NONE;
        nav.input_id = Id::NONE;
        if nav.id.is_some() && !nav.disable_highlight && accepts_inputs {
            let down = self.input.is_nav_input_down(NavInput::Activate);
            let pressed = down && self.input.is_nav_input_pressed(NavInput::Activate, NavReadMode::Pressed);
            let free = self.active_id.is_none();
            let mine = free || self.active_id == nav.id;
            if free && pressed {
                nav.activate_id = nav.id;
            }
            if mine && down {
                nav.activate_down_id = nav.id;
            }
            if mine && pressed {
                nav.activate_pressed_id = nav.id;
            }
            if free && self.input.is_nav_input_pressed(NavInput::Input, NavReadMode::Pressed) {
                nav.input_id = nav.id;
            }
        }
        if nav_window_flags.is_some_and(|f| f.contains(WindowFlags::NO_NAV_INPUTS)) {
            nav.disable_highlight = true;
        }
        nav.move_request = false;

        // Directional request, either fresh or forwarded from last frame.
        match self.nav.forward.take() {
            Some(dir) => {
                self.nav.move_dir = Some(dir);
                self.nav.forward_active = true;
            }
            None => {
                self.nav.move_dir = None;
                if accepts_inputs && self.active_id.is_none() {
                    const DIRS: [(NavInput, NavDir); 4] = [
                        (NavInput::DpadLeft, NavDir::Left),
                        (NavInput::DpadRight, NavDir::Right),
                        (NavInput::DpadUp, NavDir::Up),
                        (NavInput::DpadDown, NavDir::Down),
                    ];
                    self.nav.move_dir = DIRS
                        .into_iter()
                        .find(|&(input, _)| self.input.is_nav_input_pressed(input, NavReadMode::Repeat))
                        .map(|(_, dir)| dir);
                }
            }
        }
        let nav = &mut self.nav;
        if nav.move_dir.is_some() {
            nav.move_request = true;
            nav.move_dir_last = nav.move_dir;
        }
        // Without a nav id, an init request is the fallback when the move finds nothing.
        if nav.move_request && nav.id.is_none() {
            nav.init_request = true;
            nav.init_request_from_move = true;
            nav.init_result_id = Id::NONE;
            nav.disable_highlight = false;
        }

        // Windows without navigable items scroll instead.
        if let Some(h) = self.nav.window.filter(|_| accepts_inputs && self.nav.move_request) {
            let speed = (self.font_size * 100.0 * self.input.delta_time() + 0.5).floor();
            let w = self.windows.at_mut(h);
            if w.dc.nav_layer_active_mask == 0 && w.dc.nav_has_scroll {
                match self.nav.move_dir {
                    Some(NavDir::Up) => w.scroll_target.y = (w.scroll.y - speed).max(0.0),
                    Some(NavDir::Down) => w.scroll_target.y = w.scroll.y + speed,
                    _ => {}
                }
                w.scroll_target_center_ratio.y = 0.0;
            }
        }

        self.nav.move_result.clear();

        // Score from a thin segment on the left edge of the current item.
        let rect = match self.nav.window.and_then(|h| self.windows.get(h)) {
            Some(w) => {
                let rel = w.nav_rect_rel[self.nav.layer.index()];
                let rel = if rect_is_inverted(rel) { Rect::ZERO } else { rel };
                rel + w.pos.to_vec2()
            }
            None => self.viewport_rect(),
        };
        let x = (rect.x0 + 1.0).min(rect.x1);
        self.nav.scoring_rect = Rect::new(x, rect.y0, x, rect.y1);
    }

    fn nav_apply_move_result(&mut self) {
        let Some((id, h)) = self.nav.move_result.target else {
            return;
        };
        if !self.windows.is_alive(h) {
            return;
        }
        let spacing_y = self.style.item_spacing.y;
        let abs = self.nav.move_result.rect;
        let mut rel = abs - self.windows.at(h).pos.to_vec2();
        if self.nav.layer == NavLayer::Main {
            let w = self.windows.at_mut(h);
            let delta = w.scroll_to_bring_rect_into_view(abs, spacing_y);
            rel = rel - delta;
            let parent = w.parent.filter(|_| w.is_child());
            if let Some(p) = parent {
                self.windows.at_mut(p).scroll_to_bring_rect_into_view(abs - delta, spacing_y);
            }
        }
        tracing::trace!(?id, "nav moved");
        self.nav.just_moved_to_id = id;
        self.clear_active_id();
        self.nav.window = Some(h);
        let layer = self.nav.layer;
        self.set_nav_id_with_rect_rel(id, layer, rel);
    }

    fn nav_cancel(&mut self) {
        if self.active_id.is_some() {
            self.clear_active_id();
            return;
        }
        let nav_window = self.nav.window.filter(|&h| self.windows.is_alive(h));
        if let Some(h) = nav_window {
            let w = self.windows.at(h);
            if w.is_child() && !w.is_popup() {
                if let Some(parent) = w.parent {
                    // Leave the child window for its parent.
                    let child_id = w.child_id;
                    self.focus_window(Some(parent));
                    self.set_nav_id(child_id, NavLayer::Main);
                    self.nav.id_is_alive = false;
                    return;
                }
            }
        }
        if let Some(top) = self.open_popups.last() {
            let modal = top
                .window
                .and_then(|h| self.windows.get(h))
                .is_some_and(|w| w.is_modal());
            if !modal {
                self.close_popup_to_level(self.open_popups.len() - 1);
            }
        } else if self.nav.layer != NavLayer::Main {
            self.nav_restore_layer(NavLayer::Main);
        } else {
            if let Some(h) = nav_window {
                let w = self.windows.at_mut(h);
                if w.is_popup() || !w.is_child() {
                    w.nav_last_ids[0] = Id::NONE;
                }
            }
            self.nav.id = Id::NONE;
        }
    }

    /// Switch between the main and menu layers of the focused window.
    fn nav_toggle_menu_layer(&mut self) {
        let Some(mut h) = self.nav.window.filter(|&h| self.windows.is_alive(h)) else {
            return;
        };
        // Climb out of plain child windows to the one owning a menu bar.
        loop {
            let w = self.windows.at(h);
            let has_menu = w.dc.nav_layer_active_mask & (1 << NavLayer::Menu.index()) != 0;
            let plain_child = w.is_child() && !w.flags.intersects(WindowFlags::POPUP | WindowFlags::CHILD_MENU);
            match w.parent {
                Some(p) if !has_menu && plain_child => h = p,
                _ => break,
            }
        }
        if self.nav.window != Some(h) {
            if let Some(old) = self.nav.window {
                self.nav_save_last_child_nav_window(old);
            }
            self.focus_window(Some(h));
        }
        self.nav.disable_highlight = false;
        self.nav.disable_mouse_hover = true;
        let has_menu = self.windows.at(h).dc.nav_layer_active_mask & (1 << NavLayer::Menu.index()) != 0;
        let layer = if has_menu { self.nav.layer.toggled() } else { NavLayer::Main };
        self.nav_restore_layer(layer);
    }

    pub(crate) fn nav_restore_layer(&mut self, layer: NavLayer) {
        self.nav.layer = layer;
        let Some(mut h) = self.nav.window else { return };
        if layer == NavLayer::Main {
            h = self.nav_restore_last_child_nav_window(h);
            self.nav.window = Some(h);
        }
        let w = self.windows.at(h);
        let last = w.nav_last_ids[0];
        if layer == NavLayer::Main && last.is_some() {
            let rel = w.nav_rect_rel[0];
            self.set_nav_id_with_rect_rel(last, layer, rel);
        } else {
            self.nav_init_window(h, true);
        }
    }

    fn nav_save_last_child_nav_window(&mut self, child: WindowHandle) {
        let mut parent = child;
        loop {
            let w = self.windows.at(parent);
            if !w.is_child() || w.flags.intersects(WindowFlags::POPUP | WindowFlags::CHILD_MENU) {
                break;
            }
            match w.parent {
                Some(p) => parent = p,
                None => break,
            }
        }
        if parent != child {
            self.windows.at_mut(parent).nav_last_child_nav_window = Some(child);
        }
    }

    /// Child window the user last navigated in under `window`, else `window`.
    pub(crate) fn nav_restore_last_child_nav_window(&self, window: WindowHandle) -> WindowHandle {
        self.windows
            .at(window)
            .nav_last_child_nav_window
            .filter(|&c| self.windows.is_alive(c))
            .unwrap_or(window)
    }

    /// Focus item `id` of `window`, as done by clicks and tab focus.
    pub(crate) fn set_focus_id(&mut self, id: Id, window: WindowHandle) {
        assert!(id.is_some(), "focus needs a non-zero id");
        if self.nav.window != Some(window) {
            self.nav.init_request = false;
        }
        let w = self.windows.at_mut(window);
        let layer = w.dc.nav_layer_current;
        self.nav.id = id;
        self.nav.window = Some(window);
        self.nav.layer = layer;
        w.nav_last_ids[layer.index()] = id;
        if w.dc.last_item_id == id {
            w.nav_rect_rel[layer.index()] = w.dc.last_item_rect - w.pos.to_vec2();
        }
        if self.active_id_source == InputSource::Nav {
            self.nav.disable_mouse_hover = true;
        } else {
            self.nav.disable_highlight = true;
        }
    }

    pub(crate) fn set_nav_id(&mut self, id: Id, layer: NavLayer) {
        self.nav.id = id;
        if let Some(w) = self.nav.window.and_then(|h| self.windows.get_mut(h)) {
            w.nav_last_ids[layer.index()] = id;
        }
    }

    pub(crate) fn set_nav_id_with_rect_rel(&mut self, id: Id, layer: NavLayer, rect_rel: Rect) {
        self.set_nav_id(id, layer);
        if let Some(w) = self.nav.window.and_then(|h| self.windows.get_mut(h)) {
            w.nav_rect_rel[layer.index()] = rect_rel;
        }
        self.nav.disable_highlight = false;
        self.nav.disable_mouse_hover = true;
    }

    /// Start navigation inside `window`: its first item (or last visited one) becomes the nav id.
    pub(crate) fn nav_init_window(&mut self, window: WindowHandle, force_reinit: bool) {
        let w = self.windows.at(window);
        if w.flags.contains(WindowFlags::NO_NAV_INPUTS) {
            return;
        }
        let init = !w.is_child() || w.is_popup() || w.nav_last_ids[0].is_none() || force_reinit;
        if init {
            let layer = self.nav.layer;
            self.set_nav_id(Id::NONE, layer);
            self.nav.init_request = true;
            self.nav.init_request_from_move = false;
            self.nav.init_result_id = Id::NONE;
            self.nav.init_result_rect_rel = Rect::ZERO;
        } else {
            self.nav.id = w.nav_last_ids[0];
        }
    }

    /// Offer item `id` of `window` to pending init and move requests, and track the nav item.
    pub(crate) fn nav_process_item(&mut self, window: WindowHandle, nav_bb: Rect, id: Id) {
        if self.nav.window != Some(window) || !(self.nav.id == id || self.nav.any_request()) {
            return;
        }
        let w = self.windows.at(window);
        let item_flags = w.dc.item_flags;
        let layer = w.dc.nav_layer_current;
        let rel = nav_bb - w.pos.to_vec2();
        let clip = w.clip_rect;
        let is_child_menu = w.flags.contains(WindowFlags::CHILD_MENU);
        let tab_index = w.focus.tab_counter() + 1;

        let nav = &mut self.nav;
        if nav.init_request && nav.layer == layer {
            let default_focus = !item_flags.contains(ItemFlags::NO_NAV_DEFAULT_FOCUS);
            if default_focus || nav.init_result_id.is_none() {
                nav.init_result_id = id;
                nav.init_result_rect_rel = rel;
            }
            if default_focus {
                nav.init_request = false;
            }
        }

        if nav.id != id && !item_flags.contains(ItemFlags::NO_NAV) && nav.move_request && nav.layer == layer {
            if let Some(dir) = nav.move_dir {
                let mut scorer = NavScorer::new(dir, nav.scoring_rect);
                scorer.allow_axial = layer == NavLayer::Menu && !is_child_menu;
                let mut candidate = NavCandidate::new((id, window), nav_bb, clip);
                candidate.precedes_origin = !nav.id_seen;
                scorer.score(&mut nav.move_result, candidate);
            }
        }

        if nav.id == id {
            nav.id_seen = true;
            nav.layer = layer;
            nav.id_is_alive = true;
            nav.id_tab_counter = Some(tab_index);
            self.windows.at_mut(window).nav_rect_rel[layer.index()] = rel;
        }
    }

    /// Anchor for popups and tooltips: the mouse, or the nav item when navigating without it.
    pub(crate) fn nav_calc_preferred_ref_pos(&self) -> Point {
        let nav_window = self.nav.window.and_then(|h| self.windows.get(h));
        match nav_window {
            Some(w) if !self.nav.disable_highlight && self.nav.disable_mouse_hover => {
                let rel = w.nav_rect_rel[self.nav.layer.index()];
                let fp = self.style.frame_padding;
                let pos = w.pos
                    + Vec2::new(
                        rel.x0 + (fp.x * 4.0).min(rel.width()),
                        rel.y1 - fp.y.min(rel.height()),
                    );
                let vp = self.viewport_rect();
                Point::new(pos.x.max(vp.x0).min(vp.x1).floor(), pos.y.max(vp.y0).min(vp.y1).floor())
            }
            _ => self.input.mouse_pos(),
        }
    }

    /// Outline `bb` when `id` is the nav item; `thin` draws a one-pixel frame on the rect itself.
    pub(crate) fn render_nav_highlight(&mut self, bb: Rect, id: Id, thin: bool) {
        if id != self.nav.id || self.nav.disable_highlight {
            return;
        }
        let col = self.style.color(StyleColor::NavHighlight);
        let rounding = self.style.frame_rounding;
        let w = self.cur_window_mut();
        if w.dc.nav_hide_highlight_one_frame {
            return;
        }
        let clip = w.clip_rect;
        let display = bb.intersect(clip);
        let list = &mut w.draw_list;
        if thin {
            list.add_rect(display.origin(), Point::new(display.x1, display.y1), col, rounding, Corners::all(), 1.0);
            return;
        }
        const THICKNESS: f64 = 2.0;
        const DISTANCE: f64 = 3.0 + THICKNESS * 0.5;
        let display = display.inflate(DISTANCE, DISTANCE);
        let fully_visible = clip.contains_rect(display);
        if !fully_visible {
            list.push_clip_rect(display.origin(), Point::new(display.x1, display.y1), false);
        }
        let half = THICKNESS * 0.5;
        list.add_rect(
            Point::new(display.x0 + half, display.y0 + half),
            Point::new(display.x1 - half, display.y1 - half),
            col,
            rounding,
            Corners::all(),
            THICKNESS,
        );
        if !fully_visible {
            list.pop_clip_rect();
        }
    }

    /// Make the last item the nav target when its window appears.
    pub fn set_item_default_focus(&mut self) {
        let h = self.cur();
        let w = self.windows.at(h);
        if !w.appearing || self.nav.window != Some(h) || !self.nav.init_request {
            return;
        }
        if self.nav.layer != w.dc.nav_layer_current {
            return;
        }
        self.nav.init_request = false;
        self.nav.init_result_id = w.dc.last_item_id;
        self.nav.init_result_rect_rel = w.dc.last_item_rect - w.pos.to_vec2();
        if !w.inner_clip_rect.contains_rect(w.dc.last_item_rect) {
            let spacing_y = self.style.item_spacing.y;
            let rect = self.windows.at(h).dc.last_item_rect;
            self.windows.at_mut(h).scroll_to_bring_rect_into_view(rect, spacing_y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_input::Key;
    use kurbo::Size;

    use crate::flags::Cond;

    fn frame(ctx: &mut Context, key: Option<Key>) {
        let io = ctx.input_mut();
        io.display_size = Size::new(800.0, 600.0);
        io.keys_down = [false; Key::COUNT];
        if let Some(k) = key {
            io.set_key_down(k, true);
        }
        ctx.new_frame().unwrap();
    }

    fn buttons(ctx: &mut Context) -> [bool; 3] {
        ctx.set_next_window_pos(Point::new(20.0, 20.0), Cond::Always);
        ctx.set_next_window_size(Size::new(200.0, 200.0), Cond::Always);
        let w = ctx.begin("Nav", WindowFlags::empty());
        let pressed = [ctx.button("A"), ctx.button("B"), ctx.button("C")];
        ctx.end(w);
        ctx.end_frame();
        pressed
    }

    fn keyboard_ctx() -> Context {
        let mut ctx = Context::new();
        ctx.config_mut().flags |= ConfigFlags::NAV_ENABLE_KEYBOARD;
        ctx
    }

    #[test]
    fn arrows_walk_down_and_space_activates() {
        let mut ctx = keyboard_ctx();
        frame(&mut ctx, None);
        buttons(&mut ctx);
        let window = ctx.windows().find(Id::from_str_seeded("Nav", Id::NONE)).unwrap();
        assert_eq!(ctx.nav_window(), Some(window));
        let id = |ctx: &Context, label: &str| ctx.windows().get(window).unwrap().get_id(label);

        // First press with no nav item lands on the first item.
        frame(&mut ctx, Some(Key::DownArrow));
        buttons(&mut ctx);
        frame(&mut ctx, None);
        buttons(&mut ctx);
        assert_eq!(ctx.nav_id(), id(&ctx, "A"));

        frame(&mut ctx, Some(Key::DownArrow));
        buttons(&mut ctx);
        frame(&mut ctx, None);
        buttons(&mut ctx);
        assert_eq!(ctx.nav_id(), id(&ctx, "B"));

        frame(&mut ctx, Some(Key::Space));
        assert_eq!(buttons(&mut ctx), [false, true, false]);
        frame(&mut ctx, None);
        assert_eq!(buttons(&mut ctx), [false, false, false]);
    }

    #[test]
    fn escape_clears_the_nav_id() {
        let mut ctx = keyboard_ctx();
        frame(&mut ctx, None);
        buttons(&mut ctx);
        frame(&mut ctx, Some(Key::DownArrow));
        buttons(&mut ctx);
        frame(&mut ctx, None);
        buttons(&mut ctx);
        assert!(ctx.nav_id().is_some());
        frame(&mut ctx, Some(Key::Escape));
        buttons(&mut ctx);
        assert!(ctx.nav_id().is_none());
    }

    #[test]
    fn forwarded_request_is_consumed_once() {
        let mut ctx = keyboard_ctx();
        frame(&mut ctx, None);
        buttons(&mut ctx);
        ctx.nav.forward = NavForward::Queued(NavDir::Down);
        frame(&mut ctx, None);
        assert!(ctx.nav.move_request);
        assert_eq!(ctx.nav.move_dir, Some(NavDir::Down));
        assert!(!ctx.nav.forward.is_queued());
        buttons(&mut ctx);
        frame(&mut ctx, None);
        assert!(!ctx.nav.move_request);
        buttons(&mut ctx);
    }

    #[test]
    fn tab_cycles_through_items() {
        let mut ctx = keyboard_ctx();
        frame(&mut ctx, None);
        buttons(&mut ctx);
        let window = ctx.windows().find(Id::from_str_seeded("Nav", Id::NONE)).unwrap();
        frame(&mut ctx, Some(Key::Tab));
        buttons(&mut ctx);
        frame(&mut ctx, None);
        buttons(&mut ctx);
        assert_eq!(ctx.nav_id(), ctx.windows().get(window).unwrap().get_id("A"));
        frame(&mut ctx, Some(Key::Tab));
        buttons(&mut ctx);
        frame(&mut ctx, None);
        buttons(&mut ctx);
        assert_eq!(ctx.nav_id(), ctx.windows().get(window).unwrap().get_id("B"));
    }
}
