// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame boundaries: [`Context::new_frame`], [`Context::end_frame`] and [`Context::render`].

use canopy_draw::{DrawData, DrawDataBuilder, DrawLayer, DrawListSharedData};
use canopy_input::{Key, Modifiers, MouseButton};
use kurbo::{Point, Rect, Size, Vec2};

use crate::begin::set_window_pos;
use crate::context::Context;
use crate::error::{FrameError, validate_frame};
use crate::flags::{Cond, ConfigFlags, WindowFlags};
use crate::id::Id;
use crate::registry::{WindowHandle, WindowRegistry};
use crate::window::Window;

/// Name of the window that catches widgets submitted outside any `begin`.
const IMPLICIT_WINDOW_NAME: &str = "Debug##Default";

impl Context {
    /// Start a frame from the input written through [`input_mut`](Self::input_mut).
    ///
    /// Nothing changes when the frame parameters are unusable; fix them and call
    /// again. A default-sized implicit window is begun so widgets can be submitted
    /// right away.
    pub fn new_frame(&mut self) -> Result<(), FrameError> {
        validate_frame(self.raw.delta_time, self.raw.display_size)?;
        assert!(
            !self.within_frame || self.frame_count_ended == self.frame_count,
            "new_frame called twice without end_frame"
        );
        let dt = self.raw.delta_time;
        self.frame_count += 1;
        self.time += dt;

        self.shared = DrawListSharedData::with_display_rect(self.viewport_rect());
        let tex = self.font.texture_id();
        self.overlay_list.set_shared_data(self.shared.clone());
        self.overlay_list.clear();
        self.overlay_list.push_texture_id(tex);
        self.overlay_list.push_clip_rect_full_screen();

        self.input.config = self.config.input;
        self.input.config.nav_keyboard = self.config.flags.contains(ConfigFlags::NAV_ENABLE_KEYBOARD);
        self.input.new_frame(&mut self.raw, self.time);

        self.update_item_timers(dt);
        self.update_moving_window();
        self.update_hovered_window();
        self.update_mouse_wheel();
        self.update_tab_request();
        self.nav_update();
        self.update_want_capture();

        for w in self.windows.values_mut() {
            w.was_active = w.active;
            w.active = false;
            w.write_accessed = false;
        }
        if self
            .nav
            .window
            .is_some_and(|h| self.windows.get(h).is_none_or(|w| !w.was_active))
        {
            self.focus_front_most_active_window(None);
        }

        self.window_stack.clear();
        self.begin_popups.clear();
        self.begin_order_counter = 0;
        self.set_current_window(None);
        self.close_popups_over_window(self.nav.window);
        self.close_unreachable_popups();
        self.settings.tick(dt);

        self.within_frame = true;
        self.set_next_window_size(Size::new(400.0, 400.0), Cond::FirstUseEver);
        let implicit = self.begin(IMPLICIT_WINDOW_NAME, WindowFlags::empty());
        self.implicit_window = Some(implicit);
        Ok(())
    }

    /// Close the frame: focus and move windows from clicks, sort windows for display.
    ///
    /// Called by [`render`](Self::render) when needed; calling it again in the same
    /// frame does nothing.
    pub fn end_frame(&mut self) {
        if self.frame_count_ended == self.frame_count {
            return;
        }
        assert!(self.within_frame, "end_frame called before new_frame");
        assert!(
            self.window_stack.len() == 1,
            "end_frame with {} window(s) still open; every begin needs an end",
            self.window_stack.len().saturating_sub(1)
        );
        let Some(implicit) = self.implicit_window.take() else {
            panic!("the implicit window was ended by the application");
        };
        let w = self.windows.at_mut(implicit.window());
        if !w.write_accessed {
            w.active = false;
        }
        self.end(implicit);
        assert!(
            self.style_stack.is_empty(),
            "end_frame with {} style push(es) still open; every push_style_* needs a pop_style",
            self.style_stack.len()
        );

        if self.active_id.is_none() && self.hovered_id.is_none() {
            let appearing = self
                .nav
                .window
                .and_then(|h| self.windows.get(h))
                .is_some_and(|w| w.appearing);
            if !appearing {
                if self.input.button(MouseButton::Left).clicked {
                    self.click_to_focus();
                }
                if self.input.button(MouseButton::Right).clicked {
                    let target = self.window_above_front_most_modal();
                    self.close_popups_over_window(target);
                }
            }
        }

        self.windows.sort_for_display();
        self.raw.clear_frame_scratch();
        self.within_frame = false;
        self.frame_count_ended = self.frame_count;
    }

    /// Collect the draw lists of every visible window in paint order.
    ///
    /// Top-level windows follow the z-order with their children right after them.
    /// Tooltips are drawn above everything else; the overlay list comes last.
    pub fn render(&mut self) -> DrawData<'_> {
        if self.frame_count_ended != self.frame_count {
            self.end_frame();
        }
        self.frame_count_rendered = self.frame_count;

        let front_most = self
            .render_front_most
            .take()
            .filter(|&h| self.windows.get(h).is_some_and(|w| w.active && !w.is_child()));
        let mut builder = core::mem::take(&mut self.draw_data_builder);
        builder.clear();
        for (h, w) in self.windows.iter() {
            if w.active && w.hidden_frames == 0 && !w.is_child() && Some(h) != front_most {
                add_window_to_draw_data(&self.windows, &mut builder, h);
            }
        }
        if let Some(h) = front_most.filter(|&h| self.windows.at(h).hidden_frames == 0) {
            add_window_to_draw_data(&self.windows, &mut builder, h);
        }
        builder.flatten_into_single_layer();
        for h in builder.iter() {
            self.windows.at_mut(h).draw_list.pop_unused_draw_cmd();
        }
        self.overlay_list.pop_unused_draw_cmd();
        self.draw_data_builder = builder;

        let mut data = DrawData::new(Point::ZERO, self.raw.display_size);
        for h in self.draw_data_builder.iter() {
            data.push_list(&self.windows.at(h).draw_list);
        }
        data.push_list(&self.overlay_list);
        tracing::trace!(
            lists = data.cmd_lists.len(),
            vertices = data.total_vtx_count,
            "frame rendered"
        );
        data
    }

    /// Draw `window` (and its children) above every other window at the next
    /// [`render`](Self::render), without changing the z-order.
    pub fn set_window_front_most(&mut self, window: Option<WindowHandle>) {
        self.render_front_most = window;
    }

    /// The display area in screen space.
    pub(crate) fn viewport_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.raw.display_size)
    }

    fn update_item_timers(&mut self, dt: f64) {
        if self.hovered_id.is_some() {
            self.hovered_id_timer += dt;
        }
        self.hovered_id_prev = self.hovered_id;
        self.hovered_id = Id::NONE;
        self.hovered_id_allow_overlap = false;

        if !self.active_id_is_alive && self.active_id_prev_frame == self.active_id && self.active_id.is_some() {
            tracing::trace!(id = ?self.active_id, "stale active id cleared");
            self.clear_active_id();
        }
        if self.active_id.is_some() {
            self.active_id_timer += dt;
        }
        self.active_id_prev_frame = self.active_id;
        self.active_id_is_alive = false;
        self.active_id_is_just_activated = false;
    }

    fn update_moving_window(&mut self) {
        let Some(moving) = self.moving_window else {
            // A press on a window that cannot move still owns the mouse until released.
            let move_id_active = self.active_id.is_some()
                && self
                    .active_id_window
                    .and_then(|h| self.windows.get(h))
                    .is_some_and(|w| w.move_id == self.active_id);
            if move_id_active {
                self.keep_alive_id(self.active_id);
                if !self.input.is_mouse_down(MouseButton::Left) {
                    self.clear_active_id();
                }
            }
            return;
        };
        self.keep_alive_id(self.active_id);
        let Some(root) = self.windows.get(moving).map(|w| w.root.unwrap_or(moving)) else {
            self.moving_window = None;
            return;
        };
        let can_move = !self.windows.at(root).flags.contains(WindowFlags::NO_MOVE);
        if can_move && self.input.is_mouse_down(MouseButton::Left) && self.input.is_mouse_pos_valid() {
            let pos = self.input.mouse_pos() - self.active_id_click_offset;
            let w = self.windows.at_mut(root);
            if w.pos != pos {
                set_window_pos(w, pos, Cond::Always);
                self.mark_settings_dirty(root);
            }
            self.focus_window(Some(moving));
        } else {
            tracing::debug!(window = ?moving, "window move ended");
            self.clear_active_id();
            self.moving_window = None;
        }
    }

    fn find_hovered_window(&self) -> Option<WindowHandle> {
        if !self.input.is_mouse_pos_valid() {
            return None;
        }
        let mouse = self.input.mouse_pos();
        let pad = self.style.touch_extra_padding;
        self.windows.iter().rev().find_map(|(h, w)| {
            let hit = w.active
                && !w.flags.contains(WindowFlags::NO_INPUTS)
                && w.outer_rect_clipped.inflate(pad.x, pad.y).contains(mouse);
            hit.then_some(h)
        })
    }

    fn update_hovered_window(&mut self) {
        let moving = self
            .moving_window
            .filter(|&h| self.windows.get(h).is_some_and(|w| !w.flags.contains(WindowFlags::NO_INPUTS)));
        let hovered = moving.or_else(|| self.find_hovered_window());
        self.hovered_window = hovered;
        self.hovered_root_window = hovered.map(|h| self.windows.at(h).root.unwrap_or(h));

        match self.front_most_modal() {
            Some(modal) => {
                self.modal_darkening_ratio = (self.modal_darkening_ratio + self.input.delta_time() * 6.0).min(1.0);
                if self
                    .hovered_root_window
                    .is_some_and(|root| !self.is_window_child_of(root, modal))
                {
                    self.hovered_window = None;
                    self.hovered_root_window = None;
                }
            }
            None => self.modal_darkening_ratio = 0.0,
        }
    }

    fn update_want_capture(&mut self) {
        let popups_open = !self.open_popups.is_empty();
        for button in MouseButton::ALL {
            if self.input.button(button).clicked {
                let owned = self.hovered_window.is_some() || popups_open;
                self.input.set_mouse_down_owned(button, owned);
            }
        }
        let earliest = MouseButton::ALL
            .iter()
            .map(|&b| self.input.button(b))
            .filter(|b| b.down)
            .min_by(|a, b| a.clicked_time.total_cmp(&b.clicked_time));
        let mouse_available = earliest.is_none_or(|b| b.down_owned);
        self.want_capture_mouse =
            (mouse_available && (self.hovered_window.is_some() || self.input.is_any_mouse_down())) || popups_open;

        let nav_keyboard = self.nav.active
            && self.config.flags.contains(ConfigFlags::NAV_ENABLE_KEYBOARD)
            && !self.config.flags.contains(ConfigFlags::NAV_NO_CAPTURE_KEYBOARD);
        self.want_capture_keyboard = self.active_id.is_some() || self.front_most_modal().is_some() || nav_keyboard;
    }

    fn update_mouse_wheel(&mut self) {
        let (wheel, wheel_h) = (self.input.mouse_wheel(), self.input.mouse_wheel_h());
        if wheel == 0.0 && wheel_h == 0.0 {
            return;
        }
        let Some(h) = self.hovered_window.filter(|&h| !self.windows.at(h).collapsed) else {
            return;
        };
        let ctrl = self.input.modifiers().contains(Modifiers::CTRL);

        // Children that refuse the wheel hand it to their parent.
        let mut target = h;
        loop {
            let w = self.windows.at(target);
            let passes_up = w.flags.contains(WindowFlags::CHILD_WINDOW | WindowFlags::NO_SCROLL_WITH_MOUSE)
                && !w.flags.intersects(WindowFlags::NO_SCROLLBAR | WindowFlags::NO_INPUTS);
            match w.parent.filter(|_| passes_up) {
                Some(p) => target = p,
                None => break,
            }
        }
        let target_flags = self.windows.at(target).flags;
        let scroll_allowed = !target_flags.intersects(WindowFlags::NO_SCROLL_WITH_MOUSE | WindowFlags::NO_INPUTS);

        if wheel != 0.0 {
            if ctrl && self.config.font_allow_user_scaling {
                let mouse = self.input.mouse_pos();
                let w = self.windows.at_mut(h);
                let new_scale = (w.font_window_scale + wheel * 0.10).clamp(0.50, 2.50);
                let scale = new_scale / w.font_window_scale;
                w.font_window_scale = new_scale;
                // Zoom around the mouse.
                let offset = (mouse - w.pos) * (1.0 - scale);
                w.pos += offset;
                w.size = Size::new(w.size.width * scale, w.size.height * scale);
                w.size_full = Size::new(w.size_full.width * scale, w.size_full.height * scale);
            } else if !ctrl && scroll_allowed {
                let font = self.font.font_size() * self.config.font_global_scale;
                let w = self.windows.at_mut(target);
                let step = (5.0 * font * w.font_window_scale)
                    .min((w.content_region_rect.height() + w.window_padding.y * 2.0) * 0.67)
                    .trunc();
                let y = w.scroll.y - wheel * step;
                set_scroll(w, Vec2::new(w.scroll.x, y));
            }
        }
        if wheel_h != 0.0 && !ctrl && scroll_allowed {
            let font = self.font.font_size() * self.config.font_global_scale;
            let w = self.windows.at_mut(target);
            let x = w.scroll.x - wheel_h * font * w.font_window_scale;
            set_scroll(w, Vec2::new(x, w.scroll.y));
        }
    }

    fn update_tab_request(&mut self) {
        let ctrl = self.input.modifiers().contains(Modifiers::CTRL);
        if self.active_id.is_none() && !ctrl && self.input.is_key_pressed(Key::Tab, false) {
            let target = self.nav.window.filter(|&h| {
                self.windows
                    .get(h)
                    .is_some_and(|w| w.active && !w.flags.contains(WindowFlags::NO_NAV_INPUTS))
            });
            if let Some(h) = target {
                let from = if self.nav.id.is_some() { self.nav.id_tab_counter } else { None };
                let backwards = self.input.modifiers().contains(Modifiers::SHIFT);
                self.windows.at_mut(h).focus.request_tab(from, backwards);
            }
        }
        self.nav.id_tab_counter = None;
    }

    fn click_to_focus(&mut self) {
        let Some(hovered) = self.hovered_window else {
            if self.nav.window.is_some() && self.front_most_modal().is_none() {
                self.focus_window(None);
            }
            return;
        };
        self.focus_window(Some(hovered));
        let move_id = self.windows.at(hovered).move_id;
        self.set_active_id(move_id, Some(hovered));
        self.nav.disable_highlight = true;
        let root = self.hovered_root_window.unwrap_or(hovered);
        self.active_id_click_offset = self.input.mouse_pos() - self.windows.at(root).pos;
        let locked = self.windows.at(hovered).flags.contains(WindowFlags::NO_MOVE)
            || self.windows.at(root).flags.contains(WindowFlags::NO_MOVE);
        if !locked {
            tracing::debug!(window = ?hovered, "window move started");
            self.moving_window = Some(hovered);
        }
    }

    /// The hovered window when it is above the frontmost modal, else that modal.
    fn window_above_front_most_modal(&self) -> Option<WindowHandle> {
        let Some(modal) = self.front_most_modal() else {
            return self.hovered_window;
        };
        for (h, _) in self.windows.iter().rev() {
            if h == modal {
                break;
            }
            if Some(h) == self.hovered_window {
                return Some(h);
            }
        }
        Some(modal)
    }
}

/// Scroll immediately, keeping the recorded content extent in window space.
fn set_scroll(w: &mut Window, scroll: Vec2) {
    w.dc.cursor_max_pos += w.scroll;
    w.scroll = scroll;
    w.dc.cursor_max_pos -= w.scroll;
}

fn add_window_to_draw_data(windows: &WindowRegistry, out: &mut DrawDataBuilder<WindowHandle>, h: WindowHandle) {
    let layer = if windows.at(h).is_tooltip() {
        DrawLayer::Upper
    } else {
        DrawLayer::Normal
    };
    add_window_recursive(windows, out, layer, h);
}

fn add_window_recursive(windows: &WindowRegistry, out: &mut DrawDataBuilder<WindowHandle>, layer: DrawLayer, h: WindowHandle) {
    out.push(layer, h);
    for &child in &windows.at(h).dc.child_windows {
        if windows.get(child).is_some_and(|c| c.active && c.hidden_frames == 0) {
            add_window_recursive(windows, out, layer, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_draw::{Color, DrawList};

    fn frame(ctx: &mut Context, mouse: Point, down: bool) {
        let io = ctx.input_mut();
        io.display_size = Size::new(800.0, 600.0);
        io.mouse_pos = mouse;
        io.set_mouse_down(MouseButton::Left, down);
        ctx.new_frame().unwrap();
    }

    fn find(ctx: &Context, name: &str) -> WindowHandle {
        ctx.windows().find(Id::from_str_seeded(name, Id::NONE)).unwrap()
    }

    fn list_ptr(ctx: &Context, h: WindowHandle) -> *const DrawList {
        ctx.windows().get(h).unwrap().draw_list()
    }

    #[test]
    fn invalid_parameters_leave_the_context_untouched() {
        let mut ctx = Context::new();
        ctx.input_mut().delta_time = -1.0;
        ctx.input_mut().display_size = Size::new(800.0, 600.0);
        assert_eq!(ctx.new_frame(), Err(FrameError::InvalidDeltaTime(-1.0)));
        assert_eq!(ctx.frame_count(), 0);
        assert_eq!(ctx.windows().len(), 0);

        ctx.input_mut().delta_time = 0.016;
        ctx.input_mut().display_size = Size::new(-1.0, 600.0);
        assert!(matches!(ctx.new_frame(), Err(FrameError::InvalidDisplaySize(_))));
        assert_eq!(ctx.frame_count(), 0);

        ctx.input_mut().display_size = Size::new(800.0, 600.0);
        assert_eq!(ctx.new_frame(), Ok(()));
        assert_eq!(ctx.frame_count(), 1);
        ctx.end_frame();
    }

    #[test]
    fn end_frame_is_idempotent_and_unused_implicit_window_is_hidden() {
        let mut ctx = Context::new();
        frame(&mut ctx, Point::new(-100.0, -100.0), false);
        ctx.end_frame();
        ctx.end_frame();
        let implicit = find(&ctx, IMPLICIT_WINDOW_NAME);
        assert!(!ctx.windows().get(implicit).unwrap().is_active());
        let data = ctx.render();
        assert!(data.is_empty());
    }

    #[test]
    #[should_panic(expected = "still open")]
    fn unclosed_window_panics_at_end_frame() {
        let mut ctx = Context::new();
        frame(&mut ctx, Point::new(-100.0, -100.0), false);
        let _open = ctx.begin("Open", WindowFlags::empty());
        ctx.end_frame();
    }

    #[test]
    fn render_orders_windows_tooltips_and_overlay() {
        let mut ctx = Context::new();
        let build = |ctx: &mut Context| {
            frame(ctx, Point::new(700.0, 500.0), false);
            for (name, x) in [("A", 10.0), ("B", 300.0)] {
                ctx.set_next_window_pos(Point::new(x, 10.0), Cond::Always);
                ctx.set_next_window_size(Size::new(200.0, 100.0), Cond::Always);
                let w = ctx.begin(name, WindowFlags::empty());
                ctx.text(name);
                ctx.end(w);
            }
            ctx.set_tooltip("tip");
        };
        // Tooltips stay hidden on the frame they appear.
        build(&mut ctx);
        ctx.render();
        build(&mut ctx);
        let a = find(&ctx, "A");
        ctx.set_window_front_most(Some(a));
        ctx.overlay_draw_list()
            .add_rect_filled(Point::new(0.0, 0.0), Point::new(5.0, 5.0), Color::WHITE, 0.0);
        let lists: Vec<*const DrawList> = ctx.render().cmd_lists.iter().map(|&l| core::ptr::from_ref(l)).collect();

        let b = find(&ctx, "B");
        let tip = ctx
            .windows()
            .iter()
            .find(|(_, w)| w.flags().contains(WindowFlags::TOOLTIP))
            .map(|(h, _)| h)
            .unwrap();
        let overlay: *const DrawList = ctx.overlay_draw_list();
        assert_eq!(lists, vec![list_ptr(&ctx, b), list_ptr(&ctx, a), list_ptr(&ctx, tip), overlay]);
    }

    #[test]
    fn wheel_scrolls_the_hovered_window() {
        let mut ctx = Context::new();
        let build = |ctx: &mut Context| {
            ctx.set_next_window_pos(Point::new(0.0, 0.0), Cond::Always);
            ctx.set_next_window_size(Size::new(200.0, 100.0), Cond::Always);
            let w = ctx.begin("Scroll", WindowFlags::empty());
            for i in 0..20 {
                ctx.button(&format!("Item {i}"));
            }
            ctx.end(w);
            ctx.end_frame();
        };
        let mouse = Point::new(100.0, 60.0);
        frame(&mut ctx, mouse, false);
        build(&mut ctx);
        let h = find(&ctx, "Scroll");
        assert_eq!(ctx.windows().get(h).unwrap().scroll().y, 0.0);

        ctx.input_mut().mouse_wheel = -1.0;
        frame(&mut ctx, mouse, false);
        assert_eq!(ctx.hovered_window(), Some(h));
        build(&mut ctx);
        assert!(ctx.windows().get(h).unwrap().scroll().y > 0.0);
        // The wheel is per frame.
        assert_eq!(ctx.input_mut().mouse_wheel, 0.0);
    }

    #[test]
    fn wheel_over_a_child_that_refuses_it_scrolls_the_parent() {
        let mut ctx = Context::new();
        let build = |ctx: &mut Context| {
            ctx.set_next_window_pos(Point::new(0.0, 0.0), Cond::Always);
            ctx.set_next_window_size(Size::new(200.0, 150.0), Cond::Always);
            let w = ctx.begin("Outer", WindowFlags::empty());
            let c = ctx.begin_child("inner", Size::new(0.0, 60.0), true, WindowFlags::NO_SCROLL_WITH_MOUSE);
            for i in 0..10 {
                ctx.button(&format!("Inner {i}"));
            }
            let inner = c.window();
            ctx.end_child(c);
            for i in 0..20 {
                ctx.button(&format!("Item {i}"));
            }
            let outer = w.window();
            ctx.end(w);
            ctx.end_frame();
            (outer, inner)
        };
        // Just below the title bar, inside the child.
        let mouse = Point::new(100.0, 40.0);
        frame(&mut ctx, mouse, false);
        let (outer, inner) = build(&mut ctx);

        ctx.input_mut().mouse_wheel = -1.0;
        frame(&mut ctx, mouse, false);
        assert_eq!(ctx.hovered_window(), Some(inner));
        build(&mut ctx);
        assert!(ctx.windows().get(outer).unwrap().scroll().y > 0.0);
        assert_eq!(ctx.windows().get(inner).unwrap().scroll().y, 0.0);
    }

    #[test]
    fn only_the_modal_chain_is_hovered() {
        let mut ctx = Context::new();
        let mouse = Point::new(20.0, 60.0);
        let back = |ctx: &mut Context, open_modal: bool| {
            ctx.set_next_window_pos(Point::new(0.0, 0.0), Cond::Always);
            ctx.set_next_window_size(Size::new(300.0, 300.0), Cond::Always);
            let w = ctx.begin("Back", WindowFlags::empty());
            if open_modal {
                ctx.open_popup("Modal");
            }
            if let Some(p) = ctx.begin_popup_modal("Modal", WindowFlags::empty()) {
                ctx.text("blocking");
                ctx.end_popup(p);
            }
            ctx.end(w);
            ctx.end_frame();
        };
        frame(&mut ctx, mouse, false);
        back(&mut ctx, false);
        frame(&mut ctx, mouse, false);
        let h = find(&ctx, "Back");
        assert_eq!(ctx.hovered_window(), Some(h));
        back(&mut ctx, true);

        frame(&mut ctx, mouse, false);
        assert_eq!(ctx.hovered_window(), None);
        assert!(ctx.modal_darkening_ratio > 0.0);
        assert!(ctx.want_capture_keyboard());
        back(&mut ctx, false);
    }

    #[test]
    fn clicking_a_window_focuses_and_drags_it() {
        let mut ctx = Context::new();
        let build = |ctx: &mut Context| {
            for (name, x) in [("A", 20.0), ("B", 300.0)] {
                ctx.set_next_window_pos(Point::new(x, 20.0), Cond::FirstUseEver);
                ctx.set_next_window_size(Size::new(200.0, 200.0), Cond::FirstUseEver);
                let w = ctx.begin(name, WindowFlags::empty());
                ctx.end(w);
            }
            ctx.end_frame();
        };
        frame(&mut ctx, Point::new(-100.0, -100.0), false);
        build(&mut ctx);
        let (a, b) = (find(&ctx, "A"), find(&ctx, "B"));
        assert_eq!(ctx.nav_window(), Some(b));
        let start = ctx.windows().get(a).unwrap().pos();

        frame(&mut ctx, Point::new(100.0, 150.0), true);
        build(&mut ctx);
        assert_eq!(ctx.nav_window(), Some(a));
        assert_eq!(ctx.active_id(), ctx.windows().get(a).unwrap().move_id());
        assert_eq!(ctx.windows().order().last(), Some(&a));

        frame(&mut ctx, Point::new(120.0, 170.0), true);
        build(&mut ctx);
        assert_eq!(ctx.windows().get(a).unwrap().pos(), start + Vec2::new(20.0, 20.0));

        frame(&mut ctx, Point::new(120.0, 170.0), false);
        build(&mut ctx);
        assert_eq!(ctx.active_id(), Id::NONE);
        assert_eq!(ctx.moving_window, None);
    }

    #[test]
    fn clicking_empty_space_clears_focus() {
        let mut ctx = Context::new();
        let build = |ctx: &mut Context| {
            ctx.set_next_window_pos(Point::new(20.0, 20.0), Cond::Always);
            ctx.set_next_window_size(Size::new(100.0, 100.0), Cond::Always);
            let w = ctx.begin("Lonely", WindowFlags::empty());
            ctx.end(w);
            ctx.end_frame();
        };
        frame(&mut ctx, Point::new(700.0, 550.0), false);
        build(&mut ctx);
        frame(&mut ctx, Point::new(700.0, 550.0), false);
        build(&mut ctx);
        assert!(ctx.nav_window().is_some());

        frame(&mut ctx, Point::new(700.0, 550.0), true);
        build(&mut ctx);
        assert_eq!(ctx.nav_window(), None);
    }
}
