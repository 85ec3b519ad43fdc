// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-window records the host may persist between runs.

use hashbrown::HashMap;
use kurbo::{Point, Size};

use crate::context::Context;
use crate::flags::WindowFlags;
use crate::id::Id;
use crate::registry::WindowHandle;

/// Saved state of one window.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowSettings {
    /// Window name, as passed to `begin`.
    pub name: String,
    /// Top-left corner.
    pub pos: Point,
    /// Size when not collapsed.
    pub size: Size,
    /// Collapsed to the title bar.
    pub collapsed: bool,
}

/// Settings records keyed by window id, plus the save timer.
#[derive(Clone, Debug, Default)]
pub(crate) struct Settings {
    by_id: HashMap<Id, WindowSettings>,
    pub dirty_timer: f64,
    pub save_request: bool,
}

impl Settings {
    pub(crate) fn get(&self, id: Id) -> Option<&WindowSettings> {
        self.by_id.get(&id)
    }

    /// Count the dirty timer down; sets the save request when it runs out.
    pub(crate) fn tick(&mut self, dt: f64) {
        if self.dirty_timer <= 0.0 {
            return;
        }
        self.dirty_timer -= dt;
        if self.dirty_timer <= 0.0 {
            tracing::debug!("settings save requested");
            self.save_request = true;
        }
    }
}

impl Context {
    /// Seed window state from previously saved records.
    ///
    /// Records apply when a window of the same name is first created; windows
    /// that already exist are not touched.
    pub fn load_window_settings(&mut self, records: impl IntoIterator<Item = WindowSettings>) {
        for record in records {
            let id = Id::from_str_seeded(&record.name, Id::NONE);
            self.settings.by_id.insert(id, record);
        }
    }

    /// Current records of every window that saves settings, sorted by name.
    pub fn window_settings(&mut self) -> Vec<WindowSettings> {
        for (_, w) in self.windows.iter() {
            if w.flags.contains(WindowFlags::NO_SAVED_SETTINGS) {
                continue;
            }
            self.settings.by_id.insert(
                w.id,
                WindowSettings {
                    name: w.name.clone(),
                    pos: w.pos,
                    size: w.size_full,
                    collapsed: w.collapsed,
                },
            );
        }
        let mut out: Vec<_> = self.settings.by_id.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Whether the host should save now; clears the request.
    pub fn take_settings_save_request(&mut self) -> bool {
        core::mem::take(&mut self.settings.save_request)
    }

    pub(crate) fn mark_settings_dirty(&mut self, window: WindowHandle) {
        let saves = self
            .windows
            .get(window)
            .is_some_and(|w| !w.flags.contains(WindowFlags::NO_SAVED_SETTINGS));
        if saves && self.settings.dirty_timer <= 0.0 {
            self.settings.dirty_timer = self.config.ini_saving_rate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Cond;

    fn frame(ctx: &mut Context, dt: f64) {
        let io = ctx.input_mut();
        io.display_size = Size::new(800.0, 600.0);
        io.delta_time = dt;
        ctx.new_frame().unwrap();
    }

    #[test]
    fn loaded_settings_seed_new_windows() {
        let mut ctx = Context::new();
        ctx.load_window_settings([WindowSettings {
            name: "Saved".into(),
            pos: Point::new(100.0, 120.0),
            size: Size::new(300.0, 200.0),
            collapsed: false,
        }]);
        frame(&mut ctx, 0.016);
        // FirstUseEver directives no longer apply once settings exist.
        ctx.set_next_window_pos(Point::new(5.0, 5.0), Cond::FirstUseEver);
        let w = ctx.begin("Saved", WindowFlags::empty());
        let h = w.window();
        ctx.end(w);
        ctx.end_frame();
        let win = ctx.windows().get(h).unwrap();
        assert_eq!(win.pos(), Point::new(100.0, 120.0));
        assert_eq!(win.size_full(), Size::new(300.0, 200.0));
    }

    #[test]
    fn dirty_timer_raises_one_save_request() {
        let mut ctx = Context::new();
        ctx.config_mut().ini_saving_rate = 0.05;
        frame(&mut ctx, 0.016);
        let w = ctx.begin("Moved", WindowFlags::empty());
        let h = w.window();
        ctx.end(w);
        ctx.mark_settings_dirty(h);
        ctx.end_frame();
        for _ in 0..5 {
            frame(&mut ctx, 0.016);
            ctx.end_frame();
        }
        assert!(ctx.take_settings_save_request());
        assert!(!ctx.take_settings_save_request());
        let names: Vec<_> = ctx.window_settings().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["Debug##Default", "Moved"]);
    }
}
