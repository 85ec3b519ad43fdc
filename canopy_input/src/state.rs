// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived per-frame input state: edges, durations, double clicks, and drags.

use kurbo::{Point, Vec2};

use crate::keys::{Key, Modifiers, MouseButton, NavInput};
use crate::raw::{FrameInput, is_mouse_pos_valid};

/// Timing and distance thresholds used to derive input edges.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputConfig {
    /// Maximum time between two clicks for them to form a double click, in seconds.
    pub mouse_double_click_time: f64,
    /// Maximum distance between two clicks for them to form a double click, in pixels.
    pub mouse_double_click_max_dist: f64,
    /// Distance the mouse must travel before a press counts as a drag, in pixels.
    pub mouse_drag_threshold: f64,
    /// Time a key must be held before it starts repeating, in seconds.
    pub key_repeat_delay: f64,
    /// Time between repeats once repeating, in seconds.
    pub key_repeat_rate: f64,
    /// Fold keyboard keys into navigation inputs each frame
    /// (see [`FrameInput::map_keyboard_to_nav`]).
    pub nav_keyboard: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_double_click_time: 0.30,
            mouse_double_click_max_dist: 6.0,
            mouse_drag_threshold: 6.0,
            key_repeat_delay: 0.250,
            key_repeat_rate: 0.050,
            nav_keyboard: false,
        }
    }
}

impl InputConfig {
    /// Default configuration with custom double-click tolerances.
    pub fn with_double_click(time: f64, max_dist: f64) -> Self {
        Self {
            mouse_double_click_time: time,
            mouse_double_click_max_dist: max_dist,
            ..Self::default()
        }
    }
}

/// How a navigation input is read.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NavReadMode {
    /// Analog value while held.
    Down,
    /// 1.0 on the frame it went down.
    Pressed,
    /// 1.0 on the frame it went up.
    Released,
    /// Repeats at a slightly quicker than key-repeat cadence.
    Repeat,
    /// Repeats slowly.
    RepeatSlow,
    /// Repeats quickly.
    RepeatFast,
}

/// Derived state of one mouse button.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MouseButtonState {
    /// Held this frame.
    pub down: bool,
    /// Went down this frame.
    pub clicked: bool,
    /// Went up this frame.
    pub released: bool,
    /// Went down this frame, close in time and space to the previous click.
    pub double_clicked: bool,
    /// The press started over an engine window; the host should not also handle it.
    pub down_owned: bool,
    /// Seconds held, `-1.0` when up, `0.0` on the click frame.
    pub down_duration: f64,
    /// `down_duration` of the previous frame.
    pub down_duration_prev: f64,
    /// Time of the last click that did not complete a double click.
    pub clicked_time: f64,
    /// Position of the last click.
    pub clicked_pos: Point,
    /// Largest per-axis distance from `clicked_pos` while held.
    pub drag_max_distance_abs: Vec2,
    /// Largest squared distance from `clicked_pos` while held.
    pub drag_max_distance_sqr: f64,
}

impl Default for MouseButtonState {
    fn default() -> Self {
        Self {
            down: false,
            clicked: false,
            released: false,
            double_clicked: false,
            down_owned: false,
            down_duration: -1.0,
            down_duration_prev: -1.0,
            clicked_time: -f64::MAX,
            clicked_pos: Point::ZERO,
            drag_max_distance_abs: Vec2::ZERO,
            drag_max_distance_sqr: 0.0,
        }
    }
}

/// Input snapshot derived once per frame from a [`FrameInput`].
///
/// Only [`InputState::new_frame`] mutates the derived state; everything else reads it.
#[derive(Clone, Debug)]
pub struct InputState {
    /// Thresholds in use.
    pub config: InputConfig,
    time: f64,
    delta_time: f64,
    mouse_pos: Point,
    mouse_pos_prev: Point,
    mouse_delta: Vec2,
    buttons: [MouseButtonState; MouseButton::COUNT],
    mouse_wheel: f64,
    mouse_wheel_h: f64,
    modifiers: Modifiers,
    keys_down: [bool; Key::COUNT],
    keys_down_duration: [f64; Key::COUNT],
    keys_down_duration_prev: [f64; Key::COUNT],
    nav_inputs: [f64; NavInput::COUNT],
    nav_inputs_down_duration: [f64; NavInput::COUNT],
    nav_inputs_down_duration_prev: [f64; NavInput::COUNT],
    input_characters: Vec<char>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

impl InputState {
    /// Create a snapshot with nothing held.
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            time: 0.0,
            delta_time: 0.0,
            mouse_pos: crate::MOUSE_POS_INVALID,
            mouse_pos_prev: crate::MOUSE_POS_INVALID,
            mouse_delta: Vec2::ZERO,
            buttons: [MouseButtonState::default(); MouseButton::COUNT],
            mouse_wheel: 0.0,
            mouse_wheel_h: 0.0,
            modifiers: Modifiers::empty(),
            keys_down: [false; Key::COUNT],
            keys_down_duration: [-1.0; Key::COUNT],
            keys_down_duration_prev: [-1.0; Key::COUNT],
            nav_inputs: [0.0; NavInput::COUNT],
            nav_inputs_down_duration: [-1.0; NavInput::COUNT],
            nav_inputs_down_duration_prev: [-1.0; NavInput::COUNT],
            input_characters: Vec::new(),
        }
    }

    /// Derive this frame's state from `raw`, at absolute time `time` (seconds).
    ///
    /// Queued events in `raw` are applied first (see [`FrameInput`]). Invalid mouse
    /// positions produce a zero delta instead of a huge jump.
    pub fn new_frame(&mut self, raw: &mut FrameInput, time: f64) {
        raw.apply_queued_events();
        if self.config.nav_keyboard {
            raw.map_keyboard_to_nav();
        }
        self.time = time;
        self.delta_time = raw.delta_time;

        if is_mouse_pos_valid(raw.mouse_pos) {
            raw.mouse_pos = Point::new(raw.mouse_pos.x.floor(), raw.mouse_pos.y.floor());
        }
        self.mouse_pos = raw.mouse_pos;
        self.mouse_delta = if is_mouse_pos_valid(self.mouse_pos) && is_mouse_pos_valid(self.mouse_pos_prev) {
            self.mouse_pos - self.mouse_pos_prev
        } else {
            Vec2::ZERO
        };
        self.mouse_pos_prev = self.mouse_pos;

        let mouse_valid = is_mouse_pos_valid(self.mouse_pos);
        let double_click_max_sqr = self.config.mouse_double_click_max_dist * self.config.mouse_double_click_max_dist;
        for (b, &down) in self.buttons.iter_mut().zip(raw.mouse_down.iter()) {
            b.clicked = down && b.down_duration < 0.0;
            b.released = !down && b.down_duration >= 0.0;
            b.down_duration_prev = b.down_duration;
            b.down_duration = advance_duration(down, b.down_duration, self.delta_time);
            b.double_clicked = false;
            if b.clicked {
                if time - b.clicked_time < self.config.mouse_double_click_time {
                    if mouse_valid && (self.mouse_pos - b.clicked_pos).hypot2() < double_click_max_sqr {
                        b.double_clicked = true;
                    }
                    // A third click starts a new pair.
                    b.clicked_time = -f64::MAX;
                } else {
                    b.clicked_time = time;
                }
                b.clicked_pos = self.mouse_pos;
                b.drag_max_distance_abs = Vec2::ZERO;
                b.drag_max_distance_sqr = 0.0;
            } else if down {
                let from_click = if mouse_valid { self.mouse_pos - b.clicked_pos } else { Vec2::ZERO };
                b.drag_max_distance_sqr = b.drag_max_distance_sqr.max(from_click.hypot2());
                b.drag_max_distance_abs.x = b.drag_max_distance_abs.x.max(from_click.x.abs());
                b.drag_max_distance_abs.y = b.drag_max_distance_abs.y.max(from_click.y.abs());
            }
            b.down = down;
        }

        self.keys_down = raw.keys_down;
        for i in 0..Key::COUNT {
            self.keys_down_duration_prev[i] = self.keys_down_duration[i];
            self.keys_down_duration[i] = advance_duration(self.keys_down[i], self.keys_down_duration[i], self.delta_time);
        }

        self.nav_inputs = raw.nav_inputs;
        for i in 0..NavInput::COUNT {
            self.nav_inputs_down_duration_prev[i] = self.nav_inputs_down_duration[i];
            self.nav_inputs_down_duration[i] =
                advance_duration(self.nav_inputs[i] > 0.0, self.nav_inputs_down_duration[i], self.delta_time);
        }

        self.modifiers = raw.modifiers;
        self.mouse_wheel = raw.mouse_wheel;
        self.mouse_wheel_h = raw.mouse_wheel_h;
        self.input_characters.clear();
        self.input_characters.extend_from_slice(&raw.input_characters);
    }

    /// Absolute time of the current frame.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Seconds since the previous frame.
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Current mouse position (possibly the invalid sentinel).
    pub fn mouse_pos(&self) -> Point {
        self.mouse_pos
    }

    /// Whether the current mouse position is real.
    pub fn is_mouse_pos_valid(&self) -> bool {
        is_mouse_pos_valid(self.mouse_pos)
    }

    /// Mouse motion since the previous frame; zero when either position is invalid.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Derived state of `button`.
    pub fn button(&self, button: MouseButton) -> &MouseButtonState {
        &self.buttons[button.index()]
    }

    /// Record whether the current press of `button` belongs to the engine.
    pub fn set_mouse_down_owned(&mut self, button: MouseButton, owned: bool) {
        self.buttons[button.index()].down_owned = owned;
    }

    /// Whether `button` is held.
    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.button(button).down
    }

    /// Whether any button is held.
    pub fn is_any_mouse_down(&self) -> bool {
        self.buttons.iter().any(|b| b.down)
    }

    /// Whether `button` went down this frame; with `repeat`, also on repeat ticks while held.
    pub fn is_mouse_clicked(&self, button: MouseButton, repeat: bool) -> bool {
        let t = self.button(button).down_duration;
        if t == 0.0 {
            return true;
        }
        repeat
            && t > self.config.key_repeat_delay
            && typematic_repeat_amount(t, t - self.delta_time, self.config.key_repeat_delay, self.config.key_repeat_rate) > 0
    }

    /// Whether `button` went up this frame.
    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.button(button).released
    }

    /// Whether `button` completed a double click this frame.
    pub fn is_mouse_double_clicked(&self, button: MouseButton) -> bool {
        self.button(button).double_clicked
    }

    /// Whether `button` is held and has moved beyond `threshold` (negative uses the
    /// configured drag threshold) since it went down.
    pub fn is_mouse_dragging(&self, button: MouseButton, threshold: f64) -> bool {
        let b = self.button(button);
        if !b.down {
            return false;
        }
        let threshold = if threshold < 0.0 { self.config.mouse_drag_threshold } else { threshold };
        b.drag_max_distance_sqr >= threshold * threshold
    }

    /// Offset from the click position while dragging beyond `threshold`, else zero.
    pub fn mouse_drag_delta(&self, button: MouseButton, threshold: f64) -> Vec2 {
        let b = self.button(button);
        let threshold = if threshold < 0.0 { self.config.mouse_drag_threshold } else { threshold };
        if (b.down || b.released)
            && b.drag_max_distance_sqr >= threshold * threshold
            && self.is_mouse_pos_valid()
            && is_mouse_pos_valid(b.clicked_pos)
        {
            return self.mouse_pos - b.clicked_pos;
        }
        Vec2::ZERO
    }

    /// Vertical wheel motion this frame.
    pub fn mouse_wheel(&self) -> f64 {
        self.mouse_wheel
    }

    /// Horizontal wheel motion this frame.
    pub fn mouse_wheel_h(&self) -> f64 {
        self.mouse_wheel_h
    }

    /// Modifier state.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Characters typed this frame.
    pub fn input_characters(&self) -> &[char] {
        &self.input_characters
    }

    /// Whether `key` is held.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down[key.index()]
    }

    /// Seconds `key` has been held, `-1.0` when up.
    pub fn key_down_duration(&self, key: Key) -> f64 {
        self.keys_down_duration[key.index()]
    }

    /// Whether `key` went down this frame; with `repeat`, also on repeat ticks.
    pub fn is_key_pressed(&self, key: Key, repeat: bool) -> bool {
        let t = self.keys_down_duration[key.index()];
        if t == 0.0 {
            return true;
        }
        repeat && t > self.config.key_repeat_delay && self.key_pressed_amount(key, self.config.key_repeat_delay, self.config.key_repeat_rate) > 0
    }

    /// Whether `key` went up this frame.
    pub fn is_key_released(&self, key: Key) -> bool {
        self.keys_down_duration_prev[key.index()] >= 0.0 && !self.keys_down[key.index()]
    }

    /// How many presses (initial plus repeats) `key` produced this frame.
    pub fn key_pressed_amount(&self, key: Key, repeat_delay: f64, repeat_rate: f64) -> u32 {
        let t = self.keys_down_duration[key.index()];
        typematic_repeat_amount(t, t - self.delta_time, repeat_delay, repeat_rate)
    }

    /// Whether `nav` is held.
    pub fn is_nav_input_down(&self, nav: NavInput) -> bool {
        self.nav_inputs[nav.index()] > 0.0
    }

    /// Read `nav` according to `mode`.
    pub fn nav_input_amount(&self, nav: NavInput, mode: NavReadMode) -> f64 {
        let i = nav.index();
        if mode == NavReadMode::Down {
            return self.nav_inputs[i];
        }
        let t = self.nav_inputs_down_duration[i];
        if t < 0.0 {
            return if mode == NavReadMode::Released && self.nav_inputs_down_duration_prev[i] >= 0.0 {
                1.0
            } else {
                0.0
            };
        }
        let (delay, rate) = (self.config.key_repeat_delay, self.config.key_repeat_rate);
        let amount = match mode {
            NavReadMode::Pressed => return if t == 0.0 { 1.0 } else { 0.0 },
            NavReadMode::Down | NavReadMode::Released => return 0.0,
            NavReadMode::Repeat => typematic_repeat_amount(t, t - self.delta_time, delay * 0.80, rate * 0.80),
            NavReadMode::RepeatSlow => typematic_repeat_amount(t, t - self.delta_time, delay, rate * 2.00),
            NavReadMode::RepeatFast => typematic_repeat_amount(t, t - self.delta_time, delay * 0.80, rate * 0.30),
        };
        f64::from(amount)
    }

    /// Whether `nav` fired under `mode` this frame.
    pub fn is_nav_input_pressed(&self, nav: NavInput, mode: NavReadMode) -> bool {
        self.nav_input_amount(nav, mode) > 0.0
    }
}

fn advance_duration(down: bool, duration: f64, dt: f64) -> f64 {
    if !down {
        -1.0
    } else if duration < 0.0 {
        0.0
    } else {
        duration + dt
    }
}

/// Number of repeat ticks between `t_prev` and `t` for a key held `t` seconds.
///
/// The initial press (`t == 0`) counts as one.
#[allow(
    clippy::cast_possible_truncation,
    reason = "tick counts are small and non-negative"
)]
pub fn typematic_repeat_amount(t: f64, t_prev: f64, repeat_delay: f64, repeat_rate: f64) -> u32 {
    if t == 0.0 {
        return 1;
    }
    if t <= repeat_delay || repeat_rate <= 0.0 {
        return 0;
    }
    let ticks = |v: f64| ((v - repeat_delay) / repeat_rate).trunc();
    let count = ticks(t) - ticks(t_prev);
    if count > 0.0 { count as u32 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    struct Harness {
        raw: FrameInput,
        state: InputState,
        time: f64,
    }

    impl Harness {
        fn new() -> Self {
            let raw = FrameInput {
                delta_time: DT,
                mouse_pos: Point::new(10.0, 10.0),
                ..FrameInput::default()
            };
            Self {
                raw,
                state: InputState::default(),
                time: 0.0,
            }
        }

        fn frame(&mut self) {
            self.time += DT;
            self.state.new_frame(&mut self.raw, self.time);
        }

        fn frame_after(&mut self, seconds: f64) {
            self.time += seconds;
            self.raw.delta_time = seconds;
            self.state.new_frame(&mut self.raw, self.time);
            self.raw.delta_time = DT;
        }
    }

    #[test]
    fn click_and_release_edges_fire_once() {
        let mut h = Harness::new();
        h.frame();
        h.raw.set_mouse_down(MouseButton::Left, true);
        h.frame();
        assert!(h.state.button(MouseButton::Left).clicked);
        assert_eq!(h.state.button(MouseButton::Left).down_duration, 0.0);
        h.frame();
        assert!(!h.state.button(MouseButton::Left).clicked);
        assert!(h.state.is_mouse_down(MouseButton::Left));
        h.raw.set_mouse_down(MouseButton::Left, false);
        h.frame();
        assert!(h.state.is_mouse_released(MouseButton::Left));
        h.frame();
        assert!(!h.state.is_mouse_released(MouseButton::Left));
    }

    #[test]
    fn keyboard_drives_nav_when_enabled() {
        let mut h = Harness::new();
        h.raw.set_key_down(Key::DownArrow, true);
        h.frame();
        assert!(!h.state.is_nav_input_down(NavInput::DpadDown), "mapping is opt-in");
        h.state.config.nav_keyboard = true;
        h.frame();
        assert!(h.state.is_nav_input_pressed(NavInput::DpadDown, NavReadMode::Pressed));
    }

    #[test]
    fn quick_second_click_is_double_click() {
        let mut h = Harness::new();
        h.frame();
        for (down, expect_double) in [(true, false), (false, false), (true, true), (false, false), (true, false)] {
            h.raw.set_mouse_down(MouseButton::Left, down);
            h.frame();
            assert_eq!(h.state.is_mouse_double_clicked(MouseButton::Left), expect_double);
        }
    }

    #[test]
    fn slow_or_distant_second_click_is_not_double() {
        let mut h = Harness::new();
        h.frame();
        h.raw.set_mouse_down(MouseButton::Left, true);
        h.frame();
        h.raw.set_mouse_down(MouseButton::Left, false);
        h.frame();
        h.raw.set_mouse_down(MouseButton::Left, true);
        h.frame_after(0.5);
        assert!(!h.state.is_mouse_double_clicked(MouseButton::Left));

        h.raw.set_mouse_down(MouseButton::Left, false);
        h.frame();
        h.raw.mouse_pos = Point::new(40.0, 10.0);
        h.raw.set_mouse_down(MouseButton::Left, true);
        h.frame();
        assert!(!h.state.is_mouse_double_clicked(MouseButton::Left));
    }

    #[test]
    fn invalid_mouse_gives_zero_delta() {
        let mut h = Harness::new();
        h.frame();
        h.raw.mouse_pos = crate::MOUSE_POS_INVALID;
        h.frame();
        assert_eq!(h.state.mouse_delta(), Vec2::ZERO);
        h.raw.mouse_pos = Point::new(30.0, 10.0);
        h.frame();
        assert_eq!(h.state.mouse_delta(), Vec2::ZERO);
        h.raw.mouse_pos = Point::new(33.0, 14.0);
        h.frame();
        assert_eq!(h.state.mouse_delta(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn drag_distance_tracks_maximum() {
        let mut h = Harness::new();
        h.frame();
        h.raw.set_mouse_down(MouseButton::Left, true);
        h.frame();
        h.raw.mouse_pos = Point::new(13.0, 14.0);
        h.frame();
        h.raw.mouse_pos = Point::new(11.0, 10.0);
        h.frame();
        let b = h.state.button(MouseButton::Left);
        assert_eq!(b.drag_max_distance_sqr, 25.0);
        assert_eq!(b.drag_max_distance_abs, Vec2::new(3.0, 4.0));
        assert!(!h.state.is_mouse_dragging(MouseButton::Left, -1.0));
        assert!(h.state.is_mouse_dragging(MouseButton::Left, 5.0));
        assert_eq!(h.state.mouse_drag_delta(MouseButton::Left, 5.0), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn key_repeat_ticks_after_delay() {
        let mut h = Harness::new();
        h.raw.set_key_down(Key::Tab, true);
        h.frame();
        assert!(h.state.is_key_pressed(Key::Tab, true));
        let mut presses = 0;
        // Hold for half a second: 0.25s delay then a tick every 0.05s.
        for _ in 0..30 {
            h.frame();
            if h.state.is_key_pressed(Key::Tab, true) {
                presses += 1;
            }
        }
        assert!((4..=5).contains(&presses), "got {presses} repeats");
        assert!(!h.state.is_key_pressed(Key::Tab, false));
        h.raw.set_key_down(Key::Tab, false);
        h.frame();
        assert!(h.state.is_key_released(Key::Tab));
    }

    #[test]
    fn nav_input_modes() {
        let mut h = Harness::new();
        h.raw.nav_inputs[NavInput::Activate.index()] = 1.0;
        h.frame();
        assert!(h.state.is_nav_input_pressed(NavInput::Activate, NavReadMode::Pressed));
        h.frame();
        assert!(!h.state.is_nav_input_pressed(NavInput::Activate, NavReadMode::Pressed));
        assert!(h.state.is_nav_input_down(NavInput::Activate));
        h.raw.nav_inputs[NavInput::Activate.index()] = 0.0;
        h.frame();
        assert!(h.state.is_nav_input_pressed(NavInput::Activate, NavReadMode::Released));
    }

    #[test]
    fn typematic_counts() {
        assert_eq!(typematic_repeat_amount(0.0, -0.1, 0.25, 0.05), 1);
        assert_eq!(typematic_repeat_amount(0.2, 0.1, 0.25, 0.05), 0);
        assert_eq!(typematic_repeat_amount(0.36, 0.34, 0.25, 0.05), 1);
        assert_eq!(typematic_repeat_amount(0.52, 0.31, 0.25, 0.05), 4);
    }
}
