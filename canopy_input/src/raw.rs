// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-written input: level state plus an optional queue of discrete events.

use std::collections::VecDeque;

use kurbo::{Point, Size};
use smallvec::SmallVec;

use crate::keys::{Key, Modifiers, MouseButton, NavInput};

/// Sentinel mouse position meaning "no mouse available".
pub const MOUSE_POS_INVALID: Point = Point::new(-f64::MAX, -f64::MAX);

/// Whether `pos` is a real mouse position rather than a "no mouse" sentinel.
pub fn is_mouse_pos_valid(pos: Point) -> bool {
    const MOUSE_INVALID: f64 = -256_000.0;
    pos.x >= MOUSE_INVALID && pos.y >= MOUSE_INVALID
}

/// A discrete input event queued by the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Mouse moved to a position ([`MOUSE_POS_INVALID`] when it left the surface).
    MousePos(Point),
    /// A mouse button changed state.
    MouseButton {
        /// Button that changed.
        button: MouseButton,
        /// New state.
        down: bool,
    },
    /// Wheel motion in lines.
    MouseWheel {
        /// Horizontal amount.
        x: f64,
        /// Vertical amount.
        y: f64,
    },
    /// A key changed state.
    Key {
        /// Key that changed.
        key: Key,
        /// New state.
        down: bool,
    },
    /// Modifier state changed.
    Modifiers(Modifiers),
    /// A text character was typed.
    Char(char),
}

/// Raw input for one frame, written by the host before each `new_frame`.
///
/// Hosts either write level state directly (`mouse_down`, `keys_down`, ...) or push
/// [`InputEvent`]s. Queued events are *trickled*: once a button or key has changed
/// during a frame, further events touching it wait for the next frame, so a press and
/// release delivered together are still observed as two separate frames.
#[derive(Clone, Debug)]
pub struct FrameInput {
    /// Size of the display surface in pixels.
    pub display_size: Size,
    /// Seconds elapsed since the previous frame.
    pub delta_time: f64,
    /// Mouse position, or [`MOUSE_POS_INVALID`].
    pub mouse_pos: Point,
    /// Mouse button state, indexed by [`MouseButton::index`].
    pub mouse_down: [bool; MouseButton::COUNT],
    /// Vertical wheel motion this frame.
    pub mouse_wheel: f64,
    /// Horizontal wheel motion this frame.
    pub mouse_wheel_h: f64,
    /// Modifier state.
    pub modifiers: Modifiers,
    /// Key state, indexed by [`Key::index`].
    pub keys_down: [bool; Key::COUNT],
    /// Analog navigation inputs, indexed by [`NavInput::index`].
    pub nav_inputs: [f64; NavInput::COUNT],
    /// Characters typed this frame.
    pub input_characters: Vec<char>,
    pub(crate) events: VecDeque<InputEvent>,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            display_size: Size::new(-1.0, -1.0),
            delta_time: 1.0 / 60.0,
            mouse_pos: MOUSE_POS_INVALID,
            mouse_down: [false; MouseButton::COUNT],
            mouse_wheel: 0.0,
            mouse_wheel_h: 0.0,
            modifiers: Modifiers::empty(),
            keys_down: [false; Key::COUNT],
            nav_inputs: [0.0; NavInput::COUNT],
            input_characters: Vec::new(),
            events: VecDeque::new(),
        }
    }
}

impl FrameInput {
    /// Queue a discrete event for the next frame(s).
    pub fn push_event(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Number of events still waiting in the queue.
    pub fn queued_events(&self) -> usize {
        self.events.len()
    }

    /// Record a typed character; NUL is ignored.
    pub fn add_input_character(&mut self, c: char) {
        if c != '\0' {
            self.input_characters.push(c);
        }
    }

    /// Set the level state of a mouse button.
    pub fn set_mouse_down(&mut self, button: MouseButton, down: bool) {
        self.mouse_down[button.index()] = down;
    }

    /// Set the level state of a key.
    pub fn set_key_down(&mut self, key: Key, down: bool) {
        self.keys_down[key.index()] = down;
    }

    /// Whether `key` is currently down.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down[key.index()]
    }

    /// Fold keyboard keys into the navigation inputs they stand for.
    ///
    /// Arrows drive the d-pad inputs, Space activates, Enter inputs, Escape cancels.
    /// Ctrl and Shift tweak speed, Alt toggles the menu layer.
    pub fn map_keyboard_to_nav(&mut self) {
        const MAP: [(Key, NavInput); 7] = [
            (Key::Space, NavInput::Activate),
            (Key::Enter, NavInput::Input),
            (Key::Escape, NavInput::Cancel),
            (Key::LeftArrow, NavInput::DpadLeft),
            (Key::RightArrow, NavInput::DpadRight),
            (Key::UpArrow, NavInput::DpadUp),
            (Key::DownArrow, NavInput::DpadDown),
        ];
        for (key, nav) in MAP {
            if self.is_key_down(key) {
                self.nav_inputs[nav.index()] = 1.0;
            }
        }
        for (modifier, nav) in [
            (Modifiers::CTRL, NavInput::TweakSlow),
            (Modifiers::SHIFT, NavInput::TweakFast),
            (Modifiers::ALT, NavInput::Menu),
        ] {
            if self.modifiers.contains(modifier) {
                self.nav_inputs[nav.index()] = 1.0;
            }
        }
    }

    /// Apply queued events to the level state, deferring the ones that would make a
    /// button or key change twice in one frame.
    pub(crate) fn apply_queued_events(&mut self) {
        let mut buttons_changed = 0_u8;
        let mut keys_changed: SmallVec<[Key; 8]> = SmallVec::new();
        let mut mouse_moved = false;
        let mut wheeled = false;

        while let Some(&event) = self.events.front() {
            match event {
                InputEvent::MousePos(pos) => {
                    if buttons_changed != 0 || wheeled {
                        break;
                    }
                    self.mouse_pos = pos;
                    mouse_moved = true;
                }
                InputEvent::MouseButton { button, down } => {
                    let bit = 1_u8 << button.index();
                    if buttons_changed & bit != 0 || wheeled || (down && mouse_moved) {
                        break;
                    }
                    if self.mouse_down[button.index()] != down {
                        buttons_changed |= bit;
                    }
                    self.mouse_down[button.index()] = down;
                }
                InputEvent::MouseWheel { x, y } => {
                    if mouse_moved || buttons_changed != 0 {
                        break;
                    }
                    self.mouse_wheel_h += x;
                    self.mouse_wheel += y;
                    wheeled = true;
                }
                InputEvent::Key { key, down } => {
                    if keys_changed.contains(&key) {
                        break;
                    }
                    if self.keys_down[key.index()] != down {
                        keys_changed.push(key);
                    }
                    self.keys_down[key.index()] = down;
                }
                InputEvent::Modifiers(m) => self.modifiers = m,
                InputEvent::Char(c) => self.add_input_character(c),
            }
            self.events.pop_front();
        }
        if !self.events.is_empty() {
            tracing::trace!(deferred = self.events.len(), "input events trickled to next frame");
        }
    }

    /// Clear per-frame scratch: wheel motion, typed characters, navigation inputs.
    pub fn clear_frame_scratch(&mut self) {
        self.mouse_wheel = 0.0;
        self.mouse_wheel_h = 0.0;
        self.input_characters.clear();
        self.nav_inputs = [0.0; NavInput::COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_in_one_frame_are_split() {
        let mut input = FrameInput::default();
        input.push_event(InputEvent::MouseButton { button: MouseButton::Left, down: true });
        input.push_event(InputEvent::MouseButton { button: MouseButton::Left, down: false });
        input.apply_queued_events();
        assert!(input.mouse_down[0]);
        assert_eq!(input.queued_events(), 1);
        input.apply_queued_events();
        assert!(!input.mouse_down[0]);
        assert_eq!(input.queued_events(), 0);
    }

    #[test]
    fn move_then_press_defers_press() {
        let mut input = FrameInput::default();
        input.push_event(InputEvent::MousePos(Point::new(5.0, 5.0)));
        input.push_event(InputEvent::MouseButton { button: MouseButton::Left, down: true });
        input.apply_queued_events();
        assert_eq!(input.mouse_pos, Point::new(5.0, 5.0));
        assert!(!input.mouse_down[0]);
        input.apply_queued_events();
        assert!(input.mouse_down[0]);
    }

    #[test]
    fn independent_keys_apply_together() {
        let mut input = FrameInput::default();
        input.push_event(InputEvent::Key { key: Key::Tab, down: true });
        input.push_event(InputEvent::Key { key: Key::Enter, down: true });
        input.push_event(InputEvent::Char('x'));
        input.apply_queued_events();
        assert!(input.is_key_down(Key::Tab) && input.is_key_down(Key::Enter));
        assert_eq!(input.input_characters, vec!['x']);
    }

    #[test]
    fn keyboard_maps_onto_nav() {
        let mut input = FrameInput::default();
        input.set_key_down(Key::DownArrow, true);
        input.set_key_down(Key::Space, true);
        input.map_keyboard_to_nav();
        assert_eq!(input.nav_inputs[NavInput::DpadDown.index()], 1.0);
        assert_eq!(input.nav_inputs[NavInput::Activate.index()], 1.0);
        input.clear_frame_scratch();
        assert_eq!(input.nav_inputs[NavInput::DpadDown.index()], 0.0);
    }

    #[test]
    fn sentinel_is_invalid() {
        assert!(!is_mouse_pos_valid(MOUSE_POS_INVALID));
        assert!(is_mouse_pos_valid(Point::new(-10.0, 0.0)));
    }
}
