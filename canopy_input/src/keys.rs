// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Button, key, and navigation input identifiers.

/// A mouse button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
    /// First extra button.
    Extra1,
    /// Second extra button.
    Extra2,
}

impl MouseButton {
    /// Number of tracked buttons.
    pub const COUNT: usize = 5;
    /// Every button, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Left,
        Self::Right,
        Self::Middle,
        Self::Extra1,
        Self::Extra2,
    ];

    /// Slot of this button in per-button arrays.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Keys the engine reacts to directly.
///
/// Text entry goes through characters instead; this set only covers keys with a
/// behavioural meaning (focus movement, activation, clipboard shortcuts).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Tab.
    Tab,
    /// Left arrow.
    LeftArrow,
    /// Right arrow.
    RightArrow,
    /// Up arrow.
    UpArrow,
    /// Down arrow.
    DownArrow,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Home.
    Home,
    /// End.
    End,
    /// Insert.
    Insert,
    /// Delete.
    Delete,
    /// Backspace.
    Backspace,
    /// Space bar.
    Space,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// `A` (select all).
    A,
    /// `C` (copy).
    C,
    /// `V` (paste).
    V,
    /// `X` (cut).
    X,
    /// `Y` (redo).
    Y,
    /// `Z` (undo).
    Z,
}

impl Key {
    /// Number of tracked keys.
    pub const COUNT: usize = 21;

    /// Slot of this key in per-key arrays.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Abstract navigation inputs, fed by a gamepad or mapped from the keyboard.
///
/// Values are analog in `0.0..=1.0`; anything above zero counts as down.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NavInput {
    /// Activate / open / toggle (gamepad A, keyboard Space).
    Activate,
    /// Cancel / close / exit (gamepad B, keyboard Escape).
    Cancel,
    /// Text input (gamepad Y, keyboard Enter).
    Input,
    /// Context menu (gamepad X).
    Menu,
    /// Move left.
    DpadLeft,
    /// Move right.
    DpadRight,
    /// Move up.
    DpadUp,
    /// Move down.
    DpadDown,
    /// Focus previous window.
    FocusPrev,
    /// Focus next window.
    FocusNext,
    /// Slower tweaks.
    TweakSlow,
    /// Faster tweaks.
    TweakFast,
}

impl NavInput {
    /// Number of navigation inputs.
    pub const COUNT: usize = 12;

    /// Slot of this input in per-input arrays.
    pub const fn index(self) -> usize {
        self as usize
    }
}

bitflags::bitflags! {
    /// Keyboard modifier state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Control.
        const CTRL  = 0b0000_0001;
        /// Shift.
        const SHIFT = 0b0000_0010;
        /// Alt / Option.
        const ALT   = 0b0000_0100;
        /// Super / Command / Windows.
        const SUPER = 0b0000_1000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_cover_last_variant() {
        assert_eq!(Key::Z.index() + 1, Key::COUNT);
        assert_eq!(NavInput::TweakFast.index() + 1, NavInput::COUNT);
        assert_eq!(MouseButton::Extra2.index() + 1, MouseButton::COUNT);
    }
}
