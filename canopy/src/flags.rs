// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flag sets and option structs for windows, items, buttons and queries.

use kurbo::Size;

bitflags::bitflags! {
    /// Behaviour of a window, fixed by the first `begin` of each frame.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        /// No title bar.
        const NO_TITLE_BAR              = 1 << 0;
        /// No resizing from the lower-right corner.
        const NO_RESIZE                 = 1 << 1;
        /// Cannot be moved by dragging.
        const NO_MOVE                   = 1 << 2;
        /// No scrollbars; scrolling still works programmatically.
        const NO_SCROLLBAR              = 1 << 3;
        /// The wheel scrolls the parent instead (child windows).
        const NO_SCROLL_WITH_MOUSE      = 1 << 4;
        /// Double-clicking the title bar does not collapse the window.
        const NO_COLLAPSE               = 1 << 5;
        /// Resize to the contents every frame.
        const ALWAYS_AUTO_RESIZE        = 1 << 6;
        /// Never load or save settings.
        const NO_SAVED_SETTINGS         = 1 << 8;
        /// Mouse passes through: the window is never hovered.
        const NO_INPUTS                 = 1 << 9;
        /// Has a menu bar.
        const MENU_BAR                  = 1 << 10;
        /// Do not take focus when first shown.
        const NO_FOCUS_ON_APPEARING     = 1 << 12;
        /// Focusing does not bring the window to the front.
        const NO_BRING_TO_FRONT_ON_FOCUS = 1 << 13;
        /// No gamepad or keyboard navigation inside.
        const NO_NAV_INPUTS             = 1 << 18;
        /// Never becomes the nav window when cycling.
        const NO_NAV_FOCUS              = 1 << 19;
        /// No navigation at all.
        const NO_NAV = Self::NO_NAV_INPUTS.bits() | Self::NO_NAV_FOCUS.bits();

        /// Set by `begin_child`.
        const CHILD_WINDOW              = 1 << 24;
        /// Set by `begin_tooltip`.
        const TOOLTIP                   = 1 << 25;
        /// Set by `begin_popup`.
        const POPUP                     = 1 << 26;
        /// Set by `begin_popup_modal`.
        const MODAL                     = 1 << 27;
        /// Set by `begin_menu` for nested menus.
        const CHILD_MENU                = 1 << 28;
    }
}

bitflags::bitflags! {
    /// Per-item behaviour pushed with [`Context::push_item_flag`](crate::Context::push_item_flag).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u16 {
        /// Tab and programmatic focus can land here.
        const ALLOW_KEYBOARD_FOCUS         = 1 << 0;
        /// Buttons repeat while held.
        const BUTTON_REPEAT                = 1 << 1;
        /// Never hovered or activated; drawn dimmed by widgets.
        const DISABLED                     = 1 << 2;
        /// Not a navigation candidate.
        const NO_NAV                       = 1 << 3;
        /// Not picked by the initial focus request of a window.
        const NO_NAV_DEFAULT_FOCUS         = 1 << 4;
        /// Selectables inside popups leave the popup open.
        const SELECTABLE_DONT_CLOSE_POPUP  = 1 << 5;
    }
}

impl Default for ItemFlags {
    fn default() -> Self {
        Self::ALLOW_KEYBOARD_FOCUS
    }
}

bitflags::bitflags! {
    /// Facts about the last submitted item.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ItemStatusFlags: u8 {
        /// The mouse was inside the clipped item rectangle.
        const HOVERED_RECT = 1 << 0;
        /// A tab or programmatic focus request landed on this item.
        const FOCUSED_BY_TAB = 1 << 1;
    }
}

bitflags::bitflags! {
    /// Context-wide switches.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ConfigFlags: u8 {
        /// Arrow keys, Space, Enter and Escape drive navigation.
        const NAV_ENABLE_KEYBOARD    = 1 << 0;
        /// Gamepad navigation inputs are written by the host.
        const NAV_ENABLE_GAMEPAD     = 1 << 1;
        /// Navigation never sets `want_capture_keyboard`.
        const NAV_NO_CAPTURE_KEYBOARD = 1 << 2;
    }
}

/// When a `set_next_window_*` directive applies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cond {
    /// Every time.
    #[default]
    Always,
    /// Once per run.
    Once,
    /// When the window has no saved or previous state.
    FirstUseEver,
    /// When the window reappears after being hidden or on first use.
    Appearing,
}

bitflags::bitflags! {
    /// Which [`Cond`]s a window still accepts.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CondMask: u8 {
        /// Accepts [`Cond::Once`].
        const ONCE           = 1 << 0;
        /// Accepts [`Cond::FirstUseEver`].
        const FIRST_USE_EVER = 1 << 1;
        /// Accepts [`Cond::Appearing`].
        const APPEARING      = 1 << 2;
    }
}

impl Default for CondMask {
    fn default() -> Self {
        Self::all()
    }
}

impl CondMask {
    /// Whether a directive with `cond` may apply.
    pub fn allows(self, cond: Cond) -> bool {
        match cond {
            Cond::Always => true,
            Cond::Once => self.contains(Self::ONCE),
            Cond::FirstUseEver => self.contains(Self::FIRST_USE_EVER),
            Cond::Appearing => self.contains(Self::APPEARING),
        }
    }
}

bitflags::bitflags! {
    /// Options for [`Context::is_window_hovered`](crate::Context::is_window_hovered) and
    /// [`Context::is_item_hovered`](crate::Context::is_item_hovered).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct HoveredFlags: u8 {
        /// Also true when a child of the window is hovered.
        const CHILD_WINDOWS                   = 1 << 0;
        /// Test the root of the current window.
        const ROOT_WINDOW                     = 1 << 1;
        /// True when any window is hovered.
        const ANY_WINDOW                      = 1 << 2;
        /// Ignore a popup that blocks access to this window.
        const ALLOW_WHEN_BLOCKED_BY_POPUP     = 1 << 3;
        /// Ignore an active item elsewhere.
        const ALLOW_WHEN_BLOCKED_BY_ACTIVE_ITEM = 1 << 5;
        /// Ignore another item that claimed hover first.
        const ALLOW_WHEN_OVERLAPPED           = 1 << 6;
        /// Rectangle-only test.
        const RECT_ONLY = Self::ALLOW_WHEN_BLOCKED_BY_POPUP.bits()
            | Self::ALLOW_WHEN_BLOCKED_BY_ACTIVE_ITEM.bits()
            | Self::ALLOW_WHEN_OVERLAPPED.bits();
    }
}

bitflags::bitflags! {
    /// Options for [`Context::is_window_focused`](crate::Context::is_window_focused).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FocusedFlags: u8 {
        /// Also true when a child of the window is focused.
        const CHILD_WINDOWS = 1 << 0;
        /// Test the root of the current window.
        const ROOT_WINDOW   = 1 << 1;
        /// True when any window is focused.
        const ANY_WINDOW    = 1 << 2;
    }
}

/// When a button reports `pressed`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ButtonPolicy {
    /// Press inside and release inside.
    #[default]
    ClickRelease,
    /// Press inside; the button does not keep the active id.
    Click,
    /// Release inside, wherever the press happened.
    Release,
    /// A double click inside.
    DoubleClick,
    /// Press inside; the active id is held until the mouse goes up (drag handles).
    Hold,
}

/// Options for [`Context::button_behavior`](crate::Context::button_behavior).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ButtonOptions {
    /// When `pressed` fires.
    pub policy: ButtonPolicy,
    /// Fire repeatedly while held, at key-repeat cadence.
    pub repeat: bool,
    /// Later items may steal hover from this one.
    pub allow_overlap: bool,
    /// Never hover or activate.
    pub disabled: bool,
    /// Ignore the press while a modifier key is held.
    pub no_key_modifiers: bool,
    /// Pressing does not move the nav cursor here.
    pub no_nav_focus: bool,
    /// Hovering a child window of the current window counts as hovering this item.
    pub flatten_children: bool,
    /// With [`ButtonPolicy::ClickRelease`], a double click also fires.
    pub also_double_click: bool,
}

impl ButtonOptions {
    /// Default options with a different policy.
    pub fn with_policy(policy: ButtonPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }
}

/// Result of [`Context::button_behavior`](crate::Context::button_behavior).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ButtonResponse {
    /// The button fired this frame.
    pub pressed: bool,
    /// The mouse is over the button and nothing else owns it.
    pub hovered: bool,
    /// The button is being held.
    pub held: bool,
}

/// Options for [`Context::selectable`](crate::Context::selectable).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SelectableOptions {
    /// Selecting inside a popup does not close it.
    pub dont_close_popups: bool,
    /// Also fires on a double click.
    pub allow_double_click: bool,
    /// Drawn dimmed and never fires.
    pub disabled: bool,
    /// Size; zero components fill the available width or use the text height.
    pub size: Size,
}

/// Press conditions derived from [`ButtonOptions`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PressFlags {
    pub on_click_release: bool,
    pub on_click: bool,
    pub on_release: bool,
    pub on_double_click: bool,
    pub no_holding_active_id: bool,
}

impl PressFlags {
    pub(crate) fn from_options(options: &ButtonOptions) -> Self {
        let mut f = Self::default();
        match options.policy {
            ButtonPolicy::ClickRelease => f.on_click_release = true,
            ButtonPolicy::Click => {
                f.on_click = true;
                f.no_holding_active_id = true;
            }
            ButtonPolicy::Release => f.on_release = true,
            ButtonPolicy::DoubleClick => f.on_double_click = true,
            ButtonPolicy::Hold => f.on_click = true,
        }
        if options.also_double_click {
            f.on_click_release = true;
            f.on_double_click = true;
        }
        f
    }
}

/// How a selectable presses; menus open on click and menu items fire on release.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum SelectableRole {
    #[default]
    Plain,
    Menu,
    MenuItem,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cond_mask_gates_directives() {
        let mut mask = CondMask::default();
        assert!(mask.allows(Cond::Once));
        mask.remove(CondMask::ONCE | CondMask::FIRST_USE_EVER);
        assert!(!mask.allows(Cond::Once));
        assert!(!mask.allows(Cond::FirstUseEver));
        assert!(mask.allows(Cond::Appearing));
        assert!(CondMask::empty().allows(Cond::Always));
    }

    #[test]
    fn press_flags_follow_policy() {
        let click = PressFlags::from_options(&ButtonOptions::with_policy(ButtonPolicy::Click));
        assert!(click.on_click && click.no_holding_active_id);
        let hold = PressFlags::from_options(&ButtonOptions::with_policy(ButtonPolicy::Hold));
        assert!(hold.on_click && !hold.no_holding_active_id);
        let both = PressFlags::from_options(&ButtonOptions {
            also_double_click: true,
            ..ButtonOptions::default()
        });
        assert!(both.on_click_release && both.on_double_click);
    }

    #[test]
    fn default_item_flags_allow_focus() {
        assert_eq!(ItemFlags::default(), ItemFlags::ALLOW_KEYBOARD_FOCUS);
    }
}
