// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy: the core of an immediate-mode user interface.
//!
//! The application rebuilds its whole interface every frame by calling functions
//! such as [`Context::begin`] and [`Context::button`]. Canopy keeps the little state
//! that must survive between frames and arbitrates input:
//!
//! - **Identity**: every item is named by an [`Id`] hashed from the labels pushed on
//!   the current window's ID stack, so the same call site yields the same id each frame.
//! - **Windows**: [`WindowRegistry`] owns every window behind generational
//!   [`WindowHandle`]s and keeps the z-order, with children right after their parent.
//! - **Interaction**: at most one item is hovered and one is active per frame; clicks,
//!   focus, window moves, popups, menus and keyboard/gamepad navigation all go
//!   through the [`Context`].
//! - **Output**: [`Context::render`] merges the draw lists of every visible window into
//!   a [`DrawData`](canopy_draw::DrawData) for a rendering backend.
//!
//! Scopes return tokens (`WindowToken`, `IdToken`, `PopupToken`, ...) that must be
//! handed back to the matching `end`/`pop` call. Mismatched scopes panic with a message.
//!
//! ## Frame loop
//!
//! ```rust
//! use canopy::{ButtonOptions, Cond, Context, WindowFlags};
//! use canopy_input::MouseButton;
//! use kurbo::{Point, Size};
//!
//! let mut ctx = Context::new();
//! let mut clicks = 0;
//! for frame in 0..4 {
//!     let io = ctx.input_mut();
//!     io.display_size = Size::new(640.0, 480.0);
//!     io.mouse_pos = Point::new(40.0, 60.0);
//!     // Press on frame 2, release on frame 3.
//!     io.set_mouse_down(MouseButton::Left, frame == 2);
//!     ctx.new_frame().expect("valid frame parameters");
//!
//!     ctx.set_next_window_pos(Point::new(10.0, 10.0), Cond::FirstUseEver);
//!     ctx.set_next_window_size(Size::new(200.0, 120.0), Cond::FirstUseEver);
//!     let window = ctx.begin("Hello", WindowFlags::empty());
//!     if window.is_visible() {
//!         ctx.text("Press the button");
//!         if ctx.button_with("Click me", Size::new(120.0, 40.0), ButtonOptions::default()) {
//!             clicks += 1;
//!         }
//!     }
//!     ctx.end(window);
//!
//!     let data = ctx.render();
//!     assert!(data.total_vtx_count > 0);
//! }
//! assert_eq!(clicks, 1);
//! ```
//!
//! Host frame parameters that cannot be used (a negative delta time, a non-finite
//! display size) make [`Context::new_frame`] return a [`FrameError`] without touching
//! any state.
//!
//! The engine logs state transitions (window creation, focus changes, popups, window
//! moves, settings save requests) through `tracing`; install a subscriber to see them.

mod begin;
mod context;
mod error;
mod flags;
mod font;
mod frame;
mod id;
mod interaction;
mod layout;
mod menu;
mod nav;
mod popup;
mod registry;
mod settings;
mod style;
mod widgets;
mod window;

pub use begin::WindowToken;
pub use context::{ClipToken, Config, Context, IdToken, InputSource, ItemFlagsToken};
pub use error::FrameError;
pub use flags::{
    ButtonOptions, ButtonPolicy, ButtonResponse, Cond, CondMask, ConfigFlags, FocusedFlags, HoveredFlags,
    ItemFlags, ItemStatusFlags, SelectableOptions, WindowFlags,
};
pub use font::{FixedFont, FontProvider};
pub use id::{Id, IdFragment, display_text};
pub use layout::GroupToken;
pub use menu::{MenuBarToken, MenuToken};
pub use popup::PopupToken;
pub use registry::{WindowHandle, WindowRegistry};
pub use settings::WindowSettings;
pub use style::{Style, StyleColor, StyleToken, StyleVar};
pub use window::{LayoutType, MenuColumns, Window};
