// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Input: the per-frame input snapshot of an immediate-mode UI.
//!
//! The host writes raw state into a [`FrameInput`] (or queues [`InputEvent`]s) and
//! calls [`InputState::new_frame`] once per frame. The snapshot then answers edge
//! queries for the rest of the frame:
//!
//! - **Clicks and releases**: a button's `clicked` flag is true on exactly one frame
//!   per press, `released` on exactly one frame per release.
//! - **Double clicks**: a second click within [`InputConfig::mouse_double_click_time`]
//!   and [`InputConfig::mouse_double_click_max_dist`] of the first.
//! - **Drags**: the largest distance travelled since the press.
//! - **Repeat**: held keys and navigation inputs fire again after a delay, at a rate.
//!
//! ## Usage
//!
//! ```
//! use canopy_input::{FrameInput, InputEvent, InputState, MouseButton};
//! use kurbo::Point;
//!
//! let mut raw = FrameInput::default();
//! let mut input = InputState::default();
//! raw.mouse_pos = Point::new(20.0, 20.0);
//!
//! // Press and release arrive in the same host frame...
//! raw.push_event(InputEvent::MouseButton { button: MouseButton::Left, down: true });
//! raw.push_event(InputEvent::MouseButton { button: MouseButton::Left, down: false });
//!
//! // ...but are observed on two consecutive frames.
//! input.new_frame(&mut raw, 0.016);
//! assert!(input.button(MouseButton::Left).clicked);
//! input.new_frame(&mut raw, 0.033);
//! assert!(input.is_mouse_released(MouseButton::Left));
//! ```
//!
//! Mouse positions below `-256000` on either axis mean "no mouse"; use
//! [`MOUSE_POS_INVALID`] to report it. Deltas across an invalid position are zero.

mod keys;
mod raw;
mod state;

pub use keys::{Key, Modifiers, MouseButton, NavInput};
pub use raw::{FrameInput, InputEvent, MOUSE_POS_INVALID, is_mouse_pos_valid};
pub use state::{InputConfig, InputState, MouseButtonState, NavReadMode, typematic_repeat_amount};
