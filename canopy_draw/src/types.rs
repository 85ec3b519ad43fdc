// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for draw lists: vertices, commands, handles, and shared data.

use bytemuck::{Pod, Zeroable};
use kurbo::{Point, Rect, Vec2};

/// Index type used by draw list index buffers.
pub type DrawIdx = u32;

/// Opaque texture handle interpreted by the rendering backend.
///
/// The default value stands for "the font atlas / white pixel texture".
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Opaque token carried by a callback command.
///
/// A callback command replaces geometry: the backend sees the token in place of
/// a run of indices and performs whatever state change it stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallbackId(pub u64);

/// A single vertex as uploaded to the GPU.
///
/// The layout is `#[repr(C)]` and [`Pod`], so a vertex buffer can be handed to a
/// backend with [`bytemuck::cast_slice`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct DrawVert {
    /// Screen-space position.
    pub pos: [f32; 2],
    /// Texture coordinates.
    pub uv: [f32; 2],
    /// Packed colour, see [`Color::to_packed`](crate::Color::to_packed).
    pub col: u32,
}

impl DrawVert {
    /// Build a vertex from double-precision geometry.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "vertex buffers are single precision"
    )]
    pub fn new(pos: Point, uv: Point, col: u32) -> Self {
        Self {
            pos: [pos.x as f32, pos.y as f32],
            uv: [uv.x as f32, uv.y as f32],
            col,
        }
    }
}

/// A batch of indices sharing one clip rectangle and one texture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawCmd {
    /// Number of indices (multiple of 3) drawn by this command.
    pub elem_count: u32,
    /// Offset of the first index of this command in the list's index buffer.
    pub idx_offset: u32,
    /// Clip rectangle in screen space (`x0, y0, x1, y1`).
    pub clip_rect: Rect,
    /// Texture bound while drawing this command.
    pub texture_id: TextureId,
    /// When set, the backend runs this callback instead of drawing geometry.
    pub callback: Option<CallbackId>,
}

impl DrawCmd {
    pub(crate) const fn new(idx_offset: u32, clip_rect: Rect, texture_id: TextureId) -> Self {
        Self {
            elem_count: 0,
            idx_offset,
            clip_rect,
            texture_id,
            callback: None,
        }
    }

    /// True for a command with neither geometry nor a callback.
    pub const fn is_empty(&self) -> bool {
        self.elem_count == 0 && self.callback.is_none()
    }
}

bitflags::bitflags! {
    /// Which corners of a rectangle are rounded.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Corners: u8 {
        /// Top-left corner.
        const TOP_LEFT     = 0b0000_0001;
        /// Top-right corner.
        const TOP_RIGHT    = 0b0000_0010;
        /// Bottom-left corner.
        const BOTTOM_LEFT  = 0b0000_0100;
        /// Bottom-right corner.
        const BOTTOM_RIGHT = 0b0000_1000;
        /// Both top corners.
        const TOP    = Self::TOP_LEFT.bits() | Self::TOP_RIGHT.bits();
        /// Both bottom corners.
        const BOTTOM = Self::BOTTOM_LEFT.bits() | Self::BOTTOM_RIGHT.bits();
        /// Both left corners.
        const LEFT   = Self::TOP_LEFT.bits() | Self::BOTTOM_LEFT.bits();
        /// Both right corners.
        const RIGHT  = Self::TOP_RIGHT.bits() | Self::BOTTOM_RIGHT.bits();
    }
}

impl Default for Corners {
    fn default() -> Self {
        Self::all()
    }
}

/// Data shared by every draw list of one context, refreshed once per frame.
#[derive(Clone, Debug)]
pub struct DrawListSharedData {
    /// UV coordinate of a fully opaque white texel in the default texture.
    pub tex_uv_white_pixel: Point,
    /// Clip rectangle used when the clip stack is empty.
    pub clip_rect_fullscreen: Rect,
    /// Maximum error (in pixels) allowed when tessellating curves.
    pub curve_tessellation_tol: f64,
    pub(crate) circle_vtx12: [Vec2; 12],
}

impl DrawListSharedData {
    /// Shared data clipping to the given display rectangle.
    pub fn with_display_rect(display: Rect) -> Self {
        Self {
            clip_rect_fullscreen: display,
            ..Self::default()
        }
    }
}

impl Default for DrawListSharedData {
    fn default() -> Self {
        let mut circle_vtx12 = [Vec2::ZERO; 12];
        for (i, v) in circle_vtx12.iter_mut().enumerate() {
            let a = (i as f64 * 2.0 * core::f64::consts::PI) / 12.0;
            *v = Vec2::new(a.cos(), a.sin());
        }
        Self {
            tex_uv_white_pixel: Point::ZERO,
            clip_rect_fullscreen: Rect::new(-8192.0, -8192.0, 8192.0, 8192.0),
            curve_tessellation_tol: 1.25,
            circle_vtx12,
        }
    }
}
