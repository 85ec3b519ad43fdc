// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Draw: batched draw lists for immediate-mode user interfaces.
//!
//! A [`DrawList`] turns a stream of declarative shape calls into a short sequence of
//! GPU batches. Each batch ([`DrawCmd`]) is a run of indices sharing one clip
//! rectangle and one texture. The list keeps:
//!
//! - a **clip rectangle stack** and a **texture stack**; a push or pop only
//!   opens a new command once the current one already holds geometry,
//! - a **staging command** at the end of the command buffer that geometry is
//!   appended to, dropped again when a state change returns to the previous
//!   command's state before anything was drawn,
//! - **channels** that let callers draw out of order (for example a background
//!   after its foreground) and merge everything back in channel order.
//!
//! ## Minimal example
//!
//! ```rust
//! use canopy_draw::{Color, DrawData, DrawList, DrawListSharedData};
//! use kurbo::{Point, Rect, Size};
//!
//! let shared = DrawListSharedData::with_display_rect(Rect::new(0.0, 0.0, 640.0, 480.0));
//! let mut list = DrawList::new(shared);
//! list.push_clip_rect_full_screen();
//!
//! // Background drawn into channel 0, foreground into channel 1.
//! list.channels_split(2);
//! list.channels_set_current(1);
//! list.add_line(Point::new(0.0, 0.0), Point::new(100.0, 0.0), Color::WHITE, 1.0);
//! list.channels_set_current(0);
//! list.add_rect_filled(Point::new(0.0, 0.0), Point::new(100.0, 20.0), Color::BLACK, 0.0);
//! list.channels_merge();
//!
//! // Both shapes share one clip rectangle and texture, but channel order is kept.
//! list.pop_unused_draw_cmd();
//! let mut data = DrawData::new(Point::ZERO, Size::new(640.0, 480.0));
//! data.push_list(&list);
//! assert_eq!(data.total_idx_count, 12);
//! ```
//!
//! Shapes with a fully transparent colour produce no geometry at all.
//!
//! Vertices are [`bytemuck::Pod`], so backends can upload [`DrawList::vtx_buffer`]
//! with [`bytemuck::cast_slice`].

mod color;
mod data;
mod list;
mod shapes;
mod types;

pub use color::Color;
pub use data::{DrawData, DrawDataBuilder, DrawLayer};
pub use list::DrawList;
pub use types::{CallbackId, Corners, DrawCmd, DrawIdx, DrawListSharedData, DrawVert, TextureId};
