// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The draw list: buffers, clip and texture stacks, command batching, and channels.

use kurbo::{Point, Rect};

use crate::types::{CallbackId, DrawCmd, DrawIdx, DrawListSharedData, DrawVert, TextureId};

/// Storage for one channel while it is not the live buffer.
#[derive(Clone, Debug, Default)]
struct DrawChannel {
    cmd_buffer: Vec<DrawCmd>,
    idx_buffer: Vec<DrawIdx>,
}

/// An append-only list of vertices, indices, and commands.
///
/// Geometry is appended to the trailing *staging* command. Changing the clip
/// rectangle or texture only opens a new command once the staging command has
/// content; pushing back to the state of the previous command while the staging
/// command is still empty drops it again, so the command count follows real state
/// changes rather than push/pop calls.
///
/// ```
/// use canopy_draw::{Color, DrawList, DrawListSharedData};
/// use kurbo::Point;
///
/// let mut list = DrawList::new(DrawListSharedData::default());
/// list.push_clip_rect(Point::new(0.0, 0.0), Point::new(100.0, 100.0), false);
/// list.add_rect_filled(Point::new(10.0, 10.0), Point::new(20.0, 20.0), Color::WHITE, 0.0);
///
/// // A clip push/pop with nothing drawn in between leaves a single command.
/// list.push_clip_rect(Point::new(0.0, 0.0), Point::new(50.0, 50.0), true);
/// list.pop_clip_rect();
/// assert_eq!(list.cmd_buffer().len(), 1);
/// assert_eq!(list.cmd_buffer()[0].elem_count, 6);
/// ```
#[derive(Clone)]
pub struct DrawList {
    pub(crate) cmd_buffer: Vec<DrawCmd>,
    pub(crate) idx_buffer: Vec<DrawIdx>,
    pub(crate) vtx_buffer: Vec<DrawVert>,
    pub(crate) shared: DrawListSharedData,
    clip_rect_stack: Vec<Rect>,
    texture_id_stack: Vec<TextureId>,
    pub(crate) path: Vec<Point>,
    channels_current: usize,
    channels_count: usize,
    channels: Vec<DrawChannel>,
}

impl core::fmt::Debug for DrawList {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DrawList")
            .field("cmds", &self.cmd_buffer.len())
            .field("indices", &self.idx_buffer.len())
            .field("vertices", &self.vtx_buffer.len())
            .field("clip_depth", &self.clip_rect_stack.len())
            .field("texture_depth", &self.texture_id_stack.len())
            .field("channels", &self.channels_count)
            .finish_non_exhaustive()
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new(DrawListSharedData::default())
    }
}

impl DrawList {
    /// Create an empty list using `shared` for fallback clipping and the white texel.
    pub fn new(shared: DrawListSharedData) -> Self {
        Self {
            cmd_buffer: Vec::new(),
            idx_buffer: Vec::new(),
            vtx_buffer: Vec::new(),
            shared,
            clip_rect_stack: Vec::new(),
            texture_id_stack: Vec::new(),
            path: Vec::new(),
            channels_current: 0,
            channels_count: 1,
            channels: Vec::new(),
        }
    }

    /// Replace the shared data (typically once per frame, before [`clear`](Self::clear)).
    pub fn set_shared_data(&mut self, shared: DrawListSharedData) {
        self.shared = shared;
    }

    /// Shared data currently in use.
    pub fn shared_data(&self) -> &DrawListSharedData {
        &self.shared
    }

    /// Reset all buffers and stacks for a new frame, keeping their allocations.
    pub fn clear(&mut self) {
        self.cmd_buffer.clear();
        self.idx_buffer.clear();
        self.vtx_buffer.clear();
        self.clip_rect_stack.clear();
        self.texture_id_stack.clear();
        self.path.clear();
        self.channels_current = 0;
        self.channels_count = 1;
        for ch in &mut self.channels {
            ch.cmd_buffer.clear();
            ch.idx_buffer.clear();
        }
    }

    /// Reset and release every allocation.
    pub fn clear_free_memory(&mut self) {
        self.clear();
        self.cmd_buffer = Vec::new();
        self.idx_buffer = Vec::new();
        self.vtx_buffer = Vec::new();
        self.path = Vec::new();
        self.channels = Vec::new();
    }

    /// Commands in submission order.
    pub fn cmd_buffer(&self) -> &[DrawCmd] {
        &self.cmd_buffer
    }

    /// Index buffer; indices address [`vtx_buffer`](Self::vtx_buffer).
    pub fn idx_buffer(&self) -> &[DrawIdx] {
        &self.idx_buffer
    }

    /// Vertex buffer.
    pub fn vtx_buffer(&self) -> &[DrawVert] {
        &self.vtx_buffer
    }

    /// True when the list holds no commands at all.
    pub fn is_empty(&self) -> bool {
        self.cmd_buffer.is_empty()
    }

    /// The current clip rectangle, or the fullscreen rectangle when the stack is empty.
    pub fn clip_rect(&self) -> Rect {
        self.clip_rect_stack
            .last()
            .copied()
            .unwrap_or(self.shared.clip_rect_fullscreen)
    }

    /// The current texture, or the default texture when the stack is empty.
    pub fn texture_id(&self) -> TextureId {
        self.texture_id_stack.last().copied().unwrap_or_default()
    }

    /// Depth of the clip rectangle stack.
    pub fn clip_rect_depth(&self) -> usize {
        self.clip_rect_stack.len()
    }

    /// Push a clip rectangle spanning `min..max`.
    ///
    /// With `intersect_with_current`, the rectangle is clipped against the current top
    /// of the stack first. The result is clamped so that its maximum is never below
    /// its minimum.
    pub fn push_clip_rect(&mut self, min: Point, max: Point, intersect_with_current: bool) {
        let mut cr = Rect::new(min.x, min.y, max.x, max.y);
        if intersect_with_current && let Some(current) = self.clip_rect_stack.last() {
            cr.x0 = cr.x0.max(current.x0);
            cr.y0 = cr.y0.max(current.y0);
            cr.x1 = cr.x1.min(current.x1);
            cr.y1 = cr.y1.min(current.y1);
        }
        cr.x1 = cr.x1.max(cr.x0);
        cr.y1 = cr.y1.max(cr.y0);
        self.clip_rect_stack.push(cr);
        self.on_changed_clip_rect();
    }

    /// Push the fullscreen clip rectangle.
    pub fn push_clip_rect_full_screen(&mut self) {
        let full = self.shared.clip_rect_fullscreen;
        self.push_clip_rect(full.origin(), Point::new(full.x1, full.y1), false);
    }

    /// Pop the most recently pushed clip rectangle.
    ///
    /// # Panics
    ///
    /// Panics when the stack is empty.
    pub fn pop_clip_rect(&mut self) {
        assert!(
            self.clip_rect_stack.pop().is_some(),
            "pop_clip_rect called without a matching push_clip_rect"
        );
        self.on_changed_clip_rect();
    }

    /// Push a texture binding.
    pub fn push_texture_id(&mut self, texture_id: TextureId) {
        self.texture_id_stack.push(texture_id);
        self.on_changed_texture_id();
    }

    /// Pop the most recently pushed texture binding.
    ///
    /// # Panics
    ///
    /// Panics when the stack is empty.
    pub fn pop_texture_id(&mut self) {
        assert!(
            self.texture_id_stack.pop().is_some(),
            "pop_texture_id called without a matching push_texture_id"
        );
        self.on_changed_texture_id();
    }

    /// Open a new command with the current clip rectangle and texture.
    pub fn add_draw_cmd(&mut self) {
        let clip = self.clip_rect();
        assert!(
            clip.x0 <= clip.x1 && clip.y0 <= clip.y1,
            "clip rectangle must not be inverted"
        );
        let cmd = DrawCmd::new(self.idx_len(), clip, self.texture_id());
        self.cmd_buffer.push(cmd);
    }

    /// Record a backend callback, then open a fresh staging command after it.
    pub fn add_callback(&mut self, callback: CallbackId) {
        let needs_new = self
            .cmd_buffer
            .last()
            .is_none_or(|c| c.elem_count != 0 || c.callback.is_some());
        if needs_new {
            self.add_draw_cmd();
        }
        if let Some(cmd) = self.cmd_buffer.last_mut() {
            cmd.callback = Some(callback);
        }
        self.add_draw_cmd();
    }

    /// Drop a trailing command that carries neither geometry nor a callback.
    pub fn pop_unused_draw_cmd(&mut self) {
        if self.cmd_buffer.last().is_some_and(DrawCmd::is_empty) {
            self.cmd_buffer.pop();
        }
    }

    fn on_changed_clip_rect(&mut self) {
        let clip = self.clip_rect();
        let Some(curr) = self.cmd_buffer.last() else {
            self.add_draw_cmd();
            return;
        };
        if (curr.elem_count != 0 && curr.clip_rect != clip) || curr.callback.is_some() {
            self.add_draw_cmd();
            return;
        }
        if self.merge_with_previous(clip, self.texture_id()) {
            return;
        }
        if let Some(curr) = self.cmd_buffer.last_mut() {
            curr.clip_rect = clip;
        }
    }

    fn on_changed_texture_id(&mut self) {
        let texture_id = self.texture_id();
        let Some(curr) = self.cmd_buffer.last() else {
            self.add_draw_cmd();
            return;
        };
        if (curr.elem_count != 0 && curr.texture_id != texture_id) || curr.callback.is_some() {
            self.add_draw_cmd();
            return;
        }
        if self.merge_with_previous(self.clip_rect(), texture_id) {
            return;
        }
        if let Some(curr) = self.cmd_buffer.last_mut() {
            curr.texture_id = texture_id;
        }
    }

    /// Pop an empty staging command when the command before it already has `clip`
    /// and `texture_id`. Returns whether the staging command was dropped.
    fn merge_with_previous(&mut self, clip: Rect, texture_id: TextureId) -> bool {
        let n = self.cmd_buffer.len();
        if n < 2 || self.cmd_buffer[n - 1].elem_count != 0 {
            return false;
        }
        let prev = &self.cmd_buffer[n - 2];
        if prev.clip_rect == clip && prev.texture_id == texture_id && prev.callback.is_none() {
            self.cmd_buffer.pop();
            return true;
        }
        false
    }

    /// Make sure the trailing command can take geometry and return it.
    fn staging_cmd(&mut self) -> &mut DrawCmd {
        if self.cmd_buffer.last().is_none_or(|c| c.callback.is_some()) {
            self.add_draw_cmd();
        }
        let last = self.cmd_buffer.len() - 1;
        &mut self.cmd_buffer[last]
    }

    /// Account for `idx_count` indices and reserve room for `vtx_count` vertices.
    ///
    /// Callers must then write exactly that many indices; see the `prim_*` helpers.
    pub fn prim_reserve(&mut self, idx_count: usize, vtx_count: usize) {
        let added = to_idx(idx_count);
        self.staging_cmd().elem_count += added;
        self.vtx_buffer.reserve(vtx_count);
        self.idx_buffer.reserve(idx_count);
    }

    /// Index the next vertex will receive.
    pub fn vtx_current_idx(&self) -> DrawIdx {
        to_idx(self.vtx_buffer.len())
    }

    /// Append a vertex without touching indices.
    pub fn prim_write_vtx(&mut self, pos: Point, uv: Point, col: u32) {
        self.vtx_buffer.push(DrawVert::new(pos, uv, col));
    }

    /// Append an index without touching vertices.
    pub fn prim_write_idx(&mut self, idx: DrawIdx) {
        self.idx_buffer.push(idx);
    }

    /// Append an axis-aligned quad using the white texel. Requires `prim_reserve(6, 4)`.
    pub fn prim_rect(&mut self, a: Point, c: Point, col: u32) {
        let uv = self.shared.tex_uv_white_pixel;
        self.prim_quad_uv(
            a,
            Point::new(c.x, a.y),
            c,
            Point::new(a.x, c.y),
            [uv, uv, uv, uv],
            col,
        );
    }

    /// Append an axis-aligned textured quad. Requires `prim_reserve(6, 4)`.
    pub fn prim_rect_uv(&mut self, a: Point, c: Point, uv_a: Point, uv_c: Point, col: u32) {
        self.prim_quad_uv(
            a,
            Point::new(c.x, a.y),
            c,
            Point::new(a.x, c.y),
            [uv_a, Point::new(uv_c.x, uv_a.y), uv_c, Point::new(uv_a.x, uv_c.y)],
            col,
        );
    }

    /// Append an arbitrary textured quad. Requires `prim_reserve(6, 4)`.
    pub fn prim_quad_uv(&mut self, a: Point, b: Point, c: Point, d: Point, uv: [Point; 4], col: u32) {
        let base = self.vtx_current_idx();
        self.idx_buffer
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        self.prim_write_vtx(a, uv[0], col);
        self.prim_write_vtx(b, uv[1], col);
        self.prim_write_vtx(c, uv[2], col);
        self.prim_write_vtx(d, uv[3], col);
    }

    fn idx_len(&self) -> u32 {
        to_idx(self.idx_buffer.len())
    }

    /// Number of channels in use (1 when not split).
    pub fn channels_count(&self) -> usize {
        self.channels_count
    }

    /// Index of the live channel.
    pub fn channels_current(&self) -> usize {
        self.channels_current
    }

    /// Split drawing into `count` independent channels.
    ///
    /// Channel 0 continues the existing buffers; channels `1..count` start empty with
    /// a staging command using the current clip rectangle and texture.
    ///
    /// # Panics
    ///
    /// Panics if the list is already split or `count` is zero.
    pub fn channels_split(&mut self, count: usize) {
        assert!(
            self.channels_current == 0 && self.channels_count == 1,
            "channels_split called while already split"
        );
        assert!(count >= 1, "channels_split needs at least one channel");
        if self.channels.len() < count {
            self.channels.resize_with(count, DrawChannel::default);
        }
        self.channels_count = count;
        let clip = self.clip_rect();
        let texture_id = self.texture_id();
        // Slot 0 holds nothing while channel 0 is live.
        self.channels[0].cmd_buffer.clear();
        self.channels[0].idx_buffer.clear();
        for ch in &mut self.channels[1..count] {
            ch.cmd_buffer.clear();
            ch.idx_buffer.clear();
            ch.cmd_buffer.push(DrawCmd::new(0, clip, texture_id));
        }
    }

    /// Make channel `idx` the live buffer.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not below [`channels_count`](Self::channels_count).
    pub fn channels_set_current(&mut self, idx: usize) {
        assert!(
            idx < self.channels_count,
            "channels_set_current index out of range"
        );
        if self.channels_current == idx {
            return;
        }
        let current = self.channels_current;
        core::mem::swap(&mut self.cmd_buffer, &mut self.channels[current].cmd_buffer);
        core::mem::swap(&mut self.idx_buffer, &mut self.channels[current].idx_buffer);
        self.channels_current = idx;
        core::mem::swap(&mut self.cmd_buffer, &mut self.channels[idx].cmd_buffer);
        core::mem::swap(&mut self.idx_buffer, &mut self.channels[idx].idx_buffer);
    }

    /// Concatenate channels `0..count` back into a single command stream.
    ///
    /// Trailing empty commands of each channel are dropped, index offsets are rebased,
    /// and the staging command is refreshed to the current clip and texture.
    pub fn channels_merge(&mut self) {
        if self.channels_count <= 1 {
            return;
        }
        self.channels_set_current(0);
        for i in 1..self.channels_count {
            let ch = &mut self.channels[i];
            if ch.cmd_buffer.last().is_some_and(DrawCmd::is_empty) {
                ch.cmd_buffer.pop();
            }
            if ch.cmd_buffer.is_empty() {
                continue;
            }
            if self.cmd_buffer.last().is_some_and(DrawCmd::is_empty) {
                self.cmd_buffer.pop();
            }
            let base = to_idx(self.idx_buffer.len());
            for mut cmd in ch.cmd_buffer.drain(..) {
                cmd.idx_offset += base;
                self.cmd_buffer.push(cmd);
            }
            self.idx_buffer.append(&mut ch.idx_buffer);
        }
        self.channels_count = 1;
        self.refresh_staging_cmd();
    }

    /// Bring the trailing command in line with the current clip rectangle and texture.
    fn refresh_staging_cmd(&mut self) {
        let clip = self.clip_rect();
        let texture_id = self.texture_id();
        let Some(last) = self.cmd_buffer.last_mut() else {
            return;
        };
        if last.callback.is_some()
            || (last.elem_count != 0 && (last.clip_rect != clip || last.texture_id != texture_id))
        {
            self.add_draw_cmd();
        } else if last.elem_count == 0 {
            last.clip_rect = clip;
            last.texture_id = texture_id;
        }
    }
}

/// Convert a buffer length into the index type.
#[allow(
    clippy::cast_possible_truncation,
    reason = "index buffers use 32-bit indices"
)]
pub(crate) fn to_idx(n: usize) -> DrawIdx {
    debug_assert!(n <= DrawIdx::MAX as usize, "draw list exceeds 32-bit indices");
    n as DrawIdx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn list() -> DrawList {
        let mut l = DrawList::new(DrawListSharedData::with_display_rect(Rect::new(
            0.0, 0.0, 200.0, 200.0,
        )));
        l.push_texture_id(TextureId(0));
        l.push_clip_rect_full_screen();
        l
    }

    #[test]
    fn fresh_list_has_single_staging_cmd() {
        let l = list();
        assert_eq!(l.cmd_buffer().len(), 1);
        assert_eq!(l.cmd_buffer()[0].elem_count, 0);
        assert_eq!(l.cmd_buffer()[0].clip_rect, Rect::new(0.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn clip_change_after_geometry_opens_new_cmd() {
        let mut l = list();
        l.add_rect_filled(pt(1.0, 1.0), pt(5.0, 5.0), Color::WHITE, 0.0);
        l.push_clip_rect(pt(0.0, 0.0), pt(10.0, 10.0), true);
        assert_eq!(l.cmd_buffer().len(), 2);
        l.add_rect_filled(pt(1.0, 1.0), pt(5.0, 5.0), Color::WHITE, 0.0);
        assert_eq!(l.cmd_buffer()[1].elem_count, 6);
        assert_eq!(l.cmd_buffer()[1].idx_offset, 6);
        assert_eq!(l.cmd_buffer()[1].clip_rect, Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn push_matching_previous_state_does_not_grow() {
        let mut l = list();
        l.add_rect_filled(pt(1.0, 1.0), pt(5.0, 5.0), Color::WHITE, 0.0);
        let before = l.cmd_buffer().len();
        l.push_clip_rect(pt(0.0, 0.0), pt(10.0, 10.0), true);
        l.pop_clip_rect();
        assert_eq!(l.cmd_buffer().len(), before);
        // Same again through the texture stack.
        l.push_texture_id(TextureId(7));
        l.pop_texture_id();
        assert_eq!(l.cmd_buffer().len(), before);
    }

    #[test]
    fn empty_staging_cmd_takes_new_state() {
        let mut l = list();
        l.push_clip_rect(pt(0.0, 0.0), pt(10.0, 10.0), true);
        l.push_clip_rect(pt(2.0, 2.0), pt(50.0, 50.0), true);
        assert_eq!(l.cmd_buffer().len(), 1);
        assert_eq!(l.cmd_buffer()[0].clip_rect, Rect::new(2.0, 2.0, 10.0, 10.0));
    }

    #[test]
    fn inverted_clip_is_clamped() {
        let mut l = list();
        l.push_clip_rect(pt(0.0, 0.0), pt(10.0, 10.0), false);
        l.push_clip_rect(pt(20.0, 20.0), pt(30.0, 30.0), true);
        let cr = l.clip_rect();
        assert!(cr.x1 >= cr.x0 && cr.y1 >= cr.y0);
        assert_eq!(cr.width(), 0.0);
    }

    #[test]
    fn callback_is_never_merged_into() {
        let mut l = list();
        l.add_rect_filled(pt(1.0, 1.0), pt(5.0, 5.0), Color::WHITE, 0.0);
        l.add_callback(CallbackId(3));
        assert_eq!(l.cmd_buffer().len(), 3);
        assert_eq!(l.cmd_buffer()[1].callback, Some(CallbackId(3)));
        assert!(l.cmd_buffer()[2].is_empty());
        l.add_rect_filled(pt(1.0, 1.0), pt(5.0, 5.0), Color::WHITE, 0.0);
        assert_eq!(l.cmd_buffer()[2].elem_count, 6);
    }

    #[test]
    fn channels_merge_concatenates_in_channel_order() {
        let mut l = list();
        l.add_rect_filled(pt(0.0, 0.0), pt(1.0, 1.0), Color::WHITE, 0.0);
        l.channels_split(3);
        l.channels_set_current(2);
        l.push_clip_rect(pt(0.0, 0.0), pt(20.0, 20.0), false);
        l.add_rect_filled(pt(2.0, 2.0), pt(3.0, 3.0), Color::WHITE, 0.0);
        l.pop_clip_rect();
        l.channels_set_current(1);
        l.push_clip_rect(pt(0.0, 0.0), pt(30.0, 30.0), false);
        l.add_rect_filled(pt(1.0, 1.0), pt(2.0, 2.0), Color::WHITE, 0.0);
        l.pop_clip_rect();
        l.channels_merge();

        let cmds = l.cmd_buffer();
        let clips: Vec<f64> = cmds.iter().filter(|c| c.elem_count > 0).map(|c| c.clip_rect.x1).collect();
        assert_eq!(clips, vec![200.0, 30.0, 20.0]);
        // Offsets are contiguous over the merged index buffer.
        let mut expected = 0;
        for c in cmds {
            assert_eq!(c.idx_offset, expected);
            expected += c.elem_count;
        }
        assert_eq!(expected as usize, l.idx_buffer().len());
        // Channel 2 indices now follow channel 1 and reference the right vertices.
        assert_eq!(l.vtx_buffer()[l.idx_buffer()[12] as usize].pos, [2.0, 2.0]);
        assert_eq!(l.channels_count(), 1);
    }

    #[test]
    fn split_then_merge_without_draws_is_identity() {
        let mut l = list();
        l.add_rect_filled(pt(0.0, 0.0), pt(1.0, 1.0), Color::WHITE, 0.0);
        l.push_clip_rect(pt(0.0, 0.0), pt(20.0, 20.0), false);
        let cmds = l.cmd_buffer().to_vec();
        let idx = l.idx_buffer().to_vec();
        let vtx: Vec<u8> = bytemuck::cast_slice(l.vtx_buffer()).to_vec();

        l.channels_split(4);
        for i in [3, 1, 2, 0] {
            l.channels_set_current(i);
        }
        l.channels_merge();

        assert_eq!(l.cmd_buffer(), &cmds[..]);
        assert_eq!(l.idx_buffer(), &idx[..]);
        assert_eq!(bytemuck::cast_slice::<DrawVert, u8>(l.vtx_buffer()), &vtx[..]);
    }

    #[test]
    fn clear_keeps_channel_storage() {
        let mut l = list();
        l.channels_split(2);
        l.channels_merge();
        l.clear();
        assert!(l.is_empty());
        assert_eq!(l.channels.len(), 2);
        assert_eq!(l.clip_rect_depth(), 0);
    }

    #[test]
    #[should_panic(expected = "without a matching push_clip_rect")]
    fn unbalanced_pop_panics() {
        let mut l = DrawList::default();
        l.pop_clip_rect();
    }
}
