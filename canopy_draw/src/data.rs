// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattened draw data handed to a rendering backend.

use kurbo::{Point, Size};

use crate::list::DrawList;

/// Layer selector for [`DrawDataBuilder`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DrawLayer {
    /// Regular window content.
    Normal,
    /// Content drawn above every normal window (tooltips).
    Upper,
}

/// Collects draw list owners per layer before they are flattened in paint order.
///
/// `K` is whatever handle the caller uses to find a [`DrawList`] later (for example a
/// window handle); the builder only orders them.
#[derive(Clone, Debug)]
pub struct DrawDataBuilder<K> {
    layers: [Vec<K>; 2],
}

impl<K> Default for DrawDataBuilder<K> {
    fn default() -> Self {
        Self {
            layers: [Vec::new(), Vec::new()],
        }
    }
}

impl<K: Copy> DrawDataBuilder<K> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every key, keeping allocations.
    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }

    /// Append `key` to `layer`.
    pub fn push(&mut self, layer: DrawLayer, key: K) {
        self.layers[layer as usize].push(key);
    }

    /// Keys of one layer in insertion order.
    pub fn layer(&self, layer: DrawLayer) -> &[K] {
        &self.layers[layer as usize]
    }

    /// Move the upper layer after the normal layer so a single layer remains.
    pub fn flatten_into_single_layer(&mut self) {
        let [normal, upper] = &mut self.layers;
        normal.append(upper);
    }

    /// Every key in paint order (normal layer first).
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.layers.iter().flat_map(|l| l.iter().copied())
    }
}

/// The output of one rendered frame: draw lists in paint order.
///
/// Each list carries its own vertex buffer, index buffer, and commands; command clip
/// rectangles are in screen space.
#[derive(Clone, Debug, Default)]
pub struct DrawData<'a> {
    /// Lists in back-to-front order.
    pub cmd_lists: Vec<&'a DrawList>,
    /// Sum of vertex counts over every list.
    pub total_vtx_count: usize,
    /// Sum of index counts over every list.
    pub total_idx_count: usize,
    /// Top-left of the display area.
    pub display_pos: Point,
    /// Size of the display area.
    pub display_size: Size,
}

impl<'a> DrawData<'a> {
    /// Empty draw data for a display area.
    pub fn new(display_pos: Point, display_size: Size) -> Self {
        Self {
            display_pos,
            display_size,
            ..Self::default()
        }
    }

    /// Append `list` unless it has no commands.
    ///
    /// Callers are expected to have dropped the trailing staging command with
    /// [`DrawList::pop_unused_draw_cmd`] first.
    pub fn push_list(&mut self, list: &'a DrawList) {
        if list.is_empty() {
            return;
        }
        self.total_vtx_count += list.vtx_buffer().len();
        self.total_idx_count += list.idx_buffer().len();
        self.cmd_lists.push(list);
    }

    /// True when nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.cmd_lists.is_empty()
    }

    /// Number of commands over every list.
    pub fn cmd_count(&self) -> usize {
        self.cmd_lists.iter().map(|l| l.cmd_buffer().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, DrawListSharedData};

    #[test]
    fn builder_flattens_upper_after_normal() {
        let mut b = DrawDataBuilder::new();
        b.push(DrawLayer::Upper, 9_u32);
        b.push(DrawLayer::Normal, 1);
        b.push(DrawLayer::Normal, 2);
        b.flatten_into_single_layer();
        assert_eq!(b.layer(DrawLayer::Normal), &[1, 2, 9]);
        assert!(b.layer(DrawLayer::Upper).is_empty());
        assert_eq!(b.iter().collect::<Vec<_>>(), vec![1, 2, 9]);
    }

    #[test]
    fn empty_lists_are_skipped() {
        let mut used = DrawList::new(DrawListSharedData::default());
        used.push_clip_rect_full_screen();
        used.add_rect_filled(Point::ZERO, Point::new(4.0, 4.0), Color::WHITE, 0.0);
        let mut unused = DrawList::new(DrawListSharedData::default());
        unused.push_clip_rect_full_screen();
        unused.pop_unused_draw_cmd();

        let mut data = DrawData::new(Point::ZERO, Size::new(100.0, 100.0));
        data.push_list(&unused);
        data.push_list(&used);
        assert_eq!(data.cmd_lists.len(), 1);
        assert_eq!(data.total_vtx_count, 4);
        assert_eq!(data.total_idx_count, 6);
        assert_eq!(data.cmd_count(), 1);
    }
}
