// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational arena of windows plus their back-to-front order.

use hashbrown::HashMap;

use crate::id::Id;
use crate::window::Window;

/// Stable handle to a window in a [`WindowRegistry`].
///
/// Handles carry a generation: once a window is discarded its handle stops resolving,
/// even if the slot is reused by a new window.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(u32, u32);

impl WindowHandle {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Owns every window and keeps the z-order.
///
/// `order` lists live windows back to front. Child windows appear right after their
/// parent once [`WindowRegistry::sort_for_display`] has run.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    slots: Vec<Option<Window>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    order: Vec<WindowHandle>,
    by_id: HashMap<Id, WindowHandle>,
    sort_buffer: Vec<WindowHandle>,
}

impl WindowRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `window`, placing it at the back (or front) of the z-order.
    pub fn insert(&mut self, window: Window, at_front: bool) -> WindowHandle {
        let id = window.id;
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(window);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "WindowHandle uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(window));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "WindowHandle uses 32-bit indices by design."
            )]
            ((self.slots.len() - 1) as u32, generation)
        };
        let handle = WindowHandle::new(idx, generation);
        if at_front {
            self.order.push(handle);
        } else {
            self.order.insert(0, handle);
        }
        self.by_id.insert(id, handle);
        handle
    }

    /// Whether `handle` still refers to a window.
    pub fn is_alive(&self, handle: WindowHandle) -> bool {
        self.generations.get(handle.idx()) == Some(&handle.1)
            && self.slots.get(handle.idx()).is_some_and(Option::is_some)
    }

    /// The window behind `handle`, if it is still alive.
    pub fn get(&self, handle: WindowHandle) -> Option<&Window> {
        if !self.is_alive(handle) {
            return None;
        }
        self.slots[handle.idx()].as_ref()
    }

    /// Mutable access to the window behind `handle`, if it is still alive.
    pub fn get_mut(&mut self, handle: WindowHandle) -> Option<&mut Window> {
        if !self.is_alive(handle) {
            return None;
        }
        self.slots[handle.idx()].as_mut()
    }

    /// The window behind a handle the context holds for the current frame.
    pub(crate) fn at(&self, handle: WindowHandle) -> &Window {
        match self.get(handle) {
            Some(w) => w,
            None => panic!("window handle {handle:?} is stale"),
        }
    }

    pub(crate) fn at_mut(&mut self, handle: WindowHandle) -> &mut Window {
        match self.get_mut(handle) {
            Some(w) => w,
            None => panic!("window handle {handle:?} is stale"),
        }
    }

    /// Look a window up by the hash of its name.
    pub fn find(&self, id: Id) -> Option<WindowHandle> {
        self.by_id.get(&id).copied()
    }

    /// Live windows back to front.
    pub fn order(&self) -> &[WindowHandle] {
        &self.order
    }

    /// Number of live windows.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no window exists.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position of `handle` in the z-order.
    pub fn z_index(&self, handle: WindowHandle) -> Option<usize> {
        self.order.iter().position(|&h| h == handle)
    }

    /// Iterate over every live window back to front.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (WindowHandle, &Window)> + '_ {
        self.order.iter().filter_map(|&h| self.get(h).map(|w| (h, w)))
    }

    /// Every live window, in no particular order.
    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Window> + '_ {
        self.slots.iter_mut().flatten()
    }

    /// Move `handle` to the front of the z-order.
    pub fn bring_to_front(&mut self, handle: WindowHandle) {
        if self.order.last() == Some(&handle) {
            return;
        }
        if let Some(i) = self.z_index(handle) {
            self.order.remove(i);
            self.order.push(handle);
        }
    }

    /// Move `handle` to the back of the z-order.
    pub fn bring_to_back(&mut self, handle: WindowHandle) {
        if let Some(i) = self.z_index(handle) {
            self.order.remove(i);
            self.order.insert(0, handle);
        }
    }

    /// Drop the window behind `handle`, returning it.
    pub fn remove(&mut self, handle: WindowHandle) -> Option<Window> {
        if !self.is_alive(handle) {
            return None;
        }
        let window = self.slots[handle.idx()].take()?;
        self.order.retain(|&h| h != handle);
        if self.by_id.get(&window.id) == Some(&handle) {
            self.by_id.remove(&window.id);
        }
        self.free_list.push(handle.idx());
        Some(window)
    }

    /// Reorder so that every child window directly follows its parent.
    ///
    /// Children are ordered plain windows first, then popups, then tooltips, each
    /// group in begin order. Active child windows are placed through their parent;
    /// inactive ones keep their relative position at the top level.
    pub fn sort_for_display(&mut self) {
        let mut sorted = core::mem::take(&mut self.sort_buffer);
        sorted.clear();
        sorted.reserve(self.order.len());
        for &h in &self.order {
            let Some(w) = self.get(h) else { continue };
            if w.active && w.is_child() {
                continue;
            }
            self.add_sorted_recursive(&mut sorted, h);
        }
        debug_assert_eq!(sorted.len(), self.order.len(), "every window is sorted exactly once");
        core::mem::swap(&mut self.order, &mut sorted);
        self.sort_buffer = sorted;
    }

    fn add_sorted_recursive(&self, out: &mut Vec<WindowHandle>, handle: WindowHandle) {
        out.push(handle);
        let Some(w) = self.get(handle) else { return };
        let mut children: Vec<WindowHandle> = w
            .dc
            .child_windows
            .iter()
            .copied()
            .filter(|&c| self.get(c).is_some_and(|cw| cw.active))
            .collect();
        children.sort_by_key(|&c| {
            let cw = self.get(c);
            (
                cw.is_some_and(Window::is_popup),
                cw.is_some_and(Window::is_tooltip),
                cw.map_or(0, |cw| cw.begin_order_within_parent),
            )
        });
        for c in children {
            self.add_sorted_recursive(out, c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::WindowFlags;
    use canopy_draw::DrawListSharedData;

    fn window(name: &str) -> Window {
        Window::new(name, DrawListSharedData::default())
    }

    #[test]
    fn stale_handle_does_not_resolve_after_reuse() {
        let mut reg = WindowRegistry::new();
        let a = reg.insert(window("A"), true);
        assert!(reg.remove(a).is_some());
        let b = reg.insert(window("B"), true);
        assert!(!reg.is_alive(a));
        assert!(reg.get(a).is_none());
        assert_eq!(reg.get(b).map(Window::name), Some("B"));
        assert_eq!(reg.find(Id::from_str_seeded("A", Id::NONE)), None);
        assert_eq!(reg.find(Id::from_str_seeded("B", Id::NONE)), Some(b));
    }

    #[test]
    fn bring_to_front_moves_to_end() {
        let mut reg = WindowRegistry::new();
        let a = reg.insert(window("A"), true);
        let b = reg.insert(window("B"), true);
        let c = reg.insert(window("C"), false);
        assert_eq!(reg.order(), &[c, a, b]);
        reg.bring_to_front(a);
        assert_eq!(reg.order(), &[c, b, a]);
        reg.bring_to_back(a);
        assert_eq!(reg.order(), &[a, c, b]);
    }

    #[test]
    fn children_follow_parent_popups_after_plain() {
        let mut reg = WindowRegistry::new();
        let parent = reg.insert(window("P"), true);
        let other = reg.insert(window("O"), true);
        let popup = reg.insert(window("##Popup"), true);
        let child = reg.insert(window("P/child"), true);
        for (h, flags, order) in [
            (popup, WindowFlags::POPUP | WindowFlags::CHILD_WINDOW, 0),
            (child, WindowFlags::CHILD_WINDOW, 1),
        ] {
            let w = reg.get_mut(h).unwrap();
            w.flags = flags;
            w.active = true;
            w.begin_order_within_parent = order;
        }
        for h in [parent, other] {
            reg.get_mut(h).unwrap().active = true;
        }
        reg.get_mut(parent).unwrap().dc.child_windows = vec![popup, child];
        reg.sort_for_display();
        assert_eq!(reg.order(), &[parent, child, popup, other]);
    }
}
