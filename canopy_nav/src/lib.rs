// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Nav: keyboard and gamepad navigation primitives.
//!
//! Immediate-mode UIs have no tree to walk when the user presses an arrow key: the
//! candidates only exist while the frame is being built. This crate therefore models
//! navigation as an **incremental scoring pass**:
//!
//! - A **move request** ([`NavScorer`]) captures the direction ([`NavDir`]) and the
//!   rectangle of the currently focused item.
//! - Every item submitted during the frame is offered as a [`NavCandidate`]; the scorer
//!   keeps the best one in a [`NavMoveResult`].
//! - The host applies the winner at the start of the next frame.
//!
//! Sequential Tab navigation is handled separately by [`TabFocus`], a pair of
//! per-window counters that turn "the next tab stop" into an index resolved while the
//! next frame re-submits the same items. Requests that cannot be satisfied locally
//! (for example moving right past the last menu in a menu bar) may be handed to the
//! next frame with [`NavForward`].
//!
//! ## Minimal example
//!
//! Moving down from a button picks the nearest button below it:
//!
//! ```rust
//! use canopy_nav::{NavCandidate, NavDir, NavMoveResult, NavScorer};
//! use kurbo::Rect;
//!
//! let clip = Rect::new(0.0, 0.0, 200.0, 200.0);
//! let scorer = NavScorer::new(NavDir::Down, Rect::new(10.0, 10.0, 10.0, 30.0));
//! let mut best = NavMoveResult::default();
//!
//! for (id, y) in [(1_u32, 10.0), (2, 40.0), (3, 70.0)] {
//!     let rect = Rect::new(10.0, y, 90.0, y + 20.0);
//!     if id == 1 {
//!         continue; // The origin itself is not a candidate.
//!     }
//!     scorer.score(&mut best, NavCandidate::new(id, rect, clip));
//! }
//! assert_eq!(best.target, Some(2));
//! ```
//!
//! The scoring rectangle of the origin usually has its `x1` collapsed onto `x0`, so that
//! items of different widths in a column still line up for vertical moves.

use kurbo::Rect;

/// A cardinal navigation direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NavDir {
    /// Towards smaller x.
    Left,
    /// Towards larger x.
    Right,
    /// Towards smaller y.
    Up,
    /// Towards larger y.
    Down,
}

impl NavDir {
    /// Direction of the dominant axis of `(dx, dy)`; ties go to the vertical axis.
    pub fn from_delta(dx: f64, dy: f64) -> Self {
        if dx.abs() > dy.abs() {
            if dx > 0.0 { Self::Right } else { Self::Left }
        } else if dy > 0.0 {
            Self::Down
        } else {
            Self::Up
        }
    }

    /// Whether this direction moves along the y axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// The direction pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Navigation layer of a window.
///
/// The menu layer (title and menu bar) is navigated separately from the main content
/// so that arrows inside a menu bar never fall into the window body.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NavLayer {
    /// Window content.
    #[default]
    Main,
    /// Menu bar and title bar.
    Menu,
}

impl NavLayer {
    /// Number of layers.
    pub const COUNT: usize = 2;

    /// Slot of this layer in per-layer arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The other layer.
    pub fn toggled(self) -> Self {
        match self {
            Self::Main => Self::Menu,
            Self::Menu => Self::Main,
        }
    }
}

/// An item offered to a [`NavScorer`].
#[derive(Clone, Debug)]
pub struct NavCandidate<K> {
    /// What the caller wants back if this candidate wins (an id, or an id plus context).
    pub target: K,
    /// Item bounds in the same space as the scorer's origin rectangle.
    pub rect: Rect,
    /// Clip rectangle of the containing window; bounds are clamped to it on the
    /// axis perpendicular to the move.
    pub clip: Rect,
    /// Whether this item was submitted before the origin item. Only consulted when the
    /// candidate and origin share the same centre.
    pub precedes_origin: bool,
}

impl<K> NavCandidate<K> {
    /// A candidate submitted after the origin.
    pub fn new(target: K, rect: Rect, clip: Rect) -> Self {
        Self {
            target,
            rect,
            clip,
            precedes_origin: false,
        }
    }
}

/// Best candidate found so far by a [`NavScorer`].
#[derive(Clone, Debug, PartialEq)]
pub struct NavMoveResult<K> {
    /// Winning target, if any candidate qualified.
    pub target: Option<K>,
    /// Bounds of the winner (unclamped).
    pub rect: Rect,
    /// Box distance of the winner; `f64::MAX` until a candidate lies in the move quadrant.
    pub dist_box: f64,
    /// Centre distance of the winner.
    pub dist_center: f64,
    /// Axial distance of the tentative axial winner.
    pub dist_axial: f64,
}

impl<K> Default for NavMoveResult<K> {
    fn default() -> Self {
        Self {
            target: None,
            rect: Rect::ZERO,
            dist_box: f64::MAX,
            dist_center: f64::MAX,
            dist_axial: f64::MAX,
        }
    }
}

impl<K> NavMoveResult<K> {
    /// Forget the current winner.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Scores candidates for a directional move.
///
/// Candidates are compared by box distance, then centre distance, then submission
/// order. When [`NavScorer::allow_axial`] is set, a candidate that merely lies on the
/// right side of the origin can win while no candidate lies in the move quadrant;
/// menu bars use this so that every menu has a neighbour.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NavScorer {
    /// Direction of the move.
    pub dir: NavDir,
    /// Scoring rectangle of the origin.
    pub origin: Rect,
    /// Accept axial fallbacks.
    pub allow_axial: bool,
}

impl NavScorer {
    /// Create a scorer without axial fallback.
    pub fn new(dir: NavDir, origin: Rect) -> Self {
        Self {
            dir,
            origin,
            allow_axial: false,
        }
    }

    /// Offer `candidate`; returns `true` and records it in `result` when it beats the
    /// current best.
    pub fn score<K>(&self, result: &mut NavMoveResult<K>, candidate: NavCandidate<K>) -> bool {
        let curr = self.origin;
        let mut cand = candidate.rect;
        let clip = candidate.clip;
        if self.dir.is_vertical() {
            cand.x0 = cand.x0.clamp(clip.x0, clip.x1.max(clip.x0));
            cand.x1 = cand.x1.clamp(clip.x0, clip.x1.max(clip.x0));
        } else {
            cand.y0 = cand.y0.clamp(clip.y0, clip.y1.max(clip.y0));
            cand.y1 = cand.y1.clamp(clip.y0, clip.y1.max(clip.y0));
        }

        let mut dbx = dist_interval(cand.x0, cand.x1, curr.x0, curr.x1);
        // Vertical extents are shrunk so that vertically touching items still use box distance.
        let dby = dist_interval(
            lerp(cand.y0, cand.y1, 0.2),
            lerp(cand.y0, cand.y1, 0.8),
            lerp(curr.y0, curr.y1, 0.2),
            lerp(curr.y0, curr.y1, 0.8),
        );
        if dby != 0.0 && dbx != 0.0 {
            dbx = dbx / 1000.0 + if dbx > 0.0 { 1.0 } else { -1.0 };
        }
        let dist_box = dbx.abs() + dby.abs();

        // Twice the real centre offset; only compared against itself.
        let dcx = (cand.x0 + cand.x1) - (curr.x0 + curr.x1);
        let dcy = (cand.y0 + cand.y1) - (curr.y0 + curr.y1);
        let dist_center = dcx.abs() + dcy.abs();

        let (dax, day, dist_axial, quadrant) = if dbx != 0.0 || dby != 0.0 {
            (dbx, dby, dist_box, NavDir::from_delta(dbx, dby))
        } else if dcx != 0.0 || dcy != 0.0 {
            (dcx, dcy, dist_center, NavDir::from_delta(dcx, dcy))
        } else if candidate.precedes_origin {
            (0.0, 0.0, 0.0, NavDir::Left)
        } else {
            (0.0, 0.0, 0.0, NavDir::Right)
        };

        let mut new_best = false;
        if quadrant == self.dir {
            if dist_box < result.dist_box {
                result.dist_box = dist_box;
                result.dist_center = dist_center;
                result.target = Some(candidate.target);
                result.rect = candidate.rect;
                return true;
            }
            if dist_box == result.dist_box {
                if dist_center < result.dist_center {
                    result.dist_center = dist_center;
                    new_best = true;
                } else if dist_center == result.dist_center {
                    // Still tied: later items count as infinitesimally further right/down.
                    let along = if self.dir.is_vertical() { dby } else { dbx };
                    new_best = along < 0.0;
                }
            }
        }

        if self.allow_axial && result.dist_box == f64::MAX && dist_axial < result.dist_axial {
            let on_side = match self.dir {
                NavDir::Left => dax < 0.0,
                NavDir::Right => dax > 0.0,
                NavDir::Up => day < 0.0,
                NavDir::Down => day > 0.0,
            };
            if on_side {
                result.dist_axial = dist_axial;
                new_best = true;
            }
        }

        if new_best {
            result.target = Some(candidate.target);
            result.rect = candidate.rect;
        }
        new_best
    }

    /// Score every candidate and return the winner.
    pub fn pick<K, I>(&self, candidates: I) -> Option<K>
    where
        I: IntoIterator<Item = NavCandidate<K>>,
    {
        let mut result = NavMoveResult::default();
        for c in candidates {
            self.score(&mut result, c);
        }
        result.target
    }
}

fn dist_interval(a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    if a1 < b0 {
        a1 - b0
    } else if b1 < a0 {
        a0 - b1
    } else {
        0.0
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Outcome of registering an item with [`TabFocus`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TabHit {
    /// No focus request targets this item.
    Miss,
    /// A programmatic request for this item's index among all focusable items.
    Requested,
    /// A Tab or Shift-Tab request landed on this item.
    Tabbed,
}

/// Per-window sequential focus counters.
///
/// Items register in submission order. A request made during frame `N` names an index
/// that is resolved against the items re-submitted in frame `N + 1`, wrapping modulo the
/// number of items seen in frame `N`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabFocus {
    all_counter: i32,
    tab_counter: i32,
    all_request_current: Option<i32>,
    tab_request_current: Option<i32>,
    all_request_next: Option<i32>,
    tab_request_next: Option<i32>,
}

impl Default for TabFocus {
    fn default() -> Self {
        Self {
            all_counter: -1,
            tab_counter: -1,
            all_request_current: None,
            tab_request_current: None,
            all_request_next: None,
            tab_request_next: None,
        }
    }
}

impl TabFocus {
    /// Turn last frame's requests into this frame's targets and reset the counters.
    pub fn begin_frame(&mut self) {
        self.all_request_current = resolve(self.all_request_next, self.all_counter);
        self.tab_request_current = resolve(self.tab_request_next, self.tab_counter);
        self.all_counter = -1;
        self.tab_counter = -1;
        self.all_request_next = None;
        self.tab_request_next = None;
    }

    /// Register the next focusable item; `tab_stop` is false for items Tab skips.
    pub fn register(&mut self, tab_stop: bool) -> TabHit {
        self.all_counter += 1;
        if tab_stop {
            self.tab_counter += 1;
        }
        if self.all_request_current == Some(self.all_counter) {
            return TabHit::Requested;
        }
        if tab_stop && self.tab_request_current == Some(self.tab_counter) {
            return TabHit::Tabbed;
        }
        TabHit::Miss
    }

    /// Undo the last [`TabFocus::register`] for an item that turned out not to be focusable.
    pub fn unregister(&mut self, tab_stop: bool) {
        self.all_counter -= 1;
        if tab_stop {
            self.tab_counter -= 1;
        }
    }

    /// Index of the last registered tab stop, `-1` before any.
    pub fn tab_counter(&self) -> i32 {
        self.tab_counter
    }

    /// Whether a request is waiting for the next frame.
    pub fn has_pending_request(&self) -> bool {
        self.all_request_next.is_some() || self.tab_request_next.is_some()
    }

    /// Request the tab stop after (or before, with `backwards`) the stop with index `from`.
    ///
    /// With `from == None` the first (or last) stop is requested.
    pub fn request_tab(&mut self, from: Option<i32>, backwards: bool) {
        self.tab_request_next = Some(match (from, backwards) {
            (Some(i), false) => i + 1,
            (Some(i), true) => i - 1,
            (None, false) => 0,
            (None, true) => -1,
        });
    }

    /// Request the focusable item with index `index` among all registered items.
    pub fn request_index(&mut self, index: i32) {
        self.all_request_next = Some(index);
    }
}

fn resolve(request: Option<i32>, counter: i32) -> Option<i32> {
    let count = counter + 1;
    match request {
        Some(r) if count > 0 => Some(r.rem_euclid(count)),
        _ => None,
    }
}

/// A directional request handed from one frame to the next.
///
/// The forward is consumed exactly once: [`NavForward::take`] returns the direction and
/// resets to [`NavForward::None`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NavForward {
    /// Nothing pending.
    #[default]
    None,
    /// A move in this direction should run at the next navigation pass.
    Queued(NavDir),
}

impl NavForward {
    /// Take the pending direction, if any.
    pub fn take(&mut self) -> Option<NavDir> {
        match core::mem::take(self) {
            Self::None => None,
            Self::Queued(dir) => Some(dir),
        }
    }

    /// Whether a forward is pending.
    pub fn is_queued(&self) -> bool {
        matches!(self, Self::Queued(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIP: Rect = Rect::new(-1000.0, -1000.0, 1000.0, 1000.0);

    fn cand(id: u32, rect: Rect) -> NavCandidate<u32> {
        NavCandidate::new(id, rect, CLIP)
    }

    #[test]
    fn directional_prefers_forward_candidates() {
        let origin = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(20.0, 0.0, 30.0, 10.0);
        let left = Rect::new(-30.0, 0.0, -20.0, 10.0);

        let pick = |dir| NavScorer::new(dir, origin).pick([cand(2, right), cand(3, left)]);
        assert_eq!(pick(NavDir::Right), Some(2));
        assert_eq!(pick(NavDir::Left), Some(3));
        assert_eq!(pick(NavDir::Up), None);
    }

    #[test]
    fn closer_box_wins() {
        let origin = Rect::new(0.0, 0.0, 0.0, 20.0);
        let scorer = NavScorer::new(NavDir::Down, origin);
        let near = Rect::new(0.0, 25.0, 80.0, 45.0);
        let far = Rect::new(0.0, 50.0, 80.0, 70.0);
        assert_eq!(scorer.pick([cand(2, far), cand(1, near)]), Some(1));
    }

    #[test]
    fn next_row_beats_offset_item_further_down() {
        // Origin collapsed to its left edge, as the host does for vertical moves.
        let origin = Rect::new(10.0, 0.0, 10.0, 20.0);
        let scorer = NavScorer::new(NavDir::Down, origin);
        let wide = Rect::new(10.0, 24.0, 300.0, 44.0);
        let offset = Rect::new(200.0, 40.0, 240.0, 60.0);
        assert_eq!(scorer.pick([cand(1, offset), cand(2, wide)]), Some(2));
    }

    #[test]
    fn candidates_clamped_to_clip_on_cross_axis() {
        let clip = Rect::new(0.0, 0.0, 100.0, 100.0);
        let origin = Rect::new(0.0, 0.0, 0.0, 10.0);
        let scorer = NavScorer::new(NavDir::Down, origin);
        // Far to the right, clamped back to the clip edge at x = 100.
        let clamped = NavCandidate::new(1_u32, Rect::new(500.0, 20.0, 600.0, 30.0), clip);
        let mut result = NavMoveResult::default();
        assert!(scorer.score(&mut result, clamped));
        // 1 + 100 / 1000 horizontally, 22 - 8 vertically.
        assert!((result.dist_box - 15.1).abs() < 1e-9, "dist_box = {}", result.dist_box);
        assert_eq!(result.rect, Rect::new(500.0, 20.0, 600.0, 30.0));
    }

    #[test]
    fn exact_overlap_breaks_ties_by_order() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let scorer = NavScorer::new(NavDir::Right, r);
        let later = cand(2, r);
        assert_eq!(scorer.pick([later]), Some(2));
        let earlier = NavCandidate {
            precedes_origin: true,
            ..cand(1, r)
        };
        assert_eq!(scorer.pick([earlier.clone()]), None);
        assert_eq!(NavScorer::new(NavDir::Left, r).pick([earlier]), Some(1));
    }

    #[test]
    fn axial_fallback_only_when_enabled() {
        let origin = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Mostly below, slightly to the right: quadrant is Down, not Right.
        let diag = Rect::new(12.0, 100.0, 20.0, 110.0);
        let mut scorer = NavScorer::new(NavDir::Right, origin);
        assert_eq!(scorer.pick([cand(1, diag)]), None);
        scorer.allow_axial = true;
        assert_eq!(scorer.pick([cand(1, diag)]), Some(1));
    }

    #[test]
    fn tab_request_wraps_over_last_frame_count() {
        let mut tab = TabFocus::default();
        tab.begin_frame();
        for _ in 0..3 {
            assert_eq!(tab.register(true), TabHit::Miss);
        }
        // Tab from the last stop wraps to the first.
        tab.request_tab(Some(2), false);
        tab.begin_frame();
        assert_eq!(tab.register(true), TabHit::Tabbed);
        assert_eq!(tab.register(true), TabHit::Miss);
        assert_eq!(tab.register(true), TabHit::Miss);

        // Shift-Tab with no origin lands on the last stop.
        tab.request_tab(None, true);
        tab.begin_frame();
        let hits: Vec<_> = (0..3).map(|_| tab.register(true)).collect();
        assert_eq!(hits, [TabHit::Miss, TabHit::Miss, TabHit::Tabbed]);
    }

    #[test]
    fn non_tab_stops_are_skipped_by_tab_but_reachable_by_index() {
        let mut tab = TabFocus::default();
        tab.begin_frame();
        tab.register(true);
        tab.register(false);
        tab.register(true);
        assert_eq!(tab.tab_counter(), 1);

        tab.request_tab(Some(0), false);
        tab.begin_frame();
        assert_eq!(tab.register(true), TabHit::Miss);
        assert_eq!(tab.register(false), TabHit::Miss);
        assert_eq!(tab.register(true), TabHit::Tabbed);

        tab.request_index(1);
        tab.begin_frame();
        tab.register(true);
        assert_eq!(tab.register(false), TabHit::Requested);
    }

    #[test]
    fn request_without_items_is_dropped() {
        let mut tab = TabFocus::default();
        tab.begin_frame();
        tab.request_tab(None, false);
        assert!(tab.has_pending_request());
        tab.begin_frame();
        assert!(!tab.has_pending_request());
        assert_eq!(tab.register(true), TabHit::Miss);
    }

    #[test]
    fn forward_is_consumed_once() {
        let mut fwd = NavForward::Queued(NavDir::Right);
        assert!(fwd.is_queued());
        assert_eq!(fwd.take(), Some(NavDir::Right));
        assert_eq!(fwd.take(), None);
        assert_eq!(fwd, NavForward::None);
    }

    #[test]
    fn quadrant_from_delta() {
        assert_eq!(NavDir::from_delta(5.0, 1.0), NavDir::Right);
        assert_eq!(NavDir::from_delta(-5.0, 1.0), NavDir::Left);
        assert_eq!(NavDir::from_delta(1.0, 1.0), NavDir::Down);
        assert_eq!(NavDir::from_delta(0.0, -1.0), NavDir::Up);
        assert_eq!(NavDir::Up.opposite(), NavDir::Down);
        assert_eq!(NavLayer::Main.toggled(), NavLayer::Menu);
    }
}
