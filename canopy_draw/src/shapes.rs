// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape helpers and path building on top of the draw list primitives.
//!
//! Every `add_*` helper returns without touching the buffers when its colour is
//! fully transparent, so invisible shapes never produce degenerate commands.

use kurbo::{Point, Vec2};

use crate::color::Color;
use crate::list::DrawList;
use crate::types::{Corners, TextureId};

const HALF_PIXEL: Vec2 = Vec2::new(0.5, 0.5);

impl DrawList {
    /// Stroke a line from `a` to `b`, offset by half a pixel so it lands on pixel centres.
    pub fn add_line(&mut self, a: Point, b: Point, col: Color, thickness: f64) {
        if col.is_transparent() {
            return;
        }
        self.path_line_to(a + HALF_PIXEL);
        self.path_line_to(b + HALF_PIXEL);
        self.path_stroke(col, false, thickness);
    }

    /// Stroke the outline of `a..b`.
    pub fn add_rect(&mut self, a: Point, b: Point, col: Color, rounding: f64, corners: Corners, thickness: f64) {
        if col.is_transparent() {
            return;
        }
        self.path_rect(a + HALF_PIXEL, b - HALF_PIXEL, rounding, corners);
        self.path_stroke(col, true, thickness);
    }

    /// Fill `a..b`, rounding every corner by `rounding`.
    pub fn add_rect_filled(&mut self, a: Point, b: Point, col: Color, rounding: f64) {
        self.add_rect_filled_corners(a, b, col, rounding, Corners::all());
    }

    /// Fill `a..b`, rounding only the selected corners.
    pub fn add_rect_filled_corners(&mut self, a: Point, b: Point, col: Color, rounding: f64, corners: Corners) {
        if col.is_transparent() {
            return;
        }
        if rounding > 0.0 && !corners.is_empty() {
            self.path_rect(a, b, rounding, corners);
            self.path_fill_convex(col);
        } else {
            self.prim_reserve(6, 4);
            self.prim_rect(a, b, col.to_packed());
        }
    }

    /// Fill `a..c` with a colour per corner (upper-left, upper-right, bottom-right, bottom-left).
    pub fn add_rect_filled_multicolor(&mut self, a: Point, c: Point, cols: [Color; 4]) {
        if cols.iter().all(|c| c.is_transparent()) {
            return;
        }
        let uv = self.shared.tex_uv_white_pixel;
        self.prim_reserve(6, 4);
        let base = self.vtx_current_idx();
        for i in [0, 1, 2, 0, 2, 3] {
            self.prim_write_idx(base + i);
        }
        self.prim_write_vtx(a, uv, cols[0].to_packed());
        self.prim_write_vtx(Point::new(c.x, a.y), uv, cols[1].to_packed());
        self.prim_write_vtx(c, uv, cols[2].to_packed());
        self.prim_write_vtx(Point::new(a.x, c.y), uv, cols[3].to_packed());
    }

    /// Stroke a quadrilateral.
    pub fn add_quad(&mut self, a: Point, b: Point, c: Point, d: Point, col: Color, thickness: f64) {
        if col.is_transparent() {
            return;
        }
        for p in [a, b, c, d] {
            self.path_line_to(p);
        }
        self.path_stroke(col, true, thickness);
    }

    /// Stroke a triangle.
    pub fn add_triangle(&mut self, a: Point, b: Point, c: Point, col: Color, thickness: f64) {
        if col.is_transparent() {
            return;
        }
        for p in [a, b, c] {
            self.path_line_to(p);
        }
        self.path_stroke(col, true, thickness);
    }

    /// Fill a triangle.
    pub fn add_triangle_filled(&mut self, a: Point, b: Point, c: Point, col: Color) {
        if col.is_transparent() {
            return;
        }
        for p in [a, b, c] {
            self.path_line_to(p);
        }
        self.path_fill_convex(col);
    }

    /// Stroke a circle approximated with `segments` segments.
    pub fn add_circle(&mut self, centre: Point, radius: f64, col: Color, segments: usize, thickness: f64) {
        if col.is_transparent() || segments < 3 {
            return;
        }
        let a_max = core::f64::consts::TAU * ((segments - 1) as f64) / segments as f64;
        self.path_arc_to(centre, radius - 0.5, 0.0, a_max, segments - 1);
        self.path_stroke(col, true, thickness);
    }

    /// Fill a circle approximated with `segments` segments.
    pub fn add_circle_filled(&mut self, centre: Point, radius: f64, col: Color, segments: usize) {
        if col.is_transparent() || segments < 3 {
            return;
        }
        let a_max = core::f64::consts::TAU * ((segments - 1) as f64) / segments as f64;
        self.path_arc_to(centre, radius, 0.0, a_max, segments - 1);
        self.path_fill_convex(col);
    }

    /// Stroke a cubic bezier from `p1` to `p4`; `segments == 0` tessellates adaptively.
    pub fn add_bezier_curve(&mut self, p1: Point, c1: Point, c2: Point, p4: Point, col: Color, thickness: f64, segments: usize) {
        if col.is_transparent() {
            return;
        }
        self.path_line_to(p1);
        self.path_bezier_curve_to(c1, c2, p4, segments);
        self.path_stroke(col, false, thickness);
    }

    /// Draw `texture_id` stretched over `a..b`.
    ///
    /// The texture is pushed only when it differs from the current one, so runs of
    /// images from the same texture share a command.
    pub fn add_image(&mut self, texture_id: TextureId, a: Point, b: Point, uv_a: Point, uv_b: Point, col: Color) {
        if col.is_transparent() {
            return;
        }
        let push_texture = self.texture_id() != texture_id;
        if push_texture {
            self.push_texture_id(texture_id);
        }
        self.prim_reserve(6, 4);
        self.prim_rect_uv(a, b, uv_a, uv_b, col.to_packed());
        if push_texture {
            self.pop_texture_id();
        }
    }

    /// Stroke a polyline as one quad per segment.
    pub fn add_polyline(&mut self, points: &[Point], col: Color, closed: bool, thickness: f64) {
        let n = points.len();
        if n < 2 || col.is_transparent() {
            return;
        }
        let count = if closed { n } else { n - 1 };
        let uv = self.shared.tex_uv_white_pixel;
        let packed = col.to_packed();
        self.prim_reserve(count * 6, count * 4);
        for i1 in 0..count {
            let i2 = if i1 + 1 == n { 0 } else { i1 + 1 };
            let p1 = points[i1];
            let p2 = points[i2];
            let mut d = p2 - p1;
            let len = d.hypot();
            if len > 0.0 {
                d /= len;
            }
            let d = d * (thickness * 0.5);
            let n_off = Vec2::new(d.y, -d.x);
            self.prim_quad_uv(p1 + n_off, p2 + n_off, p2 - n_off, p1 - n_off, [uv; 4], packed);
        }
    }

    /// Fill a convex polygon as a triangle fan.
    pub fn add_convex_poly_filled(&mut self, points: &[Point], col: Color) {
        let n = points.len();
        if n < 3 || col.is_transparent() {
            return;
        }
        let uv = self.shared.tex_uv_white_pixel;
        let packed = col.to_packed();
        self.prim_reserve((n - 2) * 3, n);
        let base = self.vtx_current_idx();
        for &p in points {
            self.prim_write_vtx(p, uv, packed);
        }
        for i in 2..crate::list::to_idx(n) {
            self.prim_write_idx(base);
            self.prim_write_idx(base + i - 1);
            self.prim_write_idx(base + i);
        }
    }

    /// Discard the current path.
    pub fn path_clear(&mut self) {
        self.path.clear();
    }

    /// Append a point to the current path.
    pub fn path_line_to(&mut self, pos: Point) {
        self.path.push(pos);
    }

    /// Append a point unless it repeats the last one.
    pub fn path_line_to_merge_duplicate(&mut self, pos: Point) {
        if self.path.last() != Some(&pos) {
            self.path.push(pos);
        }
    }

    /// Append an arc between angles `a_min` and `a_max` (radians) using `segments` segments.
    pub fn path_arc_to(&mut self, centre: Point, radius: f64, a_min: f64, a_max: f64, segments: usize) {
        if radius == 0.0 || segments == 0 {
            self.path.push(centre);
            return;
        }
        self.path.reserve(segments + 1);
        for i in 0..=segments {
            let a = a_min + (i as f64 / segments as f64) * (a_max - a_min);
            self.path.push(centre + Vec2::new(a.cos(), a.sin()) * radius);
        }
    }

    /// Append an arc using the precomputed 12-step circle, from step `a_min_of_12` to
    /// `a_max_of_12` inclusive (0 is +x, 3 is +y).
    pub fn path_arc_to_fast(&mut self, centre: Point, radius: f64, a_min_of_12: usize, a_max_of_12: usize) {
        if radius == 0.0 || a_min_of_12 > a_max_of_12 {
            self.path.push(centre);
            return;
        }
        for a in a_min_of_12..=a_max_of_12 {
            let c = self.shared.circle_vtx12[a % 12];
            self.path.push(centre + c * radius);
        }
    }

    /// Append a cubic bezier from the last path point; `segments == 0` tessellates
    /// adaptively within the shared curve tolerance.
    pub fn path_bezier_curve_to(&mut self, c1: Point, c2: Point, end: Point, segments: usize) {
        let Some(&start) = self.path.last() else {
            self.path.push(end);
            return;
        };
        if segments == 0 {
            let tol = self.shared.curve_tessellation_tol;
            bezier_casteljau(&mut self.path, start, c1, c2, end, tol, 0);
        } else {
            let step = 1.0 / segments as f64;
            for i in 1..=segments {
                let t = step * i as f64;
                let u = 1.0 - t;
                let w1 = u * u * u;
                let w2 = 3.0 * u * u * t;
                let w3 = 3.0 * u * t * t;
                let w4 = t * t * t;
                self.path.push(Point::new(
                    w1 * start.x + w2 * c1.x + w3 * c2.x + w4 * end.x,
                    w1 * start.y + w2 * c1.y + w3 * c2.y + w4 * end.y,
                ));
            }
        }
    }

    /// Append the outline of `a..b` with the selected corners rounded.
    pub fn path_rect(&mut self, a: Point, b: Point, rounding: f64, corners: Corners) {
        let horizontal_pair = corners.contains(Corners::TOP) || corners.contains(Corners::BOTTOM);
        let vertical_pair = corners.contains(Corners::LEFT) || corners.contains(Corners::RIGHT);
        let mut rounding = rounding.min((b.x - a.x).abs() * if horizontal_pair { 0.5 } else { 1.0 } - 1.0);
        rounding = rounding.min((b.y - a.y).abs() * if vertical_pair { 0.5 } else { 1.0 } - 1.0);

        if rounding <= 0.0 || corners.is_empty() {
            self.path_line_to(a);
            self.path_line_to(Point::new(b.x, a.y));
            self.path_line_to(b);
            self.path_line_to(Point::new(a.x, b.y));
            return;
        }
        let r = |c: Corners| if corners.contains(c) { rounding } else { 0.0 };
        let tl = r(Corners::TOP_LEFT);
        let tr = r(Corners::TOP_RIGHT);
        let br = r(Corners::BOTTOM_RIGHT);
        let bl = r(Corners::BOTTOM_LEFT);
        self.path_arc_to_fast(Point::new(a.x + tl, a.y + tl), tl, 6, 9);
        self.path_arc_to_fast(Point::new(b.x - tr, a.y + tr), tr, 9, 12);
        self.path_arc_to_fast(Point::new(b.x - br, b.y - br), br, 0, 3);
        self.path_arc_to_fast(Point::new(a.x + bl, b.y - bl), bl, 3, 6);
    }

    /// Fill the current path as a convex polygon and clear it.
    pub fn path_fill_convex(&mut self, col: Color) {
        let path = core::mem::take(&mut self.path);
        self.add_convex_poly_filled(&path, col);
        self.path = path;
        self.path.clear();
    }

    /// Stroke the current path and clear it.
    pub fn path_stroke(&mut self, col: Color, closed: bool, thickness: f64) {
        let path = core::mem::take(&mut self.path);
        self.add_polyline(&path, col, closed, thickness);
        self.path = path;
        self.path.clear();
    }
}

fn bezier_casteljau(path: &mut Vec<Point>, p1: Point, p2: Point, p3: Point, p4: Point, tol: f64, level: u32) {
    let dx = p4.x - p1.x;
    let dy = p4.y - p1.y;
    let d2 = ((p2.x - p4.x) * dy - (p2.y - p4.y) * dx).abs();
    let d3 = ((p3.x - p4.x) * dy - (p3.y - p4.y) * dx).abs();
    if (d2 + d3) * (d2 + d3) < tol * (dx * dx + dy * dy) {
        path.push(p4);
    } else if level < 10 {
        let p12 = p1.midpoint(p2);
        let p23 = p2.midpoint(p3);
        let p34 = p3.midpoint(p4);
        let p123 = p12.midpoint(p23);
        let p234 = p23.midpoint(p34);
        let p1234 = p123.midpoint(p234);
        bezier_casteljau(path, p1, p12, p123, p1234, tol, level + 1);
        bezier_casteljau(path, p1234, p234, p34, p4, tol, level + 1);
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::DrawListSharedData;

    fn list() -> DrawList {
        let mut l = DrawList::new(DrawListSharedData::with_display_rect(Rect::new(
            0.0, 0.0, 100.0, 100.0,
        )));
        l.push_clip_rect_full_screen();
        l
    }

    #[test]
    fn zero_alpha_emits_nothing() {
        let mut l = list();
        let clear = Color::rgba8(255, 0, 0, 0);
        l.add_line(Point::ZERO, Point::new(10.0, 10.0), clear, 1.0);
        l.add_rect(Point::ZERO, Point::new(10.0, 10.0), clear, 0.0, Corners::all(), 1.0);
        l.add_rect_filled(Point::ZERO, Point::new(10.0, 10.0), clear, 4.0);
        l.add_circle_filled(Point::new(5.0, 5.0), 3.0, clear, 12);
        l.add_image(TextureId(9), Point::ZERO, Point::new(4.0, 4.0), Point::ZERO, Point::new(1.0, 1.0), clear);
        assert!(l.vtx_buffer().is_empty());
        assert!(l.idx_buffer().is_empty());
        assert_eq!(l.cmd_buffer().len(), 1);
        assert_eq!(l.cmd_buffer()[0].elem_count, 0);
    }

    #[test]
    fn line_is_one_quad() {
        let mut l = list();
        l.add_line(Point::ZERO, Point::new(10.0, 0.0), Color::WHITE, 2.0);
        assert_eq!(l.vtx_buffer().len(), 4);
        assert_eq!(l.idx_buffer().len(), 6);
        // Offset by half a pixel, widened by half the thickness.
        assert_eq!(l.vtx_buffer()[0].pos, [0.5, -0.5]);
        assert_eq!(l.vtx_buffer()[3].pos, [0.5, 1.5]);
    }

    #[test]
    fn rounded_fill_is_a_fan() {
        let mut l = list();
        l.add_rect_filled(Point::ZERO, Point::new(20.0, 20.0), Color::WHITE, 4.0);
        // Four quarter arcs of 4 points each.
        assert_eq!(l.vtx_buffer().len(), 16);
        assert_eq!(l.idx_buffer().len(), (16 - 2) * 3);
        assert_eq!(l.cmd_buffer()[0].elem_count as usize, l.idx_buffer().len());
        assert!(l.path.is_empty());
    }

    #[test]
    fn consecutive_images_share_a_command() {
        let mut l = list();
        l.add_rect_filled(Point::ZERO, Point::new(2.0, 2.0), Color::WHITE, 0.0);
        l.add_image(TextureId(5), Point::ZERO, Point::new(4.0, 4.0), Point::ZERO, Point::new(1.0, 1.0), Color::WHITE);
        l.add_image(TextureId(5), Point::ZERO, Point::new(4.0, 4.0), Point::ZERO, Point::new(1.0, 1.0), Color::WHITE);
        // The second image merges back into the first textured command.
        let textured: Vec<_> = l.cmd_buffer().iter().filter(|c| c.texture_id == TextureId(5)).collect();
        assert_eq!(textured.len(), 1);
        assert_eq!(textured[0].elem_count, 12);
        assert_eq!(l.texture_id(), TextureId::default());
    }

    #[test]
    fn merge_duplicate_skips_repeats() {
        let mut l = list();
        l.path_line_to_merge_duplicate(Point::new(1.0, 1.0));
        l.path_line_to_merge_duplicate(Point::new(1.0, 1.0));
        l.path_line_to_merge_duplicate(Point::new(2.0, 1.0));
        assert_eq!(l.path.len(), 2);
        l.path_clear();
        assert!(l.path.is_empty());
    }

    #[test]
    fn bezier_ends_on_endpoint() {
        let mut l = list();
        l.path_line_to(Point::ZERO);
        l.path_bezier_curve_to(Point::new(0.0, 50.0), Point::new(50.0, 50.0), Point::new(50.0, 0.0), 0);
        assert!(l.path.len() > 2);
        assert_eq!(l.path.last(), Some(&Point::new(50.0, 0.0)));
    }

    #[test]
    fn polyline_needs_two_points() {
        let mut l = list();
        l.add_polyline(&[Point::ZERO], Color::WHITE, false, 1.0);
        assert!(l.vtx_buffer().is_empty());
        l.add_convex_poly_filled(&[Point::ZERO, Point::new(1.0, 0.0)], Color::WHITE);
        assert!(l.vtx_buffer().is_empty());
    }
}
