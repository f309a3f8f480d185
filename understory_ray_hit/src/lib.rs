// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry-level segment casting utilities.
//!
//! This crate answers one narrow question: "walking along this line segment
//! from its start, where do I first enter this shape?" It is built on top of
//! [`kurbo`] and is intentionally decoupled from any scene, index, or beam
//! model. Callers own the broad phase and the mapping from shapes to keys.
//!
//! # Typical usage
//!
//! - Keep your colliders in local (or world) coordinates alongside a key.
//! - For each candidate, call [`SegmentCast::cast_local`] with the segment
//!   expressed in the same space.
//! - Keep the [`CastHit`] with the smallest [`CastHit::t`].
//!
//! # Key types
//!
//! - [`CastParams`] – per-query parameters such as the curve flattening
//!   tolerance and whether shapes containing the segment start are skipped.
//! - [`CastHit`] – the entry parameter `t` along the segment and the world
//!   point it corresponds to.
//! - [`SegmentCast`] – a trait implemented by shapes that can answer the
//!   entry question for a segment.
//!
//! ## Shapes and scope
//!
//! [`SegmentCast`] is implemented for:
//!
//! - [`Rect`] – exact slab test.
//! - [`Circle`] – exact quadratic solve.
//! - [`RoundedRect`] and [`BezPath`] – boundary intersection via
//!   [`kurbo::PathSeg::intersect_line`], see [`cast_shape`].
//!
//! The [`stroke`] module adds [`stroke::StrokedLine`], a segment with a
//! half-width (a capsule), which is how thin walls and mirrors are usually
//! modeled.
//!
//! ```rust
//! use kurbo::{Line, Rect};
//! use understory_ray_hit::{CastParams, SegmentCast};
//!
//! let wall = Rect::new(10.0, -5.0, 12.0, 5.0);
//! let beam = Line::new((0.0, 0.0), (20.0, 0.0));
//! let hit = wall.cast_local(beam, &CastParams::default()).unwrap();
//! assert_eq!(hit.t, 0.5);
//! assert_eq!(hit.point, kurbo::Point::new(10.0, 0.0));
//! ```

#![no_std]

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, Circle, Line, Point, Rect, RoundedRect, Shape};

/// Stroke-oriented casting primitives.
pub mod stroke;

/// Parameters controlling segment casts.
#[derive(Clone, Copy, Debug)]
pub struct CastParams {
    /// Flattening tolerance used when a shape's boundary contains curves.
    pub tolerance: f64,
    /// Ignore shapes that already contain the segment start.
    ///
    /// A segment that starts inside a shape never "enters" it, so the usual
    /// answer is no hit. Set this to `false` to report such shapes as a hit at
    /// `t == 0.0` instead.
    pub skip_inside: bool,
}

impl Default for CastParams {
    fn default() -> Self {
        Self {
            tolerance: 0.1,
            skip_inside: true,
        }
    }
}

/// Where a segment first enters a shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastHit {
    /// Normalized parameter along the segment, in `0.0..=1.0`.
    pub t: f64,
    /// The entry point.
    pub point: Point,
}

impl CastHit {
    /// Build a hit at parameter `t` along `line`.
    pub fn at(line: Line, t: f64) -> Self {
        Self {
            t,
            point: line.p0.lerp(line.p1, t),
        }
    }

    /// Keep whichever of `self` and `other` is nearer to the segment start.
    pub fn nearest(self, other: Option<Self>) -> Self {
        match other {
            Some(other) if other.t < self.t => other,
            _ => self,
        }
    }
}

/// Trait for casting a line segment against a shape in local coordinates.
pub trait SegmentCast {
    /// Cast `line` (from `p0` towards `p1`) against this shape.
    ///
    /// Returns the first entry point, or `None` when the segment misses the
    /// shape or ends before reaching it.
    fn cast_local(&self, line: Line, params: &CastParams) -> Option<CastHit>;
}

fn inside_hit(line: Line, params: &CastParams) -> Option<CastHit> {
    if params.skip_inside {
        None
    } else {
        Some(CastHit::at(line, 0.0))
    }
}

/// Exact slab test against the (normalized) rectangle.
impl SegmentCast for Rect {
    fn cast_local(&self, line: Line, params: &CastParams) -> Option<CastHit> {
        let rect = self.abs();
        if rect.contains(line.p0) {
            return inside_hit(line, params);
        }
        let d = line.p1 - line.p0;
        let mut t_enter = 0.0_f64;
        let mut t_exit = 1.0_f64;
        for (origin, delta, min, max) in [
            (line.p0.x, d.x, rect.x0, rect.x1),
            (line.p0.y, d.y, rect.y0, rect.y1),
        ] {
            if delta == 0.0 {
                if origin < min || origin > max {
                    return None;
                }
                continue;
            }
            let (mut a, mut b) = ((min - origin) / delta, (max - origin) / delta);
            if a > b {
                core::mem::swap(&mut a, &mut b);
            }
            t_enter = t_enter.max(a);
            t_exit = t_exit.min(b);
            if t_enter > t_exit {
                return None;
            }
        }
        Some(CastHit::at(line, t_enter))
    }
}

/// Exact cast against a filled disk.
impl SegmentCast for Circle {
    fn cast_local(&self, line: Line, params: &CastParams) -> Option<CastHit> {
        let f = line.p0 - self.center;
        let r2 = self.radius * self.radius;
        if f.hypot2() < r2 {
            return inside_hit(line, params);
        }
        let d = line.p1 - line.p0;
        let a = d.hypot2();
        if a == 0.0 {
            return None;
        }
        let b = 2.0 * f.dot(d);
        let c = f.hypot2() - r2;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let t = (-b - disc.sqrt()) / (2.0 * a);
        (0.0..=1.0).contains(&t).then(|| CastHit::at(line, t))
    }
}

impl SegmentCast for RoundedRect {
    fn cast_local(&self, line: Line, params: &CastParams) -> Option<CastHit> {
        cast_shape(self, line, params)
    }
}

impl SegmentCast for BezPath {
    fn cast_local(&self, line: Line, params: &CastParams) -> Option<CastHit> {
        cast_shape(self, line, params)
    }
}

/// Generic segment cast for any [`kurbo::Shape`].
///
/// Intersects the segment with each boundary segment of the shape (curves
/// are handled by [`kurbo::PathSeg::intersect_line`], flattened at
/// [`CastParams::tolerance`]) and keeps the nearest crossing. Engine shapes
/// can implement [`SegmentCast`] by calling this.
pub fn cast_shape<S: Shape>(shape: &S, line: Line, params: &CastParams) -> Option<CastHit> {
    if shape.contains(line.p0) {
        return inside_hit(line, params);
    }
    let mut best: Option<f64> = None;
    for seg in shape.path_segments(params.tolerance) {
        for hit in seg.intersect_line(line) {
            if best.is_none_or(|t| hit.line_t < t) {
                best = Some(hit.line_t);
            }
        }
    }
    best.map(|t| CastHit::at(line, t.clamp(0.0, 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beam() -> Line {
        Line::new((0.0, 0.0), (20.0, 0.0))
    }

    #[test]
    fn rect_entry_point() {
        let r = Rect::new(10.0, -5.0, 12.0, 5.0);
        let hit = r
            .cast_local(beam(), &CastParams::default())
            .expect("expected hit");
        assert_eq!(hit.t, 0.5);
        assert_eq!(hit.point, Point::new(10.0, 0.0));
    }

    #[test]
    fn rect_miss_and_short_segment() {
        let r = Rect::new(10.0, 5.0, 12.0, 8.0);
        assert!(r.cast_local(beam(), &CastParams::default()).is_none());

        let short = Line::new((0.0, 6.0), (5.0, 6.0));
        assert!(r.cast_local(short, &CastParams::default()).is_none());
    }

    #[test]
    fn rect_start_inside_is_skipped_by_default() {
        let r = Rect::new(-1.0, -1.0, 1.0, 1.0);
        assert!(r.cast_local(beam(), &CastParams::default()).is_none());

        let params = CastParams {
            skip_inside: false,
            ..CastParams::default()
        };
        let hit = r.cast_local(beam(), &params).expect("expected inside hit");
        assert_eq!(hit.t, 0.0);
    }

    #[test]
    fn inverted_rect_is_normalized() {
        let r = Rect::new(12.0, 5.0, 10.0, -5.0);
        let hit = r
            .cast_local(beam(), &CastParams::default())
            .expect("expected hit");
        assert_eq!(hit.point, Point::new(10.0, 0.0));
    }

    #[test]
    fn circle_hit_and_miss() {
        let c = Circle::new((10.0, 0.0), 2.0);
        let hit = c
            .cast_local(beam(), &CastParams::default())
            .expect("expected hit");
        assert!((hit.t - 0.4).abs() < 1e-12, "t was {}", hit.t);

        let off = Circle::new((10.0, 5.0), 2.0);
        assert!(off.cast_local(beam(), &CastParams::default()).is_none());

        let behind = Circle::new((-10.0, 0.0), 2.0);
        assert!(behind.cast_local(beam(), &CastParams::default()).is_none());
    }

    #[test]
    fn bezpath_triangle() {
        let mut path = BezPath::new();
        path.move_to((8.0, -4.0));
        path.line_to((16.0, 0.0));
        path.line_to((8.0, 4.0));
        path.close_path();

        let hit = path
            .cast_local(beam(), &CastParams::default())
            .expect("expected hit");
        assert!((hit.point.x - 8.0).abs() < 1e-9, "entry was {:?}", hit.point);
    }

    #[test]
    fn rounded_rect_uses_boundary() {
        let rr = RoundedRect::new(10.0, -5.0, 14.0, 5.0, 1.0);
        let hit = rr
            .cast_local(beam(), &CastParams::default())
            .expect("expected hit");
        assert!((hit.point.x - 10.0).abs() < 1e-6, "entry was {:?}", hit.point);
    }

    #[test]
    fn nearest_keeps_smaller_t() {
        let line = beam();
        let a = CastHit::at(line, 0.75);
        let b = CastHit::at(line, 0.25);
        assert_eq!(a.nearest(Some(b)), b);
        assert_eq!(b.nearest(Some(a)), b);
        assert_eq!(a.nearest(None), a);
    }
}
