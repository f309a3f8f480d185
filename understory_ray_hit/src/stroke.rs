// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke-oriented casting helpers.
//!
//! These types are small building blocks rather than a full stroke model.
//! Joins, dashes, and variable width are left to engines.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Circle, Line, PathSeg, Point, Vec2};

use crate::{CastHit, CastParams, SegmentCast};

/// A stroked line segment (centerline + half-width) with round caps.
///
/// With a `half_width` of zero this is an infinitely thin wall and the cast
/// is a plain segment/segment intersection. Otherwise the stroke is treated as
/// a capsule: the two offset edges plus a disk at each end.
#[derive(Clone, Copy, Debug)]
pub struct StrokedLine {
    /// The centerline segment in local coordinates.
    pub line: Line,
    /// Half of the stroke width in local units.
    pub half_width: f64,
}

impl StrokedLine {
    /// Distance from `pt` to the centerline segment.
    pub fn distance_to(&self, pt: Point) -> f64 {
        let p0 = self.line.p0;
        let v = self.line.p1 - p0;
        let w = pt - p0;
        let len2 = v.hypot2();
        let t = if len2 > 0.0 { w.dot(v) / len2 } else { 0.0 };
        let proj = p0 + v * t.clamp(0.0, 1.0);
        (pt - proj).hypot()
    }

    fn edges(&self) -> [Line; 2] {
        let v = self.line.p1 - self.line.p0;
        let len = v.hypot();
        if len == 0.0 {
            return [self.line, self.line];
        }
        let n = Vec2::new(-v.y, v.x) * (self.half_width / len);
        [
            Line::new(self.line.p0 + n, self.line.p1 + n),
            Line::new(self.line.p0 - n, self.line.p1 - n),
        ]
    }
}

fn cross_segment(wall: Line, line: Line) -> Option<f64> {
    PathSeg::Line(wall)
        .intersect_line(line)
        .into_iter()
        .map(|hit| hit.line_t)
        .reduce(f64::min)
}

impl SegmentCast for StrokedLine {
    fn cast_local(&self, line: Line, params: &CastParams) -> Option<CastHit> {
        if self.half_width <= 0.0 {
            return cross_segment(self.line, line).map(|t| CastHit::at(line, t));
        }
        if self.distance_to(line.p0) < self.half_width {
            return if params.skip_inside {
                None
            } else {
                Some(CastHit::at(line, 0.0))
            };
        }

        let mut best: Option<CastHit> = None;
        for edge in self.edges() {
            if let Some(t) = cross_segment(edge, line) {
                let hit = CastHit::at(line, t);
                best = Some(hit.nearest(best));
            }
        }
        for cap in [self.line.p0, self.line.p1] {
            if let Some(hit) = Circle::new(cap, self.half_width).cast_local(line, params) {
                best = Some(hit.nearest(best));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thin_wall_crossing() {
        let wall = StrokedLine {
            line: Line::new((10.0, -5.0), (10.0, 5.0)),
            half_width: 0.0,
        };
        let beam = Line::new((0.0, 0.0), (20.0, 0.0));
        let hit = wall
            .cast_local(beam, &CastParams::default())
            .expect("expected hit");
        assert!((hit.t - 0.5).abs() < 1e-12, "t was {}", hit.t);

        let parallel = Line::new((0.0, 10.0), (20.0, 10.0));
        assert!(wall.cast_local(parallel, &CastParams::default()).is_none());
    }

    #[test]
    fn capsule_edge_and_cap() {
        let wall = StrokedLine {
            line: Line::new((10.0, -5.0), (10.0, 5.0)),
            half_width: 1.0,
        };
        let beam = Line::new((0.0, 0.0), (20.0, 0.0));
        let hit = wall
            .cast_local(beam, &CastParams::default())
            .expect("expected edge hit");
        assert!((hit.point.x - 9.0).abs() < 1e-9, "entry was {:?}", hit.point);

        // Passes just above the top end: only the round cap is struck.
        let over = Line::new((0.0, 5.5), (20.0, 5.5));
        let cap = wall
            .cast_local(over, &CastParams::default())
            .expect("expected cap hit");
        assert!(cap.point.x < 10.0 && cap.point.x > 9.0, "entry was {:?}", cap.point);

        let miss = Line::new((0.0, 7.0), (20.0, 7.0));
        assert!(wall.cast_local(miss, &CastParams::default()).is_none());
    }

    #[test]
    fn capsule_start_inside() {
        let wall = StrokedLine {
            line: Line::new((0.0, -5.0), (0.0, 5.0)),
            half_width: 1.0,
        };
        let beam = Line::new((0.0, 0.0), (20.0, 0.0));
        assert!(wall.cast_local(beam, &CastParams::default()).is_none());
    }

    #[test]
    fn distance_to_segment() {
        let s = StrokedLine {
            line: Line::new((0.0, 0.0), (10.0, 0.0)),
            half_width: 1.0,
        };
        assert_eq!(s.distance_to(Point::new(5.0, 3.0)), 3.0);
        assert_eq!(s.distance_to(Point::new(13.0, 4.0)), 5.0);
    }
}
